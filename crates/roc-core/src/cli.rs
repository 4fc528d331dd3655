//! Command-line surface: argument definitions and dispatch.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use roc_common::{
    format_error_human, BatchRequest, ConfigResolver, Error, InputSource, LoadedConfig,
    OutputFormat, Result, RocRequest, StructuredError, SCHEMA_VERSION,
};
use roc_math::{BatchMode, RocOptions, ThresholdRule};

use crate::commands;
use crate::exit_codes::ExitCode;
use crate::log_event;
use crate::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogLevel, Stage,
};
use crate::output::{render, Render, VersionReport};

/// ROC curve and (partial) AUC engine.
#[derive(Parser, Debug)]
#[command(name = "roc-core")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Config file (overrides ROC_CONFIG and ROC_CONFIG_DIR)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full ROC curve for one scorer
    Curve(CurveArgs),

    /// Scalar (partial) AUC for one scorer
    Auc(AucArgs),

    /// Column-wise AUC for a score matrix
    Batch(BatchArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// JSON request file, `-` for stdin
    #[arg(default_value = "-")]
    pub input: String,
}

impl InputArgs {
    pub fn source(&self) -> InputSource {
        InputSource::from_arg(&self.input)
    }
}

/// Engine overrides layered over the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Rank ascending: lower score = more positive
    #[arg(long)]
    pub increasing: bool,

    /// FPR cutoff for the partial AUC (1.0 = full curve)
    #[arg(long, value_name = "FPR")]
    pub x_threshold: Option<f64>,

    /// Cutoff rule: `fpr` compares the curve's x, `auc` the running area
    #[arg(long, value_name = "RULE")]
    pub rule: Option<ThresholdRule>,
}

impl EngineArgs {
    pub fn apply(&self, base: RocOptions) -> RocOptions {
        let mut options = base;
        if self.increasing {
            options = options.with_decreasing(false);
        }
        if let Some(x) = self.x_threshold {
            options = options.with_x_threshold(x);
        }
        if let Some(rule) = self.rule {
            options = options.with_threshold_rule(rule);
        }
        options
    }
}

#[derive(Args, Debug)]
pub struct CurveArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Args, Debug)]
pub struct AucArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Also report the selected curve point
    #[arg(long)]
    pub show_point: bool,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Score columns one at a time
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration and its source
    Show,
}

impl Commands {
    /// Name recorded in logs and envelopes.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Curve(_) => "curve",
            Commands::Auc(_) => "auc",
            Commands::Batch(_) => "batch",
            Commands::Config(_) => "config show",
            Commands::Version => "version",
        }
    }
}

/// Run a parsed command line to completion.
///
/// The payload goes to stdout; logs and errors go to stderr.
pub fn run(cli: Cli) -> ExitCode {
    let global = cli.global.clone();
    let command = cli.command.name();
    let run_id = generate_run_id();

    let loaded = match &cli.command {
        Commands::Version => LoadedConfig::defaults(),
        _ => match ConfigResolver::from_env(global.config.clone()).load() {
            Ok(loaded) => loaded,
            Err(e) => return report_error(&e, &global, &run_id, command),
        },
    };

    let log_config = LogConfig::resolve(
        |k| std::env::var(k).ok(),
        loaded.config.log.level.as_deref(),
        loaded.config.log.format.as_deref(),
        LogLevel::from_verbosity(global.verbose, global.quiet),
        None,
    );
    init_logging(&log_config);

    let ctx = LogContext::new(run_id.as_str(), command);
    {
        let _span = ctx.span(Stage::Init).entered();
        log_event!(
            DEBUG,
            event_names::RUN_STARTED,
            "run started",
            format = %global.format
        );
        match loaded.path.as_deref() {
            Some(path) => log_event!(
                DEBUG,
                event_names::CONFIG_LOADED,
                "configuration loaded",
                source = %loaded.source,
                path = path
            ),
            None => log_event!(
                DEBUG,
                event_names::CONFIG_DEFAULT_USED,
                "using default configuration"
            ),
        }
    }

    match dispatch(&ctx, cli.command, &global, &loaded) {
        Ok(out) => {
            println!("{}", out);
            let _span = ctx.span(Stage::Output).entered();
            log_event!(DEBUG, event_names::RUN_FINISHED, "run finished");
            ExitCode::Clean
        }
        Err(e) => {
            let _span = ctx.span(Stage::Output).entered();
            log_event!(
                DEBUG,
                event_names::RUN_FAILED,
                "run failed",
                code = e.code() as u64
            );
            report_error(&e, &global, &run_id, command)
        }
    }
}

fn dispatch(
    ctx: &LogContext,
    command: Commands,
    global: &GlobalOpts,
    loaded: &LoadedConfig,
) -> Result<String> {
    let base = loaded
        .config
        .roc_options()
        .with_verbose(loaded.config.engine.verbose || global.verbose > 0);

    match command {
        Commands::Curve(args) => {
            let req: RocRequest = load_input(ctx, &args.input)?;
            let report = commands::run_curve(ctx, &req, &args.engine.apply(base))?;
            emit(ctx, &report, global.format)
        }
        Commands::Auc(args) => {
            let req: RocRequest = load_input(ctx, &args.input)?;
            let report =
                commands::run_auc(ctx, &req, &args.engine.apply(base), args.show_point)?;
            emit(ctx, &report, global.format)
        }
        Commands::Batch(args) => {
            let req: BatchRequest = load_input(ctx, &args.input)?;
            let mode = if args.sequential || !loaded.config.batch.parallel {
                BatchMode::Sequential
            } else {
                BatchMode::Auto
            };
            let report = commands::run_batch(ctx, &req, &args.engine.apply(base), mode)?;
            emit(ctx, &report, global.format)
        }
        Commands::Config(ConfigArgs {
            command: ConfigCommands::Show,
        }) => emit(ctx, &commands::run_config_show(loaded), global.format),
        Commands::Version => emit(ctx, &VersionReport::current(), global.format),
    }
}

fn load_input<T: serde::de::DeserializeOwned>(ctx: &LogContext, args: &InputArgs) -> Result<T> {
    let _span = ctx.span(Stage::Load).entered();
    let source = args.source();
    let value = source.read_json()?;
    log_event!(DEBUG, event_names::INPUT_LOADED, "request decoded", input = %source);
    Ok(value)
}

fn emit<T: Render>(ctx: &LogContext, report: &T, format: OutputFormat) -> Result<String> {
    let _span = ctx.span(Stage::Output).entered();
    let out = render(report, format, &ctx.run_id)?;
    log_event!(
        DEBUG,
        event_names::OUTPUT_WRITTEN,
        "output rendered",
        format = %format,
        bytes = out.len() as u64
    );
    Ok(out)
}

/// Write `err` to stderr in the shape the output format implies.
fn report_error(err: &Error, global: &GlobalOpts, run_id: &str, command: &str) -> ExitCode {
    let code = ExitCode::for_error(err);
    if global.format.is_machine() {
        let body = serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "run_id": run_id,
            "command": command,
            "status": "error",
            "exit_code": code.code_name(),
            "error": StructuredError::from(err),
        });
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
        );
    } else {
        let use_color = !global.no_color && std::io::stderr().is_terminal();
        eprintln!("{}", format_error_human(err, use_color));
    }
    code
}

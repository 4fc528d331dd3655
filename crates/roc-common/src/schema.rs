//! Output schema versioning.

/// Version of the JSON envelope emitted by the CLI.
///
/// Bump the minor version for additive fields and the major version when a
/// field is renamed or removed.
pub const SCHEMA_VERSION: &str = "1.0.0";

//! Request decoding for the CLI commands.
//!
//! Requests arrive as JSON from a file or stdin. Decoding checks only shape
//! (rectangular matrix, column-name count); label/score length agreement and
//! class balance are left to the engine so its error codes surface unchanged.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use roc_math::ndarray::Array2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where a request body is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` means stdin; anything else is a path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(arg))
        }
    }

    /// Decode a JSON document from this source.
    pub fn read_json<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            InputSource::Stdin => parse_reader(io::stdin().lock()),
            InputSource::File(path) => {
                let file = File::open(path)?;
                parse_reader(BufReader::new(file))
            }
        }
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Decode a JSON document from any reader.
pub fn parse_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T> {
    Ok(serde_json::from_reader(reader)?)
}

/// Scores and labels for a single scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RocRequest {
    pub scores: Vec<f64>,
    pub labels: Vec<bool>,
}

/// A score matrix (rows are samples) sharing one label vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchRequest {
    pub scores: Vec<Vec<f64>>,
    pub labels: Vec<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

impl BatchRequest {
    /// Number of columns implied by the first row, or by the names when
    /// there are no rows.
    pub fn width(&self) -> usize {
        match self.scores.first() {
            Some(row) => row.len(),
            None => self.columns.as_ref().map_or(0, Vec::len),
        }
    }

    /// Check the matrix is rectangular and names match its width.
    pub fn validate_shape(&self) -> Result<()> {
        let width = self.width();
        if let Some(row) = self.scores.iter().position(|r| r.len() != width) {
            return Err(Error::InvalidInput(format!(
                "row {} has {} scores, expected {}",
                row,
                self.scores[row].len(),
                width
            )));
        }
        if let Some(ref names) = self.columns {
            if names.len() != width {
                return Err(Error::InvalidInput(format!(
                    "{} column names for {} columns",
                    names.len(),
                    width
                )));
            }
        }
        Ok(())
    }

    /// Row-major matrix ready for the batch engine.
    pub fn to_matrix(&self) -> Result<Array2<f64>> {
        self.validate_shape()?;
        let shape = (self.scores.len(), self.width());
        let flat: Vec<f64> = self.scores.iter().flatten().copied().collect();
        Array2::from_shape_vec(shape, flat)
            .map_err(|e| Error::InvalidInput(format!("score matrix: {}", e)))
    }

    /// Column names, falling back to `col0`, `col1`, ...
    pub fn column_names(&self) -> Vec<String> {
        match self.columns {
            Some(ref names) => names.clone(),
            None => (0..self.width()).map(|j| format!("col{}", j)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(json: &str) -> BatchRequest {
        parse_reader(json.as_bytes()).unwrap()
    }

    #[test]
    fn input_source_from_arg() {
        assert_eq!(InputSource::from_arg("-"), InputSource::Stdin);
        assert_eq!(
            InputSource::from_arg("data.json"),
            InputSource::File(PathBuf::from("data.json"))
        );
        assert_eq!(InputSource::Stdin.to_string(), "<stdin>");
    }

    #[test]
    fn scalar_request_decodes() {
        let req: RocRequest =
            parse_reader(r#"{"scores":[0.1,0.4],"labels":[false,true]}"#.as_bytes()).unwrap();
        assert_eq!(req.scores, vec![0.1, 0.4]);
        assert_eq!(req.labels, vec![false, true]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = parse_reader::<RocRequest, _>(
            r#"{"scores":[0.1],"labels":[true],"weights":[1]}"#.as_bytes(),
        )
        .unwrap_err();
        assert_eq!(err.code(), 61);
    }

    #[test]
    fn batch_matrix_is_row_major() {
        let req = batch(r#"{"scores":[[1,2,3],[4,5,6]],"labels":[true,false]}"#);
        let m = req.to_matrix().unwrap();
        assert_eq!(m.dim(), (2, 3));
        assert_eq!(m[[0, 2]], 3.0);
        assert_eq!(m[[1, 0]], 4.0);
        assert_eq!(req.column_names(), vec!["col0", "col1", "col2"]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let req = batch(r#"{"scores":[[1,2],[3]],"labels":[true,false]}"#);
        let err = req.to_matrix().unwrap_err();
        assert_eq!(err.code(), 20);
        assert!(err.to_string().contains("row 1 has 1 scores, expected 2"));
    }

    #[test]
    fn column_name_count_must_match() {
        let req = batch(r#"{"scores":[[1,2]],"labels":[true],"columns":["a"]}"#);
        assert!(req.validate_shape().is_err());

        let ok = batch(r#"{"scores":[[1,2]],"labels":[true],"columns":["a","b"]}"#);
        assert_eq!(ok.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn empty_matrix_takes_width_from_names() {
        let req = batch(r#"{"scores":[],"labels":[],"columns":["a","b"]}"#);
        assert_eq!(req.to_matrix().unwrap().dim(), (0, 2));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = InputSource::File(PathBuf::from("/nonexistent/roc/request.json"))
            .read_json::<RocRequest>()
            .unwrap_err();
        assert_eq!(err.code(), 60);
    }
}

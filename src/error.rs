// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
  #[error("Parse error on line {line}: {message}")]
  Parse { line: usize, message: String },

  #[error("Unsupported structure format: '{0}'")]
  UnsupportedFormat(String),

  #[error("Structure contains no atoms")]
  EmptyStructure,

  #[error("Cannot convert '{value}' to a number (column '{column}', row {row})")]
  Coercion {
    column: String,
    row: usize,
    value: String,
  },

  #[error("Unknown column: '{0}'")]
  UnknownColumn(String),

  #[error("Column '{0}' does not hold scalar values")]
  NotScalar(String),

  #[error("Failed to read '{path}': {source}", path = path.display())]
  FileRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Rendering error: {0}")]
  Render(String),
}

impl DashboardError {
  pub fn parse(line: usize, message: impl Into<String>) -> Self {
    DashboardError::Parse {
      line,
      message: message.into(),
    }
  }
}

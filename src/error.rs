//! Error values returned by the analysis operations.
//!
//! A form that does not match is not an error; see `logic::AnalysisOutcome`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
  /// A reference table needed by the call failed to load.
  #[error("reference data unavailable ({table}): {reason}")]
  ReferenceDataUnavailable { table: String, reason: String },

  /// Requested rhyme-foot pattern or form/attribution pair does not exist.
  #[error("invalid selection: {0}")]
  InvalidSelection(String),

  /// Missing or empty request parameters.
  #[error("invalid request: {0}")]
  InvalidRequest(String),
}

impl AnalysisError {
  pub fn unavailable(table: &str, reason: impl Into<String>) -> Self {
    AnalysisError::ReferenceDataUnavailable { table: table.to_string(), reason: reason.into() }
  }
}

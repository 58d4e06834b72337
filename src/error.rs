//! Error types for parabreak
//!
//! Two kinds of failure are surfaced to callers:
//! - Malformed input: a paragraph missing its terminator, or a bad line
//!   length schedule. No search is attempted.
//! - Infeasible fit: the active list drains during the scan. By default
//!   this is recovered internally (one overfull line is admitted) and only
//!   reported through the returned ratios; the `Surface` overfull policy
//!   turns it into [`BreakError::Overfull`] instead.
//!
//! All errors use the `thiserror` crate for minimal boilerplate and proper
//! error trait implementations. Infinities on penalties and stretchability
//! are first-class values, never errors.

use thiserror::Error;

/// Result type alias for parabreak operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for parabreak.
///
/// Each variant wraps the more specific error type for that part of the
/// pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
  /// The paragraph violates a structural invariant.
  #[error("Paragraph error: {0}")]
  Paragraph(#[from] ParagraphError),

  /// The break request or search failed.
  #[error("Break error: {0}")]
  Break(#[from] BreakError),
}

/// Structural problems with the input paragraph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParagraphError {
  /// The finishing glue / forcing penalty pair is missing.
  #[error("Paragraph of {len} items is missing its finishing glue and forcing penalty")]
  MissingTerminator { len: usize },
}

/// Problems with a break request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BreakError {
  /// The line length schedule was empty.
  #[error("Line length schedule is empty")]
  EmptyLineLengths,

  /// The line length schedule contained an entry that is not a positive
  /// finite number.
  #[error("Line length at index {index} is not positive and finite: {value}")]
  InvalidLineLength { index: usize, value: f64 },

  /// No feasible break exists and the overfull policy is `Surface`.
  ///
  /// `position` is the item index at which the active list drained.
  #[error("No feasible break before item {position}; an overfull line would be required")]
  Overfull { position: usize },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_missing_terminator_display() {
    let error = ParagraphError::MissingTerminator { len: 3 };
    let display = format!("{}", error);
    assert!(display.contains("3 items"));
    assert!(display.contains("forcing penalty"));
  }

  #[test]
  fn test_invalid_line_length_display() {
    let error = BreakError::InvalidLineLength {
      index: 2,
      value: -5.0,
    };
    let display = format!("{}", error);
    assert!(display.contains("index 2"));
    assert!(display.contains("-5"));
  }

  #[test]
  fn test_overfull_display() {
    let error = BreakError::Overfull { position: 7 };
    assert!(format!("{}", error).contains("item 7"));
  }

  #[test]
  fn test_error_from_paragraph_error() {
    let error: Error = ParagraphError::MissingTerminator { len: 0 }.into();
    assert!(matches!(error, Error::Paragraph(_)));
    assert!(format!("{}", error).contains("Paragraph error"));
  }

  #[test]
  fn test_error_from_break_error() {
    let error: Error = BreakError::EmptyLineLengths.into();
    assert!(matches!(error, Error::Break(_)));
    assert!(format!("{}", error).contains("Break error"));
  }

  #[test]
  fn test_error_trait_implemented() {
    let error = Error::Break(BreakError::EmptyLineLengths);
    let _: &dyn std::error::Error = &error;
  }
}

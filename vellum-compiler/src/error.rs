use thiserror::Error;

use crate::sfc::Rule;

/// Caller-contract violations. Malformed templates never produce one of
/// these; they surface as [`crate::Warning`]s instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("interpolation delimiters must be non-empty (got {open:?} and {close:?})")]
    InvalidDelimiters { open: String, close: String },
}

#[derive(Debug, Error)]
pub enum SfcError {
    #[error("invalid component file: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
}

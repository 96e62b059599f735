use thiserror::Error;

use crate::error::ParseError;

/// Represents all errors that can be recorded against a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The row has an empty name.
    #[error("Name required.")]
    MissingName,
    /// The row has an empty formula.
    #[error("Expression required.")]
    MissingExpression,
    /// The formula failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Parsing errors.
///
/// Defines the errors raised while reading a single formula: unknown or
/// not-yet-defined names, unbalanced parentheses, and token streams that end
/// too early or too late.
pub mod parse_error;
/// Row errors.
///
/// A row error is recorded against one row of an evaluation pass. It never
/// aborts the pass: the failing row is simply left out of the computed
/// context.
pub mod row_error;
/// Document errors.
///
/// Raised while loading or saving a state document.
pub mod document_error;

pub use document_error::DocumentError;
pub use parse_error::ParseError;
pub use row_error::RowError;

/// Core parsing entry points.
///
/// Contains the `Scope` trait consulted for name resolution, the top-level
/// `parse` function and the expression entry point.
pub mod core;

/// Binary expression parsing.
///
/// Handles the two precedence levels of the grammar, `+ -` below `* /`, both
/// left-associative.
pub mod binary;

/// Primary expression parsing.
///
/// Parses numbers, parenthesized expressions and references to earlier rows.
pub mod primary;

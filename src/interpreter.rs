/// The evaluator module folds parsed trees into numbers and runs whole
/// chains.
///
/// # Responsibilities
/// - Evaluates formula trees with IEEE-754 arithmetic.
/// - Builds the computed context of a pass, row by row.
/// - Records row errors without aborting the pass.
pub mod evaluator;
/// The lexer module tokenizes formulas.
///
/// # Responsibilities
/// - Converts formula text into numbers, identifiers, operators and
///   parentheses.
/// - Skips whitespace and drops characters that match no token.
pub mod lexer;
/// The overlay module applies active buffs to evaluated rows.
///
/// # Responsibilities
/// - Sums the multiplicative and flat modifiers targeting each row name.
/// - Computes buffed values.
/// - Builds display trees marking the nodes a buff introduced.
pub mod overlay;
/// The parser module builds formula trees from tokens.
///
/// # Responsibilities
/// - Parses `+ - * /` with the usual precedence and parentheses.
/// - Resolves identifiers against the names defined above the current row.
/// - Reports malformed formulas as parse errors.
pub mod parser;
/// The render module turns display trees into text.
///
/// References are expanded into the display trees of the rows they name, so
/// a single line shows the whole computation behind a value.
pub mod render;

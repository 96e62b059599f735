use thiserror::Error;

/// Represents all errors that can occur while parsing a formula.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A name that is not defined by any earlier row.
    ///
    /// A token that cannot start an operand (such as a leading `-`) is
    /// reported the same way, with the token text as the name.
    #[error("Unknown identifier '{name}'.")]
    UnknownIdentifier {
        /// The unresolved token text.
        name: String,
    },
    /// A `(` without its closing `)`.
    #[error("Missing closing parenthesis ')'.")]
    MissingParen,
    /// The formula ended where an operand was expected.
    #[error("Unexpected end of expression.")]
    UnexpectedEnd,
    /// A complete expression was followed by more tokens.
    #[error("Unexpected token '{token}' after expression.")]
    TrailingTokens {
        /// The first token left over.
        token: String,
    },
    /// The formula holds more operators and parentheses than one row may.
    #[error("Expression is too complex (more than {limit} operators and parentheses).")]
    TooComplex {
        /// The number of operators and parentheses allowed.
        limit: usize,
    },
}

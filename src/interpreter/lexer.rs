use std::fmt;

use logos::Logos;

/// Represents a lexical token of a formula.
///
/// Characters that match no token and are not whitespace are dropped by
/// [`Tokens`] instead of producing an error.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    /// Numeric literal tokens, such as `42` or `3.14`.
    #[regex(r"[0-9]+\.[0-9]+", parse_number)]
    #[regex(r"[0-9]+", parse_number)]
    Number(f64),
    /// Identifier tokens naming an earlier row, such as `Base` or `crit_2`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `^`, recognized but not part of any grammar rule.
    #[token("^")]
    Caret,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// Whitespace.
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Ignored,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Identifier(name) => write!(f, "{name}"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Caret => write!(f, "^"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Ignored => Ok(()),
        }
    }
}

/// The token sequence of one formula.
///
/// The sequence is lazy and finite. A clone resumes from the position it was
/// taken at, so cloning before consumption replays the whole formula.
#[derive(Clone)]
pub struct Tokens<'src> {
    lexer: logos::Lexer<'src, Token>,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lexer.next()? {
                Ok(token) => return Some(token),
                Err(()) => {
                    tracing::trace!(span = ?self.lexer.span(), "dropping unrecognized input");
                },
            }
        }
    }
}

/// Splits a formula into tokens.
///
/// # Examples
/// ```
/// use logic_chain::interpreter::lexer::{Token, tokenize};
///
/// let tokens: Vec<Token> = tokenize("(Base + 2.5) * 2").collect();
/// assert_eq!(tokens,
///            vec![Token::LParen,
///                 Token::Identifier("Base".to_string()),
///                 Token::Plus,
///                 Token::Number(2.5),
///                 Token::RParen,
///                 Token::Star,
///                 Token::Number(2.0)]);
/// ```
#[must_use]
pub fn tokenize(source: &str) -> Tokens<'_> {
    Tokens { lexer: Token::lexer(source) }
}

/// Parses a numeric literal from the current token slice.
///
/// # Returns
/// - `Some(f64)`: The parsed value if successful.
/// - `None`: If the slice is not a valid float.
fn parse_number(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        tokenize(source).map(|token| token.to_string()).collect()
    }

    #[test]
    fn empty_and_blank_input_yield_nothing() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize("   \t\n").count(), 0);
    }

    #[test]
    fn unrecognized_characters_are_dropped() {
        assert_eq!(texts("2 $ 3 # x"), vec!["2", "3", "x"]);
        assert_eq!(texts("a % b"), vec!["a", "b"]);
    }

    #[test]
    fn numbers_win_over_identifiers() {
        assert_eq!(texts("3abc"), vec!["3", "abc"]);
        assert_eq!(texts("x1 + 2"), vec!["x1", "+", "2"]);
    }

    #[test]
    fn dangling_decimal_point_is_dropped() {
        assert_eq!(tokenize("3.").collect::<Vec<_>>(), vec![Token::Number(3.0)]);
        assert_eq!(tokenize(".5").collect::<Vec<_>>(), vec![Token::Number(5.0)]);
    }

    #[test]
    fn caret_is_tokenized() {
        assert_eq!(texts("2^3"), vec!["2", "^", "3"]);
    }

    #[test]
    fn sequence_can_be_replayed() {
        let tokens = tokenize("a * b");
        let first: Vec<Token> = tokens.clone().collect();
        let second: Vec<Token> = tokens.collect();
        assert_eq!(first, second);
    }
}

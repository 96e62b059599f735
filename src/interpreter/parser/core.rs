use std::{
    collections::{BTreeSet, HashSet},
    hash::BuildHasher,
    iter::Peekable,
};

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{lexer::Token, parser::binary::parse_additive},
};

pub type ParseResult<T> = Result<T, ParseError>;

/// The most operator and parenthesis nodes a single formula may contain.
pub const MAX_NODES: usize = 512;

/// Counts the operator and parenthesis nodes a formula may still create.
///
/// Every binary operator and every parenthesized group spends one unit, so
/// both long operator chains and deep nesting draw on the same budget. This
/// bounds the depth of every tree the parser returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseBudget {
    limit:     usize,
    remaining: usize,
}

impl ParseBudget {
    /// Creates a budget of `limit` nodes.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { limit,
               remaining: limit }
    }

    /// Spends one node.
    ///
    /// # Errors
    /// - `TooComplex` once the budget is used up.
    pub fn spend(&mut self) -> ParseResult<()> {
        if self.remaining == 0 {
            return Err(ParseError::TooComplex { limit: self.limit });
        }
        self.remaining -= 1;
        Ok(())
    }
}

impl Default for ParseBudget {
    fn default() -> Self {
        Self::new(MAX_NODES)
    }
}

/// The names a formula is allowed to reference.
///
/// The parser accepts an identifier only if the scope defines it. During an
/// evaluation pass the scope is the computed context built so far, which is
/// what keeps a row from seeing itself or any row below it.
pub trait Scope {
    /// Returns `true` if `name` can be referenced.
    fn is_defined(&self, name: &str) -> bool;
}

impl<S: BuildHasher> Scope for HashSet<String, S> {
    fn is_defined(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl Scope for BTreeSet<String> {
    fn is_defined(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl Scope for [&str] {
    fn is_defined(&self, name: &str) -> bool {
        self.iter().any(|defined| *defined == name)
    }
}

/// Parses a complete formula.
///
/// The whole token sequence must form one expression; leftover tokens are an
/// error.
///
/// # Parameters
/// - `tokens`: The formula's tokens.
/// - `scope`: The names that may be referenced.
///
/// # Errors
/// - `TrailingTokens` if tokens remain after the expression.
/// - `TooComplex` if the formula has more than [`MAX_NODES`] operators and
///   parentheses.
/// - Propagates any errors from expression parsing.
///
/// # Examples
/// ```
/// use logic_chain::{
///     error::ParseError,
///     interpreter::{lexer::tokenize, parser::core::parse},
/// };
///
/// let scope: &[&str] = &["Base"];
/// let tree = parse(tokenize("Base * 2"), scope).unwrap();
/// assert_eq!(tree.to_string(), "Base * 2");
///
/// assert_eq!(parse(tokenize("Bonus"), scope),
///            Err(ParseError::UnknownIdentifier { name: "Bonus".to_string() }));
/// ```
pub fn parse<I, S>(tokens: I, scope: &S) -> ParseResult<Expr>
    where I: Iterator<Item = Token>,
          S: Scope + ?Sized
{
    let mut tokens = tokens.peekable();
    let root = parse_expression(&mut tokens, scope, &mut ParseBudget::default())?;

    match tokens.next() {
        Some(token) => Err(ParseError::TrailingTokens { token: token.to_string() }),
        None => Ok(root),
    }
}

/// Parses a full expression.
///
/// Grammar: `expression := additive`
pub fn parse_expression<I, S>(tokens: &mut Peekable<I>,
                              scope: &S,
                              budget: &mut ParseBudget)
                              -> ParseResult<Expr>
    where I: Iterator<Item = Token>,
          S: Scope + ?Sized
{
    parse_additive(tokens, scope, budget)
}

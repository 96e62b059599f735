use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseBudget, ParseResult, Scope},
            primary::parse_primary,
        },
    },
};

/// Parses addition and subtraction expressions.
///
/// Handles left-associative binary operators: `+` and `-`.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
///
/// # Parameters
/// - `tokens`: Token stream.
/// - `scope`: The names that may be referenced.
/// - `budget`: Spent once per operator.
///
/// # Returns
/// An `Expr::Operator` tree representing the parsed expression.
pub fn parse_additive<I, S>(tokens: &mut Peekable<I>,
                            scope: &S,
                            budget: &mut ParseBudget)
                            -> ParseResult<Expr>
    where I: Iterator<Item = Token>,
          S: Scope + ?Sized
{
    let mut left = parse_multiplicative(tokens, scope, budget)?;
    while let Some(op) = tokens.peek().and_then(token_to_binary_operator)
          && matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
    {
        tokens.next();
        budget.spend()?;
        let right = parse_multiplicative(tokens, scope, budget)?;
        left = Expr::operator(left, op, right);
    }
    Ok(left)
}

/// Parses multiplication and division expressions.
///
/// Handles left-associative binary operators: `*` and `/`.
///
/// The rule is: `multiplicative := primary (("*" | "/") primary)*`
///
/// # Parameters
/// - `tokens`: Token stream.
/// - `scope`: The names that may be referenced.
/// - `budget`: Spent once per operator.
///
/// # Returns
/// A binary expression tree combining primary nodes.
pub fn parse_multiplicative<I, S>(tokens: &mut Peekable<I>,
                                  scope: &S,
                                  budget: &mut ParseBudget)
                                  -> ParseResult<Expr>
    where I: Iterator<Item = Token>,
          S: Scope + ?Sized
{
    let mut left = parse_primary(tokens, scope, budget)?;
    while let Some(op) = tokens.peek().and_then(token_to_binary_operator)
          && matches!(op, BinaryOperator::Mul | BinaryOperator::Div)
    {
        tokens.next();
        budget.spend()?;
        let right = parse_primary(tokens, scope, budget)?;
        left = Expr::operator(left, op, right);
    }
    Ok(left)
}

/// Maps a token to its corresponding binary operator.
///
/// Returns `None` for every token that is not `+`, `-`, `*` or `/`. The
/// caret is tokenized but has no operator.
///
/// # Example
/// ```
/// use logic_chain::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::Plus),
///            Some(BinaryOperator::Add));
/// assert_eq!(token_to_binary_operator(&Token::Caret), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        _ => None,
    }
}

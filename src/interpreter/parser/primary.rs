use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseBudget, ParseResult, Scope, parse_expression},
    },
};

/// Parses a primary (atomic) expression.
///
/// Grammar:
/// ```text
///     primary := NUMBER
///              | "(" expression ")"
///              | IDENT
/// ```
///
/// There is no unary minus: a leading operator is never consumed as a sign
/// and is reported as an unknown identifier.
///
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
/// - `scope`: The names that may be referenced.
/// - `budget`: Spent once per parenthesized group, before descending.
///
/// # Errors
/// - `UnexpectedEnd` if no token is left.
/// - `MissingParen` if a parenthesized expression is not closed.
/// - `UnknownIdentifier` if an identifier is not in `scope`, or the token
///   cannot start an operand.
/// - `TooComplex` if the budget is used up.
pub fn parse_primary<I, S>(tokens: &mut Peekable<I>,
                           scope: &S,
                           budget: &mut ParseBudget)
                           -> ParseResult<Expr>
    where I: Iterator<Item = Token>,
          S: Scope + ?Sized
{
    match tokens.next() {
        None => Err(ParseError::UnexpectedEnd),
        Some(Token::Number(value)) => Ok(Expr::value(value)),
        Some(Token::LParen) => {
            budget.spend()?;
            let inner = parse_expression(tokens, scope, budget)?;
            match tokens.next() {
                Some(Token::RParen) => Ok(Expr::paren(inner)),
                _ => Err(ParseError::MissingParen),
            }
        },
        Some(Token::Identifier(name)) if scope.is_defined(&name) => Ok(Expr::Reference { name }),
        Some(token) => Err(ParseError::UnknownIdentifier { name: token.to_string() }),
    }
}

use crate::{ast::Expr, interpreter::evaluator::context::ComputedContext};

/// Evaluates a formula tree and returns its value.
///
/// Evaluation cannot fail. Arithmetic follows IEEE-754, so a division by zero
/// yields an infinity or `NaN` that propagates through the rest of the chain.
/// A reference to a name missing from the context evaluates to `0`; the
/// parser only admits names that are in the context, so this only happens
/// for trees evaluated against a different context than they were parsed
/// with.
///
/// # Parameters
/// - `expr`: Tree to evaluate.
/// - `context`: Values of the rows evaluated so far.
///
/// # Examples
/// ```
/// use logic_chain::{
///     interpreter::{
///         evaluator::{context::ComputedContext, core::eval},
///         lexer::tokenize,
///         parser::core::parse,
///     },
/// };
///
/// let context = ComputedContext::new();
/// let tree = parse(tokenize("(2 + 3) * 4"), &context).unwrap();
/// assert_eq!(eval(&tree, &context), 20.0);
/// ```
#[must_use]
pub fn eval(expr: &Expr, context: &ComputedContext) -> f64 {
    match expr {
        Expr::Value { value, .. } => *value,
        Expr::Operator { left, op, right, .. } => op.apply(eval(left, context), eval(right, context)),
        Expr::Reference { name } => context.value(name).unwrap_or(0.0),
        Expr::Paren { inner } => eval(inner, context),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{lexer::tokenize, parser::core::parse};

    fn eval_str(source: &str) -> f64 {
        let context = ComputedContext::new();
        let tree = parse(tokenize(source), &context).unwrap();
        eval(&tree, &context)
    }

    #[test]
    fn precedence_and_grouping() {
        assert_eq!(eval_str("2 + 3 * 4"), 14.0);
        assert_eq!(eval_str("(2 + 3) * 4"), 20.0);
        assert_eq!(eval_str("10 / 4 / 5"), 0.5);
        assert_eq!(eval_str("10 - 2 - 3"), 5.0);
        assert_eq!(eval_str("1.5 * (2 - 0.5)"), 2.25);
    }

    #[test]
    fn division_by_zero_is_not_an_error() {
        assert_eq!(eval_str("1 / 0"), f64::INFINITY);
        assert_eq!(eval_str("0 - 1 / 0"), f64::NEG_INFINITY);
        assert!(eval_str("0 / 0").is_nan());
    }

    #[test]
    fn missing_reference_reads_as_zero() {
        let context = ComputedContext::new();
        let tree = Expr::operator(Expr::reference("Gone"),
                                  crate::ast::BinaryOperator::Add,
                                  Expr::value(7.0));
        assert_eq!(eval(&tree, &context), 7.0);
    }
}

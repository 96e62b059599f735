use std::collections::BTreeMap;

use crate::{
    error::RowError,
    interpreter::{
        evaluator::{
            context::{ComputedContext, ComputedEntry},
            core::eval,
        },
        lexer::tokenize,
        overlay::{Aggregation, overlay},
        parser::core::parse,
    },
    model::{ActivationSet, Buff, Row, RowId},
};

/// The output of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Computed entries of every row that evaluated successfully.
    pub context: ComputedContext,
    /// Errors of the rows that did not, keyed by row id.
    pub errors:  BTreeMap<RowId, RowError>,
}

impl Evaluation {
    /// Returns the final value of the row named `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.context.value(name)
    }

    /// Returns the computed entry of the row named `name`.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&ComputedEntry> {
        self.context.get(name)
    }

    /// Returns the error recorded for a row.
    #[must_use]
    pub fn error(&self, id: &RowId) -> Option<&RowError> {
        self.errors.get(id)
    }

    /// Returns `true` if every row evaluated.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Evaluates a chain of rows with the buffs in `active`.
///
/// Rows are processed strictly in order. Each row is parsed against the names
/// evaluated above it, folded into a number, and overlaid with the active
/// modifiers that target its name. A row that fails is recorded in
/// [`Evaluation::errors`] and left out of the context, so rows referencing it
/// fail in turn; every other row still evaluates.
///
/// Each call builds its result from scratch and shares nothing with other
/// calls, so passes over different activation sets can run concurrently.
///
/// # Examples
/// ```
/// use logic_chain::{
///     evaluate,
///     model::{ActivationSet, Buff, Modifier, ModifierKind, Row},
/// };
///
/// let rows = vec![Row::new("r1", "Base", "100"),
///                 Row::new("r2", "Bonus", "50"),
///                 Row::new("r3", "Total", "(Base + Bonus) * 2")];
/// let buffs = vec![Buff::new("b1",
///                            "Heroism",
///                            vec![Modifier::new("m1", "Base", ModifierKind::Multiplicative, 0.1)])];
///
/// let plain = evaluate(&rows, &buffs, &ActivationSet::new());
/// assert_eq!(plain.value("Total"), Some(300.0));
///
/// let active: ActivationSet = ["b1".into()].into_iter().collect();
/// let buffed = evaluate(&rows, &buffs, &active);
/// assert!((buffed.value("Total").unwrap() - 320.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn evaluate(rows: &[Row], buffs: &[Buff], active: &ActivationSet) -> Evaluation {
    let aggregation = Aggregation::collect(buffs, active);
    let mut evaluation = Evaluation::default();

    for row in rows {
        match evaluate_row(row, &evaluation.context, &aggregation) {
            Ok(entry) => {
                tracing::debug!(row = %row.id,
                                name = %row.name,
                                value = entry.value,
                                buffed = entry.is_buffed,
                                "row evaluated");
                evaluation.context.insert(row.name.clone(), entry);
            },
            Err(error) => {
                tracing::debug!(row = %row.id, name = %row.name, %error, "row failed");
                evaluation.errors.insert(row.id.clone(), error);
            },
        }
    }

    evaluation
}

/// Evaluates a single row against the context built so far.
///
/// # Errors
/// - `MissingName` if the row has an empty name.
/// - `MissingExpression` if the row has an empty formula.
/// - `Parse` if the formula does not parse against `context`.
pub fn evaluate_row(row: &Row,
                    context: &ComputedContext,
                    aggregation: &Aggregation)
                    -> Result<ComputedEntry, RowError> {
    if row.name.is_empty() {
        return Err(RowError::MissingName);
    }
    if row.expression.is_empty() {
        return Err(RowError::MissingExpression);
    }

    let base_tree = parse(tokenize(&row.expression), context)?;
    let base_value = eval(&base_tree, context);
    let result = overlay(aggregation.get(&row.name), base_value, &base_tree);

    Ok(ComputedEntry { base_tree,
                       display_tree: result.display_tree,
                       value: result.value,
                       is_buffed: result.is_buffed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::Expr,
        error::ParseError,
        model::{Modifier, ModifierKind},
    };

    fn rows(definitions: &[(&str, &str)]) -> Vec<Row> {
        definitions.iter()
                   .enumerate()
                   .map(|(i, (name, expression))| Row::new(format!("r{i}"), *name, *expression))
                   .collect()
    }

    fn no_buffs(rows: &[Row]) -> Evaluation {
        evaluate(rows, &[], &ActivationSet::new())
    }

    #[test]
    fn forward_references_fail() {
        let chain = rows(&[("Total", "Base * 2"), ("Base", "10")]);
        let evaluation = no_buffs(&chain);

        assert_eq!(evaluation.error(&"r0".into()),
                   Some(&RowError::Parse(ParseError::UnknownIdentifier { name: "Base".to_string() })));
        assert_eq!(evaluation.value("Base"), Some(10.0));
        assert!(evaluation.value("Total").is_none());
    }

    #[test]
    fn rows_cannot_reference_themselves() {
        let evaluation = no_buffs(&rows(&[("X", "X + 1")]));
        assert!(matches!(evaluation.error(&"r0".into()),
                         Some(RowError::Parse(ParseError::UnknownIdentifier { .. }))));
    }

    #[test]
    fn duplicate_names_resolve_to_the_latest_row_above() {
        let chain = rows(&[("X", "1"), ("A", "X * 10"), ("X", "2"), ("B", "X * 10")]);
        let evaluation = no_buffs(&chain);

        assert_eq!(evaluation.value("A"), Some(10.0));
        assert_eq!(evaluation.value("B"), Some(20.0));
        assert_eq!(evaluation.value("X"), Some(2.0));
    }

    #[test]
    fn redefinition_can_reference_the_previous_value() {
        let evaluation = no_buffs(&rows(&[("X", "5"), ("X", "X + 1")]));
        assert_eq!(evaluation.value("X"), Some(6.0));
    }

    #[test]
    fn empty_name_and_expression() {
        let evaluation = no_buffs(&rows(&[("", "1"), ("A", ""), ("B", "   ")]));

        assert_eq!(evaluation.error(&"r0".into()), Some(&RowError::MissingName));
        assert_eq!(evaluation.error(&"r1".into()), Some(&RowError::MissingExpression));
        assert_eq!(evaluation.error(&"r2".into()),
                   Some(&RowError::Parse(ParseError::UnexpectedEnd)));
        assert!(evaluation.context.is_empty());
    }

    #[test]
    fn failed_redefinition_keeps_the_earlier_entry() {
        let evaluation = no_buffs(&rows(&[("X", "4"), ("X", "(1"), ("Y", "X")]));
        assert_eq!(evaluation.value("Y"), Some(4.0));
        assert_eq!(evaluation.errors.len(), 1);
    }

    #[test]
    fn modifiers_use_the_row_name() {
        let chain = rows(&[("Base", "10"), ("Total", "Base + 1")]);
        let buffs = vec![Buff::new("b1",
                                   "Flat",
                                   vec![Modifier::new("m1", "Base", ModifierKind::Flat, 5.0),
                                        Modifier::new("m2", "Total", ModifierKind::Flat, -1.0)])];
        let active: ActivationSet = ["b1".into()].into_iter().collect();
        let evaluation = evaluate(&chain, &buffs, &active);

        assert_eq!(evaluation.value("Base"), Some(15.0));
        assert_eq!(evaluation.value("Total"), Some(15.0));
        let total = evaluation.entry("Total").unwrap();
        assert!(total.is_buffed);
        assert_eq!(total.base_tree.to_string(), "Base + 1");
        assert_eq!(total.display_tree.to_string(), "Base + 1 - 1");
    }

    #[test]
    fn written_parentheses_are_shown_and_never_doubled() {
        let chain = rows(&[("A", "(5)"), ("B", "(1 + 2)")]);
        let buffs = vec![Buff::new("b1",
                                   "Tenth",
                                   vec![Modifier::new("m1", "A", ModifierKind::Multiplicative, 0.1),
                                        Modifier::new("m2", "B", ModifierKind::Multiplicative, 0.1)])];
        let active: ActivationSet = ["b1".into()].into_iter().collect();
        let evaluation = evaluate(&chain, &buffs, &active);

        let a = evaluation.entry("A").unwrap();
        assert!((a.value - 5.5).abs() < 1e-9);
        assert_eq!(a.base_tree, Expr::paren(Expr::value(5.0)));
        assert_eq!(a.display_tree.to_string(), "(5) * 1.10");
        assert_eq!(evaluation.entry("B").unwrap().display_tree.to_string(), "(1 + 2) * 1.10");
    }

    #[test]
    fn every_duplicate_row_is_buffed() {
        let chain = rows(&[("X", "1"), ("Y", "X"), ("X", "Y + 1")]);
        let buffs = vec![Buff::new("b1",
                                   "Double",
                                   vec![Modifier::new("m1", "X", ModifierKind::Multiplicative, 1.0)])];
        let active: ActivationSet = ["b1".into()].into_iter().collect();
        let evaluation = evaluate(&chain, &buffs, &active);

        assert_eq!(evaluation.value("Y"), Some(2.0));
        assert_eq!(evaluation.value("X"), Some(6.0));
    }
}

use std::collections::HashSet;

use crate::{
    ast::{Expr, Origin},
    interpreter::evaluator::context::ComputedContext,
    util::num::format_number,
};

/// How buff nodes are marked in rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuffMarker {
    /// Buff nodes render like parsed ones.
    #[default]
    Plain,
    /// Buff nodes are wrapped in square brackets.
    Brackets,
}

/// The deepest chain of references expanded inside one another.
pub const MAX_EXPANSION_DEPTH: usize = 32;

/// Renders a display tree with its references expanded.
///
/// A reference renders as `Name{...}`, with the braces holding the display
/// tree of the referenced row. Each name is expanded at most once per call;
/// later references to it render as the bare name. This also stops entries
/// that reference each other, which happens when a later row reuses a name.
/// References nested deeper than [`MAX_EXPANSION_DEPTH`] render bare as
/// well.
///
/// # Examples
/// ```
/// use logic_chain::{
///     evaluate,
///     interpreter::render::{BuffMarker, render_expanded},
///     model::{ActivationSet, Row},
/// };
///
/// let rows = vec![Row::new("r1", "Base", "100"), Row::new("r2", "Total", "Base * 2 + Base")];
/// let evaluation = evaluate(&rows, &[], &ActivationSet::new());
/// let total = evaluation.entry("Total").unwrap();
///
/// assert_eq!(render_expanded(&total.display_tree, &evaluation.context, BuffMarker::Plain),
///            "Base{100} * 2 + Base");
/// ```
#[must_use]
pub fn render_expanded(expr: &Expr, context: &ComputedContext, marker: BuffMarker) -> String {
    let mut expanded = HashSet::new();
    render(expr, context, marker, &mut expanded, 0)
}

fn render<'a>(expr: &'a Expr,
              context: &'a ComputedContext,
              marker: BuffMarker,
              expanded: &mut HashSet<&'a str>,
              depth: usize)
              -> String {
    match expr {
        Expr::Value { value, origin } => mark(format_number(*value), *origin, marker),
        Expr::Operator { left,
                         op,
                         right,
                         origin, } => {
            let left = render(left, context, marker, expanded, depth);
            let right = render(right, context, marker, expanded, depth);
            let op = mark(op.to_string(), *origin, marker);
            format!("{left} {op} {right}")
        },
        Expr::Paren { inner } => format!("({})", render(inner, context, marker, expanded, depth)),
        Expr::Reference { name } => {
            let Some(entry) = context.get(name) else {
                return name.clone();
            };
            if depth >= MAX_EXPANSION_DEPTH || !expanded.insert(name.as_str()) {
                return name.clone();
            }
            let body = render(&entry.display_tree, context, marker, expanded, depth + 1);
            format!("{name}{{{body}}}")
        },
    }
}

fn mark(text: String, origin: Origin, marker: BuffMarker) -> String {
    match (origin, marker) {
        (Origin::Buff, BuffMarker::Brackets) => format!("[{text}]"),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        evaluate,
        model::{ActivationSet, Buff, Modifier, ModifierKind, Row},
    };

    #[test]
    fn buff_nodes_can_be_marked() {
        let rows = vec![Row::new("r1", "Base", "100"), Row::new("r2", "Total", "Base + 1")];
        let buffs = vec![Buff::new("b1",
                                   "Heroism",
                                   vec![Modifier::new("m1", "Base", ModifierKind::Multiplicative, 0.1)])];
        let active: ActivationSet = ["b1".into()].into_iter().collect();
        let evaluation = evaluate(&rows, &buffs, &active);
        let total = evaluation.entry("Total").unwrap();

        assert_eq!(render_expanded(&total.display_tree, &evaluation.context, BuffMarker::Brackets),
                   "Base{100 [*] [1.10]} + 1");
        assert_eq!(render_expanded(&total.display_tree, &evaluation.context, BuffMarker::Plain),
                   "Base{100 * 1.10} + 1");
    }

    #[test]
    fn mutually_referencing_entries_terminate() {
        let rows = vec![Row::new("r1", "A", "1"),
                        Row::new("r2", "B", "A"),
                        Row::new("r3", "A", "B + 1")];
        let evaluation = evaluate(&rows, &[], &ActivationSet::new());
        let a = evaluation.entry("A").unwrap();

        assert_eq!(evaluation.value("A"), Some(2.0));
        assert_eq!(render_expanded(&a.display_tree, &evaluation.context, BuffMarker::Plain),
                   "B{A{B + 1}} + 1");
    }

    #[test]
    fn shared_references_expand_once() {
        let mut rows = vec![Row::new("r0", "X0", "1")];
        for i in 1..=40 {
            rows.push(Row::new(format!("r{i}"), format!("X{i}"), format!("X{p} + X{p}", p = i - 1)));
        }
        let evaluation = evaluate(&rows, &[], &ActivationSet::new());
        let top = evaluation.entry("X40").unwrap();
        let text = render_expanded(&top.display_tree, &evaluation.context, BuffMarker::Plain);

        assert!(text.starts_with("X39{X38{"));
        assert!(text.ends_with("} + X39"));
        assert!(text.len() < 2_000, "rendered {} bytes", text.len());
        assert_eq!(text.matches('{').count(), MAX_EXPANSION_DEPTH);
    }

    #[test]
    fn small_diamond() {
        let rows = vec![Row::new("r1", "A", "1"),
                        Row::new("r2", "B", "A + A"),
                        Row::new("r3", "C", "B * A")];
        let evaluation = evaluate(&rows, &[], &ActivationSet::new());
        let c = evaluation.entry("C").unwrap();

        assert_eq!(render_expanded(&c.display_tree, &evaluation.context, BuffMarker::Plain),
                   "B{A{1} + A} * A");
    }

    #[test]
    fn long_reference_chains_stop_expanding() {
        let mut rows = vec![Row::new("r0", "R0", "1")];
        for i in 1..200 {
            rows.push(Row::new(format!("r{i}"), format!("R{i}"), format!("R{} + 1", i - 1)));
        }
        let evaluation = evaluate(&rows, &[], &ActivationSet::new());
        let last = evaluation.entry("R199").unwrap();
        let text = render_expanded(&last.display_tree, &evaluation.context, BuffMarker::Plain);

        assert_eq!(evaluation.value("R199"), Some(200.0));
        assert_eq!(text.matches('{').count(), MAX_EXPANSION_DEPTH);
        assert!(text.starts_with("R198{R197{"));
    }
}

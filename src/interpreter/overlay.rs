use std::collections::HashMap;

use crate::{
    ast::{BinaryOperator, Expr, Origin},
    model::{ActivationSet, Buff, ModifierKind},
};

/// The summed modifiers targeting one row name.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModifierTotals {
    /// Sum of all multiplicative values.
    pub multiplier: f64,
    /// Sum of all flat values.
    pub flat:       f64,
    /// Number of active modifiers that contributed.
    pub count:      usize,
}

impl ModifierTotals {
    /// Returns `true` if the totals change anything about the row, or at
    /// least one modifier targets it (even one that sums to zero).
    #[must_use]
    pub fn is_buffed(&self) -> bool {
        self.multiplier != 0.0 || self.flat != 0.0 || self.count > 0
    }

    /// Applies the totals to an unbuffed value: `value * (1 + multiplier) +
    /// flat`.
    #[must_use]
    pub fn apply_to(&self, value: f64) -> f64 {
        value * (1.0 + self.multiplier) + self.flat
    }
}

/// Active modifiers aggregated per target name.
///
/// Built once per evaluation pass by scanning every modifier of every active
/// buff.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    totals: HashMap<String, ModifierTotals>,
}

impl Aggregation {
    /// Sums the modifiers of the buffs in `active`.
    ///
    /// Buffs that are not active are ignored, as are ids in `active` that
    /// name no buff.
    #[must_use]
    pub fn collect(buffs: &[Buff], active: &ActivationSet) -> Self {
        let mut totals: HashMap<String, ModifierTotals> = HashMap::new();

        for modifier in buffs.iter()
                             .filter(|buff| active.contains(&buff.id))
                             .flat_map(|buff| &buff.mods)
        {
            let entry = totals.entry(modifier.target_var.clone()).or_default();
            match modifier.kind {
                ModifierKind::Multiplicative => entry.multiplier += modifier.value,
                ModifierKind::Flat => entry.flat += modifier.value,
            }
            entry.count += 1;
        }

        Self { totals }
    }

    /// Returns the totals targeting `name`, if any active modifier does.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModifierTotals> {
        self.totals.get(name)
    }

    /// Returns `true` if no active modifier exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// The outcome of overlaying modifiers onto one evaluated row.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// The value after modifiers.
    pub value:        f64,
    /// The tree to display.
    pub display_tree: Expr,
    /// Whether any active modifier targets the row.
    pub is_buffed:    bool,
}

/// Overlays aggregated modifiers onto an evaluated row.
///
/// Without totals the value and tree come back unchanged. Otherwise the value
/// becomes `value * (1 + multiplier) + flat` and the display tree is rebuilt
/// in two independent steps, multiplier first:
///
/// 1. A non-zero multiplier turns the tree into `tree * (1 + multiplier)`. An
///    operator root is parenthesized first so the product groups correctly.
/// 2. A non-zero flat total appends `+ |flat|` or `- |flat|` by its sign.
///
/// Every node these steps create has [`Origin::Buff`]; the original tree is
/// embedded as-is.
///
/// # Examples
/// ```
/// use logic_chain::{
///     ast::Expr,
///     interpreter::overlay::{ModifierTotals, overlay},
/// };
///
/// let totals = ModifierTotals { multiplier: 0.5,
///                               flat:       -10.0,
///                               count:      2, };
/// let result = overlay(Some(&totals), 100.0, &Expr::value(100.0));
///
/// assert_eq!(result.value, 140.0);
/// assert_eq!(result.display_tree.to_string(), "100 * 1.50 - 10");
/// assert!(result.is_buffed);
/// ```
#[must_use]
pub fn overlay(totals: Option<&ModifierTotals>, value: f64, tree: &Expr) -> Overlay {
    let Some(totals) = totals else {
        return Overlay { value,
                         display_tree: tree.clone(),
                         is_buffed: false };
    };

    let mut display_tree = tree.clone();

    if totals.multiplier != 0.0 {
        let scaled = if display_tree.is_operator() {
            Expr::paren(display_tree)
        } else {
            display_tree
        };
        display_tree = buff_operator(scaled, BinaryOperator::Mul, 1.0 + totals.multiplier);
    }

    if totals.flat != 0.0 {
        let op = if totals.flat > 0.0 {
            BinaryOperator::Add
        } else {
            BinaryOperator::Sub
        };
        display_tree = buff_operator(display_tree, op, totals.flat.abs());
    }

    Overlay { value: totals.apply_to(value),
              display_tree,
              is_buffed: totals.is_buffed() }
}

/// Builds `left <op> amount` where both the operator and the amount come from
/// a buff.
fn buff_operator(left: Expr, op: BinaryOperator, amount: f64) -> Expr {
    Expr::Operator { left: Box::new(left),
                     op,
                     right: Box::new(Expr::Value { value:  amount,
                                                   origin: Origin::Buff, }),
                     origin: Origin::Buff }
}

//! # logic-chain
//!
//! logic-chain evaluates an ordered chain of named formulas. Every row may
//! reference the rows defined above it, and a set of active buffs layers
//! additive and multiplicative modifiers on top of chosen rows. Each pass
//! yields the buffed values, the parsed trees, and display trees that show
//! where the buffs changed the computation.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

/// Defines the structure of parsed formulas.
///
/// This module declares the `Expr` enum, the tree produced by the parser and
/// rewritten by the buff overlay. Nodes carry an [`ast::Origin`] so a
/// renderer can tell parsed nodes from nodes a buff introduced.
pub mod ast;
/// The JSON state document.
///
/// Rows, buffs, scenarios and the current selection, loaded from and saved
/// to the `logic-chain.json` format.
pub mod document;
/// Provides unified error types for parsing, row evaluation and documents.
///
/// # Responsibilities
/// - Defines the parse errors raised while reading a single formula.
/// - Defines the row-scoped errors recorded by an evaluation pass.
/// - Defines the errors raised while reading or writing state documents.
pub mod error;
/// Orchestrates the evaluation of a formula chain.
///
/// This module ties together lexing, parsing, evaluation and the buff overlay
/// to produce one computed context per pass.
///
/// # Responsibilities
/// - Tokenizes and parses each row against the names defined above it.
/// - Folds parsed trees into numbers.
/// - Aggregates active modifiers and rewrites display trees.
pub mod interpreter;
/// Rows, buffs and modifiers: the inputs of an evaluation pass.
pub mod model;
/// Scenario comparison and what-if previews.
///
/// Both run one independent evaluation pass per activation set and report the
/// target row's value against a reference value.
pub mod scenario;
/// General utilities for number formatting and lenient parsing.
pub mod util;

pub use interpreter::evaluator::chain::{Evaluation, evaluate};

/// Loads a state document and evaluates it with the buffs it marks active.
///
/// This is a convenience around [`document::Document::from_json`] and
/// [`evaluate`], mostly useful for scripts and tests.
///
/// # Examples
/// ```
/// use logic_chain::evaluate_document;
///
/// let source = r#"{
///     "version": 1,
///     "rows": [
///         { "id": "r1", "name": "Base", "expression": "100" },
///         { "id": "r2", "name": "Total", "expression": "Base * 2" }
///     ],
///     "buffs": []
/// }"#;
/// let evaluation = evaluate_document(source).unwrap();
/// assert_eq!(evaluation.value("Total"), Some(200.0));
///
/// // A document without rows is rejected.
/// assert!(evaluate_document(r#"{ "buffs": [] }"#).is_err());
/// ```
pub fn evaluate_document(source: &str) -> Result<Evaluation, error::DocumentError> {
    let document = document::Document::from_json(source)?;
    Ok(evaluate(&document.rows, &document.buffs, &document.active_buff_ids))
}

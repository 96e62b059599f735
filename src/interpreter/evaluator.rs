/// Core evaluation logic.
///
/// Folds a formula tree into a number against the computed context.
pub mod core;

/// The computed context of one evaluation pass.
///
/// Maps row names to their computed entries, in the order rows were
/// evaluated.
pub mod context;

/// Evaluation of a whole row chain.
///
/// Runs every row in order against one activation set, applying the buff
/// overlay and collecting per-row errors.
pub mod chain;

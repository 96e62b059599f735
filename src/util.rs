/// Number formatting and lenient numeric parsing.
///
/// Formulas and modifiers are plain `f64` values inside the engine. This
/// module holds the two places where numbers cross a text boundary: rendering
/// them for display, and reading loosely typed modifier input.
pub mod num;

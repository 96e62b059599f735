/// Formats a number for display with at most two decimals.
///
/// The value is rounded to two decimals and a trailing `.00` is dropped, so
/// whole numbers print without a fractional part. Non-finite values print as
/// Rust formats them (`inf`, `-inf`, `NaN`).
///
/// ## Example
/// ```
/// use logic_chain::util::num::format_number;
///
/// assert_eq!(format_number(300.0), "300");
/// assert_eq!(format_number(1.1), "1.10");
/// assert_eq!(format_number(2.0 / 3.0), "0.67");
/// assert_eq!(format_number(f64::INFINITY), "inf");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{value:.2}");
    match fixed.strip_suffix(".00") {
        Some(whole) => whole.to_string(),
        None => fixed,
    }
}

/// Parses modifier input, defaulting to zero.
///
/// Surrounding whitespace is ignored. Anything that does not parse as a
/// number, and `NaN`, becomes `0.0`.
///
/// ## Example
/// ```
/// use logic_chain::util::num::parse_or_zero;
///
/// assert_eq!(parse_or_zero(" 0.25 "), 0.25);
/// assert_eq!(parse_or_zero("-3"), -3.0);
/// assert_eq!(parse_or_zero("ten"), 0.0);
/// assert_eq!(parse_or_zero(""), 0.0);
/// ```
#[must_use]
pub fn parse_or_zero(text: &str) -> f64 {
    finite_or_zero(text.trim().parse().unwrap_or(0.0))
}

/// Replaces `NaN` with `0.0` and leaves every other value untouched.
#[must_use]
pub const fn finite_or_zero(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}

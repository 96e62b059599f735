use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Deserializer, Serialize};

use crate::util::num::{finite_or_zero, parse_or_zero};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_type!(
    /// Opaque identity of a row.
    RowId
);
id_type!(
    /// Opaque identity of a buff.
    BuffId
);
id_type!(
    /// Opaque identity of a modifier.
    ModifierId
);
id_type!(
    /// Opaque identity of a scenario.
    ScenarioId
);

/// The buffs considered active for one evaluation pass.
pub type ActivationSet = BTreeSet<BuffId>;

/// A named formula in the chain.
///
/// Names may be empty or repeated; the evaluator reports the former and lets
/// later rows shadow earlier ones for the latter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Identity of the row.
    pub id:         RowId,
    /// Name other rows use to reference this one.
    pub name:       String,
    /// The raw formula.
    pub expression: String,
}

impl Row {
    /// Creates a row.
    pub fn new(id: impl Into<RowId>, name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self { id:         id.into(),
               name:       name.into(),
               expression: expression.into(), }
    }
}

/// How a modifier changes its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModifierKind {
    /// Adds `value` to the multiplier: the target is scaled by `1 + sum`.
    #[serde(rename = "mult")]
    Multiplicative,
    /// Adds `value` to the target after scaling.
    #[default]
    #[serde(rename = "flat")]
    Flat,
}

/// A single adjustment of one named row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    /// Identity of the modifier.
    pub id:         ModifierId,
    /// Name of the row this modifier adjusts. Empty targets no row.
    #[serde(default)]
    pub target_var: String,
    /// Whether the value scales or offsets the target.
    ///
    /// Only `"mult"` reads as multiplicative; any other or missing `type`
    /// reads as flat.
    #[serde(rename = "type", default, deserialize_with = "deserialize_lenient_kind")]
    pub kind:       ModifierKind,
    /// Magnitude of the adjustment.
    ///
    /// Input documents may carry this as a number or as text; anything that
    /// is not a number, or is missing, reads as `0`.
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub value:      f64,
}

impl Modifier {
    /// Creates a modifier.
    pub fn new(id: impl Into<ModifierId>,
               target_var: impl Into<String>,
               kind: ModifierKind,
               value: f64)
               -> Self {
        Self { id: id.into(),
               target_var: target_var.into(),
               kind,
               value: finite_or_zero(value) }
    }
}

/// A named collection of modifiers, toggled as a unit.
///
/// The order of `mods` only matters for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    /// Identity of the buff.
    pub id:   BuffId,
    /// Display name.
    pub name: String,
    /// The modifiers this buff applies.
    #[serde(default)]
    pub mods: Vec<Modifier>,
}

impl Buff {
    /// Creates a buff.
    pub fn new(id: impl Into<BuffId>, name: impl Into<String>, mods: Vec<Modifier>) -> Self {
        Self { id: id.into(),
               name: name.into(),
               mods }
    }
}

/// Reads a number that may have been stored as text.
fn deserialize_lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where D: Deserializer<'de>
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Number(number) => finite_or_zero(number.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(text) => parse_or_zero(&text),
        _ => 0.0,
    })
}

/// Reads a modifier type, treating everything but `"mult"` as flat.
fn deserialize_lenient_kind<'de, D>(deserializer: D) -> Result<ModifierKind, D::Error>
    where D: Deserializer<'de>
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw.as_str() {
        Some("mult") => ModifierKind::Multiplicative,
        _ => ModifierKind::Flat,
    })
}

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::DocumentError,
    model::{ActivationSet, Buff, Row, RowId, ScenarioId},
    scenario::{Scenario, ScenarioSet},
};

/// The format version this crate reads and writes.
pub const DOCUMENT_VERSION: u32 = 1;

const fn default_version() -> u32 {
    DOCUMENT_VERSION
}

/// The complete editable state: rows, buffs and scenario selections.
///
/// Serialized as camelCase JSON. Every field of rows, buffs and modifiers is
/// kept as-is, except that modifier values that were stored as text are read
/// as numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Format version.
    #[serde(default = "default_version")]
    pub version:              u32,
    /// The chain, in evaluation order.
    pub rows:                 Vec<Row>,
    /// All buffs, in display order.
    pub buffs:                Vec<Buff>,
    /// The buffs active in the live result.
    #[serde(default)]
    pub active_buff_ids:      ActivationSet,
    /// The row whose tree is being inspected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_target_id:     Option<RowId>,
    /// Saved scenarios.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenarios:            Vec<Scenario>,
    /// The scenario comparisons are made against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_scenario_id: Option<ScenarioId>,
}

impl Document {
    /// Creates a document with no scenarios and no active buffs.
    #[must_use]
    pub fn new(rows: Vec<Row>, buffs: Vec<Buff>) -> Self {
        Self { version: DOCUMENT_VERSION,
               rows,
               buffs,
               active_buff_ids: ActivationSet::new(),
               active_target_id: None,
               scenarios: Vec::new(),
               baseline_scenario_id: None }
    }

    /// Parses a document from JSON.
    ///
    /// # Errors
    /// - `Json` if the text is not JSON, or `rows` or `buffs` is missing or
    ///   not an array.
    /// - `UnsupportedVersion` if `version` is not [`DOCUMENT_VERSION`].
    pub fn from_json(source: &str) -> Result<Self, DocumentError> {
        let document: Self = serde_json::from_str(source)?;
        if document.version != DOCUMENT_VERSION {
            return Err(DocumentError::UnsupportedVersion { found:    document.version,
                                                           expected: DOCUMENT_VERSION, });
        }
        tracing::debug!(rows = document.rows.len(), buffs = document.buffs.len(), "document parsed");
        Ok(document)
    }

    /// Serializes the document as JSON indented by two spaces.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a document from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| DocumentError::Io { path: path.to_path_buf(),
                                                                                    source })?;
        Self::from_json(&source)
    }

    /// Writes the document to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| DocumentError::Io { path: path.to_path_buf(),
                                                                   source })
    }

    /// Returns the row being inspected.
    ///
    /// Falls back to the last row when `activeTargetId` is missing or names no
    /// row. Returns `None` only for a document without rows.
    #[must_use]
    pub fn active_target(&self) -> Option<&Row> {
        self.active_target_id
            .as_ref()
            .and_then(|id| self.rows.iter().find(|row| &row.id == id))
            .or_else(|| self.rows.last())
    }

    /// Builds the scenario set described by the document.
    ///
    /// The active scenario is the saved one whose buffs match
    /// `activeBuffIds`. A document without saved scenarios gets an empty
    /// baseline and a current scenario holding `activeBuffIds`.
    #[must_use]
    pub fn scenario_set(&self) -> ScenarioSet {
        let active = self.scenarios
                         .iter()
                         .find(|scenario| scenario.active_buff_ids == self.active_buff_ids)
                         .map(|scenario| scenario.id.clone());

        ScenarioSet::new(self.scenarios.clone(), active, self.baseline_scenario_id.clone())
            .unwrap_or_else(|| ScenarioSet::baseline_and_current(self.active_buff_ids.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{BuffId, ModifierKind},
        scenario::BASELINE_SCENARIO_ID,
    };

    const SAMPLE: &str = r#"{
        "version": 1,
        "rows": [
            { "id": "r1", "name": "Base", "expression": "100" },
            { "id": "r2", "name": "Bonus", "expression": "50" },
            { "id": "r3", "name": "Total", "expression": "(Base + Bonus) * 2" }
        ],
        "buffs": [
            {
                "id": "b1",
                "name": "Heroism",
                "mods": [ { "id": "m1", "targetVar": "Base", "type": "mult", "value": 0.1 } ]
            }
        ],
        "activeBuffIds": ["b1"],
        "activeTargetId": "r3"
    }"#;

    #[test]
    fn parses_the_exported_format() {
        let document = Document::from_json(SAMPLE).unwrap();

        assert_eq!(document.rows.len(), 3);
        assert_eq!(document.buffs[0].mods[0].kind, ModifierKind::Multiplicative);
        assert!(document.active_buff_ids.contains(&BuffId::from("b1")));
        assert_eq!(document.active_target().map(|row| row.name.as_str()), Some("Total"));
    }

    #[test]
    fn round_trips_through_json() {
        let document = Document::from_json(SAMPLE).unwrap();
        let again = Document::from_json(&document.to_json().unwrap()).unwrap();
        assert_eq!(document, again);
    }

    #[test]
    fn output_is_indented_by_two_spaces() {
        let json = Document::from_json(SAMPLE).unwrap().to_json().unwrap();
        assert!(json.contains("\n  \"rows\": ["));
    }

    #[test]
    fn rows_and_buffs_are_required() {
        assert!(matches!(Document::from_json(r#"{ "buffs": [] }"#), Err(DocumentError::Json(_))));
        assert!(matches!(Document::from_json(r#"{ "rows": [] }"#), Err(DocumentError::Json(_))));
        assert!(matches!(Document::from_json(r#"{ "rows": {}, "buffs": [] }"#),
                         Err(DocumentError::Json(_))));
    }

    #[test]
    fn loose_modifiers_are_imported() {
        let source = r#"{
            "rows": [ { "id": "r1", "name": "Base", "expression": "10" } ],
            "buffs": [
                {
                    "id": "b1",
                    "name": "Odd",
                    "mods": [
                        { "id": "m1", "targetVar": "Base", "type": "Flat", "value": 5 },
                        { "id": "m2", "targetVar": "Base", "value": "2" },
                        { "id": "m3", "type": "mult", "value": 1 }
                    ]
                }
            ],
            "activeBuffIds": ["b1"]
        }"#;
        let document = Document::from_json(source).unwrap();
        let mods = &document.buffs[0].mods;

        assert_eq!(mods[0].kind, ModifierKind::Flat);
        assert_eq!(mods[1].kind, ModifierKind::Flat);
        assert_eq!(mods[2].target_var, "");

        let evaluation = crate::evaluate(&document.rows, &document.buffs, &document.active_buff_ids);
        assert_eq!(evaluation.value("Base"), Some(17.0));
    }

    #[test]
    fn rejects_other_versions() {
        let result = Document::from_json(r#"{ "version": 2, "rows": [], "buffs": [] }"#);
        assert!(matches!(result,
                         Err(DocumentError::UnsupportedVersion { found: 2, expected: 1 })));
    }

    #[test]
    fn dangling_target_falls_back_to_last_row() {
        let mut document = Document::from_json(SAMPLE).unwrap();
        document.active_target_id = Some("gone".into());
        assert_eq!(document.active_target().map(|row| row.id.0.as_str()), Some("r3"));

        document.rows.clear();
        assert!(document.active_target().is_none());
    }

    #[test]
    fn synthesized_scenarios() {
        let document = Document::from_json(SAMPLE).unwrap();
        let scenarios = document.scenario_set();

        assert_eq!(scenarios.scenarios().len(), 2);
        assert_eq!(scenarios.baseline().id, ScenarioId::from(BASELINE_SCENARIO_ID));
        assert_eq!(scenarios.active().active_buff_ids, document.active_buff_ids);
    }

    #[test]
    fn saves_and_loads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logic-chain.json");

        let document = Document::from_json(SAMPLE).unwrap();
        document.save(&path).unwrap();
        assert_eq!(Document::load(&path).unwrap(), document);

        let missing = Document::load(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(DocumentError::Io { .. })));
    }
}

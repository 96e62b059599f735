use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    interpreter::evaluator::chain::{Evaluation, evaluate},
    model::{ActivationSet, Buff, BuffId, Row, ScenarioId},
};

/// Id of the empty scenario of [`ScenarioSet::baseline_and_current`].
pub const BASELINE_SCENARIO_ID: &str = "baseline";
/// Id of the active scenario of [`ScenarioSet::baseline_and_current`].
pub const CURRENT_SCENARIO_ID: &str = "current";

/// A named activation set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Identity of the scenario.
    pub id:              ScenarioId,
    /// Display name.
    pub name:            String,
    /// The buffs active in this scenario.
    #[serde(default)]
    pub active_buff_ids: ActivationSet,
}

impl Scenario {
    /// Creates a scenario.
    pub fn new(id: impl Into<ScenarioId>, name: impl Into<String>, active_buff_ids: ActivationSet) -> Self {
        Self { id: id.into(),
               name: name.into(),
               active_buff_ids }
    }
}

/// The difference between a value and a reference value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    /// `value - reference`.
    pub absolute: f64,
    /// The change relative to `|reference|`, in percent.
    ///
    /// With a zero reference this is `100` or `-100` by the sign of the
    /// change, or `0` when nothing changed.
    pub percent:  f64,
}

impl Delta {
    /// Computes the change from `reference` to `value`.
    ///
    /// # Examples
    /// ```
    /// use logic_chain::scenario::Delta;
    ///
    /// let delta = Delta::between(200.0, 250.0);
    /// assert_eq!(delta.absolute, 50.0);
    /// assert_eq!(delta.percent, 25.0);
    ///
    /// assert_eq!(Delta::between(0.0, -3.0).percent, -100.0);
    /// assert_eq!(Delta::between(0.0, 0.0).percent, 0.0);
    /// ```
    #[must_use]
    pub fn between(reference: f64, value: f64) -> Self {
        let absolute = value - reference;
        let percent = if reference != 0.0 {
            absolute / reference.abs() * 100.0
        } else if absolute > 0.0 {
            100.0
        } else if absolute < 0.0 {
            -100.0
        } else {
            0.0
        };
        Self { absolute, percent }
    }
}

/// The value of the target row under one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    /// The scenario evaluated.
    pub scenario_id: ScenarioId,
    /// The scenario's name.
    pub name:        String,
    /// The target row's value, `0` if the target did not evaluate.
    pub value:       f64,
    /// The change against the baseline scenario.
    pub delta:       Delta,
    /// Whether this outcome is the baseline itself.
    pub is_baseline: bool,
}

/// The hypothetical value of the target row if one more buff were active.
#[derive(Debug, Clone, PartialEq)]
pub struct BuffPreview {
    /// The buff that would be activated.
    pub buff_id: BuffId,
    /// The target row's value with the buff active.
    pub value:   f64,
    /// The change against the current value.
    pub delta:   Delta,
}

/// Returns the value of `target` in an evaluation, `0` if it is absent.
#[must_use]
pub fn target_value(evaluation: &Evaluation, target: &str) -> f64 {
    evaluation.value(target).unwrap_or(0.0)
}

/// Compares the target row across scenarios.
///
/// Every scenario is evaluated in its own pass; the passes run in parallel.
/// Outcomes are returned in scenario order, each with its change against the
/// scenario named by `baseline`, or against the first scenario if no scenario
/// has that id.
///
/// # Examples
/// ```
/// use logic_chain::{
///     model::{ActivationSet, Buff, Modifier, ModifierKind, Row},
///     scenario::{Scenario, compare_scenarios},
/// };
///
/// let rows = vec![Row::new("r1", "Base", "100"), Row::new("r2", "Total", "Base * 2")];
/// let buffs = vec![Buff::new("b1",
///                            "Heroism",
///                            vec![Modifier::new("m1", "Base", ModifierKind::Flat, 50.0)])];
/// let scenarios = vec![Scenario::new("s1", "Baseline", ActivationSet::new()),
///                      Scenario::new("s2", "All Buffs", ["b1".into()].into_iter().collect())];
///
/// let outcomes = compare_scenarios(&rows, &buffs, &scenarios, &"s1".into(), "Total");
/// assert_eq!(outcomes[1].value, 300.0);
/// assert_eq!(outcomes[1].delta.absolute, 100.0);
/// assert_eq!(outcomes[1].delta.percent, 50.0);
/// ```
#[must_use]
pub fn compare_scenarios(rows: &[Row],
                         buffs: &[Buff],
                         scenarios: &[Scenario],
                         baseline: &ScenarioId,
                         target: &str)
                         -> Vec<ScenarioOutcome> {
    let values: Vec<f64> =
        scenarios.par_iter()
                 .map(|scenario| target_value(&evaluate(rows, buffs, &scenario.active_buff_ids), target))
                 .collect();

    let baseline_index = scenarios.iter()
                                  .position(|scenario| &scenario.id == baseline)
                                  .unwrap_or(0);
    let Some(&reference) = values.get(baseline_index) else {
        return Vec::new();
    };

    tracing::debug!(scenarios = scenarios.len(), row = target, reference, "scenarios compared");

    scenarios.iter()
             .zip(values)
             .enumerate()
             .map(|(index, (scenario, value))| ScenarioOutcome { scenario_id: scenario.id.clone(),
                                                                 name: scenario.name.clone(),
                                                                 value,
                                                                 delta: Delta::between(reference, value),
                                                                 is_baseline: index == baseline_index })
             .collect()
}

/// Previews the effect of activating each inactive buff.
///
/// For every buff not in `active`, the chain is evaluated with that buff added
/// and the target's value is compared to its value under `active` alone.
/// Previews follow buff order; buffs already active are skipped.
///
/// # Examples
/// ```
/// use logic_chain::{
///     model::{ActivationSet, Buff, Modifier, ModifierKind, Row},
///     scenario::preview_buffs,
/// };
///
/// let rows = vec![Row::new("r1", "Base", "0")];
/// let buffs = vec![Buff::new("b1",
///                            "Spark",
///                            vec![Modifier::new("m1", "Base", ModifierKind::Flat, 2.0)])];
///
/// let previews = preview_buffs(&rows, &buffs, &ActivationSet::new(), "Base");
/// assert_eq!(previews[0].value, 2.0);
/// assert_eq!(previews[0].delta.percent, 100.0);
/// ```
#[must_use]
pub fn preview_buffs(rows: &[Row], buffs: &[Buff], active: &ActivationSet, target: &str) -> Vec<BuffPreview> {
    let current = target_value(&evaluate(rows, buffs, active), target);

    buffs.par_iter()
         .filter(|buff| !active.contains(&buff.id))
         .map(|buff| {
             let mut hypothetical = active.clone();
             hypothetical.insert(buff.id.clone());
             let value = target_value(&evaluate(rows, buffs, &hypothetical), target);
             BuffPreview { buff_id: buff.id.clone(),
                           value,
                           delta: Delta::between(current, value) }
         })
         .collect()
}

/// An editable list of scenarios with an active and a baseline selection.
///
/// Always holds at least one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSet {
    scenarios: Vec<Scenario>,
    active:    ScenarioId,
    baseline:  ScenarioId,
}

impl ScenarioSet {
    /// Creates a set from a non-empty scenario list.
    ///
    /// Selections that name no scenario fall back to the first one. Returns
    /// `None` if `scenarios` is empty.
    #[must_use]
    pub fn new(scenarios: Vec<Scenario>, active: Option<ScenarioId>, baseline: Option<ScenarioId>) -> Option<Self> {
        let first = scenarios.first()?.id.clone();
        let pick = |wanted: Option<ScenarioId>| {
            wanted.filter(|id| scenarios.iter().any(|scenario| &scenario.id == id))
                  .unwrap_or_else(|| first.clone())
        };
        let active = pick(active);
        let baseline = pick(baseline);
        Some(Self { scenarios,
                    active,
                    baseline })
    }

    /// Creates the default pair of scenarios: an empty baseline and a current
    /// scenario holding `active`, which is selected.
    #[must_use]
    pub fn baseline_and_current(active: ActivationSet) -> Self {
        Self { scenarios: vec![Scenario::new(BASELINE_SCENARIO_ID, "Baseline", ActivationSet::new()),
                               Scenario::new(CURRENT_SCENARIO_ID, "Current", active)],
               active:    CURRENT_SCENARIO_ID.into(),
               baseline:  BASELINE_SCENARIO_ID.into(), }
    }

    /// The scenarios, in display order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Returns the scenario with the given id.
    #[must_use]
    pub fn get(&self, id: &ScenarioId) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| &scenario.id == id)
    }

    /// The scenario whose buffs drive the live result.
    #[must_use]
    pub fn active(&self) -> &Scenario {
        self.get(&self.active).unwrap_or(&self.scenarios[0])
    }

    /// The scenario other scenarios are compared against.
    #[must_use]
    pub fn baseline(&self) -> &Scenario {
        self.get(&self.baseline).unwrap_or(&self.scenarios[0])
    }

    /// Selects the active scenario. Returns `false` if no scenario has `id`.
    pub fn set_active(&mut self, id: &ScenarioId) -> bool {
        let found = self.get(id).is_some();
        if found {
            self.active = id.clone();
        }
        found
    }

    /// Selects the baseline scenario. Returns `false` if no scenario has `id`.
    pub fn set_baseline(&mut self, id: &ScenarioId) -> bool {
        let found = self.get(id).is_some();
        if found {
            self.baseline = id.clone();
        }
        found
    }

    /// Adds a scenario at the end.
    pub fn push(&mut self, scenario: Scenario) {
        self.scenarios.push(scenario);
    }

    /// Toggles a buff in one scenario.
    ///
    /// Returns whether the buff is active afterwards, or `None` if no
    /// scenario has `id`.
    pub fn toggle_buff(&mut self, id: &ScenarioId, buff: &BuffId) -> Option<bool> {
        let scenario = self.scenarios.iter_mut().find(|scenario| &scenario.id == id)?;
        if scenario.active_buff_ids.remove(buff) {
            Some(false)
        } else {
            scenario.active_buff_ids.insert(buff.clone());
            Some(true)
        }
    }

    /// Copies a scenario under a new id, naming it `"<name> (Copy)"`.
    pub fn duplicate(&mut self, id: &ScenarioId, new_id: ScenarioId) -> Option<&Scenario> {
        let source = self.get(id)?;
        let copy = Scenario { id:              new_id,
                              name:            format!("{} (Copy)", source.name),
                              active_buff_ids: source.active_buff_ids.clone(), };
        self.scenarios.push(copy);
        self.scenarios.last()
    }

    /// Removes a scenario.
    ///
    /// The last remaining scenario cannot be removed. If the removed scenario
    /// was active or the baseline, the selection moves to the first scenario.
    pub fn remove(&mut self, id: &ScenarioId) -> Option<Scenario> {
        if self.scenarios.len() <= 1 {
            return None;
        }
        let index = self.scenarios.iter().position(|scenario| &scenario.id == id)?;
        let removed = self.scenarios.remove(index);

        let first = self.scenarios[0].id.clone();
        if self.active == removed.id {
            self.active = first.clone();
        }
        if self.baseline == removed.id {
            self.baseline = first;
        }
        Some(removed)
    }

    /// Drops a deleted buff from every scenario.
    pub fn forget_buff(&mut self, buff: &BuffId) {
        for scenario in &mut self.scenarios {
            scenario.active_buff_ids.remove(buff);
        }
    }

    /// Compares every scenario against the baseline.
    #[must_use]
    pub fn compare(&self, rows: &[Row], buffs: &[Buff], target: &str) -> Vec<ScenarioOutcome> {
        compare_scenarios(rows, buffs, &self.scenarios, &self.baseline, target)
    }

    /// Consumes the set, returning the scenarios and the active and baseline
    /// ids.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Scenario>, ScenarioId, ScenarioId) {
        (self.scenarios, self.active, self.baseline)
    }
}

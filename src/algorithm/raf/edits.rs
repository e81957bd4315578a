//! Age and sex edits
//!
//! Runs after mapping and before hierarchies. Each `(CC, diagnosis)` pair
//! present on entry is checked against the single edit rule registered for
//! the diagnosis under the model; pairs created by an override are not
//! re-checked.

use log::debug;

use crate::models::{CcMap, Demographics, ModelName, Sex};
use crate::reference::{EditAction, EditRule, EditType, ReferenceTables};

/// Whether a rule fires for a member of the given age and sex
///
/// Age rules fire at or below `age_max` or at or above `age_min`.
#[must_use]
pub fn rule_applies(rule: &EditRule, age: f64, sex: Sex) -> bool {
    match rule.edit_type {
        EditType::Sex => rule.sex == Some(sex),
        EditType::Age => {
            rule.age_max.is_some_and(|max| age <= max)
                || rule.age_min.is_some_and(|min| age >= min)
        }
    }
}

/// Apply age/sex edits to a CC map
pub fn apply_edits(
    mut cc_map: CcMap,
    demographics: &Demographics,
    model: ModelName,
    tables: &ReferenceTables,
) -> CcMap {
    let mut removed = 0usize;
    let mut moved = 0usize;

    for (cc, dx) in cc_map.pairs() {
        let Some(rule) = tables.edit_rule(&dx, model) else {
            continue;
        };
        if !rule_applies(rule, demographics.age, demographics.sex) {
            continue;
        }

        match (rule.action, rule.cc_override.as_deref()) {
            (EditAction::Invalid, _) => {
                cc_map.remove_diagnosis(&cc, &dx);
                removed += 1;
            }
            (EditAction::Override, Some(target)) => {
                cc_map.remove_diagnosis(&cc, &dx);
                cc_map.insert(target, &dx);
                moved += 1;
            }
            (EditAction::Override, None) => {
                debug!("Override edit for {dx} has no target CC; left unchanged");
            }
        }
    }

    if removed + moved > 0 {
        debug!("Edits under {model}: {removed} diagnoses removed, {moved} moved");
    }
    cc_map
}

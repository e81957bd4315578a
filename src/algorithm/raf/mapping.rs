//! Diagnosis to condition-category mapping

use log::debug;

use crate::models::{CcMap, ModelName};
use crate::reference::ReferenceTables;

/// Normalize an ICD-10 code for lookup: trimmed, no decimal point, upper case
#[must_use]
pub fn normalize_diagnosis_code(code: &str) -> String {
    code.trim().replace('.', "").to_uppercase()
}

/// Map diagnosis codes to the CCs they produce under `model`
///
/// Codes without a mapping carry no risk weight and are dropped. A code that
/// maps to several CCs is recorded under each of them.
pub fn map_diagnoses<S: AsRef<str>>(
    diagnosis_codes: &[S],
    model: ModelName,
    tables: &ReferenceTables,
) -> CcMap {
    let mut cc_map = CcMap::new();
    let mut unmapped = 0usize;

    for raw in diagnosis_codes {
        let dx = normalize_diagnosis_code(raw.as_ref());
        if dx.is_empty() {
            continue;
        }
        let ccs = tables.ccs_for_diagnosis(&dx, model);
        if ccs.is_empty() {
            unmapped += 1;
            continue;
        }
        for cc in ccs {
            cc_map.insert(cc, &dx);
        }
    }

    debug!(
        "Mapped {} diagnoses to {} CCs under {model} ({unmapped} without a CC)",
        diagnosis_codes.len(),
        cc_map.len()
    );
    cc_map
}

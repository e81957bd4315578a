//! Hierarchy suppression
//!
//! Every CC present after edits suppresses the children the hierarchy table
//! lists for it, whether or not that CC is itself suppressed. Published
//! hierarchies list all dominated CCs for each parent, so the set computed
//! this way is already a fixed point: no survivor has a surviving child.

use log::debug;
use rustc_hash::FxHashSet;

use crate::models::{CcMap, ModelName};
use crate::reference::ReferenceTables;

/// CCs in `cc_map` dominated by another CC in `cc_map`
#[must_use]
pub fn suppressed_ccs(cc_map: &CcMap, model: ModelName, tables: &ReferenceTables) -> FxHashSet<String> {
    cc_map
        .codes()
        .flat_map(|parent| {
            tables
                .hierarchy_children(parent, model)
                .iter()
                .filter(move |child| child.as_str() != parent)
        })
        .filter(|child| cc_map.contains(child))
        .cloned()
        .collect()
}

/// Remove dominated CCs and their diagnoses
pub fn apply_hierarchies(mut cc_map: CcMap, model: ModelName, tables: &ReferenceTables) -> CcMap {
    let suppressed = suppressed_ccs(&cc_map, model, tables);
    for cc in &suppressed {
        cc_map.remove_cc(cc);
    }
    if !suppressed.is_empty() {
        debug!(
            "Hierarchies under {model} suppressed {} CCs, {} remain",
            suppressed.len(),
            cc_map.len()
        );
    }
    cc_map
}

//! Read-only reference tables
//!
//! All tables are keyed by `(code, ModelName)`. They are assembled once via
//! [`ReferenceTablesBuilder`] (directly or through [`loader`]) and then shared
//! immutably, typically behind an `Arc`, by every calculation.

pub mod loader;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::models::{ModelName, Sex};

/// Kind of condition an edit rule checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditType {
    Sex,
    Age,
}

/// What happens to a diagnosis when its edit rule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditAction {
    /// Drop the diagnosis from its CC
    Invalid,
    /// Move the diagnosis to `cc_override`
    Override,
}

/// A published age/sex edit for one diagnosis under one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRule {
    pub edit_type: EditType,
    /// Sex the rule fires for (sex edits)
    pub sex: Option<Sex>,
    /// Fires when age >= `age_min` (age edits, checked after `age_max`)
    pub age_min: Option<f64>,
    /// Fires when age <= `age_max` (age edits)
    pub age_max: Option<f64>,
    pub action: EditAction,
    /// Target CC for override edits
    pub cc_override: Option<String>,
}

impl EditRule {
    /// Sex edit that invalidates the diagnosis for the given sex
    #[must_use]
    pub const fn invalid_for_sex(sex: Sex) -> Self {
        Self {
            edit_type: EditType::Sex,
            sex: Some(sex),
            age_min: None,
            age_max: None,
            action: EditAction::Invalid,
            cc_override: None,
        }
    }

    /// Age edit that invalidates the diagnosis at or below `age_max`
    #[must_use]
    pub const fn invalid_at_or_below(age_max: f64) -> Self {
        Self {
            edit_type: EditType::Age,
            sex: None,
            age_min: None,
            age_max: Some(age_max),
            action: EditAction::Invalid,
            cc_override: None,
        }
    }

    /// Age edit that invalidates the diagnosis at or above `age_min`
    #[must_use]
    pub const fn invalid_at_or_above(age_min: f64) -> Self {
        Self {
            edit_type: EditType::Age,
            sex: None,
            age_min: Some(age_min),
            age_max: None,
            action: EditAction::Invalid,
            cc_override: None,
        }
    }

    /// Turn the rule into an override to `cc`
    #[must_use]
    pub fn overriding_to(mut self, cc: &str) -> Self {
        self.action = EditAction::Override;
        self.cc_override = Some(cc.to_string());
        self
    }
}

/// Tables for a single model
#[derive(Debug, Clone, Default)]
struct ModelTables {
    dx_to_cc: FxHashMap<String, SmallVec<[String; 2]>>,
    hierarchies: FxHashMap<String, SmallVec<[String; 4]>>,
    coefficients: FxHashMap<String, f64>,
    chronic: FxHashMap<String, bool>,
    edits: FxHashMap<String, EditRule>,
    labels: FxHashMap<String, String>,
}

/// Row counts per table, for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableSummary {
    pub models: usize,
    pub dx_mappings: usize,
    pub hierarchy_parents: usize,
    pub coefficients: usize,
    pub chronic_flags: usize,
    pub edits: usize,
    pub labels: usize,
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} models, {} dx mappings, {} hierarchy parents, {} coefficients, {} chronic flags, {} edits, {} labels",
            self.models,
            self.dx_mappings,
            self.hierarchy_parents,
            self.coefficients,
            self.chronic_flags,
            self.edits,
            self.labels
        )
    }
}

/// Immutable reference data for every loaded model
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    models: FxHashMap<ModelName, ModelTables>,
}

const NO_CODES: &[String] = &[];

impl ReferenceTables {
    /// Start assembling a new set of tables
    #[must_use]
    pub fn builder() -> ReferenceTablesBuilder {
        ReferenceTablesBuilder::default()
    }

    fn model(&self, model: ModelName) -> Option<&ModelTables> {
        self.models.get(&model)
    }

    /// CCs produced by a normalized diagnosis code
    #[must_use]
    pub fn ccs_for_diagnosis(&self, dx: &str, model: ModelName) -> &[String] {
        self.model(model)
            .and_then(|t| t.dx_to_cc.get(dx))
            .map_or(NO_CODES, |ccs| ccs.as_slice())
    }

    /// CCs dominated by `parent`
    #[must_use]
    pub fn hierarchy_children(&self, parent: &str, model: ModelName) -> &[String] {
        self.model(model)
            .and_then(|t| t.hierarchies.get(parent))
            .map_or(NO_CODES, |children| children.as_slice())
    }

    /// Coefficient for a lower-cased key
    #[must_use]
    pub fn coefficient(&self, key: &str, model: ModelName) -> Option<f64> {
        self.model(model)
            .and_then(|t| t.coefficients.get(key))
            .copied()
    }

    #[must_use]
    pub fn is_chronic(&self, cc: &str, model: ModelName) -> bool {
        self.model(model)
            .and_then(|t| t.chronic.get(cc))
            .copied()
            .unwrap_or(false)
    }

    /// Edit rule for a normalized diagnosis code
    #[must_use]
    pub fn edit_rule(&self, dx: &str, model: ModelName) -> Option<&EditRule> {
        self.model(model).and_then(|t| t.edits.get(dx))
    }

    #[must_use]
    pub fn label(&self, cc: &str, model: ModelName) -> Option<&str> {
        self.model(model)
            .and_then(|t| t.labels.get(cc))
            .map(String::as_str)
    }

    /// Whether any table carries data for `model`
    #[must_use]
    pub fn has_model(&self, model: ModelName) -> bool {
        self.models.contains_key(&model)
    }

    #[must_use]
    pub fn summary(&self) -> TableSummary {
        self.models.values().fold(
            TableSummary {
                models: self.models.len(),
                ..TableSummary::default()
            },
            |mut acc, t| {
                acc.dx_mappings += t.dx_to_cc.values().map(SmallVec::len).sum::<usize>();
                acc.hierarchy_parents += t.hierarchies.len();
                acc.coefficients += t.coefficients.len();
                acc.chronic_flags += t.chronic.len();
                acc.edits += t.edits.len();
                acc.labels += t.labels.len();
                acc
            },
        )
    }
}

/// Mutable assembly stage for [`ReferenceTables`]
///
/// Keys are normalized on insert: diagnosis codes lose their decimal point and
/// are upper-cased, coefficient keys are lower-cased.
#[derive(Debug, Default)]
pub struct ReferenceTablesBuilder {
    tables: ReferenceTables,
}

impl ReferenceTablesBuilder {
    fn model_mut(&mut self, model: ModelName) -> &mut ModelTables {
        self.tables.models.entry(model).or_default()
    }

    /// Map a diagnosis to a CC; repeated pairs are kept once
    pub fn add_dx_mapping(&mut self, dx: &str, cc: &str, model: ModelName) -> &mut Self {
        let dx = crate::algorithm::raf::mapping::normalize_diagnosis_code(dx);
        let cc = cc.trim().to_string();
        let ccs = self.model_mut(model).dx_to_cc.entry(dx).or_default();
        if !ccs.contains(&cc) {
            ccs.push(cc);
        }
        self
    }

    /// Declare that `parent` suppresses `child`
    pub fn add_hierarchy(&mut self, parent: &str, child: &str, model: ModelName) -> &mut Self {
        let child = child.trim().to_string();
        let children = self
            .model_mut(model)
            .hierarchies
            .entry(parent.trim().to_string())
            .or_default();
        if !children.contains(&child) {
            children.push(child);
        }
        self
    }

    /// Set a coefficient; a later value for the same key replaces the earlier
    pub fn add_coefficient(&mut self, key: &str, value: f64, model: ModelName) -> &mut Self {
        self.model_mut(model)
            .coefficients
            .insert(key.trim().to_lowercase(), value);
        self
    }

    /// Set the chronic flag for a CC; the first flag seen wins
    pub fn set_chronic(&mut self, cc: &str, is_chronic: bool, model: ModelName) -> &mut Self {
        self.model_mut(model)
            .chronic
            .entry(cc.trim().to_string())
            .or_insert(is_chronic);
        self
    }

    /// Register an edit rule
    ///
    /// Only one rule is kept per `(diagnosis, model)`; returns false when a
    /// rule was already present and this one was ignored.
    pub fn add_edit(&mut self, dx: &str, model: ModelName, rule: EditRule) -> bool {
        let dx = crate::algorithm::raf::mapping::normalize_diagnosis_code(dx);
        let edits = &mut self.model_mut(model).edits;
        if edits.contains_key(&dx) {
            return false;
        }
        edits.insert(dx, rule);
        true
    }

    pub fn add_label(&mut self, cc: &str, label: &str, model: ModelName) -> &mut Self {
        self.model_mut(model)
            .labels
            .insert(cc.trim().to_string(), label.trim().to_string());
        self
    }

    /// Freeze the tables
    #[must_use]
    pub fn build(self) -> ReferenceTables {
        self.tables
    }
}

//! Coefficient resolution and score aggregation
//!
//! Keys are formed as `prefix + key`, lower-cased, and looked up in the
//! model's coefficient table. When the prefixed key is absent the bare key is
//! tried, which covers the ESRD graft-duration and institutional coefficients
//! published without a prefix. A key found under neither form contributes
//! nothing.

use log::debug;
use rustc_hash::FxHashMap;

use crate::algorithm::raf::interactions::InteractionMap;
use crate::models::{CcMap, CoefficientPrefix, Demographics, ModelName, PaymentAdjustment};
use crate::reference::ReferenceTables;

/// Pick the coefficient prefix family for a member under `model`
///
/// A prefix override on the demographics always wins.
#[must_use]
pub fn resolve_prefix(demo: &Demographics, model: ModelName) -> CoefficientPrefix {
    if let Some(prefix) = demo.prefix_override {
        return prefix;
    }

    // Non-ESRD members under an ESRD model take the general families
    if model.is_esrd() && demo.esrd {
        return esrd_prefix(demo);
    }
    if model.is_rx() {
        return rx_prefix(demo);
    }

    if demo.lti {
        CoefficientPrefix::Institutional
    } else if demo.new_enrollee {
        if demo.snp {
            CoefficientPrefix::SnpNewEnrollee
        } else {
            CoefficientPrefix::NewEnrollee
        }
    } else {
        match (demo.fbd, demo.pbd, demo.non_aged) {
            (true, _, false) => CoefficientPrefix::CommunityFullDualAged,
            (true, _, true) => CoefficientPrefix::CommunityFullDualDisabled,
            (false, true, false) => CoefficientPrefix::CommunityPartialDualAged,
            (false, true, true) => CoefficientPrefix::CommunityPartialDualDisabled,
            (false, false, false) => CoefficientPrefix::CommunityNonDualAged,
            (false, false, true) => CoefficientPrefix::CommunityNonDualDisabled,
        }
    }
}

fn esrd_prefix(demo: &Demographics) -> CoefficientPrefix {
    if demo.graft_months.is_some() {
        if demo.lti {
            CoefficientPrefix::GraftInstitutional
        } else if demo.new_enrollee {
            CoefficientPrefix::GraftNewEnrollee
        } else {
            match (demo.fbd, demo.non_aged) {
                (true, false) => CoefficientPrefix::GraftFullDualAged,
                (true, true) => CoefficientPrefix::GraftFullDualNonAged,
                (false, false) => CoefficientPrefix::GraftNonDualAged,
                (false, true) => CoefficientPrefix::GraftNonDualNonAged,
            }
        }
    } else if demo.new_enrollee {
        CoefficientPrefix::DialysisNewEnrollee
    } else {
        CoefficientPrefix::Dialysis
    }
}

fn rx_prefix(demo: &Demographics) -> CoefficientPrefix {
    if demo.new_enrollee {
        if demo.lti {
            CoefficientPrefix::RxNewEnrolleeInstitutional
        } else if demo.low_income {
            CoefficientPrefix::RxNewEnrolleeLowIncome
        } else {
            CoefficientPrefix::RxNewEnrolleeNotLowIncome
        }
    } else if demo.lti {
        CoefficientPrefix::RxInstitutional
    } else {
        match (demo.low_income, demo.non_aged) {
            (true, false) => CoefficientPrefix::RxLowIncomeAged,
            (true, true) => CoefficientPrefix::RxLowIncomeNonAged,
            (false, false) => CoefficientPrefix::RxNotLowIncomeAged,
            (false, true) => CoefficientPrefix::RxNotLowIncomeNonAged,
        }
    }
}

/// Coefficient lookup for one member under one model and prefix
pub struct CoefficientResolver<'a> {
    tables: &'a ReferenceTables,
    model: ModelName,
    prefix: CoefficientPrefix,
}

impl<'a> CoefficientResolver<'a> {
    #[must_use]
    pub const fn new(tables: &'a ReferenceTables, model: ModelName, prefix: CoefficientPrefix) -> Self {
        Self {
            tables,
            model,
            prefix,
        }
    }

    /// Look up `key` with the prefix, then bare
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<f64> {
        let prefixed = format!("{}{}", self.prefix.as_str(), key).to_lowercase();
        self.tables
            .coefficient(&prefixed, self.model)
            .or_else(|| self.tables.coefficient(&key.to_lowercase(), self.model))
    }

    /// Coefficient key for a CC code
    #[must_use]
    pub fn cc_key(&self, cc: &str) -> String {
        format!("{}{cc}", self.model.cc_key_label())
    }

    /// Coefficients applicable to the member
    ///
    /// The result is keyed by the demographic category, by bare CC code and by
    /// interaction name. Missing keys are left out.
    #[must_use]
    pub fn apply(
        &self,
        demographics: &Demographics,
        cc_map: &CcMap,
        interactions: &InteractionMap,
    ) -> FxHashMap<String, f64> {
        let mut applied = FxHashMap::default();

        if let Some(value) = self.lookup(&demographics.category) {
            applied.insert(demographics.category.clone(), value);
        }
        for cc in cc_map.codes() {
            if let Some(value) = self.lookup(&self.cc_key(cc)) {
                applied.insert(cc.to_string(), value);
            }
        }
        for (name, &flag) in interactions {
            if flag == 0 {
                continue;
            }
            if let Some(value) = self.lookup(name) {
                applied.insert(name.clone(), value);
            }
        }

        debug!(
            "Resolved {} coefficients with prefix {} under {}",
            applied.len(),
            self.prefix,
            self.model
        );
        applied
    }
}

/// Score components for one member
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub demographics: f64,
    pub hcc: f64,
    pub chronic_only: f64,
    pub interactions: f64,
    pub risk: f64,
    pub payment: f64,
}

/// Sum applied coefficients into sub-scores and apply the payment adjustment
#[must_use]
pub fn aggregate_scores(
    demographics: &Demographics,
    cc_map: &CcMap,
    interactions: &InteractionMap,
    coefficients: &FxHashMap<String, f64>,
    is_chronic: impl Fn(&str) -> bool,
    payment: &PaymentAdjustment,
) -> ScoreBreakdown {
    let value = |key: &str| coefficients.get(key).copied().unwrap_or(0.0);

    let demographic_score = value(&demographics.category);
    let hcc_score: f64 = cc_map.codes().map(value).sum();
    let chronic_score: f64 = cc_map
        .codes()
        .filter(|cc| is_chronic(cc))
        .map(value)
        .sum();
    let interaction_score: f64 = interactions
        .iter()
        .filter(|(_, flag)| **flag != 0)
        .map(|(name, _)| value(name))
        .sum();

    let risk = demographic_score + hcc_score + interaction_score;
    ScoreBreakdown {
        demographics: demographic_score,
        hcc: hcc_score,
        chronic_only: chronic_score,
        interactions: interaction_score,
        risk,
        payment: payment.apply(risk),
    }
}

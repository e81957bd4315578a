//! RAF calculation output

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{RafError, Result};
use crate::models::demographics::Demographics;
use crate::models::model_name::ModelName;

/// Parameters converting a risk score into a payment score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentAdjustment {
    /// Coding-intensity adjustment factor
    #[serde(default)]
    pub maci: f64,
    /// Normalization divisor
    #[serde(default = "default_norm_factor")]
    pub norm_factor: f64,
    /// Additive frailty adjustment
    #[serde(default)]
    pub frailty_score: f64,
}

const fn default_norm_factor() -> f64 {
    1.0
}

impl Default for PaymentAdjustment {
    fn default() -> Self {
        Self {
            maci: 0.0,
            norm_factor: default_norm_factor(),
            frailty_score: 0.0,
        }
    }
}

impl PaymentAdjustment {
    #[must_use]
    pub const fn new(maci: f64, norm_factor: f64, frailty_score: f64) -> Self {
        Self {
            maci,
            norm_factor,
            frailty_score,
        }
    }

    /// Check that the parameters describe a usable adjustment
    pub fn validate(&self) -> Result<()> {
        if !self.maci.is_finite() {
            return Err(RafError::validation("maci", "must be a finite number"));
        }
        if !self.frailty_score.is_finite() {
            return Err(RafError::validation("frailty_score", "must be a finite number"));
        }
        if !self.norm_factor.is_finite() || self.norm_factor <= 0.0 {
            return Err(RafError::validation(
                "norm_factor",
                "must be a positive finite number",
            ));
        }
        Ok(())
    }

    /// `risk * (1 - maci) / norm_factor + frailty`
    #[must_use]
    pub fn apply(&self, risk_score: f64) -> f64 {
        risk_score * (1.0 - self.maci) / self.norm_factor + self.frailty_score
    }
}

/// Per-CC audit detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcDetail {
    pub cc: String,
    pub label: Option<String>,
    pub is_chronic: bool,
    /// Coefficient applied for this CC, if the table had one
    pub coefficient: Option<f64>,
}

/// Score breakdown for one member under one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RafResult {
    pub risk_score: f64,
    pub risk_score_demographics: f64,
    pub risk_score_hcc: f64,
    pub risk_score_chronic_only: f64,
    pub risk_score_interactions: f64,
    pub risk_score_payment: f64,
    pub model_name: ModelName,
    /// Coefficient prefix that was probed
    pub prefix: String,
    pub demographics: Demographics,
    /// Surviving CCs in sorted order
    pub cc_list: Vec<String>,
    pub cc_to_dx: BTreeMap<String, Vec<String>>,
    pub cc_details: Vec<CcDetail>,
    /// Coefficients applied, keyed by category, CC code or interaction name
    pub coefficients: FxHashMap<String, f64>,
    /// Interaction flags that fired
    pub interactions: FxHashMap<String, u8>,
    pub payment: PaymentAdjustment,
}

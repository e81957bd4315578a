//! Risk Adjustment Factor calculation
//!
//! The pipeline runs in a fixed order:
//! 1. demographics categorization
//! 2. diagnosis to CC mapping
//! 3. age/sex edits
//! 4. hierarchy suppression
//! 5. interaction derivation
//! 6. coefficient resolution, aggregation and payment adjustment
//!
//! The CC map is owned by a single calculation and passed by value between
//! stages. Reference tables are shared read-only through an `Arc`.

pub mod batch;
pub mod coefficients;
pub mod demographics;
pub mod edits;
pub mod hierarchy;
pub mod interactions;
pub mod mapping;

use log::debug;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::RafConfig;
use crate::error::Result;
use crate::models::{
    CcDetail, DemographicsInput, MemberRequest, ModelName, PaymentAdjustment, RafResult,
    ServiceRecord, collect_diagnosis_codes,
};
use crate::reference::ReferenceTables;

pub use coefficients::{CoefficientResolver, ScoreBreakdown, aggregate_scores, resolve_prefix};
pub use demographics::categorize_demographics;
pub use edits::apply_edits;
pub use hierarchy::apply_hierarchies;
pub use interactions::{InteractionMap, compute_interactions};
pub use mapping::{map_diagnoses, normalize_diagnosis_code};

/// Run the full pipeline for one member
///
/// # Arguments
/// * `diagnosis_codes` - ICD-10 codes, with or without decimal point
/// * `input` - Raw demographics
/// * `model` - Model governing every lookup
/// * `tables` - Reference tables
/// * `payment` - Payment adjustment parameters
///
/// # Returns
/// The full score breakdown, or a `Validation` error raised before any
/// scoring when demographics or payment parameters are malformed
pub fn calculate_raf<S: AsRef<str>>(
    diagnosis_codes: &[S],
    input: &DemographicsInput,
    model: ModelName,
    tables: &ReferenceTables,
    payment: &PaymentAdjustment,
) -> Result<RafResult> {
    payment.validate()?;
    let demographics = categorize_demographics(input)?;

    if !tables.has_model(model) {
        debug!("No reference data loaded for {model}; scores will be zero");
    }

    let cc_map = map_diagnoses(diagnosis_codes, model, tables);
    let cc_map = apply_edits(cc_map, &demographics, model, tables);
    let cc_map = apply_hierarchies(cc_map, model, tables);

    let interactions = compute_interactions(&demographics, &cc_map, model);

    let prefix = resolve_prefix(&demographics, model);
    let resolver = CoefficientResolver::new(tables, model, prefix);
    let coefficients = resolver.apply(&demographics, &cc_map, &interactions);

    let scores = aggregate_scores(
        &demographics,
        &cc_map,
        &interactions,
        &coefficients,
        |cc| tables.is_chronic(cc, model),
        payment,
    );

    let cc_details = cc_map
        .codes()
        .map(|cc| CcDetail {
            cc: cc.to_string(),
            label: tables.label(cc, model).map(str::to_string),
            is_chronic: tables.is_chronic(cc, model),
            coefficient: coefficients.get(cc).copied(),
        })
        .collect();
    let cc_to_dx: BTreeMap<String, Vec<String>> = cc_map
        .iter()
        .map(|(cc, dxs)| (cc.clone(), dxs.iter().cloned().collect()))
        .collect();

    debug!(
        "RAF for category {} under {model}: risk={:.4}, payment={:.4}",
        demographics.category, scores.risk, scores.payment
    );

    Ok(RafResult {
        risk_score: scores.risk,
        risk_score_demographics: scores.demographics,
        risk_score_hcc: scores.hcc,
        risk_score_chronic_only: scores.chronic_only,
        risk_score_interactions: scores.interactions,
        risk_score_payment: scores.payment,
        model_name: model,
        prefix: prefix.as_str().to_string(),
        demographics,
        cc_list: cc_map.codes().map(str::to_string).collect(),
        cc_to_dx,
        cc_details,
        coefficients,
        interactions,
        payment: *payment,
    })
}

/// Calculator holding shared reference tables and default settings
#[derive(Debug, Clone)]
pub struct RafCalculator {
    tables: Arc<ReferenceTables>,
    config: RafConfig,
}

impl RafCalculator {
    #[must_use]
    pub const fn new(tables: Arc<ReferenceTables>, config: RafConfig) -> Self {
        Self { tables, config }
    }

    /// Load the reference tables named by `config` and build a calculator
    pub fn from_config(config: RafConfig) -> Result<Self> {
        config.validate()?;
        let tables = ReferenceTables::load(&config)?;
        Ok(Self::new(Arc::new(tables), config))
    }

    #[must_use]
    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    #[must_use]
    pub const fn config(&self) -> &RafConfig {
        &self.config
    }

    /// Score with the configured model and payment adjustment
    pub fn calculate<S: AsRef<str>>(
        &self,
        diagnosis_codes: &[S],
        demographics: &DemographicsInput,
    ) -> Result<RafResult> {
        calculate_raf(
            diagnosis_codes,
            demographics,
            self.config.model_name,
            &self.tables,
            &self.config.payment,
        )
    }

    /// Score with an explicit model and payment adjustment
    pub fn calculate_with<S: AsRef<str>>(
        &self,
        diagnosis_codes: &[S],
        demographics: &DemographicsInput,
        model: ModelName,
        payment: &PaymentAdjustment,
    ) -> Result<RafResult> {
        calculate_raf(diagnosis_codes, demographics, model, &self.tables, payment)
    }

    /// Score from service records, flattening their diagnoses first
    pub fn calculate_from_services(
        &self,
        records: &[ServiceRecord],
        demographics: &DemographicsInput,
    ) -> Result<RafResult> {
        let codes = collect_diagnosis_codes(records);
        self.calculate(&codes, demographics)
    }

    /// Score a batch request, falling back to configured defaults
    pub fn calculate_request(&self, request: &MemberRequest) -> Result<RafResult> {
        let model = request.model_name.unwrap_or(self.config.model_name);
        let payment = request.payment.unwrap_or(self.config.payment);
        self.calculate_with(
            &request.all_diagnosis_codes(),
            &request.demographics,
            model,
            &payment,
        )
    }
}

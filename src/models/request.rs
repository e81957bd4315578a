//! Batch input record

use serde::{Deserialize, Serialize};

use crate::models::demographics::DemographicsInput;
use crate::models::model_name::ModelName;
use crate::models::result::PaymentAdjustment;
use crate::models::service::{ServiceRecord, collect_diagnosis_codes};

/// Everything needed to score one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRequest {
    #[serde(default)]
    pub member_id: Option<String>,
    pub demographics: DemographicsInput,
    #[serde(default)]
    pub diagnosis_codes: Vec<String>,
    /// Service lines whose diagnoses are merged with `diagnosis_codes`
    #[serde(default)]
    pub service_records: Vec<ServiceRecord>,
    /// Overrides the calculator's configured model
    #[serde(default)]
    pub model_name: Option<ModelName>,
    /// Overrides the calculator's configured payment adjustment
    #[serde(default)]
    pub payment: Option<PaymentAdjustment>,
}

impl MemberRequest {
    #[must_use]
    pub fn new(demographics: DemographicsInput, diagnosis_codes: Vec<String>) -> Self {
        Self {
            member_id: None,
            demographics,
            diagnosis_codes,
            service_records: Vec::new(),
            model_name: None,
            payment: None,
        }
    }

    #[must_use]
    pub fn with_member_id(mut self, member_id: &str) -> Self {
        self.member_id = Some(member_id.to_string());
        self
    }

    #[must_use]
    pub const fn with_model(mut self, model: ModelName) -> Self {
        self.model_name = Some(model);
        self
    }

    #[must_use]
    pub const fn with_payment(mut self, payment: PaymentAdjustment) -> Self {
        self.payment = Some(payment);
        self
    }

    #[must_use]
    pub fn with_service_records(mut self, records: Vec<ServiceRecord>) -> Self {
        self.service_records = records;
        self
    }

    /// Explicit diagnoses followed by those from service records
    #[must_use]
    pub fn all_diagnosis_codes(&self) -> Vec<String> {
        if self.service_records.is_empty() {
            return self.diagnosis_codes.clone();
        }
        let mut codes = self.diagnosis_codes.clone();
        codes.extend(collect_diagnosis_codes(&self.service_records));
        codes
    }
}

//! Normalized service records
//!
//! Claim extractors hand the calculator service lines that each carry their
//! own diagnosis list. The calculator only needs the flattened, de-duplicated
//! set of codes; claim provenance is kept for callers that want it.

use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::algorithm::raf::mapping::normalize_diagnosis_code;

/// One service line with its diagnoses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    #[serde(default)]
    pub claim_id: Option<String>,
    /// Diagnosis codes, with or without the decimal point
    #[serde(default)]
    pub diagnosis_codes: SmallVec<[String; 4]>,
    #[serde(default)]
    pub procedure_code: Option<String>,
    #[serde(default)]
    pub service_date: Option<NaiveDate>,
    /// Claim type as reported by the source (professional, inpatient, ...)
    #[serde(default)]
    pub claim_type: Option<String>,
}

impl ServiceRecord {
    /// Create a record carrying only diagnoses
    #[must_use]
    pub fn with_diagnoses<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            claim_id: None,
            diagnosis_codes: codes.into_iter().map(Into::into).collect(),
            procedure_code: None,
            service_date: None,
            claim_type: None,
        }
    }

    #[must_use]
    pub fn with_claim_id(mut self, claim_id: &str) -> Self {
        self.claim_id = Some(claim_id.to_string());
        self
    }

    #[must_use]
    pub const fn with_service_date(mut self, date: NaiveDate) -> Self {
        self.service_date = Some(date);
        self
    }
}

/// Flatten the diagnoses of all records, normalized and de-duplicated in
/// first-seen order
#[must_use]
pub fn collect_diagnosis_codes(records: &[ServiceRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.diagnosis_codes.iter())
        .map(|code| normalize_diagnosis_code(code))
        .filter(|code| !code.is_empty())
        .unique()
        .collect()
}

//! Member demographics
//!
//! `DemographicsInput` is the raw shape handed over by enrollment extractors.
//! `Demographics` is the validated, derived record produced by the
//! categorizer and carried through the rest of the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::prefix::CoefficientPrefix;

/// Member sex as used by the risk models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Male (`M` or `1`)
    #[serde(rename = "M")]
    Male,
    /// Female (`F` or `2`)
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    /// Parse one of the accepted sex codes (`M`, `F`, `1`, `2`)
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "M" | "1" => Some(Self::Male),
            "F" | "2" => Some(Self::Female),
            _ => None,
        }
    }

    /// Single-letter code used in demographic categories
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }

    /// Word used in interaction names
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Age-band table family used to build the demographic category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryScheme {
    /// Medicare age/sex cells (`F70_74`, `NEM65`, ...)
    #[default]
    Medicare,
    /// Commercial age-last cells (`MAGE_LAST_35_39`, ...)
    Aca,
}

fn default_dual_code() -> String {
    "00".to_string()
}

fn default_orec() -> String {
    "0".to_string()
}

/// Raw demographic fields as received from an enrollment source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicsInput {
    /// Age in years, possibly fractional
    pub age: f64,
    /// Sex code (`M`, `F`, `1` or `2`)
    pub sex: String,
    /// Two-character dual-eligibility code
    #[serde(default = "default_dual_code")]
    pub dual_elgbl_cd: String,
    /// Original reason for entitlement
    #[serde(default = "default_orec")]
    pub orec: String,
    /// Current reason for entitlement
    #[serde(default)]
    pub crec: String,
    #[serde(default)]
    pub new_enrollee: bool,
    #[serde(default)]
    pub snp: bool,
    #[serde(default)]
    pub low_income: bool,
    #[serde(default)]
    pub lti: bool,
    #[serde(default)]
    pub esrd: bool,
    /// Months since kidney transplant, for ESRD graft members
    #[serde(default)]
    pub graft_months: Option<u32>,
    #[serde(default)]
    pub scheme: CategoryScheme,
    /// Force a coefficient prefix family regardless of derived flags
    #[serde(default)]
    pub prefix_override: Option<String>,
}

impl DemographicsInput {
    /// Create an input with the given age and sex and defaults elsewhere
    #[must_use]
    pub fn new(age: f64, sex: &str) -> Self {
        Self {
            age,
            sex: sex.to_string(),
            dual_elgbl_cd: default_dual_code(),
            orec: default_orec(),
            crec: String::new(),
            new_enrollee: false,
            snp: false,
            low_income: false,
            lti: false,
            esrd: false,
            graft_months: None,
            scheme: CategoryScheme::Medicare,
            prefix_override: None,
        }
    }

    #[must_use]
    pub fn with_dual_code(mut self, code: &str) -> Self {
        self.dual_elgbl_cd = code.to_string();
        self
    }

    #[must_use]
    pub fn with_orec(mut self, orec: &str) -> Self {
        self.orec = orec.to_string();
        self
    }

    #[must_use]
    pub fn with_crec(mut self, crec: &str) -> Self {
        self.crec = crec.to_string();
        self
    }

    #[must_use]
    pub const fn with_new_enrollee(mut self, new_enrollee: bool) -> Self {
        self.new_enrollee = new_enrollee;
        self
    }

    #[must_use]
    pub const fn with_snp(mut self, snp: bool) -> Self {
        self.snp = snp;
        self
    }

    #[must_use]
    pub const fn with_low_income(mut self, low_income: bool) -> Self {
        self.low_income = low_income;
        self
    }

    #[must_use]
    pub const fn with_lti(mut self, lti: bool) -> Self {
        self.lti = lti;
        self
    }

    #[must_use]
    pub const fn with_esrd(mut self, esrd: bool) -> Self {
        self.esrd = esrd;
        self
    }

    #[must_use]
    pub const fn with_graft_months(mut self, months: u32) -> Self {
        self.graft_months = Some(months);
        self
    }

    #[must_use]
    pub const fn with_scheme(mut self, scheme: CategoryScheme) -> Self {
        self.scheme = scheme;
        self
    }

    #[must_use]
    pub fn with_prefix_override(mut self, prefix: &str) -> Self {
        self.prefix_override = Some(prefix.to_string());
        self
    }
}

/// Validated demographics with derived status flags and category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub age: f64,
    pub sex: Sex,
    pub dual_elgbl_cd: String,
    pub orec: String,
    pub crec: String,
    pub new_enrollee: bool,
    pub snp: bool,
    pub low_income: bool,
    pub lti: bool,
    pub esrd: bool,
    pub graft_months: Option<u32>,
    pub scheme: CategoryScheme,
    pub prefix_override: Option<CoefficientPrefix>,
    /// Under 65 with a non-aged entitlement reason
    pub disabled: bool,
    /// Entitled originally through disability, now aged
    pub orig_disabled: bool,
    /// Scored in the under-65 segment
    pub non_aged: bool,
    /// Full-benefit dual
    pub fbd: bool,
    /// Partial-benefit dual
    pub pbd: bool,
    /// Age/sex cell used for the demographic coefficient
    pub category: String,
}

impl Demographics {
    /// Any Medicaid dual eligibility
    #[must_use]
    pub const fn is_medicaid(&self) -> bool {
        self.fbd || self.pbd
    }

    /// Scored in the aged segment
    #[must_use]
    pub const fn is_aged(&self) -> bool {
        !self.non_aged
    }

    /// Entitlement originally due to ESRD
    #[must_use]
    pub fn is_originally_esrd(&self) -> bool {
        matches!(self.orec.as_str(), "2" | "3")
    }
}

//! Coefficient-table prefix families
//!
//! A prefix selects which segment of a model's coefficient table is probed
//! (community aged, full-benefit dual disabled, dialysis, institutional and so
//! on). Each variant maps to the exact key prefix used in the published tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RafError, Result};

/// Coefficient-table prefix family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CoefficientPrefix {
    /// Community, non-dual, aged
    CommunityNonDualAged,
    /// Community, non-dual, disabled
    CommunityNonDualDisabled,
    /// Community, full-benefit dual, aged
    CommunityFullDualAged,
    /// Community, full-benefit dual, disabled
    CommunityFullDualDisabled,
    /// Community, partial-benefit dual, aged
    CommunityPartialDualAged,
    /// Community, partial-benefit dual, disabled
    CommunityPartialDualDisabled,
    /// Long-term institutional
    Institutional,
    /// New enrollee
    NewEnrollee,
    /// Special-needs-plan new enrollee
    SnpNewEnrollee,
    /// ESRD dialysis continuing enrollee
    Dialysis,
    /// ESRD dialysis new enrollee
    DialysisNewEnrollee,
    /// ESRD functioning graft, institutional
    GraftInstitutional,
    /// ESRD functioning graft, new enrollee
    GraftNewEnrollee,
    /// ESRD functioning graft, community, full-benefit dual, aged
    GraftFullDualAged,
    /// ESRD functioning graft, community, full-benefit dual, non-aged
    GraftFullDualNonAged,
    /// ESRD functioning graft, community, not full-benefit dual, aged
    GraftNonDualAged,
    /// ESRD functioning graft, community, not full-benefit dual, non-aged
    GraftNonDualNonAged,
    /// RxHCC continuing enrollee, low income, aged
    RxLowIncomeAged,
    /// RxHCC continuing enrollee, low income, non-aged
    RxLowIncomeNonAged,
    /// RxHCC continuing enrollee, not low income, aged
    RxNotLowIncomeAged,
    /// RxHCC continuing enrollee, not low income, non-aged
    RxNotLowIncomeNonAged,
    /// RxHCC continuing enrollee, long-term institutional
    RxInstitutional,
    /// RxHCC new enrollee, low income
    RxNewEnrolleeLowIncome,
    /// RxHCC new enrollee, not low income
    RxNewEnrolleeNotLowIncome,
    /// RxHCC new enrollee, long-term institutional
    RxNewEnrolleeInstitutional,
}

/// Dual status forced by a prefix family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedDual {
    /// Full-benefit dual
    Full,
    /// Partial-benefit dual
    Partial,
    /// Neither
    NonDual,
}

/// Demographic flags implied by choosing a prefix family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImpliedFlags {
    /// Member is in an ESRD segment
    pub esrd: bool,
    /// Member is a new enrollee
    pub new_enrollee: bool,
    /// Member is long-term institutional
    pub lti: bool,
    /// Member is in a special-needs plan
    pub snp: bool,
    /// Member is low income
    pub low_income: bool,
    /// Dual status, when the family pins it
    pub dual: Option<ForcedDual>,
}

impl CoefficientPrefix {
    /// Get the key prefix used in the coefficient tables
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommunityNonDualAged => "CNA_",
            Self::CommunityNonDualDisabled => "CND_",
            Self::CommunityFullDualAged => "CFA_",
            Self::CommunityFullDualDisabled => "CFD_",
            Self::CommunityPartialDualAged => "CPA_",
            Self::CommunityPartialDualDisabled => "CPD_",
            Self::Institutional => "INS_",
            Self::NewEnrollee => "NE_",
            Self::SnpNewEnrollee => "SNPNE_",
            Self::Dialysis => "DI_",
            Self::DialysisNewEnrollee => "DNE_",
            Self::GraftInstitutional => "GI_",
            Self::GraftNewEnrollee => "GNE_",
            Self::GraftFullDualAged => "GFPA_",
            Self::GraftFullDualNonAged => "GFPN_",
            Self::GraftNonDualAged => "GNPA_",
            Self::GraftNonDualNonAged => "GNPN_",
            Self::RxLowIncomeAged => "Rx_CE_LowAged_",
            Self::RxLowIncomeNonAged => "Rx_CE_LowNoAged_",
            Self::RxNotLowIncomeAged => "Rx_CE_NoLowAged_",
            Self::RxNotLowIncomeNonAged => "Rx_CE_NoLowNoAged_",
            Self::RxInstitutional => "Rx_CE_LTI_",
            Self::RxNewEnrolleeLowIncome => "Rx_NE_Lo_",
            Self::RxNewEnrolleeNotLowIncome => "Rx_NE_NoLo_",
            Self::RxNewEnrolleeInstitutional => "Rx_NE_LTI_",
        }
    }

    /// Get all prefix families
    #[must_use]
    pub fn all_prefixes() -> Vec<Self> {
        vec![
            Self::CommunityNonDualAged,
            Self::CommunityNonDualDisabled,
            Self::CommunityFullDualAged,
            Self::CommunityFullDualDisabled,
            Self::CommunityPartialDualAged,
            Self::CommunityPartialDualDisabled,
            Self::Institutional,
            Self::NewEnrollee,
            Self::SnpNewEnrollee,
            Self::Dialysis,
            Self::DialysisNewEnrollee,
            Self::GraftInstitutional,
            Self::GraftNewEnrollee,
            Self::GraftFullDualAged,
            Self::GraftFullDualNonAged,
            Self::GraftNonDualAged,
            Self::GraftNonDualNonAged,
            Self::RxLowIncomeAged,
            Self::RxLowIncomeNonAged,
            Self::RxNotLowIncomeAged,
            Self::RxNotLowIncomeNonAged,
            Self::RxInstitutional,
            Self::RxNewEnrolleeLowIncome,
            Self::RxNewEnrolleeNotLowIncome,
            Self::RxNewEnrolleeInstitutional,
        ]
    }

    /// Whether this family belongs to the ESRD dialysis/graft segments
    #[must_use]
    pub const fn is_esrd_family(self) -> bool {
        matches!(
            self,
            Self::Dialysis
                | Self::DialysisNewEnrollee
                | Self::GraftInstitutional
                | Self::GraftNewEnrollee
                | Self::GraftFullDualAged
                | Self::GraftFullDualNonAged
                | Self::GraftNonDualAged
                | Self::GraftNonDualNonAged
        )
    }

    /// Demographic flags that must hold for a member scored under this family
    #[must_use]
    pub const fn implied_flags(self) -> ImpliedFlags {
        let mut flags = ImpliedFlags {
            esrd: self.is_esrd_family(),
            new_enrollee: false,
            lti: false,
            snp: false,
            low_income: false,
            dual: None,
        };

        match self {
            Self::NewEnrollee | Self::DialysisNewEnrollee | Self::GraftNewEnrollee => {
                flags.new_enrollee = true;
            }
            Self::SnpNewEnrollee => {
                flags.new_enrollee = true;
                flags.snp = true;
            }
            Self::Institutional | Self::GraftInstitutional | Self::RxInstitutional => {
                flags.lti = true;
            }
            Self::CommunityFullDualAged
            | Self::CommunityFullDualDisabled
            | Self::GraftFullDualAged
            | Self::GraftFullDualNonAged => {
                flags.dual = Some(ForcedDual::Full);
            }
            Self::CommunityPartialDualAged | Self::CommunityPartialDualDisabled => {
                flags.dual = Some(ForcedDual::Partial);
            }
            Self::CommunityNonDualAged | Self::CommunityNonDualDisabled => {
                flags.dual = Some(ForcedDual::NonDual);
            }
            Self::RxLowIncomeAged | Self::RxLowIncomeNonAged => {
                flags.low_income = true;
            }
            Self::RxNewEnrolleeLowIncome => {
                flags.new_enrollee = true;
                flags.low_income = true;
            }
            Self::RxNewEnrolleeNotLowIncome => {
                flags.new_enrollee = true;
            }
            Self::RxNewEnrolleeInstitutional => {
                flags.new_enrollee = true;
                flags.lti = true;
            }
            Self::Dialysis
            | Self::GraftNonDualAged
            | Self::GraftNonDualNonAged
            | Self::RxNotLowIncomeAged
            | Self::RxNotLowIncomeNonAged => {}
        }

        flags
    }
}

impl fmt::Display for CoefficientPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CoefficientPrefix {
    type Err = RafError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::all_prefixes()
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                RafError::validation(
                    "prefix_override",
                    format!("unknown coefficient prefix '{wanted}'"),
                )
            })
    }
}

impl TryFrom<String> for CoefficientPrefix {
    type Error = RafError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CoefficientPrefix> for String {
    fn from(value: CoefficientPrefix) -> Self {
        value.as_str().to_string()
    }
}

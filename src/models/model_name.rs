//! Versioned risk model identifiers
//!
//! Every reference-table lookup is keyed by `(code, ModelName)`. The display
//! string of each variant is the exact name used in the published tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RafError, Result};

/// A versioned CMS risk model
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ModelName {
    /// Community/institutional model, payment year 2020 vintage
    #[serde(rename = "CMS-HCC Model V22")]
    CmsHccV22,
    /// Community/institutional model with disease interactions on V24 CCs
    #[serde(rename = "CMS-HCC Model V24")]
    CmsHccV24,
    /// Community/institutional model on the 2024 clinical reclassification
    #[default]
    #[serde(rename = "CMS-HCC Model V28")]
    CmsHccV28,
    /// ESRD dialysis and graft model, V21 CCs
    #[serde(rename = "CMS-HCC ESRD Model V21")]
    EsrdV21,
    /// ESRD dialysis and graft model, V24 CCs
    #[serde(rename = "CMS-HCC ESRD Model V24")]
    EsrdV24,
    /// Part D prescription drug model
    #[serde(rename = "RxHCC Model V08")]
    RxHccV08,
}

/// Disease-interaction vocabulary used by a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionVocabulary {
    /// Group and interaction names of the V22 generation
    V22,
    /// Group and interaction names of the V24 generation
    V24,
    /// Group and interaction names of the V28 generation
    V28,
    /// Demographic interactions only
    None,
}

impl ModelName {
    /// Get the canonical table name for this model
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CmsHccV22 => "CMS-HCC Model V22",
            Self::CmsHccV24 => "CMS-HCC Model V24",
            Self::CmsHccV28 => "CMS-HCC Model V28",
            Self::EsrdV21 => "CMS-HCC ESRD Model V21",
            Self::EsrdV24 => "CMS-HCC ESRD Model V24",
            Self::RxHccV08 => "RxHCC Model V08",
        }
    }

    /// Get all supported models
    #[must_use]
    pub fn all_models() -> Vec<Self> {
        vec![
            Self::CmsHccV22,
            Self::CmsHccV24,
            Self::CmsHccV28,
            Self::EsrdV21,
            Self::EsrdV24,
            Self::RxHccV08,
        ]
    }

    /// Build a model from the `(model_domain, model_version)` columns used by
    /// the hierarchy, coefficient, chronic and label tables
    ///
    /// Returns `None` when the pair names no supported model.
    #[must_use]
    pub fn from_domain_version(domain: &str, version: &str) -> Option<Self> {
        let domain = domain.trim();
        let version = version.trim();
        let name = if domain.eq_ignore_ascii_case("ESRD") {
            format!("CMS-HCC ESRD Model {version}")
        } else {
            format!("{domain} Model {version}")
        };
        name.parse().ok()
    }

    /// Whether this is one of the ESRD dialysis/graft models
    #[must_use]
    pub const fn is_esrd(self) -> bool {
        matches!(self, Self::EsrdV21 | Self::EsrdV24)
    }

    /// Whether this is the prescription drug model
    #[must_use]
    pub const fn is_rx(self) -> bool {
        matches!(self, Self::RxHccV08)
    }

    /// Label placed in front of a CC code when forming a coefficient key
    #[must_use]
    pub const fn cc_key_label(self) -> &'static str {
        if self.is_rx() { "RxHCC" } else { "HCC" }
    }

    /// Disease-interaction vocabulary applied by this model
    #[must_use]
    pub const fn interaction_vocabulary(self) -> InteractionVocabulary {
        match self {
            Self::CmsHccV22 | Self::EsrdV21 => InteractionVocabulary::V22,
            Self::CmsHccV24 | Self::EsrdV24 => InteractionVocabulary::V24,
            Self::CmsHccV28 => InteractionVocabulary::V28,
            Self::RxHccV08 => InteractionVocabulary::None,
        }
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelName {
    type Err = RafError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::all_models()
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RafError::validation("model_name", format!("unknown model '{wanted}'")))
    }
}

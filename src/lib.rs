//! A Rust library for computing CMS-HCC Risk Adjustment Factors from
//! diagnosis codes and member demographics.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod reference;
pub mod utils;

// Re-export the most common types for easier use
pub use algorithm::raf::{RafCalculator, calculate_raf, categorize_demographics};
pub use config::{RafConfig, TableFiles};
pub use error::{RafError, Result};
pub use models::{
    CcMap, CoefficientPrefix, Demographics, DemographicsInput, MemberRequest, ModelName,
    PaymentAdjustment, RafResult, ServiceRecord,
};
pub use reference::{EditRule, ReferenceTables};

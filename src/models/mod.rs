//! Domain types shared across the RAF pipeline

pub mod cc_map;
pub mod demographics;
pub mod model_name;
pub mod prefix;
pub mod request;
pub mod result;
pub mod service;

pub use cc_map::CcMap;
pub use demographics::{CategoryScheme, Demographics, DemographicsInput, Sex};
pub use model_name::{InteractionVocabulary, ModelName};
pub use prefix::CoefficientPrefix;
pub use request::MemberRequest;
pub use result::{CcDetail, PaymentAdjustment, RafResult};
pub use service::{ServiceRecord, collect_diagnosis_codes};

//! Interaction flag derivation
//!
//! Interactions are named booleans computed from the final demographics and
//! the surviving CC set. Every flag of the model's vocabulary is evaluated
//! and only those that hold are returned, each mapped to `1`.
//!
//! Three families are produced:
//! - demographic interactions shared by all models (originally disabled,
//!   institutional, Medicaid, new-enrollee cells, ESRD graft duration),
//! - disease interactions of the model's vocabulary (V22, V24 or V28),
//! - payment HCC counts (`D1` .. `D10P`).

use rustc_hash::FxHashMap;

use crate::models::{CcMap, Demographics, InteractionVocabulary, ModelName};

/// Interaction name to `1` for each flag that holds
pub type InteractionMap = FxHashMap<String, u8>;

/// Accumulates evaluated flags
#[derive(Debug, Default)]
struct FlagSet {
    flags: Vec<(String, bool)>,
}

impl FlagSet {
    fn set(&mut self, name: impl Into<String>, value: bool) {
        self.flags.push((name.into(), value));
    }

    fn into_present(self) -> InteractionMap {
        self.flags
            .into_iter()
            .filter(|(_, value)| *value)
            .map(|(name, _)| (name, 1))
            .collect()
    }
}

/// Membership tests against the surviving CCs
struct CcPresence<'a> {
    cc_map: &'a CcMap,
}

impl CcPresence<'_> {
    fn has(&self, cc: &str) -> bool {
        self.cc_map.contains(cc)
    }

    fn any(&self, group: &[&str]) -> bool {
        group.iter().any(|cc| self.cc_map.contains(cc))
    }
}

/// Graft duration band for ESRD functioning-graft members
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraftDuration {
    /// 4 to 9 months since transplant
    FourToNine,
    /// 10 months or more
    TenPlus,
}

impl GraftDuration {
    /// Band for a number of months; none below 4 months
    #[must_use]
    pub const fn from_months(months: u32) -> Option<Self> {
        match months {
            0..=3 => None,
            4..=9 => Some(Self::FourToNine),
            _ => Some(Self::TenPlus),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FourToNine => "DUR4_9",
            Self::TenPlus => "DUR10PL",
        }
    }
}

const fn aged_word(demo: &Demographics) -> &'static str {
    if demo.non_aged { "NonAged" } else { "Aged" }
}

const fn age_role(demo: &Demographics) -> &'static str {
    if demo.non_aged { "LT65" } else { "GE65" }
}

fn demographic_interactions(demo: &Demographics, flags: &mut FlagSet) {
    let sex = demo.sex.display_name();
    let aged = demo.is_aged();
    let medicaid = demo.is_medicaid();

    flags.set(format!("OriginallyDisabled_{sex}"), aged && demo.orig_disabled);

    flags.set(format!("LTI_{}", aged_word(demo)), demo.lti);
    // Role-qualified alias looked up without prefix in the ESRD tables
    flags.set(format!("LTI_{}", age_role(demo)), demo.lti);

    if demo.new_enrollee {
        let origds = demo.age >= 65.0 && demo.orec == "1";
        let cell = match (medicaid, origds) {
            (false, false) => "NMCAID_NORIGDIS",
            (true, false) => "MCAID_NORIGDIS",
            (false, true) => "NMCAID_ORIGDIS",
            (true, true) => "MCAID_ORIGDIS",
        };
        flags.set(format!("{cell}_{}", demo.category), true);
    }

    flags.set(format!("FBDual_{sex}_{}", aged_word(demo)), demo.fbd);
    flags.set(format!("PBDual_{sex}_{}", aged_word(demo)), demo.pbd);
    flags.set(format!("MCAID_{sex}_{}", aged_word(demo)), medicaid);
    flags.set("LTIMCAID", demo.lti && medicaid);
    flags.set(
        format!("Originally_ESRD_{sex}"),
        aged && demo.is_originally_esrd(),
    );
}

fn graft_duration_interactions(demo: &Demographics, flags: &mut FlagSet) {
    if !demo.esrd {
        return;
    }
    let Some(duration) = demo.graft_months.and_then(GraftDuration::from_months) else {
        return;
    };

    let role = age_role(demo);
    let band = duration.as_str();
    let setting = if demo.lti { "FGI" } else { "FGC" };
    let dual_suffix = if demo.fbd { "FBD" } else { "ND_PBD" };

    flags.set(format!("{role}_{band}"), true);
    flags.set(format!("{setting}_{role}_{band}_{dual_suffix}"), true);
    flags.set(format!("{setting}_PBD_{role}_flag"), demo.pbd);
}

fn hcc_count_interactions(cc_map: &CcMap, flags: &mut FlagSet) {
    let count = cc_map.len();
    if count == 0 {
        return;
    }
    for n in 1..=9 {
        flags.set(format!("D{n}"), count == n);
    }
    flags.set("D10P", count >= 10);
}

mod v24 {
    pub const CANCER: &[&str] = &["8", "9", "10", "11", "12"];
    pub const DIABETES: &[&str] = &["17", "18", "19"];
    pub const CARD_RESP_FAIL: &[&str] = &["82", "83", "84"];
    pub const CHF: &[&str] = &["85"];
    pub const COPD_CF: &[&str] = &["110", "111", "112"];
    pub const RENAL: &[&str] = &["134", "135", "136", "137", "138"];
    pub const SEPSIS: &[&str] = &["2"];
    pub const PRESSURE_ULCER: &[&str] = &["157", "158", "159"];
    pub const SUBSTANCE_USE: &[&str] = &["54", "55", "56"];
    pub const PSYCHIATRIC: &[&str] = &["57", "58", "59", "60"];
}

mod v22 {
    pub const CANCER: &[&str] = &["8", "9", "10", "11", "12"];
    pub const DIABETES: &[&str] = &["17", "18", "19"];
    pub const CARD_RESP_FAIL: &[&str] = &["82", "83", "84"];
    pub const CHF: &[&str] = &["85"];
    pub const COPD_CF: &[&str] = &["110", "111", "112"];
    pub const RENAL: &[&str] = &["134", "135", "136", "137", "138"];
    pub const SEPSIS: &[&str] = &["2"];
    pub const PRESSURE_ULCER: &[&str] = &["157", "158"];
    pub const SUBSTANCE_ABUSE: &[&str] = &["54", "55"];
    pub const PSYCHIATRIC: &[&str] = &["57", "58"];
}

mod v28 {
    pub const CANCER: &[&str] = &["17", "18", "19", "20", "21", "22", "23"];
    pub const DIABETES: &[&str] = &["35", "36", "37", "38"];
    pub const CARD_RESP_FAIL: &[&str] = &["211", "212", "213"];
    pub const HF: &[&str] = &["221", "222", "223", "224", "225", "226", "227"];
    pub const CHR_LUNG: &[&str] = &["276", "277", "278", "279", "280"];
    pub const KIDNEY: &[&str] = &["326", "327", "328", "329"];
    pub const SUBSTANCE_USE: &[&str] = &["135", "136", "137", "138", "139"];
    pub const PSYCHIATRIC: &[&str] = &["151", "152", "153", "154", "155"];
    pub const NEURO: &[&str] = &[
        "180", "181", "182", "190", "191", "192", "195", "196", "198", "199",
    ];
    pub const ULCER: &[&str] = &["379", "380", "381", "382"];
}

fn v24_interactions(demo: &Demographics, ccs: &CcPresence<'_>, flags: &mut FlagSet) {
    use v24::*;

    let cancer = ccs.any(CANCER);
    let diabetes = ccs.any(DIABETES);
    let card_resp_fail = ccs.any(CARD_RESP_FAIL);
    let chf = ccs.any(CHF);
    let copd_cf = ccs.any(COPD_CF);
    let renal = ccs.any(RENAL);
    let sepsis = ccs.any(SEPSIS);
    let pressure_ulcer = ccs.any(PRESSURE_ULCER);
    let substance_use = ccs.any(SUBSTANCE_USE);
    let psychiatric = ccs.any(PSYCHIATRIC);
    let schizophrenia = ccs.has("57");
    let artif_openings = ccs.has("188");
    let asp_bact_pneum = ccs.has("114");
    let disabled = demo.disabled;

    flags.set("HCC47_gCancer", ccs.has("47") && cancer);
    flags.set("DIABETES_CHF", diabetes && chf);
    flags.set("CHF_gCopdCF", chf && copd_cf);
    flags.set("HCC85_gRenal_V24", chf && renal);
    flags.set("gCopdCF_CARD_RESP_FAIL", copd_cf && card_resp_fail);
    flags.set("HCC85_HCC96", chf && ccs.has("96"));
    flags.set("gSubstanceUseDisorder_gPsych", substance_use && psychiatric);

    flags.set("DISABLED_HCC85", disabled && chf);
    flags.set("DISABLED_PRESSURE_ULCER", disabled && pressure_ulcer);
    flags.set("DISABLED_HCC161", disabled && ccs.has("161"));
    flags.set("DISABLED_HCC39", disabled && ccs.has("39"));
    flags.set("DISABLED_HCC77", disabled && ccs.has("77"));
    flags.set("DISABLED_HCC6", disabled && ccs.has("6"));

    flags.set("SEPSIS_PRESSURE_ULCER", sepsis && pressure_ulcer);
    flags.set("SEPSIS_ARTIF_OPENINGS", sepsis && artif_openings);
    flags.set("ART_OPENINGS_PRESS_ULCER", artif_openings && pressure_ulcer);
    flags.set("gCopdCF_ASP_SPEC_B_PNEUM", copd_cf && asp_bact_pneum);
    flags.set("ASP_SPEC_B_PNEUM_PRES_ULC", asp_bact_pneum && pressure_ulcer);
    flags.set("SEPSIS_ASP_SPEC_BACT_PNEUM", sepsis && asp_bact_pneum);
    flags.set("SCHIZOPHRENIA_gCopdCF", schizophrenia && copd_cf);
    flags.set("SCHIZOPHRENIA_CHF", schizophrenia && chf);
    flags.set("SCHIZOPHRENIA_SEIZURES", schizophrenia && ccs.has("79"));
}

fn v22_interactions(demo: &Demographics, ccs: &CcPresence<'_>, flags: &mut FlagSet) {
    use v22::*;

    let cancer = ccs.any(CANCER);
    let diabetes = ccs.any(DIABETES);
    let card_resp_fail = ccs.any(CARD_RESP_FAIL);
    let chf = ccs.any(CHF);
    let copd_cf = ccs.any(COPD_CF);
    let renal = ccs.any(RENAL);
    let sepsis = ccs.any(SEPSIS);
    let pressure_ulcer = ccs.any(PRESSURE_ULCER);
    let schizophrenia = ccs.has("57");
    let artif_openings = ccs.has("188");
    let asp_bact_pneum = ccs.has("114");
    let disabled = demo.disabled;

    flags.set("HCC47_gCancer", ccs.has("47") && cancer);
    flags.set("HCC85_gDiabetesMellit", chf && diabetes);
    flags.set("HCC85_gCopdCF", chf && copd_cf);
    flags.set("HCC85_gRenal", chf && renal);
    flags.set("gRespDepandArre_gCopdCF", card_resp_fail && copd_cf);
    flags.set("HCC85_HCC96", chf && ccs.has("96"));
    flags.set(
        "gSubstanceAbuse_gPsychiatric",
        ccs.any(SUBSTANCE_ABUSE) && ccs.any(PSYCHIATRIC),
    );

    flags.set("DISABLED_HCC85", disabled && chf);
    flags.set("DISABLED_PRESSURE_ULCER", disabled && pressure_ulcer);
    flags.set("DISABLED_HCC161", disabled && ccs.has("161"));
    flags.set("DISABLED_HCC39", disabled && ccs.has("39"));
    flags.set("DISABLED_HCC77", disabled && ccs.has("77"));
    flags.set("DISABLED_HCC6", disabled && ccs.has("6"));

    flags.set("DIABETES_CHF", diabetes && chf);
    flags.set("CHF_COPD", chf && copd_cf);
    flags.set("COPD_CARD_RESP_FAIL", copd_cf && card_resp_fail);
    flags.set("SEPSIS_PRESSURE_ULCER", sepsis && pressure_ulcer);
    flags.set("SEPSIS_ARTIF_OPENINGS", sepsis && artif_openings);
    flags.set("ART_OPENINGS_PRESSURE_ULCER", artif_openings && pressure_ulcer);
    flags.set("COPD_ASP_SPEC_BACT_PNEUM", copd_cf && asp_bact_pneum);
    flags.set("ASP_SPEC_BACT_PNEUM_PRES_ULC", asp_bact_pneum && pressure_ulcer);
    flags.set("SEPSIS_ASP_SPEC_BACT_PNEUM", sepsis && asp_bact_pneum);
    flags.set("SCHIZOPHRENIA_COPD", schizophrenia && copd_cf);
    flags.set("SCHIZOPHRENIA_CHF", schizophrenia && chf);
    flags.set("SCHIZOPHRENIA_SEIZURES", schizophrenia && ccs.has("79"));
}

fn v28_interactions(demo: &Demographics, ccs: &CcPresence<'_>, flags: &mut FlagSet) {
    use v28::*;

    let cancer = ccs.any(CANCER);
    let diabetes = ccs.any(DIABETES);
    let card_resp_fail = ccs.any(CARD_RESP_FAIL);
    let hf = ccs.any(HF);
    let chr_lung = ccs.any(CHR_LUNG);
    let kidney = ccs.any(KIDNEY);
    let neuro = ccs.any(NEURO);
    let ulcer = ccs.any(ULCER);
    let disabled = demo.disabled;

    flags.set("DIABETES_HF_V28", diabetes && hf);
    flags.set("HF_CHR_LUNG_V28", hf && chr_lung);
    flags.set("HF_KIDNEY_V28", hf && kidney);
    flags.set("CHR_LUNG_CARD_RESP_FAIL_V28", chr_lung && card_resp_fail);
    flags.set("HF_HCC238_V28", hf && ccs.has("238"));
    flags.set(
        "gSubUseDisorder_gPsych_V28",
        ccs.any(SUBSTANCE_USE) && ccs.any(PSYCHIATRIC),
    );

    flags.set("DISABLED_CANCER_V28", disabled && cancer);
    flags.set("DISABLED_NEURO_V28", disabled && neuro);
    flags.set("DISABLED_HF_V28", disabled && hf);
    flags.set("DISABLED_CHR_LUNG_V28", disabled && chr_lung);
    flags.set("DISABLED_ULCER_V28", disabled && ulcer);
}

/// Demographic and graft-duration interactions, without CC-based flags
#[must_use]
pub fn create_demographic_interactions(demographics: &Demographics) -> InteractionMap {
    let mut flags = FlagSet::default();
    demographic_interactions(demographics, &mut flags);
    graft_duration_interactions(demographics, &mut flags);
    flags.into_present()
}

/// All interactions that hold for a member under `model`
#[must_use]
pub fn compute_interactions(
    demographics: &Demographics,
    cc_map: &CcMap,
    model: ModelName,
) -> InteractionMap {
    let mut flags = FlagSet::default();
    demographic_interactions(demographics, &mut flags);
    graft_duration_interactions(demographics, &mut flags);

    let ccs = CcPresence { cc_map };
    match model.interaction_vocabulary() {
        InteractionVocabulary::V22 => v22_interactions(demographics, &ccs, &mut flags),
        InteractionVocabulary::V24 => v24_interactions(demographics, &ccs, &mut flags),
        InteractionVocabulary::V28 => v28_interactions(demographics, &ccs, &mut flags),
        InteractionVocabulary::None => {}
    }
    hcc_count_interactions(cc_map, &mut flags);

    flags.into_present()
}

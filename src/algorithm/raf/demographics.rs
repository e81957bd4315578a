//! Demographic categorization
//!
//! Turns raw enrollment fields into a validated [`Demographics`] record with
//! derived disability, dual and ESRD status and a single age/sex category.

use log::debug;

use crate::error::{RafError, Result};
use crate::models::prefix::{CoefficientPrefix, ForcedDual, ImpliedFlags};
use crate::models::{CategoryScheme, Demographics, DemographicsInput, Sex};

/// Full-benefit dual eligibility codes
pub const FULL_BENEFIT_DUAL_CODES: &[&str] = &["02", "04", "08"];

/// Partial-benefit dual eligibility codes
pub const PARTIAL_BENEFIT_DUAL_CODES: &[&str] = &["01", "03", "05", "06"];

const DISABLED_BANDS: &[(u32, &str)] = &[
    (0, "0_34"),
    (35, "35_44"),
    (45, "45_54"),
    (55, "55_59"),
    (60, "60_64"),
];

const AGED_BANDS: &[(u32, &str)] = &[
    (65, "65_69"),
    (70, "70_74"),
    (75, "75_79"),
    (80, "80_84"),
    (85, "85_89"),
    (90, "90_94"),
    (95, "95_GT"),
];

const NEW_ENROLLEE_SINGLE_YEARS: &[(u32, &str)] = &[
    (65, "65"),
    (66, "66"),
    (67, "67"),
    (68, "68"),
    (69, "69"),
];

const ACA_BANDS: &[(u32, &str)] = &[
    (0, "0_0"),
    (1, "1_1"),
    (2, "2_4"),
    (5, "5_9"),
    (10, "10_14"),
    (15, "15_20"),
    (21, "21_24"),
    (25, "25_29"),
    (30, "30_34"),
    (35, "35_39"),
    (40, "40_44"),
    (45, "45_49"),
    (50, "50_54"),
    (55, "55_59"),
    (60, "60_GT"),
];

/// Band label for an age from tables of ascending lower bounds
///
/// Ages below the first bound clamp to the first band; the last band is
/// open-ended.
fn band_label(age: u32, tables: &[&[(u32, &'static str)]]) -> &'static str {
    let mut label = tables
        .first()
        .and_then(|t| t.first())
        .map_or("", |&(_, l)| l);
    for &(lower, l) in tables.iter().flat_map(|t| t.iter()) {
        if age >= lower {
            label = l;
        }
    }
    label
}

fn classify_dual(code: &str) -> (bool, bool) {
    let code = code.trim();
    (
        FULL_BENEFIT_DUAL_CODES.contains(&code),
        PARTIAL_BENEFIT_DUAL_CODES.contains(&code),
    )
}

fn parse_prefix_override(raw: Option<&str>) -> Result<Option<CoefficientPrefix>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(prefix) => prefix.parse().map(Some),
    }
}

fn validate_age(age: f64) -> Result<()> {
    if !age.is_finite() || age < 0.0 {
        return Err(RafError::validation(
            "age",
            format!("must be a non-negative number, got {age}"),
        ));
    }
    Ok(())
}

/// Build the category string for the given effective age and status
fn category_for(
    sex: Sex,
    banding_age: u32,
    scheme: CategoryScheme,
    new_enrollee: bool,
    esrd: bool,
) -> String {
    let sex = sex.code();
    match scheme {
        CategoryScheme::Aca => format!("{sex}AGE_LAST_{}", band_label(banding_age, &[ACA_BANDS])),
        CategoryScheme::Medicare if new_enrollee => {
            let band = if esrd {
                band_label(banding_age, &[DISABLED_BANDS, AGED_BANDS])
            } else if (65..70).contains(&banding_age) {
                band_label(banding_age, &[NEW_ENROLLEE_SINGLE_YEARS])
            } else {
                band_label(banding_age, &[DISABLED_BANDS, AGED_BANDS])
            };
            format!("NE{sex}{band}")
        }
        CategoryScheme::Medicare => {
            let band = if banding_age < 65 {
                band_label(banding_age, &[DISABLED_BANDS])
            } else {
                band_label(banding_age, &[AGED_BANDS])
            };
            format!("{sex}{band}")
        }
    }
}

/// Validate raw demographics and derive status flags and category
///
/// # Arguments
/// * `input` - Raw demographic fields
///
/// # Returns
/// The populated `Demographics`, or a `Validation` error naming the field
/// (`age`, `sex` or `prefix_override`) that could not be accepted
pub fn categorize_demographics(input: &DemographicsInput) -> Result<Demographics> {
    validate_age(input.age)?;
    let sex = Sex::from_code(&input.sex).ok_or_else(|| {
        RafError::validation(
            "sex",
            format!("unrecognized sex code '{}', expected M, F, 1 or 2", input.sex),
        )
    })?;
    let prefix_override = parse_prefix_override(input.prefix_override.as_deref())?;
    let implied = prefix_override
        .map(CoefficientPrefix::implied_flags)
        .unwrap_or_default();

    let orec = input.orec.trim().to_string();
    let crec = input.crec.trim().to_string();
    let age = input.age;

    let esrd = input.esrd
        || implied.esrd
        || matches!(orec.as_str(), "2" | "3" | "6")
        || matches!(crec.as_str(), "2" | "3");
    let new_enrollee = input.new_enrollee || implied.new_enrollee;

    let (mut fbd, mut pbd) = classify_dual(&input.dual_elgbl_cd);
    match implied.dual {
        Some(ForcedDual::Full) => (fbd, pbd) = (true, false),
        Some(ForcedDual::Partial) => (fbd, pbd) = (false, true),
        Some(ForcedDual::NonDual) => (fbd, pbd) = (false, false),
        None => {}
    }

    let (disabled, orig_disabled) = match input.scheme {
        CategoryScheme::Aca => (false, false),
        // Entitlement codes are not trusted when an override forced the ESRD segment
        CategoryScheme::Medicare if implied.esrd && !input.esrd => (age < 65.0, false),
        CategoryScheme::Medicare => {
            let disabled = age < 65.0 && orec != "0";
            let orig_disabled = matches!(orec.as_str(), "1" | "3") && !disabled;
            (disabled, orig_disabled)
        }
    };

    // Truncation is intended: bands are defined on completed years.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mut banding_age = age.floor() as u32;
    if input.scheme == CategoryScheme::Medicare && new_enrollee && !disabled && banding_age == 64 {
        banding_age = 65;
    }
    let non_aged = banding_age < 65;

    let category = category_for(sex, banding_age, input.scheme, new_enrollee, esrd);
    debug!(
        "Categorized member: category={category}, esrd={esrd}, disabled={disabled}, fbd={fbd}, pbd={pbd}"
    );

    let ImpliedFlags {
        lti, snp, low_income, ..
    } = implied;

    Ok(Demographics {
        age,
        sex,
        dual_elgbl_cd: input.dual_elgbl_cd.trim().to_string(),
        orec,
        crec,
        new_enrollee,
        snp: input.snp || snp,
        low_income: input.low_income || low_income,
        lti: input.lti || lti,
        esrd,
        graft_months: input.graft_months,
        scheme: input.scheme,
        prefix_override,
        disabled,
        orig_disabled,
        non_aged,
        fbd,
        pbd,
        category,
    })
}

#[cfg(test)]
mod tests {
    use hcc_raf::models::CategoryScheme;
    use hcc_raf::{DemographicsInput, RafError, categorize_demographics};

    #[test]
    fn test_full_and_partial_dual_codes() {
        for code in ["02", "04", "08"] {
            let demo =
                categorize_demographics(&DemographicsInput::new(70.0, "F").with_dual_code(code))
                    .unwrap();
            assert!(demo.fbd && !demo.pbd, "code {code}");
        }
        for code in ["01", "03", "05", "06"] {
            let demo =
                categorize_demographics(&DemographicsInput::new(70.0, "F").with_dual_code(code))
                    .unwrap();
            assert!(demo.pbd && !demo.fbd, "code {code}");
        }
        let demo = categorize_demographics(&DemographicsInput::new(70.0, "F").with_dual_code("09"))
            .unwrap();
        assert!(!demo.is_medicaid());
    }

    #[test]
    fn test_disabled_and_originally_disabled() {
        let disabled = categorize_demographics(&DemographicsInput::new(50.0, "M").with_orec("1"))
            .unwrap();
        assert!(disabled.disabled);
        assert!(!disabled.orig_disabled);
        assert!(disabled.non_aged);

        let orig = categorize_demographics(&DemographicsInput::new(72.0, "M").with_orec("1"))
            .unwrap();
        assert!(!orig.disabled);
        assert!(orig.orig_disabled);
        assert!(!orig.non_aged);

        let aged = categorize_demographics(&DemographicsInput::new(72.0, "M")).unwrap();
        assert!(!aged.disabled && !aged.orig_disabled);
    }

    #[test]
    fn test_esrd_from_entitlement_codes() {
        let by_orec = categorize_demographics(&DemographicsInput::new(60.0, "F").with_orec("2"))
            .unwrap();
        assert!(by_orec.esrd);
        assert!(by_orec.is_originally_esrd());

        let by_crec = categorize_demographics(&DemographicsInput::new(60.0, "F").with_crec("3"))
            .unwrap();
        assert!(by_crec.esrd);

        let plain = categorize_demographics(&DemographicsInput::new(60.0, "F")).unwrap();
        assert!(!plain.esrd);
    }

    #[test]
    fn test_prefix_override_implies_flags() {
        let demo = categorize_demographics(
            &DemographicsInput::new(55.0, "F")
                .with_orec("1")
                .with_prefix_override("DI_"),
        )
        .unwrap();
        assert!(demo.esrd);
        assert!(demo.disabled);
        assert!(!demo.orig_disabled);

        let demo = categorize_demographics(
            &DemographicsInput::new(70.0, "M")
                .with_dual_code("02")
                .with_prefix_override("CNA_"),
        )
        .unwrap();
        assert!(!demo.fbd && !demo.pbd);

        let demo =
            categorize_demographics(&DemographicsInput::new(66.0, "M").with_prefix_override("SNPNE_"))
                .unwrap();
        assert!(demo.new_enrollee && demo.snp);
        assert_eq!(demo.category, "NEM66");

        let demo =
            categorize_demographics(&DemographicsInput::new(80.0, "F").with_prefix_override("INS_"))
                .unwrap();
        assert!(demo.lti);
    }

    #[test]
    fn test_categorization_is_idempotent() {
        let inputs = [
            DemographicsInput::new(67.0, "F"),
            DemographicsInput::new(64.0, "M").with_new_enrollee(true),
            DemographicsInput::new(44.5, "2").with_orec("1").with_dual_code("01"),
            DemographicsInput::new(71.0, "M").with_orec("2").with_graft_months(12),
            DemographicsInput::new(30.0, "F").with_scheme(CategoryScheme::Aca),
        ];
        for input in inputs {
            let first = categorize_demographics(&input).unwrap();
            let second = categorize_demographics(&input).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_exactly_one_category_per_member() {
        let demo = categorize_demographics(&DemographicsInput::new(65.0, "F")).unwrap();
        assert_eq!(demo.category, "F65_69");
        let demo = categorize_demographics(&DemographicsInput::new(64.99, "F")).unwrap();
        assert_eq!(demo.category, "F60_64");
    }

    #[test]
    fn test_aca_scheme_ignores_disability() {
        let demo = categorize_demographics(
            &DemographicsInput::new(40.0, "F")
                .with_orec("1")
                .with_scheme(CategoryScheme::Aca),
        )
        .unwrap();
        assert_eq!(demo.category, "FAGE_LAST_40_44");
        assert!(!demo.disabled);
        assert!(!demo.orig_disabled);
    }

    #[test]
    fn test_validation_errors_name_the_field() {
        let err = categorize_demographics(&DemographicsInput::new(f64::NAN, "F")).unwrap_err();
        assert!(matches!(err, RafError::Validation { ref field, .. } if field == "age"));

        let err = categorize_demographics(&DemographicsInput::new(70.0, "")).unwrap_err();
        assert!(matches!(err, RafError::Validation { ref field, .. } if field == "sex"));
        assert!(err.to_string().contains("sex"));
    }
}

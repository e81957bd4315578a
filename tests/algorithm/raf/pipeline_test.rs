#[cfg(test)]
mod tests {
    use hcc_raf::{
        DemographicsInput, ModelName, PaymentAdjustment, RafError, ReferenceTables, ServiceRecord,
        calculate_raf,
    };

    use crate::utils::{assert_close, fixture_calculator, fixture_tables};

    #[test]
    fn test_single_diabetes_code_v28() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let result = calculator
            .calculate(&["E11.9"], &DemographicsInput::new(67.0, "F"))
            .unwrap();

        assert_eq!(result.cc_list, vec!["38"]);
        assert_eq!(result.prefix, "CNA_");
        assert_eq!(result.demographics.category, "F65_69");
        assert!(result.risk_score > 0.0);
        assert_close(result.risk_score, 0.323 + 0.166);
        assert_close(result.risk_score_chronic_only, 0.166);
        assert_eq!(result.coefficients.get("38"), Some(&0.166));
        assert_eq!(result.cc_to_dx["38"], vec!["E119"]);
        assert_eq!(
            result.cc_details[0].label.as_deref(),
            Some("Diabetes with Glycemic, Unspecified, or No Complications")
        );
    }

    #[test]
    fn test_no_diagnoses_scores_demographics_only() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let result = calculator
            .calculate::<&str>(&[], &DemographicsInput::new(70.0, "M"))
            .unwrap();

        assert!(result.cc_list.is_empty());
        assert_eq!(result.risk_score, 0.453);
        assert_eq!(result.risk_score, result.risk_score_demographics);
        assert_eq!(result.risk_score_hcc, 0.0);
        assert_eq!(result.risk_score_interactions, 0.0);
    }

    #[test]
    fn test_hierarchy_and_disease_interaction_v28() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let result = calculator
            .calculate(&["E1122", "I50.30", "E119"], &DemographicsInput::new(72.0, "F"))
            .unwrap();

        // 37 suppresses 38
        assert_eq!(result.cc_list, vec!["226", "37"]);
        assert_eq!(result.interactions.get("DIABETES_HF_V28"), Some(&1));
        assert_eq!(result.interactions.get("D2"), Some(&1));

        assert_close(result.risk_score_demographics, 0.395);
        assert_close(result.risk_score_hcc, 0.166 + 0.360);
        assert_close(result.risk_score_chronic_only, 0.166 + 0.360);
        assert_close(result.risk_score_interactions, 0.112);
        assert_close(result.risk_score, 0.395 + 0.166 + 0.360 + 0.112);
    }

    #[test]
    fn test_duplicate_and_equivalent_codes_count_once() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let once = calculator
            .calculate(&["I5030"], &DemographicsInput::new(70.0, "F"))
            .unwrap();
        let many = calculator
            .calculate(
                &["I50.30", "I5030", " i509 ", "I11.0"],
                &DemographicsInput::new(70.0, "F"),
            )
            .unwrap();

        assert_eq!(many.cc_list, vec!["226"]);
        assert_eq!(many.cc_to_dx["226"], vec!["I110", "I5030", "I509"]);
        assert_close(many.risk_score, once.risk_score);
    }

    #[test]
    fn test_payment_adjustment_formula() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let payment = PaymentAdjustment::new(0.059, 1.045, 0.08);
        let result = calculator
            .calculate_with(
                &["E119"],
                &DemographicsInput::new(67.0, "F"),
                ModelName::CmsHccV28,
                &payment,
            )
            .unwrap();

        let expected = result.risk_score * (1.0 - 0.059) / 1.045 + 0.08;
        assert_close(result.risk_score_payment, expected);
        assert_eq!(result.payment, payment);
    }

    #[test]
    fn test_default_payment_is_identity() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let result = calculator
            .calculate(&["E119"], &DemographicsInput::new(67.0, "F"))
            .unwrap();
        assert_close(result.risk_score_payment, result.risk_score);
    }

    #[test]
    fn test_invalid_norm_factor_rejected() {
        let tables = fixture_tables();
        let err = calculate_raf(
            &["E119"],
            &DemographicsInput::new(67.0, "F"),
            ModelName::CmsHccV28,
            &tables,
            &PaymentAdjustment::new(0.0, 0.0, 0.0),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_prefix_override_forces_esrd_dialysis() {
        let calculator = fixture_calculator(ModelName::EsrdV24);
        let result = calculator
            .calculate::<&str>(
                &[],
                &DemographicsInput::new(68.0, "F").with_prefix_override("DI_"),
            )
            .unwrap();

        assert_eq!(result.prefix, "DI_");
        assert!(result.demographics.esrd);
        assert!(!result.demographics.disabled);
        assert_close(result.risk_score, 0.532);
    }

    #[test]
    fn test_esrd_model_non_esrd_member_uses_general_prefix() {
        let calculator = fixture_calculator(ModelName::EsrdV24);
        let input = DemographicsInput::new(66.0, "F").with_orec("0").with_crec("0");
        let codes = ["N18.6", "I50.30"];

        let plain = calculator.calculate(&codes, &input).unwrap();
        assert!(!plain.demographics.esrd);
        assert_eq!(plain.prefix, "CNA_");
        assert_close(plain.risk_score, 0.301);

        let dialysis = calculator
            .calculate(&codes, &input.with_prefix_override("DI_"))
            .unwrap();
        assert_eq!(dialysis.prefix, "DI_");
        assert_close(dialysis.risk_score, 0.532 + 0.271 + 0.197);
        assert!((plain.risk_score - dialysis.risk_score).abs() > 1e-6);
    }

    #[test]
    fn test_prefix_override_beats_derived_dual_status() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let result = calculator
            .calculate(
                &["E119"],
                &DemographicsInput::new(70.0, "F").with_prefix_override("CFA_"),
            )
            .unwrap();

        assert_eq!(result.prefix, "CFA_");
        assert!(result.demographics.fbd);
        assert_close(result.risk_score, 0.512 + 0.186);
    }

    #[test]
    fn test_institutional_graft_member_on_esrd_model() {
        let calculator = fixture_calculator(ModelName::EsrdV24);
        let input = DemographicsInput::new(70.0, "F")
            .with_orec("2")
            .with_lti(true)
            .with_dual_code("02")
            .with_graft_months(6);
        let result = calculator.calculate::<&str>(&[], &input).unwrap();

        assert_eq!(result.prefix, "GI_");
        assert_eq!(result.interactions.get("LTI_GE65"), Some(&1));
        assert_eq!(result.interactions.get("LTIMCAID"), Some(&1));
        assert_eq!(result.interactions.get("FGI_GE65_DUR4_9_FBD"), Some(&1));

        // LTI_GE65 and the graft flag are published without a prefix
        assert_eq!(result.coefficients.get("LTI_GE65"), Some(&0.955));
        assert_eq!(result.coefficients.get("FGI_GE65_DUR4_9_FBD"), Some(&1.845));
        assert_eq!(result.coefficients.get("LTIMCAID"), Some(&0.183));
        assert_close(result.risk_score_interactions, 0.955 + 1.845 + 0.183);
        assert_close(result.risk_score, 0.402 + 0.955 + 1.845 + 0.183);
    }

    #[test]
    fn test_esrd_v21_duration_coefficient() {
        let calculator = fixture_calculator(ModelName::EsrdV21);
        let input = DemographicsInput::new(60.0, "M")
            .with_orec("2")
            .with_graft_months(5);
        let result = calculator.calculate(&["E119"], &input).unwrap();

        assert_eq!(result.cc_list, vec!["19"]);
        assert_eq!(result.interactions.get("LT65_DUR4_9"), Some(&1));
        assert!(!result.interactions.contains_key("LT65_DUR10PL"));
        assert_close(result.risk_score, 3.045);
    }

    #[test]
    fn test_rx_model_uses_rxhcc_keys() {
        let calculator = fixture_calculator(ModelName::RxHccV08);
        let result = calculator
            .calculate(&["E119"], &DemographicsInput::new(72.0, "F"))
            .unwrap();

        assert_eq!(result.prefix, "Rx_CE_NoLowAged_");
        assert_eq!(result.cc_list, vec!["31"]);
        assert_close(result.risk_score, 0.193 + 0.087);
    }

    #[test]
    fn test_invalid_demographics_fail_before_scoring() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);

        let err = calculator
            .calculate(&["E119"], &DemographicsInput::new(-1.0, "F"))
            .unwrap_err();
        assert!(matches!(err, RafError::Validation { ref field, .. } if field == "age"));

        let err = calculator
            .calculate(&["E119"], &DemographicsInput::new(70.0, "X"))
            .unwrap_err();
        assert!(matches!(err, RafError::Validation { ref field, .. } if field == "sex"));

        let err = calculator
            .calculate(
                &["E119"],
                &DemographicsInput::new(70.0, "F").with_prefix_override("ZZ_"),
            )
            .unwrap_err();
        assert!(matches!(err, RafError::Validation { ref field, .. } if field == "prefix_override"));
    }

    #[test]
    fn test_model_without_reference_data_scores_zero() {
        let tables = ReferenceTables::default();
        let result = calculate_raf(
            &["E119", "I5030"],
            &DemographicsInput::new(70.0, "F"),
            ModelName::CmsHccV22,
            &tables,
            &PaymentAdjustment::default(),
        )
        .unwrap();

        assert!(result.cc_list.is_empty());
        assert!(result.coefficients.is_empty());
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.demographics.category, "F70_74");
    }

    #[test]
    fn test_unknown_codes_are_ignored() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let with_unknown = calculator
            .calculate(&["E119", "Z0000", ""], &DemographicsInput::new(67.0, "F"))
            .unwrap();
        let clean = calculator
            .calculate(&["E119"], &DemographicsInput::new(67.0, "F"))
            .unwrap();
        assert_eq!(with_unknown.cc_list, clean.cc_list);
        assert_close(with_unknown.risk_score, clean.risk_score);
    }

    #[test]
    fn test_service_records_match_direct_codes() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let demographics = DemographicsInput::new(72.0, "F");
        let records = vec![
            ServiceRecord::with_diagnoses(["E11.22"]).with_claim_id("C1"),
            ServiceRecord::with_diagnoses(["I50.30", "E11.22"]).with_claim_id("C2"),
        ];

        let from_services = calculator
            .calculate_from_services(&records, &demographics)
            .unwrap();
        let direct = calculator
            .calculate(&["E1122", "I5030"], &demographics)
            .unwrap();

        assert_eq!(from_services.cc_list, direct.cc_list);
        assert_close(from_services.risk_score, direct.risk_score);
    }

    #[test]
    fn test_result_serializes_to_json() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let result = calculator
            .calculate(&["E119"], &DemographicsInput::new(67.0, "F"))
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["model_name"], "CMS-HCC Model V28");
        assert_eq!(json["cc_list"][0], "38");
    }
}

#[cfg(test)]
mod tests {
    use hcc_raf::{DemographicsInput, MemberRequest, ModelName, PaymentAdjustment, ServiceRecord};

    use crate::utils::{assert_close, fixture_calculator};

    fn request(id: &str, age: f64, sex: &str, codes: &[&str]) -> MemberRequest {
        MemberRequest::new(
            DemographicsInput::new(age, sex),
            codes.iter().map(ToString::to_string).collect(),
        )
        .with_member_id(id)
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let requests: Vec<MemberRequest> = (0..50)
            .map(|i| {
                let codes: &[&str] = if i % 2 == 0 { &["E119"] } else { &[] };
                request(&format!("M{i:03}"), 70.0, "F", codes)
            })
            .collect();

        let results = calculator.calculate_batch(&requests).unwrap();
        assert_eq!(results.len(), requests.len());
        for (i, result) in results.iter().enumerate() {
            let result = result.as_ref().unwrap();
            if i % 2 == 0 {
                assert_eq!(result.cc_list, vec!["38"]);
            } else {
                assert!(result.cc_list.is_empty());
            }
        }
    }

    #[test]
    fn test_batch_isolates_invalid_members() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let requests = vec![
            request("ok-1", 67.0, "F", &["E119"]),
            request("bad", 67.0, "Q", &["E119"]),
            request("ok-2", 70.0, "M", &[]),
        ];

        let results = calculator.calculate_batch(&requests).unwrap();
        assert!(results[0].is_ok());
        assert!(results[1].as_ref().is_err_and(hcc_raf::RafError::is_validation));
        assert_close(results[2].as_ref().unwrap().risk_score, 0.453);
    }

    #[test]
    fn test_batch_matches_single_member_scoring() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let member = request("m1", 72.0, "F", &["E1122", "I5030"]);
        let single = calculator.calculate_request(&member).unwrap();
        let batch = calculator.calculate_batch(std::slice::from_ref(&member)).unwrap();
        assert_close(batch[0].as_ref().unwrap().risk_score, single.risk_score);
    }

    #[test]
    fn test_request_overrides_model_and_payment() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let payment = PaymentAdjustment::new(0.059, 1.0, 0.0);
        let member = request("rx", 72.0, "F", &["E119"])
            .with_model(ModelName::RxHccV08)
            .with_payment(payment);

        let result = calculator.calculate_request(&member).unwrap();
        assert_eq!(result.model_name, ModelName::RxHccV08);
        assert_eq!(result.cc_list, vec!["31"]);
        assert_close(result.risk_score_payment, result.risk_score * (1.0 - 0.059));
    }

    #[test]
    fn test_request_merges_service_records() {
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let member = request("svc", 72.0, "F", &["E11.22"]).with_service_records(vec![
            ServiceRecord::with_diagnoses(["I50.30"]),
        ]);
        let result = calculator.calculate_request(&member).unwrap();
        assert_eq!(result.cc_list, vec!["226", "37"]);
    }

    #[test]
    fn test_request_from_json_line() {
        let line = r#"{"member_id": "A1", "demographics": {"age": 67, "sex": "F"}, "diagnosis_codes": ["E11.9"]}"#;
        let member: MemberRequest = serde_json::from_str(line).unwrap();
        let calculator = fixture_calculator(ModelName::CmsHccV28);
        let result = calculator.calculate_request(&member).unwrap();
        assert_eq!(result.cc_list, vec!["38"]);
    }
}

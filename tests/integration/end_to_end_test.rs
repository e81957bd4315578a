#[cfg(test)]
mod tests {
    use std::fs;

    use hcc_raf::{
        DemographicsInput, MemberRequest, ModelName, RafCalculator, RafConfig, RafError,
    };

    use crate::utils::{assert_close, fixture_files, scratch_dir};

    fn write_fixture_dir(name: &str, skip: &[&str]) -> std::path::PathBuf {
        let dir = scratch_dir(name);
        for (_, file_name, data) in fixture_files() {
            if skip.contains(&file_name) {
                continue;
            }
            fs::write(dir.join(file_name), data).unwrap();
        }
        dir
    }

    #[test]
    fn test_calculator_from_data_dir() {
        let dir = write_fixture_dir("full", &[]);
        let config = RafConfig::new()
            .with_data_dir(&dir)
            .with_model(ModelName::CmsHccV28)
            .with_progress(false);
        let calculator = RafCalculator::from_config(config).unwrap();

        let result = calculator
            .calculate(&["E11.9"], &DemographicsInput::new(67.0, "F"))
            .unwrap();
        assert_eq!(result.cc_list, vec!["38"]);
        assert_close(result.risk_score, 0.323 + 0.166);
        assert!(result.cc_details[0].label.is_some());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_optional_tables_may_be_absent() {
        let dir = write_fixture_dir("no_optional", &["ra_dx_edits.csv", "ra_labels.csv"]);
        let config = RafConfig::new()
            .with_data_dir(&dir)
            .with_model(ModelName::CmsHccV28)
            .with_progress(false);
        let calculator = RafCalculator::from_config(config).unwrap();

        // without the edit table the male pregnancy-diabetes pairing survives
        let result = calculator
            .calculate(&["O24.41"], &DemographicsInput::new(30.0, "M"))
            .unwrap();
        assert_eq!(result.cc_list, vec!["38"]);
        assert!(result.cc_details[0].label.is_none());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_required_table_is_an_io_error() {
        let dir = write_fixture_dir("no_coefficients", &["ra_coefficients.csv"]);
        let config = RafConfig::new().with_data_dir(&dir).with_progress(false);

        let err = RafCalculator::from_config(config).unwrap_err();
        match err {
            RafError::Io { path, .. } => assert!(path.ends_with("ra_coefficients.csv")),
            other => panic!("expected IO error, got {other}"),
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_batch_from_data_dir() {
        let dir = write_fixture_dir("batch", &[]);
        let config = RafConfig::new()
            .with_data_dir(&dir)
            .with_threads(4)
            .with_progress(false);
        let calculator = RafCalculator::from_config(config).unwrap();

        let requests: Vec<MemberRequest> = ["E119", "I5030", "N186", "J449"]
            .iter()
            .map(|dx| {
                MemberRequest::new(DemographicsInput::new(70.0, "F"), vec![(*dx).to_string()])
                    .with_member_id(dx)
            })
            .collect();
        let results = calculator.calculate_batch(&requests).unwrap();

        let ccs: Vec<String> = results
            .iter()
            .map(|r| r.as_ref().unwrap().cc_list.join(","))
            .collect();
        assert_eq!(ccs, vec!["38", "226", "326", "280"]);

        fs::remove_dir_all(dir).ok();
    }
}

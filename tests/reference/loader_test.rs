#[cfg(test)]
mod tests {
    use hcc_raf::reference::loader::{TableKind, load_table};
    use hcc_raf::{ModelName, ReferenceTables};

    use crate::utils::{COEFFICIENTS_CSV, fixture_tables};

    #[test]
    fn test_fixture_tables_cover_all_models() {
        let tables = fixture_tables();
        for model in [
            ModelName::CmsHccV24,
            ModelName::CmsHccV28,
            ModelName::EsrdV21,
            ModelName::EsrdV24,
            ModelName::RxHccV08,
        ] {
            assert!(tables.has_model(model), "{model} missing");
        }
        assert!(!tables.has_model(ModelName::CmsHccV22));
    }

    #[test]
    fn test_lookups_are_scoped_by_model() {
        let tables = fixture_tables();
        assert_eq!(tables.ccs_for_diagnosis("E119", ModelName::CmsHccV28), ["38"]);
        assert_eq!(tables.ccs_for_diagnosis("E119", ModelName::CmsHccV24), ["19"]);
        assert!(tables.ccs_for_diagnosis("E119", ModelName::CmsHccV22).is_empty());

        assert_eq!(tables.coefficient("cna_f70_74", ModelName::CmsHccV28), Some(0.395));
        assert_eq!(tables.coefficient("cna_f70_74", ModelName::CmsHccV24), Some(0.386));
        assert!(tables.is_chronic("38", ModelName::CmsHccV28));
        assert!(!tables.is_chronic("238", ModelName::CmsHccV28));
        assert!(!tables.is_chronic("38", ModelName::CmsHccV24));
    }

    #[test]
    fn test_hierarchy_children_loaded() {
        let tables = fixture_tables();
        let mut children = tables.hierarchy_children("35", ModelName::CmsHccV28).to_vec();
        children.sort();
        assert_eq!(children, vec!["36", "37", "38"]);
        assert!(tables.hierarchy_children("38", ModelName::CmsHccV28).is_empty());
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let data = "\
coefficient,value,model_domain,model_version
CNA_F70_74,0.395,CMS-HCC,V28
CNA_F75_79,not-a-number,CMS-HCC,V28
CNA_F80_84,0.5
CNA_F85_89,0.6,Unknown,V99

CNA_M70_74,0.453,CMS-HCC,V28
";
        let mut builder = ReferenceTables::builder();
        let stats = load_table(TableKind::Coefficients, data.as_bytes(), &mut builder).unwrap();
        assert_eq!(stats.rows_loaded, 2);
        assert_eq!(stats.rows_skipped, 3);

        let tables = builder.build();
        assert_eq!(tables.coefficient("cna_m70_74", ModelName::CmsHccV28), Some(0.453));
        assert_eq!(tables.coefficient("cna_f75_79", ModelName::CmsHccV28), None);
    }

    #[test]
    fn test_first_edit_rule_wins() {
        let data = "\
diagnosis_code,model_name,edit_type,sex,age_min,age_max,action,cc_override
E1122,CMS-HCC Model V24,sex,2,,,override,19
E11.22,CMS-HCC Model V24,sex,1,,,invalid,
";
        let mut builder = ReferenceTables::builder();
        let stats = load_table(TableKind::Edits, data.as_bytes(), &mut builder).unwrap();
        assert_eq!(stats.rows_loaded + stats.rows_skipped, 2);

        let tables = builder.build();
        let rule = tables.edit_rule("E1122", ModelName::CmsHccV24).unwrap();
        assert_eq!(rule.cc_override.as_deref(), Some("19"));
    }

    #[test]
    fn test_summary_counts() {
        let mut builder = ReferenceTables::builder();
        load_table(TableKind::Coefficients, COEFFICIENTS_CSV.as_bytes(), &mut builder).unwrap();
        let summary = builder.build().summary();
        assert_eq!(summary.models, 5);
        assert_eq!(summary.coefficients, COEFFICIENTS_CSV.lines().count() - 1);
        assert!(summary.to_string().contains("coefficients"));
    }
}

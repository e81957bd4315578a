//! CSV loaders for the reference tables
//!
//! Each table is a headered CSV. Rows that cannot be parsed are logged and
//! skipped; the rest of the table still loads. Only an unreadable file or
//! stream is an error.

use csv::StringRecord;
use log::{debug, warn};
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use crate::config::RafConfig;
use crate::error::Result;
use crate::error::util::{parse_f64_field, safe_open_file};
use crate::models::{ModelName, Sex};
use crate::reference::{EditAction, EditRule, EditType, ReferenceTables, ReferenceTablesBuilder};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Reference table layouts understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// `diagnosis_code,cc,model_name`
    DxToCc,
    /// `cc_parent,cc_child,model_domain,model_version,model_fullname`
    Hierarchies,
    /// `coefficient,value,model_domain,model_version`
    Coefficients,
    /// `hcc,is_chronic,model_version,model_domain`
    Chronic,
    /// `diagnosis_code,model_name,edit_type,sex,age_min,age_max,action,cc_override`
    Edits,
    /// `cc,label,model_domain,model_version`
    Labels,
}

impl TableKind {
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::DxToCc => "dx to CC mapping",
            Self::Hierarchies => "hierarchies",
            Self::Coefficients => "coefficients",
            Self::Chronic => "chronic flags",
            Self::Edits => "dx edits",
            Self::Labels => "CC labels",
        }
    }

    const fn min_fields(self) -> usize {
        match self {
            Self::DxToCc => 3,
            Self::Hierarchies | Self::Coefficients | Self::Chronic | Self::Labels => 4,
            Self::Edits => 7,
        }
    }
}

/// Outcome of loading one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_loaded: usize,
    pub rows_skipped: usize,
}

type RowResult = std::result::Result<(), String>;

fn field<'r>(record: &'r StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("").trim()
}

fn parse_model(name: &str) -> std::result::Result<ModelName, String> {
    name.parse::<ModelName>()
        .map_err(|_| format!("unknown model '{name}'"))
}

fn parse_domain_version(domain: &str, version: &str) -> std::result::Result<ModelName, String> {
    ModelName::from_domain_version(domain, version)
        .ok_or_else(|| format!("unknown model domain/version '{domain}'/'{version}'"))
}

fn parse_optional_age(value: &str) -> std::result::Result<Option<f64>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_f64_field("age bound", value)
        .map(Some)
        .map_err(|e| e.to_string())
}

fn parse_dx_to_cc(record: &StringRecord, builder: &mut ReferenceTablesBuilder) -> RowResult {
    let dx = field(record, 0);
    let cc = field(record, 1);
    if dx.is_empty() || cc.is_empty() {
        return Err("empty diagnosis or CC".to_string());
    }
    let model = parse_model(field(record, 2))?;
    builder.add_dx_mapping(dx, cc, model);
    Ok(())
}

fn parse_hierarchy(record: &StringRecord, builder: &mut ReferenceTablesBuilder) -> RowResult {
    let parent = field(record, 0);
    let child = field(record, 1);
    if parent.is_empty() || child.is_empty() {
        return Err("empty parent or child CC".to_string());
    }
    let model = parse_domain_version(field(record, 2), field(record, 3))?;
    builder.add_hierarchy(parent, child, model);
    Ok(())
}

fn parse_coefficient(record: &StringRecord, builder: &mut ReferenceTablesBuilder) -> RowResult {
    let key = field(record, 0);
    if key.is_empty() {
        return Err("empty coefficient key".to_string());
    }
    let raw = field(record, 1);
    let value = parse_f64_field("coefficient value", raw).map_err(|e| e.to_string())?;
    let model = parse_domain_version(field(record, 2), field(record, 3))?;
    builder.add_coefficient(key, value, model);
    Ok(())
}

fn parse_chronic(record: &StringRecord, builder: &mut ReferenceTablesBuilder) -> RowResult {
    let hcc = field(record, 0);
    let cc = hcc.replace("HCC", "");
    if cc.is_empty() {
        return Err("empty HCC".to_string());
    }
    let is_chronic = field(record, 1).eq_ignore_ascii_case("Y");
    // version precedes domain in this table
    let model = parse_domain_version(field(record, 3), field(record, 2))?;
    builder.set_chronic(&cc, is_chronic, model);
    Ok(())
}

fn parse_edit(record: &StringRecord, builder: &mut ReferenceTablesBuilder) -> RowResult {
    let dx = field(record, 0);
    if dx.is_empty() {
        return Err("empty diagnosis code".to_string());
    }
    let model = parse_model(field(record, 1))?;

    let edit_type = match field(record, 2).to_lowercase().as_str() {
        "sex" => EditType::Sex,
        "age" => EditType::Age,
        other => return Err(format!("unknown edit type '{other}'")),
    };
    let sex = match field(record, 3) {
        "" => None,
        code => Some(Sex::from_code(code).ok_or_else(|| format!("invalid sex '{code}'"))?),
    };
    let age_min = parse_optional_age(field(record, 4))?;
    let age_max = parse_optional_age(field(record, 5))?;
    let action = match field(record, 6).to_lowercase().as_str() {
        "invalid" => EditAction::Invalid,
        "override" => EditAction::Override,
        other => return Err(format!("unknown edit action '{other}'")),
    };
    let cc_override = Some(field(record, 7))
        .filter(|cc| !cc.is_empty())
        .map(str::to_string);

    match (edit_type, sex, age_min, age_max) {
        (EditType::Sex, None, _, _) => return Err("sex edit without sex".to_string()),
        (EditType::Age, _, None, None) => return Err("age edit without bound".to_string()),
        (EditType::Age, _, Some(_), Some(_)) => {
            return Err("age edit with both bounds".to_string());
        }
        _ => {}
    }
    if action == EditAction::Override && cc_override.is_none() {
        return Err("override edit without target CC".to_string());
    }

    let rule = EditRule {
        edit_type,
        sex,
        age_min,
        age_max,
        action,
        cc_override,
    };
    if !builder.add_edit(dx, model, rule) {
        debug!("Duplicate edit rule for {dx} under {model}; keeping the first");
    }
    Ok(())
}

fn parse_label(record: &StringRecord, builder: &mut ReferenceTablesBuilder) -> RowResult {
    let cc = field(record, 0);
    let label = field(record, 1);
    if cc.is_empty() {
        return Err("empty CC".to_string());
    }
    let model = parse_domain_version(field(record, 2), field(record, 3))?;
    builder.add_label(cc.trim_start_matches("HCC"), label, model);
    Ok(())
}

/// Load one table from any reader into the builder
///
/// # Arguments
/// * `kind` - Layout of the table
/// * `reader` - CSV source with a header row
/// * `builder` - Builder receiving the parsed rows
///
/// # Returns
/// Counts of loaded and skipped rows
pub fn load_table<R: Read>(
    kind: TableKind,
    reader: R,
    builder: &mut ReferenceTablesBuilder,
) -> Result<LoadStats> {
    let parse_row: fn(&StringRecord, &mut ReferenceTablesBuilder) -> RowResult = match kind {
        TableKind::DxToCc => parse_dx_to_cc,
        TableKind::Hierarchies => parse_hierarchy,
        TableKind::Coefficients => parse_coefficient,
        TableKind::Chronic => parse_chronic,
        TableKind::Edits => parse_edit,
        TableKind::Labels => parse_label,
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut stats = LoadStats::default();
    for record in csv_reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable {} row: {e}", kind.display_name());
                stats.rows_skipped += 1;
                continue;
            }
        };

        let line = record.position().map_or(0, csv::Position::line);
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() < kind.min_fields() {
            warn!(
                "Skipping {} row at line {line}: expected {} fields, found {}",
                kind.display_name(),
                kind.min_fields(),
                record.len()
            );
            stats.rows_skipped += 1;
            continue;
        }

        match parse_row(&record, builder) {
            Ok(()) => stats.rows_loaded += 1,
            Err(reason) => {
                warn!(
                    "Skipping {} row at line {line}: {reason}",
                    kind.display_name()
                );
                stats.rows_skipped += 1;
            }
        }
    }

    Ok(stats)
}

/// Load one table from a file
pub fn load_table_file(
    kind: TableKind,
    path: &Path,
    builder: &mut ReferenceTablesBuilder,
) -> Result<LoadStats> {
    let start = Instant::now();
    log_operation_start(&format!("Loading {} from", kind.display_name()), path);

    let file = safe_open_file(path, kind.display_name())?;
    let stats = load_table(kind, file, builder)?;

    if stats.rows_skipped > 0 {
        log_warning(
            &format!("Skipped {} malformed {} rows", stats.rows_skipped, kind.display_name()),
            Some(path),
        );
    }
    log_operation_complete("loaded", path, stats.rows_loaded, Some(start.elapsed()));
    Ok(stats)
}

impl ReferenceTables {
    /// Load every configured table from the data directory
    ///
    /// The dx-to-CC, hierarchy, coefficient and chronic tables are required.
    /// Edit and label tables are loaded when their files exist.
    pub fn load(config: &RafConfig) -> Result<Self> {
        let mut builder = Self::builder();
        let files = &config.table_files;

        let required = [
            (TableKind::DxToCc, &files.dx_to_cc),
            (TableKind::Hierarchies, &files.hierarchies),
            (TableKind::Coefficients, &files.coefficients),
            (TableKind::Chronic, &files.chronic),
        ];
        for (kind, name) in required {
            load_table_file(kind, &config.data_dir.join(name), &mut builder)?;
        }

        let optional = [
            (TableKind::Edits, &files.edits),
            (TableKind::Labels, &files.labels),
        ];
        for (kind, name) in optional {
            let path = config.data_dir.join(name);
            if path.is_file() {
                load_table_file(kind, &path, &mut builder)?;
            } else {
                debug!("No {} table at {}", kind.display_name(), path.display());
            }
        }

        let tables = builder.build();
        log::info!("Reference tables ready: {}", tables.summary());
        Ok(tables)
    }
}

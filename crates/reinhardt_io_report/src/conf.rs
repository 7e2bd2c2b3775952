//! Report constants, settings and default preset factories.

use std::path::PathBuf;

use serde::Deserialize;

use crate::spec::SpecXlsxWriteOptions;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Default cap on inferred column width.
pub const N_WIDTH_CELL_MAX_DEFAULT: usize = 118;
/// Default cap on inferred row height.
pub const N_HEIGHT_CELL_MAX_DEFAULT: usize = 90;
/// Row height contributed by one text line.
pub const N_HEIGHT_LINE: usize = 15;

/// Sheet name used by single-table workbooks.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet";
/// Number format applied to float cells.
pub const C_NUM_FORMAT_FLOAT: &str = "0.00";

pub const C_CONTENT_TYPE_CSV: &str = "text/csv";
pub const C_CONTENT_TYPE_XLSX: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Environment variable holding the temp directory for workbook files.
pub const C_ENV_FILE_UPLOAD_TEMP_DIR: &str = "REINHARDT_FILE_UPLOAD_TEMP_DIR";

/// Host-level settings consumed by report export.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SpecReportSettings {
    /// Directory for temporary workbook files; system temp dir when `None`.
    pub file_upload_temp_dir: Option<PathBuf>,
}

impl SpecReportSettings {
    /// Read settings from `REINHARDT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            file_upload_temp_dir: lookup(C_ENV_FILE_UPLOAD_TEMP_DIR)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Build default write options.
pub fn derive_default_xlsx_write_options() -> SpecXlsxWriteOptions {
    SpecXlsxWriteOptions::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_from_lookup_ignores_blank_values() {
        let settings = SpecReportSettings::from_lookup(|key| {
            (key == C_ENV_FILE_UPLOAD_TEMP_DIR).then(|| "/var/tmp/uploads".to_string())
        });
        assert_eq!(
            settings.file_upload_temp_dir,
            Some(PathBuf::from("/var/tmp/uploads"))
        );

        let settings = SpecReportSettings::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(settings, SpecReportSettings::default());
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: SpecReportSettings = serde_json::from_str("{}").expect("parse");
        assert_eq!(settings.file_upload_temp_dir, None);

        let settings: SpecReportSettings =
            serde_json::from_str(r#"{"file_upload_temp_dir": "/srv/tmp"}"#).expect("parse");
        assert_eq!(settings.file_upload_temp_dir, Some(PathBuf::from("/srv/tmp")));
    }
}

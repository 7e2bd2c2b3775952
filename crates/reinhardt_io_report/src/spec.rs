//! Shared report specification models.

use std::path::PathBuf;

use thiserror::Error;

use crate::conf::{
    C_NUM_FORMAT_FLOAT, N_HEIGHT_CELL_MAX_DEFAULT, N_HEIGHT_LINE, N_WIDTH_CELL_MAX_DEFAULT,
    SpecReportSettings,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellValue

/// One table cell handed to a report writer.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for EnumCellValue {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<i64> for EnumCellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for EnumCellValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for EnumCellValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for EnumCellValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T: Into<EnumCellValue>> From<Option<T>> for EnumCellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Text used for float values Excel cannot store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxValuePolicy {
    /// Replacement text for NaN.
    pub nan_str: String,
    /// Replacement text for positive infinity.
    pub posinf_str: String,
    /// Replacement text for negative infinity.
    pub neginf_str: String,
}

impl Default for SpecXlsxValuePolicy {
    fn default() -> Self {
        Self {
            nan_str: "NaN".to_string(),
            posinf_str: "Inf".to_string(),
            neginf_str: "-Inf".to_string(),
        }
    }
}

/// Column width / row height inference policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxSizingPolicy {
    /// Maximum inferred column width (before padding).
    pub width_cell_max: usize,
    /// Width padding added after capping.
    pub width_cell_padding: usize,
    /// Maximum inferred row height.
    pub height_cell_max: usize,
    /// Height of one text line.
    pub height_line: usize,
}

impl Default for SpecXlsxSizingPolicy {
    fn default() -> Self {
        Self {
            width_cell_max: N_WIDTH_CELL_MAX_DEFAULT,
            width_cell_padding: 1,
            height_cell_max: N_HEIGHT_CELL_MAX_DEFAULT,
            height_line: N_HEIGHT_LINE,
        }
    }
}

/// Writer-wide options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    /// Non-finite float conversion policy.
    pub value_policy: SpecXlsxValuePolicy,
    /// Width/height inference policy.
    pub policy_sizing: SpecXlsxSizingPolicy,
    /// Number format code for float cells.
    pub num_format_float: String,
    /// Directory for the temporary workbook file.
    pub dir_temp: Option<PathBuf>,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            value_policy: SpecXlsxValuePolicy::default(),
            policy_sizing: SpecXlsxSizingPolicy::default(),
            num_format_float: C_NUM_FORMAT_FLOAT.to_string(),
            dir_temp: None,
        }
    }
}

impl SpecXlsxWriteOptions {
    /// Default options with the temp directory taken from `settings`.
    pub fn from_settings(settings: &SpecReportSettings) -> Self {
        Self {
            dir_temp: settings.file_upload_temp_dir.clone(),
            ..Self::default()
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Concrete sheet emitted to the workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetSlice {
    /// Actual unique sheet name in workbook.
    pub sheet_name: String,
    /// Inclusive source row start.
    pub row_start_inclusive: usize,
    /// Exclusive source row end.
    pub row_end_exclusive: usize,
    /// Widest row in this sheet.
    pub n_cols: usize,
}

/// Column widths and row heights applied to one sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecSheetDimensions {
    pub sheet_name: String,
    /// `(column, width)` with padding included, ascending by column.
    pub col_widths: Vec<(u16, f64)>,
    /// `(row, height)`, ascending by row.
    pub row_heights: Vec<(u32, f64)>,
}

/// Per-table write report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Sheets produced for the table.
    pub sheets: Vec<SpecSheetSlice>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

/// Downloadable report payload with its HTTP headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecReportResponse {
    /// `Content-Type` header value.
    pub content_type: String,
    /// `Content-Disposition` header value.
    pub content_disposition: String,
    /// File bytes.
    pub body: Vec<u8>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Report export failures.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("csv write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid report filename {0:?}: quotes, backslashes and line breaks are not allowed")]
    InvalidFilename(String),
    #[error("Sheet {sheet:?} row {row} has more than {max} columns")]
    TooManyColumns { sheet: String, row: usize, max: usize },
    #[error("{0}")]
    InvalidPolicy(String),
    #[error("row index overflow: {0}")]
    RowOverflow(usize),
    #[error("column index overflow: {0}")]
    ColumnOverflow(usize),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

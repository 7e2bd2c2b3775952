//! `reinhardt_io_report` v1:
//! CSV/XLSX report export for row-major tables.
//!
//! Modules:
//! - `conf`       : constants, settings and default presets
//! - `spec`       : cell values, options, reports and errors
//! - `util`       : pure helper functions
//! - `writer`     : XLSX writer kernel
//! - `csv_export` : CSV encoder
//! - `response`   : downloadable attachments
pub mod conf;
pub mod csv_export;
pub mod response;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_CONTENT_TYPE_CSV, C_CONTENT_TYPE_XLSX, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX,
    N_NROWS_EXCEL_MAX, SpecReportSettings, TUP_EXCEL_ILLEGAL, derive_default_xlsx_write_options,
};
pub use csv_export::write_csv;
pub use response::{csv_response, xlsx_response, xlsx_response_sheets};
pub use spec::{
    EnumCellValue, ReportError, SpecReportResponse, SpecSheetDimensions, SpecSheetSlice,
    SpecXlsxReport, SpecXlsxSizingPolicy, SpecXlsxValuePolicy, SpecXlsxWriteOptions,
};
pub use util::{
    convert_nan_inf_to_str, derive_cell_text, estimate_cell_height, estimate_cell_width,
    sanitize_sheet_name,
};
pub use writer::XlsxReportWriter;

//! Downloadable report responses.

use crate::conf::{C_CONTENT_TYPE_CSV, C_CONTENT_TYPE_XLSX, C_SHEET_NAME_DEFAULT};
use crate::csv_export::write_csv;
use crate::spec::{
    EnumCellValue, ReportError, SpecReportResponse, SpecXlsxValuePolicy, SpecXlsxWriteOptions,
};
use crate::util::{derive_content_disposition, validate_filename};
use crate::writer::XlsxReportWriter;

/// CSV attachment named `<filename>.csv`.
pub fn csv_response<T, R, C>(
    filename: &str,
    table: T,
    value_policy: &SpecXlsxValuePolicy,
) -> Result<SpecReportResponse, ReportError>
where
    T: IntoIterator<Item = R>,
    R: IntoIterator<Item = C>,
    C: Into<EnumCellValue>,
{
    validate_filename(filename)?;
    Ok(SpecReportResponse {
        content_type: C_CONTENT_TYPE_CSV.to_string(),
        content_disposition: derive_content_disposition(filename, "csv"),
        body: write_csv(table, value_policy)?,
    })
}

/// XLSX attachment named `<filename>.xlsx` holding one sheet named `Sheet`.
pub fn xlsx_response<T, R, C>(
    filename: &str,
    table: T,
    write_options: &SpecXlsxWriteOptions,
) -> Result<SpecReportResponse, ReportError>
where
    T: IntoIterator<Item = R>,
    R: IntoIterator<Item = C>,
    C: Into<EnumCellValue>,
{
    xlsx_response_sheets(filename, [(C_SHEET_NAME_DEFAULT, table)], write_options)
}

/// XLSX attachment with one sheet per `(sheet_name, table)` pair.
pub fn xlsx_response_sheets<S, N, T, R, C>(
    filename: &str,
    sheets: S,
    write_options: &SpecXlsxWriteOptions,
) -> Result<SpecReportResponse, ReportError>
where
    S: IntoIterator<Item = (N, T)>,
    N: AsRef<str>,
    T: IntoIterator<Item = R>,
    R: IntoIterator<Item = C>,
    C: Into<EnumCellValue>,
{
    validate_filename(filename)?;

    let mut writer = XlsxReportWriter::new(write_options.clone())?;
    for (sheet_name, table) in sheets {
        writer.write_sheet(sheet_name.as_ref(), table)?;
    }

    Ok(SpecReportResponse {
        content_type: C_CONTENT_TYPE_XLSX.to_string(),
        content_disposition: derive_content_disposition(filename, "xlsx"),
        body: writer.finish()?,
    })
}

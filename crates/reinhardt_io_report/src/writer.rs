//! XLSX writer kernel that streams row-major tables into workbook sheets.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, warn};

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
use crate::spec::{
    EnumCellValue, ReportError, SpecSheetDimensions, SpecSheetSlice, SpecXlsxReport,
    SpecXlsxSizingPolicy, SpecXlsxValuePolicy, SpecXlsxWriteOptions,
};
use crate::util::{
    convert_nan_inf_to_str, create_sheet_identifier, derive_cell_text, estimate_cell_height,
    estimate_cell_width, sanitize_sheet_name, validate_policy_sizing,
};

/// Sheet being filled; committed to the workbook once complete.
struct SpecSheetDraft {
    worksheet: Worksheet,
    sheet_name: String,
    row_start_inclusive: usize,
    n_rows: usize,
    n_cols: usize,
    dict_width_by_col: BTreeMap<usize, usize>,
    dict_height_by_row: BTreeMap<usize, usize>,
}

/// Stateful workbook writer.
///
/// Sheets are buffered in memory; [`Self::finish`] serializes the workbook
/// through a temporary file and returns its bytes.
pub struct XlsxReportWriter {
    workbook: Workbook,
    fmt_float: Format,
    write_options: SpecXlsxWriteOptions,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
    l_sheet_dimensions: Vec<SpecSheetDimensions>,
    n_rows_sheet_max: usize,
}

impl XlsxReportWriter {
    /// Create writer with validated options.
    pub fn new(write_options: SpecXlsxWriteOptions) -> Result<Self, ReportError> {
        validate_policy_sizing(&write_options.policy_sizing)?;
        Ok(Self {
            workbook: Workbook::new(),
            fmt_float: Format::new().set_num_format(write_options.num_format_float.as_str()),
            write_options,
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
            l_sheet_dimensions: Vec::new(),
            n_rows_sheet_max: N_NROWS_EXCEL_MAX,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_rows_sheet_max(mut self, n_rows_sheet_max: usize) -> Self {
        self.n_rows_sheet_max = n_rows_sheet_max;
        self
    }

    /// Per-table write reports, in write order.
    pub fn report(&self) -> &[SpecXlsxReport] {
        &self.l_reports
    }

    /// Column widths and row heights applied per sheet, in workbook order.
    pub fn sheet_dimensions(&self) -> &[SpecSheetDimensions] {
        &self.l_sheet_dimensions
    }

    /// Write one row-major table as a sheet named `sheet_name`.
    ///
    /// Rows may have different lengths. Column widths follow the widest cell
    /// text per column and row heights the tallest cell per row, both capped
    /// by the sizing policy. Tables longer than the Excel row limit continue
    /// on `<name>_2`, `<name>_3`, ...
    pub fn write_sheet<T, R, C>(&mut self, sheet_name: &str, table: T) -> Result<(), ReportError>
    where
        T: IntoIterator<Item = R>,
        R: IntoIterator<Item = C>,
        C: Into<EnumCellValue>,
    {
        let mut report = SpecXlsxReport::default();

        let c_sheet_name_base = sanitize_sheet_name(sheet_name, "_");
        if c_sheet_name_base != sheet_name {
            warn!(sheet = sheet_name, renamed = %c_sheet_name_base, "xlsx sheet name sanitized");
            report.warn(format!(
                "Sheet name sanitized: {sheet_name:?} -> {c_sheet_name_base:?}"
            ));
        }

        let mut n_idx_part = 1usize;
        let mut n_row_abs = 0usize;
        let mut draft = self.open_sheet_draft(&c_sheet_name_base, 0, &mut report);

        for row in table {
            if draft.n_rows == self.n_rows_sheet_max {
                n_idx_part += 1;
                let draft_next = self.open_sheet_draft(
                    &create_sheet_identifier(&c_sheet_name_base, n_idx_part),
                    n_row_abs,
                    &mut report,
                );
                let draft_full = std::mem::replace(&mut draft, draft_next);
                self.commit_sheet_draft(draft_full, &mut report)?;
            }

            let n_row_local = draft.n_rows;
            for (n_idx_col, cell) in row.into_iter().enumerate() {
                if n_idx_col >= N_NCOLS_EXCEL_MAX {
                    return Err(ReportError::TooManyColumns {
                        sheet: draft.sheet_name.clone(),
                        row: n_row_abs,
                        max: N_NCOLS_EXCEL_MAX,
                    });
                }

                let value: EnumCellValue = cell.into();
                write_cell_with_format(
                    &mut draft.worksheet,
                    n_row_local,
                    n_idx_col,
                    &value,
                    &self.fmt_float,
                    &self.write_options.value_policy,
                )?;

                let policy_sizing = &self.write_options.policy_sizing;
                let c_text = derive_cell_text(&value, &self.write_options.value_policy);
                let n_width = draft.dict_width_by_col.entry(n_idx_col).or_insert(0);
                *n_width = usize::max(*n_width, estimate_cell_width(&c_text, policy_sizing));
                let n_height = draft.dict_height_by_row.entry(n_row_local).or_insert(0);
                *n_height = usize::max(*n_height, estimate_cell_height(&c_text, policy_sizing));
                draft.n_cols = usize::max(draft.n_cols, n_idx_col + 1);
            }

            draft.n_rows += 1;
            n_row_abs += 1;
        }

        if n_idx_part > 1 {
            warn!(
                sheet = %c_sheet_name_base,
                n_rows = n_row_abs,
                n_sheets = n_idx_part,
                "excel row limit overflow"
            );
            report.warn(format!(
                "Excel limit overflow: split into {n_idx_part} sheets (rows)."
            ));
        }
        self.commit_sheet_draft(draft, &mut report)?;

        self.l_reports.push(report);
        Ok(())
    }

    /// Serialize the workbook through a named temporary file and return the
    /// file bytes.
    ///
    /// The temp file lives in `write_options.dir_temp` when set and is
    /// removed on return. I/O failures are returned as [`ReportError::Io`].
    pub fn finish(mut self) -> Result<Vec<u8>, ReportError> {
        let mut builder_temp = tempfile::Builder::new();
        builder_temp.prefix("reinhardt_report_").suffix(".xlsx");
        let file_temp = match &self.write_options.dir_temp {
            Some(dir_temp) => builder_temp.tempfile_in(dir_temp)?,
            None => builder_temp.tempfile()?,
        };

        self.workbook.save(file_temp.path())?;
        let v_bytes = fs::read(file_temp.path())?;

        debug!(
            n_bytes = v_bytes.len(),
            n_tables = self.l_reports.len(),
            "xlsx workbook finished"
        );
        Ok(v_bytes)
    }

    /// Save the workbook to `path_file_out`.
    pub fn save(mut self, path_file_out: impl AsRef<Path>) -> Result<(), ReportError> {
        self.workbook.save(path_file_out.as_ref())?;
        debug!(path = %path_file_out.as_ref().display(), "xlsx workbook saved");
        Ok(())
    }

    fn open_sheet_draft(
        &mut self,
        name: &str,
        row_start_inclusive: usize,
        report: &mut SpecXlsxReport,
    ) -> SpecSheetDraft {
        let sheet_name_unique = self.derive_unique_sheet_name(name);
        if sheet_name_unique != name {
            warn!(sheet = name, renamed = %sheet_name_unique, "xlsx sheet name already used");
            report.warn(format!(
                "Sheet name {name:?} already used; renamed to {sheet_name_unique:?}"
            ));
        }

        SpecSheetDraft {
            worksheet: Worksheet::new(),
            sheet_name: sheet_name_unique,
            row_start_inclusive,
            n_rows: 0,
            n_cols: 0,
            dict_width_by_col: BTreeMap::new(),
            dict_height_by_row: BTreeMap::new(),
        }
    }

    fn commit_sheet_draft(
        &mut self,
        draft: SpecSheetDraft,
        report: &mut SpecXlsxReport,
    ) -> Result<(), ReportError> {
        let SpecSheetDraft {
            mut worksheet,
            sheet_name,
            row_start_inclusive,
            n_rows,
            n_cols,
            dict_width_by_col,
            dict_height_by_row,
        } = draft;

        worksheet.set_name(sheet_name.as_str())?;

        let dimensions = plan_sheet_dimensions(
            &sheet_name,
            &dict_width_by_col,
            &dict_height_by_row,
            &self.write_options.policy_sizing,
        )?;
        for (n_col, n_width) in &dimensions.col_widths {
            worksheet.set_column_width(*n_col, *n_width)?;
        }
        for (n_row, n_height) in &dimensions.row_heights {
            worksheet.set_row_height(*n_row, *n_height)?;
        }
        self.l_sheet_dimensions.push(dimensions);

        debug!(sheet = %sheet_name, n_rows, n_cols, "xlsx sheet written");
        self.workbook.push_worksheet(worksheet);

        report.sheets.push(SpecSheetSlice {
            sheet_name,
            row_start_inclusive,
            row_end_exclusive: row_start_inclusive + n_rows,
            n_cols,
        });
        Ok(())
    }

    /// Excel compares sheet names case-insensitively.
    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if self.set_sheet_names_existing.insert(name.to_lowercase()) {
            return name.to_string();
        }

        let mut n_idx = 2usize;
        loop {
            let c_suffix = format!("__{n_idx}");
            let n_len_base_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_suffix.len());
            let candidate: String = name
                .chars()
                .take(usize::max(1, n_len_base_max))
                .chain(c_suffix.chars())
                .collect();
            if self.set_sheet_names_existing.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n_idx += 1;
        }
    }
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    fmt_float: &Format,
    value_policy: &SpecXlsxValuePolicy,
) -> Result<(), ReportError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;

    match value {
        EnumCellValue::None => {}
        EnumCellValue::String(val) => {
            worksheet.write_string(n_row, n_col, val.as_str())?;
        }
        EnumCellValue::Integer(val) => {
            worksheet.write_number(n_row, n_col, *val as f64)?;
        }
        EnumCellValue::Float(val) => match convert_nan_inf_to_str(*val, value_policy) {
            Some(text) => {
                worksheet.write_string(n_row, n_col, text)?;
            }
            None => {
                worksheet.write_number_with_format(n_row, n_col, *val, fmt_float)?;
            }
        },
        EnumCellValue::Boolean(val) => {
            worksheet.write_boolean(n_row, n_col, *val)?;
        }
    }
    Ok(())
}

/// Padded column widths and row heights from the per-sheet maxima.
fn plan_sheet_dimensions(
    sheet_name: &str,
    dict_width_by_col: &BTreeMap<usize, usize>,
    dict_height_by_row: &BTreeMap<usize, usize>,
    policy_sizing: &SpecXlsxSizingPolicy,
) -> Result<SpecSheetDimensions, ReportError> {
    let col_widths = dict_width_by_col
        .iter()
        .map(|(n_idx_col, n_width)| {
            Ok((
                cast_col_num(*n_idx_col)?,
                (n_width + policy_sizing.width_cell_padding) as f64,
            ))
        })
        .collect::<Result<Vec<_>, ReportError>>()?;
    let row_heights = dict_height_by_row
        .iter()
        .map(|(n_idx_row, n_height)| Ok((cast_row_num(*n_idx_row)?, *n_height as f64)))
        .collect::<Result<Vec<_>, ReportError>>()?;

    Ok(SpecSheetDimensions {
        sheet_name: sheet_name.to_string(),
        col_widths,
        row_heights,
    })
}

fn cast_row_num(value: usize) -> Result<u32, ReportError> {
    u32::try_from(value).map_err(|_| ReportError::RowOverflow(value))
}

fn cast_col_num(value: usize) -> Result<u16, ReportError> {
    u16::try_from(value).map_err(|_| ReportError::ColumnOverflow(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecXlsxSizingPolicy;

    const V_ZIP_MAGIC: &[u8] = b"PK\x03\x04";

    fn writer() -> XlsxReportWriter {
        XlsxReportWriter::new(SpecXlsxWriteOptions::default()).expect("writer")
    }

    #[test]
    fn write_sheet_reports_shape_and_finish_returns_zip_bytes() {
        let mut writer = writer();
        let table: Vec<Vec<EnumCellValue>> = vec![
            vec!["name".into(), "score".into(), "passed".into()],
            vec!["Ada".into(), 9.5.into(), true.into()],
            vec!["Bob".into(), EnumCellValue::None],
        ];
        writer.write_sheet("Scores", table).expect("write sheet");

        assert_eq!(
            writer.report(),
            &[SpecXlsxReport {
                sheets: vec![SpecSheetSlice {
                    sheet_name: "Scores".to_string(),
                    row_start_inclusive: 0,
                    row_end_exclusive: 3,
                    n_cols: 3,
                }],
                warnings: vec![],
            }]
        );

        let v_bytes = writer.finish().expect("finish");
        assert!(v_bytes.starts_with(V_ZIP_MAGIC));
    }

    #[test]
    fn duplicate_and_illegal_sheet_names_are_renamed_with_warnings() {
        let mut writer = writer();
        writer.write_sheet("Summary", vec![vec![1_i64]]).expect("first");
        writer.write_sheet("summary", vec![vec![2_i64]]).expect("second");
        writer.write_sheet("a/b", Vec::<Vec<i64>>::new()).expect("third");

        let l_names: Vec<&str> = writer
            .report()
            .iter()
            .flat_map(|report| report.sheets.iter().map(|sheet| sheet.sheet_name.as_str()))
            .collect();
        assert_eq!(l_names, vec!["Summary", "summary__2", "a_b"]);
        assert_eq!(writer.report()[0].warnings.len(), 0);
        assert_eq!(writer.report()[1].warnings.len(), 1);
        assert_eq!(writer.report()[2].warnings.len(), 1);
        assert_eq!(writer.report()[2].sheets[0].row_end_exclusive, 0);
    }

    #[test]
    fn finish_uses_configured_temp_dir_and_cleans_up() {
        let dir_temp = tempfile::tempdir().expect("temp dir");
        let mut writer = XlsxReportWriter::new(SpecXlsxWriteOptions {
            dir_temp: Some(dir_temp.path().to_path_buf()),
            ..SpecXlsxWriteOptions::default()
        })
        .expect("writer");
        writer
            .write_sheet("Sheet", vec![vec!["multi\nline", "x"]])
            .expect("write sheet");

        let v_bytes = writer.finish().expect("finish");
        assert!(v_bytes.starts_with(V_ZIP_MAGIC));
        assert_eq!(std::fs::read_dir(dir_temp.path()).expect("read dir").count(), 0);
    }

    #[test]
    fn finish_surfaces_missing_temp_dir_as_io_error() {
        let dir_temp = tempfile::tempdir().expect("temp dir");
        let mut writer = XlsxReportWriter::new(SpecXlsxWriteOptions {
            dir_temp: Some(dir_temp.path().join("missing")),
            ..SpecXlsxWriteOptions::default()
        })
        .expect("writer");
        writer.write_sheet("Sheet", vec![vec![1_i64]]).expect("write sheet");

        assert!(matches!(writer.finish(), Err(ReportError::Io(_))));
    }

    #[test]
    fn save_writes_workbook_to_path() {
        let dir_out = tempfile::tempdir().expect("temp dir");
        let path_file_out = dir_out.path().join("report.xlsx");

        let mut writer = writer();
        writer
            .write_sheet("Sheet", vec![vec![f64::NAN, 1.25]])
            .expect("write sheet");
        writer.save(&path_file_out).expect("save");

        let v_bytes = std::fs::read(&path_file_out).expect("read");
        assert!(v_bytes.starts_with(V_ZIP_MAGIC));
    }

    #[test]
    fn invalid_sizing_policy_is_rejected() {
        let result = XlsxReportWriter::new(SpecXlsxWriteOptions {
            policy_sizing: SpecXlsxSizingPolicy {
                width_cell_max: 0,
                ..SpecXlsxSizingPolicy::default()
            },
            ..SpecXlsxWriteOptions::default()
        });
        assert!(matches!(result, Err(ReportError::InvalidPolicy(_))));
    }

    #[test]
    fn repeated_long_sheet_names_stay_unique_and_within_limit() {
        let c_name = "Quarterly enrollment summary";
        let mut writer = writer();
        for _ in 0..12 {
            writer.write_sheet(c_name, vec![vec![1_i64]]).expect("write sheet");
        }

        let l_names: Vec<String> = writer
            .report()
            .iter()
            .map(|report| report.sheets[0].sheet_name.clone())
            .collect();
        let set_names: BTreeSet<String> =
            l_names.iter().map(|name| name.to_lowercase()).collect();
        assert_eq!(set_names.len(), 12);
        assert!(l_names.iter().all(|name| name.chars().count() <= 31));
        assert_eq!(l_names[1], "Quarterly enrollment summary__2");
        assert_eq!(l_names[9], "Quarterly enrollment summar__10");
        assert_eq!(l_names[11], "Quarterly enrollment summar__12");
    }

    #[test]
    fn rows_past_the_sheet_limit_continue_on_numbered_sheets() {
        let mut writer = writer().with_rows_sheet_max(2);
        let table: Vec<Vec<i64>> = (0..5).map(|n_idx| vec![n_idx, n_idx * 10]).collect();
        writer.write_sheet("Log", table).expect("write sheet");

        let report = &writer.report()[0];
        assert_eq!(
            report.sheets,
            vec![
                SpecSheetSlice {
                    sheet_name: "Log".to_string(),
                    row_start_inclusive: 0,
                    row_end_exclusive: 2,
                    n_cols: 2,
                },
                SpecSheetSlice {
                    sheet_name: "Log_2".to_string(),
                    row_start_inclusive: 2,
                    row_end_exclusive: 4,
                    n_cols: 2,
                },
                SpecSheetSlice {
                    sheet_name: "Log_3".to_string(),
                    row_start_inclusive: 4,
                    row_end_exclusive: 5,
                    n_cols: 2,
                },
            ]
        );
        assert_eq!(
            report.warnings,
            vec!["Excel limit overflow: split into 3 sheets (rows).".to_string()]
        );
        assert!(writer.finish().expect("finish").starts_with(V_ZIP_MAGIC));
    }

    #[test]
    fn rows_wider_than_the_column_limit_are_rejected() {
        let mut writer = writer();
        let row: Vec<i64> = (0..=N_NCOLS_EXCEL_MAX as i64).collect();

        let result = writer.write_sheet("Wide", vec![row]);
        assert!(matches!(
            result,
            Err(ReportError::TooManyColumns { ref sheet, row: 0, max: 16_384 }) if sheet == "Wide"
        ));
    }

    #[test]
    fn inferred_widths_and_heights_are_applied_per_sheet() {
        let mut writer = writer();
        let table: Vec<Vec<EnumCellValue>> = vec![
            vec!["abc".into(), "multi\nline\ntext".into()],
            vec![12_345_678_i64.into()],
            vec![EnumCellValue::None, "x".repeat(200).into()],
        ];
        writer.write_sheet("Sizes", table).expect("write sheet");

        assert_eq!(
            writer.sheet_dimensions(),
            &[SpecSheetDimensions {
                sheet_name: "Sizes".to_string(),
                col_widths: vec![(0, 9.0), (1, 119.0)],
                row_heights: vec![(0, 45.0), (1, 15.0), (2, 15.0)],
            }]
        );
    }
}

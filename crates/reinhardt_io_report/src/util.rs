//! Stateless helper utilities used by the report writers.

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL};
use crate::spec::{EnumCellValue, ReportError, SpecXlsxSizingPolicy, SpecXlsxValuePolicy};

////////////////////////////////////////////////////////////////////////////////
// #region CellText

/// Policy text for `NaN`/`Inf`; `None` for finite values.
pub fn convert_nan_inf_to_str(x: f64, value_policy: &SpecXlsxValuePolicy) -> Option<String> {
    if x.is_nan() {
        return Some(value_policy.nan_str.clone());
    }
    if x.is_infinite() {
        return Some(if x.is_sign_positive() {
            value_policy.posinf_str.clone()
        } else {
            value_policy.neginf_str.clone()
        });
    }
    None
}

/// Render a float the way report readers expect: integral values keep one
/// decimal (`2.0`), other values use the shortest round-trip form.
pub fn format_float_text(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{x:.1}")
    } else {
        x.to_string()
    }
}

/// Display text of one cell, used for CSV output and size inference.
pub fn derive_cell_text(value: &EnumCellValue, value_policy: &SpecXlsxValuePolicy) -> String {
    match value {
        EnumCellValue::None => String::new(),
        EnumCellValue::String(s) => s.clone(),
        EnumCellValue::Integer(n) => n.to_string(),
        EnumCellValue::Float(x) => {
            convert_nan_inf_to_str(*x, value_policy).unwrap_or_else(|| format_float_text(*x))
        }
        EnumCellValue::Boolean(true) => "True".to_string(),
        EnumCellValue::Boolean(false) => "False".to_string(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Sizing

/// Inferred width of a cell: UTF-8 byte length of its text, capped.
///
/// Missing cells render as empty text and so contribute width 0, not the
/// width of a `None` placeholder.
pub fn estimate_cell_width(text: &str, policy: &SpecXlsxSizingPolicy) -> usize {
    usize::min(text.len(), policy.width_cell_max)
}

/// Inferred height of a cell: one `height_line` per text line, capped.
pub fn estimate_cell_height(text: &str, policy: &SpecXlsxSizingPolicy) -> usize {
    usize::min(
        text.split('\n').count() * policy.height_line,
        policy.height_cell_max,
    )
}

/// Reject sizing policies that would produce zero-sized rows or columns.
pub fn validate_policy_sizing(policy: &SpecXlsxSizingPolicy) -> Result<(), ReportError> {
    if policy.width_cell_max == 0 {
        return Err(ReportError::InvalidPolicy(
            "policy_sizing.width_cell_max must be >= 1.".to_string(),
        ));
    }
    if policy.height_line == 0 {
        return Err(ReportError::InvalidPolicy(
            "policy_sizing.height_line must be >= 1.".to_string(),
        ));
    }
    if policy.height_cell_max < policy.height_line {
        return Err(ReportError::InvalidPolicy(
            "policy_sizing.height_cell_max must be >= policy_sizing.height_line.".to_string(),
        ));
    }
    if policy.width_cell_max + policy.width_cell_padding > 255 {
        return Err(ReportError::InvalidPolicy(
            "policy_sizing.width_cell_max + width_cell_padding must be <= 255.".to_string(),
        ));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Create suffixed sheet name (`base_2`, `base_3`, ...), respecting length cap.
pub fn create_sheet_identifier(base_name: &str, part_idx_1based: usize) -> String {
    let c_sheet_name_suffix = format!("_{part_idx_1based}");
    let n_len_base_name_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_sheet_name_suffix.len());

    let c_sheet_name_base: String = base_name
        .chars()
        .take(usize::max(1, n_len_base_name_max))
        .collect();

    format!("{c_sheet_name_base}{c_sheet_name_suffix}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ResponseHeaders

/// Ensure `filename` can be embedded in a quoted header parameter.
pub fn validate_filename(filename: &str) -> Result<(), ReportError> {
    if filename
        .chars()
        .any(|chr| matches!(chr, '"' | '\\' | '\r' | '\n'))
    {
        return Err(ReportError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// `attachment; filename="<filename>.<extension>"`.
pub fn derive_content_disposition(filename: &str, extension: &str) -> String {
    format!("attachment; filename=\"{filename}.{extension}\"")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_text_matches_report_conventions() {
        let policy = SpecXlsxValuePolicy::default();
        assert_eq!(derive_cell_text(&EnumCellValue::None, &policy), "");
        assert_eq!(derive_cell_text(&EnumCellValue::Integer(-4), &policy), "-4");
        assert_eq!(derive_cell_text(&EnumCellValue::Float(2.0), &policy), "2.0");
        assert_eq!(derive_cell_text(&EnumCellValue::Float(0.125), &policy), "0.125");
        assert_eq!(derive_cell_text(&EnumCellValue::Float(f64::NAN), &policy), "NaN");
        assert_eq!(
            derive_cell_text(&EnumCellValue::Float(f64::NEG_INFINITY), &policy),
            "-Inf"
        );
        assert_eq!(derive_cell_text(&EnumCellValue::Boolean(true), &policy), "True");
    }

    #[test]
    fn sizes_are_capped() {
        let policy = SpecXlsxSizingPolicy::default();
        assert_eq!(estimate_cell_width("abc", &policy), 3);
        assert_eq!(estimate_cell_width("é", &policy), 2);
        assert_eq!(estimate_cell_width(&"x".repeat(500), &policy), 118);

        assert_eq!(estimate_cell_height("", &policy), 15);
        assert_eq!(estimate_cell_height("a\nb\nc", &policy), 45);
        assert_eq!(estimate_cell_height(&"\n".repeat(20), &policy), 90);
    }

    #[test]
    fn sizing_policy_validation() {
        assert!(validate_policy_sizing(&SpecXlsxSizingPolicy::default()).is_ok());

        let policy = SpecXlsxSizingPolicy {
            height_line: 0,
            ..SpecXlsxSizingPolicy::default()
        };
        assert!(matches!(
            validate_policy_sizing(&policy),
            Err(ReportError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn sheet_names_are_sanitized_and_suffixed() {
        assert_eq!(sanitize_sheet_name("Q1/Q2 [draft]", "_"), "Q1_Q2 _draft_");
        assert_eq!(sanitize_sheet_name("   ", "_"), "Sheet");
        assert_eq!(sanitize_sheet_name(&"n".repeat(40), "_").len(), 31);

        assert_eq!(create_sheet_identifier("Sheet", 2), "Sheet_2");
        assert_eq!(create_sheet_identifier(&"n".repeat(31), 12).len(), 31);
    }

    #[test]
    fn filenames_with_header_breaking_chars_are_rejected() {
        assert!(validate_filename("polls_report_may_1_2016").is_ok());
        assert!(validate_filename("bad\"name").is_err());
        assert!(validate_filename("bad\nname").is_err());
        assert_eq!(
            derive_content_disposition("report", "csv"),
            "attachment; filename=\"report.csv\""
        );
    }
}

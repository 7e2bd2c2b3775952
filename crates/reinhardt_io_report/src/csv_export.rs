//! CSV export of row-major tables.

use csv::WriterBuilder;
use tracing::debug;

use crate::spec::{EnumCellValue, ReportError, SpecXlsxValuePolicy};
use crate::util::derive_cell_text;

/// Encode `table` as CSV bytes.
///
/// Rows may have different lengths. Cells are rendered with the same text
/// rules used for XLSX sizing; non-finite floats use `value_policy`.
pub fn write_csv<T, R, C>(
    table: T,
    value_policy: &SpecXlsxValuePolicy,
) -> Result<Vec<u8>, ReportError>
where
    T: IntoIterator<Item = R>,
    R: IntoIterator<Item = C>,
    C: Into<EnumCellValue>,
{
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

    let mut n_rows = 0usize;
    for row in table {
        let l_texts: Vec<String> = row
            .into_iter()
            .map(|cell| derive_cell_text(&cell.into(), value_policy))
            .collect();
        writer.write_record(&l_texts)?;
        n_rows += 1;
    }

    let v_bytes = writer
        .into_inner()
        .map_err(|err| ReportError::Io(err.into_error()))?;
    debug!(n_rows, n_bytes = v_bytes.len(), "csv table written");
    Ok(v_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_are_written_with_report_cell_text() {
        let table: Vec<Vec<EnumCellValue>> = vec![
            vec!["question".into(), "votes".into(), "share".into()],
            vec!["What's up?".into(), 3_i64.into(), 0.5.into()],
            vec!["Done, finally".into(), EnumCellValue::None],
            vec![true.into()],
        ];

        let v_bytes = write_csv(table, &SpecXlsxValuePolicy::default()).expect("csv");
        assert_eq!(
            String::from_utf8(v_bytes).expect("utf8"),
            "question,votes,share\nWhat's up?,3,0.5\n\"Done, finally\",\nTrue\n"
        );
    }

    #[test]
    fn empty_table_produces_empty_body() {
        let v_bytes =
            write_csv(Vec::<Vec<&str>>::new(), &SpecXlsxValuePolicy::default()).expect("csv");
        assert!(v_bytes.is_empty());
    }

    #[test]
    fn non_finite_floats_follow_the_value_policy() {
        let value_policy = SpecXlsxValuePolicy {
            nan_str: "n/a".to_string(),
            posinf_str: "+inf".to_string(),
            neginf_str: "-inf".to_string(),
        };
        let v_bytes = write_csv(
            vec![vec![f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1.5]],
            &value_policy,
        )
        .expect("csv");
        assert_eq!(
            String::from_utf8(v_bytes).expect("utf8"),
            "n/a,+inf,-inf,1.5\n"
        );
    }
}

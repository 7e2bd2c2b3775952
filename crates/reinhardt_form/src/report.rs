//! Report picker form.

use crate::conf::{C_REPORT_SELECTOR_FIELD_NAME, C_REPORT_SELECTOR_PROMPT};
use crate::spec::{EnumFormFieldKind, SpecForm, SpecFormField, TupChoice};

/// Form with a `get_reports` dropdown: an empty prompt option followed by one
/// `(key, name)` option per report, in input order.
pub fn build_report_selector<I, K, N>(reports: I) -> SpecForm
where
    I: IntoIterator<Item = (K, N)>,
    K: Into<String>,
    N: Into<String>,
{
    let l_choices: Vec<TupChoice> = std::iter::once((
        String::new(),
        C_REPORT_SELECTOR_PROMPT.to_string(),
    ))
    .chain(
        reports
            .into_iter()
            .map(|(key, name)| (key.into(), name.into())),
    )
    .collect();

    let mut form = SpecForm::default();
    form.fields.upsert(SpecFormField::new(
        C_REPORT_SELECTOR_FIELD_NAME,
        EnumFormFieldKind::Choice { choices: l_choices },
    ));
    form
}

//! `reinhardt_form` v1:
//! Form field collections built from entity schemas.
//!
//! Modules:
//! - `conf`       : constants and date/time format settings
//! - `spec`       : fields, widgets, forms and errors
//! - `field`      : model field -> form field derivation, field config
//! - `model_form` : schema-driven forms
//! - `search`     : search forms
//! - `report`     : report selector
pub mod conf;
pub mod field;
pub mod model_form;
pub mod report;
pub mod search;
pub mod spec;

pub use conf::SpecFormSettings;
pub use field::{
    FormfieldCallback, apply_field_config, datetime_formfield_callback, derive_formfield,
    derive_label,
};
pub use model_form::{ModelFormBuilder, SpecModelFormMeta};
pub use report::build_report_selector;
pub use search::{ModelSearchFormBuilder, build_simple_search_form};
pub use spec::{
    EnumFormFieldKind, EnumWidget, FormError, SpecForm, SpecFormField, SpecFormFields, TupChoice,
};

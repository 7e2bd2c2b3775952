//! Form constants and settings.

use serde::Deserialize;

/// Display format of date widgets.
pub const C_DEFAULT_DATEFIELD_FORMAT: &str = "%m/%d/%Y";
/// Accepted input format of time fields.
pub const C_DEFAULT_TIMEFIELD_FORMAT: &str = "%I:%M %p";
/// Accepted input format of datetime fields.
pub const C_DEFAULT_DATETIMEFIELD_FORMAT: &str = "%m/%d/%Y %I:%M %p";

pub const C_ENV_DEFAULT_DATEFIELD_FORMAT: &str = "REINHARDT_DEFAULT_DATEFIELD_FORMAT";
pub const C_ENV_DEFAULT_TIMEFIELD_FORMAT: &str = "REINHARDT_DEFAULT_TIMEFIELD_FORMAT";
pub const C_ENV_DEFAULT_DATETIMEFIELD_FORMAT: &str = "REINHARDT_DEFAULT_DATETIMEFIELD_FORMAT";

/// Name and max length of the simple search field.
pub const C_SEARCH_FIELD_NAME: &str = "search";
pub const N_SEARCH_MAX_LENGTH: usize = 200;

/// Name and prompt of the report selector field.
pub const C_REPORT_SELECTOR_FIELD_NAME: &str = "get_reports";
pub const C_REPORT_SELECTOR_PROMPT: &str = "Select Report";

/// Null-boolean select labels used when none are given.
pub const C_NULL_LABEL_DEFAULT: &str = "Unknown";
pub const C_TRUE_LABEL_DEFAULT: &str = "True";
pub const C_FALSE_LABEL_DEFAULT: &str = "False";

/// Date/time formats applied by the default formfield callback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpecFormSettings {
    pub default_datefield_format: String,
    pub default_timefield_format: String,
    pub default_datetimefield_format: String,
}

impl Default for SpecFormSettings {
    fn default() -> Self {
        Self {
            default_datefield_format: C_DEFAULT_DATEFIELD_FORMAT.to_string(),
            default_timefield_format: C_DEFAULT_TIMEFIELD_FORMAT.to_string(),
            default_datetimefield_format: C_DEFAULT_DATETIMEFIELD_FORMAT.to_string(),
        }
    }
}

impl SpecFormSettings {
    /// Read settings from `REINHARDT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or blank values keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            default_datefield_format: read(
                C_ENV_DEFAULT_DATEFIELD_FORMAT,
                C_DEFAULT_DATEFIELD_FORMAT,
            ),
            default_timefield_format: read(
                C_ENV_DEFAULT_TIMEFIELD_FORMAT,
                C_DEFAULT_TIMEFIELD_FORMAT,
            ),
            default_datetimefield_format: read(
                C_ENV_DEFAULT_DATETIMEFIELD_FORMAT,
                C_DEFAULT_DATETIMEFIELD_FORMAT,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_from_lookup_override_only_given_formats() {
        let settings = SpecFormSettings::from_lookup(|key| {
            (key == C_ENV_DEFAULT_TIMEFIELD_FORMAT).then(|| "%H:%M".to_string())
        });
        assert_eq!(
            settings,
            SpecFormSettings {
                default_timefield_format: "%H:%M".to_string(),
                ..SpecFormSettings::default()
            }
        );
        assert_eq!(settings.default_datefield_format, "%m/%d/%Y");
    }

    #[test]
    fn settings_deserialize_partial_documents() {
        let settings: SpecFormSettings =
            serde_json::from_str(r#"{"default_datefield_format": "%Y-%m-%d"}"#).expect("parse");
        assert_eq!(settings.default_datefield_format, "%Y-%m-%d");
        assert_eq!(settings.default_datetimefield_format, "%m/%d/%Y %I:%M %p");
    }
}

//! Text normalization helpers.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static RE_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("static pattern"));
static RE_SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("static pattern"));

/// Convert `value` to a lowercase ASCII identifier joined by underscores.
///
/// Accents are decomposed and dropped, characters other than word
/// characters, whitespace and `-` are removed, surrounding whitespace is
/// trimmed and every run of `-`/whitespace becomes one `_`.
///
/// ```
/// assert_eq!(
///     reinhardt_util::snakify("polls-report May 1, 2016"),
///     "polls_report_may_1_2016"
/// );
/// ```
pub fn snakify(value: &str) -> String {
    let c_ascii: String = value.nfkd().filter(char::is_ascii).collect();
    let c_word = RE_NON_WORD.replace_all(&c_ascii, "");
    let c_lower = c_word.trim().to_lowercase();
    RE_SEPARATOR_RUN.replace_all(&c_lower, "_").into_owned()
}

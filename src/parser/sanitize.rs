//! Text cleanup for extracted table cells
//!
//! The portal nests value text inside spans and paragraphs, so a naive text
//! collection picks up stray newlines and runs of spaces.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Collapse internal whitespace runs to single spaces and trim the ends
///
/// # Examples
///
/// ```
/// use parinaam::parser::sanitize::clean_cell_text;
///
/// assert_eq!(clean_cell_text("  APPLIED \n  MECHANICS "), "APPLIED MECHANICS");
/// ```
pub fn clean_cell_text(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}

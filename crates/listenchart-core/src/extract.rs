//! Listener count extraction from stored blobs.
//!
//! Upstream stores each day's profile response as a JSON document that was
//! string-encoded once more before being written, so the field we want shows
//! up as `"lastMonthListeners\":12345` (note the escaped closing quote).
//!
//! Known fragility: this is a textual match, not a parse. If upstream changes
//! its quoting or escaping, every day silently becomes "no data".

use lazy_static::lazy_static;
use regex::Regex;

/// Literal text preceding the digits, exactly as it appears in stored blobs.
pub const MARKER: &str = r#""lastMonthListeners\":"#;

lazy_static! {
    // ASCII digits only; a Unicode `\d` would swallow e.g. Arabic-Indic digits.
    static ref LISTENERS_RE: Option<Regex> =
        Regex::new(&format!(r"{}([0-9]+)", regex::escape(MARKER))).ok();
}

/// Extract the listener count from the first marker directly followed by
/// ASCII digits.
///
/// Returns `None` if no marker is followed by digits, or if the first such
/// digit run does not fit in a `u64`.
pub fn last_month_listeners(raw: &str) -> Option<u64> {
    let caps = LISTENERS_RE.as_ref()?.captures(raw)?;
    caps.get(1)?.as_str().parse().ok()
}

/// `(value, found)` view of an extraction; `value` is 0 when nothing was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
    pub value: u64,
    pub found: bool,
}

impl From<Option<u64>> for Extraction {
    fn from(v: Option<u64>) -> Self {
        match v {
            Some(value) => Self { value, found: true },
            None => Self { value: 0, found: false },
        }
    }
}

//! Zone code normalization
//!
//! Upstream datasets spell the same district differently
//! (`"RH-2"`, `"rh-2"`, `"RH-2 (Residential House, Two-Family)"`).
//! Codes are compared only after normalization.

use std::sync::OnceLock;

use regex::Regex;

fn trailing_suffix() -> &'static Regex {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    SUFFIX.get_or_init(|| Regex::new(r"\s*\([^)]*\)\s*$").expect("suffix pattern is valid"))
}

/// Normalize a zone code for matching: strip trailing parenthesized
/// suffixes, trim, lower-case.
///
/// Suffixes are stripped until none remain, so the result is a fixed point.
pub fn normalize_zone_code(code: &str) -> String {
    let suffix = trailing_suffix();
    let mut stripped = code;
    while let Some(m) = suffix.find(stripped) {
        stripped = &stripped[..m.start()];
    }
    stripped.trim().to_lowercase()
}

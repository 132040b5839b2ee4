//! Zone code → rule lookup
//!
//! Pure and deterministic: a linear scan over the in-memory catalog.

use super::catalog::{RulesCatalog, ZoningRule};
use super::normalize::normalize_zone_code;

pub const NO_ZONING_DISTRICT: &str = "No zoning district found.";

/// Outcome of a rule lookup: the rule, or the reason there is none
#[derive(Debug, Clone, PartialEq)]
pub enum RuleMatch<'a> {
    Matched(&'a ZoningRule),
    /// No code to look up (absent or blank)
    NoZoningDistrict,
    /// A code was given but nothing in the catalog matches it.
    /// Carries the code as received, not normalized.
    NoRulesForZone(String),
}

impl<'a> RuleMatch<'a> {
    pub fn rule(&self) -> Option<&'a ZoningRule> {
        match self {
            Self::Matched(rule) => Some(*rule),
            _ => None,
        }
    }

    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Self::Matched(_) => None,
            Self::NoZoningDistrict => Some(NO_ZONING_DISTRICT.to_string()),
            Self::NoRulesForZone(code) => Some(format!("No rules found for zone \"{}\".", code)),
        }
    }
}

impl RulesCatalog {
    /// Look up the rules for a zone code
    pub fn match_rule(&self, zone_code: Option<&str>) -> RuleMatch<'_> {
        let code = match zone_code {
            Some(code) if !code.trim().is_empty() => code,
            _ => return RuleMatch::NoZoningDistrict,
        };

        match self.find_normalized(&normalize_zone_code(code)) {
            Some(rule) => RuleMatch::Matched(rule),
            None => RuleMatch::NoRulesForZone(code.to_string()),
        }
    }
}

//! Zoning rules catalog and matcher
//!
//! - `catalog`: the static, versioned rule table and its load-time validation
//! - `normalize`: zone code normalization shared by catalog and lookups
//! - `matcher`: code → rule lookup with a diagnostic when nothing matches

pub mod catalog;
pub mod matcher;
pub mod normalize;

pub use catalog::{RulesCatalog, ZoningRule};
pub use matcher::{RuleMatch, NO_ZONING_DISTRICT};
pub use normalize::normalize_zone_code;

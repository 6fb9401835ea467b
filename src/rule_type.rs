//! Rule matcher type definitions.

use std::fmt;

/// RuleType is the matcher keyword at the head of a rule line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    /// Match against a named rule-provider
    RuleSet,
    /// Match against a geosite category
    GeoSite,
    /// Match against a GeoIP country or list
    GeoIP,
    /// Catch-all rule, always last
    Match,
}

impl RuleType {
    /// Parse a rule type from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "RULE-SET" | "RULESET" => Some(RuleType::RuleSet),
            "GEOSITE" => Some(RuleType::GeoSite),
            "GEOIP" => Some(RuleType::GeoIP),
            "MATCH" => Some(RuleType::Match),
            _ => None,
        }
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::RuleSet => "RULE-SET",
            RuleType::GeoSite => "GEOSITE",
            RuleType::GeoIP => "GEOIP",
            RuleType::Match => "MATCH",
        }
    }

    /// Whether rules of this type carry a matcher value.
    pub fn has_value(&self) -> bool {
        !matches!(self, RuleType::Match)
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

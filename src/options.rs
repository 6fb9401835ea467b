//! Generator options: feature flags and per-category rule switches.

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Default category switches, in declaration order.
///
/// Keys are rule matcher values, so they are case-sensitive.
const DEFAULT_RULE_OPTIONS: &[(&str, bool)] = &[
    ("ADBlock", true),
    ("TruthSocial", false),
    ("SogouInput", false),
    ("StaticResources", false),
    ("CDNResources", false),
    ("AI", true),
    ("TikTok", false),
    ("EHentai", false),
    ("SteamFix", false),
    ("GoogleFCM", false),
    ("AdditionalFilter", true),
    ("AdditionalCDNResources", false),
    ("Crypto", false),
    ("HamiVideo", true),
    ("TELEGRAM", false),
    ("YOUTUBE", false),
    ("NETFLIX", false),
    ("SPOTIFY", false),
    ("BAHAMUT", false),
    ("PIKPAK", false),
    ("BILIBILI", false),
];

/// Parse a loosely-typed boolean argument.
///
/// `"true"` in any case and `"1"` are true; everything else is false.
pub fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

/// Parse a YAML value as a boolean argument.
///
/// Booleans pass through, strings go through [`parse_bool`], anything else
/// is false.
pub fn parse_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => parse_bool(s),
        _ => false,
    }
}

/// Per-category rule switches.
///
/// A category absent from the table counts as enabled; only an explicit
/// `false` turns a rule off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOptions {
    entries: Vec<(String, bool)>,
}

impl RuleOptions {
    /// An empty table: every category enabled.
    pub fn all_enabled() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Look up a category switch.
    pub fn get(&self, category: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, enabled)| *enabled)
    }

    /// Returns true only if the category is explicitly switched off.
    pub fn is_disabled(&self, category: &str) -> bool {
        self.get(category) == Some(false)
    }

    /// Set a category switch, keeping its original position if present.
    pub fn set(&mut self, category: impl Into<String>, enabled: bool) {
        let category = category.into();
        match self.entries.iter_mut().find(|(name, _)| *name == category) {
            Some(entry) => entry.1 = enabled,
            None => self.entries.push((category, enabled)),
        }
    }

    /// Switch every known category off.
    pub fn disable_all(&mut self) {
        for entry in &mut self.entries {
            entry.1 = false;
        }
    }

    /// Overlay switches from a YAML mapping of category to boolean.
    pub fn merge_yaml(&mut self, content: &str) -> Result<()> {
        let mapping: Mapping = serde_yaml::from_str(content)?;
        for (key, value) in &mapping {
            let category = key
                .as_str()
                .ok_or_else(|| Error::InvalidOption(format!("non-string rule category: {key:?}")))?;
            let enabled = match value {
                Value::Bool(_) | Value::String(_) => parse_flag(value),
                other => {
                    return Err(Error::InvalidOption(format!(
                        "rule category {category} expects a boolean, got {other:?}"
                    )))
                }
            };
            self.set(category, enabled);
        }
        Ok(())
    }

    /// Iterate over switches in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            entries: DEFAULT_RULE_OPTIONS
                .iter()
                .map(|(name, enabled)| (name.to_string(), *enabled))
                .collect(),
        }
    }
}

/// Generator options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Region groups use `load-balance` instead of `url-test`
    pub load_balance: bool,
    /// Emit front-proxy and landing groups; strip ISP nodes from region groups
    pub landing: bool,
    /// Enable IPv6 in DNS and runtime settings
    pub ipv6: bool,
    /// Emit runtime listener settings for a standalone client
    pub full: bool,
    /// Keep TCP keep-alive on in standalone mode
    pub keep_alive: bool,
    /// Per-category rule switches
    pub rules: RuleOptions,
}

impl Options {
    /// Parse Sub-Store style arguments, e.g. `landing=true&ipv6=1`.
    ///
    /// A bare key counts as true. Unknown keys are ignored with a warning.
    pub fn from_query(query: &str) -> Result<Self> {
        let mut options = Self::default();
        options.apply_query(query)?;
        Ok(options)
    }

    /// Apply Sub-Store style arguments on top of the current values.
    pub fn apply_query(&mut self, query: &str) -> Result<()> {
        let query = query.trim_start_matches(['#', '?']);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key.trim(), parse_bool(value.trim())),
                None => (pair.trim(), true),
            };
            if key.is_empty() {
                return Err(Error::InvalidOption(format!("empty key in `{pair}`")));
            }
            self.set_flag(key, value);
        }
        Ok(())
    }

    /// Read flags from a YAML mapping such as a script's argument object.
    pub fn from_mapping(mapping: &Mapping) -> Self {
        let mut options = Self::default();
        for (key, value) in mapping {
            if let Some(key) = key.as_str() {
                options.set_flag(key, parse_flag(value));
            }
        }
        options
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        match key {
            "loadbalance" => self.load_balance = value,
            "landing" => self.landing = value,
            "ipv6" => self.ipv6 = value,
            "full" => self.full = value,
            "keepalive" => self.keep_alive = value,
            other => log::warn!("Ignoring unknown option: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("True"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("yes"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(&Value::Bool(true)));
        assert!(!parse_flag(&Value::Bool(false)));
        assert!(parse_flag(&Value::from("1")));
        assert!(!parse_flag(&Value::from(1)));
        assert!(!parse_flag(&Value::Null));
    }

    #[test]
    fn test_from_query() {
        let options = Options::from_query("loadbalance=true&landing=1&ipv6=false&full").unwrap();
        assert!(options.load_balance);
        assert!(options.landing);
        assert!(!options.ipv6);
        assert!(options.full);
        assert!(!options.keep_alive);
        assert_eq!(options.rules, RuleOptions::default());
    }

    #[test]
    fn test_from_query_ignores_unknown_and_prefix() {
        let options = Options::from_query("#keepalive=TRUE&color=blue&&").unwrap();
        assert!(options.keep_alive);
        assert!(Options::from_query("=true").is_err());
    }

    #[test]
    fn test_from_mapping() {
        let mapping: Mapping = serde_yaml::from_str("landing: true\nipv6: \"1\"\nfull: 3\n").unwrap();
        let options = Options::from_mapping(&mapping);
        assert!(options.landing);
        assert!(options.ipv6);
        assert!(!options.full);
    }

    #[test]
    fn test_default_rule_options() {
        let rules = RuleOptions::default();
        assert_eq!(rules.get("ADBlock"), Some(true));
        assert_eq!(rules.get("TELEGRAM"), Some(false));
        assert_eq!(rules.get("telegram"), None);
        assert!(rules.is_disabled("NETFLIX"));
        assert!(!rules.is_disabled("tvb"));
        assert_eq!(rules.iter().count(), DEFAULT_RULE_OPTIONS.len());
    }

    #[test]
    fn test_rule_options_set_keeps_order() {
        let mut rules = RuleOptions::default();
        rules.set("TELEGRAM", true);
        rules.set("Custom", false);
        let names: Vec<_> = rules.iter().map(|(name, _)| name).collect();
        assert_eq!(names.iter().position(|n| *n == "TELEGRAM"), Some(14));
        assert_eq!(names.last(), Some(&"Custom"));
        assert_eq!(rules.get("TELEGRAM"), Some(true));
    }

    #[test]
    fn test_merge_yaml() {
        let mut rules = RuleOptions::default();
        rules
            .merge_yaml("YOUTUBE: true\nADBlock: \"false\"\nNewCategory: false\n")
            .unwrap();
        assert_eq!(rules.get("YOUTUBE"), Some(true));
        assert_eq!(rules.get("ADBlock"), Some(false));
        assert_eq!(rules.get("NewCategory"), Some(false));

        assert!(rules.merge_yaml("AI: [1, 2]\n").is_err());
        assert!(rules.merge_yaml("- AI\n").is_err());
    }

    #[test]
    fn test_disable_all() {
        let mut rules = RuleOptions::default();
        rules.disable_all();
        assert!(rules.iter().all(|(_, enabled)| !enabled));
    }
}

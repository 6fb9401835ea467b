//! Traffic classification rules and rule-providers.
//!
//! Every rule belongs to the category named by its matcher value. A rule is
//! kept unless that category is switched off in [`RuleOptions`].
//!
//! Switching a category off also prunes a group, but only when the rule's
//! target group has the same name as the category, compared
//! case-insensitively. `TELEGRAM` disables the `Telegram` group, while
//! `StaticResources` leaves `静态资源` in place. Name equality is the only
//! link between rules and groups.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

use crate::group::names;
use crate::options::RuleOptions;
use crate::rule_type::RuleType;
use crate::rule_type::RuleType::{GeoIP, GeoSite, Match, RuleSet};

/// One static rule line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleEntry {
    pub rule_type: RuleType,
    /// Matcher value, also the category key; empty for `MATCH`
    pub value: &'static str,
    /// Target group name or terminal action
    pub target: &'static str,
    /// Skip DNS resolution for IP matchers
    pub no_resolve: bool,
}

impl RuleEntry {
    const fn new(rule_type: RuleType, value: &'static str, target: &'static str) -> Self {
        Self {
            rule_type,
            value,
            target,
            no_resolve: false,
        }
    }

    const fn no_resolve(mut self) -> Self {
        self.no_resolve = true;
        self
    }

    /// Category key used to switch this rule, `None` for `MATCH`.
    pub fn category(&self) -> Option<&'static str> {
        self.rule_type.has_value().then_some(self.value)
    }

    /// Returns true if the category and target share a name, ignoring case.
    pub fn targets_own_group(&self) -> bool {
        self.category()
            .map(|c| c.to_lowercase() == self.target.to_lowercase())
            .unwrap_or(false)
    }
}

impl fmt::Display for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rule_type)?;
        if self.rule_type.has_value() {
            write!(f, ",{}", self.value)?;
        }
        write!(f, ",{}", self.target)?;
        if self.no_resolve {
            write!(f, ",no-resolve")?;
        }
        Ok(())
    }
}

/// Static rules, in evaluation order.
pub static RULES: &[RuleEntry] = &[
    RuleEntry::new(RuleSet, "HamiVideo", names::HAMI_VIDEO),
    RuleEntry::new(RuleSet, "ADBlock", names::AD_BLOCK),
    RuleEntry::new(RuleSet, "AdditionalFilter", names::AD_BLOCK),
    RuleEntry::new(RuleSet, "SogouInput", "搜狗输入法"),
    RuleEntry::new(RuleSet, "TruthSocial", "Truth Social"),
    RuleEntry::new(RuleSet, "StaticResources", names::STATIC_RESOURCES),
    RuleEntry::new(RuleSet, "CDNResources", names::STATIC_RESOURCES),
    RuleEntry::new(RuleSet, "AdditionalCDNResources", names::STATIC_RESOURCES),
    RuleEntry::new(RuleSet, "AI", names::AI),
    RuleEntry::new(RuleSet, "Crypto", "Crypto"),
    RuleEntry::new(RuleSet, "EHentai", "E-Hentai"),
    RuleEntry::new(RuleSet, "TikTok", "TikTok"),
    RuleEntry::new(RuleSet, "SteamFix", names::DIRECT),
    RuleEntry::new(RuleSet, "GoogleFCM", names::DIRECT),
    RuleEntry::new(GeoSite, "tvb", names::TVB),
    RuleEntry::new(GeoSite, "GOOGLE-PLAY@CN", names::DIRECT),
    RuleEntry::new(GeoSite, "TELEGRAM", names::TELEGRAM),
    RuleEntry::new(GeoSite, "YOUTUBE", names::YOUTUBE),
    RuleEntry::new(GeoSite, "NETFLIX", names::NETFLIX),
    RuleEntry::new(GeoSite, "SPOTIFY", names::SPOTIFY),
    RuleEntry::new(GeoSite, "BAHAMUT", "Bahamut"),
    RuleEntry::new(GeoSite, "BILIBILI", names::BILIBILI),
    RuleEntry::new(GeoSite, "MICROSOFT@CN", names::DIRECT),
    RuleEntry::new(GeoSite, "PIKPAK", names::PIKPAK),
    RuleEntry::new(GeoSite, "GFW", names::SELECT),
    RuleEntry::new(GeoSite, "CN", names::DIRECT),
    RuleEntry::new(GeoSite, "PRIVATE", names::DIRECT),
    RuleEntry::new(GeoIP, "NETFLIX", names::NETFLIX).no_resolve(),
    RuleEntry::new(GeoIP, "TELEGRAM", names::TELEGRAM).no_resolve(),
    RuleEntry::new(GeoIP, "CN", names::DIRECT),
    RuleEntry::new(GeoIP, "PRIVATE", names::DIRECT),
    RuleEntry::new(Match, "", names::SELECT),
];

/// Rule-provider fetch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RuleProvider {
    #[serde(rename = "type")]
    pub provider_type: &'static str,
    /// Parse behavior (domain, classical)
    pub behavior: &'static str,
    /// Payload format
    pub format: &'static str,
    /// Refresh interval in seconds
    pub interval: u64,
    pub url: &'static str,
    /// Local cache path
    pub path: &'static str,
}

const PROVIDER_REFRESH: u64 = 86400;

const fn http_provider(behavior: &'static str, url: &'static str, path: &'static str) -> RuleProvider {
    RuleProvider {
        provider_type: "http",
        behavior,
        format: "text",
        interval: PROVIDER_REFRESH,
        url,
        path,
    }
}

/// Known rule-providers keyed by category.
pub static RULE_PROVIDERS: &[(&str, RuleProvider)] = &[
    (
        "ADBlock",
        http_provider(
            "domain",
            "https://adrules.top/adrules_domainset.txt",
            "./ruleset/ADBlock.txt",
        ),
    ),
    (
        "StaticResources",
        http_provider(
            "domain",
            "https://ruleset.skk.moe/Clash/domainset/cdn.txt",
            "./ruleset/StaticResources.txt",
        ),
    ),
    (
        "CDNResources",
        http_provider(
            "classical",
            "https://ruleset.skk.moe/Clash/non_ip/cdn.txt",
            "./ruleset/CDNResources.txt",
        ),
    ),
    (
        "AI",
        http_provider(
            "classical",
            "https://ruleset.skk.moe/Clash/non_ip/ai.txt",
            "./ruleset/AI.txt",
        ),
    ),
    (
        "HamiVideo",
        http_provider(
            "classical",
            "https://cdn.jsdelivr.net/gh/LM-Firefly/Rules@master/Global-Services/HamiVideo.list",
            "./ruleset/HamiVideo.list",
        ),
    ),
    (
        "AdditionalFilter",
        http_provider(
            "classical",
            "https://cdn.jsdelivr.net/gh/powerfullz/override-rules@master/ruleset/AdditionalFilter.list",
            "./ruleset/AdditionalFilter.list",
        ),
    ),
];

/// Ordered rule-provider table, serialized as a mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleProviders(Vec<(&'static str, RuleProvider)>);

impl RuleProviders {
    /// Providers whose category is not switched off.
    pub fn enabled(options: &RuleOptions) -> Self {
        Self(
            RULE_PROVIDERS
                .iter()
                .filter(|(name, _)| !options.is_disabled(name))
                .copied()
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&RuleProvider> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, p)| p)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for RuleProviders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, provider) in &self.0 {
            map.serialize_entry(name, provider)?;
        }
        map.end()
    }
}

/// Group names pruned because their own category was switched off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisabledGroups(Vec<String>);

impl DisabledGroups {
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|g| g == name)
    }

    fn insert(&mut self, name: &str) {
        if !self.contains(name) {
            self.0.push(name.to_string());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome of filtering the static rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredRules {
    /// Kept rules, in evaluation order
    pub rules: Vec<RuleEntry>,
    /// Groups to prune from the output
    pub disabled_groups: DisabledGroups,
}

impl FilteredRules {
    /// Rendered rule lines.
    pub fn lines(&self) -> Vec<String> {
        self.rules.iter().map(ToString::to_string).collect()
    }
}

/// Filter a rule table against the category switches.
pub fn filter_rules(table: &[RuleEntry], options: &RuleOptions) -> FilteredRules {
    let mut filtered = FilteredRules::default();

    for rule in table {
        let enabled = rule.category().map_or(true, |c| !options.is_disabled(c));
        log::debug!("{} , {}", rule, enabled);

        if enabled {
            filtered.rules.push(*rule);
        } else if rule.targets_own_group() {
            filtered.disabled_groups.insert(rule.target);
        }
    }

    log::debug!(
        "Disabled groups: {:?}",
        filtered.disabled_groups.iter().collect::<Vec<_>>()
    );
    filtered
}

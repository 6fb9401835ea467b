//! Proxy group model and synthesis.
//!
//! Groups are built in two passes: [`region`] turns every detected region
//! into a health-checked group, then [`catalogue`] lays out the fixed set of
//! purpose groups around them and prunes what the rule switches disabled.

pub mod catalogue;
pub mod region;

pub use catalogue::{assemble, GroupContext};
pub use region::region_groups;

use serde::Serialize;
use std::fmt;

/// Fixed group names.
pub mod names {
    pub const SELECT: &str = "选择节点";
    pub const MANUAL: &str = "手动选择";
    pub const FRONT_PROXY: &str = "前置代理";
    pub const LANDING: &str = "落地节点";
    pub const FAILOVER: &str = "故障转移";
    pub const STATIC_RESOURCES: &str = "静态资源";
    pub const AI: &str = "AI";
    pub const TELEGRAM: &str = "Telegram";
    pub const YOUTUBE: &str = "YouTube";
    pub const BILIBILI: &str = "Bilibili";
    pub const HAMI_VIDEO: &str = "HamiVideo";
    pub const TVB: &str = "TVB";
    pub const NETFLIX: &str = "Netflix";
    pub const SPOTIFY: &str = "Spotify";
    pub const PIKPAK: &str = "PikPak";
    pub const DIRECT: &str = "直连";
    pub const AD_BLOCK: &str = "广告拦截";
    pub const LOW_COST: &str = "低倍率节点";
    pub const GLOBAL: &str = "GLOBAL";
}

/// Health-check probe shared by url-test and fallback groups.
pub const HEALTH_CHECK_URL: &str = "https://cp.cloudflare.com/generate_204";
/// Probe interval in seconds.
pub const HEALTH_CHECK_INTERVAL: u32 = 180;
/// Latency tolerance in milliseconds.
pub const HEALTH_CHECK_TOLERANCE: u32 = 20;

/// Selection policy of a proxy group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupType {
    /// Manual choice
    Select,
    /// Lowest latency wins
    UrlTest,
    /// Spread connections across members
    LoadBalance,
    /// First healthy member wins
    Fallback,
}

impl GroupType {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupType::Select => "select",
            GroupType::UrlTest => "url-test",
            GroupType::LoadBalance => "load-balance",
            GroupType::Fallback => "fallback",
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A proxy group as the client reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProxyGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_all: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lazy: Option<bool>,
}

impl ProxyGroup {
    /// Create a group with no members and no policy parameters.
    pub fn new(name: impl Into<String>, group_type: GroupType) -> Self {
        Self {
            name: name.into(),
            group_type,
            icon: None,
            include_all: None,
            filter: None,
            exclude_filter: None,
            proxies: None,
            url: None,
            interval: None,
            tolerance: None,
            lazy: None,
        }
    }

    /// Shorthand for a `select` group.
    pub fn select(name: impl Into<String>) -> Self {
        Self::new(name, GroupType::Select)
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Let the client add every subscription node to the group.
    pub fn include_all(mut self) -> Self {
        self.include_all = Some(true);
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_exclude_filter(mut self, filter: impl Into<String>) -> Self {
        self.exclude_filter = Some(filter.into());
        self
    }

    pub fn with_proxies<I, S>(mut self, proxies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proxies = Some(proxies.into_iter().map(Into::into).collect());
        self
    }

    /// Set only the probe URL.
    pub fn with_probe_url(mut self) -> Self {
        self.url = Some(HEALTH_CHECK_URL.to_string());
        self
    }

    /// Set the full periodic health check: probe, interval, tolerance, eager start.
    pub fn with_health_check(mut self) -> Self {
        self.url = Some(HEALTH_CHECK_URL.to_string());
        self.interval = Some(HEALTH_CHECK_INTERVAL);
        self.tolerance = Some(HEALTH_CHECK_TOLERANCE);
        self.lazy = Some(false);
        self
    }

    /// Explicit members, empty when the group relies on `include-all`.
    pub fn members(&self) -> &[String] {
        self.proxies.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_type_serialization() {
        assert_eq!(serde_yaml::to_string(&GroupType::UrlTest).unwrap().trim(), "url-test");
        assert_eq!(
            serde_json::to_string(&GroupType::LoadBalance).unwrap(),
            "\"load-balance\""
        );
        assert_eq!(GroupType::Fallback.to_string(), "fallback");
    }

    #[test]
    fn test_group_skips_unset_fields() {
        let group = ProxyGroup::select("直连").with_proxies(["DIRECT", "选择节点"]);
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["name"], "直连");
        assert_eq!(json["type"], "select");
        assert_eq!(json["proxies"][0], "DIRECT");
        assert!(json.get("url").is_none());
        assert!(json.get("include-all").is_none());
    }

    #[test]
    fn test_health_check_fields() {
        let group = ProxyGroup::new("x", GroupType::UrlTest).with_health_check();
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["url"], HEALTH_CHECK_URL);
        assert_eq!(json["interval"], 180);
        assert_eq!(json["tolerance"], 20);
        assert_eq!(json["lazy"], false);
    }

    #[test]
    fn test_members() {
        assert!(ProxyGroup::select("手动选择").include_all().members().is_empty());
        let group = ProxyGroup::select("TVB").with_proxies(vec!["香港节点".to_string()]);
        assert_eq!(group.members(), ["香港节点"]);
    }
}

//! Region table, node classification and low-cost detection.
//!
//! Classification is an ordered predicate scan: a node is tested against
//! each region pattern in table order and counted for the first one that
//! matches. Nodes carrying an ISP / landing marker are skipped entirely,
//! even when they also carry a region marker.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::ProxyNode;

/// ISP / residential / landing markers, without a case flag.
pub const ISP_MARKERS: &str = "家宽|家庭|家庭宽带|商宽|商业宽带|星链|Starlink|落地";

/// Quota / discount markers, without a case flag.
pub const LOW_COST_MARKERS: &str = r"0\.[0-5]|低倍率|省流|大流量|实验性";

/// Quota / discount markers as written into group filters. The dot is left
/// unescaped, so clients read it as any character.
pub const LOW_COST_FILTER: &str = "0.[0-5]|低倍率|省流|大流量|实验性";

/// A region the generator knows how to group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Display label, also the prefix of the region group name
    pub label: &'static str,
    /// Case-insensitive node name pattern, in client filter syntax
    pub pattern: &'static str,
    /// Icon URL for the region group
    pub icon: &'static str,
}

impl Region {
    /// Name of the group generated for this region.
    pub fn group_name(&self) -> String {
        format!("{}节点", self.label)
    }

    /// Look up a region by its label.
    pub fn by_label(label: &str) -> Option<&'static Region> {
        REGIONS.iter().find(|r| r.label == label)
    }
}

macro_rules! region {
    ($label:literal, $pattern:literal, $icon:literal) => {
        Region {
            label: $label,
            pattern: $pattern,
            icon: concat!("https://cdn.jsdelivr.net/gh/Koolson/Qure@master/IconSet/Color/", $icon, ".png"),
        }
    };
}

/// Known regions, in classification priority order.
pub static REGIONS: &[Region] = &[
    region!("香港", "(?i)香港|港|HK|hk|Hong Kong|HongKong|hongkong|🇭🇰", "Hong_Kong"),
    region!("澳门", "(?i)澳门|MO|Macau|🇲🇴", "Macao"),
    region!("台湾", "(?i)台|新北|彰化|TW|Taiwan|🇹🇼", "Taiwan"),
    region!("新加坡", "(?i)新加坡|坡|狮城|SG|Singapore|🇸🇬", "Singapore"),
    region!("日本", "(?i)日本|川日|东京|大阪|泉日|埼玉|沪日|深日|JP|Japan|🇯🇵", "Japan"),
    region!("韩国", "(?i)KR|Korea|KOR|首尔|韩|韓|🇰🇷", "Korea"),
    region!("美国", "(?i)美国|美|US|United States|🇺🇸", "United_States"),
    region!("加拿大", "(?i)加拿大|Canada|CA|🇨🇦", "Canada"),
    region!("英国", "(?i)英国|United Kingdom|UK|伦敦|London|🇬🇧", "United_Kingdom"),
    region!("澳大利亚", "(?i)澳洲|澳大利亚|AU|Australia|🇦🇺", "Australia"),
    region!("德国", "(?i)德国|德|DE|Germany|🇩🇪", "Germany"),
    region!("法国", "(?i)法国|法|FR|France|🇫🇷", "France"),
    region!("俄罗斯", "(?i)俄罗斯|俄|RU|Russia|🇷🇺", "Russia"),
    region!("泰国", "(?i)泰国|泰|TH|Thailand|🇹🇭", "Thailand"),
    region!("印度", "(?i)印度|IN|India|🇮🇳", "India"),
    region!("马来西亚", "(?i)马来西亚|马来|MY|Malaysia|🇲🇾", "Malaysia"),
];

static COMPILED_REGIONS: Lazy<Vec<(&'static Region, Regex)>> = Lazy::new(|| {
    REGIONS
        .iter()
        .map(|region| (region, Regex::new(region.pattern).unwrap()))
        .collect()
});

static ISP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("(?i){}", ISP_MARKERS)).unwrap());

static LOW_COST_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("(?i){}", LOW_COST_MARKERS)).unwrap());

/// Number of nodes classified into one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionCount {
    pub region: &'static Region,
    pub count: usize,
}

/// Returns true if the name carries an ISP / landing marker.
pub fn is_isp_node(name: &str) -> bool {
    ISP_PATTERN.is_match(name)
}

/// Returns true if the name carries a low-cost marker.
pub fn is_low_cost_node(name: &str) -> bool {
    LOW_COST_PATTERN.is_match(name)
}

/// Find the first region whose pattern matches the name.
///
/// ISP exclusion is not applied here; see [`classify`].
pub fn match_region(name: &str) -> Option<&'static Region> {
    COMPILED_REGIONS
        .iter()
        .find(|(_, regex)| regex.is_match(name))
        .map(|(region, _)| *region)
}

/// Count nodes per region.
///
/// The result only holds regions with at least one node, ordered by the
/// first node that matched each of them.
pub fn classify(nodes: &[ProxyNode]) -> Vec<RegionCount> {
    let mut counts: Vec<RegionCount> = Vec::new();

    for node in nodes {
        let name = node.name();
        if is_isp_node(&name) {
            continue;
        }
        let Some(region) = match_region(&name) else {
            continue;
        };
        match counts.iter_mut().find(|c| c.region.label == region.label) {
            Some(entry) => entry.count += 1,
            None => counts.push(RegionCount { region, count: 1 }),
        }
    }

    counts
}

/// Returns true if any node is marked as low-cost.
pub fn has_low_cost(nodes: &[ProxyNode]) -> bool {
    nodes.iter().any(|node| is_low_cost_node(&node.name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(names: &[&str]) -> Vec<ProxyNode> {
        names.iter().map(|n| ProxyNode::named(*n)).collect()
    }

    fn summary(counts: &[RegionCount]) -> Vec<(&'static str, usize)> {
        counts.iter().map(|c| (c.region.label, c.count)).collect()
    }

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(COMPILED_REGIONS.len(), REGIONS.len());
        assert!(REGIONS.iter().all(|r| r.icon.ends_with(".png")));
    }

    #[test]
    fn test_match_region() {
        assert_eq!(match_region("HK-02").map(|r| r.label), Some("香港"));
        assert_eq!(match_region("🇯🇵 Tokyo").map(|r| r.label), Some("日本"));
        assert_eq!(match_region("us west").map(|r| r.label), Some("美国"));
        assert_eq!(match_region("新加坡 01").map(|r| r.label), Some("新加坡"));
        assert_eq!(match_region("Unknown"), None);
    }

    #[test]
    fn test_first_match_wins() {
        // "香港" also contains "港"; both belong to the first region
        assert_eq!(match_region("香港-台北中转").map(|r| r.label), Some("香港"));
        // "Hong Kong US relay" matches 香港 before 美国
        assert_eq!(match_region("Hong Kong US relay").map(|r| r.label), Some("香港"));
    }

    #[test]
    fn test_classify_example() {
        let counts = classify(&nodes(&["HK-01 家宽", "HK-02", "US-01 0.5x"]));
        assert_eq!(summary(&counts), vec![("香港", 1), ("美国", 1)]);
    }

    #[test]
    fn test_classify_counts_each_node_once() {
        let counts = classify(&nodes(&["JP-01", "JP-02", "HK-01", "JP-03", "Germany 1"]));
        assert_eq!(summary(&counts), vec![("日本", 3), ("香港", 1), ("德国", 1)]);
    }

    #[test]
    fn test_classify_detection_order() {
        let counts = classify(&nodes(&["US-01", "HK-01"]));
        assert_eq!(summary(&counts), vec![("美国", 1), ("香港", 1)]);
    }

    #[test]
    fn test_classify_isp_exclusion() {
        let counts = classify(&nodes(&["HK 家宽", "JP starlink", "US 落地", "SG 商业宽带"]));
        assert!(counts.is_empty());
    }

    #[test]
    fn test_classify_unmatched_is_sparse() {
        let counts = classify(&nodes(&["剩余流量: 100G", "套餐到期"]));
        assert!(counts.is_empty());
        assert!(classify(&[]).is_empty());
    }

    #[test]
    fn test_low_cost_detection() {
        assert!(has_low_cost(&nodes(&["HK-01", "US-01 0.5x"])));
        assert!(has_low_cost(&nodes(&["JP 低倍率"])));
        assert!(has_low_cost(&nodes(&["实验性 SG"])));
        assert!(!has_low_cost(&nodes(&["HK-01", "US-01 1.0x", "JP 0.8x"])));
        assert!(!has_low_cost(&[]));
    }

    #[test]
    fn test_low_cost_numeric_name() {
        let source = crate::node::SourceConfig::parse("proxies:\n  - name: 0.3\n    type: ss\n").unwrap();
        assert!(has_low_cost(&source.proxies));
    }

    #[test]
    fn test_case_folding_is_unicode_aware() {
        // KELVIN SIGN folds to "k"
        assert_eq!(match_region("H\u{212A}-01").map(|r| r.label), Some("香港"));
    }

    #[test]
    fn test_detector_keeps_dot_literal() {
        // 1001 has no literal dot after the zero
        assert!(!is_low_cost_node("HK-1001"));
        assert!(is_low_cost_node("HK-02 0.5x"));
    }

    #[test]
    fn test_region_group_name() {
        let hk = Region::by_label("香港").unwrap();
        assert_eq!(hk.group_name(), "香港节点");
        assert!(Region::by_label("火星").is_none());
    }
}

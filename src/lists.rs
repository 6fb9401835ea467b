//! Base membership lists shared by the purpose groups.

use crate::group::names;
use crate::region::RegionCount;
use crate::Target;

/// The four preference-ordered membership templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseLists {
    /// Candidates of the main selection group
    pub selector: Vec<String>,
    /// Default membership of per-service groups
    pub proxies: Vec<String>,
    /// Membership of services that should go direct first
    pub direct_first: Vec<String>,
    /// Candidates of the failover group
    pub fallback: Vec<String>,
    /// Region group names in detection order
    pub region_groups: Vec<String>,
}

impl BaseLists {
    /// Build the lists from the detected regions and flags.
    pub fn build(landing: bool, low_cost: bool, regions: &[RegionCount]) -> Self {
        let region_groups: Vec<String> = regions
            .iter()
            .filter(|r| r.count > 0)
            .map(|r| r.region.group_name())
            .collect();

        let mut selector = vec![names::FAILOVER.to_string()];
        if landing {
            selector.push(names::LANDING.to_string());
        }
        selector.extend(region_groups.iter().cloned());
        if low_cost {
            selector.push(names::LOW_COST.to_string());
        }
        selector.push(names::MANUAL.to_string());
        selector.push(Target::Direct.to_string());

        let mut proxies = vec![names::SELECT.to_string()];
        proxies.extend(region_groups.iter().cloned());
        if low_cost {
            proxies.push(names::LOW_COST.to_string());
        }
        proxies.push(names::MANUAL.to_string());
        proxies.push(names::DIRECT.to_string());

        // Low-cost ranks after regions but before the selection group here
        let mut direct_first = vec![names::DIRECT.to_string()];
        direct_first.extend(region_groups.iter().cloned());
        if low_cost {
            direct_first.push(names::LOW_COST.to_string());
        }
        direct_first.push(names::SELECT.to_string());
        direct_first.push(names::MANUAL.to_string());

        let mut fallback = Vec::new();
        if landing {
            fallback.push(names::LANDING.to_string());
        }
        fallback.extend(region_groups.iter().cloned());
        if low_cost {
            fallback.push(names::LOW_COST.to_string());
        }
        fallback.push(names::MANUAL.to_string());
        fallback.push(Target::Direct.to_string());

        Self {
            selector,
            proxies,
            direct_first,
            fallback,
            region_groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;

    fn regions(labels: &[&str]) -> Vec<RegionCount> {
        labels
            .iter()
            .map(|l| RegionCount {
                region: Region::by_label(l).unwrap(),
                count: 1,
            })
            .collect()
    }

    #[test]
    fn test_lists_minimal() {
        let lists = BaseLists::build(false, false, &[]);
        assert_eq!(lists.selector, vec!["故障转移", "手动选择", "DIRECT"]);
        assert_eq!(lists.proxies, vec!["选择节点", "手动选择", "直连"]);
        assert_eq!(lists.direct_first, vec!["直连", "选择节点", "手动选择"]);
        assert_eq!(lists.fallback, vec!["手动选择", "DIRECT"]);
        assert!(lists.region_groups.is_empty());
    }

    #[test]
    fn test_lists_with_everything() {
        let lists = BaseLists::build(true, true, &regions(&["日本", "香港"]));
        assert_eq!(
            lists.selector,
            vec!["故障转移", "落地节点", "日本节点", "香港节点", "低倍率节点", "手动选择", "DIRECT"]
        );
        assert_eq!(
            lists.proxies,
            vec!["选择节点", "日本节点", "香港节点", "低倍率节点", "手动选择", "直连"]
        );
        assert_eq!(
            lists.direct_first,
            vec!["直连", "日本节点", "香港节点", "低倍率节点", "选择节点", "手动选择"]
        );
        assert_eq!(
            lists.fallback,
            vec!["落地节点", "日本节点", "香港节点", "低倍率节点", "手动选择", "DIRECT"]
        );
        assert_eq!(lists.region_groups, vec!["日本节点", "香港节点"]);
    }

    #[test]
    fn test_landing_only_touches_selector_and_fallback() {
        let with = BaseLists::build(true, false, &regions(&["美国"]));
        let without = BaseLists::build(false, false, &regions(&["美国"]));
        assert_eq!(with.proxies, without.proxies);
        assert_eq!(with.direct_first, without.direct_first);
        assert_ne!(with.selector, without.selector);
        assert_ne!(with.fallback, without.fallback);
    }

    #[test]
    fn test_zero_count_region_skipped() {
        let mut detected = regions(&["美国", "英国"]);
        detected[1].count = 0;
        let lists = BaseLists::build(false, false, &detected);
        assert_eq!(lists.region_groups, vec!["美国节点"]);
    }
}

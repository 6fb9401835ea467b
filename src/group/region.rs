//! Per-region groups.

use crate::group::{GroupType, ProxyGroup};
use crate::options::Options;
use crate::region::{RegionCount, ISP_MARKERS, LOW_COST_FILTER};

/// Exclusion filter applied to every region group.
///
/// Low-cost nodes are always stripped; ISP / landing nodes only in landing
/// mode. Without landing the filter carries no case flag.
pub fn region_exclude_filter(landing: bool) -> String {
    if landing {
        format!("(?i){}|{}", ISP_MARKERS, LOW_COST_FILTER)
    } else {
        LOW_COST_FILTER.to_string()
    }
}

/// Build one group per detected region, in detection order.
pub fn region_groups(regions: &[RegionCount], options: &Options) -> Vec<ProxyGroup> {
    let exclude = region_exclude_filter(options.landing);
    let group_type = if options.load_balance {
        GroupType::LoadBalance
    } else {
        GroupType::UrlTest
    };

    regions
        .iter()
        .filter(|r| r.count > 0)
        .map(|r| {
            let group = ProxyGroup::new(r.region.group_name(), group_type)
                .with_icon(r.region.icon)
                .include_all()
                .with_filter(r.region.pattern)
                .with_exclude_filter(exclude.as_str());
            if options.load_balance {
                group
            } else {
                group.with_health_check()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;

    fn detected(labels: &[&str]) -> Vec<RegionCount> {
        labels
            .iter()
            .map(|l| RegionCount {
                region: Region::by_label(l).unwrap(),
                count: 2,
            })
            .collect()
    }

    #[test]
    fn test_url_test_groups() {
        let groups = region_groups(&detected(&["香港", "美国"]), &Options::default());
        assert_eq!(groups.len(), 2);

        let hk = &groups[0];
        assert_eq!(hk.name, "香港节点");
        assert_eq!(hk.group_type, GroupType::UrlTest);
        assert_eq!(hk.include_all, Some(true));
        assert_eq!(hk.filter.as_deref(), Some(Region::by_label("香港").unwrap().pattern));
        assert_eq!(hk.exclude_filter.as_deref(), Some("0.[0-5]|低倍率|省流|大流量|实验性"));
        assert_eq!(hk.interval, Some(180));
        assert_eq!(hk.tolerance, Some(20));
        assert_eq!(hk.lazy, Some(false));
        assert!(hk.proxies.is_none());
        assert_eq!(groups[1].name, "美国节点");
    }

    #[test]
    fn test_load_balance_groups_have_no_probe() {
        let options = Options {
            load_balance: true,
            ..Options::default()
        };
        let groups = region_groups(&detected(&["日本"]), &options);
        assert_eq!(groups[0].group_type, GroupType::LoadBalance);
        assert!(groups[0].url.is_none());
        assert!(groups[0].interval.is_none());
        assert!(groups[0].tolerance.is_none());
        assert!(groups[0].lazy.is_none());
    }

    #[test]
    fn test_landing_exclude_filter() {
        let options = Options {
            landing: true,
            ..Options::default()
        };
        let groups = region_groups(&detected(&["台湾"]), &options);
        assert_eq!(
            groups[0].exclude_filter.as_deref(),
            Some("(?i)家宽|家庭|家庭宽带|商宽|商业宽带|星链|Starlink|落地|0.[0-5]|低倍率|省流|大流量|实验性")
        );
    }

    #[test]
    fn test_no_regions_no_groups() {
        assert!(region_groups(&[], &Options::default()).is_empty());
    }
}

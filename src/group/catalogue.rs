//! The fixed catalogue of purpose groups.

use crate::group::{names, GroupType, ProxyGroup};
use crate::lists::BaseLists;
use crate::options::Options;
use crate::region::{ISP_MARKERS, LOW_COST_FILTER};
use crate::rules::DisabledGroups;
use crate::Target;

macro_rules! qure {
    ($icon:literal) => {
        concat!("https://cdn.jsdelivr.net/gh/Koolson/Qure@master/IconSet/Color/", $icon, ".png")
    };
}

const ICON_MANUAL: &str = "https://cdn.jsdelivr.net/gh/shindgewongxj/WHATSINStash@master/icon/select.png";
const ICON_AI: &str = "https://cdn.jsdelivr.net/gh/powerfullz/override-rules@master/icons/chatgpt.png";
const ICON_PIKPAK: &str = "https://cdn.jsdelivr.net/gh/powerfullz/override-rules@master/icons/PikPak.png";
const ICON_HAMI_VIDEO: &str =
    "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcRbp4BM2GCKDyJye3ccL_6poUsz1XJ0mnYUAA&s";

/// Inputs to group assembly.
#[derive(Debug, Clone)]
pub struct GroupContext<'a> {
    pub options: &'a Options,
    pub lists: &'a BaseLists,
    pub low_cost: bool,
    /// Region groups, appended after the purpose groups
    pub region_groups: Vec<ProxyGroup>,
    pub disabled: &'a DisabledGroups,
}

impl GroupContext<'_> {
    fn has_region(&self, label: &str) -> bool {
        let group = format!("{}节点", label);
        self.lists.region_groups.iter().any(|g| *g == group)
    }
}

/// Assemble every group in output order, ending with the catch-all group.
pub fn assemble(ctx: GroupContext<'_>) -> Vec<ProxyGroup> {
    let lists = ctx.lists;
    let landing = ctx.options.landing;
    let has_tw = ctx.has_region("台湾");
    let has_hk = ctx.has_region("香港");

    // Front proxy must not loop back through landing or failover
    let front_proxies: Vec<&String> = lists
        .selector
        .iter()
        .filter(|n| n.as_str() != names::LANDING && n.as_str() != names::FAILOVER)
        .collect();

    let catalogue: Vec<Option<ProxyGroup>> = vec![
        Some(
            ProxyGroup::select(names::SELECT)
                .with_icon(qure!("Proxy"))
                .with_proxies(&lists.selector),
        ),
        Some(
            ProxyGroup::select(names::MANUAL)
                .with_icon(ICON_MANUAL)
                .include_all(),
        ),
        landing.then(|| {
            ProxyGroup::select(names::FRONT_PROXY)
                .with_icon(qure!("Area"))
                .include_all()
                .with_exclude_filter(format!("(?i){}", ISP_MARKERS))
                .with_proxies(front_proxies.iter().map(|n| n.as_str()))
        }),
        landing.then(|| {
            ProxyGroup::select(names::LANDING)
                .with_icon(qure!("Airport"))
                .include_all()
                .with_filter(format!("(?i){}", ISP_MARKERS))
        }),
        Some(
            ProxyGroup::new(names::FAILOVER, GroupType::Fallback)
                .with_icon(qure!("Bypass"))
                .with_proxies(&lists.fallback)
                .with_health_check(),
        ),
        Some(service(names::STATIC_RESOURCES, qure!("Cloudflare"), &lists.proxies)),
        Some(service(names::AI, ICON_AI, &lists.proxies)),
        Some(service(names::TELEGRAM, qure!("Telegram"), &lists.proxies)),
        Some(service(names::YOUTUBE, qure!("YouTube"), &lists.proxies)),
        Some(if has_tw && has_hk {
            service(
                names::BILIBILI,
                qure!("bilibili"),
                &[names::DIRECT, "台湾节点", "香港节点"],
            )
        } else {
            service(names::BILIBILI, qure!("bilibili"), &lists.direct_first)
        }),
        Some(if has_tw {
            service(names::HAMI_VIDEO, ICON_HAMI_VIDEO, &["台湾节点"])
        } else {
            service(names::HAMI_VIDEO, ICON_HAMI_VIDEO, &lists.proxies)
        }),
        Some(if has_hk {
            service(names::TVB, qure!("TVB"), &["香港节点"])
        } else {
            service(names::TVB, qure!("TVB"), &lists.proxies)
        }),
        Some(service(names::NETFLIX, qure!("Netflix"), &lists.proxies)),
        Some(service(names::SPOTIFY, qure!("Spotify"), &lists.proxies)),
        Some(service(names::PIKPAK, ICON_PIKPAK, &lists.proxies)),
        Some(service(
            names::DIRECT,
            qure!("Direct"),
            &[Target::Direct.as_str(), names::SELECT],
        )),
        Some(service(
            names::AD_BLOCK,
            qure!("AdBlack"),
            &[Target::Reject.as_str(), names::DIRECT],
        )),
        ctx.low_cost.then(|| {
            ProxyGroup::new(names::LOW_COST, GroupType::UrlTest)
                .with_icon(qure!("Lab"))
                .with_probe_url()
                .include_all()
                .with_filter(format!("(?i){}", LOW_COST_FILTER))
        }),
    ];

    let mut groups: Vec<ProxyGroup> = catalogue
        .into_iter()
        .flatten()
        .chain(ctx.region_groups)
        .filter(|g| !ctx.disabled.contains(&g.name))
        .collect();

    let survivors: Vec<String> = groups.iter().map(|g| g.name.clone()).collect();
    groups.push(
        ProxyGroup::select(names::GLOBAL)
            .with_icon(qure!("Global"))
            .include_all()
            .with_proxies(survivors),
    );

    groups
}

fn service<S: AsRef<str>>(name: &str, icon: &str, proxies: &[S]) -> ProxyGroup {
    ProxyGroup::select(name)
        .with_icon(icon)
        .with_proxies(proxies.iter().map(|p| p.as_ref()))
}

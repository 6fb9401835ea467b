//! Output document composition, validation and rendering.

use serde::Serialize;

use crate::dns::{DnsConfig, GeoxUrl, SnifferConfig};
use crate::error::{Error, Result};
use crate::group::{assemble, region_groups, GroupContext, ProxyGroup};
use crate::lists::BaseLists;
use crate::node::{ProxyNode, SourceConfig};
use crate::options::Options;
use crate::region::{classify, has_low_cost};
use crate::rule_type::RuleType;
use crate::rules::{filter_rules, RuleProviders, RULES};
use crate::Target;

/// Client profile persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Profile {
    pub store_selected: bool,
}

/// Listener and mode settings for a client started from this file alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeSettings {
    pub mixed_port: u16,
    pub redir_port: u16,
    pub tproxy_port: u16,
    pub routing_mark: u32,
    pub allow_lan: bool,
    pub ipv6: bool,
    pub mode: &'static str,
    pub unified_delay: bool,
    pub tcp_concurrent: bool,
    pub find_process_mode: &'static str,
    pub log_level: &'static str,
    pub geodata_loader: &'static str,
    pub external_controller: &'static str,
    pub disable_keep_alive: bool,
    pub profile: Profile,
}

impl RuntimeSettings {
    pub fn new(ipv6: bool, keep_alive: bool) -> Self {
        Self {
            mixed_port: 7890,
            redir_port: 7892,
            tproxy_port: 7893,
            routing_mark: 7894,
            allow_lan: true,
            ipv6,
            mode: "rule",
            unified_delay: true,
            tcp_concurrent: true,
            find_process_mode: "off",
            log_level: "info",
            geodata_loader: "standard",
            external_controller: ":9999",
            disable_keep_alive: !keep_alive,
            profile: Profile {
                store_selected: true,
            },
        }
    }
}

/// The generated client configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Document {
    pub proxies: Vec<ProxyNode>,
    #[serde(flatten)]
    pub runtime: Option<RuntimeSettings>,
    pub proxy_groups: Vec<ProxyGroup>,
    pub rule_providers: RuleProviders,
    pub rules: Vec<String>,
    pub sniffer: SnifferConfig,
    pub dns: DnsConfig,
    pub geodata_mode: bool,
    pub geox_url: GeoxUrl,
}

impl Document {
    /// Run the whole pipeline over a subscription.
    ///
    /// Classifies the nodes, synthesizes the groups, filters the rules and
    /// merges everything with the static DNS and sniffer settings.
    pub fn compose(source: SourceConfig, options: &Options) -> Self {
        let regions = classify(&source.proxies);
        let low_cost = has_low_cost(&source.proxies);
        log::info!(
            "Classified {} nodes: {} regions, low-cost: {}",
            source.proxies.len(),
            regions.len(),
            low_cost
        );
        for r in &regions {
            log::debug!("  {}: {}", r.region.label, r.count);
        }

        let lists = BaseLists::build(options.landing, low_cost, &regions);
        let filtered = filter_rules(RULES, &options.rules);

        let proxy_groups = assemble(GroupContext {
            options,
            lists: &lists,
            low_cost,
            region_groups: region_groups(&regions, options),
            disabled: &filtered.disabled_groups,
        });

        Self {
            proxies: source.proxies,
            runtime: options
                .full
                .then(|| RuntimeSettings::new(options.ipv6, options.keep_alive)),
            proxy_groups,
            rule_providers: RuleProviders::enabled(&options.rules),
            rules: filtered.lines(),
            sniffer: SnifferConfig::default(),
            dns: DnsConfig::new(options.ipv6),
            geodata_mode: true,
            geox_url: GeoxUrl::default(),
        }
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&ProxyGroup> {
        self.proxy_groups.iter().find(|g| g.name == name)
    }

    /// Group names in output order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.proxy_groups.iter().map(|g| g.name.as_str())
    }

    /// Check that every reference in the document resolves.
    ///
    /// Group members and rule targets must name a group or a terminal
    /// action, and every `RULE-SET` rule must name a provider.
    pub fn validate(&self) -> Result<()> {
        let resolves = |name: &str| Target::is_terminal(name) || self.group(name).is_some();

        for group in &self.proxy_groups {
            if let Some(member) = group.members().iter().find(|m| !resolves(m.as_str())) {
                return Err(Error::DanglingReference {
                    owner: format!("group {}", group.name),
                    reference: member.clone(),
                });
            }
        }

        for rule in &self.rules {
            let parts: Vec<&str> = rule.split(',').collect();
            let Some(rule_type) = parts.first().and_then(|t| RuleType::parse(t)) else {
                return Err(Error::Config(format!("unknown rule type in `{}`", rule)));
            };
            let target_index = if rule_type.has_value() { 2 } else { 1 };
            let target = *parts
                .get(target_index)
                .ok_or_else(|| Error::Config(format!("rule `{}` has no target", rule)))?;

            if !resolves(target) {
                return Err(Error::DanglingReference {
                    owner: format!("rule {}", rule),
                    reference: target.to_string(),
                });
            }
            if rule_type == RuleType::RuleSet && !self.rule_providers.contains(parts[1]) {
                return Err(Error::DanglingReference {
                    owner: format!("rule {}", rule),
                    reference: parts[1].to_string(),
                });
            }
        }

        Ok(())
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

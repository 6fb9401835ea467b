//! clash-override - Generate a complete Clash/mihomo configuration from a
//! subscription's proxy nodes.
//!
//! The generator reads nothing but the node list. Node names are classified
//! by region, and the crate synthesizes the proxy groups, filters a fixed
//! rule table, and attaches rule-providers, DNS, sniffer and (optionally)
//! runtime settings. The result is a declarative document for an existing
//! client to load.
//!
//! # Quick Start
//!
//! ```
//! use clash_override::{generate, Options, SourceConfig};
//!
//! let source = SourceConfig::from_names(["HK-01", "HK-02 家宽", "US-01 0.5x"]);
//! let doc = generate(source, &Options::default());
//!
//! assert!(doc.group("香港节点").is_some());
//! assert!(doc.group("美国节点").is_some());
//! assert!(doc.group("低倍率节点").is_some());
//! assert_eq!(doc.proxy_groups.last().unwrap().name, "GLOBAL");
//! ```
//!
//! # Pipeline
//!
//! 1. **Classification**: each node counts toward the first region whose
//!    pattern matches its name; ISP / landing nodes are skipped
//! 2. **Low-cost detection**: any node with a quota marker enables the
//!    low-cost group
//! 3. **Base lists**: four preference-ordered membership templates
//! 4. **Region groups**: one url-test or load-balance group per region
//! 5. **Assembly**: the purpose group catalogue, pruned by rule switches,
//!    followed by the catch-all `GLOBAL` group
//! 6. **Composition**: groups, rules, providers, DNS and sniffer merged
//!    into one [`Document`]
//!
//! # Options
//!
//! Flags follow the Sub-Store script argument names and can be parsed from a
//! query string:
//!
//! ```
//! use clash_override::Options;
//!
//! let options = Options::from_query("loadbalance=true&landing=1").unwrap();
//! assert!(options.load_balance);
//! assert!(options.landing);
//! ```

mod error;
mod rule_type;
mod target;

pub mod dns;
pub mod document;
pub mod group;
pub mod lists;
pub mod node;
pub mod options;
pub mod region;
pub mod rules;

// Re-export core types
pub use error::{Error, Result};
pub use rule_type::RuleType;
pub use target::Target;

pub use document::{Document, RuntimeSettings};
pub use group::{GroupType, ProxyGroup};
pub use node::{ProxyNode, SourceConfig};
pub use options::{Options, RuleOptions};
pub use region::{Region, RegionCount};

/// Generate the configuration document for a subscription.
pub fn generate(source: SourceConfig, options: &Options) -> Document {
    Document::compose(source, options)
}

/// Parse a YAML or JSON subscription and generate its document.
pub fn generate_from_str(content: &str, options: &Options) -> Result<Document> {
    let source = SourceConfig::parse(content)?;
    Ok(generate(source, options))
}

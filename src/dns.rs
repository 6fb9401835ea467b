//! DNS, sniffer and geodata settings.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Bootstrap resolver; must be an IP so it needs no resolution itself.
pub const DEFAULT_DNS: &[&str] = &["tls://223.5.5.5"];

/// Resolvers for mainland China domains.
pub const CHINA_DNS: &[&str] = &["119.29.29.29", "223.5.5.5"];

/// Resolvers used to look up proxy server addresses.
pub const FOREIGN_DNS: &[&str] = &[
    "https://120.53.53.53/dns-query",
    "https://223.5.5.5/dns-query",
];

/// Resolvers used when the primary answer is untrusted.
pub const FALLBACK_DNS: &[&str] = &[
    "quic://dns0.eu",
    "https://dns.cloudflare.com/dns-query",
    "https://dns.sb/dns-query",
    "tcp://208.67.222.222",
    "tcp://8.26.56.2",
];

const CHINA_POLICY_DOMAINS: &str = "geosite:cn,steam@cn,category-games@cn,microsoft@cn,apple@cn";

/// Where a `nameserver-policy` entry sends its queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PolicyTarget {
    /// A keyword such as `system`
    Single(&'static str),
    /// An explicit resolver list
    Servers(Vec<&'static str>),
}

/// Ordered `nameserver-policy` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameserverPolicy(Vec<(&'static str, PolicyTarget)>);

impl Default for NameserverPolicy {
    fn default() -> Self {
        Self(vec![
            ("geosite:private", PolicyTarget::Single("system")),
            (CHINA_POLICY_DOMAINS, PolicyTarget::Servers(CHINA_DNS.to_vec())),
        ])
    }
}

impl Serialize for NameserverPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (domains, target) in &self.0 {
            map.serialize_entry(domains, target)?;
        }
        map.end()
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DnsConfig {
    pub enable: bool,
    pub ipv6: bool,
    pub prefer_h3: bool,
    pub use_hosts: bool,
    pub use_system_hosts: bool,
    pub respect_rules: bool,
    pub enhanced_mode: &'static str,
    pub default_nameserver: Vec<&'static str>,
    pub nameserver: Vec<&'static str>,
    pub fallback: Vec<&'static str>,
    pub proxy_server_nameserver: Vec<&'static str>,
    pub nameserver_policy: NameserverPolicy,
}

impl DnsConfig {
    pub fn new(ipv6: bool) -> Self {
        Self {
            enable: true,
            ipv6,
            prefer_h3: true,
            use_hosts: true,
            use_system_hosts: true,
            respect_rules: true,
            enhanced_mode: "redir-host",
            default_nameserver: DEFAULT_DNS.to_vec(),
            nameserver: DEFAULT_DNS.to_vec(),
            fallback: FALLBACK_DNS.to_vec(),
            proxy_server_nameserver: FOREIGN_DNS.to_vec(),
            nameserver_policy: NameserverPolicy::default(),
        }
    }
}

/// Ports sniffed for one protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SniffPorts {
    pub ports: Vec<u16>,
}

impl SniffPorts {
    fn new(ports: &[u16]) -> Self {
        Self {
            ports: ports.to_vec(),
        }
    }
}

/// Per-protocol sniffing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Sniff {
    pub tls: SniffPorts,
    pub http: SniffPorts,
    pub quic: SniffPorts,
}

/// Domain sniffer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SnifferConfig {
    pub sniff: Sniff,
    pub override_destination: bool,
    pub enable: bool,
    pub force_dns_mapping: bool,
    pub skip_domain: Vec<&'static str>,
}

impl Default for SnifferConfig {
    fn default() -> Self {
        Self {
            sniff: Sniff {
                tls: SniffPorts::new(&[443, 8443]),
                http: SniffPorts::new(&[80, 8080, 8880]),
                quic: SniffPorts::new(&[443, 8443]),
            },
            override_destination: false,
            enable: true,
            force_dns_mapping: true,
            skip_domain: vec!["Mijia Cloud", "dlg.io.mi.com", "+.push.apple.com"],
        }
    }
}

/// Download locations of the geodata databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoxUrl {
    pub geoip: &'static str,
    pub geosite: &'static str,
    pub mmdb: &'static str,
    pub asn: &'static str,
}

impl Default for GeoxUrl {
    fn default() -> Self {
        Self {
            geoip: "https://cdn.jsdelivr.net/gh/Loyalsoldier/v2ray-rules-dat@release/geoip.dat",
            geosite: "https://cdn.jsdelivr.net/gh/Loyalsoldier/v2ray-rules-dat@release/geosite.dat",
            mmdb: "https://cdn.jsdelivr.net/gh/Loyalsoldier/geoip@release/Country.mmdb",
            asn: "https://cdn.jsdelivr.net/gh/Loyalsoldier/geoip@release/GeoLite2-ASN.mmdb",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dns_config_shape() {
        let json = serde_json::to_value(DnsConfig::new(true)).unwrap();
        assert_eq!(json["ipv6"], true);
        assert_eq!(json["enhanced-mode"], "redir-host");
        assert_eq!(json["default-nameserver"][0], "tls://223.5.5.5");
        assert_eq!(json["nameserver"], json["default-nameserver"]);
        assert_eq!(json["fallback"].as_array().unwrap().len(), 5);
        assert_eq!(json["proxy-server-nameserver"][1], "https://223.5.5.5/dns-query");
        assert_eq!(json["nameserver-policy"]["geosite:private"], "system");
        assert_eq!(json["nameserver-policy"][CHINA_POLICY_DOMAINS][0], "119.29.29.29");
    }

    #[test]
    fn test_nameserver_policy_order() {
        let yaml = serde_yaml::to_string(&NameserverPolicy::default()).unwrap();
        assert!(yaml.find("geosite:private").unwrap() < yaml.find("geosite:cn").unwrap());
    }

    #[test]
    fn test_sniffer_shape() {
        let json = serde_json::to_value(SnifferConfig::default()).unwrap();
        assert_eq!(json["sniff"]["TLS"]["ports"], serde_json::json!([443, 8443]));
        assert_eq!(json["sniff"]["HTTP"]["ports"], serde_json::json!([80, 8080, 8880]));
        assert_eq!(json["sniff"]["QUIC"]["ports"], serde_json::json!([443, 8443]));
        assert_eq!(json["override-destination"], false);
        assert_eq!(json["force-dns-mapping"], true);
        assert_eq!(json["skip-domain"][2], "+.push.apple.com");
    }
}

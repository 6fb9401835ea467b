//! Input model: the subscription's proxy nodes.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// A single proxy node from the subscription.
///
/// Only `name` is interpreted. Every other field is carried through to the
/// output untouched, in its original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxyNode(Mapping);

impl ProxyNode {
    /// Create a node that has nothing but a name.
    pub fn named(name: impl Into<String>) -> Self {
        let mut fields = Mapping::new();
        fields.insert(Value::from("name"), Value::from(name.into()));
        Self(fields)
    }

    /// Node name, or the empty string when the node has none.
    ///
    /// Scalar names such as `0.3` or `true` are rendered as text.
    pub fn name(&self) -> Cow<'_, str> {
        match self.0.get("name") {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Number(n)) => Cow::Owned(n.to_string()),
            Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
            _ => Cow::Borrowed(""),
        }
    }

    /// All fields of the node, including `name`.
    pub fn fields(&self) -> &Mapping {
        &self.0
    }
}

impl From<Mapping> for ProxyNode {
    fn from(fields: Mapping) -> Self {
        Self(fields)
    }
}

#[derive(Deserialize)]
struct RawSource {
    #[serde(default)]
    proxies: Option<Vec<ProxyNode>>,
}

/// The subscription document the generator starts from.
///
/// Any key other than `proxies` is ignored.
#[derive(Debug, Clone, Default)]
pub struct SourceConfig {
    pub proxies: Vec<ProxyNode>,
}

impl SourceConfig {
    /// Wrap an already-loaded node list.
    pub fn new(proxies: Vec<ProxyNode>) -> Self {
        Self { proxies }
    }

    /// Build a source from bare node names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(ProxyNode::named).collect())
    }

    /// Parse a YAML or JSON subscription document.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawSource = serde_yaml::from_str(content)?;
        let proxies = raw.proxies.ok_or(Error::MissingProxies)?;
        Ok(Self { proxies })
    }

    /// Read and parse a subscription document from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Iterate over node names in input order.
    pub fn names(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.proxies.iter().map(ProxyNode::name)
    }
}

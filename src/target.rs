//! Terminal actions understood by the proxy client.

use std::fmt;

/// Target is a built-in action the client resolves without a proxy group.
///
/// Group memberships and rule targets may name either a generated group or
/// one of these keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Route directly without proxy
    Direct,
    /// Reject the connection
    Reject,
}

impl Target {
    /// Parse a keyword exactly as the client spells it.
    ///
    /// Group names are case-sensitive in the client, so `direct` is not a
    /// terminal action.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DIRECT" => Some(Target::Direct),
            "REJECT" => Some(Target::Reject),
            _ => None,
        }
    }

    /// Returns true if `s` names a terminal action.
    pub fn is_terminal(s: &str) -> bool {
        Self::parse(s).is_some()
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Direct => "DIRECT",
            Target::Reject => "REJECT",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parse() {
        assert_eq!(Target::parse("DIRECT"), Some(Target::Direct));
        assert_eq!(Target::parse("REJECT"), Some(Target::Reject));
        assert_eq!(Target::parse("direct"), None);
        assert_eq!(Target::parse("直连"), None);
    }

    #[test]
    fn test_target_display() {
        assert_eq!(Target::Direct.to_string(), "DIRECT");
        assert_eq!(Target::Reject.to_string(), "REJECT");
        assert!(Target::is_terminal("REJECT"));
        assert!(!Target::is_terminal("PROXY"));
    }
}

//! OAuth scope identifiers for the gateway's token endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The API tier a credential is issued for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Individual (personal) API access.
    #[default]
    #[serde(rename = "GIGACHAT_API_PERS")]
    Personal,
    /// Business access, prepaid.
    #[serde(rename = "GIGACHAT_API_B2B")]
    Business,
    /// Corporate access, postpaid.
    #[serde(rename = "GIGACHAT_API_CORP")]
    Corporate,
}

impl Scope {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "GIGACHAT_API_PERS",
            Self::Business => "GIGACHAT_API_B2B",
            Self::Corporate => "GIGACHAT_API_CORP",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scope {
    type Err = crate::GatewayError;

    /// Parse a scope string or short alias.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GatewayError::Config`] for unrecognised values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GIGACHAT_API_PERS" | "pers" | "personal" => Ok(Self::Personal),
            "GIGACHAT_API_B2B" | "b2b" | "business" => Ok(Self::Business),
            "GIGACHAT_API_CORP" | "corp" | "corporate" => Ok(Self::Corporate),
            other => Err(crate::GatewayError::Config(format!("unknown scope: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_personal() {
        assert_eq!(Scope::default(), Scope::Personal);
        assert_eq!(Scope::default().to_string(), "GIGACHAT_API_PERS");
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("b2b".parse::<Scope>().unwrap(), Scope::Business);
        assert_eq!(
            "GIGACHAT_API_CORP".parse::<Scope>().unwrap(),
            Scope::Corporate
        );
        assert!("admin".parse::<Scope>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let v = serde_json::to_value(Scope::Business).unwrap();
        assert_eq!(v, serde_json::json!("GIGACHAT_API_B2B"));
        let back: Scope = serde_json::from_value(v).unwrap();
        assert_eq!(back, Scope::Business);
    }
}

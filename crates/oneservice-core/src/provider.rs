//! Provider descriptors.

use serde::{Deserialize, Serialize};

/// Description of a backend able to execute use cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    pub name: String,
    #[serde(default)]
    pub security_schemes: Vec<SecurityScheme>,
    #[serde(default)]
    pub parameters: Vec<ProviderParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A security scheme as declared by a provider.
///
/// `type` is `apiKey` or `http`; `http` schemes carry the actual scheme in
/// `scheme`. Location metadata (`in`, `name`) is kept for the engine and
/// ignored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityScheme {
    pub id: String,
    #[serde(rename = "type")]
    pub scheme_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Security scheme kinds credentials can be collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityKind {
    ApiKey,
    Basic,
    Bearer,
    Digest,
}

impl SecurityScheme {
    /// Resolves the scheme kind, `None` when it is not supported.
    pub fn kind(&self) -> Option<SecurityKind> {
        match (self.scheme_type.as_str(), self.scheme.as_deref()) {
            ("apiKey", _) => Some(SecurityKind::ApiKey),
            ("http", Some("basic")) => Some(SecurityKind::Basic),
            ("http", Some("bearer")) => Some(SecurityKind::Bearer),
            ("http", Some("digest")) => Some(SecurityKind::Digest),
            _ => None,
        }
    }

    /// Human readable kind, used in error messages.
    pub fn kind_label(&self) -> String {
        match &self.scheme {
            Some(scheme) => format!("{}/{}", self.scheme_type, scheme),
            None => self.scheme_type.clone(),
        }
    }
}

//! Configuration types for the Parley relay.
//!
//! Loaded from `config.toml` in the data directory and injected into the
//! service and router as explicit structs -- quotas and allow-lists are
//! never ambient globals. Every field has a default so a missing or
//! partial file still yields a usable configuration.

use serde::{Deserialize, Serialize};

/// Top-level relay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub access: AccessConfig,
    pub limits: SessionLimits,
    pub gateway: GatewayConfig,
}

/// Listen address for the HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

/// Origin and owner gating applied by the router before dispatch.
///
/// An origin is allowed when it prefix-matches an `allowed_origins` entry;
/// a literal `"*"` entry allows any origin. Requests from `trusted_origins`
/// bypass the owner allow-list; everywhere else a non-empty
/// `allowed_owners` list restricts which owners may use the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub allowed_origins: Vec<String>,
    pub trusted_origins: Vec<String>,
    pub allowed_owners: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:8000".to_string()],
            trusted_origins: vec!["http://localhost:8000".to_string()],
            allowed_owners: Vec::new(),
        }
    }
}

impl AccessConfig {
    /// Whether any origin is accepted (a `"*"` entry in the allow-list).
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    /// Whether the given `Origin` header value passes the allow-list.
    pub fn origin_allowed(&self, origin: &str) -> bool {
        if self.allows_any_origin() {
            return true;
        }
        let origin = origin.trim_end_matches('/');
        self.allowed_origins
            .iter()
            .chain(self.trusted_origins.iter())
            .any(|allowed| origin.starts_with(allowed.trim_end_matches('/')))
    }

    /// Whether requests from this origin skip the owner allow-list.
    pub fn origin_trusted(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        self.trusted_origins
            .iter()
            .any(|trusted| origin == trusted.trim_end_matches('/'))
    }

    /// Whether the given owner may use the relay from a non-trusted origin.
    ///
    /// An empty allow-list permits all owners.
    pub fn owner_allowed(&self, owner_id: &str) -> bool {
        self.allowed_owners.is_empty() || self.allowed_owners.iter().any(|o| o == owner_id)
    }
}

/// Per-session and per-owner quotas.
///
/// These are abuse ceilings, not product limits: set them as low as the
/// experiment allows. Absent values disable the corresponding check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionLimits {
    pub max_user_messages: Option<u32>,
    pub max_sessions_per_owner: Option<u32>,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_user_messages: Some(100),
            max_sessions_per_owner: Some(20),
        }
    }
}

/// Completion gateway endpoint and generation parameters.
///
/// The API key itself is never part of the file: `api_key_env` names the
/// environment variable it is read from at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub api_key_env: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            max_tokens: Some(1000),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.limits.max_user_messages, Some(100));
        assert_eq!(config.limits.max_sessions_per_owner, Some(20));
        assert_eq!(config.gateway.model, "gpt-4o");
        assert!(config.access.allowed_owners.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
[limits]
max_user_messages = 5
"#,
        )
        .unwrap();
        assert_eq!(config.limits.max_user_messages, Some(5));
        assert_eq!(config.limits.max_sessions_per_owner, Some(20));
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_origin_allowed_prefix_match() {
        let access = AccessConfig::default();
        assert!(access.origin_allowed("http://localhost:8000"));
        assert!(access.origin_allowed("http://localhost:8000/"));
        assert!(!access.origin_allowed("https://evil.example"));
    }

    #[test]
    fn test_origin_wildcard() {
        let access = AccessConfig {
            allowed_origins: vec!["*".to_string()],
            ..AccessConfig::default()
        };
        assert!(access.origin_allowed("https://anything.example"));
    }

    #[test]
    fn test_owner_allowlist() {
        let access = AccessConfig {
            allowed_owners: vec!["p1".to_string(), "p2".to_string()],
            ..AccessConfig::default()
        };
        assert!(access.owner_allowed("p1"));
        assert!(!access.owner_allowed("p3"));

        let open = AccessConfig::default();
        assert!(open.owner_allowed("anyone"));
    }

    #[test]
    fn test_trusted_origin_exact_match_only() {
        let access = AccessConfig::default();
        assert!(access.origin_trusted("http://localhost:8000"));
        assert!(!access.origin_trusted("http://localhost:8001"));
    }
}

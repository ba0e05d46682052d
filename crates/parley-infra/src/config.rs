//! Relay configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` in production)
//! and deserializes it into [`RelayConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::{Path, PathBuf};

use parley_types::config::RelayConfig;

/// Resolve the data directory: `PARLEY_DATA_DIR` env var, falling back to
/// `~/.parley`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PARLEY_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".parley")
}

/// Load relay configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`RelayConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> RelayConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return RelayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RelayConfig::default();
        }
    };

    match toml::from_str::<RelayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            RelayConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.limits.max_user_messages, Some(100));
        assert_eq!(config.server.port, 8787);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
[access]
allowed_origins = ["https://survey.example"]
allowed_owners = ["p1", "p2"]

[limits]
max_user_messages = 40
max_sessions_per_owner = 5

[gateway]
model = "gpt-4o-mini"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(
            config.access.allowed_origins,
            vec!["https://survey.example"]
        );
        assert_eq!(config.limits.max_user_messages, Some(40));
        assert_eq!(config.limits.max_sessions_per_owner, Some(5));
        assert_eq!(config.gateway.model, "gpt-4o-mini");
        // Unset sections keep their defaults.
        assert_eq!(config.gateway.base_url, "https://api.openai.com/v1");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.limits.max_user_messages, Some(100));
    }
}

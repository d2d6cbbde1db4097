use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_RPC_URL: &str = "https://rootstock-mainnet.public.blastapi.io";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

pub const RPC_URL_ENV: &str = "TVLDASH_RPC_URL";
pub const BACKEND_URL_ENV: &str = "TVLDASH_API_URL";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RpcConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct EndpointsConfig {
    pub rpc: Option<RpcConfig>,
    pub backend: Option<BackendConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// Endpoint URLs after applying environment overrides and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoints {
    pub rpc_url: String,
    pub backend_url: String,
}

impl AppConfig {
    /// Loads the config at the default location, or defaults if there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "tvldash", "tvldash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        // An empty file is a valid config with every default
        if config_str.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Environment values win over the config file, which wins over defaults.
    /// Blank values count as unset.
    pub fn endpoints_with(&self, env: impl Fn(&str) -> Option<String>) -> ResolvedEndpoints {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let rpc_url = lookup(RPC_URL_ENV)
            .or_else(|| self.endpoints.rpc.as_ref().map(|r| r.url.clone()))
            .unwrap_or_else(|| {
                warn!("{} not set. Using public RPC URL.", RPC_URL_ENV);
                DEFAULT_RPC_URL.to_string()
            });

        let backend_url = lookup(BACKEND_URL_ENV)
            .or_else(|| self.endpoints.backend.as_ref().map(|b| b.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        ResolvedEndpoints {
            rpc_url,
            backend_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
endpoints:
  rpc:
    url: "https://node.example.org"
  backend:
    base_url: "https://api.example.org"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.endpoints.rpc,
            Some(RpcConfig {
                url: "https://node.example.org".to_string()
            })
        );
        assert_eq!(
            config.endpoints.backend.unwrap().base_url,
            "https://api.example.org"
        );

        let partial: AppConfig = serde_yaml::from_str(
            r#"
endpoints:
  backend:
    base_url: "http://127.0.0.1:8080"
"#,
        )
        .unwrap();
        assert!(partial.endpoints.rpc.is_none());

        let empty: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(empty, AppConfig::default());
    }

    #[test]
    fn test_endpoints_fall_back_to_defaults() {
        let endpoints = AppConfig::default().endpoints_with(|_| None);
        assert_eq!(endpoints.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(endpoints.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn test_environment_overrides_file() {
        let config = AppConfig {
            endpoints: EndpointsConfig {
                rpc: Some(RpcConfig {
                    url: "https://file-node".to_string(),
                }),
                backend: Some(BackendConfig {
                    base_url: "https://file-api".to_string(),
                }),
            },
        };
        let env: HashMap<&str, String> = [
            (RPC_URL_ENV, "https://env-node".to_string()),
            (BACKEND_URL_ENV, "  ".to_string()),
        ]
        .into_iter()
        .collect();

        let endpoints = config.endpoints_with(|key| env.get(key).cloned());

        assert_eq!(endpoints.rpc_url, "https://env-node");
        // Blank variable is ignored
        assert_eq!(endpoints.backend_url, "https://file-api");
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("config.yaml");

        fs::write(&path, "")?;
        assert_eq!(AppConfig::load_from_path(&path)?, AppConfig::default());

        fs::write(&path, "endpoints:\n  rpc:\n    url: http://localhost:4444\n")?;
        let config = AppConfig::load_from_path(&path)?;
        assert_eq!(config.endpoints.rpc.unwrap().url, "http://localhost:4444");

        fs::write(&path, "endpoints: [")?;
        assert!(AppConfig::load_from_path(&path).is_err());

        assert!(AppConfig::load_from_path(dir.path().join("missing.yaml")).is_err());
        Ok(())
    }
}

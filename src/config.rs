use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Environment variable that overrides `registry.base_url`.
pub const REGISTRY_URL_ENV: &str = "ARDF_API_URL";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Name reported to the client in the `initialize` response
    #[serde(default = "default_server_name")]
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegistryConfig {
    /// Supports ${ENV_VAR} substitution
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Deadline for a whole registry request (connect + response)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Extra headers sent with every registry request.
    /// Values support ${ENV_VAR} substitution.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_server_name() -> String {
    "ardf-mcp-server".to_string()
}

fn default_base_url() -> String {
    "http://127.0.0.1:3001".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            headers: BTreeMap::new(),
        }
    }
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Parses `base_url` into an absolute http(s) URL.
    pub fn parsed_base_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|e| anyhow::anyhow!("Invalid registry base_url '{}': {e}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!(
                "Invalid registry base_url '{}': scheme must be http or https",
                self.base_url
            );
        }
        if url.cannot_be_a_base() {
            anyhow::bail!("Invalid registry base_url '{}'", self.base_url);
        }
        Ok(url)
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses a TOML document, expanding environment variables like ${ARDF_API_KEY}
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let expanded = shellexpand::env(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Loads the config file if one is given, otherwise starts from defaults,
    /// then applies the `ARDF_API_URL` override.
    pub fn resolve(path: Option<&str>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_registry_url_override(std::env::var(REGISTRY_URL_ENV).ok()))
    }

    /// Replaces the registry base URL when the override is set and non-blank.
    pub fn with_registry_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.registry.base_url = url;
        }
        self
    }
}

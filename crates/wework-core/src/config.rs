//! Widget configuration.
//!
//! Settings are read from `~/.config/wework-chat/config.toml` when the file
//! exists, then environment variables override individual fields.
//!
//! ```toml
//! base_url = "http://localhost:5000"
//! membership_type = "All Access"
//! source = "chatbot_ui"
//! greeting = "Hello, how can I help you today?"
//!
//! [legacy]
//! endpoint = "https://support.example.com/suggest"
//! api_key = "..."
//! ```

use crate::conversation::DEFAULT_GREETING;
use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_RAG_URL: &str = "WEWORK_RAG_URL";
pub const ENV_MEMBERSHIP_TYPE: &str = "WEWORK_MEMBERSHIP_TYPE";
pub const ENV_LEGACY_ENDPOINT: &str = "WEWORK_LEGACY_ENDPOINT";
pub const ENV_LEGACY_API_KEY: &str = "WEWORK_LEGACY_API_KEY";

const DEFAULT_MEMBERSHIP_TYPE: &str = "All Access";
const DEFAULT_SOURCE: &str = "chatbot_ui";

/// Which RAG service build to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RagBackend {
    Gemini,
    Gpt4o,
}

impl RagBackend {
    /// Local address the service listens on by default.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            RagBackend::Gemini => "http://localhost:5000",
            RagBackend::Gpt4o => "http://localhost:5001",
        }
    }
}

impl FromStr for RagBackend {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(RagBackend::Gemini),
            "gpt4o" | "gpt-4o" => Ok(RagBackend::Gpt4o),
            other => Err(ChatError::config(format!("unknown RAG backend '{}'", other))),
        }
    }
}

/// Credentials for the older help-and-support suggestion API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyApiConfig {
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Root of the RAG service; the chat call goes to `{base_url}/chat`.
    pub base_url: String,
    /// Membership tier tag sent with every query.
    pub membership_type: String,
    /// Value of `context.source` in the request body.
    pub source: String,
    /// Bot message the conversation starts (and restarts) with.
    pub greeting: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy: Option<LegacyApiConfig>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: RagBackend::Gemini.default_base_url().to_string(),
            membership_type: DEFAULT_MEMBERSHIP_TYPE.to_string(),
            source: DEFAULT_SOURCE.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            legacy: None,
        }
    }
}

impl WidgetConfig {
    /// Loads the default config file (if any) and applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Reads a config file. Missing fields fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ChatError::io(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: WidgetConfig = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded widget config");
        Ok(config)
    }

    /// Writes the config as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Overrides fields from `WEWORK_*` environment variables.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_RAG_URL) {
            self.base_url = url;
        }
        if let Some(tier) = lookup(ENV_MEMBERSHIP_TYPE) {
            self.membership_type = tier;
        }
        if let (Some(endpoint), Some(api_key)) =
            (lookup(ENV_LEGACY_ENDPOINT), lookup(ENV_LEGACY_API_KEY))
        {
            self.legacy = Some(LegacyApiConfig { endpoint, api_key });
        }
    }

    /// Points the widget at a backend preset's default address.
    pub fn with_backend(mut self, backend: RagBackend) -> Self {
        self.base_url = backend.default_base_url().to_string();
        self
    }

    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url.trim_end_matches('/'))
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url.trim_end_matches('/'))
    }

    pub fn status_url(&self) -> String {
        format!("{}/status", self.base_url.trim_end_matches('/'))
    }

    fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ChatError::config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }
}

/// Returns `~/.config/wework-chat/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("wework-chat").join("config.toml"))
}

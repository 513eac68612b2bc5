//! Configuration loading, validation, and management for standin.
//!
//! Loads configuration from `~/.standin/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use standin_core::CollectionRef;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.standin/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation backend settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Conversation history settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// Retrieval backend and collection list
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Prompt template override
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Gateway (HTTP server) settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Canned-answer shortcut rows evaluated before the retrieval pipeline
    #[serde(default)]
    pub shortcuts: Vec<ShortcutConfig>,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("generation", &self.generation)
            .field("history", &self.history)
            .field("retrieval", &self.retrieval)
            .field("prompt", &self.prompt)
            .field("gateway", &self.gateway)
            .field("shortcuts", &self.shortcuts)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// API key (env vars take priority — see `AppConfig::load`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per answer
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_model() -> String {
    "llama-3.1-8b-instant".into()
}
fn default_temperature() -> f32 {
    0.5
}
fn default_max_tokens() -> u32 {
    300
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Soft ceiling on retained history entries (one turn = two entries).
    /// The list may transiently hold `max_history + 2` entries; the next
    /// completed turn trims it back down.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_max_history() -> usize {
    6
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Store backend: "local" or "chroma"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Directory of `<collection>.json` document files (local backend)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Chroma server URL (chroma backend)
    #[serde(default = "default_chroma_url")]
    pub chroma_url: String,

    /// Fan collection queries out concurrently. Turn off for stores that
    /// are not safe for concurrent access from one process.
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Ordered collection list; order fixes the evidence-block order.
    #[serde(default = "default_collections")]
    pub collections: Vec<CollectionConfig>,
}

fn default_backend() -> String {
    "local".into()
}
fn default_chroma_url() -> String {
    "http://localhost:8000".into()
}
fn default_true() -> bool {
    true
}
fn default_collections() -> Vec<CollectionConfig> {
    vec![
        CollectionConfig::new("personal", 5),
        CollectionConfig::new("academic", 2),
        CollectionConfig::new("projects", 2),
        CollectionConfig::new("style", 1),
    ]
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: None,
            chroma_url: default_chroma_url(),
            parallel: true,
            collections: default_collections(),
        }
    }
}

/// One named collection and its per-query result cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub name: String,

    #[serde(default = "default_result_cap")]
    pub result_cap: usize,
}

fn default_result_cap() -> usize {
    2
}

impl CollectionConfig {
    pub fn new(name: impl Into<String>, result_cap: usize) -> Self {
        Self {
            name: name.into(),
            result_cap,
        }
    }
}

impl From<&CollectionConfig> for CollectionRef {
    fn from(c: &CollectionConfig) -> Self {
        CollectionRef::new(&c.name, c.result_cap)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Inline template override. Must contain the `{chat_history}`,
    /// `{context}` and `{question}` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Load the template from a file instead (inline takes priority).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    7171
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// A canned-answer row: first row whose keyword appears in the question
/// short-circuits the whole retrieval pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortcutConfig {
    /// Case-insensitive keywords that trigger this row.
    pub keywords: Vec<String>,

    /// The canonical answer to stream back.
    pub answer: String,
}

/// Placeholders every prompt template must contain.
pub const REQUIRED_PLACEHOLDERS: [&str; 3] = ["{chat_history}", "{context}", "{question}"];

impl AppConfig {
    /// Load configuration from the default path (~/.standin/config.toml).
    ///
    /// Environment variable overrides (highest priority):
    /// - `STANDIN_API_KEY`, falling back to `GROQ_API_KEY`
    /// - `STANDIN_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.generation.api_key.is_none() {
            config.generation.api_key = std::env::var("STANDIN_API_KEY")
                .ok()
                .or_else(|| std::env::var("GROQ_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("STANDIN_MODEL") {
            config.generation.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".standin")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.temperature < 0.0 || self.generation.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.retrieval.collections.iter().any(|c| c.name.is_empty()) {
            return Err(ConfigError::ValidationError(
                "retrieval.collections entries must have non-empty names".into(),
            ));
        }

        if let Some(template) = &self.prompt.template {
            for placeholder in REQUIRED_PLACEHOLDERS {
                if !template.contains(placeholder) {
                    return Err(ConfigError::ValidationError(format!(
                        "prompt.template is missing the {placeholder} placeholder"
                    )));
                }
            }
        }

        match self.retrieval.backend.as_str() {
            "local" | "chroma" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "retrieval.backend must be 'local' or 'chroma', got '{other}'"
                )));
            }
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.generation.api_key.is_some()
    }

    /// The collection list as core `CollectionRef`s, in configured order.
    pub fn collection_refs(&self) -> Vec<CollectionRef> {
        self.retrieval.collections.iter().map(Into::into).collect()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            history: HistoryConfig::default(),
            retrieval: RetrievalConfig::default(),
            prompt: PromptConfig::default(),
            gateway: GatewayConfig::default(),
            shortcuts: vec![],
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.history.max_history, 6);
        assert_eq!(config.gateway.port, 7171);
        assert_eq!(config.generation.model, "llama-3.1-8b-instant");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_collections_ordered() {
        let refs = AppConfig::default().collection_refs();
        let names: Vec<_> = refs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["personal", "academic", "projects", "style"]);
        assert_eq!(refs[0].result_cap, 5);
        assert_eq!(refs[3].result_cap, 1);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.generation.model, config.generation.model);
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(
            parsed.retrieval.collections.len(),
            config.retrieval.collections.len()
        );
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.generation.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn template_without_placeholders_rejected() {
        let mut config = AppConfig::default();
        config.prompt.template = Some("just some text, no substitutions".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("{chat_history}"));
    }

    #[test]
    fn template_with_placeholders_accepted() {
        let mut config = AppConfig::default();
        config.prompt.template =
            Some("History:\n{chat_history}\nContext:\n{context}\nQ: {question}".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_backend_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.backend = "pinecone".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().history.max_history, 6);
    }

    #[test]
    fn shortcut_config_parsing() {
        let toml_str = r#"
[[shortcuts]]
keywords = ["portfolio", "website"]
answer = "You can find the portfolio at https://example.dev"

[[shortcuts]]
keywords = ["cv", "resume"]
answer = "The CV is at https://example.dev/cv.pdf"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.shortcuts.len(), 2);
        assert_eq!(config.shortcuts[0].keywords[0], "portfolio");
        assert!(config.shortcuts[1].answer.contains("cv.pdf"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut config = AppConfig::default();
        config.generation.api_key = Some("gsk_secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("gsk_secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("llama-3.1-8b-instant"));
        assert!(toml_str.contains("7171"));
    }
}

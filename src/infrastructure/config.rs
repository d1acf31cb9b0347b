use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::AgentProfile;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read `{path}`: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse `{path}`: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid value `{value}` for {key}")]
    InvalidOverride { key: &'static str, value: String },
}

/// Service settings from `app.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub redis_url: String,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub knowledge: KnowledgeConfig,
    pub worker: WorkerConfig,
    pub history: HistoryConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub tools: ToolsConfig,
    pub logging: LoggingConfig,
    pub pricing_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            redis_url: "redis://localhost:6379".to_string(),
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            knowledge: KnowledgeConfig::default(),
            worker: WorkerConfig::default(),
            history: HistoryConfig::default(),
            cors: CorsConfig::default(),
            auth: AuthConfig::default(),
            tools: ToolsConfig::default(),
            logging: LoggingConfig::default(),
            pricing_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub timeout_seconds: u64,
    pub max_turns: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "google/gemini-2.5-flash".to_string(),
            timeout_seconds: 60,
            max_turns: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub qdrant_url: String,
    pub collection: String,
    pub top_k: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            qdrant_url: "http://localhost:6334".to_string(),
            collection: "common_knowledge_chunks".to_string(),
            top_k: 10,
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub concurrency: usize,
    pub result_ttl_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            result_ttl_seconds: 3600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub runs: usize,
    pub ttl_seconds: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            runs: 5,
            ttl_seconds: 7 * 24 * 3600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub api_keys: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub knowledge_base: KnowledgeBaseToolConfig,
    pub price_lookup: PriceLookupToolConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseToolConfig {
    pub description: String,
    pub no_results_message: String,
}

impl Default for KnowledgeBaseToolConfig {
    fn default() -> Self {
        Self {
            description: "Search the company knowledge base for policies, service details and FAQs."
                .to_string(),
            no_results_message: "No relevant documents found.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PriceLookupToolConfig {
    pub description: String,
}

impl Default for PriceLookupToolConfig {
    fn default() -> Self {
        Self {
            description: "Look up pricing for a cleaning service at the customer's postcode. \
                          Returns availability and an itemised quote in AUD."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,tower_http=debug".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Agent personas from `prompts.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub helpdesk: AgentPrompt,
    pub assistant: AgentPrompt,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentPrompt {
    pub name: String,
    pub instructions: Vec<String>,
}

impl AgentPrompt {
    /// Instructions rendered as the agent preamble.
    pub fn system(&self) -> String {
        self.instructions
            .iter()
            .map(|line| format!("- {line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl PromptsConfig {
    pub fn for_profile(&self, profile: AgentProfile) -> &AgentPrompt {
        match profile {
            AgentProfile::Helpdesk => &self.helpdesk,
            AgentProfile::Assistant => &self.assistant,
        }
    }
}

impl Default for PromptsConfig {
    fn default() -> Self {
        let lines = |lines: &[&str]| -> Vec<String> { lines.iter().map(|l| l.to_string()).collect() };
        Self {
            helpdesk: AgentPrompt {
                name: "Helpdesk Assistant".to_string(),
                instructions: lines(&[
                    "You are a helpful customer service assistant for a professional cleaning company.",
                    "Always search your knowledge base before answering questions and cite the sources you used.",
                    "For pricing inquiries, use the price_lookup_tool to provide accurate quotes.",
                    "Never make up pricing information - always use the tool.",
                    "If a service is not available in a customer's region, politely explain and suggest alternatives.",
                    "Be concise but thorough in your responses.",
                ]),
            },
            assistant: AgentPrompt {
                name: "General AI Assistant".to_string(),
                instructions: lines(&[
                    "You are a helpful AI assistant that can answer any question the user wants.",
                    "Always be polite, clear, and informative in your responses.",
                    "If you don't know something, be honest about it.",
                ]),
            },
        }
    }
}

/// Everything loaded at startup.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
}

impl AppConfig {
    /// Loads `app.yaml` and `prompts.yaml` from `dir`, then applies
    /// environment overrides. Missing files fall back to defaults.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Config = read_yaml(&dir.join("app.yaml"))?.unwrap_or_default();
        let prompts: PromptsConfig = read_yaml(&dir.join("prompts.yaml"))?.unwrap_or_default();

        config.apply_overrides(|key| std::env::var(key).ok())?;

        Ok(Self { config, prompts })
    }

    /// Loads from `CONFIG_DIR`, or `./config` when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into());
        Self::load(Path::new(&dir))
    }
}

impl Config {
    /// Applies environment-style overrides read through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = parse_override("SERVER_PORT", port)?;
        }
        if let Some(url) = lookup("REDIS_URL") {
            self.redis_url = url;
        }
        if let Some(url) = lookup("QDRANT_URL") {
            self.knowledge.qdrant_url = url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(concurrency) = lookup("WORKER_CONCURRENCY") {
            self.worker.concurrency = parse_override("WORKER_CONCURRENCY", concurrency)?;
        }
        if let Some(path) = lookup("PRICING_FILE") {
            self.pricing_file = Some(PathBuf::from(path));
        }
        if let Some(keys) = lookup("API_KEYS") {
            self.auth.api_keys = keys
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => {
                    return Err(ConfigError::InvalidOverride {
                        key: "LOG_FORMAT",
                        value: format,
                    })
                }
            };
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOverride { key, value })
}

pub(crate) fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_yaml::from_str(&raw)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str(
            "server:\n  port: 9000\nknowledge:\n  top_k: 3\n",
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.knowledge.top_k, 3);
        assert_eq!(config.knowledge.chunk_overlap, 200);
        assert_eq!(config.history.runs, 5);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SERVER_PORT", "8181"),
            ("API_KEYS", "alpha, beta,,"),
            ("LOG_FORMAT", "JSON"),
            ("PRICING_FILE", "/etc/pricing.yaml"),
        ]);
        let mut config = Config::default();

        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 8181);
        assert_eq!(config.auth.api_keys, vec!["alpha", "beta"]);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.pricing_file, Some(PathBuf::from("/etc/pricing.yaml")));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|k| (k == "SERVER_PORT").then(|| "eighty".to_string()))
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidOverride {
                key: "SERVER_PORT",
                ..
            }
        ));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("prompts.yaml"),
            "helpdesk:\n  name: Desk\n  instructions:\n    - Be brief.\n",
        )
        .unwrap();

        let app = AppConfig::load(dir.path()).unwrap();

        assert_eq!(app.prompts.helpdesk.name, "Desk");
        assert_eq!(app.prompts.helpdesk.system(), "- Be brief.");
        assert_eq!(app.prompts.assistant.name, "General AI Assistant");
        assert!(!app.config.redis_url.is_empty());
    }
}

//! Configuration management for the travel planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TravelPlannerError;
use crate::llm::SamplingConfig;
use crate::ranking::{MAX_CONTEXT_FRAGMENTS, MAX_FALLBACK_FRAGMENTS};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the travel planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Language-model provider configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Itinerary generation settings
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Destination knowledge settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    /// Relevance ranking settings
    #[serde(default)]
    pub ranking: RankingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Language-model provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key; `OPENAI_API_KEY` is used when absent
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Model used for itineraries and destination profiles
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Model used for relevance embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// HTTP request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_llm_max_retries")]
    pub max_retries: u32,
}

/// Itinerary generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_generation_temperature")]
    pub temperature: f32,
    #[serde(default = "default_generation_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_penalty")]
    pub frequency_penalty: f32,
    #[serde(default = "default_penalty")]
    pub presence_penalty: f32,
    /// Upper bound for the whole generation call, in seconds
    #[serde(default = "default_generation_timeout")]
    pub timeout_seconds: u32,
}

/// Destination knowledge settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_knowledge_temperature")]
    pub temperature: f32,
    #[serde(default = "default_knowledge_max_tokens")]
    pub max_tokens: u32,
    /// Generated profiles kept in memory before the oldest is evicted (0 = unbounded)
    #[serde(default = "default_max_generated_profiles")]
    pub max_generated_profiles: usize,
}

/// Relevance ranking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Context fragments passed to the prompt
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Scalar fragments used when embeddings are unavailable
    #[serde(default = "default_fallback_fragments")]
    pub fallback_fragments: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_llm_timeout() -> u32 {
    60
}

fn default_llm_max_retries() -> u32 {
    3
}

fn default_generation_temperature() -> f32 {
    0.7
}

fn default_generation_max_tokens() -> u32 {
    3000
}

fn default_top_p() -> f32 {
    0.9
}

fn default_penalty() -> f32 {
    0.1
}

fn default_generation_timeout() -> u32 {
    120
}

fn default_knowledge_temperature() -> f32 {
    0.3
}

fn default_knowledge_max_tokens() -> u32 {
    1000
}

fn default_max_generated_profiles() -> usize {
    256
}

fn default_top_k() -> usize {
    5
}

fn default_fallback_fragments() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            timeout_seconds: default_llm_timeout(),
            max_retries: default_llm_max_retries(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_generation_temperature(),
            max_tokens: default_generation_max_tokens(),
            top_p: default_top_p(),
            frequency_penalty: default_penalty(),
            presence_penalty: default_penalty(),
            timeout_seconds: default_generation_timeout(),
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            temperature: default_knowledge_temperature(),
            max_tokens: default_knowledge_max_tokens(),
            max_generated_profiles: default_max_generated_profiles(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            fallback_fragments: default_fallback_fragments(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LlmConfig {
    /// API key from the config, or from `OPENAI_API_KEY`
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl GenerationConfig {
    #[must_use]
    pub fn sampling(&self) -> SamplingConfig {
        SamplingConfig {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl KnowledgeConfig {
    #[must_use]
    pub fn sampling(&self) -> SamplingConfig {
        SamplingConfig {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            ..SamplingConfig::factual()
        }
    }
}

impl PlannerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TRAVELPLANNER__GENERATION__TEMPERATURE=0.5
        builder = builder.add_source(
            Environment::with_prefix("TRAVELPLANNER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travelplanner").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.llm.base_url.is_empty() {
            self.llm.base_url = default_llm_base_url();
        }
        if self.llm.chat_model.is_empty() {
            self.llm.chat_model = default_chat_model();
        }
        if self.llm.embedding_model.is_empty() {
            self.llm.embedding_model = default_embedding_model();
        }
        if self.llm.timeout_seconds == 0 {
            self.llm.timeout_seconds = default_llm_timeout();
        }
        if self.generation.max_tokens == 0 {
            self.generation.max_tokens = default_generation_max_tokens();
        }
        if self.generation.timeout_seconds == 0 {
            self.generation.timeout_seconds = default_generation_timeout();
        }
        if self.knowledge.max_tokens == 0 {
            self.knowledge.max_tokens = default_knowledge_max_tokens();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // The key may also come from OPENAI_API_KEY, so absence is fine here
        if let Some(api_key) = &self.llm.api_key {
            if api_key.is_empty() {
                return Err(TravelPlannerError::config(
                    "LLM API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.len() < 8 {
                return Err(TravelPlannerError::config(
                    "LLM API key appears to be invalid (too short). Please check your API key."
                ).into());
            }

            if api_key.len() > 256 {
                return Err(TravelPlannerError::config(
                    "LLM API key appears to be invalid (too long). Please check your API key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, temperature) in [
            ("generation", self.generation.temperature),
            ("knowledge", self.knowledge.temperature),
        ] {
            if !(0.0..=1.0).contains(&temperature) {
                return Err(TravelPlannerError::config(format!(
                    "{name} temperature must be between 0.0 and 1.0"
                ))
                .into());
            }
        }

        if !(self.generation.top_p > 0.0 && self.generation.top_p <= 1.0) {
            return Err(TravelPlannerError::config(
                "generation top_p must be greater than 0.0 and at most 1.0"
            ).into());
        }

        for penalty in [self.generation.frequency_penalty, self.generation.presence_penalty] {
            if !(-2.0..=2.0).contains(&penalty) {
                return Err(TravelPlannerError::config(
                    "generation penalties must be between -2.0 and 2.0"
                ).into());
            }
        }

        if self.llm.timeout_seconds > 300 || self.generation.timeout_seconds > 300 {
            return Err(TravelPlannerError::config(
                "LLM timeout cannot exceed 300 seconds"
            ).into());
        }

        if self.llm.max_retries > 10 {
            return Err(TravelPlannerError::config(
                "LLM max retries cannot exceed 10"
            ).into());
        }

        if !(1..=MAX_CONTEXT_FRAGMENTS).contains(&self.ranking.top_k) {
            return Err(TravelPlannerError::config(format!(
                "ranking top_k must be between 1 and {MAX_CONTEXT_FRAGMENTS}"
            ))
            .into());
        }

        if self.ranking.fallback_fragments > MAX_FALLBACK_FRAGMENTS {
            return Err(TravelPlannerError::config(format!(
                "ranking fallback_fragments cannot exceed {MAX_FALLBACK_FRAGMENTS}"
            ))
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelPlannerError::config(
                format!("Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_log_levels.join(", ")
                )
            ).into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelPlannerError::config(
                format!("Invalid log format '{}'. Must be one of: {}",
                    self.logging.format,
                    valid_log_formats.join(", ")
                )
            ).into());
        }

        if !self.llm.base_url.starts_with("http://") && !self.llm.base_url.starts_with("https://") {
            return Err(TravelPlannerError::config(
                "LLM base URL must be a valid HTTP or HTTPS URL"
            ).into());
        }

        Ok(())
    }
}

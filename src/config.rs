// Copyright 2025 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_API_KEY_ENV, DEFAULT_MAX_KNOWLEDGE_TOKENS, DEFAULT_MODEL_BASE_URL, DEFAULT_MODEL_NAME,
    DEFAULT_SUMMARY_MAX_TOKENS, DEFAULT_TRANSCRIPT_BATCH_SIZE, DEFAULT_TRANSCRIPT_LANGUAGES,
    DEFAULT_USER_AGENT,
};
use crate::error::ConfigError;
use crate::model::SamplingConfig;

const DEFAULT_TEMPLATE: &str = include_str!("../config-templates/default.toml");

/// Model service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL_NAME.to_string(),
            base_url: DEFAULT_MODEL_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Chat turn sampling and prompt layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub system_instruction: String,
    pub knowledge_label: String,
    pub history_label: String,
    pub user_label: String,
    pub assistant_label: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
            system_instruction: "Você é um assistente AI amigável. Responda sempre em português do Brasil. \
                Mantenha um tom cordial e informal. Use o conhecimento adicional fornecido para \
                enriquecer suas respostas quando relevante."
                .to_string(),
            knowledge_label: "Conhecimento Adicional".to_string(),
            history_label: "Histórico da conversa".to_string(),
            user_label: "Usuário".to_string(),
            assistant_label: "Assistente".to_string(),
        }
    }
}

impl ChatConfig {
    pub fn sampling(&self) -> SamplingConfig {
        SamplingConfig {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: self.max_output_tokens,
        }
    }
}

/// Summarizer sampling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_tokens: u32,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            top_p: 0.95,
            top_k: 40,
            max_tokens: DEFAULT_SUMMARY_MAX_TOKENS,
        }
    }
}

impl SummaryConfig {
    pub fn sampling(&self, max_tokens: u32) -> SamplingConfig {
        SamplingConfig {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: max_tokens,
        }
    }
}

/// Knowledge base ingestion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Whitespace-token ceiling for the knowledge base
    pub max_tokens: usize,
    pub transcript_languages: Vec<String>,
    pub transcript_batch_size: usize,
    pub user_agent: String,
    pub fetch_timeout_secs: Option<u64>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_KNOWLEDGE_TOKENS,
            transcript_languages: DEFAULT_TRANSCRIPT_LANGUAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            transcript_batch_size: DEFAULT_TRANSCRIPT_BATCH_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout_secs: None,
        }
    }
}

/// Main configuration for kbchat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

impl Config {
    /// Load configuration from config.toml file
    /// An explicit path must exist; otherwise the system config is used,
    /// created from the embedded template on first run
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let config_path = crate::storage::get_system_config_path()?;
                if config_path.exists() {
                    Self::from_file(&config_path)?
                } else {
                    let config: Self = toml::from_str(DEFAULT_TEMPLATE)
                        .context("Embedded config template is invalid")?;

                    if let Some(parent) = config_path.parent() {
                        if !parent.exists() {
                            std::fs::create_dir_all(parent)?;
                        }
                    }
                    std::fs::write(&config_path, DEFAULT_TEMPLATE)?;
                    tracing::info!(path = %config_path.display(), "Created default configuration");

                    config
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Path that `load(None)` reads from
    pub fn default_path() -> Result<PathBuf> {
        crate::storage::get_system_config_path()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.knowledge.max_tokens == 0 {
            return Err(ConfigError::InvalidBudget);
        }
        if self.knowledge.transcript_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "knowledge.transcript_batch_size must be greater than zero".to_string(),
            ));
        }
        if self.knowledge.transcript_languages.is_empty() {
            return Err(ConfigError::Invalid(
                "knowledge.transcript_languages must list at least one language".to_string(),
            ));
        }
        Ok(())
    }

    /// Read the model API key from the configured environment variable
    pub fn api_key(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.model.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey {
                env: self.model.api_key_env.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_template_matches_defaults() {
        let config: Config = toml::from_str(DEFAULT_TEMPLATE).unwrap();
        let defaults = Config::default();

        assert_eq!(config.model.name, defaults.model.name);
        assert_eq!(config.chat.temperature, 0.8);
        assert_eq!(config.chat.max_output_tokens, 8192);
        assert_eq!(config.chat.system_instruction, defaults.chat.system_instruction);
        assert_eq!(config.summary.temperature, 0.5);
        assert_eq!(config.summary.top_k, 40);
        assert_eq!(config.knowledge.max_tokens, 100_000);
        assert_eq!(config.knowledge.transcript_languages, vec!["pt", "pt-BR"]);
        assert_eq!(config.knowledge.transcript_batch_size, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[knowledge]\nmax_tokens = 50").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.knowledge.max_tokens, 50);
        assert_eq!(config.chat.top_k, 40);
        assert_eq!(config.model.api_key_env, "GOOGLE_API_KEY");
    }

    #[test]
    fn test_zero_budget_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[knowledge]\nmax_tokens = 0").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test]
    fn test_negative_budget_rejected_at_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[knowledge]\nmax_tokens = -5").unwrap();

        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = Config::default();
        config.model.api_key_env = "KBCHAT_TEST_UNSET_API_KEY".to_string();

        match config.api_key() {
            Err(ConfigError::MissingApiKey { env }) => {
                assert_eq!(env, "KBCHAT_TEST_UNSET_API_KEY")
            }
            other => panic!("expected MissingApiKey, got {:?}", other),
        }
    }
}

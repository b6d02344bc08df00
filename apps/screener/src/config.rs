use std::fmt;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::analysis::prompts::PromptTemplate;
use crate::llm_client::{LlmConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::screening::policy::{BatchPolicy, BatchProfile};

const MB: usize = 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub batch_profile: BatchProfile,
    pub policy: BatchPolicy,
    pub prompt_template: PromptTemplate,
    /// Ceiling on the whole multipart body.
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("model", &self.llm.model)
            .field("api_base", &self.llm.api_base)
            .field("batch_profile", &self.batch_profile)
            .field("policy", &self.policy)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let batch_profile: BatchProfile = optional_env("BATCH_PROFILE")
            .unwrap_or_else(|| "standard".to_string())
            .parse()
            .map_err(|e: String| anyhow!(e))?;

        let mut policy = BatchPolicy::for_profile(batch_profile);
        if let Some(max) = parse_env::<usize>("MAX_RESUMES")? {
            policy.max_files = max;
        }
        if let Some(mb) = parse_env::<usize>("MAX_RESUME_MB")? {
            policy.max_file_bytes = Some(mb * MB);
        }
        if let Some(ms) = parse_env::<u64>("PAUSE_AFTER_SUCCESS_MS")? {
            policy.pause_after_success = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_env::<u64>("PAUSE_AFTER_FAILURE_MS")? {
            policy.pause_after_failure = Duration::from_millis(ms);
        }

        let prompt_template = match optional_env("ANALYSIS_PROMPT_FILE") {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Could not read ANALYSIS_PROMPT_FILE '{path}'"))?;
                PromptTemplate::new(text)
                    .with_context(|| format!("Invalid prompt template in '{path}'"))?
            }
            None => PromptTemplate::default(),
        };

        Ok(Config {
            llm: LlmConfig {
                api_key: require_env("GEMINI_API_KEY")?,
                model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_base: optional_env("GEMINI_API_BASE")
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS")?.unwrap_or(120)),
            },
            batch_profile,
            policy,
            prompt_template,
            max_upload_bytes: parse_env::<usize>("MAX_UPLOAD_MB")?.unwrap_or(200) * MB,
            port: parse_env("PORT")?.unwrap_or(8080),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    optional_env(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} must be a valid number, got '{raw}'"))
        })
        .transpose()
}

#[cfg(test)]
impl Config {
    /// Config pointing nowhere, for router tests that never reach the network.
    pub fn for_tests(policy: BatchPolicy) -> Self {
        Config {
            llm: LlmConfig {
                api_key: "test-key".to_string(),
                model: DEFAULT_MODEL.to_string(),
                api_base: "http://127.0.0.1:9".to_string(),
                timeout: Duration::from_secs(1),
            },
            batch_profile: BatchProfile::Standard,
            policy,
            prompt_template: PromptTemplate::default(),
            max_upload_bytes: 2 * MB,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

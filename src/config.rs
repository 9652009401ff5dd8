use std::env;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_SUMMARY_MODEL: &str = "gpt-4o-mini";
const DEFAULT_SUMMARY_TEMPERATURE: f32 = 0.3;
const DEFAULT_SUMMARY_MAX_CHARS: usize = 10_000;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for the DocSum bot.
///
/// Loaded once at startup and passed explicitly into component constructors so
/// that tests can build components against fakes without touching the process
/// environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token used to authenticate against the Telegram Bot API.
    pub telegram_bot_token: String,
    /// Base URL of the Telegram Bot API (overridable for tests).
    pub telegram_api_url: String,
    /// Optional credential for the completion service; summaries are
    /// unavailable without it, but the bot still serves commands.
    pub openai_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible completion endpoint.
    pub openai_base_url: String,
    /// Model identifier passed with every completion request.
    pub summary_model: String,
    /// Sampling temperature for completion calls; kept low for stable output.
    pub summary_temperature: f32,
    /// Maximum fragment size, in characters, used by the chunker.
    pub summary_max_chars: usize,
    /// Long-poll window, in seconds, for `getUpdates`.
    pub poll_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let summary_max_chars = match load_env_optional("SUMMARY_MAX_CHARS") {
            Some(value) => value
                .parse::<usize>()
                .ok()
                .filter(|chars| *chars > 0)
                .ok_or_else(|| ConfigError::InvalidValue("SUMMARY_MAX_CHARS".to_string()))?,
            None => DEFAULT_SUMMARY_MAX_CHARS,
        };

        Ok(Self {
            telegram_bot_token: load_env("TELEGRAM_BOT_TOKEN")?,
            telegram_api_url: load_env_optional("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            openai_api_key: load_env_optional("OPENAI_API_KEY"),
            openai_base_url: load_env_optional("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            summary_model: load_env_optional("SUMMARY_MODEL")
                .unwrap_or_else(|| DEFAULT_SUMMARY_MODEL.to_string()),
            summary_temperature: load_env_optional("SUMMARY_TEMPERATURE")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SUMMARY_TEMPERATURE".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_SUMMARY_TEMPERATURE),
            summary_max_chars,
            poll_timeout_secs: load_env_optional("POLL_TIMEOUT_SECS")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("POLL_TIMEOUT_SECS".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS),
        })
    }

    /// Whether the completion credential is present.
    pub fn has_completion_credential(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_env(key: &str, value: &str) {
        // SAFETY: this is the only test touching these variables, and it runs
        // its scenarios sequentially within a single test function.
        unsafe { env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        // SAFETY: see `set_env`.
        unsafe { env::remove_var(key) }
    }

    #[test]
    fn from_env_requires_token_and_applies_defaults() {
        for key in [
            "TELEGRAM_BOT_TOKEN",
            "TELEGRAM_API_URL",
            "OPENAI_API_KEY",
            "OPENAI_BASE_URL",
            "SUMMARY_MODEL",
            "SUMMARY_TEMPERATURE",
            "SUMMARY_MAX_CHARS",
            "POLL_TIMEOUT_SECS",
        ] {
            remove_env(key);
        }

        let error = Config::from_env().expect_err("token required");
        assert!(matches!(error, ConfigError::MissingVariable(name) if name == "TELEGRAM_BOT_TOKEN"));

        set_env("TELEGRAM_BOT_TOKEN", "123:abc");
        let config = Config::from_env().expect("defaults apply");
        assert_eq!(config.telegram_api_url, DEFAULT_TELEGRAM_API_URL);
        assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.summary_model, DEFAULT_SUMMARY_MODEL);
        assert_eq!(config.summary_max_chars, DEFAULT_SUMMARY_MAX_CHARS);
        assert_eq!(config.poll_timeout_secs, DEFAULT_POLL_TIMEOUT_SECS);
        assert!(config.openai_api_key.is_none());
        assert!(!config.has_completion_credential());

        // Blank optionals behave as absent.
        set_env("OPENAI_API_KEY", "   ");
        let config = Config::from_env().expect("blank key ignored");
        assert!(config.openai_api_key.is_none());

        set_env("SUMMARY_MAX_CHARS", "0");
        let error = Config::from_env().expect_err("zero chunk size rejected");
        assert!(matches!(error, ConfigError::InvalidValue(name) if name == "SUMMARY_MAX_CHARS"));
        set_env("SUMMARY_MAX_CHARS", "250");

        set_env("SUMMARY_TEMPERATURE", "warm");
        let error = Config::from_env().expect_err("unparseable temperature rejected");
        assert!(matches!(error, ConfigError::InvalidValue(name) if name == "SUMMARY_TEMPERATURE"));
        set_env("SUMMARY_TEMPERATURE", "0.1");

        set_env("POLL_TIMEOUT_SECS", "soon");
        let error = Config::from_env().expect_err("unparseable poll window rejected");
        assert!(matches!(error, ConfigError::InvalidValue(name) if name == "POLL_TIMEOUT_SECS"));
        remove_env("POLL_TIMEOUT_SECS");

        set_env("OPENAI_API_KEY", "sk-test");
        let config = Config::from_env().expect("explicit values load");
        assert_eq!(config.summary_max_chars, 250);
        assert_eq!(config.summary_temperature, 0.1);
        assert!(config.has_completion_credential());

        remove_env("TELEGRAM_BOT_TOKEN");
        remove_env("OPENAI_API_KEY");
        remove_env("SUMMARY_MAX_CHARS");
        remove_env("SUMMARY_TEMPERATURE");
    }
}

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::optimize::prompts::PromptTemplate;

pub const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
const DEFAULT_PORT: u16 = 5001;
const DEFAULT_BASE_PATH: &str = "/api";
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Application configuration loaded from environment variables.
///
/// Built once at startup and shared by clone. A missing `DEEPSEEK_API_KEY`
/// is not a startup error: the server still boots and every optimize
/// request answers with the configuration error instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub deepseek_api_key: Option<String>,
    pub deepseek_api_url: String,
    pub model: String,
    pub prompt_template: PromptTemplate,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Largest accepted optimize request body, in bytes.
    pub max_body_bytes: usize,
    pub port: u16,
    /// Mount point of the API routes. Empty string means the root.
    pub base_path: String,
    pub static_dir: Option<PathBuf>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let prompt_template = match get("PROMPT_TEMPLATE") {
            Some(raw) => raw
                .parse::<PromptTemplate>()
                .with_context(|| format!("PROMPT_TEMPLATE has an unsupported value '{raw}'"))?,
            None => PromptTemplate::default(),
        };

        let max_tokens = match get("MAX_TOKENS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .context("MAX_TOKENS must be a positive integer")?,
            None => prompt_template.default_max_tokens(),
        };
        if max_tokens == 0 {
            bail!("MAX_TOKENS must be greater than zero");
        }

        let temperature = match get("TEMPERATURE") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .context("TEMPERATURE must be a number")?,
            None => DEFAULT_TEMPERATURE,
        };
        if !(0.0..=2.0).contains(&temperature) {
            bail!("TEMPERATURE must lie between 0.0 and 2.0, got {temperature}");
        }

        let max_body_bytes = match get("MAX_BODY_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("MAX_BODY_BYTES must be a positive integer")?,
            None => DEFAULT_MAX_BODY_BYTES,
        };
        if max_body_bytes == 0 {
            bail!("MAX_BODY_BYTES must be greater than zero");
        }

        Ok(Config {
            deepseek_api_key: get("DEEPSEEK_API_KEY").map(|key| key.trim().to_string()),
            deepseek_api_url: get("DEEPSEEK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: get("DEEPSEEK_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            prompt_template,
            max_tokens,
            temperature,
            max_body_bytes,
            port: get("PORT")
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .trim()
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            base_path: normalize_base_path(
                &lookup("API_BASE_PATH").unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
            ),
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// First six characters of the API key, for startup diagnostics.
    pub fn masked_api_key(&self) -> Option<String> {
        self.deepseek_api_key
            .as_deref()
            .map(|key| format!("{}...", key.chars().take(6).collect::<String>()))
    }
}

/// `"api/"` -> `"/api"`, `"/"` and `""` -> `""`.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_any_variables() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.deepseek_api_key, None);
        assert_eq!(config.deepseek_api_url, DEFAULT_API_URL);
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.prompt_template, PromptTemplate::Rewrite);
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.port, 5001);
        assert_eq!(config.max_body_bytes, 2 * 1024 * 1024);
        assert_eq!(config.base_path, "/api");
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_consultative_template_raises_default_max_tokens() {
        let config = config_from(&[("PROMPT_TEMPLATE", "consultative")]).unwrap();
        assert_eq!(config.prompt_template, PromptTemplate::Consultative);
        assert_eq!(config.max_tokens, 4000);
    }

    #[test]
    fn test_explicit_max_tokens_wins_over_template_default() {
        let config = config_from(&[
            ("PROMPT_TEMPLATE", "consultative"),
            ("MAX_TOKENS", "1500"),
        ])
        .unwrap();
        assert_eq!(config.max_tokens, 1500);
    }

    #[test]
    fn test_empty_api_key_counts_as_unset() {
        let config = config_from(&[("DEEPSEEK_API_KEY", "   ")]).unwrap();
        assert!(config.deepseek_api_key.is_none());
        assert!(config.masked_api_key().is_none());
    }

    #[test]
    fn test_masked_api_key_shows_prefix_only() {
        let config = config_from(&[("DEEPSEEK_API_KEY", "sk-1234567890")]).unwrap();
        assert_eq!(config.masked_api_key().as_deref(), Some("sk-123..."));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_from(&[("PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("TEMPERATURE", "3.5")]).is_err());
        assert!(config_from(&[("MAX_TOKENS", "0")]).is_err());
        assert!(config_from(&[("MAX_BODY_BYTES", "0")]).is_err());
        assert!(config_from(&[("PROMPT_TEMPLATE", "poetry")]).is_err());
    }

    #[test]
    fn test_max_body_bytes_override() {
        let config = config_from(&[("MAX_BODY_BYTES", "4096")]).unwrap();
        assert_eq!(config.max_body_bytes, 4096);
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path("/api"), "/api");
        assert_eq!(normalize_base_path("api/"), "/api");
        assert_eq!(normalize_base_path("/v1/resume/"), "/v1/resume");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path(""), "");
    }

    #[test]
    fn test_root_base_path_from_env() {
        let config = config_from(&[("API_BASE_PATH", "/")]).unwrap();
        assert_eq!(config.base_path, "");
    }
}

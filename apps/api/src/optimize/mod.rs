//! Résumé optimization: request parsing, validation, prompt building and the
//! upstream call. Shared by every deployment shape; adapters only translate
//! their native request/response types.

pub mod handlers;
pub mod prompts;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::{ChatCompletionRequest, ChatMessage, CompletionProvider};
use crate::optimize::prompts::{build_prompt, PromptTemplate};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Inbound body. `resumeText` stays loosely typed so that a missing field,
/// `null`, or a non-string value all land on the same validation error.
#[derive(Debug, Default, Deserialize)]
pub struct OptimizeRequest {
    #[serde(rename = "resumeText", default)]
    pub resume_text: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResponse {
    #[serde(rename = "optimizedResume")]
    pub optimized_resume: String,
}

impl OptimizeRequest {
    /// Decodes a raw JSON body.
    pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(body).map_err(|e| AppError::invalid_body(e.to_string()))
    }

    /// The résumé text, if it is a string with visible content.
    pub fn resume_text(&self) -> Result<&str, AppError> {
        match &self.resume_text {
            Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.as_str()),
            _ => Err(AppError::missing_resume_text()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Service
// ────────────────────────────────────────────────────────────────────────────

/// Immutable per-deployment settings for the optimize call.
#[derive(Debug, Clone)]
pub struct OptimizeSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub template: PromptTemplate,
    pub temperature: f64,
    pub max_tokens: u32,
    pub max_body_bytes: usize,
}

impl From<&Config> for OptimizeSettings {
    fn from(config: &Config) -> Self {
        Self {
            api_key: config.deepseek_api_key.clone(),
            model: config.model.clone(),
            template: config.prompt_template,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_body_bytes: config.max_body_bytes,
        }
    }
}

/// The single optimize operation, polymorphic over the upstream provider.
#[derive(Clone)]
pub struct OptimizeService {
    provider: Arc<dyn CompletionProvider>,
    settings: Arc<OptimizeSettings>,
}

impl OptimizeService {
    pub fn new(provider: Arc<dyn CompletionProvider>, settings: OptimizeSettings) -> Self {
        Self {
            provider,
            settings: Arc::new(settings),
        }
    }

    /// Chat request for `resume_text` under the configured template.
    pub fn build_request(&self, resume_text: &str) -> ChatCompletionRequest {
        let prompt = build_prompt(self.settings.template, resume_text);
        ChatCompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(prompt.system),
                ChatMessage::user(prompt.user),
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    /// Rewrites `resume_text` through the provider.
    ///
    /// Empty or whitespace-only input fails before any outbound call, as
    /// does a missing API key. On success the completion is returned
    /// exactly as the provider produced it.
    pub async fn optimize(&self, resume_text: &str) -> Result<String, AppError> {
        if resume_text.trim().is_empty() {
            return Err(AppError::missing_resume_text());
        }

        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or_else(AppError::missing_api_key)?;

        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            chars = resume_text.chars().count(),
            template = %self.settings.template,
            "Optimize request received"
        );

        let request = self.build_request(resume_text);

        let completion = self
            .provider
            .complete(api_key, &request)
            .await
            .and_then(|response| response.into_text());

        match completion {
            Ok(text) => {
                info!(%request_id, chars = text.chars().count(), "Optimize request succeeded");
                Ok(text)
            }
            Err(e) => {
                warn!(%request_id, "Optimize request failed: {e}");
                Err(AppError::Upstream(e))
            }
        }
    }

    pub fn max_body_bytes(&self) -> usize {
        self.settings.max_body_bytes
    }

    /// Full request path shared by the adapters: size check, decode,
    /// validate, optimize.
    pub async fn handle(&self, body: &[u8]) -> Result<OptimizeResponse, AppError> {
        if body.len() > self.settings.max_body_bytes {
            return Err(AppError::PayloadTooLarge {
                limit: self.settings.max_body_bytes,
            });
        }
        let request = OptimizeRequest::from_slice(body)?;
        let resume_text = request.resume_text()?;
        let optimized_resume = self.optimize(resume_text).await?;
        Ok(OptimizeResponse { optimized_resume })
    }
}

//! Google Gemini adapter.
//!
//! Implements the Gemini `generateContent` API. Auth is via an API key
//! passed as a query parameter (`key={api_key}`).

use std::time::{Duration, Instant};

use crate::traits::{CompletionRequest, CompletionResponse, CompletionService, Usage};
use crate::util::{from_reqwest, redact_url_key, resolve_api_key};
use parley_domain::config::ProviderConfig;
use parley_domain::error::{Error, Result};
use parley_domain::trace::TraceEvent;
use serde_json::Value;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A completion service backed by the Google Gemini API.
pub struct GoogleProvider {
    id: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    /// Create a new provider from the deserialized provider config.
    pub fn from_config(cfg: &ProviderConfig) -> Result<Self> {
        let api_key = resolve_api_key(&cfg.auth)?;
        Self::new(
            cfg.id.clone(),
            &cfg.base_url,
            api_key,
            Duration::from_millis(cfg.request_timeout_ms),
        )
    }

    pub fn new(
        id: impl Into<String>,
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            id: id.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// The model id is one path segment; it is escaped so ids passed through
    /// verbatim cannot change the request target.
    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url,
            urlencoding::encode(model),
            self.api_key
        )
    }
}

/// The JSON body for `generateContent`.
pub fn build_body(req: &CompletionRequest) -> Value {
    serde_json::json!({
        "contents": req.contents,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response deserialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Reduce a `generateContent` body to the text segments of its first
/// candidate. A body without candidates or text parts yields no segments.
fn parse_gemini_response(body: &Value) -> CompletionResponse {
    let candidate = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first());

    let Some(candidate) = candidate else {
        if let Some(reason) = body
            .get("promptFeedback")
            .and_then(|f| f.get("blockReason"))
            .and_then(|r| r.as_str())
        {
            tracing::debug!(block_reason = reason, "gemini returned no candidates");
        }
        return CompletionResponse::default();
    };

    let segments = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|v| v.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let finish_reason = candidate
        .get("finishReason")
        .and_then(|v| v.as_str())
        .map(|s| match s {
            "STOP" => "stop".to_string(),
            "MAX_TOKENS" => "length".to_string(),
            other => other.to_lowercase(),
        });

    CompletionResponse {
        segments,
        finish_reason,
        usage: body.get("usageMetadata").and_then(parse_gemini_usage),
    }
}

fn parse_gemini_usage(v: &Value) -> Option<Usage> {
    let prompt = v.get("promptTokenCount")?.as_u64()? as u32;
    let completion = v
        .get("candidatesTokenCount")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;
    let total = v
        .get("totalTokenCount")
        .and_then(|v| v.as_u64())
        .unwrap_or((prompt + completion) as u64) as u32;
    Some(Usage {
        prompt_tokens: prompt,
        completion_tokens: completion,
        total_tokens: total,
    })
}

/// Pull `error.message` out of a failed response body, if it has one.
fn parse_error_message(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    v.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl CompletionService for GoogleProvider {
    async fn complete(&self, req: &CompletionRequest) -> Result<CompletionResponse> {
        let url = self.generate_url(&req.model);
        let body = build_body(req);
        let started = Instant::now();

        tracing::debug!(
            provider = %self.id,
            url = %redact_url_key(&url),
            contents = req.contents.len(),
            "google completion request"
        );

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            let message = parse_error_message(&resp_text);
            tracing::warn!(
                provider = %self.id,
                status = status.as_u16(),
                message = message.as_deref().unwrap_or(""),
                "google completion failed"
            );
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let resp_json: Value = serde_json::from_str(&resp_text)?;
        let parsed = parse_gemini_response(&resp_json);

        TraceEvent::CompletionRequest {
            provider: self.id.clone(),
            model: req.model.clone(),
            status: status.as_u16(),
            duration_ms: started.elapsed().as_millis() as u64,
            segments: parsed.segments.len(),
            prompt_tokens: parsed.usage.map(|u| u.prompt_tokens),
            completion_tokens: parsed.usage.map(|u| u.completion_tokens),
        }
        .emit();

        Ok(parsed)
    }

    fn provider_id(&self) -> &str {
        &self.id
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Completion provider
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "d_provider_id")]
    pub id: String,
    /// Endpoint base, without the `/v1beta/...` path.
    #[serde(default = "d_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
    /// Transport-level timeout for one HTTP request.
    #[serde(default = "d_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            id: d_provider_id(),
            base_url: d_base_url(),
            auth: AuthConfig::default(),
            request_timeout_ms: d_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Env var containing the key.
    #[serde(default = "d_key_env")]
    pub env: Option<String>,
    /// Direct key (for config-only setups; prefer env or the keychain).
    #[serde(default)]
    pub key: Option<String>,
    /// Keychain service name (e.g., "parley").
    #[serde(default)]
    pub service: Option<String>,
    /// Keychain account name (e.g., "gemini-api-key").
    #[serde(default)]
    pub account: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            env: d_key_env(),
            key: None,
            service: None,
            account: None,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_provider_id() -> String {
    "google".into()
}
fn d_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn d_request_timeout_ms() -> u64 {
    120_000
}
fn d_key_env() -> Option<String> {
    Some("GEMINI_API_KEY".into())
}

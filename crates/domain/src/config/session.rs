use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::catalog::DEFAULT_MODEL;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session engine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Model targeted until the user selects another one.
    #[serde(default = "d_default_model")]
    pub default_model: String,
    /// Upper bound on one turn's service call. `None` waits indefinitely.
    #[serde(default)]
    pub turn_timeout_ms: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_model: d_default_model(),
            turn_timeout_ms: None,
        }
    }
}

impl SessionConfig {
    pub fn turn_timeout(&self) -> Option<Duration> {
        self.turn_timeout_ms.map(Duration::from_millis)
    }
}

fn d_default_model() -> String {
    DEFAULT_MODEL.into()
}

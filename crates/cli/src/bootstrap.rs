//! Wiring: config → completion provider → session engine.

use std::sync::Arc;

use anyhow::Context;

use parley_domain::catalog::ModelCatalog;
use parley_domain::config::Config;
use parley_providers::GoogleProvider;
use parley_sessions::SessionEngine;

/// Build a session engine backed by the configured Gemini endpoint.
pub fn build_engine(config: &Config) -> anyhow::Result<SessionEngine> {
    let provider = GoogleProvider::from_config(&config.provider)
        .context("initializing completion provider")?;

    tracing::info!(
        provider = %config.provider.id,
        base_url = %config.provider.base_url,
        default_model = %config.session.default_model,
        "session engine ready"
    );

    Ok(SessionEngine::new(
        Arc::new(provider),
        &config.session,
        config.catalog(),
    ))
}

/// Map a user-supplied model name to a model id. Catalog keys, ids, and
/// labels resolve to the catalog id; anything else is used verbatim.
pub fn resolve_model(catalog: &ModelCatalog, name: &str) -> String {
    catalog
        .resolve(name)
        .map(|o| o.model.clone())
        .unwrap_or_else(|| name.trim().to_string())
}

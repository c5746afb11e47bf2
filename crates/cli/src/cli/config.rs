use parley_domain::config::{Config, ConfigSeverity};

const DEFAULT_KEYCHAIN_SERVICE: &str = "parley";
const DEFAULT_KEYCHAIN_ACCOUNT: &str = "gemini-api-key";

/// Parse and validate the config, printing any issues.
///
/// Returns `false` when errors are found.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }

    println!(
        "\n{} error(s), {} warning(s) in {config_path}",
        error_count, warning_count,
    );

    error_count == 0
}

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config) -> anyhow::Result<()> {
    let output = toml::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("serializing config: {e}"))?;
    print!("{output}");
    Ok(())
}

/// Prompt for the API key and store it in the OS keychain.
pub fn set_secret(config: &Config) -> anyhow::Result<()> {
    let auth = &config.provider.auth;
    let service = auth.service.as_deref().unwrap_or(DEFAULT_KEYCHAIN_SERVICE);
    let account = auth.account.as_deref().unwrap_or(DEFAULT_KEYCHAIN_ACCOUNT);

    let secret = rpassword::read_password_from_tty(Some("API key: "))?;
    let secret = secret.trim();
    if secret.is_empty() {
        anyhow::bail!("no key entered");
    }

    parley_providers::util::store_in_keychain(service, account, secret)?;
    println!("Stored API key in keychain ({service}/{account}).");

    if auth.service.is_none() || auth.account.is_none() {
        println!("Add this to your config so Parley reads it:");
        println!();
        println!("[provider.auth]");
        println!("service = \"{service}\"");
        println!("account = \"{account}\"");
    }
    Ok(())
}

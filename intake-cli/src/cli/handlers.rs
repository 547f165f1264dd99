//! Handlers for server-side commands

use anyhow::{Context, Result};
use intake_core::access::Role;
use intake_core::models::{Configuration, LogLevel, NotifierKind};
use intake_core::server::IntakeServer;
use intake_core::services::logging::init_logging;
use std::io::{self, Write};
use std::path::PathBuf;

/// Resolve `--config-file`, expanding `~/` and falling back to the XDG default
pub fn resolve_config_path(config_file: Option<String>) -> Result<PathBuf> {
    match config_file {
        Some(path) if path.starts_with("~/") => {
            let home = dirs::home_dir().context("Could not determine home directory")?;
            Ok(home.join(&path[2..]))
        }
        Some(path) => Ok(PathBuf::from(path)),
        None => Configuration::default_config_path()
            .map_err(|e| anyhow::anyhow!("Failed to get default config path: {}", e)),
    }
}

/// Handle the 'serve' command
pub async fn handle_serve(
    host: Option<String>,
    port: Option<u16>,
    config_file: Option<String>,
) -> Result<()> {
    let config_path = resolve_config_path(config_file)?;
    let mut config = Configuration::load_from_file(&config_path)
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", config_path.display(), e))?
        .with_env_overrides();

    if let Some(host) = host {
        config.server_host = host;
    }
    if let Some(port) = port {
        config.server_port = port;
    }

    init_logging(config.log_level.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    tracing::info!(config = %config_path.display(), "Loaded configuration");

    let server = IntakeServer::from_config(config)?;
    server.start().await
}

fn read_user_input_sync() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_line(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

fn prompt(label: &str, default: &str) -> Result<Option<String>> {
    print!("{} [{}]: ", label, default);
    io::stdout().flush()?;
    let input = read_user_input_sync()?;
    let input = input.trim();
    Ok(if input.is_empty() {
        None
    } else {
        Some(input.to_string())
    })
}

/// Empty keeps the current notifier, `log` switches to log-only
fn apply_notifier_answer(config: &mut Configuration, answer: Option<String>) {
    match answer.as_deref() {
        None => {}
        Some(kind) if kind.eq_ignore_ascii_case("log") => {
            config.notifier.kind = NotifierKind::Log;
            config.notifier.webhook_url = None;
        }
        Some(url) => {
            config.notifier.kind = NotifierKind::Webhook;
            config.notifier.webhook_url = Some(url.to_string());
        }
    }
}

fn log_level_name(level: &LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

/// Handle the 'config' command
pub async fn handle_config_init(config_file: Option<String>) -> Result<()> {
    println!("⚙️  Initializing intake configuration");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config_path = resolve_config_path(config_file)?;
    println!("📄 Config file: {}", config_path.display());

    let mut config = if config_path.exists() {
        println!("⚠️  Configuration file already exists. Loading existing values...");
        Configuration::load_from_file(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to load existing config: {}", e))?
    } else {
        println!("✨ Creating new configuration with defaults...");
        Configuration::default()
    };

    println!("\n📝 Please answer the following questions (press Enter to use default):\n");

    if let Some(level) = prompt(
        "Log level (error/warn/info/debug/trace)",
        log_level_name(&config.log_level),
    )? {
        config.log_level = match level.to_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => {
                println!("⚠️  Invalid log level, using default");
                config.log_level.clone()
            }
        };
    }

    if let Some(host) = prompt("Server bind address", &config.server_host)? {
        config.server_host = host;
    }

    if let Some(port) = prompt("Server port", &config.server_port.to_string())? {
        match port.parse::<u16>() {
            Ok(port) => config.server_port = port,
            Err(_) => println!("⚠️  Invalid port number, using default"),
        }
    }

    if let Some(url) = prompt("Frontend URL for join links", &config.frontend_url)? {
        config.frontend_url = url;
    }

    let notifier_default = match config.notifier.kind {
        NotifierKind::Webhook => config.notifier.webhook_url.clone().unwrap_or_default(),
        NotifierKind::Log => "log".to_string(),
    };
    let answer = prompt(
        "Notification webhook URL ('log' to only log notifications)",
        &notifier_default,
    )?;
    apply_notifier_answer(&mut config, answer);

    let has_admin = config
        .access_tokens
        .values()
        .any(|role| *role == Role::Admin);
    if !has_admin {
        let token = uuid::Uuid::new_v4().simple().to_string();
        config.access_tokens.insert(token.clone(), Role::Admin);
        println!("🔑 Generated admin token: {}", token);
    }

    println!("\n🔍 Validating configuration...");
    match config.validate() {
        Ok(()) => {
            println!("✅ Configuration is valid");
        }
        Err(errors) => {
            println!("❌ Configuration validation failed:");
            for error in &errors {
                println!("   - {}", error);
            }
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("\n💾 Saving configuration to {}...", config_path.display());
    config
        .save_to_file(&config_path)
        .map_err(|e| anyhow::anyhow!("Failed to save configuration: {}", e))?;

    println!("✅ Configuration saved successfully!");
    println!("\n📋 Configuration summary:");
    println!("   Log level: {}", log_level_name(&config.log_level));
    println!("   Server: {}", config.bind_address());
    println!("   Frontend: {}", config.frontend_url);
    println!(
        "   Notifier: {}",
        match config.notifier.kind {
            NotifierKind::Log => "log".to_string(),
            NotifierKind::Webhook => format!(
                "webhook ({})",
                config.notifier.webhook_url.as_deref().unwrap_or("not set")
            ),
        }
    );
    println!("   Access tokens: {}", config.access_tokens.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_config_path() {
        let path = resolve_config_path(Some("/tmp/intake/config.toml".to_string())).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/intake/config.toml"));
    }

    #[test]
    fn test_resolve_home_relative_config_path() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let path = resolve_config_path(Some("~/intake.toml".to_string())).unwrap();
        assert_eq!(path, home.join("intake.toml"));
    }

    fn webhook_config() -> Configuration {
        let mut config = Configuration::default();
        config.notifier.kind = NotifierKind::Webhook;
        config.notifier.webhook_url = Some("https://hooks.example.org/intake".to_string());
        config
    }

    #[test]
    fn test_empty_notifier_answer_keeps_webhook() {
        let mut config = webhook_config();
        apply_notifier_answer(&mut config, None);
        assert_eq!(config.notifier, webhook_config().notifier);
    }

    #[test]
    fn test_log_notifier_answer_clears_webhook() {
        let mut config = webhook_config();
        apply_notifier_answer(&mut config, Some("LOG".to_string()));
        assert_eq!(config.notifier.kind, NotifierKind::Log);
        assert!(config.notifier.webhook_url.is_none());
    }

    #[test]
    fn test_url_notifier_answer_selects_webhook() {
        let mut config = Configuration::default();
        apply_notifier_answer(&mut config, Some("http://localhost:9000/hook".to_string()));
        assert_eq!(config.notifier.kind, NotifierKind::Webhook);
        assert_eq!(
            config.notifier.webhook_url.as_deref(),
            Some("http://localhost:9000/hook")
        );
    }
}

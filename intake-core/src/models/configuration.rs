//! Configuration data structures

use crate::access::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable that registers an extra admin token at startup
pub const ADMIN_TOKEN_ENV: &str = "INTAKE_ADMIN_TOKEN";

/// Logging level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum LogLevel {
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "trace")]
    Trace,
}

/// Which notifier delivers approval notifications
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum NotifierKind {
    /// Write notifications to the log only
    #[serde(rename = "log")]
    #[default]
    Log,
    /// POST notifications as JSON to `webhook_url`
    #[serde(rename = "webhook")]
    Webhook,
}

/// Notifier settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct NotifierConfig {
    #[serde(default)]
    pub kind: NotifierKind,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Configuration {
    /// Logging verbosity level
    pub log_level: LogLevel,
    /// Server bind address
    pub server_host: String,
    /// Server port number
    pub server_port: u16,
    /// Base URL of the web frontend, used to build join links
    pub frontend_url: String,
    /// Maximum request body size in bytes
    pub max_body_size: u64,
    /// Notification delivery
    pub notifier: NotifierConfig,
    /// Bearer token -> role
    pub access_tokens: HashMap<String, Role>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            frontend_url: "http://localhost:4200".to_string(),
            max_body_size: 16 * 1024,
            notifier: NotifierConfig::default(),
            access_tokens: HashMap::new(),
        }
    }
}

impl Configuration {
    /// Load configuration from file
    pub fn load_from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Configuration = toml::from_str(&content)?;
            Ok(config)
        } else {
            // Return default configuration if file doesn't exist
            Ok(Configuration::default())
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn default_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_dir = dirs::config_dir().ok_or("Could not determine config directory")?;
        Ok(config_dir.join("intake").join("config.toml"))
    }

    /// Register the admin token from `INTAKE_ADMIN_TOKEN`, if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(token) = std::env::var(ADMIN_TOKEN_ENV) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                self.access_tokens.insert(token, Role::Admin);
            }
        }
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // Validate port (u16 is already 0-65535, so only check minimum)
        if self.server_port < 1024 {
            errors.push(
                "server_port must be at least 1024 (privileged ports not allowed)".to_string(),
            );
        }

        match url::Url::parse(&self.frontend_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => errors.push("frontend_url must be an absolute http(s) URL".to_string()),
        }

        if self.max_body_size == 0 || self.max_body_size > 1024 * 1024 {
            errors.push("max_body_size must be between 1 and 1048576 bytes".to_string());
        }

        if self.notifier.kind == NotifierKind::Webhook {
            match self.notifier.webhook_url.as_deref().map(url::Url::parse) {
                Some(Ok(_)) => {}
                Some(Err(_)) => errors.push("notifier.webhook_url is not a valid URL".to_string()),
                None => errors.push(
                    "notifier.webhook_url is required when notifier.kind is webhook".to_string(),
                ),
            }
        }

        if self.access_tokens.keys().any(|token| token.trim().is_empty()) {
            errors.push("access_tokens cannot contain an empty token".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.notifier.kind, NotifierKind::Log);
        assert!(config.access_tokens.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_configuration_validation() {
        let mut access_tokens = HashMap::new();
        access_tokens.insert(" ".to_string(), Role::Admin);
        let config = Configuration {
            server_port: 80,
            frontend_url: "not a url".to_string(),
            notifier: NotifierConfig {
                kind: NotifierKind::Webhook,
                webhook_url: None,
            },
            access_tokens,
            ..Configuration::default()
        };

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("server_port")));
        assert!(errors.iter().any(|e| e.contains("frontend_url")));
        assert!(errors.iter().any(|e| e.contains("webhook_url")));
        assert!(errors.iter().any(|e| e.contains("access_tokens")));
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Configuration = toml::from_str(
            r#"
server_port = 9090

[access_tokens]
secret-admin = "admin"
"#,
        )
        .unwrap();
        assert_eq!(config.server_port, 9090);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.access_tokens.get("secret-admin"), Some(&Role::Admin));
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Configuration {
            server_port: 9191,
            notifier: NotifierConfig {
                kind: NotifierKind::Webhook,
                webhook_url: Some("http://localhost:9000/hook".to_string()),
            },
            ..Configuration::default()
        };
        config
            .access_tokens
            .insert("instructor-token".to_string(), Role::Instructor);

        config.save_to_file(&config_path).unwrap();
        assert!(config_path.exists());

        let loaded_config = Configuration::load_from_file(&config_path).unwrap();
        assert_eq!(loaded_config, config);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("absent.toml");
        let loaded = Configuration::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, Configuration::default());
    }
}

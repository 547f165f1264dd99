//! Logging service

use crate::models::LogLevel;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter
pub const LOG_FILTER_ENV: &str = "INTAKE_LOG";

fn filter_for(level: &LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "intake=error,intake_core=error,intake_cli=error",
        LogLevel::Warn => "intake=warn,intake_core=warn,intake_cli=warn",
        LogLevel::Info => "intake=info,intake_core=info,intake_cli=info",
        LogLevel::Debug => "intake=debug,intake_core=debug,intake_cli=debug",
        LogLevel::Trace => "intake=trace,intake_core=trace,intake_cli=trace",
    }
}

/// Initialize logging with the specified level
pub fn init_logging(level: LogLevel) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(filter_for(&level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}

/// Log a completed account request action
pub fn log_action(action: &str, account_request_id: &str, details: &str) {
    tracing::info!(
        action = action,
        account_request_id = account_request_id,
        details = details,
        "Action completed"
    );
}

/// Log a security event (always logged regardless of level)
pub fn log_security_event(event_type: &str, caller: &str, details: &str) {
    tracing::warn!(
        event_type = event_type,
        caller = caller,
        details = details,
        "Security event"
    );
}

/// Log a system error
pub fn log_error(error: &str, context: Option<&str>) {
    tracing::error!(
        error = error,
        context = context.unwrap_or(""),
        "System error occurred"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    static INIT: Once = Once::new();

    fn init_test_logging() {
        INIT.call_once(|| {
            let _ = init_logging(LogLevel::Debug);
        });
    }

    #[test]
    fn test_filter_names_every_crate() {
        let filter = filter_for(&LogLevel::Warn);
        assert!(filter.contains("intake_core=warn"));
        assert!(filter.contains("intake_cli=warn"));
    }

    #[test]
    fn test_second_initialization_is_an_error_not_a_panic() {
        init_test_logging();
        assert!(init_logging(LogLevel::Info).is_err());
    }

    #[test]
    fn test_log_functions() {
        init_test_logging();

        // These should not panic
        log_action("update_account_request", "id", "status=APPROVED");
        log_security_event("access_denied", "anonymous", "update_account_request");
        log_error("test error", Some("test context"));
    }
}

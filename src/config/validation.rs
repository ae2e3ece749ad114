//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: CoreConfig → Result<(), Vec<ValidationError>>

use crate::config::schema::CoreConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn validate_config(config: &CoreConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.node.url) {
        Ok(url) if url.scheme() == "ws" || url.scheme() == "wss" => {}
        Ok(url) => errors.push(ValidationError {
            field: "node.url",
            message: format!("scheme '{}' is not ws or wss", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError {
            field: "node.url",
            message: format!("invalid URL '{}': {}", config.node.url, e),
        }),
    }

    if config.node.max_message_size == 0 {
        errors.push(ValidationError {
            field: "node.max_message_size",
            message: "must be greater than zero".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError {
            field: "observability.log_level",
            message: format!("unknown level '{}'", config.observability.log_level),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&CoreConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = CoreConfig::default();
        config.node.url = "http://localhost:9933".to_string();
        config.node.max_message_size = 0;
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].field, "node.url");
        assert!(errors[0].to_string().contains("http"));
    }

    #[test]
    fn test_unparseable_url() {
        let mut config = CoreConfig::default();
        config.node.url = "not a url".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].message.contains("invalid URL"));
    }
}

//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - Tool and environment names must be non-empty
//! - Model categories must be non-empty and unique
//! - The weight extension is given without a leading dot
//! - Secondary modules must be non-empty identifiers
//! - The server port must be non-zero

use crate::config::schema::BootstrapConfig;
use crate::error::{BootstrapError, Result};
use std::collections::HashSet;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
///
/// Collects every violation rather than stopping at the first one.
pub fn validate_config(config: &BootstrapConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_tool(config));
    errors.extend(validate_environment(config));
    errors.extend(validate_dependencies(config));
    errors.extend(validate_models(config));

    if config.server.port == 0 {
        errors.push(ValidationError::new(
            "invalid-port",
            "server.port must be non-zero",
        ));
    }
    if !config.server.health_path.starts_with('/') {
        errors.push(ValidationError::new(
            "relative-health-path",
            format!(
                "server.health_path '{}' must start with '/'",
                config.server.health_path
            ),
        ));
    }

    errors
}

fn validate_tool(config: &BootstrapConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if config.tool.executable.trim().is_empty() {
        errors.push(ValidationError::new(
            "empty-tool",
            "tool.executable must not be empty",
        ));
    }
    errors
}

fn validate_environment(config: &BootstrapConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let name = config.environment.name.trim();

    if name.is_empty() {
        errors.push(ValidationError::new(
            "empty-environment-name",
            "environment.name must not be empty",
        ));
    } else if name.contains(['/', '\\', ' ']) {
        errors.push(ValidationError::new(
            "invalid-environment-name",
            format!(
                "environment.name '{}' must not contain slashes or spaces",
                name
            ),
        ));
    }

    if config.environment.spec_file.as_os_str().is_empty() {
        errors.push(ValidationError::new(
            "empty-spec-file",
            "environment.spec_file must not be empty",
        ));
    }

    errors
}

fn validate_dependencies(config: &BootstrapConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let critical = &config.dependencies.critical;

    if critical.import.trim().is_empty() || critical.version_expr.trim().is_empty() {
        errors.push(ValidationError::new(
            "incomplete-critical-dependency",
            "dependencies.critical needs both 'import' and 'version_expr'",
        ));
    }

    for module in &config.dependencies.secondary {
        let valid = !module.is_empty()
            && module
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_'));
        if !valid {
            errors.push(ValidationError::new(
                "invalid-module",
                format!("'{}' is not a valid Python module name", module),
            ));
        }
    }

    errors
}

fn validate_models(config: &BootstrapConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let models = &config.models;

    if models.categories.is_empty() {
        errors.push(ValidationError::new(
            "no-model-categories",
            "models.categories must list at least one category",
        ));
    }

    let mut seen = HashSet::new();
    for category in &models.categories {
        if category.trim().is_empty() {
            errors.push(ValidationError::new(
                "empty-model-category",
                "model categories must not be empty",
            ));
        } else if !seen.insert(category.as_str()) {
            errors.push(ValidationError::new(
                "duplicate-model-category",
                format!("model category '{}' is listed twice", category),
            ));
        }
    }

    if models.extension.is_empty() {
        errors.push(ValidationError::new(
            "empty-extension",
            "models.extension must not be empty",
        ));
    } else if models.extension.starts_with('.') {
        errors.push(ValidationError::new(
            "dotted-extension",
            format!(
                "models.extension '{}' must not start with a dot",
                models.extension
            ),
        ));
    }

    errors
}

/// Validate and return Result (for convenience).
///
/// # Errors
///
/// Returns `ConfigValidationError` if any validation rules fail.
pub fn validate(config: &BootstrapConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(BootstrapError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&BootstrapConfig::default()).is_ok());
    }

    #[test]
    fn rejects_empty_environment_name() {
        let mut config = BootstrapConfig::default();
        config.environment.name = "  ".to_string();
        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| e.rule == "empty-environment-name"));
    }

    #[test]
    fn rejects_environment_name_with_slash() {
        let mut config = BootstrapConfig::default();
        config.environment.name = "envs/trees".to_string();
        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| e.rule == "invalid-environment-name"));
    }

    #[test]
    fn rejects_dotted_extension() {
        let mut config = BootstrapConfig::default();
        config.models.extension = ".pt".to_string();
        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| e.rule == "dotted-extension"));
    }

    #[test]
    fn rejects_empty_and_duplicate_categories() {
        let mut config = BootstrapConfig::default();
        config.models.categories = vec![];
        assert!(validate_config(&config)
            .iter()
            .any(|e| e.rule == "no-model-categories"));

        config.models.categories = vec!["summer".to_string(), "summer".to_string()];
        assert!(validate_config(&config)
            .iter()
            .any(|e| e.rule == "duplicate-model-category"));
    }

    #[test]
    fn rejects_bad_module_names() {
        let mut config = BootstrapConfig::default();
        config.dependencies.secondary = vec!["flask".to_string(), "torch; rm".to_string()];
        let errors = validate_config(&config);
        assert_eq!(
            errors.iter().filter(|e| e.rule == "invalid-module").count(),
            1
        );
    }

    #[test]
    fn accepts_dotted_module_names() {
        let mut config = BootstrapConfig::default();
        config.dependencies.secondary = vec!["osgeo.ogr".to_string()];
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn rejects_zero_port() {
        let mut config = BootstrapConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config)
            .iter()
            .any(|e| e.rule == "invalid-port"));
    }

    #[test]
    fn rejects_health_path_without_leading_slash() {
        let mut config = BootstrapConfig::default();
        config.server.health_path = "health".to_string();
        assert!(validate_config(&config)
            .iter()
            .any(|e| e.rule == "relative-health-path"));

        config.server.health_path = "/healthz".to_string();
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn validate_joins_all_messages() {
        let mut config = BootstrapConfig::default();
        config.tool.executable = String::new();
        config.server.port = 0;
        match validate(&config) {
            Err(BootstrapError::ConfigValidationError { message }) => {
                assert!(message.contains("tool.executable"));
                assert!(message.contains("server.port"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}

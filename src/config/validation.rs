use crate::address::AddressTemplate;
use crate::config::types::{Config, FetchConfig, OrchestratorConfig, RenderConfig, SourceConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_output_config(&config.output)?;
    validate_render_config(&config.render)?;
    validate_fetch_config(&config.fetch)?;
    validate_orchestrator_config(&config.orchestrator)?;
    Ok(())
}

/// Validates the template and the chapter range
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    AddressTemplate::parse(&config.address_template)?;

    if config.start_chapter > config.end_chapter {
        return Err(ConfigError::Validation(format!(
            "start-chapter ({}) must not exceed end-chapter ({})",
            config.start_chapter, config.end_chapter
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &crate::config::types::OutputConfig) -> Result<(), ConfigError> {
    if config.destination_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "destination-root cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates browser pool and render retry settings
fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    if config.pool_size < 1 || config.pool_size > 32 {
        return Err(ConfigError::Validation(format!(
            "render pool-size must be between 1 and 32, got {}",
            config.pool_size
        )));
    }

    if config.retry_attempts < 1 {
        return Err(ConfigError::Validation(
            "render retry-attempts must be >= 1".to_string(),
        ));
    }

    if config.backoff_min_ms > config.backoff_max_ms {
        return Err(ConfigError::Validation(format!(
            "render backoff-min-ms ({}) must not exceed backoff-max-ms ({})",
            config.backoff_min_ms, config.backoff_max_ms
        )));
    }

    if config.wait_timeout_secs == 0 || config.page_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "render timeouts must be >= 1 second".to_string(),
        ));
    }

    if let Some(selector) = &config.wait_selector {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(
                "wait-selector cannot be blank".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.retry_attempts < 1 {
        return Err(ConfigError::Validation(
            "fetch retry-attempts must be >= 1".to_string(),
        ));
    }

    if config.max_concurrent < 1 {
        return Err(ConfigError::Validation(
            "fetch max-concurrent must be >= 1".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_orchestrator_config(config: &OrchestratorConfig) -> Result<(), ConfigError> {
    if config.chapter_concurrency < 1 {
        return Err(ConfigError::Validation(
            "chapter-concurrency must be >= 1".to_string(),
        ));
    }
    Ok(())
}

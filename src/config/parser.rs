use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Parses and validates TOML configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Reads, parses and validates the configuration file at `path`
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Hex SHA-256 of configuration text, logged so runs can be told apart
pub fn config_fingerprint(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Loads a configuration together with the fingerprint of the exact text parsed
///
/// The file is read once, so an edit between parsing and hashing cannot make
/// the logged fingerprint describe a different configuration.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, config_fingerprint(&content)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const MINIMAL: &str = r#"
[source]
address-template = "https://site.test/x/c{chapter}?page={page}"
start-chapter = 1
end-chapter = 3

[output]
destination-root = "./images"
"#;

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        let file = create_temp_config(MINIMAL);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.source.mode, Mode::Resources);
        assert_eq!(config.source.max_pages, None);
        assert_eq!(config.render.pool_size, 5);
        assert_eq!(config.render.retry_attempts, 5);
        assert_eq!(config.fetch.retry_attempts, 3);
        assert_eq!(config.fetch.backoff_ms, 2000);
        assert_eq!(config.orchestrator.chapter_concurrency, 2);
        assert_eq!(config.wait_selector(), "body");
    }

    #[test]
    fn test_load_archive_config() {
        let config_content = r#"
[source]
address-template = "https://site.test/x/c{chapter}?page={page}"
start-chapter = 1
end-chapter = 30
mode = "archive"

[output]
destination-root = "./html_pages"

[render]
pool-size = 2
retry-attempts = 4
backoff-min-ms = 10
backoff-max-ms = 20

[orchestrator]
chapter-concurrency = 1
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.source.mode, Mode::Archive);
        assert_eq!(config.render.pool_size, 2);
        assert_eq!(config.render.retry_attempts, 4);
        assert_eq!(config.orchestrator.chapter_concurrency, 1);
        assert_eq!(config.wait_selector(), "body");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/mirror.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[source]
address-template = "https://site.test/x/c{chapter}?page={page}"
start-chapter = 5
end-chapter = 1

[output]
destination-root = "./images"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_fingerprint_is_stable_per_content() {
        let first = config_fingerprint("content 1");

        assert_eq!(first, config_fingerprint("content 1"));
        assert_ne!(first, config_fingerprint("content 2"));
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_loaded_hash_matches_parsed_text() {
        let file = create_temp_config(MINIMAL);

        let (config, hash) = load_config_with_hash(file.path()).unwrap();

        assert_eq!(hash, config_fingerprint(MINIMAL));
        assert_eq!(config.source.end_chapter, 3);
    }

    #[test]
    fn test_parse_config_without_file() {
        let config = parse_config(MINIMAL).unwrap();
        assert_eq!(config.output.destination_root, Path::new("./images"));

        assert!(matches!(
            parse_config("[source]\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}

use crate::{AppError, config::Config};

use std::{fs, time::Duration};

use record_trigger_core::{DEFAULT_BACKOFF, DEFAULT_ENDPOINT, FramingPolicy, ListenerSettings};

/// WHAT: Default config targets the fixed local endpoint
/// WHY: Hosts that never edit the file get the standard trigger server
#[test]
fn given_default_config_when_converting_then_core_defaults() {
    // Given: Default configuration
    let config = Config::default();

    // When: Converting to listener settings
    let settings = config.listener.to_settings();

    // Then: Matches the core defaults
    assert_eq!(settings, ListenerSettings::default());
    assert_eq!(config.listener.endpoint(), DEFAULT_ENDPOINT);
    assert_eq!(settings.backoff, DEFAULT_BACKOFF);
    assert!(config.validate().is_ok());
}

/// WHAT: Missing fields fall back to defaults
/// WHY: Partial config files must keep working
#[test]
fn given_partial_toml_when_parsing_then_defaults_fill_gaps() {
    // Given: Only port and framing set
    let contents = "[listener]\nport = 4000\nframing = \"accumulate\"\n";

    // When: Parsing
    let config: Config = toml::from_str(contents).unwrap();

    // Then: Overrides applied, rest defaulted
    assert_eq!(config.listener.port, 4000);
    assert_eq!(config.listener.framing, FramingPolicy::Accumulate);
    assert_eq!(config.listener.host, "127.0.0.1");
    assert_eq!(
        config.listener.to_settings().connect_timeout,
        Duration::from_secs(2)
    );
    assert_eq!(config.logging, Config::default().logging);
}

/// WHAT: Loading a missing file writes and returns defaults
/// WHY: First run creates an editable config
#[test]
fn given_missing_file_when_loading_then_default_created() {
    // Given: An empty directory
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    // When: Loading
    let config = Config::load_from(&path).unwrap();

    // Then: Defaults returned and persisted without a leftover temp file
    assert_eq!(config, Config::default());
    assert!(path.exists());
    assert!(!path.with_extension("toml.tmp").exists());
}

/// WHAT: Saved config loads back unchanged
/// WHY: Atomic save must not lose fields
#[test]
fn given_saved_config_when_loading_then_same_values() {
    // Given: A customised config saved to disk
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut config = Config::default();
    config.listener.port = 5050;
    config.listener.backoff_ms = 250;
    config.logging.filter = "record_trigger=debug".to_string();
    config.save_to(&path).unwrap();

    // When: Loading it back
    let loaded = Config::load_from(&path).unwrap();

    // Then: Identical
    assert_eq!(loaded, config);
}

/// WHAT: Invalid TOML is a config error
/// WHY: A broken file must be reported, not silently replaced
#[test]
fn given_invalid_toml_when_loading_then_config_error() {
    // Given: A file that is not TOML
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[listener\nport = ").unwrap();

    // When: Loading
    let result = Config::load_from(&path);

    // Then: ConfigError
    assert!(matches!(result, Err(AppError::ConfigError { .. })));
}

/// WHAT: Port 0, empty host and zero backoff are rejected
/// WHY: The listener cannot connect or would spin without them
#[test]
fn given_invalid_values_when_validating_then_config_error() {
    let mut zero_port = Config::default();
    zero_port.listener.port = 0;
    let mut empty_host = Config::default();
    empty_host.listener.host = " ".to_string();
    let mut zero_backoff = Config::default();
    zero_backoff.listener.backoff_ms = 0;

    for config in [zero_port, empty_host, zero_backoff] {
        assert!(matches!(
            config.validate(),
            Err(AppError::ConfigError { .. })
        ));
    }
}

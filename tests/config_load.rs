//! Config file loading tests.

use std::fs;
use std::path::PathBuf;

use admission_gate::{load_config, ConfigError, ConnectionGate};

fn write_temp_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("admission-gate-{}-{}.toml", std::process::id(), name));
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn loads_full_config_from_toml() {
    let path = write_temp_config(
        "full",
        r#"
max_connections = 1000
max_connections_per_addr = 10
max_attempts_per_window = -1
window_secs = 30
"#,
    );

    let config = load_config(&path).expect("load");
    assert_eq!(config.max_connections_limit(), Some(1000));
    assert_eq!(config.max_connections_per_addr_limit(), Some(10));
    assert_eq!(config.max_attempts_per_window_limit(), None);
    assert_eq!(config.window().as_secs(), 30);

    let gate = ConnectionGate::from_config(&config);
    let peer = "203.0.113.1".parse().unwrap();
    for _ in 0..10 {
        assert!(gate.try_admit(peer));
    }
    assert!(!gate.try_admit(peer), "per-address ceiling from file");

    fs::remove_file(path).ok();
}

#[test]
fn empty_file_yields_defaults() {
    let path = write_temp_config("empty", "");

    let config = load_config(&path).expect("load");
    assert_eq!(config.max_connections, 500);
    assert_eq!(config.max_connections_per_addr, 5);

    fs::remove_file(path).ok();
}

#[test]
fn rejects_semantically_invalid_values() {
    let path = write_temp_config(
        "invalid",
        r#"
max_connections = -3
window_secs = 0
"#,
    );

    let err = load_config(&path).expect_err("must fail validation");
    match err {
        ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation error, got {other}"),
    }

    fs::remove_file(path).ok();
}

#[test]
fn rejects_malformed_toml() {
    let path = write_temp_config("malformed", "max_connections = [not toml");

    let err = load_config(&path).expect_err("must fail parsing");
    assert!(matches!(err, ConfigError::Parse(_)));

    fs::remove_file(path).ok();
}

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use docserve::config::{Config, ServerConfig};

#[test]
fn test_config_defaults() {
    let cfg = ServerConfig::default();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.document_root, PathBuf::from("."));
    assert_eq!(cfg.workers, 10);
    assert_eq!(cfg.read_timeout(), Duration::from_secs(30));
    assert_eq!(cfg.shutdown_grace(), Duration::from_secs(5));
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml(
        "server:\n  port: 9000\n  document_root: /srv/www\n  workers: 4\n",
    )
    .unwrap();

    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.server.document_root, PathBuf::from("/srv/www"));
    assert_eq!(cfg.server.workers, 4);
    // Unset fields keep their defaults
    assert_eq!(cfg.server.read_timeout_secs, 30);
}

#[test]
fn test_config_empty_yaml_is_default() {
    assert_eq!(Config::from_yaml("").unwrap(), Config::default());
}

#[test]
fn test_config_invalid_yaml() {
    assert!(Config::from_yaml("server:\n  port: not-a-port\n").is_err());
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "server:\n  shutdown_grace_secs: 1").unwrap();

    let cfg = Config::from_file(file.path()).unwrap();
    assert_eq!(cfg.server.shutdown_grace(), Duration::from_secs(1));
    assert_eq!(cfg.server.port, 8080);
}

#[test]
fn test_config_missing_file() {
    assert!(Config::from_file("/definitely/not/here.yaml").is_err());
}

// All environment handling lives in one test: the variables are
// process-wide and tests run in parallel.
#[test]
fn test_config_env_overrides() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "server:\n  port: 7000\n  workers: 2").unwrap();

    unsafe {
        std::env::set_var("DOCSERVE_CONFIG", file.path());
        std::env::remove_var("DOCSERVE_PORT");
        std::env::remove_var("DOCSERVE_ROOT");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.port, 7000);
    assert_eq!(cfg.server.workers, 2);

    unsafe {
        std::env::set_var("DOCSERVE_PORT", "3000");
        std::env::set_var("DOCSERVE_ROOT", "/tmp/site");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.port, 3000);
    assert_eq!(cfg.server.document_root, PathBuf::from("/tmp/site"));
    assert_eq!(cfg.server.workers, 2);

    unsafe {
        std::env::set_var("DOCSERVE_PORT", "http");
    }
    assert!(Config::load().is_err());

    unsafe {
        std::env::remove_var("DOCSERVE_CONFIG");
        std::env::remove_var("DOCSERVE_PORT");
        std::env::remove_var("DOCSERVE_ROOT");
    }
}

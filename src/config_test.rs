use std::env;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

use crate::config::{CONFIG_ENV, Config, ConfigError, DEFAULT_CONFIG_PATH, DatabaseType};

#[test]
fn empty_document_uses_defaults() {
    let config = Config::from_json(b"{}").unwrap();
    assert_eq!(config.database.kind, DatabaseType::Sqlite);
    assert_eq!(config.server.listen_address(), "127.0.0.1:8080");
    assert_eq!(config.session.name, "gosess");
    assert_eq!(config.session.store, "sqlite://data/sessions.db?mode=rwc");
    assert_eq!(config.session.options.max_age, 28800);
    assert!(config.session.options.http_only);
    assert_eq!(config.view.base_uri, "/");
    assert!(!config.recaptcha.enabled);
}

#[test]
fn pascal_case_sections_are_read() {
    let json = br#"{
        "Database": {
            "Type": "Redb",
            "Redb": { "Path": "/var/lib/notepad/data.redb" }
        },
        "Recaptcha": { "Enabled": true, "Secret": "s", "SiteKey": "k" },
        "Server": { "Hostname": "0.0.0.0", "HTTPPort": 3000 },
        "Session": { "Store": "sqlite::memory:" },
        "View": { "BaseURI": "/app/" }
    }"#;
    let config = Config::from_json(json).unwrap();

    assert_eq!(config.database.kind, DatabaseType::Redb);
    assert_eq!(
        config.database.redb.path,
        PathBuf::from("/var/lib/notepad/data.redb")
    );
    assert!(config.recaptcha.enabled);
    assert_eq!(config.recaptcha.site_key, "k");
    assert_eq!(config.session.store, "sqlite::memory:");
    assert_eq!(config.session.name, "gosess");
    assert_eq!(config.server.listen_address(), "0.0.0.0:3000");
    assert_eq!(config.view.base_uri, "/app/");
}

#[test]
fn backend_names_are_case_insensitive() {
    for (name, expected) in [
        ("SQLite", DatabaseType::Sqlite),
        ("sqlite", DatabaseType::Sqlite),
        ("SurrealDB", DatabaseType::SurrealDb),
        ("surreal", DatabaseType::SurrealDb),
        ("REDB", DatabaseType::Redb),
        ("MongoDB", DatabaseType::Unknown),
    ] {
        let json = format!(r#"{{"Database": {{"Type": "{}"}}}}"#, name);
        let config = Config::from_json(json.as_bytes()).unwrap();
        assert_eq!(config.database.kind, expected, "{}", name);
    }
}

#[test]
fn database_type_display() {
    assert_eq!(DatabaseType::SurrealDb.to_string(), "SurrealDB");
    assert_eq!(DatabaseType::Unknown.to_string(), "Unknown");
}

#[test]
fn shipped_config_parses() {
    let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config/config.json")).unwrap();
    assert_eq!(config.database.kind, DatabaseType::Sqlite);
    assert_eq!(config.database.surrealdb.namespace, "notepad");
}

#[test]
fn load_reports_missing_file_and_bad_json() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    let err = Config::load(&broken).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[test]
#[serial]
fn resolve_path_precedence() {
    unsafe {
        env::remove_var(CONFIG_ENV);
    }
    assert_eq!(Config::resolve_path(None), PathBuf::from(DEFAULT_CONFIG_PATH));

    unsafe {
        env::set_var(CONFIG_ENV, "/tmp/env-config.json");
    }
    assert_eq!(
        Config::resolve_path(None),
        PathBuf::from("/tmp/env-config.json")
    );
    assert_eq!(
        Config::resolve_path(Some(PathBuf::from("/tmp/cli.json"))),
        PathBuf::from("/tmp/cli.json")
    );

    unsafe {
        env::remove_var(CONFIG_ENV);
    }
}

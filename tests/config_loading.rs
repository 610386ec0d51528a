use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;

use hashwatch::config::{load_and_validate, ConfigFile};
use hashwatch::errors::WatchError;
use hashwatch::types::WatchModeKind;
use hashwatch_test_utils::builders::ConfigFileBuilder;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_config_is_loaded() {
    let file = write_config(
        r#"
[watch]
mode = "timed"
interval = "5s"
files = ["certs/server.crt", "certs/server.key"]
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.mode(), WatchModeKind::Timed);
    assert_eq!(cfg.interval(), Some(Duration::from_secs(5)));
    assert_eq!(
        cfg.files(),
        &[
            PathBuf::from("certs/server.crt"),
            PathBuf::from("certs/server.key")
        ]
    );
}

#[test]
fn empty_config_uses_defaults() {
    let file = write_config("");

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.mode(), WatchModeKind::Auto);
    assert_eq!(cfg.interval(), None);
    assert!(cfg.files().is_empty());
}

#[test]
fn bad_interval_returns_config_error() {
    let file = write_config(
        r#"
[watch]
interval = "5 fortnights"
"#,
    );

    match load_and_validate(file.path()) {
        Err(WatchError::Config(msg)) => assert!(msg.contains("[watch].interval")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
}

#[test]
fn unknown_mode_returns_toml_error() {
    let file = write_config(
        r#"
[watch]
mode = "inotify"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(WatchError::Toml(_))
    ));
}

#[test]
fn colliding_base_names_fail_fast() {
    let file = write_config(
        r#"
[watch]
files = ["a/tls.pem", "b/tls.pem"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(WatchError::DuplicateBaseName { name, .. }) => assert_eq!(name, "tls.pem"),
        other => panic!("Expected DuplicateBaseName, got: {:?}", other),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        load_and_validate("/definitely/not/here/Hashwatch.toml"),
        Err(WatchError::Io(_))
    ));
}

#[test]
fn builder_validates_like_the_loader() {
    let cfg = ConfigFileBuilder::new()
        .mode(WatchModeKind::Timed)
        .interval("250ms")
        .with_file("app.toml")
        .build();
    assert_eq!(cfg.interval(), Some(Duration::from_millis(250)));

    let raw = ConfigFileBuilder::new().interval("0s").build_raw();
    assert!(matches!(ConfigFile::try_from(raw), Err(WatchError::Config(_))));
}

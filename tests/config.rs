//! Configuration loaded from disk drives buffer and logging setup

use bump_arena::{ArenaConfig, ConfigError, HeapBuffer, LogConfig};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn load_config_from_file() {
    let mut file = NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
[arena]
capacity = 2048
align = 64

[logging]
level = "debug"
json = true
"#
    )
    .expect("write config");

    let config = ArenaConfig::load(file.path()).expect("load");
    assert_eq!(config.arena.capacity, 2048);
    assert_eq!(config.arena.align, 64);

    let log = LogConfig::from(&config.logging);
    assert_eq!(log.level, tracing::Level::DEBUG);
    assert!(log.json_format);

    let mut buffer = HeapBuffer::from_config(&config).expect("buffer");
    assert_eq!(buffer.as_slice().as_ptr() as usize % 64, 0);

    let mut arena = buffer.arena();
    arena.alloc(2048, 64).expect("whole buffer in one block");
    assert!(arena.alloc(1, 1).is_err());
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = ArenaConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

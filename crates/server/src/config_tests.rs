// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn clear_env() {
    for key in ["SQLALCHEMY_DATABASE_URI", "IA_HOST", "IA_PORT", "OMS_SERVER", "EXEC_PORT", "LOG_LEVEL", "MISSION_CONFIG_FILE"] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn defaults_when_env_is_empty() {
    clear_env();
    let cfg = Config::load();
    assert_eq!(cfg.exec_port, 8000);
    assert_eq!(cfg.ia_host, "127.0.0.1");
    assert!(cfg.oms_server.is_none());
}

#[test]
#[serial]
fn environment_overrides_defaults() {
    clear_env();
    std::env::set_var("EXEC_PORT", "9100");
    std::env::set_var("IA_HOST", "instruments.local");
    let cfg = Config::load();
    assert_eq!(cfg.exec_port, 9100);
    assert_eq!(cfg.ia_host, "instruments.local");
    clear_env();
}

#[test]
#[serial]
fn environment_wins_over_toml_overlay() {
    clear_env();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mission.toml");
    std::fs::write(&path, "EXEC_PORT = 9200\nIA_PORT = 9800\n").expect("write overlay");
    std::env::set_var("EXEC_PORT", "9100");
    std::env::set_var("MISSION_CONFIG_FILE", path.to_str().expect("utf8 path"));
    let cfg = Config::load();
    assert_eq!(cfg.exec_port, 9100);
    assert_eq!(cfg.ia_port, 9800);
    clear_env();
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process configuration: environment variables named exactly as in the
//! external-interfaces contract, with an optional TOML file from
//! `MISSION_CONFIG_FILE` overlaid underneath them — a set environment
//! variable always beats the file.

use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Config {
    /// Backing store location. Despite the name inherited from the
    /// source system, this implementation's store is a local
    /// write-ahead log, not a SQL connection string.
    pub database_uri: String,
    pub ia_host: String,
    pub ia_port: u16,
    /// Message bus endpoint. Read and retained for a future broker
    /// binding (see §4.5); no concrete consumer is wired up by this
    /// process today.
    pub oms_server: Option<String>,
    pub exec_port: u16,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_uri: "./mission-runtime.wal.jsonl".to_string(),
            ia_host: "127.0.0.1".to_string(),
            ia_port: 8800,
            oms_server: None,
            exec_port: 8000,
            log_level: "info".to_string(),
        }
    }
}

/// Overlay read from `MISSION_CONFIG_FILE`. Every field is optional so a
/// partial file only overrides what it names.
#[derive(Debug, Default, Deserialize)]
struct ConfigOverlay {
    #[serde(rename = "SQLALCHEMY_DATABASE_URI")]
    database_uri: Option<String>,
    #[serde(rename = "IA_HOST")]
    ia_host: Option<String>,
    #[serde(rename = "IA_PORT")]
    ia_port: Option<u16>,
    #[serde(rename = "OMS_SERVER")]
    oms_server: Option<String>,
    #[serde(rename = "EXEC_PORT")]
    exec_port: Option<u16>,
    #[serde(rename = "LOG_LEVEL")]
    log_level: Option<String>,
}

impl Config {
    /// Resolve in ascending priority: defaults, then `MISSION_CONFIG_FILE`
    /// overlaid on top, then the environment overlaid on top of that — an
    /// explicit environment variable always wins over the file.
    pub fn load() -> Self {
        let mut cfg = Self::default();
        if let Ok(path) = std::env::var("MISSION_CONFIG_FILE") {
            match std::fs::read_to_string(&path).and_then(|body| {
                toml::from_str::<ConfigOverlay>(&body).map_err(|e| std::io::Error::other(e.to_string()))
            }) {
                Ok(overlay) => cfg.apply(overlay),
                Err(err) => tracing::warn!(path, error = %err, "could not read MISSION_CONFIG_FILE, ignoring it"),
            }
        }
        cfg.apply(Self::env_overlay());
        cfg
    }

    fn env_overlay() -> ConfigOverlay {
        ConfigOverlay {
            database_uri: std::env::var("SQLALCHEMY_DATABASE_URI").ok(),
            ia_host: std::env::var("IA_HOST").ok(),
            ia_port: std::env::var("IA_PORT").ok().and_then(|s| s.parse().ok()),
            oms_server: std::env::var("OMS_SERVER").ok(),
            exec_port: std::env::var("EXEC_PORT").ok().and_then(|s| s.parse().ok()),
            log_level: std::env::var("LOG_LEVEL").ok(),
        }
    }

    fn apply(&mut self, overlay: ConfigOverlay) {
        if let Some(v) = overlay.database_uri {
            self.database_uri = v;
        }
        if let Some(v) = overlay.ia_host {
            self.ia_host = v;
        }
        if let Some(v) = overlay.ia_port {
            self.ia_port = v;
        }
        if overlay.oms_server.is_some() {
            self.oms_server = overlay.oms_server;
        }
        if let Some(v) = overlay.exec_port {
            self.exec_port = v;
        }
        if let Some(v) = overlay.log_level {
            self.log_level = v;
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

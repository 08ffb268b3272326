// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mx_core::{RunId, ScriptId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mission '{0}' not found")]
    MissionNotFound(String),

    #[error("script {0} not found")]
    ScriptNotFound(ScriptId),

    #[error("run {0} not found")]
    RunNotFound(RunId),

    #[error("version '{version}' of mission '{mission}' already exists with a different body")]
    DuplicateScript { mission: String, version: String },

    #[error("version '{version}' of mission '{mission}' does not exist")]
    UnknownVersion { mission: String, version: String },

    #[error("write-ahead log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("write-ahead log entry malformed: {0}")]
    Corrupt(#[from] serde_json::Error),
}

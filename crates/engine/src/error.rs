// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mx_core::RunId;
use mx_executor::ExecutorError;
use mx_mission::MissionParseError;
use mx_store::StoreError;
use thiserror::Error;

/// Errors raised by the mission runtime: block resolution, the
/// retry/policy machinery, and everything it wraps from the crates below.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("mission body invokes unknown block '{0}'")]
    UnknownBlock(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error(transparent)]
    Parse(#[from] MissionParseError),

    #[error("mission '{mission}' is not armed")]
    NotArmed { mission: String },

    #[error("mission '{mission}' is already running (run {run})")]
    AlreadyRunning { mission: String, run: RunId },

    /// Re-raised per the `abort` policy action: a step, block,
    /// or lock acquisition exhausted its policy and the failure must
    /// propagate out of the run body.
    #[error("{0}")]
    Aborted(String),

    /// Distinct from `Aborted`: a `retry` policy exhausted its attempt
    /// budget rather than any attempt itself failing fatally. Carries the same propagation rules as any other exception
    /// once raised to the enclosing scope.
    #[error("retry budget exhausted: {0}")]
    PolicyExhausted(String),

    #[error("failed to encode event payload: {0}")]
    Encoding(#[from] serde_json::Error),
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Error kinds raised by a call through the instrument executor.
#[derive(Debug, Error, Clone)]
pub enum ExecutorError {
    #[error("instrument call to '{target}' timed out")]
    Timeout { target: String },

    #[error("instrument '{target}' reported a driver async error: {message}")]
    Instrument { target: String, message: String },

    #[error("lock holder conflict acquiring {instruments:?} for mission '{mission}'")]
    Lock { mission: String, instruments: Vec<String> },

    #[error("invalid arguments for step against '{target}': {message}")]
    CommandArgument { target: String, message: String },

    #[error("transport error calling '{target}': {message}")]
    Connection { target: String, message: String },
}

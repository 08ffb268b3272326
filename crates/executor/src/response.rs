// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The instrument-control API's response contract: JSON body
//! `{cmd, value, time, type}`, with specific rules for empty and
//! non-JSON bodies.

use crate::error::ExecutorError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentResponse {
    #[serde(default)]
    pub cmd: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub time: Option<Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

pub const DRIVER_ASYNC_EVENT_ERROR: &str = "DRIVER_ASYNC_EVENT_ERROR";

/// Interpret a raw response body from the instrument-control API.
///
/// - Empty body ⇒ `Timeout`, unless `timeout_ok` (the `reset`/shutdown
///   verb, where a timeout on disconnect is normal and expected).
/// - Non-JSON body ⇒ an all-`None` response, not a failure.
/// - `type == "DRIVER_ASYNC_EVENT_ERROR"` ⇒ `Instrument` failure.
pub fn interpret_body(target: &str, body: &str, timeout_ok: bool) -> Result<InstrumentResponse, ExecutorError> {
    if body.trim().is_empty() {
        return if timeout_ok {
            Ok(InstrumentResponse::default())
        } else {
            Err(ExecutorError::Timeout { target: target.to_string() })
        };
    }
    let parsed: InstrumentResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => return Ok(InstrumentResponse::default()),
    };
    if parsed.kind.as_deref() == Some(DRIVER_ASYNC_EVENT_ERROR) {
        return Err(ExecutorError::Instrument {
            target: target.to_string(),
            message: format!("{:?}", parsed.value),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;

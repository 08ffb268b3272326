// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error-policy decoding: `{type, count?, backoff?}` → `{action, count, backoff}`.
//!
//! Defaults per action, keyed by `type`:
//!
//! | `type` | action | count | backoff |
//! |---|---|---|---|
//! | absent | abort | 1 | 0 |
//! | abort, break, continue, ignore | (same) | 1 | 0 |
//! | retry | retry | provided or 3 | provided or 10 |

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// What to do when a step/block/mission body fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    Abort,
    Break,
    Continue,
    Ignore,
    Retry,
}

impl std::fmt::Display for PolicyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PolicyAction::Abort => "abort",
            PolicyAction::Break => "break",
            PolicyAction::Continue => "continue",
            PolicyAction::Ignore => "ignore",
            PolicyAction::Retry => "retry",
        })
    }
}

/// A fully-resolved error policy: one action plus retry parameters.
///
/// `count`/`backoff` are meaningless outside `Retry` but always carry the
/// table defaults above so callers never need to special-case them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPolicy", into = "RawPolicy")]
pub struct ErrorPolicy {
    pub action: PolicyAction,
    pub count: u32,
    pub backoff: u64,
}

// schemars doesn't follow serde's try_from/into container attributes, so the
// schema is delegated to the wire-shape type directly instead of derived.
impl JsonSchema for ErrorPolicy {
    fn schema_name() -> String {
        "ErrorPolicy".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        RawPolicy::json_schema(gen)
    }
}

impl ErrorPolicy {
    /// The default policy when a mission/block/step names none: abort immediately.
    pub const DEFAULT: ErrorPolicy = ErrorPolicy { action: PolicyAction::Abort, count: 1, backoff: 0 };

    pub fn new(action: PolicyAction, count: Option<u32>, backoff: Option<u64>) -> Self {
        match action {
            PolicyAction::Retry => {
                ErrorPolicy { action, count: count.unwrap_or(3), backoff: backoff.unwrap_or(10) }
            }
            _ => ErrorPolicy { action, count: 1, backoff: 0 },
        }
    }

    /// Resolve the effective policy for a step: step > block > mission > default.
    pub fn resolve(
        step: Option<ErrorPolicy>,
        block: Option<ErrorPolicy>,
        mission: Option<ErrorPolicy>,
    ) -> ErrorPolicy {
        step.or(block).or(mission).unwrap_or(ErrorPolicy::DEFAULT)
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct RawPolicy {
    #[serde(rename = "type")]
    kind: PolicyAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backoff: Option<u64>,
}

impl TryFrom<RawPolicy> for ErrorPolicy {
    type Error = Infallible;

    fn try_from(raw: RawPolicy) -> Result<Self, Self::Error> {
        Ok(ErrorPolicy::new(raw.kind, raw.count, raw.backoff))
    }
}

impl From<ErrorPolicy> for RawPolicy {
    fn from(policy: ErrorPolicy) -> Self {
        match policy.action {
            PolicyAction::Retry => {
                RawPolicy { kind: policy.action, count: Some(policy.count), backoff: Some(policy.backoff) }
            }
            _ => RawPolicy { kind: policy.action, count: None, backoff: None },
        }
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;

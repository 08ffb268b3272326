// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A labeled sequence of steps. Blocks may invoke other blocks by label
//! (see [`crate::step::Step::Block`]) and carry their own `onerror`,
//! which overrides the mission-level policy but is itself overridden by
//! any policy the invoking step names.

use crate::step::Step;
use mx_core::ErrorPolicy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Block {
    pub label: String,
    pub sequence: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onerror: Option<ErrorPolicy>,
}

/// The label of the block every mission run starts from.
pub const ENTRY_BLOCK: &str = "mission";

#[cfg(test)]
#[path = "block_tests.rs"]
mod tests;

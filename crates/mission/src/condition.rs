// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Block-invocation guards: `{variable, value, comparator}` evaluated
//! against the per-run variable table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    pub variable: String,
    pub value: serde_json::Value,
    /// Absent comparator defaults to `equal`, matching the source schema
    /// (`Condition.comparator` has no required flag and the mission
    /// interpreter only ever saw these two values).
    #[serde(default = "default_comparator")]
    pub comparator: Comparator,
}

fn default_comparator() -> Comparator {
    Comparator::Equal
}

impl Condition {
    /// `current == expected` for `equal`, `current != expected` for
    /// `not_equal`; a variable missing from the table is always `not equal`.
    pub fn eval(&self, vars: &HashMap<String, serde_json::Value>) -> bool {
        match vars.get(&self.variable) {
            None => self.comparator == Comparator::NotEqual,
            Some(current) => match self.comparator {
                Comparator::Equal => *current == self.value,
                Comparator::NotEqual => *current != self.value,
            },
        }
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;

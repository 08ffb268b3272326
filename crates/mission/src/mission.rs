// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The decoded mission tree.
//!
//! `Mission` is the in-memory parse of a script's YAML body. It carries
//! no store identity (`name`, `active`, run history live in `mx-store`);
//! this type is purely "what the document said".

use crate::block::{Block, ENTRY_BLOCK};
use crate::schedule::Schedule;
use mx_core::ErrorPolicy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Mission {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    pub version: String,
    /// Instruments locked for the duration of every run.
    #[serde(default)]
    pub drivers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onerror: Option<ErrorPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub verbose: bool,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Error)]
pub enum MissionParseError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("mission has no block labeled '{ENTRY_BLOCK}'")]
    MissingEntryBlock,
    #[error("duplicate block label '{0}'")]
    DuplicateBlockLabel(String),
    #[error("step in block '{block}' invokes unknown block '{target}'")]
    UnknownBlockReference { block: String, target: String },
}

impl Mission {
    /// Parse and structurally validate a YAML document.
    ///
    /// Structural validation (every `Step::Block` target resolves, the
    /// `mission` entry block exists, labels are unique) happens here
    /// rather than at dispatch time: malformed shapes are rejected before
    /// the interpreter ever sees them.
    pub fn parse(yaml: &str) -> Result<Self, MissionParseError> {
        let mission: Mission = serde_yaml::from_str(yaml)?;
        mission.validate()?;
        Ok(mission)
    }

    fn validate(&self) -> Result<(), MissionParseError> {
        let mut seen = HashMap::with_capacity(self.blocks.len());
        for block in &self.blocks {
            if seen.insert(block.label.as_str(), ()).is_some() {
                return Err(MissionParseError::DuplicateBlockLabel(block.label.clone()));
            }
        }
        if !seen.contains_key(ENTRY_BLOCK) {
            return Err(MissionParseError::MissingEntryBlock);
        }
        for block in &self.blocks {
            for step in &block.sequence {
                if let crate::step::Step::Block { label, .. } = step {
                    if !seen.contains_key(label.as_str()) {
                        return Err(MissionParseError::UnknownBlockReference {
                            block: block.label.clone(),
                            target: label.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Look up a block by label. Callers within the interpreter have
    /// already validated every reference at parse time, so a missing
    /// label here indicates a bug rather than bad input.
    pub fn block(&self, label: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.label == label)
    }

    /// The block every run starts from. `None` only if `validate` was
    /// bypassed (e.g. a hand-built `Mission` in a test).
    pub fn entry_block(&self) -> Option<&Block> {
        self.block(ENTRY_BLOCK)
    }
}

#[cfg(test)]
#[path = "mission_tests.rs"]
mod tests;

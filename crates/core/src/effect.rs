// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outcome vocabulary shared between the engine and the scheduler.

use serde::{Deserialize, Serialize};

/// What the scheduler reported about a finished job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobOutcome {
    Executed,
    Error,
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event log.
//!
//! `EventKind` is the fixed dictionary of run-log entry types.
//!
//! `Event` is the larger, store-facing fact type: every mutation the
//! backing store accepts — mission/script/run bookkeeping as well as
//! individual run-log entries — is one `Event` variant, so the write-ahead
//! log and the in-memory materialized view (see `mx-store`) only ever
//! need to replay one kind of thing.

use crate::ids::{RunId, ScriptId};
use serde::{Deserialize, Serialize};

/// One entry in a run's append-only event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Start,
    Step,
    Result,
    Lock,
    Unlock,
    Exception,
    Completion,
    /// Any kind not in the fixed dictionary above; the dictionary is
    /// expanded on first use rather than rejecting unknown kinds.
    Custom(String),
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Start => f.write_str("start"),
            EventKind::Step => f.write_str("step"),
            EventKind::Result => f.write_str("result"),
            EventKind::Lock => f.write_str("lock"),
            EventKind::Unlock => f.write_str("unlock"),
            EventKind::Exception => f.write_str("exception"),
            EventKind::Completion => f.write_str("completion"),
            EventKind::Custom(name) => f.write_str(name),
        }
    }
}

/// A durable fact the backing store has accepted.
///
/// `#[serde(tag = "type")]` gives each variant a stable on-disk name for
/// the write-ahead log; field order here is replay order, not wire order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A mission was created (first reference to `name`, before any script exists).
    #[serde(rename = "mission:created")]
    MissionCreated { name: String, created_ms: u64 },

    /// A (name, version) script body was accepted. Immutable once written.
    #[serde(rename = "mission:script-added")]
    ScriptAdded {
        id: ScriptId,
        mission: String,
        version: String,
        body: String,
        created_ms: u64,
    },

    /// The mission's currently-selected script pointer changed.
    #[serde(rename = "mission:script-set")]
    CurrentScriptSet { mission: String, script_id: ScriptId },

    /// The mission's currently-selected script pointer was cleared (soft-delete).
    #[serde(rename = "mission:script-cleared")]
    CurrentScriptCleared { mission: String },

    #[serde(rename = "mission:activated")]
    MissionActivated { mission: String },

    #[serde(rename = "mission:deactivated")]
    MissionDeactivated { mission: String },

    /// Terminal: the mission was deleted. Retained for history, hidden from
    /// active/inactive listings, surfaced only via the archived listing.
    #[serde(rename = "mission:archived")]
    MissionArchived { mission: String },

    /// A new run was created at interpreter entry.
    #[serde(rename = "run:created")]
    RunCreated { id: RunId, mission: String, script_id: ScriptId, started_ms: u64 },

    /// One entry appended to a run's event log.
    #[serde(rename = "run:logged")]
    RunLogged { run_id: RunId, kind: EventKind, payload: serde_json::Value, timestamp_ms: u64 },
}

impl Event {
    /// Stable, kebab-style name for log spans (e.g. "mission:activated").
    pub fn name(&self) -> &str {
        match self {
            Event::MissionCreated { .. } => "mission:created",
            Event::ScriptAdded { .. } => "mission:script-added",
            Event::CurrentScriptSet { .. } => "mission:script-set",
            Event::CurrentScriptCleared { .. } => "mission:script-cleared",
            Event::MissionActivated { .. } => "mission:activated",
            Event::MissionDeactivated { .. } => "mission:deactivated",
            Event::MissionArchived { .. } => "mission:archived",
            Event::RunCreated { .. } => "run:created",
            Event::RunLogged { .. } => "run:logged",
        }
    }

    /// One-line summary for structured logging.
    pub fn log_summary(&self) -> String {
        let t = self.name();
        match self {
            Event::MissionCreated { name, .. } => format!("{t} mission={name}"),
            Event::ScriptAdded { mission, version, .. } => {
                format!("{t} mission={mission} version={version}")
            }
            Event::CurrentScriptSet { mission, script_id } => {
                format!("{t} mission={mission} script={script_id}")
            }
            Event::CurrentScriptCleared { mission } => format!("{t} mission={mission}"),
            Event::MissionActivated { mission } => format!("{t} mission={mission}"),
            Event::MissionDeactivated { mission } => format!("{t} mission={mission}"),
            Event::MissionArchived { mission } => format!("{t} mission={mission}"),
            Event::RunCreated { id, mission, .. } => format!("{t} mission={mission} run={id}"),
            Event::RunLogged { run_id, kind, .. } => format!("{t} run={run_id} kind={kind}"),
        }
    }

    /// The mission this fact concerns, if any.
    pub fn mission(&self) -> Option<&str> {
        match self {
            Event::MissionCreated { name, .. } => Some(name),
            Event::ScriptAdded { mission, .. }
            | Event::CurrentScriptSet { mission, .. }
            | Event::CurrentScriptCleared { mission }
            | Event::MissionActivated { mission }
            | Event::MissionDeactivated { mission }
            | Event::MissionArchived { mission }
            | Event::RunCreated { mission, .. } => Some(mission),
            Event::RunLogged { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The backing store's public surface: transactional operations
//! over missions, scripts, runs, and their event logs. Every write goes
//! through [`Store::emit`], which appends to the WAL before applying to
//! the in-memory view, so a crash never loses an already-acknowledged
//! write.

use crate::error::StoreError;
use crate::state::{EventLogEntry, MaterializedState, MissionRecord, ScriptRecord};
use crate::wal::Wal;
use mx_core::{Clock, Event, EventKind, RunId, ScriptId, SystemClock};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::path::Path;

pub struct Store<C: Clock = SystemClock> {
    wal: Mutex<Wal>,
    state: RwLock<MaterializedState>,
    clock: C,
}

impl Store<SystemClock> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_clock(path, SystemClock)
    }
}

impl<C: Clock> Store<C> {
    pub fn open_with_clock(path: impl AsRef<Path>, clock: C) -> Result<Self, StoreError> {
        let wal = Wal::open(path)?;
        let mut state = MaterializedState::default();
        for event in wal.replay()? {
            state.apply(&event);
        }
        Ok(Self { wal: Mutex::new(wal), state: RwLock::new(state), clock })
    }

    fn emit(&self, event: Event) -> Result<(), StoreError> {
        tracing::info!(event = %event.log_summary(), "store write");
        self.wal.lock().append(&event)?;
        self.state.write().apply(&event);
        Ok(())
    }

    /// Create the mission row if this is the first time `name` has been
    /// seen; a no-op (not an error) if it already exists.
    pub fn create_or_get_mission(&self, name: &str) -> Result<MissionRecord, StoreError> {
        if let Some(existing) = self.state.read().missions.get(name) {
            return Ok(existing.clone());
        }
        self.emit(Event::MissionCreated { name: name.to_string(), created_ms: self.clock.epoch_ms() })?;
        self.mission(name)
    }

    pub fn mission(&self, name: &str) -> Result<MissionRecord, StoreError> {
        self.state.read().missions.get(name).cloned().ok_or_else(|| StoreError::MissionNotFound(name.to_string()))
    }

    /// List missions visible in normal listings.
    pub fn list_missions(&self, active: Option<bool>) -> Vec<MissionRecord> {
        self.state
            .read()
            .missions
            .values()
            .filter(|m| !m.archived)
            .filter(|m| active.map_or(true, |want| m.active == want))
            .cloned()
            .collect()
    }

    pub fn list_archived(&self) -> Vec<MissionRecord> {
        self.state.read().missions.values().filter(|m| m.archived).cloned().collect()
    }

    /// Insert a (name, version) script, or verify the existing body
    /// matches if it was already uploaded.
    pub fn add_script(&self, mission: &str, version: &str, body: &str) -> Result<ScriptId, StoreError> {
        self.create_or_get_mission(mission)?;
        let key = (mission.to_string(), version.to_string());
        if let Some(existing_id) = self.state.read().script_index.get(&key).copied() {
            let existing = self.state.read().scripts[&existing_id].clone();
            return if existing.body == body {
                Ok(existing_id)
            } else {
                Err(StoreError::DuplicateScript { mission: mission.to_string(), version: version.to_string() })
            };
        }
        let id = ScriptId::new();
        self.emit(Event::ScriptAdded {
            id,
            mission: mission.to_string(),
            version: version.to_string(),
            body: body.to_string(),
            created_ms: self.clock.epoch_ms(),
        })?;
        Ok(id)
    }

    pub fn set_current_script(&self, mission: &str, script_id: ScriptId) -> Result<(), StoreError> {
        if !self.state.read().scripts.contains_key(&script_id) {
            return Err(StoreError::ScriptNotFound(script_id));
        }
        self.emit(Event::CurrentScriptSet { mission: mission.to_string(), script_id })
    }

    pub fn set_current_script_by_version(&self, mission: &str, version: &str) -> Result<(), StoreError> {
        let key = (mission.to_string(), version.to_string());
        let id = self
            .state
            .read()
            .script_index
            .get(&key)
            .copied()
            .ok_or_else(|| StoreError::UnknownVersion { mission: mission.to_string(), version: version.to_string() })?;
        self.set_current_script(mission, id)
    }

    pub fn script_body(&self, script_id: ScriptId) -> Result<String, StoreError> {
        self.state.read().scripts.get(&script_id).map(|s| s.body.clone()).ok_or(StoreError::ScriptNotFound(script_id))
    }

    pub fn script_by_version(&self, mission: &str, version: &str) -> Result<ScriptRecord, StoreError> {
        let key = (mission.to_string(), version.to_string());
        let id = self
            .state
            .read()
            .script_index
            .get(&key)
            .copied()
            .ok_or_else(|| StoreError::UnknownVersion { mission: mission.to_string(), version: version.to_string() })?;
        self.state.read().scripts.get(&id).cloned().ok_or(StoreError::ScriptNotFound(id))
    }

    /// Script versions of a mission, oldest first.
    pub fn list_versions(&self, mission: &str) -> Vec<ScriptRecord> {
        let state = self.state.read();
        let mut versions: Vec<_> =
            state.scripts.values().filter(|s| s.mission == mission).cloned().collect();
        versions.sort_by_key(|s| s.created_ms);
        versions
    }

    pub fn activate(&self, mission: &str) -> Result<(), StoreError> {
        self.mission(mission)?;
        self.emit(Event::MissionActivated { mission: mission.to_string() })
    }

    pub fn deactivate(&self, mission: &str) -> Result<(), StoreError> {
        self.mission(mission)?;
        self.emit(Event::MissionDeactivated { mission: mission.to_string() })
    }

    /// Soft-delete: clear the current script pointer and mark the
    /// mission archived. Retained for history, hidden from normal listings.
    pub fn delete_mission(&self, mission: &str) -> Result<(), StoreError> {
        self.mission(mission)?;
        self.emit(Event::CurrentScriptCleared { mission: mission.to_string() })?;
        self.emit(Event::MissionArchived { mission: mission.to_string() })
    }

    pub fn create_run(&self, mission: &str, script_id: ScriptId) -> Result<RunId, StoreError> {
        let id = RunId::new();
        self.emit(Event::RunCreated {
            id,
            mission: mission.to_string(),
            script_id,
            started_ms: self.clock.epoch_ms(),
        })?;
        Ok(id)
    }

    pub fn append_event(&self, run_id: RunId, kind: EventKind, payload: Value) -> Result<(), StoreError> {
        if !self.state.read().runs.contains_key(&run_id) {
            return Err(StoreError::RunNotFound(run_id));
        }
        self.emit(Event::RunLogged { run_id, kind, payload, timestamp_ms: self.clock.epoch_ms() })
    }

    /// Run ids of a mission, oldest first.
    pub fn list_runs(&self, mission: &str) -> Vec<RunId> {
        self.state.read().runs_by_mission.get(mission).cloned().unwrap_or_default()
    }

    pub fn first_events(&self, run_id: RunId, n: usize) -> Result<Vec<EventLogEntry>, StoreError> {
        let state = self.state.read();
        let run = state.runs.get(&run_id).ok_or(StoreError::RunNotFound(run_id))?;
        Ok(run.events.iter().take(n).cloned().collect())
    }

    pub fn most_recent_run(&self, mission: &str) -> Option<RunId> {
        self.state.read().runs_by_mission.get(mission).and_then(|runs| runs.last().copied())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

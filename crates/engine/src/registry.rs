// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The mission registry: the Idle/Armed/Running/Deleted state
//! machine, wired to [`mx_store::Store`] for durable bookkeeping, the
//! [`Scheduler`] for due-job polling, and the [`Router`] for event
//! triggers. `activate`/`deactivate`/`delete` mutate registry state under
//! a lock that is never held across an `.await`; the run itself happens
//! on a detached task bounded by the scheduler's worker-pool semaphore.

use crate::cron::parse_bound;
use crate::error::EngineError;
use crate::interpreter::{run_mission, Progress};
use crate::router::{BusMessage, ListenerHandle, Router};
use crate::scheduler::{Scheduler, Trigger};
use chrono::{DateTime, Utc};
use mx_core::{Clock, ScriptId, SystemClock};
use mx_executor::InstrumentExecutor;
use mx_mission::{Mission, Schedule};
use mx_store::Store;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// A mission's lifecycle phase. `Idle` is the default for a
/// mission the registry has never armed, so it is not tracked explicitly
/// until the first `activate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionState {
    Idle,
    Armed,
    Running,
    Deleted,
}

/// What an armed mission needs on hand to start a run without touching
/// the store: the parsed tree (for `drivers`/`onerror`/`schedule`), the
/// script id the run must be attributed to, and the trigger subscription
/// to tear down on deactivation.
struct Armed {
    tree: Arc<Mission>,
    script_id: ScriptId,
    listener: Option<ListenerHandle>,
}

pub struct Registry<C: Clock = SystemClock> {
    store: Arc<Store<C>>,
    executor: Arc<dyn InstrumentExecutor>,
    scheduler: Arc<Scheduler<C>>,
    router: Arc<Router>,
    armed: Mutex<HashMap<String, Armed>>,
    states: Mutex<HashMap<String, MissionState>>,
    progress: Mutex<HashMap<String, Progress>>,
}

impl<C: Clock + 'static> Registry<C> {
    pub fn new(
        store: Arc<Store<C>>,
        executor: Arc<dyn InstrumentExecutor>,
        scheduler: Arc<Scheduler<C>>,
        router: Arc<Router>,
    ) -> Self {
        Self {
            store,
            executor,
            scheduler,
            router,
            armed: Mutex::new(HashMap::new()),
            states: Mutex::new(HashMap::new()),
            progress: Mutex::new(HashMap::new()),
        }
    }

    pub fn state(&self, mission: &str) -> MissionState {
        self.states.lock().get(mission).copied().unwrap_or(MissionState::Idle)
    }

    /// `block[index]:verb` of the step currently executing for `mission`,
    /// or `None` if it isn't running right now.
    pub fn current_step(&self, mission: &str) -> Option<String> {
        self.progress.lock().get(mission).and_then(|p| p.lock().clone())
    }

    /// When `mission`'s trigger is next due to fire, for missions
    /// scheduled on a date or calendar-cron trigger. `None` for an event
    /// triggered or unarmed mission, or one whose trigger has no further
    /// fire.
    pub fn next_fire(&self, mission: &str) -> Option<DateTime<Utc>> {
        self.scheduler.next_fire(mission, self.scheduler.now())
    }

    /// Upload a script body: parse for structural validity before
    /// it ever reaches the store, so an invalid document never becomes a
    /// version a mission could later be activated against.
    pub fn upload_script(&self, mission: &str, version: &str, yaml: &str) -> Result<ScriptId, EngineError> {
        Mission::parse(yaml)?;
        Ok(self.store.add_script(mission, version, yaml)?)
    }

    pub fn set_current_version(&self, mission: &str, version: &str) -> Result<(), EngineError> {
        Ok(self.store.set_current_script_by_version(mission, version)?)
    }

    /// Idle -> Armed: pin the current script, register its
    /// trigger with the scheduler or router, and mark it active in the
    /// store. The mission stays Armed until its trigger fires or it is
    /// explicitly deactivated.
    pub fn activate(&self, mission: &str) -> Result<(), EngineError> {
        let record = self.store.mission(mission)?;
        let script_id = record.script_id.ok_or_else(|| EngineError::NotArmed { mission: mission.to_string() })?;
        let body = self.store.script_body(script_id)?;
        let tree = Mission::parse(&body)?;

        let listener = match &tree.schedule {
            Some(Schedule::Event { source, event }) => Some(self.router.attach(mission, source, event)),
            Some(Schedule::Date { run_date }) => {
                self.scheduler.register(mission, Trigger::Date(resolve_run_date(run_date.as_deref(), self.scheduler.now())));
                None
            }
            Some(Schedule::Cron(spec)) => {
                self.scheduler.register(mission, Trigger::Cron(spec.clone()));
                None
            }
            // Absent schedule: one-shot, immediately.
            None => {
                self.scheduler.register(mission, Trigger::Date(self.scheduler.now()));
                None
            }
        };

        self.store.activate(mission)?;
        self.armed.lock().insert(mission.to_string(), Armed { tree: Arc::new(tree), script_id, listener });
        self.states.lock().insert(mission.to_string(), MissionState::Armed);
        Ok(())
    }

    /// Armed|Running -> Idle: stop future fires. A run already in
    /// flight keeps going to completion; only the trigger subscription and
    /// the Armed bookkeeping are torn down.
    pub fn deactivate(&self, mission: &str) -> Result<(), EngineError> {
        self.scheduler.unregister(mission);
        if let Some(armed) = self.armed.lock().remove(mission) {
            if let Some(handle) = armed.listener {
                self.router.detach(handle);
            }
        }
        self.store.deactivate(mission)?;
        self.states.lock().insert(mission.to_string(), MissionState::Idle);
        Ok(())
    }

    /// -> Deleted: tear down any live trigger first, then
    /// soft-delete in the store. A deleted mission never re-arms; a fresh
    /// mission with the same name after this is a new store row.
    pub fn delete(&self, mission: &str) -> Result<(), EngineError> {
        let _ = self.deactivate(mission);
        self.store.delete_mission(mission)?;
        self.states.lock().insert(mission.to_string(), MissionState::Deleted);
        Ok(())
    }

    /// One scheduler tick: ask what's due `now` and start a run for
    /// each. Meant to be driven by a background task on a short interval;
    /// `poll` itself performs no I/O so the interval can be as tight as
    /// the deployment wants.
    pub fn tick(self: &Arc<Self>) {
        let now = self.scheduler.now();
        for mission in self.scheduler.poll(now) {
            self.start_run(mission);
        }
    }

    /// React to one bus message: every mission subscribed to its
    /// `(source, event)` pair gets a run, the same as a scheduler fire.
    pub fn on_event(self: &Arc<Self>, message: &BusMessage) {
        for mission in self.router.dispatch(message) {
            self.start_run(mission);
        }
    }

    fn start_run(self: &Arc<Self>, mission: String) {
        let Some((tree, script_id)) = self.armed.lock().get(&mission).map(|a| (a.tree.clone(), a.script_id)) else {
            return;
        };
        self.scheduler.mark_running(&mission);
        self.states.lock().insert(mission.clone(), MissionState::Running);
        let progress: Progress = Arc::new(parking_lot::Mutex::new(None));
        self.progress.lock().insert(mission.clone(), progress.clone());
        let registry = self.clone();
        let semaphore = self.scheduler.semaphore();
        tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let result =
                run_mission(&registry.store, registry.executor.clone(), &mission, &tree, script_id, Some(progress)).await;
            registry.scheduler.mark_complete(&mission);
            registry.progress.lock().remove(&mission);
            if let Err(err) = &result {
                tracing::warn!(mission = %mission, error = %err, "run did not complete");
            }
            // A `Cron` trigger or an `Event` subscription stays Armed for
            // its next fire; everything else (`Date`, or no schedule at
            // all) is one-shot at the registry level and goes back to
            // Idle, distinct from `Trigger::is_one_shot` which only
            // describes the scheduler's own job bookkeeping.
            let stays_armed = matches!(tree.schedule, Some(Schedule::Cron(_)) | Some(Schedule::Event { .. }));
            if stays_armed {
                registry.states.lock().insert(mission.clone(), MissionState::Armed);
            } else {
                let _ = registry.deactivate(&mission);
            }
        });
    }
}

fn resolve_run_date(run_date: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    match run_date {
        None => now,
        Some(raw) if raw.eq_ignore_ascii_case("now") => now,
        Some(raw) => parse_bound(raw).unwrap_or(now),
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

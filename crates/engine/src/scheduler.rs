// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job scheduler: one job per mission (`job_id = mission.name`),
//! date or calendar-field cron triggers, collapsing concurrent fires of the
//! same job (`max_instances = 1`), and a bounded global worker pool.
//!
//! `poll` is a pure function of "now" and the registered jobs — it decides
//! what's due without performing any I/O, which is what lets scheduler
//! tests run instantly against [`mx_core::FakeClock`] instead of real
//! wall-clock sleeps.

use crate::cron::cron_matches;
use chrono::{DateTime, Duration, Timelike, Utc};
use mx_core::{Clock, SystemClock};
use mx_mission::CronSpec;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;

pub const DEFAULT_CONCURRENCY: usize = 20;

/// How far ahead `next_fire` will brute-force scan a cron trigger before
/// giving up and reporting "no upcoming fire" (e.g. a trigger whose
/// `start_date`/`end_date` window has already closed).
const NEXT_FIRE_SEARCH_WINDOW: Duration = Duration::days(366);

#[derive(Debug, Clone)]
pub enum Trigger {
    Date(DateTime<Utc>),
    Cron(CronSpec),
}

impl Trigger {
    /// Every job this scheduler runs fires at most once per wall-clock
    /// instant; a `Date` trigger additionally never fires again.
    pub fn is_one_shot(&self) -> bool {
        matches!(self, Trigger::Date(_))
    }
}

struct JobEntry {
    trigger: Trigger,
    fired_once: bool,
    last_fire_instant: Option<i64>,
}

pub struct Scheduler<C: Clock = SystemClock> {
    jobs: Mutex<HashMap<String, JobEntry>>,
    running: Mutex<HashSet<String>>,
    semaphore: Arc<Semaphore>,
    clock: C,
}

impl Scheduler<SystemClock> {
    pub fn new(concurrency: usize) -> Self {
        Self::with_clock(concurrency, SystemClock)
    }
}

impl<C: Clock> Scheduler<C> {
    pub fn with_clock(concurrency: usize, clock: C) -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            running: Mutex::new(HashSet::new()),
            semaphore: Arc::new(Semaphore::new(concurrency)),
            clock,
        }
    }

    pub fn semaphore(&self) -> Arc<Semaphore> {
        self.semaphore.clone()
    }

    /// Register a job. At most one job per `job_id`; re-registering
    /// replaces whatever was there, so re-activation cleanly overwrites a
    /// stale trigger.
    pub fn register(&self, job_id: &str, trigger: Trigger) {
        self.jobs.lock().insert(job_id.to_string(), JobEntry { trigger, fired_once: false, last_fire_instant: None });
    }

    pub fn unregister(&self, job_id: &str) {
        self.jobs.lock().remove(job_id);
    }

    pub fn is_registered(&self, job_id: &str) -> bool {
        self.jobs.lock().contains_key(job_id)
    }

    pub fn is_one_shot(&self, job_id: &str) -> Option<bool> {
        self.jobs.lock().get(job_id).map(|e| e.trigger.is_one_shot())
    }

    /// Track a job id as running, collapsing concurrent fires of the same job.
    pub fn mark_running(&self, job_id: &str) -> bool {
        self.running.lock().insert(job_id.to_string())
    }

    pub fn mark_complete(&self, job_id: &str) {
        self.running.lock().remove(job_id);
    }

    /// Current wall-clock instant from the scheduler's own clock.
    pub fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.clock.epoch_ms() as i64).unwrap_or_else(Utc::now)
    }

    /// Job ids due to fire at `now`. A job already running is skipped
    /// (collapsing); a `Date` job fires once and is then deregistered; a
    /// `Cron` job is guarded against firing twice for the same instant.
    pub fn poll(&self, now: DateTime<Utc>) -> Vec<String> {
        let running = self.running.lock();
        let mut jobs = self.jobs.lock();
        let mut due = Vec::new();
        let mut expired = Vec::new();
        for (job_id, entry) in jobs.iter_mut() {
            if running.contains(job_id) {
                continue;
            }
            let is_due = match &entry.trigger {
                Trigger::Date(at) => !entry.fired_once && now >= *at,
                Trigger::Cron(spec) => {
                    entry.last_fire_instant != Some(now.timestamp()) && cron_matches(spec, now)
                }
            };
            if !is_due {
                continue;
            }
            due.push(job_id.clone());
            match &entry.trigger {
                Trigger::Date(_) => {
                    entry.fired_once = true;
                    expired.push(job_id.clone());
                }
                Trigger::Cron(_) => entry.last_fire_instant = Some(now.timestamp()),
            }
        }
        drop(running);
        for job_id in expired {
            jobs.remove(&job_id);
        }
        due
    }

    /// When `job_id` is next due to fire at or after `now`, for reporting
    /// to operators. `None` if the job isn't registered, a `Date` job has
    /// already fired, or a `Cron` job has no fire within the search window
    /// (e.g. its `end_date` has passed).
    pub fn next_fire(&self, job_id: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let jobs = self.jobs.lock();
        let entry = jobs.get(job_id)?;
        match &entry.trigger {
            Trigger::Date(at) => (!entry.fired_once && *at >= now).then_some(*at),
            Trigger::Cron(spec) => {
                let deadline = now + NEXT_FIRE_SEARCH_WINDOW;
                let mut candidate = now.date_naive().and_hms_opt(now.time().hour(), now.time().minute(), 0)?.and_utc();
                while candidate <= deadline {
                    if cron_matches(spec, candidate) {
                        return Some(candidate);
                    }
                    candidate += Duration::minutes(1);
                }
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;

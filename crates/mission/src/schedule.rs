// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A mission's `schedule`: exactly one of a cron spec, a one-shot
//! datetime, or an external event trigger. Absent means "one-shot,
//! immediately on activation".

use crate::cron_spec::CronSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Schedule {
    /// `{source, event}` — fired by the event router, never directly by
    /// the scheduler. Tried before `Date`/`Cron` since it's the most
    /// specific shape (two required keys neither of them carries).
    #[serde(deny_unknown_fields)]
    Event { source: String, event: String },
    /// `{run_date}` — fire once at the given datetime, or immediately if
    /// `run_date` is absent/`"now"`.
    #[serde(deny_unknown_fields)]
    Date {
        #[serde(default)]
        run_date: Option<String>,
    },
    /// The calendar-field cron spec. Tried last: every field is optional,
    /// so it would otherwise swallow the other two shapes.
    Cron(CronSpec),
}

impl Schedule {
    /// No cron fields present ⇒ the mission deactivates after its one run.
    /// `Date` and `Event`-triggered runs both use a one-shot scheduler job
    /// under the hood, so both count as one-shot here even though an
    /// event-triggered mission stays subscribed.
    pub fn is_one_shot(&self) -> bool {
        !matches!(self, Schedule::Cron(_))
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;

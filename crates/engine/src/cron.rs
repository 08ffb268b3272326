// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar-field matching for [`mx_mission::CronSpec`] against a concrete
//! instant. Field absence always matches; `day_of_week` follows the
//! APScheduler convention of 0 = Monday .. 6 = Sunday.

use chrono::{DateTime, Datelike, Timelike, Utc};
use mx_mission::CronSpec;

pub(crate) fn parse_bound(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
        })
}

/// Does `spec` match the calendar fields of `now`, within its `start_date`/`end_date` bounds?
pub fn cron_matches(spec: &CronSpec, now: DateTime<Utc>) -> bool {
    if let Some(start) = spec.start_date.as_deref().and_then(parse_bound) {
        if now < start {
            return false;
        }
    }
    if let Some(end) = spec.end_date.as_deref().and_then(parse_bound) {
        if now > end {
            return false;
        }
    }
    let checks: [(&Option<mx_mission::CronField>, i64); 7] = [
        (&spec.year, now.year() as i64),
        (&spec.month, now.month() as i64),
        (&spec.day, now.day() as i64),
        (&spec.week, now.iso_week().week() as i64),
        (&spec.day_of_week, now.weekday().num_days_from_monday() as i64),
        (&spec.hour, now.hour() as i64),
        (&spec.minute, now.minute() as i64),
    ];
    checks.iter().all(|(field, value)| field.as_ref().map_or(true, |f| f.matches(*value)))
        && spec.second.as_ref().map_or(now.second() == 0, |f| f.matches(now.second() as i64))
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;

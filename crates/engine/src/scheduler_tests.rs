// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use mx_core::FakeClock;
use mx_mission::CronField;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).single().expect("valid date")
}

#[test]
fn date_job_fires_once_then_deregisters() {
    let scheduler = Scheduler::with_clock(DEFAULT_CONCURRENCY, FakeClock::new());
    let target = at(2026, 7, 28, 12, 0, 0);
    scheduler.register("m1", Trigger::Date(target));
    assert_eq!(scheduler.poll(target), vec!["m1".to_string()]);
    assert!(scheduler.poll(target).is_empty());
    assert!(!scheduler.is_registered("m1"));
}

#[test]
fn cron_job_fires_once_per_matching_instant() {
    let scheduler = Scheduler::with_clock(DEFAULT_CONCURRENCY, FakeClock::new());
    let spec = CronSpec { minute: Some(CronField::Text("*".into())), ..Default::default() };
    scheduler.register("m1", Trigger::Cron(spec));
    let tick = at(2026, 7, 28, 9, 0, 0);
    assert_eq!(scheduler.poll(tick), vec!["m1".to_string()]);
    // polling again at the same instant must not re-fire (no double-count per tick).
    assert!(scheduler.poll(tick).is_empty());
    let next = at(2026, 7, 28, 9, 1, 0);
    assert_eq!(scheduler.poll(next), vec!["m1".to_string()]);
}

#[test]
fn running_job_is_collapsed_out_of_poll() {
    let scheduler = Scheduler::with_clock(DEFAULT_CONCURRENCY, FakeClock::new());
    let spec = CronSpec { minute: Some(CronField::Text("*".into())), ..Default::default() };
    scheduler.register("m1", Trigger::Cron(spec));
    let tick = at(2026, 7, 28, 9, 0, 0);
    assert_eq!(scheduler.poll(tick), vec!["m1".to_string()]);
    scheduler.mark_running("m1");
    let next = at(2026, 7, 28, 9, 1, 0);
    assert!(scheduler.poll(next).is_empty());
    scheduler.mark_complete("m1");
    let third = at(2026, 7, 28, 9, 2, 0);
    assert_eq!(scheduler.poll(third), vec!["m1".to_string()]);
}

#[test]
fn re_registering_overwrites_the_existing_job() {
    let scheduler = Scheduler::with_clock(DEFAULT_CONCURRENCY, FakeClock::new());
    scheduler.register("m1", Trigger::Date(at(2026, 1, 1, 0, 0, 0)));
    scheduler.register("m1", Trigger::Date(at(2027, 1, 1, 0, 0, 0)));
    assert!(scheduler.poll(at(2026, 1, 1, 0, 0, 0)).is_empty());
    assert_eq!(scheduler.poll(at(2027, 1, 1, 0, 0, 0)), vec!["m1".to_string()]);
}

#[test]
fn is_one_shot_reflects_trigger_kind() {
    let scheduler = Scheduler::with_clock(DEFAULT_CONCURRENCY, FakeClock::new());
    scheduler.register("date-job", Trigger::Date(at(2026, 1, 1, 0, 0, 0)));
    scheduler.register("cron-job", Trigger::Cron(CronSpec::default()));
    assert_eq!(scheduler.is_one_shot("date-job"), Some(true));
    assert_eq!(scheduler.is_one_shot("cron-job"), Some(false));
    assert_eq!(scheduler.is_one_shot("missing"), None);
}

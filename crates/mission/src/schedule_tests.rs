// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn event_shape_is_recognized_before_cron() {
    let decoded: Schedule = serde_yaml::from_str("source: platform-1\nevent: SAMPLE_READY").expect("decode");
    assert_eq!(decoded, Schedule::Event { source: "platform-1".into(), event: "SAMPLE_READY".into() });
}

#[test]
fn date_shape_with_run_date() {
    let decoded: Schedule = serde_yaml::from_str("run_date: \"2026-01-01T00:00:00\"").expect("decode");
    assert_eq!(decoded, Schedule::Date { run_date: Some("2026-01-01T00:00:00".into()) });
}

#[test]
fn cron_shape_matches_calendar_fields() {
    let decoded: Schedule = serde_yaml::from_str("minute: \"*\"").expect("decode");
    assert!(matches!(decoded, Schedule::Cron(_)));
}

#[test]
fn absent_schedule_is_one_shot_immediate() {
    // An absent `schedule` key is handled by the owning `Mission` as `None`,
    // not by `Schedule` itself (see `Mission::schedule`).
    let date = Schedule::Date { run_date: None };
    assert!(date.is_one_shot());
}

#[test]
fn only_cron_is_not_one_shot() {
    assert!(!Schedule::Cron(CronSpec::default()).is_one_shot());
    assert!(Schedule::Date { run_date: Some("now".into()) }.is_one_shot());
    assert!(Schedule::Event { source: "s".into(), event: "e".into() }.is_one_shot());
}

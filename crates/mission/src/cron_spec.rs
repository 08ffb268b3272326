// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar-field cron spec: `{year, month, day, week, day_of_week, hour,
//! minute, second}` bounded by `start_date`/`end_date`, APScheduler-style.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single cron field: either a literal number or an APScheduler-style
/// expression (`"*"`, `"*/5"`, `"1,3,5"`, `"1-5"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CronField {
    Number(i64),
    Text(String),
}

impl CronField {
    /// Does `value` satisfy this field?
    pub fn matches(&self, value: i64) -> bool {
        match self {
            CronField::Number(n) => *n == value,
            CronField::Text(expr) => match_expr(expr, value),
        }
    }
}

fn match_expr(expr: &str, value: i64) -> bool {
    if expr == "*" {
        return true;
    }
    if let Some(rest) = expr.strip_prefix("*/") {
        return rest.parse::<i64>().map(|step| step > 0 && value % step == 0).unwrap_or(false);
    }
    if let Some((lo, hi)) = expr.split_once('-') {
        if let (Ok(lo), Ok(hi)) = (lo.parse::<i64>(), hi.parse::<i64>()) {
            return (lo..=hi).contains(&value);
        }
    }
    expr.split(',').any(|part| part.trim().parse::<i64>() == Ok(value))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CronSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<CronField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<CronField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<CronField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<CronField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<CronField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<CronField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<CronField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<CronField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[cfg(test)]
#[path = "cron_spec_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes for store-owned rows.
//!
//! Missions are keyed by their own `name` field (see [`crate::event::Event`]),
//! not by a generated id — only rows the store itself creates get one here.

crate::define_id! {
    /// Identifies one immutable (name, version) script body.
    pub struct ScriptId("scr-");
}

crate::define_id! {
    /// Identifies one execution instance of a mission.
    pub struct RunId("run-");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_id_roundtrips_through_display() {
        let id = ScriptId::new();
        let parsed = ScriptId::from_string(id.to_string());
        assert_eq!(id, parsed);
    }

    #[test]
    fn run_id_has_expected_prefix() {
        let id = RunId::new();
        assert!(id.to_string().starts_with("run-"));
    }
}

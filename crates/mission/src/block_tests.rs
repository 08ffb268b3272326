// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn decodes_block_with_sequence_and_onerror() {
    let yaml = "label: mission\nonerror:\n  type: continue\nsequence:\n  - sleep: 0.1\n";
    let block: Block = serde_yaml::from_str(yaml).expect("decode");
    assert_eq!(block.label, "mission");
    assert_eq!(block.sequence.len(), 1);
    assert!(block.onerror.is_some());
}

#[test]
fn onerror_defaults_to_none_when_absent() {
    let block: Block = serde_yaml::from_str("label: capture\nsequence: []\n").expect("decode");
    assert!(block.onerror.is_none());
}

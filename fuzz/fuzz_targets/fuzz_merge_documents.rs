#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for document merging
//!
//! Tests:
//! - merge_documents never panics on arbitrary JSON
//! - Keyed arrays never grow past the template's length
//! - tieLines is always present on success
//! - Inputs are left untouched

use libfuzzer_sys::fuzz_target;
use portalcfg_core::{MergeSpec, MergeStrategy, merge_documents};
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 || data.len() < 4 {
        return;
    }

    // Split data into two parts for two JSON inputs
    let mid = data.len() / 2;
    let Ok(template) = serde_json::from_slice::<Value>(&data[..mid]) else {
        return;
    };
    let Ok(system) = serde_json::from_slice::<Value>(&data[mid..]) else {
        return;
    };
    let (template_before, system_before) = (template.clone(), system.clone());

    let Ok(merged) = merge_documents(&template, &system) else {
        return;
    };

    // === Contract: inputs are not mutated ===
    assert_eq!(template, template_before);
    assert_eq!(system, system_before);

    // === Contract: tie lines always present ===
    assert!(merged.get("tieLines").is_some(), "tieLines must always be emitted");

    // === Contract: keyed arrays are anchored on the template ===
    for rule in MergeSpec::portal().rules() {
        if let MergeStrategy::KeyedArray { .. } = rule.strategy
            && let Some(base) = template.get(rule.name).and_then(Value::as_array)
            && let Some(result) = merged.get(rule.name).and_then(Value::as_array)
        {
            assert_eq!(result.len(), base.len(), "keyed array {} grew", rule.name);
        }
    }

    // === Contract: merged value serializes ===
    assert!(serde_json::to_string(&merged).is_ok());
});

#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for double-config resolution
//!
//! Tests:
//! - resolve_value never panics
//! - Plain documents pass through unchanged
//! - Rendering the result never fails

use libfuzzer_sys::fuzz_target;
use portalcfg_cli::{OutputFormat, Resolution, is_double_config, resolve_value};
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 {
        return;
    }

    let Ok(root) = serde_json::from_slice::<Value>(data) else {
        return;
    };
    let double = is_double_config(&root);
    let original = root.clone();

    match resolve_value(root) {
        Ok(Resolution::Passthrough(value)) => {
            assert!(!double);
            assert_eq!(value, original);
        }
        Ok(Resolution::Merged(value)) => {
            assert!(double);
            assert!(OutputFormat::default().render(&value).is_ok());
        }
        Err(_) => assert!(double, "only double configs can fail to resolve"),
    }
});

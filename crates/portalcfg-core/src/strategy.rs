// SPDX-License-Identifier: MIT OR Apache-2.0
//! Field-level merge strategies.
//!
//! The top-level shape of a portal configuration is fixed, so merging is
//! driven by a table mapping each known field to a [`MergeStrategy`]. The
//! table is an allow-list: any field not named in it is dropped from the
//! merged document.

use crate::error::{MergeError, Result, Side, value_kind};
use crate::merge::{merge_arrays_on_key, merge_objects};
use serde_json::{Map, Value};

/// How one top-level field is combined from the base and delta documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeStrategy {
    /// Merge the delta object onto the base object recursively.
    /// Without a delta value the base value is used as-is.
    RecursiveObject,
    /// Merge two arrays of objects by matching elements on `key`.
    /// The result is anchored on the base array's membership.
    KeyedArray {
        /// Property identifying an element on both sides
        key: &'static str,
    },
    /// Delta value if present, otherwise base value.
    DeltaWins,
    /// Base value if present, otherwise delta value.
    BaseWins,
}

/// Value used when a strategy yields nothing for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldDefault {
    /// Leave the field out of the merged document.
    #[default]
    Omit,
    /// Emit an empty array.
    EmptyArray,
}

impl FieldDefault {
    fn value(self) -> Option<Value> {
        match self {
            Self::Omit => None,
            Self::EmptyArray => Some(Value::Array(Vec::new())),
        }
    }
}

/// One row of a merge table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldRule {
    /// Top-level field name
    pub name: &'static str,
    /// Strategy combining the two sides
    pub strategy: MergeStrategy,
    /// Fallback when the strategy yields no value
    pub default: FieldDefault,
}

impl FieldRule {
    /// Create a rule that omits the field when neither side supplies it.
    #[must_use]
    pub const fn new(name: &'static str, strategy: MergeStrategy) -> Self {
        Self {
            name,
            strategy,
            default: FieldDefault::Omit,
        }
    }

    /// Emit an empty array when neither side supplies the field.
    #[must_use]
    pub const fn or_empty_array(mut self) -> Self {
        self.default = FieldDefault::EmptyArray;
        self
    }

    /// Resolve this field from the two document roots.
    ///
    /// A JSON `null` member counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::FieldNotObject`] when a [`MergeStrategy::RecursiveObject`]
    /// field has a non-object value while a delta value is present.
    pub fn resolve(
        &self,
        base: &Map<String, Value>,
        delta: &Map<String, Value>,
    ) -> Result<Option<Value>> {
        let base_value = member(base, self.name);
        let delta_value = member(delta, self.name);

        let resolved = match self.strategy {
            MergeStrategy::RecursiveObject => match (base_value, delta_value) {
                (base_value, None) => base_value.cloned(),
                (None, Some(d)) => {
                    Some(Value::Object(self.expect_object(d, Side::Delta)?.clone()))
                }
                (Some(b), Some(d)) => {
                    let b = self.expect_object(b, Side::Base)?;
                    let d = self.expect_object(d, Side::Delta)?;
                    Some(Value::Object(merge_objects(b, d)))
                }
            },
            MergeStrategy::KeyedArray { key } => {
                // Non-array values are treated as absent
                let base_array = base_value.and_then(Value::as_array);
                match (base_array, delta_value.and_then(Value::as_array)) {
                    (_, None) => base_value.cloned(),
                    (None, Some(_)) => Some(Value::Array(Vec::new())),
                    (Some(b), Some(d)) => {
                        Some(Value::Array(merge_arrays_on_key(b, Some(d.as_slice()), key)))
                    }
                }
            }
            MergeStrategy::DeltaWins => delta_value.or(base_value).cloned(),
            MergeStrategy::BaseWins => base_value.or(delta_value).cloned(),
        };

        Ok(resolved.or_else(|| self.default.value()))
    }

    fn expect_object<'a>(&self, value: &'a Value, side: Side) -> Result<&'a Map<String, Value>> {
        value.as_object().ok_or_else(|| MergeError::FieldNotObject {
            field: self.name,
            side,
            found: value_kind(value),
        })
    }
}

fn member<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    map.get(name).filter(|value| !value.is_null())
}

const PORTAL_FIELDS: &[FieldRule] = &[
    FieldRule::new("info", MergeStrategy::RecursiveObject),
    FieldRule::new("devices", MergeStrategy::KeyedArray { key: "uid" }),
    FieldRule::new("rooms", MergeStrategy::KeyedArray { key: "key" }),
    FieldRule::new("sourceLists", MergeStrategy::RecursiveObject),
    // Tie lines are owned by the template; systems rarely define them
    FieldRule::new("tieLines", MergeStrategy::BaseWins).or_empty_array(),
    FieldRule::new("global", MergeStrategy::RecursiveObject),
];

/// An ordered merge table.
///
/// Fields appear in the merged document in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeSpec {
    rules: &'static [FieldRule],
}

impl MergeSpec {
    /// Create a merge table from a static list of rules.
    #[must_use]
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    /// The portal configuration table:
    ///
    /// | Field         | Strategy                |
    /// |---------------|-------------------------|
    /// | `info`        | recursive object        |
    /// | `devices`     | keyed array on `uid`    |
    /// | `rooms`       | keyed array on `key`    |
    /// | `sourceLists` | recursive object        |
    /// | `tieLines`    | base wins, else `[]`    |
    /// | `global`      | recursive object        |
    #[must_use]
    pub const fn portal() -> Self {
        Self::new(PORTAL_FIELDS)
    }

    /// Rules in output order.
    #[must_use]
    pub const fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }

    /// Look up the rule for a field.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&'static FieldRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Merge `delta` onto `base` according to this table.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::RootNotObject`] when either root is not an
    /// object, or [`MergeError::FieldNotObject`] from [`FieldRule::resolve`].
    pub fn apply(&self, base: &Value, delta: &Value) -> Result<Value> {
        let base = expect_root(base, Side::Base)?;
        let delta = expect_root(delta, Side::Delta)?;
        self.apply_maps(base, delta).map(Value::Object)
    }

    /// Merge two already-unwrapped document roots.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::FieldNotObject`] from [`FieldRule::resolve`].
    pub fn apply_maps(
        &self,
        base: &Map<String, Value>,
        delta: &Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        let mut merged = Map::new();
        for rule in self.rules {
            if let Some(value) = rule.resolve(base, delta)? {
                merged.insert(rule.name.to_owned(), value);
            }
        }
        Ok(merged)
    }
}

impl Default for MergeSpec {
    fn default() -> Self {
        Self::portal()
    }
}

fn expect_root(value: &Value, side: Side) -> Result<&Map<String, Value>> {
    value.as_object().ok_or_else(|| MergeError::RootNotObject {
        side,
        found: value_kind(value),
    })
}

/// Merge a system document onto a template document with the portal table.
///
/// # Errors
///
/// See [`MergeSpec::apply`].
pub fn merge_documents(template: &Value, system: &Value) -> Result<Value> {
    MergeSpec::portal().apply(template, system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(rule: FieldRule, base: &Value, delta: &Value) -> Result<Option<Value>> {
        rule.resolve(base.as_object().unwrap(), delta.as_object().unwrap())
    }

    #[test]
    fn test_portal_table_order() {
        let names: Vec<_> = MergeSpec::portal().rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["info", "devices", "rooms", "sourceLists", "tieLines", "global"]
        );
    }

    #[test]
    fn test_portal_rule_lookup() {
        let spec = MergeSpec::default();
        assert_eq!(
            spec.rule("rooms").map(|r| r.strategy),
            Some(MergeStrategy::KeyedArray { key: "key" })
        );
        assert_eq!(spec.rule("tieLines").map(|r| r.default), Some(FieldDefault::EmptyArray));
        assert!(spec.rule("unknown").is_none());
    }

    #[test]
    fn test_recursive_object_without_delta_uses_base_verbatim() {
        let rule = FieldRule::new("info", MergeStrategy::RecursiveObject);
        // Base is passed through even when it is not an object
        let resolved = resolve(rule, &json!({"info": "legacy"}), &json!({})).unwrap();
        assert_eq!(resolved, Some(json!("legacy")));
    }

    #[test]
    fn test_recursive_object_delta_only() {
        let rule = FieldRule::new("global", MergeStrategy::RecursiveObject);
        let resolved = resolve(rule, &json!({}), &json!({"global": {"y": 2}})).unwrap();
        assert_eq!(resolved, Some(json!({"y": 2})));
    }

    #[test]
    fn test_recursive_object_rejects_non_object_delta() {
        let rule = FieldRule::new("global", MergeStrategy::RecursiveObject);
        let err = resolve(rule, &json!({"global": {}}), &json!({"global": [1]})).unwrap_err();
        assert_eq!(
            err,
            MergeError::FieldNotObject {
                field: "global",
                side: Side::Delta,
                found: "array"
            }
        );
    }

    #[test]
    fn test_recursive_object_rejects_non_object_base_when_delta_present() {
        let rule = FieldRule::new("info", MergeStrategy::RecursiveObject);
        let err = resolve(rule, &json!({"info": 3}), &json!({"info": {"a": 1}})).unwrap_err();
        assert!(matches!(
            err,
            MergeError::FieldNotObject {
                side: Side::Base,
                ..
            }
        ));
    }

    #[test]
    fn test_null_member_counts_as_absent() {
        let rule = FieldRule::new("info", MergeStrategy::RecursiveObject);
        let resolved = resolve(rule, &json!({"info": {"a": 1}}), &json!({"info": null})).unwrap();
        assert_eq!(resolved, Some(json!({"a": 1})));
    }

    #[test]
    fn test_keyed_array_base_absent_delta_present_is_empty() {
        let rule = FieldRule::new("devices", MergeStrategy::KeyedArray { key: "uid" });
        let resolved = resolve(rule, &json!({}), &json!({"devices": [{"uid": 1}]})).unwrap();
        assert_eq!(resolved, Some(json!([])));
    }

    #[test]
    fn test_keyed_array_both_absent_is_omitted() {
        let rule = FieldRule::new("devices", MergeStrategy::KeyedArray { key: "uid" });
        assert_eq!(resolve(rule, &json!({}), &json!({})).unwrap(), None);
    }

    #[test]
    fn test_keyed_array_non_array_delta_is_ignored() {
        let rule = FieldRule::new("rooms", MergeStrategy::KeyedArray { key: "key" });
        let base = json!({"rooms": [{"key": "rm1"}]});
        let resolved = resolve(rule, &base, &json!({"rooms": "oops"})).unwrap();
        assert_eq!(resolved, Some(json!([{"key": "rm1"}])));
    }

    #[test]
    fn test_delta_wins() {
        let rule = FieldRule::new("mode", MergeStrategy::DeltaWins);
        let resolved = resolve(rule, &json!({"mode": "a"}), &json!({"mode": "b"})).unwrap();
        assert_eq!(resolved, Some(json!("b")));
        let resolved = resolve(rule, &json!({"mode": "a"}), &json!({})).unwrap();
        assert_eq!(resolved, Some(json!("a")));
    }

    #[test]
    fn test_base_wins_falls_back_to_default() {
        let rule = FieldRule::new("tieLines", MergeStrategy::BaseWins).or_empty_array();
        assert_eq!(resolve(rule, &json!({}), &json!({})).unwrap(), Some(json!([])));
        let without_default = FieldRule::new("tieLines", MergeStrategy::BaseWins);
        assert_eq!(resolve(without_default, &json!({}), &json!({})).unwrap(), None);
    }

    #[test]
    fn test_custom_table_drops_unlisted_fields() {
        const RULES: &[FieldRule] = &[FieldRule::new("kept", MergeStrategy::DeltaWins)];
        let spec = MergeSpec::new(RULES);
        let merged = spec
            .apply(&json!({"kept": 1, "dropped": 2}), &json!({"kept": 3, "also": 4}))
            .unwrap();
        assert_eq!(merged, json!({"kept": 3}));
    }

    #[test]
    fn test_apply_rejects_non_object_roots() {
        let spec = MergeSpec::portal();
        assert_eq!(
            spec.apply(&json!([]), &json!({})).unwrap_err(),
            MergeError::RootNotObject {
                side: Side::Base,
                found: "array"
            }
        );
        assert_eq!(
            spec.apply(&json!({}), &json!("x")).unwrap_err(),
            MergeError::RootNotObject {
                side: Side::Delta,
                found: "string"
            }
        );
    }
}

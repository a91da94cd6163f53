#![cfg(feature = "serde")]

//! Integration tests for serde support.
//!
//! These tests verify that the containers serialize to the documented JSON
//! shapes and that deserialization rejects inconsistent input.

use hybrid_set_map::hybrid::{HybridSetMap, KeySet, ValueMap, ValueMode};
use rstest::rstest;

// =============================================================================
// KeySet / ValueMap
// =============================================================================

#[rstest]
fn test_key_set_serializes_in_insertion_order() {
    let set: KeySet<i32> = [3, 1, 2].into_iter().collect();
    let json = serde_json::to_string(&set).unwrap();
    assert_eq!(json, "[3,1,2]");
}

#[rstest]
fn test_key_set_deserialize_collapses_duplicates() {
    let set: KeySet<i32> = serde_json::from_str("[1,2,1,3]").unwrap();
    let keys: Vec<i32> = set.into_iter().collect();
    assert_eq!(keys, vec![1, 2, 3]);
}

#[rstest]
fn test_value_map_json_roundtrip() {
    let map: ValueMap<String, i32> = [("b".to_string(), 2), ("a".to_string(), 1)]
        .into_iter()
        .collect();
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"b":2,"a":1}"#);

    let restored: ValueMap<String, i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(map, restored);
}

// =============================================================================
// HybridSetMap
// =============================================================================

#[rstest]
fn test_value_mode_json_shape() {
    let mut container = HybridSetMap::with_values();
    container.insert("x".to_string(), 10).add_key("y".to_string());

    let json = serde_json::to_string(&container).unwrap();
    assert_eq!(json, r#"{"keys":["x","y"],"values":{"x":10}}"#);
}

#[rstest]
fn test_pure_set_json_shape() {
    let container: HybridSetMap<String, i32> =
        HybridSetMap::pure_set_from_keys(["x".to_string(), "y".to_string()]);

    let json = serde_json::to_string(&container).unwrap();
    assert_eq!(json, r#"{"keys":["x","y"],"values":null}"#);
}

#[rstest]
#[case::values(ValueMode::Values)]
#[case::pure_set(ValueMode::PureSet)]
fn test_json_roundtrip_keeps_mode_and_order(#[case] mode: ValueMode) {
    let mut container = HybridSetMap::from_pairs(
        mode,
        [("c".to_string(), 3), ("a".to_string(), 1)],
    );
    container.add_key("b".to_string());

    let json = serde_json::to_string(&container).unwrap();
    let restored: HybridSetMap<String, i32> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, container);
    assert_eq!(restored.value_mode(), mode);
    let keys: Vec<&String> = restored.keys().collect();
    assert_eq!(keys, vec!["c", "a", "b"]);
}

#[rstest]
fn test_missing_values_field_is_pure_set() {
    let container: HybridSetMap<String, i32> =
        serde_json::from_str(r#"{"keys":["x"]}"#).unwrap();
    assert_eq!(container.value_mode(), ValueMode::PureSet);
    assert!(container.has("x"));
}

#[rstest]
fn test_dangling_value_is_rejected() {
    let result: Result<HybridSetMap<String, i32>, _> =
        serde_json::from_str(r#"{"keys":["x"],"values":{"y":1}}"#);
    let error = result.unwrap_err();
    assert!(
        error.to_string().contains("missing from the key set"),
        "unexpected error: {error}"
    );
}

#[rstest]
fn test_invalid_keys_type_is_rejected() {
    let result: Result<HybridSetMap<String, i32>, _> =
        serde_json::from_str(r#"{"keys":{"x":1},"values":null}"#);
    assert!(result.is_err());
}

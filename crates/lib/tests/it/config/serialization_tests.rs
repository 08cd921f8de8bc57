//! Conversion to and from plain JSON mappings

use cfgtree::{
    Config,
    config::{ConfigError, Ref},
    raw_map,
};

use crate::helpers::*;

#[test]
fn test_serialization() {
    let json = serde_json::json!({"a": {"b": {"c": 8}}});
    let config = Config::from_json(json.clone()).unwrap();
    assert_serializes_to(&config, json);
}

#[test]
fn test_serialization_is_detached() {
    let config = Config::new(raw_map! { "a" => raw_map! { "b" => raw_map! { "c" => 8 } } });
    let snapshot = config.serialize_to_dict().unwrap();
    config.assign_path("a.b.c", 9).unwrap();
    assert_eq!(snapshot["a"]["b"]["c"], 8);
    assert_serializes_to(&config, serde_json::json!({"a": {"b": {"c": 9}}}));
}

#[test]
fn test_serialization_resolves_references() {
    let config = Config::new(raw_map! { "v" => 3, "r" => Ref::new("v") });
    assert_serializes_to(&config, serde_json::json!({"v": 3, "r": 3}));
}

#[test]
fn test_serialization_round_trip() {
    let config = nested_config();
    let copy = Config::from_json(serde_json::Value::Object(config.serialize_to_dict().unwrap()))
        .unwrap();
    assert_serializes_to(
        &copy,
        serde_json::Value::Object(config.serialize_to_dict().unwrap()),
    );
    assert!(!copy.ptr_eq(&config));
}

#[test]
fn test_from_json_str() {
    let config = Config::from_json_str(r#"{"name": "svc", "ports": [80, 443], "tls": null}"#)
        .unwrap();
    assert_eq!(value_at(&config, "name"), "svc");
    assert_eq!(value_at(&config, "ports").as_list().unwrap().len(), 2);
    assert!(value_at(&config, "tls").is_null());

    let err = Config::from_json_str("not json").unwrap_err();
    assert_eq!(err.module(), "serialize");
}

#[test]
fn test_from_json_rejects_non_objects() {
    assert!(matches!(
        Config::from_json(serde_json::json!(3)),
        Err(ConfigError::UnsupportedValue { .. })
    ));
}

#[test]
fn test_leaf_cannot_be_serialized_as_mapping() {
    let config = simple_config();
    let leaf = config.get_config("a.b").unwrap();
    assert!(leaf.serialize_to_dict().unwrap_err().is_type_error());
}

//! Merging new structure into a tree with extend, update and extend_with

use cfgtree::{
    Config,
    config::{ConfigError, RawMap, tag},
    metadata, raw_map,
};

use crate::helpers::*;

fn base() -> Config {
    Config::new(raw_map! { "a" => 1 })
}

#[test]
fn test_extend_single_value() {
    let config = base();
    config.extend(raw_map! { "b" => 2 }).unwrap();
    assert_eq!(value_at(&config, "b"), 2);
}

#[test]
fn test_extend_with_overrides() {
    let config = base();
    config
        .extend_with(raw_map! { "b" => 1, "c" => 3 }, raw_map! { "b" => 2 })
        .unwrap();
    assert_eq!(value_at(&config, "b"), 2);
    assert_eq!(value_at(&config, "c"), 3);
}

#[test]
fn test_extend_structure() {
    let config = base();
    config
        .extend(raw_map! { "b" => raw_map! { "c" => raw_map! { "d" => 2 } } })
        .unwrap();
    assert_eq!(value_at(&config, "b.c.d"), 2);
}

#[test]
fn test_extend_preserves_nodes() {
    let config = base();
    config.extend(raw_map! { "b" => raw_map! { "c" => 2 } }).unwrap();
    let b = config.get_config("b").unwrap();
    config.extend(raw_map! { "b" => raw_map! { "d" => 3 } }).unwrap();

    assert!(b.ptr_eq(&config.get_config("b").unwrap()));
    assert_serializes_to(&config, serde_json::json!({"a": 1, "b": {"c": 2, "d": 3}}));
}

#[test]
fn test_extend_is_idempotent_for_unrelated_keys() {
    let config = base();
    let incoming = raw_map! { "b" => raw_map! { "c" => 2 } };
    config.extend(incoming.clone()).unwrap();
    config.extend(incoming).unwrap();
    assert_serializes_to(&config, serde_json::json!({"a": 1, "b": {"c": 2}}));
}

#[test]
fn test_extend_never_loses_a_subtree() {
    let config = Config::new(raw_map! { "a" => raw_map! { "b" => 1 } });
    let err = config.extend(raw_map! { "a" => 1 }).unwrap_err();
    assert!(matches!(err, ConfigError::CannotSetValue { .. }));
    assert_serializes_to(&config, serde_json::json!({"a": {"b": 1}}));
}

#[test]
fn test_extend_value_over_existing_leaf() {
    let config = base();
    config.extend(raw_map! { "a" => 5 }).unwrap();
    assert_eq!(value_at(&config, "a"), 5);
}

#[test]
fn test_extend_value_over_empty_subtree() {
    let config = Config::new(raw_map! { "a" => RawMap::new() });
    config.extend(raw_map! { "a" => 5 }).unwrap();
    assert_eq!(value_at(&config, "a"), 5);
}

#[test]
fn test_extend_config() {
    let config = base();
    config
        .extend(Config::new(raw_map! {
            "b" => raw_map! { "c" => raw_map! { "d" => 2 } },
        }))
        .unwrap();
    assert_eq!(value_at(&config, "b.c.d"), 2);
}

#[test]
fn test_extend_config_propagates_changes() {
    let config = base();
    let other = Config::new(raw_map! { "b" => raw_map! { "c" => 2 } });
    config.extend(&other).unwrap();
    assert_eq!(value_at(&config, "b.c"), 2);

    other.assign_path("b.c", 3).unwrap();
    assert_eq!(value_at(&config, "b.c"), 3);
}

#[test]
fn test_extend_config_preserves_metadata() {
    let config = base();
    config
        .extend(Config::new(raw_map! {
            "b" => raw_map! { "c" => tag(2, metadata! { "x" => 3 }) },
        }))
        .unwrap();
    assert_eq!(
        config.get_config("b.c").unwrap().metadata(),
        Some(metadata! { "x" => 3 })
    );
}

#[test]
fn test_extend_config_preserves_nodes() {
    let config = base();
    config
        .extend(Config::new(raw_map! { "b" => raw_map! { "c" => 2 } }))
        .unwrap();
    config
        .extend(Config::new(raw_map! { "b" => raw_map! { "c" => 2, "d" => 3 } }))
        .unwrap();
    assert_serializes_to(&config, serde_json::json!({"a": 1, "b": {"c": 2, "d": 3}}));
}

#[test]
fn test_extend_config_prevents_losing_path() {
    let config = base();
    config
        .extend(Config::new(raw_map! { "b" => raw_map! { "c" => 2 } }))
        .unwrap();
    let err = config
        .extend(Config::new(raw_map! { "b" => raw_map! { "d" => 3 } }))
        .unwrap_err();
    assert!(matches!(err, ConfigError::CannotSetValue { .. }));
    assert_serializes_to(&config, serde_json::json!({"a": 1, "b": {"c": 2}}));
}

#[test]
fn test_update_config_preserves_nodes() {
    let config = base();
    config
        .update(Config::new(raw_map! { "b" => raw_map! { "c" => 2 } }))
        .unwrap();
    config
        .update(Config::new(raw_map! { "b" => raw_map! { "d" => 3 } }))
        .unwrap();
    assert_serializes_to(&config, serde_json::json!({"a": 1, "b": {"c": 2, "d": 3}}));
}

#[test]
fn test_update_still_refuses_to_lose_subtree() {
    let config = Config::new(raw_map! { "a" => raw_map! { "b" => 1 } });
    assert!(config.update(raw_map! { "a" => 1 }).is_err());
}

#[test]
fn test_extend_rejects_linking_an_ancestor() {
    let config = simple_config();
    let a = config.get_config("a").unwrap();
    let err = a.extend(raw_map! { "up" => &config }).unwrap_err();
    assert_eq!(
        err,
        ConfigError::CyclicLink {
            key: "up".to_string()
        }
    );
    assert!(!a.contains("up"));
}

#[test]
fn test_extend_config_never_replaces_a_value_with_a_mapping() {
    let config = base();
    let err = config
        .extend(raw_map! { "a" => Config::new(raw_map! { "x" => 1 }) })
        .unwrap_err();
    assert!(matches!(err, ConfigError::CannotSetValue { .. }));
    assert_eq!(value_at(&config, "a"), 1);

    // Same once the value has been wrapped into a leaf node
    config.get_config("a").unwrap();
    assert!(config
        .update(raw_map! { "a" => Config::new(raw_map! { "x" => 1 }) })
        .is_err());
    assert_eq!(value_at(&config, "a"), 1);
}

#[test]
fn test_extend_config_over_null_value() {
    let config = Config::new(raw_map! { "n" => () });
    config
        .extend(raw_map! { "n" => Config::new(raw_map! { "x" => 1 }) })
        .unwrap();
    assert_eq!(value_at(&config, "n.x"), 1);
}

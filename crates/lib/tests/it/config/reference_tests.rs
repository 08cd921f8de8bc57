//! Relative cross-references

use cfgtree::{
    Config,
    config::{ConfigError, Ref},
    raw_map,
};

use crate::helpers::*;

const VALUE: i64 = 239829382;

fn traversal_config() -> Config {
    Config::new(raw_map! {
        "a" => raw_map! {
            "a_1" => raw_map! {
                "value" => 23232,
                "ref_1" => Ref::new(".value"),
                "ref_2" => Ref::new("..a_2.value"),
                "ref_3" => Ref::new("...b.b_1.value"),
            },
            "a_2" => raw_map! { "value" => 383872 },
        },
        "b" => raw_map! {
            "b_1" => raw_map! { "value" => 287870997 },
        },
    })
}

#[test]
fn test_references() {
    let config = Config::new(raw_map! {
        "a" => raw_map! {
            "b" => VALUE,
            "references_b" => Ref::new("b"),
        },
    });
    let a = config.root().child("a").unwrap();
    assert_eq!(a.get_as::<i64>("references_b").unwrap(), VALUE);
}

#[test]
fn test_references_traversal() {
    let config = traversal_config();
    assert_eq!(value_at(&config, "a.a_1.ref_1"), value_at(&config, "a.a_1.value"));
    assert_eq!(value_at(&config, "a.a_1.ref_2"), value_at(&config, "a.a_2.value"));
    assert_eq!(value_at(&config, "a.a_1.ref_3"), value_at(&config, "b.b_1.value"));
}

#[test]
fn test_references_track_target_changes() {
    let config = traversal_config();
    config.assign_path("a.a_2.value", 1).unwrap();
    assert_eq!(value_at(&config, "a.a_1.ref_2"), 1);
}

#[test]
fn test_broken_reference() {
    let config = Config::new(raw_map! { "r" => Ref::new("missing") });
    assert!(matches!(
        config.get_item("r"),
        Err(ConfigError::InvalidPath { .. })
    ));
    assert!(!config.contains("r"));
    assert!(config.get("r").is_none());
}

#[test]
fn test_reference_climbing_past_root() {
    let config = Config::new(raw_map! { "r" => Ref::new("....x") });
    assert!(config.get_item("r").unwrap_err().is_path_error());
}

#[test]
fn test_reference_to_mapping() {
    let config = Config::new(raw_map! {
        "target" => raw_map! { "x" => 1 },
        "r" => Ref::new("target"),
    });
    let node = config.get_item("r").unwrap().into_node().unwrap();
    assert!(node.ptr_eq(&config.get_config("target").unwrap()));
}

#[test]
fn test_reference_to_reference_needs_chaining() {
    let config = Config::new(raw_map! {
        "value" => 5,
        "first" => Ref::new("value"),
        "plain" => Ref::new("first"),
        "chained" => Ref::chained("first"),
    });
    assert!(config.get_item("plain").is_err());
    assert_eq!(value_at(&config, "chained"), 5);
}

#[test]
fn test_chained_reference_cycle_is_bounded() {
    let config = Config::new(raw_map! {
        "x" => Ref::chained("y"),
        "y" => Ref::chained("x"),
    });
    assert!(matches!(
        config.get_item("x"),
        Err(ConfigError::ReferenceDepthExceeded { limit: 32, .. })
    ));
}

#[test]
fn test_setting_a_reference_replaces_it() {
    let config = Config::new(raw_map! { "v" => 1, "r" => Ref::new("v") });
    config.set("r", 9).unwrap();
    assert_eq!(value_at(&config, "r"), 9);
    assert_eq!(value_at(&config, "v"), 1);
}

#[test]
fn test_reference_to_enclosing_mapping() {
    let config = Config::new(raw_map! {
        "a" => raw_map! { "v" => 1, "loop" => Ref::new("..a") },
    });
    assert_eq!(value_at(&config, "a.loop.v"), 1);
    assert_eq!(
        config.traverse_leaves().unwrap_err(),
        ConfigError::InvalidPath {
            path: "a.loop".to_string()
        }
    );
    assert!(matches!(
        config.serialize_to_dict(),
        Err(ConfigError::InvalidPath { .. })
    ));
}

#[test]
fn test_shared_subtree_is_not_a_cycle() {
    let shared = Config::new(raw_map! { "v" => 1 });
    let config = Config::new(raw_map! { "x" => &shared, "y" => Ref::new("x") });
    let paths: Vec<String> = config
        .traverse_leaves()
        .unwrap()
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    assert_eq!(paths, vec!["x.v", "y.v"]);
    assert_serializes_to(&config, serde_json::json!({"x": {"v": 1}, "y": {"v": 1}}));
}

#[test]
fn test_dots_only_reference_does_not_resolve() {
    let config = Config::new(raw_map! {
        "a" => raw_map! { "v" => 1, "me" => Ref::new(".") },
    });
    let a = config.get_config("a").unwrap();
    assert_eq!(
        a.get_item("me"),
        Err(ConfigError::InvalidPath {
            path: ".".to_string()
        })
    );
    assert!(!a.contains("me"));
}

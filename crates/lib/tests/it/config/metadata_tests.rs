//! Metadata attached to leaf values

use cfgtree::{
    Config,
    config::tag,
    metadata, raw_map,
};

use crate::helpers::*;

fn tagged_config() -> Config {
    Config::new(raw_map! {
        "key1" => tag("value1", metadata! { "a" => 1, "b" => 2 }),
        "key2" => "value2",
        "key3" => tag(1, metadata! { "a" => 1 }).tag(metadata! { "b" => 2 }),
        "a" => raw_map! {
            "b" => raw_map! {
                "c" => tag("nested_value", metadata! { "x" => 1 }),
            },
        },
    })
}

#[test]
fn test_metadata_access() {
    let config = tagged_config();
    assert_eq!(
        config.get_config("key1").unwrap().metadata(),
        Some(metadata! { "a" => 1, "b" => 2 })
    );
}

#[test]
fn test_untagged_value_has_no_metadata() {
    let config = tagged_config();
    assert_eq!(config.get_config("key2").unwrap().metadata(), None);
}

#[test]
fn test_chained_metadata() {
    let config = tagged_config();
    assert_eq!(
        config.get_config("key3").unwrap().metadata(),
        Some(metadata! { "a" => 1, "b" => 2 })
    );
}

#[test]
fn test_tagged_values_read_as_plain_values() {
    let config = tagged_config();
    assert_eq!(value_at(&config, "key1"), "value1");
    assert_eq!(value_at(&config, "key3"), 1);
}

#[test]
fn test_assigning_does_not_override_metadata() {
    let config = tagged_config();
    config.root().set_attr("key1", "value3").unwrap();
    let key1 = config.get_config("key1").unwrap();
    assert_eq!(value_at(&config, "key1"), "value3");
    assert_eq!(key1.get_value().unwrap(), "value3");
    assert_eq!(key1.metadata(), Some(metadata! { "a" => 1, "b" => 2 }));
}

#[test]
fn test_assigning_does_not_override_metadata_nested() {
    let config = tagged_config();
    config.assign_path("a.b.c", "new_value").unwrap();
    assert_eq!(
        config.get_config("a.b.c").unwrap().metadata(),
        Some(metadata! { "x" => 1 })
    );
}

#[test]
fn test_set_metadata() {
    let config = tagged_config();
    let key2 = config.get_config("key2").unwrap();
    key2.set_metadata(Some(metadata! { "doc" => "second key" }));
    assert_eq!(
        config.get_config("key2").unwrap().metadata(),
        Some(metadata! { "doc" => "second key" })
    );
}

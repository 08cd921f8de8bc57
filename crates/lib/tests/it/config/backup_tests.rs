//! Backup, restore and scoped backups

use cfgtree::{
    Config,
    config::{ConfigError, Ref, Value},
    raw_map,
};

use crate::helpers::*;

fn backup_config() -> Config {
    Config::new(raw_map! { "a" => 1, "b" => 2, "c" => Vec::<Value>::new() })
}

#[test]
fn test_backup_context() {
    let config = backup_config();
    {
        let _guard = config.backup_context();
        config.root().set_attr("a", 10).unwrap();
        assert_eq!(value_at(&config, "a"), 10);
    }
    assert_eq!(value_at(&config, "a"), 1);
}

#[test]
fn test_backup_context_restores_on_error_path() {
    fn failing_edit(config: &Config) -> Result<(), ConfigError> {
        let _guard = config.backup_context();
        config.set("a", 10)?;
        config.set("missing", 1)?;
        Ok(())
    }

    let config = backup_config();
    assert!(failing_edit(&config).is_err());
    assert_eq!(value_at(&config, "a"), 1);
    assert_eq!(config.backup_depth(), 0);
}

#[test]
fn test_restore_no_backup() {
    let config = backup_config();
    assert_eq!(config.restore(), Err(ConfigError::NoBackup));
}

#[test]
fn test_discard() {
    let config = backup_config();
    config.backup();
    config.discard_backup().unwrap();
    assert_eq!(config.restore(), Err(ConfigError::NoBackup));
}

#[test]
fn test_backup_copy() {
    let config = backup_config();
    config.backup();

    let c = config.get_config("c").unwrap();
    let mut list = c.get_value().unwrap();
    list.as_list_mut().unwrap().push(Value::Int(0));
    c.set_value(list).unwrap();
    assert_eq!(value_at(&config, "c").as_list().unwrap().len(), 1);

    config.restore().unwrap();
    assert_eq!(value_at(&config, "c"), Value::List(vec![]));
}

#[test]
fn test_backups_are_a_stack() {
    let config = backup_config();
    config.backup();
    config.set("a", 2).unwrap();
    config.backup();
    config.set("a", 3).unwrap();

    config.restore().unwrap();
    assert_eq!(value_at(&config, "a"), 2);
    config.restore().unwrap();
    assert_eq!(value_at(&config, "a"), 1);
}

#[test]
fn test_restore_undoes_structural_changes() {
    let config = Config::new(raw_map! { "a" => raw_map! { "b" => 1 } });
    config.backup();
    config
        .extend(raw_map! { "a" => raw_map! { "c" => 2 }, "d" => 3 })
        .unwrap();
    config.get_config("a").unwrap().pop("b").unwrap();

    config.restore().unwrap();
    assert_serializes_to(&config, serde_json::json!({"a": {"b": 1}}));
}

#[test]
fn test_restore_keeps_references_unresolved() {
    let config = Config::new(raw_map! { "v" => 1, "r" => Ref::new("v") });
    config.backup();
    config.set("r", 5).unwrap();
    config.restore().unwrap();

    config.set("v", 2).unwrap();
    assert_eq!(value_at(&config, "r"), 2);
}

#[test]
fn test_restore_marks_changed_values_dirty() {
    let config = backup_config();
    config.backup();
    config.set("a", 5).unwrap();
    config.mark_clean();

    config.restore().unwrap();
    assert!(config.is_dirty());
}

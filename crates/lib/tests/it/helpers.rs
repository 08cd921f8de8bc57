use std::{cell::Cell, rc::Rc};

use cfgtree::{
    config::{Config, Item, Value},
    raw_map,
};

// ==========================
// TREE FACTORIES
// ==========================

/// `{"a": {"b": 2}}`
pub fn simple_config() -> Config {
    Config::new(raw_map! { "a" => raw_map! { "b" => 2 } })
}

/// A three-level tree with a `value` leaf at every level and a sibling
/// subtree `a2`.
pub fn nested_config() -> Config {
    Config::new(raw_map! {
        "value" => 0,
        "a" => raw_map! {
            "value" => 1,
            "b" => raw_map! { "value" => 2 },
        },
        "a2" => raw_map! { "value" => 3 },
    })
}

// ==========================
// ASSERTION HELPERS
// ==========================

/// Read a leaf value at a dotted path, panicking with the path on failure.
pub fn value_at(config: &Config, path: &str) -> Value {
    match config.get_path(path) {
        Ok(Item::Value(value)) => value,
        Ok(Item::Node(_)) => panic!("Expected a leaf at '{path}', found a mapping"),
        Err(e) => panic!("Failed to read '{path}': {e}"),
    }
}

/// Assert that the tree serializes to `expected`.
pub fn assert_serializes_to(config: &Config, expected: serde_json::Value) {
    let actual = serde_json::Value::Object(
        config
            .serialize_to_dict()
            .expect("Failed to serialize config"),
    );
    assert_eq!(actual, expected);
}

// ==========================
// HOOK HELPERS
// ==========================

/// Counts how many times it was called, and remembers the last node it was
/// called with.
#[derive(Clone, Default)]
pub struct Checkpoint {
    calls: Rc<Cell<usize>>,
    last: Rc<std::cell::RefCell<Option<Config>>>,
}

impl Checkpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register this checkpoint as an update hook on `config`.
    pub fn attach(&self, config: &Config) {
        let checkpoint = self.clone();
        config.on_update(move |node| {
            checkpoint.calls.set(checkpoint.calls.get() + 1);
            *checkpoint.last.borrow_mut() = Some(node.clone());
        });
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn called(&self) -> bool {
        self.calls() > 0
    }

    pub fn last(&self) -> Option<Config> {
        self.last.borrow().clone()
    }
}

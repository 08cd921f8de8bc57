//! The configuration tree.
//!
//! A [`Config`] is one cell of a hierarchical, mutable configuration tree. A
//! cell is either a *leaf* holding a [`Value`] or a *mapping* from names to
//! child entries. Child entries are raw values, nested `Config` nodes or
//! [`Ref`] cross-references resolved on read.
//!
//! # Handles and identity
//!
//! `Config` is a cheap, clonable handle. Cloning the handle never copies the
//! tree: two handles to the same node observe each other's writes, and
//! [`Config::ptr_eq`] tells whether two handles name the same node. Nodes
//! hold a weak back-reference to their parent, so ownership flows strictly
//! from a parent's mapping to its children.
//!
//! # Writes
//!
//! - [`Config::set`] and [`Config::assign_path`] overwrite existing keys only
//! - [`Config::extend`] and [`Config::update`] add new structure
//! - [`Config::backup`] and [`Config::restore`] roll a subtree back
//!
//! ```
//! # use cfgtree::{raw_map, config::Config};
//! let config = Config::new(raw_map! { "a" => raw_map! { "b" => 2 } });
//!
//! config.assign_path("a.b", 3)?;
//! assert_eq!(config.root().child("a")?.get_as::<i64>("b")?, 3);
//!
//! assert!(config.get_config("a")?.set("c", 4).is_err());
//! config.extend(raw_map! { "a" => raw_map! { "c" => 4 } })?;
//! assert_eq!(config.get_path("a.c")?.into_value()?, 4);
//! # Ok::<(), cfgtree::config::ConfigError>(())
//! ```
//!
//! The tree is single-threaded: handles are neither `Send` nor `Sync`.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use indexmap::IndexMap;

pub mod errors;
mod hooks;
mod literal;
mod merge;
mod path;
mod proxy;
mod raw;
mod reference;
mod snapshot;
pub mod value;

pub use errors::ConfigError;
pub use hooks::UpdateCallback;
pub use literal::parse_literal;
pub use proxy::{Attribute, ConfigProxy};
pub use raw::{Metadata, Raw, RawMap, Tagged, raw_map_from_json, tag};
pub use reference::Ref;
pub use snapshot::BackupGuard;
pub use value::{Value, ValueKind};

use reference::RawTarget;
use snapshot::State;

/// A stored child entry.
#[derive(Debug, Clone)]
pub(crate) enum Entry {
    Value(Value),
    Ref(Ref),
    Node(Config),
}

#[derive(Debug)]
pub(crate) enum NodeValue {
    Leaf(Value),
    Map(IndexMap<String, Entry>),
}

pub(crate) struct ConfigInner {
    value: NodeValue,
    parent: Option<Weak<RefCell<ConfigInner>>>,
    metadata: Option<Metadata>,
    dirty: bool,
    backups: Vec<State>,
    subscribers: Vec<UpdateCallback>,
}

/// A node of the configuration tree. See the [module docs](self).
#[derive(Clone)]
pub struct Config {
    inner: Rc<RefCell<ConfigInner>>,
}

/// The result of reading a child: a leaf value, or a mapping node.
///
/// Leaf nodes are always unwrapped to their value; use
/// [`Config::get_config`] to reach a leaf as a node (for its metadata).
#[derive(Debug, Clone)]
pub enum Item {
    Value(Value),
    Node(Config),
}

impl Item {
    /// Returns true if this item is a mapping node
    pub fn is_node(&self) -> bool {
        matches!(self, Item::Node(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Item::Value(value) => Some(value),
            Item::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&Config> {
        match self {
            Item::Node(node) => Some(node),
            Item::Value(_) => None,
        }
    }

    /// Unwraps a leaf value, failing with `NotALeaf` on a mapping
    pub fn into_value(self) -> Result<Value, ConfigError> {
        match self {
            Item::Value(value) => Ok(value),
            Item::Node(_) => Err(ConfigError::NotALeaf),
        }
    }

    /// Unwraps a mapping node
    pub fn into_node(self) -> Result<Config, ConfigError> {
        match self {
            Item::Node(node) => Ok(node),
            Item::Value(value) => Err(ConfigError::TypeMismatch {
                expected: "mapping".to_string(),
                actual: value.type_name().to_string(),
            }),
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Item::Value(a), Item::Value(b)) => a == b,
            (Item::Node(a), Item::Node(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<Config> for Item {
    fn from(node: Config) -> Self {
        Item::Node(node)
    }
}

macro_rules! impl_item_from_value {
    ($($type:ty),* $(,)?) => {
        $(
            impl From<$type> for Item {
                fn from(value: $type) -> Self {
                    Item::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_item_from_value!(Value, bool, i64, i32, f64, String, &str, Vec<Value>);

impl Config {
    /// Builds a root node from a raw mapping.
    ///
    /// Nested raw mappings become child nodes right away; raw scalars stay raw
    /// until first accessed as a node. `Raw::Node` entries are linked.
    pub fn new(map: impl Into<RawMap>) -> Self {
        Self::build(map.into(), None)
    }

    /// Builds an empty root mapping.
    pub fn empty() -> Self {
        Self::new(RawMap::new())
    }

    /// Builds a detached leaf node.
    pub fn leaf(value: impl Into<Value>) -> Self {
        Self::from_parts(NodeValue::Leaf(value.into()), None, None)
    }

    /// Builds a root node from a JSON object.
    pub fn from_json(json: serde_json::Value) -> Result<Self, ConfigError> {
        match json {
            serde_json::Value::Object(object) => Ok(Self::new(raw_map_from_json(object)?)),
            other => Err(ConfigError::UnsupportedValue {
                reason: format!("a config root must be an object, got {other}"),
            }),
        }
    }

    /// Parses JSON text and builds a root node from it.
    pub fn from_json_str(source: &str) -> crate::Result<Self> {
        let json: serde_json::Value = serde_json::from_str(source)?;
        Ok(Self::from_json(json)?)
    }

    fn from_parts(value: NodeValue, parent: Option<&Config>, metadata: Option<Metadata>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ConfigInner {
                value,
                parent: parent.map(|parent| Rc::downgrade(&parent.inner)),
                metadata,
                dirty: false,
                backups: Vec::new(),
                subscribers: Vec::new(),
            })),
        }
    }

    pub(crate) fn build(map: RawMap, parent: Option<&Config>) -> Self {
        let node = Self::from_parts(NodeValue::Map(IndexMap::new()), parent, None);
        for (key, raw) in map {
            node.insert_raw(key, raw);
        }
        node
    }

    /// Stores `raw` under `key`, creating the key if needed. Callers check
    /// for cycles and lost structure first.
    pub(crate) fn insert_raw(&self, key: String, raw: Raw) {
        let entry = match raw {
            Raw::Value(value) => Entry::Value(value),
            Raw::Ref(reference) => Entry::Ref(reference),
            Raw::Tagged(tagged) => {
                let (value, metadata) = tagged.into_parts();
                Entry::Node(Self::from_parts(
                    NodeValue::Leaf(value),
                    Some(self),
                    Some(metadata),
                ))
            }
            Raw::Map(map) => Entry::Node(Self::build(map, Some(self))),
            Raw::Node(node) => {
                node.adopt_by(self);
                Entry::Node(node)
            }
        };
        self.replace_entry(&key, entry);
    }

    /// Attaches a linked node to `parent` unless it already has a live parent.
    fn adopt_by(&self, parent: &Config) {
        if self.get_parent().is_none() {
            tracing::trace!("linking orphan config node under a new parent");
            self.inner.borrow_mut().parent = Some(Rc::downgrade(&parent.inner));
        }
    }

    pub(crate) fn replace_entry(&self, key: &str, entry: Entry) {
        if let NodeValue::Map(map) = &mut self.inner.borrow_mut().value {
            map.insert(key.to_string(), entry);
        }
    }

    /// Returns true if both handles refer to the same node
    pub fn ptr_eq(&self, other: &Config) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns whether this node is a leaf, i.e. holds a value rather than a mapping.
    pub fn is_leaf(&self) -> bool {
        matches!(self.inner.borrow().value, NodeValue::Leaf(_))
    }

    /// Gets the value of a leaf node.
    pub fn get_value(&self) -> Result<Value, ConfigError> {
        match &self.inner.borrow().value {
            NodeValue::Leaf(value) => Ok(value.clone()),
            NodeValue::Map(_) => Err(ConfigError::NotALeaf),
        }
    }

    /// Overwrites the value of a leaf node, with the same change tracking as
    /// [`Config::set`].
    pub fn set_value(&self, value: impl Into<Value>) -> Result<(), ConfigError> {
        if self.is_leaf() {
            if self.replace_leaf(value.into()) {
                self.notify_changed();
            }
            Ok(())
        } else {
            Err(ConfigError::NotALeaf)
        }
    }

    /// Swaps a leaf value in place; returns whether it changed.
    fn replace_leaf(&self, value: Value) -> bool {
        match &mut self.inner.borrow_mut().value {
            NodeValue::Leaf(old) if *old != value => {
                *old = value;
                true
            }
            _ => false,
        }
    }

    /// Names of the direct children, in insertion order. Empty for a leaf.
    pub fn keys(&self) -> Vec<String> {
        match &self.inner.borrow().value {
            NodeValue::Map(map) => map.keys().cloned().collect(),
            NodeValue::Leaf(_) => Vec::new(),
        }
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        match &self.inner.borrow().value {
            NodeValue::Map(map) => map.len(),
            NodeValue::Leaf(_) => 0,
        }
    }

    /// Returns true for a leaf or a mapping without children
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn entry(&self, name: &str) -> Option<Entry> {
        match &self.inner.borrow().value {
            NodeValue::Map(map) => map.get(name).cloned(),
            NodeValue::Leaf(_) => None,
        }
    }

    pub(crate) fn raw_entry(&self, name: &str) -> Option<RawTarget> {
        match &self.inner.borrow().value {
            NodeValue::Map(map) => map.get(name).map(|entry| match entry {
                Entry::Node(node) if !node.is_leaf() => RawTarget::Subtree(node.clone()),
                Entry::Node(_) | Entry::Value(_) => RawTarget::Leaf,
                Entry::Ref(reference) => RawTarget::Ref(reference.clone()),
            }),
            NodeValue::Leaf(_) => None,
        }
    }

    /// Reads a direct child.
    ///
    /// Leaf children come back as values, mapping children as nodes, and
    /// references are resolved to their target. Fails with `KeyNotFound` if
    /// the child does not exist.
    pub fn get_item(&self, name: &str) -> Result<Item, ConfigError> {
        match self
            .entry(name)
            .ok_or_else(|| ConfigError::key_not_found(name))?
        {
            Entry::Value(value) => Ok(Item::Value(value)),
            Entry::Node(node) => Ok(node.into_item()),
            Entry::Ref(reference) => reference.resolve(self),
        }
    }

    fn into_item(self) -> Item {
        let value = match &self.inner.borrow().value {
            NodeValue::Leaf(value) => Some(value.clone()),
            NodeValue::Map(_) => None,
        };
        match value {
            Some(value) => Item::Value(value),
            None => Item::Node(self),
        }
    }

    /// Like [`Config::get_item`], but `None` when the child is missing or its
    /// reference does not resolve.
    pub fn get(&self, name: &str) -> Option<Item> {
        self.get_item(name).ok()
    }

    /// Like [`Config::get`], with a fallback.
    pub fn get_or(&self, name: &str, default: impl Into<Item>) -> Item {
        self.get(name).unwrap_or_else(|| default.into())
    }

    /// Checks whether a child exists and, for references, resolves.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns a child as a node, wrapping a raw leaf value on first access.
    ///
    /// The wrapped node replaces the raw value in place, so every later call
    /// returns the same node. `path` may be dotted.
    pub fn get_config(&self, path: &str) -> Result<Config, ConfigError> {
        if !path.contains('.') {
            return self.child_config(path);
        }
        let mut current = self.clone();
        for segment in path.split('.') {
            current = current.child_config(segment).map_err(|err| {
                if err.is_not_found() {
                    ConfigError::invalid_path(path)
                } else {
                    err
                }
            })?;
        }
        Ok(current)
    }

    pub(crate) fn child_config(&self, name: &str) -> Result<Config, ConfigError> {
        match self
            .entry(name)
            .ok_or_else(|| ConfigError::key_not_found(name))?
        {
            Entry::Node(node) => Ok(node),
            Entry::Ref(reference) => reference.resolve_config(self),
            Entry::Value(value) => {
                let node = Self::from_parts(NodeValue::Leaf(value), Some(self), None);
                self.replace_entry(name, Entry::Node(node.clone()));
                Ok(node)
            }
        }
    }

    /// Removes a child and returns it in raw form.
    pub fn pop(&self, name: &str) -> Result<Raw, ConfigError> {
        let removed = match &mut self.inner.borrow_mut().value {
            NodeValue::Map(map) => map.shift_remove(name),
            NodeValue::Leaf(_) => None,
        };
        let entry = removed.ok_or_else(|| ConfigError::key_not_found(name))?;
        if let Entry::Node(node) = &entry {
            if node.get_parent().is_some_and(|parent| parent.ptr_eq(self)) {
                node.inner.borrow_mut().parent = None;
            }
        }
        Ok(Raw::from_entry(entry))
    }

    /// Overwrites the value of an existing child.
    ///
    /// Fails with `CannotSetValue` if the key does not exist, or if it holds a
    /// subtree that still has children. Assigning a leaf that already has
    /// metadata keeps the metadata. A write that changes the stored value
    /// marks dirty state and fires update hooks; the written entry becomes a
    /// leaf node so it can carry its own dirty flag.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        enum Changed {
            Nothing,
            Leaf(Config),
        }

        let value = value.into();
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let NodeValue::Map(map) = &mut inner.value else {
                return Err(ConfigError::cannot_set(name, "leaf nodes have no children"));
            };
            let Some(slot) = map.get_mut(name) else {
                tracing::debug!(key = name, "rejected assignment to a missing key");
                return Err(ConfigError::cannot_set(name, "key does not exist"));
            };
            match slot {
                Entry::Value(old) if *old == value => Changed::Nothing,
                Entry::Value(_) | Entry::Ref(_) => {
                    let leaf = Self::from_parts(NodeValue::Leaf(value), Some(self), None);
                    *slot = Entry::Node(leaf.clone());
                    Changed::Leaf(leaf)
                }
                Entry::Node(node) if node.is_leaf() => {
                    if node.replace_leaf(value) {
                        Changed::Leaf(node.clone())
                    } else {
                        Changed::Nothing
                    }
                }
                Entry::Node(node) => {
                    if !node.is_empty() {
                        tracing::debug!(key = name, "rejected assignment over a subtree");
                        return Err(ConfigError::cannot_set(
                            name,
                            "would discard a non-empty subtree",
                        ));
                    }
                    let leaf = Self::from_parts(NodeValue::Leaf(value), Some(self), None);
                    *slot = Entry::Node(leaf.clone());
                    Changed::Leaf(leaf)
                }
            }
        };

        if let Changed::Leaf(node) = changed {
            node.notify_changed();
        }
        Ok(())
    }

    /// Returns the parent node, if any
    pub fn get_parent(&self) -> Option<Config> {
        self.inner
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Config { inner })
    }

    /// Attaches a root node under `parent`.
    ///
    /// The parent link is write-once: a node that already has a live parent
    /// fails with `ParentAlreadySet`. This only sets the back-reference; it
    /// does not add the node to the parent's children.
    pub fn set_parent(&self, parent: &Config) -> Result<(), ConfigError> {
        if self.get_parent().is_some() {
            return Err(ConfigError::ParentAlreadySet);
        }
        if self.encloses(parent) {
            return Err(ConfigError::CyclicLink {
                key: "(parent)".to_string(),
            });
        }
        self.inner.borrow_mut().parent = Some(Rc::downgrade(&parent.inner));
        Ok(())
    }

    /// Returns true if `target` is this node, sits below it, or has it on its
    /// parent chain.
    pub(crate) fn encloses(&self, target: &Config) -> bool {
        if self.contains_node(target) {
            return true;
        }
        let mut current = Some(target.clone());
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.get_parent();
        }
        false
    }

    /// Returns true if `target` is a strict descendant of this node.
    pub(crate) fn contains_node(&self, target: &Config) -> bool {
        self.child_nodes()
            .iter()
            .any(|child| child.ptr_eq(target) || child.contains_node(target))
    }

    pub(crate) fn child_nodes(&self) -> Vec<Config> {
        match &self.inner.borrow().value {
            NodeValue::Map(map) => map
                .values()
                .filter_map(|entry| match entry {
                    Entry::Node(node) => Some(node.clone()),
                    _ => None,
                })
                .collect(),
            NodeValue::Leaf(_) => Vec::new(),
        }
    }

    /// Metadata attached to this node
    pub fn metadata(&self) -> Option<Metadata> {
        self.inner.borrow().metadata.clone()
    }

    pub fn set_metadata(&self, metadata: Option<Metadata>) {
        self.inner.borrow_mut().metadata = metadata;
    }

    /// An attribute-style view of this node
    pub fn root(&self) -> ConfigProxy {
        ConfigProxy::new(self.clone())
    }

    /// Every leaf under this node, as `(dotted subpath, leaf node)` pairs.
    ///
    /// Raw leaf values are wrapped into nodes along the way.
    ///
    /// Fails with `InvalidPath` when a reference leads back to a node that is
    /// already being walked.
    pub fn traverse_leaves(&self) -> Result<Vec<(String, Config)>, ConfigError> {
        self.collect_leaves("", &mut vec![self.clone()])
    }

    fn collect_leaves(
        &self,
        prefix: &str,
        trail: &mut Vec<Config>,
    ) -> Result<Vec<(String, Config)>, ConfigError> {
        let mut leaves = Vec::new();
        for key in self.keys() {
            let path = join_path(prefix, &key);
            let child = self.child_config(&key)?;
            if child.is_leaf() {
                leaves.push((path, child));
                continue;
            }
            let nested = child.within(trail, &path, |child, trail| {
                child.collect_leaves(&path, trail)
            })?;
            leaves.extend(nested);
        }
        Ok(leaves)
    }

    /// Runs `walk` on this node with it pushed onto `trail`, refusing to
    /// enter a node that is already on it.
    fn within<T>(
        &self,
        trail: &mut Vec<Config>,
        path: &str,
        walk: impl FnOnce(&Config, &mut Vec<Config>) -> Result<T, ConfigError>,
    ) -> Result<T, ConfigError> {
        if trail.iter().any(|node| node.ptr_eq(self)) {
            tracing::debug!(path = %path, "reference cycles back to an enclosing node");
            return Err(ConfigError::invalid_path(path));
        }
        trail.push(self.clone());
        let result = walk(self, trail);
        trail.pop();
        result
    }

    /// Returns a deep-copied plain mapping of the current values.
    ///
    /// References are resolved, so the result has no links back into the tree
    /// and can be fed to [`Config::from_json`]. A reference back to an
    /// enclosing mapping has no finite form and fails with `InvalidPath`.
    pub fn serialize_to_dict(&self) -> Result<serde_json::Map<String, serde_json::Value>, ConfigError> {
        if let NodeValue::Leaf(value) = &self.inner.borrow().value {
            return Err(ConfigError::TypeMismatch {
                expected: "mapping".to_string(),
                actual: value.type_name().to_string(),
            });
        }
        self.collect_dict("", &mut vec![self.clone()])
    }

    fn collect_dict(
        &self,
        prefix: &str,
        trail: &mut Vec<Config>,
    ) -> Result<serde_json::Map<String, serde_json::Value>, ConfigError> {
        let mut dict = serde_json::Map::new();
        for key in self.keys() {
            let json = match self.get_item(&key)? {
                Item::Value(value) => value.to_json(),
                Item::Node(node) => {
                    let path = join_path(prefix, &key);
                    let nested = node.within(trail, &path, |node, trail| {
                        node.collect_dict(&path, trail)
                    })?;
                    serde_json::Value::Object(nested)
                }
            };
            dict.insert(key, json);
        }
        Ok(dict)
    }

    /// Snapshot of this node's raw children, with nodes shared rather than
    /// copied.
    pub(crate) fn to_raw_map(&self) -> RawMap {
        match &self.inner.borrow().value {
            NodeValue::Map(map) => map
                .iter()
                .map(|(key, entry)| (key.clone(), Raw::from_entry(entry.clone())))
                .collect(),
            NodeValue::Leaf(_) => RawMap::new(),
        }
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

impl From<RawMap> for Config {
    fn from(map: RawMap) -> Self {
        Config::new(map)
    }
}

impl From<&Config> for RawMap {
    fn from(config: &Config) -> Self {
        config.to_raw_map()
    }
}

impl From<Config> for RawMap {
    fn from(config: Config) -> Self {
        config.to_raw_map()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Config")
                .field("value", &inner.value)
                .field("metadata", &inner.metadata)
                .field("dirty", &inner.dirty)
                .field("backups", &inner.backups.len())
                .finish_non_exhaustive(),
            Err(_) => f.write_str("Config { <borrowed> }"),
        }
    }
}

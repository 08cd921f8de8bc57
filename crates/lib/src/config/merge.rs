//! Structural merges: [`Config::extend`], [`Config::update`] and
//! [`Config::extend_with`].
//!
//! A merge first checks the whole incoming structure against the live tree
//! and only then writes, so a rejected merge leaves the tree untouched.
//!
//! The merge never discards structure: a scalar cannot replace a subtree that
//! still has children, and a mapping, raw or linked, cannot replace a leaf
//! that holds a value. Incoming [`Config`] nodes are linked, not copied, so the merged
//! tree shares identity with them.

use crate::config::{Config, ConfigError, Entry, Raw, RawMap, Tagged};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Incoming nodes replace existing subtrees they fully cover
    Extend,
    /// Incoming nodes are merged into existing subtrees
    Update,
}

impl Config {
    /// Adds new structure from `source`, linking any nodes it contains.
    ///
    /// Fails with `CannotSetValue` if a value would overwrite a non-empty
    /// subtree, or if an incoming node would replace a subtree without
    /// covering all of its leaves. Fails with `CyclicLink` if an incoming node
    /// is this node or one of its ancestors.
    ///
    /// ```
    /// # use cfgtree::{raw_map, config::Config};
    /// let config = Config::new(raw_map! { "a" => 1 });
    /// config.extend(raw_map! { "b" => raw_map! { "c" => 2 } })?;
    /// config.extend(raw_map! { "b" => raw_map! { "d" => 3 } })?;
    /// assert_eq!(config.get_config("b")?.keys(), vec!["c", "d"]);
    /// assert!(config.extend(raw_map! { "b" => 1 }).is_err());
    /// # Ok::<(), cfgtree::config::ConfigError>(())
    /// ```
    pub fn extend(&self, source: impl Into<RawMap>) -> Result<(), ConfigError> {
        self.merge(source.into(), Mode::Extend)
    }

    /// Like [`Config::extend`], but incoming nodes landing on an existing
    /// subtree are merged into it key by key instead of replacing it.
    pub fn update(&self, source: impl Into<RawMap>) -> Result<(), ConfigError> {
        self.merge(source.into(), Mode::Update)
    }

    /// Extends with `source` followed by single-level `overrides`; an
    /// override wins over a `source` entry with the same key.
    pub fn extend_with(
        &self,
        source: impl Into<RawMap>,
        overrides: RawMap,
    ) -> Result<(), ConfigError> {
        let mut map = source.into();
        for (key, raw) in overrides {
            map.insert(key, raw);
        }
        self.merge(map, Mode::Extend)
    }

    fn merge(&self, map: RawMap, mode: Mode) -> Result<(), ConfigError> {
        tracing::debug!(entries = map.len(), ?mode, "merging into config");
        if let Err(err) = check_merge(self, Some(self), &map, mode) {
            tracing::debug!(error = %err, "rejected merge");
            return Err(err);
        }
        self.apply_merge(map, mode)
    }

    fn apply_merge(&self, map: RawMap, mode: Mode) -> Result<(), ConfigError> {
        for (key, raw) in map {
            let live = self.entry(&key);
            match raw {
                Raw::Map(sub) => {
                    let child = match live {
                        Some(Entry::Node(node)) if !node.is_leaf() => node,
                        _ => {
                            let node = Config::build(RawMap::new(), Some(self));
                            self.replace_entry(&key, Entry::Node(node.clone()));
                            node
                        }
                    };
                    child.apply_merge(sub, mode)?;
                }
                Raw::Node(incoming) => match live {
                    Some(Entry::Node(existing)) if existing.ptr_eq(&incoming) => {}
                    Some(Entry::Node(existing))
                        if mode == Mode::Update
                            && !existing.is_leaf()
                            && !incoming.is_leaf() =>
                    {
                        existing.apply_merge(incoming.to_raw_map(), mode)?;
                    }
                    _ => self.insert_raw(key, Raw::Node(incoming)),
                },
                Raw::Value(value) => match live {
                    Some(Entry::Value(_) | Entry::Ref(_)) => self.set(&key, value)?,
                    Some(Entry::Node(node)) if node.is_leaf() => self.set(&key, value)?,
                    _ => self.insert_raw(key, Raw::Value(value)),
                },
                Raw::Tagged(tagged) => match live {
                    Some(Entry::Value(_) | Entry::Ref(_)) => self.set_tagged(&key, tagged)?,
                    Some(Entry::Node(node)) if node.is_leaf() => self.set_tagged(&key, tagged)?,
                    _ => self.insert_raw(key, Raw::Tagged(tagged)),
                },
                Raw::Ref(reference) => self.insert_raw(key, Raw::Ref(reference)),
            }
        }
        Ok(())
    }

    /// Assigns a tagged value to an existing leaf, merging its metadata into
    /// the leaf's.
    fn set_tagged(&self, key: &str, tagged: Tagged) -> Result<(), ConfigError> {
        let (value, metadata) = tagged.into_parts();
        self.set(key, value)?;
        let leaf = self.child_config(key)?;
        let mut merged = leaf.metadata().unwrap_or_default();
        merged.extend(metadata);
        leaf.set_metadata(Some(merged));
        Ok(())
    }

    /// Dotted paths of every leaf under this node, without wrapping raw
    /// values into nodes.
    fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for key in self.keys() {
            match self.entry(&key) {
                Some(Entry::Node(node)) if !node.is_leaf() => {
                    paths.extend(
                        node.leaf_paths()
                            .into_iter()
                            .map(|sub| format!("{key}.{sub}")),
                    );
                }
                Some(_) => paths.push(key),
                None => {}
            }
        }
        paths
    }
}

/// Validates `map` against `target`, the live node it lands on, or `None`
/// when that node does not exist yet. `anchor` is the nearest existing node
/// on the way.
fn check_merge(
    anchor: &Config,
    target: Option<&Config>,
    map: &RawMap,
    mode: Mode,
) -> Result<(), ConfigError> {
    for (key, raw) in map {
        let live = target.and_then(|target| target.entry(key));
        match raw {
            Raw::Map(sub) => match live {
                None => check_merge(anchor, None, sub, mode)?,
                Some(Entry::Node(node)) if !node.is_leaf() => {
                    check_merge(&node, Some(&node), sub, mode)?
                }
                Some(Entry::Value(value)) if value.is_null() => {
                    check_merge(anchor, None, sub, mode)?
                }
                Some(Entry::Node(node)) if node.get_value().is_ok_and(|v| v.is_null()) => {
                    check_merge(anchor, None, sub, mode)?
                }
                Some(_) => {
                    return Err(ConfigError::cannot_set(
                        key,
                        "a mapping cannot replace an existing value",
                    ));
                }
            },
            Raw::Node(incoming) => {
                if incoming.encloses(anchor) {
                    return Err(ConfigError::CyclicLink { key: key.clone() });
                }
                let existing = match live {
                    None => continue,
                    Some(Entry::Value(value)) if value.is_null() => continue,
                    Some(Entry::Value(_) | Entry::Ref(_)) if incoming.is_leaf() => continue,
                    Some(Entry::Value(_) | Entry::Ref(_)) => {
                        return Err(ConfigError::cannot_set(
                            key,
                            "a mapping cannot replace an existing value",
                        ));
                    }
                    Some(Entry::Node(existing)) => existing,
                };
                if existing.ptr_eq(incoming) {
                    continue;
                }
                if existing.is_leaf() {
                    if incoming.is_leaf() || existing.get_value().is_ok_and(|v| v.is_null()) {
                        continue;
                    }
                    return Err(ConfigError::cannot_set(
                        key,
                        "a mapping cannot replace an existing value",
                    ));
                }
                if existing.is_empty() {
                    continue;
                }
                if incoming.is_leaf() {
                    return Err(ConfigError::cannot_set(
                        key,
                        "would discard a non-empty subtree",
                    ));
                }
                match mode {
                    Mode::Update => check_merge(
                        &existing,
                        Some(&existing),
                        &incoming.to_raw_map(),
                        mode,
                    )?,
                    Mode::Extend => {
                        if let Some(lost) = existing
                            .leaf_paths()
                            .into_iter()
                            .find(|path| incoming.get_path(path).is_err())
                        {
                            tracing::debug!(key = %key, lost = %lost, "linked node would drop a leaf");
                            return Err(ConfigError::cannot_set(
                                key,
                                format!("linked node has no value for '{lost}'"),
                            ));
                        }
                    }
                }
            }
            Raw::Value(_) | Raw::Tagged(_) | Raw::Ref(_) => {
                if let Some(Entry::Node(node)) = live {
                    if !node.is_leaf() && !node.is_empty() {
                        return Err(ConfigError::cannot_set(
                            key,
                            "would discard a non-empty subtree",
                        ));
                    }
                }
            }
        }
    }
    Ok(())
}

//! Backup and restore of subtree state.
//!
//! Every node owns a stack of snapshots. [`Config::backup`] pushes a deep copy
//! of the node's current values, [`Config::restore`] pops the latest one and
//! writes it back. Restores go through the ordinary write path, so they mark
//! dirty state and fire hooks for values that actually change.

use indexmap::IndexMap;

use crate::config::{Config, ConfigError, Entry, Metadata, NodeValue, Ref, Value};

/// A deep copy of one node's state.
#[derive(Debug, Clone)]
pub(crate) enum State {
    /// A raw value never wrapped into a node
    Value(Value),
    /// A leaf node, with its metadata
    Leaf {
        value: Value,
        metadata: Option<Metadata>,
    },
    /// A cross-reference, kept unresolved
    Ref(Ref),
    Map(IndexMap<String, State>),
}

impl State {
    fn capture(node: &Config) -> State {
        let entries: Vec<(String, Entry)> = match &node.inner.borrow().value {
            NodeValue::Leaf(value) => {
                return State::Leaf {
                    value: value.clone(),
                    metadata: node.metadata(),
                };
            }
            NodeValue::Map(map) => map
                .iter()
                .map(|(key, entry)| (key.clone(), entry.clone()))
                .collect(),
        };
        State::Map(
            entries
                .into_iter()
                .map(|(key, entry)| {
                    let state = match entry {
                        Entry::Value(value) => State::Value(value),
                        Entry::Ref(reference) => State::Ref(reference),
                        Entry::Node(child) => State::capture(&child),
                    };
                    (key, state)
                })
                .collect(),
        )
    }
}

impl Config {
    /// Pushes a snapshot of this subtree onto its backup stack.
    ///
    /// ```
    /// # use cfgtree::{raw_map, config::Config};
    /// let config = Config::new(raw_map! { "a" => 1 });
    /// config.backup();
    /// config.set("a", 2)?;
    /// config.restore()?;
    /// assert_eq!(config.get_path("a")?.into_value()?, 1);
    /// # Ok::<(), cfgtree::config::ConfigError>(())
    /// ```
    pub fn backup(&self) {
        let state = State::capture(self);
        let mut inner = self.inner.borrow_mut();
        inner.backups.push(state);
        tracing::debug!(depth = inner.backups.len(), "pushed config backup");
    }

    /// Pops the latest snapshot and writes it back.
    ///
    /// Keys added since the snapshot are removed, removed keys come back, and
    /// changed values are reset. Fails with `NoBackup` on an empty stack.
    pub fn restore(&self) -> Result<(), ConfigError> {
        let state = self
            .inner
            .borrow_mut()
            .backups
            .pop()
            .ok_or(ConfigError::NoBackup)?;
        tracing::debug!("restoring config backup");
        self.apply_state(state)
    }

    /// Pops the latest snapshot without applying it.
    pub fn discard_backup(&self) -> Result<(), ConfigError> {
        self.inner
            .borrow_mut()
            .backups
            .pop()
            .map(|_| ())
            .ok_or(ConfigError::NoBackup)
    }

    /// Number of snapshots on this node's stack
    pub fn backup_depth(&self) -> usize {
        self.inner.borrow().backups.len()
    }

    /// Takes a backup that is restored when the returned guard drops.
    ///
    /// ```
    /// # use cfgtree::{raw_map, config::Config};
    /// let config = Config::new(raw_map! { "a" => 1 });
    /// {
    ///     let _guard = config.backup_context();
    ///     config.set("a", 2)?;
    /// }
    /// assert_eq!(config.get_path("a")?.into_value()?, 1);
    /// # Ok::<(), cfgtree::config::ConfigError>(())
    /// ```
    #[must_use = "the backup is restored as soon as the guard is dropped"]
    pub fn backup_context(&self) -> BackupGuard {
        self.backup();
        BackupGuard {
            config: self.clone(),
        }
    }

    fn apply_state(&self, state: State) -> Result<(), ConfigError> {
        match state {
            State::Map(states) => self.apply_map(states),
            State::Leaf { value, metadata } => {
                self.set_value(value)?;
                self.set_metadata(metadata);
                Ok(())
            }
            State::Value(value) => self.set_value(value),
            State::Ref(_) => Err(ConfigError::UnsupportedValue {
                reason: "a reference cannot be restored onto a node".to_string(),
            }),
        }
    }

    fn apply_map(&self, mut states: IndexMap<String, State>) -> Result<(), ConfigError> {
        for key in self.keys() {
            if !states.contains_key(&key) {
                self.pop(&key)?;
            }
        }

        for (key, state) in states.drain(..) {
            let live = self.entry(&key);
            match state {
                State::Map(children) => {
                    let node = match live {
                        Some(Entry::Node(node)) if !node.is_leaf() => node,
                        _ => {
                            let node = Config::build(Default::default(), Some(self));
                            self.replace_entry(&key, Entry::Node(node.clone()));
                            node
                        }
                    };
                    node.apply_map(children)?;
                }
                State::Value(value) => match live {
                    Some(Entry::Value(_)) => self.set(&key, value)?,
                    Some(Entry::Node(node)) if node.is_leaf() => self.set(&key, value)?,
                    _ => self.replace_entry(&key, Entry::Value(value)),
                },
                State::Leaf { value, metadata } => {
                    match live {
                        Some(Entry::Value(_)) => self.set(&key, value)?,
                        Some(Entry::Node(node)) if node.is_leaf() => self.set(&key, value)?,
                        _ => self.replace_entry(&key, Entry::Value(value)),
                    }
                    self.child_config(&key)?.set_metadata(metadata);
                }
                State::Ref(reference) => self.replace_entry(&key, Entry::Ref(reference)),
            }
        }
        Ok(())
    }
}

/// Restores a backup when dropped. Returned by [`Config::backup_context`].
pub struct BackupGuard {
    config: Config,
}

impl BackupGuard {
    /// The node this guard restores
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for BackupGuard {
    fn drop(&mut self) {
        if let Err(err) = self.config.restore() {
            tracing::warn!(error = %err, "failed to restore config backup");
        }
    }
}

//! Relative cross-references between tree entries.
//!
//! A [`Ref`] stores a path whose leading run of dots encodes how far up the
//! tree to climb before resolving the rest:
//!
//! | path            | resolves against                       |
//! |-----------------|----------------------------------------|
//! | `"b"`           | the node holding the reference         |
//! | `".value"`      | the same node                          |
//! | `"..a_2.value"` | that node's parent                     |
//! | `"...b.value"`  | two levels up                          |
//!
//! Resolution happens on every read, so a reference always reflects the
//! current value of its target.

use std::fmt;

use crate::{
    config::{Config, ConfigError, Item},
    constants::MAX_REFERENCE_DEPTH,
};

/// A lazily resolved pointer to another entry of the same tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ref {
    path: String,
    chained: bool,
}

/// Where a reference lands once resolved.
pub(crate) enum Target {
    /// The anchor node itself (a dots-only reference)
    Node(Config),
    /// An entry of `owner`, never itself a reference
    Entry { owner: Config, key: String },
}

impl Ref {
    /// Creates a reference that fails if its target is another reference.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            chained: false,
        }
    }

    /// Creates a reference that follows reference targets transitively, up to
    /// [`MAX_REFERENCE_DEPTH`] hops.
    pub fn chained(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            chained: true,
        }
    }

    /// The raw reference path, including its leading dots
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this reference follows other references
    pub fn is_chained(&self) -> bool {
        self.chained
    }

    /// Number of leading dots
    pub fn depth(&self) -> usize {
        self.path.len() - self.suffix().len()
    }

    /// The dotted path after the leading dots
    pub fn suffix(&self) -> &str {
        self.path.trim_start_matches('.')
    }

    /// Resolves this reference to a value, relative to `context`, the node
    /// that directly holds the reference entry.
    ///
    /// A dots-only reference names an enclosing mapping rather than a value,
    /// so it fails with `InvalidPath`.
    pub fn resolve(&self, context: &Config) -> Result<Item, ConfigError> {
        match self.target(context, 0)? {
            Target::Node(_) => Err(ConfigError::invalid_path(self.path.clone())),
            Target::Entry { owner, key } => owner.get_item(&key),
        }
    }

    /// Resolves this reference to the config node it points at.
    pub(crate) fn resolve_config(&self, context: &Config) -> Result<Config, ConfigError> {
        match self.target(context, 0)? {
            Target::Node(anchor) => Ok(anchor),
            Target::Entry { owner, key } => owner.child_config(&key),
        }
    }

    pub(crate) fn target(&self, context: &Config, hops: usize) -> Result<Target, ConfigError> {
        if hops >= MAX_REFERENCE_DEPTH {
            return Err(ConfigError::ReferenceDepthExceeded {
                path: self.path.clone(),
                limit: MAX_REFERENCE_DEPTH,
            });
        }

        let invalid = || ConfigError::invalid_path(self.path.clone());
        let depth = self.depth();
        let suffix = self.suffix();

        let mut anchor = context.clone();
        for _ in 1..depth {
            anchor = anchor.get_parent().ok_or_else(invalid)?;
        }

        if suffix.is_empty() {
            return if depth == 0 {
                Err(invalid())
            } else {
                Ok(Target::Node(anchor))
            };
        }

        let (parent_path, key) = match suffix.rsplit_once('.') {
            Some((parent_path, key)) => (Some(parent_path), key),
            None => (None, suffix),
        };

        let mut owner = anchor;
        if let Some(parent_path) = parent_path {
            for segment in parent_path.split('.') {
                owner = self.step(&owner, segment, hops)?;
            }
        }

        match owner.raw_entry(key) {
            None => Err(invalid()),
            Some(RawTarget::Ref(next)) if self.chained => {
                tracing::trace!(from = %self.path, to = %next.path, "following chained reference");
                next.target(&owner, hops + 1)
            }
            Some(RawTarget::Ref(_)) => Err(invalid()),
            Some(RawTarget::Subtree(_) | RawTarget::Leaf) => Ok(Target::Entry {
                owner,
                key: key.to_string(),
            }),
        }
    }

    /// Walks one intermediate segment, which must land on a mapping node.
    fn step(&self, owner: &Config, segment: &str, hops: usize) -> Result<Config, ConfigError> {
        let invalid = || ConfigError::invalid_path(self.path.clone());
        let next = match owner.raw_entry(segment) {
            Some(RawTarget::Subtree(node)) => node,
            Some(RawTarget::Ref(next)) if self.chained => match next.target(owner, hops + 1)? {
                Target::Node(node) => node,
                Target::Entry { owner, key } => owner.child_config(&key)?,
            },
            Some(RawTarget::Ref(_) | RawTarget::Leaf) | None => return Err(invalid()),
        };
        if next.is_leaf() {
            return Err(invalid());
        }
        Ok(next)
    }
}

/// The shape of a stored entry, read without cloning leaf values.
pub(crate) enum RawTarget {
    Subtree(Config),
    Leaf,
    Ref(Ref),
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref({:?})", self.path)
    }
}

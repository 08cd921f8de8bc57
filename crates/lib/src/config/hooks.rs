//! Dirty tracking and update hooks.
//!
//! A successful value change marks the written node and all of its ancestors
//! dirty, then fires the update hooks registered on each of those nodes,
//! innermost first. Hooks receive the node they were registered on.

use std::rc::Rc;

use crate::config::Config;

/// Callback fired after a value under the owning node changes.
pub type UpdateCallback = Rc<dyn Fn(&Config)>;

impl Config {
    /// Whether a value at or under this node changed since the last
    /// [`Config::mark_clean`].
    pub fn is_dirty(&self) -> bool {
        self.inner.borrow().dirty
    }

    /// Clears the dirty flag on this node and every node under it.
    pub fn mark_clean(&self) {
        self.inner.borrow_mut().dirty = false;
        for child in self.child_nodes() {
            child.mark_clean();
        }
    }

    /// Registers `callback` to run after any value at or under this node
    /// changes. Returns the callback so callers can keep a handle to it.
    ///
    /// ```
    /// # use std::{cell::Cell, rc::Rc};
    /// # use cfgtree::{raw_map, config::Config};
    /// let config = Config::new(raw_map! { "a" => 1 });
    /// let calls = Rc::new(Cell::new(0));
    /// let counter = calls.clone();
    /// config.on_update(move |_| counter.set(counter.get() + 1));
    /// config.set("a", 2)?;
    /// config.set("a", 2)?;
    /// assert_eq!(calls.get(), 1);
    /// # Ok::<(), cfgtree::config::ConfigError>(())
    /// ```
    pub fn on_update<F>(&self, callback: F) -> Rc<F>
    where
        F: Fn(&Config) + 'static,
    {
        let callback = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(callback.clone() as UpdateCallback);
        callback
    }

    /// Marks this node and its ancestors dirty, then runs their hooks.
    ///
    /// No borrow is held while hooks run, so a hook may read or write the
    /// tree.
    pub(crate) fn notify_changed(&self) {
        let mut pending = Vec::new();
        let mut current = Some(self.clone());
        while let Some(node) = current {
            {
                let mut inner = node.inner.borrow_mut();
                inner.dirty = true;
                for callback in &inner.subscribers {
                    pending.push((node.clone(), callback.clone()));
                }
            }
            current = node.get_parent();
        }

        if !pending.is_empty() {
            tracing::trace!(hooks = pending.len(), "running update hooks");
        }
        for (node, callback) in pending {
            callback(&node);
        }
    }
}

//! Dotted-path navigation and path assignment.
//!
//! Paths are plain dot-separated key names (`"a.b.c"`). Every segment must
//! exist; nothing is created on the way. Relative cross-reference paths are
//! handled by [`Ref`](crate::config::Ref).

use crate::config::{Config, ConfigError, Item, ValueKind, literal};

/// Splits `"a.b.c"` into `(Some("a.b"), "c")` and `"c"` into `(None, "c")`.
pub(crate) fn split_last(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once('.') {
        Some((parent, key)) => (Some(parent), key),
        None => (None, path),
    }
}

impl Config {
    /// Gets the item at a dotted path.
    ///
    /// Fails with `InvalidPath` as soon as a segment is missing or a
    /// non-final segment is a leaf.
    ///
    /// ```
    /// # use cfgtree::{raw_map, config::Config};
    /// let config = Config::new(raw_map! { "a" => raw_map! { "b" => 2 } });
    /// assert_eq!(config.get_path("a.b")?.into_value()?, 2);
    /// assert!(config.get_path("a.x").is_err());
    /// # Ok::<(), cfgtree::config::ConfigError>(())
    /// ```
    pub fn get_path(&self, path: &str) -> Result<Item, ConfigError> {
        let mut current = Item::Node(self.clone());
        for segment in path.split('.') {
            let Item::Node(node) = current else {
                return Err(ConfigError::invalid_path(path));
            };
            current = node.get_item(segment).map_err(|err| {
                if err.is_not_found() {
                    ConfigError::invalid_path(path)
                } else {
                    err
                }
            })?;
        }
        Ok(current)
    }

    /// Navigates to the node that owns the last segment of `path`.
    fn path_owner<'p>(&self, path: &'p str) -> Result<(Config, &'p str), ConfigError> {
        match split_last(path) {
            (Some(parent), key) => match self.get_path(parent)? {
                Item::Node(node) => Ok((node, key)),
                Item::Value(_) => Err(ConfigError::invalid_path(path)),
            },
            (None, key) => Ok((self.clone(), key)),
        }
    }

    /// Assigns `value` to the dotted path `path`.
    ///
    /// The final key must already exist, as with [`Config::set`]; a missing
    /// intermediate segment fails with `InvalidPath`.
    pub fn assign_path(
        &self,
        path: &str,
        value: impl Into<crate::config::Value>,
    ) -> Result<(), ConfigError> {
        let (owner, key) = self.path_owner(path)?;
        owner.set(key, value)
    }

    /// Assigns the literal `text` to `path`, reading it as the type of the
    /// value currently stored there.
    ///
    /// `default_type` is used when the current value is null; without it a
    /// null target fails with `CannotDeduceType`.
    pub fn assign_path_text(
        &self,
        path: &str,
        text: &str,
        default_type: Option<ValueKind>,
    ) -> Result<(), ConfigError> {
        let (owner, key) = self.path_owner(path)?;
        let existing = owner
            .get_item(key)
            .map_err(|err| {
                if err.is_not_found() {
                    ConfigError::cannot_set(key, "key does not exist")
                } else {
                    err
                }
            })?
            .into_value()?;
        let value = literal::deduce(&existing, text, default_type, path)?;
        owner.set(key, value)
    }

    /// Applies a `path=literal` expression.
    ///
    /// With `deduce_type` the literal is read as described in
    /// [`Config::assign_path_text`]; without it the literal is stored as text.
    ///
    /// ```
    /// # use cfgtree::{raw_map, config::Config};
    /// let config = Config::new(raw_map! { "a" => raw_map! { "b" => 1, "flag" => true } });
    /// config.assign_path_expression("a.b=2", true, None)?;
    /// config.assign_path_expression("a.flag=no", true, None)?;
    /// assert_eq!(config.get_path("a.b")?.into_value()?, 2);
    /// assert_eq!(config.get_path("a.flag")?.into_value()?, false);
    /// # Ok::<(), cfgtree::config::ConfigError>(())
    /// ```
    pub fn assign_path_expression(
        &self,
        expression: &str,
        deduce_type: bool,
        default_type: Option<ValueKind>,
    ) -> Result<(), ConfigError> {
        let Some((path, literal)) = expression.split_once('=') else {
            return Err(ConfigError::InvalidExpression {
                expression: expression.to_string(),
            });
        };
        let path = path.trim();
        if deduce_type {
            self.assign_path_text(path, literal, default_type)
        } else {
            self.assign_path(path, literal)
        }
    }
}

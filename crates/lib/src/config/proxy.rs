//! Attribute-style access to a config node.
//!
//! [`ConfigProxy`] reads mapping children as nested proxies and leaf children
//! as plain values, so a deep lookup reads as a chain of named steps:
//!
//! ```
//! # use cfgtree::{raw_map, config::Config};
//! let config = Config::new(raw_map! { "db" => raw_map! { "port" => 5432 } });
//! let port: i64 = config.root().child("db")?.get_as("port")?;
//! assert_eq!(port, 5432);
//! # Ok::<(), cfgtree::config::ConfigError>(())
//! ```

use crate::config::{Config, ConfigError, Item, Value};

/// A named-access view over one node. Cloning it clones the node handle.
#[derive(Debug, Clone)]
pub struct ConfigProxy {
    config: Config,
}

/// One attribute read through a proxy.
#[derive(Debug, Clone)]
pub enum Attribute {
    Value(Value),
    Proxy(ConfigProxy),
}

impl Attribute {
    pub fn into_value(self) -> Result<Value, ConfigError> {
        match self {
            Attribute::Value(value) => Ok(value),
            Attribute::Proxy(_) => Err(ConfigError::NotALeaf),
        }
    }

    pub fn into_proxy(self) -> Option<ConfigProxy> {
        match self {
            Attribute::Proxy(proxy) => Some(proxy),
            Attribute::Value(_) => None,
        }
    }
}

impl From<Item> for Attribute {
    fn from(item: Item) -> Self {
        match item {
            Item::Value(value) => Attribute::Value(value),
            Item::Node(node) => Attribute::Proxy(ConfigProxy::new(node)),
        }
    }
}

impl ConfigProxy {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The node behind this proxy
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads an attribute; fails with `KeyNotFound` if it is missing.
    pub fn attr(&self, name: &str) -> Result<Attribute, ConfigError> {
        self.config.get_item(name).map(Attribute::from)
    }

    pub fn get(&self, name: &str) -> Option<Attribute> {
        self.attr(name).ok()
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.config.contains(name)
    }

    /// Steps into a mapping child.
    pub fn child(&self, name: &str) -> Result<ConfigProxy, ConfigError> {
        self.config
            .get_item(name)?
            .into_node()
            .map(ConfigProxy::new)
    }

    /// Reads a leaf child.
    pub fn value(&self, name: &str) -> Result<Value, ConfigError> {
        self.config.get_item(name)?.into_value()
    }

    /// Reads a leaf child and converts it to `T`.
    pub fn get_as<T>(&self, name: &str) -> Result<T, ConfigError>
    where
        T: TryFrom<Value, Error = ConfigError>,
    {
        T::try_from(self.value(name)?)
    }

    /// Writes an existing attribute.
    ///
    /// Writes [`Config::set`] refuses, unknown names included, fail with
    /// `NoSuchAttribute`.
    pub fn set_attr(&self, name: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        self.config.set(name, value).map_err(|err| match err {
            ConfigError::CannotSetValue { .. } => ConfigError::NoSuchAttribute {
                name: name.to_string(),
            },
            other => other,
        })
    }

    /// Removes an attribute.
    pub fn del_attr(&self, name: &str) -> Result<(), ConfigError> {
        self.config.pop(name).map(|_| ()).map_err(|err| {
            if err.is_not_found() {
                ConfigError::NoSuchAttribute {
                    name: name.to_string(),
                }
            } else {
                err
            }
        })
    }

    /// Attribute names, in insertion order
    pub fn dir(&self) -> Vec<String> {
        self.config.keys()
    }
}

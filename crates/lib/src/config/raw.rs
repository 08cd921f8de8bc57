//! Raw input handed to the tree by its loaders.
//!
//! A [`RawMap`] is the plain nested mapping a loading layer produces. Its
//! entries are [`Raw`] values: scalars, nested maps, references, tagged
//! values carrying metadata, or existing [`Config`] nodes to be linked by
//! reference.

use indexmap::IndexMap;

use crate::config::{Config, ConfigError, Entry, Ref, Value};

/// Metadata tags attached to a single node.
pub type Metadata = IndexMap<String, Value>;

/// An ordered mapping of names to raw entries.
pub type RawMap = IndexMap<String, Raw>;

/// One raw entry of a [`RawMap`].
#[derive(Debug, Clone)]
pub enum Raw {
    /// Plain leaf value
    Value(Value),
    /// Leaf value carrying metadata
    Tagged(Tagged),
    /// Cross-reference, resolved on read
    Ref(Ref),
    /// Nested mapping, becomes a child node
    Map(RawMap),
    /// Existing node, linked rather than copied
    Node(Config),
}

/// A leaf value with metadata attached, built with [`tag`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    value: Value,
    metadata: Metadata,
}

/// Attaches `metadata` to `value`.
///
/// ```
/// # use cfgtree::{metadata, config::tag};
/// let tagged = tag(1, metadata! { "a" => 1 }).tag(metadata! { "b" => 2 });
/// assert_eq!(tagged.metadata().len(), 2);
/// ```
pub fn tag(value: impl Into<Value>, metadata: Metadata) -> Tagged {
    Tagged {
        value: value.into(),
        metadata,
    }
}

impl Tagged {
    /// Merges more metadata into this value; later keys win on collision.
    pub fn tag(mut self, metadata: Metadata) -> Self {
        self.metadata.extend(metadata);
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn into_parts(self) -> (Value, Metadata) {
        (self.value, self.metadata)
    }
}

impl Raw {
    /// Returns true for entries that become mapping nodes
    pub fn is_mapping(&self) -> bool {
        match self {
            Raw::Map(_) => true,
            Raw::Node(node) => !node.is_leaf(),
            _ => false,
        }
    }

    /// Converts a JSON document into a raw entry. Objects become nested maps.
    pub fn from_json(json: serde_json::Value) -> Result<Self, ConfigError> {
        match json {
            serde_json::Value::Object(object) => Ok(Raw::Map(raw_map_from_json(object)?)),
            other => Ok(Raw::Value(Value::try_from(other)?)),
        }
    }

    pub(crate) fn from_entry(entry: Entry) -> Self {
        match entry {
            Entry::Value(value) => Raw::Value(value),
            Entry::Ref(reference) => Raw::Ref(reference),
            Entry::Node(node) => Raw::Node(node),
        }
    }
}

/// Converts a JSON object into a [`RawMap`].
pub fn raw_map_from_json(
    object: serde_json::Map<String, serde_json::Value>,
) -> Result<RawMap, ConfigError> {
    object
        .into_iter()
        .map(|(key, value)| Ok((key, Raw::from_json(value)?)))
        .collect()
}

impl From<Value> for Raw {
    fn from(value: Value) -> Self {
        Raw::Value(value)
    }
}

impl From<Tagged> for Raw {
    fn from(value: Tagged) -> Self {
        Raw::Tagged(value)
    }
}

impl From<Ref> for Raw {
    fn from(value: Ref) -> Self {
        Raw::Ref(value)
    }
}

impl From<RawMap> for Raw {
    fn from(value: RawMap) -> Self {
        Raw::Map(value)
    }
}

impl From<Config> for Raw {
    fn from(value: Config) -> Self {
        Raw::Node(value)
    }
}

impl From<&Config> for Raw {
    fn from(value: &Config) -> Self {
        Raw::Node(value.clone())
    }
}

macro_rules! impl_raw_from_value {
    ($($type:ty),* $(,)?) => {
        $(
            impl From<$type> for Raw {
                fn from(value: $type) -> Self {
                    Raw::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_raw_from_value!(bool, i64, i32, u32, f64, String, &str, Vec<Value>, ());

/// Builds a [`RawMap`] from `key => value` pairs.
///
/// Values go through `Into<Raw>`, so scalars, nested `raw_map!` invocations,
/// [`Ref`](crate::config::Ref)s, [`tag`]ged values and existing
/// [`Config`](crate::config::Config) nodes can all be mixed.
///
/// ```
/// # use cfgtree::{raw_map, config::Config};
/// let config = Config::new(raw_map! {
///     "a" => raw_map! { "b" => 2 },
///     "c" => "text",
/// });
/// assert_eq!(config.get_path("a.b").unwrap().into_value().unwrap(), 2);
/// ```
#[macro_export]
macro_rules! raw_map {
    () => {
        $crate::config::RawMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::config::RawMap::new();
        $(
            map.insert(($key).to_string(), $crate::config::Raw::from($value));
        )+
        map
    }};
}

/// Builds a [`Metadata`] mapping from `key => value` pairs.
#[macro_export]
macro_rules! metadata {
    () => {
        $crate::config::Metadata::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::config::Metadata::new();
        $(
            map.insert(($key).to_string(), $crate::config::Value::from($value));
        )+
        map
    }};
}

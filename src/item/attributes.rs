use crate::error::{QueryError, Result};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The attribute bag of an item. Keys are kept sorted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ItemAttributes(Map<String, Value>);

impl ItemAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Follows a dotted path through nested objects, e.g. `sseDescription.status`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut keys = path.split('.');
        let first = self.0.get(keys.next()?)?;
        keys.try_fold(first, |value, key| value.as_object()?.get(key))
    }

    pub fn set<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for ItemAttributes {
    fn from(map: Map<String, Value>) -> ItemAttributes {
        ItemAttributes(map)
    }
}

impl<K, V> FromIterator<(K, V)> for ItemAttributes
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> ItemAttributes {
        ItemAttributes(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Converts a value into attributes with camelCase keys, dropping null
/// fields and the excluded top-level keys.
pub fn to_attributes_case<T>(value: &T, exclusions: &[&str]) -> Result<ItemAttributes>
where
    T: Serialize + ?Sized,
{
    convert(value, exclusions, true)
}

/// Same as [`to_attributes_case`] but keeps the keys as they are.
pub fn to_attributes<T>(value: &T, exclusions: &[&str]) -> Result<ItemAttributes>
where
    T: Serialize + ?Sized,
{
    convert(value, exclusions, false)
}

fn convert<T>(value: &T, exclusions: &[&str], case: bool) -> Result<ItemAttributes>
where
    T: Serialize + ?Sized,
{
    let mut value = drop_nulls(serde_json::to_value(value)?);
    if case {
        value = camel_case(value);
    }

    match value {
        Value::Object(mut map) => {
            for exclusion in exclusions {
                map.remove(*exclusion);
            }
            Ok(ItemAttributes(map))
        }
        other => Err(QueryError::other(format!(
            "conversion error: expected an object, got `{other}`"
        ))),
    }
}

/// Lower-cases the first character of every object key, recursively.
pub fn camel_case(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (lower_first(&key), camel_case(val)))
                .collect(),
        ),
        Value::Array(values) => Value::Array(values.into_iter().map(camel_case).collect()),
        other => other,
    }
}

fn drop_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, val)| !val.is_null())
                .map(|(key, val)| (key, drop_nulls(val)))
                .collect(),
        ),
        Value::Array(values) => Value::Array(values.into_iter().map(drop_nulls).collect()),
        other => other,
    }
}

fn lower_first(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

mod attributes;
mod health;
mod query;

pub use attributes::{camel_case, to_attributes, to_attributes_case, ItemAttributes};
pub use health::Health;
pub use query::{BlastPropagation, LinkedItemQuery, Query, QueryMethod};

use crate::error::{QueryError, Result};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The generic representation of a resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "type")]
    item_type: String,
    unique_attribute: String,
    attributes: ItemAttributes,
    scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    health: Option<Health>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    linked_item_queries: Vec<LinkedItemQuery>,
}

impl Item {
    pub fn new<T, U, S>(
        item_type: T,
        unique_attribute: U,
        attributes: ItemAttributes,
        scope: S,
    ) -> Self
    where
        T: Into<String>,
        U: Into<String>,
        S: Into<String>,
    {
        Self {
            item_type: item_type.into(),
            unique_attribute: unique_attribute.into(),
            attributes,
            scope: scope.into(),
            health: None,
            tags: BTreeMap::new(),
            linked_item_queries: vec![],
        }
    }

    pub fn set_health(self, health: Health) -> Self {
        Self {
            health: Some(health),
            ..self
        }
    }

    pub fn set_tags(self, tags: BTreeMap<String, String>) -> Self {
        Self { tags, ..self }
    }

    pub fn add_linked_item_query(&mut self, link: LinkedItemQuery) {
        self.linked_item_queries.push(link);
    }

    pub fn item_type(&self) -> &str {
        self.item_type.as_str()
    }

    pub fn unique_attribute(&self) -> &str {
        self.unique_attribute.as_str()
    }

    pub fn attributes(&self) -> &ItemAttributes {
        &self.attributes
    }

    pub fn scope(&self) -> &str {
        self.scope.as_str()
    }

    pub fn health(&self) -> Option<Health> {
        self.health
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn linked_item_queries(&self) -> &[LinkedItemQuery] {
        self.linked_item_queries.as_slice()
    }

    /// The value of the unique attribute, stringified if it is a number or a
    /// boolean.
    pub fn unique_attribute_value(&self) -> Option<String> {
        match self.attributes.get(&self.unique_attribute)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            Value::Bool(value) => Some(value.to_string()),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.item_type.is_empty() {
            return Err(QueryError::other("item has an empty type"));
        }
        if self.unique_attribute.is_empty() {
            return Err(QueryError::other(format!(
                "item of type {} has an empty unique attribute",
                self.item_type
            )));
        }
        if self.scope.is_empty() {
            return Err(QueryError::other(format!(
                "item of type {} has an empty scope",
                self.item_type
            )));
        }
        match self.unique_attribute_value() {
            Some(value) if !value.is_empty() => Ok(()),
            _ => Err(QueryError::other(format!(
                "item of type {} has no value for its unique attribute `{}`",
                self.item_type, self.unique_attribute
            ))),
        }
    }

    /// `{scope}.{type}.{uniqueAttributeValue}`
    pub fn globally_unique_name(&self) -> String {
        format!(
            "{}.{}.{}",
            self.scope,
            self.item_type,
            self.unique_attribute_value().unwrap_or_default()
        )
    }
}

use crate::arn::Arn;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryMethod {
    Get,
    List,
    Search,
}

impl fmt::Display for QueryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMethod::Get => write!(f, "GET"),
            QueryMethod::List => write!(f, "LIST"),
            QueryMethod::Search => write!(f, "SEARCH"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(rename = "type")]
    pub item_type: String,
    pub method: QueryMethod,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub query: String,
    pub scope: String,
}

impl Query {
    pub fn new<T, Q, S>(item_type: T, method: QueryMethod, query: Q, scope: S) -> Self
    where
        T: Into<String>,
        Q: Into<String>,
        S: Into<String>,
    {
        Self {
            item_type: item_type.into(),
            method,
            query: query.into(),
            scope: scope.into(),
        }
    }
}

/// Whether a change can travel along a link. `in` means a change to the
/// linked item can affect this one, `out` means a change to this item can
/// affect the linked one.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlastPropagation {
    #[serde(rename = "in")]
    pub into: bool,
    pub out: bool,
}

impl BlastPropagation {
    pub fn new(into: bool, out: bool) -> Self {
        Self { into, out }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkedItemQuery {
    pub query: Query,
    pub blast_propagation: BlastPropagation,
}

impl LinkedItemQuery {
    pub fn new(query: Query, blast_propagation: BlastPropagation) -> Self {
        Self {
            query,
            blast_propagation,
        }
    }

    /// A SEARCH for the full ARN, scoped to wherever the ARN says the
    /// resource lives. Falls back to `fallback_scope` if the ARN can't be
    /// parsed.
    pub fn search_arn<T>(
        item_type: T,
        arn: &str,
        fallback_scope: &str,
        blast_propagation: BlastPropagation,
    ) -> Self
    where
        T: Into<String>,
    {
        let scope = Arn::parse(arn)
            .map(|arn| arn.scope())
            .unwrap_or_else(|_| fallback_scope.to_string());

        Self::new(
            Query::new(item_type, QueryMethod::Search, arn, scope),
            blast_propagation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_serializes_linked_item_queries() {
        let link = LinkedItemQuery::new(
            Query::new(
                "dynamodb-table",
                QueryMethod::Get,
                "people",
                "123456789012.eu-west-2",
            ),
            BlastPropagation::new(true, false),
        );

        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            json!({
                "query": {
                    "type": "dynamodb-table",
                    "method": "GET",
                    "query": "people",
                    "scope": "123456789012.eu-west-2",
                },
                "blastPropagation": { "in": true, "out": false },
            })
        );
    }

    #[test]
    fn it_scopes_arn_searches_by_the_arn() {
        let link = LinkedItemQuery::search_arn(
            "kms-key",
            "arn:aws:kms:us-east-1:210987654321:key/abc",
            "123456789012.eu-west-2",
            BlastPropagation::new(true, false),
        );
        assert_eq!(link.query.scope, "210987654321.us-east-1");
        assert_eq!(link.query.method, QueryMethod::Search);

        let link = LinkedItemQuery::search_arn(
            "kms-key",
            "alias/not-an-arn",
            "123456789012.eu-west-2",
            BlastPropagation::default(),
        );
        assert_eq!(link.query.scope, "123456789012.eu-west-2");
    }

    #[test]
    fn it_deserializes_queries_without_a_query_string() {
        let query: Query = serde_json::from_value(json!({
            "type": "dynamodb-table",
            "method": "LIST",
            "scope": "123456789012.eu-west-2",
        }))
        .unwrap();

        assert_eq!(query.method, QueryMethod::List);
        assert_eq!(query.query, "");
    }
}

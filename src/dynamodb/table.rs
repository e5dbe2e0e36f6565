use super::{types::Table, BACKUP, KINESIS_STREAM, KMS_KEY, STREAM, TABLE};
use crate::{
    adapter::{
        handle_tags_error, AdapterMetadata, AdapterOptions, AlwaysGetAdapter, SupportedQuery,
        TokenPaginator,
    },
    error::{QueryError, Result},
    item::{
        to_attributes_case, BlastPropagation, Health, Item, LinkedItemQuery, Query, QueryMethod,
    },
};

use aws_sdk_dynamodb::{operation::list_tables::ListTablesOutput, Client};
use std::collections::BTreeMap;
use tracing::debug;

pub type TableAdapter = AlwaysGetAdapter<Client, (), ListTablesOutput, String>;

pub fn table_adapter(client: Client, options: &AdapterOptions) -> TableAdapter {
    AlwaysGetAdapter::builder(options.settings(TABLE).set_metadata(metadata()), client)
        .set_list_input(())
        .set_list_paginator_builder(list_tables)
        .set_list_output_mapper(|output: &ListTablesOutput, _input: &()| {
            Ok(output.table_names.clone().unwrap_or_default())
        })
        .set_get_input_mapper(|_scope, query| query.to_string())
        .set_get_func(get_table)
        .set_max_parallel(options.max_parallel)
        .build()
}

fn metadata() -> AdapterMetadata {
    AdapterMetadata {
        descriptive_name: "DynamoDB Table".into(),
        category: Some("DATABASE".into()),
        supported_queries: vec![
            SupportedQuery::new(QueryMethod::Get, "Get a DynamoDB table by name"),
            SupportedQuery::new(QueryMethod::List, "List all DynamoDB tables"),
            SupportedQuery::new(QueryMethod::Search, "Search for DynamoDB tables by ARN"),
        ],
        potential_links: vec![
            KINESIS_STREAM.into(),
            BACKUP.into(),
            TABLE.into(),
            KMS_KEY.into(),
            STREAM.into(),
        ],
    }
}

fn list_tables(client: Client, _input: ()) -> TokenPaginator<ListTablesOutput> {
    TokenPaginator::new(
        move |token: Option<String>| {
            let client = client.clone();
            async move {
                client
                    .list_tables()
                    .set_exclusive_start_table_name(token)
                    .send()
                    .await
                    .map_err(QueryError::from)
            }
        },
        |output: &ListTablesOutput| output.last_evaluated_table_name.clone(),
    )
}

async fn get_table(client: Client, scope: String, name: String) -> Result<Item> {
    let table = client
        .describe_table()
        .table_name(&name)
        .send()
        .await?
        .table
        .map(Table::from)
        .ok_or_else(|| QueryError::other(format!("`table` is None in DescribeTable for {name}")))?;

    let tags = match table.table_arn.as_deref() {
        Some(arn) => table_tags(&client, arn)
            .await
            .unwrap_or_else(handle_tags_error),
        None => BTreeMap::new(),
    };
    let destinations = kinesis_destinations(&client, &name).await;

    Ok(table_item(&scope, &table, &destinations)?.set_tags(tags))
}

async fn table_tags(client: &Client, arn: &str) -> Result<BTreeMap<String, String>> {
    let mut tags = BTreeMap::new();
    let mut token: Option<String> = None;

    loop {
        let output = client
            .list_tags_of_resource()
            .resource_arn(arn)
            .set_next_token(token.clone())
            .send()
            .await?;

        for tag in output.tags.unwrap_or_default() {
            tags.insert(tag.key, tag.value);
        }

        match output.next_token {
            Some(next) if !next.is_empty() && token.as_deref() != Some(next.as_str()) => {
                token = Some(next);
            }
            _ => break,
        }
    }

    Ok(tags)
}

/// The ARNs of the Kinesis streams the table replicates to. Failures only
/// cost the links, so they are logged and ignored.
async fn kinesis_destinations(client: &Client, name: &str) -> Vec<String> {
    match client
        .describe_kinesis_streaming_destination()
        .table_name(name)
        .send()
        .await
    {
        Ok(output) => output
            .kinesis_data_stream_destinations
            .unwrap_or_default()
            .into_iter()
            .filter_map(|destination| destination.stream_arn)
            .collect(),
        Err(err) => {
            debug!("{}", QueryError::from(err));
            vec![]
        }
    }
}

fn table_item(scope: &str, table: &Table, kinesis_streams: &[String]) -> Result<Item> {
    let attributes = to_attributes_case(table, &[])?;
    let mut item = Item::new(TABLE, "tableName", attributes, scope);

    if let Some(status) = table.table_status {
        item = item.set_health(Health::from(status));
    }

    for arn in kinesis_streams {
        item.add_linked_item_query(LinkedItemQuery::search_arn(
            KINESIS_STREAM,
            arn,
            scope,
            BlastPropagation::new(true, true),
        ));
    }

    if let Some(summary) = table.restore_summary.as_ref() {
        if let Some(arn) = summary.source_backup_arn.as_deref() {
            item.add_linked_item_query(LinkedItemQuery::search_arn(
                BACKUP,
                arn,
                scope,
                BlastPropagation::new(true, false),
            ));
        }
        if let Some(arn) = summary.source_table_arn.as_deref() {
            item.add_linked_item_query(LinkedItemQuery::search_arn(
                TABLE,
                arn,
                scope,
                BlastPropagation::new(true, false),
            ));
        }
    }

    if let Some(arn) = table
        .sse_description
        .as_ref()
        .and_then(|sse| sse.kms_master_key_arn.as_deref())
    {
        item.add_linked_item_query(LinkedItemQuery::search_arn(
            KMS_KEY,
            arn,
            scope,
            BlastPropagation::new(true, false),
        ));
    }

    if let Some(arn) = table.latest_stream_arn.as_deref() {
        item.add_linked_item_query(LinkedItemQuery::new(
            Query::new(STREAM, QueryMethod::Get, arn, scope),
            BlastPropagation::new(false, true),
        ));
    }

    item.validate()?;
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamodb::types::{RestoreSummary, SseDescription, TableStatus};
    use serde_json::json;

    const SCOPE: &str = "123456789012.eu-west-2";

    fn table() -> Table {
        Table {
            table_name: Some("people".into()),
            table_arn: Some("arn:aws:dynamodb:eu-west-2:123456789012:table/people".into()),
            table_id: Some("12345678-1234-1234-1234-123456789012".into()),
            table_status: Some(TableStatus::Active),
            creation_date_time: None,
            item_count: Some(3),
            table_size_bytes: Some(512),
            billing_mode: Some("PAY_PER_REQUEST".into()),
            latest_stream_arn: Some(
                "arn:aws:dynamodb:eu-west-2:123456789012:table/people/stream/2023-11-01T00:00:00.000"
                    .into(),
            ),
            latest_stream_label: Some("2023-11-01T00:00:00.000".into()),
            global_table_version: None,
            deletion_protection_enabled: Some(false),
            restore_summary: Some(RestoreSummary {
                source_backup_arn: Some(
                    "arn:aws:dynamodb:eu-west-2:123456789012:table/old-people/backup/01489173575360-b308cd7d"
                        .into(),
                ),
                source_table_arn: Some(
                    "arn:aws:dynamodb:eu-west-2:123456789012:table/old-people".into(),
                ),
            }),
            sse_description: Some(SseDescription {
                status: Some("ENABLED".into()),
                sse_type: Some("KMS".into()),
                kms_master_key_arn: Some(
                    "arn:aws:kms:eu-west-2:210987654321:key/3c3ef12a-f3b0-4a3f-a2a1-6c1c2b1e1f3c"
                        .into(),
                ),
            }),
        }
    }

    #[test]
    fn it_maps_a_table_to_an_item() {
        let kinesis = vec!["arn:aws:kinesis:eu-west-2:123456789012:stream/people-changes".to_string()];
        let item = table_item(SCOPE, &table(), &kinesis).unwrap();

        assert_eq!(item.item_type(), "dynamodb-table");
        assert_eq!(item.unique_attribute_value(), Some("people".to_string()));
        assert_eq!(item.health(), Some(Health::Ok));
        assert_eq!(item.attributes().get("itemCount"), Some(&json!(3)));
        assert_eq!(item.attributes().get("tableStatus"), Some(&json!("ACTIVE")));
        assert_eq!(
            item.attributes().get_path("sSEDescription.kMSMasterKeyArn"),
            Some(&json!(
                "arn:aws:kms:eu-west-2:210987654321:key/3c3ef12a-f3b0-4a3f-a2a1-6c1c2b1e1f3c"
            ))
        );
        assert!(item.attributes().get("globalTableVersion").is_none());
    }

    #[test]
    fn it_links_related_resources() {
        let kinesis = vec!["arn:aws:kinesis:eu-west-2:123456789012:stream/people-changes".to_string()];
        let item = table_item(SCOPE, &table(), &kinesis).unwrap();

        let links: Vec<(&str, QueryMethod, &str, bool, bool)> = item
            .linked_item_queries()
            .iter()
            .map(|link| {
                (
                    link.query.item_type.as_str(),
                    link.query.method,
                    link.query.scope.as_str(),
                    link.blast_propagation.into,
                    link.blast_propagation.out,
                )
            })
            .collect();

        assert_eq!(
            links,
            vec![
                ("kinesis-stream", QueryMethod::Search, SCOPE, true, true),
                ("dynamodb-backup", QueryMethod::Search, SCOPE, true, false),
                ("dynamodb-table", QueryMethod::Search, SCOPE, true, false),
                (
                    "kms-key",
                    QueryMethod::Search,
                    "210987654321.eu-west-2",
                    true,
                    false
                ),
                ("dynamodb-stream", QueryMethod::Get, SCOPE, false, true),
            ]
        );
    }

    #[test]
    fn it_maps_a_bare_table() {
        let table = Table {
            table_name: Some("bare".into()),
            table_arn: None,
            table_id: None,
            table_status: None,
            creation_date_time: None,
            item_count: None,
            table_size_bytes: None,
            billing_mode: None,
            latest_stream_arn: None,
            latest_stream_label: None,
            global_table_version: None,
            deletion_protection_enabled: None,
            restore_summary: None,
            sse_description: None,
        };

        let item = table_item(SCOPE, &table, &[]).unwrap();
        assert_eq!(item.health(), None);
        assert!(item.linked_item_queries().is_empty());
        assert_eq!(item.attributes().len(), 1);
    }

    #[test]
    fn it_returns_err_for_a_table_without_a_name() {
        let mut table = table();
        table.table_name = None;
        assert!(table_item(SCOPE, &table, &[]).is_err());
    }
}

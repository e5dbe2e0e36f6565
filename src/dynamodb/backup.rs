use super::{types::Backup, BACKUP, TABLE};
use crate::{
    adapter::{AdapterMetadata, AdapterOptions, DescribeOnlyAdapter, SupportedQuery, TokenPaginator},
    arn::Arn,
    error::{QueryError, Result},
    item::{to_attributes_case, BlastPropagation, Health, Item, LinkedItemQuery, Query, QueryMethod},
};

use aws_sdk_dynamodb::{operation::list_backups::ListBackupsOutput, Client};

/// What a ListBackups call is narrowed to. `backup_arn` is applied to the
/// output since the API can only filter by table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBackups {
    pub table_name: Option<String>,
    pub backup_arn: Option<String>,
}

pub type BackupAdapter = DescribeOnlyAdapter<Client, ListBackups, ListBackupsOutput>;

pub fn backup_adapter(client: Client, options: &AdapterOptions) -> BackupAdapter {
    DescribeOnlyAdapter::builder(options.settings(BACKUP).set_metadata(metadata()), client)
        .set_input_mapper_get(|_scope, _query| Ok(ListBackups::default()))
        .set_input_mapper_list(|_scope| Ok(ListBackups::default()))
        .set_input_mapper_search(|_client, _scope, query: String| async move {
            search_input(&query)
        })
        .set_paginator_builder(list_backups)
        .set_output_mapper(
            |_client, scope: String, input: ListBackups, output: ListBackupsOutput| async move {
                backup_items(&scope, &input, output)
            },
        )
        .set_use_list_for_get(true)
        .build()
}

fn metadata() -> AdapterMetadata {
    AdapterMetadata {
        descriptive_name: "DynamoDB Backup".into(),
        category: Some("STORAGE".into()),
        supported_queries: vec![
            SupportedQuery::new(QueryMethod::Get, "Get a DynamoDB backup by name"),
            SupportedQuery::new(QueryMethod::List, "List all DynamoDB backups"),
            SupportedQuery::new(
                QueryMethod::Search,
                "Search for DynamoDB backups by table name or backup ARN",
            ),
        ],
        potential_links: vec![TABLE.into()],
    }
}

/// A search is either a table name or the ARN of one backup, which has the
/// form `arn:aws:dynamodb:<region>:<account>:table/<table>/backup/<id>`.
fn search_input(query: &str) -> Result<ListBackups> {
    if !query.starts_with("arn:") {
        return Ok(ListBackups {
            table_name: Some(query.to_string()),
            backup_arn: None,
        });
    }

    let arn = Arn::parse(query).map_err(QueryError::from)?;
    let mut sections = arn.resource().split('/');

    match (sections.next(), sections.next(), sections.next()) {
        (Some("table"), Some(table_name), Some("backup")) if !table_name.is_empty() => {
            Ok(ListBackups {
                table_name: Some(table_name.to_string()),
                backup_arn: Some(query.to_string()),
            })
        }
        _ => Err(QueryError::other(format!("{query} is not a DynamoDB backup ARN"))),
    }
}

fn list_backups(client: Client, input: ListBackups) -> TokenPaginator<ListBackupsOutput> {
    TokenPaginator::new(
        move |token: Option<String>| {
            let client = client.clone();
            let table_name = input.table_name.clone();
            async move {
                client
                    .list_backups()
                    .set_table_name(table_name)
                    .set_exclusive_start_backup_arn(token)
                    .send()
                    .await
                    .map_err(QueryError::from)
            }
        },
        |output: &ListBackupsOutput| output.last_evaluated_backup_arn.clone(),
    )
}

fn backup_items(scope: &str, input: &ListBackups, output: ListBackupsOutput) -> Result<Vec<Item>> {
    output
        .backup_summaries
        .unwrap_or_default()
        .into_iter()
        .map(Backup::from)
        .filter(|backup| match input.backup_arn.as_deref() {
            Some(arn) => backup.backup_arn.as_deref() == Some(arn),
            None => true,
        })
        .map(|backup| backup_item(scope, &backup))
        .collect()
}

fn backup_item(scope: &str, backup: &Backup) -> Result<Item> {
    let attributes = to_attributes_case(backup, &[])?;
    let mut item = Item::new(BACKUP, "backupName", attributes, scope);

    if let Some(status) = backup.backup_status {
        item = item.set_health(Health::from(status));
    }

    if let Some(table_name) = backup.table_name.as_deref() {
        item.add_linked_item_query(LinkedItemQuery::new(
            Query::new(TABLE, QueryMethod::Get, table_name, scope),
            BlastPropagation::new(false, false),
        ));
    }

    item.validate()?;
    Ok(item)
}

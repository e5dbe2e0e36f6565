use super::{types::Stream, STREAM, TABLE};
use crate::{
    adapter::{AdapterMetadata, AdapterOptions, GetListAdapter, SupportedQuery},
    error::{QueryError, Result},
    item::{to_attributes_case, BlastPropagation, Health, Item, LinkedItemQuery, Query, QueryMethod},
};

use aws_sdk_dynamodbstreams::Client;

pub type StreamAdapter = GetListAdapter<Client, Stream>;

pub fn stream_adapter(client: Client, options: &AdapterOptions) -> StreamAdapter {
    GetListAdapter::builder(options.settings(STREAM).set_metadata(metadata()), client)
        .set_get_func(|client, _scope, arn| async move { describe_stream(&client, &arn).await })
        .set_list_func(|client, _scope| async move { list_streams(&client, None).await })
        .set_search_func(|client, _scope, table_name: String| async move {
            list_streams(&client, Some(table_name)).await
        })
        .set_item_mapper(stream_item)
        .build()
}

fn metadata() -> AdapterMetadata {
    AdapterMetadata {
        descriptive_name: "DynamoDB Stream".into(),
        category: Some("DATABASE".into()),
        supported_queries: vec![
            SupportedQuery::new(QueryMethod::Get, "Get a DynamoDB stream by ARN"),
            SupportedQuery::new(QueryMethod::List, "List all DynamoDB streams"),
            SupportedQuery::new(QueryMethod::Search, "Search for DynamoDB streams by table name"),
        ],
        potential_links: vec![TABLE.into()],
    }
}

/// Describes a stream, following the shard pages until the last one.
async fn describe_stream(client: &Client, arn: &str) -> Result<Stream> {
    let mut stream: Option<Stream> = None;
    let mut start_shard: Option<String> = None;

    loop {
        let description = client
            .describe_stream()
            .stream_arn(arn)
            .set_exclusive_start_shard_id(start_shard.clone())
            .send()
            .await?
            .stream_description
            .ok_or_else(|| {
                QueryError::other(format!("`stream_description` is None in DescribeStream for {arn}"))
            })?;

        let last_shard = description.last_evaluated_shard_id.clone();
        match stream.as_mut() {
            Some(stream) => stream.extend_shards(description),
            None => stream = Some(Stream::from(description)),
        }

        match last_shard {
            Some(shard) if !shard.is_empty() && start_shard.as_deref() != Some(shard.as_str()) => {
                start_shard = Some(shard);
            }
            _ => break,
        }
    }

    stream.ok_or_else(|| QueryError::not_found(format!("stream {arn} not found")))
}

/// Lists stream summaries, optionally only those of one table.
async fn list_streams(client: &Client, table_name: Option<String>) -> Result<Vec<Stream>> {
    let mut streams = vec![];
    let mut start_arn: Option<String> = None;

    loop {
        let output = client
            .list_streams()
            .set_table_name(table_name.clone())
            .set_exclusive_start_stream_arn(start_arn.clone())
            .send()
            .await?;

        streams.extend(output.streams.unwrap_or_default().into_iter().map(Stream::from));

        match output.last_evaluated_stream_arn {
            Some(arn) if !arn.is_empty() && start_arn.as_deref() != Some(arn.as_str()) => {
                start_arn = Some(arn);
            }
            _ => break,
        }
    }

    Ok(streams)
}

fn stream_item(scope: &str, stream: &Stream) -> Result<Item> {
    let attributes = to_attributes_case(stream, &[])?;
    let mut item = Item::new(STREAM, "streamArn", attributes, scope);

    if let Some(status) = stream.stream_status {
        item = item.set_health(Health::from(status));
    }

    if let Some(table_name) = stream.table_name.as_deref() {
        item.add_linked_item_query(LinkedItemQuery::new(
            Query::new(TABLE, QueryMethod::Get, table_name, scope),
            BlastPropagation::new(true, false),
        ));
    }

    item.validate()?;
    Ok(item)
}

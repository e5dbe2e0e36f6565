use aws_source::{
    dynamodb::{backup_adapter, stream_adapter, table_adapter},
    item::Health,
    Adapter, AdapterOptions, ErrorKind, QueryMethod,
};
use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method},
    Mock, MockServer, ResponseTemplate,
};

const ACCOUNT_ID: &str = "123456789012";
const REGION: &str = "eu-west-2";
const SCOPE: &str = "123456789012.eu-west-2";
const TABLE_ARN: &str = "arn:aws:dynamodb:eu-west-2:123456789012:table/people";
const STREAM_ARN: &str =
    "arn:aws:dynamodb:eu-west-2:123456789012:table/people/stream/2023-11-01T00:00:00.000";

fn db_client(server: &MockServer) -> aws_sdk_dynamodb::Client {
    use aws_sdk_dynamodb::config::{Credentials, Region};

    let config = aws_sdk_dynamodb::Config::builder()
        .credentials_provider(Credentials::new("AKID", "SECRET", None, None, "test"))
        .region(Region::new(REGION))
        .endpoint_url(server.uri())
        .build();
    aws_sdk_dynamodb::Client::from_conf(config)
}

fn streams_client(server: &MockServer) -> aws_sdk_dynamodbstreams::Client {
    use aws_sdk_dynamodbstreams::config::{Credentials, Region};

    let config = aws_sdk_dynamodbstreams::Config::builder()
        .credentials_provider(Credentials::new("AKID", "SECRET", None, None, "test"))
        .region(Region::new(REGION))
        .endpoint_url(server.uri())
        .build();
    aws_sdk_dynamodbstreams::Client::from_conf(config)
}

fn options() -> AdapterOptions {
    AdapterOptions::new(ACCOUNT_ID, REGION)
}

async fn mock_target(server: &MockServer, target: &str, status: u16, body: Value, times: u64) {
    Mock::given(method("POST"))
        .and(header("x-amz-target", target))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_raw(body.to_string(), "application/x-amz-json-1.0"),
        )
        .expect(times)
        .mount(server)
        .await;
}

fn people_table() -> Value {
    json!({
        "Table": {
            "TableName": "people",
            "TableArn": TABLE_ARN,
            "TableStatus": "ACTIVE",
            "ItemCount": 3,
            "TableSizeBytes": 512,
            "LatestStreamArn": STREAM_ARN,
        }
    })
}

async fn mock_table_extras(server: &MockServer) {
    mock_target(
        server,
        "DynamoDB_20120810.ListTagsOfResource",
        200,
        json!({ "Tags": [{ "Key": "env", "Value": "prod" }] }),
        1,
    )
    .await;
    mock_target(
        server,
        "DynamoDB_20120810.DescribeKinesisStreamingDestination",
        200,
        json!({
            "TableName": "people",
            "KinesisDataStreamDestinations": [{
                "StreamArn": "arn:aws:kinesis:eu-west-2:123456789012:stream/people-changes",
                "DestinationStatus": "ACTIVE",
            }],
        }),
        1,
    )
    .await;
}

#[tokio::test]
async fn it_gets_a_table() {
    let server = MockServer::start().await;
    mock_target(&server, "DynamoDB_20120810.DescribeTable", 200, people_table(), 1).await;
    mock_table_extras(&server).await;

    let adapter = table_adapter(db_client(&server), &options());
    let item = adapter.get(SCOPE, "people", false).await.unwrap();

    assert_eq!(item.item_type(), "dynamodb-table");
    assert_eq!(item.unique_attribute_value(), Some("people".to_string()));
    assert_eq!(item.health(), Some(Health::Ok));
    assert_eq!(item.tags().get("env"), Some(&"prod".to_string()));
    assert_eq!(item.attributes().get("tableArn"), Some(&json!(TABLE_ARN)));

    let links: Vec<(&str, QueryMethod)> = item
        .linked_item_queries()
        .iter()
        .map(|link| (link.query.item_type.as_str(), link.query.method))
        .collect();
    assert_eq!(
        links,
        vec![
            ("kinesis-stream", QueryMethod::Search),
            ("dynamodb-stream", QueryMethod::Get),
        ]
    );

    // The second GET is answered by the cache.
    let cached = adapter.get(SCOPE, "people", false).await.unwrap();
    assert_eq!(cached, item);
}

#[tokio::test]
async fn it_caches_a_missing_table() {
    let server = MockServer::start().await;
    mock_target(
        &server,
        "DynamoDB_20120810.DescribeTable",
        400,
        json!({
            "__type": "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException",
            "message": "Requested resource not found: Table: ghosts not found",
        }),
        1,
    )
    .await;

    let adapter = table_adapter(db_client(&server), &options());

    for _ in 0..2 {
        let err = adapter.get(SCOPE, "ghosts", false).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.scope(), Some(SCOPE));
    }
}

#[tokio::test]
async fn it_does_not_call_aws_for_other_scopes() {
    let server = MockServer::start().await;
    mock_target(&server, "DynamoDB_20120810.DescribeTable", 200, people_table(), 0).await;

    let adapter = table_adapter(db_client(&server), &options());
    let err = adapter
        .get("210987654321.eu-west-2", "people", false)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoScope);
}

#[tokio::test]
async fn it_lists_tables() {
    let server = MockServer::start().await;
    mock_target(
        &server,
        "DynamoDB_20120810.ListTables",
        200,
        json!({ "TableNames": ["people"] }),
        1,
    )
    .await;
    mock_target(&server, "DynamoDB_20120810.DescribeTable", 200, people_table(), 1).await;
    mock_table_extras(&server).await;

    let adapter = table_adapter(db_client(&server), &options());
    let items = adapter.list(SCOPE, false).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].unique_attribute_value(), Some("people".to_string()));
}

#[tokio::test]
async fn it_searches_tables_by_arn() {
    let server = MockServer::start().await;
    mock_target(&server, "DynamoDB_20120810.DescribeTable", 200, people_table(), 1).await;
    mock_table_extras(&server).await;

    let adapter = table_adapter(db_client(&server), &options());
    let items = adapter.search(SCOPE, TABLE_ARN, false).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].unique_attribute_value(), Some("people".to_string()));
}

#[tokio::test]
async fn it_gets_a_backup_from_the_list() {
    let server = MockServer::start().await;
    mock_target(
        &server,
        "DynamoDB_20120810.ListBackups",
        200,
        json!({
            "BackupSummaries": [
                {
                    "BackupName": "nightly",
                    "BackupArn": "arn:aws:dynamodb:eu-west-2:123456789012:table/people/backup/01",
                    "BackupStatus": "AVAILABLE",
                    "TableName": "people",
                },
                {
                    "BackupName": "weekly",
                    "BackupArn": "arn:aws:dynamodb:eu-west-2:123456789012:table/people/backup/02",
                    "BackupStatus": "CREATING",
                    "TableName": "people",
                },
            ],
        }),
        1,
    )
    .await;

    let adapter = backup_adapter(db_client(&server), &options());
    let item = adapter.get(SCOPE, "weekly", false).await.unwrap();

    assert_eq!(item.item_type(), "dynamodb-backup");
    assert_eq!(item.unique_attribute_value(), Some("weekly".to_string()));
    assert_eq!(item.health(), Some(Health::Pending));
}

#[tokio::test]
async fn it_gets_a_stream_with_all_its_shards() {
    let server = MockServer::start().await;
    mock_target(
        &server,
        "DynamoDBStreams_20120810.DescribeStream",
        200,
        json!({
            "StreamDescription": {
                "StreamArn": STREAM_ARN,
                "StreamStatus": "ENABLED",
                "StreamViewType": "NEW_IMAGE",
                "TableName": "people",
                "Shards": [{ "ShardId": "shardId-00000001" }],
            }
        }),
        1,
    )
    .await;

    let adapter = stream_adapter(streams_client(&server), &options());
    let item = adapter.get(SCOPE, STREAM_ARN, false).await.unwrap();

    assert_eq!(item.item_type(), "dynamodb-stream");
    assert_eq!(item.unique_attribute_value(), Some(STREAM_ARN.to_string()));
    assert_eq!(item.health(), Some(Health::Ok));
    assert_eq!(
        item.attributes().get("shards"),
        Some(&json!([{ "shardId": "shardId-00000001" }]))
    );
}

use super::{into_chrono, StreamStatus};

use aws_sdk_dynamodbstreams::types;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Stream {
    pub stream_arn: Option<String>,
    pub stream_label: Option<String>,
    pub stream_status: Option<StreamStatus>,
    pub stream_view_type: Option<String>,
    pub creation_request_date_time: Option<DateTime<Utc>>,
    pub table_name: Option<String>,
    pub shards: Vec<Shard>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Shard {
    pub shard_id: Option<String>,
    pub parent_shard_id: Option<String>,
}

impl Stream {
    /// Appends the shards of a later page of the same stream.
    pub fn extend_shards(&mut self, description: types::StreamDescription) {
        self.shards.extend(
            description
                .shards
                .unwrap_or_default()
                .into_iter()
                .map(Shard::from),
        );
    }
}

impl From<types::StreamDescription> for Stream {
    fn from(value: types::StreamDescription) -> Stream {
        Stream {
            stream_arn: value.stream_arn,
            stream_label: value.stream_label,
            stream_status: value.stream_status.map(StreamStatus::from),
            stream_view_type: value
                .stream_view_type
                .map(|view_type| view_type.as_str().to_string()),
            creation_request_date_time: value.creation_request_date_time.and_then(into_chrono),
            table_name: value.table_name,
            shards: value
                .shards
                .unwrap_or_default()
                .into_iter()
                .map(Shard::from)
                .collect(),
        }
    }
}

impl From<types::Stream> for Stream {
    fn from(value: types::Stream) -> Stream {
        Stream {
            stream_arn: value.stream_arn,
            stream_label: value.stream_label,
            stream_status: None,
            stream_view_type: None,
            creation_request_date_time: None,
            table_name: value.table_name,
            shards: vec![],
        }
    }
}

impl From<types::Shard> for Shard {
    fn from(value: types::Shard) -> Shard {
        Shard {
            shard_id: value.shard_id,
            parent_shard_id: value.parent_shard_id,
        }
    }
}

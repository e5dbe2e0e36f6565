use crate::item::Health;

use aws_sdk_dynamodbstreams::types;
use serde::Serialize;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum StreamStatus {
    Disabled,
    Disabling,
    Enabled,
    Enabling,
    Unknown,
}

impl From<types::StreamStatus> for StreamStatus {
    fn from(status: types::StreamStatus) -> StreamStatus {
        match status {
            types::StreamStatus::Disabled => StreamStatus::Disabled,
            types::StreamStatus::Disabling => StreamStatus::Disabling,
            types::StreamStatus::Enabled => StreamStatus::Enabled,
            types::StreamStatus::Enabling => StreamStatus::Enabling,
            _ => StreamStatus::Unknown,
        }
    }
}

impl From<StreamStatus> for Health {
    fn from(status: StreamStatus) -> Health {
        match status {
            StreamStatus::Enabled => Health::Ok,
            StreamStatus::Enabling => Health::Pending,
            StreamStatus::Disabling | StreamStatus::Disabled => Health::Warning,
            StreamStatus::Unknown => Health::Unknown,
        }
    }
}

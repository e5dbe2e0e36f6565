use super::{into_chrono, TableStatus};

use aws_sdk_dynamodb::types;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Table {
    pub table_name: Option<String>,
    pub table_arn: Option<String>,
    pub table_id: Option<String>,
    pub table_status: Option<TableStatus>,
    pub creation_date_time: Option<DateTime<Utc>>,
    pub item_count: Option<i64>,
    pub table_size_bytes: Option<i64>,
    pub billing_mode: Option<String>,
    pub latest_stream_arn: Option<String>,
    pub latest_stream_label: Option<String>,
    pub global_table_version: Option<String>,
    pub deletion_protection_enabled: Option<bool>,
    pub restore_summary: Option<RestoreSummary>,
    #[serde(rename = "SSEDescription")]
    pub sse_description: Option<SseDescription>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RestoreSummary {
    pub source_backup_arn: Option<String>,
    pub source_table_arn: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SseDescription {
    pub status: Option<String>,
    #[serde(rename = "SSEType")]
    pub sse_type: Option<String>,
    #[serde(rename = "KMSMasterKeyArn")]
    pub kms_master_key_arn: Option<String>,
}

impl From<types::TableDescription> for Table {
    fn from(value: types::TableDescription) -> Table {
        Table {
            table_name: value.table_name,
            table_arn: value.table_arn,
            table_id: value.table_id,
            table_status: value.table_status.map(TableStatus::from),
            creation_date_time: value.creation_date_time.and_then(into_chrono),
            item_count: value.item_count,
            table_size_bytes: value.table_size_bytes,
            billing_mode: value
                .billing_mode_summary
                .and_then(|summary| summary.billing_mode)
                .map(|mode| mode.as_str().to_string()),
            latest_stream_arn: value.latest_stream_arn,
            latest_stream_label: value.latest_stream_label,
            global_table_version: value.global_table_version,
            deletion_protection_enabled: value.deletion_protection_enabled,
            restore_summary: value.restore_summary.map(RestoreSummary::from),
            sse_description: value.sse_description.map(SseDescription::from),
        }
    }
}

impl From<types::RestoreSummary> for RestoreSummary {
    fn from(value: types::RestoreSummary) -> RestoreSummary {
        RestoreSummary {
            source_backup_arn: value.source_backup_arn,
            source_table_arn: value.source_table_arn,
        }
    }
}

impl From<types::SseDescription> for SseDescription {
    fn from(value: types::SseDescription) -> SseDescription {
        SseDescription {
            status: value.status.map(|status| status.as_str().to_string()),
            sse_type: value.sse_type.map(|sse_type| sse_type.as_str().to_string()),
            kms_master_key_arn: value.kms_master_key_arn,
        }
    }
}

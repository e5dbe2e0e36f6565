use super::{into_chrono, BackupStatus};

use aws_sdk_dynamodb::types;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Backup {
    pub backup_arn: Option<String>,
    pub backup_name: Option<String>,
    pub backup_status: Option<BackupStatus>,
    pub backup_type: Option<String>,
    pub backup_creation_date_time: Option<DateTime<Utc>>,
    pub backup_expiry_date_time: Option<DateTime<Utc>>,
    pub backup_size_bytes: Option<i64>,
    pub table_name: Option<String>,
    pub table_arn: Option<String>,
    pub table_id: Option<String>,
}

impl From<types::BackupSummary> for Backup {
    fn from(value: types::BackupSummary) -> Backup {
        Backup {
            backup_arn: value.backup_arn,
            backup_name: value.backup_name,
            backup_status: value.backup_status.map(BackupStatus::from),
            backup_type: value
                .backup_type
                .map(|backup_type| backup_type.as_str().to_string()),
            backup_creation_date_time: value.backup_creation_date_time.and_then(into_chrono),
            backup_expiry_date_time: value.backup_expiry_date_time.and_then(into_chrono),
            backup_size_bytes: value.backup_size_bytes,
            table_name: value.table_name,
            table_arn: value.table_arn,
            table_id: value.table_id,
        }
    }
}

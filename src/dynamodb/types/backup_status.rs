use crate::item::Health;

use aws_sdk_dynamodb::types;
use serde::Serialize;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum BackupStatus {
    Available,
    Creating,
    Deleted,
    Unknown,
}

impl From<types::BackupStatus> for BackupStatus {
    fn from(status: types::BackupStatus) -> BackupStatus {
        match status {
            types::BackupStatus::Available => BackupStatus::Available,
            types::BackupStatus::Creating => BackupStatus::Creating,
            types::BackupStatus::Deleted => BackupStatus::Deleted,
            _ => BackupStatus::Unknown,
        }
    }
}

impl From<BackupStatus> for Health {
    fn from(status: BackupStatus) -> Health {
        match status {
            BackupStatus::Available => Health::Ok,
            BackupStatus::Creating => Health::Pending,
            BackupStatus::Deleted => Health::Warning,
            BackupStatus::Unknown => Health::Unknown,
        }
    }
}

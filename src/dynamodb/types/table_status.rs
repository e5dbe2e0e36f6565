use crate::item::Health;

use aws_sdk_dynamodb::types;
use serde::Serialize;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Active,
    Archived,
    Archiving,
    Creating,
    Deleting,
    InaccessibleEncryptionCredentials,
    Updating,
    Unknown,
}

impl From<types::TableStatus> for TableStatus {
    fn from(status: types::TableStatus) -> TableStatus {
        match status {
            types::TableStatus::Active => TableStatus::Active,
            types::TableStatus::Archived => TableStatus::Archived,
            types::TableStatus::Archiving => TableStatus::Archiving,
            types::TableStatus::Creating => TableStatus::Creating,
            types::TableStatus::Deleting => TableStatus::Deleting,
            types::TableStatus::InaccessibleEncryptionCredentials => {
                TableStatus::InaccessibleEncryptionCredentials
            }
            types::TableStatus::Updating => TableStatus::Updating,
            _ => TableStatus::Unknown,
        }
    }
}

impl From<TableStatus> for Health {
    fn from(status: TableStatus) -> Health {
        match status {
            TableStatus::Active => Health::Ok,
            TableStatus::Creating | TableStatus::Updating => Health::Pending,
            TableStatus::Deleting | TableStatus::Archiving | TableStatus::Archived => {
                Health::Warning
            }
            TableStatus::InaccessibleEncryptionCredentials => Health::Error,
            TableStatus::Unknown => Health::Unknown,
        }
    }
}

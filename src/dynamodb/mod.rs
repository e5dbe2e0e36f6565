pub mod client;
pub mod types;

mod backup;
mod stream;
mod table;

pub use backup::{backup_adapter, BackupAdapter, ListBackups};
pub use client::{DynamodbClients, DynamodbClientsBuilder};
pub use stream::{stream_adapter, StreamAdapter};
pub use table::{table_adapter, TableAdapter};

use crate::adapter::{Adapter, AdapterOptions};
use std::sync::Arc;

pub const TABLE: &str = "dynamodb-table";
pub const BACKUP: &str = "dynamodb-backup";
pub const STREAM: &str = "dynamodb-stream";

// Types served by other sources that DynamoDB items link to.
pub const KINESIS_STREAM: &str = "kinesis-stream";
pub const KMS_KEY: &str = "kms-key";

/// Every DynamoDB adapter for the account and region in `options`.
pub fn adapters(clients: &DynamodbClients, options: &AdapterOptions) -> Vec<Arc<dyn Adapter>> {
    vec![
        Arc::new(table_adapter(clients.db(), options)),
        Arc::new(backup_adapter(clients.db(), options)),
        Arc::new(stream_adapter(clients.streams(), options)),
    ]
}

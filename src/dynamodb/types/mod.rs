mod backup;
mod backup_status;
mod stream;
mod stream_status;
mod table;
mod table_status;

pub use backup::Backup;
pub use backup_status::BackupStatus;
pub use stream::{Shard, Stream};
pub use stream_status::StreamStatus;
pub use table::{RestoreSummary, SseDescription, Table};
pub use table_status::TableStatus;

use aws_sdk_dynamodb::primitives;
use chrono::{DateTime, Utc};

fn into_chrono(datetime: primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(datetime.secs(), datetime.subsec_nanos())
}

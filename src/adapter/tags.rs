use std::{collections::BTreeMap, fmt::Display};
use tracing::warn;

/// Tags to attach to an item whose tags could not be fetched. A failure to
/// read tags never fails the item itself.
pub fn handle_tags_error<E: Display>(err: E) -> BTreeMap<String, String> {
    warn!("error getting tags: {err}");

    BTreeMap::from([
        ("errorGettingTags".to_string(), "true".to_string()),
        ("error".to_string(), err.to_string()),
    ])
}

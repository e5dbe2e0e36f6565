use crate::{error::QueryError, item::Item};

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub(super) enum CachedValue {
    Item(Item),
    Error(QueryError),
}

#[derive(Debug, Clone)]
pub(super) struct CacheEntry {
    value: CachedValue,
    // None when the TTL is too large to represent, the entry never expires
    expires_at: Option<Instant>,
}

impl CacheEntry {
    pub(super) fn new(value: CachedValue, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    pub(super) fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }

    pub(super) fn item(&self) -> Option<&Item> {
        match &self.value {
            CachedValue::Item(item) => Some(item),
            CachedValue::Error(_) => None,
        }
    }

    pub(super) fn error(&self) -> Option<&QueryError> {
        match &self.value {
            CachedValue::Item(_) => None,
            CachedValue::Error(err) => Some(err),
        }
    }
}

//! Query cache keyed by endpoint, with tag-based invalidation.
use std::collections::BTreeMap;

use crate::QueueAndProcessorStatus;

/// Cache tags. A query provides tags; invalidating a tag marks every query
/// providing it as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApiTag {
    SessionQueueStatus,
    SessionQueueItem,
    Board,
    ImageList,
    /// Everything that may have changed while the socket was down.
    FetchOnReconnect,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueryKey {
    QueueStatus,
    QueueItems,
    BoardList,
    /// Images of one board; `None` lists uncategorized images.
    ImageList { board_id: Option<String> },
}

impl QueryKey {
    pub fn provides(&self) -> &'static [ApiTag] {
        match self {
            QueryKey::QueueStatus => &[ApiTag::SessionQueueStatus, ApiTag::FetchOnReconnect],
            QueryKey::QueueItems => &[ApiTag::SessionQueueItem, ApiTag::FetchOnReconnect],
            QueryKey::BoardList => &[ApiTag::Board, ApiTag::FetchOnReconnect],
            QueryKey::ImageList { .. } => &[ApiTag::ImageList, ApiTag::FetchOnReconnect],
        }
    }

    pub fn provides_any(&self, tags: &[ApiTag]) -> bool {
        self.provides().iter().any(|tag| tags.contains(tag))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CachedData {
    QueueStatus(QueueAndProcessorStatus),
    Json(serde_json::Value),
}

impl CachedData {
    pub fn as_queue_status(&self) -> Option<&QueueAndProcessorStatus> {
        match self {
            CachedData::QueueStatus(status) => Some(status),
            CachedData::Json(_) => None,
        }
    }

    pub fn into_queue_status(self) -> Option<QueueAndProcessorStatus> {
        match self {
            CachedData::QueueStatus(status) => Some(status),
            CachedData::Json(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Uninitialized,
    Pending,
    Fulfilled,
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CacheEntry {
    pub data: Option<CachedData>,
    pub status: QueryStatus,
    pub stale: bool,
    pub subscribers: usize,
}

impl CacheEntry {
    /// Data that can be served without contacting the backend.
    pub fn fresh_data(&self) -> Option<&CachedData> {
        if self.stale {
            return None;
        }
        self.data.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiState {
    queries: BTreeMap<QueryKey, CacheEntry>,
}

impl ApiState {
    pub fn entry(&self, key: &QueryKey) -> Option<&CacheEntry> {
        self.queries.get(key)
    }

    pub fn data(&self, key: &QueryKey) -> Option<&CachedData> {
        self.queries.get(key).and_then(|entry| entry.data.as_ref())
    }

    pub fn fresh_data(&self, key: &QueryKey) -> Option<&CachedData> {
        self.queries.get(key).and_then(CacheEntry::fresh_data)
    }

    pub(crate) fn entry_mut(&mut self, key: QueryKey) -> &mut CacheEntry {
        self.queries.entry(key).or_default()
    }

    pub(crate) fn existing_mut(&mut self, key: &QueryKey) -> Option<&mut CacheEntry> {
        self.queries.get_mut(key)
    }

    /// Marks every query providing one of `tags` as stale and returns the
    /// keys that still have subscribers, in key order.
    pub(crate) fn invalidate(&mut self, tags: &[ApiTag]) -> Vec<QueryKey> {
        let mut refetch = Vec::new();
        for (key, entry) in self.queries.iter_mut() {
            if !key.provides_any(tags) {
                continue;
            }
            entry.stale = true;
            if entry.subscribers > 0 {
                refetch.push(key.clone());
            }
        }
        refetch
    }
}

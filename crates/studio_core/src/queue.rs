use serde::{Deserialize, Serialize};

/// Counters and current item of a session queue, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionQueueStatus {
    pub queue_id: String,
    pub item_id: Option<u64>,
    pub batch_id: Option<String>,
    pub session_id: Option<String>,
    pub pending: u32,
    pub in_progress: u32,
    pub completed: u32,
    pub failed: u32,
    pub canceled: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionProcessorStatus {
    pub is_started: bool,
    pub is_processing: bool,
}

/// Payload of the queue status endpoint.
///
/// Only `queue` takes part in reconnect change detection; the processor flags
/// flip independently of queue contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueAndProcessorStatus {
    pub queue: SessionQueueStatus,
    pub processor: SessionProcessorStatus,
}

impl QueueAndProcessorStatus {
    /// True when `previous` is absent or its queue differs from this one.
    pub fn queue_changed_since(&self, previous: Option<&QueueAndProcessorStatus>) -> bool {
        previous.map(|prev| &prev.queue) != Some(&self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_payload_decodes_with_defaults() {
        let status: QueueAndProcessorStatus =
            serde_json::from_str(r#"{"queue":{"pending":2}}"#).unwrap();
        assert_eq!(status.queue.pending, 2);
        assert_eq!(status.queue.total, 0);
        assert!(!status.processor.is_processing);
    }

    #[test]
    fn processor_flags_do_not_count_as_a_queue_change() {
        let mut prev = QueueAndProcessorStatus::default();
        prev.queue.pending = 2;
        let mut next = prev.clone();
        next.processor.is_processing = true;

        assert!(!next.queue_changed_since(Some(&prev)));
        next.queue.pending = 0;
        assert!(next.queue_changed_since(Some(&prev)));
        assert!(next.queue_changed_since(None));
    }
}

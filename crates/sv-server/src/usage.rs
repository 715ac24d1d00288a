//! Usage recorders.
//!
//! [`UsageCounters`] keeps per-key stream/download counts in memory;
//! [`NoopRecorder`] discards events. Route handlers hand events over with
//! [`spawn_record`] and never wait for them.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use sv_core::{UsageEvent, UsageKind, UsageRecorder};

/// Stream and download totals for one key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UsageCounts {
    pub streams: u64,
    pub downloads: u64,
}

/// Concurrent in-memory counters keyed by media path or song slug.
#[derive(Debug, Default)]
pub struct UsageCounters {
    counts: DashMap<String, UsageCounts>,
}

impl UsageCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current totals for `key` (zero if never seen).
    pub fn get(&self, key: &str) -> UsageCounts {
        self.counts.get(key).map(|c| *c).unwrap_or_default()
    }
}

#[async_trait]
impl UsageRecorder for UsageCounters {
    async fn record(&self, event: UsageEvent) {
        let mut entry = self.counts.entry(event.key).or_default();
        match event.kind {
            UsageKind::Stream => entry.streams += 1,
            UsageKind::Download => entry.downloads += 1,
        }
    }
}

/// Recorder that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecorder;

#[async_trait]
impl UsageRecorder for NoopRecorder {
    async fn record(&self, _event: UsageEvent) {}
}

/// Record `event` on a detached task.
pub fn spawn_record(recorder: &Arc<dyn UsageRecorder>, event: UsageEvent) {
    let recorder = Arc::clone(recorder);
    tokio::spawn(async move {
        recorder.record(event).await;
    });
}

use async_trait::async_trait;
use engine_core::{
    error::{PullError, PushError},
    puller::Puller,
    pusher::Pusher,
};
use model::records::record::Record;
use std::{collections::VecDeque, sync::Arc};
use tokio::sync::Mutex;

/// Vector-backed puller, mainly for tests and demos.
pub struct MemoryPuller {
    records: VecDeque<Record>,
    declared_count: Option<u64>,
}

impl MemoryPuller {
    /// Source with an exact advertised count.
    pub fn new(records: Vec<Record>) -> Self {
        let declared_count = Some(records.len() as u64);
        MemoryPuller {
            records: records.into(),
            declared_count,
        }
    }

    /// Source that cannot report a count (streaming-API shape).
    pub fn without_count(records: Vec<Record>) -> Self {
        MemoryPuller {
            records: records.into(),
            declared_count: None,
        }
    }

    /// Source whose advertised count disagrees with what it yields. The
    /// engine is lenient about such sources; this makes that testable.
    pub fn with_declared_count(records: Vec<Record>, count: u64) -> Self {
        MemoryPuller {
            records: records.into(),
            declared_count: Some(count),
        }
    }
}

#[async_trait]
impl Puller for MemoryPuller {
    async fn count(&self) -> Result<Option<u64>, PullError> {
        Ok(self.declared_count)
    }

    async fn pull(&mut self, max_records: usize) -> Result<Option<Vec<Record>>, PullError> {
        if self.records.is_empty() {
            return Ok(None);
        }
        let take = max_records.min(self.records.len());
        Ok(Some(self.records.drain(..take).collect()))
    }
}

/// Pusher that collects into a shared vector; the sink handle stays valid
/// after the run for inspection.
pub struct MemoryPusher {
    sink: Arc<Mutex<Vec<Record>>>,
}

impl MemoryPusher {
    pub fn new() -> Self {
        MemoryPusher {
            sink: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sink(&self) -> Arc<Mutex<Vec<Record>>> {
        self.sink.clone()
    }
}

impl Default for MemoryPusher {
    fn default() -> Self {
        MemoryPusher::new()
    }
}

#[async_trait]
impl Pusher for MemoryPusher {
    async fn push(&mut self, records: Vec<Record>) -> Result<u64, PushError> {
        let n = records.len() as u64;
        self.sink.lock().await.extend(records);
        Ok(n)
    }
}

use crate::error::PullError;
use async_trait::async_trait;
use model::records::record::Record;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to a puller. A migrator owns its puller exclusively; the
/// mutex only serializes access between the count query and the streaming
/// loop.
pub type SharedPuller = Arc<Mutex<dyn Puller>>;

/// Source-side record producer.
///
/// `pull` yields records in bounded chunks and returns `None` once the
/// source is exhausted. Consumption is not restartable: after the first
/// `pull`, `count` may no longer reflect what remains.
#[async_trait]
pub trait Puller: Send {
    /// Best-effort total record count, taken at the moment it is queried.
    ///
    /// Side-effect free. Sources that cannot determine a count without a
    /// full scan return `Ok(None)`; callers must treat absence as
    /// "unknown", never as zero. The value is not required to stay accurate
    /// if the source mutates concurrently.
    async fn count(&self) -> Result<Option<u64>, PullError>;

    /// Produce the next chunk of at most `max_records` records, or `None`
    /// when the source is exhausted.
    async fn pull(&mut self, max_records: usize) -> Result<Option<Vec<Record>>, PullError>;
}

/// Wrap a puller into the shared handle a migrator holds.
pub fn shared_puller<P>(puller: P) -> SharedPuller
where
    P: Puller + 'static,
{
    Arc::new(Mutex::new(puller))
}

use crate::error::PushError;
use async_trait::async_trait;
use model::records::record::Record;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to a pusher; see [`crate::puller::SharedPuller`].
pub type SharedPusher = Arc<Mutex<dyn Pusher>>;

/// Destination-side record consumer.
#[async_trait]
pub trait Pusher: Send {
    /// Write one batch and return the number of records actually written.
    /// Implementations may buffer internally but must not drop records; a
    /// failed write surfaces as an error, never as a short count that hides
    /// data loss.
    async fn push(&mut self, records: Vec<Record>) -> Result<u64, PushError>;
}

/// Wrap a pusher into the shared handle a migrator holds.
pub fn shared_pusher<P>(pusher: P) -> SharedPusher
where
    P: Pusher + 'static,
{
    Arc::new(Mutex::new(pusher))
}

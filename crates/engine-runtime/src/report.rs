use model::events::RunEvent;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Abstract progress-reporting collaborator.
///
/// The orchestrator emits every [`RunEvent`] here; rendering (progress bar,
/// scrolling counter, plain log line) is entirely the consumer's concern.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &RunEvent);
}

/// Discards every event.
#[derive(Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&self, _event: &RunEvent) {}
}

/// Logs every event through `tracing`.
#[derive(Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&self, event: &RunEvent) {
        if event.is_error() {
            error!(run_id = %event.run_id(), event = event.event_type(), "{event}");
        } else {
            info!(run_id = %event.run_id(), event = event.event_type(), "{event}");
        }
    }
}

/// Forwards events into an mpsc channel for an out-of-process or UI
/// consumer. Events for slow consumers are dropped rather than blocking the
/// run; progress reporting must never stall the streaming loop.
pub struct ChannelReporter {
    sender: mpsc::Sender<RunEvent>,
}

impl ChannelReporter {
    pub fn new(sender: mpsc::Sender<RunEvent>) -> Self {
        ChannelReporter { sender }
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, event: &RunEvent) {
        if let Err(err) = self.sender.try_send(event.clone()) {
            tracing::warn!(
                event = event.event_type(),
                error = %err,
                "Dropped progress event for slow subscriber"
            );
        }
    }
}

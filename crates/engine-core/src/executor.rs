use crate::{
    context::MigrationContext,
    error::ExecuteError,
    puller::SharedPuller,
    pusher::SharedPusher,
    transform::{Transform, TransformPipeline},
};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tracing::debug;

/// Lazy, finite, non-restartable sequence of progress deltas. Each element
/// is the number of records pushed since the previous one, not a running
/// total; the consumer accumulates if it needs one.
pub type ProgressStream = BoxStream<'static, Result<u64, ExecuteError>>;

/// Drives one migrator's streaming loop, binding its puller to its pusher.
pub trait Executor: Send + Sync {
    /// Produce the progress stream for one puller/pusher pair.
    ///
    /// The stream must be driven incrementally: one bounded chunk is pulled,
    /// transformed and pushed per element, and control returns to the caller
    /// between elements. The puller is never read to exhaustion ahead of the
    /// consumer. A failure from either side terminates the stream with that
    /// error; there is no resumption and no trailing partial delta.
    fn execute(
        &self,
        puller: SharedPuller,
        pusher: SharedPusher,
        ctx: MigrationContext,
    ) -> ProgressStream;
}

/// Default executor: fixed-size batches, optional transform pipeline.
///
/// Batch size comes from the context options (`batch_size` key) and is not
/// observable to the caller beyond yield granularity.
#[derive(Default)]
pub struct BatchExecutor {
    transform: Option<Arc<TransformPipeline>>,
}

impl BatchExecutor {
    pub fn new() -> Self {
        BatchExecutor::default()
    }

    pub fn with_transform(pipeline: TransformPipeline) -> Self {
        BatchExecutor {
            transform: Some(Arc::new(pipeline)),
        }
    }
}

struct StepState {
    puller: SharedPuller,
    pusher: SharedPusher,
    transform: Option<Arc<TransformPipeline>>,
    batch_size: usize,
}

impl Executor for BatchExecutor {
    fn execute(
        &self,
        puller: SharedPuller,
        pusher: SharedPusher,
        ctx: MigrationContext,
    ) -> ProgressStream {
        let state = StepState {
            puller,
            pusher,
            transform: self.transform.clone(),
            batch_size: ctx.options().batch_size(),
        };
        debug!(
            migration = ctx.name(),
            batch_size = state.batch_size,
            "Starting streaming loop"
        );

        stream::try_unfold(state, |state| async move {
            loop {
                let batch = {
                    let mut puller = state.puller.lock().await;
                    puller.pull(state.batch_size).await?
                };

                let Some(records) = batch else {
                    return Ok(None);
                };

                // A sloppy puller may hand back an empty chunk before
                // signalling exhaustion; it carries no progress, so it is
                // not a stream element.
                if records.is_empty() {
                    continue;
                }

                let records = match &state.transform {
                    Some(pipeline) => pipeline.apply(records)?,
                    None => records,
                };

                let pushed = {
                    let mut pusher = state.pusher.lock().await;
                    pusher.push(records).await?
                };

                return Ok(Some((pushed, state)));
            }
        })
        .boxed()
    }
}

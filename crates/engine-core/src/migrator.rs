use crate::{
    executor::Executor,
    puller::SharedPuller,
    pusher::SharedPusher,
};
use std::sync::Arc;

/// One pull/transform/push unit within a migration.
///
/// A thin structural bundle: the migration exclusively owns its migrators,
/// and a migrator exclusively owns its puller/pusher/executor. All control
/// flow lives in the orchestrator.
pub struct Migrator {
    name: String,
    puller: SharedPuller,
    pusher: SharedPusher,
    executor: Arc<dyn Executor>,
}

impl Migrator {
    pub fn new(
        name: &str,
        puller: SharedPuller,
        pusher: SharedPusher,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Migrator {
            name: name.to_string(),
            puller,
            pusher,
            executor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn puller(&self) -> &SharedPuller {
        &self.puller
    }

    pub fn pusher(&self) -> &SharedPusher {
        &self.pusher
    }

    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }
}

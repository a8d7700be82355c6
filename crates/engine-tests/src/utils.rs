#![allow(dead_code)]

use async_trait::async_trait;
use engine_core::{
    context::MigrationContext,
    error::{PullError, PushError, TaskError},
    puller::Puller,
    pusher::Pusher,
    task::Task,
};
use engine_runtime::report::ProgressReporter;
use model::{
    core::value::{FieldValue, Value},
    events::RunEvent,
    records::record::Record,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

/// Build `n` flat records for the given entity.
pub fn make_records(entity: &str, n: i64) -> Vec<Record> {
    (0..n)
        .map(|i| {
            Record::new(
                entity,
                vec![
                    FieldValue::new("id", Value::Int(i)),
                    FieldValue::new("name", Value::String(format!("{entity}-{i}"))),
                ],
            )
        })
        .collect()
}

/// Reporter that records every event for later assertions.
pub struct RecordingReporter {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingReporter {
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().expect("events lock").clone()
    }

    pub fn deltas(&self) -> Vec<u64> {
        self.events()
            .iter()
            .filter_map(|event| match event {
                RunEvent::MigratorProgress { delta, .. } => Some(*delta),
                _ => None,
            })
            .collect()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events().iter().map(RunEvent::event_type).collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: &RunEvent) {
        self.events.lock().expect("events lock").push(event.clone());
    }
}

/// Puller that counts how often it is touched, so tests can assert a
/// migrator was never started.
pub struct ProbePuller {
    records: Vec<Record>,
    declared_count: Option<u64>,
    pulls: Arc<AtomicUsize>,
    count_calls: Arc<AtomicUsize>,
}

impl ProbePuller {
    pub fn new(records: Vec<Record>) -> Self {
        let declared_count = Some(records.len() as u64);
        ProbePuller {
            records,
            declared_count,
            pulls: Arc::new(AtomicUsize::new(0)),
            count_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn without_count(mut self) -> Self {
        self.declared_count = None;
        self
    }

    pub fn declaring(mut self, count: u64) -> Self {
        self.declared_count = Some(count);
        self
    }

    pub fn pulls(&self) -> Arc<AtomicUsize> {
        self.pulls.clone()
    }

    pub fn count_calls(&self) -> Arc<AtomicUsize> {
        self.count_calls.clone()
    }
}

#[async_trait]
impl Puller for ProbePuller {
    async fn count(&self) -> Result<Option<u64>, PullError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.declared_count)
    }

    async fn pull(&mut self, max_records: usize) -> Result<Option<Vec<Record>>, PullError> {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        if self.records.is_empty() {
            return Ok(None);
        }
        let take = max_records.min(self.records.len());
        Ok(Some(self.records.drain(..take).collect()))
    }
}

/// Pusher that starts failing on the n-th push, for mid-stream failure
/// scenarios. Records written before the failure stay in the sink.
pub struct FlakyPusher {
    sink: Arc<Mutex<Vec<Record>>>,
    fail_on_push: usize,
    pushes: usize,
}

impl FlakyPusher {
    pub fn failing_on(fail_on_push: usize) -> Self {
        FlakyPusher {
            sink: Arc::new(Mutex::new(Vec::new())),
            fail_on_push,
            pushes: 0,
        }
    }

    pub fn sink(&self) -> Arc<Mutex<Vec<Record>>> {
        self.sink.clone()
    }
}

#[async_trait]
impl Pusher for FlakyPusher {
    async fn push(&mut self, records: Vec<Record>) -> Result<u64, PushError> {
        self.pushes += 1;
        if self.pushes >= self.fail_on_push {
            return Err(PushError::Rejected("destination refused batch".into()));
        }
        let n = records.len() as u64;
        self.sink.lock().expect("sink lock").extend(records);
        Ok(n)
    }
}

/// Task that always fails.
pub struct FailingTask {
    name: &'static str,
}

impl FailingTask {
    pub fn new(name: &'static str) -> Self {
        FailingTask { name }
    }
}

#[async_trait]
impl Task for FailingTask {
    fn name(&self) -> &str {
        self.name
    }

    async fn execute(&self, _ctx: &MigrationContext) -> Result<Option<String>, TaskError> {
        Err(TaskError::Failed("boom".into()))
    }
}

/// Task that succeeds with a fixed outcome.
pub struct OkTask {
    name: &'static str,
    outcome: Option<&'static str>,
}

impl OkTask {
    pub fn named(name: &'static str) -> Self {
        OkTask {
            name,
            outcome: Some("OK"),
        }
    }

    pub fn silent(name: &'static str) -> Self {
        OkTask {
            name,
            outcome: None,
        }
    }
}

#[async_trait]
impl Task for OkTask {
    fn name(&self) -> &str {
        self.name
    }

    async fn execute(&self, _ctx: &MigrationContext) -> Result<Option<String>, TaskError> {
        Ok(self.outcome.map(str::to_string))
    }
}

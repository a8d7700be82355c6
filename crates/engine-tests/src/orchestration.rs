#[cfg(test)]
mod tests {
    use crate::utils::{FailingTask, FlakyPusher, OkTask, ProbePuller, RecordingReporter, make_records};
    use connectors::memory::{MemoryPuller, MemoryPusher};
    use engine_core::{
        executor::BatchExecutor,
        migration::Migration,
        migrator::Migrator,
        puller::shared_puller,
        pusher::shared_pusher,
        registry::Registry,
    };
    use engine_runtime::{
        error::MigrationError,
        orchestrator::{Orchestrator, RunState},
        report::NullReporter,
    };
    use model::{
        events::{RunEvent, TaskPhase},
        options::{Options, OptionValue, keys},
        records::record::Record,
    };
    use std::sync::{Arc, atomic::Ordering};
    use tokio::sync::Mutex;

    fn batch_options(batch_size: i64) -> Options {
        Options::new().with(keys::BATCH_SIZE, OptionValue::Int(batch_size))
    }

    fn registry_with(name: &str, migration: Migration) -> Arc<Registry> {
        Arc::new(
            Registry::builder()
                .register(name, migration)
                .expect("register")
                .build(),
        )
    }

    fn memory_migrator(name: &str, records: i64) -> (Migrator, Arc<Mutex<Vec<Record>>>) {
        let pusher = MemoryPusher::new();
        let sink = pusher.sink();
        let migrator = Migrator::new(
            name,
            shared_puller(MemoryPuller::new(make_records(name, records))),
            shared_pusher(pusher),
            Arc::new(BatchExecutor::new()),
        );
        (migrator, sink)
    }

    #[tokio::test]
    async fn users_sync_scenario_reports_five_even_deltas() {
        let reporter = RecordingReporter::new();
        let pusher = MemoryPusher::new();
        let sink = pusher.sink();

        let migration = Migration::builder()
            .before_task(OkTask::named("create_schema"))
            .migrator(Migrator::new(
                "users",
                shared_puller(MemoryPuller::new(make_records("users", 250))),
                shared_pusher(pusher),
                Arc::new(BatchExecutor::new()),
            ))
            .build();

        let orchestrator = Orchestrator::new(registry_with("users_sync", migration), reporter.clone());
        let summary = orchestrator
            .run("users_sync", batch_options(50))
            .await
            .expect("run completes");

        assert_eq!(summary.state, RunState::Completed);
        assert_eq!(summary.tasks.len(), 1);
        assert_eq!(summary.tasks[0].outcome, "OK");
        assert_eq!(summary.migrators.len(), 1);
        assert_eq!(summary.migrators[0].expected, Some(250));
        assert_eq!(summary.migrators[0].rows, 250);
        assert_eq!(summary.migrators[0].batches, 5);

        assert_eq!(reporter.deltas(), vec![50, 50, 50, 50, 50]);
        assert_eq!(sink.lock().await.len(), 250);
    }

    #[tokio::test]
    async fn unknown_count_does_not_block_progress() {
        let reporter = RecordingReporter::new();
        let pusher = MemoryPusher::new();

        let migration = Migration::builder()
            .migrator(Migrator::new(
                "events",
                shared_puller(MemoryPuller::without_count(make_records("events", 7))),
                shared_pusher(pusher),
                Arc::new(BatchExecutor::new()),
            ))
            .build();

        let orchestrator = Orchestrator::new(registry_with("events_sync", migration), reporter.clone());
        let summary = orchestrator
            .run("events_sync", batch_options(3))
            .await
            .expect("run completes");

        assert_eq!(summary.migrators[0].expected, None);
        assert_eq!(summary.migrators[0].rows, 7);
        assert_eq!(reporter.deltas(), vec![3, 3, 1]);

        let started_without_estimate = reporter.events().iter().any(|event| {
            matches!(event, RunEvent::MigratorStarted { expected: None, .. })
        });
        assert!(started_without_estimate);
    }

    #[tokio::test]
    async fn before_task_failure_leaves_source_and_destination_untouched() {
        let reporter = RecordingReporter::new();
        let puller = ProbePuller::new(make_records("users", 5));
        let pulls = puller.pulls();
        let count_calls = puller.count_calls();

        let migration = Migration::builder()
            .before_task(FailingTask::new("create_schema"))
            .migrator(Migrator::new(
                "users",
                shared_puller(puller),
                shared_pusher(MemoryPusher::new()),
                Arc::new(BatchExecutor::new()),
            ))
            .after_task(OkTask::named("refresh_views"))
            .build();

        let orchestrator = Orchestrator::new(registry_with("users_sync", migration), reporter.clone());
        let err = orchestrator
            .run("users_sync", Options::new())
            .await
            .expect_err("before-task fails");

        assert!(matches!(
            err,
            MigrationError::Task {
                phase: TaskPhase::Before,
                ..
            }
        ));
        assert_eq!(err.failing_step().as_deref(), Some("before task 'create_schema'"));

        assert_eq!(pulls.load(Ordering::SeqCst), 0);
        assert_eq!(count_calls.load(Ordering::SeqCst), 0);

        let types = reporter.event_types();
        assert!(!types.contains(&"migrator.started"));
        // The after-task never started; only the failing before-task did.
        assert_eq!(types.iter().filter(|t| **t == "task.started").count(), 1);
        assert!(types.contains(&"run.failed"));
    }

    #[tokio::test]
    async fn mid_stream_failure_keeps_earlier_effects_and_skips_the_rest() {
        let reporter = RecordingReporter::new();

        let (first, first_sink) = memory_migrator("lookup_tables", 4);

        let flaky = FlakyPusher::failing_on(2);
        let second_sink = flaky.sink();
        let second = Migrator::new(
            "orders",
            shared_puller(MemoryPuller::new(make_records("orders", 10))),
            shared_pusher(flaky),
            Arc::new(BatchExecutor::new()),
        );

        let third_puller = ProbePuller::new(make_records("invoices", 5));
        let third_pulls = third_puller.pulls();
        let third_count_calls = third_puller.count_calls();
        let third = Migrator::new(
            "invoices",
            shared_puller(third_puller),
            shared_pusher(MemoryPusher::new()),
            Arc::new(BatchExecutor::new()),
        );

        let migration = Migration::builder()
            .migrator(first)
            .migrator(second)
            .migrator(third)
            .after_task(OkTask::named("refresh_views"))
            .build();

        let orchestrator = Orchestrator::new(registry_with("nightly", migration), reporter.clone());
        let err = orchestrator
            .run("nightly", batch_options(3))
            .await
            .expect_err("second migrator fails");

        assert!(matches!(err, MigrationError::Migrator { ref name, .. } if name == "orders"));
        assert_eq!(err.failing_step().as_deref(), Some("migrator 'orders'"));

        // First migrator's full effect is retained.
        assert_eq!(first_sink.lock().await.len(), 4);
        // Second pushed one batch before the destination refused the next.
        assert_eq!(second_sink.lock().expect("sink lock").len(), 3);
        // Third was never touched, and the after-task never ran.
        assert_eq!(third_pulls.load(Ordering::SeqCst), 0);
        assert_eq!(third_count_calls.load(Ordering::SeqCst), 0);
        assert!(!reporter.event_types().contains(&"task.started"));
    }

    #[tokio::test]
    async fn after_task_failure_fails_the_run_but_keeps_pushed_records() {
        let (migrator, sink) = memory_migrator("users", 6);
        let migration = Migration::builder()
            .migrator(migrator)
            .after_task(FailingTask::new("rebuild_index"))
            .build();

        let orchestrator = Orchestrator::new(
            registry_with("users_sync", migration),
            Arc::new(NullReporter),
        );
        let err = orchestrator
            .run("users_sync", batch_options(4))
            .await
            .expect_err("after-task fails");

        assert!(matches!(
            err,
            MigrationError::Task {
                phase: TaskPhase::After,
                ..
            }
        ));
        assert_eq!(sink.lock().await.len(), 6);
    }

    #[tokio::test]
    async fn advertised_count_mismatch_is_tolerated() {
        let reporter = RecordingReporter::new();
        let pusher = MemoryPusher::new();

        // The source advertises 250 records but only yields 10; the plan
        // display is allowed to be wrong, execution is not.
        let migration = Migration::builder()
            .migrator(Migrator::new(
                "users",
                shared_puller(MemoryPuller::with_declared_count(
                    make_records("users", 10),
                    250,
                )),
                shared_pusher(pusher),
                Arc::new(BatchExecutor::new()),
            ))
            .build();

        let orchestrator = Orchestrator::new(registry_with("users_sync", migration), reporter.clone());
        let summary = orchestrator
            .run("users_sync", batch_options(4))
            .await
            .expect("run completes despite the bad estimate");

        assert_eq!(summary.state, RunState::Completed);
        assert_eq!(summary.migrators[0].expected, Some(250));
        assert_eq!(summary.migrators[0].rows, 10);
    }

    #[tokio::test]
    async fn lookup_miss_is_an_explicit_outcome() {
        let registry = registry_with("known", Migration::builder().build());
        let orchestrator = Orchestrator::new(registry, Arc::new(NullReporter));

        let err = orchestrator
            .run("nope", Options::new())
            .await
            .expect_err("unknown migration");

        assert!(matches!(err, MigrationError::NotFound { ref name } if name == "nope"));
        assert_eq!(err.failing_step(), None);
    }
}

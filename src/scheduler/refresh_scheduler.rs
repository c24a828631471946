// src/scheduler/refresh_scheduler.rs
//
// Refresh Scheduler - one supervised loop per data source
//
// CRITICAL RULES:
// - First run is immediate, then one run per interval tick
// - A failing or panicking job is reported and the loop carries on unchanged
// - No retries, no backoff: the next attempt is simply the next tick
// - Cancellation is checked before each iteration; a running job finishes
// - Tasks share nothing but the outcome sink

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt};
use log::{error, info};
use tokio::task::JoinSet;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};
use crate::scheduler::outcome::{LogSink, OutcomeSink, OutcomeStatus, TaskOutcome, TaskState};

type Job = Arc<dyn Fn() -> BoxFuture<'static, AppResult<()>> + Send + Sync>;

struct Registration {
    name: String,
    interval: Duration,
    job: Job,
}

pub struct RefreshScheduler {
    registrations: Vec<Registration>,
    sink: Arc<dyn OutcomeSink>,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(Arc::new(LogSink))
    }
}

impl RefreshScheduler {
    pub fn new(sink: Arc<dyn OutcomeSink>) -> Self {
        Self {
            registrations: Vec::new(),
            sink,
        }
    }

    /// Add a periodic job. Names must be unique and intervals non-zero.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, every: Duration, job: F) -> AppResult<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<()>> + Send + 'static,
    {
        let name = name.into();
        if every.is_zero() {
            return Err(AppError::Config(format!(
                "refresh task '{}' needs a non-zero interval",
                name
            )));
        }
        if self.registrations.iter().any(|r| r.name == name) {
            return Err(AppError::Config(format!(
                "refresh task '{}' is already registered",
                name
            )));
        }

        self.registrations.push(Registration {
            name,
            interval: every,
            job: Arc::new(move || job().boxed()),
        });
        Ok(())
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.registrations.iter().map(|r| r.name.as_str()).collect()
    }

    /// Run every registered task until `cancel` fires.
    ///
    /// Resolves once all tasks have stopped.
    pub async fn run(self, cancel: CancellationToken) {
        let mut tasks = JoinSet::new();
        let count = self.registrations.len();

        for registration in self.registrations {
            info!(
                "Starting refresh task '{}' every {:?}",
                registration.name, registration.interval
            );
            tasks.spawn(run_task(
                registration,
                Arc::clone(&self.sink),
                cancel.clone(),
            ));
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!("Refresh task aborted: {}", e);
            }
        }

        info!("All {} refresh task(s) stopped", count);
    }
}

async fn run_task(registration: Registration, sink: Arc<dyn OutcomeSink>, cancel: CancellationToken) {
    let Registration { name, interval: every, job } = registration;
    sink.transition(&name, TaskState::Idle);

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut attempt = 0u64;

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        attempt += 1;
        sink.transition(&name, TaskState::Running { attempt });

        let started_at = Utc::now();
        let clock = Instant::now();
        let run = Arc::clone(&job);
        let status = match AssertUnwindSafe(async move { run().await }).catch_unwind().await {
            Ok(Ok(())) => OutcomeStatus::Succeeded,
            Ok(Err(e)) => OutcomeStatus::Failed(e.to_string()),
            Err(panic) => OutcomeStatus::Panicked(panic_message(panic.as_ref())),
        };

        sink.record(&TaskOutcome {
            task: name.clone(),
            attempt,
            started_at,
            duration: clock.elapsed(),
            status,
        });
        sink.transition(&name, TaskState::Waiting);
    }

    sink.transition(&name, TaskState::Stopped);
    info!("Refresh task '{}' stopped after {} run(s)", name, attempt);
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::outcome::OutcomeLog;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TICK: Duration = Duration::from_millis(50);

    async fn bump(counter: Arc<AtomicUsize>) -> AppResult<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn counting(counter: &Arc<AtomicUsize>) -> impl Fn() -> BoxFuture<'static, AppResult<()>> + Send + Sync + 'static {
        let counter = Arc::clone(counter);
        move || bump(Arc::clone(&counter)).boxed()
    }

    async fn noop() -> AppResult<()> {
        Ok(())
    }

    async fn fail() -> AppResult<()> {
        Err(AppError::Other("upstream down".into()))
    }

    async fn slow() -> AppResult<()> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(())
    }

    async fn explode(counter: Arc<AtomicUsize>) -> AppResult<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        panic!("decoder exploded");
    }

    /// Run `scheduler` for `window`, then cancel and wait for it to stop.
    async fn run_for(scheduler: RefreshScheduler, window: Duration) {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(scheduler.run(cancel.clone()));
        tokio::time::sleep(window).await;
        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_immediately_then_every_tick() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = RefreshScheduler::default();
        scheduler.register("iss", TICK, counting(&runs)).unwrap();

        run_for(scheduler, Duration::from_millis(220)).await;

        let seen = runs.load(Ordering::SeqCst);
        assert!((4..=5).contains(&seen), "ran {} times", seen);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(runs.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_task_does_not_disturb_others() {
        let healthy = Arc::new(AtomicUsize::new(0));
        let log = Arc::new(OutcomeLog::new());
        let mut scheduler = RefreshScheduler::new(log.clone());
        scheduler.register("healthy", TICK, counting(&healthy)).unwrap();
        scheduler.register("broken", TICK, fail).unwrap();

        run_for(scheduler, Duration::from_millis(220)).await;

        let healthy_runs = healthy.load(Ordering::SeqCst);
        assert!((4..=5).contains(&healthy_runs));
        assert_eq!(log.successes("healthy"), healthy_runs);
        assert!(log.failures("broken") >= 4);
        assert!(log
            .entries_for("broken")
            .iter()
            .all(|o| o.status == OutcomeStatus::Failed("Other error: upstream down".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_job_keeps_its_schedule() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let log = Arc::new(OutcomeLog::new());
        let mut scheduler = RefreshScheduler::new(log.clone());
        let counter = Arc::clone(&attempts);
        scheduler
            .register("flaky", TICK, move || explode(Arc::clone(&counter)))
            .unwrap();

        run_for(scheduler, Duration::from_millis(220)).await;

        assert!(attempts.load(Ordering::SeqCst) >= 4);
        let entries = log.entries_for("flaky");
        assert_eq!(entries.len(), attempts.load(Ordering::SeqCst));
        assert_eq!(entries[0].status, OutcomeStatus::Panicked("decoder exploded".into()));
        assert_eq!(entries[1].attempt, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_iteration_finishes_before_stop() {
        let log = Arc::new(OutcomeLog::new());
        let mut scheduler = RefreshScheduler::new(log.clone());
        scheduler.register("slow", Duration::from_secs(60), slow).unwrap();

        run_for(scheduler, Duration::from_millis(20)).await;

        assert_eq!(log.successes("slow"), 1);
        assert_eq!(log.state_of("slow"), Some(TaskState::Stopped));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_runs_nothing() {
        let runs = Arc::new(AtomicUsize::new(0));
        let log = Arc::new(OutcomeLog::new());
        let mut scheduler = RefreshScheduler::new(log.clone());
        scheduler.register("osdr", TICK, counting(&runs)).unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        scheduler.run(cancel).await;

        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(log.state_of("osdr"), Some(TaskState::Stopped));
    }

    #[test]
    fn test_registration_rules() {
        let mut scheduler = RefreshScheduler::default();
        scheduler.register("apod", Duration::from_secs(1), noop).unwrap();

        let zero = scheduler.register("neo", Duration::ZERO, noop);
        assert!(matches!(zero, Err(AppError::Config(_))));

        let duplicate = scheduler.register("apod", Duration::from_secs(5), noop);
        assert!(matches!(duplicate, Err(AppError::Config(_))));

        assert_eq!(scheduler.task_names(), vec!["apod"]);
    }
}

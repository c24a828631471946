// src/scheduler/mod.rs
//
// Periodic refresh tasks. The scheduler knows nothing about feeds or
// storage; a job is any async closure returning `AppResult<()>`.

pub mod outcome;
pub mod refresh_scheduler;

pub use outcome::{LogSink, OutcomeLog, OutcomeSink, OutcomeStatus, TaskOutcome, TaskState};
pub use refresh_scheduler::RefreshScheduler;

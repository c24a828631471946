// src/scheduler/outcome.rs
//
// What the scheduler reports about each refresh iteration.
//
// Sinks are observers only: they never influence scheduling and must not
// block for long, since they are called inline from the refresh tasks.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Succeeded,
    /// The job returned an error (message only; the error itself is not kept)
    Failed(String),
    /// The job panicked; the task survives and keeps its schedule
    Panicked(String),
}

#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub task: String,
    /// 1-based iteration counter of this task
    pub attempt: u64,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub status: OutcomeStatus,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Succeeded
    }
}

/// Per-task lifecycle: `Idle → Running → Waiting → Running → … → Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Running { attempt: u64 },
    Waiting,
    Stopped,
}

pub trait OutcomeSink: Send + Sync {
    fn record(&self, outcome: &TaskOutcome);

    fn transition(&self, _task: &str, _state: TaskState) {}
}

/// Writes every outcome to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl OutcomeSink for LogSink {
    fn record(&self, outcome: &TaskOutcome) {
        match &outcome.status {
            OutcomeStatus::Succeeded => debug!(
                "[{}] refresh #{} succeeded in {:?}",
                outcome.task, outcome.attempt, outcome.duration
            ),
            OutcomeStatus::Failed(message) => error!(
                "[{}] refresh #{} failed after {:?}: {}",
                outcome.task, outcome.attempt, outcome.duration, message
            ),
            OutcomeStatus::Panicked(message) => error!(
                "[{}] refresh #{} panicked: {}",
                outcome.task, outcome.attempt, message
            ),
        }
    }

    fn transition(&self, task: &str, state: TaskState) {
        if state == TaskState::Stopped {
            debug!("[{}] stopped", task);
        }
    }
}

/// In-memory record of outcomes and current task states.
///
/// Also forwards everything to `LogSink`, so it can replace it outright.
#[derive(Debug, Default)]
pub struct OutcomeLog {
    entries: RwLock<Vec<TaskOutcome>>,
    states: RwLock<HashMap<String, TaskState>>,
}

impl OutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<TaskOutcome> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn entries_for(&self, task: &str) -> Vec<TaskOutcome> {
        self.entries()
            .into_iter()
            .filter(|outcome| outcome.task == task)
            .collect()
    }

    pub fn successes(&self, task: &str) -> usize {
        self.entries_for(task).iter().filter(|o| o.is_success()).count()
    }

    pub fn failures(&self, task: &str) -> usize {
        self.entries_for(task).iter().filter(|o| !o.is_success()).count()
    }

    pub fn state_of(&self, task: &str) -> Option<TaskState> {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(task)
            .copied()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl OutcomeSink for OutcomeLog {
    fn record(&self, outcome: &TaskOutcome) {
        LogSink.record(outcome);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(outcome.clone());
    }

    fn transition(&self, task: &str, state: TaskState) {
        LogSink.transition(task, state);
        let previous = self
            .states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(task.to_string(), state);
        if previous == Some(TaskState::Stopped) {
            warn!("[{}] changed state after stopping: {:?}", task, state);
        }
    }
}

//! Per-channel dispatch queue
//!
//! Some downstream systems (interactive desktop CAD software) process one
//! command at a time and corrupt state under concurrent access, so each
//! channel bounds its in-flight work to a configured concurrency. Pending
//! tasks are priority-banded with FIFO order inside a band; a failing task
//! with retries left is re-inserted at the front of its band so it gets one
//! more attempt before later submissions.

mod error;
mod task;

pub use error::QueueError;
pub use task::{Priority, Task, TaskId, TaskStatus};

use crate::config::QueueConfig;
use crate::handler::ChannelHandler;
use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Introspection snapshot of one channel.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelStatus {
    pub pending: usize,
    pub running: usize,
    pub concurrency: usize,
}

struct PendingEntry {
    id: TaskId,
    priority: Priority,
}

/// A named lane of serialized work. Handler and concurrency are immutable
/// after registration; the pending list and in-flight count are owned by
/// the channel's worker loop.
struct Channel {
    name: String,
    handler: Arc<dyn ChannelHandler>,
    concurrency: usize,
    in_flight: AtomicUsize,
    pending: Mutex<Vec<PendingEntry>>,
}

impl Channel {
    /// Insert into the priority-ordered pending list.
    ///
    /// The list is kept sorted by priority (highest first) with FIFO order
    /// inside a band. A normal insert lands after every entry of equal or
    /// higher priority; a front-of-band insert (retry) lands before every
    /// entry of equal priority but still after higher ones.
    fn insert_pending(&self, entry: PendingEntry, front_of_band: bool) {
        let mut pending = self.pending.lock().unwrap();
        let position = if front_of_band {
            pending
                .iter()
                .position(|e| e.priority <= entry.priority)
                .unwrap_or(pending.len())
        } else {
            pending
                .iter()
                .position(|e| e.priority < entry.priority)
                .unwrap_or(pending.len())
        };
        pending.insert(position, entry);
    }

    fn pop_pending(&self) -> Option<PendingEntry> {
        let mut pending = self.pending.lock().unwrap();
        if pending.is_empty() {
            None
        } else {
            Some(pending.remove(0))
        }
    }
}

/// Per-channel, concurrency-bounded, priority-ordered task queue with
/// bounded retry-with-requeue.
pub struct DispatchQueue {
    channels: DashMap<String, Arc<Channel>>,
    tasks: Arc<DashMap<TaskId, Task>>,
    config: QueueConfig,
    cancel: CancellationToken,
}

impl DispatchQueue {
    pub fn new(config: QueueConfig) -> Self {
        Self {
            channels: DashMap::new(),
            tasks: Arc::new(DashMap::new()),
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Register a channel and start its worker loop.
    ///
    /// Handler and concurrency are fixed for the channel's lifetime.
    pub fn register_channel(
        &self,
        name: impl Into<String>,
        handler: Arc<dyn ChannelHandler>,
        concurrency: usize,
    ) -> Result<(), QueueError> {
        let name = name.into();
        if concurrency == 0 {
            return Err(QueueError::InvalidConcurrency { name });
        }
        if self.channels.contains_key(&name) {
            return Err(QueueError::ChannelExists { name });
        }

        let channel = Arc::new(Channel {
            name: name.clone(),
            handler,
            concurrency,
            in_flight: AtomicUsize::new(0),
            pending: Mutex::new(Vec::new()),
        });
        self.channels.insert(name.clone(), Arc::clone(&channel));

        let tasks = Arc::clone(&self.tasks);
        let poll = Duration::from_millis(self.config.poll_interval_ms);
        let cancel = self.cancel.clone();
        tokio::spawn(worker_loop(channel, tasks, poll, cancel));

        tracing::info!(channel = %name, concurrency, "Channel registered");
        Ok(())
    }

    /// Submit a task with the configured default retry budget.
    pub fn submit(
        &self,
        channel: &str,
        command: &str,
        payload: Value,
        priority: Priority,
    ) -> Result<TaskId, QueueError> {
        self.submit_with_retries(
            channel,
            command,
            payload,
            priority,
            self.config.default_max_retries,
        )
    }

    /// Submit a task with an explicit retry budget.
    pub fn submit_with_retries(
        &self,
        channel: &str,
        command: &str,
        payload: Value,
        priority: Priority,
        max_retries: u32,
    ) -> Result<TaskId, QueueError> {
        let chan = self
            .channels
            .get(channel)
            .map(|c| Arc::clone(&c))
            .ok_or_else(|| QueueError::UnknownChannel {
                name: channel.to_string(),
            })?;

        let task = Task::new(channel, command, payload, priority, max_retries);
        let id = task.id;
        self.tasks.insert(id, task);
        chan.insert_pending(PendingEntry { id, priority }, false);

        metrics::gauge!("relay_queue_pending", "channel" => channel.to_string())
            .set(chan.pending.lock().unwrap().len() as f64);
        tracing::debug!(
            channel = %channel,
            task_id = %id,
            command = %command,
            priority = ?priority,
            "Task submitted"
        );
        Ok(id)
    }

    /// Poll a task until it reaches a terminal state or the timeout lapses.
    ///
    /// A timeout affects only this caller; the task keeps running and may
    /// still complete later.
    pub async fn await_result(&self, id: TaskId, timeout: Duration) -> Result<Value, QueueError> {
        let start = Instant::now();
        let poll = Duration::from_millis(self.config.await_poll_ms);

        loop {
            {
                let task = self
                    .tasks
                    .get(&id)
                    .ok_or(QueueError::TaskNotFound { id })?;
                match task.status {
                    TaskStatus::Completed => {
                        return Ok(task.result.clone().unwrap_or(Value::Null));
                    }
                    TaskStatus::Failed => {
                        return Err(QueueError::TaskFailed {
                            id,
                            attempts: task.retry_count + 1,
                            error: task
                                .error
                                .clone()
                                .unwrap_or_else(|| "unknown error".to_string()),
                        });
                    }
                    TaskStatus::Cancelled => return Err(QueueError::Cancelled { id }),
                    TaskStatus::Pending | TaskStatus::Running => {}
                }
            }

            if start.elapsed() >= timeout {
                return Err(QueueError::Timeout { id, timeout });
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// Cancel a pending task. Running and terminal tasks are not
    /// cancellable; cancellation is checked only before dequeue.
    pub fn cancel(&self, id: TaskId) -> Result<(), QueueError> {
        let mut task = self
            .tasks
            .get_mut(&id)
            .ok_or(QueueError::TaskNotFound { id })?;
        if task.status != TaskStatus::Pending {
            return Err(QueueError::NotCancellable { id });
        }
        task.status = TaskStatus::Cancelled;
        task.completed_at = Some(Utc::now());
        tracing::debug!(task_id = %id, "Task cancelled");
        Ok(())
    }

    /// Snapshot of a task's current state.
    pub fn get_task(&self, id: TaskId) -> Option<Task> {
        self.tasks.get(&id).map(|t| t.clone())
    }

    /// Per-channel pending/running/concurrency counts.
    pub fn status(&self) -> HashMap<String, ChannelStatus> {
        self.channels
            .iter()
            .map(|entry| {
                let channel = entry.value();
                let pending = channel
                    .pending
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|e| {
                        self.tasks
                            .get(&e.id)
                            .map(|t| t.status == TaskStatus::Pending)
                            .unwrap_or(false)
                    })
                    .count();
                (
                    entry.key().clone(),
                    ChannelStatus {
                        pending,
                        running: channel.in_flight.load(Ordering::SeqCst),
                        concurrency: channel.concurrency,
                    },
                )
            })
            .collect()
    }

    /// Stop all worker loops. Pending tasks transition to cancelled;
    /// running tasks finish their current attempt.
    pub fn shutdown(&self) {
        tracing::info!("Dispatch queue shutting down");
        self.cancel.cancel();
    }
}

/// One loop per channel: while below the concurrency limit, pop the
/// highest-priority pending task and start it without blocking the loop.
async fn worker_loop(
    channel: Arc<Channel>,
    tasks: Arc<DashMap<TaskId, Task>>,
    poll: Duration,
    cancel: CancellationToken,
) {
    tracing::debug!(channel = %channel.name, "Channel worker started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                cancel_pending(&channel, &tasks);
                break;
            }
            _ = tokio::time::sleep(poll) => {
                dispatch_ready(&channel, &tasks);
            }
        }
    }

    tracing::debug!(channel = %channel.name, "Channel worker stopped");
}

/// Start ready tasks until the channel is saturated or no work remains.
///
/// Only the worker loop calls this, so the load-then-increment on the
/// in-flight counter has a single writer and cannot overshoot the limit.
fn dispatch_ready(channel: &Arc<Channel>, tasks: &Arc<DashMap<TaskId, Task>>) {
    while channel.in_flight.load(Ordering::SeqCst) < channel.concurrency {
        let entry = match channel.pop_pending() {
            Some(entry) => entry,
            None => break,
        };

        // Cancellation is advisory and checked here, before dequeue.
        let started = match tasks.get_mut(&entry.id) {
            Some(mut task) if task.status == TaskStatus::Pending => {
                task.status = TaskStatus::Running;
                task.started_at = Some(Utc::now());
                true
            }
            _ => false,
        };
        if !started {
            continue;
        }

        channel.in_flight.fetch_add(1, Ordering::SeqCst);
        metrics::gauge!("relay_queue_in_flight", "channel" => channel.name.clone())
            .set(channel.in_flight.load(Ordering::SeqCst) as f64);

        tokio::spawn(run_task(
            Arc::clone(channel),
            Arc::clone(tasks),
            entry.id,
        ));
    }
}

/// Execute one task attempt and apply the outcome.
///
/// The handler runs in its own tokio task so a panic is contained as a
/// JoinError and treated as a failed attempt; the worker loop keeps
/// servicing the channel either way.
async fn run_task(channel: Arc<Channel>, tasks: Arc<DashMap<TaskId, Task>>, id: TaskId) {
    let (command, payload) = match tasks.get(&id) {
        Some(task) => (task.command.clone(), task.payload.clone()),
        None => {
            channel.in_flight.fetch_sub(1, Ordering::SeqCst);
            return;
        }
    };

    let handler = Arc::clone(&channel.handler);
    let outcome = tokio::spawn(async move { handler.execute(&command, &payload).await }).await;
    let result = match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(error.to_string()),
        Err(join_error) => Err(format!("handler panicked: {}", join_error)),
    };

    match result {
        Ok(value) => {
            if let Some(mut task) = tasks.get_mut(&id) {
                task.status = TaskStatus::Completed;
                task.result = Some(value);
                task.completed_at = Some(Utc::now());
            }
            metrics::counter!("relay_tasks_completed", "channel" => channel.name.clone())
                .increment(1);
            tracing::debug!(channel = %channel.name, task_id = %id, "Task completed");
        }
        Err(error) => {
            let retry = {
                match tasks.get_mut(&id) {
                    Some(mut task) => {
                        if task.retry_count < task.max_retries {
                            task.retry_count += 1;
                            task.status = TaskStatus::Pending;
                            task.started_at = None;
                            task.error = Some(error.clone());
                            Some(task.priority)
                        } else {
                            task.status = TaskStatus::Failed;
                            task.error = Some(error.clone());
                            task.completed_at = Some(Utc::now());
                            None
                        }
                    }
                    None => None,
                }
            };

            match retry {
                Some(priority) => {
                    // Front of the band: the retry runs before tasks
                    // submitted after it, bounding its latency inflation.
                    channel.insert_pending(PendingEntry { id, priority }, true);
                    metrics::counter!("relay_task_retries", "channel" => channel.name.clone())
                        .increment(1);
                    tracing::warn!(
                        channel = %channel.name,
                        task_id = %id,
                        error = %error,
                        "Task attempt failed, requeued"
                    );
                }
                None => {
                    metrics::counter!("relay_tasks_failed", "channel" => channel.name.clone())
                        .increment(1);
                    tracing::warn!(
                        channel = %channel.name,
                        task_id = %id,
                        error = %error,
                        "Task failed, retries exhausted"
                    );
                }
            }
        }
    }

    channel.in_flight.fetch_sub(1, Ordering::SeqCst);
}

/// Drain the pending list on shutdown, cancelling anything still pending.
fn cancel_pending(channel: &Arc<Channel>, tasks: &Arc<DashMap<TaskId, Task>>) {
    let drained: Vec<PendingEntry> = channel.pending.lock().unwrap().drain(..).collect();
    for entry in drained {
        if let Some(mut task) = tasks.get_mut(&entry.id) {
            if task.status == TaskStatus::Pending {
                task.status = TaskStatus::Cancelled;
                task.completed_at = Some(Utc::now());
            }
        }
    }
}

//! Queue seam and in-process worker.

use crate::dispatcher::Dispatcher;
use crate::error::SyncError;
use apinotify_model::TaskId;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Fire-and-forget task queue.
///
/// The queue must eventually deliver each enqueued id to a worker
/// calling `Dispatcher::execute` at least once; no ordering or
/// exactly-once guarantee is required. Production embedders back this
/// with their job system.
pub trait TaskQueue: Send + Sync {
    /// Enqueues a task for execution.
    fn enqueue(&self, id: TaskId);

    /// Enqueues a task after an advisory delay.
    ///
    /// Queues without scheduling support may deliver immediately; the
    /// retry bound does not depend on the delay being honored.
    fn enqueue_after(&self, id: TaskId, _delay: Duration) {
        self.enqueue(id);
    }
}

/// In-memory FIFO queue for tests and single-process embedding.
#[derive(Default)]
pub struct MemoryQueue {
    items: Mutex<VecDeque<TaskId>>,
}

impl MemoryQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the next task id, if any.
    #[must_use]
    pub fn pop(&self) -> Option<TaskId> {
        self.items.lock().pop_front()
    }

    /// Returns the number of queued ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl TaskQueue for MemoryQueue {
    fn enqueue(&self, id: TaskId) {
        self.items.lock().push_back(id);
    }
}

/// Drains a [`MemoryQueue`] through a dispatcher.
///
/// Follows re-enqueued retries until the queue is idle, so a run covers
/// every task to completion or exhaustion. Exhaustion errors are
/// collected and returned; they are the alerting surface.
pub struct Worker {
    queue: Arc<MemoryQueue>,
    dispatcher: Arc<Dispatcher>,
}

impl Worker {
    /// Creates a worker over the given queue and dispatcher.
    pub fn new(queue: Arc<MemoryQueue>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { queue, dispatcher }
    }

    /// Executes queued tasks until the queue is empty.
    pub fn run_until_idle(&self) -> Vec<SyncError> {
        let mut failures = Vec::new();
        while let Some(id) = self.queue.pop() {
            if let Err(err) = self.dispatcher.execute(id) {
                tracing::warn!(task = %id, error = %err, "task execution failed");
                failures.push(err);
            }
        }
        failures
    }
}

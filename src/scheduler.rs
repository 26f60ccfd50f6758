//! Deferred execution of assistant replies.
//!
//! The conversation only talks to the [`Scheduler`] port. At runtime replies
//! are driven by tokio timers; tests drive them with a [`VirtualClock`].
//! Tasks are filed under a key (the conversation id) so one scheduler can
//! serve many conversations and cancel them independently.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::error::{ChatError, Result};

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    /// Runs `task` once after `delay`, unless `key` is cancelled first.
    fn schedule(&self, key: &str, delay: Duration, task: Task);

    /// Drops every task filed under `key` that has not fired yet.
    /// Tasks under other keys are untouched.
    fn cancel(&self, key: &str);
}

/// Timer-backed scheduler. Every key gets a child of the root token, so
/// cancelling a key stops only that conversation's timers.
pub struct TokioScheduler {
    handle: Handle,
    root: CancellationToken,
    tokens: Mutex<HashMap<String, CancellationToken>>,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        TokioScheduler {
            handle,
            root: CancellationToken::new(),
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Binds to the runtime the caller is running on.
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current().map_err(|e| ChatError::Runtime(e.to_string()))?;
        Ok(Self::new(handle))
    }

    /// Stops every pending timer. Later `schedule` calls are cancelled
    /// immediately.
    pub fn shutdown(&self) {
        self.root.cancel();
        self.tokens().clear();
    }

    fn tokens(&self) -> MutexGuard<'_, HashMap<String, CancellationToken>> {
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, key: &str, delay: Duration, task: Task) {
        let token = self
            .tokens()
            .entry(key.to_string())
            .or_insert_with(|| self.root.child_token())
            .clone();

        self.handle.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => task(),
                _ = token.cancelled() => {
                    log::debug!("[Scheduler] Pending task cancelled");
                }
            }
        });
    }

    fn cancel(&self, key: &str) {
        if let Some(token) = self.tokens().remove(key) {
            token.cancel();
        }
    }
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), (String, Task)>,
}

/// Manually advanced clock for deterministic timing.
#[derive(Default)]
pub struct VirtualClock {
    state: Mutex<ClockState>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.state().now
    }

    pub fn pending(&self) -> usize {
        self.state().queue.len()
    }

    pub fn pending_for(&self, key: &str) -> usize {
        self.state().queue.values().filter(|(k, _)| k == key).count()
    }

    /// Moves time forward by `by`, running every task that comes due, in
    /// due-time order and then scheduling order. Tasks scheduled while
    /// advancing run too if they fall inside the window.
    pub fn advance(&self, by: Duration) {
        let target = self.state().now + by;

        loop {
            let next = {
                let mut state = self.state();
                let due = state
                    .queue
                    .keys()
                    .next()
                    .copied()
                    .filter(|(at, _)| *at <= target);
                due.and_then(|key| {
                    state.now = key.0;
                    state.queue.remove(&key)
                })
            };

            // Lock released so the task may schedule more work.
            match next {
                Some((_, task)) => task(),
                None => break,
            }
        }

        self.state().now = target;
    }

    fn state(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for VirtualClock {
    fn schedule(&self, key: &str, delay: Duration, task: Task) {
        let mut state = self.state();
        let at = state.now + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.queue.insert((at, seq), (key.to_string(), task));
    }

    fn cancel(&self, key: &str) {
        let dropped: Vec<(String, Task)> = {
            let mut state = self.state();
            let (dropped, kept): (BTreeMap<_, _>, BTreeMap<_, _>) = std::mem::take(&mut state.queue)
                .into_iter()
                .partition(|(_, (k, _))| k == key);
            state.queue = kept;
            dropped.into_values().collect()
        };
        drop(dropped);
    }
}

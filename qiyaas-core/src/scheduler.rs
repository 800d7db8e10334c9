use std::time::Duration;

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskToken(u64);

#[derive(Debug)]
struct Scheduled<T> {
    due: Duration,
    token: TaskToken,
    task: T,
}

/// Deferred tasks on a virtual clock.
///
/// Nothing runs on its own: the owner calls `advance` with the time that
/// passed and gets back whatever came due, earliest first. Tasks due at the
/// same instant come back in the order they were scheduled.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    now: Duration,
    next_token: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_token: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskToken {
        let token = TaskToken(self.next_token);
        self.next_token += 1;
        self.pending.push(Scheduled {
            due: self.now + delay,
            token,
            task,
        });
        token
    }

    /// Returns true if the task was still pending
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.token != token);
        self.pending.len() != before
    }

    /// Drop every pending task matching the predicate
    pub fn cancel_where(&mut self, predicate: impl Fn(&T) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|scheduled| !predicate(&scheduled.task));
        before - self.pending.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    /// Move the clock forward and take every task now due
    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        self.now += elapsed;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|scheduled| scheduled.due <= now);
        self.pending = waiting;

        // Tokens grow monotonically, so they break ties in scheduling order
        due.sort_by_key(|scheduled| (scheduled.due, scheduled.token));
        due.into_iter().map(|scheduled| scheduled.task).collect()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, token: TaskToken) -> bool {
        self.pending.iter().any(|scheduled| scheduled.token == token)
    }

    /// Time until the earliest pending task is due
    pub fn next_due_in(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|scheduled| scheduled.due.saturating_sub(self.now))
            .min()
    }
}

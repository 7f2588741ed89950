//! Cooperative frame scheduler with explicit cancellation.
//!
//! Replaces a host animation-frame callback. The scheduler only needs a
//! monotonically increasing clock; the host decides how often `run_frame`
//! is called.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait FrameClock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now.set(self.now.get() + Duration::from_millis(ms));
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Handle returned by [`Scheduler::schedule_repeating`].
///
/// Cancelling is immediate: the callback never runs again, not even later
/// in a frame that is already in progress.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Frame callback; receives the milliseconds elapsed since its previous run.
pub type FrameCallback = Box<dyn FnMut(f64)>;

struct Task {
    token: CancellationToken,
    last_run: Option<Duration>,
    callback: FrameCallback,
}

pub struct Scheduler<C: FrameClock> {
    clock: C,
    tasks: Vec<Task>,
    next_id: u64,
}

impl<C: FrameClock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Registers a callback invoked on every frame until cancelled.
    pub fn schedule_repeating(&mut self, callback: impl FnMut(f64) + 'static) -> CancellationToken {
        let token = CancellationToken {
            id: self.next_id,
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        self.next_id += 1;
        self.tasks.push(Task {
            token: token.clone(),
            last_run: None,
            callback: Box::new(callback),
        });
        log::debug!("SCHEDULER: task {} scheduled", token.id);
        token
    }

    /// Runs one frame. Returns how many callbacks fired.
    pub fn run_frame(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        for task in self.tasks.iter_mut() {
            if task.token.is_cancelled() {
                continue;
            }
            // First run has no previous frame to measure against.
            let dt = task
                .last_run
                .map(|last| now.saturating_sub(last).as_nanos() as f64 / 1_000_000.0)
                .unwrap_or(0.0);
            task.last_run = Some(now);
            (task.callback)(dt);
            fired += 1;
        }
        self.tasks.retain(|task| !task.token.is_cancelled());
        fired
    }

    /// Number of tasks not yet cancelled.
    pub fn live_tasks(&self) -> usize {
        self.tasks
            .iter()
            .filter(|task| !task.token.is_cancelled())
            .count()
    }

    pub fn cancel_all(&mut self) {
        for task in &self.tasks {
            task.token.cancel();
        }
        self.tasks.clear();
    }
}

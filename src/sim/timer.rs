//! Cancellable timer tasks on the simulation clock
//!
//! Tasks are stamped with the generation current when they were scheduled.
//! `reset` bumps the generation and drops the queue, so nothing scheduled
//! before a level load can run after it.

/// Shortest period a repeating task may have
pub const MIN_PERIOD_MS: f64 = 1.0;

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// What to do when a task comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Spawn one water particle (repeating)
    EmitWater,
    /// Faucet runs dry; start settling
    StopFlow,
    /// Judge the round
    CheckEnd,
}

/// A task that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub kind: TimerKind,
    pub generation: u32,
}

#[derive(Debug, Clone)]
struct Task {
    id: TimerId,
    kind: TimerKind,
    generation: u32,
    due_ms: f64,
    period_ms: Option<f64>,
}

/// Timer queue driven by the fixed-step loop
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: f64,
    horizon_ms: f64,
    generation: u32,
    next_id: u64,
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulation clock (milliseconds)
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Number of tasks still queued
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Run `kind` once, `delay_ms` from now
    pub fn schedule_once(&mut self, delay_ms: f64, kind: TimerKind) -> TimerId {
        self.push(delay_ms, None, kind)
    }

    /// Run `kind` every `period_ms`, first time one period from now.
    /// Periods below [`MIN_PERIOD_MS`] (and NaN) are raised to it, otherwise
    /// the task would never leave the window it fires in.
    pub fn schedule_every(&mut self, period_ms: f64, kind: TimerKind) -> TimerId {
        let period_ms = if period_ms >= MIN_PERIOD_MS {
            period_ms
        } else {
            log::warn!(
                "{:?} period {} ms raised to {} ms",
                kind,
                period_ms,
                MIN_PERIOD_MS
            );
            MIN_PERIOD_MS
        };
        self.push(period_ms, Some(period_ms), kind)
    }

    fn push(&mut self, delay_ms: f64, period_ms: Option<f64>, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            kind,
            generation: self.generation,
            due_ms: self.now_ms + delay_ms,
            period_ms,
        });
        id
    }

    /// Returns false if the task already ran (one-shot) or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Drop every task and start a new generation
    pub fn reset(&mut self) {
        self.tasks.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Open a window of `dt_ms`; drain it with [`Scheduler::pop_due`]
    pub fn advance(&mut self, dt_ms: f64) {
        self.horizon_ms = self.now_ms + dt_ms.max(0.0);
    }

    /// Next task due inside the current window, earliest first, ties in
    /// scheduling order. Moves the clock to the task's due time. Tasks
    /// scheduled while draining are eligible if they fall inside the window.
    /// When nothing is left the clock moves to the end of the window.
    pub fn pop_due(&mut self) -> Option<Fired> {
        let next = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= self.horizon_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(index, _)| index);

        let Some(index) = next else {
            self.now_ms = self.now_ms.max(self.horizon_ms);
            return None;
        };

        let task = &mut self.tasks[index];
        self.now_ms = self.now_ms.max(task.due_ms);
        let fired = Fired {
            id: task.id,
            kind: task.kind,
            generation: task.generation,
        };

        match task.period_ms {
            Some(period) => task.due_ms += period,
            None => {
                self.tasks.swap_remove(index);
            }
        }

        Some(fired)
    }
}

//! Repeating module timers
//!
//! The module asks for a timer with a function-table index and an opaque
//! argument. The host never looks inside the index: each tick is delivered by
//! calling the module's `call` trampoline with the pair.
//!
//! The queue runs on an explicit clock. The runtime advances it and then pops
//! due ticks one at a time, invoking the trampoline between pops, so a
//! callback that cancels another timer stops that timer's pending tick too.

use std::time::{Duration, Instant};

use hashbrown::HashMap;

/// Host timer identifier returned to the module
pub type TimerId = u32;

/// A live timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerRegistration {
    pub function_index: u32,
    pub argument: u32,
    pub interval: Duration,
    next_due: Instant,
}

impl TimerRegistration {
    pub fn next_due(&self) -> Instant {
        self.next_due
    }
}

/// A tick ready to be delivered through the trampoline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub id: TimerId,
    pub function_index: u32,
    pub argument: u32,
}

/// All timers of one module instance
#[derive(Debug)]
pub struct TimerQueue {
    timers: HashMap<TimerId, TimerRegistration>,
    next_id: TimerId,
    now: Instant,
    min_interval: Duration,
}

impl TimerQueue {
    /// Create a queue whose clock starts now
    pub fn new(min_interval: Duration) -> Self {
        Self::with_clock(Instant::now(), min_interval)
    }

    /// Create a queue whose clock starts at `start`
    pub fn with_clock(start: Instant, min_interval: Duration) -> Self {
        Self {
            timers: HashMap::new(),
            next_id: 1,
            now: start,
            min_interval: min_interval.max(Duration::from_millis(1)),
        }
    }

    /// Current queue time
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Move the clock forward; earlier instants are ignored
    pub fn advance(&mut self, now: Instant) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Register a repeating timer; the first tick is one interval from now
    pub fn start(&mut self, function_index: u32, interval_ms: i32, argument: u32) -> TimerId {
        let requested = Duration::from_millis(interval_ms.max(0) as u64);
        let interval = requested.max(self.min_interval);
        if interval != requested {
            tracing::warn!(
                "timer interval {}ms raised to {}ms",
                interval_ms,
                interval.as_millis()
            );
        }

        let id = self.next_id;
        self.next_id += 1;
        self.timers.insert(
            id,
            TimerRegistration {
                function_index,
                argument,
                interval,
                next_due: self.now + interval,
            },
        );
        id
    }

    /// Stop a timer. Returns false if it was not running.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn get(&self, id: TimerId) -> Option<&TimerRegistration> {
        self.timers.get(&id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|timer| timer.next_due).min()
    }

    /// Take the next due tick and reschedule its timer
    ///
    /// Ticks come out in (deadline, id) order. A timer fires at most once per
    /// clock value: it is rescheduled one interval after the current time, so
    /// missed ticks are not replayed in a burst.
    pub fn pop_due(&mut self) -> Option<TimerTick> {
        let now = self.now;
        let (&id, timer) = self
            .timers
            .iter_mut()
            .filter(|(_, timer)| timer.next_due <= now)
            .min_by_key(|(id, timer)| (timer.next_due, **id))?;
        timer.next_due = now + timer.interval;
        Some(TimerTick {
            id,
            function_index: timer.function_index,
            argument: timer.argument,
        })
    }
}

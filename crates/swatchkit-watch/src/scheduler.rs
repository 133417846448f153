//! Rebuild scheduling as a pure state machine.
//!
//! The scheduler never reads a clock. Every transition takes the current
//! [`Instant`] from the caller, which keeps the debounce and coalescing
//! rules testable without real timers.

use std::time::{Duration, Instant};

/// Where the scheduler is between builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing pending
    Idle,

    /// A build starts once `deadline` passes
    Scheduled { deadline: Instant },

    /// A build is running; `dirty` records changes seen meanwhile
    Building { dirty: bool },
}

/// Debounced, at-most-one-in-flight rebuild scheduler.
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: State,
    debounce: Duration,
    output_seen: bool,
}

impl Scheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: State::Idle,
            debounce,
            output_seen: false,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_building(&self) -> bool {
        matches!(self.state, State::Building { .. })
    }

    /// When the pending build is due, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            State::Scheduled { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// A watched file changed. Restarts the quiet period, or marks the
    /// running build dirty.
    pub fn on_change(&mut self, now: Instant) {
        self.state = match self.state {
            State::Idle | State::Scheduled { .. } => State::Scheduled {
                deadline: now + self.debounce,
            },
            State::Building { .. } => State::Building { dirty: true },
        };
    }

    /// Result of the output-directory poll.
    ///
    /// Schedules an immediate rebuild when the output directory was present
    /// before and has since disappeared while idle. Returns whether a
    /// recovery build was scheduled.
    pub fn on_poll(&mut self, now: Instant, output_exists: bool) -> bool {
        if output_exists {
            self.output_seen = true;
            return false;
        }

        if self.output_seen && self.state == State::Idle {
            self.output_seen = false;
            self.state = State::Scheduled { deadline: now };
            return true;
        }

        false
    }

    /// Start the pending build if its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state {
            State::Scheduled { deadline } if now >= deadline => {
                self.state = State::Building { dirty: false };
                true
            }
            _ => false,
        }
    }

    /// The running build returned. Changes seen during the build schedule
    /// exactly one follow-up.
    pub fn finish(&mut self, now: Instant, output_exists: bool) {
        self.output_seen = output_exists;
        self.state = match self.state {
            State::Building { dirty: true } => State::Scheduled {
                deadline: now + self.debounce,
            },
            State::Building { dirty: false } => State::Idle,
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(100);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn builds_after_quiet_period() {
        let t0 = Instant::now();
        let mut s = Scheduler::new(DEBOUNCE);

        s.on_change(t0);
        assert_eq!(s.deadline(), Some(t0 + DEBOUNCE));
        assert!(!s.tick(t0 + ms(99)));
        assert!(s.tick(t0 + ms(100)));
        assert!(s.is_building());
    }

    #[test]
    fn burst_of_changes_coalesces_into_one_build() {
        let t0 = Instant::now();
        let mut s = Scheduler::new(DEBOUNCE);

        for i in 0..10 {
            s.on_change(t0 + ms(i * 20));
            assert!(!s.tick(t0 + ms(i * 20 + 50)));
        }

        let last = t0 + ms(180);
        assert_eq!(s.deadline(), Some(last + DEBOUNCE));
        assert!(s.tick(last + DEBOUNCE));
        assert!(!s.tick(last + DEBOUNCE + ms(1)));

        s.finish(last + ms(300), true);
        assert_eq!(s.state(), State::Idle);
        assert!(!s.tick(last + ms(1000)));
    }

    #[test]
    fn change_during_build_schedules_one_follow_up() {
        let t0 = Instant::now();
        let mut s = Scheduler::new(DEBOUNCE);

        s.on_change(t0);
        assert!(s.tick(t0 + DEBOUNCE));

        s.on_change(t0 + ms(150));
        s.on_change(t0 + ms(160));
        assert_eq!(s.state(), State::Building { dirty: true });
        assert!(!s.tick(t0 + ms(170)));

        let done = t0 + ms(200);
        s.finish(done, true);
        assert_eq!(s.deadline(), Some(done + DEBOUNCE));
        assert!(s.tick(done + DEBOUNCE));
        s.finish(done + ms(200), true);
        assert_eq!(s.state(), State::Idle);
    }

    #[test]
    fn missing_output_triggers_recovery_once() {
        let t0 = Instant::now();
        let mut s = Scheduler::new(DEBOUNCE);

        assert!(!s.on_poll(t0, true));
        assert!(s.on_poll(t0 + ms(1000), false));
        assert_eq!(s.deadline(), Some(t0 + ms(1000)));
        assert!(s.tick(t0 + ms(1000)));

        // Build failed to recreate it: no retry loop.
        s.finish(t0 + ms(1100), false);
        assert!(!s.on_poll(t0 + ms(2000), false));
        assert_eq!(s.state(), State::Idle);
    }

    #[test]
    fn poll_does_not_interrupt_a_build() {
        let t0 = Instant::now();
        let mut s = Scheduler::new(DEBOUNCE);

        s.on_poll(t0, true);
        s.on_change(t0);
        assert!(s.tick(t0 + DEBOUNCE));

        assert!(!s.on_poll(t0 + ms(150), false));
        assert_eq!(s.state(), State::Building { dirty: false });
    }

    #[test]
    fn output_never_seen_is_not_recovered() {
        let mut s = Scheduler::new(DEBOUNCE);
        assert!(!s.on_poll(Instant::now(), false));
        assert_eq!(s.state(), State::Idle);
    }
}

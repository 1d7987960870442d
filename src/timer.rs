use std::time::{Duration, Instant};

// timers and display flushes
pub const TIMER_DEC_PER_SECOND: u32 = 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    pub fn get(&self) -> u8 {
        self.count
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }

    pub fn step(&mut self) {
        self.count = self.count.saturating_sub(1);
    }
}

/// Tells a cooperative loop how many steps of a fixed-rate activity are due.
///
/// Deadlines advance by whole periods from the start time, so the rate holds no
/// matter how often `due` is polled. After a stall longer than `max_catch_up`
/// periods the backlog is dropped rather than replayed in a burst.
#[derive(Debug, Clone)]
pub struct Cadence {
    period: Duration,
    next: Instant,
    max_catch_up: u32,
}

impl Cadence {
    pub fn new(hz: u32, now: Instant) -> Self {
        let period = Duration::from_secs(1) / hz.max(1);
        Self {
            period,
            next: now + period,
            max_catch_up: 4,
        }
    }

    pub fn timers(now: Instant) -> Self {
        Self::new(TIMER_DEC_PER_SECOND, now)
    }

    pub fn with_max_catch_up(mut self, steps: u32) -> Self {
        self.max_catch_up = steps.max(1);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    // steps whose deadline has passed
    pub fn due(&mut self, now: Instant) -> u32 {
        let mut steps = 0;
        while self.next <= now {
            steps += 1;
            self.next += self.period;
            if steps == self.max_catch_up {
                if self.next <= now {
                    // too far behind, start over from here
                    self.next = now + self.period;
                }
                break;
            }
        }
        steps
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }
}

/// The two cadences a running machine is driven by: instructions at a chosen rate,
/// timers and redraws at 60 Hz.
#[derive(Debug, Clone)]
pub struct Clock {
    pub cpu: Cadence,
    pub timers: Cadence,
}

impl Clock {
    pub fn new(instructions_per_second: u32, now: Instant) -> Self {
        // let the cpu catch up on a whole frame's worth of instructions
        let per_frame = instructions_per_second / TIMER_DEC_PER_SECOND + 1;
        Self {
            cpu: Cadence::new(instructions_per_second, now).with_max_catch_up(per_frame * 2),
            timers: Cadence::timers(now),
        }
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.cpu.until_next(now).min(self.timers.until_next(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_floors_at_zero() {
        let mut t = Timer::new(2);
        t.step();
        assert_eq!(t.get(), 1);
        assert!(t.is_active());
        t.step();
        t.step();
        assert_eq!(t.get(), 0);
        assert!(!t.is_active());
    }

    #[test]
    fn cadence_counts_elapsed_periods() {
        let start = Instant::now();
        let mut c = Cadence::new(100, start);
        assert_eq!(c.period(), Duration::from_millis(10));
        assert_eq!(c.due(start), 0);
        assert_eq!(c.due(start + Duration::from_millis(9)), 0);
        assert_eq!(c.due(start + Duration::from_millis(10)), 1);
        assert_eq!(c.due(start + Duration::from_millis(15)), 0);
        assert_eq!(c.due(start + Duration::from_millis(30)), 2);
        assert_eq!(c.until_next(start + Duration::from_millis(35)), Duration::from_millis(5));
    }

    #[test]
    fn cadence_drops_backlog_after_stall() {
        let start = Instant::now();
        let mut c = Cadence::new(100, start).with_max_catch_up(3);
        let late = start + Duration::from_secs(1);
        assert_eq!(c.due(late), 3);
        assert_eq!(c.due(late), 0);
        assert_eq!(c.due(late + Duration::from_millis(10)), 1);
    }
}

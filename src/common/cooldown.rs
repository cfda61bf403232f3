//! Cooldown gates and one-shot deadlines.
//!
//! Every delayed effect in the game (reload, shield expiry, attack strike,
//! banner removal, grace windows) is a stored instant on the fixed clock that
//! the owning system checks once per tick. No callbacks, no real-time timers.

use std::time::Duration;

/// Opens again `period` after it was last taken. Starts open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CooldownGate {
    last: Option<Duration>,
    period: Duration,
}

impl CooldownGate {
    pub const fn new(period: Duration) -> Self {
        Self { last: None, period }
    }

    #[inline]
    pub fn is_ready(&self, now: Duration) -> bool {
        self.last
            .is_none_or(|last| now.saturating_sub(last) >= self.period)
    }

    /// Take the gate if it is open. Returns whether it was taken.
    pub fn try_take(&mut self, now: Duration) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.last = Some(now);
        true
    }

    #[inline]
    pub fn last(&self) -> Option<Duration> {
        self.last
    }
}

/// An optional instant at which something happens exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Duration>);

impl Deadline {
    pub fn schedule(&mut self, now: Duration, after: Duration) {
        self.0 = Some(now + after);
    }

    pub fn cancel(&mut self) {
        self.0 = None;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }

    /// Pending and not yet reached. Used for windows that simply run out.
    #[inline]
    pub fn is_active(&self, now: Duration) -> bool {
        self.0.is_some_and(|at| now < at)
    }

    #[inline]
    pub fn at(&self) -> Option<Duration> {
        self.0
    }

    /// Clears and reports `true` once `now` reaches the deadline.
    pub fn fire(&mut self, now: Duration) -> bool {
        match self.0 {
            Some(at) if now >= at => {
                self.0 = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn gate_starts_open_and_reopens_after_period() {
        let mut gate = CooldownGate::new(ms(1000));
        assert!(gate.try_take(ms(2500)));
        assert!(!gate.try_take(ms(3499)));
        assert!(gate.is_ready(ms(3500)));
        assert!(gate.try_take(ms(3500)));
        assert_eq!(gate.last(), Some(ms(3500)));
    }

    #[test]
    fn deadline_fires_exactly_once() {
        let mut d = Deadline::default();
        d.schedule(ms(100), ms(500));
        assert!(!d.fire(ms(599)));
        assert!(d.fire(ms(600)));
        assert!(!d.fire(ms(700)));
        assert!(!d.is_pending());
    }

    #[test]
    fn window_is_active_until_reached() {
        let mut d = Deadline::default();
        assert!(!d.is_active(ms(0)));
        d.schedule(ms(1000), ms(1500));
        assert!(d.is_active(ms(2499)));
        assert!(!d.is_active(ms(2500)));
    }

    #[test]
    fn cancelled_deadline_never_fires() {
        let mut d = Deadline::default();
        d.schedule(ms(0), ms(10));
        d.cancel();
        assert!(!d.fire(ms(1_000)));
    }
}

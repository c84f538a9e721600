//! Poll scheduling: auto-refresh gate, rate-limited status fetches and the
//! sub-second countdown shown in the header.
//!
//! Time is always passed in, so everything here runs against fake clocks.

use std::time::{Duration, Instant};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(20_000);
pub const DISPLAY_TICK: Duration = Duration::from_millis(41);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Not logged in / not started yet.
    Idle,
    AutoRefreshOn,
    AutoRefreshOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchReason {
    /// Interval elapsed with auto-refresh on.
    Scheduled,
    /// Auto-refresh was just switched on.
    Eager,
    /// The user asked for it; ignores the auto-refresh gate.
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Live { secs: u64, millis: u32 },
    Disabled,
}

impl Countdown {
    pub fn label(&self) -> String {
        match self {
            Countdown::Live { secs, millis } => format!("{secs}.{millis:03}"),
            Countdown::Disabled => "--".into(),
        }
    }
}

#[derive(Debug)]
pub struct PollScheduler {
    interval: Duration,
    state: PollState,
    last_update: Instant,
    in_flight: bool,
}

impl PollScheduler {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            state: PollState::Idle,
            last_update: now,
            in_flight: false,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn auto_refresh(&self) -> bool {
        self.state == PollState::AutoRefreshOn
    }

    /// Leave `Idle` with auto-refresh on and request the first fetch.
    pub fn start(&mut self, now: Instant) -> FetchReason {
        self.set_auto_refresh(true, now);
        self.in_flight = true;
        FetchReason::Eager
    }

    /// Back to `Idle` (logout).
    pub fn stop(&mut self) {
        self.state = PollState::Idle;
        self.in_flight = false;
    }

    /// Switching on fetches eagerly and restarts the countdown.
    pub fn set_auto_refresh(&mut self, on: bool, now: Instant) -> Option<FetchReason> {
        if on {
            let was_on = self.state == PollState::AutoRefreshOn;
            self.state = PollState::AutoRefreshOn;
            self.last_update = now;
            if was_on {
                return None;
            }
            self.in_flight = true;
            Some(FetchReason::Eager)
        } else {
            self.state = PollState::AutoRefreshOff;
            None
        }
    }

    pub fn toggle(&mut self, now: Instant) -> Option<FetchReason> {
        let on = self.state != PollState::AutoRefreshOn;
        self.set_auto_refresh(on, now)
    }

    /// Coarse check, safe to call on every display tick. Fires at most once
    /// per interval and never while auto-refresh is off.
    pub fn poll_due(&mut self, now: Instant) -> Option<FetchReason> {
        if self.state != PollState::AutoRefreshOn || self.in_flight {
            return None;
        }
        if now.saturating_duration_since(self.last_update) >= self.interval {
            // restart the window now so a slow response cannot cause a burst
            self.last_update = now;
            self.in_flight = true;
            return Some(FetchReason::Scheduled);
        }
        None
    }

    /// Explicit refresh always runs.
    pub fn manual(&mut self) -> FetchReason {
        self.in_flight = true;
        FetchReason::Manual
    }

    /// A status fetch finished; `ok` resets the countdown.
    pub fn complete(&mut self, ok: bool, now: Instant) {
        self.in_flight = false;
        if ok {
            self.last_update = now;
        }
    }

    pub fn countdown(&self, now: Instant) -> Countdown {
        if self.state != PollState::AutoRefreshOn {
            return Countdown::Disabled;
        }
        let elapsed = now.saturating_duration_since(self.last_update);
        let remaining = self.interval.saturating_sub(elapsed);
        Countdown::Live {
            secs: remaining.as_secs(),
            millis: remaining.subsec_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn start_fetches_eagerly() {
        let t0 = Instant::now();
        let mut s = PollScheduler::new(DEFAULT_INTERVAL, t0);
        assert_eq!(s.state(), PollState::Idle);
        assert_eq!(s.start(t0), FetchReason::Eager);
        assert!(s.auto_refresh());
    }

    #[test]
    fn fires_once_per_interval_under_fast_ticks() {
        let t0 = Instant::now();
        let mut s = PollScheduler::new(ms(1000), t0);
        s.start(t0);
        s.complete(true, t0);
        let mut fetches = 0;
        let mut t = t0;
        // 41ms ticks for 3.5 seconds, completing each fetch immediately
        while t < t0 + ms(3500) {
            t += DISPLAY_TICK;
            if s.poll_due(t).is_some() {
                fetches += 1;
                s.complete(true, t);
            }
        }
        assert_eq!(fetches, 3);
    }

    #[test]
    fn no_second_fetch_while_one_is_in_flight() {
        let t0 = Instant::now();
        let mut s = PollScheduler::new(ms(100), t0);
        s.start(t0);
        assert!(s.poll_due(t0 + ms(500)).is_none());
        s.complete(true, t0 + ms(500));
        assert!(s.poll_due(t0 + ms(550)).is_none());
        assert_eq!(s.poll_due(t0 + ms(600)), Some(FetchReason::Scheduled));
    }

    #[test]
    fn auto_refresh_off_suppresses_polls_but_not_manual() {
        let t0 = Instant::now();
        let mut s = PollScheduler::new(ms(1000), t0);
        s.start(t0);
        s.complete(true, t0);
        assert_eq!(s.toggle(t0), None);
        assert_eq!(s.state(), PollState::AutoRefreshOff);

        let mut fetches = 0;
        let mut t = t0;
        while t < t0 + Duration::from_secs(60) {
            t += DISPLAY_TICK;
            if s.poll_due(t).is_some() {
                fetches += 1;
            }
        }
        assert_eq!(fetches, 0);

        assert_eq!(s.manual(), FetchReason::Manual);
        s.complete(true, t);
        assert!(s.poll_due(t + ms(5000)).is_none());
    }

    #[test]
    fn toggling_on_is_eager_and_resets_countdown() {
        let t0 = Instant::now();
        let mut s = PollScheduler::new(ms(20_000), t0);
        s.set_auto_refresh(false, t0);
        let t1 = t0 + ms(7_000);
        assert_eq!(s.toggle(t1), Some(FetchReason::Eager));
        assert_eq!(
            s.countdown(t1 + ms(1_500)),
            Countdown::Live {
                secs: 18,
                millis: 500
            }
        );
    }

    #[test]
    fn countdown_clamps_and_disables() {
        let t0 = Instant::now();
        let mut s = PollScheduler::new(ms(2_000), t0);
        s.start(t0);
        assert_eq!(
            s.countdown(t0 + ms(5_000)),
            Countdown::Live { secs: 0, millis: 0 }
        );
        assert_eq!(s.countdown(t0 + ms(750)).label(), "1.250");
        s.set_auto_refresh(false, t0);
        assert_eq!(s.countdown(t0), Countdown::Disabled);
        assert_eq!(Countdown::Disabled.label(), "--");
    }

    #[test]
    fn failed_fetch_keeps_old_timestamp() {
        let t0 = Instant::now();
        let mut s = PollScheduler::new(ms(1_000), t0);
        s.start(t0);
        s.complete(false, t0 + ms(300));
        assert_eq!(s.poll_due(t0 + ms(1_000)), Some(FetchReason::Scheduled));
    }
}

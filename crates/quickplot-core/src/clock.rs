// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Frame pacing: answers "is a new frame due?" against a monotonic clock.

use std::time::{Duration, Instant};

/// Tracks the last data draw and the target frame interval.
///
/// All instants come from [`Instant`], so wall-clock adjustments never
/// stall or burst the schedule.
#[derive(Debug, Clone)]
pub struct FrameClock {
    framerate: f64,
    interval: Option<Duration>,
    last_draw: Option<Instant>,
}

impl FrameClock {
    /// Clock targeting `framerate` frames per second. Nothing has been drawn
    /// yet, so the first frame is due immediately.
    pub fn new(framerate: f64) -> Self {
        let mut clock = Self {
            framerate: 0.0,
            interval: None,
            last_draw: None,
        };
        clock.set_framerate(framerate);
        clock
    }

    /// Change the target rate. `<= 0` (or NaN) uncaps the clock so every
    /// frame is due; an infinite rate has a zero interval and is uncapped
    /// too. Rates too small for a `Duration` interval saturate.
    pub fn set_framerate(&mut self, framerate: f64) {
        self.framerate = framerate;
        self.interval = if framerate > 0.0 {
            Some(Duration::try_from_secs_f64(framerate.recip()).unwrap_or(Duration::MAX))
                .filter(|d| !d.is_zero())
        } else {
            None
        };
    }

    /// Target frames per second as last configured.
    pub fn framerate(&self) -> f64 {
        self.framerate
    }

    /// Minimum spacing between throttled draws, `None` when uncapped.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// True iff the clock is uncapped or a full interval has elapsed since
    /// the last recorded draw.
    pub fn due_for_update(&self, now: Instant) -> bool {
        self.time_until_due(now).is_zero()
    }

    /// How long until the next frame is due (zero when already due).
    pub fn time_until_due(&self, now: Instant) -> Duration {
        match (self.interval, self.last_draw) {
            (Some(interval), Some(last)) => {
                interval.saturating_sub(now.saturating_duration_since(last))
            }
            _ => Duration::ZERO,
        }
    }

    /// Stamp a completed draw.
    pub fn record_draw(&mut self, now: Instant) {
        self.last_draw = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_due_immediately() {
        let clock = FrameClock::new(60.0);
        assert!(clock.due_for_update(Instant::now()));
    }

    #[test]
    fn interval_gates_until_elapsed() {
        let mut clock = FrameClock::new(10.0);
        let t0 = Instant::now();
        clock.record_draw(t0);
        assert!(!clock.due_for_update(t0 + Duration::from_millis(10)));
        assert!(!clock.due_for_update(t0 + Duration::from_millis(99)));
        assert!(clock.due_for_update(t0 + Duration::from_millis(100)));
        assert!(clock.due_for_update(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn time_until_due_counts_down() {
        let mut clock = FrameClock::new(10.0);
        let t0 = Instant::now();
        clock.record_draw(t0);
        assert_eq!(
            clock.time_until_due(t0 + Duration::from_millis(40)),
            Duration::from_millis(60)
        );
        assert_eq!(
            clock.time_until_due(t0 + Duration::from_secs(1)),
            Duration::ZERO
        );
    }

    #[test]
    fn non_positive_rates_uncap() {
        for rate in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let mut clock = FrameClock::new(rate);
            let t0 = Instant::now();
            clock.record_draw(t0);
            assert!(clock.due_for_update(t0), "rate {rate} should be uncapped");
            assert!(clock.interval().is_none());
        }
    }

    #[test]
    fn tiny_positive_rates_stay_capped() {
        let mut clock = FrameClock::new(1e-20);
        assert_eq!(clock.interval(), Some(Duration::MAX));
        let t0 = Instant::now();
        clock.record_draw(t0);
        assert!(!clock.due_for_update(t0));
        assert!(!clock.due_for_update(t0 + Duration::from_secs(3600)));
    }

    #[test]
    fn instants_before_last_draw_are_not_due() {
        let mut clock = FrameClock::new(1.0);
        let t0 = Instant::now();
        clock.record_draw(t0 + Duration::from_secs(5));
        assert!(!clock.due_for_update(t0));
    }
}

use std::time::{Duration, Instant};

/// Timing of one redraw.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Seconds since the clock was created (sum of clamped deltas).
    pub elapsed: f64,

    pub frame_index: u64,
}

/// Produces one [`FrameTime`] per redraw.
///
/// Deltas are clamped so a stall (debugger, minimized window) does not turn into
/// a single huge step for game logic.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: f64,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub const DEFAULT_DT_MIN: Duration = Duration::from_micros(100);
    pub const DEFAULT_DT_MAX: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::with_clamps(Self::DEFAULT_DT_MIN, Self::DEFAULT_DT_MAX)
    }

    /// # Panics
    /// Panics if `dt_min > dt_max`.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        assert!(dt_min <= dt_max, "FrameClock: dt_min {dt_min:?} > dt_max {dt_max:?}");
        Self {
            last: Instant::now(),
            elapsed: 0.0,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;
        self.elapsed += dt.as_secs_f64();

        let time = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: self.elapsed,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn delta_is_clamped() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(50));
        let start = clock.last;

        let stalled = clock.tick_at(start + Duration::from_secs(3));
        assert!((stalled.dt - 0.05).abs() < 1e-6);

        let tight = clock.tick_at(start + Duration::from_secs(3));
        assert!((tight.dt - 0.001).abs() < 1e-6);
        assert!((tight.elapsed - 0.051).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "dt_min")]
    fn inverted_clamps_panic() {
        let _ = FrameClock::with_clamps(Duration::from_secs(1), Duration::from_millis(1));
    }
}

/// Accumulated animation state advanced once per frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameState {
    /// Sum of all frame deltas, in seconds.
    pub elapsed_seconds: f64,

    /// Base rotation angle in radians (one radian per second of frame time).
    pub rotation_angle: f64,
}

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f64,

    /// Host timestamp passed to the tick, in seconds.
    pub now_seconds: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,

    /// State after this tick was applied.
    pub state: FrameState,
}

/// Frame clock turning host timestamps into `FrameTime` snapshots.
///
/// The clock does not read the system time itself: the host passes a monotonic
/// timestamp to every `tick`. The first tick after construction (or `reset`)
/// only establishes the baseline and reports `dt == 0`.
///
/// Timestamps that go backwards produce `dt == 0`, so `rotation_angle` never
/// decreases.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
    frame_index: u64,
    dt_max: Option<f64>,
    state: FrameState,
}

impl FrameClock {
    /// Creates an unclamped clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock that clamps each delta to `dt_max` seconds.
    ///
    /// Useful when the host can stall for long periods (debugger, minimized window).
    pub fn with_max_dt(dt_max: f64) -> Self {
        debug_assert!(dt_max >= 0.0);
        Self {
            dt_max: Some(dt_max),
            ..Self::default()
        }
    }

    /// Drops the timestamp baseline; the next tick reports `dt == 0`.
    ///
    /// Accumulated state is kept.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Current accumulated state.
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Advances the clock to `now_seconds` and returns a new `FrameTime`.
    pub fn tick(&mut self, now_seconds: f64) -> FrameTime {
        if !now_seconds.is_finite() {
            log::warn!("frame timestamp {now_seconds} is not finite; using dt = 0");
            return self.advance(0.0, now_seconds);
        }

        let mut dt = match self.last {
            None => 0.0,
            Some(last) if now_seconds < last => {
                log::warn!("frame timestamp went backwards ({last} -> {now_seconds}); using dt = 0");
                0.0
            }
            Some(last) => now_seconds - last,
        };

        if let Some(max) = self.dt_max {
            dt = dt.min(max);
        }

        // A backwards timestamp does not move the baseline back either.
        self.last = Some(self.last.map_or(now_seconds, |last| last.max(now_seconds)));

        self.advance(dt, now_seconds)
    }

    fn advance(&mut self, dt: f64, now_seconds: f64) -> FrameTime {
        self.state.elapsed_seconds += dt;
        self.state.rotation_angle += dt;

        let ft = FrameTime {
            dt,
            now_seconds,
            frame_index: self.frame_index,
            state: self.state,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }

    /// Same as [`tick`](Self::tick) for hosts reporting milliseconds.
    pub fn tick_millis(&mut self, now_millis: f64) -> FrameTime {
        self.tick(now_millis / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_has_zero_delta() {
        let mut clock = FrameClock::new();
        let ft = clock.tick(1234.5);
        assert_eq!(ft.dt, 0.0);
        assert_eq!(ft.state.rotation_angle, 0.0);
        assert_eq!(ft.frame_index, 0);
    }

    #[test]
    fn rotation_follows_timestamps() {
        let mut clock = FrameClock::new();
        let angles: Vec<f64> = [0.0, 1.0, 2.0]
            .into_iter()
            .map(|t| clock.tick(t).state.rotation_angle)
            .collect();
        assert_eq!(angles, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn rotation_is_running_sum_of_deltas() {
        let mut clock = FrameClock::new();
        let mut sum = 0.0;
        let mut prev = 0.0;
        for t in [0.5, 0.516, 0.533, 0.533, 0.6, 1.75, 1.76, 3.0] {
            let ft = clock.tick(t);
            sum += ft.dt;
            assert!(ft.dt >= 0.0);
            assert!(ft.state.rotation_angle >= prev);
            assert!((ft.state.rotation_angle - sum).abs() < 1e-12);
            prev = ft.state.rotation_angle;
        }
        assert!((clock.state().elapsed_seconds - 2.5).abs() < 1e-12);
    }

    #[test]
    fn backwards_timestamp_yields_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick(5.0);
        clock.tick(6.0);
        let ft = clock.tick(4.0);
        assert_eq!(ft.dt, 0.0);
        assert_eq!(ft.state.rotation_angle, 1.0);

        // Baseline stays at 6.0.
        let ft = clock.tick(6.5);
        assert!((ft.dt - 0.5).abs() < 1e-12);
    }

    #[test]
    fn non_finite_timestamp_yields_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick(1.0);
        clock.tick(2.0);

        for t in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let ft = clock.tick(t);
            assert_eq!(ft.dt, 0.0);
            assert_eq!(ft.state.rotation_angle, 1.0);
        }

        // Baseline stays at 2.0.
        let ft = clock.tick(2.25);
        assert!((ft.dt - 0.25).abs() < 1e-12);
        assert!((ft.state.rotation_angle - 1.25).abs() < 1e-12);
    }

    #[test]
    fn reset_keeps_state_but_drops_baseline() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        clock.tick(2.0);
        clock.reset();

        let ft = clock.tick(60.0);
        assert_eq!(ft.dt, 0.0);
        assert_eq!(ft.state.rotation_angle, 2.0);
        assert_eq!(ft.frame_index, 2);
    }

    #[test]
    fn max_dt_clamps_stalls() {
        let mut clock = FrameClock::with_max_dt(0.25);
        clock.tick(0.0);
        let ft = clock.tick(10.0);
        assert_eq!(ft.dt, 0.25);
        assert_eq!(ft.state.rotation_angle, 0.25);
    }

    #[test]
    fn millis_are_converted() {
        let mut clock = FrameClock::new();
        clock.tick_millis(1000.0);
        let ft = clock.tick_millis(1500.0);
        assert!((ft.dt - 0.5).abs() < 1e-12);
        assert!((ft.now_seconds - 1.5).abs() < 1e-12);
    }
}

use crate::time::{FrameClock, FrameState, FrameTime};

/// "Schedule the next frame" capability supplied by the host.
///
/// The host must invoke the loop (`RenderLoop::run_frame`) at some later point
/// after a request, typically synchronized to display refresh. Repeated requests
/// before the callback fires may be coalesced.
pub trait FrameScheduler {
    fn schedule_next_frame(&mut self);
}

/// Loop lifecycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    /// No frame is requested; callbacks are ignored.
    Idle,
    /// The loop re-arms itself after every frame.
    Running,
}

/// Directive returned by a frame body.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopControl {
    Continue,
    /// Finish this frame, then stop re-arming.
    Stop,
}

/// Continuous, cancellable frame loop.
///
/// Frames are strictly sequential: `run_frame` executes at most one frame body per
/// host callback, and the next callback is only requested once that body returned.
/// Stopping is cooperative; a frame already executing completes, and callbacks that
/// arrive while `Idle` do nothing.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    clock: FrameClock,
    pending: bool,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::with_clock(FrameClock::new())
    }

    pub fn with_clock(clock: FrameClock) -> Self {
        Self {
            state: LoopState::Idle,
            clock,
            pending: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Accumulated animation state.
    pub fn frame_state(&self) -> FrameState {
        self.clock.state()
    }

    /// Idle → Running. Requests the first frame.
    ///
    /// The clock baseline is reset so time spent idle does not show up as a jump.
    /// Returns `false` if the loop was already running.
    pub fn start<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: FrameScheduler + ?Sized,
    {
        if self.state == LoopState::Running {
            return false;
        }

        self.state = LoopState::Running;
        self.clock.reset();
        self.arm(scheduler);

        log::info!("render loop started");
        true
    }

    /// Running → Idle. Suppresses re-arming; returns `false` if already idle.
    pub fn stop(&mut self) -> bool {
        if self.state == LoopState::Idle {
            return false;
        }

        self.state = LoopState::Idle;
        log::info!("render loop stopped");
        true
    }

    /// Host callback entry point.
    ///
    /// While running: ticks the clock, runs `frame` once, then requests the next
    /// frame unless the loop was stopped. Returns the `FrameTime` of the executed
    /// frame, or `None` if the loop is idle.
    pub fn run_frame<S, F>(
        &mut self,
        now_seconds: f64,
        scheduler: &mut S,
        frame: F,
    ) -> Option<FrameTime>
    where
        S: FrameScheduler + ?Sized,
        F: FnOnce(&FrameTime) -> LoopControl,
    {
        self.pending = false;

        if self.state == LoopState::Idle {
            log::trace!("frame callback while idle; ignored");
            return None;
        }

        let ft = self.clock.tick(now_seconds);

        if frame(&ft) == LoopControl::Stop {
            self.stop();
        }

        if self.state == LoopState::Running {
            self.arm(scheduler);
        }

        Some(ft)
    }

    fn arm<S>(&mut self, scheduler: &mut S)
    where
        S: FrameScheduler + ?Sized,
    {
        if self.pending {
            return;
        }
        self.pending = true;
        scheduler.schedule_next_frame();
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        requests: usize,
    }

    impl FrameScheduler for Recorder {
        fn schedule_next_frame(&mut self) {
            self.requests += 1;
        }
    }

    #[test]
    fn starts_idle() {
        let lp = RenderLoop::new();
        assert_eq!(lp.state(), LoopState::Idle);
    }

    #[test]
    fn start_requests_one_frame() {
        let mut sched = Recorder::default();
        let mut lp = RenderLoop::new();

        assert!(lp.start(&mut sched));
        assert!(!lp.start(&mut sched));
        assert_eq!(lp.state(), LoopState::Running);
        assert_eq!(sched.requests, 1);
    }

    #[test]
    fn each_callback_runs_one_frame_and_rearms() {
        let mut sched = Recorder::default();
        let mut lp = RenderLoop::new();
        lp.start(&mut sched);

        let mut frames = 0;
        for t in [0.0, 0.016, 0.033] {
            lp.run_frame(t, &mut sched, |_| {
                frames += 1;
                LoopControl::Continue
            });
        }

        assert_eq!(frames, 3);
        assert_eq!(sched.requests, 4);
    }

    #[test]
    fn frame_sees_advanced_clock() {
        let mut sched = Recorder::default();
        let mut lp = RenderLoop::new();
        lp.start(&mut sched);

        let mut angles = Vec::new();
        for t in [0.0, 1.0, 2.0] {
            lp.run_frame(t, &mut sched, |ft| {
                angles.push(ft.state.rotation_angle);
                LoopControl::Continue
            });
        }

        assert_eq!(angles, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn stop_prevents_further_frames() {
        let mut sched = Recorder::default();
        let mut lp = RenderLoop::new();
        lp.start(&mut sched);

        let mut frames = 0;
        lp.run_frame(0.0, &mut sched, |_| {
            frames += 1;
            LoopControl::Continue
        });
        assert_eq!(sched.requests, 2);

        // Host stops while a callback is already scheduled.
        assert!(lp.stop());
        let ran = lp.run_frame(0.016, &mut sched, |_| {
            frames += 1;
            LoopControl::Continue
        });

        assert!(ran.is_none());
        assert_eq!(frames, 1);
        assert_eq!(sched.requests, 2);
    }

    #[test]
    fn stop_from_inside_frame_completes_that_frame() {
        let mut sched = Recorder::default();
        let mut lp = RenderLoop::new();
        lp.start(&mut sched);

        let mut completed = false;
        let ran = lp.run_frame(0.0, &mut sched, |_| {
            completed = true;
            LoopControl::Stop
        });

        assert!(ran.is_some());
        assert!(completed);
        assert_eq!(lp.state(), LoopState::Idle);
        // Only the request from `start`; no re-arm after the stopping frame.
        assert_eq!(sched.requests, 1);
    }

    #[test]
    fn restart_does_not_jump_rotation() {
        let mut sched = Recorder::default();
        let mut lp = RenderLoop::new();
        lp.start(&mut sched);

        lp.run_frame(0.0, &mut sched, |_| LoopControl::Continue);
        lp.run_frame(1.0, &mut sched, |_| LoopControl::Stop);
        assert_eq!(lp.frame_state().rotation_angle, 1.0);

        lp.start(&mut sched);
        let ft = lp
            .run_frame(30.0, &mut sched, |_| LoopControl::Continue)
            .expect("loop is running");
        assert_eq!(ft.dt, 0.0);
        assert_eq!(ft.state.rotation_angle, 1.0);
    }

    #[test]
    fn restart_with_callback_pending_does_not_double_schedule() {
        let mut sched = Recorder::default();
        let mut lp = RenderLoop::new();
        lp.start(&mut sched);
        lp.stop();
        lp.start(&mut sched);
        assert_eq!(sched.requests, 1);
    }
}

//! Time subsystem.
//!
//! Converts host timestamps into frame deltas and accumulated animation state
//! without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per render loop
//! - call `tick(now_seconds)` once per presented frame to obtain `FrameTime`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameState, FrameTime};

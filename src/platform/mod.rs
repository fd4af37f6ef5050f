//! Platform abstraction layer
//!
//! Handles browser/native differences for frame scheduling. The browser
//! scheduler wraps `requestAnimationFrame`; native builds drive frames by hand.

pub mod frame;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use frame::{FrameLoop, FrameScheduler, ManualScheduler};

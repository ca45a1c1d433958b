//! Lumen engine crate.
//!
//! A native window with its message loop, and the GPU device presenting into it:
//! creation, size-dependent rebuilds, device-loss recovery and frame pacing.

pub mod coords;
pub mod device;
pub mod input;
pub mod logging;
pub mod window;

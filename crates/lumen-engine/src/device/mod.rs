//! GPU device lifecycle.
//!
//! [`GraphicsDevice`] drives creation, window-size-dependent rebuilds, loss
//! recovery and presentation over a [`GpuBackend`]: [`WgpuBackend`] for real
//! hardware, [`HeadlessBackend`] for deterministic runs with injected faults.

mod backend;
pub mod debug;
mod error;
mod frame;
mod gpu;
mod graphics;
mod headless;
mod init;
mod surface;

pub use backend::{AdapterId, CreatedDevice, GpuBackend, SwapChainDesc};
pub use error::{GpuError, GpuResult, LossReason};
pub use frame::{WgpuDepthStencil, WgpuRenderTarget, WgpuSwapChain};
pub use gpu::{WgpuBackend, WgpuDevice};
pub use graphics::{DeviceState, GraphicsDevice};
pub use headless::{
    HeadlessBackend, HeadlessContext, HeadlessDepthStencil, HeadlessDevice, HeadlessRenderTarget,
    HeadlessStats, HeadlessSurface, HeadlessSwapChain,
};
pub use init::{FeatureLevel, GpuConfig};

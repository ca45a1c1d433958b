use crate::coords::{ClientSize, Viewport};

use super::error::{GpuResult, LossReason};
use super::init::{FeatureLevel, GpuConfig};

/// Identity of a physical adapter, compared to detect adapter changes.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct AdapterId {
    pub vendor: u32,
    pub device: u32,
    pub backend: String,
    pub name: String,
}

/// A freshly created device and its immediate context.
pub struct CreatedDevice<D, C> {
    pub device: D,
    pub context: C,
    pub level: FeatureLevel,
    pub adapter: AdapterId,
}

/// Parameters for a new swap chain.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SwapChainDesc {
    pub size: ClientSize,
    pub buffer_count: u32,
    pub max_frame_latency: u32,
    pub present_mode: wgpu::PresentMode,
    pub prefer_srgb: bool,
}

impl SwapChainDesc {
    pub fn from_config(config: &GpuConfig, size: ClientSize) -> Self {
        Self {
            size,
            buffer_count: config.buffer_count,
            max_frame_latency: config.max_frame_latency,
            present_mode: config.present_mode,
            prefer_srgb: config.prefer_srgb,
        }
    }
}

/// Graphics API operations used by [`GraphicsDevice`](super::GraphicsDevice).
///
/// Implementations report device loss as [`GpuError::DeviceLost`](super::GpuError)
/// and never recover on their own; recovery ordering belongs to the caller. All
/// handles are plain values: replacing a device means dropping the old handles and
/// creating new ones.
pub trait GpuBackend {
    /// What a presentation surface is created from (a native window, a test id).
    type SurfaceTarget;
    type Device;
    type Context;
    type SwapChain;
    type RenderTarget;
    type DepthStencil;

    /// Creates a device at the first level in `levels` the adapter supports.
    fn create_device(
        &mut self,
        levels: &[FeatureLevel],
        config: &GpuConfig,
    ) -> GpuResult<CreatedDevice<Self::Device, Self::Context>>;

    fn adapter_id(&self, device: &Self::Device) -> AdapterId;

    /// Adapter the system would pick right now, if any.
    fn default_adapter_id(&self) -> Option<AdapterId>;

    /// `Some` once the device has been invalidated.
    fn device_removed_reason(&self, device: &Self::Device) -> Option<LossReason>;

    /// Submits any pending work on the context.
    fn flush(&mut self, context: &Self::Context);

    fn create_swap_chain(
        &mut self,
        device: &Self::Device,
        desc: &SwapChainDesc,
    ) -> GpuResult<Self::SwapChain>;

    fn resize_buffers(
        &mut self,
        device: &Self::Device,
        swap_chain: &mut Self::SwapChain,
        size: ClientSize,
    ) -> GpuResult<()>;

    /// View of the current back buffer.
    fn create_render_target(
        &mut self,
        device: &Self::Device,
        swap_chain: &mut Self::SwapChain,
    ) -> GpuResult<Self::RenderTarget>;

    fn create_depth_stencil(
        &mut self,
        device: &Self::Device,
        size: ClientSize,
    ) -> GpuResult<Self::DepthStencil>;

    fn set_viewport(&mut self, context: &Self::Context, viewport: &Viewport);

    /// Shows `target` on screen. Paced by the swap chain's present mode.
    fn present(
        &mut self,
        device: &Self::Device,
        context: &Self::Context,
        swap_chain: &mut Self::SwapChain,
        target: Self::RenderTarget,
    ) -> GpuResult<()>;

    /// Render target for the next frame with its prior contents discarded.
    fn discard_view(
        &mut self,
        device: &Self::Device,
        swap_chain: &mut Self::SwapChain,
    ) -> GpuResult<Self::RenderTarget>;

    fn discard_depth_stencil(&mut self, context: &Self::Context, depth: &Self::DepthStencil);

    /// Points future swap chains at a different surface.
    fn set_surface_target(&mut self, target: Self::SurfaceTarget) -> GpuResult<()>;
}

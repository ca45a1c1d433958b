use crate::coords::{ClientSize, Viewport};

use super::backend::{AdapterId, CreatedDevice, GpuBackend, SwapChainDesc};
use super::error::{GpuError, GpuResult, LossReason};
use super::init::{FeatureLevel, GpuConfig};

/// Presentation surface id for [`HeadlessBackend`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct HeadlessSurface(pub u32);

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HeadlessDevice {
    pub generation: u32,
    pub level: FeatureLevel,
    pub adapter: AdapterId,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HeadlessContext {
    pub generation: u32,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HeadlessSwapChain {
    pub id: u32,
    /// Generation of the device it was created on.
    pub device: u32,
    pub surface: HeadlessSurface,
    pub size: ClientSize,
    pub buffer_count: u32,
    pub max_frame_latency: u32,
    pub present_mode: wgpu::PresentMode,
    pub presented: u64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HeadlessRenderTarget {
    pub swap_chain: u32,
    pub size: ClientSize,
    /// Frame index within its swap chain.
    pub frame: u64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HeadlessDepthStencil {
    pub device: u32,
    pub size: ClientSize,
}

/// Operation counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessStats {
    pub devices_created: u32,
    pub swap_chains_created: u32,
    pub resizes: u32,
    pub flushes: u32,
    pub presents: u64,
    pub view_discards: u64,
    pub depth_discards: u64,
    pub last_viewport: Option<Viewport>,
}

/// One-shot and persistent failures to inject.
#[derive(Debug, Clone, Default)]
struct Faults {
    resize: Option<LossReason>,
    present: Option<LossReason>,
    present_api: Option<String>,
    discard_api: Option<String>,
    swap_chain: Option<LossReason>,
    every_swap_chain: Option<LossReason>,
}

/// In-memory [`GpuBackend`] with fault injection.
///
/// Handles carry generation numbers, so a caller can tell a recreated object from
/// a reused one. Nothing is rendered.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    supported: Vec<FeatureLevel>,
    default_adapter: Option<AdapterId>,
    surface: HeadlessSurface,

    generation: u32,
    next_swap_chain: u32,
    removed: Option<LossReason>,
    faults: Faults,
    stats: HeadlessStats,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            supported: FeatureLevel::DESCENDING.to_vec(),
            default_adapter: Some(Self::adapter("Headless Adapter", 0x10de, 0x0001)),
            surface: HeadlessSurface::default(),
            generation: 0,
            next_swap_chain: 0,
            removed: None,
            faults: Faults::default(),
            stats: HeadlessStats::default(),
        }
    }

    fn adapter(name: &str, vendor: u32, device: u32) -> AdapterId {
        AdapterId {
            vendor,
            device,
            backend: "Headless".to_string(),
            name: name.to_string(),
        }
    }

    /// Restricts the levels `create_device` accepts.
    pub fn with_supported_levels(mut self, levels: &[FeatureLevel]) -> Self {
        self.supported = levels.to_vec();
        self
    }

    pub fn fail_next_resize(&mut self, reason: LossReason) {
        self.faults.resize = Some(reason);
    }

    pub fn fail_next_present(&mut self, reason: LossReason) {
        self.faults.present = Some(reason);
    }

    /// Next present fails with a non-loss API error.
    pub fn fail_next_present_with(&mut self, message: &str) {
        self.faults.present_api = Some(message.to_string());
    }

    /// Next back-buffer reacquisition fails with a non-loss API error.
    pub fn fail_next_discard_with(&mut self, message: &str) {
        self.faults.discard_api = Some(message.to_string());
    }

    pub fn fail_next_swap_chain(&mut self, reason: LossReason) {
        self.faults.swap_chain = Some(reason);
    }

    /// Every swap chain creation fails until cleared with `None`.
    pub fn fail_every_swap_chain(&mut self, reason: Option<LossReason>) {
        self.faults.every_swap_chain = reason;
    }

    /// Latches a removed reason on the current device. Cleared by the next device.
    pub fn mark_removed(&mut self, reason: LossReason) {
        self.removed = Some(reason);
    }

    /// Makes a different adapter the system default.
    pub fn switch_default_adapter(&mut self, name: &str) {
        let device = self.default_adapter.as_ref().map_or(0, |a| a.device + 1);
        self.default_adapter = Some(Self::adapter(name, 0x1002, device));
    }

    /// Removes every adapter; device creation fails afterwards.
    pub fn remove_all_adapters(&mut self) {
        self.default_adapter = None;
    }

    pub fn stats(&self) -> &HeadlessStats {
        &self.stats
    }

    pub fn surface(&self) -> HeadlessSurface {
        self.surface
    }

    fn render_target(swap_chain: &HeadlessSwapChain) -> HeadlessRenderTarget {
        HeadlessRenderTarget {
            swap_chain: swap_chain.id,
            size: swap_chain.size,
            frame: swap_chain.presented,
        }
    }
}

impl GpuBackend for HeadlessBackend {
    type SurfaceTarget = HeadlessSurface;
    type Device = HeadlessDevice;
    type Context = HeadlessContext;
    type SwapChain = HeadlessSwapChain;
    type RenderTarget = HeadlessRenderTarget;
    type DepthStencil = HeadlessDepthStencil;

    fn create_device(
        &mut self,
        levels: &[FeatureLevel],
        _config: &GpuConfig,
    ) -> GpuResult<CreatedDevice<HeadlessDevice, HeadlessContext>> {
        let adapter = self
            .default_adapter
            .clone()
            .ok_or_else(|| GpuError::DeviceCreation("no adapter present".to_string()))?;

        let level = levels
            .iter()
            .copied()
            .find(|l| self.supported.contains(l))
            .ok_or_else(|| {
                GpuError::DeviceCreation(format!("none of {levels:?} supported by '{}'", adapter.name))
            })?;

        self.generation += 1;
        self.removed = None;
        self.stats.devices_created += 1;

        Ok(CreatedDevice {
            device: HeadlessDevice {
                generation: self.generation,
                level,
                adapter: adapter.clone(),
            },
            context: HeadlessContext {
                generation: self.generation,
            },
            level,
            adapter,
        })
    }

    fn adapter_id(&self, device: &HeadlessDevice) -> AdapterId {
        device.adapter.clone()
    }

    fn default_adapter_id(&self) -> Option<AdapterId> {
        self.default_adapter.clone()
    }

    fn device_removed_reason(&self, device: &HeadlessDevice) -> Option<LossReason> {
        if device.generation == self.generation {
            self.removed
        } else {
            Some(LossReason::Removed)
        }
    }

    fn flush(&mut self, _context: &HeadlessContext) {
        self.stats.flushes += 1;
    }

    fn create_swap_chain(
        &mut self,
        device: &HeadlessDevice,
        desc: &SwapChainDesc,
    ) -> GpuResult<HeadlessSwapChain> {
        if let Some(reason) = self.faults.swap_chain.take().or(self.faults.every_swap_chain) {
            return Err(GpuError::DeviceLost(reason));
        }

        self.next_swap_chain += 1;
        self.stats.swap_chains_created += 1;

        Ok(HeadlessSwapChain {
            id: self.next_swap_chain,
            device: device.generation,
            surface: self.surface,
            size: desc.size,
            buffer_count: desc.buffer_count,
            max_frame_latency: desc.max_frame_latency,
            present_mode: desc.present_mode,
            presented: 0,
        })
    }

    fn resize_buffers(
        &mut self,
        _device: &HeadlessDevice,
        swap_chain: &mut HeadlessSwapChain,
        size: ClientSize,
    ) -> GpuResult<()> {
        if let Some(reason) = self.faults.resize.take() {
            return Err(GpuError::DeviceLost(reason));
        }
        swap_chain.size = size;
        self.stats.resizes += 1;
        Ok(())
    }

    fn create_render_target(
        &mut self,
        _device: &HeadlessDevice,
        swap_chain: &mut HeadlessSwapChain,
    ) -> GpuResult<HeadlessRenderTarget> {
        Ok(Self::render_target(swap_chain))
    }

    fn create_depth_stencil(
        &mut self,
        device: &HeadlessDevice,
        size: ClientSize,
    ) -> GpuResult<HeadlessDepthStencil> {
        Ok(HeadlessDepthStencil {
            device: device.generation,
            size,
        })
    }

    fn set_viewport(&mut self, _context: &HeadlessContext, viewport: &Viewport) {
        self.stats.last_viewport = Some(*viewport);
    }

    fn present(
        &mut self,
        device: &HeadlessDevice,
        _context: &HeadlessContext,
        swap_chain: &mut HeadlessSwapChain,
        target: HeadlessRenderTarget,
    ) -> GpuResult<()> {
        if let Some(message) = self.faults.present_api.take() {
            return Err(GpuError::api("present", message));
        }
        if let Some(reason) = self.faults.present.take() {
            return Err(GpuError::DeviceLost(reason));
        }
        if let Some(reason) = self.device_removed_reason(device) {
            return Err(GpuError::DeviceLost(reason));
        }
        if target.swap_chain != swap_chain.id {
            return Err(GpuError::api("present", "render target belongs to another swap chain"));
        }

        swap_chain.presented += 1;
        self.stats.presents += 1;
        Ok(())
    }

    fn discard_view(
        &mut self,
        _device: &HeadlessDevice,
        swap_chain: &mut HeadlessSwapChain,
    ) -> GpuResult<HeadlessRenderTarget> {
        if let Some(message) = self.faults.discard_api.take() {
            return Err(GpuError::api("discard_view", message));
        }
        self.stats.view_discards += 1;
        Ok(Self::render_target(swap_chain))
    }

    fn discard_depth_stencil(&mut self, _context: &HeadlessContext, _depth: &HeadlessDepthStencil) {
        self.stats.depth_discards += 1;
    }

    fn set_surface_target(&mut self, target: HeadlessSurface) -> GpuResult<()> {
        self.surface = target;
        Ok(())
    }
}

use std::rc::Weak;

use crate::coords::{ClientSize, Viewport};
use crate::window::{ClientRegion, MessageSource, Window};

use super::backend::{AdapterId, GpuBackend, SwapChainDesc};
use super::error::{GpuError, GpuResult, LossReason};
use super::init::{FeatureLevel, GpuConfig};

/// Nested recoveries allowed before giving up with `DeviceCreation`.
const MAX_RECOVERY_DEPTH: u32 = 3;

/// Lifecycle state of a [`GraphicsDevice`].
///
/// `Rebuilding` and `Recovering` only last for the duration of the call that
/// entered them. A device is left `Rebuilding` if a rebuild fails with an API error
/// or no back buffer could be acquired after a present, and `Uninitialized` if
/// recovery fails. `rebuild_window_resources` returns it to `Ready`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DeviceState {
    Uninitialized,
    Ready,
    Rebuilding,
    Recovering,
}

type LostFn = Box<dyn FnMut(LossReason)>;
type RestoredFn<B> = Box<dyn FnMut(&<B as GpuBackend>::Device, &<B as GpuBackend>::Context)>;

/// Owns the GPU device, its context, the swap chain and the window-size-dependent
/// targets, and keeps them valid across resizes and device loss.
///
/// The window is referenced weakly through its [`ClientRegion`]; when the window is
/// replaced the owner must call [`rebind`](Self::rebind).
///
/// Device loss reported by any operation is absorbed: the device is torn down and
/// recreated end to end, and the call that observed the loss returns `Ok`.
pub struct GraphicsDevice<B: GpuBackend> {
    backend: B,
    config: GpuConfig,
    window: Weak<ClientRegion>,

    device: Option<B::Device>,
    context: Option<B::Context>,
    swap_chain: Option<B::SwapChain>,
    render_target: Option<B::RenderTarget>,
    depth_stencil: Option<B::DepthStencil>,

    viewport: Viewport,
    feature_level: Option<FeatureLevel>,
    adapter: Option<AdapterId>,

    state: DeviceState,
    recoveries: u32,
    recovery_depth: u32,

    lost_callbacks: Vec<LostFn>,
    restored_callbacks: Vec<RestoredFn<B>>,
}

impl<B: GpuBackend> GraphicsDevice<B> {
    /// Creates the device and builds the targets for the window's current size.
    pub fn new<S: MessageSource>(backend: B, window: &Window<S>, config: GpuConfig) -> GpuResult<Self> {
        let mut this = Self {
            backend,
            config,
            window: window.client_region(),
            device: None,
            context: None,
            swap_chain: None,
            render_target: None,
            depth_stencil: None,
            viewport: Viewport::default(),
            feature_level: None,
            adapter: None,
            state: DeviceState::Uninitialized,
            recoveries: 0,
            recovery_depth: 0,
            lost_callbacks: Vec::new(),
            restored_callbacks: Vec::new(),
        };

        this.create_device_and_context()?;
        this.rebuild_window_resources()?;
        Ok(this)
    }

    /// Creates a device at the best available feature level, replacing the current
    /// device and everything built on it.
    pub fn create_device_and_context(&mut self) -> GpuResult<()> {
        self.release_window_resources();
        self.context = None;
        self.device = None;

        let created = self
            .backend
            .create_device(&self.config.feature_levels, &self.config)?;

        log::info!(
            "GPU device created: adapter='{}' backend={} level={}",
            created.adapter.name,
            created.adapter.backend,
            created.level
        );

        self.feature_level = Some(created.level);
        self.adapter = Some(created.adapter);
        self.device = Some(created.device);
        self.context = Some(created.context);
        Ok(())
    }

    /// Brings the swap chain and targets in line with the window's client size.
    ///
    /// Must be called after every client-size change. A device loss observed here
    /// triggers a full recovery, which rebuilds the resources itself.
    pub fn rebuild_window_resources(&mut self) -> GpuResult<()> {
        match self.try_rebuild() {
            Err(GpuError::DeviceLost(reason)) => {
                log::warn!("{reason} while rebuilding window resources");
                self.handle_device_lost(reason)
            }
            other => other,
        }
    }

    fn try_rebuild(&mut self) -> GpuResult<()> {
        let size = self.client_size()?.at_least_one();

        let (Some(device), Some(context)) = (self.device.as_ref(), self.context.as_ref()) else {
            return Err(GpuError::api("rebuild_window_resources", "no device"));
        };

        let recovering = self.state == DeviceState::Recovering;
        if !recovering {
            self.state = DeviceState::Rebuilding;
        }

        self.render_target = None;
        self.depth_stencil = None;
        self.backend.flush(context);

        let swap_chain = match self.swap_chain.take() {
            Some(mut swap_chain) => {
                self.backend.resize_buffers(device, &mut swap_chain, size)?;
                log::debug!("swap chain resized to {}x{}", size.width, size.height);
                swap_chain
            }
            None => {
                let desc = SwapChainDesc::from_config(&self.config, size);
                let swap_chain = self.backend.create_swap_chain(device, &desc)?;
                log::info!(
                    "swap chain created: {}x{}, {} buffers, frame latency {}",
                    size.width,
                    size.height,
                    desc.buffer_count,
                    desc.max_frame_latency
                );
                swap_chain
            }
        };
        let swap_chain = self.swap_chain.insert(swap_chain);

        self.render_target = Some(self.backend.create_render_target(device, swap_chain)?);
        if self.config.depth_stencil {
            self.depth_stencil = Some(self.backend.create_depth_stencil(device, size)?);
        }

        self.viewport = Viewport::covering(size);
        self.backend.set_viewport(context, &self.viewport);

        if !recovering {
            self.state = DeviceState::Ready;
        }
        Ok(())
    }

    /// Checks whether the device is still usable on the current system default
    /// adapter, and recovers if not. A healthy device is left untouched.
    pub fn validate_device(&mut self) -> GpuResult<()> {
        let Some(device) = self.device.as_ref() else {
            return Ok(());
        };

        let reason = self.backend.device_removed_reason(device).or_else(|| {
            match self.backend.default_adapter_id() {
                Some(id) if id == self.backend.adapter_id(device) => None,
                Some(id) => {
                    log::info!("default adapter is now '{}'", id.name);
                    Some(LossReason::AdapterChanged)
                }
                None => Some(LossReason::Removed),
            }
        });

        match reason {
            Some(reason) => {
                log::warn!("{reason} detected during validation");
                self.handle_device_lost(reason)
            }
            None => Ok(()),
        }
    }

    /// Tears the device down and rebuilds it end to end.
    ///
    /// Lost callbacks run after the swap chain is released and before the new device
    /// exists; restored callbacks run once the new targets are built. May be entered
    /// again from the rebuild it performs.
    pub fn handle_device_lost(&mut self, reason: LossReason) -> GpuResult<()> {
        if self.recovery_depth >= MAX_RECOVERY_DEPTH {
            return Err(GpuError::DeviceCreation(format!(
                "{reason} during {MAX_RECOVERY_DEPTH} nested recoveries"
            )));
        }

        self.recovery_depth += 1;
        let outcome = self.recover(reason);
        self.recovery_depth -= 1;

        if outcome.is_err() {
            self.state = DeviceState::Uninitialized;
        }
        outcome
    }

    fn recover(&mut self, reason: LossReason) -> GpuResult<()> {
        self.state = DeviceState::Recovering;
        self.recoveries += 1;

        self.release_window_resources();
        for on_lost in &mut self.lost_callbacks {
            on_lost(reason);
        }

        self.create_device_and_context()?;
        self.rebuild_window_resources()?;

        // Inner recoveries leave the outermost one to finish.
        if self.recovery_depth > 1 {
            return Ok(());
        }

        if let (Some(device), Some(context)) = (self.device.as_ref(), self.context.as_ref()) {
            for on_restored in &mut self.restored_callbacks {
                on_restored(device, context);
            }
        }

        self.state = DeviceState::Ready;
        log::info!("GPU device recovered after {reason}");
        Ok(())
    }

    /// Presents the current frame, then discards the targets for the next one.
    ///
    /// Device loss triggers recovery and returns `Ok`; the next frame renders into
    /// the new swap chain.
    pub fn present(&mut self) -> GpuResult<()> {
        match self.try_present() {
            Err(GpuError::DeviceLost(reason)) => {
                log::warn!("{reason} on present");
                self.handle_device_lost(reason)
            }
            other => other,
        }
    }

    fn try_present(&mut self) -> GpuResult<()> {
        let (Some(device), Some(context), Some(swap_chain)) = (
            self.device.as_ref(),
            self.context.as_ref(),
            self.swap_chain.as_mut(),
        ) else {
            return Err(GpuError::api("present", "device is not ready"));
        };
        let target = self
            .render_target
            .take()
            .ok_or_else(|| GpuError::api("present", "no render target"))?;

        if let Err(err) = self.backend.present(device, context, swap_chain, target) {
            // The frame is dropped but the next one still needs a back buffer.
            if !err.is_device_lost() {
                match self.backend.discard_view(device, swap_chain) {
                    Ok(next) => self.render_target = Some(next),
                    Err(_) => self.state = DeviceState::Rebuilding,
                }
            }
            return Err(err);
        }

        match self.backend.discard_view(device, swap_chain) {
            Ok(next) => self.render_target = Some(next),
            Err(err) => {
                if !err.is_device_lost() {
                    self.state = DeviceState::Rebuilding;
                }
                return Err(err);
            }
        }
        if let Some(depth) = self.depth_stencil.as_ref() {
            self.backend.discard_depth_stencil(context, depth);
        }
        Ok(())
    }

    /// Points the device at a new window and rebuilds its targets there.
    pub fn rebind<S: MessageSource>(&mut self, window: &Window<S>, target: B::SurfaceTarget) -> GpuResult<()> {
        log::info!("rebinding graphics device to '{}'", window.title());
        self.window = window.client_region();
        self.release_window_resources();
        self.backend.set_surface_target(target)?;
        self.rebuild_window_resources()
    }

    /// Registers a callback run when the device is lost, in registration order.
    pub fn on_device_lost<F>(&mut self, f: F)
    where
        F: FnMut(LossReason) + 'static,
    {
        self.lost_callbacks.push(Box::new(f));
    }

    /// Registers a callback run with the new device after recovery completes.
    pub fn on_device_restored<F>(&mut self, f: F)
    where
        F: FnMut(&B::Device, &B::Context) + 'static,
    {
        self.restored_callbacks.push(Box::new(f));
    }

    fn release_window_resources(&mut self) {
        self.render_target = None;
        self.depth_stencil = None;
        self.swap_chain = None;
    }

    fn client_size(&self) -> GpuResult<ClientSize> {
        self.window
            .upgrade()
            .map(|region| region.size())
            .ok_or_else(|| GpuError::api("client_region_size", "window is gone; rebind required"))
    }

    pub fn device(&self) -> Option<&B::Device> {
        self.device.as_ref()
    }

    pub fn context(&self) -> Option<&B::Context> {
        self.context.as_ref()
    }

    pub fn swap_chain(&self) -> Option<&B::SwapChain> {
        self.swap_chain.as_ref()
    }

    /// Back buffer to draw the current frame into. `Some` whenever the state is `Ready`.
    pub fn render_target(&self) -> Option<&B::RenderTarget> {
        self.render_target.as_ref()
    }

    pub fn depth_stencil(&self) -> Option<&B::DepthStencil> {
        self.depth_stencil.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn feature_level(&self) -> Option<FeatureLevel> {
        self.feature_level
    }

    pub fn adapter(&self) -> Option<&AdapterId> {
        self.adapter.as_ref()
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Recovery cycles run so far, nested ones included.
    pub fn recoveries(&self) -> u32 {
        self.recoveries
    }

    pub fn config(&self) -> &GpuConfig {
        &self.config
    }

    pub fn markers_enabled(&self) -> bool {
        self.config.debug_markers
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::device::{HeadlessBackend, HeadlessSurface};
    use crate::window::{RawMessage, ScriptedSource};

    fn window(width: u32, height: u32) -> Window<ScriptedSource> {
        Window::with_source(ScriptedSource::new("test", ClientSize::new(width, height)))
    }

    fn device(window: &Window<ScriptedSource>) -> GraphicsDevice<HeadlessBackend> {
        GraphicsDevice::new(HeadlessBackend::new(), window, GpuConfig::default()).unwrap()
    }

    fn target_size(gd: &GraphicsDevice<HeadlessBackend>) -> Option<ClientSize> {
        gd.render_target().map(|t| t.size)
    }

    #[test]
    fn new_device_is_ready_and_covers_window() {
        let w = window(800, 600);
        let gd = device(&w);

        assert_eq!(gd.state(), DeviceState::Ready);
        assert_eq!(gd.feature_level(), Some(FeatureLevel::Core));
        assert_eq!(gd.viewport(), Viewport::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(gd.backend().stats().last_viewport, Some(gd.viewport()));
        assert_eq!(target_size(&gd), Some(ClientSize::new(800, 600)));
        assert_eq!(gd.depth_stencil().map(|d| d.size), Some(ClientSize::new(800, 600)));

        let sc = gd.swap_chain().unwrap();
        assert_eq!((sc.buffer_count, sc.max_frame_latency), (2, 1));
        assert_eq!(sc.present_mode, wgpu::PresentMode::Fifo);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let w = window(800, 600);
        let mut gd = device(&w);

        gd.rebuild_window_resources().unwrap();
        assert_eq!(target_size(&gd), Some(ClientSize::new(800, 600)));
        gd.rebuild_window_resources().unwrap();
        assert_eq!(target_size(&gd), Some(ClientSize::new(800, 600)));

        let stats = gd.backend().stats();
        assert_eq!((stats.swap_chains_created, stats.resizes), (1, 2));
        assert_eq!(gd.recoveries(), 0);
    }

    #[test]
    fn rebuild_follows_client_size() {
        let mut w = window(800, 600);
        let mut gd = device(&w);

        w.dispatch(RawMessage::Size(ClientSize::new(640, 480))).unwrap();
        gd.rebuild_window_resources().unwrap();

        assert_eq!(gd.viewport(), Viewport::new(0.0, 0.0, 640.0, 480.0));
        assert_eq!(gd.swap_chain().map(|s| s.size), Some(ClientSize::new(640, 480)));
    }

    #[test]
    fn zero_size_is_clamped() {
        let mut w = window(800, 600);
        let mut gd = device(&w);

        w.dispatch(RawMessage::Size(ClientSize::new(0, 0))).unwrap();
        gd.rebuild_window_resources().unwrap();
        assert_eq!(target_size(&gd), Some(ClientSize::new(1, 1)));
    }

    #[test]
    fn present_discards_targets() {
        let w = window(800, 600);
        let mut gd = device(&w);

        gd.present().unwrap();
        let stats = gd.backend().stats();
        assert_eq!((stats.presents, stats.view_discards, stats.depth_discards), (1, 1, 1));
        assert_eq!(gd.render_target().map(|t| t.frame), Some(1));
    }

    #[test]
    fn present_loss_recovers_once() {
        let w = window(800, 600);
        let mut gd = device(&w);
        let before = gd.swap_chain().unwrap().id;

        gd.backend_mut().fail_next_present(LossReason::Removed);
        gd.present().unwrap();

        assert_eq!(gd.recoveries(), 1);
        assert_eq!(gd.state(), DeviceState::Ready);
        let sc = gd.swap_chain().unwrap();
        assert_ne!(sc.id, before);
        assert_eq!(sc.size, ClientSize::new(800, 600));
        assert_eq!(sc.device, gd.device().unwrap().generation);

        gd.present().unwrap();
        assert_eq!(gd.recoveries(), 1);
        assert_eq!(gd.backend().stats().presents, 1);
        assert_eq!(gd.backend().stats().devices_created, 2);
    }

    #[test]
    fn present_api_error_keeps_a_back_buffer() {
        let w = window(800, 600);
        let mut gd = device(&w);

        gd.backend_mut().fail_next_present_with("invalid call");
        assert!(matches!(gd.present(), Err(GpuError::Api { call: "present", .. })));
        assert_eq!(gd.recoveries(), 0);
        assert_eq!(gd.state(), DeviceState::Ready);
        assert_eq!(target_size(&gd), Some(ClientSize::new(800, 600)));

        gd.present().unwrap();
        assert_eq!(gd.backend().stats().presents, 1);
        assert_eq!(gd.recoveries(), 0);
    }

    #[test]
    fn failed_reacquire_leaves_device_rebuilding() {
        let w = window(800, 600);
        let mut gd = device(&w);

        gd.backend_mut().fail_next_present_with("invalid call");
        gd.backend_mut().fail_next_discard_with("out of memory");
        assert!(gd.present().is_err());
        assert_eq!(gd.state(), DeviceState::Rebuilding);
        assert!(gd.render_target().is_none());

        gd.rebuild_window_resources().unwrap();
        assert_eq!(gd.state(), DeviceState::Ready);
        gd.present().unwrap();
        assert_eq!(gd.backend().stats().presents, 1);
    }

    #[test]
    fn validate_healthy_device_is_noop() {
        let w = window(800, 600);
        let mut gd = device(&w);

        gd.validate_device().unwrap();
        assert_eq!(gd.recoveries(), 0);
        assert_eq!(gd.backend().stats().devices_created, 1);
    }

    #[test]
    fn validate_recovers_on_adapter_change() {
        let w = window(800, 600);
        let mut gd = device(&w);

        gd.backend_mut().switch_default_adapter("external");
        gd.validate_device().unwrap();
        assert_eq!(gd.recoveries(), 1);
        assert_eq!(gd.adapter().map(|a| a.name.as_str()), Some("external"));

        gd.validate_device().unwrap();
        assert_eq!(gd.recoveries(), 1);
    }

    #[test]
    fn validate_recovers_on_removed_device() {
        let w = window(800, 600);
        let mut gd = device(&w);

        gd.backend_mut().mark_removed(LossReason::Reset);
        gd.validate_device().unwrap();
        assert_eq!(gd.recoveries(), 1);
        assert_eq!(gd.device().map(|d| d.generation), Some(2));
    }

    #[test]
    fn validate_without_adapter_fails_recovery() {
        let w = window(800, 600);
        let mut gd = device(&w);
        let lost = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&lost);
        gd.on_device_lost(move |r| l.borrow_mut().push(r));

        gd.backend_mut().remove_all_adapters();
        assert!(matches!(gd.validate_device(), Err(GpuError::DeviceCreation(_))));

        assert_eq!(*lost.borrow(), [LossReason::Removed]);
        assert_eq!(gd.state(), DeviceState::Uninitialized);
        assert!(gd.device().is_none() && gd.swap_chain().is_none());
    }

    #[test]
    fn creation_failure_during_recovery_surfaces() {
        let w = window(800, 600);
        let mut gd = device(&w);

        gd.backend_mut().fail_next_present(LossReason::Reset);
        gd.backend_mut().remove_all_adapters();
        assert!(matches!(gd.present(), Err(GpuError::DeviceCreation(_))));
        assert_eq!(gd.recoveries(), 1);
        assert_eq!(gd.state(), DeviceState::Uninitialized);

        // Rebuilding without a device does not pretend to make progress.
        assert!(matches!(gd.rebuild_window_resources(), Err(GpuError::Api { .. })));
        assert_eq!(gd.state(), DeviceState::Uninitialized);
    }

    #[test]
    fn resize_loss_reenters_rebuild() {
        let mut w = window(800, 600);
        let mut gd = device(&w);

        w.dispatch(RawMessage::Size(ClientSize::new(1024, 768))).unwrap();
        gd.backend_mut().fail_next_resize(LossReason::Removed);
        gd.rebuild_window_resources().unwrap();

        assert_eq!(gd.recoveries(), 1);
        assert_eq!(gd.state(), DeviceState::Ready);
        assert_eq!(gd.swap_chain().map(|s| s.size), Some(ClientSize::new(1024, 768)));
        assert_eq!(gd.backend().stats().swap_chains_created, 2);
    }

    #[test]
    fn nested_loss_notifies_restored_once() {
        let w = window(800, 600);
        let mut gd = device(&w);
        let events = Rc::new(RefCell::new(Vec::new()));

        let e = Rc::clone(&events);
        gd.on_device_lost(move |r| e.borrow_mut().push(format!("lost {r}")));
        let e = Rc::clone(&events);
        gd.on_device_restored(move |d, _| e.borrow_mut().push(format!("restored {}", d.generation)));

        gd.backend_mut().fail_next_present(LossReason::Removed);
        gd.backend_mut().fail_next_swap_chain(LossReason::Reset);
        gd.present().unwrap();

        assert_eq!(gd.recoveries(), 2);
        assert_eq!(gd.state(), DeviceState::Ready);
        assert_eq!(
            *events.borrow(),
            ["lost device removed", "lost device reset", "restored 3"]
        );
    }

    #[test]
    fn endless_loss_gives_up() {
        let w = window(800, 600);
        let mut gd = device(&w);

        gd.backend_mut().fail_next_present(LossReason::Removed);
        gd.backend_mut().fail_every_swap_chain(Some(LossReason::Removed));

        assert!(matches!(gd.present(), Err(GpuError::DeviceCreation(_))));
        assert_eq!(gd.recoveries(), MAX_RECOVERY_DEPTH);
        assert_eq!(gd.state(), DeviceState::Uninitialized);
    }

    #[test]
    fn no_supported_level_fails_creation() {
        let w = window(800, 600);
        let backend = HeadlessBackend::new().with_supported_levels(&[]);
        let created = GraphicsDevice::new(backend, &w, GpuConfig::default());
        assert!(matches!(created, Err(GpuError::DeviceCreation(_))));
    }

    #[test]
    fn falls_back_to_lower_level() {
        let w = window(800, 600);
        let backend = HeadlessBackend::new().with_supported_levels(&[FeatureLevel::DownlevelWebGl2]);
        let gd = GraphicsDevice::new(backend, &w, GpuConfig::default()).unwrap();
        assert_eq!(gd.feature_level(), Some(FeatureLevel::DownlevelWebGl2));
    }

    #[test]
    fn dropped_window_requires_rebind() {
        let w = window(800, 600);
        let mut gd = device(&w);
        drop(w);

        assert!(matches!(gd.rebuild_window_resources(), Err(GpuError::Api { .. })));

        let w2 = window(1024, 768);
        gd.rebind(&w2, HeadlessSurface(7)).unwrap();
        assert_eq!(gd.state(), DeviceState::Ready);
        let sc = gd.swap_chain().unwrap();
        assert_eq!((sc.surface, sc.size), (HeadlessSurface(7), ClientSize::new(1024, 768)));
    }

    #[test]
    fn depth_stencil_is_optional() {
        let w = window(800, 600);
        let config = GpuConfig {
            depth_stencil: false,
            ..GpuConfig::default()
        };
        let mut gd = GraphicsDevice::new(HeadlessBackend::new(), &w, config).unwrap();
        assert!(gd.depth_stencil().is_none());
        gd.present().unwrap();
        assert_eq!(gd.backend().stats().depth_discards, 0);
    }
}

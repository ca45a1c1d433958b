use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use winit::window::Window as NativeWindow;

use crate::coords::{ClientSize, Viewport};

use super::backend::{AdapterId, CreatedDevice, GpuBackend, SwapChainDesc};
use super::error::{GpuError, GpuResult, LossReason};
use super::frame::{WgpuDepthStencil, WgpuRenderTarget, WgpuSwapChain};
use super::init::{FeatureLevel, GpuConfig};
use super::surface;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// Logical device plus the adapter it was created on.
pub struct WgpuDevice {
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    /// Set by wgpu's device-lost callback.
    lost: Arc<AtomicBool>,
}

impl WgpuDevice {
    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::Acquire)
    }
}

/// [`GpuBackend`] over wgpu.
///
/// Owns the instance and the surface for one native window. The swap chain is the
/// surface configuration; acquiring and presenting go through the surface.
pub struct WgpuBackend {
    instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    power_preference: wgpu::PowerPreference,
}

impl WgpuBackend {
    /// Creates an instance over all backends and a surface for `window`.
    pub fn new(window: Arc<NativeWindow>) -> GpuResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| GpuError::api("create_surface", e))?;

        Ok(Self {
            instance,
            surface,
            power_preference: wgpu::PowerPreference::HighPerformance,
        })
    }

    fn request_adapter(&self) -> Option<wgpu::Adapter> {
        pollster::block_on(self.instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: self.power_preference,
            compatible_surface: Some(&self.surface),
            force_fallback_adapter: false,
        }))
        .ok()
    }

    fn acquire(&self) -> GpuResult<WgpuRenderTarget> {
        let texture = self
            .surface
            .get_current_texture()
            .map_err(|e| surface::map_surface_error("get_current_texture", e))?;
        Ok(WgpuRenderTarget::new(texture))
    }
}

fn adapter_identity(info: &wgpu::AdapterInfo) -> AdapterId {
    AdapterId {
        vendor: info.vendor,
        device: info.device,
        backend: format!("{:?}", info.backend),
        name: info.name.clone(),
    }
}

impl GpuBackend for WgpuBackend {
    type SurfaceTarget = Arc<NativeWindow>;
    type Device = WgpuDevice;
    type Context = wgpu::Queue;
    type SwapChain = WgpuSwapChain;
    type RenderTarget = WgpuRenderTarget;
    type DepthStencil = WgpuDepthStencil;

    fn create_device(
        &mut self,
        levels: &[FeatureLevel],
        config: &GpuConfig,
    ) -> GpuResult<CreatedDevice<WgpuDevice, wgpu::Queue>> {
        self.power_preference = config.power_preference;

        let adapter = self
            .request_adapter()
            .ok_or_else(|| GpuError::DeviceCreation("no suitable GPU adapter".to_string()))?;
        let info = adapter.get_info();
        let available = adapter.limits();

        for &level in levels {
            let required_limits = level.limits();
            if !required_limits.check_limits(&available) {
                log::debug!("adapter '{}' does not meet {level} limits", info.name);
                continue;
            }

            let requested = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
                label: Some(config.label.as_str()),
                required_features: wgpu::Features::empty(),
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            }));

            let (device, queue) = match requested {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("device request at {level} failed: {e}");
                    continue;
                }
            };

            let lost = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&lost);
            device.set_device_lost_callback(move |reason, message| {
                // Dropping our own device reports `Destroyed`.
                if !matches!(reason, wgpu::DeviceLostReason::Destroyed) {
                    log::error!("wgpu device lost: {message}");
                    flag.store(true, Ordering::Release);
                }
            });

            return Ok(CreatedDevice {
                device: WgpuDevice {
                    adapter,
                    device,
                    lost,
                },
                context: queue,
                level,
                adapter: adapter_identity(&info),
            });
        }

        Err(GpuError::DeviceCreation(format!(
            "adapter '{}' supports none of {levels:?}",
            info.name
        )))
    }

    fn adapter_id(&self, device: &WgpuDevice) -> AdapterId {
        adapter_identity(&device.adapter.get_info())
    }

    fn default_adapter_id(&self) -> Option<AdapterId> {
        self.request_adapter().map(|a| adapter_identity(&a.get_info()))
    }

    fn device_removed_reason(&self, device: &WgpuDevice) -> Option<LossReason> {
        device.is_lost().then_some(LossReason::Removed)
    }

    fn flush(&mut self, context: &wgpu::Queue) {
        context.submit(std::iter::empty());
    }

    fn create_swap_chain(&mut self, device: &WgpuDevice, desc: &SwapChainDesc) -> GpuResult<WgpuSwapChain> {
        let caps = self.surface.get_capabilities(&device.adapter);
        let format = surface::choose_surface_format(&caps, desc.prefer_srgb)
            .ok_or_else(|| GpuError::api("create_swap_chain", "no supported surface formats"))?;

        // wgpu sizes the image ring from the frame latency.
        if desc.buffer_count != desc.max_frame_latency + 1 {
            log::debug!(
                "buffer count {} follows frame latency {} under wgpu",
                desc.buffer_count,
                desc.max_frame_latency
            );
        }

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: desc.size.width,
            height: desc.size.height,
            present_mode: surface::choose_present_mode(&caps, desc.present_mode),
            alpha_mode: surface::choose_alpha_mode(&caps),
            view_formats: vec![],
            desired_maximum_frame_latency: desc.max_frame_latency,
        };
        self.surface.configure(&device.device, &config);

        Ok(WgpuSwapChain { config })
    }

    fn resize_buffers(
        &mut self,
        device: &WgpuDevice,
        swap_chain: &mut WgpuSwapChain,
        size: ClientSize,
    ) -> GpuResult<()> {
        if device.is_lost() {
            return Err(GpuError::DeviceLost(LossReason::Removed));
        }
        swap_chain.config.width = size.width;
        swap_chain.config.height = size.height;
        self.surface.configure(&device.device, &swap_chain.config);
        Ok(())
    }

    fn create_render_target(
        &mut self,
        _device: &WgpuDevice,
        _swap_chain: &mut WgpuSwapChain,
    ) -> GpuResult<WgpuRenderTarget> {
        self.acquire()
    }

    fn create_depth_stencil(&mut self, device: &WgpuDevice, size: ClientSize) -> GpuResult<WgpuDepthStencil> {
        let texture = device.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen depth-stencil"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(WgpuDepthStencil { texture, view })
    }

    fn set_viewport(&mut self, _context: &wgpu::Queue, _viewport: &Viewport) {
        // wgpu binds viewports per render pass; callers read `GraphicsDevice::viewport`.
    }

    fn present(
        &mut self,
        device: &WgpuDevice,
        _context: &wgpu::Queue,
        _swap_chain: &mut WgpuSwapChain,
        target: WgpuRenderTarget,
    ) -> GpuResult<()> {
        let WgpuRenderTarget { texture, view } = target;
        drop(view);
        texture.present();

        if device.is_lost() {
            return Err(GpuError::DeviceLost(LossReason::Removed));
        }
        Ok(())
    }

    fn discard_view(
        &mut self,
        _device: &WgpuDevice,
        _swap_chain: &mut WgpuSwapChain,
    ) -> GpuResult<WgpuRenderTarget> {
        self.acquire()
    }

    fn discard_depth_stencil(&mut self, _context: &wgpu::Queue, _depth: &WgpuDepthStencil) {
        // Depth is cleared by the next pass's load op.
    }

    fn set_surface_target(&mut self, target: Arc<NativeWindow>) -> GpuResult<()> {
        self.surface = self
            .instance
            .create_surface(target)
            .map_err(|e| GpuError::api("create_surface", e))?;
        Ok(())
    }
}

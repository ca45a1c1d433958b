use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use lumen_engine::coords::ClientSize;
use lumen_engine::device::debug::{EventSection, marker};
use lumen_engine::device::{GpuConfig, GraphicsDevice, WgpuBackend};
use lumen_engine::input::{InputHandler, InputSymbol};
use lumen_engine::logging::{LoggingConfig, init_logging};
use lumen_engine::window::Window;

type SharedDevice = Rc<RefCell<GraphicsDevice<WgpuBackend>>>;

/// Logs input; F5 re-validates the device as if the display configuration changed.
struct SandboxInput {
    device: SharedDevice,
}

impl InputHandler for SandboxInput {
    fn on_key_down(&mut self, key: InputSymbol) {
        log::debug!("key down: {key}");
        if key == InputSymbol::F5 {
            log::info!("validating GPU device");
            if let Err(e) = self.device.borrow_mut().validate_device() {
                log::error!("device validation failed: {e}");
            }
        }
    }

    fn on_key_up(&mut self, key: InputSymbol) {
        log::debug!("key up: {key}");
    }

    fn on_mouse_down(&mut self, button: InputSymbol, x: i32, y: i32) {
        log::debug!("{button} down at ({x}, {y})");
    }

    fn on_mouse_wheel(&mut self, _symbol: InputSymbol, x: i32, y: i32, delta: i32) {
        log::debug!("wheel {delta} at ({x}, {y})");
    }
}

/// Clears the back buffer to a colour that drifts with the frame count.
fn render(gd: &GraphicsDevice<WgpuBackend>, frame: u64) -> Result<()> {
    let (Some(device), Some(queue), Some(target)) = (gd.device(), gd.context(), gd.render_target())
    else {
        return Ok(());
    };

    let mut encoder = device
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("lumen frame encoder"),
        });

    {
        let mut section = EventSection::begin_if(gd.markers_enabled(), &mut encoder, "clear");
        let t = (frame % 600) as f64 / 600.0;

        let _pass = section.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.05 + 0.1 * t,
                        g: 0.08,
                        b: 0.15 - 0.1 * t,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: gd.depth_stencil().map(|depth| {
                wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Discard,
                    }),
                }
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    if gd.markers_enabled() {
        marker(&mut encoder, "frame end");
    }

    queue.submit(std::iter::once(encoder.finish()));
    Ok(())
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut window = Window::create("Lumen Sandbox", ClientSize::new(1280, 720))?;

    let backend = WgpuBackend::new(window.source().native_window())
        .context("failed to create wgpu backend")?;
    let device = GraphicsDevice::new(backend, &window, GpuConfig::default())
        .context("failed to create graphics device")?;
    let device: SharedDevice = Rc::new(RefCell::new(device));

    {
        let mut gd = device.borrow_mut();
        gd.on_device_lost(|reason| log::warn!("sandbox: device lost ({reason})"));
        gd.on_device_restored(|device, _| {
            log::info!("sandbox: device restored on '{}'", device.adapter.get_info().name);
        });
    }

    let d = Rc::clone(&device);
    let mut frame = 0u64;
    window.set_message_idle(move || {
        let mut gd = d.borrow_mut();
        render(&gd, frame)?;
        gd.present()?;
        frame += 1;
        Ok(())
    });

    let d = Rc::clone(&device);
    window.set_resize_handler(move |size| {
        log::debug!("client region resized to {}x{}", size.width, size.height);
        d.borrow_mut().rebuild_window_resources()?;
        Ok(())
    });

    window.set_input_handler(SandboxInput {
        device: Rc::clone(&device),
    });

    window.run()
}

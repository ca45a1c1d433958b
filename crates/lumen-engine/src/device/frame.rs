/// Back buffer acquired from the surface, plus a view to render into.
///
/// Holding it blocks acquisition of the next buffer; [`GraphicsDevice`](super::GraphicsDevice)
/// drops it before any surface reconfiguration.
pub struct WgpuRenderTarget {
    pub texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl WgpuRenderTarget {
    pub(crate) fn new(texture: wgpu::SurfaceTexture) -> Self {
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

pub struct WgpuDepthStencil {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

/// Configured presentation surface state.
#[derive(Debug, Clone)]
pub struct WgpuSwapChain {
    pub config: wgpu::SurfaceConfiguration,
}

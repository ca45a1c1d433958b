use std::fmt;

/// Capability tier requested at device creation.
///
/// Each tier maps to a `wgpu::Limits` preset. Tiers are tried in the order given by
/// [`GpuConfig::feature_levels`]; the first one the adapter satisfies wins.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FeatureLevel {
    /// Full desktop limits (`Limits::default()`).
    Core,
    /// Older desktop / mobile hardware (`Limits::downlevel_defaults()`).
    Downlevel,
    /// GLES3 / WebGL2 class hardware (`Limits::downlevel_webgl2_defaults()`).
    DownlevelWebGl2,
}

impl FeatureLevel {
    /// Newest to oldest.
    pub const DESCENDING: [FeatureLevel; 3] = [Self::Core, Self::Downlevel, Self::DownlevelWebGl2];

    pub fn limits(self) -> wgpu::Limits {
        match self {
            Self::Core => wgpu::Limits::default(),
            Self::Downlevel => wgpu::Limits::downlevel_defaults(),
            Self::DownlevelWebGl2 => wgpu::Limits::downlevel_webgl2_defaults(),
        }
    }
}

impl fmt::Display for FeatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Core => "core",
            Self::Downlevel => "downlevel",
            Self::DownlevelWebGl2 => "downlevel-webgl2",
        })
    }
}

/// Configuration for [`GraphicsDevice`](super::GraphicsDevice).
///
/// The swap behaviour (`present_mode`, `buffer_count`, `max_frame_latency`) is a
/// policy; the defaults are double-buffered, vsync-paced presentation with one
/// queued frame.
#[derive(Debug, Clone)]
pub struct GpuConfig {
    /// Tiers to try, in preference order.
    pub feature_levels: Vec<FeatureLevel>,

    pub power_preference: wgpu::PowerPreference,

    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// `Fifo` blocks presentation on vertical sync.
    pub present_mode: wgpu::PresentMode,

    pub buffer_count: u32,

    /// Frames the CPU may queue ahead of the display.
    ///
    /// Kept at 1 to bound presentation latency and power draw.
    pub max_frame_latency: u32,

    /// Create a depth-stencil target alongside the render target.
    pub depth_stencil: bool,

    /// Emit named GPU event sections and markers.
    pub debug_markers: bool,

    pub label: String,
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            feature_levels: FeatureLevel::DESCENDING.to_vec(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            buffer_count: 2,
            max_frame_latency: 1,
            depth_stencil: true,
            debug_markers: cfg!(debug_assertions),
            label: "lumen device".to_string(),
        }
    }
}

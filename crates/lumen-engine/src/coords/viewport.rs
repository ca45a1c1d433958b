use super::size::ClientSize;

/// Rasterizer viewport in physical pixels.
///
/// Origin is the top-left corner of the render target; the device always sets it to
/// cover the whole client area.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }

    /// Viewport at the origin covering `size`.
    #[inline]
    pub fn covering(size: ClientSize) -> Self {
        Self::new(0.0, 0.0, size.width as f32, size.height as f32)
    }
}

/// Client-region size in physical pixels (excludes window chrome).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct ClientSize {
    pub width: u32,
    pub height: u32,
}

impl ClientSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Same size with each dimension raised to at least 1.
    ///
    /// GPU surfaces cannot be zero-sized; a minimised window still gets a 1x1 target.
    #[inline]
    pub fn at_least_one(self) -> Self {
        Self::new(self.width.max(1), self.height.max(1))
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for ClientSize {
    fn from(s: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(s.width, s.height)
    }
}

impl From<ClientSize> for winit::dpi::PhysicalSize<u32> {
    fn from(s: ClientSize) -> Self {
        winit::dpi::PhysicalSize::new(s.width, s.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn empty_when_any_axis_is_zero() { assert!(ClientSize::new(0, 5).is_empty()); }
    #[test] fn clamps_to_one() { assert_eq!(ClientSize::new(0, 0).at_least_one(), ClientSize::new(1, 1)); }
    #[test] fn keeps_nonzero() { assert_eq!(ClientSize::new(3, 4).at_least_one(), ClientSize::new(3, 4)); }
}

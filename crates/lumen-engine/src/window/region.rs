use std::cell::Cell;

use crate::coords::ClientSize;

/// Client-region size shared between a window and whoever presents into it.
///
/// The window owns the only strong reference; readers hold a `Weak` and must be
/// rebound when the window is replaced.
#[derive(Debug, Default)]
pub struct ClientRegion {
    size: Cell<ClientSize>,
}

impl ClientRegion {
    pub(crate) fn new(size: ClientSize) -> Self {
        Self {
            size: Cell::new(size),
        }
    }

    #[inline]
    pub fn size(&self) -> ClientSize {
        self.size.get()
    }

    #[inline]
    pub(crate) fn set(&self, size: ClientSize) {
        self.size.set(size);
    }
}

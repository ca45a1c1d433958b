//! Window + message loop.
//!
//! [`Window`] is generic over its [`MessageSource`]: [`WinitSource`] for a real
//! desktop window, [`ScriptedSource`] for deterministic runs without a display.

mod message;
mod platform;
mod region;
mod runtime;
mod scripted;

use anyhow::Result;

use crate::coords::ClientSize;

pub use message::{Disposition, KeySet, MessageSource, RawMessage};
pub use platform::WinitSource;
pub use region::ClientRegion;
pub use runtime::Window;
pub use scripted::{ScriptHandle, ScriptedSource, Step};

impl Window<WinitSource> {
    /// Opens a native window whose client region has the given size.
    pub fn create(title: &str, size: ClientSize) -> Result<Self> {
        let source = WinitSource::open(title, size)?;
        Ok(Self::with_source(source))
    }
}

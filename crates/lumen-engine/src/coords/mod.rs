//! Size and viewport value types shared by the window and device layers.
//!
//! Canonical space:
//! - Physical pixels
//! - Origin top-left for GPU targets; input coordinates are flipped to bottom-left
//!   by the window before they reach an `InputHandler`

mod size;
mod viewport;

pub use size::ClientSize;
pub use viewport::Viewport;

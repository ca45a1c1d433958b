//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Raw platform codes (virtual keys, see [`vk`]) are translated into
//! [`InputSymbol`]s through a fixed table; Ctrl/Shift/Alt laterality is recovered
//! by [`LateralModifiers`] from live key state.

mod handler;
mod mapper;
mod state;
mod types;
pub mod vk;

pub use handler::{InputEvent, InputHandler, InputLog};
pub use mapper::{translate, translate_raw};
pub use state::{KeyStateQuery, LateralModifiers, LateralPair};
pub use types::{InputSymbol, KeyTransition};

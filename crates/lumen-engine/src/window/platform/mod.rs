mod winit_source;

pub use winit_source::WinitSource;

//! # Blaze
//!
//! A minimal 2D scene graph with recursive software composition.
//!
//! ## Architecture Overview
//!
//! Blaze is deliberately small. Everything revolves around the [`Sprite`]:
//!
//! - **Surface**: an off-screen RGBA8 pixel buffer with a canvas-like,
//!   stateful 2D drawing context
//! - **Sprite**: a node owning one surface, an ordered list of child sprites,
//!   and alpha/rotation/position/visibility attributes
//! - **Composition**: rendering a sprite draws its own surface, then every
//!   rendered child on top, into one scratch surface
//! - **Containers**: hosts that accept finished surfaces, such as the
//!   in-memory [`Stage`] or the macroquad window behind [`MacroquadDisplay`]
//!
//! ## Example
//!
//! ```
//! use blaze::{Sprite, Stage};
//!
//! let mut root = Sprite::with_size(64, 64);
//! root.surface_mut().fill([0, 0, 255, 255]);
//!
//! let mut child = Sprite::with_size(8, 8).with_alpha(0.5).with_position(4.0, 4.0);
//! child.surface_mut().fill([255, 0, 0, 255]);
//! root.add(child);
//!
//! let mut stage = Stage::new();
//! root.render(Some(&mut stage)).unwrap();
//! assert_eq!(stage.len(), 1);
//! ```

pub mod display;
pub mod scene;
pub mod sprite;
pub mod stage;
pub mod surface;

pub use display::*;
pub use scene::*;
pub use sprite::*;
pub use stage::*;
pub use surface::*;

/// Core error type for the Blaze scene graph.
#[derive(thiserror::Error, Debug)]
pub enum BlazeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A pixel buffer could not be allocated
    #[error("Failed to allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    /// Surface dimensions are zero or exceed the supported maximum
    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The host container refused a surface
    #[error("Container error: {0}")]
    Container(String),

    /// A scene description holds values that cannot be built
    #[error("Invalid scene: {0}")]
    InvalidScene(String),
}

/// Result type used throughout the Blaze codebase.
pub type BlazeResult<T> = Result<T, BlazeError>;

/// Version information for the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library configuration constants.
pub mod config {
    /// Default surface width in pixels, matching an HTML canvas
    pub const DEFAULT_SURFACE_WIDTH: u32 = 300;

    /// Default surface height in pixels, matching an HTML canvas
    pub const DEFAULT_SURFACE_HEIGHT: u32 = 150;

    /// Largest accepted surface width or height
    pub const MAX_SURFACE_DIMENSION: u32 = 8192;

    /// Frames per second target for the demo loop
    pub const TARGET_FPS: u64 = 60;
}

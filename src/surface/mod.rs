//! # Surface Module
//!
//! Off-screen pixel buffers and their stateful 2D drawing context.
//!
//! A [`Surface`] is the software equivalent of a canvas element: an RGBA8
//! buffer plus the drawing state (global alpha and current transform) that a
//! [`Context2d`] reads and mutates. The state lives on the surface itself, so
//! it persists between `context()` calls the same way a canvas context does.

pub mod blend;
pub mod context;

pub use blend::*;
pub use context::*;

use crate::config::MAX_SURFACE_DIMENSION;
use crate::{BlazeError, BlazeResult};
use macroquad::math::Affine2;

/// A single straight-alpha RGBA8 pixel.
pub type Rgba = [u8; 4];

const BYTES_PER_PIXEL: usize = 4;

/// Drawing state captured by [`Context2d::save`] and restored by
/// [`Context2d::restore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    /// Opacity applied to every paint operation, in [0, 1]
    pub global_alpha: f32,
    /// Current user-space to device-space transform
    pub transform: Affine2,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            global_alpha: 1.0,
            transform: Affine2::IDENTITY,
        }
    }
}

/// An off-screen RGBA8 drawing surface.
///
/// Pixels are stored row-major with straight alpha. Two surfaces compare
/// equal when their dimensions and pixels match; drawing state is ignored.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl Surface {
    /// Allocates a transparent surface.
    ///
    /// Fails with [`BlazeError::InvalidDimensions`] when either dimension is
    /// zero or larger than [`MAX_SURFACE_DIMENSION`], and with
    /// [`BlazeError::SurfaceAllocation`] when the buffer cannot be reserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use blaze::Surface;
    ///
    /// let surface = Surface::new(4, 2).unwrap();
    /// assert_eq!(surface.size(), (4, 2));
    /// assert_eq!(surface.get_pixel(3, 1), Some([0, 0, 0, 0]));
    /// assert!(Surface::new(0, 2).is_err());
    /// ```
    pub fn new(width: u32, height: u32) -> BlazeResult<Self> {
        if !Self::valid_dimension(width) || !Self::valid_dimension(height) {
            return Err(BlazeError::InvalidDimensions { width, height });
        }

        let len = width as usize * height as usize * BYTES_PER_PIXEL;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| BlazeError::SurfaceAllocation { width, height })?;
        pixels.resize(len, 0);

        Ok(Self::from_parts(width, height, pixels))
    }

    /// Allocates a transparent surface, clamping both dimensions into
    /// `1..=MAX_SURFACE_DIMENSION`.
    ///
    /// Used where construction is not allowed to fail, such as a sprite's
    /// own surface.
    pub fn blank(width: u32, height: u32) -> Self {
        let width = width.clamp(1, MAX_SURFACE_DIMENSION);
        let height = height.clamp(1, MAX_SURFACE_DIMENSION);
        let pixels = vec![0; width as usize * height as usize * BYTES_PER_PIXEL];
        Self::from_parts(width, height, pixels)
    }

    /// Wraps an existing RGBA8 buffer.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> BlazeResult<Self> {
        if !Self::valid_dimension(width)
            || !Self::valid_dimension(height)
            || pixels.len() != width as usize * height as usize * BYTES_PER_PIXEL
        {
            return Err(BlazeError::InvalidDimensions { width, height });
        }

        Ok(Self::from_parts(width, height, pixels))
    }

    fn from_parts(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
            state: DrawState::default(),
            saved: Vec::new(),
        }
    }

    fn valid_dimension(dimension: u32) -> bool {
        (1..=MAX_SURFACE_DIMENSION).contains(&dimension)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw row-major RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Gets the pixel at the given coordinate, if it is inside the surface.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let idx = self.index(x, y)?;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[idx..idx + BYTES_PER_PIXEL]);
        Some(rgba)
    }

    /// Overwrites the pixel at the given coordinate. Out-of-bounds writes are
    /// ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: Rgba) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx..idx + BYTES_PER_PIXEL].copy_from_slice(&rgba);
        }
    }

    /// Overwrites every pixel with `rgba`, ignoring drawing state.
    pub fn fill(&mut self, rgba: Rgba) {
        for pixel in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&rgba);
        }
    }

    /// Returns true when every pixel is fully transparent.
    pub fn is_clear(&self) -> bool {
        self.pixels
            .chunks_exact(BYTES_PER_PIXEL)
            .all(|pixel| pixel[3] == 0)
    }

    /// Opens the 2D drawing context of this surface.
    pub fn context(&mut self) -> Context2d<'_> {
        Context2d::new(self)
    }

    /// Current global alpha of the drawing context.
    pub fn global_alpha(&self) -> f32 {
        self.state.global_alpha
    }

    /// Current drawing state.
    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Number of states pushed by [`Context2d::save`] and not yet restored.
    pub fn saved_depth(&self) -> usize {
        self.saved.len()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }
}

impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.pixels == other.pixels
    }
}

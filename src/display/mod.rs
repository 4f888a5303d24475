//! # Display Management
//!
//! Presents rendered sprite trees in a macroquad window.

use crate::config::TARGET_FPS;
use crate::stage::Container;
use crate::surface::Surface;
use crate::{BlazeError, BlazeResult};
use log::debug;
use macroquad::prelude::*;

/// A surface queued for upload, with its size already checked against the
/// texture limits.
struct PendingSurface {
    width: u16,
    height: u16,
    surface: Surface,
}

/// Macroquad-backed container for the demo window.
///
/// Surfaces appended during a frame are queued and uploaded as textures by
/// [`MacroquadDisplay::present`], stacked in append order like sibling
/// canvases in a document element.
pub struct MacroquadDisplay {
    /// Surfaces attached since the last present
    pending: Vec<PendingSurface>,
    /// Frames that took longer than the target frame time
    overruns: u64,
    /// Pixel scale applied when drawing surfaces
    pub scale: f32,
    /// Window clear color
    pub background: Color,
}

impl Default for MacroquadDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroquadDisplay {
    /// Creates a display with unit scale and a black background.
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            overruns: 0,
            scale: 1.0,
            background: BLACK,
        }
    }

    /// Number of surfaces waiting for the next present.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Seconds available per frame at [`TARGET_FPS`].
    pub fn frame_budget() -> f32 {
        1.0 / TARGET_FPS as f32
    }

    /// Records how long the last frame took. Returns true and counts an
    /// overrun when it exceeded [`MacroquadDisplay::frame_budget`].
    pub fn record_frame_time(&mut self, seconds: f32) -> bool {
        let budget = Self::frame_budget();
        if seconds <= budget {
            return false;
        }

        self.overruns += 1;
        debug!(
            "frame took {:.1} ms, budget is {:.1} ms ({} overruns)",
            seconds * 1000.0,
            budget * 1000.0,
            self.overruns
        );
        true
    }

    /// Frames recorded over budget so far.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Clears the window and draws every pending surface at the origin.
    pub fn present(&mut self) {
        clear_background(self.background);

        for PendingSurface {
            width,
            height,
            surface,
        } in self.pending.drain(..)
        {
            let texture = Texture2D::from_rgba8(width, height, surface.pixels());
            texture.set_filter(FilterMode::Nearest);

            draw_texture_ex(
                &texture,
                0.0,
                0.0,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(
                        f32::from(width) * self.scale,
                        f32::from(height) * self.scale,
                    )),
                    ..Default::default()
                },
            );
        }
    }
}

impl Container for MacroquadDisplay {
    fn append_child(&mut self, surface: Surface) -> BlazeResult<()> {
        let (width, height) = surface.size();
        let invalid = || BlazeError::InvalidDimensions { width, height };

        self.pending.push(PendingSurface {
            width: u16::try_from(width).map_err(|_| invalid())?,
            height: u16::try_from(height).map_err(|_| invalid())?,
            surface,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appended_surfaces_are_queued() {
        let mut display = MacroquadDisplay::new();
        assert_eq!(display.pending(), 0);

        display.append_child(Surface::blank(4, 2)).unwrap();
        display.append_child(Surface::blank(1, 1)).unwrap();

        assert_eq!(display.pending(), 2);
        assert_eq!(display.pending[0].width, 4);
        assert_eq!(display.pending[0].height, 2);
    }

    #[test]
    fn test_frame_overruns_are_counted() {
        let mut display = MacroquadDisplay::new();
        let budget = MacroquadDisplay::frame_budget();
        assert!((budget - 1.0 / 60.0).abs() < 1e-6);

        assert!(!display.record_frame_time(budget * 0.5));
        assert!(!display.record_frame_time(budget));
        assert!(display.record_frame_time(budget * 3.0));
        assert_eq!(display.overruns(), 1);
    }
}

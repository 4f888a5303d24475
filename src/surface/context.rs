//! # 2D Drawing Context
//!
//! Canvas-style painting onto a [`Surface`].
//!
//! Transforms compose in call order, exactly like `translate`/`rotate` on an
//! HTML canvas: a later call applies in the coordinate space produced by the
//! earlier ones. Painting maps every destination pixel center back through
//! the inverse transform, so rotated output has no holes.

use super::{blend::source_over, DrawState, Rgba, Surface};
use macroquad::math::{vec2, Affine2, Vec2};

/// Stateful drawing interface borrowed from a [`Surface`].
///
/// # Examples
///
/// ```
/// use blaze::Surface;
///
/// let mut surface = Surface::new(8, 8).unwrap();
/// let mut graphics = surface.context();
/// graphics.save();
/// graphics.set_global_alpha(0.5);
/// graphics.translate(2.0, 2.0);
/// graphics.fill_rect(0.0, 0.0, 2.0, 2.0, [255, 0, 0, 255]);
/// graphics.restore();
///
/// assert_eq!(surface.get_pixel(2, 2), Some([255, 0, 0, 128]));
/// assert_eq!(surface.get_pixel(0, 0), Some([0, 0, 0, 0]));
/// assert_eq!(surface.global_alpha(), 1.0);
/// ```
pub struct Context2d<'a> {
    surface: &'a mut Surface,
}

impl<'a> Context2d<'a> {
    pub(crate) fn new(surface: &'a mut Surface) -> Self {
        Self { surface }
    }

    /// Pushes the current drawing state.
    pub fn save(&mut self) {
        self.surface.saved.push(self.surface.state);
    }

    /// Pops the most recently saved drawing state. Does nothing when no
    /// state has been saved.
    pub fn restore(&mut self) {
        if let Some(state) = self.surface.saved.pop() {
            self.surface.state = state;
        }
    }

    /// Current global alpha.
    pub fn global_alpha(&self) -> f32 {
        self.surface.state.global_alpha
    }

    /// Sets the global alpha. Values outside [0, 1] and non-finite values
    /// are ignored.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.surface.state.global_alpha = alpha;
        }
    }

    /// Current transform.
    pub fn transform(&self) -> Affine2 {
        self.surface.state.transform
    }

    /// Replaces the current transform.
    pub fn set_transform(&mut self, transform: Affine2) {
        self.surface.state.transform = transform;
    }

    /// Resets the current transform to identity.
    pub fn reset_transform(&mut self) {
        self.surface.state.transform = Affine2::IDENTITY;
    }

    /// Moves the origin by `(x, y)` in the current coordinate space.
    pub fn translate(&mut self, x: f32, y: f32) {
        self.apply(Affine2::from_translation(vec2(x, y)));
    }

    /// Rotates the coordinate space clockwise (y grows downward) by
    /// `radians` around the current origin.
    pub fn rotate(&mut self, radians: f32) {
        self.apply(Affine2::from_angle(radians));
    }

    /// Scales the coordinate space.
    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.apply(Affine2::from_scale(vec2(sx, sy)));
    }

    fn apply(&mut self, local: Affine2) {
        let state = &mut self.surface.state;
        state.transform = state.transform * local;
    }

    /// Makes every pixel transparent. Ignores transform and alpha.
    pub fn clear(&mut self) {
        self.surface.fill([0, 0, 0, 0]);
    }

    /// Paints a solid rectangle given in user space.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        self.paint(vec2(x, y), vec2(width, height), |_, _| Some(color));
    }

    /// Draws `source` with its top-left corner at `(dx, dy)` in user space.
    ///
    /// Sampling is nearest-neighbour; blending is source-over scaled by the
    /// global alpha.
    pub fn draw_surface(&mut self, source: &Surface, dx: f32, dy: f32) {
        let size = vec2(source.width() as f32, source.height() as f32);
        self.paint(vec2(dx, dy), size, |sx, sy| source.get_pixel(sx, sy));
    }

    /// Blends `shader` over the destination pixels covered by the user-space
    /// rectangle at `origin` with `size`. The shader receives integer
    /// coordinates relative to `origin`.
    fn paint<F>(&mut self, origin: Vec2, size: Vec2, shader: F)
    where
        F: Fn(u32, u32) -> Option<Rgba>,
    {
        let DrawState {
            global_alpha,
            transform,
        } = self.surface.state;

        if global_alpha <= 0.0 || transform.matrix2.determinant().abs() <= f32::EPSILON {
            return;
        }

        let Some((x0, y0, x1, y1)) = self.device_bounds(transform, origin, size) else {
            return;
        };

        let inverse = transform.inverse();

        for py in y0..y1 {
            for px in x0..x1 {
                let center = vec2(px as f32 + 0.5, py as f32 + 0.5);
                let local = inverse.transform_point2(center) - origin;

                if local.x < 0.0 || local.y < 0.0 || local.x >= size.x || local.y >= size.y {
                    continue;
                }

                let Some(src) = shader(local.x as u32, local.y as u32) else {
                    continue;
                };

                if let Some(dst) = self.surface.get_pixel(px, py) {
                    self.surface
                        .set_pixel(px, py, source_over(src, dst, global_alpha));
                }
            }
        }
    }

    /// Device-space pixel bounds `(x0, y0, x1, y1)` of a transformed
    /// rectangle, clipped to the surface. `None` when nothing is covered.
    fn device_bounds(
        &self,
        transform: Affine2,
        origin: Vec2,
        size: Vec2,
    ) -> Option<(u32, u32, u32, u32)> {
        let corners = [
            origin,
            origin + vec2(size.x, 0.0),
            origin + vec2(0.0, size.y),
            origin + size,
        ]
        .map(|corner| transform.transform_point2(corner));

        let min = corners
            .iter()
            .fold(Vec2::splat(f32::INFINITY), |acc, c| acc.min(*c));
        let max = corners
            .iter()
            .fold(Vec2::splat(f32::NEG_INFINITY), |acc, c| acc.max(*c));

        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        let width = self.surface.width() as f32;
        let height = self.surface.height() as f32;

        let x0 = min.x.floor().clamp(0.0, width) as u32;
        let y0 = min.y.floor().clamp(0.0, height) as u32;
        let x1 = max.x.ceil().clamp(0.0, width) as u32;
        let y1 = max.y.ceil().clamp(0.0, height) as u32;

        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        Some((x0, y0, x1, y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const RED: Rgba = [255, 0, 0, 255];
    const GREEN: Rgba = [0, 255, 0, 255];
    const CLEAR: Rgba = [0, 0, 0, 0];

    fn solid(width: u32, height: u32, color: Rgba) -> Surface {
        let mut surface = Surface::new(width, height).unwrap();
        surface.fill(color);
        surface
    }

    #[test]
    fn test_save_restore_round_trip() {
        let mut surface = Surface::new(4, 4).unwrap();
        let mut graphics = surface.context();

        graphics.save();
        graphics.set_global_alpha(0.25);
        graphics.translate(1.0, 1.0);
        assert_eq!(graphics.global_alpha(), 0.25);
        graphics.restore();

        assert_eq!(graphics.global_alpha(), 1.0);
        assert_eq!(graphics.transform(), Affine2::IDENTITY);

        // Unbalanced restore is a no-op
        graphics.restore();
        assert_eq!(surface.saved_depth(), 0);
    }

    #[test]
    fn test_set_and_reset_transform() {
        let mut surface = Surface::new(4, 4).unwrap();
        let shifted = Affine2::from_translation(vec2(3.0, 1.0));

        let mut graphics = surface.context();
        graphics.translate(1.0, 1.0);
        graphics.save();
        graphics.set_transform(shifted);
        assert_eq!(graphics.transform(), shifted);
        graphics.restore();
        assert_eq!(graphics.transform(), Affine2::from_translation(vec2(1.0, 1.0)));

        graphics.reset_transform();
        assert_eq!(surface.state().transform, Affine2::IDENTITY);
        assert_eq!(surface.state().global_alpha, 1.0);
    }

    #[test]
    fn test_set_transform_places_drawing() {
        let source = solid(1, 1, RED);
        let mut target = Surface::new(4, 4).unwrap();
        let mut graphics = target.context();
        graphics.translate(1.0, 0.0);
        graphics.set_transform(Affine2::from_translation(vec2(2.0, 3.0)));
        graphics.draw_surface(&source, 0.0, 0.0);

        assert_eq!(target.get_pixel(2, 3), Some(RED));
        assert_eq!(target.get_pixel(3, 3), Some(CLEAR));
    }

    #[test]
    fn test_global_alpha_ignores_out_of_range() {
        let mut surface = Surface::new(1, 1).unwrap();
        let mut graphics = surface.context();
        graphics.set_global_alpha(0.5);
        graphics.set_global_alpha(1.5);
        graphics.set_global_alpha(-0.1);
        graphics.set_global_alpha(f32::NAN);
        assert_eq!(graphics.global_alpha(), 0.5);
    }

    #[test]
    fn test_draw_surface_at_offset() {
        let source = solid(2, 2, RED);
        let mut target = Surface::new(6, 6).unwrap();
        target.context().draw_surface(&source, 3.0, 1.0);

        assert_eq!(target.get_pixel(3, 1), Some(RED));
        assert_eq!(target.get_pixel(4, 2), Some(RED));
        assert_eq!(target.get_pixel(2, 1), Some(CLEAR));
        assert_eq!(target.get_pixel(5, 1), Some(CLEAR));
        assert_eq!(target.get_pixel(3, 3), Some(CLEAR));
    }

    #[test]
    fn test_draw_surface_clips_negative_offsets() {
        let source = solid(4, 4, RED);
        let mut target = Surface::new(4, 4).unwrap();
        target.context().draw_surface(&source, -2.0, -2.0);

        assert_eq!(target.get_pixel(0, 0), Some(RED));
        assert_eq!(target.get_pixel(1, 1), Some(RED));
        assert_eq!(target.get_pixel(2, 2), Some(CLEAR));
    }

    #[test]
    fn test_translate_then_draw_doubles_offset() {
        let source = solid(1, 1, RED);
        let mut target = Surface::new(8, 8).unwrap();
        let mut graphics = target.context();
        graphics.translate(2.0, 1.0);
        graphics.draw_surface(&source, 2.0, 1.0);

        assert_eq!(target.get_pixel(4, 2), Some(RED));
        assert_eq!(target.get_pixel(2, 1), Some(CLEAR));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        // Left column red, right column green
        let mut source = Surface::new(2, 1).unwrap();
        source.set_pixel(0, 0, RED);
        source.set_pixel(1, 0, GREEN);

        let mut target = Surface::new(4, 4).unwrap();
        let mut graphics = target.context();
        graphics.translate(2.0, 0.0);
        graphics.rotate(FRAC_PI_2);
        graphics.draw_surface(&source, 0.0, 0.0);

        // A quarter turn maps +x onto +y and +y onto -x
        assert_eq!(target.get_pixel(1, 0), Some(RED));
        assert_eq!(target.get_pixel(1, 1), Some(GREEN));
        assert_eq!(target.get_pixel(2, 0), Some(CLEAR));
    }

    #[test]
    fn test_global_alpha_scales_coverage() {
        let source = solid(1, 1, RED);
        let mut target = Surface::new(1, 1).unwrap();
        let mut graphics = target.context();
        graphics.set_global_alpha(0.5);
        graphics.draw_surface(&source, 0.0, 0.0);

        assert_eq!(target.get_pixel(0, 0), Some([255, 0, 0, 128]));
    }

    #[test]
    fn test_zero_scale_draws_nothing() {
        let source = solid(2, 2, RED);
        let mut target = Surface::new(2, 2).unwrap();
        let mut graphics = target.context();
        graphics.scale(0.0, 1.0);
        graphics.draw_surface(&source, 0.0, 0.0);
        assert!(target.is_clear());
    }

    #[test]
    fn test_fill_rect_and_clear() {
        let mut target = Surface::new(4, 4).unwrap();
        let mut graphics = target.context();
        graphics.fill_rect(1.0, 1.0, 2.0, 2.0, GREEN);
        assert_eq!(target.get_pixel(2, 2), Some(GREEN));
        assert_eq!(target.get_pixel(0, 0), Some(CLEAR));

        target.context().clear();
        assert!(target.is_clear());
    }
}

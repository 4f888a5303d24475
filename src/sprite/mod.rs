//! # Sprite Module
//!
//! Scene graph nodes and the recursive composition algorithm.
//!
//! A [`Sprite`] owns one [`Surface`] for its own content and an ordered list
//! of children. Rendering composites the sprite's surface and every rendered
//! child into a scratch surface, back to front in insertion order, and either
//! hands the result to the caller or attaches it to a [`Container`].

pub mod id;

pub use id::*;

use crate::config::{DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};
use crate::scene::SpriteSettings;
use crate::stage::Container;
use crate::surface::Surface;
use crate::BlazeResult;
use log::{debug, trace};
use std::borrow::Cow;
use std::f32::consts::PI;
use std::ops::Deref;

/// A node in a tree of drawable surfaces.
///
/// Children are owned by value, so a sprite can never be attached to two
/// parents and a tree can never contain a cycle.
///
/// # Examples
///
/// ```
/// use blaze::Sprite;
///
/// let mut root = Sprite::new();
/// root.add(Sprite::new()).add(Sprite::new());
/// assert_eq!(root.children().len(), 2);
///
/// // A leaf renders as its own surface
/// let mut leaf = Sprite::new();
/// let expected = leaf.surface().clone();
/// let rendered = leaf.render(None).unwrap().unwrap();
/// assert_eq!(*rendered, expected);
/// ```
#[derive(Debug)]
pub struct Sprite {
    id: SpriteId,
    surface: Surface,
    children: Vec<Sprite>,
    /// Opacity in [0, 1]; zero skips the sprite and its subtree
    pub alpha: f32,
    /// Rotation in degrees
    pub rotation: f32,
    /// Horizontal offset in the parent's coordinate space
    pub x: f32,
    /// Vertical offset in the parent's coordinate space
    pub y: f32,
    /// Hidden sprites are skipped together with their subtree
    pub visible: bool,
}

impl Default for Sprite {
    fn default() -> Self {
        Self::new()
    }
}

impl Sprite {
    /// Creates a sprite with a default-size transparent surface.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_SURFACE_WIDTH, DEFAULT_SURFACE_HEIGHT)
    }

    /// Creates a sprite whose surface has the given size. Dimensions are
    /// clamped into the supported range.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            id: SpriteId::next(),
            surface: Surface::blank(width, height),
            children: Vec::new(),
            alpha: 1.0,
            rotation: 0.0,
            x: 0.0,
            y: 0.0,
            visible: true,
        }
    }

    /// Creates a childless sprite from a settings object.
    ///
    /// The `children` of the settings are not built here; see
    /// [`SpriteSettings::build`] for whole trees.
    pub fn from_settings(settings: &SpriteSettings) -> Self {
        let mut sprite = Self::with_size(settings.width, settings.height)
            .with_alpha(settings.alpha)
            .with_rotation(settings.rotation)
            .with_position(settings.x, settings.y)
            .with_visible(settings.visible);

        if let Some(fill) = settings.fill {
            sprite.surface.fill(fill);
        }

        sprite
    }

    /// Sets the alpha.
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the rotation in degrees.
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Sets the position.
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Sets visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Appends a child and returns the sprite by value.
    pub fn with_child(mut self, child: Sprite) -> Self {
        self.children.push(child);
        self
    }

    /// The sprite's unique id.
    pub fn id(&self) -> SpriteId {
        self.id
    }

    /// The sprite's own surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Mutable access to the sprite's own surface, for painting content.
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Appends a child. Insertion order is paint order, back to front.
    ///
    /// Returns the sprite itself so calls can be chained.
    pub fn add(&mut self, child: Sprite) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Read-only view of the children in paint order.
    pub fn children(&self) -> &[Sprite] {
        &self.children
    }

    /// Mutable view of the children. Attributes can be changed through it,
    /// but children cannot be inserted, removed or reordered.
    pub fn children_mut(&mut self) -> &mut [Sprite] {
        &mut self.children
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Rotation converted to radians.
    ///
    /// # Examples
    ///
    /// ```
    /// use blaze::Sprite;
    ///
    /// let sprite = Sprite::new().with_rotation(180.0);
    /// assert!((sprite.rotation_to_radians() - std::f32::consts::PI).abs() < 1e-6);
    /// ```
    pub fn rotation_to_radians(&self) -> f32 {
        self.rotation * (PI / 180.0)
    }

    /// Whether a render call would draw anything.
    ///
    /// Hidden sprites and sprites whose alpha is zero or NaN are skipped.
    pub fn is_rendered(&self) -> bool {
        self.visible && self.alpha != 0.0 && !self.alpha.is_nan()
    }

    /// Renders the sprite together with its subtree.
    ///
    /// Returns `Ok(None)` when the sprite is hidden or fully transparent, in
    /// which case nothing is drawn or allocated. A leaf renders as its own
    /// surface; a sprite with children renders into a freshly allocated
    /// scratch surface holding its own surface at `(x, y)` followed by each
    /// rendered child.
    ///
    /// With a `target`, the result is drawn with the sprite's alpha into a
    /// new wrapper surface that is appended to the container, and `Ok(None)`
    /// is returned.
    ///
    /// The global alpha of the sprite's own surface is restored before
    /// returning, including when an error is propagated.
    pub fn render(
        &mut self,
        target: Option<&mut dyn Container>,
    ) -> BlazeResult<Option<Cow<'_, Surface>>> {
        if !self.is_rendered() {
            trace!(
                "{} skipped (visible: {}, alpha: {})",
                self.id,
                self.visible,
                self.alpha
            );
            return Ok(None);
        }

        let composed = {
            let own = AlphaGuard::new(&mut self.surface);
            let composed = Self::composite(&own, &mut self.children, self.x, self.y)?;

            if let Some(container) = target {
                let result = composed.as_ref().unwrap_or(&*own);
                let wrapper = Self::wrap(result, self.alpha, self.x, self.y)?;
                debug!("{} attached {}x{} surface", self.id, wrapper.width(), wrapper.height());
                container.append_child(wrapper)?;
                return Ok(None);
            }

            composed
        };

        Ok(Some(match composed {
            Some(scratch) => Cow::Owned(scratch),
            None => Cow::Borrowed(&self.surface),
        }))
    }

    /// Draws `own` and every rendered child into a scratch surface.
    /// Returns `None` for a leaf.
    fn composite(
        own: &Surface,
        children: &mut [Sprite],
        x: f32,
        y: f32,
    ) -> BlazeResult<Option<Surface>> {
        if children.is_empty() {
            return Ok(None);
        }

        let mut scratch = Surface::new(own.width(), own.height())?;
        let mut graphics = scratch.context();
        graphics.draw_surface(own, x, y);

        for child in children.iter_mut() {
            let (alpha, cx, cy, radians) =
                (child.alpha, child.x, child.y, child.rotation_to_radians());

            let Some(rendered) = child.render(None)? else {
                continue;
            };

            graphics.save();
            graphics.set_global_alpha(alpha);
            graphics.translate(cx, cy);
            graphics.rotate(radians);
            graphics.draw_surface(&rendered, cx, cy);
            graphics.restore();
        }

        debug!("composited {} children", children.len());
        Ok(Some(scratch))
    }

    /// Copies `result` into a new surface with the sprite's alpha applied.
    fn wrap(result: &Surface, alpha: f32, x: f32, y: f32) -> BlazeResult<Surface> {
        let mut wrapper = Surface::new(result.width(), result.height())?;
        let mut graphics = wrapper.context();
        graphics.set_global_alpha(alpha);
        graphics.draw_surface(result, x, y);
        Ok(wrapper)
    }
}

/// Holds a sprite's own surface for the duration of a render call and puts
/// its global alpha back when dropped.
struct AlphaGuard<'a> {
    surface: &'a mut Surface,
    saved: f32,
}

impl<'a> AlphaGuard<'a> {
    fn new(surface: &'a mut Surface) -> Self {
        let saved = surface.global_alpha();
        Self { surface, saved }
    }
}

impl Deref for AlphaGuard<'_> {
    type Target = Surface;

    fn deref(&self) -> &Surface {
        &*self.surface
    }
}

impl Drop for AlphaGuard<'_> {
    fn drop(&mut self) {
        self.surface.context().set_global_alpha(self.saved);
    }
}

//! # Scene Module
//!
//! Declarative sprite settings and JSON scene descriptions.
//!
//! A scene file holds one root [`SpriteSettings`] tree. Building it validates
//! every node before any sprite is created, so a bad file never yields a
//! half-built tree.

use crate::config::{DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH, MAX_SURFACE_DIMENSION};
use crate::sprite::Sprite;
use crate::surface::Rgba;
use crate::{BlazeError, BlazeResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Construction settings for one sprite and, optionally, its subtree.
///
/// Every field is optional in JSON and falls back to the sprite defaults.
///
/// # Examples
///
/// ```
/// use blaze::SpriteSettings;
///
/// let settings: SpriteSettings =
///     serde_json::from_str(r#"{ "width": 16, "height": 16, "alpha": 0.5 }"#).unwrap();
/// assert_eq!(settings.width, 16);
/// assert_eq!(settings.alpha, 0.5);
/// assert!(settings.visible);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteSettings {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Opacity in [0, 1]
    pub alpha: f32,
    /// Rotation in degrees
    pub rotation: f32,
    /// Horizontal offset
    pub x: f32,
    /// Vertical offset
    pub y: f32,
    /// Visibility flag
    pub visible: bool,
    /// Solid color the surface is filled with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgba>,
    /// Child settings in paint order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SpriteSettings>,
}

impl Default for SpriteSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_SURFACE_WIDTH,
            height: DEFAULT_SURFACE_HEIGHT,
            alpha: 1.0,
            rotation: 0.0,
            x: 0.0,
            y: 0.0,
            visible: true,
            fill: None,
            children: Vec::new(),
        }
    }
}

impl SpriteSettings {
    /// Checks this node and every descendant.
    pub fn validate(&self) -> BlazeResult<()> {
        let dimensions = 1..=MAX_SURFACE_DIMENSION;
        if !dimensions.contains(&self.width) || !dimensions.contains(&self.height) {
            return Err(BlazeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        if !self.alpha.is_finite() || !(0.0..=1.0).contains(&self.alpha) {
            return Err(BlazeError::InvalidScene(format!(
                "alpha {} is outside [0, 1]",
                self.alpha
            )));
        }

        for (name, value) in [("rotation", self.rotation), ("x", self.x), ("y", self.y)] {
            if !value.is_finite() {
                return Err(BlazeError::InvalidScene(format!("{} is not finite", name)));
            }
        }

        self.children.iter().try_for_each(SpriteSettings::validate)
    }

    /// Validates the settings and builds the whole sprite tree.
    pub fn build(&self) -> BlazeResult<Sprite> {
        self.validate()?;
        Ok(self.build_unchecked())
    }

    fn build_unchecked(&self) -> Sprite {
        self.children
            .iter()
            .fold(Sprite::from_settings(self), |sprite, child| {
                sprite.with_child(child.build_unchecked())
            })
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(SpriteSettings::node_count)
            .sum::<usize>()
    }
}

/// A named scene loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Human readable scene name
    #[serde(default)]
    pub name: String,
    /// Root of the sprite tree
    pub root: SpriteSettings,
}

impl SceneDescription {
    /// Parses a scene from a JSON string.
    pub fn from_json(json: &str) -> BlazeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a scene file.
    pub fn load(path: impl AsRef<Path>) -> BlazeResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let scene = Self::from_json(&json)?;
        debug!(
            "loaded scene '{}' with {} sprites from {}",
            scene.name,
            scene.root.node_count(),
            path.display()
        );
        Ok(scene)
    }

    /// Serializes the scene as pretty-printed JSON.
    pub fn to_json(&self) -> BlazeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the sprite tree of the scene.
    pub fn build(&self) -> BlazeResult<Sprite> {
        self.root.build()
    }
}

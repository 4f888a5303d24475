//! # Stage Module
//!
//! Host containers that rendered sprites can be attached to.

use crate::surface::Surface;
use crate::{BlazeError, BlazeResult};
use log::trace;

/// A host element that accepts finished surfaces.
///
/// This is the single attachment primitive a sprite needs from its host:
/// append one surface as the last child of the container.
pub trait Container {
    /// Appends `surface` after any surfaces attached earlier.
    fn append_child(&mut self, surface: Surface) -> BlazeResult<()>;
}

/// An in-memory container that keeps appended surfaces in order.
///
/// # Examples
///
/// ```
/// use blaze::{Container, Stage, Surface};
///
/// let mut stage = Stage::new();
/// stage.append_child(Surface::new(2, 2).unwrap()).unwrap();
/// assert_eq!(stage.len(), 1);
///
/// let mut full = Stage::with_limit(0);
/// assert!(full.append_child(Surface::new(2, 2).unwrap()).is_err());
/// ```
#[derive(Debug, Default)]
pub struct Stage {
    children: Vec<Surface>,
    limit: Option<usize>,
}

impl Stage {
    /// Creates an empty, unbounded stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stage that refuses surfaces once it holds `limit` of them.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            children: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Attached surfaces in append order.
    pub fn children(&self) -> &[Surface] {
        &self.children
    }

    /// The most recently attached surface.
    pub fn last(&self) -> Option<&Surface> {
        self.children.last()
    }

    /// Number of attached surfaces.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Removes and returns every attached surface.
    pub fn drain(&mut self) -> Vec<Surface> {
        std::mem::take(&mut self.children)
    }

    /// Detaches everything.
    pub fn clear(&mut self) {
        self.children.clear();
    }
}

impl Container for Stage {
    fn append_child(&mut self, surface: Surface) -> BlazeResult<()> {
        if let Some(limit) = self.limit {
            if self.children.len() >= limit {
                return Err(BlazeError::Container(format!(
                    "stage is full ({} surfaces)",
                    limit
                )));
            }
        }

        trace!(
            "stage appended {}x{} surface at index {}",
            surface.width(),
            surface.height(),
            self.children.len()
        );
        self.children.push(surface);
        Ok(())
    }
}

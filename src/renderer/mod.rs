//! Visual surface module
//!
//! The bean logic only creates elements, attaches/detaches them and sets
//! their 2D affine transform; drawing is owned by the surface.

pub mod art;
pub mod svg;

pub use art::BeanArt;
pub use svg::SvgSurface;

use glam::Affine2;
use serde::{Deserialize, Serialize};

use crate::sim::Viewport;

/// Opaque id of a drawable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

/// The contract a drawing surface must offer the bean logic
pub trait Surface {
    /// Create a detached element from instance markup
    fn create_element(&mut self, markup: String) -> ElementId;
    fn set_transform(&mut self, element: ElementId, transform: Affine2);
    /// Append to the surface root (no-op if already attached)
    fn attach(&mut self, element: ElementId);
    fn detach(&mut self, element: ElementId);
    fn is_attached(&self, element: ElementId) -> bool;
    /// Drop the element entirely
    fn remove_element(&mut self, element: ElementId) -> bool;
    /// Elements known to the surface, attached or not
    fn element_count(&self) -> usize;
    fn resize(&mut self, viewport: Viewport);
}

//! Retained SVG surface
//!
//! Keeps every bean group with its transform and renders the attached ones,
//! in attach order, into a standalone SVG document.

use std::collections::BTreeMap;
use std::fmt::Write;

use glam::Affine2;

use super::{ElementId, Surface};
use crate::sim::Viewport;

#[derive(Debug, Clone)]
struct SvgElement {
    markup: String,
    transform: Affine2,
}

/// SVG scene graph with a single root
#[derive(Debug, Clone)]
pub struct SvgSurface {
    viewport: Viewport,
    elements: BTreeMap<ElementId, SvgElement>,
    /// Children of the root, in paint order
    attached: Vec<ElementId>,
    next_id: u32,
}

impl SvgSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            elements: BTreeMap::new(),
            attached: Vec::new(),
            next_id: 1,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn transform(&self, element: ElementId) -> Option<Affine2> {
        self.elements.get(&element).map(|e| e.transform)
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    /// Render the attached elements as an SVG document
    pub fn to_svg(&self) -> String {
        let (w, h) = (self.viewport.width, self.viewport.height);
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" id="bean-stage-svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" preserveAspectRatio="xMidYMid meet">"#
        );
        for id in &self.attached {
            let Some(el) = self.elements.get(id) else {
                continue;
            };
            let [a, b, c, d, e, f] = matrix(&el.transform);
            let _ = writeln!(
                out,
                r#"  <g class="coffee-bean" pointer-events="none" transform="matrix({a:.4} {b:.4} {c:.4} {d:.4} {e:.3} {f:.3})">{}</g>"#,
                el.markup
            );
        }
        out.push_str("</svg>\n");
        out
    }
}

/// SVG `matrix(a b c d e f)` coefficients
fn matrix(t: &Affine2) -> [f32; 6] {
    let m = t.matrix2;
    [m.x_axis.x, m.x_axis.y, m.y_axis.x, m.y_axis.y, t.translation.x, t.translation.y]
}

impl Surface for SvgSurface {
    fn create_element(&mut self, markup: String) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(
            id,
            SvgElement {
                markup,
                transform: Affine2::IDENTITY,
            },
        );
        id
    }

    fn set_transform(&mut self, element: ElementId, transform: Affine2) {
        if let Some(el) = self.elements.get_mut(&element) {
            el.transform = transform;
        }
    }

    fn attach(&mut self, element: ElementId) {
        if self.elements.contains_key(&element) && !self.attached.contains(&element) {
            self.attached.push(element);
        }
    }

    fn detach(&mut self, element: ElementId) {
        self.attached.retain(|&id| id != element);
    }

    fn is_attached(&self, element: ElementId) -> bool {
        self.attached.contains(&element)
    }

    fn remove_element(&mut self, element: ElementId) -> bool {
        self.detach(element);
        self.elements.remove(&element).is_some()
    }

    fn element_count(&self) -> usize {
        self.elements.len()
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn surface() -> SvgSurface {
        SvgSurface::new(Viewport::new(800.0, 600.0))
    }

    #[test]
    fn test_elements_start_detached() {
        let mut s = surface();
        let el = s.create_element("<path/>".into());
        assert!(!s.is_attached(el));
        s.attach(el);
        s.attach(el);
        assert!(s.is_attached(el));
        assert_eq!(s.attached_count(), 1);
    }

    #[test]
    fn test_detach_keeps_element() {
        let mut s = surface();
        let el = s.create_element(String::new());
        s.attach(el);
        s.detach(el);
        assert!(!s.is_attached(el));
        assert_eq!(s.element_count(), 1);
    }

    #[test]
    fn test_remove_element() {
        let mut s = surface();
        let el = s.create_element(String::new());
        s.attach(el);
        assert!(s.remove_element(el));
        assert!(!s.remove_element(el));
        assert_eq!(s.element_count(), 0);
        assert_eq!(s.attached_count(), 0);
    }

    #[test]
    fn test_to_svg_renders_only_attached() {
        let mut s = surface();
        let shown = s.create_element("<path d=\"M0 0\"/>".into());
        let hidden = s.create_element("<circle/>".into());
        s.attach(shown);
        s.set_transform(shown, Affine2::from_translation(Vec2::new(12.5, 40.0)));
        s.set_transform(hidden, Affine2::IDENTITY);

        let svg = s.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 800 600""#));
        assert!(svg.contains("matrix(1.0000 0.0000 0.0000 1.0000 12.500 40.000)"));
        assert!(svg.contains("<path d=\"M0 0\"/>"));
        assert!(!svg.contains("<circle/>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_resize_updates_viewbox() {
        let mut s = surface();
        s.resize(Viewport::new(400.0, 300.0));
        assert!(s.to_svg().contains(r#"viewBox="0 0 400 300""#));
    }
}

//! Viewport visibility classification
//!
//! A surface counts as visible while its owner's position lies inside the
//! viewport grown by a fixed leeway on every side. The test is the classic
//! signed-area check against the four edges of a convex quad wound
//! clockwise in screen space (Y down): a strictly positive area on any edge
//! puts the point outside. Points on an edge are inside.

use crate::foundation::math::Vec2;

/// Signed area of the triangle `(a, b, p)`
///
/// Positive when `p` lies on the outer side of edge `a -> b` for a clockwise
/// screen-space winding, zero when the three points are collinear.
pub fn signed_area(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (p.x * b.y - b.x * p.y) - (p.x * a.y - a.x * p.y) + (b.x * a.y - a.x * b.y)
}

/// Convex quad `a -> b -> c -> d`, clockwise on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportQuad {
    corners: [Vec2; 4],
}

impl ViewportQuad {
    /// Quad from four clockwise corners
    pub fn new(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Self {
        Self {
            corners: [a, b, c, d],
        }
    }

    /// Viewport of `width` x `height` pixels grown by `leeway` on each side
    #[allow(clippy::cast_precision_loss)]
    pub fn from_viewport(width: u32, height: u32, leeway: f32) -> Self {
        let min = -leeway;
        let max_x = width as f32 + leeway;
        let max_y = height as f32 + leeway;
        Self::new(
            Vec2::new(min, min),
            Vec2::new(max_x, min),
            Vec2::new(max_x, max_y),
            Vec2::new(min, max_y),
        )
    }

    /// Corners in winding order
    pub fn corners(&self) -> [Vec2; 4] {
        self.corners
    }

    /// Whether `point` is inside or on the boundary
    pub fn contains(&self, point: Vec2) -> bool {
        let [a, b, c, d] = self.corners;
        !(signed_area(a, b, point) > 0.0
            || signed_area(b, c, point) > 0.0
            || signed_area(c, d, point) > 0.0
            || signed_area(d, a, point) > 0.0)
    }
}

/// Edge of a visibility transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
    /// Outside -> inside
    BecameVisible,
    /// Inside -> outside
    BecameHidden,
}

/// Update a surface's visibility flag from this frame's containment result
///
/// Returns the transition to report, or `None` when the state is unchanged.
pub fn update_visibility(visible: &mut bool, inside: bool) -> Option<VisibilityChange> {
    match (*visible, inside) {
        (false, true) => {
            *visible = true;
            Some(VisibilityChange::BecameVisible)
        }
        (true, false) => {
            *visible = false;
            Some(VisibilityChange::BecameHidden)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> ViewportQuad {
        ViewportQuad::from_viewport(800, 600, 20.0)
    }

    #[test]
    fn test_point_inside_is_visible() {
        assert!(quad().contains(Vec2::new(400.0, 300.0)));
        assert!(quad().contains(Vec2::new(-10.0, -10.0)));
        assert!(quad().contains(Vec2::new(815.0, 615.0)));
    }

    #[test]
    fn test_point_outside_each_edge_is_hidden() {
        let q = quad();
        assert!(!q.contains(Vec2::new(400.0, -25.0)));
        assert!(!q.contains(Vec2::new(825.0, 300.0)));
        assert!(!q.contains(Vec2::new(400.0, 625.0)));
        assert!(!q.contains(Vec2::new(-25.0, 300.0)));
    }

    #[test]
    fn test_boundary_counts_as_inside() {
        let q = quad();
        assert!(q.contains(Vec2::new(-20.0, 300.0)));
        assert!(q.contains(Vec2::new(820.0, 620.0)));
    }

    #[test]
    fn test_signed_area_sign() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!(signed_area(a, b, Vec2::new(5.0, -1.0)) > 0.0);
        assert!(signed_area(a, b, Vec2::new(5.0, 1.0)) < 0.0);
        assert_eq!(signed_area(a, b, Vec2::new(5.0, 0.0)), 0.0);
    }

    #[test]
    fn test_transitions_fire_once() {
        let mut visible = false;
        assert_eq!(update_visibility(&mut visible, true), Some(VisibilityChange::BecameVisible));
        assert!(visible);
        assert_eq!(update_visibility(&mut visible, true), None);
        assert_eq!(update_visibility(&mut visible, false), Some(VisibilityChange::BecameHidden));
        assert!(!visible);
        assert_eq!(update_visibility(&mut visible, false), None);
    }
}

//! Narrow-phase overlap tests
//!
//! Touching is not colliding: every test uses a strict inequality so that
//! bodies resting exactly in contact are left alone.

use glam::Vec2;

use crate::body::{Body, Shape};
use crate::bounds::Bounds;
use crate::math::{self, FALLBACK_NORMAL};

/// Overlap between two shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manifold {
    /// Unit vector pointing from the first body towards the second
    pub normal: Vec2,
    /// Penetration depth, always positive
    pub depth: f32,
    /// Centres coincided and `normal` is the fallback axis
    pub degenerate: bool,
}

/// Confirmed overlap between bodies `a` and `b` (indices, `a < b`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: usize,
    pub b: usize,
    pub normal: Vec2,
    pub depth: f32,
    pub degenerate: bool,
}

impl Contact {
    pub fn new(a: usize, b: usize, manifold: Manifold) -> Self {
        Self {
            a,
            b,
            normal: manifold.normal,
            depth: manifold.depth,
            degenerate: manifold.degenerate,
        }
    }
}

/// Circle-circle test.
///
/// Returns `None` unless the centres are strictly closer than the sum of the
/// radii.
pub fn test_circle_circle(a: &Body, b: &Body) -> Option<Manifold> {
    match (a.shape(), b.shape()) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            let reach = ra + rb;
            let delta = b.position - a.position;

            // Cheap box rejection before the square root
            if delta.x.abs() >= reach || delta.y.abs() >= reach {
                return None;
            }
            if delta.length_squared() >= reach * reach {
                return None;
            }

            Some(match math::direction_and_length(delta) {
                Some((normal, distance)) => Manifold {
                    normal,
                    depth: reach - distance,
                    degenerate: false,
                },
                None => Manifold {
                    normal: FALLBACK_NORMAL,
                    depth: reach,
                    degenerate: true,
                },
            })
        }
    }
}

/// Which part of the boundary was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
    Bottom,
    Top,
    /// Rim of a circular arena
    Rim,
}

/// Penetration of a body into one wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    pub wall: Wall,
    /// Unit normal pointing back into the world
    pub normal: Vec2,
    pub depth: f32,
}

/// All walls a body penetrates; at most two for a body that fits the bounds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundaryContacts {
    hits: [Option<WallContact>; 4],
}

impl BoundaryContacts {
    fn push(&mut self, hit: WallContact) {
        if let Some(slot) = self.hits.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(hit);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &WallContact> {
        self.hits.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.iter().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }
}

/// Test a body against the world boundary
pub fn test_boundary(body: &Body, bounds: &Bounds) -> BoundaryContacts {
    let mut contacts = BoundaryContacts::default();
    let r = body.radius();
    let p = body.position;

    match *bounds {
        Bounds::Rect { min, max } => {
            let walls = [
                (Wall::Left, Vec2::X, min.x - (p.x - r)),
                (Wall::Right, Vec2::NEG_X, (p.x + r) - max.x),
                (Wall::Bottom, Vec2::Y, min.y - (p.y - r)),
                (Wall::Top, Vec2::NEG_Y, (p.y + r) - max.y),
            ];
            for (wall, normal, depth) in walls {
                if depth > 0.0 {
                    contacts.push(WallContact { wall, normal, depth });
                }
            }
        }
        Bounds::Circle { center, radius } => {
            let (outward, distance) =
                math::direction_and_length(p - center).unwrap_or((Vec2::NEG_Y, 0.0));
            let depth = distance + r - radius;
            if depth > 0.0 {
                contacts.push(WallContact {
                    wall: Wall::Rim,
                    normal: -outward,
                    depth,
                });
            }
        }
    }

    contacts
}

/// Run the narrow phase over `pairs`, appending confirmed contacts to `out`
/// in ascending `(a, b)` order. Returns the number of candidates examined.
pub fn detect_contacts<I>(bodies: &[Body], pairs: I, out: &mut Vec<Contact>) -> usize
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let start = out.len();
    let mut examined = 0;

    for (a, b) in pairs {
        examined += 1;
        if let Some(manifold) = test_circle_circle(&bodies[a], &bodies[b]) {
            out.push(Contact::new(a, b, manifold));
        }
    }

    out[start..].sort_unstable_by_key(|contact| (contact.a, contact.b));
    examined
}

/// Every overlapping pair found by testing all pairs. Quadratic; used as the
/// reference for the grid.
pub fn brute_force_pairs(bodies: &[Body]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            if test_circle_circle(&bodies[i], &bodies[j]).is_some() {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(x: f32, y: f32, r: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::ZERO, r, 1.0, 1.0).unwrap()
    }

    #[test]
    fn overlapping_circles_report_depth_and_normal() {
        let m = test_circle_circle(&circle(0.0, 0.0, 1.0), &circle(1.5, 0.0, 1.0)).unwrap();
        assert!((m.depth - 0.5).abs() < 1e-6);
        assert_eq!(m.normal, Vec2::X);
        assert!(!m.degenerate);
    }

    #[test]
    fn tangent_circles_do_not_collide() {
        assert!(test_circle_circle(&circle(0.0, 0.0, 1.0), &circle(2.0, 0.0, 1.0)).is_none());
        assert!(test_circle_circle(&circle(0.0, 0.0, 1.0), &circle(0.0, -2.0, 1.0)).is_none());
    }

    #[test]
    fn coincident_centres_use_fallback_normal() {
        let m = test_circle_circle(&circle(3.0, 3.0, 1.0), &circle(3.0, 3.0, 0.5)).unwrap();
        assert!(m.degenerate);
        assert_eq!(m.normal, FALLBACK_NORMAL);
        assert!((m.depth - 1.5).abs() < 1e-6);
    }

    #[test]
    fn corner_hits_two_walls() {
        let bounds = Bounds::rect(10.0, 10.0).unwrap();
        let hits = test_boundary(&circle(0.5, 9.8, 1.0), &bounds);
        let walls: Vec<_> = hits.iter().map(|hit| hit.wall).collect();
        assert_eq!(walls, vec![Wall::Left, Wall::Top]);
        let left = hits.iter().next().unwrap();
        assert!((left.depth - 0.5).abs() < 1e-6);
        assert_eq!(left.normal, Vec2::X);
    }

    #[test]
    fn resting_on_wall_is_not_a_hit() {
        let bounds = Bounds::rect(10.0, 10.0).unwrap();
        assert!(test_boundary(&circle(5.0, 1.0, 1.0), &bounds).is_empty());
    }

    #[test]
    fn circular_rim_pushes_inward() {
        let bounds = Bounds::circle(Vec2::ZERO, 10.0).unwrap();
        let hits = test_boundary(&circle(0.0, 9.5, 1.0), &bounds);
        assert_eq!(hits.len(), 1);
        let hit = hits.iter().next().unwrap();
        assert_eq!(hit.wall, Wall::Rim);
        assert!((hit.normal - Vec2::NEG_Y).length() < 1e-6);
        assert!((hit.depth - 0.5).abs() < 1e-5);
    }

    #[test]
    fn detected_contacts_are_sorted() {
        let bodies = [circle(0.0, 0.0, 1.0), circle(1.0, 0.0, 1.0), circle(0.5, 0.5, 1.0)];
        let mut contacts = Vec::new();
        let examined = detect_contacts(&bodies, [(1, 2), (0, 2), (0, 1)], &mut contacts);
        assert_eq!(examined, 3);
        let order: Vec<_> = contacts.iter().map(|c| (c.a, c.b)).collect();
        assert_eq!(order, vec![(0, 1), (0, 2), (1, 2)]);
    }
}

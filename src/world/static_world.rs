//! Static world built from planes, boxes and triangles

use crate::core::types::Vec3;
use crate::math::{Aabb, Ray};
use super::{RayHit, SolidId, World};

/// Collision shape of a solid
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Infinite plane `normal . p = offset`, hit from either side
    Plane { normal: Vec3, offset: f32 },
    /// Axis-aligned box, hit only from outside
    Box(Aabb),
    /// Triangle, hit from either side, reporting the face normal on the
    /// side the ray came from
    Triangle { a: Vec3, b: Vec3, c: Vec3, normal: Vec3 },
}

impl Shape {
    /// Plane through `point` facing `normal`. `None` for a zero normal.
    pub fn plane(normal: Vec3, point: Vec3) -> Option<Self> {
        let normal = normal.try_normalize()?;
        Some(Shape::Plane { normal, offset: normal.dot(point) })
    }

    /// Triangle with counter-clockwise winding. `None` if degenerate.
    pub fn triangle(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let normal = (b - a).cross(c - a).try_normalize()?;
        Some(Shape::Triangle { a, b, c, normal })
    }

    /// Distance and normal of the hit along `ray`
    fn hit(&self, ray: &Ray) -> Option<(f32, Vec3)> {
        match *self {
            Shape::Plane { normal, offset } => ray.hit_plane(normal, offset).map(|t| (t, normal)),
            Shape::Box(aabb) => ray.hit_aabb(&aabb),
            Shape::Triangle { a, b, c, normal } => {
                let t = ray.hit_triangle(a, b, c)?;
                // Back face: report the underside
                let normal = if normal.dot(ray.direction) > 0.0 { -normal } else { normal };
                Some((t, normal))
            }
        }
    }
}

/// A shape with an identity and optional name
#[derive(Clone, Debug)]
pub struct Solid {
    pub id: SolidId,
    pub name: Option<String>,
    pub shape: Shape,
}

/// Immutable-after-build collection of solids answering nearest-hit queries.
///
/// Queries are a linear scan; levels for this controller are small.
#[derive(Clone, Debug, Default)]
pub struct StaticWorld {
    solids: Vec<Solid>,
    next_id: u32,
}

impl StaticWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unnamed solid, returning its id
    pub fn add(&mut self, shape: Shape) -> SolidId {
        self.insert(shape, None)
    }

    /// Add a named solid, returning its id
    pub fn add_named(&mut self, name: impl Into<String>, shape: Shape) -> SolidId {
        self.insert(shape, Some(name.into()))
    }

    fn insert(&mut self, shape: Shape, name: Option<String>) -> SolidId {
        let id = SolidId(self.next_id);
        self.next_id += 1;

        self.solids.push(Solid { id, name, shape });
        id
    }

    /// Look up a solid by id
    pub fn solid(&self, id: SolidId) -> Option<&Solid> {
        // Ids are handed out sequentially and solids are never removed
        self.solids.get(id.0 as usize).filter(|s| s.id == id)
    }

    /// All solids in insertion order
    pub fn solids(&self) -> &[Solid] {
        &self.solids
    }

    /// Number of solids
    pub fn len(&self) -> usize {
        self.solids.len()
    }

    /// Whether the world has no solids
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }
}

impl World for StaticWorld {
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        let ray = Ray::new(origin, direction);

        let mut nearest: Option<RayHit> = None;
        for solid in &self.solids {
            if let Some((distance, normal)) = solid.shape.hit(&ray) {
                if nearest.is_none_or(|n| distance < n.distance) {
                    nearest = Some(RayHit { distance, normal, id: solid.id });
                }
            }
        }
        nearest
    }

    fn solid_name(&self, id: SolidId) -> Option<&str> {
        self.solid(id).and_then(|s| s.name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_and_wall() -> (StaticWorld, SolidId, SolidId) {
        let mut world = StaticWorld::new();
        let floor = world.add_named("floor", Shape::plane(Vec3::Y, Vec3::ZERO).unwrap());
        let wall = world.add(Shape::Box(Aabb::new(
            Vec3::new(2.0, 0.0, -5.0),
            Vec3::new(3.0, 4.0, 5.0),
        )));
        (world, floor, wall)
    }

    #[test]
    fn test_nearest_hit_wins() {
        let (world, floor, wall) = floor_and_wall();

        let down = world.intersect(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y).unwrap();
        assert_eq!(down.id, floor);
        assert!((down.distance - 1.0).abs() < 1e-6);
        assert_eq!(down.normal, Vec3::Y);

        let side = world.intersect(Vec3::new(0.0, 1.0, 0.0), Vec3::X).unwrap();
        assert_eq!(side.id, wall);
        assert!((side.distance - 2.0).abs() < 1e-6);
        assert_eq!(side.normal, Vec3::NEG_X);

        // Diagonal ray reaches the floor before the wall
        let diag = world.intersect(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0)).unwrap();
        assert_eq!(diag.id, floor);
        assert!((diag.distance - 2.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_direction_is_normalized() {
        let (world, _, _) = floor_and_wall();
        let hit = world.intersect(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, -10.0, 0.0)).unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-6);
        assert!(world.intersect(Vec3::ZERO, Vec3::ZERO).is_none());
    }

    #[test]
    fn test_names_and_lookup() {
        let (world, floor, wall) = floor_and_wall();
        assert_eq!(world.solid_name(floor), Some("floor"));
        assert_eq!(world.solid_name(wall), None);
        assert_eq!(world.len(), 2);
        assert!(world.solid(SolidId(99)).is_none());
    }

    #[test]
    fn test_triangle_underside_faces_down() {
        let mut world = StaticWorld::new();
        // Sheet at y = 1 facing up
        world.add(Shape::triangle(
            Vec3::new(-5.0, 1.0, -5.0),
            Vec3::new(-5.0, 1.0, 5.0),
            Vec3::new(5.0, 1.0, 0.0),
        ).unwrap());

        let from_above = world.intersect(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y).unwrap();
        assert!((from_above.normal - Vec3::Y).length() < 1e-6);

        let from_below = world.intersect(Vec3::ZERO, Vec3::Y).unwrap();
        assert!((from_below.distance - 1.0).abs() < 1e-6);
        assert!((from_below.normal - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_shapes_are_rejected() {
        assert!(Shape::plane(Vec3::ZERO, Vec3::ZERO).is_none());
        assert!(Shape::triangle(Vec3::ZERO, Vec3::X, Vec3::X * 2.0).is_none());
    }

    #[test]
    fn test_triangle_normal_follows_winding() {
        let tri = Shape::triangle(Vec3::ZERO, Vec3::Z, Vec3::X).unwrap();
        match tri {
            Shape::Triangle { normal, .. } => assert!((normal - Vec3::Y).length() < 1e-6),
            _ => unreachable!(),
        }
    }
}

//! Ray type and hit tests against the primitive shapes of a static world

use crate::core::types::Vec3;
use super::aabb::Aabb;

/// Below this, a direction component or determinant counts as parallel.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray (direction should be normalized for distances to be metric)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Entry hit against an AABB using the slab method.
    ///
    /// Returns the entry distance and the outward normal of the entered face.
    /// A ray starting inside the box reports no hit, like a back-face-culled mesh.
    pub fn hit_aabb(&self, aabb: &Aabb) -> Option<(f32, Vec3)> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        let mut normal = Vec3::ZERO;

        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.direction[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

            if d.abs() < PARALLEL_EPSILON {
                // Parallel to this slab: must already be between its planes
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            if t0 > t_near {
                t_near = t0;
                normal = Vec3::ZERO;
                normal[axis] = -d.signum();
            }
            t_far = t_far.min(t1);

            if t_near > t_far {
                return None;
            }
        }

        if t_near >= 0.0 {
            Some((t_near, normal))
        } else {
            None
        }
    }

    /// Hit against the plane `normal . p = offset`, from either side
    pub fn hit_plane(&self, normal: Vec3, offset: f32) -> Option<f32> {
        let denom = normal.dot(self.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (offset - normal.dot(self.origin)) / denom;
        (t >= 0.0).then_some(t)
    }

    /// Moller-Trumbore hit against triangle `abc`, from either side
    pub fn hit_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let e1 = b - a;
        let e2 = c - a;
        let p = self.direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(e1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(q) * inv_det;
        (t >= 0.0).then_some(t)
    }
}

//! JSON level descriptions
//!
//! A level is a flat list of solids:
//!
//! ```json
//! {
//!   "solids": [
//!     { "name": "floor", "shape": { "type": "plane", "normal": [0, 1, 0], "point": [0, 0, 0] } },
//!     { "shape": { "type": "box", "min": [2, 0, -5], "max": [3, 4, 5] } },
//!     { "shape": { "type": "triangle", "a": [0, 5, 0], "b": [1, 5, 0], "c": [0, 5, 1] } },
//!     { "name": "ramp", "shape": { "type": "ramp", "min": [4, 0, -2], "max": [10, 3, 2], "rise": "pos_x" } }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{Result, Vec3};
use crate::math::Aabb;
use super::static_world::{Shape, StaticWorld};

/// Direction a ramp climbs towards
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiseAxis {
    PosX,
    NegX,
    PosZ,
    NegZ,
}

/// Shape of one solid in a level file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDescription {
    /// Infinite plane through `point` facing `normal`
    Plane { normal: [f32; 3], point: [f32; 3] },
    /// Axis-aligned box between two corners
    Box { min: [f32; 3], max: [f32; 3] },
    /// Single triangle; winding decides the reported normal
    Triangle { a: [f32; 3], b: [f32; 3], c: [f32; 3] },
    /// Sloped quad over the footprint of `min..max`, from `min.y` up to `max.y`
    Ramp { min: [f32; 3], max: [f32; 3], rise: RiseAxis },
}

/// One solid in a level file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolidDescription {
    /// Reported when the solid is shot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub shape: ShapeDescription,
}

/// A whole level file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    #[serde(default)]
    pub solids: Vec<SolidDescription>,
}

impl LevelDescription {
    /// Parse a level from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read, parse and build a level file in one go
    pub async fn load_world(path: impl AsRef<Path>) -> Result<StaticWorld> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&text)?.build()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Convert into a queryable world, rejecting degenerate or non-finite shapes
    pub fn build(&self) -> Result<StaticWorld> {
        let mut world = StaticWorld::new();

        for (index, solid) in self.solids.iter().enumerate() {
            let label = solid.name.clone().unwrap_or_else(|| format!("solid {index}"));
            let shapes = build_shapes(&solid.shape)
                .ok_or_else(|| Error::InvalidLevel(format!("{label}: degenerate or non-finite shape")))?;

            for shape in shapes {
                match &solid.name {
                    Some(name) => world.add_named(name.clone(), shape),
                    None => world.add(shape),
                };
            }
        }

        log::debug!("Built level: {} solids from {} descriptions", world.len(), self.solids.len());
        Ok(world)
    }

    /// Small built-in level: a floor, boundary walls, a ramp up to a
    /// platform and a few named targets
    pub fn demo() -> Self {
        fn solid(name: Option<&str>, shape: ShapeDescription) -> SolidDescription {
            SolidDescription { name: name.map(str::to_owned), shape }
        }
        fn block(min: [f32; 3], max: [f32; 3]) -> ShapeDescription {
            ShapeDescription::Box { min, max }
        }

        Self {
            solids: vec![
                solid(Some("floor"), ShapeDescription::Plane { normal: [0.0, 1.0, 0.0], point: [0.0, 0.0, 0.0] }),
                solid(Some("north wall"), block([-20.0, 0.0, -21.0], [20.0, 6.0, -20.0])),
                solid(Some("south wall"), block([-20.0, 0.0, 20.0], [20.0, 6.0, 21.0])),
                solid(Some("west wall"), block([-21.0, 0.0, -20.0], [-20.0, 6.0, 20.0])),
                solid(Some("east wall"), block([20.0, 0.0, -20.0], [21.0, 6.0, 20.0])),
                solid(Some("ramp"), ShapeDescription::Ramp { min: [4.0, 0.0, -2.0], max: [10.0, 3.0, 2.0], rise: RiseAxis::PosX }),
                solid(Some("platform"), block([10.0, 0.0, -2.0], [14.0, 3.0, 2.0])),
                solid(Some("crate"), block([-6.0, 0.0, -4.0], [-4.0, 2.0, -2.0])),
                solid(Some("target A"), block([-1.0, 1.0, -12.5], [1.0, 3.0, -12.0])),
                solid(Some("target B"), block([-10.5, 1.0, 4.0], [-10.0, 3.0, 6.0])),
            ],
        }
    }
}

fn vec3(v: [f32; 3]) -> Option<Vec3> {
    let v = Vec3::from_array(v);
    v.is_finite().then_some(v)
}

fn build_shapes(desc: &ShapeDescription) -> Option<Vec<Shape>> {
    match *desc {
        ShapeDescription::Plane { normal, point } => {
            Some(vec![Shape::plane(vec3(normal)?, vec3(point)?)?])
        }
        ShapeDescription::Box { min, max } => {
            let aabb = Aabb::from_corners(vec3(min)?, vec3(max)?);
            (aabb.size().min_element() > 0.0).then(|| vec![Shape::Box(aabb)])
        }
        ShapeDescription::Triangle { a, b, c } => {
            Some(vec![Shape::triangle(vec3(a)?, vec3(b)?, vec3(c)?)?])
        }
        ShapeDescription::Ramp { min, max, rise } => {
            let aabb = Aabb::from_corners(vec3(min)?, vec3(max)?);
            ramp_triangles(&aabb, rise)
        }
    }
}

/// Two upward-facing triangles spanning the ramp's slope
fn ramp_triangles(aabb: &Aabb, rise: RiseAxis) -> Option<Vec<Shape>> {
    let (lo, hi) = (aabb.min, aabb.max);
    // Corners of the footprint as (low edge, high edge), each edge two points
    let [l0, l1, h0, h1] = match rise {
        RiseAxis::PosX => [
            Vec3::new(lo.x, lo.y, lo.z), Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, lo.z), Vec3::new(hi.x, hi.y, hi.z),
        ],
        RiseAxis::NegX => [
            Vec3::new(hi.x, lo.y, lo.z), Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, lo.z), Vec3::new(lo.x, hi.y, hi.z),
        ],
        RiseAxis::PosZ => [
            Vec3::new(lo.x, lo.y, lo.z), Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, hi.z), Vec3::new(hi.x, hi.y, hi.z),
        ],
        RiseAxis::NegZ => [
            Vec3::new(lo.x, lo.y, hi.z), Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, lo.z), Vec3::new(hi.x, hi.y, lo.z),
        ],
    };

    Some(vec![upward_triangle(l0, l1, h1)?, upward_triangle(l0, h1, h0)?])
}

fn upward_triangle(a: Vec3, b: Vec3, c: Vec3) -> Option<Shape> {
    let shape = Shape::triangle(a, b, c)?;
    match shape {
        Shape::Triangle { normal, .. } if normal.y < 0.0 => Shape::triangle(a, c, b),
        _ => Some(shape),
    }
}

//! World geometry queried by the controller
//!
//! The controller never owns or mutates geometry. It only asks a [`World`]
//! for the nearest hit along a ray. A world that has not loaded yet simply
//! answers `None`, which the controller treats as open space.

pub mod level;
pub mod pending;
pub mod static_world;

pub use level::{LevelDescription, RiseAxis, ShapeDescription, SolidDescription};
pub use pending::{LoadStatus, PendingWorld};
pub use static_world::{Shape, Solid, StaticWorld};

use crate::core::types::Vec3;

/// Identity of a solid in a world, stable for the world's lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolidId(pub u32);

impl std::fmt::Display for SolidId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Nearest intersection along a ray
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin along the (normalized) direction
    pub distance: f32,
    /// Surface normal at the hit point
    pub normal: Vec3,
    /// Which solid was hit
    pub id: SolidId,
}

/// Source of ray intersections
pub trait World {
    /// Nearest hit along `direction` from `origin`, or `None`
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<RayHit>;

    /// Human-readable name of a solid, when it has one
    fn solid_name(&self, _id: SolidId) -> Option<&str> {
        None
    }
}

impl<W: World + ?Sized> World for &W {
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        (**self).intersect(origin, direction)
    }

    fn solid_name(&self, id: SolidId) -> Option<&str> {
        (**self).solid_name(id)
    }
}

impl<W: World + ?Sized> World for Box<W> {
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        (**self).intersect(origin, direction)
    }

    fn solid_name(&self, id: SolidId) -> Option<&str> {
        (**self).solid_name(id)
    }
}

/// A world with nothing in it
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyWorld;

impl World for EmptyWorld {
    fn intersect(&self, _origin: Vec3, _direction: Vec3) -> Option<RayHit> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_world_never_hits() {
        let world = EmptyWorld;
        for dir in [Vec3::X, Vec3::NEG_Y, Vec3::Z] {
            assert!(world.intersect(Vec3::ZERO, dir).is_none());
        }
        assert!(world.solid_name(SolidId(0)).is_none());
    }

    #[test]
    fn test_solid_id_display() {
        assert_eq!(SolidId(7).to_string(), "#7");
    }
}

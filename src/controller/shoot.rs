//! Forward hitscan query

use crate::core::camera::CameraPose;
use crate::core::types::Vec3;
use crate::world::{SolidId, World};

/// What a shot hit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotOutcome {
    Hit(SolidId),
    Miss,
}

impl ShotOutcome {
    pub fn hit(self) -> Option<SolidId> {
        match self {
            ShotOutcome::Hit(id) => Some(id),
            ShotOutcome::Miss => None,
        }
    }
}

impl From<Option<SolidId>> for ShotOutcome {
    fn from(hit: Option<SolidId>) -> Self {
        hit.map_or(ShotOutcome::Miss, ShotOutcome::Hit)
    }
}

/// One-shot ray query along the view direction. Never mutates anything.
pub struct ShootProbe;

impl ShootProbe {
    /// Identity of the nearest solid along `camera_forward`, if any
    pub fn fire<W: World + ?Sized>(camera_position: Vec3, camera_forward: Vec3, world: &W) -> Option<SolidId> {
        if !camera_position.is_finite() {
            return None;
        }
        let forward = camera_forward.try_normalize()?;
        world.intersect(camera_position, forward).map(|hit| hit.id)
    }

    /// Fire from a camera pose
    pub fn fire_from<W: World + ?Sized>(pose: &CameraPose, world: &W) -> Option<SolidId> {
        Self::fire(pose.position, pose.forward(), world)
    }

    /// Fire and report the result to the log
    pub fn fire_and_report<W: World + ?Sized>(pose: &CameraPose, world: &W) -> ShotOutcome {
        let outcome = ShotOutcome::from(Self::fire_from(pose, world));
        match outcome {
            ShotOutcome::Hit(id) => match world.solid_name(id) {
                Some(name) => log::info!("Hit: {name} ({id})"),
                None => log::info!("Hit: {id}"),
            },
            ShotOutcome::Miss => log::debug!("Shot missed"),
        }
        outcome
    }
}

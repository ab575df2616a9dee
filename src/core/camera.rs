//! Camera pose handed to the render sink each frame

use crate::core::orientation::Orientation;
use crate::core::types::{Quat, Vec3};

/// Where the camera is and where it looks.
///
/// This is the only thing the controller publishes to rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraPose {
    /// World position (the player position)
    pub position: Vec3,
    /// Rotation around world Y in radians
    pub yaw: f32,
    /// Rotation around local X in radians
    pub pitch: f32,
}

impl CameraPose {
    /// Build a pose from a position and an orientation
    pub fn new(position: Vec3, orientation: &Orientation) -> Self {
        Self {
            position,
            yaw: orientation.yaw(),
            pitch: orientation.pitch(),
        }
    }

    /// Rotation as quaternion (yaw, then pitch)
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(glam::EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Get forward direction (negative Z in camera space)
    pub fn forward(&self) -> Vec3 {
        self.rotation() * -Vec3::Z
    }
}

//! First-person yaw/pitch orientation

use std::f32::consts::FRAC_PI_2;

use crate::core::types::{Quat, Vec3};

/// Pitch is clamped to +/- this value (straight up / straight down).
pub const PITCH_LIMIT: f32 = FRAC_PI_2;

/// View orientation as yaw around world Y and pitch around the local X axis.
///
/// Yaw is unbounded and only ever consumed through trigonometry. Pitch is
/// kept within `[-PITCH_LIMIT, PITCH_LIMIT]` by every mutator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    /// Rotation around the world Y axis in radians (positive turns left)
    yaw: f32,
    /// Rotation around the local X axis in radians (positive looks up)
    pitch: f32,
}

impl Orientation {
    /// Create an orientation from angles in radians
    pub fn new(yaw: f32, pitch: f32) -> Self {
        let mut orientation = Self::default();
        orientation.apply_look_delta(yaw, pitch);
        orientation
    }

    /// Add a look delta: yaw unbounded, pitch clamped.
    ///
    /// Non-finite deltas are treated as zero so a malformed input event
    /// cannot poison the view.
    pub fn apply_look_delta(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += finite_or_zero(d_yaw);
        self.pitch = (self.pitch + finite_or_zero(d_pitch)).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Get current yaw
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Get current pitch
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Full view rotation: yaw first, then pitch in the yawed frame
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(glam::EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Yaw-only rotation used for horizontal movement
    pub fn yaw_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// View direction (negative Z rotated by the full rotation)
    pub fn forward(&self) -> Vec3 {
        self.rotation() * -Vec3::Z
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

//! Controller tunables
//!
//! Every magnitude is applied once per tick rather than scaled by elapsed
//! time, so the values are tuned for a ~60 Hz refresh. Keeping them in one
//! place lets a delta-time variant swap them without touching the algorithms.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{Result, Vec3};

/// Configuration for movement, look and collision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // -- Movement ----------------------------------------------------------

    /// Horizontal impulse added per tick for each held movement key.
    pub move_speed: f32,
    /// Downward velocity added per tick.
    pub gravity: f32,
    /// Vertical velocity set by a jump.
    pub jump_speed: f32,
    /// Jumps available between ground contacts.
    pub max_jumps: u32,

    // -- Look --------------------------------------------------------------

    /// Radians per tick while a look key is held.
    pub look_speed: f32,
    /// Radians per pixel of pointer motion.
    pub pointer_sensitivity: f32,

    // -- Player ------------------------------------------------------------

    /// Collision extent; probes register hits closer than half of it.
    pub player_height: f32,
    /// Where the player appears at start.
    pub spawn_position: Vec3,

    // -- Collision ---------------------------------------------------------

    /// Run the six-probe resolver at all. Off gives free flight through geometry.
    pub collision: bool,
    /// A horizontal probe hit whose normal.y exceeds this is a walkable slope.
    pub slope_threshold: f32,
    /// Distance a wall contact pushes the player back.
    pub wall_push: f32,
    /// Slack added to the probe reach so a resting player keeps contact.
    pub contact_epsilon: f32,
    /// Lift the player out of the floor so it rests at exactly half height.
    pub floor_snap: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.02,
            gravity: 0.01,
            jump_speed: 0.2,
            max_jumps: 2,

            look_speed: 0.05,
            pointer_sensitivity: 0.002,

            player_height: 1.5,
            spawn_position: Vec3::new(0.0, 1.5, 5.0),

            collision: true,
            slope_threshold: 0.5,
            wall_push: 0.1,
            contact_epsilon: 1e-4,
            floor_snap: true,
        }
    }
}

impl ControllerConfig {
    /// Parse from JSON text; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the controller cannot run with
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("move_speed", self.move_speed),
            ("gravity", self.gravity),
            ("jump_speed", self.jump_speed),
            ("look_speed", self.look_speed),
            ("pointer_sensitivity", self.pointer_sensitivity),
            ("wall_push", self.wall_push),
            ("contact_epsilon", self.contact_epsilon),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!("{name} must be finite and >= 0, got {value}")));
            }
        }

        if !self.player_height.is_finite() || self.player_height <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "player_height must be finite and > 0, got {}",
                self.player_height
            )));
        }
        if !(-1.0..=1.0).contains(&self.slope_threshold) {
            return Err(Error::InvalidConfig(format!(
                "slope_threshold must be within [-1, 1], got {}",
                self.slope_threshold
            )));
        }
        if !self.spawn_position.is_finite() {
            return Err(Error::InvalidConfig("spawn_position must be finite".into()));
        }
        Ok(())
    }

    /// Probe reach: half the player height
    pub fn half_height(&self) -> f32 {
        self.player_height * 0.5
    }
}

//! Player body state

use crate::core::types::Vec3;
use super::config::ControllerConfig;

/// Whether the player stood on floor or slope in the latest tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Grounded,
    Airborne,
}

/// The single player body for a session.
///
/// `jumps_remaining` is private so it can never leave `0..=max_jumps`.
#[derive(Clone, Debug)]
pub struct Player {
    /// World position (probe origin and camera position)
    pub position: Vec3,
    /// World velocity in units per tick, carried across ticks
    pub velocity: Vec3,
    /// Collision extent
    pub height: f32,
    jumps_remaining: u32,
    max_jumps: u32,
    /// Floor or slope contact in the latest resolve
    grounded: bool,
    /// A jump was issued this tick; its takeoff contact does not refund it
    jumped_this_tick: bool,
}

impl Player {
    /// Create a player at rest with a full jump budget
    pub fn new(position: Vec3, height: f32, max_jumps: u32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            height,
            jumps_remaining: max_jumps,
            max_jumps,
            grounded: false,
            jumped_this_tick: false,
        }
    }

    /// Create a player at the configured spawn point
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.spawn_position, config.player_height, config.max_jumps)
    }

    /// Probe reach
    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    pub fn jumps_remaining(&self) -> u32 {
        self.jumps_remaining
    }

    pub fn max_jumps(&self) -> u32 {
        self.max_jumps
    }

    pub fn state(&self) -> PlayerState {
        if self.grounded {
            PlayerState::Grounded
        } else {
            PlayerState::Airborne
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether a jump was issued in the current tick
    pub fn jumped_this_tick(&self) -> bool {
        self.jumped_this_tick
    }

    /// Spend one jump if any remain
    pub fn try_consume_jump(&mut self) -> bool {
        if self.jumps_remaining == 0 {
            return false;
        }
        self.jumps_remaining -= 1;
        self.jumped_this_tick = true;
        true
    }

    /// Restore the full jump budget
    pub fn refill_jumps(&mut self) {
        self.jumps_remaining = self.max_jumps;
    }

    /// Override the budget, clamped to `max_jumps`
    pub fn set_jumps_remaining(&mut self, jumps: u32) {
        self.jumps_remaining = jumps.min(self.max_jumps);
    }

    /// Clear per-tick flags; called at the start of each movement tick
    pub(crate) fn begin_tick(&mut self) {
        self.jumped_this_tick = false;
    }

    pub(crate) fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }
}

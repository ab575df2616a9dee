//! Per-tick movement integration

use crate::core::input::{Action, InputState};
use crate::core::orientation::Orientation;
use crate::core::types::Vec3;
use crate::world::World;
use super::collision::{CollisionResolver, ProbeReport};
use super::config::ControllerConfig;
use super::player::Player;

/// Turns input, orientation and gravity into a velocity update, resolves
/// collisions, then commits the new position.
#[derive(Clone, Debug)]
pub struct MovementIntegrator {
    move_speed: f32,
    gravity: f32,
    jump_speed: f32,
    /// `None` runs without collision at all
    resolver: Option<CollisionResolver>,
}

impl MovementIntegrator {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            gravity: config.gravity,
            jump_speed: config.jump_speed,
            resolver: config.collision.then(|| CollisionResolver::new(config)),
        }
    }

    pub fn resolver(&self) -> Option<&CollisionResolver> {
        self.resolver.as_ref()
    }

    /// Player-local movement direction, one unit per held axis key.
    ///
    /// Forward is -Z and right is +X. Not normalized: diagonals are faster.
    pub fn desired_direction(input: &InputState) -> Vec3 {
        let mut direction = Vec3::ZERO;
        if input.is_pressed(Action::Forward) {
            direction.z -= 1.0;
        }
        if input.is_pressed(Action::Back) {
            direction.z += 1.0;
        }
        if input.is_pressed(Action::Left) {
            direction.x -= 1.0;
        }
        if input.is_pressed(Action::Right) {
            direction.x += 1.0;
        }
        direction
    }

    /// Set the jump velocity and spend one jump, if triggered and any remain
    pub fn apply_jump(&self, player: &mut Player, triggered: bool) -> bool {
        if !triggered || !player.try_consume_jump() {
            return false;
        }
        player.velocity.y = self.jump_speed;
        true
    }

    /// Advance the player by one tick.
    ///
    /// Returns the probe contacts, or `None` when collision is disabled.
    pub fn tick<W: World + ?Sized>(
        &self,
        player: &mut Player,
        orientation: &Orientation,
        input: &InputState,
        world: &W,
    ) -> Option<ProbeReport> {
        player.begin_tick();

        // Additive impulse rotated by yaw only; no friction
        let local = Self::desired_direction(input) * self.move_speed;
        player.velocity += orientation.yaw_rotation() * local;
        player.velocity.y -= self.gravity;

        if self.apply_jump(player, input.is_just_pressed(Action::Jump)) {
            log::debug!("Jump ({} left)", player.jumps_remaining());
        }

        let report = match &self.resolver {
            Some(resolver) => Some(resolver.resolve(player, world)),
            None => {
                player.set_grounded(false);
                None
            }
        };

        let next = player.position + player.velocity;
        if next.is_finite() {
            player.position = next;
        } else {
            log::warn!("Non-finite movement discarded (velocity {:?})", player.velocity);
            player.velocity = Vec3::ZERO;
        }

        report
    }
}

//! One controller tick per display refresh
//!
//! The host calls [`FrameLoop::tick`] from its redraw callback, then clears
//! per-frame input with [`InputState::end_frame`] and schedules the next
//! redraw. Look and movement happen in the same tick, in a fixed order.

use crate::core::camera::CameraPose;
use crate::core::input::{Action, InputState};
use crate::core::orientation::Orientation;
use crate::world::World;
use super::collision::ProbeReport;
use super::config::ControllerConfig;
use super::movement::MovementIntegrator;
use super::player::{Player, PlayerState};
use super::shoot::{ShootProbe, ShotOutcome};

/// Consumer of the camera pose, called once per tick
pub trait RenderSink {
    fn publish(&mut self, pose: &CameraPose);
}

impl<F: FnMut(&CameraPose)> RenderSink for F {
    fn publish(&mut self, pose: &CameraPose) {
        self(pose)
    }
}

/// What happened during one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// 1-based tick counter
    pub frame: u64,
    /// Pose handed to the render sink
    pub pose: CameraPose,
    pub state: PlayerState,
    pub jumps_remaining: u32,
    /// Probe contacts, `None` with collision disabled
    pub contacts: Option<ProbeReport>,
    /// Set when fire was triggered this tick
    pub shot: Option<ShotOutcome>,
}

/// Owns the player, orientation and world for a session and advances them
/// one tick at a time
pub struct FrameLoop<W: World> {
    player: Player,
    orientation: Orientation,
    integrator: MovementIntegrator,
    look_speed: f32,
    pointer_sensitivity: f32,
    world: W,
    frame: u64,
}

impl<W: World> FrameLoop<W> {
    /// Spawn the player per `config` into `world`
    pub fn new(config: &ControllerConfig, world: W) -> Self {
        Self {
            player: Player::from_config(config),
            orientation: Orientation::default(),
            integrator: MovementIntegrator::new(config),
            look_speed: config.look_speed,
            pointer_sensitivity: config.pointer_sensitivity,
            world,
            frame: 0,
        }
    }

    /// Look delta for this tick from held look keys and pointer motion
    pub fn look_delta(&self, input: &InputState) -> (f32, f32) {
        let mut d_yaw = 0.0;
        let mut d_pitch = 0.0;

        if input.is_pressed(Action::LookLeft) {
            d_yaw += self.look_speed;
        }
        if input.is_pressed(Action::LookRight) {
            d_yaw -= self.look_speed;
        }
        if input.is_pressed(Action::LookUp) {
            d_pitch += self.look_speed;
        }
        if input.is_pressed(Action::LookDown) {
            d_pitch -= self.look_speed;
        }

        // Pointer right turns right, pointer down looks down
        let pointer = input.pointer_delta();
        d_yaw -= pointer.x * self.pointer_sensitivity;
        d_pitch -= pointer.y * self.pointer_sensitivity;

        (d_yaw, d_pitch)
    }

    /// Run one tick: look, move and collide, fire, publish.
    pub fn tick<S: RenderSink + ?Sized>(&mut self, input: &InputState, sink: &mut S) -> FrameReport {
        self.frame += 1;
        let previous_state = self.player.state();

        let (d_yaw, d_pitch) = self.look_delta(input);
        self.orientation.apply_look_delta(d_yaw, d_pitch);

        let contacts = self.integrator.tick(&mut self.player, &self.orientation, input, &self.world);

        let state = self.player.state();
        if state != previous_state {
            log::debug!(
                "Frame {}: {:?} -> {:?} at ({:.2}, {:.2}, {:.2})",
                self.frame, previous_state, state,
                self.player.position.x, self.player.position.y, self.player.position.z
            );
        }

        let pose = CameraPose::new(self.player.position, &self.orientation);
        let shot = input
            .is_just_pressed(Action::Fire)
            .then(|| ShootProbe::fire_and_report(&pose, &self.world));

        sink.publish(&pose);

        FrameReport {
            frame: self.frame,
            pose,
            state,
            jumps_remaining: self.player.jumps_remaining(),
            contacts,
            shot,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn orientation_mut(&mut self) -> &mut Orientation {
        &mut self.orientation
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    /// Mutable world access for the host, e.g. to poll a pending load
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Ticks run so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

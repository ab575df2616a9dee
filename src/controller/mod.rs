//! First-person controller: player state, movement, collision, shooting and
//! the per-frame tick that ties them together

pub mod config;
pub mod player;
pub mod collision;
pub mod movement;
pub mod shoot;
pub mod frame;

pub use config::ControllerConfig;
pub use player::{Player, PlayerState};
pub use collision::{CollisionResolver, Contact, ContactKind, ProbeReport, PROBE_DIRECTIONS};
pub use movement::MovementIntegrator;
pub use shoot::{ShootProbe, ShotOutcome};
pub use frame::{FrameLoop, FrameReport, RenderSink};

//! Six-probe collision resolution against static geometry
//!
//! Each tick casts one ray per axis direction from the player position, in
//! the fixed order of [`PROBE_DIRECTIONS`]. A hit closer than half the
//! player height is either walkable (floor or slope) or a wall. Each probe
//! sees the position and velocity left by the probes before it; there is no
//! iteration to convergence, so fast motion can tunnel and corners can show
//! probe-order artifacts.

use crate::core::types::Vec3;
use crate::world::{RayHit, World};
use super::config::ControllerConfig;
use super::player::Player;

/// Probe directions in evaluation order: down, up, +x, -x, +z, -z
pub const PROBE_DIRECTIONS: [Vec3; 6] = [
    Vec3::NEG_Y,
    Vec3::Y,
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Z,
    Vec3::NEG_Z,
];

/// How a probe hit was interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactKind {
    /// Down probe hit
    Floor,
    /// Horizontal probe hit a surface that faces up enough to walk on
    Slope,
    /// Anything else
    Wall,
}

impl ContactKind {
    /// Floor and slope contacts ground the player
    pub fn is_walkable(self) -> bool {
        matches!(self, ContactKind::Floor | ContactKind::Slope)
    }
}

/// One probe that registered a hit this tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub direction: Vec3,
    pub kind: ContactKind,
    pub hit: RayHit,
}

/// Contacts found by one resolve, indexed like [`PROBE_DIRECTIONS`]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProbeReport {
    slots: [Option<Contact>; 6],
}

impl ProbeReport {
    /// Contacts in probe order
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.slots.iter().flatten()
    }

    /// Contact for a given probe index, if it hit
    pub fn probe(&self, index: usize) -> Option<&Contact> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Any floor or slope contact
    pub fn grounded(&self) -> bool {
        self.contacts().any(|c| c.kind.is_walkable())
    }

    /// Number of wall contacts
    pub fn wall_count(&self) -> usize {
        self.contacts().filter(|c| c.kind == ContactKind::Wall).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

/// Resolves probe contacts by mutating the player's position and velocity
#[derive(Clone, Debug)]
pub struct CollisionResolver {
    slope_threshold: f32,
    wall_push: f32,
    /// Slope nudge scale (the per-tick move speed)
    slope_step: f32,
    contact_epsilon: f32,
    floor_snap: bool,
}

impl CollisionResolver {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            slope_threshold: config.slope_threshold,
            wall_push: config.wall_push,
            slope_step: config.move_speed,
            contact_epsilon: config.contact_epsilon,
            floor_snap: config.floor_snap,
        }
    }

    /// Classify a hit by probe direction and surface normal
    pub fn classify(&self, direction: Vec3, normal: Vec3) -> ContactKind {
        if direction == Vec3::NEG_Y {
            ContactKind::Floor
        } else if direction.y == 0.0 && normal.y > self.slope_threshold {
            ContactKind::Slope
        } else {
            ContactKind::Wall
        }
    }

    /// Run all six probes once and apply their responses in order.
    ///
    /// Updates the player's grounded flag. A world with nothing in reach
    /// leaves position and velocity untouched.
    pub fn resolve<W: World + ?Sized>(&self, player: &mut Player, world: &W) -> ProbeReport {
        let mut report = ProbeReport::default();
        let mut grounded = false;

        for (slot, &direction) in PROBE_DIRECTIONS.iter().enumerate() {
            let reach = player.half_height() + self.contact_epsilon;
            let Some(hit) = world.intersect(player.position, direction) else {
                continue;
            };
            // Written this way round so a NaN distance never counts as contact
            if !(hit.distance < reach) {
                continue;
            }

            let kind = self.classify(direction, hit.normal);
            match kind {
                ContactKind::Floor | ContactKind::Slope => {
                    player.velocity.y = player.velocity.y.max(0.0);
                    // A takeoff contact neither grounds nor refunds
                    if !player.jumped_this_tick() {
                        grounded = true;
                        player.refill_jumps();
                    }

                    if kind == ContactKind::Slope {
                        player.position += hit.normal * (self.slope_step * hit.normal.y);
                    } else if self.floor_snap {
                        let sink = player.half_height() - hit.distance;
                        if sink > 0.0 {
                            player.position.y += sink;
                        }
                    }
                }
                ContactKind::Wall => {
                    player.velocity -= direction * player.velocity.dot(direction);
                    player.position -= direction * self.wall_push;
                }
            }

            log::trace!(
                "probe {direction:?}: {kind:?} at {:.3} (solid {})",
                hit.distance, hit.id
            );
            report.slots[slot] = Some(Contact { direction, kind, hit });
        }

        player.set_grounded(grounded);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::player::PlayerState;
    use crate::math::Aabb;
    use crate::world::{EmptyWorld, Shape, StaticWorld};

    fn resolver() -> CollisionResolver {
        CollisionResolver::new(&ControllerConfig::default())
    }

    fn flat_floor() -> StaticWorld {
        let mut world = StaticWorld::new();
        world.add_named("floor", Shape::plane(Vec3::Y, Vec3::ZERO).unwrap());
        world
    }

    #[test]
    fn test_nothing_in_reach_is_a_no_op() {
        let mut player = Player::new(Vec3::new(0.0, 5.0, 0.0), 1.5, 2);
        player.velocity = Vec3::new(0.3, -0.2, 0.1);
        player.set_jumps_remaining(1);

        let report = resolver().resolve(&mut player, &EmptyWorld);
        assert!(report.is_empty());
        assert_eq!(player.position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(player.velocity, Vec3::new(0.3, -0.2, 0.1));
        assert_eq!(player.jumps_remaining(), 1);

        // Floor exists but is out of reach
        let report = resolver().resolve(&mut player, &flat_floor());
        assert!(report.is_empty());
        assert_eq!(player.position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(player.velocity, Vec3::new(0.3, -0.2, 0.1));
        assert!(!player.is_grounded());
    }

    #[test]
    fn test_floor_stops_fall_and_resets_jumps() {
        let mut player = Player::new(Vec3::new(0.0, 0.5, 0.0), 1.5, 2);
        player.velocity = Vec3::new(0.0, -0.3, 0.0);
        player.set_jumps_remaining(0);

        let report = resolver().resolve(&mut player, &flat_floor());
        assert!(report.grounded());
        assert_eq!(report.probe(0).map(|c| c.kind), Some(ContactKind::Floor));
        assert!(player.velocity.y >= 0.0);
        assert_eq!(player.jumps_remaining(), 2);
        assert!(player.is_grounded());
        // Lifted back to rest height
        assert!((player.position.y - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_floor_keeps_upward_velocity() {
        let mut player = Player::new(Vec3::new(0.0, 0.7, 0.0), 1.5, 2);
        player.velocity = Vec3::new(0.0, 0.2, 0.0);
        resolver().resolve(&mut player, &flat_floor());
        assert_eq!(player.velocity.y, 0.2);
    }

    #[test]
    fn test_floor_snap_can_be_disabled() {
        let config = ControllerConfig { floor_snap: false, ..Default::default() };
        let mut player = Player::new(Vec3::new(0.0, 0.5, 0.0), 1.5, 2);
        CollisionResolver::new(&config).resolve(&mut player, &flat_floor());
        assert_eq!(player.position.y, 0.5);
        assert!(player.is_grounded());
    }

    #[test]
    fn test_wall_cancels_velocity_and_pushes_back() {
        let mut world = StaticWorld::new();
        world.add(Shape::Box(Aabb::new(Vec3::new(0.5, -2.0, -2.0), Vec3::new(1.5, 2.0, 2.0))));

        let mut player = Player::new(Vec3::ZERO, 1.5, 2);
        player.velocity = Vec3::new(1.0, 0.0, 0.0);

        let report = resolver().resolve(&mut player, &world);
        let contact = report.probe(2).expect("+x probe should hit");
        assert_eq!(contact.kind, ContactKind::Wall);
        assert_eq!(contact.hit.normal, Vec3::NEG_X);

        assert_eq!(player.velocity.dot(Vec3::X), 0.0);
        assert!((player.position.x - (-0.1)).abs() < 1e-6);
        assert_eq!(report.wall_count(), 1);
        assert!(!player.is_grounded());
    }

    #[test]
    fn test_takeoff_contact_does_not_ground() {
        let mut player = Player::new(Vec3::new(0.0, 0.75, 0.0), 1.5, 2);
        assert!(player.try_consume_jump());
        player.velocity.y = 0.2;

        let report = resolver().resolve(&mut player, &flat_floor());
        assert_eq!(report.probe(0).map(|c| c.kind), Some(ContactKind::Floor));
        assert_eq!(player.state(), PlayerState::Airborne);
        assert_eq!(player.jumps_remaining(), 1);
        assert_eq!(player.velocity.y, 0.2);
    }

    #[test]
    fn test_wall_push_brings_opposite_wall_into_reach() {
        let near_right = Shape::Box(Aabb::new(Vec3::new(0.7, -2.0, -2.0), Vec3::new(1.5, 2.0, 2.0)));
        let far_left = Shape::Box(Aabb::new(Vec3::new(-1.5, -2.0, -2.0), Vec3::new(-0.8, 2.0, 2.0)));

        // The left wall alone is out of reach
        let mut world = StaticWorld::new();
        world.add(far_left);
        let mut player = Player::new(Vec3::ZERO, 1.5, 2);
        player.velocity = Vec3::new(0.3, 0.0, 0.0);
        assert!(resolver().resolve(&mut player, &world).is_empty());
        assert_eq!(player.position, Vec3::ZERO);

        // The +x push moves the player within reach of the -x probe, which
        // then pushes it straight back
        world.add(near_right);
        let mut player = Player::new(Vec3::ZERO, 1.5, 2);
        player.velocity = Vec3::new(0.3, 0.0, 0.0);
        let report = resolver().resolve(&mut player, &world);

        assert_eq!(report.probe(2).map(|c| c.kind), Some(ContactKind::Wall));
        assert_eq!(report.probe(3).map(|c| c.kind), Some(ContactKind::Wall));
        assert!((report.probe(3).map_or(0.0, |c| c.hit.distance) - 0.7).abs() < 1e-5);
        assert_eq!(report.wall_count(), 2);
        assert!(player.position.abs_diff_eq(Vec3::ZERO, 1e-6));
        assert_eq!(player.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_wall_keeps_tangential_velocity() {
        let mut world = StaticWorld::new();
        world.add(Shape::Box(Aabb::new(Vec3::new(-2.0, -2.0, 0.4), Vec3::new(2.0, 2.0, 1.0))));

        let mut player = Player::new(Vec3::ZERO, 1.5, 2);
        player.velocity = Vec3::new(0.3, -0.1, 0.5);
        resolver().resolve(&mut player, &world);

        assert_eq!(player.velocity, Vec3::new(0.3, -0.1, 0.0));
        assert!((player.position.z - (-0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_ceiling_is_a_wall() {
        let mut world = StaticWorld::new();
        world.add(Shape::plane(Vec3::NEG_Y, Vec3::new(0.0, 0.5, 0.0)).unwrap());

        let mut player = Player::new(Vec3::ZERO, 1.5, 2);
        player.velocity = Vec3::new(0.0, 0.2, 0.0);
        let report = resolver().resolve(&mut player, &world);

        assert_eq!(report.probe(1).map(|c| c.kind), Some(ContactKind::Wall));
        assert_eq!(player.velocity.y, 0.0);
        assert!((player.position.y - (-0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_horizontal_probe_on_slope_climbs() {
        // Ramp rising towards +x: surface y = x / 2, facing up and back
        let mut world = StaticWorld::new();
        world.add(Shape::triangle(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(10.0, 5.0, 5.0),
        ).unwrap());
        world.add(Shape::triangle(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(10.0, 5.0, 5.0),
            Vec3::new(10.0, 5.0, -5.0),
        ).unwrap());

        // Without the floor snap the down probe leaves the player low enough
        // for the +x probe to reach the slope as well
        let config = ControllerConfig { floor_snap: false, ..Default::default() };
        let resolver = CollisionResolver::new(&config);
        let normal = Vec3::new(-1.0, 2.0, 0.0).normalize();
        assert_eq!(resolver.classify(Vec3::X, normal), ContactKind::Slope);

        // Standing just above the slope at x = 4 (surface y = 2)
        let start = Vec3::new(4.0, 2.2, 0.0);
        let mut player = Player::new(start, 1.5, 2);
        player.set_jumps_remaining(0);
        player.velocity = Vec3::new(0.05, -0.1, 0.0);

        let report = resolver.resolve(&mut player, &world);
        assert!(report.grounded());
        assert_eq!(report.probe(2).map(|c| c.kind), Some(ContactKind::Slope));
        assert_eq!(player.jumps_remaining(), 2);
        assert!(player.velocity.y >= 0.0);
        // Horizontal velocity is not cancelled by a slope contact
        assert_eq!(player.velocity.x, 0.05);
        // Nudged along the surface normal: up and back down the slope
        assert!(player.position.y > start.y);
        assert!(player.position.x < start.x);
    }

    #[test]
    fn test_ramp_underside_is_a_wall() {
        let world = crate::world::LevelDescription::demo().build().unwrap();

        // Under the demo ramp, whose surface is y = (x - 4) / 2
        let mut player = Player::new(Vec3::new(6.0, 0.75, 0.0), 1.5, 2);
        let report = resolver().resolve(&mut player, &world);

        let behind = report.probe(3).expect("-x probe should reach the ramp underside");
        assert_eq!(behind.kind, ContactKind::Wall);
        assert!(behind.hit.normal.y < 0.0);
        assert!(report.contacts().all(|c| c.kind != ContactKind::Slope));
        assert!(player.position.y < 0.75);
    }

    #[test]
    fn test_steep_surface_is_a_wall() {
        let resolver = resolver();
        let steep = Vec3::new(-1.0, 0.4, 0.0).normalize();
        assert_eq!(resolver.classify(Vec3::X, steep), ContactKind::Wall);
        // Down probe is always floor, whatever the normal
        assert_eq!(resolver.classify(Vec3::NEG_Y, steep), ContactKind::Floor);
        // Up probe is never walkable
        assert_eq!(resolver.classify(Vec3::Y, Vec3::Y), ContactKind::Wall);
    }

    #[test]
    fn test_probe_order_is_fixed() {
        assert_eq!(PROBE_DIRECTIONS[0], Vec3::NEG_Y);
        assert_eq!(PROBE_DIRECTIONS[1], Vec3::Y);
        assert_eq!(PROBE_DIRECTIONS[2], Vec3::X);
        assert_eq!(PROBE_DIRECTIONS[3], Vec3::NEG_X);
        assert_eq!(PROBE_DIRECTIONS[4], Vec3::Z);
        assert_eq!(PROBE_DIRECTIONS[5], Vec3::NEG_Z);
    }
}

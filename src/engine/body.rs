use crate::cfg::PHYSICS_SCALE;
use crate::cmtp::Location;
use crate::engine::floor::{bits_from_floor, FloorChange};
use crate::engine::mechanics;
use crate::engine::physics::{interaction_groups, PhysicsModel};
use rapier2d::prelude::*;

/// A body living in a `PhysicsModel`, on a given floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    floor: i32,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

impl Body {
    pub(crate) fn new(floor: i32, body: RigidBodyHandle, collider: ColliderHandle) -> Self {
        Body {
            floor,
            body,
            collider,
        }
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    pub fn position(&self, physics: &PhysicsModel) -> (f32, f32) {
        physics.bodies.get(self.body).map_or((0.0, 0.0), |body| {
            let pos = body.translation();
            (pos.x / PHYSICS_SCALE, pos.y / PHYSICS_SCALE)
        })
    }

    pub fn angle(&self, physics: &PhysicsModel) -> f32 {
        physics
            .bodies
            .get(self.body)
            .map_or(0.0, |body| body.rotation().angle())
    }

    pub fn location(&self, physics: &PhysicsModel) -> Location {
        let (x, y) = self.position(physics);
        Location::new(x, y, self.floor)
    }

    /// The velocity is along the body's local y axis.
    pub fn set_angle_and_velocity(&self, physics: &mut PhysicsModel, angle: f32, velocity: f32) {
        if let Some(body) = physics.bodies.get_mut(self.body) {
            body.set_rotation(Rotation::new(angle), true);
            body.set_angvel(0.0, true);
            let (vx, vy) = mechanics::rotate((0.0, velocity * PHYSICS_SCALE), angle);
            body.set_linvel(vector![vx, vy], true);
        }
    }

    pub fn set_angle(&self, physics: &mut PhysicsModel, angle: f32) {
        if let Some(body) = physics.bodies.get_mut(self.body) {
            body.set_rotation(Rotation::new(angle), true);
        }
    }

    fn change_floor(&mut self, physics: &mut PhysicsModel, change: FloorChange) {
        self.floor = change.apply(self.floor);
        if let Some(collider) = physics.colliders.get_mut(self.collider) {
            let bits = collider.collision_groups().memberships.bits() as u16;
            collider.set_collision_groups(interaction_groups(change.shift_bits(bits)));
        }
    }

    pub fn move_up(&mut self, physics: &mut PhysicsModel) {
        self.change_floor(physics, FloorChange::Up);
    }

    pub fn move_down(&mut self, physics: &mut PhysicsModel) {
        self.change_floor(physics, FloorChange::Down);
    }

    pub fn move_inside(&mut self, physics: &mut PhysicsModel) {
        self.change_floor(physics, FloorChange::Inside);
    }

    pub fn move_outside(&mut self, physics: &mut PhysicsModel) {
        self.change_floor(physics, FloorChange::Outside);
    }

    /// Puts the body at `loc` at once, floor included.
    pub fn teleport(&mut self, physics: &mut PhysicsModel, loc: &Location) {
        self.floor = loc.floor;
        if let Some(body) = physics.bodies.get_mut(self.body) {
            body.set_translation(vector![loc.x * PHYSICS_SCALE, loc.y * PHYSICS_SCALE], true);
            body.set_linvel(vector![0.0, 0.0], true);
        }
        if let Some(collider) = physics.colliders.get_mut(self.collider) {
            collider.set_collision_groups(interaction_groups(bits_from_floor(loc.floor)));
        }
    }

    pub fn collision_bits(&self, physics: &PhysicsModel) -> u16 {
        physics
            .colliders
            .get(self.collider)
            .map_or(0, |collider| collider.collision_groups().memberships.bits() as u16)
    }
}

#[cfg(test)]
mod body_tests {
    use super::*;
    use crate::cmtp::CollisionData;

    const BOX: CollisionData = CollisionData::Rectangle {
        width: 60.0,
        height: 55.0,
    };

    #[test]
    fn location_and_angle() {
        let mut physics = PhysicsModel::default();
        let body = physics.create_hero_body(&Location::new(100.0, 200.0, 0), &BOX);
        let loc = body.location(&physics);
        assert!((loc.x - 100.0).abs() < 1e-3);
        assert!((loc.y - 200.0).abs() < 1e-3);
        assert_eq!(loc.floor, 0);
        body.set_angle(&mut physics, 1.0);
        assert!((body.angle(&physics) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn velocity_follows_the_angle() {
        let mut physics = PhysicsModel::default();
        let body = physics.create_hero_body(&Location::new(100.0, 100.0, 0), &BOX);
        // forward is towards negative y at angle 0
        body.set_angle_and_velocity(&mut physics, 0.0, -150.0);
        for _ in 0..30 {
            physics.update(1.0 / 60.0);
        }
        let (x, y) = body.position(&physics);
        assert!((x - 100.0).abs() < 1.0);
        assert!((y - 25.0).abs() < 1.0);
    }

    #[test]
    fn floor_changes_shift_the_collision_bits() {
        let mut physics = PhysicsModel::default();
        let mut body = physics.create_hero_body(&Location::new(0.0, 0.0, 0), &BOX);
        assert_eq!(body.collision_bits(&physics), 0x0100);
        body.move_inside(&mut physics);
        assert_eq!((body.floor(), body.collision_bits(&physics)), (1, 0x0200));
        body.move_up(&mut physics);
        assert_eq!((body.floor(), body.collision_bits(&physics)), (3, 0x0800));
        body.move_outside(&mut physics);
        assert_eq!((body.floor(), body.collision_bits(&physics)), (2, 0x0400));
        body.move_down(&mut physics);
        body.move_down(&mut physics);
        assert_eq!((body.floor(), body.collision_bits(&physics)), (-2, 0x0040));
    }

    #[test]
    fn teleport_resets_floor_and_position() {
        let mut physics = PhysicsModel::default();
        let mut body = physics.create_hero_body(&Location::new(0.0, 0.0, 0), &BOX);
        body.teleport(&mut physics, &Location::new(300.0, 400.0, 3));
        assert_eq!(body.floor(), 3);
        assert_eq!(body.collision_bits(&physics), 0x0800);
        let (x, y) = body.position(&physics);
        assert!((x - 300.0).abs() < 1e-3 && (y - 400.0).abs() < 1e-3);
    }
}

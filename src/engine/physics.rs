use crate::cfg::PHYSICS_SCALE;
use crate::cmtp::{CollisionData, Location};
use crate::engine::body::Body;
use crate::engine::event::{hash, EventType};
use crate::engine::floor::bits_from_floor;
use crate::engine::tmx;
use log::{info, warn};
use rapier2d::prelude::*;
use std::collections::HashMap;
use std::sync::Mutex;

pub fn interaction_groups(bits: u16) -> InteractionGroups {
    let group = Group::from_bits_truncate(u32::from(bits));
    InteractionGroups::new(group, group)
}

fn fixture(shape: ColliderBuilder, floor: i32, solid: bool, sensor: bool) -> Collider {
    let groups = if solid {
        interaction_groups(bits_from_floor(floor))
    } else {
        InteractionGroups::none()
    };
    shape
        .sensor(sensor)
        .collision_groups(groups)
        .density(1.0)
        .friction(0.0)
        .restitution(0.0)
        .active_events(ActiveEvents::COLLISION_EVENTS)
        .build()
}

fn shape_from_data(data: &CollisionData) -> ColliderBuilder {
    match *data {
        CollisionData::Circle { radius } => ColliderBuilder::ball(radius * PHYSICS_SCALE),
        CollisionData::Rectangle { width, height } => {
            ColliderBuilder::cuboid(width * PHYSICS_SCALE * 0.5, height * PHYSICS_SCALE * 0.5)
        }
    }
}

#[derive(Default)]
struct ContactCollector {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if event.started() {
            if let Ok(mut started) = self.started.lock() {
                started.push((event.collider1(), event.collider2()));
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

impl ContactCollector {
    fn drain(&self) -> Vec<(ColliderHandle, ColliderHandle)> {
        self.started
            .lock()
            .map(|mut started| started.drain(..).collect())
            .unwrap_or_default()
    }
}

struct EventZone {
    event: EventType,
    name: String,
}

/// The rigid body world of a map. Positions are given in map pixels and
/// scaled down for the solver.
pub struct PhysicsModel {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    collector: ContactCollector,
    event_zones: HashMap<ColliderHandle, EventZone>,
}

impl Default for PhysicsModel {
    fn default() -> Self {
        PhysicsModel {
            gravity: vector![0.0, 0.0],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            collector: ContactCollector::default(),
            event_zones: HashMap::new(),
        }
    }
}

impl PhysicsModel {
    /// Steps the world and returns the events of the zones entered during
    /// the step.
    pub fn update(&mut self, dt: f32) -> Vec<EventType> {
        if dt <= 0.0 {
            return Vec::new();
        }
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.collector,
        );
        self.collector
            .drain()
            .into_iter()
            .filter_map(|(a, b)| self.zone_event(b).or_else(|| self.zone_event(a)))
            .collect()
    }

    fn zone_event(&self, collider: ColliderHandle) -> Option<EventType> {
        let zone = self.event_zones.get(&collider)?;
        info!(target: "physics", "Map event triggered: {} ({})", zone.name, zone.event);
        Some(zone.event)
    }

    fn insert_body(&mut self, body: RigidBody, collider: Collider) -> (RigidBodyHandle, ColliderHandle) {
        let body = self.bodies.insert(body);
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        (body, collider)
    }

    fn scaled(x: f32, y: f32) -> Vector<Real> {
        vector![x * PHYSICS_SCALE, y * PHYSICS_SCALE]
    }

    pub fn add_map_item(&mut self, x: f32, y: f32, floor: i32, data: &CollisionData) {
        let body = RigidBodyBuilder::fixed().translation(Self::scaled(x, y)).build();
        self.insert_body(body, fixture(shape_from_data(data), floor, true, false));
    }

    pub fn create_hero_body(&mut self, loc: &Location, data: &CollisionData) -> Body {
        let body = RigidBodyBuilder::dynamic()
            .translation(Self::scaled(loc.x, loc.y))
            .lock_rotations()
            .build();
        let (body, collider) =
            self.insert_body(body, fixture(shape_from_data(data), loc.floor, true, false));
        Body::new(loc.floor, body, collider)
    }

    pub fn create_character_body(&mut self, loc: &Location, data: &CollisionData) -> Body {
        let body = RigidBodyBuilder::kinematic_velocity_based()
            .translation(Self::scaled(loc.x, loc.y))
            .build();
        let (body, collider) =
            self.insert_body(body, fixture(shape_from_data(data), loc.floor, true, false));
        Body::new(loc.floor, body, collider)
    }

    fn zone_collider(object: &tmx::Object, floor: i32, sensor: bool) -> Option<(Vector<Real>, Collider)> {
        if object.is_rectangle() {
            let x = object.x + object.width * 0.5;
            let y = object.y + object.height * 0.5;
            let shape = ColliderBuilder::cuboid(
                object.width * PHYSICS_SCALE * 0.5,
                object.height * PHYSICS_SCALE * 0.5,
            );
            return Some((Self::scaled(x, y), fixture(shape, floor, true, sensor)));
        }
        if object.is_chain() {
            let mut points: Vec<Point<Real>> = object
                .points()
                .iter()
                .map(|p| point![p.x * PHYSICS_SCALE, p.y * PHYSICS_SCALE])
                .collect();
            if points.len() < 2 {
                return None;
            }
            if object.is_polygon() {
                points.push(points[0]);
            }
            let shape = ColliderBuilder::polyline(points, None);
            return Some((Self::scaled(object.x, object.y), fixture(shape, floor, true, sensor)));
        }
        None
    }

    fn add_zone(&mut self, floor: i32, object: &tmx::Object, sensor: bool) -> Option<ColliderHandle> {
        let (translation, collider) = Self::zone_collider(object, floor, sensor)?;
        let body = RigidBodyBuilder::fixed().translation(translation).build();
        Some(self.insert_body(body, collider).1)
    }

    pub fn add_event_zone(&mut self, floor: i32, object: &tmx::Object, event: &str) {
        match self.add_zone(floor, object, true) {
            Some(collider) => {
                self.event_zones.insert(
                    collider,
                    EventZone {
                        event: hash(event),
                        name: event.to_string(),
                    },
                );
            }
            None => warn!(
                target: "physics",
                "An event zone could not be transformed into a fixture: '{}'", object.name
            ),
        }
    }

    pub fn add_collision_zone(&mut self, floor: i32, object: &tmx::Object) {
        if self.add_zone(floor, object, false).is_none() {
            warn!(
                target: "physics",
                "A collision zone could not be transformed into a fixture: '{}'", object.name
            );
        }
    }

    pub fn load_map(&mut self, map: &tmx::Map) {
        let mut visitor = ZoneConstructor { physics: self };
        map.visit_layers(&mut visitor);
    }

    pub fn event_zone_count(&self) -> usize {
        self.event_zones.len()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

struct ZoneConstructor<'a> {
    physics: &'a mut PhysicsModel,
}

impl tmx::LayerVisitor for ZoneConstructor<'_> {
    fn visit_object_layer(&mut self, _map: &tmx::Map, layer: &tmx::ObjectLayer) {
        if !layer.has_property("kind") {
            warn!(target: "physics", "No kind for the layer: '{}'", layer.name);
            return;
        }
        if layer.property("kind", "") != "zone" {
            return;
        }
        let floor = layer.floor();
        info!(target: "physics", "Loading zone layer: '{}' (floor: {})", layer.name, floor);
        let (mut events, mut collisions) = (0, 0);
        for object in &layer.objects {
            match object.kind.as_str() {
                "event" => {
                    if !object.has_property("type") {
                        warn!(target: "physics", "No event type for the object: '{}'", object.name);
                        continue;
                    }
                    let event = object.property("type", "");
                    self.physics.add_event_zone(floor, object, &event);
                    events += 1;
                }
                "collision" => {
                    self.physics.add_collision_zone(floor, object);
                    collisions += 1;
                }
                _ => warn!(target: "physics", "No type for the object: '{}'", object.name),
            }
        }
        info!(
            target: "physics",
            "\tObjects loaded: {} event zones and {} collision zones", events, collisions
        );
    }
}

#[cfg(test)]
mod physics_tests {
    use super::*;

    const HERO: CollisionData = CollisionData::Rectangle {
        width: 60.0,
        height: 55.0,
    };

    fn zone_map(door_floor: i32) -> tmx::Map {
        let json = format!(
            r#"{{
            "width": 20, "height": 20, "tilewidth": 32, "tileheight": 32, "tilesets": [],
            "layers": [
                {{ "type": "objectgroup", "name": "zones",
                   "properties": [ {{ "name": "kind", "type": "string", "value": "zone" }},
                                   {{ "name": "floor", "type": "int", "value": {} }} ],
                   "objects": [
                     {{ "name": "door", "type": "event", "x": 150, "y": 50, "width": 100, "height": 100,
                        "properties": [ {{ "name": "type", "type": "string", "value": "MoveInside" }} ] }},
                     {{ "name": "fence", "type": "collision", "x": 0, "y": 300,
                        "polyline": [ {{ "x": 0, "y": 0 }}, {{ "x": 200, "y": 0 }} ] }},
                     {{ "name": "odd", "type": "decoration", "x": 0, "y": 0, "width": 1, "height": 1 }},
                     {{ "name": "nowhere", "type": "event", "x": 0, "y": 0, "width": 1, "height": 1 }}
                   ] }},
                {{ "type": "objectgroup", "name": "pois",
                   "properties": [ {{ "name": "kind", "type": "string", "value": "poi" }} ],
                   "objects": [] }}
            ] }}"#,
            door_floor
        );
        tmx::Map::from_json(&json).unwrap()
    }

    fn walk_right(physics: &mut PhysicsModel, hero: &Body, steps: usize) -> Vec<EventType> {
        let mut events = Vec::new();
        for _ in 0..steps {
            hero.set_angle_and_velocity(physics, -std::f32::consts::FRAC_PI_2, 150.0);
            events.extend(physics.update(1.0 / 60.0));
        }
        events
    }

    #[test]
    fn zones_are_loaded_from_zone_layers() {
        let mut physics = PhysicsModel::default();
        physics.load_map(&zone_map(0));
        assert_eq!(physics.event_zone_count(), 1);
        assert_eq!(physics.body_count(), 2);
    }

    #[test]
    fn entering_an_event_zone_on_the_same_floor_triggers_it() {
        let mut physics = PhysicsModel::default();
        physics.load_map(&zone_map(0));
        let hero = physics.create_hero_body(&Location::new(50.0, 100.0, 0), &HERO);
        let events = walk_right(&mut physics, &hero, 60);
        assert_eq!(events, vec![hash("MoveInside")]);
        assert!(hero.position(&physics).0 > 150.0);
    }

    #[test]
    fn zones_on_other_floors_are_ignored() {
        let mut physics = PhysicsModel::default();
        physics.load_map(&zone_map(2));
        let hero = physics.create_hero_body(&Location::new(50.0, 100.0, 0), &HERO);
        let events = walk_right(&mut physics, &hero, 60);
        assert!(events.is_empty());
    }

    #[test]
    fn solid_items_block_the_hero() {
        let mut physics = PhysicsModel::default();
        physics.add_map_item(200.0, 100.0, 0, &CollisionData::Circle { radius: 30.0 });
        let hero = physics.create_hero_body(&Location::new(50.0, 100.0, 0), &HERO);
        walk_right(&mut physics, &hero, 120);
        assert!(hero.position(&physics).0 < 170.0);
    }

    #[test]
    fn items_on_other_floors_do_not_block() {
        let mut physics = PhysicsModel::default();
        physics.add_map_item(200.0, 100.0, 1, &CollisionData::Circle { radius: 30.0 });
        let hero = physics.create_hero_body(&Location::new(50.0, 100.0, 0), &HERO);
        walk_right(&mut physics, &hero, 120);
        assert!(hero.position(&physics).0 > 250.0);
    }
}

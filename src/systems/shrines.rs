use crate::cfg;
use crate::cmtp::{Location, ShrineKind, UseKind};
use crate::engine::event::{EventStatus, EventType};
use crate::engine::floor::FloorTracker;
use crate::engine::game::{self, GameEvent, Tcod};
use crate::engine::mechanics;
use crate::engine::tmx;
use crate::systems::render;
use log::{info, warn};
use rand::Rng;
use std::f32::consts::PI;
use tcod::colors;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub velocity: f32,
    pub amplitude: f32,
    pub theta: f32,
    pub n: f32,
    pub e: f32,
    pub clockwise: bool,
}

impl Particle {
    /// Offset from the shrine center, on the curve rho = A(1 + e cos(n theta)).
    pub fn offset(&self) -> (f32, f32) {
        let rho = self.amplitude * (1.0 + self.e * (self.n * self.theta).cos());
        (rho * self.theta.cos(), rho * self.theta.sin())
    }
}

#[derive(Clone, Debug)]
pub struct ParticleSystem {
    pub loc: Location,
    pub kind: ShrineKind,
    pub particles: Vec<Particle>,
}

#[derive(Debug, Default)]
pub struct ShrineManager {
    systems: Vec<ParticleSystem>,
    tracker: FloorTracker,
}

impl ShrineManager {
    pub fn load_map(map: &tmx::Map, rng: &mut impl Rng) -> Self {
        let mut manager = ShrineManager::default();
        let mut visitor = ShrineConstructor {
            manager: &mut manager,
            rng,
        };
        map.visit_layers(&mut visitor);
        manager
    }

    pub fn add_shrine(&mut self, loc: Location, kind: ShrineKind, rng: &mut impl Rng) {
        let particles = (0..cfg::SHRINE_PARTICLES)
            .map(|i| Particle {
                velocity: rng.gen_range(0.5 * PI, 1.5 * PI),
                amplitude: cfg::SHRINE_AMPLITUDE,
                theta: rng.gen_range(0.0, 2.0 * PI),
                n: rng.gen_range(1.0, 3.0),
                e: rng.gen_range(0.5, 1.5),
                clockwise: i % 2 == 0,
            })
            .collect();
        self.systems.push(ParticleSystem {
            loc,
            kind,
            particles,
        });
    }

    pub fn update(&mut self, dt: f32) {
        let floor = self.tracker.floor();
        for system in self.systems.iter_mut().filter(|s| s.loc.floor == floor) {
            for particle in &mut system.particles {
                if particle.clockwise {
                    particle.theta += particle.velocity * dt;
                } else {
                    particle.theta -= particle.velocity * dt;
                }
            }
        }
    }

    /// Kinds of the shrines within reach of `loc`.
    pub fn shrines_near(&self, loc: &Location) -> Vec<ShrineKind> {
        self.systems
            .iter()
            .filter(|system| mechanics::is_near(&system.loc, loc, cfg::SHRINE_DISTANCE))
            .map(|system| system.kind)
            .collect()
    }

    pub fn systems(&self) -> &[ParticleSystem] {
        &self.systems
    }

    pub fn floor(&self) -> i32 {
        self.tracker.floor()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

struct ShrineConstructor<'a, R> {
    manager: &'a mut ShrineManager,
    rng: &'a mut R,
}

impl<R: Rng> tmx::LayerVisitor for ShrineConstructor<'_, R> {
    fn visit_object_layer(&mut self, _map: &tmx::Map, layer: &tmx::ObjectLayer) {
        if layer.property("kind", "") != "shrine" {
            return;
        }
        let floor = layer.floor();
        info!(target: "resources", "Loading shrine layer: '{}' (floor: {})", layer.name, floor);
        for object in &layer.objects {
            match ShrineKind::from_name(&object.kind) {
                Some(kind) => {
                    let loc = Location::new(object.x, object.y, floor);
                    self.manager.add_shrine(loc, kind, &mut *self.rng);
                }
                None => warn!(target: "resources", "Unknown shrine: '{}'", object.name),
            }
        }
    }
}

pub fn register(world: &mut game::World) {
    world.main.add_entity("shrines", 30, update, render);
    world.events.register(game::HERO_LOCATION, on_hero_location);
    for &event_type in &game::VIEW_EVENTS {
        world.events.register(event_type, on_view);
    }
    world.events.register(game::USE, on_use);
}

fn on_hero_location(world: &mut game::World, _: EventType, event: &mut GameEvent) -> EventStatus {
    if let GameEvent::HeroLocation { loc } = event {
        world.shrines.tracker.on_hero_location(loc.floor);
    }
    EventStatus::Die
}

fn on_view(world: &mut game::World, event_type: EventType, _: &mut GameEvent) -> EventStatus {
    if let Some(change) = game::view_change(event_type) {
        world.shrines.tracker.on_view_change(change);
    }
    EventStatus::Keep
}

fn on_use(world: &mut game::World, _: EventType, event: &mut GameEvent) -> EventStatus {
    if let GameEvent::Use { loc, kind } = event {
        for shrine in world.shrines.shrines_near(loc) {
            match shrine {
                ShrineKind::Pona => world.attributes.increase_hp(cfg::PONA_HEAL_RATIO),
                ShrineKind::Tomo => *kind = UseKind::Save,
                ShrineKind::Moli | ShrineKind::Sewi => (),
            }
        }
    }
    EventStatus::Keep
}

pub fn update(world: &mut game::World, dt: f32) {
    world.shrines.update(dt);
}

fn shrine_color(kind: ShrineKind) -> colors::Color {
    match kind {
        ShrineKind::Pona => colors::Color::new(0xFF, 0x00, 0x00),
        ShrineKind::Tomo => colors::Color::new(0x00, 0xC0, 0xC0),
        ShrineKind::Moli | ShrineKind::Sewi => cfg::COLOR_LIGHTEST_GREY,
    }
}

pub fn render(world: &game::World, tcod: &mut Tcod) {
    let floor = world.shrines.floor();
    for system in world.shrines.systems.iter().filter(|s| s.loc.floor == floor) {
        let color = shrine_color(system.kind);
        for particle in &system.particles {
            let (dx, dy) = particle.offset();
            render::put_world_char(
                &mut tcod.con,
                &world.camera,
                (system.loc.x + dx, system.loc.y + dy),
                '*',
                color,
            );
        }
    }
}

use crate::cfg;
use crate::cmtp::{CollisionData, Location};
use crate::engine::body::Body;
use crate::engine::event::{EventStatus, EventType};
use crate::engine::floor::FloorChange;
use crate::engine::game::{self, GameEvent, Tcod};
use crate::engine::mechanics;
use crate::engine::physics::PhysicsModel;
use crate::systems::render;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Linear {
    Stop,
    Forward,
    Backward,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Angular {
    Stop,
    Left,
    Right,
}

/// Frames with their duration, played in a loop.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    name: &'static str,
    frames: Vec<(usize, f32)>,
    current: usize,
    elapsed: f32,
}

impl Animation {
    pub fn new(name: &'static str) -> Self {
        Animation {
            name,
            frames: Vec::new(),
            current: 0,
            elapsed: 0.0,
        }
    }

    pub fn add_frame(&mut self, frame: usize, duration: f32) {
        self.frames.push((frame, duration));
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn update(&mut self, dt: f32) {
        if self.frames.iter().all(|&(_, duration)| duration <= 0.0) {
            return;
        }
        self.elapsed += dt;
        while self.elapsed >= self.frames[self.current].1 {
            self.elapsed -= self.frames[self.current].1;
            self.current = (self.current + 1) % self.frames.len();
        }
    }

    pub fn frame(&self) -> usize {
        self.frames.get(self.current).map_or(0, |&(frame, _)| frame)
    }
}

const HERO_GLYPHS: [char; 3] = ['@', 'a', 'e'];

pub struct Hero {
    body: Body,
    linear: Linear,
    angular: Angular,
    static_animation: Animation,
    forward_animation: Animation,
    backward_animation: Animation,
}

impl Hero {
    pub fn new(physics: &mut PhysicsModel, loc: &Location) -> Self {
        let data = CollisionData::Rectangle {
            width: cfg::HERO_WIDTH,
            height: cfg::HERO_HEIGHT,
        };
        let mut static_animation = Animation::new("static");
        static_animation.add_frame(0, 1.0);
        let mut forward_animation = Animation::new("forward");
        forward_animation.add_frame(0, 0.15);
        forward_animation.add_frame(1, 0.20);
        forward_animation.add_frame(0, 0.15);
        forward_animation.add_frame(2, 0.20);
        let mut backward_animation = Animation::new("backward");
        backward_animation.add_frame(0, 0.20);
        backward_animation.add_frame(2, 0.30);
        backward_animation.add_frame(0, 0.20);
        backward_animation.add_frame(1, 0.30);
        Hero {
            body: physics.create_hero_body(loc, &data),
            linear: Linear::Stop,
            angular: Angular::Stop,
            static_animation,
            forward_animation,
            backward_animation,
        }
    }

    pub fn set_linear(&mut self, linear: Linear) {
        self.linear = linear;
    }

    pub fn set_angular(&mut self, angular: Angular) {
        self.angular = angular;
    }

    pub fn stop(&mut self) {
        self.linear = Linear::Stop;
        self.angular = Angular::Stop;
    }

    pub fn linear(&self) -> Linear {
        self.linear
    }

    pub fn location(&self, physics: &PhysicsModel) -> Location {
        self.body.location(physics)
    }

    pub fn angle(&self, physics: &PhysicsModel) -> f32 {
        self.body.angle(physics)
    }

    pub fn animation(&self) -> &Animation {
        match self.linear {
            Linear::Stop => &self.static_animation,
            Linear::Forward => &self.forward_animation,
            Linear::Backward => &self.backward_animation,
        }
    }

    /// Turns, moves and animates the hero, then returns its location.
    pub fn update(&mut self, physics: &mut PhysicsModel, dt: f32) -> Location {
        let mut angle = self.body.angle(physics);
        match self.angular {
            Angular::Stop => (),
            Angular::Left => angle -= dt * cfg::HERO_TURN,
            Angular::Right => angle += dt * cfg::HERO_TURN,
        }
        let (velocity, animation) = match self.linear {
            Linear::Stop => (0.0, &mut self.static_animation),
            Linear::Forward => (-cfg::HERO_HOP, &mut self.forward_animation),
            Linear::Backward => (cfg::HERO_HOP * 0.5, &mut self.backward_animation),
        };
        animation.update(dt);
        self.body.set_angle_and_velocity(physics, angle, velocity);
        self.body.location(physics)
    }

    pub fn change_floor(&mut self, physics: &mut PhysicsModel, change: FloorChange) {
        match change {
            FloorChange::Up => self.body.move_up(physics),
            FloorChange::Down => self.body.move_down(physics),
            FloorChange::Inside => self.body.move_inside(physics),
            FloorChange::Outside => self.body.move_outside(physics),
        }
    }

    pub fn place(&mut self, physics: &mut PhysicsModel, loc: &Location, angle: f32) {
        self.body.teleport(physics, loc);
        self.body.set_angle(physics, angle);
    }
}

pub fn register(world: &mut game::World) {
    world.main.add_entity("hero", 1, update, render);
    for &event_type in &[
        game::MOVE_UP,
        game::MOVE_DOWN,
        game::MOVE_INSIDE,
        game::MOVE_OUTSIDE,
    ] {
        world.events.register(event_type, on_move);
    }
}

fn on_move(world: &mut game::World, event_type: EventType, _: &mut GameEvent) -> EventStatus {
    let change = match event_type {
        game::MOVE_UP => FloorChange::Up,
        game::MOVE_DOWN => FloorChange::Down,
        game::MOVE_INSIDE => FloorChange::Inside,
        game::MOVE_OUTSIDE => FloorChange::Outside,
        _ => return EventStatus::Keep,
    };
    world.hero.change_floor(&mut world.physics, change);
    game::trigger(world, GameEvent::View(change));
    EventStatus::Keep
}

pub fn update(world: &mut game::World, dt: f32) {
    let loc = world.hero.update(&mut world.physics, dt);
    game::trigger(world, GameEvent::HeroLocation { loc });
}

pub fn render(world: &game::World, tcod: &mut Tcod) {
    let loc = world.hero.location(&world.physics);
    let angle = world.hero.angle(&world.physics);
    let glyph = HERO_GLYPHS[world.hero.animation().frame() % HERO_GLYPHS.len()];
    render::put_world_char(&mut tcod.con, &world.camera, (loc.x, loc.y), glyph, cfg::COLOR_HERO);
    // facing marker one cell ahead
    let (dx, dy) = mechanics::rotate((0.0, -cfg::CELL_SIZE), angle);
    render::put_world_char(
        &mut tcod.con,
        &world.camera,
        (loc.x + dx, loc.y + dy),
        '.',
        cfg::COLOR_HERO,
    );
}

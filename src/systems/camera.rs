use crate::cfg;
use crate::engine::event::{EventStatus, EventType};
use crate::engine::game::{self, GameEvent};

/// Center of the main view, in map pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
}

impl Camera {
    pub fn to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        (
            ((x - self.x) / cfg::CELL_SIZE).floor() as i32 + cfg::SCREEN_WIDTH / 2,
            ((y - self.y) / cfg::CELL_SIZE).floor() as i32 + cfg::SCREEN_HEIGHT / 2,
        )
    }

    pub fn is_on_screen(&self, (x, y): (i32, i32)) -> bool {
        x >= 0 && y >= 0 && x < cfg::SCREEN_WIDTH && y < cfg::SCREEN_HEIGHT
    }
}

pub fn register(world: &mut game::World) {
    world.events.register(game::HERO_LOCATION, on_hero_location);
}

fn on_hero_location(world: &mut game::World, _: EventType, event: &mut GameEvent) -> EventStatus {
    if let GameEvent::HeroLocation { loc } = event {
        world.camera.x = loc.x;
        world.camera.y = loc.y;
    }
    EventStatus::Keep
}

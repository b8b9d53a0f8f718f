use crate::cfg;
use crate::engine::game::{self, Tcod};
use crate::systems::render;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub value: i32,
    pub max: i32,
}

impl Gauge {
    fn set_max(&mut self, max: i32) {
        self.max = max.max(0);
        self.value = self.value.min(self.max);
    }

    fn increase(&mut self, ratio: f32) {
        let amount = (ratio * self.max as f32).round() as i32;
        self.value = (self.value + amount).max(0).min(self.max);
    }

    fn decrease(&mut self, ratio: f32) {
        self.increase(-ratio);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeroAttributes {
    pub hp: Gauge,
    pub mp: Gauge,
}

impl Default for HeroAttributes {
    fn default() -> Self {
        HeroAttributes {
            hp: Gauge {
                value: cfg::INITIAL_HP,
                max: cfg::INITIAL_MAX_HP,
            },
            mp: Gauge {
                value: cfg::INITIAL_MP,
                max: cfg::INITIAL_MAX_MP,
            },
        }
    }
}

impl HeroAttributes {
    pub fn set_max_hp(&mut self, max: i32) {
        self.hp.set_max(max);
    }

    pub fn set_max_mp(&mut self, max: i32) {
        self.mp.set_max(max);
    }

    /// Adds `ratio` of the maximum, capped at the maximum.
    pub fn increase_hp(&mut self, ratio: f32) {
        self.hp.increase(ratio);
    }

    pub fn decrease_hp(&mut self, ratio: f32) {
        self.hp.decrease(ratio);
    }

    pub fn increase_mp(&mut self, ratio: f32) {
        self.mp.increase(ratio);
    }

    pub fn decrease_mp(&mut self, ratio: f32) {
        self.mp.decrease(ratio);
    }
}

pub fn register(world: &mut game::World) {
    world.heads_up.add_entity("attributes", 0, update, render);
}

pub fn update(_world: &mut game::World, _dt: f32) {}

pub fn render(world: &game::World, tcod: &mut Tcod) {
    let HeroAttributes { hp, mp } = world.attributes;
    render::render_bar(
        &mut tcod.root,
        1,
        1,
        cfg::BAR_WIDTH,
        "HP",
        hp.value,
        hp.max,
        cfg::COLOR_HP,
        cfg::COLOR_BAR_BG,
    );
    render::render_bar(
        &mut tcod.root,
        1,
        2,
        cfg::BAR_WIDTH,
        "MP",
        mp.value,
        mp.max,
        cfg::COLOR_MP,
        cfg::COLOR_BAR_BG,
    );
}

use crate::cfg;
use crate::cmtp::Rect;
use crate::engine::asset::DataManager;
use crate::engine::event::{EventStatus, EventType};
use crate::engine::game::{self, GameEvent, Tcod};
use crate::engine::grid::GridMap;
use crate::engine::physics::PhysicsModel;
use crate::engine::tmx;
use crate::systems::render;
use log::{info, warn};

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub name: String,
    pub floor: i32,
    /// Top left corner in map pixels.
    pub pos: (f32, f32),
    pub rect: Rect,
    pub image: String,
}

#[derive(Debug, Default)]
pub struct SpriteMap {
    grid: GridMap<Sprite>,
    visible: Vec<Sprite>,
}

impl SpriteMap {
    /// Collects the tile objects of the layers of `kind`. Sprites with a
    /// known collision shape become static items of the physics model.
    pub fn load_map(map: &tmx::Map, kind: &str, data: &DataManager, physics: &mut PhysicsModel) -> Self {
        let (width, height) = map.pixel_size();
        let mut sprite_map = SpriteMap {
            grid: GridMap::new(width, height, cfg::GRID_UNIT),
            visible: Vec::new(),
        };
        map.visit_layers(&mut SpriteConstructor {
            sprite_map: &mut sprite_map,
            kind,
            data,
            physics,
        });
        sprite_map
    }

    pub fn add_sprite(&mut self, sprite: Sprite) {
        let (x, y) = sprite.pos;
        self.grid.add_object(sprite, x, y);
    }

    pub fn update(&mut self) {
        if !self.grid.is_dirty() {
            return;
        }
        let floor = self.grid.floor();
        let visible = &mut self.visible;
        visible.clear();
        self.grid.process_objects(|sprite| {
            if sprite.floor == floor {
                visible.push(sprite.clone());
            }
        });
        visible.sort_by(|a, b| a.image.cmp(&b.image));
        self.grid.set_clean();
    }

    pub fn visible(&self) -> &[Sprite] {
        &self.visible
    }

    pub fn len(&self) -> usize {
        self.grid.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.iter().next().is_none()
    }

    pub fn floor(&self) -> i32 {
        self.grid.floor()
    }
}

struct SpriteConstructor<'a> {
    sprite_map: &'a mut SpriteMap,
    kind: &'a str,
    data: &'a DataManager,
    physics: &'a mut PhysicsModel,
}

impl tmx::LayerVisitor for SpriteConstructor<'_> {
    fn visit_object_layer(&mut self, map: &tmx::Map, layer: &tmx::ObjectLayer) {
        if !layer.has_property("kind") {
            warn!(target: "graphics", "No kind for the layer: '{}'", layer.name);
            return;
        }
        if layer.property("kind", "") != self.kind {
            return;
        }
        let floor = layer.floor();
        info!(target: "graphics", "Loading sprite layer: '{}' (floor: {})", layer.name, floor);
        let mut count = 0;
        for object in &layer.objects {
            let gid = match object.tile_gid() {
                Some(gid) if gid != 0 => gid,
                _ => {
                    warn!(target: "graphics", "Object is not a tile: '{}'", object.name);
                    continue;
                }
            };
            let tileset = match map.tileset_from_gid(gid) {
                Some(tileset) => tileset,
                None => {
                    warn!(target: "graphics", "No tileset for the sprite: '{}'", object.name);
                    continue;
                }
            };
            let rect = tileset.coords(gid - tileset.firstgid);
            let pos = (object.x, object.y - tileset.tileheight as f32);
            self.sprite_map.add_sprite(Sprite {
                name: object.name.clone(),
                floor,
                pos,
                rect,
                image: tileset.image.clone(),
            });
            count += 1;

            if !self.data.has_collision_data(&object.name) {
                continue;
            }
            if let Some(collision) = self.data.collision_data_for(&object.name) {
                let x = pos.0 + rect.width as f32 / 2.0;
                let y = pos.1 + rect.height as f32 / 2.0;
                self.physics.add_map_item(x, y, floor, collision);
            }
        }
        info!(target: "graphics", "Sprites loaded: {}", count);
    }
}

pub fn register(world: &mut game::World) {
    world.main.add_entity("low_sprites", -5, update_low_sprites, render_low_sprites);
    world.main.add_entity("high_sprites", 5, update_high_sprites, render_high_sprites);
    world.events.register(game::HERO_LOCATION, on_hero_location);
    for &event_type in &game::VIEW_EVENTS {
        world.events.register(event_type, on_view);
    }
}

fn on_hero_location(world: &mut game::World, _: EventType, event: &mut GameEvent) -> EventStatus {
    if let GameEvent::HeroLocation { loc } = event {
        world.low_sprites.grid.on_hero_location(loc);
        world.high_sprites.grid.on_hero_location(loc);
    }
    EventStatus::Keep
}

fn on_view(world: &mut game::World, event_type: EventType, _: &mut GameEvent) -> EventStatus {
    if let Some(change) = game::view_change(event_type) {
        world.low_sprites.grid.on_view_change(change);
        world.high_sprites.grid.on_view_change(change);
    }
    EventStatus::Keep
}

fn update_low_sprites(world: &mut game::World, _dt: f32) {
    world.low_sprites.update();
}

fn update_high_sprites(world: &mut game::World, _dt: f32) {
    world.high_sprites.update();
}

fn render_sprites(sprite_map: &SpriteMap, world: &game::World, tcod: &mut Tcod) {
    for sprite in sprite_map.visible() {
        let glyph = sprite.name.chars().next().unwrap_or('#');
        let center = (
            sprite.pos.0 + sprite.rect.width as f32 / 2.0,
            sprite.pos.1 + sprite.rect.height as f32 / 2.0,
        );
        render::put_world_char(&mut tcod.con, &world.camera, center, glyph, cfg::COLOR_SPRITE);
    }
}

fn render_low_sprites(world: &game::World, tcod: &mut Tcod) {
    render_sprites(&world.low_sprites, world, tcod);
}

fn render_high_sprites(world: &game::World, tcod: &mut Tcod) {
    render_sprites(&world.high_sprites, world, tcod);
}

#[cfg(test)]
mod sprite_map_tests {
    use super::*;
    use crate::cmtp::{CollisionData, Location};

    fn map() -> tmx::Map {
        let json = serde_json::json!({
            "width": 10, "height": 10, "tilewidth": 64, "tileheight": 64,
            "tilesets": [
                { "firstgid": 1, "name": "rocks", "columns": 1, "tilewidth": 64, "tileheight": 64,
                  "image": "rocks.png" },
                { "firstgid": 2, "name": "trees", "columns": 2, "tilewidth": 128, "tileheight": 128,
                  "image": "trees.png" }
            ],
            "layers": [
                { "type": "objectgroup", "name": "things",
                  "properties": [ { "name": "kind", "type": "string", "value": "low_sprite" } ],
                  "objects": [
                    { "name": "tree", "gid": 3, "x": 200.0, "y": 328.0, "width": 128.0, "height": 128.0 },
                    { "name": "rock", "gid": 1, "x": 0.0, "y": 64.0, "width": 64.0, "height": 64.0 },
                    { "name": "not a tile", "x": 10.0, "y": 10.0, "width": 5.0, "height": 5.0 }
                  ] },
                { "type": "objectgroup", "name": "roofs",
                  "properties": [ { "name": "kind", "type": "string", "value": "high_sprite" },
                                  { "name": "floor", "type": "int", "value": 1 } ],
                  "objects": [
                    { "name": "roof", "gid": 1, "x": 0.0, "y": 64.0, "width": 64.0, "height": 64.0 }
                  ] }
            ]
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn tile_objects_become_sprites() {
        let data = DataManager::default();
        let mut physics = PhysicsModel::default();
        let mut sprites = SpriteMap::load_map(&map(), "low_sprite", &data, &mut physics);
        assert_eq!(sprites.len(), 2);
        sprites.grid.on_hero_location(&Location::new(0.0, 0.0, 0));
        sprites.update();
        let visible = sprites.visible();
        assert_eq!(visible.len(), 2);
        // sorted by image
        assert_eq!(visible[0].name, "rock");
        assert_eq!(visible[1].name, "tree");
        assert_eq!(visible[1].pos, (200.0, 200.0));
        assert_eq!(
            visible[1].rect,
            Rect { left: 128, top: 0, width: 128, height: 128 }
        );
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn sprites_with_collision_data_are_solid() {
        let mut data = DataManager::default();
        data.insert_collision("tree", CollisionData::Circle { radius: 20.0 });
        let mut physics = PhysicsModel::default();
        SpriteMap::load_map(&map(), "low_sprite", &data, &mut physics);
        assert_eq!(physics.body_count(), 1);
    }

    #[test]
    fn sprites_of_other_floors_are_hidden() {
        let data = DataManager::default();
        let mut physics = PhysicsModel::default();
        let mut sprites = SpriteMap::load_map(&map(), "high_sprite", &data, &mut physics);
        sprites.grid.on_hero_location(&Location::new(0.0, 0.0, 0));
        sprites.update();
        assert!(sprites.visible().is_empty());
        sprites.grid.on_view_change(crate::engine::floor::FloorChange::Inside);
        sprites.update();
        assert_eq!(sprites.visible().len(), 1);
    }
}

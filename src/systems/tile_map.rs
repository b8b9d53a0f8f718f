use crate::cfg;
use crate::cmtp::Rect;
use crate::engine::event::{EventStatus, EventType};
use crate::engine::game::{self, GameEvent, Tcod};
use crate::engine::grid::GridMap;
use crate::engine::tmx;
use crate::systems::render;
use log::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub floor: i32,
    /// Corners in map pixels, clockwise from the top left.
    pub corners: [(f32, f32); 4],
    pub rect: Rect,
    pub local_id: u32,
}

impl Tile {
    pub fn center(&self) -> (f32, f32) {
        let (left, top) = self.corners[0];
        let (right, bottom) = self.corners[2];
        ((left + right) / 2.0, (top + bottom) / 2.0)
    }

    pub fn size(&self) -> (f32, f32) {
        let (left, top) = self.corners[0];
        let (right, bottom) = self.corners[2];
        (right - left, bottom - top)
    }
}

#[derive(Debug, Default)]
pub struct TileMap {
    grid: GridMap<Tile>,
    visible: Vec<Tile>,
}

impl TileMap {
    pub fn load_map(map: &tmx::Map, kind: &str) -> Self {
        let (width, height) = map.pixel_size();
        let mut tile_map = TileMap {
            grid: GridMap::new(width, height, cfg::GRID_UNIT),
            visible: Vec::new(),
        };
        map.visit_layers(&mut TileConstructor {
            tile_map: &mut tile_map,
            kind,
        });
        tile_map
    }

    pub fn add_tile(&mut self, tile: Tile) {
        let (x, y) = tile.center();
        self.grid.add_object(tile, x, y);
    }

    /// Rebuilds the visible tiles after the focus or the floor changed.
    pub fn update(&mut self) {
        if !self.grid.is_dirty() {
            return;
        }
        let floor = self.grid.floor();
        let visible = &mut self.visible;
        visible.clear();
        self.grid.process_objects(|tile| {
            if tile.floor == floor {
                visible.push(*tile);
            }
        });
        self.grid.set_clean();
    }

    pub fn visible(&self) -> &[Tile] {
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

struct TileConstructor<'a> {
    tile_map: &'a mut TileMap,
    kind: &'a str,
}

impl tmx::LayerVisitor for TileConstructor<'_> {
    fn visit_tile_layer(&mut self, map: &tmx::Map, layer: &tmx::TileLayer) {
        if !layer.has_property("kind") {
            warn!(target: "graphics", "No kind for the layer: '{}'", layer.name);
            return;
        }
        if layer.property("kind", "") != self.kind {
            return;
        }
        let floor = layer.floor();
        info!(target: "graphics", "Loading tile layer: '{}' (floor: {})", layer.name, floor);
        let (tile_width, tile_height) = (map.tilewidth as f32, map.tileheight as f32);
        let mut count = 0;
        for (column, row, gid) in layer.cells() {
            let tileset = match map.tileset_from_gid(gid) {
                Some(tileset) => tileset,
                None => {
                    warn!(target: "graphics", "No tileset for the tile: {}", gid);
                    continue;
                }
            };
            let local_id = gid - tileset.firstgid;
            let (left, top) = (column as f32 * tile_width, row as f32 * tile_height);
            let (right, bottom) = (left + tile_width, top + tile_height);
            self.tile_map.add_tile(Tile {
                floor,
                corners: [(left, top), (right, top), (right, bottom), (left, bottom)],
                rect: tileset.coords(local_id),
                local_id,
            });
            count += 1;
        }
        info!(target: "graphics", "Tiles loaded: {}", count);
    }
}

fn tile_maps(world: &mut game::World) -> [&mut TileMap; 3] {
    [&mut world.ground, &mut world.low_tiles, &mut world.high_tiles]
}

pub fn register(world: &mut game::World) {
    world.main.add_entity("ground", -10, update_ground, render_ground);
    world.main.add_entity("low_tiles", -8, update_low_tiles, render_low_tiles);
    world.main.add_entity("high_tiles", 10, update_high_tiles, render_high_tiles);
    world.events.register(game::HERO_LOCATION, on_hero_location);
    for &event_type in &game::VIEW_EVENTS {
        world.events.register(event_type, on_view);
    }
}

fn on_hero_location(world: &mut game::World, _: EventType, event: &mut GameEvent) -> EventStatus {
    if let GameEvent::HeroLocation { loc } = event {
        for tile_map in tile_maps(world).iter_mut() {
            tile_map.grid.on_hero_location(loc);
        }
    }
    EventStatus::Keep
}

fn on_view(world: &mut game::World, event_type: EventType, _: &mut GameEvent) -> EventStatus {
    if let Some(change) = game::view_change(event_type) {
        for tile_map in tile_maps(world).iter_mut() {
            tile_map.grid.on_view_change(change);
        }
    }
    EventStatus::Keep
}

fn update_ground(world: &mut game::World, _dt: f32) {
    world.ground.update();
}

fn update_low_tiles(world: &mut game::World, _dt: f32) {
    world.low_tiles.update();
}

fn update_high_tiles(world: &mut game::World, _dt: f32) {
    world.high_tiles.update();
}

fn render_tiles(tile_map: &TileMap, world: &game::World, tcod: &mut Tcod) {
    for tile in tile_map.visible() {
        let color = cfg::TILE_PALETTE[tile.local_id as usize % cfg::TILE_PALETTE.len()];
        render::fill_world_rect(&mut tcod.con, &world.camera, tile.corners[0], tile.size(), color);
    }
}

fn render_ground(world: &game::World, tcod: &mut Tcod) {
    render_tiles(&world.ground, world, tcod);
}

fn render_low_tiles(world: &game::World, tcod: &mut Tcod) {
    render_tiles(&world.low_tiles, world, tcod);
}

fn render_high_tiles(world: &game::World, tcod: &mut Tcod) {
    render_tiles(&world.high_tiles, world, tcod);
}

#[cfg(test)]
mod tile_map_tests {
    use super::*;
    use crate::cmtp::Location;
    use crate::engine::floor::FloorChange;

    // 60x60 tiles of 64px: a 3x3 grid of 1600px cells
    fn map() -> tmx::Map {
        let mut ground = vec![0; 3600];
        ground[0] = 1;
        ground[59] = 2;
        ground[3599] = 3;
        let mut upstairs = vec![0; 3600];
        upstairs[1] = 4;
        let json = serde_json::json!({
            "width": 60, "height": 60, "tilewidth": 64, "tileheight": 64,
            "tilesets": [
                { "firstgid": 1, "name": "ground", "columns": 2, "tilewidth": 64, "tileheight": 64 }
            ],
            "layers": [
                { "type": "tilelayer", "name": "grass", "width": 60, "height": 60, "data": ground,
                  "properties": [ { "name": "kind", "type": "string", "value": "ground" } ] },
                { "type": "tilelayer", "name": "attic", "width": 60, "height": 60, "data": upstairs,
                  "properties": [ { "name": "kind", "type": "string", "value": "ground" },
                                  { "name": "floor", "type": "int", "value": 2 } ] },
                { "type": "tilelayer", "name": "walls", "width": 60, "height": 60, "data": [],
                  "properties": [ { "name": "kind", "type": "string", "value": "low_tile" } ] },
                { "type": "tilelayer", "name": "nokind", "width": 60, "height": 60, "data": [] }
            ]
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn tiles_of_the_kind_are_loaded() {
        let tiles = TileMap::load_map(&map(), "ground");
        assert_eq!(tiles.len(), 4);
        assert!(TileMap::load_map(&map(), "low_tile").is_empty());
        let first = tiles.grid.iter().next().copied().unwrap();
        assert_eq!(first.corners, [(0.0, 0.0), (64.0, 0.0), (64.0, 64.0), (0.0, 64.0)]);
        assert_eq!(first.rect, Rect { left: 0, top: 0, width: 64, height: 64 });
        assert_eq!(first.local_id, 0);
    }

    #[test]
    fn visible_tiles_follow_focus_and_floor() {
        let mut tiles = TileMap::load_map(&map(), "ground");
        tiles.grid.on_hero_location(&Location::new(10.0, 10.0, 0));
        tiles.update();
        // the top right tile is two cells away
        assert_eq!(tiles.visible().len(), 1);
        tiles.grid.on_hero_location(&Location::new(3000.0, 3000.0, 0));
        tiles.update();
        assert_eq!(tiles.visible().len(), 3);
        tiles.grid.on_hero_location(&Location::new(10.0, 10.0, 0));
        tiles.grid.on_view_change(FloorChange::Up);
        tiles.update();
        assert_eq!(tiles.visible().len(), 1);
        assert_eq!(tiles.visible()[0].floor, 2);
        assert!(!tiles.grid.is_dirty());
    }
}

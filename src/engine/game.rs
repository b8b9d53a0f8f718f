use super::asset::{AssetError, DataManager};
use super::entity::{self, EntityManager};
use super::event::{self, hash, EventContext, EventManager, EventType};
use super::floor::FloorChange;
use super::physics::PhysicsModel;
use super::save::SavePointManager;
use super::tmx;
use crate::cfg;
use crate::cmtp::{Location, UseKind};
use crate::systems::{
    attributes::HeroAttributes, camera::Camera, characters::CharacterManager,
    dialog::DialogManager, driver::GameDriver, hero::Hero, input::GameActions,
    messages::MessageManager, requirements::RequirementManager, shrines::ShrineManager,
    sprite_map::SpriteMap, story::Story, tile_map::TileMap,
};
use log::info;
use rand::SeedableRng;
use std::path::PathBuf;
use tcod::{colors, console, Console as _};

pub const HERO_LOCATION: EventType = hash("HeroLocation");
pub const DIALOG_END: EventType = hash("DialogEnd");
pub const USE: EventType = hash("Use");
pub const VIEW_UP: EventType = hash("ViewUp");
pub const VIEW_DOWN: EventType = hash("ViewDown");
pub const VIEW_INSIDE: EventType = hash("ViewInside");
pub const VIEW_OUTSIDE: EventType = hash("ViewOutside");
pub const MOVE_UP: EventType = hash("MoveUp");
pub const MOVE_DOWN: EventType = hash("MoveDown");
pub const MOVE_INSIDE: EventType = hash("MoveInside");
pub const MOVE_OUTSIDE: EventType = hash("MoveOutside");

pub const VIEW_EVENTS: [EventType; 4] = [VIEW_UP, VIEW_DOWN, VIEW_INSIDE, VIEW_OUTSIDE];

pub fn view_change(event_type: EventType) -> Option<FloorChange> {
    match event_type {
        VIEW_UP => Some(FloorChange::Up),
        VIEW_DOWN => Some(FloorChange::Down),
        VIEW_INSIDE => Some(FloorChange::Inside),
        VIEW_OUTSIDE => Some(FloorChange::Outside),
        _ => None,
    }
}

pub struct Tcod {
    pub root: console::Root,
    pub con: console::Offscreen,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    HeroLocation { loc: Location },
    DialogEnd { name: String },
    Use { loc: Location, kind: UseKind },
    View(FloorChange),
    /// Raised by a map zone, or by the story.
    Zone(EventType),
}

impl event::Event for GameEvent {
    fn event_type(&self) -> EventType {
        match self {
            GameEvent::HeroLocation { .. } => HERO_LOCATION,
            GameEvent::DialogEnd { .. } => DIALOG_END,
            GameEvent::Use { .. } => USE,
            GameEvent::View(FloorChange::Up) => VIEW_UP,
            GameEvent::View(FloorChange::Down) => VIEW_DOWN,
            GameEvent::View(FloorChange::Inside) => VIEW_INSIDE,
            GameEvent::View(FloorChange::Outside) => VIEW_OUTSIDE,
            GameEvent::Zone(event_type) => *event_type,
        }
    }
}

pub struct World {
    pub events: EventManager<World, GameEvent>,
    pub main: EntityManager<World, Tcod>,
    pub heads_up: EntityManager<World, Tcod>,
    pub data: DataManager,
    pub physics: PhysicsModel,
    pub actions: GameActions,
    pub camera: Camera,
    pub hero: Hero,
    pub attributes: HeroAttributes,
    pub characters: CharacterManager,
    pub dialogs: DialogManager,
    pub messages: MessageManager,
    pub requirements: RequirementManager,
    pub shrines: ShrineManager,
    pub story: Story,
    pub saves: SavePointManager,
    pub ground: TileMap,
    pub low_tiles: TileMap,
    pub high_tiles: TileMap,
    pub low_sprites: SpriteMap,
    pub high_sprites: SpriteMap,
    pub driver: GameDriver,
    pub region: String,
}

impl EventContext for World {
    type Event = GameEvent;

    fn event_manager(&mut self) -> &mut EventManager<World, GameEvent> {
        &mut self.events
    }
}

/// Where a world finds its data and keeps its saves.
#[derive(Debug, Clone)]
pub struct WorldPaths {
    pub data_dir: PathBuf,
    pub map: PathBuf,
    pub save_dir: PathBuf,
}

impl World {
    pub fn new(paths: &WorldPaths) -> Result<World, AssetError> {
        let map = tmx::Map::load(&paths.data_dir.join(&paths.map))?;
        let data = DataManager::load(&paths.data_dir);
        let story = Story::load(&paths.data_dir.join("data").join("story.toml"));
        Ok(World::with_map(
            data,
            &map,
            story,
            SavePointManager::new(paths.save_dir.clone()),
        ))
    }

    pub fn with_map(mut data: DataManager, map: &tmx::Map, story: Story, saves: SavePointManager) -> World {
        info!(target: "general", "Loading map ({}x{} tiles)", map.width, map.height);
        let mut physics = PhysicsModel::default();
        data.load_map(map);
        physics.load_map(map);

        let ground = TileMap::load_map(map, "ground");
        let low_tiles = TileMap::load_map(map, "low_tile");
        let high_tiles = TileMap::load_map(map, "high_tile");
        let low_sprites = SpriteMap::load_map(map, "low_sprite", &data, &mut physics);
        let high_sprites = SpriteMap::load_map(map, "high_sprite", &data, &mut physics);
        let mut rng = rand::rngs::StdRng::from_entropy();
        let shrines = ShrineManager::load_map(map, &mut rng);

        let start = data.point_of_interest_for("Start").unwrap_or_else(|| {
            let (x, y) = cfg::HERO_START;
            Location::new(x, y, 0)
        });
        let hero = Hero::new(&mut physics, &start);
        let characters = CharacterManager::from_data(&data, &mut physics);

        let mut world = World {
            events: EventManager::default(),
            main: EntityManager::default(),
            heads_up: EntityManager::default(),
            data,
            physics,
            actions: GameActions::default(),
            camera: Camera::default(),
            hero,
            attributes: HeroAttributes::default(),
            characters,
            dialogs: DialogManager::default(),
            messages: MessageManager::default(),
            requirements: RequirementManager::default(),
            shrines,
            story,
            saves,
            ground,
            low_tiles,
            high_tiles,
            low_sprites,
            high_sprites,
            driver: GameDriver::default(),
            region: map.property("region", "Unknown"),
        };
        register_systems(&mut world);
        world
    }
}

fn register_systems(world: &mut World) {
    use crate::systems::*;
    camera::register(world);
    tile_map::register(world);
    sprite_map::register(world);
    hero::register(world);
    characters::register(world);
    shrines::register(world);
    attributes::register(world);
    dialog::register(world);
    messages::register(world);
    story::register(world);
    driver::register(world);
}

/// Dispatches the event and gives it back, as handlers may have changed it.
pub fn trigger(world: &mut World, mut event: GameEvent) -> GameEvent {
    event::trigger_event(world, &mut event);
    event
}

fn main_entities(world: &World) -> &EntityManager<World, Tcod> {
    &world.main
}

fn heads_up_entities(world: &World) -> &EntityManager<World, Tcod> {
    &world.heads_up
}

/// One frame of the world: physics first, then every entity.
pub fn update(world: &mut World, dt: f32) {
    for zone_event in world.physics.update(dt) {
        trigger(world, GameEvent::Zone(zone_event));
    }
    entity::update_all(world, dt, main_entities);
    entity::update_all(world, dt, heads_up_entities);
}

pub fn render(world: &World, tcod: &mut Tcod) {
    tcod.con.set_default_background(colors::BLACK);
    tcod.con.clear();
    entity::render_all(world, tcod, &world.main);
    console::blit(
        &tcod.con,
        (0, 0),
        (cfg::SCREEN_WIDTH, cfg::SCREEN_HEIGHT),
        &mut tcod.root,
        (0, 0),
        1.0,
        1.0,
    );
    entity::render_all(world, tcod, &world.heads_up);
}

pub fn default_save_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("expt02")
}

use crate::cfg;
use crate::cmtp::{CollisionData, DialogKind, Location, UseKind};
use crate::engine::asset::DataManager;
use crate::engine::body::Body;
use crate::engine::event::{EventStatus, EventType};
use crate::engine::floor::FloorTracker;
use crate::engine::game::{self, GameEvent, Tcod};
use crate::engine::mechanics;
use crate::engine::physics::PhysicsModel;
use crate::systems::{dialog, render};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub struct Character {
    name: String,
    body: Body,
    dialog_kind: DialogKind,
    dialog_name: String,
}

impl Character {
    fn new(physics: &mut PhysicsModel, name: String, loc: &Location, angle: f32) -> Self {
        let data = CollisionData::Rectangle {
            width: cfg::CHARACTER_WIDTH,
            height: cfg::CHARACTER_HEIGHT,
        };
        let body = physics.create_character_body(loc, &data);
        body.set_angle_and_velocity(physics, angle, 0.0);
        Character {
            name,
            body,
            dialog_kind: DialogKind::None,
            dialog_name: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self, physics: &PhysicsModel) -> Location {
        self.body.location(physics)
    }

    pub fn attach_dialog(&mut self, dialog_name: &str) {
        self.dialog_kind = DialogKind::Simple;
        self.dialog_name = dialog_name.to_string();
    }

    pub fn attach_quest_dialog(&mut self, dialog_name: &str) {
        self.dialog_kind = DialogKind::Quest;
        self.dialog_name = dialog_name.to_string();
    }

    pub fn detach_dialog(&mut self) {
        self.dialog_kind = DialogKind::None;
    }

    pub fn has_dialog(&self) -> bool {
        self.dialog_kind != DialogKind::None
    }

    pub fn dialog_kind(&self) -> DialogKind {
        self.dialog_kind
    }

    pub fn dialog_name(&self) -> Option<&str> {
        if self.has_dialog() {
            Some(&self.dialog_name)
        } else {
            None
        }
    }
}

/// What a save file keeps of a character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    pub name: String,
    pub dialog_kind: DialogKind,
    pub dialog_name: String,
}

#[derive(Default)]
pub struct CharacterManager {
    characters: Vec<Character>,
    by_name: HashMap<String, usize>,
    tracker: FloorTracker,
}

impl CharacterManager {
    /// Spawns every known character at its point of interest.
    pub fn from_data(data: &DataManager, physics: &mut PhysicsModel) -> Self {
        let mut manager = CharacterManager::default();
        for (name, character_data) in data.characters() {
            let loc = match data.point_of_interest_for(&character_data.poi) {
                Some(loc) => loc,
                None => {
                    warn!(target: "general", "No location for the character: '{}'", name);
                    continue;
                }
            };
            let character = manager.add_character(physics, name, &loc, character_data.angle);
            match (&character_data.dialog, character_data.quest) {
                (Some(dialog), true) => character.attach_quest_dialog(dialog),
                (Some(dialog), false) => character.attach_dialog(dialog),
                (None, _) => (),
            }
        }
        manager
    }

    pub fn add_character(
        &mut self,
        physics: &mut PhysicsModel,
        name: &str,
        loc: &Location,
        angle: f32,
    ) -> &mut Character {
        if let Some(&index) = self.by_name.get(name) {
            warn!(target: "general", "A character already exists with this name: '{}'", name);
            return &mut self.characters[index];
        }
        let index = self.characters.len();
        self.by_name.insert(name.to_string(), index);
        self.characters
            .push(Character::new(physics, name.to_string(), loc, angle));
        &mut self.characters[index]
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        match self.by_name.get(name) {
            Some(&index) => Some(&self.characters[index]),
            None => {
                warn!(target: "general", "Could not find the character named: '{}'", name);
                None
            }
        }
    }

    pub fn character_mut(&mut self, name: &str) -> Option<&mut Character> {
        match self.by_name.get(name) {
            Some(&index) => Some(&mut self.characters[index]),
            None => {
                warn!(target: "general", "Could not find the character named: '{}'", name);
                None
            }
        }
    }

    pub fn floor(&self) -> i32 {
        self.tracker.floor()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Characters on the floor the hero is on.
    pub fn visible<'a>(&'a self, physics: &'a PhysicsModel) -> impl Iterator<Item = &'a Character> {
        let floor = self.tracker.floor();
        self.characters
            .iter()
            .filter(move |character| character.location(physics).floor == floor)
    }

    /// Dialogs of the characters close enough to `loc` to talk with.
    pub fn dialogs_near(&self, physics: &PhysicsModel, loc: &Location) -> Vec<String> {
        self.characters
            .iter()
            .filter(|character| {
                character.has_dialog()
                    && mechanics::is_near(&character.location(physics), loc, cfg::DIALOG_DISTANCE)
            })
            .map(|character| character.dialog_name.clone())
            .collect()
    }

    pub fn states(&self) -> Vec<CharacterState> {
        self.characters
            .iter()
            .map(|character| CharacterState {
                name: character.name.clone(),
                dialog_kind: character.dialog_kind,
                dialog_name: character.dialog_name.clone(),
            })
            .collect()
    }

    pub fn restore(&mut self, states: &[CharacterState]) {
        for state in states {
            if let Some(character) = self.character_mut(&state.name) {
                character.dialog_kind = state.dialog_kind;
                character.dialog_name = state.dialog_name.clone();
            }
        }
    }
}

pub fn register(world: &mut game::World) {
    world.main.add_entity("characters", 0, update, render);
    world.events.register(game::HERO_LOCATION, on_hero_location);
    for &event_type in &game::VIEW_EVENTS {
        world.events.register(event_type, on_view);
    }
    world.events.register(game::USE, on_use);
}

fn on_hero_location(world: &mut game::World, _: EventType, event: &mut GameEvent) -> EventStatus {
    if let GameEvent::HeroLocation { loc } = event {
        world.characters.tracker.on_hero_location(loc.floor);
    }
    EventStatus::Die
}

fn on_view(world: &mut game::World, event_type: EventType, _: &mut GameEvent) -> EventStatus {
    if let Some(change) = game::view_change(event_type) {
        world.characters.tracker.on_view_change(change);
    }
    EventStatus::Keep
}

fn on_use(world: &mut game::World, _: EventType, event: &mut GameEvent) -> EventStatus {
    if let GameEvent::Use { loc, kind } = event {
        for dialog_name in world.characters.dialogs_near(&world.physics, loc) {
            if dialog::start(world, &dialog_name) {
                *kind = UseKind::Talk;
            }
        }
    }
    EventStatus::Keep
}

pub fn update(_world: &mut game::World, _dt: f32) {}

pub fn render(world: &game::World, tcod: &mut Tcod) {
    for character in world.characters.visible(&world.physics) {
        let loc = character.location(&world.physics);
        let color = match character.dialog_kind {
            DialogKind::None => cfg::COLOR_CHARACTER,
            DialogKind::Simple => cfg::COLOR_DARK_RED,
            DialogKind::Quest => cfg::COLOR_ORANGE,
        };
        let glyph = character.name.chars().next().unwrap_or('?');
        render::put_world_char(&mut tcod.con, &world.camera, (loc.x, loc.y), glyph, color);
        if character.has_dialog() {
            render::put_world_char(
                &mut tcod.con,
                &world.camera,
                (loc.x, loc.y - cfg::CELL_SIZE),
                '!',
                color,
            );
        }
    }
}

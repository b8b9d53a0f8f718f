use crate::cmtp::{
    CharacterData, CollisionData, DialogData, ItemData, Location, MessageData, Rect, SpriteData,
};
use crate::engine::tmx;
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("cannot read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid TOML in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, AssetError> {
    let text = fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| AssetError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a table of named entries. Entries that do not match `T` are logged
/// and skipped, the rest are returned sorted by name.
pub fn load_entries<T: DeserializeOwned>(path: &Path) -> Result<Vec<(String, T)>, AssetError> {
    let vals: BTreeMap<String, serde_json::Value> = read_toml(path)?;
    Ok(vals
        .into_iter()
        .filter_map(|(id, val)| match serde_json::from_value::<T>(val) {
            Ok(entry) => Some((id, entry)),
            Err(err) => {
                warn!(target: "resources", "Invalid entry '{}' in {}: {}", id, path.display(), err);
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Size {
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct SpriteSheet {
    image: String,
    dimension: Size,
    sprite: Size,
    #[serde(default)]
    ids: Vec<String>,
}

impl SpriteSheet {
    fn sprites(&self, name: &str) -> Vec<(String, SpriteData)> {
        let Size { width, height } = self.sprite;
        if width == 0 || height == 0 || self.dimension.width == 0 || self.dimension.height == 0 {
            warn!(target: "resources", "Empty sprite size for entry: '{}'", name);
            return Vec::new();
        }
        if self.dimension.width % width != 0 || self.dimension.height % height != 0 {
            warn!(target: "resources", "Sprite size does not divide the sheet for entry: '{}'", name);
            return Vec::new();
        }
        let count = self.dimension.width / width;
        let capacity = count * (self.dimension.height / height);
        self.ids
            .iter()
            .enumerate()
            .filter_map(|(k, id)| {
                let k = k as u32;
                if k >= capacity {
                    warn!(target: "resources", "Sprite '{}' is outside of the sheet '{}'", id, name);
                    return None;
                }
                let rect = Rect {
                    left: (k % count) * width,
                    top: (k / count) * height,
                    width,
                    height,
                };
                Some((
                    id.clone(),
                    SpriteData {
                        image: self.image.clone(),
                        rect,
                    },
                ))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ItemEntry {
    sprite: String,
    collision: String,
}

#[derive(Debug, Default)]
pub struct DataManager {
    collisions: HashMap<String, CollisionData>,
    sprites: HashMap<String, SpriteData>,
    items: HashMap<String, ItemEntry>,
    dialogs: HashMap<String, DialogData>,
    messages: HashMap<String, MessageData>,
    characters: BTreeMap<String, CharacterData>,
    pois: HashMap<String, Location>,
}

fn load_or_empty<T: DeserializeOwned>(path: &Path, what: &str) -> Vec<(String, T)> {
    match load_entries(path) {
        Ok(entries) => entries,
        Err(err) => {
            error!(target: "resources", "Error when loading {} database: {}", what, err);
            Vec::new()
        }
    }
}

impl DataManager {
    pub fn load(basedir: &Path) -> DataManager {
        info!(target: "resources", "Loading data from {}", basedir.display());
        let dir = basedir.join("data");
        let mut data = DataManager::default();

        data.collisions = load_or_empty(&dir.join("collisions.toml"), "collision")
            .into_iter()
            .collect();
        info!(target: "resources", "\tCollision data: {}", data.collisions.len());

        let sheets: Vec<(String, SpriteSheet)> = load_or_empty(&dir.join("sprites.toml"), "sprite");
        for (name, sheet) in &sheets {
            for (id, sprite) in sheet.sprites(name) {
                if data.sprites.insert(id.clone(), sprite).is_some() {
                    warn!(target: "resources", "Duplicate sprite id: '{}'", id);
                }
            }
        }
        info!(target: "resources", "\tSprite data: {}", data.sprites.len());

        data.items = load_or_empty(&dir.join("items.toml"), "item")
            .into_iter()
            .collect();
        info!(target: "resources", "\tItem data: {}", data.items.len());

        data.dialogs = load_or_empty::<DialogData>(&dir.join("dialogues.toml"), "dialog")
            .into_iter()
            .filter(|(name, dialog)| {
                if dialog.content.is_empty() {
                    warn!(target: "resources", "Empty dialog: '{}'", name);
                }
                !dialog.content.is_empty()
            })
            .collect();
        info!(target: "resources", "\tDialog data: {}", data.dialogs.len());

        data.messages = load_or_empty(&dir.join("messages.toml"), "message")
            .into_iter()
            .collect();
        info!(target: "resources", "\tMessage data: {}", data.messages.len());

        data.characters = load_or_empty(&dir.join("characters.toml"), "character")
            .into_iter()
            .collect();
        info!(target: "resources", "\tCharacter data: {}", data.characters.len());

        data
    }

    pub fn load_map(&mut self, map: &tmx::Map) {
        let mut visitor = PoiConstructor { data: self };
        map.visit_layers(&mut visitor);
    }

    pub fn add_point_of_interest(&mut self, name: &str, loc: Location) {
        self.pois.insert(name.to_string(), loc);
    }

    pub fn collision_data_for(&self, name: &str) -> Option<&CollisionData> {
        let data = self.collisions.get(name);
        if data.is_none() {
            warn!(target: "resources", "Could not find collision data for '{}'", name);
        }
        data
    }

    /// Same as `collision_data_for` without the warning, for optional shapes.
    pub fn has_collision_data(&self, name: &str) -> bool {
        self.collisions.contains_key(name)
    }

    pub fn sprite_data_for(&self, name: &str) -> Option<&SpriteData> {
        let data = self.sprites.get(name);
        if data.is_none() {
            warn!(target: "resources", "Could not find sprite data for '{}'", name);
        }
        data
    }

    pub fn item_data_for(&self, name: &str) -> Option<ItemData> {
        let entry = match self.items.get(name) {
            Some(entry) => entry,
            None => {
                warn!(target: "resources", "Could not find item data for '{}'", name);
                return None;
            }
        };
        let sprite = self.sprite_data_for(&entry.sprite)?.clone();
        let collision = *self.collision_data_for(&entry.collision)?;
        Some(ItemData { sprite, collision })
    }

    pub fn point_of_interest_for(&self, name: &str) -> Option<Location> {
        let loc = self.pois.get(name).copied();
        if loc.is_none() {
            warn!(target: "resources", "Could not find point of interest for '{}'", name);
        }
        loc
    }

    pub fn dialog_data_for(&self, name: &str) -> Option<&DialogData> {
        let data = self.dialogs.get(name);
        if data.is_none() {
            warn!(target: "resources", "Could not find dialog data for '{}'", name);
        }
        data
    }

    pub fn message_data_for(&self, name: &str) -> Option<&MessageData> {
        let data = self.messages.get(name);
        if data.is_none() {
            warn!(target: "resources", "Could not find message data for '{}'", name);
        }
        data
    }

    pub fn character_data_for(&self, name: &str) -> Option<&CharacterData> {
        let data = self.characters.get(name);
        if data.is_none() {
            warn!(target: "resources", "Could not find character data for '{}'", name);
        }
        data
    }

    pub fn characters(&self) -> impl Iterator<Item = (&str, &CharacterData)> {
        self.characters.iter().map(|(name, data)| (name.as_str(), data))
    }

    pub fn dialogs(&self) -> impl Iterator<Item = (&str, &DialogData)> {
        self.dialogs.iter().map(|(name, data)| (name.as_str(), data))
    }

    pub fn insert_dialog(&mut self, name: &str, data: DialogData) {
        self.dialogs.insert(name.to_string(), data);
    }

    pub fn insert_message(&mut self, name: &str, data: MessageData) {
        self.messages.insert(name.to_string(), data);
    }

    pub fn insert_collision(&mut self, name: &str, data: CollisionData) {
        self.collisions.insert(name.to_string(), data);
    }
}

struct PoiConstructor<'a> {
    data: &'a mut DataManager,
}

impl tmx::LayerVisitor for PoiConstructor<'_> {
    fn visit_object_layer(&mut self, _map: &tmx::Map, layer: &tmx::ObjectLayer) {
        if !layer.has_property("kind") {
            warn!(target: "graphics", "No kind for the layer: '{}'", layer.name);
            return;
        }
        if layer.property("kind", "") != "poi" {
            return;
        }
        let floor = layer.floor();
        info!(target: "resources", "Loading POI layer: '{}' (floor: {})", layer.name, floor);
        let mut count = 0;
        for object in &layer.objects {
            if !object.is_ellipse() {
                warn!(target: "resources", "Object is not an ellipse: '{}'", object.name);
                continue;
            }
            self.data
                .add_point_of_interest(&object.name, Location::new(object.x, object.y, floor));
            count += 1;
        }
        info!(target: "resources", "\tPOI loaded: {}", count);
    }
}

use crate::cfg;
use crate::cmtp::Location;
use crate::engine::game::World;
use crate::systems::attributes::HeroAttributes;
use crate::systems::characters::CharacterState;
use crate::systems::requirements::RequirementManager;
use chrono::{DateTime, Local};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

const MAGIC: &str = "expt02-save";
const VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("save file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("wrong saving slot: {0}")]
    ForbiddenSlot(usize),
    #[error("slot does not exist: {0}")]
    MissingSlot(usize),
    #[error("incompatible save version: {0}")]
    IncompatibleVersion(u32),
    #[error("not a save file: {}", .0.display())]
    InvalidHeader(PathBuf),
}

#[derive(Debug, Deserialize)]
struct SaveHeader {
    magic: String,
    version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    magic: String,
    version: u32,
    region: String,
    hero: Location,
    angle: f32,
    attributes: HeroAttributes,
    requirements: RequirementManager,
    characters: Vec<CharacterState>,
}

#[derive(Debug, Clone)]
pub struct SavePointManager {
    save_dir: PathBuf,
}

impl SavePointManager {
    pub fn new(save_dir: PathBuf) -> Self {
        SavePointManager { save_dir }
    }

    pub fn save_dir(&self) -> &PathBuf {
        &self.save_dir
    }

    fn slot_path(&self, slot: usize) -> PathBuf {
        self.save_dir.join(format!("slot{}.json", slot))
    }

    fn check_slot(slot: usize) -> Result<(), SaveError> {
        if slot >= cfg::SLOT_COUNT {
            return Err(SaveError::ForbiddenSlot(slot));
        }
        Ok(())
    }

    pub fn has_slot(&self, slot: usize) -> bool {
        Self::check_slot(slot).is_ok() && self.slot_path(slot).exists()
    }

    pub fn save_to_slot(&self, world: &World, slot: usize) -> Result<(), SaveError> {
        Self::check_slot(slot)?;
        if !self.save_dir.exists() {
            info!(target: "general", "Creating save directory: '{}'", self.save_dir.display());
            fs::create_dir_all(&self.save_dir).map_err(|source| SaveError::Io {
                path: self.save_dir.clone(),
                source,
            })?;
        }
        let path = self.slot_path(slot);
        let save = SaveFile {
            magic: MAGIC.to_string(),
            version: VERSION,
            region: world.region.clone(),
            hero: world.hero.location(&world.physics),
            angle: world.hero.angle(&world.physics),
            attributes: world.attributes,
            requirements: world.requirements.clone(),
            characters: world.characters.states(),
        };
        let text = serde_json::to_string_pretty(&save).map_err(|source| SaveError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, text).map_err(|source| SaveError::Io {
            path: path.clone(),
            source,
        })?;
        info!(target: "general", "Game saved in slot {}", slot);
        Ok(())
    }

    fn read_slot(&self, slot: usize) -> Result<SaveFile, SaveError> {
        Self::check_slot(slot)?;
        let path = self.slot_path(slot);
        if !path.exists() {
            return Err(SaveError::MissingSlot(slot));
        }
        let text = fs::read_to_string(&path).map_err(|source| SaveError::Io {
            path: path.clone(),
            source,
        })?;
        let header: SaveHeader = serde_json::from_str(&text).map_err(|_| SaveError::InvalidHeader(path.clone()))?;
        if header.magic != MAGIC {
            return Err(SaveError::InvalidHeader(path));
        }
        if header.version != VERSION {
            return Err(SaveError::IncompatibleVersion(header.version));
        }
        serde_json::from_str(&text).map_err(|source| SaveError::Json { path, source })
    }

    /// Puts the hero back and restores the story state. Must run before the
    /// first frame of the world.
    pub fn load_from_slot(&self, world: &mut World, slot: usize) -> Result<(), SaveError> {
        let save = self.read_slot(slot)?;
        world.hero.place(&mut world.physics, &save.hero, save.angle);
        world.attributes = save.attributes;
        world.requirements = save.requirements;
        world.characters.restore(&save.characters);
        info!(target: "general", "Game loaded from slot {}", slot);
        Ok(())
    }

    /// Three lines: slot name, region and date of the save.
    pub fn slot_info(&self, slot: usize) -> String {
        if Self::check_slot(slot).is_err() {
            warn!(target: "general", "Wrong saving slot: {}", slot);
            return String::from("(forbidden slot)\n-\n-");
        }
        let path = self.slot_path(slot);
        if !path.exists() {
            return String::from("(empty)\n-\n-");
        }
        let region = match self.read_slot(slot) {
            Ok(save) => save.region,
            Err(err) => {
                warn!(target: "general", "{}", err);
                String::from("?")
            }
        };
        let time = match fs::metadata(&path).and_then(|metadata| metadata.modified()) {
            Ok(modified) => DateTime::<Local>::from(modified)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            Err(_) => String::from("-"),
        };
        format!("slot#{}\n{}\n{}", slot, region, time)
    }
}

#[cfg(test)]
mod save_tests {
    use super::*;
    use crate::engine::game::{self, test_world};

    fn saves(name: &str) -> SavePointManager {
        let dir = std::env::temp_dir().join(format!("expt02-save-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        SavePointManager::new(dir)
    }

    #[test]
    fn slots_out_of_range_are_forbidden() {
        let saves = saves("forbidden");
        assert!(!saves.has_slot(3));
        assert_eq!(saves.slot_info(3), "(forbidden slot)\n-\n-");
        let world = test_world::world("save-forbidden");
        assert!(matches!(
            saves.save_to_slot(&world, 3),
            Err(SaveError::ForbiddenSlot(3))
        ));
    }

    #[test]
    fn empty_slots() {
        let saves = saves("empty");
        assert!(!saves.has_slot(0));
        assert_eq!(saves.slot_info(1), "(empty)\n-\n-");
        let mut world = test_world::world("save-empty");
        assert!(matches!(
            saves.load_from_slot(&mut world, 2),
            Err(SaveError::MissingSlot(2))
        ));
    }

    #[test]
    fn a_saved_game_comes_back() {
        let saves = saves("round");
        let mut world = test_world::world("save-round");
        game::update(&mut world, 1.0 / 60.0);
        world.attributes.increase_hp(0.2);
        world.requirements.add_requirement("MetShagir");
        world
            .characters
            .character_mut("Shagir")
            .unwrap()
            .attach_quest_dialog("ShagirConversation1");
        let hero = world.hero.location(&world.physics);
        saves.save_to_slot(&world, 1).unwrap();
        assert!(saves.has_slot(1));

        let info = saves.slot_info(1);
        let lines: Vec<&str> = info.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "slot#1");
        assert_eq!(lines[1], world.region);
        assert_eq!(lines[2].len(), "2015-01-01 00:00:00".len());

        let mut loaded = test_world::world("save-round-loaded");
        saves.load_from_slot(&mut loaded, 1).unwrap();
        assert_eq!(loaded.attributes, world.attributes);
        assert!(loaded.requirements.has_requirement("MetShagir"));
        assert_eq!(
            loaded.characters.character("Shagir").unwrap().dialog_name(),
            Some("ShagirConversation1")
        );
        let placed = loaded.hero.location(&loaded.physics);
        assert!((placed.x - hero.x).abs() < 0.5);
        assert!((placed.y - hero.y).abs() < 0.5);
        assert_eq!(placed.floor, hero.floor);
    }

    #[test]
    fn foreign_files_are_rejected() {
        let saves = saves("foreign");
        fs::create_dir_all(saves.save_dir()).unwrap();
        fs::write(saves.save_dir().join("slot0.json"), "{\"hello\": 1}").unwrap();
        fs::write(
            saves.save_dir().join("slot1.json"),
            format!("{{\"magic\": \"{}\", \"version\": 99}}", MAGIC),
        )
        .unwrap();
        let mut world = test_world::world("save-foreign");
        assert!(matches!(
            saves.load_from_slot(&mut world, 0),
            Err(SaveError::InvalidHeader(_))
        ));
        assert!(matches!(
            saves.load_from_slot(&mut world, 1),
            Err(SaveError::IncompatibleVersion(99))
        ));
    }
}

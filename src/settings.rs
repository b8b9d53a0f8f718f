//! Runtime settings: `settings.toml` first, then the command line.

use crate::cfg;
use crate::engine::game::{self, WorldPaths};
use clap::Parser;
use log::info;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read the settings {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid settings {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Parser)]
#[command(name = "expt02", about = "A top-down adventure in a console window")]
pub struct Cli {
    /// Settings file
    #[arg(long, default_value = "settings.toml")]
    pub settings: PathBuf,
    /// Directory holding `data/` and `maps/`
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Directory of the save slots
    #[arg(long)]
    pub save_dir: Option<PathBuf>,
    /// Map file, relative to the data directory
    #[arg(long)]
    pub map: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub map: PathBuf,
    pub save_dir: PathBuf,
    pub fps: i32,
    pub font: Option<PathBuf>,
    pub log_level: String,
    pub fullscreen: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: PathBuf::from("assets"),
            map: PathBuf::from("maps/world.json"),
            save_dir: game::default_save_dir(),
            fps: cfg::LIMIT_FPS,
            font: None,
            log_level: String::from("info"),
            fullscreen: false,
        }
    }
}

impl Settings {
    /// A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Settings, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&text).map_err(|source| SettingsError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_cli(cli: &Cli) -> Result<Settings, SettingsError> {
        let mut settings = Settings::load(&cli.settings)?;
        settings.apply(cli);
        Ok(settings)
    }

    pub fn apply(&mut self, cli: &Cli) {
        if let Some(data_dir) = &cli.data_dir {
            self.data_dir = data_dir.clone();
        }
        if let Some(save_dir) = &cli.save_dir {
            self.save_dir = save_dir.clone();
        }
        if let Some(map) = &cli.map {
            self.map = map.clone();
        }
    }

    pub fn log_summary(&self) {
        info!(target: "general", "Data directory: '{}'", self.data_dir.display());
        info!(target: "general", "Map: '{}'", self.map.display());
        info!(target: "general", "Save directory: '{}'", self.save_dir.display());
    }

    pub fn world_paths(&self) -> WorldPaths {
        WorldPaths {
            data_dir: self.data_dir.clone(),
            map: self.map.clone(),
            save_dir: self.save_dir.clone(),
        }
    }
}

#[cfg(test)]
mod settings_tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let settings = Settings::load(Path::new("no/such/settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.fps, 60);
        assert_eq!(settings.data_dir, PathBuf::from("assets"));
        assert!(settings.save_dir.ends_with("expt02"));
    }

    #[test]
    fn partial_files_keep_the_other_defaults() {
        let settings: Settings = toml::from_str("fps = 30\nfullscreen = true\n").unwrap();
        assert_eq!(settings.fps, 30);
        assert!(settings.fullscreen);
        assert_eq!(settings.map, PathBuf::from("maps/world.json"));
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn invalid_files_are_errors() {
        let path = std::env::temp_dir().join(format!("expt02-settings-{}.toml", std::process::id()));
        fs::write(&path, "fps = \"fast\"").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Toml { .. })));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn command_line_wins() {
        let cli = Cli::parse_from(["expt02", "--settings", "none.toml", "--map", "maps/other.json"]);
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.map, PathBuf::from("maps/other.json"));
        assert_eq!(settings.data_dir, PathBuf::from("assets"));
        assert_eq!(settings.world_paths().map, settings.map);
    }
}

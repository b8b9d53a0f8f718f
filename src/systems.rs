pub mod attributes;
pub mod camera;
pub mod characters;
pub mod dialog;
pub mod driver;
pub mod hero;
pub mod input;
pub mod messages;
pub mod render;
pub mod requirements;
pub mod shrines;
pub mod sprite_map;
pub mod story;
pub mod tile_map;

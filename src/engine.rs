pub mod asset;
pub mod body;
pub mod entity;
pub mod event;
pub mod floor;
pub mod game;
pub mod grid;
pub mod mechanics;
pub mod physics;
pub mod save;
pub mod tmx;

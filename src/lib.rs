pub mod cfg;
pub mod cmtp;
pub mod engine;
pub mod settings;
pub mod systems;

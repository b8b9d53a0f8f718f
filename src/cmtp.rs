use serde::{Deserialize, Serialize};

/// A position in map pixels on a given floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub x: f32,
    pub y: f32,
    pub floor: i32,
}

impl Location {
    pub fn new(x: f32, y: f32, floor: i32) -> Self {
        Location { x, y, floor }
    }
}

/// A rectangle inside a texture, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CollisionData {
    Circle { radius: f32 },
    Rectangle { width: f32, height: f32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteData {
    pub image: String,
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemData {
    pub sprite: SpriteData,
    pub collision: CollisionData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DialogLine {
    pub speaker: String,
    pub words: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DialogData {
    pub content: Vec<DialogLine>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageData {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterData {
    pub poi: String,
    #[serde(default)]
    pub angle: f32,
    pub dialog: Option<String>,
    #[serde(default)]
    pub quest: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UseKind {
    None,
    Talk,
    Save,
}

impl Default for UseKind {
    fn default() -> Self {
        UseKind::None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogKind {
    None,
    Simple,
    Quest,
}

impl Default for DialogKind {
    fn default() -> Self {
        DialogKind::None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShrineKind {
    Moli,
    Pona,
    Sewi,
    Tomo,
}

impl ShrineKind {
    pub fn from_name(name: &str) -> Option<ShrineKind> {
        match name.to_lowercase().as_str() {
            "moli" => Some(ShrineKind::Moli),
            "pona" => Some(ShrineKind::Pona),
            "sewi" => Some(ShrineKind::Sewi),
            "tomo" => Some(ShrineKind::Tomo),
            _ => None,
        }
    }
}

//! Tiled maps, read from the JSON export format.

use crate::cmtp::Rect;
use crate::engine::asset::AssetError;
use serde::Deserialize;
use std::{fs, path::Path};

const GID_MASK: u32 = 0x1FFF_FFFF;

#[derive(Debug, Clone, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub value: serde_json::Value,
}

fn find_property<'a>(properties: &'a [Property], name: &str) -> Option<&'a Property> {
    properties.iter().find(|property| property.name == name)
}

fn property_string(properties: &[Property], name: &str, default: &str) -> String {
    match find_property(properties, name).map(|property| &property.value) {
        Some(serde_json::Value::String(value)) => value.clone(),
        Some(serde_json::Value::Null) | None => default.to_string(),
        Some(value) => value.to_string(),
    }
}

fn property_int(properties: &[Property], name: &str, default: i32) -> i32 {
    property_string(properties, name, "")
        .trim()
        .parse()
        .unwrap_or(default)
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Object {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", alias = "class", default)]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub ellipse: bool,
    #[serde(default)]
    pub point: bool,
    pub polygon: Option<Vec<Point>>,
    pub polyline: Option<Vec<Point>>,
    pub gid: Option<u32>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl Object {
    pub fn has_property(&self, name: &str) -> bool {
        find_property(&self.properties, name).is_some()
    }

    pub fn property(&self, name: &str, default: &str) -> String {
        property_string(&self.properties, name, default)
    }

    pub fn is_tile(&self) -> bool {
        self.gid.is_some()
    }

    pub fn is_ellipse(&self) -> bool {
        self.ellipse
    }

    pub fn is_point(&self) -> bool {
        self.point
    }

    pub fn is_polygon(&self) -> bool {
        self.polygon.is_some()
    }

    pub fn is_polyline(&self) -> bool {
        self.polyline.is_some()
    }

    pub fn is_chain(&self) -> bool {
        self.is_polygon() || self.is_polyline()
    }

    pub fn is_rectangle(&self) -> bool {
        !(self.is_tile() || self.ellipse || self.point || self.is_chain())
    }

    /// Chain points relative to the object position.
    pub fn points(&self) -> &[Point] {
        self.polygon
            .as_deref()
            .or_else(|| self.polyline.as_deref())
            .unwrap_or(&[])
    }

    pub fn tile_gid(&self) -> Option<u32> {
        self.gid.map(|gid| gid & GID_MASK)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TileLayer {
    #[serde(default)]
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub data: Vec<u32>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl TileLayer {
    pub fn has_property(&self, name: &str) -> bool {
        find_property(&self.properties, name).is_some()
    }

    pub fn property(&self, name: &str, default: &str) -> String {
        property_string(&self.properties, name, default)
    }

    pub fn floor(&self) -> i32 {
        property_int(&self.properties, "floor", 0)
    }

    /// Non-empty cells as (column, row, gid).
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        let width = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .map(|(i, &gid)| (i as u32, gid & GID_MASK))
            .filter(|&(_, gid)| gid != 0)
            .map(move |(i, gid)| (i % width, i / width, gid))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectLayer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub objects: Vec<Object>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl ObjectLayer {
    pub fn has_property(&self, name: &str) -> bool {
        find_property(&self.properties, name).is_some()
    }

    pub fn property(&self, name: &str, default: &str) -> String {
        property_string(&self.properties, name, default)
    }

    pub fn floor(&self) -> i32 {
        property_int(&self.properties, "floor", 0)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Layer {
    #[serde(rename = "tilelayer")]
    Tile(TileLayer),
    #[serde(rename = "objectgroup")]
    Object(ObjectLayer),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TileSet {
    pub firstgid: u32,
    #[serde(default)]
    pub name: String,
    pub columns: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub spacing: u32,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub imagewidth: u32,
    #[serde(default)]
    pub imageheight: u32,
}

impl TileSet {
    /// Rectangle of a tile in the tileset image, from its local id.
    pub fn coords(&self, local_id: u32) -> Rect {
        let columns = self.columns.max(1);
        let (column, row) = (local_id % columns, local_id / columns);
        Rect {
            left: self.margin + column * (self.tilewidth + self.spacing),
            top: self.margin + row * (self.tileheight + self.spacing),
            width: self.tilewidth,
            height: self.tileheight,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Map {
    pub width: u32,
    pub height: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub tilesets: Vec<TileSet>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// Called for every layer of a map, in file order.
pub trait LayerVisitor {
    fn visit_tile_layer(&mut self, _map: &Map, _layer: &TileLayer) {}
    fn visit_object_layer(&mut self, _map: &Map, _layer: &ObjectLayer) {}
}

impl Map {
    pub fn load(path: &Path) -> Result<Map, AssetError> {
        let text = fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Map::from_json(&text).map_err(|source| AssetError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Map, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn property(&self, name: &str, default: &str) -> String {
        property_string(&self.properties, name, default)
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width * self.tilewidth, self.height * self.tileheight)
    }

    pub fn tileset_from_gid(&self, gid: u32) -> Option<&TileSet> {
        let gid = gid & GID_MASK;
        self.tilesets
            .iter()
            .filter(|tileset| tileset.firstgid <= gid)
            .max_by_key(|tileset| tileset.firstgid)
    }

    pub fn visit_layers(&self, visitor: &mut impl LayerVisitor) {
        for layer in &self.layers {
            match layer {
                Layer::Tile(tiles) => visitor.visit_tile_layer(self, tiles),
                Layer::Object(objects) => visitor.visit_object_layer(self, objects),
                Layer::Other => (),
            }
        }
    }
}

#[cfg(test)]
mod tmx_tests {
    use super::*;

    const MAP: &str = r#"{
        "width": 4, "height": 2, "tilewidth": 32, "tileheight": 32,
        "orientation": "orthogonal",
        "tilesets": [
            { "firstgid": 1, "name": "ground", "columns": 4, "tilewidth": 32, "tileheight": 32,
              "margin": 1, "spacing": 2, "image": "ground.png", "imagewidth": 138, "imageheight": 138 },
            { "firstgid": 17, "name": "things", "columns": 2, "tilewidth": 64, "tileheight": 64,
              "image": "things.png", "imagewidth": 128, "imageheight": 128 }
        ],
        "layers": [
            { "type": "tilelayer", "name": "grass", "width": 4, "height": 2,
              "data": [1, 0, 2, 0, 0, 3, 0, 2147483652],
              "properties": [ { "name": "kind", "type": "string", "value": "ground" },
                              { "name": "floor", "type": "int", "value": 1 } ] },
            { "type": "objectgroup", "name": "zones",
              "properties": [ { "name": "kind", "type": "string", "value": "zone" } ],
              "objects": [
                { "id": 1, "name": "wall", "type": "collision", "x": 10, "y": 20, "width": 30, "height": 40 },
                { "id": 2, "name": "door", "class": "event", "x": 0, "y": 0,
                  "polygon": [ { "x": 0, "y": 0 }, { "x": 5, "y": 0 }, { "x": 5, "y": 5 } ],
                  "properties": [ { "name": "type", "type": "string", "value": "MoveInside" } ] },
                { "id": 3, "name": "Start", "type": "", "x": 1, "y": 2, "width": 3, "height": 3, "ellipse": true },
                { "id": 4, "name": "tree", "type": "", "x": 64, "y": 128, "width": 64, "height": 64, "gid": 18 }
              ] },
            { "type": "imagelayer", "name": "background", "image": "sky.png" }
        ]
    }"#;

    #[derive(Default)]
    struct Counter {
        tile_layers: Vec<String>,
        object_layers: Vec<String>,
    }

    impl LayerVisitor for Counter {
        fn visit_tile_layer(&mut self, _map: &Map, layer: &TileLayer) {
            self.tile_layers.push(layer.name.clone());
        }

        fn visit_object_layer(&mut self, _map: &Map, layer: &ObjectLayer) {
            self.object_layers.push(layer.name.clone());
        }
    }

    fn map() -> Map {
        Map::from_json(MAP).unwrap()
    }

    #[test]
    fn layers_are_visited_in_order() {
        let map = map();
        let mut counter = Counter::default();
        map.visit_layers(&mut counter);
        assert_eq!(counter.tile_layers, vec!["grass"]);
        assert_eq!(counter.object_layers, vec!["zones"]);
        assert_eq!(map.layers.len(), 3);
        assert_eq!(map.pixel_size(), (128, 64));
    }

    #[test]
    fn layer_properties() {
        let map = map();
        match &map.layers[0] {
            Layer::Tile(layer) => {
                assert_eq!(layer.property("kind", ""), "ground");
                assert_eq!(layer.floor(), 1);
                assert!(!layer.has_property("missing"));
                assert_eq!(layer.property("missing", "fallback"), "fallback");
            }
            other => panic!("unexpected layer: {:?}", other),
        }
    }

    #[test]
    fn tile_cells_strip_flip_flags() {
        let map = map();
        let layer = match &map.layers[0] {
            Layer::Tile(layer) => layer,
            other => panic!("unexpected layer: {:?}", other),
        };
        let cells: Vec<_> = layer.cells().collect();
        assert_eq!(cells, vec![(0, 0, 1), (2, 0, 2), (1, 1, 3), (3, 1, 4)]);
    }

    #[test]
    fn object_shapes() {
        let map = map();
        let layer = match &map.layers[1] {
            Layer::Object(layer) => layer,
            other => panic!("unexpected layer: {:?}", other),
        };
        let objects = &layer.objects;
        assert!(objects[0].is_rectangle());
        assert_eq!(objects[0].kind, "collision");
        assert!(objects[1].is_polygon() && objects[1].is_chain());
        assert_eq!(objects[1].kind, "event");
        assert_eq!(objects[1].property("type", ""), "MoveInside");
        assert_eq!(objects[1].points().len(), 3);
        assert!(objects[2].is_ellipse() && !objects[2].is_rectangle());
        assert!(objects[3].is_tile());
        assert_eq!(objects[3].tile_gid(), Some(18));
    }

    #[test]
    fn tilesets_and_coords() {
        let map = map();
        assert_eq!(map.tileset_from_gid(1).unwrap().name, "ground");
        assert_eq!(map.tileset_from_gid(16).unwrap().name, "ground");
        assert_eq!(map.tileset_from_gid(18).unwrap().name, "things");
        assert!(map.tileset_from_gid(0).is_none());
        let ground = map.tileset_from_gid(1).unwrap();
        assert_eq!(
            ground.coords(5),
            Rect {
                left: 35,
                top: 35,
                width: 32,
                height: 32
            }
        );
        let things = map.tileset_from_gid(18).unwrap();
        assert_eq!(things.coords(1).left, 64);
    }
}

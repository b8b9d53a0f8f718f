use crate::cmtp::Location;
use crate::engine::floor::{FloorChange, FloorTracker};
use log::warn;

pub fn compute_grid_size(map_size: u32, grid_unit: u32) -> u32 {
    (map_size + grid_unit - 1) / grid_unit
}

/// Objects bucketed by square cells, with a focus cell that follows the hero.
/// Only the focus cell and its neighbours are processed.
#[derive(Debug)]
pub struct GridMap<T> {
    grid_width: u32,
    grid_height: u32,
    grid_unit: u32,
    focus: (u32, u32),
    floor: FloorTracker,
    dirty: bool,
    content: Vec<Vec<T>>,
}

impl<T> Default for GridMap<T> {
    fn default() -> Self {
        GridMap {
            grid_width: 0,
            grid_height: 0,
            grid_unit: 1,
            focus: (0, 0),
            floor: FloorTracker::default(),
            dirty: true,
            content: Vec::new(),
        }
    }
}

impl<T> GridMap<T> {
    pub fn new(map_width: u32, map_height: u32, grid_unit: u32) -> Self {
        let grid_unit = grid_unit.max(1);
        let grid_width = compute_grid_size(map_width, grid_unit).max(1);
        let grid_height = compute_grid_size(map_height, grid_unit).max(1);
        let mut content = Vec::new();
        content.resize_with((grid_width * grid_height) as usize, Vec::new);
        GridMap {
            grid_width,
            grid_height,
            grid_unit,
            content,
            ..Default::default()
        }
    }

    pub fn grid_size(&self) -> (u32, u32) {
        (self.grid_width, self.grid_height)
    }

    fn cell_of(&self, x: f32, y: f32) -> (u32, u32) {
        let column = (x.max(0.0) as u32 / self.grid_unit).min(self.grid_width.saturating_sub(1));
        let row = (y.max(0.0) as u32 / self.grid_unit).min(self.grid_height.saturating_sub(1));
        (column, row)
    }

    pub fn add_object(&mut self, obj: T, x: f32, y: f32) {
        if self.content.is_empty() {
            warn!(target: "graphics", "Object added to an empty grid");
            return;
        }
        let max_x = (self.grid_width * self.grid_unit) as f32;
        let max_y = (self.grid_height * self.grid_unit) as f32;
        if x < 0.0 || y < 0.0 || x >= max_x || y >= max_y {
            warn!(target: "graphics", "Object outside of the grid: ({}, {})", x, y);
        }
        let (column, row) = self.cell_of(x, y);
        self.content[(row * self.grid_width + column) as usize].push(obj);
    }

    pub fn floor(&self) -> i32 {
        self.floor.floor()
    }

    pub fn focus(&self) -> (u32, u32) {
        self.focus
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn set_clean(&mut self) {
        self.dirty = false;
    }

    pub fn on_hero_location(&mut self, loc: &Location) {
        if self.floor.on_hero_location(loc.floor) {
            self.dirty = true;
        }
        let focus = self.cell_of(loc.x, loc.y);
        if focus != self.focus {
            self.focus = focus;
            self.dirty = true;
        }
    }

    pub fn on_view_change(&mut self, change: FloorChange) {
        self.floor.on_view_change(change);
        self.dirty = true;
    }

    /// Focus cell and its neighbours, clipped at the borders.
    pub fn process_objects(&self, mut func: impl FnMut(&T)) {
        if self.content.is_empty() {
            return;
        }
        let (fx, fy) = self.focus;
        let (xmin, xmax) = (fx.saturating_sub(1), (fx + 1).min(self.grid_width - 1));
        let (ymin, ymax) = (fy.saturating_sub(1), (fy + 1).min(self.grid_height - 1));
        for y in ymin..=ymax {
            let start = y * self.grid_width;
            for x in xmin..=xmax {
                for obj in &self.content[(start + x) as usize] {
                    func(obj);
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.content.iter().flatten()
    }
}

use log::warn;
use serde::{Deserialize, Serialize};

pub const LOWEST_FLOOR: i32 = -6;
pub const HIGHEST_FLOOR: i32 = 7;

const GROUND_FLOOR_OUTSIDE: u16 = 0x0100;

/// Collision bit of a floor: one bit per floor, from 0x0004 (third basement,
/// outside) to 0x8000 (third floor, inside).
pub fn bits_from_floor(floor: i32) -> u16 {
    if (LOWEST_FLOOR..=HIGHEST_FLOOR).contains(&floor) {
        1 << (floor + 8)
    } else {
        GROUND_FLOOR_OUTSIDE
    }
}

pub fn is_inside(floor: i32) -> bool {
    floor.rem_euclid(2) == 1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloorChange {
    Up,
    Down,
    Inside,
    Outside,
}

impl FloorChange {
    pub fn delta(self) -> i32 {
        match self {
            FloorChange::Up => 2,
            FloorChange::Down => -2,
            FloorChange::Inside => 1,
            FloorChange::Outside => -1,
        }
    }

    pub fn shift_bits(self, bits: u16) -> u16 {
        match self {
            FloorChange::Up => bits << 2,
            FloorChange::Down => bits >> 2,
            FloorChange::Inside => bits << 1,
            FloorChange::Outside => bits >> 1,
        }
    }

    pub fn apply(self, floor: i32) -> i32 {
        let next = floor + self.delta();
        if !(LOWEST_FLOOR..=HIGHEST_FLOOR).contains(&next) {
            warn!(target: "physics", "Floor out of range: {} ({:?} from {})", next, self, floor);
        }
        next
    }
}

/// Follows the hero's floor: the first hero location initializes it, then
/// view changes move it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FloorTracker {
    floor: i32,
    initialized: bool,
}

impl FloorTracker {
    pub fn floor(&self) -> i32 {
        self.floor
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns true when the tracker was not initialized yet.
    pub fn on_hero_location(&mut self, floor: i32) -> bool {
        if self.initialized {
            return false;
        }
        self.floor = floor;
        self.initialized = true;
        true
    }

    pub fn on_view_change(&mut self, change: FloorChange) {
        self.floor += change.delta();
    }
}

#[cfg(test)]
mod floor_tests {
    use super::*;

    #[test]
    fn bits_for_every_floor() {
        let expected = [
            (7, 0x8000),
            (6, 0x4000),
            (5, 0x2000),
            (4, 0x1000),
            (3, 0x0800),
            (2, 0x0400),
            (1, 0x0200),
            (0, 0x0100),
            (-1, 0x0080),
            (-2, 0x0040),
            (-3, 0x0020),
            (-4, 0x0010),
            (-5, 0x0008),
            (-6, 0x0004),
        ];
        for &(floor, bits) in &expected {
            assert_eq!(bits_from_floor(floor), bits, "floor {}", floor);
        }
    }

    #[test]
    fn unknown_floors_are_ground_outside() {
        assert_eq!(bits_from_floor(8), 0x0100);
        assert_eq!(bits_from_floor(-7), 0x0100);
        assert_eq!(bits_from_floor(100), 0x0100);
    }

    #[test]
    fn shifting_bits_matches_floor_change() {
        let changes = [
            FloorChange::Up,
            FloorChange::Down,
            FloorChange::Inside,
            FloorChange::Outside,
        ];
        for floor in -4..=5 {
            for &change in &changes {
                assert_eq!(
                    change.shift_bits(bits_from_floor(floor)),
                    bits_from_floor(change.apply(floor)),
                    "{:?} from floor {}",
                    change,
                    floor
                );
            }
        }
    }

    #[test]
    fn inside_floors_are_odd() {
        assert!(is_inside(1));
        assert!(is_inside(-1));
        assert!(!is_inside(0));
        assert!(!is_inside(-6));
    }

    #[test]
    fn tracker_is_initialized_once() {
        let mut tracker = FloorTracker::default();
        assert_eq!(tracker.floor(), 0);
        assert!(tracker.on_hero_location(2));
        assert!(!tracker.on_hero_location(4));
        assert_eq!(tracker.floor(), 2);
        tracker.on_view_change(FloorChange::Inside);
        assert_eq!(tracker.floor(), 3);
        tracker.on_view_change(FloorChange::Down);
        assert_eq!(tracker.floor(), 1);
    }
}

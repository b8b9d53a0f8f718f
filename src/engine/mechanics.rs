use crate::cmtp::Location;

pub fn square_distance(a: &Location, b: &Location) -> f32 {
    let (dx, dy) = (a.x - b.x, a.y - b.y);
    dx * dx + dy * dy
}

/// Same floor and strictly closer than `distance`.
pub fn is_near(a: &Location, b: &Location, distance: f32) -> bool {
    a.floor == b.floor && square_distance(a, b) < distance * distance
}

/// Rotates (x, y) by `angle` radians.
pub fn rotate((x, y): (f32, f32), angle: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

#[cfg(test)]
mod mechanics_tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn distances() {
        let a = Location::new(0.0, 0.0, 0);
        let b = Location::new(3.0, 4.0, 0);
        assert_eq!(square_distance(&a, &b), 25.0);
        assert!(is_near(&a, &b, 5.1));
        assert!(!is_near(&a, &b, 5.0));
        assert!(!is_near(&a, &Location::new(3.0, 4.0, 1), 100.0));
    }

    #[test]
    fn rotation_is_counter_clockwise_in_math_axes() {
        let (x, y) = rotate((0.0, 1.0), FRAC_PI_2);
        assert!((x + 1.0).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn clamping() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }
}

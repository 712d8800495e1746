use std::hash::{Hash, Hasher};

/// Geometric primitive representing a point
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct Point(pub f64, pub f64);

impl Point {
    pub fn distance_to(&self, other: &Point) -> f64 {
        self.sq_distance_to(other).sqrt()
    }

    pub fn sq_distance_to(&self, other: &Point) -> f64 {
        (self.0 - other.0).powi(2) + (self.1 - other.1).powi(2)
    }

    /// Squared distance to the origin, the ordering key used throughout the placement search.
    pub fn sq_distance_to_origin(&self) -> f64 {
        self.0 * self.0 + self.1 * self.1
    }

    pub fn translated(self, (dx, dy): (f64, f64)) -> Point {
        Point(self.0 + dx, self.1 + dy)
    }

    /// Rotates the point counter-clockwise around a pivot by an angle in radians.
    pub fn rotated_around(self, pivot: Point, angle_rad: f64) -> Point {
        let (sin, cos) = angle_rad.sin_cos();
        let (dx, dy) = (self.0 - pivot.0, self.1 - pivot.1);
        Point(
            pivot.0 + dx * cos - dy * sin,
            pivot.1 + dx * sin + dy * cos,
        )
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
        self.1.to_bits().hash(state);
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.0, p.1)
    }
}

impl From<(f64, f64)> for Point {
    fn from(p: (f64, f64)) -> Self {
        Point(p.0, p.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn rotation_around_pivot() {
        let p = Point(2.0, 1.0).rotated_around(Point(1.0, 1.0), std::f64::consts::FRAC_PI_2);
        assert!(approx_eq!(f64, p.0, 1.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, p.1, 2.0, epsilon = 1e-12));
    }

    #[test]
    fn full_turn_is_identity() {
        let p = Point(3.5, -2.0).rotated_around(Point(0.0, 0.0), std::f64::consts::TAU);
        assert!(approx_eq!(f64, p.0, 3.5, epsilon = 1e-9));
        assert!(approx_eq!(f64, p.1, -2.0, epsilon = 1e-9));
    }
}

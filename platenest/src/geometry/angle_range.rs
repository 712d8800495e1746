/// A directed arc on the 0-360° circle, from `start` counter-clockwise to `end`.
///
/// Used to describe the cone of directions along which a corner may slide
/// against an edge without piercing it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleRange {
    start: f64,
    end: f64,
}

const ANGLE_EPS: f64 = 1e-9;

impl AngleRange {
    /// Both bounds are normalized to `[0, 360)`.
    pub fn new(start: f64, end: f64) -> Self {
        AngleRange {
            start: start.rem_euclid(360.0),
            end: end.rem_euclid(360.0),
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Length of the arc going counter-clockwise from `start` to `end`.
    pub fn range(&self) -> f64 {
        (self.end - self.start).rem_euclid(360.0)
    }

    /// Circular membership test, inclusive of both bounds.
    ///
    /// Unconditionally false when the arc spans 180° or more: only convex-like
    /// contact cones are considered valid. This narrows away sliding contacts
    /// at reflex corners; kept as-is since the rest of the search compensates
    /// with its difference-based verification.
    pub fn between(&self, angle: f64) -> bool {
        if self.range() >= 180.0 {
            return false;
        }
        let a = angle.rem_euclid(360.0);
        if self.start <= self.end {
            a >= self.start - ANGLE_EPS && a <= self.end + ANGLE_EPS
        } else {
            //wrap-around arc
            a >= self.start - ANGLE_EPS || a <= self.end + ANGLE_EPS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0, 90.0, 90.0; "quarter")]
    #[test_case(350.0, 10.0, 20.0; "wrapping")]
    #[test_case(90.0, 90.0, 0.0; "empty")]
    #[test_case(180.0, 90.0, 270.0; "reflex")]
    fn range_length(start: f64, end: f64, expected: f64) {
        assert_eq!(AngleRange::new(start, end).range(), expected);
    }

    #[test_case(10.0, 100.0; "plain")]
    #[test_case(300.0, 60.0; "wrapping")]
    fn bounds_are_inclusive_below_half_turn(start: f64, end: f64) {
        let range = AngleRange::new(start, end);
        assert!(range.between(start));
        assert!(range.between(end));
    }

    #[test]
    fn wrap_around_membership() {
        let range = AngleRange::new(300.0, 60.0);
        assert!(range.between(350.0));
        assert!(range.between(30.0));
        assert!(!range.between(180.0));
    }

    #[test_case(0.0, 180.0; "exactly half")]
    #[test_case(90.0, 350.0; "reflex")]
    fn half_turn_or_more_rejects_everything(start: f64, end: f64) {
        let range = AngleRange::new(start, end);
        assert!(!range.between(start));
        assert!(!range.between(end));
        assert!(!range.between(start + 1.0));
    }

    #[test]
    fn normalization() {
        let range = AngleRange::new(-30.0, 390.0);
        assert_eq!(range.start(), 330.0);
        assert_eq!(range.end(), 30.0);
        assert!(range.between(0.0));
    }
}

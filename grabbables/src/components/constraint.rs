use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An inclusive range along a single axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

impl AxisRange {
    /// Create a new range. The bounds are swapped if given in the wrong order.
    pub fn new(min: f32, max: f32) -> Self {
        if max < min {
            AxisRange { min: max, max: min }
        } else {
            AxisRange { min, max }
        }
    }

    /// Clamp `value` into the range. Bounds that arrived inverted are put back in order, and a NaN
    /// bound leaves that side open.
    pub fn clamp(&self, value: f32) -> f32 {
        let (low, high) = if self.max < self.min {
            (self.max, self.min)
        } else {
            (self.min, self.max)
        };
        value.max(low).min(high)
    }
}

/// Limits the host applies to a grabbable's position while it is being held.
/// Translations are expressed in the grabbable's parent space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GrabConstraint {
    /// Allowed range along X, or unconstrained
    pub x: Option<AxisRange>,
    /// Allowed range along Y, or unconstrained
    pub y: Option<AxisRange>,
    /// Allowed range along Z, or unconstrained
    pub z: Option<AxisRange>,
    /// Keep the grabbable's up axis aligned with gravity
    pub gravity_aligned: bool,
}

impl GrabConstraint {
    /// Clamp a translation into the allowed ranges
    pub fn apply(&self, translation: Vec3) -> Vec3 {
        let clamp = |range: &Option<AxisRange>, value: f32| match range {
            Some(range) => range.clamp(value),
            None => value,
        };

        Vec3::new(
            clamp(&self.x, translation.x),
            clamp(&self.y, translation.y),
            clamp(&self.z, translation.z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_apply_constraint() {
        let constraint = GrabConstraint {
            x: Some(AxisRange::new(-1.0, 1.0)),
            y: Some(AxisRange::new(2.0, 0.5)),
            z: None,
            gravity_aligned: false,
        };

        let clamped = constraint.apply(Vec3::new(4.0, 0.0, -30.0));
        assert_relative_eq!(clamped, Vec3::new(1.0, 0.5, -30.0));

        let untouched = constraint.apply(Vec3::new(0.25, 1.0, 7.0));
        assert_relative_eq!(untouched, Vec3::new(0.25, 1.0, 7.0));
    }

    #[test]
    fn test_inverted_range_from_the_wire() {
        let constraint: GrabConstraint = serde_json::from_str(
            r#"{"x":{"min":2.0,"max":0.5},"y":null,"z":null,"gravity_aligned":false}"#,
        )
        .unwrap();

        let clamped = constraint.apply(Vec3::ZERO);
        assert_relative_eq!(clamped, Vec3::new(0.5, 0.0, 0.0));
        let clamped = constraint.apply(Vec3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(clamped, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_nan_bound_is_open() {
        let range = AxisRange::new(f32::NAN, 1.0);
        assert_eq!(range.clamp(5.0), 1.0);
        assert_eq!(range.clamp(-5.0), -5.0);

        let range = AxisRange {
            min: -1.0,
            max: f32::NAN,
        };
        assert_eq!(range.clamp(5.0), 5.0);
        assert_eq!(range.clamp(-5.0), -1.0);

        let constraint = GrabConstraint {
            y: Some(AxisRange::new(f32::NAN, f32::NAN)),
            ..Default::default()
        };
        assert_relative_eq!(constraint.apply(Vec3::Y), Vec3::Y);
    }
}

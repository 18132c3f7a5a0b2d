//! Height shaping curve
//!
//! Piecewise-linear mapping from normalised noise height to mesh height
//! factor. Typically flattens low ground (water) and exaggerates peaks.

use serde::{Deserialize, Serialize};

/// One control point of the curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Keyframed curve, keys kept sorted by `time`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct HeightCurve {
    keys: Vec<CurveKey>,
}

impl HeightCurve {
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Identity mapping on [0,1]
    pub fn linear() -> Self {
        Self::new(vec![CurveKey::new(0.0, 0.0), CurveKey::new(1.0, 1.0)])
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Evaluate the curve. Inputs outside the key range take the nearest end
    /// value. A curve without keys passes input through unchanged.
    pub fn evaluate(&self, time: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return time,
        };

        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // First key strictly after `time`; bounded by the checks above
        let upper = self.keys.partition_point(|key| key.time <= time);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];
        let span = b.time - a.time;
        if span <= 0.0 {
            return b.value;
        }
        let t = (time - a.time) / span;
        a.value + (b.value - a.value) * t
    }
}

impl Default for HeightCurve {
    fn default() -> Self {
        Self::linear()
    }
}

impl From<Vec<CurveKey>> for HeightCurve {
    fn from(keys: Vec<CurveKey>) -> Self {
        Self::new(keys)
    }
}

impl From<HeightCurve> for Vec<CurveKey> {
    fn from(curve: HeightCurve) -> Self {
        curve.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_is_identity_inside_range() {
        let curve = HeightCurve::linear();
        for t in [0.0, 0.25, 0.5, 0.9, 1.0] {
            assert!((curve.evaluate(t) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_clamps_outside_key_range() {
        let curve = HeightCurve::linear();
        assert_eq!(curve.evaluate(-1.0), 0.0);
        assert_eq!(curve.evaluate(3.0), 1.0);
    }

    #[test]
    fn test_flat_water_section() {
        let curve = HeightCurve::new(vec![
            CurveKey::new(1.0, 1.0),
            CurveKey::new(0.0, 0.0),
            CurveKey::new(0.4, 0.0),
        ]);
        assert_eq!(curve.keys()[1].time, 0.4);
        assert_eq!(curve.evaluate(0.2), 0.0);
        assert!((curve.evaluate(0.7) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_empty_curve_passes_through() {
        let curve = HeightCurve::new(Vec::new());
        assert_eq!(curve.evaluate(0.3), 0.3);
    }

    #[test]
    fn test_deserializes_from_key_list() {
        #[derive(Deserialize)]
        struct Wrapper {
            curve: HeightCurve,
        }
        let parsed: Wrapper = toml::from_str(
            "curve = [{ time = 0.0, value = 0.0 }, { time = 1.0, value = 2.0 }]",
        )
        .unwrap();
        assert_eq!(parsed.curve.evaluate(0.5), 1.0);
    }
}

// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;

/// Easing curves for time-based animations.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// A CSS-style cubic bezier with control points `[x1, y1, x2, y2]`.
    CubicBezier([f64; 4]),
}

impl Easing {
    fn control_points(&self) -> [f64; 4] {
        match self {
            Easing::Linear => [0.0, 0.0, 1.0, 1.0],
            Easing::EaseIn => [0.42, 0.0, 1.0, 1.0],
            Easing::EaseOut => [0.0, 0.0, 0.58, 1.0],
            Easing::EaseInOut => [0.42, 0.0, 0.58, 1.0],
            Easing::CubicBezier(points) => *points,
        }
    }

    /// The x coordinates must stay in [0, 1] for the curve to be a function
    /// of time.
    pub fn validate(&self) -> Fallible<()> {
        let [x1, y1, x2, y2] = self.control_points();
        if [x1, y1, x2, y2].iter().any(|v| !v.is_finite()) {
            return fail("easing control points must be finite");
        }
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return fail(format!(
                "easing x control points must be within [0, 1], got {x1} and {x2}"
            ));
        }
        Ok(())
    }

    /// Maps linear progress in [0, 1] to eased progress.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if matches!(self, Easing::Linear) {
            return t;
        }
        let [x1, y1, x2, y2] = self.control_points();
        // Invert x(s) = t by bisection; x is monotonic for x1, x2 in [0, 1].
        let mut lo = 0.0;
        let mut hi = 1.0;
        let mut s = t;
        for _ in 0..32 {
            let x = cubic_bezier(x1, x2, s);
            if (x - t).abs() < 1e-7 {
                break;
            }
            if x < t {
                lo = s;
            } else {
                hi = s;
            }
            s = 0.5 * (lo + hi);
        }
        cubic_bezier(y1, y2, s)
    }
}

/// One coordinate of a cubic bezier anchored at 0 and 1.
fn cubic_bezier(p1: f64, p2: f64, s: f64) -> f64 {
    let u = 1.0 - s;
    3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::CubicBezier([0.25, 0.1, 0.25, 1.0]),
        ] {
            assert!(approx_eq(easing.apply(0.0), 0.0));
            assert!(approx_eq(easing.apply(1.0), 1.0));
        }
    }

    #[test]
    fn test_linear() {
        assert_eq!(Easing::Linear.apply(0.3), 0.3);
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
    }

    #[test]
    fn test_shapes() {
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!(approx_eq(Easing::EaseInOut.apply(0.5), 0.5));
    }

    #[test]
    fn test_linear_bezier_matches_linear() {
        let easing = Easing::CubicBezier([0.0, 0.0, 1.0, 1.0]);
        assert!(approx_eq(easing.apply(0.37), 0.37));
    }

    #[test]
    fn test_validate() {
        assert!(Easing::EaseInOut.validate().is_ok());
        assert!(Easing::CubicBezier([1.5, 0.0, 0.5, 1.0]).validate().is_err());
        assert!(Easing::CubicBezier([0.5, f64::NAN, 0.5, 1.0]).validate().is_err());
    }

    #[test]
    fn test_deserialize() -> Fallible<()> {
        let easing: Easing = serde_json::from_str("\"ease-out\"")?;
        assert_eq!(easing, Easing::EaseOut);
        let easing: Easing = serde_json::from_str("{\"cubic-bezier\": [0.1, 0.2, 0.3, 0.4]}")?;
        assert_eq!(easing, Easing::CubicBezier([0.1, 0.2, 0.3, 0.4]));
        Ok(())
    }
}

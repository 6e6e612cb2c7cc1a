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

//! Piecewise-linear interpolation between breakpoints.

use crate::error::Fallible;
use crate::error::fail;

/// Maps an input value onto an output range through a sequence of
/// breakpoints. Values outside the input range are clamped to the first or
/// last output.
#[derive(Clone, Debug, PartialEq)]
pub struct Interpolation {
    input: Vec<f64>,
    output: Vec<f64>,
}

impl Interpolation {
    pub fn new(input: Vec<f64>, output: Vec<f64>) -> Fallible<Self> {
        if input.len() < 2 {
            return fail("interpolation needs at least two breakpoints");
        }
        if input.len() != output.len() {
            return fail(format!(
                "interpolation has {} inputs but {} outputs",
                input.len(),
                output.len()
            ));
        }
        if input.iter().chain(output.iter()).any(|v| !v.is_finite()) {
            return fail("interpolation breakpoints must be finite");
        }
        if input.windows(2).any(|w| w[0] >= w[1]) {
            return fail("interpolation input must be strictly increasing");
        }
        Ok(Self { input, output })
    }

    pub fn eval(&self, value: f64) -> f64 {
        let last = self.input.len() - 1;
        if value <= self.input[0] {
            return self.output[0];
        }
        if value >= self.input[last] {
            return self.output[last];
        }
        // Find the segment containing the value.
        let segment = self
            .input
            .windows(2)
            .position(|w| value < w[1])
            .unwrap_or(last - 1);
        let (x0, x1) = (self.input[segment], self.input[segment + 1]);
        let (y0, y1) = (self.output[segment], self.output[segment + 1]);
        let t = (value - x0) / (x1 - x0);
        y0 + (y1 - y0) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn rotation() -> Interpolation {
        Interpolation::new(vec![-800.0, 0.0, 800.0], vec![-120.0, 0.0, 120.0]).unwrap()
    }

    #[test]
    fn test_breakpoints() {
        let i = rotation();
        assert!(approx_eq(i.eval(-800.0), -120.0));
        assert!(approx_eq(i.eval(0.0), 0.0));
        assert!(approx_eq(i.eval(800.0), 120.0));
    }

    #[test]
    fn test_between_breakpoints() {
        let i = rotation();
        assert!(approx_eq(i.eval(400.0), 60.0));
        assert!(approx_eq(i.eval(-200.0), -30.0));
    }

    #[test]
    fn test_clamped() {
        let i = rotation();
        assert!(approx_eq(i.eval(5000.0), 120.0));
        assert!(approx_eq(i.eval(-5000.0), -120.0));
    }

    #[test]
    fn test_uneven_segments() -> Fallible<()> {
        let i = Interpolation::new(vec![0.0, 1.0, 3.0], vec![0.0, 10.0, 0.0])?;
        assert!(approx_eq(i.eval(0.5), 5.0));
        assert!(approx_eq(i.eval(2.0), 5.0));
        Ok(())
    }

    #[test]
    fn test_invalid() {
        assert!(Interpolation::new(vec![0.0], vec![0.0]).is_err());
        assert!(Interpolation::new(vec![0.0, 1.0], vec![0.0]).is_err());
        assert!(Interpolation::new(vec![1.0, 1.0], vec![0.0, 1.0]).is_err());
        assert!(Interpolation::new(vec![0.0, f64::INFINITY], vec![0.0, 1.0]).is_err());
    }
}

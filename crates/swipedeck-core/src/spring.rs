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

//! Damped spring simulation used for the snap-back animation.

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::geometry::Vec2;

/// Integration step in milliseconds.
const STEP_MS: f64 = 1.0;

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// The spring is at rest once its speed (px/s) drops below this...
    pub rest_speed: f64,
    /// ...and it is this close (px) to the target.
    pub rest_displacement: f64,
    /// Simulated time after which the spring is forced onto its target.
    pub max_duration_ms: f64,
}

impl SpringConfig {
    /// Builds a config from Origami-style tension and friction, the
    /// parameterisation most mobile animation libraries expose.
    pub fn from_tension_friction(tension: f64, friction: f64) -> Self {
        Self {
            stiffness: (tension - 30.0) * 3.62 + 194.0,
            damping: (friction - 8.0) * 3.0 + 25.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Fallible<()> {
        let fields = [
            ("stiffness", self.stiffness),
            ("damping", self.damping),
            ("mass", self.mass),
            ("rest_speed", self.rest_speed),
            ("rest_displacement", self.rest_displacement),
            ("max_duration_ms", self.max_duration_ms),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return fail(format!("spring {name} must be a non-negative number"));
            }
        }
        if self.stiffness == 0.0 || self.mass == 0.0 {
            return fail("spring stiffness and mass must be positive");
        }
        Ok(())
    }
}

impl Default for SpringConfig {
    /// Equivalent to tension 40, friction 7.
    fn default() -> Self {
        Self {
            stiffness: 230.2,
            damping: 22.0,
            mass: 1.0,
            rest_speed: 0.001,
            rest_displacement: 0.001,
            max_duration_ms: 2000.0,
        }
    }
}

/// The live state of a spring pulling a 2D value towards a target.
#[derive(Clone, Copy, Debug)]
pub struct SpringState {
    pub position: Vec2,
    pub velocity: Vec2,
    target: Vec2,
    config: SpringConfig,
    elapsed_ms: f64,
    /// Time not yet consumed by a whole integration step.
    carry_ms: f64,
}

impl SpringState {
    pub fn new(from: Vec2, target: Vec2, config: SpringConfig) -> Self {
        Self {
            position: from,
            velocity: Vec2::ZERO,
            target,
            config,
            elapsed_ms: 0.0,
            carry_ms: 0.0,
        }
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Advances the simulation by `dt_ms` and returns whether the spring has
    /// come to rest. A spring at rest sits exactly on its target.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        self.carry_ms += dt_ms.max(0.0);
        while self.carry_ms >= STEP_MS {
            self.carry_ms -= STEP_MS;
            self.elapsed_ms += STEP_MS;
            self.step(STEP_MS / 1000.0);
            if self.is_at_rest() || self.elapsed_ms >= self.config.max_duration_ms {
                self.position = self.target;
                self.velocity = Vec2::ZERO;
                return true;
            }
        }
        false
    }

    fn step(&mut self, dt: f64) {
        let SpringConfig {
            stiffness,
            damping,
            mass,
            ..
        } = self.config;
        // Semi-implicit Euler: update velocity first, then position.
        let displacement = self.position - self.target;
        let force = displacement * -stiffness - self.velocity * damping;
        self.velocity = self.velocity + force * (dt / mass);
        self.position = self.position + self.velocity * dt;
    }

    fn is_at_rest(&self) -> bool {
        let displacement = self.position - self.target;
        let speed = self.velocity.x.hypot(self.velocity.y);
        let distance = displacement.x.hypot(displacement.y);
        speed <= self.config.rest_speed && distance <= self.config.rest_displacement
    }
}

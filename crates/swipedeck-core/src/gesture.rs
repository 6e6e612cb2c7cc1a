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

use crate::geometry::Vec2;

/// Tracks a single pointer gesture and reports its cumulative displacement
/// from the point where it started.
#[derive(Clone, Copy, Debug, Default)]
pub struct PanTracker {
    origin: Option<Vec2>,
    last: Vec2,
}

impl PanTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    /// Starts tracking at `point`. Returns `false` if a gesture is already
    /// being tracked.
    pub fn begin(&mut self, point: Vec2) -> bool {
        if self.origin.is_some() {
            return false;
        }
        self.origin = Some(point);
        self.last = point;
        true
    }

    /// The displacement of `point` from the gesture origin.
    pub fn update(&mut self, point: Vec2) -> Option<Vec2> {
        let origin = self.origin?;
        self.last = point;
        Some(point - origin)
    }

    /// Ends the gesture at `point` and returns its final displacement.
    pub fn end(&mut self, point: Vec2) -> Option<Vec2> {
        let delta = self.update(point);
        self.origin = None;
        delta
    }

    /// Ends the gesture at the last reported point.
    pub fn cancel(&mut self) -> Option<Vec2> {
        let last = self.last;
        self.end(last)
    }
}

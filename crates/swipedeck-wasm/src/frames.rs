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

/// Keeps at most one animation frame request in flight.
#[derive(Debug, Default)]
pub struct FrameLoop {
    requested: bool,
}

impl FrameLoop {
    /// Whether the caller should request a frame now. Once this returns
    /// `true` the request counts as pending until it is delivered or fails.
    pub fn claim(&mut self, animating: bool) -> bool {
        if !animating || self.requested {
            return false;
        }
        self.requested = true;
        true
    }

    /// The requested frame has arrived.
    pub fn delivered(&mut self) {
        self.requested = false;
    }

    /// The frame could not be requested, so none will arrive.
    pub fn failed(&mut self) {
        self.requested = false;
    }

    pub fn is_pending(&self) -> bool {
        self.requested
    }
}

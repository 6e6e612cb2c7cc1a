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

//! swipedeck-core: a stacked, swipeable card deck, independent of any
//! rendering surface.
//!
//! This library provides:
//! - The deck state machine (drag, snap-back, swipe-out)
//! - Pointer gesture tracking
//! - Spring and timed animation drivers
//! - Card layout (rotation and cascade)

pub mod animation;
pub mod config;
pub mod deck;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod interpolate;
pub mod spring;
pub mod view;

// Re-exports for convenience
pub use animation::{AnimationDriver, FrameDriver, ImmediateDriver};
pub use config::DeckConfig;
pub use deck::{Deck, DeckBuilder, Direction, Keyed, Phase, Release};
pub use error::{ErrorReport, Fallible, fail};
pub use geometry::{Transform, Vec2, Viewport};
pub use view::{CardLayer, DeckView};

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

//! What the deck asks the host to draw.

use crate::config::DeckConfig;
use crate::error::Fallible;
use crate::geometry::Transform;
use crate::geometry::Vec2;
use crate::geometry::Viewport;
use crate::interpolate::Interpolation;

/// A single card in the rendered stack.
#[derive(Clone, Debug, PartialEq)]
pub struct CardLayer<K, C> {
    pub key: K,
    /// Position of the item in the input sequence.
    pub index: usize,
    pub transform: Transform,
    /// Only the top card receives gestures.
    pub is_top: bool,
    pub content: C,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeckView<K, C> {
    /// Cards ordered back to front: the top card is last, so hosts that
    /// paint later siblings over earlier ones can emit them in order.
    Cards(Vec<CardLayer<K, C>>),
    /// The deck is exhausted. Holds the empty-state content, if the caller
    /// supplied a renderer for it.
    Empty(Option<C>),
}

impl<K, C> DeckView<K, C> {
    pub fn layers(&self) -> &[CardLayer<K, C>] {
        match self {
            DeckView::Cards(layers) => layers,
            DeckView::Empty(_) => &[],
        }
    }

    pub fn top(&self) -> Option<&CardLayer<K, C>> {
        self.layers().last()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DeckView::Empty(_))
    }
}

/// Computes card transforms.
#[derive(Clone, Debug)]
pub struct Layout {
    rotation: Interpolation,
    cascade_step: Vec2,
}

impl Layout {
    pub fn new(config: &DeckConfig, viewport: Viewport) -> Fallible<Self> {
        let span = config.rotation_span * viewport.width;
        let degrees = config.rotation_degrees;
        let rotation = Interpolation::new(vec![-span, 0.0, span], vec![-degrees, 0.0, degrees])?;
        Ok(Self {
            rotation,
            cascade_step: config.cascade_step,
        })
    }

    /// The top card follows the drag offset and tilts with it.
    pub fn top(&self, offset: Vec2) -> Transform {
        Transform {
            translate: offset,
            rotate: self.rotation.eval(offset.x),
        }
    }

    /// Cards below the top sit at a fixed step per rank.
    pub fn cascade(&self, rank: usize) -> Transform {
        Transform::translation(self.cascade_step * rank as f64)
    }
}

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

//! The card deck state machine.
//!
//! A gesture moves the deck through `Idle -> Dragging -> SnappingBack |
//! SwipingOut -> Idle`. Only the top card accepts gestures, and only one
//! gesture is tracked at a time: pointer-downs are ignored until the deck is
//! idle again.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::rc::Rc;

use serde::Deserialize;
use serde::Serialize;

use crate::animation::Animation;
use crate::animation::AnimationDriver;
use crate::animation::Curve;
use crate::animation::Progress;
use crate::config::DeckConfig;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::geometry::Transform;
use crate::geometry::Vec2;
use crate::geometry::Viewport;
use crate::gesture::PanTracker;
use crate::view::CardLayer;
use crate::view::DeckView;
use crate::view::Layout;

/// Items in a deck must have a stable identity key. Keys that change between
/// renders, or repeat within a deck, make re-render identity undefined.
pub trait Keyed {
    type Key: Clone + PartialEq + Debug;

    fn key(&self) -> Self::Key;
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Direction {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(ErrorReport::new(format!("invalid direction: '{value}'"))),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Dragging,
    SnappingBack,
    SwipingOut(Direction),
}

impl Phase {
    pub fn is_animating(&self) -> bool {
        matches!(self, Phase::SnappingBack | Phase::SwipingOut(_))
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Dragging => write!(f, "dragging"),
            Phase::SnappingBack => write!(f, "snapping-back"),
            Phase::SwipingOut(direction) => write!(f, "swiping-out-{direction}"),
        }
    }
}

/// What the deck decided to do when a drag ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Release {
    SnapBack,
    Swipe(Direction),
}

type RenderCard<T, C> = Box<dyn Fn(&T) -> C>;
type RenderEmpty<C> = Box<dyn Fn() -> C>;
type SwipeHandler<T> = Box<dyn FnMut(&T)>;

pub struct DeckBuilder<T, C> {
    items: Rc<[T]>,
    render_card: RenderCard<T, C>,
    render_empty: Option<RenderEmpty<C>>,
    on_swipe_left: SwipeHandler<T>,
    on_swipe_right: SwipeHandler<T>,
    config: DeckConfig,
}

impl<T: Keyed, C> DeckBuilder<T, C> {
    pub fn new(items: impl Into<Rc<[T]>>, render_card: impl Fn(&T) -> C + 'static) -> Self {
        Self {
            items: items.into(),
            render_card: Box::new(render_card),
            render_empty: None,
            on_swipe_left: Box::new(|_| {}),
            on_swipe_right: Box::new(|_| {}),
            config: DeckConfig::default(),
        }
    }

    pub fn render_empty(mut self, f: impl Fn() -> C + 'static) -> Self {
        self.render_empty = Some(Box::new(f));
        self
    }

    pub fn on_swipe_left(mut self, f: impl FnMut(&T) + 'static) -> Self {
        self.on_swipe_left = Box::new(f);
        self
    }

    pub fn on_swipe_right(mut self, f: impl FnMut(&T) + 'static) -> Self {
        self.on_swipe_right = Box::new(f);
        self
    }

    pub fn config(mut self, config: DeckConfig) -> Self {
        self.config = config;
        self
    }

    /// Mounts the deck. The viewport is read once here and never again.
    pub fn build<D: AnimationDriver>(self, viewport: Viewport, driver: D) -> Fallible<Deck<T, C, D>> {
        self.config.validate()?;
        let layout = Layout::new(&self.config, viewport)?;
        log::debug!(
            "Mounting deck with {} items in a {}x{} viewport",
            self.items.len(),
            viewport.width,
            viewport.height
        );
        Ok(Deck {
            items: self.items,
            index: 0,
            offset: Vec2::ZERO,
            phase: Phase::Idle,
            tracker: PanTracker::new(),
            driver,
            viewport,
            config: self.config,
            layout,
            render_card: self.render_card,
            render_empty: self.render_empty,
            on_swipe_left: self.on_swipe_left,
            on_swipe_right: self.on_swipe_right,
        })
    }
}

pub struct Deck<T: Keyed, C, D: AnimationDriver> {
    items: Rc<[T]>,
    /// Index of the top card. Equal to `items.len()` once exhausted.
    index: usize,
    /// Live displacement of the top card from its rest position.
    offset: Vec2,
    phase: Phase,
    tracker: PanTracker,
    driver: D,
    viewport: Viewport,
    config: DeckConfig,
    layout: Layout,
    render_card: RenderCard<T, C>,
    render_empty: Option<RenderEmpty<C>>,
    on_swipe_left: SwipeHandler<T>,
    on_swipe_right: SwipeHandler<T>,
}

impl<T: Keyed, C, D: AnimationDriver> Deck<T, C, D> {
    pub fn items(&self) -> &Rc<[T]> {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.index
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.items.len()
    }

    /// The item on top of the deck.
    pub fn current(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase.is_animating()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Horizontal distance past which a released card is swiped.
    pub fn threshold(&self) -> f64 {
        self.config.swipe_threshold * self.viewport.width
    }

    pub fn transform_for_top(&self) -> Transform {
        self.layout.top(self.offset)
    }

    /// Starts a drag on the top card. Returns `false` if the deck is
    /// exhausted or busy with another gesture or animation.
    pub fn pointer_down(&mut self, point: Vec2) -> bool {
        if self.is_exhausted() {
            log::debug!("Ignoring pointer down: deck is exhausted");
            return false;
        }
        if self.phase != Phase::Idle {
            log::debug!("Ignoring pointer down while {}", self.phase);
            return false;
        }
        if !self.tracker.begin(point) {
            return false;
        }
        self.set_phase(Phase::Dragging);
        true
    }

    /// Moves the dragged card to the cumulative displacement of `point`.
    pub fn pointer_move(&mut self, point: Vec2) -> bool {
        if self.phase != Phase::Dragging {
            return false;
        }
        match self.tracker.update(point) {
            Some(delta) => {
                self.offset = delta;
                true
            }
            None => false,
        }
    }

    /// Ends the drag at `point` and either swipes the card out or returns it
    /// to rest. Returns `None` if no drag was in progress.
    pub fn pointer_up(&mut self, point: Vec2) -> Option<Release> {
        if self.phase != Phase::Dragging {
            return None;
        }
        let delta = self.tracker.end(point)?;
        self.offset = delta;
        Some(self.release())
    }

    /// The host cancelled the gesture (e.g. the pointer left the surface).
    /// Treated as a release at the last known offset.
    pub fn pointer_cancel(&mut self) -> Option<Release> {
        if self.phase != Phase::Dragging {
            return None;
        }
        let delta = self.tracker.cancel()?;
        self.offset = delta;
        Some(self.release())
    }

    /// Swipes the top card out without a gesture.
    pub fn force_swipe(&mut self, direction: Direction) -> bool {
        if self.is_exhausted() || self.phase != Phase::Idle {
            log::debug!("Ignoring {direction} swipe while {}", self.phase);
            return false;
        }
        self.swipe_out(direction);
        true
    }

    /// Advances the running animation to `now_ms`. Returns whether the deck
    /// still needs frames.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if self.phase.is_animating() {
            if let Some(progress) = self.driver.frame(now_ms) {
                self.apply(progress);
            }
        }
        self.is_animating()
    }

    /// Replaces the item sequence. A different sequence (by identity, not
    /// contents) puts the first item back on top.
    pub fn set_items(&mut self, items: Rc<[T]>) {
        if Rc::ptr_eq(&self.items, &items) {
            return;
        }
        log::debug!(
            "Replacing {} items with {}; resetting to the first card",
            self.items.len(),
            items.len()
        );
        self.items = items;
        self.index = 0;
        match self.phase {
            // The card being swiped belonged to the old sequence.
            Phase::SwipingOut(_) => {
                self.driver.stop();
                self.offset = Vec2::ZERO;
                self.set_phase(Phase::Idle);
            }
            Phase::Idle => self.offset = Vec2::ZERO,
            Phase::Dragging | Phase::SnappingBack => {}
        }
    }

    /// Renders the stack back to front, or the empty state once every card
    /// has been swiped.
    pub fn render(&self) -> DeckView<T::Key, C> {
        if self.is_exhausted() {
            return DeckView::Empty(self.render_empty.as_ref().map(|f| f()));
        }
        let last = match self.config.max_visible {
            Some(below) => self.index.saturating_add(below).min(self.items.len() - 1),
            None => self.items.len() - 1,
        };
        let layers = (self.index..=last)
            .rev()
            .map(|index| {
                let item = &self.items[index];
                let rank = index - self.index;
                let transform = if rank == 0 {
                    self.layout.top(self.offset)
                } else {
                    self.layout.cascade(rank)
                };
                CardLayer {
                    key: item.key(),
                    index,
                    transform,
                    is_top: rank == 0,
                    content: (self.render_card)(item),
                }
            })
            .collect();
        DeckView::Cards(layers)
    }

    fn release(&mut self) -> Release {
        let dx = self.offset.x;
        let threshold = self.threshold();
        let decision = if self.is_exhausted() {
            Release::SnapBack
        } else if dx > threshold {
            Release::Swipe(Direction::Right)
        } else if dx < -threshold {
            Release::Swipe(Direction::Left)
        } else {
            Release::SnapBack
        };
        log::debug!("Released at dx={dx:.1} (threshold {threshold:.1}): {decision:?}");
        match decision {
            Release::Swipe(direction) => self.swipe_out(direction),
            Release::SnapBack => self.snap_back(),
        }
        decision
    }

    fn snap_back(&mut self) {
        let animation = Animation {
            from: self.offset,
            to: Vec2::ZERO,
            curve: Curve::Spring(self.config.spring),
        };
        self.animate(Phase::SnappingBack, animation);
    }

    fn swipe_out(&mut self, direction: Direction) {
        let animation = Animation {
            from: self.offset,
            to: Vec2::new(direction.sign() * self.viewport.width, 0.0),
            curve: Curve::Timing {
                duration_ms: self.config.swipe_out_duration_ms,
                easing: self.config.swipe_out_easing,
            },
        };
        self.animate(Phase::SwipingOut(direction), animation);
    }

    fn animate(&mut self, phase: Phase, animation: Animation) {
        self.set_phase(phase);
        let progress = self.driver.start(animation);
        self.apply(progress);
    }

    fn apply(&mut self, progress: Progress) {
        self.offset = progress.value();
        if progress.is_finished() {
            self.finish();
        }
    }

    fn finish(&mut self) {
        match self.phase {
            Phase::SnappingBack => {
                self.offset = Vec2::ZERO;
                self.set_phase(Phase::Idle);
            }
            Phase::SwipingOut(direction) => self.complete_swipe(direction),
            Phase::Idle | Phase::Dragging => {}
        }
    }

    fn complete_swipe(&mut self, direction: Direction) {
        let items = Rc::clone(&self.items);
        if let Some(item) = items.get(self.index) {
            log::debug!("Swiped {direction} card {:?} at index {}", item.key(), self.index);
            match direction {
                Direction::Left => (self.on_swipe_left)(item),
                Direction::Right => (self.on_swipe_right)(item),
            }
            self.index += 1;
        }
        self.offset = Vec2::ZERO;
        self.set_phase(Phase::Idle);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::debug!("Deck phase {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }
}

impl<T: Keyed, C, D: AnimationDriver> Drop for Deck<T, C, D> {
    fn drop(&mut self) {
        if self.phase.is_animating() {
            log::debug!("Unmounting deck while {}; abandoning animation", self.phase);
        }
        self.driver.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::animation::FrameDriver;
    use crate::animation::ImmediateDriver;

    #[derive(Clone, Debug, PartialEq)]
    struct Profile {
        id: u32,
        name: &'static str,
    }

    impl Keyed for Profile {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }
    }

    fn profiles() -> Rc<[Profile]> {
        Rc::from(vec![
            Profile { id: 1, name: "A" },
            Profile { id: 2, name: "B" },
            Profile { id: 3, name: "C" },
        ])
    }

    fn viewport() -> Viewport {
        Viewport::new(400.0, 800.0).unwrap()
    }

    type Log = Rc<RefCell<Vec<(Direction, &'static str)>>>;

    fn deck_with<D: AnimationDriver>(
        items: Rc<[Profile]>,
        driver: D,
    ) -> Fallible<(Deck<Profile, String, D>, Log)> {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let left = Rc::clone(&log);
        let right = Rc::clone(&log);
        let deck = DeckBuilder::new(items, |p: &Profile| p.name.to_string())
            .render_empty(|| "No more cards".to_string())
            .on_swipe_left(move |p| left.borrow_mut().push((Direction::Left, p.name)))
            .on_swipe_right(move |p| right.borrow_mut().push((Direction::Right, p.name)))
            .build(viewport(), driver)?;
        Ok((deck, log))
    }

    fn drag(deck: &mut Deck<Profile, String, impl AnimationDriver>, dx: f64) -> Option<Release> {
        assert!(deck.pointer_down(Vec2::new(200.0, 400.0)));
        assert!(deck.pointer_move(Vec2::new(200.0 + dx / 2.0, 410.0)));
        assert!(deck.pointer_move(Vec2::new(200.0 + dx, 405.0)));
        deck.pointer_up(Vec2::new(200.0 + dx, 400.0))
    }

    fn run_frames(deck: &mut Deck<Profile, String, FrameDriver>, start: f64) -> f64 {
        let mut now = start;
        while deck.frame(now) {
            now += 16.0;
            assert!(now < start + 10_000.0, "animation never finished");
        }
        now
    }

    #[test]
    fn test_swipe_right_advances() -> Fallible<()> {
        let (mut deck, log) = deck_with(profiles(), ImmediateDriver)?;
        assert_eq!(drag(&mut deck, 150.0), Some(Release::Swipe(Direction::Right)));
        assert_eq!(*log.borrow(), vec![(Direction::Right, "A")]);
        assert_eq!(deck.active_index(), 1);
        assert_eq!(deck.offset(), Vec2::ZERO);
        assert_eq!(deck.phase(), Phase::Idle);

        let view = deck.render();
        let keys: Vec<u32> = view.layers().iter().map(|l| l.key).collect();
        assert_eq!(keys, vec![3, 2]);
        let top = view.top().unwrap();
        assert_eq!(top.content, "B");
        assert!(top.is_top);
        assert_eq!(top.transform, Transform::default());
        let behind = &view.layers()[0];
        assert!(!behind.is_top);
        assert_eq!(behind.transform, Transform::translation(Vec2::new(0.0, 10.0)));
        Ok(())
    }

    #[test]
    fn test_swipe_left_fires_once() -> Fallible<()> {
        let (mut deck, log) = deck_with(profiles(), ImmediateDriver)?;
        assert_eq!(drag(&mut deck, -101.0), Some(Release::Swipe(Direction::Left)));
        assert_eq!(*log.borrow(), vec![(Direction::Left, "A")]);
        assert_eq!(deck.active_index(), 1);
        Ok(())
    }

    #[test]
    fn test_sub_threshold_snaps_back() -> Fallible<()> {
        let (mut deck, log) = deck_with(profiles(), ImmediateDriver)?;
        for dx in [0.0, 50.0, -99.0, 100.0, -100.0] {
            assert_eq!(drag(&mut deck, dx), Some(Release::SnapBack));
            assert_eq!(deck.active_index(), 0);
            assert_eq!(deck.offset(), Vec2::ZERO);
        }
        assert!(log.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn test_exhaustion_renders_empty() -> Fallible<()> {
        let (mut deck, log) = deck_with(profiles(), ImmediateDriver)?;
        drag(&mut deck, 150.0);
        drag(&mut deck, -150.0);
        drag(&mut deck, 300.0);
        assert!(deck.is_exhausted());
        assert_eq!(deck.active_index(), 3);
        assert_eq!(deck.render(), DeckView::Empty(Some("No more cards".to_string())));
        assert_eq!(
            *log.borrow(),
            vec![
                (Direction::Right, "A"),
                (Direction::Left, "B"),
                (Direction::Right, "C")
            ]
        );
        // Nothing left to drag or swipe.
        assert!(!deck.pointer_down(Vec2::ZERO));
        assert!(!deck.force_swipe(Direction::Left));
        assert_eq!(deck.active_index(), 3);
        Ok(())
    }

    #[test]
    fn test_empty_at_mount() -> Fallible<()> {
        let (deck, _) = deck_with(Rc::from(Vec::new()), ImmediateDriver)?;
        assert!(deck.render().is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_without_renderer() -> Fallible<()> {
        let deck = DeckBuilder::new(Vec::<Profile>::new(), |p: &Profile| p.id)
            .build(viewport(), ImmediateDriver)?;
        assert_eq!(deck.render(), DeckView::Empty(None));
        Ok(())
    }

    #[test]
    fn test_live_transform() -> Fallible<()> {
        let (mut deck, _) = deck_with(profiles(), ImmediateDriver)?;
        deck.pointer_down(Vec2::new(10.0, 10.0));
        deck.pointer_move(Vec2::new(110.0, 30.0));
        assert_eq!(deck.phase(), Phase::Dragging);
        let top = deck.transform_for_top();
        assert_eq!(top.translate, Vec2::new(100.0, 20.0));
        assert!((top.rotate - 15.0).abs() < 1e-9);
        let view = deck.render();
        assert_eq!(view.top().map(|l| l.transform), Some(top));
        Ok(())
    }

    #[test]
    fn test_second_pointer_down_ignored_while_dragging() -> Fallible<()> {
        let (mut deck, _) = deck_with(profiles(), ImmediateDriver)?;
        assert!(deck.pointer_down(Vec2::new(0.0, 0.0)));
        deck.pointer_move(Vec2::new(40.0, 0.0));
        assert!(!deck.pointer_down(Vec2::new(300.0, 0.0)));
        deck.pointer_move(Vec2::new(60.0, 0.0));
        assert_eq!(deck.offset(), Vec2::new(60.0, 0.0));
        Ok(())
    }

    #[test]
    fn test_move_and_up_without_down() -> Fallible<()> {
        let (mut deck, _) = deck_with(profiles(), ImmediateDriver)?;
        assert!(!deck.pointer_move(Vec2::new(40.0, 0.0)));
        assert_eq!(deck.pointer_up(Vec2::new(400.0, 0.0)), None);
        assert_eq!(deck.pointer_cancel(), None);
        assert_eq!(deck.active_index(), 0);
        Ok(())
    }

    #[test]
    fn test_timed_swipe_out() -> Fallible<()> {
        let (mut deck, log) = deck_with(profiles(), FrameDriver::new())?;
        assert_eq!(drag(&mut deck, 150.0), Some(Release::Swipe(Direction::Right)));
        assert_eq!(deck.phase(), Phase::SwipingOut(Direction::Right));
        assert!(deck.frame(1000.0));
        assert!(deck.frame(1125.0));
        assert_eq!(deck.offset(), Vec2::new(275.0, 0.0));
        // Gestures are ignored until the animation resolves.
        assert!(!deck.pointer_down(Vec2::ZERO));
        assert!(log.borrow().is_empty());
        assert_eq!(deck.active_index(), 0);
        assert!(!deck.frame(1250.0));
        assert_eq!(*log.borrow(), vec![(Direction::Right, "A")]);
        assert_eq!(deck.active_index(), 1);
        assert_eq!(deck.offset(), Vec2::ZERO);
        assert!(deck.pointer_down(Vec2::ZERO));
        Ok(())
    }

    #[test]
    fn test_spring_snap_back() -> Fallible<()> {
        let (mut deck, log) = deck_with(profiles(), FrameDriver::new())?;
        assert_eq!(drag(&mut deck, 80.0), Some(Release::SnapBack));
        assert_eq!(deck.phase(), Phase::SnappingBack);
        assert!(!deck.pointer_down(Vec2::ZERO));
        run_frames(&mut deck, 0.0);
        assert_eq!(deck.phase(), Phase::Idle);
        assert_eq!(deck.offset(), Vec2::ZERO);
        assert_eq!(deck.active_index(), 0);
        assert!(log.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn test_force_swipe() -> Fallible<()> {
        let (mut deck, log) = deck_with(profiles(), FrameDriver::new())?;
        assert!(deck.force_swipe(Direction::Left));
        assert!(!deck.force_swipe(Direction::Right));
        run_frames(&mut deck, 0.0);
        assert_eq!(*log.borrow(), vec![(Direction::Left, "A")]);
        assert_eq!(deck.active_index(), 1);
        Ok(())
    }

    #[test]
    fn test_pointer_cancel() -> Fallible<()> {
        let (mut deck, log) = deck_with(profiles(), ImmediateDriver)?;
        deck.pointer_down(Vec2::ZERO);
        deck.pointer_move(Vec2::new(-250.0, 0.0));
        assert_eq!(deck.pointer_cancel(), Some(Release::Swipe(Direction::Left)));
        assert_eq!(*log.borrow(), vec![(Direction::Left, "A")]);
        Ok(())
    }

    #[test]
    fn test_set_items_resets_index() -> Fallible<()> {
        let (mut deck, _) = deck_with(profiles(), ImmediateDriver)?;
        drag(&mut deck, 150.0);
        drag(&mut deck, 150.0);
        assert_eq!(deck.active_index(), 2);
        // Same sequence: nothing happens.
        let same = Rc::clone(deck.items());
        deck.set_items(same);
        assert_eq!(deck.active_index(), 2);
        // A new sequence with equal contents still resets.
        deck.set_items(profiles());
        assert_eq!(deck.active_index(), 0);
        assert_eq!(deck.current().map(|p| p.name), Some("A"));
        Ok(())
    }

    #[test]
    fn test_set_items_keeps_drag() -> Fallible<()> {
        let (mut deck, log) = deck_with(profiles(), ImmediateDriver)?;
        drag(&mut deck, 150.0);
        deck.pointer_down(Vec2::ZERO);
        deck.pointer_move(Vec2::new(30.0, 0.0));
        deck.set_items(profiles());
        assert_eq!(deck.phase(), Phase::Dragging);
        assert_eq!(deck.offset(), Vec2::new(30.0, 0.0));
        assert_eq!(deck.pointer_up(Vec2::new(200.0, 0.0)), Some(Release::Swipe(Direction::Right)));
        assert_eq!(log.borrow().last(), Some(&(Direction::Right, "A")));
        assert_eq!(deck.active_index(), 1);
        Ok(())
    }

    #[test]
    fn test_set_items_abandons_swipe_out() -> Fallible<()> {
        let (mut deck, log) = deck_with(profiles(), FrameDriver::new())?;
        drag(&mut deck, 150.0);
        deck.frame(0.0);
        deck.set_items(profiles());
        assert_eq!(deck.phase(), Phase::Idle);
        assert!(!deck.frame(500.0));
        assert!(log.borrow().is_empty());
        assert_eq!(deck.active_index(), 0);
        Ok(())
    }

    #[test]
    fn test_set_items_to_empty_while_dragging() -> Fallible<()> {
        let (mut deck, log) = deck_with(profiles(), ImmediateDriver)?;
        deck.pointer_down(Vec2::ZERO);
        deck.set_items(Rc::from(Vec::new()));
        assert_eq!(deck.pointer_up(Vec2::new(300.0, 0.0)), Some(Release::SnapBack));
        assert!(log.borrow().is_empty());
        assert!(deck.render().is_empty());
        Ok(())
    }

    #[test]
    fn test_index_monotonic() -> Fallible<()> {
        let (mut deck, _) = deck_with(profiles(), ImmediateDriver)?;
        let mut last = deck.active_index();
        for dx in [10.0, 150.0, -20.0, -150.0, 99.0, 300.0, 300.0, -300.0] {
            if deck.pointer_down(Vec2::ZERO) {
                deck.pointer_up(Vec2::new(dx, 0.0));
            }
            assert!(deck.active_index() >= last);
            assert!(deck.active_index() <= deck.len());
            last = deck.active_index();
        }
        assert!(deck.is_exhausted());
        Ok(())
    }

    #[test]
    fn test_max_visible() -> Fallible<()> {
        let config = DeckConfig {
            max_visible: Some(1),
            ..DeckConfig::default()
        };
        let deck = DeckBuilder::new(profiles(), |p: &Profile| p.name)
            .config(config)
            .build(viewport(), ImmediateDriver)?;
        let indices: Vec<usize> = deck.render().layers().iter().map(|l| l.index).collect();
        assert_eq!(indices, vec![1, 0]);
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        let config = DeckConfig {
            swipe_threshold: 0.0,
            ..DeckConfig::default()
        };
        let result = DeckBuilder::new(profiles(), |p: &Profile| p.name)
            .config(config)
            .build(viewport(), ImmediateDriver);
        assert!(result.is_err());
    }

    #[test]
    fn test_direction_strings() -> Fallible<()> {
        assert_eq!(Direction::try_from("left".to_string())?, Direction::Left);
        assert_eq!(Direction::Right.to_string(), "right");
        assert!(Direction::try_from("up".to_string()).is_err());
        Ok(())
    }
}

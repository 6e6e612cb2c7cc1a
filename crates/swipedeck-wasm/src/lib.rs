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

//! WASM bindings for swipedeck - mounts a card deck into a DOM element.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use js_sys::Function;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;
use web_sys::PointerEvent;
use web_sys::console;

use swipedeck_core::animation::FrameDriver;
use swipedeck_core::config::DeckConfig;
use swipedeck_core::deck::Deck;
use swipedeck_core::deck::DeckBuilder;
use swipedeck_core::deck::Direction;
use swipedeck_core::geometry::Vec2;
use swipedeck_core::geometry::Viewport;
use swipedeck_core::view::CardLayer;
use swipedeck_core::view::DeckView;

mod dom;
mod frames;
mod items;

use dom::DeckDom;
use dom::DomState;
use dom::should_build;
use frames::FrameLoop;
use items::JsItem;
use items::items_from_array;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"swipedeck WASM initialized".into());
}

/// Card content stays a JavaScript item until it is drawn, so the render
/// callbacks never run while the deck is borrowed.
type JsDeck = Deck<JsItem, JsValue, FrameDriver>;

/// Swipes completed by the deck, waiting to be reported to JavaScript.
type Outbox = Rc<RefCell<Vec<(Direction, JsValue)>>>;

type PointerListener = Closure<dyn FnMut(PointerEvent)>;

struct Mounted {
    deck: JsDeck,
    dom: DeckDom,
    /// Bumped whenever the item sequence is replaced.
    generation: u64,
    frames: FrameLoop,
}

impl Mounted {
    fn dom_state(&self) -> DomState {
        (self.generation, self.deck.active_index())
    }
}

struct Shared {
    /// `None` once destroyed.
    mounted: RefCell<Option<Mounted>>,
    outbox: Outbox,
    render_card: Function,
    render_empty: Option<Function>,
    on_swipe_left: Option<Function>,
    on_swipe_right: Option<Function>,
}

/// A card deck mounted into a container element.
#[wasm_bindgen]
pub struct SwipeDeck {
    shared: Rc<Shared>,
    listeners: RefCell<Vec<(&'static str, PointerListener)>>,
}

#[wasm_bindgen]
impl SwipeDeck {
    /// Mount a deck into `container`.
    ///
    /// `items` is an array of objects with an `id` property. `render_card`
    /// receives an item and returns the card's HTML; `render_empty` returns
    /// the HTML shown once every card has been swiped. Both are called only
    /// when the top card changes. `config_json` is an
    /// optional JSON object overriding the deck defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        items: Array,
        render_card: Function,
        render_empty: Option<Function>,
        on_swipe_left: Option<Function>,
        on_swipe_right: Option<Function>,
        config_json: Option<String>,
    ) -> Result<SwipeDeck, JsValue> {
        let config = match config_json {
            Some(json) => DeckConfig::from_json(&json)
                .map_err(|e| JsValue::from_str(&format!("Invalid deck config: {}", e)))?,
            None => DeckConfig::default(),
        };
        let viewport = read_viewport()?;
        let items = items_from_array(&items)?;
        let outbox: Outbox = Rc::new(RefCell::new(Vec::new()));

        let left = Rc::clone(&outbox);
        let right = Rc::clone(&outbox);
        let deck = DeckBuilder::new(items, |item: &JsItem| item.value().clone())
            .config(config)
            .on_swipe_left(move |item| left.borrow_mut().push((Direction::Left, item.value().clone())))
            .on_swipe_right(move |item| {
                right
                    .borrow_mut()
                    .push((Direction::Right, item.value().clone()))
            })
            .build(viewport, FrameDriver::new())
            .map_err(|e| JsValue::from_str(&format!("Failed to mount deck: {}", e)))?;

        let shared = Rc::new(Shared {
            mounted: RefCell::new(Some(Mounted {
                deck,
                dom: DeckDom::new(container)?,
                generation: 0,
                frames: FrameLoop::default(),
            })),
            outbox,
            render_card,
            render_empty,
            on_swipe_left,
            on_swipe_right,
        });
        shared.update(|_| {})?;
        let listeners = bind_pointer_events(&shared)?;
        Ok(SwipeDeck {
            shared,
            listeners: RefCell::new(listeners),
        })
    }

    /// Replace the items. The deck starts again from the first card.
    #[wasm_bindgen]
    pub fn set_items(&self, items: Array) -> Result<(), JsValue> {
        let items = items_from_array(&items)?;
        self.shared.update(|mounted| {
            mounted.generation += 1;
            mounted.deck.set_items(items);
        })
    }

    /// Swipe the top card to the left without a gesture.
    #[wasm_bindgen]
    pub fn swipe_left(&self) -> Result<bool, JsValue> {
        self.force_swipe(Direction::Left)
    }

    /// Swipe the top card to the right without a gesture.
    #[wasm_bindgen]
    pub fn swipe_right(&self) -> Result<bool, JsValue> {
        self.force_swipe(Direction::Right)
    }

    #[wasm_bindgen]
    pub fn active_index(&self) -> usize {
        self.shared
            .mounted
            .borrow()
            .as_ref()
            .map(|m| m.deck.active_index())
            .unwrap_or(0)
    }

    #[wasm_bindgen]
    pub fn is_exhausted(&self) -> bool {
        self.shared
            .mounted
            .borrow()
            .as_ref()
            .map(|m| m.deck.is_exhausted())
            .unwrap_or(true)
    }

    /// Unmount the deck: remove listeners, clear the container and abandon
    /// any running animation.
    #[wasm_bindgen]
    pub fn destroy(&self) {
        let mounted = self.shared.mounted.borrow_mut().take();
        if let Some(mut mounted) = mounted {
            let container = mounted.dom.container().clone();
            for (event, listener) in self.listeners.borrow_mut().drain(..) {
                let _ = container
                    .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
            }
            mounted.dom.clear();
        }
        self.shared.outbox.borrow_mut().clear();
    }
}

impl SwipeDeck {
    fn force_swipe(&self, direction: Direction) -> Result<bool, JsValue> {
        let mut accepted = false;
        self.shared.update(|mounted| {
            accepted = mounted.deck.force_swipe(direction);
        })?;
        Ok(accepted)
    }
}

impl Drop for SwipeDeck {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl Shared {
    /// Runs `f` against the mounted deck, refreshes the DOM, then reports
    /// completed swipes and keeps the frame loop going while animating.
    ///
    /// Every JavaScript callback (renderers and swipe handlers) runs after
    /// the deck borrow is released, so it may call back into the deck.
    fn update(self: &Rc<Self>, f: impl FnOnce(&mut Mounted)) -> Result<(), JsValue> {
        let snapshot = {
            let mut guard = self.mounted.borrow_mut();
            let Some(mounted) = guard.as_mut() else {
                return Ok(());
            };
            f(mounted);
            let state = mounted.dom_state();
            if mounted.dom.is_current(state) {
                mounted.dom.move_top(mounted.deck.transform_for_top())?;
                None
            } else {
                Some((state, mounted.deck.render()))
            }
        };
        if let Some((planned, view)) = snapshot {
            let view = self.draw(view);
            let mut guard = self.mounted.borrow_mut();
            if let Some(mounted) = guard.as_mut() {
                if should_build(planned, mounted.dom_state(), mounted.dom.rendered()) {
                    mounted.dom.build(planned, view)?;
                }
            }
        }
        self.dispatch_swipes();
        self.keep_animating()
    }

    /// Calls the render callbacks for a snapshotted view.
    fn draw(&self, view: DeckView<String, JsValue>) -> DeckView<String, String> {
        match view {
            DeckView::Empty(_) => {
                DeckView::Empty(self.render_empty.as_ref().map(|f| call_for_html(f, None)))
            }
            DeckView::Cards(layers) => DeckView::Cards(
                layers
                    .into_iter()
                    .map(|layer| CardLayer {
                        content: call_for_html(&self.render_card, Some(&layer.content)),
                        key: layer.key,
                        index: layer.index,
                        transform: layer.transform,
                        is_top: layer.is_top,
                    })
                    .collect(),
            ),
        }
    }

    fn keep_animating(self: &Rc<Self>) -> Result<(), JsValue> {
        let claimed = match self.mounted.borrow_mut().as_mut() {
            Some(mounted) => mounted.frames.claim(mounted.deck.is_animating()),
            None => false,
        };
        if !claimed {
            return Ok(());
        }
        if let Err(e) = request_frame(self) {
            if let Some(mounted) = self.mounted.borrow_mut().as_mut() {
                mounted.frames.failed();
            }
            return Err(e);
        }
        Ok(())
    }

    fn dispatch_swipes(&self) {
        let swipes: Vec<(Direction, JsValue)> = self.outbox.borrow_mut().drain(..).collect();
        for (direction, item) in swipes {
            let callback = match direction {
                Direction::Left => &self.on_swipe_left,
                Direction::Right => &self.on_swipe_right,
            };
            if let Some(callback) = callback {
                if let Err(e) = callback.call1(&JsValue::NULL, &item) {
                    console::error_2(&format!("swipe {direction} callback failed:").into(), &e);
                }
            }
        }
    }

    fn on_frame(self: &Rc<Self>, now: f64) {
        let result = self.update(|mounted| {
            mounted.frames.delivered();
            mounted.deck.frame(now);
        });
        if let Err(e) = result {
            console::error_2(&"swipedeck frame failed:".into(), &e);
        }
    }
}

fn request_frame(shared: &Rc<Shared>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let handle = Rc::clone(shared);
    let callback = Closure::once_into_js(move |now: f64| handle.on_frame(now));
    window.request_animation_frame(callback.unchecked_ref())?;
    Ok(())
}

fn read_viewport() -> Result<Viewport, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Viewport::new(width, height).map_err(|e| JsValue::from_str(&format!("{}", e)))
}

fn call_for_html(f: &Function, item: Option<&JsValue>) -> String {
    let result = match item {
        Some(item) => f.call1(&JsValue::NULL, item),
        None => f.call0(&JsValue::NULL),
    };
    match result {
        Ok(html) => html.as_string().unwrap_or_default(),
        Err(e) => {
            console::error_2(&"swipedeck render callback failed:".into(), &e);
            String::new()
        }
    }
}

fn pointer_position(event: &PointerEvent) -> Vec2 {
    Vec2::new(event.client_x() as f64, event.client_y() as f64)
}

fn bind_pointer_events(shared: &Rc<Shared>) -> Result<Vec<(&'static str, PointerListener)>, JsValue> {
    let container = match shared.mounted.borrow().as_ref() {
        Some(mounted) => mounted.dom.container().clone(),
        None => return Ok(Vec::new()),
    };

    let mut listeners: Vec<(&'static str, PointerListener)> = Vec::new();

    let handle = Rc::clone(shared);
    listeners.push((
        "pointerdown",
        Closure::new(move |event: PointerEvent| {
            let result = handle.update(|mounted| {
                if !mounted.dom.targets_top(&event) {
                    return;
                }
                if mounted.deck.pointer_down(pointer_position(&event)) {
                    event.prevent_default();
                    let _ = mounted.dom.capture(event.pointer_id());
                }
            });
            report(result);
        }),
    ));

    let handle = Rc::clone(shared);
    listeners.push((
        "pointermove",
        Closure::new(move |event: PointerEvent| {
            let result = handle.update(|mounted| {
                mounted.deck.pointer_move(pointer_position(&event));
            });
            report(result);
        }),
    ));

    let handle = Rc::clone(shared);
    listeners.push((
        "pointerup",
        Closure::new(move |event: PointerEvent| {
            let result = handle.update(|mounted| {
                mounted.deck.pointer_up(pointer_position(&event));
            });
            report(result);
        }),
    ));

    let handle = Rc::clone(shared);
    listeners.push((
        "pointercancel",
        Closure::new(move |_event: PointerEvent| {
            let result = handle.update(|mounted| {
                mounted.deck.pointer_cancel();
            });
            report(result);
        }),
    ));

    for (event, listener) in &listeners {
        container.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())?;
    }
    Ok(listeners)
}

fn report(result: Result<(), JsValue>) {
    if let Err(e) = result {
        console::error_2(&"swipedeck event failed:".into(), &e);
    }
}

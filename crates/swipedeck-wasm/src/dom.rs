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

//! Mirrors the deck view into the DOM.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Document;
use web_sys::Event;
use web_sys::HtmlElement;
use web_sys::Node;

use swipedeck_core::geometry::Transform;
use swipedeck_core::view::DeckView;

const CARD_CLASS: &str = "swipedeck-card";
const TOP_CLASS: &str = "swipedeck-card swipedeck-top";
const EMPTY_CLASS: &str = "swipedeck-empty";

/// An (items generation, active index) pair. The card elements only need
/// rebuilding when it changes.
pub type DomState = (u64, usize);

/// Whether a view snapshotted at `planned` should still be built, given the
/// deck is now at `current` and the DOM was last built for `rendered`.
///
/// Card renderers are JavaScript and may call back into the deck before the
/// snapshot is built. If they moved the deck on, or already built the
/// current state themselves, the snapshot is stale.
pub fn should_build(planned: DomState, current: DomState, rendered: Option<DomState>) -> bool {
    planned == current && rendered != Some(current)
}

pub struct DeckDom {
    document: Document,
    container: HtmlElement,
    top: Option<HtmlElement>,
    rendered: Option<DomState>,
}

impl DeckDom {
    pub fn new(container: HtmlElement) -> Result<Self, JsValue> {
        let document = container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("Container is not attached to a document"))?;
        container.style().set_property("position", "relative")?;
        Ok(Self {
            document,
            container,
            top: None,
            rendered: None,
        })
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    pub fn rendered(&self) -> Option<DomState> {
        self.rendered
    }

    pub fn is_current(&self, state: DomState) -> bool {
        self.rendered == Some(state)
    }

    /// Moves the top card without touching the rest of the stack.
    pub fn move_top(&self, top: Transform) -> Result<(), JsValue> {
        if let Some(element) = &self.top {
            element.style().set_property("transform", &top.to_css())?;
        }
        Ok(())
    }

    /// Replaces every card element with `view`, built for `state`.
    pub fn build(&mut self, state: DomState, view: DeckView<String, String>) -> Result<(), JsValue> {
        self.container.set_inner_html("");
        self.top = None;
        self.rendered = None;
        match view {
            DeckView::Empty(content) => {
                let element = self.create_div(EMPTY_CLASS)?;
                element.set_inner_html(&content.unwrap_or_default());
                self.container.append_child(&element)?;
            }
            DeckView::Cards(layers) => {
                // Later siblings paint over earlier ones, and layers arrive
                // back to front, so the top card ends up last.
                for layer in layers {
                    let class = if layer.is_top { TOP_CLASS } else { CARD_CLASS };
                    let element = self.create_div(class)?;
                    element.set_attribute("data-key", &layer.key)?;
                    let style = element.style();
                    style.set_property("position", "absolute")?;
                    style.set_property("left", "0")?;
                    style.set_property("top", "0")?;
                    style.set_property("width", "100%")?;
                    style.set_property("touch-action", "none")?;
                    style.set_property("transform", &layer.transform.to_css())?;
                    element.set_inner_html(&layer.content);
                    self.container.append_child(&element)?;
                    if layer.is_top {
                        style.set_property("will-change", "transform")?;
                        self.top = Some(element);
                    }
                }
            }
        }
        self.rendered = Some(state);
        Ok(())
    }

    fn create_div(&self, class: &str) -> Result<HtmlElement, JsValue> {
        let element = self.document.create_element("div")?;
        element.set_class_name(class);
        element.dyn_into::<HtmlElement>().map_err(JsValue::from)
    }

    /// Whether the event originated on the top card.
    pub fn targets_top(&self, event: &Event) -> bool {
        let (Some(top), Some(target)) = (&self.top, event.target()) else {
            return false;
        };
        match target.dyn_into::<Node>() {
            Ok(node) => top.contains(Some(&node)),
            Err(_) => false,
        }
    }

    /// Routes further events for this pointer to the top card even if the
    /// pointer leaves it.
    pub fn capture(&self, pointer_id: i32) -> Result<(), JsValue> {
        match &self.top {
            Some(top) => top.set_pointer_capture(pointer_id),
            None => Ok(()),
        }
    }

    pub fn clear(&mut self) {
        self.container.set_inner_html("");
        self.top = None;
        self.rendered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_build() {
        assert!(should_build((0, 0), (0, 0), None));
    }

    #[test]
    fn test_top_card_changed() {
        assert!(should_build((0, 1), (0, 1), Some((0, 0))));
        assert!(should_build((1, 0), (1, 0), Some((0, 3))));
    }

    #[test]
    fn test_deck_moved_during_render() {
        // A renderer swiped the card it was drawing.
        assert!(!should_build((0, 0), (0, 1), Some((0, 1))));
        // A renderer replaced the items.
        assert!(!should_build((0, 2), (1, 0), None));
    }

    #[test]
    fn test_built_during_render() {
        // A renderer called into the deck, which built the same state first.
        assert!(!should_build((0, 2), (0, 2), Some((0, 2))));
    }
}

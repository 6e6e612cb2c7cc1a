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

use maud::DOCTYPE;
use maud::Markup;
use maud::PreEscaped;
use maud::html;
use swipedeck_core::geometry::Viewport;

const STYLE: &str = include_str!("style.css");

pub fn page_template(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                (body)
            }
        }
    }
}

/// The element cards are placed in, sized to the viewport the deck was laid
/// out for.
pub fn deck_container(id: &str, viewport: Option<Viewport>, content: Markup) -> Markup {
    let style = viewport.map(|v| format!("width: {}px; height: {}px;", v.width, v.height));
    html! {
        div id=(id) class="swipedeck" style=[style] {
            (content)
        }
    }
}

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

//! Static HTML snapshot of the deck a script leaves behind.

use std::fs::write;
use std::path::Path;

use maud::Markup;
use maud::PreEscaped;
use maud::html;
use swipedeck_core::error::Fallible;
use swipedeck_core::view::DeckView;

use crate::cmd::replay::Session;
use crate::cmd::template::deck_container;
use crate::cmd::template::page_template;
use crate::script::Script;

pub fn render(path: Option<String>, output: Option<String>) -> Fallible<()> {
    let script = match path {
        Some(path) => Script::load(Path::new(&path))?,
        None => Script::demo()?,
    };
    let html = render_snapshot(&script)?;
    match output {
        Some(output) => {
            write(&output, html)?;
            log::info!("Wrote snapshot to {output}");
        }
        None => print!("{html}"),
    }
    Ok(())
}

pub fn render_snapshot(script: &Script) -> Fallible<String> {
    let empty = script.empty_html();
    let mut session = Session::new(
        script,
        |item| PreEscaped(item.html()),
        move || PreEscaped(empty.clone()),
    )?;
    session.run(&script.steps)?;
    let view = session.deck().render();
    let body = deck_container("deck", Some(script.viewport()?), view_markup(&view));
    Ok(page_template("swipedeck snapshot", body).into_string())
}

fn view_markup(view: &DeckView<String, Markup>) -> Markup {
    html! {
        @match view {
            DeckView::Empty(content) => {
                div class="swipedeck-empty" {
                    @if let Some(content) = content {
                        (content)
                    }
                }
            }
            DeckView::Cards(layers) => {
                @for layer in layers {
                    div
                        class=(if layer.is_top { "swipedeck-card swipedeck-top" } else { "swipedeck-card" })
                        data-key=(layer.key)
                        data-index=(layer.index)
                        style=(format!("transform: {};", layer.transform.to_css()))
                    {
                        (layer.content)
                    }
                }
            }
        }
    }
}

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

use std::path::Path as FsPath;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use maud::Markup;
use maud::html;
use serde::Serialize;
use swipedeck_core::config::DeckConfig;
use swipedeck_core::error::Fallible;
use tokio::net::TcpListener;
use tokio::signal;

use crate::cmd::serve::assets::AssetLoader;
use crate::cmd::serve::assets::content_type;
use crate::cmd::template::deck_container;
use crate::cmd::template::page_template;
use crate::script::Script;

const APP_JS: &str = include_str!("app.js");

pub struct ServerConfig {
    /// Deck script to serve. The bundled demo when absent.
    pub script: Option<String>,
    /// Directory holding the `wasm-pack` output.
    pub pkg: Option<String>,
    pub host: String,
    pub port: u16,
}

/// What the page fetches to mount the deck.
#[derive(Serialize)]
struct DeckPayload {
    items: Vec<CardPayload>,
    empty_html: String,
    config: DeckConfig,
}

#[derive(Serialize)]
struct CardPayload {
    id: String,
    html: String,
}

impl DeckPayload {
    fn from_script(script: &Script) -> Self {
        Self {
            items: script
                .items
                .iter()
                .map(|item| CardPayload {
                    id: item.id.clone(),
                    html: item.html(),
                })
                .collect(),
            empty_html: script.empty_html(),
            config: script.config.clone(),
        }
    }
}

#[derive(Clone)]
struct ServerState {
    deck_json: Arc<String>,
    assets: Option<Arc<AssetLoader>>,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let script = match &config.script {
        Some(path) => Script::load(FsPath::new(path))?,
        None => Script::demo()?,
    };
    let assets = match &config.pkg {
        Some(dir) => Some(Arc::new(AssetLoader::new(FsPath::new(dir))?)),
        None => {
            log::warn!("No --pkg directory given; the page will not be interactive");
            None
        }
    };
    let deck_json = serde_json::to_string(&DeckPayload::from_script(&script))?;

    let state = ServerState {
        deck_json: Arc::new(deck_json),
        assets,
    };
    let app = Router::new();
    let app = app.route("/", get(index_handler));
    let app = app.route("/deck.json", get(deck_handler));
    let app = app.route("/app.js", get(script_handler));
    let app = app.route("/pkg/{*path}", get(pkg_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", config.host, config.port);

    log::info!("Serving {} cards on http://{bind}/", script.items.len());
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn index_handler(State(state): State<ServerState>) -> Html<String> {
    let body: Markup = if state.assets.is_some() {
        html! {
            (deck_container("deck", None, html! {}))
            div id="status" {}
            div class="controls" {
                button id="swipe-left" type="button" { "Swipe left" }
                button id="reset" type="button" { "Start over" }
                button id="swipe-right" type="button" { "Swipe right" }
            }
            script type="module" src="/app.js" {}
        }
    } else {
        html! {
            div class="notice" {
                h1 { "swipedeck" }
                p {
                    "Build the browser binding with "
                    code { "wasm-pack build crates/swipedeck-wasm --target web" }
                    " and restart with "
                    code { "--pkg crates/swipedeck-wasm/pkg" }
                    "."
                }
            }
        }
    };
    Html(page_template("swipedeck", body).into_string())
}

async fn deck_handler(
    State(state): State<ServerState>,
) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "application/json")],
        state.deck_json.as_ref().clone(),
    )
}

async fn script_handler() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (StatusCode::OK, [(CONTENT_TYPE, "text/javascript")], APP_JS)
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn pkg_handler(
    State(state): State<ServerState>,
    Path(path): Path<String>,
) -> (StatusCode, [(HeaderName, &'static str); 1], Vec<u8>) {
    let not_found = (
        StatusCode::NOT_FOUND,
        [(CONTENT_TYPE, "text/plain")],
        b"Not Found".to_vec(),
    );
    let Some(assets) = &state.assets else {
        return not_found;
    };
    let validated_path: PathBuf = match assets.validate(&path) {
        Ok(p) => p,
        Err(e) => {
            log::debug!("Rejected asset path '{path}': {e:?}");
            return not_found;
        }
    };
    let mime = content_type(&validated_path);
    match tokio::fs::read(&validated_path).await {
        Ok(bytes) => (StatusCode::OK, [(CONTENT_TYPE, mime)], bytes),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(CONTENT_TYPE, "text/plain")],
            b"Internal Server Error".to_vec(),
        ),
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => log::debug!("Received Ctrl+C, shutting down gracefully"),
        Err(e) => {
            log::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}

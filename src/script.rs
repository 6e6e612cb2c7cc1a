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

//! Deck scripts: a deck definition plus a sequence of gestures to play
//! against it, written in TOML.

use std::collections::HashSet;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use swipedeck_core::config::DeckConfig;
use swipedeck_core::deck::Direction;
use swipedeck_core::deck::Keyed;
use swipedeck_core::error::Fallible;
use swipedeck_core::error::fail;
use swipedeck_core::geometry::Viewport;

use crate::markdown::markdown_to_html;

const DEMO_SCRIPT: &str = include_str!("../demos/profiles.toml");

const DEFAULT_EMPTY: &str = "No more cards";

/// Longest single `wait` a script may ask for.
const MAX_WAIT_MS: f64 = 600_000.0;

/// A card in a script. The body is Markdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemoItem {
    pub id: String,
    #[serde(default)]
    pub body: String,
}

impl DemoItem {
    pub fn html(&self) -> String {
        markdown_to_html(&self.body)
    }
}

impl Keyed for DemoItem {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// A single scripted input.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    /// Put a pointer down at a point.
    Down { x: f64, y: f64 },
    /// Move the pointer to a point.
    Move { x: f64, y: f64 },
    /// Lift the pointer at a point.
    Up { x: f64, y: f64 },
    /// The host cancels the gesture.
    Cancel,
    /// Swipe the top card without a gesture.
    Swipe { direction: Direction },
    /// Let this much time pass.
    Wait { ms: f64 },
    /// Let time pass until the deck stops animating.
    Settle,
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Down { x, y } => write!(f, "down ({x:.1}, {y:.1})"),
            Step::Move { x, y } => write!(f, "move ({x:.1}, {y:.1})"),
            Step::Up { x, y } => write!(f, "up ({x:.1}, {y:.1})"),
            Step::Cancel => write!(f, "cancel"),
            Step::Swipe { direction } => write!(f, "swipe {direction}"),
            Step::Wait { ms } => write!(f, "wait {ms}ms"),
            Step::Settle => write!(f, "settle"),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    pub viewport: Viewport,
    #[serde(default)]
    pub config: DeckConfig,
    /// Markdown shown once every card has been swiped.
    #[serde(default)]
    pub empty: Option<String>,
    #[serde(default)]
    pub items: Vec<DemoItem>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn parse(s: &str) -> Fallible<Self> {
        let script: Script = toml::from_str(s)?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Fallible<Self> {
        if !path.exists() {
            return fail(format!("script does not exist: {}", path.display()));
        }
        let contents = read_to_string(path)?;
        Self::parse(&contents)
    }

    /// The bundled demo deck.
    pub fn demo() -> Fallible<Self> {
        Self::parse(DEMO_SCRIPT)
    }

    pub fn viewport(&self) -> Fallible<Viewport> {
        Viewport::new(self.viewport.width, self.viewport.height)
    }

    pub fn empty_html(&self) -> String {
        markdown_to_html(self.empty.as_deref().unwrap_or(DEFAULT_EMPTY))
    }

    fn validate(&self) -> Fallible<()> {
        self.viewport()?;
        self.config.validate()?;
        let mut seen: HashSet<&str> = HashSet::new();
        for item in &self.items {
            if item.id.is_empty() {
                return fail("item ids must not be empty");
            }
            if !seen.insert(item.id.as_str()) {
                return fail(format!("duplicate item id: '{}'", item.id));
            }
        }
        for (index, step) in self.steps.iter().enumerate() {
            if let Step::Wait { ms } = step {
                if !(ms.is_finite() && (0.0..=MAX_WAIT_MS).contains(ms)) {
                    return fail(format!(
                        "step #{}: wait must be between 0 and {MAX_WAIT_MS}ms, got {ms}",
                        index + 1
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_demo_parses() -> Fallible<()> {
        let script = Script::demo()?;
        assert_eq!(script.items.len(), 3);
        assert_eq!(script.items[0].id, "ada");
        assert_eq!(script.viewport()?.width, 400.0);
        assert_eq!(script.steps[0], Step::Down { x: 200.0, y: 400.0 });
        assert!(script.steps.contains(&Step::Swipe {
            direction: Direction::Left
        }));
        Ok(())
    }

    #[test]
    fn test_minimal() -> Fallible<()> {
        let script = Script::parse(
            r#"
            [viewport]
            width = 320
            height = 640
            "#,
        )?;
        assert!(script.items.is_empty());
        assert!(script.steps.is_empty());
        assert_eq!(script.config, DeckConfig::default());
        assert_eq!(script.empty_html(), "<p>No more cards</p>\n");
        Ok(())
    }

    #[test]
    fn test_steps() -> Fallible<()> {
        let script = Script::parse(
            r#"
            [viewport]
            width = 320
            height = 640

            [[steps]]
            action = "wait"
            ms = 12.5

            [[steps]]
            action = "cancel"
            "#,
        )?;
        assert_eq!(script.steps, vec![Step::Wait { ms: 12.5 }, Step::Cancel]);
        assert_eq!(script.steps[0].to_string(), "wait 12.5ms");
        Ok(())
    }

    #[test]
    fn test_duplicate_ids() {
        let result = Script::parse(
            r#"
            [viewport]
            width = 320
            height = 640

            [[items]]
            id = "a"

            [[items]]
            id = "a"
            "#,
        );
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some("error: duplicate item id: 'a'".to_string())
        );
    }

    #[test]
    fn test_wait_out_of_range() {
        for ms in ["1e15", "-5.0", "inf", "nan"] {
            let result = Script::parse(&format!(
                r#"
                [viewport]
                width = 320
                height = 640

                [[steps]]
                action = "wait"
                ms = {ms}
                "#
            ));
            assert!(result.is_err(), "wait of {ms}ms was accepted");
        }
    }

    #[test]
    fn test_longest_wait() -> Fallible<()> {
        let script = Script::parse(
            r#"
            [viewport]
            width = 320
            height = 640

            [[steps]]
            action = "wait"
            ms = 600000
            "#,
        )?;
        assert_eq!(script.steps, vec![Step::Wait { ms: 600_000.0 }]);
        Ok(())
    }

    #[test]
    fn test_invalid_viewport() {
        let result = Script::parse(
            r#"
            [viewport]
            width = 0
            height = 640
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_config() {
        let result = Script::parse(
            r#"
            [viewport]
            width = 320
            height = 640

            [config]
            swipe_threshold = 2.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load() -> Fallible<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "[viewport]\nwidth = 100\nheight = 100\n")?;
        let script = Script::load(file.path())?;
        assert_eq!(script.viewport()?.height, 100.0);
        Ok(())
    }

    #[test]
    fn test_load_missing() {
        let result = Script::load(Path::new("./derpherp.toml"));
        assert!(result.is_err());
    }
}

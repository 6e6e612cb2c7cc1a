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

//! Plays a script against a headless deck on a simulated clock.

use std::cell::RefCell;
use std::fmt::Display;
use std::fmt::Formatter;
use std::path::Path;
use std::rc::Rc;

use clap::ValueEnum;
use serde::Serialize;
use swipedeck_core::animation::FrameDriver;
use swipedeck_core::deck::Deck;
use swipedeck_core::deck::DeckBuilder;
use swipedeck_core::deck::Direction;
use swipedeck_core::deck::Phase;
use swipedeck_core::deck::Release;
use swipedeck_core::error::Fallible;
use swipedeck_core::error::fail;
use swipedeck_core::geometry::Vec2;

use crate::script::DemoItem;
use crate::script::Script;
use crate::script::Step;

/// Simulated time between animation frames.
pub const FRAME_MS: f64 = 16.0;

/// `settle` gives up after this much simulated time.
const SETTLE_LIMIT_MS: f64 = 60_000.0;

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum ReplayFormat {
    /// One line per event.
    Text,
    /// The full trace as a JSON object.
    Json,
}

impl Display for ReplayFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayFormat::Text => write!(f, "text"),
            ReplayFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum TraceEvent {
    /// A script step was fed to the deck.
    Step {
        index: usize,
        step: String,
        accepted: bool,
    },
    /// A drag ended and the deck decided what to do with the card.
    Release { outcome: String },
    Phase { phase: String },
    /// A card left the deck.
    Swipe { direction: Direction, id: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceEntry {
    pub time_ms: f64,
    #[serde(flatten)]
    pub event: TraceEvent,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub active_index: usize,
    pub total: usize,
    pub exhausted: bool,
    pub phase: String,
    /// Id of the card on top, if any.
    pub top: Option<String>,
    pub offset: Vec2,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    pub entries: Vec<TraceEntry>,
    pub summary: Summary,
}

impl Trace {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let line = match &entry.event {
                TraceEvent::Step {
                    index,
                    step,
                    accepted,
                } => {
                    if *accepted {
                        format!("#{index} {step}")
                    } else {
                        format!("#{index} {step} (ignored)")
                    }
                }
                TraceEvent::Release { outcome } => format!("   released: {outcome}"),
                TraceEvent::Phase { phase } => format!("   phase: {phase}"),
                TraceEvent::Swipe { direction, id } => format!("   swiped {direction}: {id}"),
            };
            out.push_str(&format!("[{:>8.1} ms] {line}\n", entry.time_ms));
        }
        let summary = &self.summary;
        match &summary.top {
            Some(top) => out.push_str(&format!(
                "final: card {} of {} ({top}) on top, phase {}\n",
                summary.active_index + 1,
                summary.total,
                summary.phase
            )),
            None => out.push_str(&format!(
                "final: all {} cards swiped, phase {}\n",
                summary.total, summary.phase
            )),
        }
        out
    }
}

type Swipes = Rc<RefCell<Vec<(Direction, String)>>>;

/// A deck driven by a script, with its clock and trace.
pub struct Session<C> {
    deck: Deck<DemoItem, C, FrameDriver>,
    swipes: Swipes,
    now_ms: f64,
    last_phase: Phase,
    entries: Vec<TraceEntry>,
}

impl<C> Session<C> {
    pub fn new(
        script: &Script,
        render_card: impl Fn(&DemoItem) -> C + 'static,
        render_empty: impl Fn() -> C + 'static,
    ) -> Fallible<Self> {
        let swipes: Swipes = Rc::new(RefCell::new(Vec::new()));
        let left = Rc::clone(&swipes);
        let right = Rc::clone(&swipes);
        let deck = DeckBuilder::<DemoItem, C>::new(script.items.clone(), render_card)
            .render_empty(render_empty)
            .config(script.config.clone())
            .on_swipe_left(move |item: &DemoItem| {
                left.borrow_mut().push((Direction::Left, item.id.clone()))
            })
            .on_swipe_right(move |item: &DemoItem| {
                right.borrow_mut().push((Direction::Right, item.id.clone()))
            })
            .build(script.viewport()?, FrameDriver::new())?;
        Ok(Self {
            deck,
            swipes,
            now_ms: 0.0,
            last_phase: Phase::Idle,
            entries: Vec::new(),
        })
    }

    pub fn deck(&self) -> &Deck<DemoItem, C, FrameDriver> {
        &self.deck
    }

    pub fn run(&mut self, steps: &[Step]) -> Fallible<()> {
        for (index, step) in steps.iter().enumerate() {
            self.step(index + 1, *step)?;
        }
        Ok(())
    }

    fn step(&mut self, index: usize, step: Step) -> Fallible<()> {
        log::debug!("Step #{index}: {step}");
        let mut release: Option<Release> = None;
        let accepted = match step {
            Step::Down { x, y } => self.deck.pointer_down(Vec2::new(x, y)),
            Step::Move { x, y } => self.deck.pointer_move(Vec2::new(x, y)),
            Step::Up { x, y } => {
                release = self.deck.pointer_up(Vec2::new(x, y));
                release.is_some()
            }
            Step::Cancel => {
                release = self.deck.pointer_cancel();
                release.is_some()
            }
            Step::Swipe { direction } => self.deck.force_swipe(direction),
            Step::Wait { .. } | Step::Settle => true,
        };
        self.record(TraceEvent::Step {
            index,
            step: step.to_string(),
            accepted,
        });
        if let Some(release) = release {
            let outcome = match release {
                Release::SnapBack => "snap back".to_string(),
                Release::Swipe(direction) => format!("swipe {direction}"),
            };
            self.record(TraceEvent::Release { outcome });
        }
        // An animation started by this step takes the current time as its
        // origin.
        if self.deck.is_animating() {
            self.deck.frame(self.now_ms);
        }
        self.observe();
        match step {
            Step::Wait { ms } => self.advance(ms),
            Step::Settle => self.settle()?,
            _ => {}
        }
        Ok(())
    }

    fn advance(&mut self, ms: f64) {
        let target = self.now_ms + ms.max(0.0);
        while self.now_ms < target {
            self.now_ms = (self.now_ms + FRAME_MS).min(target);
            if self.deck.is_animating() {
                self.deck.frame(self.now_ms);
            }
            self.observe();
        }
    }

    fn settle(&mut self) -> Fallible<()> {
        let limit = self.now_ms + SETTLE_LIMIT_MS;
        while self.deck.is_animating() {
            if self.now_ms >= limit {
                return fail(format!(
                    "deck still {} after {SETTLE_LIMIT_MS}ms",
                    self.deck.phase()
                ));
            }
            self.now_ms += FRAME_MS;
            self.deck.frame(self.now_ms);
            self.observe();
        }
        Ok(())
    }

    /// Records swipes reported by the deck and phase changes since the last
    /// observation.
    fn observe(&mut self) {
        let swipes: Vec<(Direction, String)> = self.swipes.borrow_mut().drain(..).collect();
        for (direction, id) in swipes {
            self.record(TraceEvent::Swipe { direction, id });
        }
        let phase = self.deck.phase();
        if phase != self.last_phase {
            self.last_phase = phase;
            self.record(TraceEvent::Phase {
                phase: phase.to_string(),
            });
        }
    }

    fn record(&mut self, event: TraceEvent) {
        self.entries.push(TraceEntry {
            time_ms: self.now_ms,
            event,
        });
    }

    pub fn trace(&self) -> Trace {
        let deck = &self.deck;
        Trace {
            entries: self.entries.clone(),
            summary: Summary {
                active_index: deck.active_index(),
                total: deck.len(),
                exhausted: deck.is_exhausted(),
                phase: deck.phase().to_string(),
                top: deck.current().map(|item| item.id.clone()),
                offset: deck.offset(),
            },
        }
    }
}

pub fn replay_script(script: &Script) -> Fallible<Trace> {
    let mut session = Session::new(script, |_| (), || ())?;
    session.run(&script.steps)?;
    Ok(session.trace())
}

/// Replays a script, or the bundled demo when no path is given.
pub fn replay(path: Option<String>, format: ReplayFormat) -> Fallible<()> {
    let script = match path {
        Some(path) => Script::load(Path::new(&path))?,
        None => Script::demo()?,
    };
    let trace = replay_script(&script)?;
    match format {
        ReplayFormat::Text => print!("{}", trace.to_text()),
        ReplayFormat::Json => println!("{}", serde_json::to_string_pretty(&trace)?),
    }
    Ok(())
}

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

//! Animation drivers.
//!
//! The deck never touches a clock. It describes the animation it wants with
//! an [`Animation`] and hands it to an [`AnimationDriver`], which reports
//! [`Progress`] either immediately or on subsequent frames.

use crate::easing::Easing;
use crate::geometry::Vec2;
use crate::spring::SpringConfig;
use crate::spring::SpringState;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Curve {
    Spring(SpringConfig),
    Timing { duration_ms: f64, easing: Easing },
}

/// An animation of the card offset from one point to another.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Animation {
    pub from: Vec2,
    pub to: Vec2,
    pub curve: Curve,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Progress {
    /// The animation is running and the value is currently at this point.
    Running(Vec2),
    /// The animation has completed at this point.
    Finished(Vec2),
}

impl Progress {
    pub fn value(&self) -> Vec2 {
        match self {
            Progress::Running(v) | Progress::Finished(v) => *v,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Progress::Finished(_))
    }
}

/// The host's animation capability. At most one animation runs at a time;
/// starting a new one replaces the old.
pub trait AnimationDriver {
    /// Begins an animation. A driver may finish it synchronously by returning
    /// [`Progress::Finished`].
    fn start(&mut self, animation: Animation) -> Progress;

    /// Advances the running animation to `now_ms`. Returns `None` when no
    /// animation is running.
    fn frame(&mut self, now_ms: f64) -> Option<Progress>;

    /// Abandons the running animation, if any.
    fn stop(&mut self);
}

/// Resolves every animation on the spot. Useful for tests and for hosts
/// that do not render intermediate frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateDriver;

impl AnimationDriver for ImmediateDriver {
    fn start(&mut self, animation: Animation) -> Progress {
        Progress::Finished(animation.to)
    }

    fn frame(&mut self, _now_ms: f64) -> Option<Progress> {
        None
    }

    fn stop(&mut self) {}
}

#[derive(Clone, Copy, Debug)]
enum Running {
    Timing {
        from: Vec2,
        to: Vec2,
        duration_ms: f64,
        easing: Easing,
        started_at: Option<f64>,
    },
    Spring {
        state: SpringState,
        last_frame: Option<f64>,
    },
}

/// A driver fed by the host's frame clock (e.g. `requestAnimationFrame`).
/// The first frame after `start` establishes the time origin.
#[derive(Clone, Debug, Default)]
pub struct FrameDriver {
    running: Option<Running>,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

impl AnimationDriver for FrameDriver {
    fn start(&mut self, animation: Animation) -> Progress {
        let Animation { from, to, curve } = animation;
        self.running = Some(match curve {
            Curve::Timing {
                duration_ms,
                easing,
            } => Running::Timing {
                from,
                to,
                duration_ms,
                easing,
                started_at: None,
            },
            Curve::Spring(config) => Running::Spring {
                state: SpringState::new(from, to, config),
                last_frame: None,
            },
        });
        Progress::Running(from)
    }

    fn frame(&mut self, now_ms: f64) -> Option<Progress> {
        let running = self.running.as_mut()?;
        let progress = match running {
            Running::Timing {
                from,
                to,
                duration_ms,
                easing,
                started_at,
            } => {
                let origin = *started_at.get_or_insert(now_ms);
                let elapsed = (now_ms - origin).max(0.0);
                if *duration_ms <= 0.0 || elapsed >= *duration_ms {
                    Progress::Finished(*to)
                } else {
                    let t = easing.apply(elapsed / *duration_ms);
                    Progress::Running(from.lerp(*to, t))
                }
            }
            Running::Spring { state, last_frame } => {
                let previous = last_frame.replace(now_ms).unwrap_or(now_ms);
                if state.advance(now_ms - previous) {
                    Progress::Finished(state.target())
                } else {
                    Progress::Running(state.position)
                }
            }
        };
        if progress.is_finished() {
            self.running = None;
        }
        Some(progress)
    }

    fn stop(&mut self) {
        self.running = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swipe_out() -> Animation {
        Animation {
            from: Vec2::new(150.0, 20.0),
            to: Vec2::new(400.0, 0.0),
            curve: Curve::Timing {
                duration_ms: 250.0,
                easing: Easing::Linear,
            },
        }
    }

    #[test]
    fn test_immediate() {
        let mut driver = ImmediateDriver;
        let progress = driver.start(swipe_out());
        assert_eq!(progress, Progress::Finished(Vec2::new(400.0, 0.0)));
        assert_eq!(driver.frame(16.0), None);
    }

    #[test]
    fn test_timing() {
        let mut driver = FrameDriver::new();
        assert_eq!(driver.start(swipe_out()), Progress::Running(Vec2::new(150.0, 20.0)));
        // The first frame establishes the time origin.
        assert_eq!(driver.frame(1000.0), Some(Progress::Running(Vec2::new(150.0, 20.0))));
        let mid = driver.frame(1125.0).map(|p| p.value());
        assert_eq!(mid, Some(Vec2::new(275.0, 10.0)));
        assert!(driver.is_running());
        assert_eq!(
            driver.frame(1250.0),
            Some(Progress::Finished(Vec2::new(400.0, 0.0)))
        );
        assert!(!driver.is_running());
        assert_eq!(driver.frame(1266.0), None);
    }

    #[test]
    fn test_zero_duration() {
        let mut driver = FrameDriver::new();
        driver.start(Animation {
            curve: Curve::Timing {
                duration_ms: 0.0,
                easing: Easing::Linear,
            },
            ..swipe_out()
        });
        assert_eq!(driver.frame(0.0), Some(Progress::Finished(Vec2::new(400.0, 0.0))));
    }

    #[test]
    fn test_spring() {
        let mut driver = FrameDriver::new();
        driver.start(Animation {
            from: Vec2::new(60.0, -10.0),
            to: Vec2::ZERO,
            curve: Curve::Spring(SpringConfig::default()),
        });
        let mut now = 0.0;
        let mut last = None;
        while let Some(progress) = driver.frame(now) {
            last = Some(progress);
            now += 16.0;
            assert!(now < 10_000.0);
        }
        assert_eq!(last, Some(Progress::Finished(Vec2::ZERO)));
    }

    #[test]
    fn test_stop() {
        let mut driver = FrameDriver::new();
        driver.start(swipe_out());
        driver.stop();
        assert_eq!(driver.frame(0.0), None);
    }
}

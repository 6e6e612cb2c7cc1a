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

use serde::Deserialize;
use serde::Serialize;

use crate::easing::Easing;
use crate::error::Fallible;
use crate::error::fail;
use crate::geometry::Vec2;
use crate::spring::SpringConfig;

/// Tunable behaviour of a deck. Every field has a default, so an empty
/// TOML table or JSON object is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckConfig {
    /// Fraction of the viewport width the card must travel to be swiped.
    pub swipe_threshold: f64,
    pub swipe_out_duration_ms: f64,
    pub swipe_out_easing: Easing,
    /// Spring used to return a card to rest.
    pub spring: SpringConfig,
    /// Rotation in degrees at `rotation_span` viewport widths of offset.
    pub rotation_degrees: f64,
    pub rotation_span: f64,
    /// Offset between consecutive cards below the top one.
    pub cascade_step: Vec2,
    /// How many cards below the top one to render. Unlimited when absent.
    pub max_visible: Option<usize>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 0.25,
            swipe_out_duration_ms: 250.0,
            swipe_out_easing: Easing::Linear,
            spring: SpringConfig::default(),
            rotation_degrees: 120.0,
            rotation_span: 2.0,
            cascade_step: Vec2::new(0.0, 10.0),
            max_visible: None,
        }
    }
}

impl DeckConfig {
    pub fn from_toml(s: &str) -> Fallible<Self> {
        let config: DeckConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(s: &str) -> Fallible<Self> {
        let config: DeckConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Fallible<()> {
        if !(self.swipe_threshold > 0.0 && self.swipe_threshold <= 1.0) {
            return fail(format!(
                "swipe_threshold must be within (0, 1], got {}",
                self.swipe_threshold
            ));
        }
        if !(self.swipe_out_duration_ms.is_finite() && self.swipe_out_duration_ms > 0.0) {
            return fail("swipe_out_duration_ms must be positive");
        }
        if !(self.rotation_span.is_finite() && self.rotation_span > 0.0) {
            return fail("rotation_span must be positive");
        }
        if !self.rotation_degrees.is_finite() {
            return fail("rotation_degrees must be finite");
        }
        if !(self.cascade_step.x.is_finite() && self.cascade_step.y.is_finite()) {
            return fail("cascade_step must be finite");
        }
        self.swipe_out_easing.validate()?;
        self.spring.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() -> Fallible<()> {
        assert_eq!(DeckConfig::from_toml("")?, DeckConfig::default());
        assert_eq!(DeckConfig::from_json("{}")?, DeckConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_toml() -> Fallible<()> {
        let config = DeckConfig::from_toml(
            r#"
            swipe_threshold = 0.4
            swipe_out_easing = "ease-out"
            max_visible = 2

            [cascade_step]
            x = 4
            y = 6

            [spring]
            damping = 30
            "#,
        )?;
        assert_eq!(config.swipe_threshold, 0.4);
        assert_eq!(config.swipe_out_easing, Easing::EaseOut);
        assert_eq!(config.max_visible, Some(2));
        assert_eq!(config.cascade_step, Vec2::new(4.0, 6.0));
        assert_eq!(config.spring.damping, 30.0);
        assert_eq!(config.spring.stiffness, SpringConfig::default().stiffness);
        assert_eq!(config.swipe_out_duration_ms, 250.0);
        Ok(())
    }

    #[test]
    fn test_unknown_field() {
        let err = DeckConfig::from_json(r#"{"swipe_treshold": 0.3}"#).unwrap_err();
        assert!(err.message().contains("swipe_treshold"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(DeckConfig::from_json(r#"{"swipe_threshold": 0.0}"#).is_err());
        assert!(DeckConfig::from_json(r#"{"swipe_threshold": 1.5}"#).is_err());
        assert!(DeckConfig::from_json(r#"{"swipe_out_duration_ms": -5}"#).is_err());
        assert!(DeckConfig::from_json(r#"{"rotation_span": 0}"#).is_err());
        assert!(DeckConfig::from_json(r#"{"spring": {"mass": 0}}"#).is_err());
    }
}

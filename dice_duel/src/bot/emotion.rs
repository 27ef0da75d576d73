//! Continuous emotional state and the discrete mood derived from it.

use super::{analysis::GameStateAnalysis, models::unit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence gained per cycle while leading
const CONFIDENCE_GAIN: f32 = 0.05;

/// Confidence lost per cycle while level or trailing
const CONFIDENCE_LOSS: f32 = 0.03;

/// Fraction of the cycle's pressure that turns into frustration
const FRUSTRATION_RATE: f32 = 0.1;

/// Confidence above this reads as confident
const CONFIDENT_THRESHOLD: f32 = 0.8;

/// Frustration above this reads as frustrated
const FRUSTRATED_THRESHOLD: f32 = 0.7;

/// Pressure above this reads as desperate
const DESPERATE_THRESHOLD: f32 = 0.8;

/// Discrete mood label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Calm,
    Confident,
    Frustrated,
    Desperate,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mood::Calm => write!(f, "calm"),
            Mood::Confident => write!(f, "confident"),
            Mood::Frustrated => write!(f, "frustrated"),
            Mood::Desperate => write!(f, "desperate"),
        }
    }
}

type MoodRule = (fn(&EmotionalState) -> bool, Mood);

/// Mood rules in priority order. The first matching rule wins; no match means calm.
pub const MOOD_RULES: [MoodRule; 3] = [
    (is_confident, Mood::Confident),
    (is_frustrated, Mood::Frustrated),
    (is_desperate, Mood::Desperate),
];

fn is_confident(state: &EmotionalState) -> bool {
    state.confidence > CONFIDENT_THRESHOLD
}

fn is_frustrated(state: &EmotionalState) -> bool {
    state.frustration > FRUSTRATED_THRESHOLD
}

fn is_desperate(state: &EmotionalState) -> bool {
    state.pressure > DESPERATE_THRESHOLD
}

#[derive(Deserialize)]
struct EmotionalStateRecord {
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    frustration: f32,
    #[serde(default)]
    pressure: f32,
    #[serde(default)]
    momentum: f32,
}

/// Emotional state of a bot during one match.
///
/// The mood is always derived from the four continuous fields and cannot be set directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "EmotionalStateRecord")]
pub struct EmotionalState {
    confidence: f32,
    frustration: f32,
    pressure: f32,
    momentum: f32,
    mood: Mood,
}

impl EmotionalState {
    /// Create a state, clamping each field into its range and deriving the mood
    pub fn new(confidence: f32, frustration: f32, pressure: f32, momentum: f32) -> Self {
        let mut state = Self {
            confidence: unit(confidence),
            frustration: unit(frustration),
            pressure: unit(pressure),
            momentum: if momentum.is_nan() {
                0.0
            } else {
                momentum.clamp(-1.0, 1.0)
            },
            mood: Mood::Calm,
        };
        state.mood = state.derive_mood();
        state
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn frustration(&self) -> f32 {
        self.frustration
    }

    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    fn derive_mood(&self) -> Mood {
        MOOD_RULES
            .iter()
            .find(|(applies, _)| applies(self))
            .map(|(_, mood)| *mood)
            .unwrap_or(Mood::Calm)
    }
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self::new(0.5, 0.0, 0.0, 0.0)
    }
}

impl From<EmotionalStateRecord> for EmotionalState {
    fn from(record: EmotionalStateRecord) -> Self {
        Self::new(
            record.confidence,
            record.frustration,
            record.pressure,
            record.momentum,
        )
    }
}

/// Applies one decision cycle's analysis to an emotional state.
///
/// Frustration accumulates and is never decayed within a match.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmotionalStateModel;

impl EmotionalStateModel {
    /// Produce the next state
    pub fn update(state: EmotionalState, analysis: &GameStateAnalysis) -> EmotionalState {
        let confidence = if analysis.snapshot.is_ahead() {
            state.confidence + CONFIDENCE_GAIN
        } else {
            state.confidence - CONFIDENCE_LOSS
        };
        let frustration = state.frustration + analysis.pressure * FRUSTRATION_RATE;

        EmotionalState::new(
            confidence,
            frustration,
            analysis.pressure,
            analysis.momentum,
        )
    }
}

//! Bot behaviour profiles and decision result models.

use super::emotion::EmotionalState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bot identity token
pub type BotId = String;

/// Clamp a trait-like value into `[0, 1]`, mapping NaN to 0.
pub(crate) fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Raw personality record as supplied by the profile store.
///
/// Values outside `[0, 1]` are accepted here and clamped when the record is turned
/// into a [`PersonalityMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityTraits {
    /// Willingness to keep pushing a turn
    pub aggressiveness: f32,

    /// Preference for locking in points
    pub cautiousness: f32,

    /// Appetite for rolling with points at risk
    pub risk_tolerance: f32,

    /// How strongly the bot reacts to what opponents do
    pub adaptability: f32,

    /// Stability of play style over a match
    pub consistency: f32,

    /// Willingness to wait for a better turn
    pub patience: f32,

    /// Baseline self-assurance
    pub confidence_level: f32,

    /// How much trailing raises the appetite to roll
    pub pressure_response: f32,
}

/// Eight personality traits, each clamped to `[0, 1]`.
///
/// Immutable after construction: re-rolling a bot means building a new profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "PersonalityTraits", into = "PersonalityTraits")]
pub struct PersonalityMatrix(PersonalityTraits);

impl PersonalityMatrix {
    /// Create a matrix, clamping every trait into `[0, 1]`
    pub fn new(traits: PersonalityTraits) -> Self {
        Self(PersonalityTraits {
            aggressiveness: unit(traits.aggressiveness),
            cautiousness: unit(traits.cautiousness),
            risk_tolerance: unit(traits.risk_tolerance),
            adaptability: unit(traits.adaptability),
            consistency: unit(traits.consistency),
            patience: unit(traits.patience),
            confidence_level: unit(traits.confidence_level),
            pressure_response: unit(traits.pressure_response),
        })
    }

    /// A matrix with every trait set to the same value
    pub fn uniform(value: f32) -> Self {
        Self::new(PersonalityTraits {
            aggressiveness: value,
            cautiousness: value,
            risk_tolerance: value,
            adaptability: value,
            consistency: value,
            patience: value,
            confidence_level: value,
            pressure_response: value,
        })
    }

    /// Clamped trait values
    pub fn traits(&self) -> &PersonalityTraits {
        &self.0
    }
}

impl From<PersonalityTraits> for PersonalityMatrix {
    fn from(traits: PersonalityTraits) -> Self {
        Self::new(traits)
    }
}

impl From<PersonalityMatrix> for PersonalityTraits {
    fn from(matrix: PersonalityMatrix) -> Self {
        matrix.0
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseConfigRecord {
    error_rate: f32,
    min_response_ms: u64,
    max_response_ms: u64,
}

/// Error injection and pacing configuration for one bot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ResponseConfigRecord")]
pub struct ResponseConfig {
    error_rate: f32,
    min_response_ms: u64,
    max_response_ms: u64,
}

impl ResponseConfig {
    /// Create a response config.
    ///
    /// `error_rate` is clamped to `[0, 1]`; an inverted delay window collapses to
    /// `min_response_ms`.
    pub fn new(error_rate: f32, min_response_ms: u64, max_response_ms: u64) -> Self {
        Self {
            error_rate: unit(error_rate),
            min_response_ms,
            max_response_ms: max_response_ms.max(min_response_ms),
        }
    }

    /// Probability that a decision is considered for a deliberate mistake
    pub fn error_rate(&self) -> f32 {
        self.error_rate
    }

    /// Lower bound of the base delay window
    pub fn min_response_ms(&self) -> u64 {
        self.min_response_ms
    }

    /// Upper bound of the base delay window
    pub fn max_response_ms(&self) -> u64 {
        self.max_response_ms
    }
}

impl From<ResponseConfigRecord> for ResponseConfig {
    fn from(record: ResponseConfigRecord) -> Self {
        Self::new(
            record.error_rate,
            record.min_response_ms,
            record.max_response_ms,
        )
    }
}

/// Temperament presets for quickly spawning bots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperament {
    Cautious, // Banks early, careful pacing
    Balanced, // Middle-of-the-road traits
    Reckless, // Pushes its luck, reacts hard to pressure
}

impl fmt::Display for Temperament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temperament::Cautious => write!(f, "cautious"),
            Temperament::Balanced => write!(f, "balanced"),
            Temperament::Reckless => write!(f, "reckless"),
        }
    }
}

impl std::str::FromStr for Temperament {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cautious" => Ok(Temperament::Cautious),
            "balanced" => Ok(Temperament::Balanced),
            "reckless" => Ok(Temperament::Reckless),
            other => Err(format!("unknown temperament '{other}'")),
        }
    }
}

/// Immutable behaviour profile for one bot, supplied by the profile store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotBehaviorProfile {
    /// Bot identity token
    pub id: BotId,

    /// Personality traits
    pub personality: PersonalityMatrix,

    /// Emotional state the bot starts every match with
    #[serde(default)]
    pub baseline: EmotionalState,

    /// Error injection and pacing
    pub response: ResponseConfig,
}

impl BotBehaviorProfile {
    /// Create a profile from its parts
    pub fn new(
        id: impl Into<BotId>,
        personality: PersonalityMatrix,
        baseline: EmotionalState,
        response: ResponseConfig,
    ) -> Self {
        Self {
            id: id.into(),
            personality,
            baseline,
            response,
        }
    }

    /// Build a profile from a temperament preset
    pub fn preset(id: impl Into<BotId>, temperament: Temperament) -> Self {
        let (traits, baseline, response) = match temperament {
            Temperament::Cautious => (
                PersonalityTraits {
                    aggressiveness: 0.25,
                    cautiousness: 0.80,
                    risk_tolerance: 0.35,
                    adaptability: 0.50,
                    consistency: 0.80,
                    patience: 0.80,
                    confidence_level: 0.50,
                    pressure_response: 0.30,
                },
                EmotionalState::new(0.5, 0.0, 0.0, 0.0),
                ResponseConfig::new(0.05, 1200, 3000),
            ),
            Temperament::Balanced => (
                PersonalityTraits {
                    aggressiveness: 0.50,
                    cautiousness: 0.50,
                    risk_tolerance: 0.60,
                    adaptability: 0.60,
                    consistency: 0.60,
                    patience: 0.50,
                    confidence_level: 0.60,
                    pressure_response: 0.50,
                },
                EmotionalState::new(0.6, 0.0, 0.0, 0.0),
                ResponseConfig::new(0.10, 800, 2500),
            ),
            Temperament::Reckless => (
                PersonalityTraits {
                    aggressiveness: 0.85,
                    cautiousness: 0.20,
                    risk_tolerance: 0.90,
                    adaptability: 0.40,
                    consistency: 0.30,
                    patience: 0.20,
                    confidence_level: 0.75,
                    pressure_response: 0.80,
                },
                EmotionalState::new(0.7, 0.0, 0.0, 0.0),
                ResponseConfig::new(0.15, 500, 1800),
            ),
        };

        Self::new(id, PersonalityMatrix::new(traits), baseline, response)
    }
}

/// Type of a decision result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Roll,
    Bank,
    BankDecision,
    TurnAction,
    GameStart,
    Pass,
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            DecisionKind::Roll => "roll",
            DecisionKind::Bank => "bank",
            DecisionKind::BankDecision => "bank_decision",
            DecisionKind::TurnAction => "turn_action",
            DecisionKind::GameStart => "game_start",
            DecisionKind::Pass => "pass",
        };
        write!(f, "{repr}")
    }
}

/// Concrete move carried by a roll, bank or turn action decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayAction {
    Roll,
    Bank,
}

impl PlayAction {
    /// The other move
    pub fn flipped(self) -> Self {
        match self {
            PlayAction::Roll => PlayAction::Bank,
            PlayAction::Bank => PlayAction::Roll,
        }
    }
}

/// Action-specific payload of a decision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionPayload {
    /// Move chosen by a turn action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<PlayAction>,

    /// Probability the policy computed for the chosen branch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f32>,

    /// Answer to a bank decision query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_bank: Option<bool>,

    /// Turn score at stake (banked when the move is a bank)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_score: Option<i64>,

    /// Readiness flag for game start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,

    /// Set when the modulator flipped the policy's choice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flipped: Option<bool>,
}

/// A play decision together with its advisory response delay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResult {
    /// Decision type
    #[serde(rename = "type")]
    pub kind: DecisionKind,

    /// Confidence in `[0, 1]`
    pub confidence: f32,

    /// Human-readable flavour text
    pub reasoning: String,

    /// Action-specific payload
    pub data: DecisionPayload,

    /// Delay the caller should wait before sending the reply
    pub delay_ms: u64,
}

impl DecisionResult {
    /// Create a decision with no delay applied yet
    pub fn new(
        kind: DecisionKind,
        confidence: f32,
        reasoning: impl Into<String>,
        data: DecisionPayload,
    ) -> Self {
        Self {
            kind,
            confidence: unit(confidence),
            reasoning: reasoning.into(),
            data,
            delay_ms: 0,
        }
    }

    /// Decision returned once the match is over
    pub fn pass() -> Self {
        Self::new(
            DecisionKind::Pass,
            1.0,
            "The game is over",
            DecisionPayload::default(),
        )
    }

    /// The concrete move this decision stands for, if any.
    ///
    /// A bank decision stands for a bank when it answers `should_bank: true`.
    pub fn play_action(&self) -> Option<PlayAction> {
        match self.kind {
            DecisionKind::Roll => Some(PlayAction::Roll),
            DecisionKind::Bank => Some(PlayAction::Bank),
            DecisionKind::TurnAction => self.data.action,
            DecisionKind::BankDecision => self.data.should_bank.map(|bank| {
                if bank {
                    PlayAction::Bank
                } else {
                    PlayAction::Roll
                }
            }),
            _ => None,
        }
    }
}

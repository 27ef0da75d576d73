//! Human-like error injection and response pacing.

use super::{
    emotion::Mood,
    models::{BotBehaviorProfile, DecisionKind, DecisionResult, PlayAction, unit},
};
use rand::Rng;

/// Reasoning attached when a roll is second-guessed into a bank
const ROLL_TO_BANK_REASONING: &str = "On second thought, better lock it in";

/// Reasoning attached when a bank is second-guessed into a roll
const BANK_TO_ROLL_REASONING: &str = "Ah, what the heck, one more roll";

/// Configuration for mistake injection and delay shaping
#[derive(Debug, Clone, PartialEq)]
pub struct HumanlikeConfig {
    /// Chance a roll turns into a bank once a mistake is considered.
    ///
    /// **Range**: 0.1-0.5 (typical: 0.3)
    pub roll_to_bank_probability: f32,

    /// Chance a bank turns into a roll once a mistake is considered.
    ///
    /// **Range**: 0.1-0.4 (typical: 0.2)
    pub bank_to_roll_probability: f32,

    /// Confidence multiplier for a roll flipped into a bank (typical: 0.7)
    pub roll_to_bank_confidence_factor: f32,

    /// Confidence multiplier for a bank flipped into a roll (typical: 0.6)
    pub bank_to_roll_confidence_factor: f32,

    /// Delay multiplier while frustrated (typical: 0.8, snappier)
    pub frustrated_delay_factor: f64,

    /// Delay multiplier while confident (typical: 1.2, relaxed)
    pub confident_delay_factor: f64,

    /// Decisions below this confidence take longer.
    ///
    /// **Range**: 0.5-0.8 (typical: 0.7)
    pub uncertain_confidence: f32,

    /// Delay multiplier for uncertain decisions (typical: 1.5)
    pub uncertain_delay_factor: f64,
}

impl Default for HumanlikeConfig {
    fn default() -> Self {
        Self {
            roll_to_bank_probability: 0.3,
            bank_to_roll_probability: 0.2,
            roll_to_bank_confidence_factor: 0.7,
            bank_to_roll_confidence_factor: 0.6,
            frustrated_delay_factor: 0.8,
            confident_delay_factor: 1.2,
            uncertain_confidence: 0.7,
            uncertain_delay_factor: 1.5,
        }
    }
}

/// Applies deliberate mistakes and human-like delays to policy decisions
#[derive(Debug, Clone, Default)]
pub struct HumanlikeModulator {
    config: HumanlikeConfig,
}

impl HumanlikeModulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HumanlikeConfig) -> Self {
        Self { config }
    }

    /// Modulate a decision
    ///
    /// # Arguments
    ///
    /// * `decision` - Decision produced by the policy
    /// * `profile` - Bot profile (error rate and delay window)
    /// * `mood` - Current mood of the bot
    /// * `rng` - Random source for mistakes and delay jitter
    ///
    /// # Returns
    ///
    /// * `DecisionResult` - Possibly flipped decision with `delay_ms` set
    pub fn modulate<R: Rng + ?Sized>(
        &self,
        mut decision: DecisionResult,
        profile: &BotBehaviorProfile,
        mood: Mood,
        rng: &mut R,
    ) -> DecisionResult {
        if let Some(action) = decision.play_action() {
            if rng.random_bool(f64::from(profile.response.error_rate())) {
                self.maybe_flip(&mut decision, action, rng);
            }
        }

        decision.delay_ms = self.delay_ms(&decision, profile, mood, rng);
        decision
    }

    fn maybe_flip<R: Rng + ?Sized>(
        &self,
        decision: &mut DecisionResult,
        action: PlayAction,
        rng: &mut R,
    ) {
        let (probability, factor, reasoning) = match action {
            PlayAction::Roll => (
                self.config.roll_to_bank_probability,
                self.config.roll_to_bank_confidence_factor,
                ROLL_TO_BANK_REASONING,
            ),
            PlayAction::Bank => (
                self.config.bank_to_roll_probability,
                self.config.bank_to_roll_confidence_factor,
                BANK_TO_ROLL_REASONING,
            ),
        };

        if !rng.random_bool(f64::from(unit(probability))) {
            return;
        }

        let flipped = action.flipped();
        match decision.kind {
            DecisionKind::TurnAction => decision.data.action = Some(flipped),
            DecisionKind::BankDecision => {
                decision.data.should_bank = Some(flipped == PlayAction::Bank)
            }
            _ => {
                decision.kind = match flipped {
                    PlayAction::Roll => DecisionKind::Roll,
                    PlayAction::Bank => DecisionKind::Bank,
                }
            }
        }

        decision.confidence = unit(decision.confidence * factor);
        decision.reasoning = reasoning.to_string();
        decision.data.flipped = Some(true);
    }

    /// Base delay drawn once from the profile window, then scaled by mood and certainty
    fn delay_ms<R: Rng + ?Sized>(
        &self,
        decision: &DecisionResult,
        profile: &BotBehaviorProfile,
        mood: Mood,
        rng: &mut R,
    ) -> u64 {
        let min = profile.response.min_response_ms();
        let span = profile.response.max_response_ms().saturating_sub(min);
        let base = min.saturating_add(rng.random_range(0..=span));

        let mut factor = match mood {
            Mood::Frustrated => self.config.frustrated_delay_factor,
            Mood::Confident => self.config.confident_delay_factor,
            _ => 1.0,
        };
        if decision.confidence < self.config.uncertain_confidence {
            factor *= self.config.uncertain_delay_factor;
        }

        (base as f64 * factor).round() as u64
    }
}

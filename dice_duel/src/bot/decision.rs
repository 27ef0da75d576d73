//! Bot decision-making logic driven by personality, game state and mood.

use super::{
    analysis::GameStateAnalysis,
    emotion::{EmotionalState, Mood},
    errors::EngineError,
    memory::AdaptiveMemory,
    models::{DecisionKind, DecisionPayload, DecisionResult, PersonalityMatrix, PlayAction, unit},
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

// === Reasoning Pools ===
// Flavour text only; the chosen string never influences the action.

/// Reasons given when the bot keeps rolling
const ROLL_REASONS: [&str; 5] = [
    "Feeling lucky, let's keep going",
    "The dice are warm, one more",
    "Not enough on the table yet",
    "Worth the risk",
    "Pushing for a bigger turn",
];

/// Reasons given when the bot banks
const BANK_REASONS: [&str; 5] = [
    "Time to lock it in",
    "Not worth the risk",
    "A solid turn, I'll take it",
    "Playing it safe",
    "Banking before the dice turn cold",
];

/// Reasoning for the game start handshake
const GAME_START_REASONING: &str = "Ready to play!";

/// Kinds of decision the policy can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    DiceRoll,
    BankDecision,
    TurnAction,
    GameStart,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            ActionKind::DiceRoll => "dice_roll",
            ActionKind::BankDecision => "bank_decision",
            ActionKind::TurnAction => "turn_action",
            ActionKind::GameStart => "game_start",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for ActionKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dice_roll" => Ok(ActionKind::DiceRoll),
            "bank_decision" => Ok(ActionKind::BankDecision),
            "turn_action" => Ok(ActionKind::TurnAction),
            "game_start" => Ok(ActionKind::GameStart),
            other => Err(EngineError::UnknownActionKind(other.to_string())),
        }
    }
}

/// Configuration for bot decision-making thresholds and weights.
///
/// All probabilities are floats in range [0.0, 1.0]. The roll and bank thresholds are
/// separate fields and are tuned independently.
///
/// # Examples
///
/// ```
/// use dice_duel::bot::decision::BotDecisionConfig;
///
/// let config = BotDecisionConfig::default();
/// assert_eq!(config.roll_threshold, 0.5);
/// assert_eq!(config.bank_threshold, 0.6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BotDecisionConfig {
    /// Roll probability above this = roll (dice roll decisions).
    ///
    /// **Range**: 0.4-0.6 (typical: 0.5)
    /// **Lower** = bots keep rolling more often
    pub roll_threshold: f32,

    /// Bank probability above this = bank (bank decisions).
    ///
    /// **Range**: 0.5-0.7 (typical: 0.6)
    /// **Higher** = bots need a clearer reason to bank
    pub bank_threshold: f32,

    /// Starting point of the roll probability before any factor.
    ///
    /// **Range**: 0.3-0.7 (typical: 0.5)
    pub base_roll_probability: f32,

    /// Turn score at which the turn-score multiplier reaches its floor.
    ///
    /// **Range**: 50-200 (typical: 100)
    /// **Effect**: multiplier = max(floor, 1 - turn_score / scale)
    pub turn_score_scale: f32,

    /// Floor of the turn-score multiplier.
    ///
    /// **Range**: 0.0-0.3 (typical: 0.1)
    /// **Effect**: even huge turns keep a sliver of roll appetite
    pub min_turn_score_multiplier: f32,

    /// Weight of emotional confidence on the roll probability.
    ///
    /// **Range**: 0.0-0.5 (typical: 0.2)
    pub confidence_roll_weight: f32,

    /// Weight of frustration against the roll probability.
    ///
    /// **Range**: 0.0-0.5 (typical: 0.3)
    pub frustration_roll_weight: f32,

    /// Weight of the observed opponent bias, scaled by adaptability.
    ///
    /// **Range**: 0.0-0.3 (typical: 0.1)
    /// **Effect**: 0.1 = a fully adaptive bot shifts roll appetite by at most 10%
    pub adaptive_bias_weight: f32,

    /// Weight of the bot's own roll/bank habit, scaled by consistency.
    ///
    /// **Range**: 0.0-0.3 (typical: 0.1)
    /// **Effect**: a fully consistent bot after ten straight rolls rolls 10% more readily
    pub habit_weight: f32,

    /// Starting point of the bank probability.
    ///
    /// **Range**: 0.2-0.6 (typical: 0.4)
    pub base_bank_probability: f32,

    /// Turn score above which a turn counts as big.
    ///
    /// **Range**: 40-80 (typical: 50)
    pub big_turn_score: i64,

    /// Bank bonus for a big turn.
    ///
    /// **Range**: 0.2-0.4 (typical: 0.3)
    pub big_turn_bonus: f32,

    /// Turn score above which a turn counts as decent.
    ///
    /// **Range**: 20-40 (typical: 30)
    pub medium_turn_score: i64,

    /// Bank bonus for a decent turn.
    ///
    /// **Range**: 0.1-0.3 (typical: 0.2)
    pub medium_turn_bonus: f32,

    /// Bank penalty while trailing (trailing bots need points).
    ///
    /// **Range**: 0.1-0.3 (typical: 0.2)
    pub behind_bank_penalty: f32,

    /// Lead above which banking becomes attractive.
    ///
    /// **Range**: 30-100 (typical: 50)
    pub comfortable_lead: i64,

    /// Bank bonus while comfortably ahead.
    ///
    /// **Range**: 0.1-0.3 (typical: 0.2)
    pub lead_bank_bonus: f32,

    /// Weight of cautiousness towards banking.
    ///
    /// **Range**: 0.1-0.5 (typical: 0.3)
    pub cautiousness_bank_weight: f32,

    /// Weight of aggressiveness against banking.
    ///
    /// **Range**: 0.1-0.4 (typical: 0.2)
    pub aggressiveness_bank_weight: f32,

    /// Bank penalty while frustrated (frustrated bots chase).
    ///
    /// **Range**: 0.1-0.3 (typical: 0.2)
    pub frustrated_bank_penalty: f32,

    /// Bank bonus while confident.
    ///
    /// **Range**: 0.0-0.2 (typical: 0.1)
    pub confident_bank_bonus: f32,
}

impl Default for BotDecisionConfig {
    fn default() -> Self {
        Self {
            // Thresholds
            roll_threshold: 0.5,
            bank_threshold: 0.6,
            // Roll probability
            base_roll_probability: 0.5,
            turn_score_scale: 100.0,
            min_turn_score_multiplier: 0.1,
            confidence_roll_weight: 0.2,
            frustration_roll_weight: 0.3,
            adaptive_bias_weight: 0.1,
            habit_weight: 0.1,
            // Bank probability
            base_bank_probability: 0.4,
            big_turn_score: 50,
            big_turn_bonus: 0.3,
            medium_turn_score: 30,
            medium_turn_bonus: 0.2,
            behind_bank_penalty: 0.2,
            comfortable_lead: 50,
            lead_bank_bonus: 0.2,
            cautiousness_bank_weight: 0.3,
            aggressiveness_bank_weight: 0.2,
            frustrated_bank_penalty: 0.2,
            confident_bank_bonus: 0.1,
        }
    }
}

/// Everything the policy looks at for one decision
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    /// Derived features of the current snapshot
    pub analysis: &'a GameStateAnalysis,

    /// Emotional state after this cycle's update
    pub state: &'a EmotionalState,

    /// Bot personality
    pub personality: &'a PersonalityMatrix,

    /// Match memory, read-only during the decision
    pub memory: &'a AdaptiveMemory,
}

/// Bot decision policy
#[derive(Debug, Clone, Default)]
pub struct DecisionPolicy {
    config: BotDecisionConfig,
}

impl DecisionPolicy {
    /// Create a policy with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy with custom config
    pub fn with_config(config: BotDecisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BotDecisionConfig {
        &self.config
    }

    /// Decide for the requested action kind
    ///
    /// # Arguments
    ///
    /// * `action` - Kind of decision requested
    /// * `ctx` - Analysis, emotional state, personality and memory
    /// * `rng` - Random source (only used to pick reasoning text)
    ///
    /// # Returns
    ///
    /// * `DecisionResult` - The decision, without a delay applied
    pub fn decide<R: Rng + ?Sized>(
        &self,
        action: ActionKind,
        ctx: &DecisionContext,
        rng: &mut R,
    ) -> DecisionResult {
        match action {
            ActionKind::DiceRoll => self.roll_branch(ctx, rng),
            ActionKind::BankDecision => self.bank_branch(ctx, rng),
            ActionKind::TurnAction => self.turn_action(ctx, rng),
            ActionKind::GameStart => DecisionResult::new(
                DecisionKind::GameStart,
                1.0,
                GAME_START_REASONING,
                DecisionPayload {
                    ready: Some(true),
                    ..Default::default()
                },
            ),
        }
    }

    /// Probability of rolling again
    pub fn roll_probability(&self, ctx: &DecisionContext) -> f32 {
        let cfg = &self.config;
        let traits = ctx.personality.traits();
        let turn_score = ctx.analysis.snapshot.turn_score as f32;

        // Diminishing appetite as stakes grow
        let turn_multiplier =
            (1.0 - turn_score / cfg.turn_score_scale).max(cfg.min_turn_score_multiplier);
        let pressure_multiplier = 1.0 + ctx.analysis.pressure * traits.pressure_response;

        let mut probability = cfg.base_roll_probability
            * turn_multiplier
            * pressure_multiplier
            * traits.risk_tolerance
            * (2.0 - traits.cautiousness);

        probability *= 1.0 + cfg.confidence_roll_weight * ctx.state.confidence()
            - cfg.frustration_roll_weight * ctx.state.frustration();

        probability *=
            1.0 + cfg.adaptive_bias_weight * traits.adaptability * ctx.memory.opponent_bias();
        probability *= 1.0 + cfg.habit_weight * traits.consistency * ctx.memory.habit();

        unit(probability)
    }

    /// Probability of banking the current turn
    pub fn bank_probability(&self, ctx: &DecisionContext) -> f32 {
        let cfg = &self.config;
        let traits = ctx.personality.traits();
        let snapshot = &ctx.analysis.snapshot;

        let mut probability = cfg.base_bank_probability;

        if snapshot.turn_score > cfg.big_turn_score {
            probability += cfg.big_turn_bonus;
        } else if snapshot.turn_score > cfg.medium_turn_score {
            probability += cfg.medium_turn_bonus;
        }

        if snapshot.is_behind() {
            probability -= cfg.behind_bank_penalty;
        } else if snapshot.lead() > cfg.comfortable_lead {
            probability += cfg.lead_bank_bonus;
        }

        probability += traits.cautiousness * cfg.cautiousness_bank_weight
            - traits.aggressiveness * cfg.aggressiveness_bank_weight;

        match ctx.state.mood() {
            Mood::Frustrated => probability -= cfg.frustrated_bank_penalty,
            Mood::Confident => probability += cfg.confident_bank_bonus,
            _ => {}
        }

        unit(probability)
    }

    /// Roll-or-bank from the roll probability
    fn roll_branch<R: Rng + ?Sized>(&self, ctx: &DecisionContext, rng: &mut R) -> DecisionResult {
        let probability = self.roll_probability(ctx);

        if probability > self.config.roll_threshold {
            DecisionResult::new(
                DecisionKind::Roll,
                probability,
                pick_reason(&ROLL_REASONS, rng),
                DecisionPayload {
                    probability: Some(probability),
                    turn_score: Some(ctx.analysis.snapshot.turn_score),
                    ..Default::default()
                },
            )
        } else {
            DecisionResult::new(
                DecisionKind::Bank,
                1.0 - probability,
                pick_reason(&BANK_REASONS, rng),
                DecisionPayload {
                    probability: Some(probability),
                    turn_score: Some(ctx.analysis.snapshot.turn_score),
                    ..Default::default()
                },
            )
        }
    }

    /// Answer to "should I bank now?"
    fn bank_branch<R: Rng + ?Sized>(&self, ctx: &DecisionContext, rng: &mut R) -> DecisionResult {
        let probability = self.bank_probability(ctx);
        let should_bank = probability > self.config.bank_threshold;

        let (confidence, reasoning) = if should_bank {
            (probability, pick_reason(&BANK_REASONS, rng))
        } else {
            (1.0 - probability, pick_reason(&ROLL_REASONS, rng))
        };

        DecisionResult::new(
            DecisionKind::BankDecision,
            confidence,
            reasoning,
            DecisionPayload {
                probability: Some(probability),
                should_bank: Some(should_bank),
                turn_score: Some(ctx.analysis.snapshot.turn_score),
                ..Default::default()
            },
        )
    }

    /// Evaluate both branches and keep the more confident move
    fn turn_action<R: Rng + ?Sized>(&self, ctx: &DecisionContext, rng: &mut R) -> DecisionResult {
        let roll_candidate = self.roll_branch(ctx, rng);
        let bank_candidate = self.bank_branch(ctx, rng);

        let bank_move = if bank_candidate.data.should_bank == Some(true) {
            PlayAction::Bank
        } else {
            PlayAction::Roll
        };
        let roll_move = roll_candidate.play_action().unwrap_or(PlayAction::Roll);

        let (chosen, action) =
            more_confident((roll_candidate, roll_move), (bank_candidate, bank_move));

        DecisionResult::new(
            DecisionKind::TurnAction,
            chosen.confidence,
            chosen.reasoning,
            DecisionPayload {
                action: Some(action),
                probability: chosen.data.probability,
                turn_score: Some(ctx.analysis.snapshot.turn_score),
                ..Default::default()
            },
        )
    }
}

/// Keep the candidate with higher confidence; ties go to the first one.
fn more_confident<T>(
    first: (DecisionResult, T),
    second: (DecisionResult, T),
) -> (DecisionResult, T) {
    if second.0.confidence > first.0.confidence {
        second
    } else {
        first
    }
}

fn pick_reason<R: Rng + ?Sized>(pool: &[&'static str], rng: &mut R) -> &'static str {
    pool[rng.random_range(0..pool.len())]
}

//! Per-match bot engine owning all mutable decision state.

use super::{
    analysis::{GameStateAnalyzer, GameStateSnapshot},
    decision::{ActionKind, DecisionContext, DecisionPolicy},
    emotion::{EmotionalState, EmotionalStateModel},
    memory::AdaptiveMemory,
    models::{BotBehaviorProfile, DecisionResult},
    modulator::HumanlikeModulator,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::Arc;

/// Decision engine for one (bot, match) pairing.
///
/// Created when the bot joins a match and dropped when the match ends. Emotional state
/// and memory live exactly as long as the engine. Not meant to be shared: one decision
/// cycle must finish before the next message for the same bot is handled.
pub struct BotEngine<R = StdRng> {
    /// Immutable behaviour profile
    profile: Arc<BotBehaviorProfile>,

    /// Emotional state, starting from the profile baseline
    state: EmotionalState,

    /// Own and opponent history for this match
    memory: AdaptiveMemory,

    /// Roll/bank policy
    policy: DecisionPolicy,

    /// Mistakes and pacing
    modulator: HumanlikeModulator,

    /// Random source for reasoning text, mistakes and delays
    rng: R,

    /// Set once the match has ended
    finished: bool,
}

impl BotEngine<StdRng> {
    /// Create an engine seeded from the operating system
    pub fn new(profile: Arc<BotBehaviorProfile>) -> Self {
        Self::with_rng(profile, StdRng::from_os_rng())
    }

    /// Create an engine with a fixed seed (replayable decision cycles)
    pub fn with_seed(profile: Arc<BotBehaviorProfile>, seed: u64) -> Self {
        Self::with_rng(profile, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> BotEngine<R> {
    /// Create an engine with an injected random source
    pub fn with_rng(profile: Arc<BotBehaviorProfile>, rng: R) -> Self {
        Self::with_parts(
            profile,
            DecisionPolicy::new(),
            HumanlikeModulator::new(),
            rng,
        )
    }

    /// Create an engine with custom policy and modulator configuration
    pub fn with_parts(
        profile: Arc<BotBehaviorProfile>,
        policy: DecisionPolicy,
        modulator: HumanlikeModulator,
        rng: R,
    ) -> Self {
        log::debug!(
            "Engine created for bot {} (baseline mood {})",
            profile.id,
            profile.baseline.mood()
        );

        Self {
            state: profile.baseline,
            profile,
            memory: AdaptiveMemory::new(),
            policy,
            modulator,
            rng,
            finished: false,
        }
    }

    /// Bot this engine plays for
    pub fn bot_id(&self) -> &str {
        &self.profile.id
    }

    pub fn profile(&self) -> &BotBehaviorProfile {
        &self.profile
    }

    /// Current emotional state
    pub fn emotional_state(&self) -> &EmotionalState {
        &self.state
    }

    /// Match memory
    pub fn memory(&self) -> &AdaptiveMemory {
        &self.memory
    }

    /// Whether the match has ended for this engine
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Run one full decision cycle
    ///
    /// Analyzes the snapshot, updates the emotional state, asks the policy, applies
    /// human-like modulation and records the outcome in memory. Game start handshakes
    /// skip the emotional update and modulation. A finished engine answers with a
    /// pass and leaves its state alone.
    ///
    /// # Arguments
    ///
    /// * `action` - Kind of decision requested
    /// * `snapshot` - Current score snapshot
    ///
    /// # Returns
    ///
    /// * `DecisionResult` - Decision with its advisory delay
    pub fn decide(&mut self, action: ActionKind, snapshot: &GameStateSnapshot) -> DecisionResult {
        if self.finished {
            log::debug!("Bot {}: match over, passing on {}", self.profile.id, action);
            return DecisionResult::pass();
        }

        let analysis = GameStateAnalyzer::analyze(snapshot);
        if action != ActionKind::GameStart {
            self.state = EmotionalStateModel::update(self.state, &analysis);
        }

        let ctx = DecisionContext {
            analysis: &analysis,
            state: &self.state,
            personality: &self.profile.personality,
            memory: &self.memory,
        };
        let decision = self.policy.decide(action, &ctx, &mut self.rng);

        let decision = if action == ActionKind::GameStart {
            decision
        } else {
            self.modulator
                .modulate(decision, &self.profile, self.state.mood(), &mut self.rng)
        };

        self.memory.record_own(decision.kind);

        log::debug!(
            "Bot {}: {} -> {} (confidence {:.2}, mood {}, delay {}ms)",
            self.profile.id,
            action,
            decision.kind,
            decision.confidence,
            self.state.mood(),
            decision.delay_ms
        );

        decision
    }

    /// Remember an opponent's bank
    pub(crate) fn observe_opponent_bank(&mut self, opponent: &str, banked_score: i64) {
        self.memory.record_opponent_bank(opponent, banked_score);

        if let Some(summary) = self.memory.opponent(opponent) {
            log::debug!(
                "Bot {}: {} banked {} (mean {:.1}, best {}, over {} banks)",
                self.profile.id,
                opponent,
                banked_score,
                summary.mean_bank(),
                summary.max_banked,
                summary.banks
            );
        }
    }

    /// Mark the match as over
    pub(crate) fn finish(&mut self) {
        self.finished = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::{
        analysis::GamePhase,
        emotion::Mood,
        models::{DecisionKind, PersonalityMatrix, ResponseConfig, Temperament},
    };

    fn quiet_profile() -> Arc<BotBehaviorProfile> {
        Arc::new(BotBehaviorProfile::new(
            "quiet",
            PersonalityMatrix::uniform(0.5),
            EmotionalState::new(0.5, 0.0, 0.0, 0.0),
            ResponseConfig::new(0.0, 100, 100),
        ))
    }

    fn snapshot(current: i64, opponent: i64, turn: i64) -> GameStateSnapshot {
        GameStateSnapshot {
            current_score: current,
            opponent_score: opponent,
            turn_score: turn,
            remaining_turns: 4,
            game_phase: GamePhase::Late,
        }
    }

    #[test]
    fn test_engine_starts_from_baseline() {
        let profile = Arc::new(BotBehaviorProfile::preset("r", Temperament::Reckless));
        let engine = BotEngine::with_seed(profile.clone(), 1);

        assert_eq!(engine.emotional_state(), &profile.baseline);
        assert!(engine.memory().is_empty());
        assert!(!engine.is_finished());
        assert_eq!(engine.bot_id(), "r");
    }

    #[test]
    fn test_decide_updates_state_and_memory() {
        let mut engine = BotEngine::with_seed(quiet_profile(), 2);

        let decision = engine.decide(ActionKind::DiceRoll, &snapshot(50, 100, 80));
        assert_eq!(decision.kind, DecisionKind::Bank);
        // 100ms window, confident enough to skip the uncertainty factor
        assert_eq!(decision.delay_ms, 100);

        let state = engine.emotional_state();
        assert!((state.confidence() - 0.47).abs() < 1e-6);
        assert!((state.pressure() - 0.375).abs() < 1e-6);
        assert_eq!(engine.memory().last_action(), Some(DecisionKind::Bank));
    }

    #[test]
    fn test_own_banking_habit_feeds_later_decisions() {
        let mut engine = BotEngine::with_seed(quiet_profile(), 6);
        assert_eq!(engine.memory().habit(), 0.0);

        for _ in 0..4 {
            engine.decide(ActionKind::DiceRoll, &snapshot(50, 100, 80));
        }
        // Trailing big turns bank every time, so the habit leans towards banking
        assert_eq!(engine.memory().streak(), 4);
        assert!((engine.memory().habit() + 3.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_game_start_leaves_emotions_alone() {
        let mut engine = BotEngine::with_seed(quiet_profile(), 3);
        let before = *engine.emotional_state();

        let decision = engine.decide(ActionKind::GameStart, &GameStateSnapshot::default());
        assert_eq!(decision.kind, DecisionKind::GameStart);
        assert_eq!(decision.delay_ms, 0);
        assert_eq!(engine.emotional_state(), &before);
    }

    #[test]
    fn test_finished_engine_passes() {
        let mut engine = BotEngine::with_seed(quiet_profile(), 4);
        engine.finish();
        let before = *engine.emotional_state();

        let decision = engine.decide(ActionKind::DiceRoll, &snapshot(0, 300, 10));
        assert_eq!(decision.kind, DecisionKind::Pass);
        assert_eq!(decision.delay_ms, 0);
        assert_eq!(engine.emotional_state(), &before);
        assert!(engine.memory().is_empty());
    }

    #[test]
    fn test_long_losing_match_frustrates_and_speeds_up() {
        let mut engine = BotEngine::with_seed(quiet_profile(), 5);

        for _ in 0..12 {
            engine.decide(ActionKind::DiceRoll, &snapshot(0, 400, 20));
        }
        assert_eq!(engine.emotional_state().mood(), Mood::Frustrated);

        let decision = engine.decide(ActionKind::DiceRoll, &snapshot(0, 400, 20));
        // Frustrated bots answer faster; uncertain ones slower
        let expected = if decision.confidence < 0.7 { 120 } else { 80 };
        assert_eq!(decision.delay_ms, expected);
        assert_eq!(engine.memory().len(), 10);
    }

    #[test]
    fn test_same_seed_replays_identically() {
        let play = |seed| {
            let profile = Arc::new(BotBehaviorProfile::preset("b", Temperament::Balanced));
            let mut engine = BotEngine::with_seed(profile, seed);
            (0..30)
                .map(|i| engine.decide(ActionKind::TurnAction, &snapshot(i * 5, 100, i * 3)))
                .collect::<Vec<_>>()
        };

        assert_eq!(play(99), play(99));
    }
}

//! Bot module providing personality-driven players for the dice game.
//!
//! This module implements:
//! - BotBehaviorProfile: immutable personality, baseline mood and pacing for one bot
//! - GameStateAnalyzer: derived tactical features from a score snapshot
//! - EmotionalStateModel: confidence/frustration/pressure/momentum and the derived mood
//! - DecisionPolicy: roll and bank probabilities, candidate selection
//! - HumanlikeModulator: error injection and human-like response delays
//! - AdaptiveMemory: bounded per-match memory of own and opponent actions
//! - BotEngine: one owning engine per (bot, match) pairing
//!
//! ## Temperament Presets
//!
//! ### Cautious
//! - Low risk tolerance (0.35), high cautiousness (0.8)
//! - Banks early, rarely makes mistakes (5% error rate)
//! - Slow, deliberate pacing (1.2s to 3s)
//!
//! ### Balanced
//! - Moderate traits around 0.5 to 0.6
//! - 10% error rate, 0.8s to 2.5s pacing
//!
//! ### Reckless
//! - High risk tolerance (0.9), strong reaction to pressure (0.8)
//! - Pushes its luck, 15% error rate
//! - Snappy pacing (0.5s to 1.8s)
//!
//! ## Example
//!
//! ```
//! use dice_duel::bot::{BotBehaviorProfile, BotEngine, Temperament};
//! use dice_duel::bot::analysis::GameStateSnapshot;
//! use dice_duel::bot::decision::ActionKind;
//! use std::sync::Arc;
//!
//! let profile = Arc::new(BotBehaviorProfile::preset("cautious-1", Temperament::Cautious));
//! let mut engine = BotEngine::with_seed(profile, 42);
//!
//! let snapshot = GameStateSnapshot {
//!     current_score: 120,
//!     opponent_score: 50,
//!     turn_score: 60,
//!     ..Default::default()
//! };
//! let decision = engine.decide(ActionKind::BankDecision, &snapshot);
//! println!("{}: {}", decision.kind, decision.reasoning);
//! ```

pub mod analysis;
pub mod decision;
pub mod emotion;
pub mod engine;
pub mod errors;
pub mod memory;
pub mod models;
pub mod modulator;

pub use analysis::{GamePhase, GameStateAnalysis, GameStateAnalyzer, GameStateSnapshot};
pub use decision::{ActionKind, BotDecisionConfig, DecisionPolicy};
pub use emotion::{EmotionalState, EmotionalStateModel, Mood};
pub use engine::BotEngine;
pub use errors::EngineError;
pub use memory::AdaptiveMemory;
pub use models::{
    BotBehaviorProfile, BotId, DecisionKind, DecisionPayload, DecisionResult, PersonalityMatrix,
    PersonalityTraits, PlayAction, ResponseConfig, Temperament,
};
pub use modulator::{HumanlikeConfig, HumanlikeModulator};

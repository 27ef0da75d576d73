//! # Dice Duel
//!
//! Decision engine for bots playing a turn-based roll-or-bank dice game.
//!
//! Each bot in a match is driven by one [`BotEngine`]. The engine receives protocol
//! envelopes from the match orchestrator and answers with a play decision (roll, bank
//! or pass) plus an advisory response delay that makes the bot feel human.
//!
//! ## Architecture
//!
//! One decision cycle flows through the engine in a fixed order:
//!
//! - **GameStateAnalyzer**: turns the raw score snapshot into pressure, momentum and risk
//! - **EmotionalStateModel**: updates confidence, frustration and the derived mood
//! - **DecisionPolicy**: weighs personality, analysis and mood into roll/bank probabilities
//! - **HumanlikeModulator**: injects occasional mistakes and shapes the response delay
//! - **AdaptiveMemory**: remembers recent own actions and opponent banking habits
//!
//! ## Core Modules
//!
//! - [`bot`]: behaviour profiles, the decision pipeline and the per-match engine
//! - [`net`]: inbound/outbound protocol messages and the dispatcher
//!
//! ## Example
//!
//! ```
//! use dice_duel::{BotBehaviorProfile, BotEngine, Temperament};
//! use dice_duel::net::messages::RawEnvelope;
//! use std::sync::Arc;
//!
//! let profile = Arc::new(BotBehaviorProfile::preset("bot-1", Temperament::Balanced));
//! let mut engine = BotEngine::with_seed(profile, 7);
//!
//! let envelope: RawEnvelope = serde_json::from_str(
//!     r#"{"type":"dice_rolled","data":{"gameState":{"currentScore":40,"opponentScore":55,"turnScore":20}}}"#,
//! ).unwrap();
//! let reply = engine.handle_raw(envelope).unwrap();
//! assert!(reply.decision().is_some());
//! ```

/// Bot behaviour profiles and the decision engine.
pub mod bot;
pub use bot::{
    AdaptiveMemory, BotBehaviorProfile, BotDecisionConfig, BotEngine, BotId, DecisionKind,
    DecisionPolicy, DecisionResult, EmotionalState, EmotionalStateModel, EngineError,
    GamePhase, GameStateAnalysis, GameStateAnalyzer, GameStateSnapshot, HumanlikeModulator,
    Mood, PersonalityMatrix, ResponseConfig, Temperament,
};

/// Protocol messages exchanged with the match orchestrator.
pub mod net;
pub use net::messages::{InboundMessage, OutboundMessage, RawEnvelope};

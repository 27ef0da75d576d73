//! Game state snapshots and the tactical features derived from them.

use super::models::unit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score deficit at which pressure saturates (before the late-game boost)
const PRESSURE_DEFICIT_SCALE: f32 = 200.0;

/// Late-game amplification of pressure
const LATE_GAME_PRESSURE_MULTIPLIER: f32 = 1.5;

/// Score lead at which momentum saturates
const MOMENTUM_SCALE: f32 = 100.0;

/// Turn score at which risk saturates
const RISK_SCALE: f32 = 100.0;

/// Risk amplification while trailing
const TRAILING_RISK_MULTIPLIER: f32 = 1.3;

/// Remaining turns assumed when the orchestrator omits them
const DEFAULT_REMAINING_TURNS: u32 = 10;

/// Match phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[default]
    Early,
    Mid,
    Late,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Early => write!(f, "early"),
            GamePhase::Mid => write!(f, "mid"),
            GamePhase::Late => write!(f, "late"),
        }
    }
}

/// Score snapshot supplied by the orchestrator for one decision cycle.
///
/// Every field is optional on the wire; missing fields take the [`Default`] values
/// (zero scores, 10 remaining turns, early phase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStateSnapshot {
    /// Bot's banked total
    pub current_score: i64,

    /// Opponent's banked total
    pub opponent_score: i64,

    /// Points accumulated this turn, at risk until banked
    pub turn_score: i64,

    /// Turns left in the match
    pub remaining_turns: u32,

    /// Match phase
    pub game_phase: GamePhase,
}

impl Default for GameStateSnapshot {
    fn default() -> Self {
        Self {
            current_score: 0,
            opponent_score: 0,
            turn_score: 0,
            remaining_turns: DEFAULT_REMAINING_TURNS,
            game_phase: GamePhase::Early,
        }
    }
}

impl GameStateSnapshot {
    /// Whether the bot trails the opponent
    pub fn is_behind(&self) -> bool {
        self.current_score < self.opponent_score
    }

    /// Whether the bot leads the opponent
    pub fn is_ahead(&self) -> bool {
        self.current_score > self.opponent_score
    }

    /// Signed lead over the opponent
    pub fn lead(&self) -> i64 {
        self.current_score.saturating_sub(self.opponent_score)
    }
}

/// Snapshot plus derived tactical features
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateAnalysis {
    /// The snapshot this analysis was computed from
    #[serde(flatten)]
    pub snapshot: GameStateSnapshot,

    /// Urgency from trailing, in `[0, 1]`
    pub pressure: f32,

    /// Normalized score differential, in `[-1, 1]`
    pub momentum: f32,

    /// Exposure of the current turn score, in `[0, 1]`
    pub risk_level: f32,
}

/// Converts snapshots into [`GameStateAnalysis`].
///
/// Stateless: the same snapshot always yields the same analysis.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameStateAnalyzer;

impl GameStateAnalyzer {
    /// Analyze a snapshot
    pub fn analyze(snapshot: &GameStateSnapshot) -> GameStateAnalysis {
        GameStateAnalysis {
            snapshot: *snapshot,
            pressure: Self::pressure(snapshot),
            momentum: Self::momentum(snapshot),
            risk_level: Self::risk_level(snapshot),
        }
    }

    fn pressure(snapshot: &GameStateSnapshot) -> f32 {
        let deficit = snapshot
            .opponent_score
            .saturating_sub(snapshot.current_score)
            .max(0) as f32;
        let pressure = unit(deficit / PRESSURE_DEFICIT_SCALE);

        if snapshot.game_phase == GamePhase::Late {
            (pressure * LATE_GAME_PRESSURE_MULTIPLIER).min(1.0)
        } else {
            pressure
        }
    }

    fn momentum(snapshot: &GameStateSnapshot) -> f32 {
        (snapshot.lead() as f32 / MOMENTUM_SCALE).clamp(-1.0, 1.0)
    }

    fn risk_level(snapshot: &GameStateSnapshot) -> f32 {
        let multiplier = if snapshot.is_behind() {
            TRAILING_RISK_MULTIPLIER
        } else {
            1.0
        };
        unit(snapshot.turn_score as f32 / RISK_SCALE * multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(current: i64, opponent: i64, turn: i64, phase: GamePhase) -> GameStateSnapshot {
        GameStateSnapshot {
            current_score: current,
            opponent_score: opponent,
            turn_score: turn,
            remaining_turns: 5,
            game_phase: phase,
        }
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let snapshot: GameStateSnapshot = serde_json::from_str(r#"{"turnScore": 25}"#).unwrap();
        assert_eq!(snapshot.turn_score, 25);
        assert_eq!(snapshot.current_score, 0);
        assert_eq!(snapshot.opponent_score, 0);
        assert_eq!(snapshot.remaining_turns, 10);
        assert_eq!(snapshot.game_phase, GamePhase::Early);
    }

    #[test]
    fn test_wrong_types_fail_to_decode() {
        let result = serde_json::from_str::<GameStateSnapshot>(r#"{"currentScore": "lots"}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<GameStateSnapshot>(r#"{"gamePhase": "overtime"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_pressure_only_when_behind() {
        let ahead = GameStateAnalyzer::analyze(&snapshot(150, 100, 0, GamePhase::Mid));
        assert_eq!(ahead.pressure, 0.0);

        let behind = GameStateAnalyzer::analyze(&snapshot(100, 150, 0, GamePhase::Mid));
        assert!((behind.pressure - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_late_game_amplifies_pressure() {
        let mid = GameStateAnalyzer::analyze(&snapshot(100, 150, 0, GamePhase::Mid));
        let early = GameStateAnalyzer::analyze(&snapshot(100, 150, 0, GamePhase::Early));
        let late = GameStateAnalyzer::analyze(&snapshot(100, 150, 0, GamePhase::Late));

        assert_eq!(mid.pressure, early.pressure);
        assert!(late.pressure > mid.pressure);
        assert!((late.pressure - 0.375).abs() < 1e-6);
    }

    #[test]
    fn test_pressure_saturates() {
        let late = GameStateAnalyzer::analyze(&snapshot(0, 500, 0, GamePhase::Late));
        assert_eq!(late.pressure, 1.0);
    }

    #[test]
    fn test_momentum_is_clamped() {
        let crushing = GameStateAnalyzer::analyze(&snapshot(400, 0, 0, GamePhase::Mid));
        assert_eq!(crushing.momentum, 1.0);

        let crushed = GameStateAnalyzer::analyze(&snapshot(0, 400, 0, GamePhase::Mid));
        assert_eq!(crushed.momentum, -1.0);

        let close = GameStateAnalyzer::analyze(&snapshot(120, 100, 0, GamePhase::Mid));
        assert!((close.momentum - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_risk_is_higher_when_trailing() {
        let level = GameStateAnalyzer::analyze(&snapshot(100, 100, 50, GamePhase::Mid));
        let trailing = GameStateAnalyzer::analyze(&snapshot(90, 100, 50, GamePhase::Mid));

        assert!((level.risk_level - 0.5).abs() < 1e-6);
        assert!((trailing.risk_level - 0.65).abs() < 1e-6);
    }

    #[test]
    fn test_late_game_trailing_scenario() {
        let analysis = GameStateAnalyzer::analyze(&snapshot(50, 100, 80, GamePhase::Late));

        // deficit 50 -> 0.25, boosted to 0.375 late in the match
        assert!((analysis.pressure - 0.375).abs() < 1e-6);
        // 0.8 * 1.3 = 1.04, clamped
        assert_eq!(analysis.risk_level, 1.0);
        assert!((analysis.momentum + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_negative_turn_score_has_no_risk() {
        let analysis = GameStateAnalyzer::analyze(&snapshot(10, 0, -40, GamePhase::Early));
        assert_eq!(analysis.risk_level, 0.0);
    }

    #[test]
    fn test_analyze_is_reproducible() {
        let input = snapshot(37, 211, 64, GamePhase::Late);
        let a = GameStateAnalyzer::analyze(&input);
        let b = GameStateAnalyzer::analyze(&input);

        assert_eq!(a.pressure.to_bits(), b.pressure.to_bits());
        assert_eq!(a.momentum.to_bits(), b.momentum.to_bits());
        assert_eq!(a.risk_level.to_bits(), b.risk_level.to_bits());
        assert_eq!(a, b);
    }
}

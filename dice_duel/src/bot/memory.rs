//! Bounded per-match memory of own decisions and observed opponent banking.

use super::models::{BotId, DecisionKind};
use std::collections::HashMap;

/// Number of own decisions remembered
pub const OWN_HISTORY_CAPACITY: usize = 10;

/// Banked score regarded as an opponent's "normal" turn
const TYPICAL_BANK: f32 = 50.0;

/// Observed banking behaviour of one opponent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpponentSummary {
    /// Number of banks observed
    pub banks: u32,

    /// Sum of all banked scores
    pub total_banked: i64,

    /// Largest single bank
    pub max_banked: i64,
}

impl OpponentSummary {
    /// Average banked score
    pub fn mean_bank(&self) -> f32 {
        if self.banks == 0 {
            0.0
        } else {
            self.total_banked as f32 / self.banks as f32
        }
    }
}

/// Memory owned by one engine for the duration of one match.
///
/// Own decisions live in a fixed ring; opponent summaries are keyed by opponent id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdaptiveMemory {
    ring: [Option<DecisionKind>; OWN_HISTORY_CAPACITY],
    head: usize,
    len: usize,
    opponents: HashMap<BotId, OpponentSummary>,
}

impl AdaptiveMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember one of the bot's own decisions, evicting the oldest when full
    pub fn record_own(&mut self, kind: DecisionKind) {
        let slot = (self.head + self.len) % OWN_HISTORY_CAPACITY;
        self.ring[slot] = Some(kind);

        if self.len < OWN_HISTORY_CAPACITY {
            self.len += 1;
        } else {
            self.head = (self.head + 1) % OWN_HISTORY_CAPACITY;
        }
    }

    /// Own decisions, oldest first
    pub fn recent_actions(&self) -> impl Iterator<Item = DecisionKind> + '_ {
        (0..self.len).filter_map(move |i| self.ring[(self.head + i) % OWN_HISTORY_CAPACITY])
    }

    /// Most recent own decision
    pub fn last_action(&self) -> Option<DecisionKind> {
        if self.len == 0 {
            return None;
        }
        self.ring[(self.head + self.len - 1) % OWN_HISTORY_CAPACITY]
    }

    /// Length of the trailing run of identical own decisions
    pub fn streak(&self) -> usize {
        let Some(last) = self.last_action() else {
            return 0;
        };
        let actions: Vec<DecisionKind> = self.recent_actions().collect();
        actions.iter().rev().take_while(|kind| **kind == last).count()
    }

    /// Signed habit in `[-1, 1]` from the trailing run of own rolls or banks.
    ///
    /// Positive after repeated rolls, negative after repeated banks. A single
    /// decision, or a run of any other kind, is no habit at all.
    pub fn habit(&self) -> f32 {
        let sign = match self.last_action() {
            Some(DecisionKind::Roll) => 1.0,
            Some(DecisionKind::Bank) => -1.0,
            _ => return 0.0,
        };
        let repeats = self.streak().saturating_sub(1) as f32;
        sign * repeats / (OWN_HISTORY_CAPACITY - 1) as f32
    }

    /// Number of own decisions remembered
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remember that an opponent banked a turn
    pub fn record_opponent_bank(&mut self, opponent: &str, banked_score: i64) {
        let summary = self.opponents.entry(opponent.to_string()).or_default();
        summary.banks += 1;
        summary.total_banked = summary.total_banked.saturating_add(banked_score);
        summary.max_banked = if summary.banks == 1 {
            banked_score
        } else {
            summary.max_banked.max(banked_score)
        };
    }

    /// Summary for one opponent
    pub fn opponent(&self, opponent: &str) -> Option<&OpponentSummary> {
        self.opponents.get(opponent)
    }

    /// Number of distinct opponents observed
    pub fn opponent_count(&self) -> usize {
        self.opponents.len()
    }

    /// How greedy observed opponents are, in `[-1, 1]`.
    ///
    /// Positive when opponents bank above a typical turn, negative below it,
    /// zero without observations.
    pub fn opponent_bias(&self) -> f32 {
        let (banks, total) = self
            .opponents
            .values()
            .fold((0u64, 0i64), |(banks, total), summary| {
                (
                    banks + u64::from(summary.banks),
                    total.saturating_add(summary.total_banked),
                )
            });

        if banks == 0 {
            return 0.0;
        }

        let mean = total as f32 / banks as f32;
        ((mean - TYPICAL_BANK) / TYPICAL_BANK).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_keeps_last_ten_in_order() {
        let mut memory = AdaptiveMemory::new();
        for _ in 0..7 {
            memory.record_own(DecisionKind::Roll);
        }
        for _ in 0..5 {
            memory.record_own(DecisionKind::Bank);
        }

        assert_eq!(memory.len(), OWN_HISTORY_CAPACITY);
        let actions: Vec<_> = memory.recent_actions().collect();
        assert_eq!(actions.len(), 10);
        assert_eq!(&actions[..5], &[DecisionKind::Roll; 5]);
        assert_eq!(&actions[5..], &[DecisionKind::Bank; 5]);
        assert_eq!(memory.last_action(), Some(DecisionKind::Bank));
    }

    #[test]
    fn test_streak() {
        let mut memory = AdaptiveMemory::new();
        assert_eq!(memory.streak(), 0);

        memory.record_own(DecisionKind::Bank);
        memory.record_own(DecisionKind::Roll);
        memory.record_own(DecisionKind::Roll);
        memory.record_own(DecisionKind::Roll);
        assert_eq!(memory.streak(), 3);

        for _ in 0..20 {
            memory.record_own(DecisionKind::Roll);
        }
        assert_eq!(memory.streak(), OWN_HISTORY_CAPACITY);
    }

    #[test]
    fn test_habit_follows_trailing_run() {
        let mut memory = AdaptiveMemory::new();
        assert_eq!(memory.habit(), 0.0);

        memory.record_own(DecisionKind::Roll);
        assert_eq!(memory.habit(), 0.0);

        for _ in 0..3 {
            memory.record_own(DecisionKind::Roll);
        }
        assert!((memory.habit() - 3.0 / 9.0).abs() < 1e-6);

        for _ in 0..OWN_HISTORY_CAPACITY {
            memory.record_own(DecisionKind::Bank);
        }
        assert_eq!(memory.habit(), -1.0);

        memory.record_own(DecisionKind::TurnAction);
        assert_eq!(memory.habit(), 0.0);
    }

    #[test]
    fn test_max_bank_of_only_negative_banks() {
        let mut memory = AdaptiveMemory::new();
        memory.record_opponent_bank("gambler", -30);
        memory.record_opponent_bank("gambler", -10);

        let gambler = memory.opponent("gambler").unwrap();
        assert_eq!(gambler.max_banked, -10);
        assert!((gambler.mean_bank() + 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_opponent_summary() {
        let mut memory = AdaptiveMemory::new();
        memory.record_opponent_bank("alice", 40);
        memory.record_opponent_bank("alice", 80);
        memory.record_opponent_bank("bob", 10);

        let alice = memory.opponent("alice").unwrap();
        assert_eq!(alice.banks, 2);
        assert_eq!(alice.max_banked, 80);
        assert!((alice.mean_bank() - 60.0).abs() < 1e-6);
        assert_eq!(memory.opponent_count(), 2);
        assert!(memory.opponent("carol").is_none());
    }

    #[test]
    fn test_opponent_bias() {
        let mut memory = AdaptiveMemory::new();
        assert_eq!(memory.opponent_bias(), 0.0);

        memory.record_opponent_bank("alice", 100);
        assert!((memory.opponent_bias() - 1.0).abs() < 1e-6);

        memory.record_opponent_bank("bob", 0);
        // mean 50 -> neutral
        assert!(memory.opponent_bias().abs() < 1e-6);

        memory.record_opponent_bank("bob", -500);
        assert_eq!(memory.opponent_bias(), -1.0);
    }
}

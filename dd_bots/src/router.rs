//! Router spawning and addressing one session per (bot, match) pairing.

use crate::{
    config::HostConfig,
    profiles::ProfileBook,
    session::{HostReply, MatchId, SessionActor, SessionError, SessionHandle},
};
use dice_duel::{BotEngine, BotId, OutboundMessage, RawEnvelope};
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Client-facing text for a message dropped because its session is backed up
const BUSY_MESSAGE: &str = "Bot is busy, message dropped";

/// One inbound line from the orchestrator
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct HostEnvelope {
    pub bot_id: BotId,
    pub match_id: MatchId,
    #[serde(flatten)]
    pub envelope: RawEnvelope,
}

/// Owns the session handles and creates sessions on first contact
pub struct SessionRouter {
    config: HostConfig,
    profiles: ProfileBook,
    outbox: mpsc::Sender<HostReply>,
    sessions: HashMap<(BotId, MatchId), SessionHandle>,
    /// Sessions created so far; offsets the base seed
    spawned: u64,
}

impl SessionRouter {
    pub fn new(config: HostConfig, profiles: ProfileBook, outbox: mpsc::Sender<HostReply>) -> Self {
        Self {
            config,
            profiles,
            outbox,
            sessions: HashMap::new(),
            spawned: 0,
        }
    }

    /// Forward an envelope to its session, spawning the session if needed
    ///
    /// Never waits on a session inbox: a full inbox drops the envelope and answers
    /// with an error line, so one slow bot cannot hold up the others. `game_end`
    /// releases the handle; the session drains and exits on its own. A `game_end`
    /// for a pairing without a session is acknowledged directly.
    pub async fn route(&mut self, message: HostEnvelope) -> Result<(), SessionError> {
        let HostEnvelope {
            bot_id,
            match_id,
            envelope,
        } = message;
        let key = (bot_id, match_id);
        let ends_match = envelope.kind == "game_end";

        let handle = match self.sessions.get(&key) {
            Some(handle) => handle.clone(),
            None if ends_match => {
                tracing::debug!(bot_id = %key.0, match_id = %key.1, "Game end without a session");
                let ack = OutboundMessage::ack(key.0.as_str(), envelope.kind);
                return self.emit(HostReply::reply(key.1, ack)).await;
            }
            None => {
                let handle = self.spawn(&key.0, &key.1);
                self.sessions.insert(key.clone(), handle.clone());
                handle
            }
        };

        if ends_match {
            self.sessions.remove(&key);
        }

        match handle.try_send(envelope) {
            Err(SessionError::Busy(envelope)) => {
                tracing::warn!(
                    bot_id = %key.0,
                    match_id = %key.1,
                    message_type = %envelope.kind,
                    "Session inbox full, dropping message"
                );
                let (bot_id, match_id) = key;
                self.emit(HostReply::error(match_id, bot_id, envelope.kind, BUSY_MESSAGE))
                    .await
            }
            result => result,
        }
    }

    /// Write a reply produced by the router itself
    async fn emit(&self, reply: HostReply) -> Result<(), SessionError> {
        self.outbox
            .send(reply)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn spawn(&mut self, bot_id: &str, match_id: &str) -> SessionHandle {
        let profile = self.profiles.profile_for(bot_id);
        let engine = match self.config.seed {
            Some(seed) => BotEngine::with_seed(profile, seed.wrapping_add(self.spawned)),
            None => BotEngine::new(profile),
        };
        self.spawned += 1;

        let (actor, handle) = SessionActor::new(
            match_id,
            engine,
            self.outbox.clone(),
            self.config.channel_capacity,
            self.config.apply_delays,
        );
        tokio::spawn(actor.run());

        tracing::info!(bot_id, match_id, "Spawned session");
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dice_duel::Temperament;
    use serde_json::{Value, json};
    use tokio::time::{Duration, Instant};

    fn router() -> (SessionRouter, mpsc::Receiver<HostReply>) {
        let config = HostConfig {
            apply_delays: false,
            seed: Some(11),
            ..Default::default()
        };
        let (outbox, replies) = mpsc::channel(64);
        let router = SessionRouter::new(config, ProfileBook::new(Temperament::Cautious), outbox);
        (router, replies)
    }

    fn line(value: Value) -> HostEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_host_envelope_parsing() {
        let parsed = line(json!({
            "bot_id": "b1", "match_id": "m1", "type": "dice_rolled",
            "data": {"gameState": {"turnScore": 5}}
        }));
        assert_eq!(parsed.bot_id, "b1");
        assert_eq!(parsed.match_id, "m1");
        assert_eq!(parsed.envelope.kind, "dice_rolled");
        assert_eq!(parsed.envelope.data["gameState"]["turnScore"], 5);

        let bare = line(json!({"bot_id": "b1", "match_id": "m1", "type": "turn_start"}));
        assert_eq!(bare.envelope.data, Value::Null);
    }

    #[tokio::test]
    async fn test_sessions_are_keyed_by_bot_and_match() {
        let (mut router, mut replies) = router();

        for (bot, game) in [("b1", "m1"), ("b2", "m1"), ("b1", "m2"), ("b1", "m1")] {
            router
                .route(line(json!({"bot_id": bot, "match_id": game, "type": "turn_start"})))
                .await
                .unwrap();
        }
        assert_eq!(router.session_count(), 3);

        let mut seen = Vec::new();
        for _ in 0..4 {
            let reply = serde_json::to_value(replies.recv().await.unwrap()).unwrap();
            seen.push((reply["bot_id"].clone(), reply["match_id"].clone()));
        }
        assert!(seen.contains(&(json!("b2"), json!("m1"))));
        assert_eq!(seen.iter().filter(|ids| **ids == (json!("b1"), json!("m1"))).count(), 2);
    }

    #[tokio::test]
    async fn test_match_flow_and_teardown() {
        let (mut router, mut replies) = router();
        let script = [
            json!({"bot_id": "b1", "match_id": "m1", "type": "decision_request",
                   "data": {"actionType": "game_start"}}),
            json!({"bot_id": "b1", "match_id": "m1", "type": "dice_rolled",
                   "data": {"gameState": {"currentScore": 120, "opponentScore": 50,
                                          "turnScore": 90}}}),
            json!({"bot_id": "b1", "match_id": "m1", "type": "player_banked",
                   "data": {"playerId": "b2", "bankedScore": 60}}),
            json!({"bot_id": "b1", "match_id": "m1", "type": "game_end",
                   "data": {"winner": "b1"}}),
        ];

        for message in script {
            router.route(line(message)).await.unwrap();
        }
        assert_eq!(router.session_count(), 0);

        let types: Vec<Value> = {
            let mut types = Vec::new();
            while let Some(reply) = replies.recv().await {
                types.push(serde_json::to_value(reply).unwrap()["type"].clone());
                if types.len() == 4 {
                    break;
                }
            }
            types
        };
        assert_eq!(
            types,
            vec![
                json!("decision_response"),
                json!("dice_response"),
                json!("ack"),
                json!("ack")
            ]
        );

        // A fresh session starts for a later match with the same bot
        router
            .route(line(json!({"bot_id": "b1", "match_id": "m2", "type": "turn_start"})))
            .await
            .unwrap();
        assert_eq!(router.session_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_session_does_not_hold_up_others() {
        let config = HostConfig {
            channel_capacity: 1,
            seed: Some(3),
            ..Default::default()
        };
        let (outbox, mut replies) = mpsc::channel(64);
        let mut router =
            SessionRouter::new(config, ProfileBook::new(Temperament::Balanced), outbox);
        let started = Instant::now();

        for _ in 0..6 {
            router
                .route(line(json!({"bot_id": "slow", "match_id": "m1", "type": "dice_rolled",
                                   "data": {"gameState": {"turnScore": 30}}})))
                .await
                .unwrap();
        }
        router
            .route(line(json!({"bot_id": "fast", "match_id": "m1", "type": "turn_start"})))
            .await
            .unwrap();
        assert!(started.elapsed() < Duration::from_millis(100));

        let mut dropped = 0;
        loop {
            let reply = serde_json::to_value(replies.recv().await.unwrap()).unwrap();
            if reply["bot_id"] == "fast" {
                assert_eq!(reply["type"], "ack");
                break;
            }
            assert_eq!(reply["type"], "error");
            assert_eq!(reply["originalType"], "dice_rolled");
            assert_eq!(reply["message"], BUSY_MESSAGE);
            dropped += 1;
        }

        // The slow bot is still waiting out its first response delay
        assert!(started.elapsed() < Duration::from_millis(100));
        assert!(dropped >= 4, "dropped {dropped}");
    }

    #[tokio::test]
    async fn test_game_end_without_session_is_acked_directly() {
        let (mut router, mut replies) = router();

        router
            .route(line(json!({"bot_id": "b9", "match_id": "m9", "type": "game_end",
                               "data": {"winner": "b9"}})))
            .await
            .unwrap();

        assert_eq!(router.session_count(), 0);
        assert_eq!(router.spawned, 0);
        assert_eq!(
            serde_json::to_value(replies.recv().await.unwrap()).unwrap(),
            json!({"match_id": "m9", "type": "ack", "originalType": "game_end", "bot_id": "b9"})
        );
    }
}

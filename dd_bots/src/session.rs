//! Session actor driving one bot engine for one match.

use dice_duel::{BotEngine, BotId, OutboundMessage, RawEnvelope};
use serde::Serialize;
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    time::{Duration, sleep},
};

/// Match identifier assigned by the orchestrator
pub type MatchId = String;

/// A line written back to the orchestrator
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HostReply {
    pub match_id: MatchId,
    #[serde(flatten)]
    pub body: HostReplyBody,
}

impl HostReply {
    /// Reply produced by an engine
    pub fn reply(match_id: impl Into<MatchId>, reply: OutboundMessage) -> Self {
        Self {
            match_id: match_id.into(),
            body: HostReplyBody::Reply(reply),
        }
    }

    /// Error line for a message that was not handled
    pub fn error(
        match_id: impl Into<MatchId>,
        bot_id: impl Into<BotId>,
        original_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            body: HostReplyBody::Error(ErrorReply {
                kind: "error",
                bot_id: bot_id.into(),
                original_type: original_type.into(),
                message: message.into(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HostReplyBody {
    /// Reply produced by the engine
    Reply(OutboundMessage),
    /// The engine rejected the message
    Error(ErrorReply),
}

/// Client-safe description of a rejected message
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorReply {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub bot_id: BotId,
    #[serde(rename = "originalType")]
    pub original_type: String,
    pub message: String,
}

/// Delivery failures of a session handle
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The inbox is full; the envelope is handed back
    #[error("Session inbox is full")]
    Busy(RawEnvelope),

    #[error("Session is closed")]
    Closed,
}

/// Session handle for sending messages
#[derive(Clone, Debug)]
pub struct SessionHandle {
    sender: mpsc::Sender<RawEnvelope>,
}

impl SessionHandle {
    /// Send an envelope without waiting; a full inbox hands the envelope back
    pub fn try_send(&self, envelope: RawEnvelope) -> Result<(), SessionError> {
        self.sender.try_send(envelope).map_err(|e| match e {
            TrySendError::Full(envelope) => SessionError::Busy(envelope),
            TrySendError::Closed(_) => SessionError::Closed,
        })
    }
}

/// Actor owning one engine. Messages are handled strictly one at a time.
pub struct SessionActor {
    match_id: MatchId,

    engine: BotEngine,

    /// Message inbox
    inbox: mpsc::Receiver<RawEnvelope>,

    /// Shared reply channel
    outbox: mpsc::Sender<HostReply>,

    /// Wait out the advisory delay before replying
    apply_delays: bool,
}

impl SessionActor {
    /// Create a new session actor
    ///
    /// # Returns
    ///
    /// * `(SessionActor, SessionHandle)` - Actor and handle for sending messages
    pub fn new(
        match_id: impl Into<MatchId>,
        engine: BotEngine,
        outbox: mpsc::Sender<HostReply>,
        capacity: usize,
        apply_delays: bool,
    ) -> (Self, SessionHandle) {
        let (sender, inbox) = mpsc::channel(capacity);
        let actor = Self {
            match_id: match_id.into(),
            engine,
            inbox,
            outbox,
            apply_delays,
        };
        (actor, SessionHandle { sender })
    }

    /// Run the session event loop until the match ends or every handle is dropped
    pub async fn run(mut self) {
        tracing::info!(
            bot_id = %self.engine.bot_id(),
            match_id = %self.match_id,
            "Session starting"
        );

        while let Some(envelope) = self.inbox.recv().await {
            let reply = self.handle(envelope).await;
            if self.outbox.send(reply).await.is_err() {
                tracing::warn!(match_id = %self.match_id, "Reply channel closed, stopping session");
                break;
            }

            if self.engine.is_finished() {
                break;
            }
        }

        tracing::info!(
            bot_id = %self.engine.bot_id(),
            match_id = %self.match_id,
            "Session closed"
        );
    }

    async fn handle(&mut self, envelope: RawEnvelope) -> HostReply {
        let original_type = envelope.kind.clone();

        match self.engine.handle_raw(envelope) {
            Ok(reply) => {
                self.pace(&reply).await;
                HostReply::reply(self.match_id.clone(), reply)
            }
            Err(error) => {
                tracing::warn!(
                    bot_id = %self.engine.bot_id(),
                    match_id = %self.match_id,
                    message_type = %original_type,
                    "Rejected message: {error}"
                );
                HostReply::error(
                    self.match_id.clone(),
                    self.engine.bot_id(),
                    original_type,
                    error.client_message(),
                )
            }
        }
    }

    async fn pace(&self, reply: &OutboundMessage) {
        let delay = reply.delay_ms();
        if self.apply_delays && delay > 0 {
            tracing::debug!(
                bot_id = %reply.bot_id,
                match_id = %self.match_id,
                delay_ms = delay,
                "Pacing reply"
            );
            sleep(Duration::from_millis(delay)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dice_duel::{BotBehaviorProfile, Temperament};
    use serde_json::json;
    use std::sync::Arc;

    fn spawn_session(apply_delays: bool) -> (SessionHandle, mpsc::Receiver<HostReply>) {
        let profile = Arc::new(BotBehaviorProfile::preset("bot-1", Temperament::Balanced));
        let engine = BotEngine::with_seed(profile, 5);
        let (outbox, replies) = mpsc::channel(16);
        let (actor, handle) = SessionActor::new("m-1", engine, outbox, 4, apply_delays);
        tokio::spawn(actor.run());
        (handle, replies)
    }

    fn envelope(value: serde_json::Value) -> RawEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_replies_carry_match_and_bot_ids() {
        let (handle, mut replies) = spawn_session(false);

        handle
            .try_send(envelope(json!({"type": "turn_start"})))
            .unwrap();
        let reply = replies.recv().await.unwrap();

        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"match_id": "m-1", "type": "ack", "originalType": "turn_start",
                   "ready": true, "bot_id": "bot-1"})
        );
    }

    #[tokio::test]
    async fn test_decode_errors_become_error_lines() {
        let (handle, mut replies) = spawn_session(false);

        handle
            .try_send(envelope(json!({"type": "dice_rolled", "data": [1, 2]})))
            .unwrap();
        let reply = serde_json::to_value(replies.recv().await.unwrap()).unwrap();

        assert_eq!(reply["type"], "error");
        assert_eq!(reply["originalType"], "dice_rolled");
        assert_eq!(reply["message"], "Malformed dice_rolled payload");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_applied_before_replying() {
        let (handle, mut replies) = spawn_session(true);
        let started = tokio::time::Instant::now();

        handle
            .try_send(envelope(json!({
                "type": "dice_rolled",
                "data": {"gameState": {"turnScore": 30}}
            })))
            .unwrap();
        let reply = replies.recv().await.unwrap();

        let HostReplyBody::Reply(outbound) = &reply.body else {
            panic!("expected a decision reply");
        };
        assert!(started.elapsed() >= Duration::from_millis(outbound.delay_ms()));
        assert!(outbound.delay_ms() >= 640);
    }

    #[tokio::test]
    async fn test_try_send_hands_back_envelope_when_full() {
        let profile = Arc::new(BotBehaviorProfile::preset("bot-1", Temperament::Balanced));
        let (outbox, _replies) = mpsc::channel(16);
        // Actor is never run, so nothing drains the inbox
        let (_actor, handle) =
            SessionActor::new("m-1", BotEngine::with_seed(profile, 1), outbox, 1, false);

        handle.try_send(envelope(json!({"type": "turn_start"}))).unwrap();
        let err = handle
            .try_send(envelope(json!({"type": "game_state_update"})))
            .unwrap_err();
        assert!(matches!(err, SessionError::Busy(ref e) if e.kind == "game_state_update"));
    }

    #[tokio::test]
    async fn test_session_stops_after_game_end() {
        let (handle, mut replies) = spawn_session(false);

        handle
            .try_send(envelope(json!({"type": "game_end", "data": {"winner": "bot-1"}})))
            .unwrap();
        replies.recv().await.unwrap();

        // The actor has exited and dropped its inbox
        assert!(replies.recv().await.is_none());
        assert!(matches!(
            handle.try_send(envelope(json!({"type": "turn_start"}))),
            Err(SessionError::Closed)
        ));
    }
}

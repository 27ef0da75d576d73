use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{collections::HashMap, fmt};

use super::super::bot::{
    BotId, DecisionResult, GameStateSnapshot,
    errors::{EngineError, Result},
};

/// Undecoded inbound envelope.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RawEnvelope {
    /// Message type, routed on by the dispatcher.
    #[serde(rename = "type")]
    pub kind: String,
    /// Type-specific payload. Missing means null.
    #[serde(default)]
    pub data: Value,
}

impl RawEnvelope {
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

/// Payload of a `dice_rolled` message.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiceRolled {
    pub game_state: GameStateSnapshot,
    pub dice: Vec<u8>,
    pub player_id: Option<BotId>,
}

/// Payload of a `player_banked` message.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBanked {
    pub player_id: BotId,
    pub banked_score: i64,
}

/// Payload of a `game_end` message.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameEnd {
    pub winner: Option<BotId>,
    pub final_scores: HashMap<BotId, i64>,
}

/// Payload of a `decision_request` message.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    /// One of `dice_roll`, `bank_decision`, `turn_action` or `game_start`.
    pub action_type: String,
    #[serde(default)]
    pub game_state: GameStateSnapshot,
}

/// A decoded inbound message.
#[derive(Clone, Debug, PartialEq)]
pub enum InboundMessage {
    /// Score broadcast. Acknowledged only.
    GameStateUpdate,
    /// The bot's turn begins.
    TurnStart,
    /// Dice landed; a roll-or-bank decision is due.
    DiceRolled(DiceRolled),
    /// Some player banked. `None` when the payload could not be read.
    PlayerBanked(Option<PlayerBanked>),
    /// The match is over.
    GameEnd(GameEnd),
    /// Explicit request for one of the policy's decision kinds.
    DecisionRequest(DecisionRequest),
    /// Anything else. Never an error.
    Unknown(String),
}

impl InboundMessage {
    /// Decode an envelope.
    ///
    /// Only payloads that feed a decision (`dice_rolled`, `decision_request`) fail
    /// to decode. Informational payloads degrade to their defaults with a warning.
    pub fn decode(envelope: RawEnvelope) -> Result<Self> {
        let RawEnvelope { kind, data } = envelope;
        let message = match kind.as_str() {
            "game_state_update" => Self::GameStateUpdate,
            "turn_start" => Self::TurnStart,
            "dice_rolled" => Self::DiceRolled(decode_or_default(&kind, data)?),
            "decision_request" => Self::DecisionRequest(decode_payload(&kind, data)?),
            "player_banked" => Self::PlayerBanked(decode_lenient(&kind, data)),
            "game_end" => Self::GameEnd(decode_lenient(&kind, data).unwrap_or_default()),
            _ => Self::Unknown(kind),
        };
        Ok(message)
    }

    /// Wire name of the message type.
    pub fn message_type(&self) -> &str {
        match self {
            Self::GameStateUpdate => "game_state_update",
            Self::TurnStart => "turn_start",
            Self::DiceRolled(_) => "dice_rolled",
            Self::PlayerBanked(_) => "player_banked",
            Self::GameEnd(_) => "game_end",
            Self::DecisionRequest(_) => "decision_request",
            Self::Unknown(kind) => kind,
        }
    }
}

impl fmt::Display for InboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message_type())
    }
}

fn decode_payload<T: DeserializeOwned>(message_type: &str, data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|source| EngineError::DecodeError {
        message_type: message_type.to_string(),
        source,
    })
}

/// A missing payload means all defaults; anything present must decode.
fn decode_or_default<T: DeserializeOwned + Default>(message_type: &str, data: Value) -> Result<T> {
    if data.is_null() {
        return Ok(T::default());
    }
    decode_payload(message_type, data)
}

fn decode_lenient<T: DeserializeOwned>(message_type: &str, data: Value) -> Option<T> {
    match decode_payload(message_type, data) {
        Ok(payload) => Some(payload),
        Err(error) => {
            log::warn!("Ignoring {message_type} payload: {error}");
            None
        }
    }
}

/// Body of an outbound reply, tagged by `type`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyBody {
    /// Acknowledgement of a message that needs no decision.
    Ack {
        #[serde(rename = "originalType")]
        original_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ready: Option<bool>,
    },
    /// Decision in answer to `dice_rolled`.
    DiceResponse { decision: DecisionResult },
    /// Decision in answer to `decision_request`.
    DecisionResponse { decision: DecisionResult },
}

/// A reply to the orchestrator.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct OutboundMessage {
    #[serde(flatten)]
    pub body: ReplyBody,
    pub bot_id: BotId,
}

impl OutboundMessage {
    pub fn ack(bot_id: impl Into<BotId>, original_type: impl Into<String>) -> Self {
        Self {
            body: ReplyBody::Ack {
                original_type: original_type.into(),
                ready: None,
            },
            bot_id: bot_id.into(),
        }
    }

    pub fn ready(bot_id: impl Into<BotId>, original_type: impl Into<String>) -> Self {
        Self {
            body: ReplyBody::Ack {
                original_type: original_type.into(),
                ready: Some(true),
            },
            bot_id: bot_id.into(),
        }
    }

    /// The embedded decision, if this reply carries one.
    pub fn decision(&self) -> Option<&DecisionResult> {
        match &self.body {
            ReplyBody::DiceResponse { decision } | ReplyBody::DecisionResponse { decision } => {
                Some(decision)
            }
            ReplyBody::Ack { .. } => None,
        }
    }

    /// How long the caller should wait before sending this reply.
    pub fn delay_ms(&self) -> u64 {
        self.decision().map_or(0, |decision| decision.delay_ms)
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            ReplyBody::Ack { original_type, .. } => {
                write!(f, "{} acked {original_type}", self.bot_id)
            }
            ReplyBody::DiceResponse { decision } | ReplyBody::DecisionResponse { decision } => {
                write!(f, "{} decided {}", self.bot_id, decision.kind)
            }
        }
    }
}

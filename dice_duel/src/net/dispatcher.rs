use rand::Rng;

use super::{
    super::bot::{ActionKind, BotEngine, errors::Result},
    messages::{GameEnd, InboundMessage, OutboundMessage, RawEnvelope, ReplyBody},
};

impl<R: Rng> BotEngine<R> {
    /// Handle one inbound message and build the reply.
    ///
    /// Unknown message types are acknowledged, never rejected. The only failure is a
    /// `decision_request` for an action kind the policy does not implement, and it is
    /// raised before any state changes.
    pub fn handle(&mut self, message: InboundMessage) -> Result<OutboundMessage> {
        let reply = match message {
            InboundMessage::GameStateUpdate => {
                OutboundMessage::ack(self.bot_id(), "game_state_update")
            }
            InboundMessage::TurnStart => OutboundMessage::ready(self.bot_id(), "turn_start"),
            InboundMessage::DiceRolled(payload) => {
                let decision = self.decide(ActionKind::DiceRoll, &payload.game_state);
                self.reply(ReplyBody::DiceResponse { decision })
            }
            InboundMessage::DecisionRequest(request) => {
                let action = request.action_type.parse::<ActionKind>()?;
                let decision = self.decide(action, &request.game_state);
                self.reply(ReplyBody::DecisionResponse { decision })
            }
            InboundMessage::PlayerBanked(payload) => {
                match payload {
                    Some(banked) if banked.player_id != self.bot_id() => {
                        log::debug!(
                            "Bot {}: {} banked {}",
                            self.bot_id(),
                            banked.player_id,
                            banked.banked_score
                        );
                        self.observe_opponent_bank(&banked.player_id, banked.banked_score);
                    }
                    _ => {}
                }
                OutboundMessage::ack(self.bot_id(), "player_banked")
            }
            InboundMessage::GameEnd(outcome) => {
                self.log_outcome(&outcome);
                self.finish();
                OutboundMessage::ack(self.bot_id(), "game_end")
            }
            InboundMessage::Unknown(kind) => {
                log::debug!("Bot {}: acknowledging unknown message {kind}", self.bot_id());
                OutboundMessage::ack(self.bot_id(), kind)
            }
        };
        Ok(reply)
    }

    /// Decode an envelope and handle it.
    ///
    /// A payload that fails to decode leaves the engine untouched.
    pub fn handle_raw(&mut self, envelope: RawEnvelope) -> Result<OutboundMessage> {
        let message = InboundMessage::decode(envelope)?;
        self.handle(message)
    }

    fn reply(&self, body: ReplyBody) -> OutboundMessage {
        OutboundMessage {
            body,
            bot_id: self.bot_id().to_string(),
        }
    }

    fn log_outcome(&self, outcome: &GameEnd) {
        let bot_id = self.bot_id();
        let score = outcome
            .final_scores
            .get(bot_id)
            .map_or_else(|| "?".to_string(), i64::to_string);

        match outcome.winner.as_deref() {
            Some(winner) if winner == bot_id => {
                log::info!("Bot {bot_id} won the match (final score {score})");
            }
            Some(winner) => {
                log::info!("Bot {bot_id} lost the match to {winner} (final score {score})");
            }
            None => log::info!("Bot {bot_id} finished the match without a winner"),
        }
    }
}

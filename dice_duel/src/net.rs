//! Protocol layer between the match orchestrator and a bot engine.
//!
//! Inbound envelopes are JSON objects of the form `{type, data}`. Replies always carry
//! `{type, bot_id, ...}` and embed the full decision when one was made.

/// Inbound and outbound message types.
pub mod messages;

/// Routing of inbound messages onto the engine.
pub mod dispatcher;

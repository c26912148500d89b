//! Whisper Engine - moderation, expert routing and three-strike flagging for
//! anonymous expert Q&A.
//!
//! The crate is laid out hexagonally: `domain` holds the aggregates and
//! rules, `ports` the outbound contracts, `application` the command and
//! query handlers, and `adapters` the Postgres, in-memory, AI, notification
//! and HTTP implementations.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - Classifier and text-generation backends with failover
//! - `http` - axum REST API and live notification feed
//! - `memory` - In-memory repositories for tests and database-less runs
//! - `notifications` - Broadcast, Redis and fan-out notification buses
//! - `postgres` - sqlx repositories

pub mod ai;
pub mod http;
pub mod memory;
pub mod notifications;
pub mod postgres;

//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `GeminiProvider` - Google Generative Language API
//! - `OpenAIProvider` - OpenAI-compatible chat completions
//! - `FailoverAIProvider` - Ordered chain of backends with acceptance checks
//! - `MockAIProvider` - Scripted mock for tests

mod failover_provider;
mod gemini_provider;
mod http_errors;
mod mock_provider;
mod openai_provider;

pub use failover_provider::{Accepted, BackendFailure, FailoverAIProvider, FailoverError};
pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};

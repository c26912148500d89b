//! Failover AI Provider - ordered chain of backends tried in sequence.
//!
//! Each backend is one (credential, model) pair. A call walks the chain in
//! order and the first backend whose reply is accepted wins. A reply can be
//! refused by an acceptance check, which moves the call on to the next
//! backend exactly like a transport failure. Through the `AIProvider` trait,
//! a request that asks for JSON only accepts replies carrying a decodable
//! JSON object.
//!
//! # Example
//!
//! ```ignore
//! let chain = FailoverAIProvider::new()
//!     .with_backend(Arc::new(primary_flash))
//!     .with_backend(Arc::new(backup_flash))
//!     .with_backend(Arc::new(primary_pro));
//!
//! let accepted = chain
//!     .first_accepted(&request, |r| parse_classifier_reply(&r.content).map_err(|e| e.to_string()))
//!     .await?;
//! ```

use async_trait::async_trait;
use secrecy::Secret;
use std::sync::Arc;

use crate::config::{ModerationConfig, ModerationProvider};
use crate::domain::moderation::decode_json_object;
use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

use super::{GeminiConfig, GeminiProvider, OpenAIConfig, OpenAIProvider};

/// One failed backend attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    pub backend: String,
    pub error: String,
}

/// Raised when no backend produced an accepted reply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailoverError {
    #[error("no AI backends configured")]
    NoBackends,

    #[error("all {} AI backends failed", attempts.len())]
    Exhausted { attempts: Vec<BackendFailure> },
}

/// Reply accepted from one backend of the chain.
#[derive(Debug, Clone)]
pub struct Accepted<T> {
    pub value: T,
    pub backend: ProviderInfo,
    /// 1-based position of the backend that answered.
    pub attempt: usize,
}

/// Ordered chain of AI backends.
#[derive(Clone, Default)]
pub struct FailoverAIProvider {
    backends: Vec<Arc<dyn AIProvider>>,
}

impl FailoverAIProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a backend at the end of the chain.
    pub fn with_backend(mut self, backend: Arc<dyn AIProvider>) -> Self {
        self.backends.push(backend);
        self
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Labels of the backends in the order they are tried.
    pub fn backend_labels(&self) -> Vec<String> {
        self.backends
            .iter()
            .map(|b| b.provider_info().label())
            .collect()
    }

    /// Builds the chain from moderation configuration.
    ///
    /// For each model in order the primary credential is tried first, then
    /// the backup credential when one is configured.
    pub fn from_config(config: &ModerationConfig) -> Result<Self, AIError> {
        let mut chain = Self::new();
        for model in &config.models {
            chain = chain.with_backend(build_backend(config, model, &config.api_key, "primary")?);
            if let Some(ref backup) = config.backup_api_key {
                chain = chain.with_backend(build_backend(config, model, backup, "backup")?);
            }
        }
        Ok(chain)
    }

    /// Walks the chain until `accept` takes a reply.
    pub async fn first_accepted<T, F>(
        &self,
        request: &CompletionRequest,
        mut accept: F,
    ) -> Result<Accepted<T>, FailoverError>
    where
        F: FnMut(&CompletionResponse) -> Result<T, String> + Send,
        T: Send,
    {
        if self.backends.is_empty() {
            return Err(FailoverError::NoBackends);
        }

        let mut attempts = Vec::new();
        for (index, backend) in self.backends.iter().enumerate() {
            let info = backend.provider_info();
            let outcome = backend
                .complete(request.clone())
                .await
                .map_err(|e| e.to_string())
                .and_then(|response| {
                    tracing::debug!(
                        backend = %info.label(),
                        purpose = request.purpose.as_str(),
                        total_tokens = response.usage.total_tokens,
                        "AI backend replied"
                    );
                    accept(&response)
                });

            match outcome {
                Ok(value) => {
                    if index > 0 {
                        tracing::info!(
                            backend = %info.label(),
                            attempt = index + 1,
                            trace_id = %request.trace_id,
                            "AI request served by fallback backend"
                        );
                    }
                    return Ok(Accepted {
                        value,
                        backend: info,
                        attempt: index + 1,
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        backend = %info.label(),
                        purpose = request.purpose.as_str(),
                        trace_id = %request.trace_id,
                        error = %error,
                        "AI backend failed, trying next"
                    );
                    attempts.push(BackendFailure {
                        backend: info.label(),
                        error,
                    });
                }
            }
        }

        Err(FailoverError::Exhausted { attempts })
    }
}

fn build_backend(
    config: &ModerationConfig,
    model: &str,
    key: &Secret<String>,
    slot: &str,
) -> Result<Arc<dyn AIProvider>, AIError> {
    let backend: Arc<dyn AIProvider> = match config.provider {
        ModerationProvider::Gemini => {
            let mut c = GeminiConfig::new(key.clone())
                .with_model(model)
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries)
                .with_credential(slot);
            if let Some(ref url) = config.base_url {
                c = c.with_base_url(url);
            }
            Arc::new(GeminiProvider::new(c)?)
        }
        ModerationProvider::OpenAI => {
            let mut c = OpenAIConfig::new(key.clone())
                .with_model(model)
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries)
                .with_credential(slot);
            if let Some(ref url) = config.base_url {
                c = c.with_base_url(url);
            }
            Arc::new(OpenAIProvider::new(c)?)
        }
    };
    Ok(backend)
}

#[async_trait]
impl AIProvider for FailoverAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let wants_json = request.json_response;
        self.first_accepted(&request, |r| {
            if wants_json {
                decode_json_object(&r.content).map_err(|e| e.to_string())?;
            }
            Ok(r.clone())
        })
        .await
        .map(|accepted| accepted.value)
        .map_err(|e| AIError::unavailable(e.to_string()))
    }

    fn provider_info(&self) -> ProviderInfo {
        self.backends
            .first()
            .map(|b| b.provider_info())
            .unwrap_or_else(|| ProviderInfo::new("none", "none"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::ports::CompletionPurpose;

    fn request() -> CompletionRequest {
        CompletionRequest::new(CompletionPurpose::Moderation, "Hello")
    }

    #[tokio::test]
    async fn first_backend_success_stops_the_chain() {
        let first = MockAIProvider::new().with_response("one");
        let second = MockAIProvider::new().with_response("two");
        let chain = FailoverAIProvider::new()
            .with_backend(Arc::new(first.clone()))
            .with_backend(Arc::new(second.clone()));

        let accepted = chain.first_accepted(&request(), |r| Ok(r.content.clone())).await.unwrap();

        assert_eq!(accepted.value, "one");
        assert_eq!(accepted.attempt, 1);
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 0);
    }

    #[tokio::test]
    async fn any_error_moves_to_next_backend() {
        let first = MockAIProvider::new().with_error(MockError::AuthenticationFailed);
        let second = MockAIProvider::new().with_error(MockError::Timeout { timeout_secs: 20 });
        let third = MockAIProvider::new().with_response("three");
        let chain = FailoverAIProvider::new()
            .with_backend(Arc::new(first))
            .with_backend(Arc::new(second))
            .with_backend(Arc::new(third));

        let accepted = chain.first_accepted(&request(), |r| Ok(r.content.clone())).await.unwrap();
        assert_eq!(accepted.value, "three");
        assert_eq!(accepted.attempt, 3);
    }

    #[tokio::test]
    async fn refused_reply_counts_as_failure() {
        let first = MockAIProvider::new().with_response("not json");
        let second = MockAIProvider::new().with_response("{}");
        let chain = FailoverAIProvider::new()
            .with_backend(Arc::new(first))
            .with_backend(Arc::new(second));

        let accepted = chain
            .first_accepted(&request(), |r| {
                if r.content.starts_with('{') {
                    Ok(())
                } else {
                    Err("no json".to_string())
                }
            })
            .await
            .unwrap();
        assert_eq!(accepted.attempt, 2);
    }

    #[tokio::test]
    async fn exhausted_chain_reports_every_attempt() {
        let chain = FailoverAIProvider::new()
            .with_backend(Arc::new(
                MockAIProvider::new().with_error(MockError::Unavailable {
                    message: "overloaded".into(),
                }),
            ))
            .with_backend(Arc::new(
                MockAIProvider::new().with_error(MockError::RateLimited { retry_after_secs: 5 }),
            ));

        let err = chain
            .first_accepted(&request(), |r| Ok(r.content.clone()))
            .await
            .unwrap_err();
        match err {
            FailoverError::Exhausted { attempts } => {
                assert_eq!(attempts.len(), 2);
                assert!(attempts[0].error.contains("overloaded"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_chain_fails_fast() {
        let err = FailoverAIProvider::new()
            .first_accepted(&request(), |r| Ok(r.content.clone()))
            .await
            .unwrap_err();
        assert_eq!(err, FailoverError::NoBackends);
    }

    #[tokio::test]
    async fn chain_is_itself_a_provider() {
        let chain = FailoverAIProvider::new()
            .with_backend(Arc::new(MockAIProvider::new().with_error(MockError::AuthenticationFailed)))
            .with_backend(Arc::new(MockAIProvider::new().with_response("ok")));

        let response = chain.complete(request()).await.unwrap();
        assert_eq!(response.content, "ok");
    }

    #[tokio::test]
    async fn json_requests_skip_replies_without_json() {
        let prose = MockAIProvider::new().with_response("I think this is fine.");
        let json = MockAIProvider::new().with_response(r#"```json
{"isSafe": true}
```"#);
        let chain = FailoverAIProvider::new()
            .with_backend(Arc::new(prose.clone()))
            .with_backend(Arc::new(json.clone()));

        let response = chain.complete(request().expecting_json()).await.unwrap();
        assert!(response.content.contains("isSafe"));
        assert_eq!(prose.call_count(), 1);
        assert_eq!(json.call_count(), 1);

        let plain = FailoverAIProvider::new()
            .with_backend(Arc::new(MockAIProvider::new().with_response("prose is fine")));
        assert!(plain.complete(request()).await.is_ok());
    }

    #[test]
    fn from_config_interleaves_backup_keys_per_model() {
        let config = ModerationConfig {
            provider: ModerationProvider::Gemini,
            api_key: Secret::new("primary-key".into()),
            backup_api_key: Some(Secret::new("backup-key".into())),
            models: vec!["flash".into(), "pro".into()],
            ..ModerationConfig::default()
        };

        let chain = FailoverAIProvider::from_config(&config).unwrap();
        assert_eq!(
            chain.backend_labels(),
            vec![
                "gemini/flash#primary",
                "gemini/flash#backup",
                "gemini/pro#primary",
                "gemini/pro#backup",
            ]
        );
    }
}

mod cache;
pub mod client;
mod prompt;

pub use client::{FakeClient, LlmClient, LlmResponse, OllamaClient};

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use tracing::{debug, warn};

use crate::config::JudgeConfig;
use crate::model::Gender;

/// What a call into the judgment service produced. The variants make the
/// fallback decision explicit at every call site instead of burying it in a
/// catch-all error handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JudgeOutcome<T> {
    /// The service answered within the contract vocabulary.
    Answer(T),
    /// No client is configured; skip without attempting the call.
    Unavailable,
    /// Transport error, timeout, or a response outside the contract
    /// vocabulary where the operation demands a fallback.
    Failed(String),
}

/// Adapter over the external natural-language judgment service.
///
/// Owns the optional transport client and the bounded per-operation caches,
/// so repeated lookups within a run are deterministic. Constructed once at
/// the composition root and shared by reference; safe under callers running
/// analyses in parallel.
pub struct JudgeService {
    config: JudgeConfig,
    client: Option<Arc<dyn LlmClient>>,
    gender_cache: Mutex<LruCache<String, Gender>>,
    topic_cache: Mutex<LruCache<String, bool>>,
}

impl JudgeService {
    pub fn new(config: JudgeConfig, client: Option<Arc<dyn LlmClient>>) -> Self {
        let capacity = NonZeroUsize::new(config.cache_size.max(1)).unwrap();
        Self {
            config,
            client,
            gender_cache: Mutex::new(LruCache::new(capacity)),
            topic_cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// A service with no transport: every operation reports `Unavailable`
    /// and callers use their pure fallbacks.
    pub fn disabled() -> Self {
        Self::new(JudgeConfig::default(), None)
    }

    /// Connect to the Ollama server named by the config.
    pub fn from_config(config: JudgeConfig) -> anyhow::Result<Self> {
        let client: Arc<dyn LlmClient> = Arc::new(OllamaClient::new(&config)?);
        Ok(Self::new(config, Some(client)))
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// `classify_gender(name, context) -> "female" | "male" | "unknown"`.
    /// Out-of-vocabulary responses are answers of `Unknown`; cached by
    /// (name, context).
    pub async fn classify_gender(&self, name: &str, context: &str) -> JudgeOutcome<Gender> {
        let key = cache::gender_key(name, context);
        if let Some(cached) = self.gender_cache.lock().unwrap().get(&key).copied() {
            debug!(name, "gender cache hit");
            return JudgeOutcome::Answer(cached);
        }

        let gender = match self.call(&prompt::gender_prompt(name, context)).await {
            JudgeOutcome::Answer(text) => Gender::from_label(&text),
            JudgeOutcome::Unavailable => return JudgeOutcome::Unavailable,
            JudgeOutcome::Failed(reason) => return JudgeOutcome::Failed(reason),
        };

        self.gender_cache.lock().unwrap().put(key, gender);
        JudgeOutcome::Answer(gender)
    }

    /// `classify_topic(dialogue_text) -> bool`. Only a literal true/false is
    /// an answer; anything else demands the lexicon fallback. Cached by
    /// dialogue content.
    pub async fn classify_topic(&self, dialogue: &str) -> JudgeOutcome<bool> {
        let key = cache::topic_key(dialogue);
        if let Some(cached) = self.topic_cache.lock().unwrap().get(&key).copied() {
            debug!("topic cache hit");
            return JudgeOutcome::Answer(cached);
        }

        let about_men = match self.call(&prompt::topic_prompt(dialogue)).await {
            JudgeOutcome::Answer(text) => match parse_bool(&text) {
                Some(value) => value,
                None => {
                    return JudgeOutcome::Failed(format!(
                        "unexpected topic response: {:?}",
                        text.trim()
                    ))
                }
            },
            JudgeOutcome::Unavailable => return JudgeOutcome::Unavailable,
            JudgeOutcome::Failed(reason) => return JudgeOutcome::Failed(reason),
        };

        self.topic_cache.lock().unwrap().put(key, about_men);
        JudgeOutcome::Answer(about_men)
    }

    /// `validate_verdict(...) -> bool`. Uncached; at most one call per
    /// analysis, and the caller keeps its tentative verdict on anything but
    /// a literal answer.
    pub async fn validate_verdict(
        &self,
        female_names: &[String],
        conversations: &[Vec<String>],
        tentative_pass: bool,
    ) -> JudgeOutcome<bool> {
        let prompt = prompt::validation_prompt(female_names, conversations, tentative_pass);
        match self.call(&prompt).await {
            JudgeOutcome::Answer(text) => match parse_bool(&text) {
                Some(value) => JudgeOutcome::Answer(value),
                None => JudgeOutcome::Failed(format!(
                    "unexpected validation response: {:?}",
                    text.trim()
                )),
            },
            JudgeOutcome::Unavailable => JudgeOutcome::Unavailable,
            JudgeOutcome::Failed(reason) => JudgeOutcome::Failed(reason),
        }
    }

    async fn call(&self, prompt: &str) -> JudgeOutcome<String> {
        let Some(client) = &self.client else {
            return JudgeOutcome::Unavailable;
        };

        match tokio::time::timeout(self.config.timeout, client.complete(prompt, None)).await {
            Ok(Ok(resp)) => JudgeOutcome::Answer(resp.text),
            Ok(Err(e)) => {
                warn!(provider = client.provider_name(), error = %e, "judge call failed");
                JudgeOutcome::Failed(e.to_string())
            }
            Err(_) => {
                warn!(provider = client.provider_name(), "judge call timed out");
                JudgeOutcome::Failed(format!(
                    "timed out after {}s",
                    self.config.timeout.as_secs()
                ))
            }
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and replies from a queue, then errors when drained.
    struct CountingClient {
        responses: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl CountingClient {
        fn new(responses: Vec<&str>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().map(String::from).collect()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmClient for CountingClient {
        async fn complete(
            &self,
            _prompt: &str,
            _system: Option<&str>,
        ) -> anyhow::Result<LlmResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                anyhow::bail!("connection refused");
            }
            Ok(LlmResponse {
                text: responses.remove(0),
                provider: "mock".to_string(),
                model: "mock".to_string(),
            })
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    fn service(client: Arc<CountingClient>) -> JudgeService {
        JudgeService::new(JudgeConfig::default(), Some(client))
    }

    #[tokio::test]
    async fn disabled_service_reports_unavailable() {
        let svc = JudgeService::disabled();
        assert!(!svc.is_enabled());
        assert_eq!(
            svc.classify_gender("SARAH", "ctx").await,
            JudgeOutcome::Unavailable
        );
        assert_eq!(svc.classify_topic("hello").await, JudgeOutcome::Unavailable);
        assert_eq!(
            svc.validate_verdict(&[], &[], true).await,
            JudgeOutcome::Unavailable
        );
    }

    #[tokio::test]
    async fn gender_answers_are_cached_by_name_and_context() {
        let client = Arc::new(CountingClient::new(vec!["female"]));
        let svc = service(client.clone());

        let first = svc.classify_gender("ZOE", "some context").await;
        let second = svc.classify_gender("ZOE", "some context").await;
        assert_eq!(first, JudgeOutcome::Answer(Gender::Female));
        assert_eq!(second, JudgeOutcome::Answer(Gender::Female));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gender_cache_is_bounded_with_lru_eviction() {
        let client = Arc::new(CountingClient::new(vec!["female", "male", "female"]));
        let config = JudgeConfig {
            cache_size: 1,
            ..JudgeConfig::default()
        };
        let svc = JudgeService::new(config, Some(client.clone()));

        svc.classify_gender("ANNA", "ctx").await;
        svc.classify_gender("BORIS", "ctx").await;
        // BORIS evicted ANNA from the single-slot cache.
        let again = svc.classify_gender("ANNA", "ctx").await;
        assert_eq!(again, JudgeOutcome::Answer(Gender::Female));
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn out_of_vocabulary_gender_is_an_unknown_answer() {
        let client = Arc::new(CountingClient::new(vec!["hard to say, honestly"]));
        let svc = service(client);
        assert_eq!(
            svc.classify_gender("ZOE", "ctx").await,
            JudgeOutcome::Answer(Gender::Unknown)
        );
    }

    #[tokio::test]
    async fn out_of_vocabulary_topic_is_a_failure() {
        let client = Arc::new(CountingClient::new(vec!["maybe?", "TRUE"]));
        let svc = service(client.clone());

        assert!(matches!(
            svc.classify_topic("some dialogue").await,
            JudgeOutcome::Failed(_)
        ));
        // Failures are not cached; the retry reaches the client and the
        // case-insensitive literal parses.
        assert_eq!(
            svc.classify_topic("some dialogue").await,
            JudgeOutcome::Answer(true)
        );
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn transport_errors_become_failed_not_panics() {
        let client = Arc::new(CountingClient::new(vec![]));
        let svc = service(client);
        assert!(matches!(
            svc.classify_gender("ZOE", "ctx").await,
            JudgeOutcome::Failed(_)
        ));
    }

    #[tokio::test]
    async fn topic_cache_serves_repeat_lookups() {
        let client = Arc::new(CountingClient::new(vec!["false"]));
        let svc = service(client.clone());
        assert_eq!(svc.classify_topic("a b c").await, JudgeOutcome::Answer(false));
        assert_eq!(svc.classify_topic("a b c").await, JudgeOutcome::Answer(false));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }
}

//! Content Migrator LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `migrator-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scriptable mock for testing
//! - `GeminiProvider`: Google Generative Language API integration
//!
//! Providers make exactly one request per `generate` call. Retrying is the
//! extraction engine's decision, not the provider's.
//!
//! # Examples
//!
//! ```
//! use migrator_llm::MockProvider;
//! use migrator_domain::LlmProvider;
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let provider = MockProvider::new("---\ntitle: Apply\n---\n# Apply\n");
//! let markdown = provider.generate("Extract the page").await.unwrap();
//! assert!(markdown.starts_with("---"));
//! # });
//! ```

#![warn(missing_docs)]

pub mod gemini;

use migrator_domain::LlmProvider;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::future::{ready, Future};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use gemini::{GeminiProvider, DEFAULT_MODEL};

/// Failures of a model call
#[derive(Error, Debug)]
pub enum LlmError {
    /// The request never got an answer (connect, TLS, timeout, body read)
    #[error("Request failed: {0}")]
    Request(String),

    /// The service answered with an error status
    #[error("API returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// The answer could not be decoded or held no text
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Quota exhausted (HTTP 429)
    #[error("Rate limited by the model service")]
    RateLimited,

    /// Unknown model name (HTTP 404)
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Provider could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure injected by [`MockProvider`]
    #[error("Mock failure for prompt of {0} chars")]
    Mock(usize),
}

enum Reply {
    Text(String),
    Fail,
}

#[derive(Default)]
struct Recorder {
    fixed: HashMap<String, Reply>,
    queue: VecDeque<String>,
    received: Vec<String>,
}

/// Scriptable in-memory model for tests
///
/// Each call is answered by, in order of precedence: a reply registered for
/// the exact prompt, the next queued reply, or the fallback. [`Self::scripted`]
/// uses its last entry as the fallback so it keeps answering once the queue
/// is drained. Clones share the same recorder.
///
/// # Examples
///
/// ```
/// use migrator_llm::MockProvider;
/// use migrator_domain::LlmProvider;
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let provider = MockProvider::scripted(["<p>first</p>", "clean"]);
/// assert_eq!(provider.generate("a").await.unwrap(), "<p>first</p>");
/// assert_eq!(provider.generate("b").await.unwrap(), "clean");
/// assert_eq!(provider.generate("c").await.unwrap(), "clean");
/// assert_eq!(provider.call_count(), 3);
/// # });
/// ```
#[derive(Clone)]
pub struct MockProvider {
    fallback: String,
    recorder: Arc<Mutex<Recorder>>,
}

impl MockProvider {
    /// Answer every prompt with `reply`
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            fallback: reply.into(),
            recorder: Arc::default(),
        }
    }

    /// Answer with `replies` in order, repeating the last one
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue: VecDeque<String> = replies.into_iter().map(Into::into).collect();
        let provider = Self::new(queue.back().cloned().unwrap_or_default());
        provider.recorder().queue = queue;
        provider
    }

    /// Answer `prompt` with `reply` whenever it is seen
    pub fn respond_to(&self, prompt: impl Into<String>, reply: impl Into<String>) {
        self.recorder()
            .fixed
            .insert(prompt.into(), Reply::Text(reply.into()));
    }

    /// Fail whenever `prompt` is seen
    pub fn fail_on(&self, prompt: impl Into<String>) {
        self.recorder().fixed.insert(prompt.into(), Reply::Fail);
    }

    /// Number of calls received, failed ones included
    pub fn call_count(&self) -> usize {
        self.recorder().received.len()
    }

    /// Every prompt received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.recorder().received.clone()
    }

    fn recorder(&self) -> MutexGuard<'_, Recorder> {
        // Poisoning only means another test thread panicked mid-call
        self.recorder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn answer(&self, prompt: &str) -> Result<String, LlmError> {
        let mut recorder = self.recorder();
        recorder.received.push(prompt.to_string());

        match recorder.fixed.get(prompt) {
            Some(Reply::Text(reply)) => return Ok(reply.clone()),
            Some(Reply::Fail) => return Err(LlmError::Mock(prompt.len())),
            None => {}
        }

        Ok(recorder
            .queue
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

impl Default for MockProvider {
    /// A provider answering with an empty string
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockProvider")
            .field("fallback", &self.fallback)
            .field("calls", &self.call_count())
            .finish()
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send {
        ready(self.answer(prompt))
    }
}

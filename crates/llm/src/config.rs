use std::time::Duration;

/// Default provider endpoint (OpenRouter's OpenAI-compatible API).
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Default per-call deadline in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Provider connection settings, resolved once at startup and handed to
/// [`crate::ChatCompletionsClient::new`].
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Deadline for a single completion call.
    pub timeout: Duration,
}

impl LlmConfig {
    /// Load provider configuration from environment variables.
    ///
    /// | Env Var              | Default                          |
    /// |----------------------|----------------------------------|
    /// | `OPENAI_BASE_URL`    | `https://openrouter.ai/api/v1`   |
    /// | `OPENROUTER_API_KEY` | falls back to `OPENAI_API_KEY`   |
    /// | `LLM_MODEL`          | `google/gemini-2.5-flash`        |
    /// | `LLM_TIMEOUT_SECS`   | `45`                             |
    ///
    /// A missing API key is not fatal: every call will fail and the service
    /// degrades to fallback names, which is logged at startup.
    pub fn from_env() -> Self {
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let api_key = std::env::var("OPENROUTER_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .unwrap_or_default();

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let timeout_secs: u64 = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("LLM_TIMEOUT_SECS must be a valid u64");

        Self {
            base_url,
            api_key,
            model,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

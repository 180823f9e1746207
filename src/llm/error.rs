use thiserror::Error;

/// Failures surfaced by [`super::LlmClient::generate`].
///
/// The type is `Clone` so one result can be shared by every caller waiting on
/// the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// The provider did not answer before the per-call deadline.
    #[error("LLM request timed out")]
    Timeout,

    /// The local rate limiter rejected the call; nothing was sent.
    #[error("LLM request rejected by rate limiter")]
    RateLimited,

    /// Non-2xx status, transport failure or an unusable payload.
    #[error("LLM provider failure: {0}")]
    ProviderFailure(String),

    /// The prompt was empty or otherwise unusable.
    #[error("invalid LLM input: {0}")]
    InvalidInput(String),
}

impl LlmError {
    /// Whether a bounded retry may help.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::ProviderFailure(_))
    }
}

use thiserror::Error;

/// Errors surfaced by the analysis pipeline.
///
/// External judgment-service failures are not represented here: every call
/// site into the judge has a documented fallback and degrades through
/// [`crate::judge::JudgeOutcome`] instead of erroring.
#[derive(Debug, Error)]
pub enum BechdelError {
    /// A broken invariant inside conversation segmentation. This is a
    /// processing failure, not a Bechdel FAIL verdict.
    #[error("failed to extract conversations: {0}")]
    Conversation(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read script")]
    Io(#[from] std::io::Error),
}

//! Rejections returned by session operations.
//!
//! A rejected operation never changes game state.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("session is not playing")]
    NotPlaying,
    #[error("{0} is not available in the current phase")]
    Locked(String),
    #[error("cannot afford {0}")]
    Unaffordable(String),
    #[error("unknown entry: {0}")]
    UnknownEntry(String),
    #[error("{0} is already in progress")]
    AlreadyActive(String),
    #[error("{0} is already completed")]
    AlreadyCompleted(String),
    #[error("{0} is missing prerequisites")]
    MissingPrerequisites(String),
    #[error("no prompt is waiting for an answer")]
    NoPrompt,
    #[error("panel is waiting on a prompt")]
    Suspended,
    #[error("allocation must sum to 100, got {0}")]
    InvalidAllocation(u32),
}

//! Poll application error types.

use thiserror::Error;

/// Errors raised by the poll store and service.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Poll does not exist.
    #[error("poll {0} not found")]
    PollNotFound(u64),

    /// Choice does not exist.
    #[error("choice {0} not found")]
    ChoiceNotFound(u64),

    /// The acting user does not own the poll.
    #[error("user '{user}' does not own poll {poll_id}")]
    NotOwner { user: String, poll_id: u64 },

    /// The user has already voted on the poll.
    #[error("user '{user}' already voted on poll {poll_id}")]
    AlreadyVoted { user: String, poll_id: u64 },

    /// A vote was submitted without a choice.
    #[error("no choice selected")]
    NoChoiceSelected,

    /// The choice belongs to a different poll.
    #[error("choice {choice_id} does not belong to poll {poll_id}")]
    ChoiceNotInPoll { choice_id: u64, poll_id: u64 },

    /// The poll has ended and no longer accepts votes.
    #[error("poll {0} has ended")]
    PollClosed(u64),

    /// Genre does not exist.
    #[error("genre {0} not found")]
    GenreNotFound(u64),

    /// A genre of that name already exists.
    #[error("genre '{0}' already exists")]
    DuplicateGenre(String),

    /// Sample data row does not exist.
    #[error("sample data {0} not found")]
    SampleDataNotFound(u64),

    /// Sample tree node does not exist.
    #[error("sample node {0} not found")]
    SampleNodeNotFound(u64),

    /// Invalid input.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type for poll operations.
pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

/// The word source could not provide a usable word. Always recovered from
/// the local pool; never shown to the player.
#[derive(Debug, Error)]
pub enum SupplyError {
    #[error("word source unavailable: {0}")]
    Unavailable(String),
    #[error("word source answered with status {0}")]
    Status(u16),
    #[error("word source sent a malformed body: {0}")]
    Malformed(String),
    #[error("word source returned no words")]
    Empty,
}

/// Posting a finished game to the score service failed. Logged and dropped.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("score service unreachable: {0}")]
    Transport(String),
    #[error("score service answered with status {0}")]
    Status(u16),
    #[error("score submission disabled in this build")]
    Disabled,
}

use super::domain::ParticipantResponse;

/// Append-only response storage. Implementations hand out owned snapshots so
/// a scoring run never observes a concurrent append.
pub trait ResponseRepository: Send + Sync {
    /// Store a response, returning its 1-based sequence number.
    fn append(&self, response: ParticipantResponse) -> Result<u64, RepositoryError>;
    fn list_all(&self) -> Result<Vec<ParticipantResponse>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("response store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid response CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("stored response {file} is malformed: {detail}")]
    Corrupt { file: String, detail: String },
    #[error("response store unavailable: {0}")]
    Unavailable(String),
}

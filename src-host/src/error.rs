use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Invalid data: {0}")]
    Serde(String),
    #[error("Not available: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for CommandError {
    fn from(error: std::io::Error) -> Self {
        CommandError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(error: serde_json::Error) -> Self {
        CommandError::Serde(error.to_string())
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

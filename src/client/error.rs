use std::io;
use suppaftp::FtpError;
use thiserror::Error;
use tokio::time::error::Elapsed as TimeElapsed;

/// Enum for client errors
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Error reported by the FTP stream, including negative server replies
    #[error("FTP: {0}")]
    Ftp(String),
    /// Any errors related to I/O
    #[error("I/O: {0}")]
    IO(String),
    /// Time limit for establishing the connection exceeded
    #[error("Timeout")]
    Timeout,
    /// The session has already been closed
    #[error("Connection closed")]
    Closed,
    /// A listing line that does not follow the MLSD fact format
    #[error("Malformed listing line: {0}")]
    Listing(String),
    /// Occurs when the server behaves in a way the client cannot handle
    #[error("{0}")]
    UnexpectedBehavior(String),
}

impl From<FtpError> for Error {
    fn from(error: FtpError) -> Self {
        Self::Ftp(error.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Self::IO(error.to_string())
    }
}

impl From<TimeElapsed> for Error {
    fn from(_: TimeElapsed) -> Self {
        Self::Timeout
    }
}

use std::{io, path::PathBuf};
use thiserror::Error;

use crate::client;

pub type MirrorResult<T> = Result<T, Error>;

/// Errors raised while mirroring onto the local filesystem
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O: {0}")]
    IO(String),
    /// The local destination is missing, not a directory or read-only
    #[error("Local directory {} does not exist or is not writable", .0.display())]
    InvalidDestination(PathBuf),
    #[error("{0}")]
    Client(#[from] client::error::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

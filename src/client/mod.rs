pub mod error;
pub mod fs;
#[cfg(test)]
pub(crate) mod memory;
mod session;

pub use session::FtpSession;

use std::path::Path;

use crate::{
    config::ConnectOptions,
    protocol::{self, TransferMode},
    transfer_log::TransferLog,
};
use error::Error;
use fs::ReadDir;

pub type ClientResult<T> = Result<T, Error>;

/// Remote operations the mirror needs from an FTP session. This is `async_trait`
///
/// Only one operation runs against a client at a time: every method takes
/// `&mut self`.
#[async_trait]
pub trait FtpClient: Send {
    /// Returns the current working directory (`PWD`).
    async fn pwd(&mut self) -> ClientResult<String>;

    /// Changes the working directory (`CWD`).
    async fn cwd(&mut self, path: &str) -> ClientResult<()>;

    /// Raw `MLSD` lines of the given directory, markers included.
    async fn list(&mut self, path: &str) -> ClientResult<Vec<String>>;

    /// Streams a remote file (`RETR`) into `local`, creating or truncating
    /// it. Returns the number of bytes written.
    ///
    /// On error `local` may hold a partial copy.
    async fn retrieve(&mut self, path: &str, mode: TransferMode, local: &Path) -> ClientResult<u64>;

    /// Lists a directory and parses its facts.
    async fn read_dir(&mut self, path: &str) -> ClientResult<ReadDir> {
        self.list(path)
            .await?
            .iter()
            .map(|line| protocol::parse_line(line))
            .collect()
    }

    /// Tells whether `path` is a directory by changing into it.
    ///
    /// The working directory is restored before returning. Any error is
    /// reported as `false`.
    async fn is_dir(&mut self, path: &str) -> bool {
        let origin = match self.pwd().await {
            Ok(origin) => origin,
            Err(err) => {
                debug!("pwd failed while checking {}: {}", path, err);
                return false;
            }
        };

        if let Err(err) = self.cwd(path).await {
            debug!("{} is not a directory: {}", path, err);
            return false;
        }

        if let Err(err) = self.cwd(&origin).await {
            warn!("could not return to {} after checking {}: {}", origin, path, err);
        }

        true
    }
}

/// Connects to `host` on the default port, logs in and enables passive mode.
pub async fn connect(
    host: &str,
    user: &str,
    password: &str,
    log: &mut TransferLog,
) -> ClientResult<FtpSession> {
    let session = FtpSession::connect(&ConnectOptions::new(host, user, password)).await?;
    log.add("FTP Connected");
    log.flush();
    Ok(session)
}

/// Closes the session. Returns `false` if it was already closed or `QUIT` failed
pub async fn close(session: &mut FtpSession, log: &mut TransferLog) -> bool {
    let closed = match session.close().await {
        Ok(()) => {
            log.add("FTP closed");
            true
        }
        Err(err) => {
            log.add(format!("Failed to close connection: {err}"));
            false
        }
    };

    log.flush();
    closed
}

/// Returns whether `path` is a directory on the remote side, see [`FtpClient::is_dir`]
pub async fn is_remote_directory<C>(path: &str, client: &mut C) -> bool
where
    C: FtpClient + ?Sized,
{
    client.is_dir(path).await
}

use futures::AsyncReadExt;
use std::path::Path;
use suppaftp::{AsyncFtpStream, Mode};
use tokio::{fs::File, io::AsyncWriteExt, time};

use super::{error::Error, ClientResult, FtpClient};
use crate::{
    config::ConnectOptions,
    protocol::{self, TransferMode},
};

const CHUNK_SIZE: usize = 32 * 1024;

/// Authenticated FTP session over [`suppaftp`].
///
/// Created by [`FtpSession::connect`] and released by [`FtpSession::close`].
/// Every operation after `close` fails with [`Error::Closed`].
pub struct FtpSession {
    stream: Option<AsyncFtpStream>,
}

impl FtpSession {
    /// Connects, logs in and switches the data connection mode
    pub async fn connect(options: &ConnectOptions) -> ClientResult<Self> {
        let address = options.address();
        debug!("connecting to {}", address);

        let mut stream = time::timeout(options.timeout(), AsyncFtpStream::connect(address)).await??;
        stream
            .login(options.user.as_str(), options.password.as_str())
            .await?;

        stream.set_mode(if options.passive {
            Mode::Passive
        } else {
            Mode::Active
        });

        debug!("logged in as {}", options.user);

        Ok(Self {
            stream: Some(stream),
        })
    }

    #[cfg(test)]
    pub(crate) fn closed() -> Self {
        Self { stream: None }
    }

    fn stream(&mut self) -> ClientResult<&mut AsyncFtpStream> {
        self.stream.as_mut().ok_or(Error::Closed)
    }

    /// Returns `true` until the session is closed
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Sends `QUIT` and drops the control connection
    pub async fn close(&mut self) -> ClientResult<()> {
        let mut stream = self.stream.take().ok_or(Error::Closed)?;
        stream.quit().await?;
        Ok(())
    }

    /// Downloads one file, picking the transfer mode from its extension
    pub async fn download<P: AsRef<Path>>(&mut self, remote: &str, local: P) -> ClientResult<()> {
        let _ = self
            .retrieve(remote, protocol::get_ftp_mode(remote), local.as_ref())
            .await?;
        Ok(())
    }
}

/// Copies the data connection into `file` chunk by chunk
async fn copy<R>(reader: &mut R, file: &mut File) -> ClientResult<u64>
where
    R: futures::AsyncRead + Unpin,
{
    let mut buffer = vec![0; CHUNK_SIZE];
    let mut written = 0;

    loop {
        let read = reader.read(&mut buffer).await?;
        if read == 0 {
            break;
        }

        file.write_all(&buffer[..read]).await?;
        written += read as u64;
    }

    file.flush().await?;
    Ok(written)
}

#[async_trait]
impl FtpClient for FtpSession {
    async fn pwd(&mut self) -> ClientResult<String> {
        Ok(self.stream()?.pwd().await?)
    }

    async fn cwd(&mut self, path: &str) -> ClientResult<()> {
        Ok(self.stream()?.cwd(path).await?)
    }

    async fn list(&mut self, path: &str) -> ClientResult<Vec<String>> {
        debug!("MLSD {}", path);
        Ok(self.stream()?.mlsd(Some(path)).await?)
    }

    async fn retrieve(&mut self, path: &str, mode: TransferMode, local: &Path) -> ClientResult<u64> {
        let stream = self.stream()?;
        debug!("RETR {} ({}) into {}", path, mode, local.display());

        stream.transfer_type(mode.into()).await?;
        let mut file = File::create(local).await?;
        let mut data = stream.retr_as_stream(path).await?;

        let copied = copy(&mut data, &mut file).await;
        // the server reply has to be read even when the copy failed
        let finalized = stream.finalize_retr_stream(data).await;

        let written = copied?;
        finalized?;
        Ok(written)
    }
}

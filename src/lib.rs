//! FTP client wrapper with one-way directory mirroring.
//!
//! ```no_run
//! use ftp_mirror::{client, mirror, TransferLog};
//!
//! # async fn run() -> Result<(), ftp_mirror::client::error::Error> {
//! let mut log = TransferLog::new();
//! let mut session = client::connect("ftp.example.com", "anonymous", "guest", &mut log).await?;
//!
//! // recreates /pub/data as ./backup/data
//! let complete = mirror::download_dir(&mut session, "/pub/data", "./backup", &mut log).await;
//!
//! client::close(&mut session, &mut log).await;
//! # let _ = complete;
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate async_trait;

/// Client side
pub mod client;
pub mod config;
pub mod error;
pub mod local;
/// Directory mirroring
pub mod mirror;
/// Listing and transfer mode helpers
pub mod protocol;
mod transfer_log;
mod utils;

pub use client::{close, connect, is_remote_directory, FtpClient, FtpSession};
pub use config::{ConnectOptions, MirrorOptions, ModePolicy};
pub use mirror::{download_all, download_dir, Mirror, MirrorReport};
pub use protocol::{get_ftp_mode, TransferMode};
pub use transfer_log::TransferLog;

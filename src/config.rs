use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::protocol::{self, TransferMode};

/// Parameters of an FTP connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Use passive data connections.
    /// Default: true
    pub passive: bool,
    /// Connect timeout in seconds.
    /// Default: 10 seconds
    pub timeout: u64,
}

impl ConnectOptions {
    pub fn new<H, U, P>(host: H, user: U, password: P) -> Self
    where
        H: Into<String>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 21,
            user: "anonymous".to_owned(),
            password: String::new(),
            passive: true,
            timeout: 10,
        }
    }
}

/// How the mirror picks the transfer mode of each file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModePolicy {
    /// Every file is fetched byte-exact
    #[default]
    Binary,
    /// Text extensions are fetched in ASCII mode, see [`protocol::get_ftp_mode`]
    ByExtension,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorOptions {
    pub mode: ModePolicy,
    /// Emit the per-file transfer log
    pub logging: bool,
}

impl MirrorOptions {
    #[must_use]
    pub fn transfer_mode(&self, filename: &str) -> TransferMode {
        match self.mode {
            ModePolicy::Binary => TransferMode::Binary,
            ModePolicy::ByExtension => protocol::get_ftp_mode(filename),
        }
    }
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            mode: ModePolicy::Binary,
            logging: true,
        }
    }
}

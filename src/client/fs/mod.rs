//! Remote directory entries.
//!
//! Listings are requested with `MLSD`, so every entry carries machine-readable
//! facts instead of an `ls -l` line. The API mirrors [`std::fs`] where it can.

mod dir;

use chrono::{DateTime, Utc};

use crate::protocol;

pub use dir::{DirEntry, ReadDir};

/// Value of the `type` fact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FileType {
    #[default]
    File,
    Dir,
    /// `cdir`, the listed directory itself
    CurrentDir,
    /// `pdir`, the parent of the listed directory
    ParentDir,
    /// Server specific types such as `OS.unix=symlink`
    Other(String),
}

impl FileType {
    pub(crate) fn from_fact(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "dir" => Self::Dir,
            "cdir" => Self::CurrentDir,
            "pdir" => Self::ParentDir,
            _ => Self::Other(value.to_owned()),
        }
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        *self == Self::Dir
    }

    /// Returns `true` for the self/parent entries that must never be descended into
    #[must_use]
    pub fn is_marker(&self) -> bool {
        matches!(self, Self::CurrentDir | Self::ParentDir)
    }
}

/// Facts reported by the server for one entry
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub file_type: FileType,
    pub size: Option<u64>,
    /// Raw `modify` fact, `YYYYMMDDHHMMSS[.sss]` in UTC
    pub modify: Option<String>,
}

impl Metadata {
    #[must_use]
    pub fn file_type(&self) -> FileType {
        self.file_type.clone()
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.file_type.is_dir()
    }

    /// Returns the size of the file
    #[must_use]
    pub fn len(&self) -> u64 {
        self.size.unwrap_or(0)
    }

    /// Returns the last modification time, if the server sent a valid one
    #[must_use]
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modify.as_deref().and_then(protocol::parse_time)
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use suppaftp::types::{FileType, FormatControl};

use crate::utils;

/// Extensions fetched in text mode by [`get_ftp_mode`]
const TEXT_EXTENSIONS: &[&str] = &[
    "am", "asp", "bat", "c", "cfm", "cgi", "conf", "cpp", "css", "csv", "dhtml", "diz", "h",
    "hpp", "htm", "html", "in", "inc", "js", "m4", "mak", "nfs", "nsi", "pas", "patch", "php",
    "php3", "php4", "php5", "phtml", "pl", "po", "py", "qmail", "sh", "shtml", "sql", "tcl",
    "tpl", "txt", "vbs", "xml", "xrc",
];

/// Representation type used for a `RETR`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    /// ASCII with line-ending translation
    Text,
    /// Byte-exact image
    Binary,
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Binary => f.write_str("binary"),
        }
    }
}

impl From<TransferMode> for FileType {
    fn from(mode: TransferMode) -> Self {
        match mode {
            TransferMode::Text => FileType::Ascii(FormatControl::Default),
            TransferMode::Binary => FileType::Binary,
        }
    }
}

/// Picks the transfer mode from the extension of the file name.
///
/// Only the last path component is inspected, so `notes.d/README` has no
/// extension. Files without extension are fetched in binary mode.
#[must_use]
pub fn get_ftp_mode(filename: &str) -> TransferMode {
    let name = utils::basename(filename);
    let Some((_, extension)) = name.rsplit_once('.') else {
        return TransferMode::Binary;
    };

    let extension = extension.to_ascii_lowercase();
    if TEXT_EXTENSIONS.contains(&extension.as_str()) {
        TransferMode::Text
    } else {
        TransferMode::Binary
    }
}

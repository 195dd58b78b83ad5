use chrono::{DateTime, Utc};
use filetime::FileTime;
use std::time::SystemTime;

/// Separator used in remote paths
pub const SEPARATOR: char = '/';

pub fn datetime(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

pub fn file_time(time: DateTime<Utc>) -> FileTime {
    FileTime::from_unix_time(time.timestamp(), time.timestamp_subsec_nanos())
}

/// Last component of a remote path, ignoring trailing separators
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATOR);
    match trimmed.rfind(SEPARATOR) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

/// Returns the path ending with exactly one separator
pub fn with_trailing_separator(path: &str) -> String {
    format!("{}{}", path.trim_end_matches(SEPARATOR), SEPARATOR)
}

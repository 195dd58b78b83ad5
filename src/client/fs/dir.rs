use std::collections::VecDeque;

use super::{FileType, Metadata};

/// Entries returned by the [`ReadDir`] iterator.
#[derive(Debug, Clone)]
pub struct DirEntry {
    file: String,
    metadata: Metadata,
}

impl DirEntry {
    pub(crate) fn new(file: String, metadata: Metadata) -> Self {
        Self { file, metadata }
    }

    /// Returns the name as listed, relative to the listed directory.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file
    }

    /// Returns the file type for the file that this entry points at.
    #[must_use]
    pub fn file_type(&self) -> FileType {
        self.metadata.file_type()
    }

    /// Returns the metadata for the file that this entry points at.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// Iterator over the entries in a remote directory.
///
/// The `cdir` and `pdir` markers and entries named `.` or `..` are never
/// yielded.
#[derive(Debug, Default)]
pub struct ReadDir {
    pub(crate) entries: VecDeque<DirEntry>,
}

impl Iterator for ReadDir {
    type Item = DirEntry;

    fn next(&mut self) -> Option<Self::Item> {
        match self.entries.pop_front() {
            None => None,
            Some(entry) if entry.metadata.file_type.is_marker() => self.next(),
            Some(entry) if matches!(entry.file.as_str(), "." | "..") => self.next(),
            Some(entry) => Some(entry),
        }
    }
}

impl FromIterator<DirEntry> for ReadDir {
    fn from_iter<I: IntoIterator<Item = DirEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

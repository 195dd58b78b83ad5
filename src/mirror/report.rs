use std::path::PathBuf;

/// Result of mirroring a single remote file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Downloaded,
    /// The local copy was already current; only its mtime was adjusted
    Skipped,
    Failed(String),
}

/// Counters of one remote directory
#[derive(Debug, Clone)]
pub struct LevelReport {
    pub remote_dir: String,
    pub local_dir: PathBuf,
    /// Entries other than the `cdir`/`pdir` markers
    pub to_download: usize,
    /// Files fetched plus subdirectories mirrored completely
    pub downloaded: usize,
    pub skipped: usize,
    /// Set when the directory could not be entered, listed or created
    pub error: Option<String>,
}

impl LevelReport {
    pub(crate) fn new(remote_dir: String, local_dir: PathBuf) -> Self {
        Self {
            remote_dir,
            local_dir,
            to_download: 0,
            downloaded: 0,
            skipped: 0,
            error: None,
        }
    }

    pub(crate) fn failed<R: Into<String>>(remote_dir: R, local_dir: PathBuf, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(remote_dir.into(), local_dir)
        }
    }

    pub(crate) fn record(&mut self, outcome: &EntryOutcome) {
        match outcome {
            EntryOutcome::Downloaded => self.downloaded += 1,
            EntryOutcome::Skipped => self.skipped += 1,
            EntryOutcome::Failed(_) => (),
        }
    }

    /// Every entry was transferred. Skipped files do not count, so a level
    /// with anything already up to date is not complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.to_download == self.downloaded
    }
}

/// Everything a mirror run did.
///
/// `levels` are in completion order, so the directory the run started from
/// comes last.
#[derive(Debug, Default)]
pub struct MirrorReport {
    pub levels: Vec<LevelReport>,
    pub files: Vec<(String, EntryOutcome)>,
}

impl MirrorReport {
    /// Report of the directory the run started from
    #[must_use]
    pub fn root(&self) -> Option<&LevelReport> {
        self.levels.last()
    }

    /// Whether the whole tree was transferred cleanly
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.root().is_some_and(LevelReport::is_complete)
    }

    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.count(&EntryOutcome::Downloaded)
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(&EntryOutcome::Skipped)
    }

    /// Remote paths that failed, with the reason
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        let files = self.files.iter().filter_map(|(path, outcome)| match outcome {
            EntryOutcome::Failed(reason) => Some((path.as_str(), reason.as_str())),
            _ => None,
        });
        let levels = self.levels.iter().filter_map(|level| {
            level
                .error
                .as_deref()
                .map(|reason| (level.remote_dir.as_str(), reason))
        });

        files.chain(levels)
    }

    fn count(&self, expected: &EntryOutcome) -> usize {
        self.files
            .iter()
            .filter(|(_, outcome)| outcome == expected)
            .count()
    }
}

//! One-way mirroring of a remote directory tree.
//!
//! Files are fetched when the local copy is missing or older than the
//! remote `modify` fact, and get the remote modification time afterwards.
//! Up-to-date files are skipped but still get their mtime aligned.
//!
//! The tree is walked depth-first with an explicit stack of open
//! directories, so deep trees do not grow the call stack.

mod report;

pub use report::{EntryOutcome, LevelReport, MirrorReport};

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::{
    client::{
        fs::{DirEntry, ReadDir},
        FtpClient,
    },
    config::MirrorOptions,
    error::MirrorResult,
    local,
    protocol::TransferMode,
    transfer_log::TransferLog,
    utils::{self, SEPARATOR},
};

/// Directory being walked
struct Frame {
    entries: ReadDir,
    level: LevelReport,
}

/// Mirrors remote directories through a borrowed client.
pub struct Mirror<'a, C: FtpClient + ?Sized> {
    client: &'a mut C,
    log: &'a mut TransferLog,
    options: MirrorOptions,
}

impl<'a, C> Mirror<'a, C>
where
    C: FtpClient + ?Sized,
{
    pub fn new(client: &'a mut C, log: &'a mut TransferLog) -> Self {
        Self {
            client,
            log,
            options: MirrorOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: MirrorOptions) -> Self {
        self.options = options;
        self
    }

    /// Mirrors `remote_dir` into `destination`.
    ///
    /// Without a trailing `/` the remote directory itself is recreated under
    /// `destination`, with one only its content is. The destination must be
    /// an existing writable directory.
    pub async fn download_dir(
        &mut self,
        remote_dir: &str,
        destination: &Path,
    ) -> MirrorResult<MirrorReport> {
        local::check_destination(destination).await?;

        let mut local_dir: PathBuf = destination.components().collect();
        if !remote_dir.ends_with(SEPARATOR) {
            let name = utils::basename(remote_dir);
            if !matches!(name, "" | "." | "..") {
                local_dir.push(name);
                local::ensure_dir(&local_dir).await?;
            }
        }

        Ok(self.download_all(remote_dir, &local_dir).await)
    }

    /// Mirrors the content of `remote_dir` into the existing `local_dir`.
    pub async fn download_all(&mut self, remote_dir: &str, local_dir: &Path) -> MirrorReport {
        let mut report = MirrorReport::default();
        let mut stack = Vec::new();

        match self.open_level(remote_dir, local_dir.components().collect()).await {
            Ok(frame) => stack.push(frame),
            Err(level) => report.levels.push(level),
        }

        while let Some(frame) = stack.last_mut() {
            let Some(entry) = frame.entries.next() else {
                if let Some(done) = stack.pop() {
                    Self::close_level(done.level, &mut stack, &mut report);
                }
                continue;
            };

            frame.level.to_download += 1;
            let remote_path = format!("{}{}", frame.level.remote_dir, entry.file_name());
            let local_path = frame.level.local_dir.join(utils::basename(entry.file_name()));

            if entry.file_type().is_dir() {
                match self.enter_dir(&remote_path, local_path).await {
                    Ok(child) => stack.push(child),
                    Err(level) => report.levels.push(level),
                }
            } else {
                let outcome = self.sync_file(&remote_path, &entry, &local_path).await;
                if let Some(frame) = stack.last_mut() {
                    frame.level.record(&outcome);
                }
                report.files.push((remote_path, outcome));
            }
        }

        self.log.flush();
        report
    }

    fn close_level(level: LevelReport, stack: &mut [Frame], report: &mut MirrorReport) {
        let complete = level.is_complete();
        if !complete {
            warn!(
                "{}: {} of {} entries downloaded, {} skipped",
                level.remote_dir, level.downloaded, level.to_download, level.skipped
            );
        }

        if let Some(parent) = stack.last_mut() {
            if complete {
                parent.level.downloaded += 1;
            }
        }

        report.levels.push(level);
    }

    async fn open_level(&mut self, remote_dir: &str, local_dir: PathBuf) -> Result<Frame, LevelReport> {
        if !self.client.is_dir(remote_dir).await {
            return Err(LevelReport::failed(
                remote_dir,
                local_dir,
                "not a directory".to_owned(),
            ));
        }

        let remote_dir = utils::with_trailing_separator(remote_dir);
        match self.client.read_dir(&remote_dir).await {
            Ok(entries) => Ok(Frame {
                entries,
                level: LevelReport::new(remote_dir, local_dir),
            }),
            Err(err) => {
                warn!("listing {} failed: {}", remote_dir, err);
                Err(LevelReport::failed(remote_dir, local_dir, err.to_string()))
            }
        }
    }

    async fn enter_dir(&mut self, remote_path: &str, local_path: PathBuf) -> Result<Frame, LevelReport> {
        self.note(format!("Creating {}", local_path.display()));
        if let Err(err) = local::ensure_dir(&local_path).await {
            warn!("creating {} failed: {}", local_path.display(), err);
            return Err(LevelReport::failed(remote_path, local_path, err.to_string()));
        }

        self.note(format!("Entering {remote_path}"));
        self.open_level(&utils::with_trailing_separator(remote_path), local_path)
            .await
    }

    async fn sync_file(&mut self, remote_path: &str, entry: &DirEntry, local_path: &Path) -> EntryOutcome {
        self.note(format!("Downloading file {remote_path} "));

        let remote_time = entry.metadata().modified();
        if let Some(remote_time) = remote_time {
            if local::exists(local_path).await {
                match Self::is_current(local_path, remote_time).await {
                    Ok(true) => {
                        self.note_append(" [skipping file]");
                        return match local::set_modified(local_path, remote_time) {
                            Ok(()) => EntryOutcome::Skipped,
                            Err(err) => self.fail(remote_path, &err.to_string()),
                        };
                    }
                    Ok(false) => (),
                    Err(err) => return self.fail(remote_path, &err.to_string()),
                }
            }
        } else {
            debug!("{} has no usable modify fact", remote_path);
        }

        let mode = self.options.transfer_mode(entry.file_name());
        if let Err(err) = self.fetch(remote_path, mode, local_path, remote_time).await {
            return self.fail(remote_path, &err.to_string());
        }

        self.note_append("success");
        EntryOutcome::Downloaded
    }

    /// The local copy is current unless the remote one is strictly newer
    async fn is_current(local_path: &Path, remote_time: DateTime<Utc>) -> MirrorResult<bool> {
        Ok(remote_time <= local::modified(local_path).await?)
    }

    /// Downloads next to `local_path` and renames over it once complete. A
    /// failed transfer leaves the previous copy intact.
    async fn fetch(
        &mut self,
        remote_path: &str,
        mode: TransferMode,
        local_path: &Path,
        remote_time: Option<DateTime<Utc>>,
    ) -> MirrorResult<()> {
        let partial = local::partial_path(local_path);
        if let Err(err) = self.client.retrieve(remote_path, mode, &partial).await {
            local::discard(&partial).await;
            return Err(err.into());
        }

        if let Err(err) = local::commit(&partial, local_path).await {
            local::discard(&partial).await;
            return Err(err);
        }

        if let Some(remote_time) = remote_time {
            local::set_modified(local_path, remote_time)?;
        }
        Ok(())
    }

    fn fail(&mut self, remote_path: &str, reason: &str) -> EntryOutcome {
        self.note_append("failed");
        warn!("download of {} failed: {}", remote_path, reason);
        EntryOutcome::Failed(reason.to_owned())
    }

    fn note(&mut self, line: String) {
        if self.options.logging {
            self.log.add(line);
        }
    }

    fn note_append(&mut self, suffix: &str) {
        if self.options.logging {
            self.log.append_last_line(suffix);
        }
    }
}

/// Mirrors `remote_dir` into `local_dir` with default options.
///
/// Returns `true` only if every file was downloaded and every subdirectory
/// mirrored that way; a skipped up-to-date file makes it `false`. Errors are
/// logged, never returned.
pub async fn download_dir<C, P>(
    client: &mut C,
    remote_dir: &str,
    local_dir: P,
    log: &mut TransferLog,
) -> bool
where
    C: FtpClient + ?Sized,
    P: AsRef<Path>,
{
    match Mirror::new(client, log)
        .download_dir(remote_dir, local_dir.as_ref())
        .await
    {
        Ok(report) => report.is_complete(),
        Err(err) => {
            error!("download_dir: {}", err);
            false
        }
    }
}

/// Mirrors the content of `remote_dir` into the existing `local_dir`.
pub async fn download_all<C, P>(
    client: &mut C,
    remote_dir: &str,
    local_dir: P,
    log: &mut TransferLog,
) -> bool
where
    C: FtpClient + ?Sized,
    P: AsRef<Path>,
{
    Mirror::new(client, log)
        .download_all(remote_dir, local_dir.as_ref())
        .await
        .is_complete()
}

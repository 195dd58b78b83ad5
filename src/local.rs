//! Local side of the mirror.

use chrono::{DateTime, Utc};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};
use tokio::fs;

use crate::{
    error::{Error, MirrorResult},
    utils,
};

/// Checks that `path` is an existing, writable directory
pub async fn check_destination(path: &Path) -> MirrorResult<()> {
    match fs::metadata(path).await {
        Ok(metadata)
            if metadata.is_dir() && !metadata.permissions().readonly() && writable(path) =>
        {
            Ok(())
        }
        _ => Err(Error::InvalidDestination(path.to_path_buf())),
    }
}

/// Asks the OS whether the current user may write to `path`
#[cfg(unix)]
fn writable(path: &Path) -> bool {
    rustix::fs::access(path, rustix::fs::Access::WRITE_OK).is_ok()
}

#[cfg(not(unix))]
fn writable(_path: &Path) -> bool {
    true
}

/// Makes sure `path` is a directory.
///
/// A file occupying the name is replaced by the directory.
pub async fn ensure_dir(path: &Path) -> MirrorResult<()> {
    match fs::symlink_metadata(path).await {
        Ok(metadata) if metadata.is_dir() => return Ok(()),
        Ok(_) => {
            debug!("replacing {} with a directory", path.display());
            fs::remove_file(path).await?;
        }
        Err(_) => (),
    }

    fs::create_dir(path).await?;
    Ok(())
}

pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Last modification time of a local file
pub async fn modified(path: &Path) -> MirrorResult<DateTime<Utc>> {
    Ok(utils::datetime(fs::metadata(path).await?.modified()?))
}

pub fn set_modified(path: &Path, time: DateTime<Utc>) -> MirrorResult<()> {
    filetime::set_file_mtime(path, utils::file_time(time))?;
    Ok(())
}

/// Hidden sibling a download is written to before it replaces `path`
#[must_use]
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".part");
    path.with_file_name(name)
}

/// Moves a finished download over its final name
pub async fn commit(partial: &Path, path: &Path) -> MirrorResult<()> {
    fs::rename(partial, path).await?;
    Ok(())
}

/// Removes what is left of an aborted download
pub async fn discard(partial: &Path) {
    if let Err(err) = fs::remove_file(partial).await {
        debug!("removing {} failed: {}", partial.display(), err);
    }
}

#[cfg(test)]
mod test_local {
    use chrono::TimeZone;

    use super::*;

    #[tokio::test]
    async fn test_check_destination() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();

        assert!(check_destination(dir.path()).await.is_ok());
        assert!(matches!(
            check_destination(&file).await,
            Err(Error::InvalidDestination(_))
        ));
        assert!(matches!(
            check_destination(&dir.path().join("missing")).await,
            Err(Error::InvalidDestination(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_check_destination_without_write_access() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        let result = check_destination(&locked).await;
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(Error::InvalidDestination(_))));
    }

    #[test]
    fn test_partial_path_is_hidden_sibling() {
        let path = Path::new("/backup/pub/report.txt");

        assert_eq!(partial_path(path), Path::new("/backup/pub/.report.txt.part"));
    }

    #[tokio::test]
    async fn test_commit_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.txt");
        let partial = partial_path(&file);
        std::fs::write(&file, b"old").unwrap();
        std::fs::write(&partial, b"new").unwrap();

        commit(&partial, &file).await.unwrap();

        assert_eq!(std::fs::read(&file).unwrap(), b"new");
        assert!(!partial.exists());
    }

    #[tokio::test]
    async fn test_ensure_dir_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("sub");
        std::fs::write(&target, b"not a dir").unwrap();

        ensure_dir(&target).await.unwrap();
        assert!(target.is_dir());

        ensure_dir(&target).await.unwrap();
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_modified_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.txt");
        std::fs::write(&file, b"report").unwrap();

        let time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        set_modified(&file, time).unwrap();

        assert_eq!(modified(&file).await.unwrap(), time);
    }
}

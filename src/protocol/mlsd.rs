use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

use crate::client::{
    error::Error,
    fs::{DirEntry, FileType, Metadata},
    ClientResult,
};

const TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Parses one `MLSD` line: `fact=value;fact=value; name`.
///
/// Facts never contain spaces, so the name starts after the first space and
/// may itself contain spaces or semicolons. Unknown facts are ignored.
pub fn parse_line(line: &str) -> ClientResult<DirEntry> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some((facts, name)) = line.split_once(' ') else {
        return Err(Error::Listing(line.to_owned()));
    };

    if name.is_empty() {
        return Err(Error::Listing(line.to_owned()));
    }

    let mut metadata = Metadata::default();
    for fact in facts.split(';').filter(|f| !f.is_empty()) {
        let Some((key, value)) = fact.split_once('=') else {
            return Err(Error::Listing(line.to_owned()));
        };

        match key.to_ascii_lowercase().as_str() {
            "type" => metadata.file_type = FileType::from_fact(value),
            "size" => metadata.size = value.parse().ok(),
            "modify" => metadata.modify = Some(value.to_owned()),
            _ => (),
        }
    }

    Ok(DirEntry::new(name.to_owned(), metadata))
}

/// Parses an RFC 3659 `time-val`, `YYYYMMDDHHMMSS` with optional fraction, as UTC
pub fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    let (base, fraction) = match value.split_once('.') {
        Some((base, fraction)) => (base, Some(fraction)),
        None => (value, None),
    };

    let mut time = NaiveDateTime::parse_from_str(base, TIME_FORMAT).ok()?;

    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let digits: String = fraction.chars().chain("000000000".chars()).take(9).collect();
        time = time.with_nanosecond(digits.parse().ok()?)?;
    }

    Some(time.and_utc())
}

#[cfg(test)]
mod test_mlsd {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_file_line() {
        let entry = parse_line("type=file;size=1024;modify=20240102030405; report.txt").unwrap();

        assert_eq!(entry.file_name(), "report.txt");
        assert_eq!(entry.file_type(), FileType::File);
        assert_eq!(entry.metadata().len(), 1024);
        assert_eq!(
            entry.metadata().modified(),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
        );
    }

    #[test]
    fn test_markers_and_dirs() {
        let cdir = parse_line("type=cdir;modify=20240102030405; .").unwrap();
        let pdir = parse_line("Type=PDIR;modify=20240102030405; ..").unwrap();
        let dir = parse_line("type=dir;modify=20240102030405; sub").unwrap();

        assert!(cdir.file_type().is_marker());
        assert!(pdir.file_type().is_marker());
        assert!(dir.file_type().is_dir());
        assert!(!dir.file_type().is_marker());
    }

    #[test]
    fn test_name_with_spaces() {
        let entry = parse_line("type=file;size=3; my notes; v2.txt\r\n").unwrap();
        assert_eq!(entry.file_name(), "my notes; v2.txt");
    }

    #[test]
    fn test_unknown_type() {
        let entry = parse_line("type=OS.unix=symlink;UNIX.mode=0777; link").unwrap();
        assert_eq!(
            entry.file_type(),
            FileType::Other("OS.unix=symlink".to_owned())
        );
    }

    #[test]
    fn test_malformed_line() {
        assert!(matches!(parse_line("type=file;size=3;"), Err(Error::Listing(_))));
        assert!(matches!(parse_line("garbage name"), Err(Error::Listing(_))));
    }

    #[test]
    fn test_fractional_time() {
        let time = parse_time("20240102030405.25").unwrap();
        assert_eq!(time.timestamp_subsec_millis(), 250);
        assert_eq!(parse_time("20240102030405."), None);
        assert_eq!(parse_time("yesterday"), None);
    }
}

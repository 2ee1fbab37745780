use crate::clip_name::ClipId;
use crate::error::{ClipError, ClipResult};

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::debug;

/// Append-only record of which primary clip was merged with which secondary.
/// One `primary,secondary` pair per line.
pub struct MergeLog {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl MergeLog {
    pub fn open(path: &Path) -> ClipResult<MergeLog> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        Ok(MergeLog { path: path.to_path_buf(), writer })
    }

    pub fn record(&mut self, primary: ClipId, secondary: ClipId) -> ClipResult<()> {
        self.writer.write_record([primary.to_string(), secondary.to_string()])?;
        self.writer.flush()?;
        debug!(log = %self.path.display(), %primary, %secondary, "recorded pairing");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn read_pairings(path: &Path) -> ClipResult<Vec<(ClipId, ClipId)>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut pairings = Vec::new();
    for record in reader.records() {
        let record = record?;
        match (record.get(0), record.get(1)) {
            (Some(primary), Some(secondary)) => {
                pairings.push((ClipId::parse_exact(primary)?, ClipId::parse_exact(secondary)?))
            }
            // the csv reader already skips empty lines, so anything else is malformed
            _ => return Err(ClipError::InvalidClipName(format!("malformed merge log line: {:?}", record))),
        }
    }
    Ok(pairings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_record_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merge_list.txt");

        {
            let mut log = MergeLog::open(&path).unwrap();
            log.record(ClipId(95), ClipId(12)).unwrap();
        }
        // reopening must not truncate earlier pairings
        {
            let mut log = MergeLog::open(&path).unwrap();
            log.record(ClipId(95), ClipId(40)).unwrap();
            log.record(ClipId(3), ClipId(12)).unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "95,12\n95,40\n3,12\n");
        assert_eq!(
            read_pairings(&path).unwrap(),
            vec![(ClipId(95), ClipId(12)), (ClipId(95), ClipId(40)), (ClipId(3), ClipId(12))]
        );
    }

    #[test]
    fn test_read_tolerates_blank_lines_and_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merge_list.txt");
        fs::write(&path, "1, 2\n\n 5 ,6\n").unwrap();

        assert_eq!(read_pairings(&path).unwrap(), vec![(ClipId(1), ClipId(2)), (ClipId(5), ClipId(6))]);
    }

    #[test]
    fn test_missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_pairings(&dir.path().join("nope.txt")).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merge_list.txt");
        fs::write(&path, "1,2\n7\n").unwrap();
        assert!(read_pairings(&path).is_err());
    }

    #[test]
    fn test_suffixed_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merge_list.txt");
        fs::write(&path, "1,2\n95x,12\n").unwrap();
        assert!(matches!(read_pairings(&path), Err(ClipError::InvalidClipName(id)) if id == "95x"));

        fs::write(&path, "95,12clip\n").unwrap();
        assert!(read_pairings(&path).is_err());
    }
}

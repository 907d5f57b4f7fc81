//! Bulk archive assembly for "download all"
//!
//! The zip is built entirely in memory and only flushed to disk once the
//! central directory is finalized, so a failed fetch never leaves a partial
//! archive at the destination. Entry paths use the local separator,
//! translated from the remote `/`-delimited keys.

use chrono::{Datelike, Local, Timelike};
use std::future::Future;
use std::io::{Cursor, Write};
use std::path::{Path, MAIN_SEPARATOR};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub type ArchiveResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Distinct outcomes of a bulk transfer: an empty selection is reported,
/// not treated as a zero-entry success.
#[derive(Debug, PartialEq, Eq)]
pub enum ArchiveOutcome {
    NothingToDo,
    Written { entries: usize },
}

/// Incrementally assembles a zip archive in an in-memory buffer.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    entries: usize,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            entries: 0,
        }
    }

    /// Add one item's content under its local-separator entry path
    pub fn add_entry(&mut self, key: &str, content: &[u8]) -> ArchiveResult<()> {
        let options = SimpleFileOptions::default().last_modified_time(entry_timestamp());
        self.writer.start_file(entry_path(key), options)?;
        self.writer.write_all(content)?;
        self.entries += 1;
        Ok(())
    }

    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Finalize the central directory and return the complete archive bytes
    pub fn finish(self) -> ArchiveResult<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch every key sequentially into an in-memory zip, then flush the
/// finished archive to the destination in a single write. An empty key
/// list leaves the destination untouched, and so does any fetch or entry
/// failure, since nothing touches the disk before `finish` succeeds.
pub async fn bundle_to_file<F, Fut>(
    keys: &[String],
    destination: &Path,
    mut fetch: F,
    progress_callback: Option<Box<dyn Fn(usize, usize, u32) + Send + Sync>>,
) -> ArchiveResult<ArchiveOutcome>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = ArchiveResult<Vec<u8>>>,
{
    let total = keys.len();
    if total == 0 {
        return Ok(ArchiveOutcome::NothingToDo);
    }

    let mut builder = ArchiveBuilder::new();
    for (completed, key) in keys.iter().enumerate() {
        let content = fetch(key.clone()).await?;
        builder.add_entry(key, &content)?;

        let completed = completed + 1;
        if let Some(ref cb) = progress_callback {
            cb(completed, total, progress_percent(completed, total));
        }
    }

    let entries = builder.entry_count();
    let bytes = builder.finish()?;
    tokio::fs::write(destination, &bytes).await?;

    Ok(ArchiveOutcome::Written { entries })
}

/// Translate a remote key into the archive entry path for this platform
pub fn entry_path(key: &str) -> String {
    translate_separators(key, MAIN_SEPARATOR)
}

fn translate_separators(key: &str, separator: char) -> String {
    key.replace('/', &separator.to_string())
}

/// Whole-percent progress after `completed` of `total` items, truncated
pub fn progress_percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0) as u32
}

fn entry_timestamp() -> zip::DateTime {
    let now = Local::now();
    zip::DateTime::from_date_and_time(
        now.year() as u16,
        now.month() as u8,
        now.day() as u8,
        now.hour() as u8,
        now.minute() as u8,
        now.second() as u8,
    )
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::sync::{Arc, Mutex};
    use zip::ZipArchive;

    fn block_on<F: Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn builds_a_readable_archive_with_one_entry_per_item() {
        let mut builder = ArchiveBuilder::new();
        builder.add_entry("a/x.txt", b"alpha").unwrap();
        builder.add_entry("a/y.txt", b"beta").unwrap();
        builder.add_entry("b.txt", b"gamma").unwrap();
        assert_eq!(builder.entry_count(), 3);

        let bytes = builder.finish().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 3);

        let mut content = String::new();
        archive
            .by_name(&entry_path("a/x.txt"))
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "alpha");
    }

    #[test]
    fn entry_content_round_trips_byte_identical() {
        let payload: Vec<u8> = (0u8..=255).collect();
        let mut builder = ArchiveBuilder::new();
        builder.add_entry("raw.bin", &payload).unwrap();

        let bytes = builder.finish().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut restored = Vec::new();
        archive
            .by_index(0)
            .unwrap()
            .read_to_end(&mut restored)
            .unwrap();
        assert_eq!(restored, payload);
    }

    #[test]
    fn bundle_writes_each_item_and_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("shelf.zip");
        let keys = vec![
            "a/x.txt".to_string(),
            "a/y.txt".to_string(),
            "b.txt".to_string(),
        ];

        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = reported.clone();
        let progress: Box<dyn Fn(usize, usize, u32) + Send + Sync> =
            Box::new(move |_, _, percent| sink.lock().unwrap().push(percent));

        let outcome = block_on(bundle_to_file(
            &keys,
            &destination,
            |key| async move { Ok(key.into_bytes()) },
            Some(progress),
        ))
        .unwrap();

        assert_eq!(outcome, ArchiveOutcome::Written { entries: 3 });
        assert_eq!(*reported.lock().unwrap(), vec![33, 66, 100]);

        let bytes = std::fs::read(&destination).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 3);
        assert!(archive.by_name(&entry_path("a/y.txt")).is_ok());
    }

    #[test]
    fn empty_selection_reports_nothing_to_do_and_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("shelf.zip");

        let outcome = block_on(bundle_to_file(
            &[],
            &destination,
            |key| async move { Ok(key.into_bytes()) },
            None,
        ))
        .unwrap();

        assert_eq!(outcome, ArchiveOutcome::NothingToDo);
        assert!(!destination.exists());
    }

    #[test]
    fn failed_fetch_aborts_without_creating_the_destination() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("shelf.zip");
        let keys = vec![
            "a/x.txt".to_string(),
            "a/missing.txt".to_string(),
            "b.txt".to_string(),
        ];

        let result = block_on(bundle_to_file(
            &keys,
            &destination,
            |key| async move {
                if key.contains("missing") {
                    Err("container unavailable".into())
                } else {
                    Ok(key.into_bytes())
                }
            },
            None,
        ));

        assert!(result.is_err());
        assert!(!destination.exists());
    }

    #[test]
    fn separators_translate_to_the_local_convention() {
        assert_eq!(translate_separators("a/deep/x.txt", '\\'), "a\\deep\\x.txt");
        assert_eq!(translate_separators("a/deep/x.txt", '/'), "a/deep/x.txt");
        assert_eq!(translate_separators("b.txt", '\\'), "b.txt");
    }

    #[test]
    fn progress_truncates_to_whole_percent_and_increases() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 66);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(1, 7), 14);

        let sequence: Vec<u32> = (1..=7).map(|i| progress_percent(i, 7)).collect();
        assert!(sequence.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*sequence.last().unwrap(), 100);
    }

    #[test]
    fn zero_total_reports_zero_instead_of_dividing() {
        assert_eq!(progress_percent(0, 0), 0);
    }
}

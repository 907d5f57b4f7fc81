//! Directory/item index - the synthetic "directory" view over flat keys
//!
//! Directories are not stored anywhere. They are the distinct prefixes
//! before the last `/` of the current keys, rebuilt from scratch on every
//! refresh, with a sentinel "ALL" entry that disables filtering.

use crate::store::RemoteItem;
use serde::Serialize;
use std::fmt;

pub const FORWARD_SLASH: char = '/';

/// Sentinel directory entry meaning "no filter"
pub const ALL_DIRECTORIES: &str = "ALL";

/// The active directory selection.
///
/// `Root` (the empty selection) matches only keys with no separator;
/// `Dir` matches keys under `"{dir}/"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryFilter {
    All,
    Root,
    Dir(String),
}

impl DirectoryFilter {
    pub fn matches(&self, key: &str) -> bool {
        match self {
            DirectoryFilter::All => true,
            DirectoryFilter::Root => !key.contains(FORWARD_SLASH),
            DirectoryFilter::Dir(dir) => key.starts_with(&format!("{}{}", dir, FORWARD_SLASH)),
        }
    }
}

impl From<&str> for DirectoryFilter {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            ALL_DIRECTORIES => DirectoryFilter::All,
            "" => DirectoryFilter::Root,
            dir => DirectoryFilter::Dir(dir.to_string()),
        }
    }
}

impl fmt::Display for DirectoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryFilter::All => write!(f, "{}", ALL_DIRECTORIES),
            DirectoryFilter::Root => write!(f, ""),
            DirectoryFilter::Dir(dir) => write!(f, "{}", dir),
        }
    }
}

/// Read-only result of one rebuild: the directory list and the items
/// passing the current filter.
#[derive(Debug, Clone, Serialize)]
pub struct ShelfSnapshot {
    pub directories: Vec<String>,
    pub items: Vec<RemoteItem>,
}

/// Rebuild the directory list and the filtered item list from a full
/// container listing. Directories keep first-seen order; "ALL" is always
/// the first entry.
pub fn build_snapshot(items: Vec<RemoteItem>, filter: &DirectoryFilter) -> ShelfSnapshot {
    let mut directories: Vec<String> = vec![ALL_DIRECTORIES.to_string()];

    for item in &items {
        if let Some(dir) = parent_directory(&item.key) {
            if !directories.iter().any(|d| d == dir) {
                directories.push(dir.to_string());
            }
        }
    }

    let items = items
        .into_iter()
        .filter(|item| filter.matches(&item.key))
        .collect();

    ShelfSnapshot { directories, items }
}

/// The prefix before the last `/`, or `None` for keys with no separator
pub fn parent_directory(key: &str) -> Option<&str> {
    key.rfind(FORWARD_SLASH).map(|idx| &key[..idx])
}

/// The segment after the last `/` (the whole key when there is none)
pub fn file_name(key: &str) -> &str {
    match key.rfind(FORWARD_SLASH) {
        Some(idx) => &key[idx + 1..],
        None => key,
    }
}

/// Compose the remote key for an upload: the source file name, prefixed
/// with `"{directory}/"` when a directory is selected.
pub fn compose_key(directory: &str, file_name: &str) -> String {
    if directory.is_empty() {
        file_name.to_string()
    } else {
        format!("{}{}{}", directory, FORWARD_SLASH, file_name)
    }
}

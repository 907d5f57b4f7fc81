//! Tauri commands for the shelf frontend

use crate::archive::{self, ArchiveOutcome};
use crate::index::{self, DirectoryFilter, ShelfSnapshot};
use crate::store::{self, StoreConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tauri::Emitter;

// ============ Types ============

#[derive(Debug, Deserialize)]
pub struct ShelfConfigInput {
    pub endpoint: String,
    pub container: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl From<ShelfConfigInput> for StoreConfig {
    fn from(input: ShelfConfigInput) -> Self {
        StoreConfig {
            endpoint: input.endpoint,
            container: input.container,
            access_key_id: input.access_key_id,
            secret_access_key: input.secret_access_key,
        }
    }
}

/// The active selection as the frontend sends it: absent means the root
/// view, "ALL" disables filtering.
fn filter_from(directory: Option<&str>) -> DirectoryFilter {
    DirectoryFilter::from(directory.unwrap_or(""))
}

/// Re-list the container and rebuild both lists under the given filter
async fn rebuild_snapshot(
    config: &StoreConfig,
    filter: &DirectoryFilter,
    progress_callback: Option<Box<dyn Fn(usize) + Send + Sync>>,
) -> Result<ShelfSnapshot, String> {
    let items = store::list_items(config, progress_callback)
        .await
        .map_err(|e| format!("Failed to list container: {}", e))?;
    Ok(index::build_snapshot(items, filter))
}

// ============ Shelf Commands ============

#[tauri::command]
pub async fn refresh_shelf(
    config: ShelfConfigInput,
    directory: Option<String>,
    app: tauri::AppHandle,
) -> Result<ShelfSnapshot, String> {
    let config: StoreConfig = config.into();

    let app_clone = app.clone();
    let progress_callback = Box::new(move |count: usize| {
        let _ = app_clone.emit("shelf-load-progress", count);
    });

    rebuild_snapshot(
        &config,
        &filter_from(directory.as_deref()),
        Some(progress_callback),
    )
    .await
}

#[tauri::command]
pub async fn upload_item(
    config: ShelfConfigInput,
    directory: Option<String>,
    file_path: String,
) -> Result<ShelfSnapshot, String> {
    let config: StoreConfig = config.into();
    let directory = directory.unwrap_or_default();
    let directory = directory.trim();

    let source = PathBuf::from(&file_path);
    let file_name = source
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("Invalid source path: {}", file_path))?;
    let key = index::compose_key(directory, file_name);

    store::upload_file(&config, &key, &source)
        .await
        .map_err(|e| format!("Failed to upload {}: {}", key, e))?;
    log::info!("Uploaded {}", key);

    rebuild_snapshot(&config, &DirectoryFilter::from(directory), None).await
}

/// A destination pointing at an existing directory means "save into it",
/// with the local name taken from the key's last segment.
fn resolve_destination(destination: &Path, key: &str) -> PathBuf {
    if destination.is_dir() {
        destination.join(index::file_name(key))
    } else {
        destination.to_path_buf()
    }
}

#[tauri::command]
pub async fn download_item(
    config: ShelfConfigInput,
    key: String,
    destination: String,
) -> Result<(), String> {
    let config: StoreConfig = config.into();
    let destination = resolve_destination(Path::new(&destination), &key);

    store::download_to_file(&config, &key, &destination)
        .await
        .map_err(|e| format!("Failed to download {}: {}", key, e))?;
    log::info!("Downloaded {} to {}", key, destination.display());

    Ok(())
}

#[tauri::command]
pub async fn delete_item(
    config: ShelfConfigInput,
    key: String,
    directory: Option<String>,
) -> Result<ShelfSnapshot, String> {
    let config: StoreConfig = config.into();

    store::delete_object(&config, &key)
        .await
        .map_err(|e| format!("Failed to delete {}: {}", key, e))?;
    log::info!("Deleted {}", key);

    rebuild_snapshot(&config, &filter_from(directory.as_deref()), None).await
}

// ============ Bulk Archive Command ============

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveSummary {
    pub status: String, // "empty" | "completed"
    pub entries: usize,
}

/// Fetch every selected item sequentially into an in-memory zip, then
/// flush the finished archive to the destination. An empty selection
/// reports "empty" and writes no file.
#[tauri::command]
pub async fn download_archive(
    config: ShelfConfigInput,
    keys: Vec<String>,
    destination: String,
    app: tauri::AppHandle,
) -> Result<ArchiveSummary, String> {
    let config: StoreConfig = config.into();
    let total = keys.len();

    let app_clone = app.clone();
    let progress_callback = Box::new(move |completed: usize, total: usize, percent: u32| {
        let _ = app_clone.emit(
            "archive-progress",
            ArchiveProgress {
                completed,
                total,
                percent,
            },
        );
    });

    let fetch = |key: String| {
        let config = config.clone();
        async move {
            store::fetch_object(&config, &key)
                .await
                .map_err(|e| format!("Failed to fetch {}: {}", key, e).into())
        }
    };

    let outcome = archive::bundle_to_file(
        &keys,
        Path::new(&destination),
        fetch,
        Some(progress_callback),
    )
    .await
    .map_err(|e| format!("Failed to archive selection: {}", e))?;

    match outcome {
        ArchiveOutcome::NothingToDo => {
            log::info!("Archive download requested with no items");
            Ok(ArchiveSummary {
                status: "empty".to_string(),
                entries: 0,
            })
        }
        ArchiveOutcome::Written { entries } => {
            log::info!("Archived {} of {} items to {}", entries, total, destination);
            let _ = app.emit("archive-complete", entries);
            Ok(ArchiveSummary {
                status: "completed".to_string(),
                entries,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_from, resolve_destination};
    use crate::index::DirectoryFilter;

    #[test]
    fn directory_destination_gets_the_key_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_destination(dir.path(), "a/deep/x.txt");
        assert_eq!(resolved, dir.path().join("x.txt"));

        let explicit = dir.path().join("renamed.bin");
        assert_eq!(resolve_destination(&explicit, "a/x.txt"), explicit);
    }

    #[test]
    fn missing_selection_defaults_to_the_root_view() {
        assert_eq!(filter_from(None), DirectoryFilter::Root);
        assert_eq!(filter_from(Some("")), DirectoryFilter::Root);
        assert_eq!(filter_from(Some("ALL")), DirectoryFilter::All);
        assert_eq!(
            filter_from(Some("books")),
            DirectoryFilter::Dir("books".to_string())
        );
    }
}

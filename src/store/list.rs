//! Container list operations

use super::types::{create_store_client, RemoteItem, StoreConfig, StoreResult};

/// List every object in the container, following continuation tokens
/// until the listing is exhausted.
pub async fn list_items(
    config: &StoreConfig,
    progress_callback: Option<Box<dyn Fn(usize) + Send + Sync>>,
) -> StoreResult<Vec<RemoteItem>> {
    let client = create_store_client(config).await?;
    let mut all_items: Vec<RemoteItem> = Vec::new();
    let mut continuation_token: Option<String> = None;

    loop {
        let mut request = client
            .list_objects_v2()
            .bucket(&config.container)
            .max_keys(1000);

        if let Some(token) = &continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await?;

        for obj in response.contents() {
            let key = match obj.key() {
                // Folder placeholders carry a trailing separator
                Some(key) if !key.ends_with('/') => key.to_string(),
                _ => continue,
            };
            all_items.push(RemoteItem {
                key,
                size: obj.size().unwrap_or(0),
                last_modified: obj
                    .last_modified()
                    .map(|dt| dt.to_string())
                    .unwrap_or_default(),
                etag: obj.e_tag().unwrap_or_default().to_string(),
            });
        }

        if let Some(ref cb) = progress_callback {
            cb(all_items.len());
        }

        if !response.is_truncated().unwrap_or(false) {
            break;
        }

        continuation_token = response.next_continuation_token().map(|s| s.to_string());
    }

    Ok(all_items)
}

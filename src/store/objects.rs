//! Container object operations (fetch, upload, download, delete)

use super::types::{create_store_client, StoreConfig, StoreResult};
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Fetch an object's full content into memory
pub async fn fetch_object(config: &StoreConfig, key: &str) -> StoreResult<Vec<u8>> {
    let client = create_store_client(config).await?;
    let response = client
        .get_object()
        .bucket(&config.container)
        .key(key)
        .send()
        .await?;

    let bytes = response.body.collect().await?.into_bytes();
    Ok(bytes.to_vec())
}

/// Stream an object's content to a local file
pub async fn download_to_file(config: &StoreConfig, key: &str, destination: &Path) -> StoreResult<()> {
    let client = create_store_client(config).await?;
    let response = client
        .get_object()
        .bucket(&config.container)
        .key(key)
        .send()
        .await?;

    let mut file = File::create(destination).await?;
    let mut body = response.body;
    while let Some(chunk) = body.try_next().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(())
}

/// Upload a local file under the given key, overwriting any existing object
pub async fn upload_file(config: &StoreConfig, key: &str, file_path: &Path) -> StoreResult<String> {
    let client = create_store_client(config).await?;
    let body = ByteStream::from_path(file_path).await?;

    let response = client
        .put_object()
        .bucket(&config.container)
        .key(key)
        .body(body)
        .send()
        .await?;

    let etag = response.e_tag().unwrap_or_default().to_string();
    Ok(etag)
}

/// Delete a single object
pub async fn delete_object(config: &StoreConfig, key: &str) -> StoreResult<()> {
    let client = create_store_client(config).await?;
    client
        .delete_object()
        .bucket(&config.container)
        .key(key)
        .send()
        .await?;
    Ok(())
}

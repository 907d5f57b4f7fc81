//! Container store types and client creation

use aws_config::Region;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::Client;
use serde::{Deserialize, Serialize};

pub type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub endpoint: String,
    pub container: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// A single object in the container, keyed by a flat `/`-delimited name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteItem {
    pub key: String,
    pub size: i64,
    pub last_modified: String,
    pub etag: String,
}

/// Create an S3 client configured for the container's endpoint
pub async fn create_store_client(config: &StoreConfig) -> StoreResult<Client> {
    let credentials = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        None,
        None,
        "bookshelf-provider",
    );

    let s3_config = S3ConfigBuilder::new()
        .credentials_provider(credentials)
        .region(Region::new("auto"))
        .endpoint_url(&config.endpoint)
        .force_path_style(true)
        .build();

    Ok(Client::from_conf(s3_config))
}

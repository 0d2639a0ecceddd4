use async_trait::async_trait;

use crate::{domain::FileRef, Result};

/// Port to the remote image-transformation provider.
#[async_trait]
pub trait TransformPort: Send + Sync {
    /// Submit exactly one base64-encoded image; returns result image URLs
    /// in the order the provider supplied them.
    async fn transform(&self, encoded_image: &str) -> Result<Vec<String>>;
}

/// Port to the chat platform's file storage.
#[async_trait]
pub trait FileStorePort: Send + Sync {
    /// Resolve a file reference to a download location and fetch its bytes.
    async fn fetch(&self, file: &FileRef) -> Result<Vec<u8>>;
}

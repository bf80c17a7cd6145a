//! Cheque image storage implementation using Apache OpenDAL.

use std::time::Duration;

use chrono::{DateTime, Utc};
use opendal::{ErrorKind, Operator, services};

use daftar_shared::types::ChequeId;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Presigned URL for downloading a stored image.
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    /// The presigned URL.
    pub url: String,
    /// HTTP method to use.
    pub method: String,
    /// When the URL expires.
    pub expires_at: DateTime<Utc>,
}

/// Request to store a cheque image.
#[derive(Debug, Clone)]
pub struct ImageUploadRequest {
    /// The cheque the image belongs to.
    pub cheque_id: ChequeId,
    /// Original filename.
    pub filename: String,
    /// Content type (MIME type).
    pub content_type: String,
    /// Image bytes.
    pub content: Vec<u8>,
}

/// Metadata about a stored cheque image.
#[derive(Debug, Clone)]
pub struct ImageMetadata {
    /// Storage key.
    pub storage_key: String,
    /// Image size in bytes.
    pub size: u64,
    /// Content type.
    pub content_type: Option<String>,
}

/// Object storage for cheque images.
pub struct ImageStorage {
    operator: Operator,
    config: StorageConfig,
}

impl ImageStorage {
    /// Create a new image storage from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create the OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
        };

        Ok(operator)
    }

    /// Validate an upload against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the image size or MIME type is invalid.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_image_size {
            return Err(StorageError::image_too_large(
                size,
                self.config.max_image_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Generate the storage key for a cheque image.
    ///
    /// Format: `cheques/{cheque_id}/{sanitized_filename}`
    #[must_use]
    pub fn generate_storage_key(cheque_id: ChequeId, filename: &str) -> String {
        format!("cheques/{cheque_id}/{}", sanitize_filename(filename))
    }

    /// Store a cheque image and return its metadata.
    ///
    /// This runs strictly before any lifecycle transaction; a stored image
    /// whose batch later fails is an accepted orphan.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the write fails.
    pub async fn store(&self, req: ImageUploadRequest) -> Result<ImageMetadata, StorageError> {
        let size = req.content.len() as u64;
        self.validate_upload(&req.content_type, size)?;

        let key = Self::generate_storage_key(req.cheque_id, &req.filename);
        self.operator.write(&key, req.content).await?;

        Ok(ImageMetadata {
            storage_key: key,
            size,
            content_type: Some(req.content_type),
        })
    }

    /// Generate a presigned URL for downloading a stored image.
    ///
    /// # Errors
    ///
    /// Returns an error if presigning is not supported or fails.
    pub async fn presign_download(&self, key: &str) -> Result<PresignedUrl, StorageError> {
        let ttl = Duration::from_secs(self.config.presign_download_ttl_secs);
        let presigned = self.operator.presign_read(key, ttl).await?;

        Ok(PresignedUrl {
            url: presigned.uri().to_string(),
            method: presigned.method().to_string(),
            expires_at: Utc::now()
                + chrono::Duration::seconds(
                    i64::try_from(self.config.presign_download_ttl_secs).unwrap_or(i64::MAX),
                ),
        })
    }

    /// Look up metadata for a stored image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image does not exist or cannot be accessed.
    pub async fn stat(&self, key: &str) -> Result<ImageMetadata, StorageError> {
        let meta = self.operator.stat(key).await?;

        Ok(ImageMetadata {
            storage_key: key.to_string(),
            size: meta.content_length(),
            content_type: meta.content_type().map(String::from),
        })
    }

    /// Delete a stored image.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    /// Check whether an image exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        match self.operator.stat(key).await {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(_) => false,
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Sanitize a filename for use in a storage key.
///
/// Only ASCII alphanumeric characters, dots, hyphens, and underscores
/// survive; everything else becomes an underscore.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("cheque-1001.png"), "cheque-1001.png");
        assert_eq!(sanitize_filename("scan (front).png"), "scan__front_.png");
        assert_eq!(sanitize_filename("front@#$.jpg"), "front___.jpg");
    }

    #[test]
    fn test_generate_storage_key() {
        let cheque_id = ChequeId::new();
        let key = ImageStorage::generate_storage_key(cheque_id, "scan.png");
        assert!(key.starts_with("cheques/"));
        assert!(key.contains(&cheque_id.to_string()));
        assert!(key.ends_with("scan.png"));
    }

    #[tokio::test]
    async fn test_local_fs_round_trip() {
        let dir = std::env::temp_dir().join(format!("daftar-storage-{}", ChequeId::new()));
        let storage =
            ImageStorage::from_config(StorageConfig::new(StorageProvider::local_fs(&dir)))
                .expect("local storage");

        let cheque_id = ChequeId::new();
        let meta = storage
            .store(ImageUploadRequest {
                cheque_id,
                filename: "scan.png".to_string(),
                content_type: "image/png".to_string(),
                content: vec![0x89, 0x50, 0x4E, 0x47],
            })
            .await
            .expect("store image");

        assert_eq!(meta.size, 4);
        assert!(storage.exists(&meta.storage_key).await);

        storage.delete(&meta.storage_key).await.expect("delete");
        assert!(!storage.exists(&meta.storage_key).await);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_store_rejects_oversized_image() {
        let dir = std::env::temp_dir().join(format!("daftar-storage-{}", ChequeId::new()));
        let config = StorageConfig::new(StorageProvider::local_fs(&dir)).with_max_image_size(2);
        let storage = ImageStorage::from_config(config).expect("local storage");

        let result = storage
            .store(ImageUploadRequest {
                cheque_id: ChequeId::new(),
                filename: "scan.png".to_string(),
                content_type: "image/png".to_string(),
                content: vec![1, 2, 3],
            })
            .await;

        assert!(matches!(result, Err(StorageError::ImageTooLarge { .. })));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_store_rejects_bad_mime_type() {
        let dir = std::env::temp_dir().join(format!("daftar-storage-{}", ChequeId::new()));
        let storage =
            ImageStorage::from_config(StorageConfig::new(StorageProvider::local_fs(&dir)))
                .expect("local storage");

        let result = storage
            .store(ImageUploadRequest {
                cheque_id: ChequeId::new(),
                filename: "script.html".to_string(),
                content_type: "text/html".to_string(),
                content: vec![1],
            })
            .await;

        assert!(matches!(result, Err(StorageError::InvalidMimeType { .. })));
        std::fs::remove_dir_all(&dir).ok();
    }
}

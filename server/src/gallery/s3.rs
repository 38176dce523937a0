//! S3 Storage Client
//!
//! Handles S3-compatible storage for gallery media.
//! Supports any S3-compatible backend: AWS S3, MinIO, Backblaze B2, Cloudflare R2.

use aws_config::Region;
use aws_sdk_s3::{
    config::{Credentials, IdentityCache, SharedCredentialsProvider, StalledStreamProtectionConfig},
    presigning::PresigningConfig,
    primitives::ByteStream,
    Client,
};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::Config;

/// A freshly issued upload credential.
#[derive(Debug, Clone)]
pub struct PresignedUpload {
    /// Time-limited write-only URL for a direct PUT.
    pub upload_url: String,
    /// Public URL the object will have once written.
    pub public_url: String,
}

/// S3 client wrapper with configuration.
#[derive(Clone)]
pub struct S3Client {
    client: Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
    upload_expiry: Duration,
    read_expiry: Duration,
}

/// S3-related errors.
#[derive(Debug, Error)]
pub enum S3Error {
    /// Failed to upload file.
    #[error("Failed to upload file: {0}")]
    Upload(String),

    /// Failed to generate presigned URL.
    #[error("Failed to generate presigned URL: {0}")]
    Presign(String),

    /// Failed to delete file.
    #[error("Failed to delete file: {0}")]
    Delete(String),

    /// S3 configuration error.
    #[error("S3 configuration error: {0}")]
    Config(String),
}

impl S3Client {
    /// Create a new S3 client from configuration.
    ///
    /// Supports custom endpoints for S3-compatible backends (MinIO, R2, B2).
    /// Uses path-style addressing when a custom endpoint is configured.
    pub fn new(config: &Config) -> Result<Self, S3Error> {
        let region = Region::new(config.s3_region.clone());

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .region(region)
            .stalled_stream_protection(StalledStreamProtectionConfig::disabled())
            .identity_cache(IdentityCache::no_cache());

        // Configure credentials from environment
        if let (Ok(access_key), Ok(secret_key)) = (
            std::env::var("AWS_ACCESS_KEY_ID"),
            std::env::var("AWS_SECRET_ACCESS_KEY"),
        ) {
            let credentials = Credentials::new(
                access_key,
                secret_key,
                None, // session token
                None, // expiry
                "environment",
            );
            s3_config_builder =
                s3_config_builder.credentials_provider(SharedCredentialsProvider::new(credentials));
        }

        // Configure custom endpoint for S3-compatible backends
        if let Some(endpoint) = &config.s3_endpoint {
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true); // Required for MinIO and most S3-compatible backends
        }

        let s3_config = s3_config_builder.build();
        let client = Client::from_conf(s3_config);

        info!(
            bucket = %config.s3_bucket,
            endpoint = ?config.s3_endpoint,
            "S3 client initialized"
        );

        Ok(Self {
            client,
            bucket: config.s3_bucket.clone(),
            region: config.s3_region.clone(),
            endpoint: config.s3_endpoint.clone(),
            upload_expiry: Duration::from_secs(config.s3_upload_expiry.unsigned_abs()),
            read_expiry: Duration::from_secs(config.s3_read_expiry.unsigned_abs()),
        })
    }

    /// Generate a presigned URL for a direct client PUT, without touching
    /// any bytes. Valid for the configured upload expiry (default 10 min).
    ///
    /// The credential is bound to the given content type: the client's PUT
    /// must carry a matching `Content-Type` header.
    pub async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<PresignedUpload, S3Error> {
        let presign_config = PresigningConfig::builder()
            .expires_in(self.upload_expiry)
            .build()
            .map_err(|e| S3Error::Presign(e.to_string()))?;

        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presign_config)
            .await
            .map_err(|e| S3Error::Presign(e.to_string()))?;

        Ok(PresignedUpload {
            upload_url: presigned.uri().to_string(),
            public_url: self.public_url(key),
        })
    }

    /// Upload a file server-side and return its public URL.
    ///
    /// Fallback path for clients that cannot PUT directly to storage.
    pub async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, S3Error> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| S3Error::Upload(e.to_string()))?;

        Ok(self.public_url(key))
    }

    /// Generate a presigned URL for downloading a file privately.
    ///
    /// Valid for the configured read expiry (default 1 hour).
    pub async fn presign_get(&self, key: &str) -> Result<String, S3Error> {
        let presign_config = PresigningConfig::builder()
            .expires_in(self.read_expiry)
            .build()
            .map_err(|e| S3Error::Presign(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| S3Error::Presign(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    /// Delete a file from S3.
    ///
    /// Callers on the record-deletion path treat failures here as
    /// non-fatal: log and proceed.
    pub async fn delete(&self, key: &str) -> Result<(), S3Error> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| S3Error::Delete(e.to_string()))?;

        Ok(())
    }

    /// Check if the bucket is accessible (health check).
    pub async fn health_check(&self) -> Result<(), S3Error> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| S3Error::Config(format!("Bucket not accessible: {e}")))?;

        Ok(())
    }

    /// Public URL for an object key.
    ///
    /// Virtual-hosted AWS form by default; path-style when a custom
    /// endpoint is configured.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
            }
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }

    /// Whether a URL points into this gallery's storage.
    ///
    /// Used by the download relay to refuse fetching arbitrary hosts.
    #[must_use]
    pub fn is_gallery_url(&self, url: &str) -> bool {
        url.starts_with(&self.public_url(""))
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(endpoint: Option<&str>) -> S3Client {
        let mut config = Config::default_for_test();
        config.s3_bucket = "wedding-media".into();
        config.s3_endpoint = endpoint.map(String::from);
        S3Client::new(&config).expect("client")
    }

    #[test]
    fn test_public_url_aws_virtual_hosted() {
        let s3 = client_with(None);
        assert_eq!(
            s3.public_url("photos/casamento_20261219_ana_a1b2c3d4.jpg"),
            "https://wedding-media.s3.us-east-1.amazonaws.com/photos/casamento_20261219_ana_a1b2c3d4.jpg"
        );
    }

    #[test]
    fn test_public_url_custom_endpoint_is_path_style() {
        let s3 = client_with(Some("http://localhost:9000/"));
        assert_eq!(
            s3.public_url("videos/v.mp4"),
            "http://localhost:9000/wedding-media/videos/v.mp4"
        );
    }

    #[test]
    fn test_is_gallery_url() {
        let s3 = client_with(None);
        assert!(s3.is_gallery_url(
            "https://wedding-media.s3.us-east-1.amazonaws.com/photos/a.jpg"
        ));
        assert!(!s3.is_gallery_url("https://evil.example.com/photos/a.jpg"));
        assert!(!s3.is_gallery_url(
            "https://other-bucket.s3.us-east-1.amazonaws.com/photos/a.jpg"
        ));
    }
}

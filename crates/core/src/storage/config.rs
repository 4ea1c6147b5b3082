//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use kontor_shared::config::StorageConfig as StorageSettings;

use super::error::StorageError;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage (AWS S3, Cloudflare R2, MinIO).
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Local filesystem (development only).
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create an S3-compatible provider.
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create a local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Provider name recorded on registry entries.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Per-operation timeout in seconds. Storage is an outbound call and
    /// must never block a unit of work indefinitely.
    pub operation_timeout_secs: u64,
}

impl StorageConfig {
    /// Default per-operation timeout: 30 seconds.
    pub const DEFAULT_OPERATION_TIMEOUT: u64 = 30;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            operation_timeout_secs: Self::DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Set the per-operation timeout.
    #[must_use]
    pub fn with_operation_timeout(mut self, secs: u64) -> Self {
        self.operation_timeout_secs = secs;
        self
    }

    /// Builds a typed config from the flat application settings section.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown backend or an `s3`
    /// backend with missing fields.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        let provider = match settings.backend.as_str() {
            "fs" => StorageProvider::local_fs(&settings.root),
            "s3" => StorageProvider::S3 {
                endpoint: require_s3_field(&settings.endpoint, "endpoint")?,
                bucket: require_s3_field(&settings.bucket, "bucket")?,
                access_key_id: require_s3_field(&settings.access_key_id, "access_key_id")?,
                secret_access_key: require_s3_field(
                    &settings.secret_access_key,
                    "secret_access_key",
                )?,
                region: require_s3_field(&settings.region, "region")?,
            },
            other => {
                return Err(StorageError::configuration(format!(
                    "unknown storage backend '{other}', expected 'fs' or 's3'"
                )));
            }
        };

        Ok(Self {
            provider,
            operation_timeout_secs: settings.operation_timeout_secs,
        })
    }
}

fn require_s3_field(value: &Option<String>, name: &str) -> Result<String, StorageError> {
    value
        .clone()
        .ok_or_else(|| StorageError::configuration(format!("s3 backend requires `{name}`")))
}

//! Document store implementation using Apache OpenDAL.

use std::future::Future;
use std::time::Duration;

use opendal::{ErrorKind, Operator, services};
use tracing::warn;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Object store for generated documents (rendered invoices, exports).
///
/// Every call is bounded by the configured timeout. A failure here is
/// reported to the caller but must not abort the ledger mutation that
/// produced the document.
pub struct DocumentStore {
    operator: Operator,
    timeout_secs: u64,
}

impl DocumentStore {
    /// Create a new document store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self {
            operator,
            timeout_secs: config.operation_timeout_secs,
        })
    }

    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
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

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    async fn bounded<T>(
        &self,
        key: &str,
        fut: impl Future<Output = Result<T, opendal::Error>>,
    ) -> Result<T, StorageError> {
        let timeout = Duration::from_secs(self.timeout_secs);
        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result.map_err(StorageError::from),
            Err(_) => {
                warn!(key, timeout_secs = self.timeout_secs, "storage call timed out");
                Err(StorageError::Timeout {
                    key: key.to_string(),
                    timeout_secs: self.timeout_secs,
                })
            }
        }
    }

    /// Write a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or times out.
    pub async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        self.bounded(path, async {
            self.operator.write(path, bytes).await.map(|_| ())
        })
        .await
    }

    /// Read a document back.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing key, or an error if the read fails
    /// or times out.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let buffer = self.bounded(path, self.operator.read(path)).await?;
        Ok(buffer.to_vec())
    }

    /// Delete a document. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails or times out.
    pub async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.bounded(path, self.operator.delete(path)).await
    }

    /// Check if a document exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the check fails or times out; a missing key is
    /// `Ok(false)`.
    pub async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let timeout = Duration::from_secs(self.timeout_secs);
        match tokio::time::timeout(timeout, self.operator.stat(path)).await {
            Ok(Ok(_)) => Ok(true),
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => Ok(false),
            Ok(Err(e)) => Err(StorageError::from(e)),
            Err(_) => Err(StorageError::Timeout {
                key: path.to_string(),
                timeout_secs: self.timeout_secs,
            }),
        }
    }
}

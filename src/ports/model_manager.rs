use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::{DomainError, DownloadProgress, ModelCatalog};

/// Port for model storage and retrieval.
#[async_trait]
pub trait ModelManager: Send + Sync {
    /// Get the model catalog.
    fn catalog(&self) -> &ModelCatalog;

    /// Check if a catalog model is present on disk.
    fn is_installed(&self, model_id: &str) -> bool;

    /// Resolve a catalog model to a local path, downloading it if missing.
    ///
    /// The progress callback is called periodically during a download.
    async fn resolve(
        &self,
        model_id: &str,
        progress: Option<Box<dyn Fn(DownloadProgress) + Send + Sync>>,
    ) -> Result<PathBuf, DomainError>;

    /// Get the models directory path.
    fn models_dir(&self) -> PathBuf;
}

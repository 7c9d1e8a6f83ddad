use std::fs::{self, File};
use std::io::Read;
use std::path::PathBuf;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::domain::{DomainError, DownloadProgress, ModelCatalog, ModelInfo};
use crate::ports::ModelManager;

/// Embedded model catalog JSON.
const CATALOG_JSON: &str = include_str!("../../resources/model_catalog.json");

/// Magic number at the start of every ggml model file.
const GGML_MAGIC: u32 = 0x6767_6d6c;

/// Model manager that stores ggml files in the local data directory and
/// downloads missing catalog models on demand.
pub struct LocalModelManager {
    catalog: ModelCatalog,
    models_dir: PathBuf,
}

impl LocalModelManager {
    pub fn new(data_dir: PathBuf) -> Result<Self, DomainError> {
        let catalog: ModelCatalog = serde_json::from_str(CATALOG_JSON)
            .map_err(|e| DomainError::Model(format!("Failed to parse model catalog: {}", e)))?;

        let models_dir = data_dir.join("models");
        fs::create_dir_all(&models_dir)?;

        info!(
            models_dir = ?models_dir,
            catalog_version = catalog.version,
            "LocalModelManager initialized"
        );

        Ok(Self {
            catalog,
            models_dir,
        })
    }

    fn path_for(&self, info: &ModelInfo) -> PathBuf {
        self.models_dir.join(info.filename())
    }

    /// Check the ggml magic number of a model file.
    fn verify_magic(path: &PathBuf) -> Result<(), DomainError> {
        let mut header = [0u8; 4];
        File::open(path)?.read_exact(&mut header)?;

        if u32::from_le_bytes(header) != GGML_MAGIC {
            return Err(DomainError::ModelVerification(format!(
                "{} is not a ggml model file",
                path.display()
            )));
        }
        Ok(())
    }

    /// Stream a model file to disk, renaming into place once complete.
    async fn download(
        &self,
        model: &ModelInfo,
        target: &PathBuf,
        progress: Option<Box<dyn Fn(DownloadProgress) + Send + Sync>>,
    ) -> Result<(), DomainError> {
        info!(model_id = %model.id, url = %model.url, target = ?target, "Starting model download");

        let response = reqwest::get(&model.url)
            .await
            .map_err(|e| DomainError::ModelDownload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::ModelDownload(format!(
                "HTTP {} for {}",
                response.status(),
                model.url
            )));
        }

        let total_bytes = response.content_length().unwrap_or(0);
        let part_path = target.with_extension("bin.part");

        let mut file = tokio::fs::File::create(&part_path).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DomainError::ModelDownload(e.to_string()))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref callback) = progress {
                let mut report = DownloadProgress::new(model.id.clone());
                report.update(downloaded, total_bytes);
                callback(report);
            }
        }

        file.flush().await?;
        drop(file);
        fs::rename(&part_path, target)?;

        info!(
            model_id = %model.id,
            size_mb = downloaded / (1024 * 1024),
            "Model downloaded"
        );
        Ok(())
    }
}

#[async_trait]
impl ModelManager for LocalModelManager {
    fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    fn is_installed(&self, model_id: &str) -> bool {
        self.catalog
            .get(model_id)
            .map(|m| self.path_for(m).exists())
            .unwrap_or(false)
    }

    async fn resolve(
        &self,
        model_id: &str,
        progress: Option<Box<dyn Fn(DownloadProgress) + Send + Sync>>,
    ) -> Result<PathBuf, DomainError> {
        let model = self
            .catalog
            .get(model_id)
            .ok_or_else(|| DomainError::ModelNotFound(model_id.to_string()))?;

        let path = self.path_for(model);
        if path.exists() {
            debug!(model_id = %model.id, path = ?path, "Model already installed");
        } else {
            self.download(model, &path, progress).await?;
        }

        Self::verify_magic(&path)?;
        Ok(path)
    }

    fn models_dir(&self) -> PathBuf {
        self.models_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_catalog_parsing() {
        let catalog: ModelCatalog = serde_json::from_str(CATALOG_JSON).unwrap();
        assert!(catalog.version >= 1);
        assert!(!catalog.models.is_empty());

        // The default config model must exist in the catalog
        let medium = catalog.get("medium").unwrap();
        assert!(medium.url.ends_with("ggml-medium.bin"));
    }

    #[test]
    fn test_model_path_naming() {
        let dir = tempdir().unwrap();
        let manager = LocalModelManager::new(dir.path().to_path_buf()).unwrap();

        let info = manager.catalog().get("tiny").unwrap().clone();
        let path = manager.path_for(&info);
        assert!(path.to_string_lossy().ends_with("models/ggml-tiny.bin"));
        assert!(!manager.is_installed("tiny"));
    }

    #[test]
    fn test_verify_magic() {
        let dir = tempdir().unwrap();

        let good = dir.path().join("good.bin");
        let mut file = File::create(&good).unwrap();
        file.write_all(&GGML_MAGIC.to_le_bytes()).unwrap();
        file.write_all(&[0u8; 16]).unwrap();
        assert!(LocalModelManager::verify_magic(&good).is_ok());

        let bad = dir.path().join("bad.bin");
        fs::write(&bad, b"not a model").unwrap();
        assert!(matches!(
            LocalModelManager::verify_magic(&bad),
            Err(DomainError::ModelVerification(_))
        ));
    }

    #[test]
    fn test_resolve_unknown_model() {
        let dir = tempdir().unwrap();
        let manager = LocalModelManager::new(dir.path().to_path_buf()).unwrap();

        let result = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(manager.resolve("enormous", None));

        assert!(matches!(result, Err(DomainError::ModelNotFound(_))));
    }
}

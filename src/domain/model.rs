use serde::{Deserialize, Serialize};

/// Information about a known Whisper model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Unique identifier (e.g., "medium", "small.en").
    pub id: String,
    /// Speed/accuracy positioning shown to the user.
    pub description: String,
    /// Approximate download size in megabytes.
    pub size_mb: u64,
    /// Download URL for the ggml file.
    pub url: String,
}

impl ModelInfo {
    /// On-disk filename for this model.
    pub fn filename(&self) -> String {
        format!("ggml-{}.bin", self.id)
    }
}

/// Catalog of available models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCatalog {
    /// Catalog version for compatibility checking.
    pub version: u32,
    /// Available models.
    pub models: Vec<ModelInfo>,
}

impl ModelCatalog {
    /// Find a model by ID.
    pub fn get(&self, model_id: &str) -> Option<&ModelInfo> {
        self.models.iter().find(|m| m.id == model_id)
    }

    /// List all model IDs.
    pub fn model_ids(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.id.as_str()).collect()
    }
}

/// Progress information for a model download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadProgress {
    /// Model being downloaded.
    pub model_id: String,
    /// Bytes downloaded so far.
    pub bytes_downloaded: u64,
    /// Total bytes to download (0 if unknown).
    pub total_bytes: u64,
    /// Download progress as percentage (0.0 - 100.0).
    pub percent: f32,
}

impl DownloadProgress {
    pub fn new(model_id: String) -> Self {
        Self {
            model_id,
            bytes_downloaded: 0,
            total_bytes: 0,
            percent: 0.0,
        }
    }

    /// Update progress with downloaded bytes.
    pub fn update(&mut self, downloaded: u64, total: u64) {
        self.bytes_downloaded = downloaded;
        self.total_bytes = total;
        self.percent = if total > 0 {
            (downloaded as f32 / total as f32) * 100.0
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_filename() {
        let info = ModelInfo {
            id: "small.en".to_string(),
            description: String::new(),
            size_mb: 466,
            url: String::new(),
        };
        assert_eq!(info.filename(), "ggml-small.en.bin");
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = ModelCatalog {
            version: 1,
            models: vec![ModelInfo {
                id: "tiny".to_string(),
                description: "fastest".to_string(),
                size_mb: 75,
                url: "https://example.invalid/ggml-tiny.bin".to_string(),
            }],
        };
        assert!(catalog.get("tiny").is_some());
        assert!(catalog.get("huge").is_none());
        assert_eq!(catalog.model_ids(), vec!["tiny"]);
    }

    #[test]
    fn test_download_progress() {
        let mut progress = DownloadProgress::new("medium".to_string());
        progress.update(50, 100);
        assert_eq!(progress.percent, 50.0);

        progress.update(10, 0);
        assert_eq!(progress.percent, 0.0);
    }
}

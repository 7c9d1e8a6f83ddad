pub mod audio;
pub mod cancel;
pub mod config;
pub mod error;
pub mod model;
pub mod transcription;

pub use audio::{AtomicCaptureState, AudioConfig, AudioDevice, CaptureState};
pub use cancel::CancelToken;
pub use config::AppConfig;
pub use error::DomainError;
pub use model::{DownloadProgress, ModelCatalog, ModelInfo};
pub use transcription::{AudioBuffer, Segment, Transcript};

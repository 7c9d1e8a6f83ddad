pub mod audio_cpal;
pub mod config_store;
pub mod model_manager;
pub mod vad;
pub mod wav_file;
pub mod whisper_cpp;

pub use audio_cpal::CpalRecorder;
pub use config_store::TomlConfigStore;
pub use model_manager::LocalModelManager;
pub use whisper_cpp::WhisperTranscriber;

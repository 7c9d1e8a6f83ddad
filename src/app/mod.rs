pub mod controller;

pub use controller::{write_transcript, AppController, LaunchOptions};

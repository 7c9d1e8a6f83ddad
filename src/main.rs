//! Voxnote command-line interface.
//!
//! Records a voice note from a chosen microphone and transcribes it locally
//! with whisper.cpp.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use voxnote::domain::{AudioDevice, DomainError, DownloadProgress};
use voxnote::{AppController, LaunchOptions};

#[derive(Parser)]
#[command(name = "voxnote")]
#[command(version)]
#[command(about = "Record a voice note and transcribe it locally", long_about = None)]
struct Cli {
    /// Path to an alternate configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Whisper model ID (e.g. tiny, small.en, medium)
    #[arg(short, long)]
    model: Option<String>,

    /// Language code, or "auto" to detect
    #[arg(short, long)]
    language: Option<String>,

    /// Input device index (skips the interactive prompt)
    #[arg(short, long)]
    device: Option<usize>,

    /// List input devices and exit
    #[arg(long)]
    list_devices: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), DomainError> {
    let controller = AppController::new(&LaunchOptions {
        config_path: cli.config,
        model: cli.model,
        language: cli.language,
    })?;

    let devices = controller.list_input_devices()?;
    print_devices(&devices);
    if cli.list_devices {
        return Ok(());
    }

    let device_index = match cli.device {
        Some(index) => index,
        None => prompt_device_index().await?,
    };

    println!(
        "{}",
        format!("Loading model '{}'...", controller.config().transcription.model).dimmed()
    );
    controller
        .prepare_model(Some(Box::new(print_download_progress)))
        .await?;

    controller.start_recording(device_index).await?;
    println!("{}", "Recording... press Enter to stop.".yellow());
    read_line().await?;

    let summary = controller.stop_recording().await?;
    println!(
        "Recording saved to {} ({:.1}s)",
        summary.path.display(),
        summary.duration_secs
    );

    let transcript = controller.transcribe_recording().await?;
    let text = transcript.text();

    if text.is_empty() {
        println!("{}", "(no speech detected)".dimmed());
    } else {
        println!("{}", text.green().bold());
    }

    let log_path = controller.write_transcript(&text)?;
    println!("{}", format!("Transcript written to {}", log_path.display()).dimmed());

    Ok(())
}

fn print_devices(devices: &[AudioDevice]) {
    if devices.is_empty() {
        println!("No audio input devices found");
        return;
    }

    println!("Available audio input devices:");
    for device in devices {
        let default_marker = if device.is_default {
            " (default)".dimmed()
        } else {
            "".normal()
        };
        println!(
            "  {}: {} [{} ch]{}",
            device.index.to_string().cyan(),
            device.name,
            device.input_channels,
            default_marker
        );
    }
}

async fn prompt_device_index() -> Result<usize, DomainError> {
    print!("Enter the device index of your preferred microphone: ");
    std::io::stdout().flush()?;

    let line = read_line().await?;
    let trimmed = line.trim();
    trimmed.parse::<usize>().map_err(|_| DomainError::AudioDevice {
        message: format!("Invalid device index '{}'", trimmed),
    })
}

async fn read_line() -> Result<String, DomainError> {
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line)
}

fn print_download_progress(progress: DownloadProgress) {
    if progress.total_bytes > 0 {
        eprint!(
            "\rDownloading {}: {:.0}% ({} / {} MB)",
            progress.model_id,
            progress.percent,
            progress.bytes_downloaded / (1024 * 1024),
            progress.total_bytes / (1024 * 1024)
        );
        if progress.bytes_downloaded >= progress.total_bytes {
            eprintln!();
        }
    }
}

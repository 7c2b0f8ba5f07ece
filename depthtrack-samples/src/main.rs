use clap::Parser;
use depthtrack_sensor::{DeviceConfig, ReplayDevice};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod error;
mod runner;
mod samples;
mod settings;
mod sink;

pub use error::SampleError;
pub use settings::SampleSettings;

use samples::SampleKind;
use sink::PngSink;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Sample to run
    #[arg(value_enum)]
    sample: SampleKind,

    /// SDK configuration file, built-in defaults when omitted
    config: Option<PathBuf>,

    /// Recording to replay
    #[arg(long)]
    recording: PathBuf,

    /// Directory rendered frames are written to
    #[arg(long, default_value = "frames")]
    output: PathBuf,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Palette, font and processing sizes
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Restart the recording when it ends
    #[arg(long = "loop")]
    looping: bool,

    /// Replay at the recorded frame rate
    #[arg(long)]
    realtime: bool,
}

fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(true)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();
    let args = Args::parse();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        tracing::info!("stopping");
        r.store(false, Ordering::SeqCst);
    })?;

    let config = match &args.config {
        Some(path) => DeviceConfig::from_file(path)?,
        None => DeviceConfig::default(),
    };
    let settings = match &args.settings {
        Some(path) => SampleSettings::from_file(path)?,
        None => SampleSettings::default(),
    };

    let mut device = ReplayDevice::open(&args.recording, config)?
        .looping(args.looping)
        .realtime(args.realtime);
    let mut sink = PngSink::new(&args.output)?;
    let mut sample = args.sample.build(&settings)?;

    match runner::run(sample.as_mut(), &mut device, &mut sink, args.frames, &running) {
        Ok(shown) => {
            tracing::info!(shown, output = %args.output.display(), "done");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "sample stopped");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_sample_and_flags() {
        let args = Args::parse_from([
            "depthtrack-samples",
            "face",
            "sdk.json",
            "--recording",
            "session/recording.json",
            "--frames",
            "10",
            "--loop",
        ]);
        assert_eq!(args.sample, SampleKind::Face);
        assert_eq!(args.config, Some(PathBuf::from("sdk.json")));
        assert_eq!(args.frames, Some(10));
        assert!(args.looping);
        assert!(!args.realtime);
        assert_eq!(args.output, PathBuf::from("frames"));
    }
}

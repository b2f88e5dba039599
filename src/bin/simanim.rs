use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use simanim::{
    AnimationOpts, FfmpegEncoder, Phase, ProgressSink, TimeWindow, create_animation,
};

#[derive(Parser, Debug)]
#[command(
    name = "simanim",
    version,
    about = "Render a simulation snapshot series into an MP4 animation (requires `ffmpeg` on PATH)."
)]
struct Cli {
    /// Directory containing `time.txt` and one `frame<N>.txt` per timestamp.
    input_dir: PathBuf,

    /// Output framerate in frames per second.
    #[arg(short = 'f', long, default_value_t = 24.0)]
    framerate: f64,

    /// Time window as `begin:end`; a negative component means "use the
    /// series bound".
    #[arg(
        short = 't',
        long = "time-range",
        value_parser = parse_time_range,
        allow_hyphen_values = true
    )]
    time_range: Option<TimeWindow>,

    /// Animation length in seconds.
    #[arg(short = 'l', long, default_value_t = 10.0)]
    length: f64,
}

fn parse_time_range(s: &str) -> Result<TimeWindow, String> {
    let Some((begin, end)) = s.split_once(':') else {
        return Err(format!("expected `begin:end`, got '{s}'"));
    };
    let begin: f64 = begin
        .trim()
        .parse()
        .map_err(|_| format!("begin is not a number: '{begin}'"))?;
    let end: f64 = end
        .trim()
        .parse()
        .map_err(|_| format!("end is not a number: '{end}'"))?;
    Ok(TimeWindow::from_sentinels(begin, end))
}

/// Coarse percentage reporting on stderr, one line per progress event.
struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn on_progress(&mut self, phase: Phase, done: usize, total: usize) {
        let label = match phase {
            Phase::Scan => "computing min and max",
            Phase::Render => "rendering frames",
        };
        eprintln!("{label}: {} %", 100 * done / total.max(1));
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Start from a clean slate; a previous run may have left stale frames
    // with a different padding width behind.
    let anim_dir = cli.input_dir.join("anim");
    if anim_dir.exists() {
        std::fs::remove_dir_all(&anim_dir)
            .with_context(|| format!("remove stale '{}'", anim_dir.display()))?;
    }

    let opts = AnimationOpts {
        framerate: cli.framerate,
        window: cli.time_range.unwrap_or_default(),
        length_secs: cli.length,
    };

    create_animation(&cli.input_dir, &opts, &FfmpegEncoder, &mut StderrProgress)?;

    eprintln!("wrote {}", anim_dir.join("anim.mp4").display());
    Ok(())
}

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context as _, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use glitchkit::config::presets;
use glitchkit::{
    ConfigSource, ConfigStore, DEFAULT_STILL_PROGRESS, Exporter, FfmpegSink, FfmpegSinkOpts,
    FrameScheduler, FrameSink, GlitchConfig, PngSequenceSink, SchedulerOpts, SourceImage,
    TickOutcome, VideoOpts, active_stages, encode_shared, write_png,
};

#[derive(Parser, Debug)]
#[command(name = "glitchkit", version, about = "Animated glitch effects for still images")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one frame as a PNG.
    Still(StillArgs),
    /// Render a WebM/MP4 video (requires `ffmpeg`) or a PNG frame sequence.
    Video(VideoArgs),
    /// Play the effect in real time and report frame pacing.
    Preview(PreviewArgs),
    /// Convert between config JSON and share strings.
    Share(ShareArgs),
    /// List built-in presets.
    Presets(PresetsArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Config JSON file.
    #[arg(long, conflicts_with_all = ["preset", "share"])]
    config: Option<PathBuf>,

    /// Built-in preset id.
    #[arg(long, conflicts_with = "share")]
    preset: Option<String>,

    /// Share string.
    #[arg(long)]
    share: Option<String>,

    /// Source image. Defaults to the config's `imageSource`.
    #[arg(long)]
    image: Option<PathBuf>,

    /// RNG seed for reproducible random effects.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct StillArgs {
    #[command(flatten)]
    input: ConfigArgs,

    /// Animation progress in [0, 1).
    #[arg(long, default_value_t = DEFAULT_STILL_PROGRESS)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct VideoArgs {
    #[command(flatten)]
    input: ConfigArgs,

    /// Output video path; `.mp4` selects H.264, anything else VP9/WebM.
    #[arg(long, required_unless_present = "frames_dir")]
    out: Option<PathBuf>,

    /// Write numbered PNG frames to this directory instead of a video.
    #[arg(long, conflicts_with = "out")]
    frames_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Seconds to capture. Defaults to the config's duration.
    #[arg(long)]
    duration: Option<f64>,

    /// Fail instead of overwriting an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// `ffmpeg` executable.
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    input: ConfigArgs,

    /// Wall-clock seconds to play.
    #[arg(long, default_value_t = 3.0)]
    seconds: f64,

    /// Target frame rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Run the pipeline on a worker thread.
    #[arg(long)]
    offload: bool,

    /// Save the last displayed frame as PNG.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ShareArgs {
    /// Config JSON file to encode.
    #[arg(long, conflicts_with = "decode", required_unless_present = "decode")]
    encode: Option<PathBuf>,

    /// Share string to decode into pretty JSON.
    #[arg(long)]
    decode: Option<String>,
}

#[derive(Args, Debug)]
struct PresetsArgs {
    /// Print this preset's config JSON instead of the list.
    #[arg(long)]
    show: Option<String>,
}

fn main() -> anyhow::Result<()> {
    initialise_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Still(args) => cmd_still(args),
        Command::Video(args) => cmd_video(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Share(args) => cmd_share(args),
        Command::Presets(args) => cmd_presets(args),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the config and source image named by `args`.
fn load_inputs(args: &ConfigArgs) -> anyhow::Result<(GlitchConfig, SourceImage)> {
    let mut store = ConfigStore::default();
    let mut base_dir = PathBuf::from(".");
    let source = if let Some(path) = &args.config {
        if let Some(parent) = path.parent() {
            base_dir = parent.to_path_buf();
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Some(ConfigSource::Stored(text))
    } else if let Some(id) = &args.preset {
        Some(ConfigSource::Preset(id.clone()))
    } else {
        args.share.clone().map(ConfigSource::Shared)
    };
    if let Some(source) = source {
        store.ingest(&source)?;
    }
    let config = store.state().clone();

    let image = match (&args.image, &config.image_source) {
        (Some(path), _) => SourceImage::open(path)?,
        (None, Some(src)) => SourceImage::resolve(src, &base_dir)?,
        (None, None) => bail!("no source image: pass --image or set imageSource in the config"),
    };
    tracing::info!(
        effect = %config.effect_name,
        stages = ?active_stages(&config),
        w = image.width(),
        h = image.height(),
        "inputs loaded"
    );
    Ok((config, image))
}

fn exporter_for(seed: Option<u64>, image: SourceImage) -> Exporter {
    let mut exporter = match seed {
        Some(s) => Exporter::with_seed(s),
        None => Exporter::new(),
    };
    exporter.load_image(image);
    exporter
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let (config, image) = load_inputs(&args.input)?;
    let mut exporter = exporter_for(args.input.seed, image);
    let png = exporter.export_still(&config, args.progress)?;
    ensure_parent(&args.out)?;
    std::fs::write(&args.out, png).with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let (config, image) = load_inputs(&args.input)?;
    let duration = args.duration.unwrap_or(config.duration);
    let opts = VideoOpts::new(duration, args.fps)?;
    let mut exporter = exporter_for(args.input.seed, image);

    let (mut sink, target): (Box<dyn FrameSink>, PathBuf) = match (&args.frames_dir, &args.out) {
        (Some(dir), _) => (Box::new(PngSequenceSink::new(dir)), dir.clone()),
        (None, Some(out)) => {
            let mut sink_opts = FfmpegSinkOpts::new(out);
            sink_opts.overwrite = !args.no_overwrite;
            sink_opts.ffmpeg = args.ffmpeg.clone();
            (Box::new(FfmpegSink::new(sink_opts)), out.clone())
        }
        (None, None) => bail!("pass --out or --frames-dir"),
    };

    let started = Instant::now();
    let stats = exporter.export_video(&config, &opts, sink.as_mut())?;
    eprintln!(
        "wrote {} ({} frames, {}x{}, {:.2}s)",
        target.display(),
        stats.frames,
        stats.width,
        stats.height,
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        bail!("--fps must be > 0");
    }
    if !args.seconds.is_finite() || args.seconds <= 0.0 {
        bail!("--seconds must be positive");
    }
    let (config, image) = load_inputs(&args.input)?;
    let mut scheduler = FrameScheduler::new(
        config,
        SchedulerOpts {
            seed: args.input.seed,
            offload: args.offload,
            ..SchedulerOpts::default()
        },
    )?;

    let frame_interval = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let start = Instant::now();
    let stop = start + Duration::from_secs_f64(args.seconds);
    scheduler.load_image(image, start);

    let mut rendered = 0u64;
    loop {
        let now = Instant::now();
        if now >= stop {
            break;
        }
        match scheduler.tick(now)? {
            TickOutcome::Rendered { .. } => rendered += 1,
            TickOutcome::Finished => break,
            TickOutcome::Pending | TickOutcome::Idle | TickOutcome::Paused => {}
        }
        if let Some(sleep) = (now + frame_interval).checked_duration_since(Instant::now()) {
            std::thread::sleep(sleep);
        }
    }
    if args.offload && scheduler.settle(Duration::from_secs(1), Instant::now())? {
        rendered += 1;
    }

    let metrics = scheduler.perf().metrics();
    eprintln!(
        "rendered {rendered} frames: {} fps, {:.2} ms/frame",
        metrics.fps, metrics.frame_time_ms
    );
    if let Some(out) = &args.out {
        let frame = scheduler
            .frame()
            .context("no frame was rendered during the preview")?;
        write_png(out, frame)?;
        eprintln!("wrote {}", out.display());
    }
    scheduler.dispose();
    Ok(())
}

fn cmd_share(args: ShareArgs) -> anyhow::Result<()> {
    if let Some(path) = &args.encode {
        let config = GlitchConfig::from_path(path)?;
        println!("{}", encode_shared(&config)?);
        return Ok(());
    }
    if let Some(s) = &args.decode {
        let config = glitchkit::decode_shared(s)?;
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }
    bail!("pass --encode or --decode")
}

fn cmd_presets(args: PresetsArgs) -> anyhow::Result<()> {
    if let Some(id) = &args.show {
        let preset = presets::find(id).with_context(|| format!("unknown preset '{id}'"))?;
        println!("{}", preset.config().to_json_pretty()?);
        return Ok(());
    }
    for p in presets::all() {
        println!("{:<14} {:<14} {}", p.id, p.name, p.description);
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

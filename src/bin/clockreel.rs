use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use clockreel::{
    EncodeConfig, FfmpegBackend, FfmpegOpts, GlyphSet, Mode, RenderReport, RenderRequest,
    RenderThreading, Session, TimeValue, compose, render_to_video,
};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(Parser, Debug)]
#[command(name = "clockreel", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Defaults to `interactive` when omitted.
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Directory holding `0.png` .. `9.png` and `colon.png`.
    #[arg(long, global = true, default_value = "Assets")]
    assets: PathBuf,

    /// Directory the video is written into.
    #[arg(long, global = true, default_value = ".")]
    out_dir: PathBuf,

    /// Codec tried first.
    #[arg(long, global = true, default_value = clockreel::encode::DEFAULT_PRIMARY_CODEC)]
    codec: String,

    /// Codec tried when the first one fails.
    #[arg(long, global = true, default_value = clockreel::encode::DEFAULT_FALLBACK_CODEC)]
    fallback_codec: String,

    /// Refuse to replace an existing output file.
    #[arg(long, global = true, default_value_t = false)]
    no_overwrite: bool,

    /// Enable frame-level parallelism.
    #[arg(long, global = true, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Render chunk size (parallel mode only).
    #[arg(long, global = true, default_value_t = 256)]
    chunk_size: usize,

    /// Print a JSON render report on stdout (one line per video in interactive mode).
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count down from the given time to 00:00:00 (writes `timer.mp4`).
    Timer(TimerArgs),
    /// Count up from 00:00:00 for a number of hours (writes `stopwatch.mp4`).
    Stopwatch(StopwatchArgs),
    /// Render a single clock reading as a PNG.
    Frame(FrameArgs),
    /// Menu-driven prompt on stdin.
    Interactive,
}

#[derive(Args, Debug)]
struct TimerArgs {
    #[arg(long)]
    hours: u64,
    #[arg(long)]
    minutes: u64,
    #[arg(long)]
    seconds: u64,
}

#[derive(Args, Debug)]
struct StopwatchArgs {
    /// Duration in whole hours.
    #[arg(long)]
    hours: u64,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Clock reading in total seconds.
    #[arg(long)]
    seconds: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let glyphs = GlyphSet::load(&cli.common.assets)?;
    match cli.cmd.unwrap_or(Command::Interactive) {
        Command::Timer(args) => cmd_render(
            &cli.common,
            &glyphs,
            Mode::Timer {
                hours: args.hours,
                minutes: args.minutes,
                seconds: args.seconds,
            },
        ),
        Command::Stopwatch(args) => cmd_render(
            &cli.common,
            &glyphs,
            Mode::Stopwatch {
                duration_hours: args.hours,
            },
        ),
        Command::Frame(args) => cmd_frame(&glyphs, args),
        Command::Interactive => cmd_interactive(&cli.common, &glyphs),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn make_request(common: &CommonArgs, mode: Mode) -> RenderRequest {
    RenderRequest {
        mode,
        out_dir: common.out_dir.clone(),
        threading: RenderThreading {
            parallel: common.parallel,
            chunk_size: common.chunk_size,
            threads: common.threads,
        },
        encode: EncodeConfig {
            primary_codec: common.codec.clone(),
            fallback_codec: common.fallback_codec.clone(),
            overwrite: !common.no_overwrite,
            ..EncodeConfig::default()
        },
    }
}

fn make_backend() -> FfmpegBackend {
    FfmpegBackend::new(FfmpegOpts::default())
}

fn cmd_render(common: &CommonArgs, glyphs: &GlyphSet, mode: Mode) -> anyhow::Result<()> {
    let req = make_request(common, mode);
    let mut backend = make_backend();
    let report = render_to_video(&req, glyphs, &mut backend)?;
    print_report(common, &report)
}

fn cmd_frame(glyphs: &GlyphSet, args: FrameArgs) -> anyhow::Result<()> {
    let frame = compose(TimeValue(args.seconds), glyphs, glyphs.max_size());

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_interactive(common: &CommonArgs, glyphs: &GlyphSet) -> anyhow::Result<()> {
    let mut backend = make_backend();
    let stdin = std::io::stdin();
    let mut session = Session::new(stdin.lock(), std::io::stdout());
    session.run(|mode| {
        let report = render_to_video(&make_request(common, mode), glyphs, &mut backend)?;
        if common.json {
            let json = serde_json::to_string(&report).context("serialize render report")?;
            println!("{json}");
        }
        Ok(report)
    })?;
    Ok(())
}

fn print_report(common: &CommonArgs, report: &RenderReport) -> anyhow::Result<()> {
    if common.json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("serialize render report")?
        );
    }
    if report.used_fallback {
        eprintln!(
            "wrote {} (fallback codec {})",
            report.out_path.display(),
            report.codec
        );
    } else {
        eprintln!("wrote {}", report.out_path.display());
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sunpath::models::{AppConfig, LocationConfig, SunInterval, Theme, ThemeFlag};
use sunpath::rendering::{SvgCanvas, SvgRenderer};
use sunpath::services::{
    AnimationLoop, FixedClock, FrameQueue, OpenWeatherClient, SunDataSource, SunPathRenderer,
    SystemClock,
};

#[derive(Parser)]
#[command(name = "sunpath")]
#[command(about = "Sunpath - animated sunrise/sunset arc renderer")]
struct Cli {
    /// Config file (defaults to $CONFIG_FILE, then ./sunpath.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Clone, Copy)]
struct CanvasArgs {
    /// Canvas width in CSS pixels
    #[arg(long)]
    width: Option<f64>,

    /// Canvas height in CSS pixels
    #[arg(long)]
    height: Option<f64>,

    /// Device pixel ratio
    #[arg(long)]
    dpr: Option<f64>,

    /// Colour theme: "light" or "dark"
    #[arg(long)]
    theme: Option<Theme>,
}

#[derive(clap::Args, Clone, Copy)]
struct LocationArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Timezone offset in seconds east of UTC (0 = use the API's)
    #[arg(long, allow_hyphen_values = true)]
    tz: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single frame to a PNG file
    Render {
        /// Sunrise as Unix seconds
        #[arg(long)]
        sunrise: i64,

        /// Sunset as Unix seconds
        #[arg(long)]
        sunset: i64,

        /// Instant to draw, as Unix seconds (defaults to now)
        #[arg(long)]
        at: Option<i64>,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        canvas: CanvasArgs,
    },
    /// Fetch sunrise/sunset for a location and print them
    Fetch {
        #[command(flatten)]
        location: LocationArgs,

        /// Also render the current frame to this PNG file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        canvas: CanvasArgs,
    },
    /// Run the animation loop, writing PNG snapshots
    Animate {
        /// Output PNG file path (overwritten on every snapshot)
        #[arg(short, long)]
        output: PathBuf,

        /// Stop after this many frames
        #[arg(long)]
        frames: Option<u64>,

        /// Frames per second
        #[arg(long)]
        fps: Option<u32>,

        /// Fixed sunrise as Unix seconds (skips fetching)
        #[arg(long, requires = "sunset")]
        sunrise: Option<i64>,

        /// Fixed sunset as Unix seconds (skips fetching)
        #[arg(long, requires = "sunrise")]
        sunset: Option<i64>,

        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        canvas: CanvasArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();
    if cli.config.is_none() {
        cli.config = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    }

    match cli.command {
        Some(Commands::Render {
            sunrise,
            sunset,
            at,
            output,
            canvas,
        }) => {
            init_tracing("sunpath=warn", false);
            let config = apply_canvas_args(AppConfig::load(cli.config.as_deref()), canvas);
            let interval = interval_from_unix(sunrise, sunset)?;
            run_render_command(&config, interval, at, &output)
        }
        Some(Commands::Fetch {
            location,
            output,
            canvas,
        }) => {
            init_tracing("sunpath=warn", false);
            let config = apply_canvas_args(AppConfig::load(cli.config.as_deref()), canvas);
            let config = apply_location_args(config, location);
            run_fetch_command(&config, output.as_deref()).await
        }
        Some(Commands::Animate {
            output,
            frames,
            fps,
            sunrise,
            sunset,
            location,
            canvas,
        }) => {
            init_tracing("sunpath=info", true);
            let mut config = apply_canvas_args(AppConfig::load(cli.config.as_deref()), canvas);
            config = apply_location_args(config, location);
            if let Some(fps) = fps {
                config.animation.fps = fps;
            }
            if frames.is_some() {
                config.animation.frame_limit = frames;
            }
            let fixed = match (sunrise, sunset) {
                (Some(sunrise), Some(sunset)) => Some(interval_from_unix(sunrise, sunset)?),
                _ => None,
            };
            run_animate_command(&config, fixed, &output).await
        }
        None => {
            init_tracing("sunpath=warn", false);
            run_status_command(&AppConfig::load(cli.config.as_deref()), cli.config.as_deref());
            Ok(())
        }
    }
}

fn init_tracing(default_filter: &str, with_time: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);
    if with_time {
        registry.with(tracing_subscriber::fmt::layer()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().without_time())
            .init();
    }
}

fn apply_canvas_args(mut config: AppConfig, args: CanvasArgs) -> AppConfig {
    if let Some(width) = args.width {
        config.canvas.width = width;
    }
    if let Some(height) = args.height {
        config.canvas.height = height;
    }
    if let Some(dpr) = args.dpr {
        config.canvas.device_pixel_ratio = dpr;
    }
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    config
}

fn apply_location_args(mut config: AppConfig, args: LocationArgs) -> AppConfig {
    if let Some(lat) = args.lat {
        config.location.lat = lat;
    }
    if let Some(lon) = args.lon {
        config.location.lon = lon;
    }
    if let Some(tz) = args.tz {
        config.location.timezone_offset = tz;
    }
    config
}

fn interval_from_unix(sunrise: i64, sunset: i64) -> anyhow::Result<SunInterval> {
    SunInterval::from_unix(sunrise, sunset)
        .ok_or_else(|| anyhow::anyhow!("Sunrise/sunset timestamps out of range"))
}

fn new_canvas(config: &AppConfig) -> SvgCanvas {
    SvgCanvas::new(
        config.canvas.width,
        config.canvas.height,
        config.canvas.device_pixel_ratio,
        Arc::new(SvgRenderer::new()),
    )
}

/// Render one frame at a fixed instant (no loop)
fn run_render_command(
    config: &AppConfig,
    interval: SunInterval,
    at: Option<i64>,
    output: &Path,
) -> anyhow::Result<()> {
    let now = match at {
        Some(secs) => chrono::DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| anyhow::anyhow!("--at timestamp out of range"))?,
        None => chrono::Utc::now(),
    };

    let mut canvas = new_canvas(config);
    let mut renderer = SunPathRenderer::new(
        FrameQueue::new(),
        FixedClock::new(now),
        ThemeFlag::new(config.theme),
    );
    let report = renderer
        .draw(Some(&mut canvas), interval)
        .ok_or_else(|| anyhow::anyhow!("Nothing was drawn"))?;

    let png = canvas.snapshot_png()?;
    std::fs::write(output, &png)?;
    println!(
        "Rendered {} ({} bytes, progress {:.3})",
        output.display(),
        png.len(),
        report.position.progress
    );

    Ok(())
}

async fn run_fetch_command(config: &AppConfig, output: Option<&Path>) -> anyhow::Result<()> {
    let client = OpenWeatherClient::from_config(&config.openweather)?;
    let report = client.fetch(&config.location).await?;
    println!("{}", report.summary());

    if let Some(output) = output {
        run_render_command(config, report.interval, None, output)?;
    }
    Ok(())
}

async fn run_animate_command(
    config: &AppConfig,
    fixed: Option<SunInterval>,
    output: &Path,
) -> anyhow::Result<()> {
    let (tx, rx) = watch::channel(fixed);

    // Keep the sender alive for the whole run; dropping it would stop restarts.
    let refresher = if fixed.is_none() {
        let client = OpenWeatherClient::from_config(&config.openweather)?;
        let location = config.location;
        let refresh = std::time::Duration::from_secs(config.animation.refresh_secs.max(1));
        Some(tokio::spawn(refresh_sun_data(client, location, refresh, tx)))
    } else {
        None
    };

    let mut canvas = new_canvas(config);
    let mut renderer = SunPathRenderer::new(
        FrameQueue::new(),
        SystemClock,
        ThemeFlag::new(config.theme),
    );
    let stats = AnimationLoop::new(&config.animation)
        .with_snapshot_path(output)
        .run(&mut renderer, &mut canvas, rx)
        .await?;

    if let Some(task) = refresher {
        task.abort();
    }

    println!(
        "Drew {} frames ({} restarts), last snapshot at {}",
        stats.frames,
        stats.restarts,
        output.display()
    );
    Ok(())
}

/// Fetch sun data now and then every `every`, publishing each new interval.
///
/// Failures are logged and the previous interval stays in place.
async fn refresh_sun_data(
    client: OpenWeatherClient,
    location: LocationConfig,
    every: std::time::Duration,
    tx: watch::Sender<Option<SunInterval>>,
) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        match client.fetch(&location).await {
            Ok(report) => {
                tracing::info!(summary = %report.summary(), "Sun data updated");
                tx.send_if_modified(|current| {
                    let changed = *current != Some(report.interval);
                    *current = Some(report.interval);
                    changed
                });
            }
            Err(e) => {
                tracing::error!(%e, "Sun data error");
            }
        }
    }
}

/// Display status and configuration information
fn run_status_command(config: &AppConfig, config_path: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Sunpath v{VERSION}");
    println!("Animated sunrise/sunset arc renderer\n");

    println!("Configuration:");
    let source = match config_path {
        Some(path) if path.exists() => path.display().to_string(),
        Some(path) => format!("{} (not found, using defaults)", path.display()),
        None if Path::new(sunpath::models::config::DEFAULT_CONFIG_FILE).exists() => {
            sunpath::models::config::DEFAULT_CONFIG_FILE.to_string()
        }
        None => "defaults".to_string(),
    };
    println!("  Source:   {source}");
    println!(
        "  Canvas:   {}x{} @ {}x",
        config.canvas.width, config.canvas.height, config.canvas.device_pixel_ratio
    );
    println!(
        "  Location: {}, {} (tz offset {})",
        config.location.lat, config.location.lon, config.location.timezone_offset
    );
    println!("  Theme:    {:?}", config.theme);
    println!(
        "  API key:  {}",
        if config.openweather.api_key.is_some() {
            "set"
        } else {
            "(not set, export OPENWEATHER_API_KEY)"
        }
    );

    println!("\nCommands:");
    println!("  sunpath render    Render one frame to PNG");
    println!("  sunpath fetch     Fetch and print sunrise/noon/sunset");
    println!("  sunpath animate   Run the animation loop");
    println!("\nRun 'sunpath --help' for more details.");
}

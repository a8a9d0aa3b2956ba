use clap::{Args, Parser, Subcommand};
use cli::{OutputPaths, OverheadConfig, OverheadPlan, write_marker_outputs};
use color_eyre::eyre::{Result, bail};
use countdown::{Countdown, Utc, parse_minutes};
use markers::{MARKER_COLOR, Pipeline};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Outline the transparent area of a stream overlay and show a countdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare the full display: countdown panel, background and overlay markers
    Run(RunArgs),
    /// Compute the marker rectangles of an overlay image
    Markers {
        /// RGBA overlay image
        #[arg(short, long)]
        overlay: PathBuf,
        /// Alpha level from which pixels count as opaque
        #[arg(long, default_value_t = u8::MAX)]
        opaque_alpha: u8,
        /// Write the markers as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write the markers as GeoJSON
        #[arg(long)]
        geojson: Option<PathBuf>,
        /// Write the overlay with markers painted on top as PNG
        #[arg(long)]
        preview: Option<PathBuf>,
    },
    /// Run a countdown in the terminal
    Countdown {
        /// Countdown length in minutes
        #[arg(short, long, value_parser = parse_minutes)]
        minutes: u32,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

#[derive(Args)]
struct RunArgs {
    /// Panel X position
    #[arg(allow_negative_numbers = true)]
    x: Option<i32>,
    /// Panel Y position
    #[arg(allow_negative_numbers = true)]
    y: Option<i32>,
    /// Panel width (ignored with --background)
    width: Option<u32>,
    /// Panel height (ignored with --background)
    height: Option<u32>,
    /// Countdown length in minutes
    #[arg(long, value_parser = parse_minutes)]
    countdown: Option<u32>,
    /// RGB image drawn behind the countdown
    #[arg(long)]
    background: Option<PathBuf>,
    /// RGBA overlay whose transparent area gets outlined
    #[arg(long)]
    overlay: Option<PathBuf>,
    /// TOML or JSON configuration file; command-line values take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    markers_json: Option<PathBuf>,
    #[arg(long)]
    markers_geojson: Option<PathBuf>,
    #[arg(long)]
    preview: Option<PathBuf>,
}

impl RunArgs {
    fn into_config(self) -> Result<OverheadConfig> {
        let mut config = match &self.config {
            Some(path) => OverheadConfig::from_file(path)?,
            None => OverheadConfig::default(),
        };

        if let Some(x) = self.x {
            config.x = x;
        }
        if let Some(y) = self.y {
            config.y = y;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(minutes) = self.countdown {
            config.countdown_minutes = minutes;
        }
        config.background = self.background.or(config.background);
        config.overlay = self.overlay.or(config.overlay);
        config.outputs.markers_json = self.markers_json.or(config.outputs.markers_json);
        config.outputs.markers_geojson = self.markers_geojson.or(config.outputs.markers_geojson);
        config.outputs.preview_png = self.preview.or(config.outputs.preview_png);

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let config = args.into_config()?;
            run(&config).await?;
        }
        Commands::Markers {
            overlay,
            opaque_alpha,
            json,
            geojson,
            preview,
        } => {
            let outputs = OutputPaths {
                markers_json: json,
                markers_geojson: geojson,
                preview_png: preview,
            };
            compute_markers(overlay, opaque_alpha, &outputs)?;
        }
        Commands::Countdown { minutes } => {
            if minutes == 0 {
                bail!("countdown of 0 minutes has nothing to show");
            }
            tick(Countdown::start_now(minutes)?).await?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&OverheadConfig::schema())?);
        }
    }

    Ok(())
}

async fn run(config: &OverheadConfig) -> Result<()> {
    let plan = config.prepare()?;
    summarize(&plan);

    if plan.markers.is_some() {
        plan.write_outputs(&config.outputs, config.marker_rgba())?;
    } else if !config.outputs.is_empty() {
        warn!("No overlay configured, skipping marker outputs");
    }

    if let Some(countdown) = plan.countdown {
        tick(countdown).await?;
    }

    info!("✅ Overhead display finished");
    Ok(())
}

fn summarize(plan: &OverheadPlan) {
    let panel = plan.panel;
    info!(
        "🕒 Countdown panel at ({}, {}) sized {}x{}{}",
        panel.x,
        panel.y,
        panel.width,
        panel.height,
        if plan.background.is_some() { " with background" } else { "" }
    );
    if let Some(layout) = &plan.markers {
        info!(
            "🎯 {} marker rectangles ({} pixels) for a {}x{} overlay",
            layout.len(),
            layout.covered_pixels(),
            layout.image_width,
            layout.image_height
        );
        for (id, marker) in layout.iter() {
            tracing::debug!(
                id = id.index(),
                x = marker.x,
                y = marker.y,
                width = marker.width,
                height = marker.height,
                "marker"
            );
        }
    }
}

fn compute_markers(overlay: PathBuf, opaque_alpha: u8, outputs: &OutputPaths) -> Result<()> {
    let pipeline = Pipeline::builder().with_opaque_alpha(opaque_alpha).build();
    info!("{}", pipeline.info());

    let image = markers::load_overlay(&overlay)?;
    let layout = pipeline.process(&image)?;

    if outputs.is_empty() {
        println!("{}", layout.to_json()?);
        return Ok(());
    }

    write_marker_outputs(&layout, &image, outputs, MARKER_COLOR)?;
    Ok(())
}

/// Redraw the countdown label right after every second flip until it expires
async fn tick(countdown: Countdown) -> Result<()> {
    info!("⏳ Countdown of {} minutes started", countdown.minutes());
    let mut stdout = std::io::stdout();

    loop {
        let remaining = countdown.remaining(Utc::now());
        write!(stdout, "\r{}", remaining.format(countdown.shows_hours()))?;
        stdout.flush()?;

        if !remaining.running {
            writeln!(stdout)?;
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(remaining.next_tick()) => {}
            _ = tokio::signal::ctrl_c() => {
                writeln!(stdout)?;
                warn!("Countdown interrupted");
                return Ok(());
            }
        }
    }

    info!("⌛ Countdown expired");
    Ok(())
}


use ccbm::config::{self, GridConfig, GridOverrides, Preset};
use ccbm::output;
use ccbm::process::DefaultService;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; clap wants a static str
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "ccbm")]
#[command(about = "Split an image into per-key backgrounds for a creative console")]
#[command(long_about = "\
Split an image into per-key backgrounds for a creative console

The image is resized so its shorter side matches the target size,
center-cropped to a square, and cut into a grid of PNG tiles written
next to the input:

  photos/
  ├── sunset.jpg       # input (JPEG, PNG, GIF or BMP), never modified
  ├── ccbm.toml        # optional geometry overrides
  ├── sunset_1.png     # row 0, col 0
  ├── ...
  └── sunset_9.png     # row 2, col 2

Geometry (first match wins, top to bottom):
  --target-size / --grid-size / --tile-size / --spacing flags
  --config FILE, or ccbm.toml next to the image
  --preset (standard: 378/3/116/15, wide: 484/3/116/68)

Run 'ccbm gen-config' to print a documented ccbm.toml.")]
#[command(version = version_string())]
struct Cli {
    /// More verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split an image into a grid of key tiles
    Split(SplitArgs),
    /// Print a stock ccbm.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct SplitArgs {
    /// Image to split
    image: PathBuf,

    /// Geometry file (defaults to ccbm.toml next to the image, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in geometry the config file and flags are applied on top of
    #[arg(long, value_enum, default_value_t = Preset::Standard)]
    preset: Preset,

    /// Side of the intermediate square, in pixels
    #[arg(long)]
    target_size: Option<u32>,

    /// Rows = columns of the tile grid
    #[arg(long)]
    grid_size: Option<u32>,

    /// Side of each tile, in pixels
    #[arg(long)]
    tile_size: Option<u32>,

    /// Pixels skipped between neighbouring tiles
    #[arg(long)]
    spacing: Option<u32>,
}

impl SplitArgs {
    fn overrides(&self) -> GridOverrides {
        GridOverrides {
            target_size: self.target_size,
            grid_size: self.grid_size,
            tile_size: self.tile_size,
            spacing: self.spacing,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Split(args) => {
            let grid = resolve_grid(&args)?;
            tracing::debug!(?grid, "resolved geometry");
            let service = DefaultService::new(grid)?;
            let report = service.process_image(&args.image)?;
            output::print_split_output(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }
    Ok(())
}

/// Resolve geometry: preset → config file → flags, validated once at the end.
fn resolve_grid(args: &SplitArgs) -> Result<GridConfig, config::ConfigError> {
    config::load_config(
        image_dir(&args.image),
        args.config.as_deref(),
        args.preset.config(),
        &args.overrides(),
    )
}

/// Directory holding the input image; `.` for a bare file name.
fn image_dir(image: &Path) -> &Path {
    match image.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

//! Sky chart tool
//!
//! Precomputes constellation boundaries and limits, converts IAU boundary
//! files into constellation records, and renders charts as JSON primitive
//! lists.
//!
//! Usage:
//!   cargo run --bin sky-chart -- precompute --store store.json --output precomputed.json
//!   cargo run --bin sky-chart -- boundaries --file ori.txt --abbreviation ORI
//!   cargo run --bin sky-chart -- render --store precomputed.json --config chart.json

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use flexi_logger::Logger;
use log::info;
use serde::Serialize;

use skychart::boundaries::iau::parse_boundary_text;
use skychart::catalogs::{ConstellationRecord, StoreSnapshot, SyntheticStarConfig, VertexRecord};
use skychart::{
    BoundaryInterpolator, ChartConfig, ExtremalPairMode, ProjectionPipeline, RegionSummarizer,
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Celestial sphere projection for star charts", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interpolate boundaries and compute limits for every constellation
    Precompute {
        /// Store snapshot JSON
        #[arg(long)]
        store: PathBuf,

        /// Output path; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,

        /// Extremal pair search used for the limits
        #[arg(long, value_enum, default_value_t = Mode::RaOnly)]
        mode: Mode,

        /// Worker threads; all cores when omitted
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Convert IAU boundary files (one per part) into a constellation record
    Boundaries {
        /// Boundary file; repeat for multi-part constellations
        #[arg(long, required = true)]
        file: Vec<PathBuf>,

        /// IAU abbreviation stored in the record
        #[arg(long)]
        abbreviation: Option<String>,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Render a chart into a JSON list of drawing primitives
    Render {
        #[arg(long)]
        store: PathBuf,

        /// Chart config JSON; defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        output: Option<PathBuf>,

        /// Add this many synthetic stars to the store's stars
        #[arg(long, default_value_t = 0)]
        synthetic_stars: usize,

        /// Seed for the synthetic stars
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    RaOnly,
    GreatCircle,
}

impl From<Mode> for ExtremalPairMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::RaOnly => ExtremalPairMode::RaOnly,
            Mode::GreatCircle => ExtremalPairMode::GreatCircle,
        }
    }
}

/// Output document with a generation timestamp
#[derive(Serialize)]
struct Stamped<'a, T: Serialize> {
    generated_at: String,
    #[serde(flatten)]
    body: &'a T,
}

fn write_output<T: Serialize>(body: &T, output: Option<&Path>) -> Result<()> {
    let stamped = Stamped {
        generated_at: chrono::Utc::now().to_rfc3339(),
        body,
    };
    let text = serde_json::to_string_pretty(&stamped)?;
    match output {
        Some(path) => {
            fs::write(path, text)?;
            info!("Wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn precompute(store: &Path, output: Option<&Path>, mode: Mode, workers: Option<usize>) -> Result<()> {
    let snapshot = StoreSnapshot::from_json_file(store)?;
    let pipeline = ProjectionPipeline::new(
        BoundaryInterpolator::default(),
        RegionSummarizer::new(mode.into()),
    )
    .with_workers(workers);

    let records = pipeline.precompute(&snapshot.constellations)?;
    let precomputed = StoreSnapshot {
        constellations: records
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<_, _>>()?,
        stars: snapshot.stars,
    };
    write_output(&precomputed, output)
}

fn boundaries(files: &[PathBuf], abbreviation: Option<String>, output: Option<&Path>) -> Result<()> {
    let mut parts: Vec<Vec<VertexRecord>> = Vec::with_capacity(files.len());
    for file in files {
        let vertices = parse_boundary_text(&fs::read_to_string(file)?)?;
        info!("{}: {} vertices", file.display(), vertices.len());
        parts.push(vertices.into_iter().map(VertexRecord::from).collect());
    }

    let record = ConstellationRecord {
        abbreviation,
        boundaries: parts,
        ..Default::default()
    };
    // Fail early on files that do not describe a closed boundary
    record.boundary_polygons()?;
    write_output(&record, output)
}

fn render(
    store: &Path,
    config: Option<&Path>,
    output: Option<&Path>,
    synthetic_stars: usize,
    seed: u64,
) -> Result<()> {
    let config = match config {
        Some(path) => ChartConfig::from_json_file(path)?,
        None => ChartConfig::default(),
    };
    let snapshot = StoreSnapshot::from_json_file(store)?;

    let mut stars = snapshot.stars();
    if synthetic_stars > 0 {
        info!("Adding {synthetic_stars} synthetic stars (seed {seed})");
        stars.extend(
            SyntheticStarConfig::new()
                .with_count(synthetic_stars)
                .with_seed(seed)
                .generate(),
        );
    }

    let chart = ProjectionPipeline::default().render_records(&config, snapshot.constellations(), &stars)?;
    write_output(&chart, output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let _logger = Logger::try_with_env_or_str(default_level)?
        .log_to_stderr()
        .start()?;

    match cli.command {
        Commands::Precompute {
            store,
            output,
            mode,
            workers,
        } => precompute(&store, output.as_deref(), mode, workers),
        Commands::Boundaries {
            file,
            abbreviation,
            output,
        } => boundaries(&file, abbreviation, output.as_deref()),
        Commands::Render {
            store,
            config,
            output,
            synthetic_stars,
            seed,
        } => render(
            &store,
            config.as_deref(),
            output.as_deref(),
            synthetic_stars,
            seed,
        ),
    }
}

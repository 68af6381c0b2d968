//! Geoload: geospatial machine-learning dataset loading.
//!
//! Geoload acquires remote-sensing datasets (download, checksum, extract),
//! indexes their per-modality file trees, and decodes samples into
//! `ndarray` arrays. It also carries a registry of pretrained YOLO weights.
//!
//! # Modules
//!
//! - [`acquire`]: Download, MD5 verification and zip extraction
//! - [`index`]: Ordered sample tables over extracted trees
//! - [`load`]: Image and audio decoding into sample records
//! - [`dataset`]: The ADVANCE dataset and its configuration
//! - [`weights`]: Pretrained YOLO weights and the model factory
//! - [`inspect`]: Dataset summaries
//! - [`error`]: Error types for geoload operations
//!
//! # Example
//!
//! ```no_run
//! use geoload::dataset::Advance;
//!
//! let dataset = Advance::builder("data/advance")
//!     .download(true)
//!     .checksum(true)
//!     .build()?;
//!
//! let sample = dataset.get(0)?;
//! assert_eq!(sample.image.shape()[0], 3);
//! # Ok::<(), geoload::GeoloadError>(())
//! ```

pub mod acquire;
pub mod dataset;
pub mod error;
pub mod index;
pub mod inspect;
pub mod load;
pub mod weights;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::GeoloadError;

use dataset::Advance;
use weights::YoloWeights;

/// The geoload CLI application.
#[derive(Parser)]
#[command(name = "geoload")]
#[command(version, author, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Download, verify and extract the ADVANCE dataset.
    Download(DownloadArgs),
    /// Summarise an extracted dataset.
    Inspect(InspectArgs),
    /// Pretrained YOLO weights.
    #[command(subcommand)]
    Weights(WeightsCommand),
}

/// Arguments for the download subcommand.
#[derive(clap::Args)]
struct DownloadArgs {
    /// Dataset root directory.
    #[arg(long, env = "GEOLOAD_ROOT", default_value = "data")]
    root: PathBuf,

    /// Verify archive MD5 digests before extracting.
    #[arg(long)]
    checksum: bool,

    /// Archive source (URL or local path). Repeat once per archive, in
    /// vision, sound order. Requires a matching --md5 for each.
    #[arg(long = "source", requires = "md5")]
    sources: Vec<String>,

    /// Expected MD5 of each --source, in the same order.
    #[arg(long = "md5")]
    md5: Vec<String>,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Dataset root directory.
    #[arg(long, env = "GEOLOAD_ROOT", default_value = "data")]
    root: PathBuf,

    /// Number of classes to list before grouping the rest as "(other)".
    #[arg(long, default_value_t = 13)]
    top: usize,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

#[derive(Subcommand)]
enum WeightsCommand {
    /// List registered weights.
    List,
    /// Show metadata for one set of weights.
    Show {
        /// Weights name, e.g. 'delineate_anything'.
        name: String,

        /// Output format ('text' or 'json').
        #[arg(long, default_value = "text")]
        output: String,
    },
}

/// Run the geoload CLI with already-parsed arguments.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run(cli: Cli) -> Result<(), GeoloadError> {
    match cli.command {
        Some(Commands::Download(args)) => run_download(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        Some(Commands::Weights(command)) => run_weights(command),
        None => {
            println!("geoload {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Geospatial dataset acquisition and loading.");
            println!();
            println!("Run 'geoload --help' for usage information.");
            Ok(())
        }
    }
}

fn run_download(args: DownloadArgs) -> Result<(), GeoloadError> {
    let mut builder = Advance::builder(&args.root)
        .download(true)
        .checksum(args.checksum);
    if !args.sources.is_empty() || !args.md5.is_empty() {
        builder = builder.sources(args.sources, args.md5);
    }

    let dataset = builder.build()?;
    println!(
        "Dataset ready at {}: {} sample(s) across {} class(es)",
        dataset.root().display(),
        dataset.len(),
        dataset.classes().len()
    );
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<(), GeoloadError> {
    let dataset = Advance::builder(&args.root).build()?;
    let opts = inspect::InspectOptions {
        top_classes: args.top,
        ..Default::default()
    };
    let report = inspect::inspect_dataset(&dataset, &opts);

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print!("{}", report),
        other => {
            return Err(GeoloadError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )))
        }
    }
    Ok(())
}

fn run_weights(command: WeightsCommand) -> Result<(), GeoloadError> {
    match command {
        WeightsCommand::List => {
            for weights in YoloWeights::ALL {
                let meta = weights.meta();
                println!(
                    "{:<26} {:<12} {:<8} {}",
                    weights.name(),
                    meta.model,
                    meta.task,
                    meta.license
                );
            }
            Ok(())
        }
        WeightsCommand::Show { name, output } => {
            let weights: YoloWeights = name.parse()?;
            weights.validate()?;
            let meta = weights.meta();

            match output.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(meta)?),
                "text" => {
                    println!("name:        {}", weights.name());
                    println!("url:         {}", meta.url);
                    println!("model:       {}", meta.model);
                    println!("task:        {}", meta.task);
                    println!("dataset:     {}", meta.dataset);
                    println!(
                        "input shape: [{}, {}, {}]",
                        meta.input_shape[0], meta.input_shape[1], meta.input_shape[2]
                    );
                    println!("bands:       {}", meta.bands.join(", "));
                    if let Some(classes) = meta.classes {
                        println!("classes:     {}", classes.join(", "));
                    }
                    println!("repo:        {}", meta.repo);
                    if let Some(publication) = meta.publication {
                        println!("publication: {}", publication);
                    }
                    println!("license:     {}", meta.license);
                }
                other => {
                    return Err(GeoloadError::UnsupportedFormat(format!(
                        "'{}' (supported: text, json)",
                        other
                    )))
                }
            }
            Ok(())
        }
    }
}

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use footsize::ingest::load_image;
use footsize::{EstimatorConfig, FootError, FootEstimator, MeasurementResult, SizeCatalog};

#[derive(Parser)]
#[command(name = "footsize")]
#[command(about = "Measure foot length from a photo of a foot standing on A4 paper")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure one or more photos
    Measure(MeasureArgs),

    /// Find the product page for a foot size
    Lookup(LookupArgs),
}

#[derive(Args)]
struct MeasureArgs {
    /// Photos to measure (png, jpg, jpeg or gif)
    #[arg(value_name = "IMAGE", required = true)]
    images: Vec<PathBuf>,

    /// Print one JSON object per image
    #[arg(long)]
    json: bool,

    /// TOML file overriding paper size, clustering seed and overlay color
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Save intermediate images, one subdirectory per photo (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    #[command(flatten)]
    chart: ChartArgs,
}

#[derive(Args)]
struct ChartArgs {
    /// Directory holding <platform>/<gender>.csv size charts
    #[arg(long, value_name = "DIR", requires_all = ["gender", "platform"])]
    chart_dir: Option<PathBuf>,

    #[arg(long)]
    gender: Option<String>,

    #[arg(long)]
    platform: Option<String>,
}

#[derive(Args)]
struct LookupArgs {
    /// Foot length in centimeters
    #[arg(long)]
    size: f64,

    #[arg(long)]
    gender: String,

    #[arg(long)]
    platform: String,

    /// Directory holding <platform>/<gender>.csv size charts
    #[arg(long, value_name = "DIR")]
    chart_dir: PathBuf,
}

#[derive(Serialize)]
struct Report {
    image: String,
    #[serde(flatten)]
    result: MeasurementResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Serialize)]
struct Failure {
    image: String,
    error: String,
    details: String,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_estimator(
    config: &EstimatorConfig,
    debug_out: Option<&PathBuf>,
    index: usize,
    image: &Path,
) -> footsize::Result<FootEstimator> {
    let estimator = FootEstimator::with_config(config.clone());
    match debug_out {
        Some(dir) => {
            let stem = image
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            estimator.with_debug(dir.join(format!("{:02}_{}", index + 1, stem)))
        }
        None => Ok(estimator),
    }
}

async fn run_measure(args: MeasureArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => EstimatorConfig::load(path)?,
        None => EstimatorConfig::default(),
    };
    let catalog = args.chart.chart_dir.as_ref().map(SizeCatalog::new);

    // one blocking task per photo; measurements share nothing
    let mut handles = Vec::new();
    for (index, image) in args.images.iter().enumerate() {
        let estimator = build_estimator(&config, args.debug_out.as_ref(), index, image)?;
        let path = image.clone();
        handles.push(tokio::task::spawn_blocking(
            move || -> footsize::Result<MeasurementResult> {
                let img = load_image(&path)?;
                estimator.estimate(&img)
            },
        ));
    }

    let mut failures = 0;
    for (image, handle) in args.images.iter().zip(handles) {
        let name = image.display().to_string();
        match handle.await? {
            Ok(result) => {
                let url = match &catalog {
                    Some(catalog) => lookup_url(catalog, &args.chart, result.foot_size_cm),
                    None => None,
                };
                if args.json {
                    let report = Report {
                        image: name,
                        result,
                        url,
                    };
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    println!("{name}: {result}");
                    if let Some(url) = url {
                        println!("  {url}");
                    }
                }
            }
            Err(err) => {
                failures += 1;
                report_failure(&name, &err, args.json)?;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} images could not be measured", failures, args.images.len());
    }
    Ok(())
}

fn lookup_url(catalog: &SizeCatalog, chart: &ChartArgs, foot_size_cm: f64) -> Option<String> {
    let gender = chart.gender.as_deref().unwrap_or_default();
    let platform = chart.platform.as_deref().unwrap_or_default();
    match catalog.lookup(foot_size_cm, gender, platform) {
        Ok(url) => Some(url),
        Err(err) => {
            tracing::warn!(error = %err, "size lookup failed");
            None
        }
    }
}

fn report_failure(name: &str, err: &FootError, json: bool) -> anyhow::Result<()> {
    if json {
        let failure = Failure {
            image: name.to_string(),
            error: err.user_message(),
            details: err.to_string(),
        };
        println!("{}", serde_json::to_string(&failure)?);
    } else {
        eprintln!("{name}: {} ({err})", err.user_message());
    }
    Ok(())
}

fn run_lookup(args: LookupArgs) -> anyhow::Result<()> {
    let catalog = SizeCatalog::new(args.chart_dir);
    let url = catalog.lookup(args.size, &args.gender, &args.platform)?;
    println!("{url}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Measure(args) => run_measure(args).await,
        Commands::Lookup(args) => run_lookup(args),
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use sukashi::{
    Config, create_measurer,
    placement::resolve,
    render::apply_watermark,
    spec::{RenderTarget, WatermarkSpec},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Global options that apply to all commands
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve watermark placements for every configured preview target
    Resolve {
        /// Path to a WatermarkSpec JSON file
        spec: PathBuf,
    },

    /// Composite the watermark onto an image at its resolved placement
    Apply {
        /// Path to a WatermarkSpec JSON file
        spec: PathBuf,

        /// Source image
        image: PathBuf,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging first
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Resolve { spec } => resolve_command(&config, &spec).await,
        Commands::Apply {
            spec,
            image,
            output,
        } => apply_command(&config, &spec, &image, &output).await,
    }
}

fn load_config(path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        Ok(toml_edit::de::from_str::<Config>(&content)?)
    } else {
        info!("Config file not found at {:?}, using defaults", path);
        Ok(Config::default())
    }
}

fn load_spec(path: &PathBuf) -> Result<WatermarkSpec, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

async fn resolve_command(
    config: &Config,
    spec_path: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec = load_spec(spec_path)?;
    let measurer = create_measurer(config);
    let measured = measurer.measure_blocking(&spec).await?;

    #[derive(serde::Serialize)]
    struct TargetPlacement {
        target: RenderTarget,
        placement: sukashi::placement::ResolvedPlacement,
    }

    let placements: Vec<TargetPlacement> = config
        .render_targets()
        .into_iter()
        .map(|target| TargetPlacement {
            placement: resolve(&spec, &target, &measured),
            target,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&placements)?);
    Ok(())
}

async fn apply_command(
    config: &Config,
    spec_path: &PathBuf,
    image_path: &PathBuf,
    output_path: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec = load_spec(spec_path)?;
    let measurer = create_measurer(config);

    info!("Watermarking {:?}", image_path);
    let image = image::open(image_path)?;
    let watermarked = apply_watermark(image, &spec, &measurer).await;
    watermarked.save(output_path)?;
    info!("Wrote {:?}", output_path);
    Ok(())
}

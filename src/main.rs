use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use watermarker::config::{Config, LogFormat};
use watermarker::plugin::{
    discover, register_schema, register_sources, BatchRunner, DiscoveryOptions, InMemoryRegistry,
    SchemaRegistry,
};
use watermarker::watermark::{
    WatermarkKind, WatermarkOptions, WatermarkPosition, WatermarkProcessor,
};

/// Watermarker - add a text or image watermark to a batch of images
#[derive(Parser, Debug)]
#[command(name = "watermarker")]
#[command(version, about, long_about = None)]
struct Args {
    /// Image files or directories to watermark
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Print the batch report as JSON on stdout
    #[arg(long)]
    report: bool,

    /// Output file name prefix
    #[arg(long)]
    output_prefix: Option<String>,

    /// Watermark type: text or image
    #[arg(long = "type", value_name = "KIND")]
    kind: Option<WatermarkKind>,

    /// Text to render in text mode
    #[arg(long)]
    text: Option<String>,

    /// Overlay image in image mode
    #[arg(long)]
    image_path: Option<String>,

    /// Font size in pixels
    #[arg(long)]
    font_size: Option<u32>,

    /// Text color, any CSS color
    #[arg(long)]
    font_color: Option<String>,

    /// Text opacity (0.0 - 1.0)
    #[arg(long)]
    opacity: Option<f32>,

    /// top-left, top-right, bottom-left or bottom-right
    #[arg(long)]
    position: Option<WatermarkPosition>,

    /// Inset from the anchor edges in pixels
    #[arg(long)]
    margin: Option<u32>,

    /// Overlay width as a fraction of the image width
    #[arg(long)]
    scale: Option<f32>,
}

impl Args {
    fn watermark_overrides(&self) -> WatermarkOptions {
        WatermarkOptions {
            kind: self.kind,
            text: self.text.clone(),
            image_path: self.image_path.clone(),
            font_size: self.font_size,
            font_color: self.font_color.clone(),
            opacity: self.opacity,
            position: self.position,
            margin: self.margin,
            scale: self.scale,
        }
    }
}

/// Schema registry for standalone runs: there is no host to receive the
/// type definitions, so they are only logged.
struct LoggingSchemaRegistry;

impl SchemaRegistry for LoggingSchemaRegistry {
    fn create_types(&mut self, type_defs: &str) {
        tracing::debug!(type_defs = %type_defs, "Schema types registered");
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    config = config.with_overrides(&args.watermark_overrides());
    if let Some(prefix) = &args.output_prefix {
        config.output.prefix = prefix.clone();
    }
    if args.json_logs {
        config.logging.format = LogFormat::Json;
    }

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(&args)?;

    watermarker::logging::init_from_config(&config.logging)
        .context("Failed to initialize logging subsystem")?;

    let settings = config.settings();
    tracing::info!(
        config_file = ?args.config,
        kind = %settings.kind,
        position = %settings.position,
        inputs = args.inputs.len(),
        "Configuration loaded successfully"
    );

    register_schema(&mut LoggingSchemaRegistry);

    let discovery = DiscoveryOptions {
        recursive: args.recursive,
        skip_prefix: Some(config.output.prefix.clone()),
    };
    let sources = match discover(&args.inputs, &discovery).await {
        Ok(sources) => sources,
        Err(e) => {
            tracing::error!(error = %e, "Aborting watermark batch");
            std::process::exit(1);
        }
    };

    let mut registry = InMemoryRegistry::new();
    let registered = register_sources(&mut registry, &sources);
    tracing::info!(
        files = sources.len(),
        images = registered,
        "Registered images for watermarking"
    );

    let processor = WatermarkProcessor::new(settings)?;
    let runner = BatchRunner::new(processor).with_output_prefix(config.output.prefix.clone());

    let report = match runner.run(&registry).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Aborting watermark batch");
            std::process::exit(1);
        }
    };

    if args.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

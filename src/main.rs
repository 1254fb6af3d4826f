//! Binary entrypoint: discover a property's photos and print the gallery manifest.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use property_gallery::config::Configuration;
use property_gallery::{check, gallery};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "property-gallery",
    about = "Discover property photos on static hosting"
)]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE", default_value = "gallery.yaml")]
    config: PathBuf,

    /// Override the configured property code
    #[arg(long, value_name = "CODE")]
    property_code: Option<String>,

    /// Override the directory probed for images
    #[arg(long, value_name = "DIR")]
    base_dir: Option<String>,

    /// Manifest output format
    #[arg(long, value_enum, default_value_t = Format::Yaml)]
    format: Format,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("property_gallery={level}").parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?);
    // Logs go to stderr; stdout carries the manifest.
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut cfg = Configuration::from_yaml_file(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(code) = cli.property_code {
        cfg.property_code = Some(code);
    }
    if let Some(dir) = cli.base_dir {
        cfg.base_dir = Some(dir);
    }
    let cfg = cfg.validated().context("validating configuration")?;

    let checker = check::from_source(&cfg.source).context("building image source")?;
    let Some(gallery) = gallery::discover_gallery(&cfg, &*checker).await else {
        return Ok(());
    };
    info!(count = gallery.len(), source = ?gallery.source, "gallery resolved");

    let manifest = gallery.manifest(cfg.slideshow.interval);
    let rendered = match cli.format {
        Format::Yaml => serde_yaml::to_string(&manifest)?,
        Format::Json => serde_json::to_string_pretty(&manifest)? + "\n",
    };
    std::io::stdout()
        .lock()
        .write_all(rendered.as_bytes())
        .context("writing manifest")?;
    Ok(())
}

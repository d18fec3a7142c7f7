use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use rehla_api_client::ApiClient;
use rehla_cli::presets::transforms_for;
use rehla_core::config::AdminConfig;
use rehla_export::ExportTransformer;

#[derive(Parser, Debug)]
#[command(name = "export_csv")]
#[command(about = "Download a resource export and apply its column preset")]
struct Args {
    /// Resource to export: providers, customers, bookings, ...
    resource: String,

    /// Output file path
    #[arg(long, value_name = "FILE")]
    output: PathBuf,

    /// Skip the column preset and write the raw export (BOM still added)
    #[arg(long)]
    raw: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = AdminConfig::from_env()?;
    let client = ApiClient::from_config(&config)?;

    tracing::info!(resource = %args.resource, "downloading export");
    let raw_csv = client.download_export(&args.resource).await?;

    let transformer = if args.raw {
        ExportTransformer::identity()
    } else {
        match transforms_for(&args.resource) {
            Some(transforms) => ExportTransformer::new(transforms),
            None => {
                tracing::warn!(resource = %args.resource, "no preset, writing raw export");
                ExportTransformer::identity()
            }
        }
    };

    let output = transformer.apply(&raw_csv)?;
    fs::write(&args.output, &output)?;

    println!(
        "Wrote {} bytes to {}",
        output.len(),
        args.output.display()
    );
    Ok(())
}

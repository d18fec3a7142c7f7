use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use rehla_api_client::{ApiClient, HttpImageFetcher};
use rehla_cli::manifest::{build_items, load_manifest};
use rehla_core::config::AdminConfig;
use rehla_core::validation::validate_gallery;
use rehla_gallery::{materialize, plan_submission, ApiOrigin};

#[derive(Parser, Debug)]
#[command(name = "trip_gallery")]
#[command(about = "Submit a trip's photo gallery in the order given by a manifest")]
struct Args {
    /// Path to the gallery manifest (JSON)
    manifest: PathBuf,

    /// Plan only: print what would be kept and uploaded, submit nothing
    #[arg(long)]
    dry_run: bool,

    /// Output format: json or table (default: table)
    #[arg(long, default_value = "table")]
    format: String,
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

    let manifest = load_manifest(&args.manifest)?;
    let items = build_items(&manifest)?;
    validate_gallery(&items, &config)?;

    let origin = ApiOrigin::parse(client.base_url())?;
    let outline = plan_submission(&items, &manifest.baseline, &origin)?;

    if args.dry_run {
        match args.format.as_str() {
            "json" => {
                let refetch: Vec<String> = outline
                    .refetch_urls()
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                let summary = serde_json::json!({
                    "tripId": manifest.trip_id,
                    "kept": outline.kept,
                    "attachments": outline.slots.len(),
                    "refetch": refetch,
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            _ => {
                println!("Trip: {}", manifest.trip_id);
                println!("Kept ({}):", outline.kept.len());
                for url in &outline.kept {
                    println!("  {}", url);
                }
                println!("Attachments: {}", outline.slots.len());
                for url in outline.refetch_urls() {
                    println!("  re-upload {}", url);
                }
            }
        }
        return Ok(());
    }

    let fetcher = HttpImageFetcher::from_api_client(&client);
    let plan = materialize(outline, &fetcher).await?;

    tracing::info!(
        trip_id = %manifest.trip_id,
        kept = plan.kept.len(),
        uploads = plan.uploads.len(),
        "submitting gallery"
    );
    let trip = client.submit_trip_gallery(manifest.trip_id, &plan).await?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&trip)?),
        _ => {
            println!("Updated trip '{}'", trip.title);
            println!("Stored order:");
            for (i, url) in trip.images.iter().enumerate() {
                println!("  {}. {}", i + 1, url);
            }
        }
    }

    Ok(())
}

//! exercise-media - Exercise media resolution and caching

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use exercise_media::config::Settings;
use exercise_media::db::Database;
use exercise_media::exercises::ExerciseRecord;
use exercise_media::resolver::{MediaResolver, normalize};

#[derive(Parser)]
#[command(name = "exercise-media")]
#[command(author, version, about = "Resolve exercise names to instructional media")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one or more exercise names
    Resolve {
        /// Exercise names (e.g., "Barbell Row", "EZ-Bar Curl")
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List muscle names known to the lookup service
    Muscles,

    /// List category names known to the lookup service
    Categories,

    /// Show how many records the persistent cache holds
    Cached,
}

fn print_record(record: &ExerciseRecord) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let db = Database::open(&cli.settings.db_path)?;

    if let Commands::Cached = cli.command {
        println!("Cached records: {}", db.len()?);
        return Ok(());
    }

    let client = cli.settings.lookup_client()?;
    let resolver = MediaResolver::new(client, Arc::new(db), cli.settings.resolver_config());

    match cli.command {
        Commands::Resolve { names } if names.len() == 1 => match resolver.resolve(&names[0]).await {
            Ok(Some(record)) => print_record(&record)?,
            Ok(None) => println!("No media found for \"{}\"", names[0]),
            Err(e) => {
                eprintln!("Media lookup unavailable, try again later: {}", e);
                std::process::exit(2);
            }
        },

        Commands::Resolve { names } => {
            let found = resolver.resolve_many(&names).await;
            for name in &names {
                match found.get(&normalize(name)) {
                    Some(record) => print_record(record)?,
                    None => println!("No media found for \"{}\"", name),
                }
            }
        }

        Commands::Muscles => {
            for name in resolver.muscle_names().await? {
                println!("{}", name);
            }
        }

        Commands::Categories => {
            for name in resolver.category_names().await? {
                println!("{}", name);
            }
        }

        Commands::Cached => {}
    }

    resolver.flush_writes().await;

    let stats = resolver.cache_stats();
    tracing::info!(
        cached = stats.count,
        external_calls = stats.external_calls,
        failed_calls = stats.failed_calls,
        "Done"
    );

    Ok(())
}

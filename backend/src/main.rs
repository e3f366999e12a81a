//! Scoreline CLI - validate and serve sports match data
//!
//! # Main Commands
//!
//! ```bash
//! scoreline serve                  # Start HTTP server (port 3000)
//! scoreline check players.csv     # Validate a player import file offline
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! scoreline parse players.csv     # Tokenize CSV to JSON records
//! ```

use clap::{Parser, Subcommand};
use scoreline::parser::parse_players_file;
use scoreline::validation::validate_import_rows;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "scoreline")]
#[command(about = "Validate and store sports match, roster and event data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a player import CSV and output JSON records
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a player import CSV without writing anything
    Check {
        /// Input CSV file
        input: PathBuf,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),
        Commands::Check { input } => cmd_check(&input),
        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let table = parse_players_file(input)?;

    eprintln!("   Columns: {}", table.headers.join(", "));
    eprintln!("✅ Parsed {} records", table.records.len());

    for error in &table.row_errors {
        eprintln!("   ⚠️  {}", error);
    }

    let json = serde_json::to_string_pretty(&table.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_check(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Checking: {}", input.display());

    let table = parse_players_file(input)?;

    if !table.row_errors.is_empty() {
        for error in &table.row_errors {
            eprintln!("   - {}", error);
        }
        return Err("Failed to parse CSV.".into());
    }

    if table.records.is_empty() {
        return Err("No records found in CSV.".into());
    }

    match validate_import_rows(&table.records) {
        Ok(players) => {
            eprintln!("✅ All {} rows valid", players.len());
            Ok(())
        }
        Err(errors) => {
            for error in &errors {
                eprintln!("   - {}", error);
            }
            eprintln!("\n📊 {} of {} rows invalid", errors.len(), table.records.len());
            std::process::exit(1);
        }
    }
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scoreline=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    scoreline::server::start_server(port).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

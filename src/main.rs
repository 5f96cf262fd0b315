// src/main.rs
// =============================================================================
// Entry point of the wayfarer CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Dispatch to the subcommand handler
// 4. Exit with proper code (0 = crawl finished, even with no valid seeds; 2 = error)
//
// The crawl runs on a current-thread runtime: fetches overlap while waiting
// on the network, but all crawl state is touched from this one thread.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, CrawlArgs};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use wayfarer::{logging, HttpTransport, Scheduler, StorageManager};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl(args) => {
            logging::init_logging(args.verbose)?;
            handle_crawl(args).await
        }
        Commands::Clean { storage_dir } => {
            logging::init_logging(false)?;
            handle_clean(&storage_dir)
        }
    }
}

async fn handle_crawl(args: CrawlArgs) -> Result<i32> {
    let config = args.to_config()?;

    // Reset the storage root before any set or queue exists
    let mut storage = StorageManager::new(&config.storage_dir);
    storage
        .initialize()
        .with_context(|| format!("preparing {}", config.storage_dir.display()))?;

    let transport = Arc::new(HttpTransport::new()?);
    let mut scheduler = Scheduler::new(config, &storage, transport)?;

    if let Some(path) = &args.domains_file {
        subscribe_domains_file(&mut scheduler, path)?;
    }

    scheduler.add_nodes(&args.seeds)?;
    if scheduler.frontier_len() == 0 {
        // Nothing to crawl is a drained crawl: report the pruned seeds
        eprintln!("Warning: no valid seed URLs to crawl");
    }

    let stats = scheduler.run().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", stats);
    }

    Ok(0)
}

fn handle_clean(storage_dir: &Path) -> Result<i32> {
    let mut storage = StorageManager::new(storage_dir);
    storage.cleanup()?;
    println!("Removed {}", storage_dir.display());
    Ok(0)
}

// Appends each new hostname to `path`, one per line
fn subscribe_domains_file(scheduler: &mut Scheduler, path: &Path) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;

    scheduler.events.new_domain.subscribe(move |event| {
        writeln!(file, "{}", event.hostname)?;
        Ok(())
    });
    Ok(())
}

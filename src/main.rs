//! Neowatch - near-Earth asteroid feed with a local offline cache
//!
//! Fetches NASA's NeoWs asteroid feed and picture of the day into a local
//! cache and prints today/week/all views from that cache, so previously
//! fetched data stays available without a network round trip.

mod cache;
mod cli;
mod data;
mod sync;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cache::CacheStore;
use cli::{Cli, Command};
use data::{Asteroid, MediaType, NasaClient, PictureOfDay, ViewFilter};
use sync::SyncEngine;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "neowatch=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = match &cli.cache_dir {
        Some(dir) => CacheStore::with_dir(dir.clone()),
        None => match CacheStore::new() {
            Some(store) => store,
            None => {
                eprintln!("error: could not determine a cache directory; pass --cache-dir");
                return ExitCode::FAILURE;
            }
        },
    };
    let client = NasaClient::new(cli.resolve_api_key());
    let engine = SyncEngine::new(client, store);

    let result = match cli.command {
        Some(Command::Refresh) => run_refresh(&engine).await,
        Some(Command::Picture) => run_picture(&engine),
        Some(Command::Prune) => run_prune(&engine),
        Some(Command::Today) => run_view(&engine, ViewFilter::Today),
        Some(Command::Week) => run_view(&engine, ViewFilter::Week),
        Some(Command::All) => run_view(&engine, ViewFilter::All),
        // No subcommand: refresh both feeds, then show the week ahead.
        // A refresh failure still prints whatever the cache already holds.
        None => {
            let refreshed = run_refresh(&engine).await;
            run_view(&engine, ViewFilter::Week).and(refreshed)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}

/// Refreshes both feeds concurrently and reports per-feed outcomes
///
/// A single feed failure is reported but does not stop the other; any
/// failure makes the command exit non-zero while cached data stays intact.
async fn run_refresh(engine: &SyncEngine) -> Result<(), ExitCode> {
    let (asteroids, picture) =
        futures::join!(engine.refresh_asteroids(), engine.refresh_picture());

    let mut failed = false;
    match asteroids {
        Ok(count) => println!("Fetched {count} asteroid records for the week ahead"),
        Err(e) => {
            eprintln!("warning: asteroid refresh failed: {e}");
            failed = true;
        }
    }
    match picture {
        Ok(p) => println!("Fetched picture of the day ({})", p.date),
        Err(e) => {
            eprintln!("warning: picture refresh failed: {e}");
            failed = true;
        }
    }

    if failed {
        Err(ExitCode::FAILURE)
    } else {
        Ok(())
    }
}

/// Prints a cached view without touching the network
fn run_view(engine: &SyncEngine, filter: ViewFilter) -> Result<(), ExitCode> {
    match engine.query(filter) {
        Ok(asteroids) if asteroids.is_empty() => {
            println!("No cached asteroids for this view. Run `neowatch refresh` first.");
            Ok(())
        }
        Ok(asteroids) => {
            print_asteroid_table(&asteroids);
            Ok(())
        }
        Err(e) => {
            eprintln!("error: could not read cache: {e}");
            Err(ExitCode::FAILURE)
        }
    }
}

/// Prints the cached picture of the day
fn run_picture(engine: &SyncEngine) -> Result<(), ExitCode> {
    match engine.current_picture() {
        Ok(Some(picture)) => {
            print_picture(&picture);
            Ok(())
        }
        Ok(None) => {
            println!("No cached picture of the day. Run `neowatch refresh` first.");
            Ok(())
        }
        Err(e) => {
            eprintln!("error: could not read cache: {e}");
            Err(ExitCode::FAILURE)
        }
    }
}

/// Runs the maintenance sweep deleting records older than yesterday
fn run_prune(engine: &SyncEngine) -> Result<(), ExitCode> {
    match engine.prune_stale() {
        Ok(removed) => {
            println!("Pruned {removed} stale record(s)");
            Ok(())
        }
        Err(e) => {
            eprintln!("error: prune failed: {e}");
            Err(ExitCode::FAILURE)
        }
    }
}

/// Renders asteroid records as a fixed-width table
fn print_asteroid_table(asteroids: &[Asteroid]) {
    println!(
        "{:<12} {:<10} {:<24} {:>6} {:>10} {:>10} {:>10}  {}",
        "DATE", "ID", "NAME", "MAG", "DIAM KM", "KM/S", "DIST AU", "HAZARD"
    );
    for a in asteroids {
        println!(
            "{:<12} {:<10} {:<24} {:>6.1} {:>10.4} {:>10.2} {:>10.4}  {}",
            a.close_approach_date.to_string(),
            a.id,
            truncate(&a.codename, 24),
            a.absolute_magnitude,
            a.estimated_diameter_km,
            a.relative_velocity_km_s,
            a.distance_from_earth_au,
            if a.is_hazardous { "!" } else { "-" }
        );
    }
    println!("{} record(s)", asteroids.len());
}

/// Renders the picture-of-the-day metadata
fn print_picture(picture: &PictureOfDay) {
    if let Some(title) = &picture.title {
        println!("{title} ({})", picture.date);
    } else {
        println!("Picture of the day ({})", picture.date);
    }
    let kind = match picture.media_type {
        MediaType::Image => "image",
        MediaType::Video => "video",
    };
    println!("{kind}: {}", picture.url);
}

/// Truncates a name so table columns stay aligned
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{config, tmdb::TmdbCatalog, FetchController, ViewModel};

#[derive(Parser, Debug)]
struct Args {
    /// Optional search query; without it only the popular titles are listed.
    #[arg(long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let settings = config::load_settings();
    let catalog = Arc::new(TmdbCatalog::new(&settings)?);
    let controller = FetchController::new(catalog);

    controller.load_initial().await;
    print_view("Popular movies", &controller.snapshot().await);

    if let Some(query) = args.query {
        controller.search(&query).await;
        print_view(
            &format!("Results for '{}'", query.trim()),
            &controller.snapshot().await,
        );
    }

    Ok(())
}

fn print_view(heading: &str, view: &ViewModel) {
    println!("{heading}:");
    if let Some(message) = &view.error_message {
        println!("  {message}");
        return;
    }
    if view.items.is_empty() {
        println!("  (no results)");
        return;
    }
    for movie in &view.items {
        match movie.release_year() {
            Some(year) => println!("  [{}] {} ({year})", movie.id.0, movie.title),
            None => println!("  [{}] {}", movie.id.0, movie.title),
        }
    }
}

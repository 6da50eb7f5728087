use anyhow::{Context, Result};
use catalog::Catalog;
use clap::{Parser, Subcommand};
use colored::Colorize;
use server::RecommendationService;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tmdb_client::PosterClient;

/// CineMatch - Similarity-based movie recommendations
#[derive(Parser)]
#[command(name = "cine-match")]
#[command(about = "Movie recommendations from a precomputed similarity matrix", long_about = None)]
struct Cli {
    /// Path to the directory holding movies.json and similarity.json
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every title in the catalog
    Titles,

    /// Get the movies most similar to a title
    Recommend {
        /// Exact catalog title to match (case-sensitive)
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        limit: usize,

        /// Skip poster resolution (no network calls)
        #[arg(long)]
        no_posters: bool,
    },

    /// Show a poster gallery of the first catalog movies
    Gallery {
        /// Number of gallery entries (capped at 10)
        #[arg(long, default_value = "10")]
        count: usize,
    },
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

    let cli = Cli::parse();

    // Startup integrity failures are fatal: refuse to serve recommendations
    // against inconsistent artifacts
    println!("Loading catalog from {}...", cli.data_dir.display());
    let start = Instant::now();
    let catalog = Arc::new(
        Catalog::load_from_files(&cli.data_dir)
            .context("Failed to load catalog artifacts")?,
    );
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );

    let service = RecommendationService::new(catalog, PosterClient::new());

    match cli.command {
        Commands::Titles => handle_titles(&service),
        Commands::Recommend {
            title,
            limit,
            no_posters,
        } => handle_recommend(&service, &title, limit, no_posters).await?,
        Commands::Gallery { count } => handle_gallery(&service, count).await,
    }

    Ok(())
}

/// Handle the 'titles' command
fn handle_titles(service: &RecommendationService) {
    println!("{}", "Catalog titles:".bold().blue());
    for (i, title) in service.titles().iter().enumerate() {
        println!("{:>5}. {}", i + 1, title);
    }
}

/// Handle the 'recommend' command
async fn handle_recommend(
    service: &RecommendationService,
    title: &str,
    limit: usize,
    no_posters: bool,
) -> Result<()> {
    if no_posters {
        let results = service.recommend_titles(title, limit)?;
        println!(
            "{}",
            format!("Movies similar to '{}':", title).bold().blue()
        );
        for (rank, movie) in results.iter().enumerate() {
            println!(
                "{}. {} (score: {:.3})",
                (rank + 1).to_string().green(),
                movie.title,
                movie.score
            );
        }
        return Ok(());
    }

    let results = service.recommend(title, limit).await?;
    println!(
        "{}",
        format!("Movies similar to '{}':", title).bold().blue()
    );
    for (rank, rec) in results.iter().enumerate() {
        println!(
            "{}. {} (score: {:.3})",
            (rank + 1).to_string().green(),
            rec.title.bold(),
            rec.score
        );
        println!("   Poster: {}", rec.poster_url);
        println!("   Details: {}", rec.detail_url.cyan());
    }
    Ok(())
}

/// Handle the 'gallery' command
async fn handle_gallery(service: &RecommendationService, count: usize) {
    println!("{}", "Movie poster gallery:".bold().blue());
    for entry in service.gallery(count).await {
        println!("{} {}", "•".green(), entry.title.bold());
        println!("  {}", entry.poster_url);
    }
}

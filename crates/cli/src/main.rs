use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::ItemId;
use pipeline::{BuildConfig, DEFAULT_TOP_LANGUAGES};
use rand::Rng;
use server::{CatalogSnapshot, MovieRecommendation, RecommendationOrchestrator, SnapshotCache};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// movie-match - Content-based movie recommender
#[derive(Parser)]
#[command(name = "movie-match")]
#[command(about = "Recommend movies similar to the ones you like, by genre, runtime and language", long_about = None)]
struct Cli {
    /// Path to the movie metadata CSV
    #[arg(short, long, default_value = "data/movies_metadata.csv")]
    data_path: PathBuf,

    /// Number of most frequent languages that get their own feature column
    #[arg(long, default_value_t = DEFAULT_TOP_LANGUAGES)]
    top_languages: usize,

    /// Maximum number of liked movies per request
    #[arg(long, default_value = "5")]
    max_selected: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get recommendations for a set of liked movies
    Recommend {
        /// Liked movie id (repeatable, or comma-separated)
        #[arg(long = "liked-id", value_delimiter = ',')]
        liked_ids: Vec<ItemId>,

        /// Liked movie title, exact match (repeatable)
        #[arg(long = "liked-title")]
        liked_titles: Vec<String>,

        /// Number of recommendations to return
        #[arg(long, default_value = "15")]
        limit: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Show the built feature space and ingest statistics
    Info,

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of recommendations per request
        #[arg(long, default_value = "15")]
        limit: usize,
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

    // Build the snapshot (this may take a moment on the full corpus)
    println!("Loading movie catalog from {}...", cli.data_path.display());
    let start = Instant::now();
    let cache = SnapshotCache::new(BuildConfig {
        top_languages: cli.top_languages,
    });
    let snapshot = cache
        .get_or_load(&cli.data_path)
        .context("Failed to build the catalog snapshot")?;
    println!(
        "{} Built {} x {} feature matrix in {:?}",
        "✓".green(),
        snapshot.matrix().len(),
        snapshot.matrix().dim(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            liked_ids,
            liked_titles,
            limit,
            json,
        } => {
            let liked = resolve_selection(&snapshot, &liked_ids, &liked_titles, cli.max_selected)?;
            handle_recommend(snapshot, liked, limit, json).await?
        }
        Commands::Search { title } => handle_search(&snapshot, &title),
        Commands::Info => handle_info(&snapshot),
        Commands::Benchmark { requests, limit } => {
            handle_benchmark(snapshot, requests, limit, cli.max_selected).await?
        }
    }

    Ok(())
}

/// Turn ids and titles from the command line into the liked selection.
///
/// Unknown entries and duplicates are skipped with a warning; going over
/// `max_selected` is an error.
fn resolve_selection(
    snapshot: &CatalogSnapshot,
    liked_ids: &[ItemId],
    liked_titles: &[String],
    max_selected: usize,
) -> Result<Vec<ItemId>> {
    let index = snapshot.index();
    let mut selection = Vec::new();
    let mut seen = HashSet::new();

    let from_titles = liked_titles.iter().filter_map(|title| {
        let id = index.id_of(title);
        if id.is_none() {
            warn!("Unknown title '{}', skipping", title);
        }
        id
    });

    for id in liked_ids.iter().copied().chain(from_titles) {
        if index.title_of(id).is_none() {
            warn!("Unknown movie id {}, skipping", id);
            continue;
        }
        if !seen.insert(id) {
            warn!("Movie {} selected more than once", id);
            continue;
        }
        selection.push(id);
    }

    if selection.len() > max_selected {
        bail!(
            "Selected {} movies, at most {} are allowed",
            selection.len(),
            max_selected
        );
    }
    Ok(selection)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    snapshot: Arc<CatalogSnapshot>,
    liked: Vec<ItemId>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let orchestrator = RecommendationOrchestrator::new(Arc::clone(&snapshot));
    let recommendations = orchestrator.get_recommendations(&liked, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    if liked.is_empty() {
        println!("{}", "No known movies selected; pick at least one.".yellow());
        return Ok(());
    }

    println!("{}", "Because you liked:".bold().blue());
    for id in &liked {
        if let Some(title) = snapshot.index().title_of(*id) {
            println!("  {} {}", "•".green(), title);
        }
    }
    println!();
    print_recommendations(&recommendations);
    Ok(())
}

/// Handle the 'search' command
fn handle_search(snapshot: &CatalogSnapshot, title: &str) {
    let index = snapshot.index();
    let query = title.to_lowercase();

    // Titles are already sorted, so each tier stays alphabetical
    let mut exact = Vec::new();
    let mut partial = Vec::new();
    for candidate in index.titles() {
        let lower = candidate.to_lowercase();
        if lower == query {
            exact.push(candidate);
        } else if lower.contains(&query) {
            partial.push(candidate);
        }
    }

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if exact.is_empty() && partial.is_empty() {
        println!("  no matches");
        return;
    }
    for candidate in exact.into_iter().chain(partial).take(20) {
        let Some(id) = index.id_of(candidate) else {
            continue;
        };
        let genres = snapshot
            .details(id)
            .map(|d| d.genre_names.join(", "))
            .unwrap_or_default();
        println!("{}: {} [{}]", id.to_string().green(), candidate, genres);
    }
}

/// Handle the 'info' command
fn handle_info(snapshot: &CatalogSnapshot) {
    let stats = snapshot.catalog().stats();
    let matrix = snapshot.matrix();

    println!("{}", "Catalog".bold().blue());
    println!("{}Corpus version: {}", "• ".green(), snapshot.version());
    println!("{}Rows read: {}", "• ".green(), stats.rows_read);
    println!("{}Kept: {}", "• ".green(), stats.kept());
    println!("{}Dropped (invalid id): {}", "• ".green(), stats.dropped_invalid_id);
    println!("{}Dropped (duplicate id): {}", "• ".green(), stats.dropped_duplicate_id);
    println!("{}Dropped (missing title): {}", "• ".green(), stats.dropped_missing_title);
    println!("{}Unparsable genres: {}", "• ".cyan(), stats.unparsable_genres);
    println!("{}Missing runtime: {}", "• ".cyan(), stats.missing_runtime);

    println!("{}", "Feature space".bold().blue());
    println!(
        "{}Matrix: {} items x {} features (top {} languages)",
        "• ".green(),
        matrix.len(),
        matrix.dim(),
        snapshot.config().top_languages
    );
    for (column, range) in matrix
        .columns()
        .iter()
        .zip(snapshot.features().scaling().ranges())
    {
        println!("  {:<24} [{}, {}]", column, range.min, range.max);
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    snapshot: Arc<CatalogSnapshot>,
    requests: usize,
    limit: usize,
    max_selected: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("Benchmark needs at least one request");
    }
    let ids = snapshot.matrix().ids().to_vec();
    if ids.is_empty() {
        bail!("Catalog is empty, nothing to benchmark");
    }

    let orchestrator = RecommendationOrchestrator::new(snapshot);

    // Random selections of 1..=max_selected liked movies
    let selections: Vec<Vec<ItemId>> = {
        let mut rng = rand::rng();
        (0..requests)
            .map(|_| {
                let count = rng.random_range(1..=max_selected.max(1));
                (0..count)
                    .map(|_| ids[rng.random_range(0..ids.len())])
                    .collect()
            })
            .collect()
    };

    // Use tokio::spawn to make concurrent requests
    let wall_clock = Instant::now();
    let mut handles = vec![];
    for liked in selections {
        let orchestrator = orchestrator.clone();
        let handle = tokio::spawn(async move {
            let start = Instant::now();
            orchestrator.get_recommendations(&liked, limit).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }
    // Wait for all tasks to complete and collect timings
    let mut timings = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();

    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / (timings.len() as u32);
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p95 = timings[(timings.len() as f32 * 0.95) as usize];
    let p99 = timings[(timings.len() as f32 * 0.99) as usize];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[MovieRecommendation]) {
    println!("{}", "Movie Recommendations:".bold().blue());
    if recommendations.is_empty() {
        println!("  nothing to recommend");
        return;
    }
    for (rank, movie) in recommendations.iter().enumerate() {
        println!(
            "{}. {} [{}] - Score: {:.3}",
            (rank + 1).to_string().green(),
            movie.title.bold(),
            movie.genres.join(", "),
            movie.score
        );
        if !movie.overview.is_empty() {
            println!("   {}", truncate(&movie.overview, 160).dimmed());
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Catalog;
    use server::CorpusVersion;

    fn snapshot() -> CatalogSnapshot {
        let csv = "id,title,genres\n1,Heat,[]\n2,Up,[]\n3,Heat,[]\n4,Alien,[]\n";
        let catalog = Catalog::from_csv_bytes(csv.as_bytes(), "inline.csv").unwrap();
        CatalogSnapshot::build(CorpusVersion::named("t"), catalog, BuildConfig::default()).unwrap()
    }

    #[test]
    fn test_selection_resolves_titles_and_skips_unknowns() {
        let snapshot = snapshot();
        let titles = vec!["Heat".to_string(), "Nope".to_string()];
        let liked = resolve_selection(&snapshot, &[2, 99], &titles, 5).unwrap();
        assert_eq!(liked, vec![2, 1]);
    }

    #[test]
    fn test_selection_drops_duplicates() {
        let snapshot = snapshot();
        let liked = resolve_selection(&snapshot, &[1, 1], &["Heat".to_string()], 5).unwrap();
        assert_eq!(liked, vec![1]);
    }

    #[test]
    fn test_selection_cap() {
        let snapshot = snapshot();
        assert!(resolve_selection(&snapshot, &[1, 2, 4], &[], 2).is_err());
        assert_eq!(resolve_selection(&snapshot, &[1, 2], &[], 2).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 10), "héllo");
        assert_eq!(truncate("héllo", 2), "hé...");
    }
}

use data_loader::{Catalog, IdentifierIndex};
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_path = Path::new("data/movies_metadata.csv");

    println!("Loading movie catalog...\n");

    let start = Instant::now();
    let catalog = Catalog::load_from_file(data_path).expect("Failed to load catalog");
    let index = IdentifierIndex::build(&catalog);
    let elapsed = start.elapsed();

    let stats = catalog.stats();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Rows read: {}", stats.rows_read);
    println!("Records kept: {}", catalog.len());
    println!("Distinct titles: {}", index.titles().len());
    println!(
        "Dropped: {} invalid ids, {} duplicates, {} missing titles",
        stats.dropped_invalid_id, stats.dropped_duplicate_id, stats.dropped_missing_title
    );
    println!("\nPerformance: {:.0} rows/second",
             stats.rows_read as f64 / elapsed.as_secs_f64());
}

//! Statistics generation from the index database
//!
//! This module provides functionality for extracting and displaying
//! index statistics from the storage layer, and for printing the report of
//! a finished pipeline run.

use crate::pipeline::RunReport;
use crate::storage::Storage;
use crate::IndexError;

/// Index statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStatistics {
    /// URLs known to the store
    pub total_urls: u64,

    /// URLs whose page has been indexed
    pub indexed_urls: u64,

    /// Dictionary size
    pub total_words: u64,

    /// Words classified as native-script
    pub native_words: u64,

    /// Word occurrences in page bodies
    pub word_to_url: u64,

    /// Persisted link relations
    pub total_links: u64,

    /// Word occurrences in anchor texts
    pub word_to_link: u64,
}

impl IndexStatistics {
    /// Share of known URLs whose page has been indexed, in percent
    pub fn indexed_percentage(&self) -> f64 {
        percentage(self.indexed_urls, self.total_urls)
    }

    /// Share of dictionary words classified native-script, in percent
    pub fn native_percentage(&self) -> f64 {
        percentage(self.native_words, self.total_words)
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        (part as f64 / whole as f64) * 100.0
    } else {
        0.0
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(IndexStatistics)` - Successfully loaded statistics
/// * `Err(IndexError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<IndexStatistics, IndexError> {
    Ok(IndexStatistics {
        total_urls: storage.count_urls()?,
        indexed_urls: storage.count_indexed_urls()?,
        total_words: storage.count_words()?,
        native_words: storage.count_native_words()?,
        word_to_url: storage.count_word_to_url(None)?,
        total_links: storage.count_links()?,
        word_to_link: storage.count_word_to_link(None)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &IndexStatistics) {
    println!("=== Index Statistics ===\n");

    println!("URLs:");
    println!("  Known: {}", stats.total_urls);
    println!(
        "  Indexed: {} ({:.1}%)",
        stats.indexed_urls,
        stats.indexed_percentage()
    );
    println!();

    println!("Dictionary:");
    println!("  Words: {}", stats.total_words);
    println!(
        "  Native-script: {} ({:.1}%)",
        stats.native_words,
        stats.native_percentage()
    );
    println!();

    println!("Relations:");
    println!("  Word occurrences in pages: {}", stats.word_to_url);
    println!("  Links: {}", stats.total_links);
    println!("  Word occurrences in links: {}", stats.word_to_link);
}

/// Prints the totals of a pipeline run to stdout
pub fn print_run_report(report: &RunReport) {
    println!("=== Run Report ===\n");

    println!("Crawler:");
    println!("  Pages crawled: {}", report.crawl.pages_crawled);
    println!("  Fetch failures: {}", report.crawl.fetch_failures);
    println!("  Links queued: {}", report.crawl.links_queued);
    println!("  Anchors skipped: {}", report.crawl.anchors_skipped);
    println!();

    println!("Indexers:");
    println!(
        "  Pages indexed: {} ({} already indexed)",
        report.pages.indexed, report.pages.skipped
    );
    println!(
        "  Links indexed: {} ({} already indexed)",
        report.links.indexed, report.links.skipped
    );
    println!();

    if !report.is_clean() {
        println!("Task failures: {}", report.task_failures);
    }
    println!("Elapsed: {:.1}s", report.elapsed.as_secs_f64());
}

use serde::Deserialize;

/// Main configuration structure for Sumi-Index
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub indexer: IndexerConfig,
    #[serde(default)]
    pub queues: QueueConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the frontier is pre-loaded with
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Total request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout", default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Indexer worker pool sizes
#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    /// Number of page-indexer workers
    #[serde(rename = "page-workers", default = "default_page_workers")]
    pub page_workers: usize,

    /// Number of link-indexer workers
    #[serde(rename = "link-workers", default = "default_link_workers")]
    pub link_workers: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            page_workers: default_page_workers(),
            link_workers: default_link_workers(),
        }
    }
}

/// Distribution queue capacities
///
/// A missing capacity means the queue is unbounded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueConfig {
    #[serde(rename = "page-capacity")]
    pub page_capacity: Option<usize>,

    #[serde(rename = "link-capacity")]
    pub link_capacity: Option<usize>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_page_workers() -> usize {
    5
}

fn default_link_workers() -> usize {
    2
}

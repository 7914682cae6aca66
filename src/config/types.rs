use serde::Deserialize;

/// Main configuration structure for the harvester
///
/// Every section and key is optional; a missing file is the same as an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub site: SiteConfig,
    pub crawl: CrawlConfig,
    pub profile: ProfileConfig,
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Browser-identifying user agent sent on every request
    pub user_agent: String,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Total attempts per URL, including the first
    pub max_attempts: u32,

    /// Backoff unit; the n-th retry waits `n * base_backoff_ms`
    pub base_backoff_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/120.0 Safari/537.36"
                .to_string(),
            timeout_secs: 10,
            max_attempts: 3,
            base_backoff_ms: 3000,
        }
    }
}

/// Site-specific structure of the job board
///
/// Everything that couples the harvester to one site's markup lives here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Host (with port, if non-default) that job links must stay on
    pub host: String,

    /// Regex whose first capture group is the employer identifier
    pub employer_id_pattern: String,

    /// Regex a job-detail URL path must match
    pub job_path_pattern: String,

    /// CSS selector for one listing row
    pub listing_row_selector: String,

    /// Profile URL with an `{id}` placeholder
    pub profile_url_template: String,

    /// Anchor texts meaning "next page", tried in order
    pub next_page_phrases: Vec<String>,

    /// Anchor text on a job page that links to the employer profile
    pub company_link_phrase: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: "www.baitoru.com".to_string(),
            employer_id_pattern: r"(?i)/cjlist(\d+)/".to_string(),
            job_path_pattern: r"(?i)/job[0-9]+|/jobview/|/detail/".to_string(),
            listing_row_selector: "ul.ul01 li.li01".to_string(),
            profile_url_template: "https://www.baitoru.com/cjlist{id}/".to_string(),
            next_page_phrases: ["次へ", "次のページ", "次>", "Next", "›"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            company_link_phrase: "この会社の情報をもっと見る".to_string(),
        }
    }
}

/// Listing crawl bounds and pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// First listing page
    pub seed_url: String,

    /// Maximum number of listing pages to visit
    pub max_listing_pages: usize,

    /// Maximum number of job pages to visit across the whole run
    pub max_job_pages: usize,

    /// Lower bound of the randomized politeness delay (milliseconds)
    pub delay_min_ms: u64,

    /// Upper bound of the randomized politeness delay (milliseconds)
    pub delay_max_ms: u64,

    /// Where the employer URL table is written
    pub output_path: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seed_url: "https://www.baitoru.com/kanto/jlist/".to_string(),
            max_listing_pages: 3,
            max_job_pages: 50,
            delay_min_ms: 1000,
            delay_max_ms: 2000,
            output_path: "company_urls.csv".to_string(),
        }
    }
}

/// Profile-scrape batch settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProfileConfig {
    /// CSV file holding profile URLs
    pub input_path: String,

    /// Column of `input_path` holding the URLs
    pub url_column: String,

    /// Where the profile table is written
    pub output_path: String,

    /// Fixed pause after every profile URL (milliseconds)
    pub delay_ms: u64,

    /// Fallback selectors for the employer name, tried in order
    pub name_selectors: Vec<String>,

    /// Suffix removed from the analytics-provided name
    pub name_suffix: String,

    /// Text that identifies the analytics script block
    pub analytics_marker: String,

    /// Key inside the analytics payload holding the employer name
    pub analytics_name_key: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            input_path: "company_urls.csv".to_string(),
            url_column: "company_url".to_string(),
            output_path: "company_data.csv".to_string(),
            delay_ms: 1500,
            name_selectors: vec!["h1".to_string()],
            name_suffix: "のバイト/アルバイト/パートの求人情報".to_string(),
            analytics_marker: "var analyticsData".to_string(),
            analytics_name_key: "prop61".to_string(),
        }
    }
}

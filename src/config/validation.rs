use crate::config::types::{Config, CrawlConfig, FetcherConfig, ProfileConfig, SiteConfig};
use crate::extract::SiteRules;
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_site_config(&config.site)?;
    validate_crawl_config(&config.crawl)?;
    validate_profile_config(&config.profile)?;
    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    Ok(())
}

/// Compiling the rules is the validation: every regex and selector must parse
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    SiteRules::compile(config).map(|_| ())
}

fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_http_url("seed_url", &config.seed_url)?;

    if config.max_listing_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_listing_pages must be >= 1, got {}",
            config.max_listing_pages
        )));
    }

    if config.max_job_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_job_pages must be >= 1, got {}",
            config.max_job_pages
        )));
    }

    if config.delay_min_ms > config.delay_max_ms {
        return Err(ConfigError::Validation(format!(
            "delay_min_ms ({}) must not exceed delay_max_ms ({})",
            config.delay_min_ms, config.delay_max_ms
        )));
    }

    if config.output_path.is_empty() {
        return Err(ConfigError::Validation(
            "crawl output_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_profile_config(config: &ProfileConfig) -> Result<(), ConfigError> {
    if config.url_column.is_empty() {
        return Err(ConfigError::Validation(
            "url_column cannot be empty".to_string(),
        ));
    }

    if config.input_path.is_empty() || config.output_path.is_empty() {
        return Err(ConfigError::Validation(
            "profile input_path and output_path cannot be empty".to_string(),
        ));
    }

    for selector in &config.name_selectors {
        Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidPattern(format!("Invalid name selector '{}': {}", selector, e))
        })?;
    }

    if config.analytics_name_key.is_empty() {
        return Err(ConfigError::Validation(
            "analytics_name_key cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that a URL parses and uses an HTTP(S) scheme
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = Config::default();
        config.fetcher.max_attempts = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_crawl_bounds_and_delays() {
        let mut config = Config::default();
        config.crawl.max_job_pages = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.crawl.delay_min_ms = 3000;
        config.crawl.delay_max_ms = 1000;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_seed_url_must_be_http() {
        assert!(validate_http_url("seed_url", "https://example.com/").is_ok());
        assert!(validate_http_url("seed_url", "http://example.com/").is_ok());
        assert!(validate_http_url("seed_url", "ftp://example.com/").is_err());
        assert!(validate_http_url("seed_url", "not a url").is_err());
    }

    #[test]
    fn test_bad_regex_rejected() {
        let mut config = Config::default();
        config.site.employer_id_pattern = "(unclosed".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_bad_name_selector_rejected() {
        let mut config = Config::default();
        config.profile.name_selectors = vec!["h1[".to_string()];
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_template_needs_placeholder() {
        let mut config = Config::default();
        config.site.profile_url_template = "https://www.baitoru.com/cjlist/".to_string();
        assert!(validate(&config).is_err());
    }
}

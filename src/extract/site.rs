//! Compiled site rules
//!
//! Everything here is coupled to one job board's URL scheme and markup. The
//! anchor matchers in particular rely on visible link text, because the site
//! offers no stable structural marker for "next page" or "employer profile".
//! A copy change on the site breaks them; the extractors then return `None`
//! instead of failing.

use crate::config::SiteConfig;
use crate::ConfigError;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

const ID_PLACEHOLDER: &str = "{id}";

/// One way of recognising a navigational anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorMatcher {
    /// `rel` attribute contains the given token
    Rel(String),
    /// Visible text contains the given phrase
    TextContains(String),
}

impl AnchorMatcher {
    /// Returns true if the anchor satisfies this matcher
    pub fn matches(&self, anchor: &ElementRef) -> bool {
        match self {
            Self::Rel(token) => anchor
                .value()
                .attr("rel")
                .map(|rel| rel.split_ascii_whitespace().any(|t| t.eq_ignore_ascii_case(token)))
                .unwrap_or(false),
            Self::TextContains(phrase) => anchor.text().collect::<String>().contains(phrase.as_str()),
        }
    }
}

/// Site configuration with every pattern compiled
#[derive(Debug, Clone)]
pub struct SiteRules {
    host: String,
    employer_id: Regex,
    job_path: Regex,
    listing_row: Selector,
    anchors: Selector,
    profile_url_template: String,
    next_page: Vec<AnchorMatcher>,
    company_link: AnchorMatcher,
}

impl SiteRules {
    /// Compiles the site configuration
    ///
    /// # Returns
    ///
    /// * `Ok(SiteRules)` - All patterns compiled
    /// * `Err(ConfigError)` - A regex or selector is invalid, or the template lacks `{id}`
    pub fn compile(config: &SiteConfig) -> Result<Self, ConfigError> {
        if config.host.trim().is_empty() {
            return Err(ConfigError::Validation("site host cannot be empty".to_string()));
        }

        let employer_id = compile_regex("employer_id_pattern", &config.employer_id_pattern)?;
        if employer_id.captures_len() < 2 {
            return Err(ConfigError::InvalidPattern(format!(
                "employer_id_pattern '{}' needs a capture group for the identifier",
                config.employer_id_pattern
            )));
        }
        let job_path = compile_regex("job_path_pattern", &config.job_path_pattern)?;

        let listing_row = Selector::parse(&config.listing_row_selector).map_err(|e| {
            ConfigError::InvalidPattern(format!(
                "Invalid listing_row_selector '{}': {}",
                config.listing_row_selector, e
            ))
        })?;
        let anchors = Selector::parse("a[href]")
            .map_err(|e| ConfigError::InvalidPattern(format!("Invalid anchor selector: {}", e)))?;

        if !config.profile_url_template.contains(ID_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "profile_url_template '{}' must contain {}",
                config.profile_url_template, ID_PLACEHOLDER
            )));
        }
        Url::parse(&config.profile_url_template.replace(ID_PLACEHOLDER, "0")).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid profile_url_template '{}': {}",
                config.profile_url_template, e
            ))
        })?;

        if config.company_link_phrase.is_empty() {
            return Err(ConfigError::Validation(
                "company_link_phrase cannot be empty".to_string(),
            ));
        }

        // rel="next" outranks every text phrase
        let next_page = std::iter::once(AnchorMatcher::Rel("next".to_string()))
            .chain(
                config
                    .next_page_phrases
                    .iter()
                    .filter(|p| !p.is_empty())
                    .map(|p| AnchorMatcher::TextContains(p.clone())),
            )
            .collect();

        Ok(Self {
            host: config.host.trim().to_ascii_lowercase(),
            employer_id,
            job_path,
            listing_row,
            anchors,
            profile_url_template: config.profile_url_template.clone(),
            next_page,
            company_link: AnchorMatcher::TextContains(config.company_link_phrase.clone()),
        })
    }

    /// The host job links are pinned to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true if the URL's authority (host plus explicit port) is the site host
    pub fn host_matches(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => {
                let authority = match url.port() {
                    Some(port) => format!("{}:{}", host, port),
                    None => host.to_string(),
                };
                authority.eq_ignore_ascii_case(&self.host)
            }
            None => false,
        }
    }

    /// First employer identifier embedded in `text`, if any
    pub fn employer_id_in(&self, text: &str) -> Option<String> {
        self.employer_id
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Returns true if the path looks like a job-detail page
    pub fn is_job_path(&self, path: &str) -> bool {
        self.job_path.is_match(path)
    }

    /// Canonical profile URL for an identifier
    pub fn profile_url(&self, employer_id: &str) -> String {
        self.profile_url_template.replace(ID_PLACEHOLDER, employer_id)
    }

    pub fn listing_row(&self) -> &Selector {
        &self.listing_row
    }

    /// Selector for anchors carrying an href
    pub fn anchors(&self) -> &Selector {
        &self.anchors
    }

    /// Next-page matchers in priority order
    pub fn next_page_matchers(&self) -> &[AnchorMatcher] {
        &self.next_page
    }

    pub fn company_link_matcher(&self) -> &AnchorMatcher {
        &self.company_link
    }
}

fn compile_regex(field: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| {
        ConfigError::InvalidPattern(format!("Invalid {} '{}': {}", field, pattern, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn rules() -> SiteRules {
        SiteRules::compile(&SiteConfig::default()).unwrap()
    }

    fn first_anchor(html: &str) -> Html {
        Html::parse_fragment(html)
    }

    #[test]
    fn test_default_rules_compile() {
        let rules = rules();
        assert_eq!(rules.host(), "www.baitoru.com");
        assert_eq!(rules.next_page_matchers().len(), 6);
        assert_eq!(rules.next_page_matchers()[0], AnchorMatcher::Rel("next".to_string()));
    }

    #[test]
    fn test_employer_id_in() {
        let rules = rules();
        assert_eq!(rules.employer_id_in("/cjlist12345/"), Some("12345".to_string()));
        assert_eq!(
            rules.employer_id_in("https://www.baitoru.com/CJLIST77/#comp"),
            Some("77".to_string())
        );
        assert_eq!(rules.employer_id_in("/cjlist12345"), None);
        assert_eq!(rules.employer_id_in("/jlist/"), None);
    }

    #[test]
    fn test_profile_url() {
        assert_eq!(rules().profile_url("42"), "https://www.baitoru.com/cjlist42/");
    }

    #[test]
    fn test_host_matches_includes_port() {
        let mut config = SiteConfig::default();
        config.host = "127.0.0.1:8080".to_string();
        let rules = SiteRules::compile(&config).unwrap();

        assert!(rules.host_matches(&Url::parse("http://127.0.0.1:8080/job1/").unwrap()));
        assert!(!rules.host_matches(&Url::parse("http://127.0.0.1:9090/job1/").unwrap()));
        assert!(!rules.host_matches(&Url::parse("http://127.0.0.1/job1/").unwrap()));
    }

    #[test]
    fn test_host_matches_rejects_hostless() {
        let rules = rules();
        assert!(rules.host_matches(&Url::parse("https://WWW.BAITORU.COM/x").unwrap()));
        assert!(!rules.host_matches(&Url::parse("mailto:someone@www.baitoru.com").unwrap()));
    }

    #[test]
    fn test_anchor_matchers() {
        let doc = first_anchor(r#"<a href="/p2" rel="prev next">次へ &gt;</a>"#);
        let rules = rules();
        let anchor = doc.select(rules.anchors()).next().unwrap();

        assert!(AnchorMatcher::Rel("next".to_string()).matches(&anchor));
        assert!(AnchorMatcher::TextContains("次へ".to_string()).matches(&anchor));
        assert!(!AnchorMatcher::TextContains("Next".to_string()).matches(&anchor));
    }

    #[test]
    fn test_id_pattern_without_group_rejected() {
        let mut config = SiteConfig::default();
        config.employer_id_pattern = r"/cjlist\d+/".to_string();
        assert!(matches!(
            SiteRules::compile(&config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }
}

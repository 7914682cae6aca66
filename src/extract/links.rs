//! Link extraction for listing and job-detail pages
//!
//! All functions are pure over an already parsed document. Nothing here
//! fetches; a miss is `None` or an empty set.

use crate::extract::site::SiteRules;
use scraper::{ElementRef, Html};
use std::collections::BTreeSet;
use url::Url;

/// Collects every employer identifier referenced by an anchor on the page
///
/// The raw href is tried first; when it does not match, the href is resolved
/// against `base_url` and its path is tried instead, which catches relative
/// and dot-segment forms.
pub fn extract_employer_ids(document: &Html, base_url: &Url, rules: &SiteRules) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();

    for anchor in document.select(rules.anchors()) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let id = rules.employer_id_in(href).or_else(|| {
            base_url
                .join(href.trim())
                .ok()
                .and_then(|resolved| rules.employer_id_in(resolved.path()))
        });

        if let Some(id) = id {
            ids.insert(id);
        }
    }

    ids
}

/// Collects job-detail URLs from the listing rows of a listing page
///
/// Three filters apply in order, each disqualifying on its own:
/// 1. the anchor must be the first linked anchor inside a listing row
/// 2. the resolved URL must be on the site host
/// 3. the resolved path must look like a job-detail page
pub fn extract_job_links(document: &Html, base_url: &Url, rules: &SiteRules) -> BTreeSet<Url> {
    let mut links = BTreeSet::new();

    for row in document.select(rules.listing_row()) {
        let Some(href) = row
            .select(rules.anchors())
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };

        let Ok(absolute) = base_url.join(href.trim()) else {
            continue;
        };

        if !rules.host_matches(&absolute) {
            continue;
        }

        if !rules.is_job_path(absolute.path()) {
            continue;
        }

        links.insert(absolute);
    }

    links
}

/// Finds the URL of the next listing page
///
/// Matchers are tried in priority order (`rel="next"` first, then each "next"
/// phrase). For each matcher only the first matching anchor is considered; if
/// its href is unusable the next matcher is tried.
pub fn extract_next_page_url(document: &Html, base_url: &Url, rules: &SiteRules) -> Option<Url> {
    rules.next_page_matchers().iter().find_map(|matcher| {
        document
            .select(rules.anchors())
            .find(|a| matcher.matches(a))
            .and_then(|a| resolve_navigation_href(&a, base_url))
    })
}

/// Finds the employer profile linked from a job-detail page
///
/// The anchor is recognised by its text alone. The result keeps scheme, host
/// and path; query and fragment are dropped so that `/cjlist1/#comp` and
/// `/cjlist1/` map to the same profile.
pub fn extract_company_url_from_job_page(
    document: &Html,
    job_url: &Url,
    rules: &SiteRules,
) -> Option<Url> {
    let anchor = document
        .select(rules.anchors())
        .find(|a| rules.company_link_matcher().matches(a))?;

    let href = anchor.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }

    let mut company_url = job_url.join(href).ok()?;
    company_url.set_query(None);
    company_url.set_fragment(None);
    Some(company_url)
}

/// Resolves an anchor href, rejecting empty and `javascript:` values
fn resolve_navigation_href(anchor: &ElementRef, base_url: &Url) -> Option<Url> {
    let href = anchor.value().attr("href")?.trim();
    if !is_valid_href(href) {
        return None;
    }
    base_url.join(href).ok()
}

fn is_valid_href(href: &str) -> bool {
    !href.is_empty() && !href.to_ascii_lowercase().starts_with("javascript:")
}

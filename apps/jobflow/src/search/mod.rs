//! Job Source: discovers postings for a topic and location on known job portals.
//!
//! Best-effort by contract: when the backend fails or returns nothing usable,
//! `find_postings` returns the single placeholder posting instead of an empty list,
//! and logs why. Downstream stages always have at least one item.

pub mod serper;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{info, warn};

use crate::errors::PipelineError;
use crate::models::JobPosting;
use crate::search::serper::{SearchHit, SerperClient};

/// Domains the query is scoped to.
pub const JOB_PORTAL_DOMAINS: &[&str] = &["linkedin.com", "naukri.com", "indeed.co.in"];

/// Trailing " | X" / " - X" segments portals append to page titles.
const PORTAL_TITLE_SUFFIXES: &[&str] = &[
    "linkedin",
    "naukri",
    "naukri.com",
    "indeed",
    "indeed.com",
    "indeed.co.in",
    "glassdoor",
];

/// Stage contract for RESEARCH.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn find_postings(
        &self,
        topic: &str,
        location: &str,
    ) -> Result<Vec<JobPosting>, PipelineError>;
}

/// Builds the portal-scoped free-text query sent to the search backend.
pub fn build_query(topic: &str, location: &str) -> String {
    let sites = JOB_PORTAL_DOMAINS
        .iter()
        .map(|d| format!("site:{d}"))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("{} jobs in {} {}", topic.trim(), location.trim(), sites)
}

/// `JobSource` backed by the Serper search API.
pub struct PortalJobSource {
    client: SerperClient,
}

impl PortalJobSource {
    pub fn new(client: SerperClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobSource for PortalJobSource {
    async fn find_postings(
        &self,
        topic: &str,
        location: &str,
    ) -> Result<Vec<JobPosting>, PipelineError> {
        if topic.trim().is_empty() {
            return Err(PipelineError::InputValidation(
                "topic cannot be empty".to_string(),
            ));
        }
        if location.trim().is_empty() {
            return Err(PipelineError::InputValidation(
                "location cannot be empty".to_string(),
            ));
        }

        let query = build_query(topic, location);
        info!("Searching job portals: {query}");

        let postings = match self.client.search(&query).await {
            Ok(hits) => normalize_hits(&hits),
            Err(e) => {
                warn!("Search backend failed, using placeholder posting: {e}");
                return Ok(vec![JobPosting::placeholder()]);
            }
        };

        if postings.is_empty() {
            warn!("Search returned no usable postings, using placeholder posting");
            return Ok(vec![JobPosting::placeholder()]);
        }

        info!("Found {} postings", postings.len());
        Ok(postings)
    }
}

/// Converts raw hits into postings, preserving ranking order and dropping unusable hits.
pub fn normalize_hits(hits: &[SearchHit]) -> Vec<JobPosting> {
    hits.iter().filter_map(normalize_hit).collect()
}

fn normalize_hit(hit: &SearchHit) -> Option<JobPosting> {
    let url = Url::parse(hit.link.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let (title, company) = split_title(&hit.title);
    if title.is_empty() {
        return None;
    }
    let company = company.unwrap_or_else(|| source_name(&url));

    let posting = JobPosting::new(title, company, url.as_str());
    Some(match &hit.snippet {
        Some(snippet) => posting.with_summary(snippet.trim()),
        None => posting,
    })
}

/// Splits a portal page title into (job title, company).
///
/// Handles "Acme hiring Engineer in City | LinkedIn", "Engineer - Acme - Naukri.com"
/// and "Engineer at Acme". Anything else keeps the whole title and no company.
fn split_title(raw: &str) -> (String, Option<String>) {
    let title = strip_portal_suffix(raw.trim());

    if let Some((company, rest)) = title.split_once(" hiring ") {
        let role = rest.split_once(" in ").map_or(rest, |(role, _)| role);
        return (role.trim().to_string(), non_empty(company));
    }

    if let Some((role, rest)) = title.split_once(" - ") {
        let company = rest.split_once(" - ").map_or(rest, |(company, _)| company);
        return (role.trim().to_string(), non_empty(company));
    }

    if let Some((role, company)) = title.rsplit_once(" at ") {
        return (role.trim().to_string(), non_empty(company));
    }

    (title.to_string(), None)
}

fn strip_portal_suffix(title: &str) -> &str {
    let cut = [" | ", " - "]
        .iter()
        .filter_map(|sep| title.rfind(sep).map(|idx| (idx, sep.len())))
        .max_by_key(|(idx, _)| *idx);

    match cut {
        Some((idx, sep_len)) => {
            let tail = title[idx + sep_len..].trim().to_lowercase();
            if PORTAL_TITLE_SUFFIXES.contains(&tail.as_str()) {
                title[..idx].trim_end()
            } else {
                title
            }
        }
        None => title,
    }
}

fn source_name(url: &Url) -> String {
    url.host_str()
        .map(|h| h.trim_start_matches("www.").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

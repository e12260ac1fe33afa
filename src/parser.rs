use chrono::{DateTime, Duration, Local, NaiveDateTime};
use quick_xml::de::from_str;
use reqwest::blocking::{Client, Request};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    config::SearchConfig,
    error::SearchError,
    model::PaperRecord
};

pub const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

/// Anything that can answer a search with the matching papers, newest first.
pub trait PaperSource {
    fn search(&self, config: &SearchConfig) -> Result<Vec<PaperRecord>, SearchError>;
}

#[derive(Debug)]
pub struct ArxivParser {
    client: Client,
    base_url: String
}

impl ArxivParser {
    pub fn new() -> Result<Self, SearchError> {
        Self::with_base_url(ARXIV_API_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, SearchError> {
        Ok(ArxivParser {
            client: Client::builder().build()?,
            base_url: base_url.to_string()
        })
    }

    fn create_request(&self, config: &SearchConfig) -> Result<Request, SearchError> {
        let query = build_query(config);
        let max_results = config.result_buffer_size.to_string();
        let request = self.client
            .get(self.base_url.as_str())
            .query(&[
                ("search_query", query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
            ])
            .build()?;
        Ok(request)
    }

    fn get_raw_xml(&self, config: &SearchConfig) -> Result<String, SearchError> {
        let request = self.create_request(config)?;
        debug!("requesting {}", request.url());
        let body = self.client
            .execute(request)?
            .error_for_status()?
            .text()?;
        Ok(body)
    }

    pub fn search_at(&self, config: &SearchConfig, now: NaiveDateTime) -> Result<Vec<PaperRecord>, SearchError> {
        let xml = self.get_raw_xml(config)?;
        let feed = parse_feed(&xml)?;
        info!("fetched {} entries", feed.entries.len());
        let records = collect_records(feed, config.days_back, now)?;
        info!("{} entries within the last {} days", records.len(), config.days_back);
        Ok(records)
    }
}

impl PaperSource for ArxivParser {
    fn search(&self, config: &SearchConfig) -> Result<Vec<PaperRecord>, SearchError> {
        self.search_at(config, Local::now().naive_local())
    }
}

// Query construction

fn keyword_clause(keyword: &str) -> String {
    format!("ti:\"{}\" OR abs:\"{}\"", keyword, keyword)
}

/// Builds the `search_query` expression. Empty keyword or category lists add no clause.
pub fn build_query(config: &SearchConfig) -> String {
    let mut query = format!("({})", keyword_clause(&config.primary_keyword));

    if !config.optional_keywords.is_empty() {
        let optional = config.optional_keywords.iter()
            .map(|kw| keyword_clause(kw))
            .collect::<Vec<_>>()
            .join(" OR ");
        query = format!("{} AND ({})", query, optional);
    }

    if !config.categories.is_empty() {
        let categories = config.categories.iter()
            .map(|cat| format!("cat:{}", cat))
            .collect::<Vec<_>>()
            .join(" OR ");
        query = format!("{} AND ({})", query, categories);
    }
    query
}

// end Query construction

// Date window

pub fn within_window(published: NaiveDateTime, days_back: u32, now: NaiveDateTime) -> bool {
    let start = now
        .checked_sub_signed(Duration::days(i64::from(days_back)))
        .unwrap_or(NaiveDateTime::MIN);
    start <= published && published <= now
}

fn collect_records(feed: ArxivFeed, days_back: u32, now: NaiveDateTime) -> Result<Vec<PaperRecord>, SearchError> {
    let mut records = Vec::new();
    for entry in feed.entries {
        if entry.is_error() {
            return Err(SearchError::Api(collapse_whitespace(&entry.summary)));
        }
        let published = match DateTime::parse_from_rfc3339(entry.published.trim()) {
            Ok(dt) => dt.naive_utc(),
            Err(e) => {
                warn!("skipping {}: bad published date {:?}: {}", entry.id, entry.published, e);
                continue;
            }
        };
        if within_window(published, days_back, now) {
            records.push(entry.into_record());
        }
    }
    Ok(records)
}

// end Date window

// Arxiv Raw XML Model

pub fn parse_feed(xml: &str) -> Result<ArxivFeed, SearchError> {
    Ok(from_str(xml)?)
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArxivFeed {
    #[serde(rename = "entry")]
    pub entries: Vec<ArxivEntry>
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArxivEntry {
    id: String,
    title: String,
    summary: String,
    published: String,
    #[serde(rename = "author")]
    authors: Vec<AuthorField>,
    #[serde(rename = "arxiv:primary_category", alias = "primary_category")]
    primary_category: Option<CategoryField>
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct AuthorField {
    name: String
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct CategoryField {
    #[serde(rename = "@term")]
    term: String
}

impl ArxivEntry {
    // the API reports query errors as a single entry under /api/errors.
    fn is_error(&self) -> bool {
        self.id.contains("/api/errors")
    }

    fn into_record(self) -> PaperRecord {
        let authors = self.authors.into_iter()
            .map(|a| collapse_whitespace(&a.name))
            .collect::<Vec<_>>();
        PaperRecord::new(
            collapse_whitespace(&self.title),
            &collapse_whitespace(&self.summary),
            self.id.trim().to_string(),
            &authors,
            self.primary_category.map(|c| c.term).unwrap_or_default()
        )
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// end Arxiv Raw XML Model

use jiff::civil::Date;
use log::debug;
use scraper::{Html, Selector};
use url::Url;

use crate::error::ImportError;

/// Anchors listed in the "downloadable EPG files" box of the program guide page.
pub const LINK_SELECTOR: &str = "div.downloadable_EPG_files_inner > ul > li > a";

/// A link to a (possibly) downloadable file, as found on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    /// The href, verbatim
    pub url: String,
    /// Last path segment of the href
    pub file_name: String,
}

impl CandidateLink {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            file_name: file_name(url).to_string(),
        }
    }
}

/// Last path segment of an href, ignoring any query or fragment.
pub fn file_name(href: &str) -> &str {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

/// Only Excel files are published as EPG.
pub fn is_spreadsheet(url: &str) -> bool {
    url.ends_with(".xlsx")
}

/// Files are relevant if they mention this year or next year, anywhere in the url.
#[derive(Debug, Clone)]
pub struct RecencyWindow {
    years: [String; 2],
}

impl RecencyWindow {
    pub fn new(today: Date) -> Self {
        let year = i32::from(today.year());
        Self {
            years: [year.to_string(), (year + 1).to_string()],
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.years.iter().any(|year| url.contains(year.as_str()))
    }
}

/// The parsed listing page.  Keeps the page url so relative links can be resolved.
pub struct ProgramGuidePage {
    pub url: Url,
    document: Html,
    selector: Selector,
}

impl ProgramGuidePage {
    /// Parse the raw markup.  Malformed HTML is accepted, and bytes that
    /// aren't UTF-8 (e.g. a Latin-1 page) are replaced, not rejected.
    pub fn parse(url: Url, body: &[u8]) -> Result<Self, ImportError> {
        let html = String::from_utf8_lossy(body);
        let selector = Selector::parse(LINK_SELECTOR)
            .map_err(|e| ImportError::parse(&url, format!("bad selector {}: {}", LINK_SELECTOR, e)))?;
        Ok(Self {
            url,
            document: Html::parse_document(&html),
            selector,
        })
    }

    /// The links in document order.  Anchors without an href, or with an
    /// href that has no file name, are skipped.
    pub fn links(&self) -> impl Iterator<Item = CandidateLink> + '_ {
        self.document
            .select(&self.selector)
            .filter_map(|e| {
                let href = e.value().attr("href");
                if href.is_none() {
                    debug!("skipping anchor without href: {}", e.html());
                }
                href
            })
            .map(|href| CandidateLink::new(href.trim()))
            .filter(|link| !link.file_name.is_empty())
    }

    /// Absolute url of a link on this page.
    pub fn resolve(&self, link: &CandidateLink) -> Result<Url, ImportError> {
        self.url
            .join(&link.url)
            .map_err(|e| ImportError::parse(&link.url, e))
    }
}

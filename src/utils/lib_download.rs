use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::OnceLock,
    time::Duration,
};

use log::debug;
use regex::Regex;
use reqwest::{
    blocking::Client,
    header::{HeaderName, CONTENT_TYPE, REFRESH},
};
use scraper::{Html, Selector};
use url::Url;

use crate::error::ImportError;

/// Same limit as a browser would use before giving up on a refresh loop.
pub const MAX_REFRESHES: usize = 20;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final url, after any HTTP redirects
    pub url: Url,
    pub content_type: Option<String>,
    /// Value of the `Refresh` header, if any
    pub refresh: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            Some(ct) => ct.to_ascii_lowercase().contains("html"),
            None => true,
        }
    }
}

/// A plain HTTP GET.  Implementations fail with [`ImportError::Network`] on
/// any transport error or non-2xx status.
pub trait Transport {
    fn get(&self, url: &Url) -> Result<HttpResponse, ImportError>;
}

pub struct BlockingTransport {
    client: Client,
}

impl BlockingTransport {
    pub fn new() -> Result<Self, ImportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .cookie_store(true)
            .build()
            .map_err(|e| ImportError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Transport for BlockingTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, ImportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| ImportError::network(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::network(url, format!("HTTP status {}", status)));
        }
        let final_url = response.url().clone();
        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        };
        let content_type = header(CONTENT_TYPE);
        let refresh = header(REFRESH);
        let body = response
            .bytes()
            .map_err(|e| ImportError::network(url, e))?
            .to_vec();
        Ok(HttpResponse {
            url: final_url,
            content_type,
            refresh,
            body,
        })
    }
}

fn refresh_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)^\s*\d*(?:\.\d*)?\s*(?:[;,]\s*(?:url\s*=\s*)?['"]?([^'"]*?)['"]?)?\s*$"#)
            .expect("valid refresh regex")
    })
}

/// Parse the content of a refresh directive, e.g. `0; url=/program-guide/`,
/// and resolve the target against `base`.  The delay is ignored.  Returns
/// `None` if there is no target.
pub fn parse_refresh(content: &str, base: &Url) -> Option<Url> {
    let caps = refresh_regex().captures(content)?;
    let target = caps.get(1)?.as_str().trim();
    if target.is_empty() {
        return None;
    }
    base.join(target).ok()
}

/// Find the target of a `<meta http-equiv="refresh">` element in the page
/// head.  Refresh elements in the body are ignored.
pub fn meta_refresh_target(html: &str, base: &Url) -> Option<Url> {
    let selector = Selector::parse("head > meta[http-equiv][content]").ok()?;
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .filter(|e| {
            e.value()
                .attr("http-equiv")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"))
        })
        .find_map(|e| parse_refresh(e.value().attr("content")?, base))
}

fn refresh_target(response: &HttpResponse) -> Option<Url> {
    if let Some(target) = response
        .refresh
        .as_deref()
        .and_then(|v| parse_refresh(v, &response.url))
    {
        return Some(target);
    }
    if !response.is_html() {
        return None;
    }
    let html = String::from_utf8_lossy(&response.body);
    meta_refresh_target(&html, &response.url)
}

/// Get a page, transparently following client side refreshes (a `Refresh`
/// header or a meta refresh element).  Returns the response of the final
/// page.  A refresh pointing to the page itself is not followed.
pub fn fetch_page<T: Transport>(transport: &T, url: &Url) -> Result<HttpResponse, ImportError> {
    let mut response = transport.get(url)?;
    for _ in 0..MAX_REFRESHES {
        match refresh_target(&response) {
            Some(target) if target != response.url => {
                debug!("following refresh from {} to {}", response.url, target);
                response = transport.get(&target)?;
            }
            _ => return Ok(response),
        }
    }
    match refresh_target(&response) {
        Some(target) if target != response.url => Err(ImportError::network(
            url,
            format!("more than {} refreshes", MAX_REFRESHES),
        )),
        _ => Ok(response),
    }
}

/// Temporary file next to `file_path`, so the final rename stays on the
/// same file system.
fn partial_path(file_path: &Path) -> PathBuf {
    let name = file_path
        .file_name()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    file_path.with_file_name(format!(".{}.part", name))
}

/// Write `bytes` so that `file_path` either doesn't exist or holds the
/// complete content.  The parent directory must exist.
pub fn write_atomically(file_path: &Path, bytes: &[u8]) -> Result<(), ImportError> {
    let partial = partial_path(file_path);
    let result = File::create(&partial)
        .and_then(|mut out| {
            out.write_all(bytes)?;
            out.sync_all()
        })
        .and_then(|_| fs::rename(&partial, file_path));
    if let Err(e) = result {
        let _ = fs::remove_file(&partial);
        return Err(ImportError::file_system(file_path, e));
    }
    Ok(())
}

/// Download the file at `url` and store it at `file_path`.
pub fn download_file<T: Transport>(
    transport: &T,
    url: &Url,
    file_path: &Path,
) -> Result<(), ImportError> {
    let response = transport.get(url)?;
    write_atomically(file_path, &response.body)
}

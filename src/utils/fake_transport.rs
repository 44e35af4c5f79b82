use std::{cell::RefCell, collections::HashMap};

use url::Url;

use crate::error::ImportError;
use crate::utils::lib_download::{HttpResponse, Transport};

/// In-memory [`Transport`].  Unknown urls answer with a 404.
#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<Url, HttpResponse>,
    requests: RefCell<Vec<Url>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn response(mut self, response: HttpResponse) -> Self {
        self.responses.insert(response.url.clone(), response);
        self
    }

    pub fn page(self, url: &str, html: &str) -> Self {
        self.response(HttpResponse {
            url: Url::parse(url).unwrap(),
            content_type: Some("text/html; charset=utf-8".to_string()),
            refresh: None,
            body: html.as_bytes().to_vec(),
        })
    }

    pub fn file(self, url: &str, bytes: &[u8]) -> Self {
        self.response(HttpResponse {
            url: Url::parse(url).unwrap(),
            content_type: Some("application/octet-stream".to_string()),
            refresh: None,
            body: bytes.to_vec(),
        })
    }

    /// All urls requested so far, in order
    pub fn requests(&self) -> Vec<Url> {
        self.requests.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, ImportError> {
        self.requests.borrow_mut().push(url.clone());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| ImportError::network(url, "HTTP status 404 Not Found"))
    }
}

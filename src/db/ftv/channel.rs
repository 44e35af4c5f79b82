use std::collections::HashSet;

use jiff::civil::Date;

use crate::api::ftv::program_guide::{is_spreadsheet, CandidateLink, RecencyWindow};
use crate::error::ImportError;

/// A monitored channel.  Its files are those whose name contains both tokens,
/// ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    /// Also the name of the archive subdirectory
    pub xmltvid: String,
    pub primary_token: String,
    pub secondary_token: String,
}

impl ChannelSpec {
    pub fn new(xmltvid: &str, primary_token: &str, secondary_token: &str) -> Self {
        Self {
            xmltvid: xmltvid.to_string(),
            primary_token: primary_token.to_string(),
            secondary_token: secondary_token.to_string(),
        }
    }

    /// Both tokens must be present.
    pub fn accepts(&self, file_name: &str) -> bool {
        let file_name = file_name.to_lowercase();
        file_name.contains(&self.primary_token.to_lowercase())
            && file_name.contains(&self.secondary_token.to_lowercase())
    }
}

/// Checks that don't depend on the channel.  Done once per link.
pub fn passes_link_filters(link: &CandidateLink, window: &RecencyWindow) -> bool {
    is_spreadsheet(&link.url) && window.contains(&link.url)
}

/// Should `link` be archived for `channel`?
pub fn matches(link: &CandidateLink, channel: &ChannelSpec, today: Date) -> bool {
    passes_link_filters(link, &RecencyWindow::new(today)) && channel.accepts(&link.file_name)
}

/// The xmltvid is used as a directory name, so it must be unique and a single
/// path component.  Empty tokens would match everything.
pub fn validate_channels(channels: &[ChannelSpec]) -> Result<(), ImportError> {
    let mut seen = HashSet::new();
    for channel in channels {
        let id = channel.xmltvid.as_str();
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(ImportError::Config(format!("invalid xmltvid {:?}", id)));
        }
        if !seen.insert(id) {
            return Err(ImportError::Config(format!("duplicate xmltvid {}", id)));
        }
        if channel.primary_token.is_empty() || channel.secondary_token.is_empty() {
            return Err(ImportError::Config(format!("empty match token for {}", id)));
        }
    }
    Ok(())
}

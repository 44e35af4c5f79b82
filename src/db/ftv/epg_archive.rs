use jiff::civil::Date;
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use url::Url;

use crate::api::ftv::program_guide::{ProgramGuidePage, RecencyWindow};
use crate::db::ftv::channel::{passes_link_filters, validate_channels, ChannelSpec};
use crate::error::ImportError;
use crate::utils::lib_download::{download_file, fetch_page, Transport};

/// Fashion TV program guides, as published by the vendor in Excel format.
/// One subdirectory per channel, named after the channel's xmltvid.  A file
/// in the archive is never downloaded again.
#[derive(Clone)]
pub struct FtvEpgArchive {
    pub base_dir: String,
    pub listing_url: String,
    pub channels: Vec<ChannelSpec>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Links passing the extension and year filters
    pub discovered: usize,
    /// (xmltvid, file name) of the files written in this run
    pub added: Vec<(String, String)>,
    pub already_archived: usize,
    pub failed: usize,
}

impl FtvEpgArchive {
    /// Path of the file in the channel directory.  Does not check if the file exists.
    pub fn filename(&self, xmltvid: &str, file_name: &str) -> PathBuf {
        Path::new(&self.base_dir).join(xmltvid).join(file_name)
    }

    pub fn has_file(&self, xmltvid: &str, file_name: &str) -> bool {
        self.filename(xmltvid, file_name).exists()
    }

    /// Scan the listing page and download the files that are not in the
    /// archive yet.  The channel directories must exist.
    ///
    /// Fails only if the listing page can't be retrieved or the channel table
    /// is invalid.  Problems with a single file are logged and the file is
    /// skipped.
    pub fn download_missing_files<T: Transport>(
        &self,
        transport: &T,
        today: Date,
    ) -> Result<UpdateSummary, ImportError> {
        validate_channels(&self.channels)?;
        let listing_url = Url::parse(&self.listing_url).map_err(|e| {
            ImportError::Config(format!("invalid listing url {}: {}", self.listing_url, e))
        })?;

        let response = fetch_page(transport, &listing_url)?;
        let mut summary = UpdateSummary::default();
        let page = match ProgramGuidePage::parse(response.url, &response.body) {
            Ok(page) => page,
            Err(e) => {
                error!("{}", e);
                return Ok(summary);
            }
        };

        let window = RecencyWindow::new(today);
        for link in page.links() {
            if !passes_link_filters(&link, &window) {
                continue;
            }
            info!("{}", link.url);
            summary.discovered += 1;

            for channel in self.channels.iter().filter(|c| c.accepts(&link.file_name)) {
                if self.has_file(&channel.xmltvid, &link.file_name) {
                    debug!("{} already in {}", link.file_name, channel.xmltvid);
                    summary.already_archived += 1;
                    continue;
                }
                let result = page.resolve(&link).and_then(|url| {
                    download_file(
                        transport,
                        &url,
                        &self.filename(&channel.xmltvid, &link.file_name),
                    )
                });
                match result {
                    Ok(()) => {
                        info!("Added {} to {}", link.file_name, channel.xmltvid);
                        summary
                            .added
                            .push((channel.xmltvid.clone(), link.file_name.clone()));
                    }
                    Err(e) => {
                        error!("Failed to add {} to {}: {}", link.file_name, channel.xmltvid, e);
                        summary.failed += 1;
                    }
                }
            }
        }
        Ok(summary)
    }
}

use crate::db::ftv::{channel::ChannelSpec, epg_archive::FtvEpgArchive};

pub struct ProdDb {}

impl ProdDb {
    pub fn ftv_epg() -> FtvEpgArchive {
        FtvEpgArchive {
            base_dir: "/content/channels".to_string(),
            listing_url: "http://company.fashiontv.com/program-guide/".to_string(),
            channels: vec![
                ChannelSpec::new("ftv.com", "fashiontv_", "Hotbird"),
                ChannelSpec::new("hd.ftv.com", "fashiontvHD_", "Hotbird"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Zoned;
    use std::error::Error;

    use crate::db::ftv::channel::validate_channels;
    use crate::utils::{lib_download::BlockingTransport, log_capture};

    use super::*;

    #[test]
    fn channel_table_is_valid() -> Result<(), Box<dyn Error>> {
        let archive = ProdDb::ftv_epg();
        validate_channels(&archive.channels)?;
        assert_eq!(archive.channels.len(), 2);
        assert_eq!(archive.base_dir, "/content/channels");
        assert_eq!(
            archive.filename("hd.ftv.com", "fashiontvHD_2025_Hotbird.xlsx").to_str(),
            Some("/content/channels/hd.ftv.com/fashiontvHD_2025_Hotbird.xlsx")
        );
        Ok(())
    }

    #[ignore]
    #[test]
    fn update_archive() -> Result<(), Box<dyn Error>> {
        log_capture::init();
        let archive = ProdDb::ftv_epg();
        let transport = BlockingTransport::new()?;
        archive.download_missing_files(&transport, Zoned::now().date())?;
        Ok(())
    }
}

pub mod channel;
pub mod epg_archive;

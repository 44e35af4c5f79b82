use std::{error::Error, path::Path};

use clap::Parser;
use ftv_epg::{db::prod_db::ProdDb, utils::lib_download::BlockingTransport};
use jiff::Zoned;
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Environment name, e.g., test, prod
    #[arg(short, long, default_value = "prod")]
    env: String,
}

/// Run this job every day.  Downloads the Fashion TV program guides that are
/// not in the archive yet.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // RUST_LOG may come from the env file
    let env_file = format!(".env/{}.env", args.env);
    let loaded = dotenvy::from_path(Path::new(&env_file));
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    if let Err(e) = loaded {
        warn!("Not loading {}: {}", env_file, e);
    }

    let archive = ProdDb::ftv_epg();
    let transport = BlockingTransport::new()?;
    let today = Zoned::now().date();
    let summary = archive.download_missing_files(&transport, today)?;
    info!(
        "{} files discovered, {} added, {} already archived, {} failed",
        summary.discovered,
        summary.added.len(),
        summary.already_archived,
        summary.failed
    );

    Ok(())
}

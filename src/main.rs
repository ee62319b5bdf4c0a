use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use dlutils::DownloadOptions;

#[derive(Parser)]
#[clap(name = "dlutils")]
#[clap(about = "Download files from URLs or Google Drive and unpack archives")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a file from a direct URL
    Url {
        /// URL to download
        url: String,
        #[clap(flatten)]
        target: TargetArgs,
    },
    /// Download a file from Google Drive by file id
    Gdrive {
        /// Google Drive file id
        file_id: String,
        #[clap(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// Directory to download into (created if missing)
    #[clap(short, long, default_value = ".")]
    directory: PathBuf,
    /// File name to save as (default: from the server or the URL)
    #[clap(short = 'o', long)]
    file_name: Option<String>,
    /// Unpack the download as a gzip-compressed tar archive
    #[clap(long)]
    extract_targz: bool,
    /// Decompress the download as a plain gzip file
    #[clap(long)]
    extract_gz: bool,
    /// Unpack the download as a zip archive
    #[clap(long)]
    extract_zip: bool,
}

impl From<TargetArgs> for DownloadOptions {
    fn from(args: TargetArgs) -> Self {
        DownloadOptions {
            directory: args.directory,
            file_name: args.file_name,
            extract_targz: args.extract_targz,
            extract_gz: args.extract_gz,
            extract_zip: args.extract_zip,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Url { url, target } => {
            dlutils::download_from_url(&url, &target.into()).map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Gdrive { file_id, target } => {
            dlutils::download_from_google_drive(&file_id, &target.into())
                .map_err(|e| anyhow::anyhow!(e))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

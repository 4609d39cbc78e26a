//! fdfs-storage CLI Client
//!
//! Upload, download and delete files on a storage node.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fdfs_storage::{Config, FileId, StorageClient};
use tracing_subscriber::{fmt, EnvFilter};

/// fdfs-storage CLI
#[derive(Parser, Debug)]
#[command(name = "fdfs-cli")]
#[command(about = "CLI for a storage node of a distributed file store")]
#[command(version)]
struct Args {
    /// Storage node address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:23000")]
    server: String,

    /// Connect timeout in milliseconds
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// Read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "30000")]
    read_timeout_ms: u64,

    /// Write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "30000")]
    write_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a local file and print its file id
    Upload {
        /// Local file to upload
        path: PathBuf,

        /// Storage path (disk) index on the node
        #[arg(short = 'i', long, default_value = "0")]
        store_path_index: u8,
    },

    /// Download a file to a local path
    Download {
        /// File id, e.g. group1/M00/00/00/abc.txt
        file_id: String,

        /// Destination path
        dest: PathBuf,

        /// Byte offset to start from
        #[arg(long, default_value = "0")]
        offset: i64,

        /// Number of bytes to fetch (0 = to the end)
        #[arg(long, default_value = "0")]
        length: i64,
    },

    /// Delete a file
    Delete {
        /// File id, e.g. group1/M00/00/00/abc.txt
        file_id: String,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,fdfs_storage=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("fdfs-cli v{}", fdfs_storage::VERSION);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> fdfs_storage::Result<()> {
    let mut builder = Config::builder()
        .storage_addr(&args.server)
        .connect_timeout_ms(args.connect_timeout_ms)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms);

    if let Commands::Upload {
        store_path_index, ..
    } = &args.command
    {
        builder = builder.store_path_index(*store_path_index);
    }

    let client = StorageClient::new(builder.build())?;

    match args.command {
        Commands::Upload { path, .. } => {
            let file_id = client.upload_file(&path)?;
            println!("{}", file_id);
        }
        Commands::Download {
            file_id,
            dest,
            offset,
            length,
        } => {
            let file_id: FileId = file_id.parse()?;
            let copied = client.download_to_file(&file_id, &dest, offset, length)?;
            println!("{} bytes -> {}", copied, dest.display());
        }
        Commands::Delete { file_id } => {
            let file_id: FileId = file_id.parse()?;
            client.delete_file(&file_id)?;
            println!("deleted {}", file_id);
        }
    }

    Ok(())
}

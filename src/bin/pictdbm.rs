//! PictDB Manager
//!
//! Command-line front-end over the picture database operations.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pictdb::config::{DEFAULT_CAPACITY, DEFAULT_SMALL_RES, DEFAULT_THUMB_RES};
use pictdb::ops::{self, gc};
use pictdb::{Config, ImageCrateCodec, OpenMode, PictDb, Resolution, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Picture database management tool
#[derive(Parser, Debug)]
#[command(name = "pictdbm")]
#[command(about = "Manage a single-file picture database")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new, empty database
    Create {
        /// Database file
        db: PathBuf,

        /// Number of picture slots
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        max_files: u32,

        /// Thumbnail bounding box
        #[arg(long, num_args = 2, value_names = ["X_RES", "Y_RES"],
              default_values_t = [DEFAULT_THUMB_RES, DEFAULT_THUMB_RES])]
        thumb_res: Vec<u16>,

        /// Small bounding box
        #[arg(long, num_args = 2, value_names = ["X_RES", "Y_RES"],
              default_values_t = [DEFAULT_SMALL_RES, DEFAULT_SMALL_RES])]
        small_res: Vec<u16>,
    },

    /// List the header and every picture
    List {
        db: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Insert a picture file under an id
    Insert {
        db: PathBuf,
        id: String,
        file: PathBuf,
    },

    /// Read a picture and save it as <id>_<res>.jpg
    Read {
        db: PathBuf,
        id: String,

        /// thumb|thumbnail|small|orig|original
        #[arg(default_value = "original")]
        res: Resolution,
    },

    /// Delete a picture
    Delete { db: PathBuf, id: String },

    /// Compact the database, dropping deleted pictures
    Gc {
        db: PathBuf,

        /// Temporary file for the rebuild (defaults to <db>.gc.tmp)
        tmp: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pictdb=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Create {
            db,
            max_files,
            thumb_res,
            small_res,
        } => {
            let config = Config::builder()
                .capacity(max_files)
                .thumb_res(thumb_res[0], thumb_res[1])
                .small_res(small_res[0], small_res[1])
                .build();
            let pictdb = PictDb::create(&db, &config)?;
            println!("{} item(s) written", 1 + max_files);
            print!("{}", pictdb.list());
        }
        Commands::List { db, json } => {
            let pictdb = PictDb::open(&db, OpenMode::ReadOnly)?;
            let listing = pictdb.list();
            if json {
                println!("{}", listing.to_json()?);
            } else {
                print!("{}", listing);
            }
        }
        Commands::Insert { db, id, file } => {
            let bytes = fs::read(&file)?;
            let mut pictdb = PictDb::open(&db, OpenMode::ReadWrite)?;
            let inserted = pictdb.insert(&id, &bytes)?;
            tracing::info!(slot = inserted.slot, outcome = ?inserted.outcome, "inserted {}", id);
        }
        Commands::Read { db, id, res } => {
            let out = ops::export_file_name(&id, res)?;
            let mut pictdb = PictDb::open(&db, OpenMode::ReadWrite)?;
            let bytes = pictdb.read(&id, res)?;
            fs::write(&out, &bytes)?;
            tracing::info!("wrote {} ({} bytes)", out, bytes.len());
        }
        Commands::Delete { db, id } => {
            let mut pictdb = PictDb::open(&db, OpenMode::ReadWrite)?;
            pictdb.delete(&id)?;
        }
        Commands::Gc { db, tmp } => {
            let codec = ImageCrateCodec::default();
            let report = match tmp {
                Some(tmp) => gc::collect_with_temp(&db, &tmp, &codec)?,
                None => gc::collect(&db, &codec)?,
            };
            println!(
                "{} live, {} tombstone(s), {} byte(s) reclaimed",
                report.live,
                report.tombstones,
                report.reclaimed_bytes()
            );
        }
    }
    Ok(())
}

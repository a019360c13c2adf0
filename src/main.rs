//! Binary entrypoint for the photo library CLI.
//!
//! Builds the sample library from configuration and prints JSON; all logic
//! lives in the library crate.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, info};
use tracing_subscriber::{EnvFilter, fmt};

use photo_library::config::Configuration;
use photo_library::dataset;
use photo_library::dates;
use photo_library::events::{SlideshowCommand, UploadEvent};
use photo_library::library::{AlbumQuery, AlbumSort};
use photo_library::model::{AlbumId, AlbumKind, CategoryId, MemoryId, PhotoId};
use photo_library::tasks::{slideshow, upload};
use photo_library::{CategoryFilter, PhotoLibrary, PhotoQuery, Scope, SortKey};

#[derive(Debug, Parser)]
#[command(name = "photo-library", version, about = "Query an in-memory photo collection")]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for the sample collection (overrides dataset.seed)
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Pretend the current time is this RFC 3339 instant
    #[arg(long, value_name = "RFC3339")]
    now: Option<String>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List active photos
    List {
        #[arg(long)]
        search: Option<String>,
        /// all | favorites | recent | tag:<v> | location:<v> | camera:<v>
        #[arg(long, default_value = "all")]
        filter: CategoryFilter,
        /// newest | oldest | name | location | size
        #[arg(long, default_value = "newest")]
        sort: SortKey,
        #[arg(long, conflicts_with_all = ["category", "memory"])]
        album: Option<u32>,
        #[arg(long, conflicts_with = "memory")]
        category: Option<u32>,
        #[arg(long)]
        memory: Option<u32>,
        /// Group the result into month sections
        #[arg(long)]
        grouped: bool,
    },
    /// Free-text search over active photos
    Search { text: String },
    /// List albums
    Albums {
        #[arg(long)]
        search: Option<String>,
        /// user | system | shared
        #[arg(long, value_parser = parse_album_kind)]
        kind: Option<AlbumKind>,
        /// updated | name | count
        #[arg(long, default_value = "updated", value_parser = parse_album_sort)]
        sort: AlbumSort,
    },
    /// Collection statistics
    Stats,
    /// Trashed photos grouped by expiry month
    Trash,
    /// Delete trashed photos older than the retention window
    Purge,
    /// Show one photo and the albums it belongs to
    Show { id: u32 },
    /// Format an RFC 3339 timestamp as DD/MM/YYYY
    FormatDate { timestamp: String },
    /// Play a memory as a slideshow, printing each slide change
    Slideshow {
        memory: u32,
        /// Stop after this many slide changes
        #[arg(long, default_value_t = 5)]
        changes: usize,
    },
    /// Simulate uploading files given as NAME:MIME:BYTES
    Upload {
        #[arg(value_parser = parse_staged_file, required = true)]
        files: Vec<upload::StagedFile>,
    },
}

fn parse_album_kind(raw: &str) -> Result<AlbumKind, String> {
    AlbumKind::ALL
        .iter()
        .copied()
        .find(|k| k.as_str() == raw)
        .ok_or_else(|| format!("unknown album kind '{raw}', expected user, system or shared"))
}

fn parse_album_sort(raw: &str) -> Result<AlbumSort, String> {
    match raw {
        "updated" => Ok(AlbumSort::UpdatedNewest),
        "name" => Ok(AlbumSort::Name),
        "count" => Ok(AlbumSort::CountDescending),
        other => Err(format!("unknown album sort '{other}', expected updated, name or count")),
    }
}

fn parse_staged_file(raw: &str) -> Result<upload::StagedFile, String> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(size), Some(mime), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected NAME:MIME:BYTES, got '{raw}'"));
    };
    let size = size
        .parse()
        .map_err(|err| format!("invalid size in '{raw}': {err}"))?;
    Ok(upload::StagedFile::new(name, mime, size))
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(format!("photo_library={level}").parse()?);
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct PhotoDetails<'a> {
    #[serde(flatten)]
    photo: &'a photo_library::model::Photo,
    album_ids: Vec<AlbumId>,
    captured: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    }
    .validated()
    .context("invalid configuration values")?;
    if let Some(seed) = cli.seed {
        cfg.dataset.seed = Some(seed);
    }
    debug!(?cfg, "configuration loaded");

    let now: DateTime<Utc> = match &cli.now {
        Some(raw) => dates::parse_timestamp(raw).context("failed to parse --now")?,
        None => Utc::now(),
    };
    let tz = cfg.timezone;

    if let Command::FormatDate { timestamp } = &cli.command {
        return print_json(&dates::format_date_str(timestamp, tz)?);
    }

    let mut library = dataset::generate(&cfg.dataset, now).context("failed to build library")?;

    match cli.command {
        Command::List {
            search,
            filter,
            sort,
            album,
            category,
            memory,
            grouped,
        } => {
            let mut params = PhotoQuery::default()
                .filter(filter)
                .sort(sort)
                .recent_window(cfg.recent_window);
            if let Some(text) = search {
                params = params.search(text);
            }
            let scope = album
                .map(|id| Scope::Album(AlbumId(id)))
                .or(category.map(|id| Scope::Category(CategoryId(id))))
                .or(memory.map(|id| Scope::Memory(MemoryId(id))));
            if let Some(scope) = scope {
                params = params.scope(scope);
            }
            if grouped {
                let groups = library.grouped(&params, now, tz);
                info!(groups = groups.len(), "grouped query");
                print_json(&groups)?;
            } else {
                let photos = library.query(&params, now);
                info!(count = photos.len(), "query");
                print_json(&photos)?;
            }
        }
        Command::Search { text } => print_json(&library.search(&text))?,
        Command::Albums { search, kind, sort } => {
            let albums = library.query_albums(&AlbumQuery { search, kind, sort });
            print_json(&albums)?;
        }
        Command::Stats => print_json(&library.statistics(now, tz))?,
        Command::Trash => print_json(&library.grouped_trash(tz))?,
        Command::Purge => {
            let purged = library.purge_expired(now, cfg.trash_retention)?;
            info!(
                count = purged.len(),
                retention = %humantime::format_duration(cfg.trash_retention),
                "purge finished"
            );
            print_json(&purged)?;
        }
        Command::Show { id } => {
            let photo = library.require_photo(PhotoId(id))?;
            print_json(&PhotoDetails {
                photo,
                album_ids: library.album_ids_of(photo.id),
                captured: dates::format_date(photo.captured_at, tz),
            })?;
        }
        Command::Slideshow { memory, changes } => {
            run_slideshow(&library, MemoryId(memory), changes, &cfg).await?;
        }
        Command::Upload { files } => {
            let mut queue = upload::UploadQueue::new();
            if queue.stage(files) == 0 {
                bail!("no image or video files to upload");
            }
            run_upload(queue.take(), &cfg).await?;
        }
        Command::FormatDate { .. } => {}
    }
    Ok(())
}

async fn run_slideshow(
    library: &PhotoLibrary,
    memory: MemoryId,
    changes: usize,
    cfg: &Configuration,
) -> Result<()> {
    library.require_memory(memory)?;
    let slides: Vec<PhotoId> = library.memory_photos(memory).iter().map(|p| p.id).collect();
    if slides.len() < 2 {
        bail!("memory {memory} has fewer than two photos to show");
    }

    let cancel = CancellationToken::new();
    let (cmd_tx, cmd_rx) = mpsc::channel(4);
    let (slide_tx, mut slide_rx) = mpsc::channel(16);
    let task = tokio::spawn(slideshow::run(
        slides,
        cfg.slideshow.clone(),
        cmd_rx,
        slide_tx,
        cancel.clone(),
    ));
    cmd_tx.send(SlideshowCommand::Play).await?;

    let mut seen = 0;
    while seen < changes {
        let Some(slide) = slide_rx.recv().await else {
            break;
        };
        println!("{}", serde_json::json!({ "index": slide.index, "photo": slide.photo }));
        seen += 1;
    }
    cancel.cancel();
    task.await??;
    Ok(())
}

async fn run_upload(files: Vec<upload::StagedFile>, cfg: &Configuration) -> Result<()> {
    let cancel = CancellationToken::new();
    let (tx, mut rx) = mpsc::channel(32);
    let task = tokio::spawn(upload::run(files, cfg.upload.clone(), tx, cancel));
    while let Some(event) = rx.recv().await {
        match event {
            UploadEvent::Progress(pct) => debug!(pct, "upload progress"),
            UploadEvent::Finished(note) => print_json(&note)?,
        }
    }
    task.await??;
    Ok(())
}

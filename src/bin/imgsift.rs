//! imgsift - detect objects in an image directory and search the metadata

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::warn;

use imgsift::catalog::aggregate;
use imgsift::config::AppConfig;
use imgsift::detect::{BackendRegistry, DetectorBackend, StubBackend};
use imgsift::ingest::{list_images, process_image};
use imgsift::query::{parse_threshold, Query, SearchMode};
use imgsift::search::search;
use imgsift::storage::{write_results_json, MetadataStore, SqliteMetadataStore};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the metadata database (overrides config).
    #[arg(long, env = "IMGSIFT_DB_PATH")]
    db_path: Option<String>,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the detector over a directory and persist the metadata.
    Process {
        /// Directory of images to process (non-recursive).
        #[arg(long)]
        dir: PathBuf,
        /// Detector backend name (overrides config).
        #[arg(long)]
        backend: Option<String>,
    },
    /// Print the class catalog for the stored metadata.
    Classes,
    /// Search stored metadata by class, combinator and count ceilings.
    Search {
        /// Combination mode: "any" (OR) or "all" (AND).
        #[arg(long, default_value = "any")]
        mode: String,
        /// Class to search for; repeatable.
        #[arg(long = "class", value_name = "CLASS")]
        classes: Vec<String>,
        /// Maximum count for a class, as CLASS=N; repeatable.
        /// A non-numeric N means unbounded.
        #[arg(long = "max", value_name = "CLASS=N")]
        max_counts: Vec<String>,
        /// Write matching records to a JSON file.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let is_tty = std::io::stderr().is_terminal();
    let ui = ui::Ui::from_args(Some(&args.ui), is_tty);

    let mut cfg = AppConfig::load()?;
    if let Some(db_path) = args.db_path {
        cfg.db_path = db_path;
    }

    match args.command {
        Command::Process { dir, backend } => cmd_process(&cfg, &ui, &dir, backend.as_deref()),
        Command::Classes => cmd_classes(&cfg),
        Command::Search {
            mode,
            classes,
            max_counts,
            output,
        } => cmd_search(&cfg, &ui, &mode, classes, &max_counts, output.as_deref()),
    }
}

fn cmd_process(
    cfg: &AppConfig,
    ui: &ui::Ui,
    dir: &std::path::Path,
    backend_flag: Option<&str>,
) -> Result<()> {
    let mut registry = BackendRegistry::new();
    registry.register(StubBackend::new());

    let backend_name = backend_flag.unwrap_or(&cfg.backend);
    let backend = registry.resolve(Some(backend_name))?;
    let mut backend = backend
        .lock()
        .map_err(|_| anyhow!("backend lock poisoned"))?;
    backend.warm_up()?;

    let paths = list_images(dir, &cfg.image_extensions)?;
    let bar = ui.bar(paths.len() as u64);
    let mut records = Vec::with_capacity(paths.len());
    let mut skipped = 0usize;
    for path in &paths {
        bar.set_message(path.display().to_string());
        match process_image(path, &mut *backend, cfg.conf_threshold) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("skipping {}: {:#}", path.display(), e);
                skipped += 1;
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    {
        let _stage = ui.stage("Save metadata");
        let mut store = SqliteMetadataStore::open(&cfg.db_path)?;
        store.save(&records)?;
    }

    let catalog = aggregate(&records);
    println!(
        "processed {} images ({} skipped), metadata saved to {}",
        records.len(),
        skipped,
        cfg.db_path
    );
    println!("classes: {}", catalog.unique_classes.join(", "));
    Ok(())
}

fn cmd_classes(cfg: &AppConfig) -> Result<()> {
    let mut store = SqliteMetadataStore::open(&cfg.db_path)?;
    let records = store.load()?;
    let catalog = aggregate(&records);
    if catalog.is_empty() {
        println!("no classes found in {} records", records.len());
        return Ok(());
    }
    for class in &catalog.unique_classes {
        let counts: Vec<String> = catalog
            .counts_for(class)
            .iter()
            .map(u32::to_string)
            .collect();
        println!("{}: {}", class, counts.join(", "));
    }
    Ok(())
}

fn cmd_search(
    cfg: &AppConfig,
    ui: &ui::Ui,
    mode: &str,
    classes: Vec<String>,
    max_counts: &[String],
    output: Option<&std::path::Path>,
) -> Result<()> {
    let mode = match mode {
        "any" | "or" => SearchMode::Any,
        "all" | "and" => SearchMode::All,
        other => return Err(anyhow!("unknown search mode '{}' (any|all)", other)),
    };

    if classes.is_empty() {
        println!("no classes selected; search not performed");
        return Ok(());
    }

    let mut builder = Query::builder().mode(mode);
    for class in classes {
        builder = builder.class(class);
    }
    for entry in max_counts {
        let (label, raw) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("--max expects CLASS=N, got '{}'", entry))?;
        if let Some(ceiling) = parse_threshold(raw) {
            builder = builder.max_count(label, ceiling);
        }
    }
    let query = builder.build();

    let records = {
        let _stage = ui.stage("Load metadata");
        let mut store = SqliteMetadataStore::open(&cfg.db_path)?;
        store.load()?
    };

    let matches = search(&records, &query);
    println!("{} of {} images match", matches.len(), records.len());
    for record in &matches {
        let counts: Vec<String> = query
            .classes
            .iter()
            .map(|class| format!("{}: {}", class, record.class_count(class)))
            .collect();
        println!("{} ({})", record.image_path(), counts.join(", "));
    }

    if let Some(path) = output {
        write_results_json(path, &matches)?;
        println!("results written to {}", path.display());
    }
    Ok(())
}

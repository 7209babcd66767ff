//! imgsift
//!
//! Object-detection metadata indexing and search over image directories.
//!
//! A detector backend runs over every image in a directory and produces one
//! [`record::DetectionRecord`] per image. Records persist in a SQLite
//! metadata store and are queried by object class, OR/AND co-occurrence,
//! and optional per-class maximum-count thresholds.
//!
//! # Module Structure
//!
//! - `record`: detection metadata model (`Detection`, `DetectionRecord`)
//! - `catalog`: class catalog aggregation over a metadata collection
//! - `query`: search intent (classes, combinator, count ceilings)
//! - `search`: the matcher evaluating a query against records
//! - `detect`: detector backend seam and registry
//! - `ingest`: directory scanning and batch processing
//! - `storage`: metadata store and JSON result export
//! - `config`: file + env configuration
//!
//! The aggregation and matching core is pure: no I/O, no hidden state.
//! Callers hand it an immutable snapshot of the record collection; anything
//! that reprocesses concurrently must swap in a new collection rather than
//! mutate one mid-search.

pub mod catalog;
pub mod config;
pub mod detect;
pub mod ingest;
pub mod query;
pub mod record;
pub mod search;
pub mod storage;

pub use catalog::{aggregate, ClassCatalog};
pub use query::{Query, SearchMode};
pub use record::{BoundingBox, Detection, DetectionRecord};
pub use search::search;

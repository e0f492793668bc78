//! Book-listing batch pipeline: scrape paginated Amazon search results,
//! stage the parsed records in an in-memory handoff slot, and load them
//! into the `books` table in Postgres.
//!
//! The three stages (table init, collect, load) are plain call-and-return
//! async fns; [`pipeline::run`] sequences them for a single invocation and
//! leaves scheduling to whatever drives the binary.

pub mod collect;
pub mod config;
mod error;
pub mod fetch;
pub mod handoff;
mod parse;
pub mod pipeline;
pub mod record;
pub mod store;

pub use error::{Error, Result};

/// Step id the Collector publishes its batch under; the Loader pulls by
/// naming it.
pub const FETCH_STEP_ID: &str = "fetch_books";
/// Slot key for the published batch within the Collector's step.
pub const BOOKS_SLOT_KEY: &str = "amazonbooks";

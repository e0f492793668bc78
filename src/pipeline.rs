use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::collect::collect;
use crate::config::Config;
use crate::fetch::PageFetcher;
use crate::handoff::Handoff;
use crate::record::BookRecord;
use crate::store::BookStore;
use crate::{Result, BOOKS_SLOT_KEY, FETCH_STEP_ID};

/// Runs the three steps of one pipeline invocation in order:
/// create_books_table, fetch_books, insert_books. Each step gets a single
/// retry after `Config::retry_delay`; a second failure aborts the run.
/// Scheduling across invocations is the caller's concern.
pub async fn run(
    fetcher: &impl PageFetcher,
    store: &impl BookStore,
    cfg: &Config,
) -> Result<()> {
    let mut handoff = Handoff::new();

    with_retry("create_books_table", cfg.retry_delay, || {
        create_books_table(store)
    })
    .await?;

    let batch = with_retry(FETCH_STEP_ID, cfg.retry_delay, || {
        collect(fetcher, cfg.target_count, cfg.max_pages)
    })
    .await?;
    handoff.publish(FETCH_STEP_ID, BOOKS_SLOT_KEY, &batch)?;

    with_retry("insert_books", cfg.retry_delay, || {
        insert_books(store, &handoff)
    })
    .await?;

    Ok(())
}

/// Table Initializer step. The DDL itself is `IF NOT EXISTS`, so repeated
/// runs are harmless.
pub async fn create_books_table(store: &impl BookStore) -> Result<()> {
    store.ensure_table().await
}

/// Loader step: pulls the published batch and issues one insert per
/// record. A missing or empty slot is logged and ignored, not an error.
/// Inserts are independent statements; a failure partway through leaves
/// the already-inserted prefix in place.
pub async fn insert_books(store: &impl BookStore, handoff: &Handoff) -> Result<()> {
    let batch: Option<Vec<BookRecord>> = handoff.pull(FETCH_STEP_ID, BOOKS_SLOT_KEY)?;
    let batch = match batch {
        Some(batch) if !batch.is_empty() => batch,
        _ => {
            info!("no book data to insert");
            return Ok(());
        }
    };

    for book in &batch {
        store.insert_book(book).await?;
    }
    info!(count = batch.len(), "inserted book records");
    Ok(())
}

async fn with_retry<T, F, Fut>(step: &str, delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(step, error = %err, delay_secs = delay.as_secs(), "step failed, retrying once");
            tokio::time::sleep(delay).await;
            op().await
        }
    }
}

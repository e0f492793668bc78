use std::collections::HashSet;

use tracing::{info, warn};

use crate::fetch::PageFetcher;
use crate::parse::parse_listings;
use crate::record::BookRecord;
use crate::Result;

/// Scrapes search-results pages until `target_count` deduplicated records
/// are accumulated, the page ceiling is hit, or a page fetch comes back
/// with a non-success status. The last two end the run early with whatever
/// was collected so far; only transport and parse failures are errors.
///
/// Records keep first-seen order and are unique by trimmed title. The batch
/// never exceeds `target_count`, even when the last page overshoots.
pub async fn collect(
    fetcher: &impl PageFetcher,
    target_count: usize,
    max_pages: usize,
) -> Result<Vec<BookRecord>> {
    let mut books: Vec<BookRecord> = Vec::with_capacity(target_count);
    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut page = 1;

    while books.len() < target_count {
        if page > max_pages {
            warn!(max_pages, collected = books.len(), "page ceiling reached, stopping early");
            break;
        }

        let response = fetcher.fetch(page).await?;
        if !response.is_success() {
            warn!(
                page,
                status = response.status,
                collected = books.len(),
                "failed to retrieve page, keeping partial results"
            );
            break;
        }

        for record in parse_listings(&response.body)? {
            if seen_titles.insert(record.title.clone()) {
                books.push(record);
            }
        }

        page += 1;
    }

    books.truncate(target_count);
    info!(count = books.len(), pages = page - 1, "collected book records");
    Ok(books)
}

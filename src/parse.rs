use scraper::{ElementRef, Html, Selector};

use crate::record::BookRecord;
use crate::{Error, Result};

/// Parses one search-results page and extracts every complete book listing.
///
/// A listing fragment is a `div.s-result-item`; the four sub-fields are
/// located by the site's fixed marker classes. Fragments missing any of the
/// four (sponsored slots, ads, widgets) are skipped without comment —
/// that is the contract with the site's markup, which changes silently.
pub(crate) fn parse_listings(html: &str) -> Result<Vec<BookRecord>> {
    let doc = Html::parse_document(html);

    let listing_selector = create_selector("div.s-result-item")?;
    let title_selector = create_selector("span.a-text-normal")?;
    let author_selector = create_selector("a.a-size-base")?;
    let price_selector = create_selector("span.a-price-whole")?;
    let rating_selector = create_selector("span.a-icon-alt")?;

    let mut records = Vec::new();
    for listing in doc.select(&listing_selector) {
        let title = text_of(listing, &title_selector);
        let author = text_of(listing, &author_selector);
        let price = text_of(listing, &price_selector);
        let rating = text_of(listing, &rating_selector);

        if let (Some(title), Some(author), Some(price), Some(rating)) =
            (title, author, price, rating)
        {
            records.push(BookRecord {
                title,
                author,
                price,
                rating,
            });
        }
    }
    Ok(records)
}

/// Text of the first element under `listing` matching `selector`, trimmed.
/// `None` when no such element exists.
fn text_of(listing: ElementRef, selector: &Selector) -> Option<String> {
    listing
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::Selector(sel_str.into()))
}

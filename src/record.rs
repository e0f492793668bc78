use serde::{Deserialize, Serialize};

/// One parsed book listing. `title` is the dedup key; the other fields are
/// kept as the unnormalized text the site served (currency symbols, rating
/// phrasing and all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub price: String,
    pub rating: String,
}

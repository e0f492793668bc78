use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::record::BookRecord;
use crate::Result;

const CREATE_BOOKS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS books (
    id SERIAL PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    authors VARCHAR(255),
    price VARCHAR(50),
    rating VARCHAR(10)
)";

const INSERT_BOOK: &str = "\
INSERT INTO books (title, authors, price, rating)
VALUES ($1, $2, $3, $4)";

/// Destination store for book records. The table is append-only; dedup is
/// a property of the collected batch, not of the storage layer.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Idempotent: a second call against an existing table is a no-op.
    async fn ensure_table(&self) -> Result<()>;
    async fn insert_book(&self, book: &BookRecord) -> Result<()>;
}

/// Postgres-backed store.
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn ensure_table(&self) -> Result<()> {
        sqlx::query(CREATE_BOOKS_TABLE).execute(&self.pool).await?;
        info!("books table ready");
        Ok(())
    }

    async fn insert_book(&self, book: &BookRecord) -> Result<()> {
        sqlx::query(INSERT_BOOK)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.price)
            .bind(&book.rating)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// In-memory store for tests and dry runs. Data is lost on drop.
#[derive(Default)]
pub struct MemoryBookStore {
    books: Mutex<Vec<BookRecord>>,
    tables_created: Mutex<usize>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> Vec<BookRecord> {
        self.books.lock().unwrap().clone()
    }

    pub fn insert_count(&self) -> usize {
        self.books.lock().unwrap().len()
    }

    pub fn ensure_table_calls(&self) -> usize {
        *self.tables_created.lock().unwrap()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn ensure_table(&self) -> Result<()> {
        *self.tables_created.lock().unwrap() += 1;
        Ok(())
    }

    async fn insert_book(&self, book: &BookRecord) -> Result<()> {
        self.books.lock().unwrap().push(book.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> BookRecord {
        BookRecord {
            title: title.into(),
            author: "Author".into(),
            price: "10".into(),
            rating: "4 out of 5 stars".into(),
        }
    }

    #[tokio::test]
    async fn ensure_table_is_idempotent() {
        let store = MemoryBookStore::new();
        store.ensure_table().await.unwrap();
        store.ensure_table().await.unwrap();
        assert_eq!(store.ensure_table_calls(), 2);
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn inserts_preserve_order_and_allow_duplicates() {
        let store = MemoryBookStore::new();
        store.insert_book(&record("A")).await.unwrap();
        store.insert_book(&record("A")).await.unwrap();
        let titles: Vec<_> = store.books().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, ["A", "A"]);
    }
}

pub mod postgres;
pub mod sqlite;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;

use crate::configuration::{DatabaseEngine, DatabaseSettings};

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i32,
}

/// A question that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i32,
}

pub type DynStore = Arc<dyn TriviaStore>;

// Shared between request handlers, so implementations only hold a pool.
// Every list comes back ordered by id.
#[async_trait]
pub trait TriviaStore: Send + Sync {
    async fn migrate(&self) -> Result<()>;

    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn create_category(&self, kind: &str) -> Result<i64>;
    async fn delete_category(&self, id: i64) -> Result<bool>;

    async fn list_questions(&self) -> Result<Vec<Question>>;
    async fn questions_in_category(&self, category: i64) -> Result<Vec<Question>>;
    /// Case-insensitive substring match on the question text.
    async fn search_questions(&self, term: &str) -> Result<Vec<Question>>;
    async fn get_question(&self, id: i64) -> Result<Option<Question>>;

    async fn create_question(&self, question: &NewQuestion) -> Result<i64>;
    async fn update_question(&self, question: &Question) -> Result<bool>;
    async fn delete_question(&self, id: i64) -> Result<bool>;

    /// Inserts exported rows with fresh ids in one transaction: either all of
    /// them land or none do.
    async fn import(&self, categories: &[Category], questions: &[Question]) -> Result<()>;
}

/// Opens a pool for the configured engine.
pub async fn establish_connection(settings: &DatabaseSettings) -> Result<DynStore> {
    let store: DynStore = match settings.engine {
        DatabaseEngine::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect_with(settings.postgres_options())
                .await
                .with_context(|| {
                    format!(
                        "Failed to connect to postgres database {} on {}",
                        settings.database_name, settings.host
                    )
                })?;
            Arc::new(PostgresStore::new(pool))
        }
        DatabaseEngine::Sqlite => {
            let pool = SqlitePoolOptions::new()
                .max_connections(settings.max_connections)
                .connect_with(settings.sqlite_options())
                .await
                .with_context(|| {
                    format!("Failed to open sqlite database {}", settings.database_name)
                })?;
            Arc::new(SqliteStore::new(pool))
        }
    };
    Ok(store)
}

/// The id an imported question's category received, or the exported id when
/// that category was not part of the import.
pub fn imported_category(category_ids: &HashMap<i64, i64>, exported: i64) -> i64 {
    category_ids.get(&exported).copied().unwrap_or(exported)
}

/// Turns a search term into a LIKE pattern matching it anywhere, with the
/// term's own wildcards escaped by `\`.
pub fn substring_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

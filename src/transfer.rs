//! CSV import and export of the trivia tables.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::{Category, Question, TriviaStore};

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub categories: usize,
    pub questions: usize,
}

fn write_to(path: &Path, data: &[impl Serialize]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Cannot open {}", path.display()))?;
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Bad record in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(store: &dyn TriviaStore, dir: &Path) -> anyhow::Result<()> {
    let categories = store.list_categories().await?;
    let questions = store.list_questions().await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    write_to(&dir.join(CATEGORIES_FILE), &categories)?;
    write_to(&dir.join(QUESTIONS_FILE), &questions)?;
    tracing::info!(
        "Exported {} categories and {} questions to {}",
        categories.len(),
        questions.len(),
        dir.display()
    );
    Ok(())
}

/// Inserts both files with fresh ids. Questions follow their category to its
/// new id; a category id missing from the file is kept as it is. Nothing is
/// inserted when any row fails.
pub async fn import_data(store: &dyn TriviaStore, dir: &Path) -> anyhow::Result<ImportSummary> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;

    store
        .import(&categories, &questions)
        .await
        .with_context(|| format!("Import from {} was rolled back", dir.display()))?;

    let summary = ImportSummary {
        categories: categories.len(),
        questions: questions.len(),
    };
    tracing::info!(
        "Imported {} categories and {} questions from {}",
        summary.categories,
        summary.questions,
        dir.display()
    );
    Ok(summary)
}

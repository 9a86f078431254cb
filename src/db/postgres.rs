use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::{
    imported_category, substring_pattern, Category, NewQuestion, Question, TriviaStore,
};

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TriviaStore for PostgresStore {
    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/postgres")
            .run(&self.pool)
            .await
            .context("Failed to run postgres migrations")?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>(r#"SELECT id, "type" FROM categories ORDER BY id"#)
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    async fn create_category(&self, kind: &str) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO categories ("type") VALUES ($1) RETURNING id"#,
        )
        .bind(kind)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to insert category {kind}"))?;
        Ok(id)
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete category {id}"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_questions(&self) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question, answer, category, difficulty
            FROM questions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn questions_in_category(&self, category: i64) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question, answer, category, difficulty
            FROM questions
            WHERE category = $1
            ORDER BY id
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn search_questions(&self, term: &str) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question, answer, category, difficulty
            FROM questions
            WHERE question ILIKE $1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(substring_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn get_question(&self, id: i64) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            "SELECT id, question, answer, category, difficulty FROM questions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(question)
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO questions (question, answer, category, difficulty)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert question")?;
        Ok(id)
    }

    async fn update_question(&self, question: &Question) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE questions
            SET question = $1, answer = $2, category = $3, difficulty = $4
            WHERE id = $5
            "#,
        )
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .bind(question.id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to update question {}", question.id))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_question(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete question {id}"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn import(&self, categories: &[Category], questions: &[Question]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let mut category_ids = HashMap::with_capacity(categories.len());
        for category in categories {
            let id = sqlx::query_scalar::<_, i64>(
                r#"INSERT INTO categories ("type") VALUES ($1) RETURNING id"#,
            )
            .bind(&category.kind)
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("Cannot import category {}", category.id))?;
            category_ids.insert(category.id, id);
        }

        for question in questions {
            sqlx::query(
                r#"
                INSERT INTO questions (question, answer, category, difficulty)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&question.question)
            .bind(&question.answer)
            .bind(imported_category(&category_ids, question.category))
            .bind(question.difficulty)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Cannot import question {}", question.id))?;
        }

        tx.commit().await?;
        Ok(())
    }
}

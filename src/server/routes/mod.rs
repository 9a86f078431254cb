mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use axum::extract::{FromRequest, FromRequestParts};
use axum::Json;
use serde::Serialize;

use crate::db::{Category, Question};
use crate::error::ApiError;
use crate::server::pagination::paginate;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

pub type ApiResponse<T> = Result<Json<T>, ApiError>;

// The extractors below only differ from axum's in how they reject: always with
// the JSON error envelope.

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// `{id: type}`, the shape the frontend renders category lists from.
pub fn category_map(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

/// One page of questions plus the size of the full result.
#[derive(Serialize)]
pub struct QuestionsPage {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<BTreeMap<i64, String>>,
    current_category: Option<i64>,
    questions: Vec<Question>,
    total_questions: usize,
}

impl QuestionsPage {
    /// Fails with 404 when the requested page holds nothing.
    pub fn new(
        all: &[Question],
        page: i64,
        current_category: Option<i64>,
    ) -> Result<Self, ApiError> {
        let questions = paginate(all, page);
        if questions.is_empty() {
            return Err(ApiError::NotFound);
        }
        Ok(Self {
            success: true,
            categories: None,
            current_category,
            questions: questions.to_vec(),
            total_questions: all.len(),
        })
    }

    pub fn with_categories(mut self, categories: BTreeMap<i64, String>) -> Self {
        self.categories = Some(categories);
        self
    }
}

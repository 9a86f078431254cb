use anyhow::anyhow;
use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;

use crate::{
    db::{DynStore, NewQuestion},
    error::ApiError,
    server::{app::AppState, deserializers::empty_string_as_none, pagination::PageQuery},
    telemetry::QUESTION_WRITES,
};

use super::{category_map, ApiResponse, AppJson, AppPath, AppQuery, QuestionsPage};

#[derive(Deserialize)]
struct QuestionSubmission {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    question: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
}

impl TryFrom<QuestionSubmission> for NewQuestion {
    type Error = anyhow::Error;

    fn try_from(submission: QuestionSubmission) -> Result<Self, Self::Error> {
        let missing = |field: &str| anyhow!("question field `{field}` is required");
        Ok(NewQuestion {
            question: submission.question.ok_or_else(|| missing("question"))?,
            answer: submission.answer.ok_or_else(|| missing("answer"))?,
            difficulty: submission.difficulty.ok_or_else(|| missing("difficulty"))?,
            category: submission.category.ok_or_else(|| missing("category"))?,
        })
    }
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(rename = "searchTerm", default)]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

async fn list_questions(
    State(store): State<DynStore>,
    AppQuery(page): AppQuery<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let questions = store.list_questions().await?;
    let body = QuestionsPage::new(&questions, page.number(), None)?;
    let categories = category_map(store.list_categories().await?);
    Ok(Json(body.with_categories(categories)))
}

async fn create_question(
    State(store): State<DynStore>,
    AppJson(submission): AppJson<QuestionSubmission>,
) -> ApiResponse<Created> {
    let question = NewQuestion::try_from(submission).map_err(ApiError::Unprocessable)?;
    let id = store
        .create_question(&question)
        .await
        .map_err(ApiError::Unprocessable)?;

    QUESTION_WRITES.with_label_values(&["created"]).inc();
    tracing::info!("Created question {id} in category {}", question.category);
    Ok(Json(Created {
        success: true,
        created: id,
    }))
}

async fn delete_question(
    State(store): State<DynStore>,
    AppPath(id): AppPath<i64>,
) -> ApiResponse<Deleted> {
    if store.get_question(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    let deleted = store
        .delete_question(id)
        .await
        .map_err(ApiError::Unprocessable)?;
    // removed by someone else between the lookup and the delete
    if !deleted {
        return Err(ApiError::NotFound);
    }

    QUESTION_WRITES.with_label_values(&["deleted"]).inc();
    tracing::info!("Deleted question {id}");
    Ok(Json(Deleted {
        success: true,
        deleted: id,
    }))
}

async fn search_questions(
    State(store): State<DynStore>,
    AppQuery(page): AppQuery<PageQuery>,
    AppJson(request): AppJson<SearchRequest>,
) -> ApiResponse<QuestionsPage> {
    let term = request
        .search_term
        .filter(|term| !term.is_empty())
        .ok_or_else(|| ApiError::unprocessable(anyhow!("searchTerm is required")))?;

    let questions = store.search_questions(&term).await?;
    tracing::debug!("Search for {term:?} matched {} questions", questions.len());
    Ok(Json(QuestionsPage::new(&questions, page.number(), None)?))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}

use anyhow::anyhow;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;

use crate::{
    db::{DynStore, Question},
    error::ApiError,
    quiz::{pick_unasked, restricted_category},
    server::app::AppState,
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::{ApiResponse, AppJson};

#[derive(Deserialize)]
struct QuizCategory {
    // the frontend also sends `type`, which is not needed here
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    id: Option<i64>,
}

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    quiz_category: Option<QuizCategory>,
    #[serde(default)]
    previous_questions: Option<Vec<i64>>,
}

#[derive(Serialize)]
struct QuizBody {
    success: bool,
    question: Option<Question>,
}

async fn next_question(
    State(store): State<DynStore>,
    AppJson(request): AppJson<QuizRequest>,
) -> ApiResponse<QuizBody> {
    let category = request
        .quiz_category
        .ok_or_else(|| ApiError::unprocessable(anyhow!("quiz_category is required")))?;

    let (candidates, label) = match restricted_category(category.id) {
        Some(id) => (store.questions_in_category(id).await?, id.to_string()),
        None => (store.list_questions().await?, "all".to_owned()),
    };

    let previous = request.previous_questions.unwrap_or_default();
    let question = pick_unasked(candidates, &previous, &mut rand::rng());
    match &question {
        Some(q) => {
            QUIZ_QUESTIONS_SERVED.with_label_values(&[label.as_str()]).inc();
            tracing::debug!("Serving question {} for category {label}", q.id);
        }
        None => tracing::debug!(
            "Quiz for category {label} finished after {} questions",
            previous.len()
        ),
    }

    Ok(Json(QuizBody {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}

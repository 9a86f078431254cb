use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{
    db::DynStore,
    error::ApiError,
    server::{app::AppState, pagination::PageQuery},
};

use super::{category_map, ApiResponse, AppPath, AppQuery, QuestionsPage};

#[derive(Serialize)]
struct CategoriesBody {
    success: bool,
    categories: BTreeMap<i64, String>,
}

async fn get_categories(State(store): State<DynStore>) -> ApiResponse<CategoriesBody> {
    let categories = category_map(store.list_categories().await?);
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesBody {
        success: true,
        categories,
    }))
}

async fn category_questions(
    State(store): State<DynStore>,
    AppPath(id): AppPath<i64>,
    AppQuery(page): AppQuery<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let questions = store.questions_in_category(id).await?;
    Ok(Json(QuestionsPage::new(&questions, page.number(), Some(id))?))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{assert_error, TestApp, CATEGORIES, TOTAL_QUESTIONS};

#[tokio::test]
async fn get_paginated_questions() {
    let app = TestApp::seeded().await;

    let (status, json) = app.get("/questions?page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["total_questions"], TOTAL_QUESTIONS);
    assert_eq!(json["questions"].as_array().unwrap().len(), TOTAL_QUESTIONS - 10);
    assert_eq!(json["categories"].as_object().unwrap().len(), CATEGORIES.len());
    assert!(json["current_category"].is_null());
}

#[tokio::test]
async fn first_page_is_the_default() {
    let app = TestApp::seeded().await;

    let (status, json) = app.get("/questions").await;
    assert_eq!(status, StatusCode::OK);
    let questions = json["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 10);
    let first = &questions[0];
    for field in ["id", "question", "answer", "category", "difficulty"] {
        assert!(first.get(field).is_some(), "missing {field}");
    }

    let (status, fallback) = app.get("/questions?page=second").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fallback["questions"], json["questions"]);
}

#[tokio::test]
async fn get_paginated_questions_404_for_invalid_page() {
    let app = TestApp::seeded().await;

    let (status, json) = app.get("/questions?page=1000").await;
    assert_error(status, &json, StatusCode::NOT_FOUND, "not found");

    let (status, json) = app.get("/questions?page=0").await;
    assert_error(status, &json, StatusCode::NOT_FOUND, "not found");
}

#[tokio::test]
async fn get_questions_404_when_store_is_empty() {
    let app = TestApp::empty().await;

    let (status, json) = app.get("/questions").await;

    assert_error(status, &json, StatusCode::NOT_FOUND, "not found");
}

#[tokio::test]
async fn delete_question_removes_it_for_good() {
    let app = TestApp::seeded().await;
    let (_, created) = app
        .post_json(
            "/questions",
            json!({
                "question": "Will this question be deleted?",
                "answer": "Yes it will",
                "difficulty": 1,
                "category": app.category("Art"),
            }),
        )
        .await;
    let id = created["created"].as_i64().unwrap();

    let (status, json) = app.delete(&format!("/questions/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["deleted"], id);
    assert!(app.store.get_question(id).await.unwrap().is_none());

    let (status, json) = app.delete(&format!("/questions/{id}")).await;
    assert_error(status, &json, StatusCode::NOT_FOUND, "not found");
}

#[tokio::test]
async fn delete_question_404_for_unknown_id() {
    let app = TestApp::seeded().await;

    let (status, json) = app.delete("/questions/123155").await;
    assert_error(status, &json, StatusCode::NOT_FOUND, "not found");

    let (status, json) = app.delete("/questions/not-a-number").await;
    assert_error(status, &json, StatusCode::NOT_FOUND, "not found");
}

#[tokio::test]
async fn create_question() {
    let app = TestApp::seeded().await;
    let sports = app.category("Sports");

    let (status, json) = app
        .post_json(
            "/questions",
            json!({
                "question": "Was Batman cool?",
                "answer": "No, he was a bat.",
                "difficulty": 3,
                "category": sports,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    let id = json["created"].as_i64().expect("created should be a number");
    let stored = app.store.get_question(id).await.unwrap().unwrap();
    assert_eq!(stored.question, "Was Batman cool?");
    assert_eq!(stored.category, sports);
    assert_eq!(stored.difficulty, 3);
}

#[tokio::test]
async fn create_question_accepts_numbers_sent_as_strings() {
    let app = TestApp::seeded().await;

    let (status, json) = app
        .post_json(
            "/questions",
            json!({
                "question": "Is this from a form?",
                "answer": "Yes",
                "difficulty": "2",
                "category": "4",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let id = json["created"].as_i64().unwrap();
    let stored = app.store.get_question(id).await.unwrap().unwrap();
    assert_eq!((stored.category, stored.difficulty), (4, 2));
}

#[tokio::test]
async fn create_question_422_without_any_required_field() {
    let app = TestApp::seeded().await;
    let complete = json!({
        "question": "My super quizzy new question?",
        "answer": "Definitely the correct answer.",
        "difficulty": 2,
        "category": app.category("Science"),
    });

    for field in ["question", "answer", "difficulty", "category"] {
        let mut missing = complete.clone();
        missing.as_object_mut().unwrap().remove(field);
        let mut empty = complete.clone();
        empty[field] = json!("");

        for body in [missing, empty] {
            let (status, json) = app.post_json("/questions", body.clone()).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body {body}");
            assert_error(status, &json, StatusCode::UNPROCESSABLE_ENTITY, "unprocessable");
        }
    }

    assert_eq!(
        app.store.list_questions().await.unwrap().len(),
        TOTAL_QUESTIONS
    );
}

#[tokio::test]
async fn create_question_422_with_wrong_field_type() {
    let app = TestApp::seeded().await;

    let (status, json) = app
        .post_json(
            "/questions",
            json!({"question": "Q?", "answer": "A", "difficulty": "hard", "category": 1}),
        )
        .await;

    assert_error(status, &json, StatusCode::UNPROCESSABLE_ENTITY, "unprocessable");
}

#[tokio::test]
async fn create_question_400_with_malformed_body() {
    let app = TestApp::seeded().await;

    let (status, json) = app
        .post_raw("/questions", "{\"question\": ".to_string())
        .await;

    assert_error(status, &json, StatusCode::BAD_REQUEST, "bad request");
}

#[tokio::test]
async fn search_questions() {
    let app = TestApp::seeded().await;

    let (status, json) = app
        .post_json("/questions/search", json!({"searchTerm": "TiTlE"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["total_questions"], 1);
    assert!(json["current_category"].is_null());
    assert_eq!(json["questions"][0]["answer"], "Edward Scissorhands");
}

#[tokio::test]
async fn search_questions_is_paginated() {
    let app = TestApp::seeded().await;

    let (status, json) = app
        .post_json("/questions/search", json!({"searchTerm": "a"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    let total = json["total_questions"].as_u64().unwrap() as usize;
    let shown = json["questions"].as_array().unwrap().len();
    assert!(total > 10);
    assert_eq!(shown, 10);

    let (status, json) = app
        .post_json("/questions/search?page=2", json!({"searchTerm": "a"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["questions"].as_array().unwrap().len(), total - 10);
}

#[tokio::test]
async fn search_matches_question_text_only() {
    let app = TestApp::seeded().await;

    // an answer, not part of any question
    let (status, json) = app
        .post_json("/questions/search", json!({"searchTerm": "Scissorhands"}))
        .await;

    assert_error(status, &json, StatusCode::NOT_FOUND, "not found");
}

#[tokio::test]
async fn search_questions_404_with_no_results() {
    let app = TestApp::seeded().await;

    let (status, json) = app
        .post_json(
            "/questions/search",
            json!({"searchTerm": "random_test_phrase_that_doesnt_exist"}),
        )
        .await;

    assert_error(status, &json, StatusCode::NOT_FOUND, "not found");
}

#[tokio::test]
async fn search_questions_422_without_search_term() {
    let app = TestApp::seeded().await;

    let (status, json) = app
        .post_json("/questions/search", json!({"searchTerm": ""}))
        .await;
    assert_error(status, &json, StatusCode::UNPROCESSABLE_ENTITY, "unprocessable");

    let (status, json) = app.post_json("/questions/search", json!({})).await;
    assert_error(status, &json, StatusCode::UNPROCESSABLE_ENTITY, "unprocessable");
}

#[tokio::test]
async fn search_ignores_case_beyond_ascii() {
    let app = TestApp::seeded().await;
    let (status, created) = app
        .post_json(
            "/questions",
            json!({"question": "Où est l'ÉCOLE?", "answer": "Ici", "difficulty": 1, "category": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app
        .post_json("/questions/search", json!({"searchTerm": "école"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_questions"], 1);
    assert_eq!(json["questions"][0]["id"], created["created"]);
}

#[tokio::test]
async fn create_question_422_when_store_rejects_write() {
    let app = TestApp::read_only().await;

    let (status, json) = app
        .post_json(
            "/questions",
            json!({"question": "Saved?", "answer": "No", "difficulty": 1, "category": 1}),
        )
        .await;

    assert_error(status, &json, StatusCode::UNPROCESSABLE_ENTITY, "unprocessable");
}

#[tokio::test]
async fn delete_question_422_when_store_rejects_delete() {
    let app = TestApp::read_only().await;
    let id = app.store.list_questions().await.unwrap()[0].id;

    let (status, json) = app.delete(&format!("/questions/{id}")).await;

    assert_error(status, &json, StatusCode::UNPROCESSABLE_ENTITY, "unprocessable");
    assert!(app.store.get_question(id).await.unwrap().is_some());
}

#[tokio::test]
async fn reads_500_when_store_is_unavailable() {
    let app = TestApp::unavailable().await;

    for uri in ["/questions", "/categories", "/categories/1/questions"] {
        let (status, json) = app.get(uri).await;
        assert_error(
            status,
            &json,
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error",
        );
    }

    let (status, json) = app
        .post_json("/questions/search", json!({"searchTerm": "title"}))
        .await;
    assert_error(
        status,
        &json,
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error",
    );
}

// tests/lessons_api_test.rs

use intruct_client::{
    IntructClient, config::ClientConfig, error::ErrorCode, models::CourseKey,
    progress::LessonProgressStore, settings::SettingsStore,
};

fn test_client(base_url: &str) -> (IntructClient, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = IntructClient::with_stores(
        ClientConfig::with_base_url(base_url),
        LessonProgressStore::new(dir.path().join("progress.json")),
        SettingsStore::new(dir.path().join("settings.json")),
    )
    .expect("client");
    (client, dir)
}

#[tokio::test]
async fn lesson_content_becomes_a_single_material_block() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/lessons/7")
        .match_header("authorization", "Bearer jwt")
        .with_status(200)
        .with_body(
            r##"{"id": 7, "title": "Ownership", "content": "# Moves\nValues move.",
                "quizzes": [
                    {"id": 3, "question": "What moves?",
                     "options": ["values", "banks"], "correct_index": 0},
                    {"question": "", "options": ["dropped"]}
                ]}"##,
        )
        .create_async()
        .await;

    let (client, _dir) = test_client(&server.url());
    let lesson = client.lessons().lesson_by_id(7, "jwt").await.expect("lesson");

    assert_eq!(lesson.id, "7");
    assert_eq!(lesson.materials.len(), 1);
    assert_eq!(lesson.materials[0].content, "# Moves\nValues move.");
    // The empty quiz question is filtered out.
    assert_eq!(lesson.questions.len(), 1);
    assert_eq!(lesson.questions[0].id, "3");
    assert_eq!(lesson.questions[0].correct_answer, 0);
}

#[tokio::test]
async fn lesson_without_id_is_an_invalid_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/lessons/7")
        .with_status(200)
        .with_body(r#"{"title": "orphan"}"#)
        .create_async()
        .await;

    let (client, _dir) = test_client(&server.url());
    let err = client.lessons().lesson_by_id(7, "jwt").await.unwrap_err();
    assert_eq!(err.status, 500);
    assert_eq!(err.code, ErrorCode::Unknown);
    assert_eq!(err.message, "Invalid lesson response");
}

#[tokio::test]
async fn finish_lesson_hits_the_finish_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/lessons/7/finish")
        .match_header("authorization", "Bearer jwt")
        .with_status(200)
        .create_async()
        .await;

    let (client, _dir) = test_client(&server.url());
    client.lessons().finish_lesson(7, "jwt").await.expect("finish");
    mock.assert_async().await;
}

#[tokio::test]
async fn finish_lesson_error_carries_backend_detail() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", "/lessons/7/finish")
        .with_status(500)
        .with_body(r#"{"detail": "lesson is locked"}"#)
        .create_async()
        .await;

    let (client, _dir) = test_client(&server.url());
    let err = client.lessons().finish_lesson(7, "jwt").await.unwrap_err();
    assert_eq!(err.status, 500);
    assert_eq!(err.message, "lesson is locked");
}

#[tokio::test]
async fn optimistic_local_completion_bridges_a_slow_finish_call() {
    // The lesson is marked locally before the server's finish call is
    // processed; course progress must already reflect it.
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/courses/42")
        .with_status(200)
        .with_body(r#"{"id": 42, "lessons_number": 4, "finished_lessons": 0, "state": "created"}"#)
        .create_async()
        .await;

    let (client, _dir) = test_client(&server.url());
    client
        .progress()
        .mark_lesson_completed(&CourseKey::Backend(42), "lesson-10");

    let course = client.courses().course_by_id("42", "jwt").await.expect("course");
    assert_eq!(course.progress, 1);

    // Sign-out drops the optimistic state and the in-memory map with it.
    std::fs::remove_file(_dir.path().join("progress.json")).expect("remove");
    client.sign_out();
    let count = client.progress().completed_count(&CourseKey::Backend(42));
    assert_eq!(count, 0);
}

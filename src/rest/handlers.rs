use crate::tasks::{Task, TaskCreateInput, TaskStorage, TaskUpdateInput};
use crate::types::HandsOnError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct TaskList {
    tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct TaskEnvelope {
    task: Task,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: error.into() }))
}

fn rejection_error(rejection: JsonRejection) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, rejection.body_text())
}

fn storage_error(err: HandsOnError) -> ApiError {
    match err {
        HandsOnError::TaskNotFound(_) => api_error(StatusCode::NOT_FOUND, "Task not found"),
        other => api_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

#[instrument(skip(storage))]
pub async fn list_tasks(State(storage): State<Arc<TaskStorage>>) -> Json<TaskList> {
    Json(TaskList {
        tasks: storage.get_all().await,
    })
}

#[instrument(skip(storage))]
pub async fn get_task(
    State(storage): State<Arc<TaskStorage>>,
    Path(id): Path<String>,
) -> Result<Json<TaskEnvelope>, ApiError> {
    let task = storage
        .get_by_id(&id)
        .await
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Task not found"))?;
    Ok(Json(TaskEnvelope { task }))
}

#[instrument(skip(storage, body))]
pub async fn create_task(
    State(storage): State<Arc<TaskStorage>>,
    body: Result<Json<TaskCreateInput>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskEnvelope>), ApiError> {
    let Json(input) = body.map_err(rejection_error)?;
    if input.title.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Title is required"));
    }
    let task = storage.create(input).await.map_err(storage_error)?;
    Ok((StatusCode::CREATED, Json(TaskEnvelope { task })))
}

/// The id is checked before the body, so an unknown task is always a 404
#[instrument(skip(storage, body))]
pub async fn update_task(
    State(storage): State<Arc<TaskStorage>>,
    Path(id): Path<String>,
    body: Result<Json<TaskUpdateInput>, JsonRejection>,
) -> Result<Json<TaskEnvelope>, ApiError> {
    if storage.get_by_id(&id).await.is_none() {
        return Err(api_error(StatusCode::NOT_FOUND, "Task not found"));
    }
    let Json(input) = body.map_err(rejection_error)?;
    let input = TaskUpdateInput { id, ..input };
    let task = storage.update(input).await.map_err(storage_error)?;
    Ok(Json(TaskEnvelope { task }))
}

#[instrument(skip(storage))]
pub async fn delete_task(
    State(storage): State<Arc<TaskStorage>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    storage.delete(&id).await.map_err(storage_error)?;
    Ok(Json(MessageResponse {
        message: "Task deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::rest::create_router;
    use crate::tasks::TaskStorage;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app(dir: &TempDir) -> axum::Router {
        create_router(Arc::new(TaskStorage::new(dir.path().join("tasks.json"))))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn create(app: &axum::Router, title: &str) -> String {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/tasks", json!({"title": title})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        body["task"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn list_starts_empty() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        let response = app.oneshot(empty_request("GET", "/tasks")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"tasks": []}));
    }

    #[tokio::test]
    async fn create_and_fetch() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);
        let id = create(&app, "Read chapter 1").await;

        let response = app
            .clone()
            .oneshot(empty_request("GET", &format!("/tasks/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["task"]["title"], "Read chapter 1");
        assert_eq!(body["task"]["status"], "todo");
    }

    #[tokio::test]
    async fn create_requires_title() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        let response = app
            .oneshot(json_request("POST", "/tasks", json!({"title": ""})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Title is required");
    }

    #[tokio::test]
    async fn update_sets_status() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);
        let id = create(&app, "Read chapter 1").await;

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/tasks/{}", id),
                json!({"status": "in-progress"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["task"]["status"], "in-progress");
    }

    #[tokio::test]
    async fn missing_task_is_404() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        for request in [
            empty_request("GET", "/tasks/nope"),
            empty_request("DELETE", "/tasks/nope"),
            json_request("PUT", "/tasks/nope", json!({"title": "x"})),
        ] {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(json_body(response).await["error"], "Task not found");
        }
    }

    #[tokio::test]
    async fn unknown_id_wins_over_bad_body() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        let response = app
            .oneshot(json_request("PUT", "/tasks/nope", json!({"status": "bogus"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Task not found");
    }

    #[tokio::test]
    async fn bad_bodies_are_400_with_error() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);
        let id = create(&app, "Read chapter 1").await;

        let no_content_type = Request::builder()
            .method("POST")
            .uri("/tasks")
            .body(Body::from(r#"{"title":"x"}"#))
            .unwrap();

        for request in [
            json_request("POST", "/tasks", json!({"title": 42})),
            no_content_type,
            json_request("PUT", &format!("/tasks/{}", id), json!({"status": "bogus"})),
        ] {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert!(json_body(response).await["error"].is_string());
        }
    }

    #[tokio::test]
    async fn delete_removes_task() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);
        let id = create(&app, "Temporary").await;

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/tasks/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["message"], "Task deleted");

        let response = app.oneshot(empty_request("GET", "/tasks")).await.unwrap();
        assert_eq!(json_body(response).await, json!({"tasks": []}));
    }
}

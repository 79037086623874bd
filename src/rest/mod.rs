//! The task API as a plain REST service
//!
//! Serves the same [`TaskStorage`] the task manager MCP server uses, so the
//! two styles can be compared side by side.

mod handlers;

use crate::tasks::TaskStorage;
use anyhow::Result;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use handlers::ErrorResponse;

pub fn create_router(storage: Arc<TaskStorage>) -> Router {
    Router::new()
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(storage)
}

/// Serve the REST API on localhost until the process is stopped
pub async fn serve(storage: Arc<TaskStorage>, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("REST API listening on http://{}", addr);
    info!("  GET    /tasks       list tasks");
    info!("  GET    /tasks/{{id}}  get one task");
    info!("  POST   /tasks       create a task");
    info!("  PUT    /tasks/{{id}}  update a task");
    info!("  DELETE /tasks/{{id}}  delete a task");

    axum::serve(listener, create_router(storage)).await?;
    Ok(())
}

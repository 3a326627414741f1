//! HTTP server for the TODO API
//!
//! Wires the `/todos` and `/healthz` routes onto axum with request logging
//! and panic recovery, and serves them with graceful shutdown.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{FixedOffset, Offset, Utc};
use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    error::ApiError, handler::TodoHandler, recovery::panic_recovery_layer,
    request_logger::request_logging_middleware, serialization::*,
};
use todo_core::{CreateTodoRequest, DeleteTodoRequest, TodoService, UpdateTodoRequest};

/// Runtime options for the HTTP layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerOptions {
    /// Offset used to render timestamps
    pub utc_offset: FixedOffset,
    /// Ping the store from `/healthz`
    pub deep_health: bool,
    /// Cancel in-flight store calls after this long
    pub request_timeout: Option<Duration>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            deep_health: false,
            request_timeout: None,
        }
    }
}

/// Shared server state for handlers
pub struct AppState<S> {
    pub handler: TodoHandler<S>,
    pub deep_health: bool,
}

/// TODO HTTP server
pub struct TodoServer<S> {
    handler: TodoHandler<S>,
    deep_health: bool,
}

impl<S: TodoService + 'static> TodoServer<S> {
    pub fn new(service: Arc<S>, options: ServerOptions) -> Self {
        Self {
            handler: TodoHandler::new(service, options.utc_offset, options.request_timeout),
            deep_health: options.deep_health,
        }
    }

    /// Bind `addr` and serve until the process is killed
    pub async fn serve(self, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| format!("Invalid address '{addr}': {e}"))?;

        let listener = TcpListener::bind(socket_addr).await?;
        self.serve_with_shutdown(listener, std::future::pending())
            .await?;

        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// In-flight requests are allowed to finish before this returns.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(local_addr) = listener.local_addr() {
            info!(%local_addr, "Starting TODO server");
        }

        axum::serve(listener, self.create_router())
            .with_graceful_shutdown(shutdown)
            .await
    }

    /// Create the router with all endpoints
    pub fn create_router(self) -> Router {
        let state = Arc::new(AppState {
            handler: self.handler,
            deep_health: self.deep_health,
        });

        // Unlisted methods on a known path get 405 from the method router
        Router::new()
            .route(
                "/todos",
                get(read_handler::<S>)
                    .post(create_handler::<S>)
                    .put(update_handler::<S>)
                    .delete(delete_handler::<S>),
            )
            .route("/healthz", get(healthz_handler::<S>))
            .layer(panic_recovery_layer())
            .layer(middleware::from_fn(request_logging_middleware))
            .with_state(state)
    }
}

async fn create_handler<S: TodoService + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<Json<CreateTodoResponse>, ApiError> {
    let request: CreateTodoRequest = deserialize_body(&body)?;
    Ok(Json(state.handler.create_todo(request).await?))
}

async fn read_handler<S: TodoService + 'static>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<ReadTodoQuery>, QueryRejection>,
) -> Result<Json<ReadTodoResponse>, ApiError> {
    let Query(query) = query?;
    Ok(Json(state.handler.read_todos(query).await?))
}

async fn update_handler<S: TodoService + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<Json<UpdateTodoResponse>, ApiError> {
    let request: UpdateTodoRequest = deserialize_body(&body)?;
    Ok(Json(state.handler.update_todo(request).await?))
}

async fn delete_handler<S: TodoService + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<Json<DeleteTodoResponse>, ApiError> {
    let request: DeleteTodoRequest = deserialize_body(&body)?;
    Ok(Json(state.handler.delete_todos(request).await?))
}

async fn healthz_handler<S: TodoService + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Response {
    if state.deep_health {
        if let Err(e) = state.handler.check_store().await {
            tracing::warn!(error = %e, "Health check failed");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthzResponse::unavailable()),
            )
                .into_response();
        }
    }

    Json(HealthzResponse::ok()).into_response()
}

//! TODO request handler
//!
//! Bridges decoded HTTP payloads to a `TodoService`: validates at the
//! boundary, scopes each call with a cancellation token and renders the
//! result for the response.

use crate::{error::ApiError, serialization::*};
use chrono::FixedOffset;
use std::{sync::Arc, time::Duration};
use todo_core::{
    CancellationToken, CreateTodoRequest, DeleteTodoRequest, TodoService, TodoValidator,
    UpdateTodoRequest,
};
use tokio_util::sync::DropGuard;

/// Cancellation scope for a single request
///
/// The token fires when the scope is dropped (request finished or its
/// future was abandoned after a client disconnect) or when the optional
/// deadline passes.
pub struct RequestScope {
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl RequestScope {
    pub fn new(timeout: Option<Duration>) -> Self {
        let cancel = CancellationToken::new();

        if let Some(limit) = timeout {
            let timer = cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(limit) => {
                        tracing::warn!(timeout_ms = limit.as_millis() as u64, "Request deadline exceeded");
                        timer.cancel();
                    }
                    _ = timer.cancelled() => {}
                }
            });
        }

        Self {
            _guard: cancel.clone().drop_guard(),
            cancel,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Handler that bridges the HTTP routes with a TodoService
pub struct TodoHandler<S> {
    service: Arc<S>,
    offset: FixedOffset,
    request_timeout: Option<Duration>,
}

impl<S> Clone for TodoHandler<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            offset: self.offset,
            request_timeout: self.request_timeout,
        }
    }
}

impl<S> TodoHandler<S> {
    /// Create new handler
    ///
    /// # Arguments
    /// * `offset` - Display offset for rendered timestamps
    /// * `request_timeout` - Deadline after which an in-flight call is cancelled
    pub fn new(service: Arc<S>, offset: FixedOffset, request_timeout: Option<Duration>) -> Self {
        Self {
            service,
            offset,
            request_timeout,
        }
    }

    /// Get a clone of the service Arc
    pub fn service(&self) -> Arc<S> {
        Arc::clone(&self.service)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn scope(&self) -> RequestScope {
        RequestScope::new(self.request_timeout)
    }
}

impl<S: TodoService> TodoHandler<S> {
    pub async fn create_todo(
        &self,
        request: CreateTodoRequest,
    ) -> Result<CreateTodoResponse, ApiError> {
        TodoValidator::validate_create(&request)?;

        let scope = self.scope();
        let todo = self
            .service
            .create(scope.token(), &request.subject, &request.description)
            .await?;

        Ok(CreateTodoResponse {
            todo: TodoView::from_todo(&todo, &self.offset),
        })
    }

    pub async fn read_todos(&self, query: ReadTodoQuery) -> Result<ReadTodoResponse, ApiError> {
        let request =
            TodoValidator::parse_read_query(query.prev_id.as_deref(), query.size.as_deref())?;

        let scope = self.scope();
        let todos = self
            .service
            .read(scope.token(), request.prev_id, request.size)
            .await?;

        Ok(ReadTodoResponse {
            todos: todos
                .iter()
                .map(|todo| TodoView::from_todo(todo, &self.offset))
                .collect(),
        })
    }

    pub async fn update_todo(
        &self,
        request: UpdateTodoRequest,
    ) -> Result<UpdateTodoResponse, ApiError> {
        TodoValidator::validate_update(&request)?;

        let scope = self.scope();
        let todo = self
            .service
            .update(
                scope.token(),
                request.id,
                &request.subject,
                &request.description,
            )
            .await?;

        Ok(UpdateTodoResponse {
            todo: TodoView::from_todo(&todo, &self.offset),
        })
    }

    pub async fn delete_todos(
        &self,
        request: DeleteTodoRequest,
    ) -> Result<DeleteTodoResponse, ApiError> {
        TodoValidator::validate_delete(&request)?;

        let scope = self.scope();
        self.service.delete(scope.token(), &request.ids).await?;

        Ok(DeleteTodoResponse::default())
    }

    /// Ping the backing store
    pub async fn check_store(&self) -> Result<(), ApiError> {
        let scope = self.scope();
        self.service.health_check(scope.token()).await?;
        Ok(())
    }
}

use std::{sync::Arc, time::Instant};

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use crate::{
    mutation_builder::{build_insert, CreationPayload},
    query_compiler::{compile_read, ProjectionRoot},
};

use super::{
    errors::ApiError,
    models::{
        CommentsQuery, CompileRequest, CompileResponse, CreateGroupRequest,
        CreateOrganizationRequest, CreateUserRequest, PostsQuery,
    },
    response_normalizer::{
        normalize_documents, normalize_page, normalize_place, AUTHOR_TYPE_FIELD, PAGE_TYPE_FIELD,
    },
    AppState,
};

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "socialgraph",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn compile(root: &ProjectionRoot) -> Result<String, ApiError> {
    let start = Instant::now();
    let statement = compile_read(root)?;
    log::debug!(
        "Compiled {:?} in {:.3}ms",
        root,
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(statement)
}

async fn fetch_all(app_state: &AppState, root: ProjectionRoot) -> Result<Vec<Value>, ApiError> {
    let statement = compile(&root)?;
    let documents = app_state.executor.fetch(&statement).await?;
    log::debug!("{:?} returned {} documents", root, documents.len());
    Ok(documents)
}

pub async fn page_list_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let documents = fetch_all(&app_state, ProjectionRoot::PageList).await?;
    Ok(Json(normalize_documents(documents, PAGE_TYPE_FIELD)))
}

pub async fn location_handler(
    State(app_state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let documents = fetch_all(&app_state, ProjectionRoot::PagesInPlace { place_id }).await?;
    Ok(Json(documents.into_iter().map(normalize_place).collect()))
}

/// Serves `/api/user`, `/api/organization` and `/api/group` alike: the
/// variant is resolved from the data, not from the route.
pub async fn page_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Option<Value>>, ApiError> {
    let statement = compile(&ProjectionRoot::Page { id })?;
    let document = app_state.executor.fetch_one(&statement).await?;
    let max_depth = app_state.config.max_hierarchy_depth;
    Ok(Json(document.map(|doc| normalize_page(doc, max_depth))))
}

pub async fn posts_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<PostsQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let page_id = query.page_id.ok_or(ApiError::MissingParameter("pageId"))?;
    let documents = fetch_all(&app_state, ProjectionRoot::PostsByPage { page_id }).await?;
    Ok(Json(normalize_documents(documents, AUTHOR_TYPE_FIELD)))
}

pub async fn comments_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<CommentsQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let post_id = query.post_id.ok_or(ApiError::MissingParameter("postId"))?;
    let documents = fetch_all(&app_state, ProjectionRoot::CommentsByPost { post_id }).await?;
    Ok(Json(normalize_documents(documents, AUTHOR_TYPE_FIELD)))
}

async fn create(app_state: &AppState, payload: CreationPayload) -> Result<Json<Value>, ApiError> {
    let kind = payload.kind;
    let statement = build_insert(&payload)?;
    app_state.executor.write(&statement).await?;
    log::info!("Created {}", kind);
    Ok(Json(Value::Null))
}

pub async fn create_user_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    create(&app_state, request.into()).await
}

pub async fn create_organization_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<CreateOrganizationRequest>,
) -> Result<Json<Value>, ApiError> {
    create(&app_state, request.into()).await
}

pub async fn create_group_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<Json<Value>, ApiError> {
    create(&app_state, request.into()).await
}

/// Return the statement an endpoint would run, without running it.
pub async fn compile_handler(
    Json(request): Json<CompileRequest>,
) -> Result<Json<CompileResponse>, ApiError> {
    let statement = match request {
        CompileRequest::Pages => compile(&ProjectionRoot::PageList)?,
        CompileRequest::Page { id } => compile(&ProjectionRoot::Page { id })?,
        CompileRequest::Posts { page_id } => {
            compile(&ProjectionRoot::PostsByPage { page_id })?
        }
        CompileRequest::Comments { post_id } => {
            compile(&ProjectionRoot::CommentsByPost { post_id })?
        }
        CompileRequest::Location { place_id } => {
            compile(&ProjectionRoot::PagesInPlace { place_id })?
        }
        CompileRequest::Create { kind, payload } => {
            build_insert(&CreationPayload::from_json_object(kind, &payload)?)?
        }
    };
    Ok(Json(CompileResponse { statement }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::server::executor::{ExecutionError, MockStatementExecutor};
    use axum::http::StatusCode;
    use mockall::predicate::function;

    fn state(executor: MockStatementExecutor) -> State<Arc<AppState>> {
        State(Arc::new(AppState {
            executor: Arc::new(executor),
            config: ServerConfig::default(),
        }))
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates_unmodified() {
        let mut executor = MockStatementExecutor::new();
        executor
            .expect_fetch()
            .times(1)
            .returning(|_| Err(ExecutionError::Query("[QEX7] timeout".to_string())));

        let error = page_list_handler(state(executor)).await.unwrap_err();
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.to_string(), "[QEX7] timeout");
    }

    #[tokio::test]
    async fn test_page_handler_runs_single_page_statement() {
        let mut executor = MockStatementExecutor::new();
        executor
            .expect_fetch_one()
            .with(function(|statement: &str| {
                statement.contains("$page has page-id \"p7\";")
                    && statement.contains("parent_places_linked_list")
            }))
            .times(1)
            .returning(|_| Ok(None));

        let Json(document) = page_handler(state(executor), Path("p7".to_string()))
            .await
            .unwrap();
        assert!(document.is_none());
    }

    #[tokio::test]
    async fn test_invalid_payload_never_reaches_executor() {
        let mut executor = MockStatementExecutor::new();
        executor.expect_write().times(0);

        let error = create_group_handler(state(executor), Json(CreateGroupRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }
}

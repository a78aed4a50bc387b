//! Category routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use balanco_db::CategoryRepository;
use balanco_db::entities::categories;
use balanco_db::repositories::CategoryInput;
use serde::Deserialize;
use uuid::Uuid;

use super::MessageResponse;
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{ApiJson, ApiPath};
use crate::middleware::OrgContext;

/// Request body for creating or updating a category.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    /// Name.
    #[serde(default)]
    pub name: String,
    /// `#RRGGBB` color.
    #[serde(default)]
    pub color: Option<String>,
}

impl From<CategoryRequest> for CategoryInput {
    fn from(req: CategoryRequest) -> Self {
        Self {
            name: req.name,
            color: req.color,
        }
    }
}

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
}

async fn list_categories(
    State(state): State<AppState>,
    ctx: OrgContext,
) -> ApiResult<Json<Vec<categories::Model>>> {
    let rows = CategoryRepository::new(state.db.clone())
        .list(ctx.organization_id)
        .await?;
    Ok(Json(rows))
}

async fn create_category(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiJson(body): ApiJson<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<categories::Model>)> {
    ctx.ensure_can_create()?;
    let category = CategoryRepository::new(state.db.clone())
        .create(ctx.organization_id, ctx.user_id, body.into())
        .await?;

    tracing::info!(org_id = %ctx.organization_id, category_id = %category.id, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<CategoryRequest>,
) -> ApiResult<Json<categories::Model>> {
    let category = CategoryRepository::new(state.db.clone())
        .update(ctx.organization_id, id, body.into())
        .await?;
    Ok(Json(category))
}

async fn delete_category(
    State(state): State<AppState>,
    ctx: OrgContext,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    CategoryRepository::new(state.db.clone())
        .delete(ctx.organization_id, id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Categoria excluída com sucesso.",
    }))
}

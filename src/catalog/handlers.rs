use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::{
    dto::{Pagination, ReviewQuery},
    repo_types::{Product, Review},
};
use crate::{auth::extractors::AuthUser, error::ApiError, state::AppState};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/product", get(list_products))
        .route("/product/:id", get(get_product))
        .route("/reviews", get(list_reviews))
}

#[instrument(skip(state, _user))]
pub async fn list_products(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let (limit, offset) = p.clamped();
    let products = state.catalog.list_products(limit, offset).await?;
    Ok(Json(products))
}

#[instrument(skip(state, _user))]
pub async fn get_product(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    match state.catalog.get_product(id).await? {
        Some(product) => Ok(Json(product)),
        None => {
            warn!(%id, "product not found");
            Err(ApiError::NotFound("Product not found".into()))
        }
    }
}

#[instrument(skip(state, _user))]
pub async fn list_reviews(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<ReviewQuery>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let (limit, offset) = q.page().clamped();
    let reviews = state
        .catalog
        .list_reviews(q.product_id, limit, offset)
        .await?;
    Ok(Json(reviews))
}

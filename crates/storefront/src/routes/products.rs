//! Catalog route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;

use tracing::instrument;

use crate::db::{ProductRepository, products::ProductFilter};
use crate::error::AppError;
use crate::models::ProductView;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Exact category filter.
    pub category: Option<String>,
    /// Free-text search over name and description.
    pub q: Option<String>,
    /// When true, only products with an active deal.
    #[serde(default)]
    pub deals: bool,
}

impl ListQuery {
    fn into_filter(self) -> ProductFilter {
        ProductFilter {
            category: self.category.filter(|c| !c.trim().is_empty()),
            query: self.q.filter(|q| !q.trim().is_empty()),
            deals_only: self.deals,
        }
    }
}

/// List catalog products.
///
/// Results are cached for a minute per filter combination; deal windows are
/// re-evaluated at render time so a cached row never shows a stale deal.
///
/// # Route
///
/// `GET /api/products?category=&q=&deals=`
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let filter = query.into_filter();
    let key = filter.cache_key();

    let products = if let Some(cached) = state.catalog_cache().get(&key).await {
        cached
    } else {
        let repo = ProductRepository::new(state.pool());
        let fresh = Arc::new(repo.list(&filter).await?);
        state.catalog_cache().insert(key, fresh.clone()).await;
        fresh
    };

    let now = Utc::now();
    let views: Vec<ProductView> = products
        .iter()
        .map(|p| ProductView::from_product(p, now))
        .collect();

    Ok(Json(views).into_response())
}

/// Product detail by slug.
///
/// # Route
///
/// `GET /api/products/{slug}`
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let repo = ProductRepository::new(state.pool());
    let product = repo
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductView::from_product(&product, Utc::now())).into_response())
}

//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{Product, ProductPage};
use crate::query::ListParams;
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(list_products),
    components(schemas(Product, ProductPage)),
    tags(
        (name = "Products", description = "Product catalogue browsing")
    )
)]
pub struct ApiDoc;

/// Create the products router. Mount it with `nest`, e.g. at `/product`.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products))
        .with_state(shared_service)
}

/// List one page of products
///
/// Filters by name, brand and category substrings and an inclusive price
/// range, then sorts and paginates ten products per page.
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ListParams),
    responses(
        (status = 200, description = "One page of matching products", body = ProductPage),
        (status = 500, description = "Storage failure", body = String, content_type = "text/plain")
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(params): Query<HashMap<String, String>>,
) -> ProductResult<Json<ProductPage>> {
    let page = service.list_products(&params).await?;
    Ok(Json(page))
}

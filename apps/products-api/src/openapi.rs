//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Products API",
        version = "0.1.0",
        description = "Paginated product catalogue with search, filters and price sorting",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    nest(
        (path = "/product", api = domain_products::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product catalogue browsing")
    )
)]
pub struct ApiDoc;

//! OpenAPI documentation generation using utoipa
//!
//! Handlers carry `#[utoipa::path]` annotations; this module stitches them
//! into a single document served at `/api/openapi.json`.

use axum::{Json, response::IntoResponse};
use utoipa::OpenApi;

use crate::models::{CatalogEntryDetails, PokedexIndexView};
use crate::web::responses::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pokédex Search API",
        description = "Paginated, filterable search over a PokeAPI-compatible catalog. \
            Results are always ordered by ascending id and pages are clamped to the \
            available range."
    ),
    tags(
        (name = "pokedex", description = "Search by category, by name, or browse in catalog order"),
        (name = "health", description = "Service health monitoring"),
    ),
    paths(
        crate::web::handlers::pokedex::search_pokedex,
        crate::web::handlers::health::health_check,
    ),
    components(schemas(CatalogEntryDetails, PokedexIndexView, HealthResponse))
)]
pub struct ApiDoc;

/// Serve the OpenAPI specification JSON
pub async fn serve_openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/api/v1/pokedex"));
        assert!(paths.contains_key("/health"));
        assert!(doc["components"]["schemas"]["PokedexIndexView"].is_object());
    }
}

//! Pokédex search handler

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::errors::{AppError, CatalogError};
use crate::models::PokedexIndexView;
use crate::web::{
    AppState, POKEDEX_PATH,
    extractors::SearchParams,
    responses::{ApiResponse, handle_error, handle_result},
};

/// Paginated search over the catalog
///
/// `selectedType` takes precedence over `searchName`; with neither, the
/// catalog is paged in its native order.
#[utoipa::path(
    get,
    path = "/api/v1/pokedex",
    tag = "pokedex",
    params(
        ("searchName" = Option<String>, Query, description = "Case-insensitive name filter; an exact name returns that single entry", example = "pika"),
        ("selectedType" = Option<String>, Query, description = "Category label to filter by", example = "electric"),
        ("page" = Option<u32>, Query, description = "Page number (1-based); clamped to the last page", example = 1),
        ("pageSize" = Option<u32>, Query, description = "Items per page; clamped to the configured maximum", example = 20),
    ),
    responses(
        (status = 200, description = "Search results", body = ApiResponse<PokedexIndexView>),
        (status = 502, description = "The upstream catalog failed or timed out"),
    )
)]
pub async fn search_pokedex(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let service = &state.query_service;
    let query = params.into_query(service.default_page_size(), service.max_page_size());
    debug!("Search request: {:?}", query);

    match tokio::time::timeout(state.request_timeout, state.query_service.search(query)).await {
        Ok(result) => handle_result(result),
        Err(_) => handle_error(AppError::Catalog(CatalogError::Timeout {
            url: POKEDEX_PATH.to_string(),
        }))
        .into_response(),
    }
}

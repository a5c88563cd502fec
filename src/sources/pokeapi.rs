//! PokeAPI catalog client
//!
//! Talks to a PokeAPI-compatible REST endpoint (`https://pokeapi.co/api/v2`
//! by default). Transient failures are retried according to the configured
//! [`RetryConfig`]; a 404 is reported as absence, never as an error.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tracing::{debug, info};
use url::Url;

use super::traits::CatalogClient;
use crate::config::CatalogConfig;
use crate::errors::{CatalogError, CatalogResult};
use crate::models::{CatalogEntryDetails, CatalogEntryRef, EntityId};
use crate::services::bounded_fetch::fetch_details_bounded;
use crate::utils::{RawId, RetryConfig, with_retry};

/// Category labels PokeAPI lists but no entry actually carries
const EXCLUDED_LABELS: &[&str] = &["unknown", "shadow"];

/// Upper bound used when listing every label or name in one request
const LIST_ALL_LABELS_LIMIT: u32 = 1_000;
const LIST_ALL_NAMES_LIMIT: u32 = 100_000;

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ResourceList {
    count: u64,
    #[serde(default)]
    results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct TypeResponse {
    #[serde(default)]
    pokemon: Vec<TypeMember>,
}

#[derive(Debug, Deserialize)]
struct TypeMember {
    pokemon: NamedResource,
}

#[derive(Debug, Deserialize)]
struct LiteResponse {
    id: EntityId,
    name: String,
}

#[derive(Debug, Deserialize)]
struct PokemonResponse {
    id: EntityId,
    name: String,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    base_experience: Option<u32>,
    #[serde(default)]
    types: Vec<TypeSlot>,
    #[serde(default)]
    sprites: Sprites,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    kind: NamedLabel,
}

#[derive(Debug, Deserialize)]
struct NamedLabel {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Sprites {
    front_default: Option<String>,
}

impl From<PokemonResponse> for CatalogEntryDetails {
    fn from(mut pokemon: PokemonResponse) -> Self {
        pokemon.types.sort_by_key(|t| t.slot);

        Self {
            id: pokemon.id,
            name: pokemon.name,
            height: pokemon.height,
            weight: pokemon.weight,
            base_experience: pokemon.base_experience,
            types: pokemon.types.into_iter().map(|t| t.kind.name).collect(),
            sprite: pokemon.sprites.front_default,
        }
    }
}

/// Extract the numeric id from a resource URL such as `.../pokemon/25/`
fn id_from_resource_url(url: &str) -> Option<EntityId> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| RawId::from(segment).to_entity_id())
}

/// HTTP catalog client for PokeAPI
pub struct PokeApiClient {
    client: Client,
    base_url: Url,
    retry: RetryConfig,
    detail_concurrency: usize,
}

impl PokeApiClient {
    /// Build a client from catalog configuration.
    ///
    /// `detail_concurrency` bounds the detail fan-out used by [`CatalogClient::page`].
    pub fn new(config: &CatalogConfig, detail_concurrency: usize) -> CatalogResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| CatalogError::InvalidUrl {
            message: format!("{}: {}", config.base_url, e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl {
                message: format!("{} cannot be used as a base URL", config.base_url),
            });
        }

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(concat!("pokedex-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::from_reqwest(&config.base_url, &e))?;

        info!("PokeAPI client configured for {}", base_url);

        Ok(Self {
            client,
            base_url,
            retry: config.retry.clone(),
            detail_concurrency: detail_concurrency.max(1),
        })
    }

    /// Append `segments` to the base path and attach `query` pairs
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    /// Lowercased path segment for a name or label.
    ///
    /// `None` for names that cannot address a single resource: empty ones,
    /// and `.`/`..`, which URL normalization would fold into the parent path.
    fn name_segment(name: &str) -> Option<String> {
        match name {
            "" | "." | ".." => None,
            _ => Some(name.to_lowercase()),
        }
    }

    /// GET `url` and decode the JSON body; `Ok(None)` on 404
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        operation: &str,
    ) -> CatalogResult<Option<T>> {
        let url = url.to_string();
        let target = url.as_str();
        let client = &self.client;

        with_retry(
            &self.retry,
            move || async move {
                let response = client
                    .get(target)
                    .send()
                    .await
                    .map_err(|e| CatalogError::from_reqwest(target, &e))?;

                let status = response.status();
                if status == StatusCode::NOT_FOUND {
                    debug!("{} returned 404", target);
                    return Ok(None);
                }
                if !status.is_success() {
                    return Err(CatalogError::Http {
                        status: status.as_u16(),
                        message: format!("GET {target} returned {status}"),
                    });
                }

                response
                    .json::<T>()
                    .await
                    .map(Some)
                    .map_err(|e| CatalogError::parse(target, e.to_string()))
            },
            operation,
        )
        .await
    }

    /// Like [`Self::get_json`] for endpoints that must exist
    async fn get_required<T: DeserializeOwned>(&self, url: Url, operation: &str) -> CatalogResult<T> {
        let resource = url.to_string();
        self.get_json(url, operation)
            .await?
            .ok_or_else(|| CatalogError::Http {
                status: StatusCode::NOT_FOUND.as_u16(),
                message: format!("GET {resource} returned 404 Not Found"),
            })
    }

    async fn pokemon(&self, key: &str) -> CatalogResult<Option<CatalogEntryDetails>> {
        let url = self.endpoint(&["pokemon", key], &[]);
        let pokemon: Option<PokemonResponse> = self.get_json(url, "pokemon details").await?;
        Ok(pokemon.map(CatalogEntryDetails::from))
    }
}

#[async_trait]
impl CatalogClient for PokeApiClient {
    async fn all_category_labels(&self) -> CatalogResult<Vec<String>> {
        let url = self.endpoint(&["type"], &[("limit", LIST_ALL_LABELS_LIMIT.to_string())]);
        let list: ResourceList = self.get_required(url, "type list").await?;

        Ok(list
            .results
            .into_iter()
            .map(|r| r.name)
            .filter(|name| !EXCLUDED_LABELS.contains(&name.as_str()))
            .collect())
    }

    async fn all_names(&self) -> CatalogResult<Vec<String>> {
        let url = self.endpoint(&["pokemon"], &[("limit", LIST_ALL_NAMES_LIMIT.to_string())]);
        let list: ResourceList = self.get_required(url, "pokemon name list").await?;

        debug!("Listed {} of {} names", list.results.len(), list.count);
        Ok(list.results.into_iter().map(|r| r.name).collect())
    }

    async fn entries_by_category(
        &self,
        label: &str,
        max: usize,
    ) -> CatalogResult<Vec<CatalogEntryRef>> {
        let Some(label) = Self::name_segment(label) else {
            return Ok(Vec::new());
        };
        let url = self.endpoint(&["type", &label], &[]);
        let Some(category) = self.get_json::<TypeResponse>(url, "type members").await? else {
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        Ok(category
            .pokemon
            .into_iter()
            .filter_map(|member| {
                let id = id_from_resource_url(&member.pokemon.url)?;
                seen.insert(id)
                    .then(|| CatalogEntryRef::new(id, member.pokemon.name))
            })
            .take(max)
            .collect())
    }

    async fn lite_by_name(&self, name: &str) -> CatalogResult<Option<CatalogEntryRef>> {
        let Some(name) = Self::name_segment(name) else {
            return Ok(None);
        };
        let url = self.endpoint(&["pokemon", &name], &[]);
        let lite: Option<LiteResponse> = self.get_json(url, "pokemon lite").await?;
        Ok(lite.map(|l| CatalogEntryRef::new(l.id, l.name)))
    }

    async fn details_by_id(&self, id: EntityId) -> CatalogResult<Option<CatalogEntryDetails>> {
        self.pokemon(&id.to_string()).await
    }

    async fn details_by_name(&self, name: &str) -> CatalogResult<Option<CatalogEntryDetails>> {
        match Self::name_segment(name) {
            Some(name) => self.pokemon(&name).await,
            None => Ok(None),
        }
    }

    async fn total_count(&self) -> CatalogResult<u64> {
        let url = self.endpoint(&["pokemon"], &[("limit", "1".to_string())]);
        let list: ResourceList = self.get_required(url, "pokemon count").await?;
        Ok(list.count)
    }

    async fn page(&self, page: u32, page_size: u32) -> CatalogResult<Vec<CatalogEntryDetails>> {
        let offset = u64::from(page.max(1) - 1) * u64::from(page_size);
        let url = self.endpoint(
            &["pokemon"],
            &[
                ("offset", offset.to_string()),
                ("limit", page_size.to_string()),
            ],
        );
        let list: ResourceList = self.get_required(url, "pokemon page").await?;

        let ids: Vec<RawId> = list
            .results
            .iter()
            .filter_map(|r| id_from_resource_url(&r.url))
            .map(RawId::from)
            .collect();

        fetch_details_bounded(self, ids, self.detail_concurrency).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn client(base_url: &str) -> PokeApiClient {
        let config = CatalogConfig {
            base_url: base_url.to_string(),
            ..CatalogConfig::default()
        };
        PokeApiClient::new(&config, 8).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = client("https://pokeapi.co/api/v2");
        let url = api.endpoint(&["pokemon", "25"], &[]);
        assert_eq!(url.as_str(), "https://pokeapi.co/api/v2/pokemon/25");

        let api = client("https://pokeapi.co/api/v2/");
        let url = api.endpoint(&["type"], &[("limit", "1000".to_string())]);
        assert_eq!(url.as_str(), "https://pokeapi.co/api/v2/type?limit=1000");
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let api = client("http://localhost:8000/api/v2");
        let url = api.endpoint(&["pokemon", "mr mime"], &[]);
        assert_eq!(url.as_str(), "http://localhost:8000/api/v2/pokemon/mr%20mime");
    }

    #[rstest]
    #[case::empty("", None)]
    #[case::current_dir(".", None)]
    #[case::parent_dir("..", None)]
    #[case::dotted_name("mr.mime", Some("mr.mime"))]
    #[case::mixed_case("Pikachu", Some("pikachu"))]
    fn test_name_segment(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(PokeApiClient::name_segment(name).as_deref(), expected);
    }

    #[tokio::test]
    async fn test_dot_names_are_absent_without_a_request() {
        // Nothing listens on the discard port; any request would fail.
        let api = client("http://127.0.0.1:9/api/v2");

        for name in [".", ".."] {
            assert_eq!(api.details_by_name(name).await.unwrap(), None);
            assert_eq!(api.lite_by_name(name).await.unwrap(), None);
            assert!(api.entries_by_category(name, 10).await.unwrap().is_empty());
        }
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = CatalogConfig {
            base_url: "not a url".to_string(),
            ..CatalogConfig::default()
        };
        assert!(matches!(
            PokeApiClient::new(&config, 8),
            Err(CatalogError::InvalidUrl { .. })
        ));

        let config = CatalogConfig {
            base_url: "mailto:ash@example.com".to_string(),
            ..CatalogConfig::default()
        };
        assert!(PokeApiClient::new(&config, 8).is_err());
    }

    #[test]
    fn test_id_from_resource_url() {
        assert_eq!(
            id_from_resource_url("https://pokeapi.co/api/v2/pokemon/25/"),
            Some(25)
        );
        assert_eq!(id_from_resource_url("https://pokeapi.co/api/v2/pokemon/10034"), Some(10034));
        assert_eq!(id_from_resource_url("https://pokeapi.co/api/v2/pokemon/"), None);
        assert_eq!(id_from_resource_url(""), None);
    }

    #[test]
    fn test_pokemon_response_maps_to_details() {
        let body = json!({
            "id": 6,
            "name": "charizard",
            "height": 17,
            "weight": 905,
            "base_experience": 267,
            "types": [
                {"slot": 2, "type": {"name": "flying", "url": "https://pokeapi.co/api/v2/type/3/"}},
                {"slot": 1, "type": {"name": "fire", "url": "https://pokeapi.co/api/v2/type/10/"}}
            ],
            "sprites": {"front_default": "https://example.com/6.png", "back_default": null}
        });

        let details: CatalogEntryDetails = serde_json::from_value::<PokemonResponse>(body)
            .unwrap()
            .into();

        assert_eq!(details.id, 6);
        assert_eq!(details.types, vec!["fire", "flying"]);
        assert_eq!(details.base_experience, Some(267));
        assert_eq!(details.sprite.as_deref(), Some("https://example.com/6.png"));
    }

    #[test]
    fn test_sparse_pokemon_response_uses_defaults() {
        let body = json!({"id": 10001, "name": "deoxys-attack", "base_experience": null});
        let pokemon: PokemonResponse = serde_json::from_value(body).unwrap();
        let details = CatalogEntryDetails::from(pokemon);

        assert_eq!(details.height, 0);
        assert!(details.types.is_empty());
        assert!(details.sprite.is_none());
    }
}

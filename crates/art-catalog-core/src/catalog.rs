// SPDX-License-Identifier: AGPL-3.0
// Art Catalog Core - HTTP client for the remote catalog
//
// Every call is a single GET with no retry and no caching.
// Wire field names never leave this module.

use crate::types::{AppError, AppSettings, Item, ItemId};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// Item record as served by the catalog service
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtToolRecord {
    id: ItemId,
    art_name: String,
    price: f64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    limited_time_deal: Option<f64>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    glass_surface: Option<bool>,
}

impl TryFrom<ArtToolRecord> for Item {
    type Error = AppError;

    fn try_from(record: ArtToolRecord) -> Result<Self, Self::Error> {
        let item = Item {
            id: record.id,
            name: record.art_name,
            price: record.price,
            description: record.description.unwrap_or_default(),
            image_url: record.image.unwrap_or_default(),
            discount_fraction: record.limited_time_deal.unwrap_or(0.0),
            brand: record.brand.unwrap_or_default(),
            glass_surface: record.glass_surface.unwrap_or(false),
        };
        item.validate().map_err(AppError::RemoteError)?;
        Ok(item)
    }
}

/// Read-only client for the remote catalog
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http_client: Client,
    endpoint: Url,
}

impl CatalogClient {
    /// Build a client for the endpoint and timeouts in `settings`
    pub fn new(settings: &AppSettings) -> Result<Self, AppError> {
        let endpoint = Url::parse(&settings.catalog_url).map_err(|e| {
            AppError::InvalidConfig(format!("Invalid catalog URL {}: {}", settings.catalog_url, e))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(AppError::InvalidConfig(format!(
                "Catalog URL cannot carry item paths: {}",
                settings.catalog_url
            )));
        }

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| AppError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// The configured catalog endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the full catalog
    pub async fn list_items(&self) -> Result<Vec<Item>, AppError> {
        let records: Vec<ArtToolRecord> = self.fetch(self.endpoint.clone(), None).await?;

        let mut seen = HashSet::with_capacity(records.len());
        let items = records
            .into_iter()
            .map(|record| {
                let item = Item::try_from(record)?;
                if !seen.insert(item.id.clone()) {
                    return Err(AppError::RemoteError(format!(
                        "Catalog listed item {} more than once",
                        item.id
                    )));
                }
                Ok(item)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!("Fetched {} catalog items", items.len());
        Ok(items)
    }

    /// Fetch one item's detail record
    pub async fn get_item(&self, id: &ItemId) -> Result<Item, AppError> {
        let url = self.item_url(id);
        let record: ArtToolRecord = self.fetch(url, Some(id)).await?;
        Item::try_from(record)
    }

    /// `<endpoint>/<id>`, with the id encoded as a single path segment
    fn item_url(&self, id: &ItemId) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url, id: Option<&ItemId>) -> Result<T, AppError> {
        tracing::debug!("GET {}", url);

        let response = self.http_client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::RemoteUnavailable(format!("Request to {} timed out", url))
            } else {
                AppError::RemoteUnavailable(format!("Cannot reach {}: {}", url, e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(AppError::NotFound(id.to_string()));
            }
        }
        if !status.is_success() {
            tracing::warn!("Catalog responded {} for {}", status, url);
            return Err(AppError::RemoteError(format!(
                "Catalog returned status {} for {}",
                status, url
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            AppError::RemoteUnavailable(format!("Failed to read response from {}: {}", url, e))
        })?;

        serde_json::from_slice(&body)
            .map_err(|e| AppError::RemoteError(format!("Malformed payload from {}: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> CatalogClient {
        let settings = AppSettings {
            catalog_url: server.url("/assignment"),
            connect_timeout_secs: 2,
            request_timeout_secs: 5,
            ..AppSettings::default()
        };
        CatalogClient::new(&settings).unwrap()
    }

    fn catalog_json() -> serde_json::Value {
        json!([
            {
                "id": "1",
                "artName": "Brush",
                "price": 5,
                "description": "Round sable brush",
                "image": "https://example.com/brush.png",
                "limitedTimeDeal": 0,
                "brand": "Winsor",
                "glassSurface": false
            },
            {
                "id": 2,
                "artName": "Palette",
                "price": 12,
                "limitedTimeDeal": 0.2
            }
        ])
    }

    #[tokio::test]
    async fn test_list_items_translates_wire_fields() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(GET).path("/assignment");
            then.status(200).json_body(catalog_json());
        }).await;

        let items = client_for(&server).list_items().await.unwrap();
        mock.assert_async().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ItemId::from("1"));
        assert_eq!(items[0].name, "Brush");
        assert_eq!(items[0].image_url, "https://example.com/brush.png");
        assert_eq!(items[0].brand, "Winsor");
        assert_eq!(items[1].id, ItemId::from(2u64));
        assert_eq!(items[1].discount_fraction, 0.2);
        assert!(items[1].description.is_empty());
    }

    #[tokio::test]
    async fn test_get_item_hits_item_path() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(GET).path("/assignment/2");
            then.status(200)
                .json_body(json!({"id": "2", "artName": "Palette", "price": 12, "limitedTimeDeal": 0.2}));
        }).await;

        let item = client_for(&server).get_item(&ItemId::from("2")).await.unwrap();
        mock.assert_async().await;
        assert_eq!(item.name, "Palette");
        assert_eq!(item.discount_percent(), 20);
    }

    #[tokio::test]
    async fn test_get_missing_item_is_not_found() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/assignment/999");
            then.status(404).body("\"Not found\"");
        }).await;

        let err = client_for(&server).get_item(&ItemId::from("999")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(id) if id == "999"));
    }

    #[tokio::test]
    async fn test_list_server_error_is_remote_error() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/assignment");
            then.status(500);
        }).await;

        let err = client_for(&server).list_items().await.unwrap_err();
        assert!(matches!(err, AppError::RemoteError(_)));
    }

    #[tokio::test]
    async fn test_get_item_server_error_is_remote_error() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/assignment/1");
            then.status(500);
        }).await;

        let err = client_for(&server).get_item(&ItemId::from("1")).await.unwrap_err();
        assert!(matches!(err, AppError::RemoteError(_)));
    }

    #[tokio::test]
    async fn test_list_not_found_is_remote_error() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/assignment");
            then.status(404);
        }).await;

        let err = client_for(&server).list_items().await.unwrap_err();
        assert!(matches!(err, AppError::RemoteError(_)));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_remote_error() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/assignment");
            then.status(200).body("<html>maintenance</html>");
        }).await;

        let err = client_for(&server).list_items().await.unwrap_err();
        assert!(matches!(err, AppError::RemoteError(_)));
    }

    #[tokio::test]
    async fn test_invalid_discount_is_remote_error() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/assignment/3");
            then.status(200)
                .json_body(json!({"id": "3", "artName": "Easel", "price": 40, "limitedTimeDeal": 3}));
        }).await;

        let err = client_for(&server).get_item(&ItemId::from("3")).await.unwrap_err();
        assert!(matches!(err, AppError::RemoteError(_)));
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_remote_error() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/assignment");
            then.status(200).json_body(json!([
                {"id": "1", "artName": "Brush", "price": 5},
                {"id": 1, "artName": "Brush again", "price": 6}
            ]));
        }).await;

        let err = client_for(&server).list_items().await.unwrap_err();
        assert!(matches!(err, AppError::RemoteError(_)));
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_remote_unavailable() {
        // Bind then drop a listener so the port is known to be closed
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let settings = AppSettings {
            catalog_url: format!("http://127.0.0.1:{}/assignment", port),
            connect_timeout_secs: 2,
            request_timeout_secs: 2,
            ..AppSettings::default()
        };

        let client = CatalogClient::new(&settings).unwrap();

        let err = client.list_items().await.unwrap_err();
        assert!(matches!(err, AppError::RemoteUnavailable(_)));
        let err = client.get_item(&ItemId::from("1")).await.unwrap_err();
        assert!(matches!(err, AppError::RemoteUnavailable(_)));
    }

    #[test]
    fn test_item_url_encodes_id_segment() {
        let settings = AppSettings {
            catalog_url: "http://localhost:8080/assignment/".to_string(),
            ..AppSettings::default()
        };
        let client = CatalogClient::new(&settings).unwrap();
        let url = client.item_url(&ItemId::from("a/b"));
        assert_eq!(url.as_str(), "http://localhost:8080/assignment/a%2Fb");
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let settings = AppSettings {
            catalog_url: "not a url".to_string(),
            ..AppSettings::default()
        };
        assert!(matches!(
            CatalogClient::new(&settings),
            Err(AppError::InvalidConfig(_))
        ));
    }
}

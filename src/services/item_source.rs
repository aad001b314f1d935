use crate::models::{ItemDetails, ItemStat, Settings};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::time::Duration;
use thiserror::Error;

/// One lookup against the item API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequest {
    pub item_id: u32,
    pub bonus_ids: Vec<u32>,
    pub locale: String,
}

/// Errors from a single item lookup
///
/// Only [`FetchError::Transport`] is fatal for a run; the other variants leave
/// the item without details and enrichment continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Unable to reach item API for item {item_id}: {message}")]
    Transport { item_id: u32, message: String },

    #[error("Item API returned status {status} for item {item_id}")]
    Status { item_id: u32, status: u16 },

    #[error("Unable to decode item API response for item {item_id}: {message}")]
    Decode { item_id: u32, message: String },
}

impl FetchError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }
}

/// Source of item attributes, keyed by item id, bonus ids and locale
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_item(&self, request: &ItemRequest) -> Result<ItemDetails, FetchError>;
}

/// Item API client over HTTP
///
/// Issues `GET {base}/wow/item/{id}?locale=..&bl=..&apikey=..`. No retries or
/// caching; each call maps to exactly one request.
pub struct HttpItemSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpItemSource {
    pub fn new(settings: &Settings) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if settings.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    fn item_url(&self, item_id: u32) -> String {
        format!("{}/wow/item/{}", self.base_url, item_id)
    }
}

#[async_trait]
impl ItemSource for HttpItemSource {
    async fn fetch_item(&self, request: &ItemRequest) -> Result<ItemDetails, FetchError> {
        let item_id = request.item_id;
        let url = self.item_url(item_id);
        let bonus_list = request
            .bonus_ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");

        tracing::debug!("Fetching {} (locale={}, bl={})", url, request.locale, bonus_list);

        // The request URL carries the api key, keep it out of the message
        let transport = |e: reqwest::Error| FetchError::Transport {
            item_id,
            message: e.without_url().to_string(),
        };

        let response = self
            .client
            .get(&url)
            .query(&[
                ("locale", request.locale.as_str()),
                ("bl", bonus_list.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(FetchError::Status {
                item_id,
                status: status.as_u16(),
            });
        }

        decode_item(item_id, &body)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ItemResponse {
    name: String,
    icon: String,
    item_level: u32,
    armor: u32,
    context: String,
    inventory_type: u32,
    item_set: Option<ItemSetRef>,
    socket_info: Option<SocketInfo>,
    bonus_stats: Vec<ItemStat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemSetRef {
    id: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SocketInfo {
    sockets: Vec<IgnoredAny>,
}

/// Decode an item API body into fresh [`ItemDetails`]
///
/// Absent fields stay at their zero value; a body of the wrong shape is an error
/// and nothing is returned.
pub fn decode_item(item_id: u32, body: &str) -> Result<ItemDetails, FetchError> {
    let response: ItemResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode {
            item_id,
            message: e.to_string(),
        })?;

    Ok(ItemDetails {
        name: response.name,
        icon: response.icon,
        item_level: response.item_level,
        armor: response.armor,
        quality: response.context,
        inventory_type: response.inventory_type,
        item_set_id: response.item_set.map_or(0, |s| s.id),
        socket_count: response.socket_info.map_or(0, |s| s.sockets.len()),
        stats: response.bonus_stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_response() {
        let body = r#"{
            "id": 151801,
            "name": "Eye of Command",
            "icon": "inv_misc_ring",
            "itemLevel": 1000,
            "armor": 0,
            "context": "raid-normal",
            "inventoryType": 11,
            "itemSet": {"id": 1308},
            "socketInfo": {"sockets": [{"type": "PRISMATIC"}]},
            "bonusStats": [{"stat": 32, "amount": 500}, {"stat": 49, "amount": 321}]
        }"#;

        let details = decode_item(151801, body).unwrap();
        assert_eq!(details.name, "Eye of Command");
        assert_eq!(details.item_level, 1000);
        assert_eq!(details.quality, "raid-normal");
        assert_eq!(details.inventory_type, 11);
        assert_eq!(details.item_set_id, 1308);
        assert_eq!(details.socket_count, 1);
        assert_eq!(
            details.stats,
            vec![
                ItemStat { stat: 32, amount: 500 },
                ItemStat { stat: 49, amount: 321 }
            ]
        );
    }

    #[test]
    fn test_decode_missing_fields_default_to_zero() {
        let details = decode_item(1, r#"{"name": "Plain Band"}"#).unwrap();
        assert_eq!(details.name, "Plain Band");
        assert_eq!(details.item_level, 0);
        assert_eq!(details.item_set_id, 0);
        assert_eq!(details.socket_count, 0);
    }

    #[test]
    fn test_decode_failure_is_not_fatal() {
        let err = decode_item(7, "<html>Service Unavailable</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode { item_id: 7, .. }));
        assert!(!err.is_fatal());

        let err = decode_item(7, r#"{"itemLevel": "high"}"#).unwrap_err();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_transport_is_fatal() {
        let err = FetchError::Transport {
            item_id: 1,
            message: "connection refused".to_string(),
        };
        assert!(err.is_fatal());
        assert!(!FetchError::Status { item_id: 1, status: 404 }.is_fatal());
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_api_key() {
        // Grab a free port, then close it so the connection is refused
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let settings = Settings {
            api_base_url: format!("http://127.0.0.1:{}", port),
            api_key: "s3cr3t-key".to_string(),
            request_timeout_secs: 5,
            ..Settings::default()
        };
        let source = HttpItemSource::new(&settings).unwrap();

        let err = source
            .fetch_item(&ItemRequest {
                item_id: 1,
                bonus_ids: vec![3612],
                locale: "en_US".to_string(),
            })
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(!err.to_string().contains("s3cr3t-key"), "key leaked: {err}");
        assert!(!err.to_string().contains("apikey"), "query leaked: {err}");
    }

    #[test]
    fn test_item_url_trims_trailing_slash() {
        let settings = Settings {
            api_base_url: "http://localhost:8080/".to_string(),
            ..Settings::default()
        };
        let source = HttpItemSource::new(&settings).unwrap();
        assert_eq!(source.item_url(42), "http://localhost:8080/wow/item/42");
    }
}

use crate::cms::query::{QueryOptions, DEFAULT_REVALIDATE_SECONDS};
use crate::config::CmsConfig;
use crate::utils::error::{HubError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Read-only client for the headless CMS item API.
///
/// The public surface never returns an error: any failure — non-2xx status,
/// network error, malformed body, missing `data` field — collapses to an
/// empty/`None` result with a logged warning, so callers can always render
/// fallback content deterministically.
pub struct CmsClient {
    base_url: String,
    http: reqwest::Client,
    cache: Mutex<HashMap<String, CacheEntry>>,
    default_ttl_seconds: u64,
}

struct CacheEntry {
    stored_at: Instant,
    ttl: Duration,
    data: Value,
}

/// Internal request outcome. The CMS cannot tell an intentionally empty
/// collection apart from an outage at the public surface, but the two cases
/// log differently so operators can.
enum FetchOutcome {
    Data(Value),
    Empty,
    Failed(HubError),
}

impl FetchOutcome {
    fn classify(result: Result<Value>) -> Self {
        match result {
            Ok(Value::Null) => FetchOutcome::Empty,
            Ok(Value::Array(items)) if items.is_empty() => FetchOutcome::Empty,
            Ok(value) => FetchOutcome::Data(value),
            Err(err) => FetchOutcome::Failed(err),
        }
    }

    /// Apply the log-and-degrade policy in one place.
    fn into_data(self, collection: &str) -> Option<Value> {
        match self {
            FetchOutcome::Data(value) => Some(value),
            FetchOutcome::Empty => {
                tracing::debug!(collection, "CMS returned no content");
                None
            }
            FetchOutcome::Failed(err) => {
                tracing::warn!(collection, error = %err, "CMS fallback engaged");
                None
            }
        }
    }
}

impl CmsClient {
    pub fn new(config: &CmsConfig) -> Self {
        let mut client = Self::with_base_url(config.base_url());
        if let Some(seconds) = config.revalidate_seconds {
            client.default_ttl_seconds = seconds;
        }
        client
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            cache: Mutex::new(HashMap::new()),
            default_ttl_seconds: DEFAULT_REVALIDATE_SECONDS,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a list of items from a collection.
    ///
    /// Returns the rows of the `data` field deserialized into `T`, or an
    /// empty vec on any failure.
    pub async fn fetch_items<T: DeserializeOwned>(
        &self,
        collection: &str,
        options: &QueryOptions,
    ) -> Vec<T> {
        let path = format!("items/{}", collection);
        let outcome = FetchOutcome::classify(self.get_data(&path, options).await);

        match outcome.into_data(collection) {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
                tracing::warn!(collection, error = %err, "CMS payload did not match the expected shape");
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    /// Fetch a single item by primary key. `None` on any failure or when the
    /// `data` field is absent.
    pub async fn fetch_item<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        options: &QueryOptions,
    ) -> Option<T> {
        let path = format!("items/{}/{}", collection, id);
        let label = format!("{}/{}", collection, id);
        let outcome = FetchOutcome::classify(self.get_data(&path, options).await);

        let value = outcome.into_data(&label)?;
        match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(collection = %label, error = %err, "CMS payload did not match the expected shape");
                None
            }
        }
    }

    /// Fetch a collection modeled as a single persistent record.
    pub async fn fetch_singleton<T: DeserializeOwned>(
        &self,
        collection: &str,
        options: &QueryOptions,
    ) -> Option<T> {
        let path = format!("items/{}", collection);
        let outcome = FetchOutcome::classify(self.get_data(&path, options).await);

        let value = outcome.into_data(collection)?;
        match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(collection, error = %err, "CMS payload did not match the expected shape");
                None
            }
        }
    }

    /// Build an asset URL for a file uploaded through the CMS file library.
    /// Pure string construction, no network call.
    pub fn file_url(&self, file_id: Option<&str>) -> Option<String> {
        match file_id {
            Some(id) if !id.is_empty() => Some(format!("{}/assets/{}", self.base_url, id)),
            _ => None,
        }
    }

    async fn get_data(&self, path: &str, options: &QueryOptions) -> Result<Value> {
        let params = options.to_query();
        let ttl = Duration::from_secs(options.cache_ttl_or(self.default_ttl_seconds));
        let cache_key = Self::cache_key(path, &params);

        if !ttl.is_zero() {
            if let Some(cached) = self.cache_lookup(&cache_key) {
                tracing::debug!(path, "serving CMS response from cache");
                return Ok(cached);
            }
        }

        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(&params)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HubError::CmsStatusError {
                collection: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let data = match body.get("data") {
            Some(data) => data.clone(),
            None => {
                return Err(HubError::CmsShapeError {
                    collection: path.to_string(),
                })
            }
        };

        if !ttl.is_zero() {
            let mut cache = self.cache.lock().expect("cms cache poisoned");
            cache.insert(
                cache_key,
                CacheEntry {
                    stored_at: Instant::now(),
                    ttl,
                    data: data.clone(),
                },
            );
        }

        Ok(data)
    }

    fn cache_lookup(&self, key: &str) -> Option<Value> {
        let mut cache = self.cache.lock().expect("cms cache poisoned");
        match cache.get(key) {
            Some(entry) if entry.stored_at.elapsed() < entry.ttl => Some(entry.data.clone()),
            Some(_) => {
                cache.remove(key);
                None
            }
            None => None,
        }
    }

    fn cache_key(path: &str, params: &[(String, String)]) -> String {
        let mut key = path.to_string();
        for (name, value) in params {
            key.push('&');
            key.push_str(name);
            key.push('=');
            key.push_str(value);
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: i64,
        title: String,
    }

    fn client(server: &MockServer) -> CmsClient {
        CmsClient::with_base_url(server.base_url())
    }

    #[tokio::test]
    async fn test_fetch_items_success() {
        let server = MockServer::start();
        let cms_mock = server.mock(|when, then| {
            when.method(GET).path("/items/articles");
            then.status(200).json_body(json!({
                "data": [
                    { "id": 1, "title": "Первая" },
                    { "id": 2, "title": "Вторая" }
                ]
            }));
        });

        let items: Vec<Row> = client(&server)
            .fetch_items("articles", &QueryOptions::new())
            .await;

        cms_mock.assert();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, 1);
    }

    #[tokio::test]
    async fn test_fetch_items_non_2xx_returns_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/items/articles");
            then.status(503);
        });

        let items: Vec<Row> = client(&server)
            .fetch_items("articles", &QueryOptions::new())
            .await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_items_malformed_body_returns_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/items/articles");
            then.status(200).body("not json at all");
        });

        let items: Vec<Row> = client(&server)
            .fetch_items("articles", &QueryOptions::new())
            .await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_items_missing_data_field_returns_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/items/articles");
            then.status(200).json_body(json!({ "errors": [] }));
        });

        let items: Vec<Row> = client(&server)
            .fetch_items("articles", &QueryOptions::new())
            .await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_items_unreachable_host_returns_empty() {
        // Port 9 is discard; nothing listens there in the test environment.
        let cms = CmsClient::with_base_url("http://127.0.0.1:9");
        let items: Vec<Row> = cms.fetch_items("articles", &QueryOptions::new()).await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_items_sends_encoded_query() {
        let server = MockServer::start();
        let cms_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/items/articles")
                .query_param("fields", "id,title,category.name")
                .query_param("sort", "-date_published")
                .query_param("limit", "10")
                .query_param("filter", r#"{"status":{"_eq":"published"}}"#);
            then.status(200).json_body(json!({ "data": [] }));
        });

        let options = QueryOptions::new()
            .fields(["id", "title", "category.name"])
            .filter(json!({ "status": { "_eq": "published" } }))
            .sort(["-date_published"])
            .limit(10);

        let _: Vec<Row> = client(&server).fetch_items("articles", &options).await;
        cms_mock.assert();
    }

    #[tokio::test]
    async fn test_fetch_item_found_and_missing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/items/articles/7");
            then.status(200)
                .json_body(json!({ "data": { "id": 7, "title": "Одна" } }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/items/articles/8");
            then.status(404);
        });

        let cms = client(&server);
        let found: Option<Row> = cms.fetch_item("articles", "7", &QueryOptions::new()).await;
        assert_eq!(found.unwrap().title, "Одна");

        let missing: Option<Row> = cms.fetch_item("articles", "8", &QueryOptions::new()).await;
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_fetch_singleton_null_data_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/items/company_info");
            then.status(200).json_body(json!({ "data": null }));
        });

        let singleton: Option<Row> = client(&server)
            .fetch_singleton("company_info", &QueryOptions::new())
            .await;
        assert!(singleton.is_none());
    }

    #[tokio::test]
    async fn test_file_url() {
        let cms = CmsClient::with_base_url("http://geotech_cms:8055/");
        assert_eq!(cms.file_url(None), None);
        assert_eq!(cms.file_url(Some("")), None);
        assert_eq!(
            cms.file_url(Some("abc123")).unwrap(),
            "http://geotech_cms:8055/assets/abc123"
        );
    }

    #[tokio::test]
    async fn test_responses_are_cached_for_the_revalidate_window() {
        let server = MockServer::start();
        let cms_mock = server.mock(|when, then| {
            when.method(GET).path("/items/advantages");
            then.status(200)
                .json_body(json!({ "data": [{ "id": 1, "title": "Опыт" }] }));
        });

        let cms = client(&server);
        let options = QueryOptions::new().revalidate(300);

        let first: Vec<Row> = cms.fetch_items("advantages", &options).await;
        let second: Vec<Row> = cms.fetch_items("advantages", &options).await;

        assert_eq!(first, second);
        cms_mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_configured_default_ttl_governs_queries_without_revalidate() {
        let server = MockServer::start();
        let cms_mock = server.mock(|when, then| {
            when.method(GET).path("/items/advantages");
            then.status(200)
                .json_body(json!({ "data": [{ "id": 1, "title": "Опыт" }] }));
        });

        let config = CmsConfig {
            internal_url: server.base_url(),
            revalidate_seconds: Some(0),
            ..CmsConfig::default()
        };
        let cms = CmsClient::new(&config);

        // Caching disabled by configuration: both requests reach the server.
        let _: Vec<Row> = cms.fetch_items("advantages", &QueryOptions::new()).await;
        let _: Vec<Row> = cms.fetch_items("advantages", &QueryOptions::new()).await;
        cms_mock.assert_hits(2);

        // A per-query revalidate still overrides the configured default.
        let options = QueryOptions::new().revalidate(300);
        let _: Vec<Row> = cms.fetch_items("advantages", &options).await;
        let _: Vec<Row> = cms.fetch_items("advantages", &options).await;
        cms_mock.assert_hits(3);
    }

    #[tokio::test]
    async fn test_revalidate_zero_bypasses_the_cache() {
        let server = MockServer::start();
        let cms_mock = server.mock(|when, then| {
            when.method(GET).path("/items/advantages");
            then.status(200)
                .json_body(json!({ "data": [{ "id": 1, "title": "Опыт" }] }));
        });

        let cms = client(&server);
        let options = QueryOptions::new().revalidate(0);

        let _: Vec<Row> = cms.fetch_items("advantages", &options).await;
        let _: Vec<Row> = cms.fetch_items("advantages", &options).await;

        cms_mock.assert_hits(2);
    }
}

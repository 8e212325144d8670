//! Reqwest-backed record store adapter.
//!
//! This adapter owns transport details only: endpoint construction,
//! authentication headers, timeout and HTTP error mapping, and JSON decoding
//! of the created rows.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request, StatusCode};
use url::Url;

use crate::config::{RecordStoreSettings, SettingsError};
use crate::domain::ports::{Collection, RecordStore, RecordStoreError, Row};

const REST_PREFIX: [&str; 2] = ["rest", "v1"];
const API_KEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Failures while building a [`RestRecordStore`] from settings.
#[derive(Debug, thiserror::Error)]
pub enum RestStoreBuildError {
    /// Settings were incomplete or invalid.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The base URL cannot carry path segments.
    #[error("record store URL `{0}` cannot be used as a base")]
    NotABase(Url),
    /// The HTTP client could not be constructed.
    #[error("record store client could not be built: {0}")]
    Client(#[from] reqwest::Error),
}

/// Record store adapter that POSTs rows to one project's REST endpoint.
#[derive(Debug, Clone)]
pub struct RestRecordStore {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl RestRecordStore {
    /// Build an adapter relying on the transport's own timeout behaviour.
    ///
    /// # Errors
    ///
    /// Returns an error when `base_url` cannot carry a path or the reqwest
    /// client cannot be constructed.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Result<Self, RestStoreBuildError> {
        Self::with_client(Client::builder().build()?, base_url, api_key)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when `base_url` cannot carry a path or the reqwest
    /// client cannot be constructed.
    pub fn with_timeout(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RestStoreBuildError> {
        Self::with_client(Client::builder().timeout(timeout).build()?, base_url, api_key)
    }

    /// Build an adapter from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the settings are incomplete or the client cannot
    /// be constructed.
    pub fn from_settings(settings: &RecordStoreSettings) -> Result<Self, RestStoreBuildError> {
        let base_url = settings.base_url()?;
        let api_key = settings.api_key()?;
        match settings.request_timeout() {
            Some(timeout) => Self::with_timeout(base_url, api_key, timeout),
            None => Self::new(base_url, api_key),
        }
    }

    fn with_client(
        client: Client,
        base_url: Url,
        api_key: impl Into<String>,
    ) -> Result<Self, RestStoreBuildError> {
        if base_url.cannot_be_a_base() {
            return Err(RestStoreBuildError::NotABase(base_url));
        }
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Endpoint receiving inserts for `collection`.
    pub fn collection_url(&self, collection: Collection) -> Url {
        collection_url(&self.base_url, collection)
    }

    fn insert_request(&self, collection: Collection, row: &Row) -> reqwest::Result<Request> {
        self.client
            .post(self.collection_url(collection))
            .header(API_KEY_HEADER, self.api_key.as_str())
            .bearer_auth(&self.api_key)
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(&[row])
            .build()
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn insert(&self, collection: Collection, row: Row) -> Result<Vec<Row>, RecordStoreError> {
        let request = self
            .insert_request(collection, &row)
            .map_err(map_transport_error)?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_created_rows(body.as_ref())
    }
}

fn collection_url(base_url: &Url, collection: Collection) -> Url {
    let mut url = base_url.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(REST_PREFIX)
            .push(collection.as_str());
    }
    url
}

fn parse_created_rows(body: &[u8]) -> Result<Vec<Row>, RecordStoreError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(body).map_err(|error| {
        RecordStoreError::decode(format!("invalid created-rows payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> RecordStoreError {
    if error.is_timeout() {
        RecordStoreError::timeout(error.to_string())
    } else {
        RecordStoreError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RecordStoreError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RecordStoreError::timeout(message)
        }
        _ => RecordStoreError::rejected(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network REST mapping helpers.

    use super::*;
    use rstest::rstest;

    fn base(raw: &str) -> Url {
        Url::parse(raw).expect("valid base URL")
    }

    #[rstest]
    #[case("https://demo.supabase.co", Collection::Talents, "https://demo.supabase.co/rest/v1/talents")]
    #[case("https://demo.supabase.co/", Collection::Investors, "https://demo.supabase.co/rest/v1/investors")]
    #[case("http://localhost:54321/proxy/", Collection::Talents, "http://localhost:54321/proxy/rest/v1/talents")]
    #[case("https://demo.supabase.co/?x=1#top", Collection::Talents, "https://demo.supabase.co/rest/v1/talents")]
    fn builds_collection_endpoint(
        #[case] base_url: &str,
        #[case] collection: Collection,
        #[case] expected: &str,
    ) {
        assert_eq!(collection_url(&base(base_url), collection).as_str(), expected);
    }

    #[rstest]
    #[case::conflict(StatusCode::CONFLICT, "Rejected")]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Rejected")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    fn maps_http_statuses_to_expected_port_errors(
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, b"{\"message\":\"duplicate key value\"}");
        match expected {
            "Rejected" => {
                assert!(
                    matches!(error, RecordStoreError::Rejected { status: code, .. } if code == status.as_u16()),
                    "non-timeout statuses should map to Rejected",
                );
            }
            "Timeout" => {
                assert!(
                    matches!(error, RecordStoreError::Timeout { .. }),
                    "timeout statuses should map to Timeout",
                );
            }
            _ => panic!("unsupported test expectation: {expected}"),
        }
    }

    #[test]
    fn status_message_includes_compact_body_preview() {
        let error = map_status_error(StatusCode::BAD_REQUEST, b"{\n  \"code\": \"23502\"\n}");
        assert_eq!(
            error,
            RecordStoreError::rejected(400_u16, "status 400: { \"code\": \"23502\" }")
        );
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(200);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.len(), 163);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn parses_created_rows() {
        let body = br#"[{ "id": 12, "name": "Jane Doe" }]"#;
        let rows = parse_created_rows(body).expect("JSON should decode");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], 12);
    }

    #[test]
    fn empty_body_means_no_rows_returned() {
        assert!(parse_created_rows(b"").expect("empty body").is_empty());
    }

    #[test]
    fn rejects_non_array_payloads() {
        let error = parse_created_rows(br#"{ "id": 12 }"#).expect_err("decode should fail");
        assert!(
            matches!(error, RecordStoreError::Decode { .. }),
            "object payloads should map to Decode errors",
        );
    }

    #[test]
    fn insert_request_carries_auth_headers_and_single_row_body() {
        let store =
            RestRecordStore::new(base("https://demo.supabase.co"), "anon-key").expect("store builds");
        let row = serde_json::json!({ "name": "Jane Doe", "experience": 5 })
            .as_object()
            .cloned()
            .expect("row is an object");

        let request = store
            .insert_request(Collection::Talents, &row)
            .expect("request builds");

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://demo.supabase.co/rest/v1/talents"
        );
        let headers = request.headers();
        assert_eq!(headers.get(API_KEY_HEADER).map(|v| v.as_bytes()), Some(&b"anon-key"[..]));
        assert_eq!(
            headers.get(reqwest::header::AUTHORIZATION).map(|v| v.as_bytes()),
            Some(&b"Bearer anon-key"[..])
        );
        assert_eq!(
            headers.get(PREFER_HEADER).map(|v| v.as_bytes()),
            Some(RETURN_REPRESENTATION.as_bytes())
        );
        assert_eq!(
            headers.get(reqwest::header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(&b"application/json"[..])
        );

        let body = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .expect("JSON body is buffered");
        let sent: serde_json::Value = serde_json::from_slice(body).expect("body is JSON");
        assert_eq!(sent, serde_json::json!([{ "name": "Jane Doe", "experience": 5 }]));
    }

    #[test]
    fn opaque_urls_are_rejected_as_base() {
        let error = RestRecordStore::new(base("mailto:ops@example.com"), "key")
            .expect_err("mailto URL cannot be a base");
        assert!(matches!(error, RestStoreBuildError::NotABase(_)));
    }

    #[test]
    fn builds_from_settings() {
        let settings = RecordStoreSettings {
            url: Some("https://demo.supabase.co".to_owned()),
            anon_key: Some("anon-key".to_owned()),
            request_timeout_secs: 5,
        };
        let store = RestRecordStore::from_settings(&settings).expect("store builds");
        assert_eq!(
            store.collection_url(Collection::Investors).as_str(),
            "https://demo.supabase.co/rest/v1/investors"
        );
    }

    #[test]
    fn missing_key_fails_to_build() {
        let settings = RecordStoreSettings {
            url: Some("https://demo.supabase.co".to_owned()),
            anon_key: None,
            request_timeout_secs: 0,
        };
        let error = RestRecordStore::from_settings(&settings).expect_err("key is required");
        assert!(matches!(
            error,
            RestStoreBuildError::Settings(SettingsError::MissingApiKey)
        ));
    }
}

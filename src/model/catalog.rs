//! Jamendo catalog API client

use serde::Deserialize;

use super::track::Track;

/// Result-count cap for the popular-tracks listing
pub const POPULAR_LIMIT: u32 = 12;
/// Result-count cap for name searches
pub const SEARCH_LIMIT: u32 = 20;

const FALLBACK_ERROR_MESSAGE: &str = "API Error";

// Provider codes that mean the client id itself was rejected.
const AUTH_ERROR_CODES: &[i64] = &[5, 11, 12];

/// An error that can occur when talking to the catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// The request could not be sent or the body could not be read.
    Request(reqwest::Error),
    /// The body was not the JSON shape we expect.
    Decode(serde_json::Error),
    /// The server answered with a non-success status and no usable body.
    Http { status: u16 },
    /// The provider reported a failure.
    Api { code: Option<i64>, message: String },
    /// The provider rejected the credential.
    Auth { message: String },
}

impl CatalogError {
    /// Whether the user has to fix the credential before retrying.
    pub fn is_auth(&self) -> bool {
        matches!(self, CatalogError::Auth { .. })
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Request(e) => write!(f, "Request failed: {e}"),
            CatalogError::Decode(e) => write!(f, "Invalid response: {e}"),
            CatalogError::Http { status } => write!(f, "HTTP {status}"),
            CatalogError::Api { message, .. } => write!(f, "{message}"),
            CatalogError::Auth { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        CatalogError::Request(e)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Decode(e)
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    headers: Option<ResponseHeaders>,
    #[serde(default)]
    results: Option<Vec<Track>>,
}

#[derive(Debug, Deserialize)]
struct ResponseHeaders {
    #[serde(default)]
    status: String,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Parse a `/tracks` response body into its track list.
pub fn parse_tracks(bytes: &[u8]) -> CatalogResult<Vec<Track>> {
    let response: CatalogResponse = serde_json::from_slice(bytes)?;

    if let Some(headers) = response.headers
        && headers.status == "failed"
    {
        let message = headers
            .error_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
        return Err(classify_failure(headers.code, message));
    }

    Ok(response.results.unwrap_or_default())
}

fn classify_failure(code: Option<i64>, message: String) -> CatalogError {
    let lower = message.to_lowercase();
    let names_credential = lower.contains("client id")
        || lower.contains("client_id")
        || lower.contains("credential");

    if code.is_some_and(|c| AUTH_ERROR_CODES.contains(&c)) || names_credential {
        CatalogError::Auth { message }
    } else {
        CatalogError::Api { code, message }
    }
}

/// Query parameters for the weekly popularity listing.
pub fn popular_query(credential: &str) -> Vec<(&'static str, String)> {
    vec![
        ("client_id", credential.to_string()),
        ("format", "jsonpretty".to_string()),
        ("limit", POPULAR_LIMIT.to_string()),
        ("order", "popularity_week".to_string()),
    ]
}

/// Query parameters for a track name search.
pub fn search_query(credential: &str, query: &str) -> Vec<(&'static str, String)> {
    vec![
        ("client_id", credential.to_string()),
        ("format", "jsonpretty".to_string()),
        ("limit", SEARCH_LIMIT.to_string()),
        ("namesearch", query.to_string()),
    ]
}

#[derive(Clone)]
pub struct CatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl CatalogClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub async fn fetch_popular(&self, credential: &str) -> CatalogResult<Vec<Track>> {
        crate::log_api_request!("fetch_popular", limit = POPULAR_LIMIT);
        let result = self.get_tracks(&popular_query(credential)).await;
        crate::log_api_result!("fetch_popular", result);
        result
    }

    /// Search tracks by name. An empty query returns no tracks without
    /// touching the network.
    pub async fn search(&self, credential: &str, query: &str) -> CatalogResult<Vec<Track>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        crate::log_api_request!("search", query = query, limit = SEARCH_LIMIT);
        let result = self.get_tracks(&search_query(credential, query)).await;
        crate::log_api_result!("search", result);
        result
    }

    async fn get_tracks(&self, parameters: &[(&str, String)]) -> CatalogResult<Vec<Track>> {
        let response = self
            .client
            .get(format!("{}/tracks/", self.base_url))
            .query(parameters)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        match parse_tracks(&bytes) {
            Err(CatalogError::Decode(_)) if status.as_u16() == 401 || status.as_u16() == 403 => {
                Err(CatalogError::Auth {
                    message: format!("Credential rejected (HTTP {})", status.as_u16()),
                })
            }
            Err(CatalogError::Decode(_)) if !status.is_success() => Err(CatalogError::Http {
                status: status.as_u16(),
            }),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_results_in_response_order() {
        let body = br#"{
            "headers": {"status": "success", "code": 0, "error_message": "", "results_count": 2},
            "results": [
                {"id": "1", "name": "First", "artist_name": "A", "album_image": "img1", "audio": "a1"},
                {"id": "2", "name": "Second", "artist_name": "B", "album_image": "img2", "audio": "a2"}
            ]
        }"#;
        let tracks = parse_tracks(body).unwrap();
        let names: Vec<_> = tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[test]
    fn missing_results_is_an_empty_list() {
        let tracks = parse_tracks(br#"{"headers": {"status": "success"}}"#).unwrap();
        assert!(tracks.is_empty());
        assert!(parse_tracks(b"{}").unwrap().is_empty());
    }

    #[test]
    fn failed_status_carries_provider_message() {
        let body = br#"{"headers": {"status": "failed", "code": 6, "error_message": "Rate limit exceeded"}}"#;
        match parse_tracks(body) {
            Err(CatalogError::Api { code, message }) => {
                assert_eq!(code, Some(6));
                assert_eq!(message, "Rate limit exceeded");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn failed_status_without_message_falls_back() {
        let err = parse_tracks(br#"{"headers": {"status": "failed"}}"#).unwrap_err();
        assert_eq!(err.to_string(), "API Error");

        let err = parse_tracks(br#"{"headers": {"status": "failed", "error_message": ""}}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "API Error");
    }

    #[test]
    fn credential_failures_are_auth_errors() {
        let by_code = parse_tracks(
            br#"{"headers": {"status": "failed", "code": 5, "error_message": "Invalid value"}}"#,
        )
        .unwrap_err();
        assert!(by_code.is_auth());

        let by_message = parse_tracks(
            br#"{"headers": {"status": "failed", "error_message": "Your credential is suspended"}}"#,
        )
        .unwrap_err();
        assert!(by_message.is_auth());
        assert_eq!(by_message.to_string(), "Your credential is suspended");

        let other = parse_tracks(
            br#"{"headers": {"status": "failed", "code": 1, "error_message": "Exception"}}"#,
        )
        .unwrap_err();
        assert!(!other.is_auth());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        assert!(matches!(
            parse_tracks(b"<html>"),
            Err(CatalogError::Decode(_))
        ));
    }

    #[test]
    fn popular_query_orders_by_weekly_popularity() {
        let params = popular_query("abc123");
        assert!(params.contains(&("client_id", "abc123".to_string())));
        assert!(params.contains(&("format", "jsonpretty".to_string())));
        assert!(params.contains(&("limit", "12".to_string())));
        assert!(params.contains(&("order", "popularity_week".to_string())));
    }

    #[test]
    fn search_query_filters_by_name() {
        let params = search_query("abc123", "lo fi");
        assert!(params.contains(&("limit", "20".to_string())));
        assert!(params.contains(&("namesearch", "lo fi".to_string())));
        assert!(!params.iter().any(|(key, _)| *key == "order"));
    }

    #[tokio::test]
    async fn empty_search_skips_the_network() {
        // Unroutable base URL: any request would fail.
        let catalog = CatalogClient::new(reqwest::Client::new(), "http://127.0.0.1:9");
        let tracks = catalog.search("abc123", "").await.unwrap();
        assert!(tracks.is_empty());
    }

    #[test]
    fn first_fetch_after_revocation_uses_default_credential() {
        use crate::settings::{
            CREDENTIAL_KEY, DEFAULT_CLIENT_ID, MemoryStorage, REVOKED_CLIENT_ID, SettingsStore, Storage,
        };

        let mut storage = MemoryStorage::default();
        storage.set(CREDENTIAL_KEY, REVOKED_CLIENT_ID).unwrap();
        let store = SettingsStore::load(Box::new(storage));

        let params = popular_query(store.get());
        assert!(params.contains(&("client_id", DEFAULT_CLIENT_ID.to_string())));
    }
}

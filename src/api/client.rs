//! Member resource client.
//!
//! Loads the member list either over HTTP or from a local JSON file. The load
//! is a single request: there is no retry and no backoff, the configured
//! timeout is the only bound on how long it may take.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{header, Client, Response};
use tracing::{debug, info, instrument, warn};

use super::error::{ApiError, Result};
use super::types::{parse_members, MemberBatch};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the member list is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSource {
    /// A remote JSON resource fetched with `GET`.
    Remote(String),
    /// A JSON file on the local filesystem.
    File(PathBuf),
}

impl MemberSource {
    /// Short human-readable description of the source.
    pub fn describe(&self) -> String {
        match self {
            MemberSource::Remote(url) => url.clone(),
            MemberSource::File(path) => path.display().to_string(),
        }
    }
}

/// Client for loading the member list.
#[derive(Debug, Clone)]
pub struct MembersClient {
    /// The HTTP client.
    client: Client,
    /// Where members are loaded from.
    source: MemberSource,
}

impl MembersClient {
    /// Create a new client for the given source.
    ///
    /// Remote URLs are checked and normalized up front so a bad endpoint is
    /// reported before any request is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s) or the HTTP client cannot be built.
    pub fn new(source: MemberSource, timeout: Duration) -> Result<Self> {
        let source = match source {
            MemberSource::Remote(url) => MemberSource::Remote(normalize_endpoint(&url)?),
            file => file,
        };

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { client, source })
    }

    /// Get the configured source.
    pub fn source(&self) -> &MemberSource {
        &self.source
    }

    /// Load and validate the member list.
    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn fetch_members(&self) -> Result<MemberBatch> {
        info!("Loading members");

        let body = match &self.source {
            MemberSource::Remote(url) => self.fetch_remote(url).await?,
            MemberSource::File(path) => read_file(path).await?,
        };

        let batch = parse_members(&body)?;
        info!(
            members = batch.members.len(),
            rejected = batch.rejected.len(),
            "Members loaded"
        );
        Ok(batch)
    }

    /// Perform the single GET request.
    async fn fetch_remote(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Check the status and return the body text.
    async fn handle_response(&self, response: Response) -> Result<String> {
        let status = response.status();
        let url = response.url().to_string();

        if status.is_success() {
            Ok(response.text().await?)
        } else {
            let error_body = response.text().await.unwrap_or_default();
            debug!("Error response body: {}", error_body);
            Err(ApiError::from_status(status, &url))
        }
    }
}

/// Read a member file.
async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ApiError::ReadFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Validate an endpoint URL and strip trailing slashes.
///
/// Plain http is accepted (useful against a local server) but logged.
pub fn normalize_endpoint(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');

    if url.is_empty() {
        return Err(ApiError::InvalidUrl("endpoint cannot be empty".to_string()));
    }

    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(ApiError::InvalidUrl(format!(
            "'{}' must start with http:// or https://",
            url
        )));
    }

    if !url.starts_with("https://") && !url.contains("localhost") {
        warn!("URL does not use HTTPS: {}", url);
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_normalize_endpoint_removes_trailing_slash() {
        assert_eq!(
            normalize_endpoint("https://example.com/members.json/").unwrap(),
            "https://example.com/members.json"
        );
    }

    #[test]
    fn test_normalize_endpoint_trims_whitespace() {
        assert_eq!(
            normalize_endpoint("  https://example.com/m.json ").unwrap(),
            "https://example.com/m.json"
        );
    }

    #[test]
    fn test_normalize_endpoint_accepts_http() {
        assert!(normalize_endpoint("http://localhost:8080/members.json").is_ok());
    }

    #[test]
    fn test_normalize_endpoint_rejects_missing_scheme() {
        let err = normalize_endpoint("example.com/members.json").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_normalize_endpoint_rejects_empty() {
        let err = normalize_endpoint("   ").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_client_rejects_bad_remote_source() {
        let result = MembersClient::new(
            MemberSource::Remote("ftp://example.com".to_string()),
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_source_describe() {
        let source = MemberSource::Remote("https://example.com/m.json".to_string());
        assert_eq!(source.describe(), "https://example.com/m.json");
        let source = MemberSource::File(PathBuf::from("members.json"));
        assert_eq!(source.describe(), "members.json");
    }

    #[tokio::test]
    async fn test_fetch_members_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "1", "name": "Ann", "email": "a@x.com", "role": "Admin"}},
                {{"id": "2", "name": "Bo", "email": "b@x.com", "role": "User"}}]"#
        )
        .unwrap();

        let client = MembersClient::new(
            MemberSource::File(file.path().to_path_buf()),
            Duration::from_secs(1),
        )
        .unwrap();

        let batch = client.fetch_members().await.unwrap();
        assert_eq!(batch.members.len(), 2);
        assert_eq!(batch.members[1].name, "Bo");
    }

    #[tokio::test]
    async fn test_fetch_members_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let client =
            MembersClient::new(MemberSource::File(path.clone()), Duration::from_secs(1)).unwrap();

        match client.fetch_members().await {
            Err(ApiError::ReadFile { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected ReadFile error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_members_file_with_wrong_shape() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"id": "1"}}"#).unwrap();

        let client = MembersClient::new(
            MemberSource::File(file.path().to_path_buf()),
            Duration::from_secs(1),
        )
        .unwrap();

        let err = client.fetch_members().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}

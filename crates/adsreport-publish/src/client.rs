//! HTTP client for the GitHub repository contents API.
//!
//! Publishing is read-check-then-write: the current blob sha for a path is
//! looked up first and, when found, sent with the write so GitHub treats it
//! as an update. Any lookup failure reads as "absent".

use std::time::Duration;

use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::error::PublishError;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com/";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Outcome of one successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub path: String,
    /// `true` when no earlier version existed.
    pub created: bool,
    /// Blob sha of the written content.
    pub sha: String,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    content: ContentEntry,
}

#[derive(Debug, Serialize)]
struct WriteRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

/// Writes files to one branch of one repository.
///
/// Use [`GithubPublisher::new`] for production or
/// [`GithubPublisher::with_base_url`] to point at a mock server in tests.
pub struct GithubPublisher {
    client: Client,
    base_url: Url,
    owner: String,
    repo: String,
    branch: String,
}

impl GithubPublisher {
    /// Creates a publisher pointed at the production GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::InvalidTarget`] if `repo` is not `owner/name`
    /// or the token is not a valid header value, and [`PublishError::Http`]
    /// if the `reqwest::Client` cannot be built.
    pub fn new(
        token: &str,
        repo: &str,
        branch: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, PublishError> {
        Self::with_base_url(token, repo, branch, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a publisher with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`GithubPublisher::new`], plus [`PublishError::InvalidTarget`]
    /// when `base_url` does not parse.
    pub fn with_base_url(
        token: &str,
        repo: &str,
        branch: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PublishError> {
        let (owner, name) = repo
            .split_once('/')
            .filter(|(o, n)| !o.is_empty() && !n.is_empty() && !n.contains('/'))
            .ok_or_else(|| PublishError::InvalidTarget(format!("repo '{repo}' is not owner/name")))?;

        let mut auth = HeaderValue::from_str(&format!("token {token}"))
            .map_err(|_| PublishError::InvalidTarget("token is not a valid header value".into()))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| PublishError::InvalidTarget(format!("base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            owner: owner.to_owned(),
            repo: name.to_owned(),
            branch: branch.to_owned(),
        })
    }

    /// Looks up the current blob sha at `path`.
    ///
    /// Returns `None` for a missing file and for any failure along the way,
    /// so a broken lookup degrades to a create attempt.
    pub async fn current_sha(&self, path: &str) -> Option<String> {
        let mut url = self.contents_url(path).ok()?;
        url.query_pairs_mut().append_pair("ref", &self.branch);

        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(path, error = %e, "sha lookup failed; treating as absent");
                return None;
            }
        };
        if response.status() != StatusCode::OK {
            tracing::debug!(path, status = %response.status(), "no existing content");
            return None;
        }
        match response.json::<ContentEntry>().await {
            Ok(entry) => Some(entry.sha),
            Err(e) => {
                tracing::debug!(path, error = %e, "unreadable sha lookup; treating as absent");
                None
            }
        }
    }

    /// Creates `path` or overwrites it in place.
    ///
    /// # Errors
    ///
    /// - [`PublishError::Http`] on network failure during the write.
    /// - [`PublishError::UnexpectedStatus`] if GitHub rejects the write.
    /// - [`PublishError::Deserialize`] if the write response is malformed.
    pub async fn publish(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
    ) -> Result<PublishReceipt, PublishError> {
        let previous_sha = self.current_sha(path).await;
        let created = previous_sha.is_none();
        let request = WriteRequest {
            message,
            content: base64::engine::general_purpose::STANDARD.encode(content),
            branch: &self.branch,
            sha: previous_sha,
        };

        let response = self
            .client
            .put(self.contents_url(path)?)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PublishError::UnexpectedStatus {
                status: status.as_u16(),
                path: path.to_owned(),
                body,
            });
        }

        let written: WriteResponse =
            serde_json::from_str(&body).map_err(|e| PublishError::Deserialize {
                context: format!("contents PUT {path}"),
                source: e,
            })?;

        tracing::debug!(path, created, sha = %written.content.sha, "content written");
        Ok(PublishReceipt {
            path: path.to_owned(),
            created,
            sha: written.content.sha,
        })
    }

    fn contents_url(&self, path: &str) -> Result<Url, PublishError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| PublishError::InvalidTarget(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_publisher(repo: &str) -> Result<GithubPublisher, PublishError> {
        GithubPublisher::with_base_url("ghp_test", repo, "main", 30, "adsreport-test", "https://api.github.com")
    }

    #[test]
    fn contents_url_splits_repo_and_path() {
        let publisher = test_publisher("acme/reports").unwrap();
        let url = publisher.contents_url("acme-jan4-10/index.html").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/acme/reports/contents/acme-jan4-10/index.html"
        );
    }

    #[test]
    fn rejects_malformed_repo() {
        for repo in ["acme", "acme/", "/reports", "a/b/c"] {
            assert!(
                matches!(test_publisher(repo), Err(PublishError::InvalidTarget(_))),
                "{repo}"
            );
        }
    }

    #[test]
    fn write_request_omits_sha_when_creating() {
        let body = serde_json::to_value(WriteRequest {
            message: "Update x report",
            content: "aGk=".to_string(),
            branch: "main",
            sha: None,
        })
        .unwrap();
        assert!(body.get("sha").is_none());
        assert_eq!(body["branch"], "main");
    }
}

//! Typed endpoints of the padya content API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use padya_domain::commentary::{CommentaryDraft, CommentaryEntry, CreatedCommentary};
use padya_domain::review::{ReviewAction, ReviewRequest};
use padya_domain::verse::{CreatedVerse, ListQuery, VerseRecord, VersePage};
use padya_domain::work::{WorkDetail, WorkSummary};

use crate::error::{extract_detail, ClientError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// The authenticated user, as reported by `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Build a client for a base URL such as `https://padya.example.org/api/`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        // A trailing slash matters to Url::join; add one so relative paths
        // append instead of replacing the last path segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&normalized)
            .map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        let http = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|_| ClientError::InvalidBaseUrl(path.to_string()))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        debug!(%method, %path, "api request");
        let response = request.send().await.map_err(|err| {
            warn!(%method, %path, error = %err, "api transport failure");
            ClientError::Transport(err)
        })?;
        Self::decode(method, path, response).await
    }

    async fn decode<T: DeserializeOwned>(
        method: &str,
        path: &str,
        response: Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            warn!(%method, %path, status = status.as_u16(), "api error response");
            return Err(ClientError::Http {
                status: status.as_u16(),
                detail,
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(ClientError::Decode)
    }

    pub async fn list_works(&self) -> Result<Vec<WorkSummary>, ClientError> {
        let url = self.endpoint("works")?;
        self.execute("GET", "works", self.http.get(url)).await
    }

    pub async fn get_work(&self, work_id: &str) -> Result<WorkDetail, ClientError> {
        let path = format!("works/{work_id}");
        let url = self.endpoint(&path)?;
        self.execute("GET", &path, self.http.get(url)).await
    }

    pub async fn list_verses(
        &self,
        work_id: &str,
        query: &ListQuery,
    ) -> Result<VersePage, ClientError> {
        let path = format!("works/{work_id}/verses");
        let mut url = self.endpoint(&path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("offset", &query.offset.to_string());
            pairs.append_pair("limit", &query.limit.to_string());
            if let Some(q) = query.query.as_deref() {
                if !q.is_empty() {
                    pairs.append_pair("q", q);
                }
            }
        }
        self.execute("GET", &path, self.http.get(url)).await
    }

    pub async fn get_verse(
        &self,
        work_id: &str,
        verse_id: &str,
    ) -> Result<VerseRecord, ClientError> {
        let path = format!("works/{work_id}/verses/{verse_id}");
        let url = self.endpoint(&path)?;
        self.execute("GET", &path, self.http.get(url)).await
    }

    pub async fn create_verse<P: Serialize>(
        &self,
        work_id: &str,
        payload: &P,
    ) -> Result<CreatedVerse, ClientError> {
        let path = format!("works/{work_id}/verses");
        let url = self.endpoint(&path)?;
        self.execute("POST", &path, self.http.post(url).json(payload))
            .await
    }

    pub async fn update_verse<P: Serialize>(
        &self,
        work_id: &str,
        verse_id: &str,
        payload: &P,
    ) -> Result<VerseRecord, ClientError> {
        let path = format!("works/{work_id}/verses/{verse_id}");
        let url = self.endpoint(&path)?;
        self.execute("PUT", &path, self.http.put(url).json(payload))
            .await
    }

    pub async fn list_commentary(
        &self,
        work_id: &str,
        verse_id: &str,
    ) -> Result<Vec<CommentaryEntry>, ClientError> {
        let path = format!("works/{work_id}/verses/{verse_id}/commentary");
        let url = self.endpoint(&path)?;
        self.execute("GET", &path, self.http.get(url)).await
    }

    pub async fn create_commentary(
        &self,
        work_id: &str,
        verse_id: &str,
        draft: &CommentaryDraft,
    ) -> Result<CreatedCommentary, ClientError> {
        let path = format!("works/{work_id}/verses/{verse_id}/commentary");
        let url = self.endpoint(&path)?;
        self.execute("POST", &path, self.http.post(url).json(draft))
            .await
    }

    /// Request a review transition; the response is the reloaded verse.
    pub async fn review_verse(
        &self,
        verse_id: &str,
        action: ReviewAction,
        request: &ReviewRequest,
    ) -> Result<VerseRecord, ClientError> {
        let path = format!("review/verse/{verse_id}/{}", action.endpoint_name());
        let url = self.endpoint(&path)?;
        self.execute("POST", &path, self.http.post(url).json(request))
            .await
    }

    pub async fn me(&self) -> Result<AuthUser, ClientError> {
        let url = self.endpoint("me")?;
        self.execute("GET", "me", self.http.get(url)).await
    }

    /// Quick reachability probe with a short timeout; any failure is just
    /// `false`, never an error.
    pub async fn health(&self) -> bool {
        let Ok(url) = self.endpoint("health") else {
            return false;
        };
        match self.http.get(url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!(error = %err, "health probe failed");
                false
            }
        }
    }
}

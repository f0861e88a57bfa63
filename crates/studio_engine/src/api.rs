use std::time::Duration;

use studio_core::{CachedData, QueryKey, QueueAndProcessorStatus};
use studio_logging::{studio_debug, Namespace};
use url::Url;

use crate::{ApiError, FailureKind};

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:9090";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Address of the local backend, used when no base URL is configured.
    pub origin: String,
    /// Remote backend address. Empty or absent means the local default.
    pub base_url: Option<String>,
    pub queue_id: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            base_url: None,
            queue_id: "default".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ApiSettings {
    /// Base URL if one is configured and non-empty.
    pub fn remote_base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn is_remote(&self) -> bool {
        self.remote_base_url().is_some()
    }

    fn root(&self) -> Result<Url, ApiError> {
        let raw = self.remote_base_url().unwrap_or(&self.origin);
        let mut root = Url::parse(raw)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))?;
        // `Url::join` replaces the last segment unless the path ends in '/'.
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        Ok(root)
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.root()?
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{path}: {err}")))
    }

    pub fn query_path(&self, key: &QueryKey) -> String {
        match key {
            QueryKey::QueueStatus => format!("api/v1/queue/{}/status", self.queue_id),
            QueryKey::QueueItems => format!("api/v1/queue/{}/list", self.queue_id),
            QueryKey::BoardList => "api/v1/boards/?all=true".to_string(),
            QueryKey::ImageList { board_id } => format!(
                "api/v1/images/?board_id={}",
                board_id.as_deref().unwrap_or("none")
            ),
        }
    }
}

/// Requests against the studio backend.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn fetch_query(&self, key: &QueryKey) -> Result<CachedData, ApiError>;

    async fn fetch_openapi_schema(&self) -> Result<serde_json::Value, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.settings.endpoint(path)?;
        studio_debug!(Namespace::Api, "GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(body.to_vec())
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApi {
    async fn fetch_query(&self, key: &QueryKey) -> Result<CachedData, ApiError> {
        let body = self.get_bytes(&self.settings.query_path(key)).await?;
        match key {
            QueryKey::QueueStatus => serde_json::from_slice::<QueueAndProcessorStatus>(&body)
                .map(CachedData::QueueStatus)
                .map_err(decode_error),
            _ => serde_json::from_slice(&body)
                .map(CachedData::Json)
                .map_err(decode_error),
        }
    }

    async fn fetch_openapi_schema(&self) -> Result<serde_json::Value, ApiError> {
        let body = self.get_bytes("openapi.json").await?;
        serde_json::from_slice(&body).map_err(decode_error)
    }
}

fn decode_error(err: serde_json::Error) -> ApiError {
    ApiError::new(FailureKind::Decode, err.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

use std::time::Instant;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::Duration;
use tracing::debug;

use super::error::ApiError;
use super::graphql::{GraphQLExecutor, GraphQLPayload, GraphQLResponse};
use crate::types::PageInfo;

/// GitLab host used when none is configured
pub const DEFAULT_GITLAB_HOST: &str = "https://gitlab.com";

/// Default timeout for a single API request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Successful API response with the pagination counters GitLab reported
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub page_info: PageInfo,
}

/// Thin client over the GitLab REST v4 and GraphQL APIs.
///
/// Every call is a single HTTP request. Failures are returned as [`ApiError`]
/// without retrying; classification into user-facing messages happens in the
/// tool layer.
#[derive(Clone)]
pub struct GitLabClient {
    http: reqwest::Client,
    api_base: String,
    graphql_url: String,
}

impl GitLabClient {
    /// Creates a client for `host` (default `https://gitlab.com`).
    ///
    /// A host without scheme gets `https://`. The token is sent as `PRIVATE-TOKEN`.
    pub fn new(token: Option<String>, host: Option<&str>, timeout: Option<Duration>) -> Result<Self> {
        let host = normalize_host(host.unwrap_or(DEFAULT_GITLAB_HOST));

        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&token)
                .context("GitLab token contains characters not allowed in an HTTP header")?;
            value.set_sensitive(true);
            headers.insert(PRIVATE_TOKEN_HEADER, value);
        }

        let timeout_duration = timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let connect_timeout = std::cmp::min(
            std::cmp::max(timeout_duration, Duration::from_secs(1)),
            Duration::from_secs(10),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(connect_timeout)
            .timeout(timeout_duration)
            .build()
            .context("Failed to build GitLab HTTP client")?;

        Ok(Self {
            http,
            api_base: format!("{}/api/v4", host),
            graphql_url: format!("{}/api/graphql", host),
        })
    }

    /// REST base URL, e.g. `https://gitlab.com/api/v4`
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.api_base, path))
    }

    pub(crate) async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        let builder = self.request(Method::GET, path);
        self.execute(Method::GET, path, builder).await
    }

    pub(crate) async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path).query(query);
        self.execute(Method::GET, path, builder).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path).json(body);
        self.execute(Method::POST, path, builder).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, path).json(body);
        self.execute(Method::PUT, path, builder).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<ApiResponse<()>, ApiError> {
        let builder = self.request(Method::DELETE, path);
        self.execute(Method::DELETE, path, builder).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>, ApiError> {
        let start_time = Instant::now();
        let response = builder.send().await?;

        let status = response.status();
        let page_info = parse_page_info(response.headers());
        let body = response.bytes().await?;

        debug!(
            "GitLab API {} {} returned {} in {:?}",
            method,
            path,
            status,
            start_time.elapsed()
        );

        if !status.is_success() {
            return Err(ApiError::from_response(method, path, status, &body));
        }

        let data = if body.is_empty() {
            serde_json::from_slice(b"null")?
        } else {
            serde_json::from_slice(&body)?
        };

        Ok(ApiResponse { data, page_info })
    }
}

impl GraphQLExecutor for GitLabClient {
    async fn execute_graphql<T: Serialize, R: DeserializeOwned>(
        &self,
        query_name: &str,
        payload: GraphQLPayload<T>,
    ) -> Result<R, ApiError> {
        let start_time = Instant::now();
        let response = self.http.post(&self.graphql_url).json(&payload).send().await?;

        let status = response.status();
        let body = response.bytes().await?;

        debug!(
            "GitLab GraphQL query {} returned {} in {:?}",
            query_name,
            status,
            start_time.elapsed()
        );

        if !status.is_success() {
            return Err(ApiError::from_response(
                Method::POST,
                "/api/graphql",
                status,
                &body,
            ));
        }

        let response: GraphQLResponse<R> = serde_json::from_slice(&body)?;
        if !response.errors.is_empty() {
            let error_msg = response
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!("GraphQL query {} reported errors: {}", query_name, error_msg);
            return Err(ApiError::GraphQL(error_msg));
        }

        response
            .data
            .ok_or_else(|| ApiError::GraphQL(format!("GraphQL query {} returned no data", query_name)))
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    let host = host.strip_suffix("/api/v4").unwrap_or(host);
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

fn parse_page_info(headers: &HeaderMap) -> PageInfo {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(0)
    };

    PageInfo {
        total_items: read("x-total"),
        total_pages: read("x-total-pages"),
        current_page: read("x-page"),
        items_per_page: read("x-per-page"),
    }
}

use crate::error::{Result, ScrapeError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Text of a fetched page, owned by the request that fetched it.
#[derive(Debug)]
pub struct RawDocument {
    pub url: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Option<HeaderMap>,
    pub timeout: Option<Duration>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: None,
            timeout: None,
        }
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Header set ESPN expects before it will serve a page.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        ),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers
}

#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: Client,
}

impl DocumentFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: &FetchRequest) -> Result<reqwest::Response> {
        debug!("GET {}", request.url);
        let mut builder = self.client.get(&request.url);
        if let Some(headers) = &request.headers {
            builder = builder.headers(headers.clone());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("GET {} returned {}", request.url, status);
            return Err(ScrapeError::Fetch {
                status: status.as_u16(),
                url: request.url.clone(),
            });
        }
        Ok(response)
    }

    pub async fn fetch(&self, request: FetchRequest) -> Result<RawDocument> {
        let response = self.send(&request).await?;
        let body = response.text().await?;
        Ok(RawDocument {
            url: request.url,
            body,
        })
    }

    pub async fn fetch_json(&self, request: FetchRequest) -> Result<Value> {
        let response = self.send(&request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::get;
    use axum::Router;

    /// Serves `router` on an ephemeral local port and returns its base URL.
    pub(crate) async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn non_success_status_carries_the_url() {
        let base = serve(Router::new().route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "gone") }),
        ))
        .await;
        let fetcher = DocumentFetcher::new(Client::new());
        let url = format!("{base}/missing");

        match fetcher.fetch(FetchRequest::new(&url)).await {
            Err(ScrapeError::Fetch { status, url: failed }) => {
                assert_eq!(status, 404);
                assert_eq!(failed, url);
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn headers_are_sent_per_request() {
        let base = serve(Router::new().route(
            "/ua",
            get(|headers: AxumHeaders| async move {
                headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            }),
        ))
        .await;
        let fetcher = DocumentFetcher::new(Client::new());

        let with_headers = fetcher
            .fetch(FetchRequest::new(format!("{base}/ua")).headers(browser_headers()))
            .await
            .unwrap();
        assert!(with_headers.body.starts_with("Mozilla/5.0"));

        let plain = fetcher
            .fetch(FetchRequest::new(format!("{base}/ua")))
            .await
            .unwrap();
        assert!(!plain.body.starts_with("Mozilla/5.0"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let fetcher = DocumentFetcher::new(Client::new());
        let result = fetcher
            .fetch(FetchRequest::new("http://127.0.0.1:1/").timeout(Duration::from_secs(2)))
            .await;
        assert!(matches!(result, Err(ScrapeError::Network(_))));
    }
}

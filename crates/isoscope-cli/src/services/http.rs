use super::{Result, ServiceError};
use crate::config::HttpSettings;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Shared HTTP client with rate-limit handling.
///
/// Requests answered with `429 Too Many Requests` are retried after the delay given in
/// `Retry-After`, up to `max_attempts` in total. Every other non-success status is
/// returned as [`ServiceError::Status`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    max_attempts: u32,
}

impl HttpClient {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(agent) = HeaderValue::from_str(&settings.user_agent) {
            headers.insert(USER_AGENT, agent);
        } else {
            warn!("Ignoring invalid user agent {:?}", settings.user_agent);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            max_attempts: settings.max_attempts.max(1),
        })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Sends `request`, retrying while the server rate-limits, and returns the first
    /// successful response.
    pub async fn send(&self, service: &'static str, request: RequestBuilder) -> Result<Response> {
        let url = describe(&request);
        let mut attempts = 0;

        loop {
            let attempt = match request.try_clone() {
                Some(r) => r,
                None => return self.finish(service, &url, request.send().await?).await,
            };
            attempts += 1;
            debug!(service, url = %url, attempts, "Sending request");
            let response = attempt.send().await?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return self.finish(service, &url, response).await;
            }
            if attempts >= self.max_attempts {
                return Err(ServiceError::RateLimited {
                    service,
                    url,
                    attempts,
                });
            }

            let wait = retry_delay(response.headers());
            warn!(
                "{} rate limited the request. Waiting {:.1}s before retrying...",
                service,
                wait.as_secs_f64()
            );
            tokio::time::sleep(wait).await;
        }
    }

    async fn finish(&self, service: &'static str, url: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ServiceError::Status {
            service,
            url: url.to_string(),
            status,
            body: body.chars().take(200).collect(),
        })
    }

    /// Fetches a text body, failing on an empty or whitespace-only payload.
    pub async fn fetch_text(&self, service: &'static str, request: RequestBuilder) -> Result<String> {
        let url = describe(&request);
        let text = self.send(service, request).await?.text().await?;
        if text.trim().is_empty() {
            return Err(ServiceError::EmptyResponse { service, url });
        }
        Ok(text)
    }

    /// Like [`fetch_text`](Self::fetch_text), streaming the body and reporting
    /// `(received, total)` byte counts as chunks arrive.
    pub async fn fetch_text_with_progress(
        &self,
        service: &'static str,
        request: RequestBuilder,
        mut on_progress: impl FnMut(u64, Option<u64>),
    ) -> Result<String> {
        let url = describe(&request);
        let response = self.send(service, request).await?;
        let total = response.content_length();

        let mut body = Vec::with_capacity(total.unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk?);
            on_progress(body.len() as u64, total);
        }

        let text = String::from_utf8_lossy(&body).into_owned();
        if text.trim().is_empty() {
            return Err(ServiceError::EmptyResponse { service, url });
        }
        Ok(text)
    }
}

fn describe(request: &RequestBuilder) -> String {
    request
        .try_clone()
        .and_then(|r| r.build().ok())
        .map(|r| r.url().to_string())
        .unwrap_or_else(|| "<request>".to_string())
}

/// Delay requested by a `Retry-After` header given in seconds, capped at one minute.
/// Missing or unparseable values fall back to one second.
pub fn retry_delay(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_DELAY)
        .min(MAX_RETRY_DELAY)
}

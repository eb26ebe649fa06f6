use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

#[cfg(test)]
use std::cell::RefCell;

use crate::error::{ApiError, ApiResult};
use crate::protocol::ApiRequest;

// =========================================================
// HTTP Interface Abstraction
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport used by [`ApiClient`].
///
/// `Err` means the request never produced an HTTP answer; any status code,
/// including 4xx/5xx, is an `Ok` response. `?Send` because browser futures are
/// not `Send`.
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String>;
}

// =========================================================
// Typed API client
// =========================================================

/// Error body shape shared by every endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// One place for "build request, send, check status, decode JSON".
#[derive(Debug, Clone)]
pub struct ApiClient<C> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Sends a typed request, optionally with a bearer token.
    pub async fn call<R: ApiRequest>(
        &self,
        req: &R,
        token: Option<&str>,
    ) -> ApiResult<R::Response> {
        let mut http = HttpRequest::new(&self.url(R::PATH), R::METHOD);

        // Unit requests serialize to `null` and are sent without a body.
        if R::METHOD != HttpMethod::Get {
            let body = serde_json::to_string(req).map_err(|e| ApiError::Decode {
                path: R::PATH,
                reason: e.to_string(),
            })?;
            if body != "null" {
                http = http
                    .with_header("Content-Type", "application/json")
                    .with_body(body);
            }
        }

        if let Some(token) = token {
            http = http.with_header("Authorization", &format!("Bearer {}", token));
        }

        let resp = self
            .client
            .send(http)
            .await
            .map_err(|reason| ApiError::Transport {
                path: R::PATH,
                reason,
            })?;

        if !resp.is_success() {
            log::debug!("{} {} -> {}", R::METHOD.as_str(), R::PATH, resp.status);
            // An error page that is not JSON says nothing about the request.
            let body: ErrorBody = serde_json::from_str(&resp.body).map_err(|e| ApiError::Decode {
                path: R::PATH,
                reason: format!("status {}: {}", resp.status, e),
            })?;
            return Err(ApiError::Rejected {
                path: R::PATH,
                status: resp.status,
                message: body.error,
            });
        }

        decode_body::<R::Response>(&resp.body).map_err(|e| ApiError::Decode {
            path: R::PATH,
            reason: e.to_string(),
        })
    }
}

/// Empty bodies decode as JSON `null` so unit-like responses still work.
fn decode_body<T: DeserializeOwned>(body: &str) -> serde_json::Result<T> {
    if body.trim().is_empty() {
        serde_json::from_str("null")
    } else {
        serde_json::from_str(body)
    }
}

// =========================================================
// Test utility: MockHttpClient
// =========================================================

#[cfg(test)]
pub struct MockHttpClient {
    // URL -> Ok((status, body)) or Err(transport reason)
    responses: RefCell<HashMap<String, Result<(u16, String), String>>>,
    // (URL, Method, Headers, Body)
    pub requests: RefCell<Vec<(String, HttpMethod, HashMap<String, String>, Option<String>)>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), Ok((status, body.to_string())));
    }

    pub fn mock_raw(&self, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), Ok((status, body.to_string())));
    }

    pub fn mock_transport_error(&self, url: &str, reason: &str) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), Err(reason.to_string()));
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        self.requests.borrow_mut().push((
            req.url.clone(),
            req.method,
            req.headers.clone(),
            req.body.clone(),
        ));

        match self.responses.borrow().get(&req.url) {
            Some(Ok((status, body))) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(Err(reason)) => Err(reason.clone()),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl<T: HttpClient> HttpClient for std::rc::Rc<T> {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        self.as_ref().send(req).await
    }
}

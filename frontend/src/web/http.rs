//! Browser transport for the shared [`HttpClient`] trait, on top of `fetch`.

use aigrowth_shared::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use gloo_net::http::{Request, RequestBuilder};

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

fn builder(url: &str, method: HttpMethod) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        let mut builder = builder(&req.url, req.method);
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| e.to_string())?;

        let res = request.send().await.map_err(|e| e.to_string())?;
        let status = res.status();
        // An unreadable body on an error status is still an answer.
        let body = res.text().await.unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}

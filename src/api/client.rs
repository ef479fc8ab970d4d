use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method};
use serde_json::{json, Value};

use super::error::ApiError;
use super::types::{ApiResponse, ResponseBody};
use super::ContentApi;

/// Maximum entries requested per content type on export.
pub const EXPORT_PAGE_LIMIT: usize = 1000;

/// `<base>/api/<type>`
pub fn collection_url(base_url: &str, content_type: &str) -> String {
    format!("{}/api/{}", base_url.trim_end_matches('/'), content_type)
}

/// List URL with the page limit and every relation populated.
pub fn list_url(base_url: &str, content_type: &str) -> String {
    format!("{}?pagination[limit]={}&populate=*", collection_url(base_url, content_type), EXPORT_PAGE_LIMIT)
}

/// Bearer-authenticated JSON client for one CMS instance.
#[derive(Clone)]
pub struct StrapiClient {
    http: HttpClient,
    base_url: String,
    token: String,
}

impl StrapiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = HttpClient::builder();
        if let Some(t) = timeout { builder = builder.timeout(t); }
        let http = builder.build().map_err(ApiError::from_reqwest)?;
        Ok(Self { http, base_url: base_url.into(), token: token.into() })
    }

    fn default_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ApiError::InvalidHeader(AUTHORIZATION.as_str().to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// One request. The body is buffered whole, then parsed as JSON with a raw
    /// text fallback; only transport failures are returned as errors.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        extra_headers: &[(&str, &str)],
    ) -> Result<ApiResponse, ApiError> {
        let mut headers = self.default_headers()?;
        for (name, value) in extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| ApiError::InvalidHeader(name.to_string()))?;
            let value = HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(name.as_str().to_string()))?;
            headers.insert(name, value);
        }

        let mut req = self.http.request(method, url).headers(headers);
        if let Some(b) = body {
            req = req.body(serde_json::to_vec(b)?);
        }

        let response = req.send().await.map_err(ApiError::from_reqwest)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::from_reqwest)?;
        Ok(ApiResponse::new(status, ResponseBody::from_bytes(&bytes)))
    }
}

#[async_trait]
impl ContentApi for StrapiClient {
    async fn fetch_entries(&self, content_type: &str) -> Result<ApiResponse, ApiError> {
        let url = list_url(&self.base_url, content_type);
        self.request(Method::GET, &url, None, &[]).await
    }

    async fn create_entry(&self, content_type: &str, entry: &Value) -> Result<ApiResponse, ApiError> {
        let url = collection_url(&self.base_url, content_type);
        let payload = json!({ "data": entry });
        self.request(Method::POST, &url, Some(&payload), &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path, query_param},
    };

    #[test]
    fn builds_list_and_collection_urls() {
        assert_eq!(collection_url("http://localhost:1337/", "attraction"), "http://localhost:1337/api/attraction");
        assert_eq!(
            list_url("http://localhost:1337", "cover-content"),
            "http://localhost:1337/api/cover-content?pagination[limit]=1000&populate=*"
        );
    }

    #[tokio::test]
    async fn fetch_sends_bearer_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/healthcare"))
            .and(query_param("pagination[limit]", "1000"))
            .and(query_param("populate", "*"))
            .and(header("authorization", "Bearer secret"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = StrapiClient::new(server.uri(), "secret", None).unwrap();
        let resp = client.fetch_entries("healthcare").await.unwrap();
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, ResponseBody::Json(serde_json::json!({"data": []})));
    }

    #[tokio::test]
    async fn create_wraps_entry_in_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/suggestion"))
            .and(body_json(serde_json::json!({"data": {"title": "Park"}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"data": {"id": 9}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = StrapiClient::new(server.uri(), "t", None).unwrap();
        let resp = client.create_entry("suggestion", &serde_json::json!({"title": "Park"})).await.unwrap();
        assert!(resp.is_created());
    }

    #[tokio::test]
    async fn non_json_body_is_returned_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let client = StrapiClient::new(server.uri(), "t", None).unwrap();
        let resp = client.request(Method::GET, &format!("{}/anything", server.uri()), None, &[]).await.unwrap();
        assert_eq!(resp.status, StatusCode::BAD_GATEWAY);
        assert_eq!(resp.body, ResponseBody::Text("<html>Bad Gateway</html>".into()));
    }

    #[tokio::test]
    async fn extra_headers_override_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("content-type", "text/plain"))
            .and(header("x-trace", "abc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = StrapiClient::new(server.uri(), "t", None).unwrap();
        let resp = client
            .request(Method::GET, &server.uri(), None, &[("content-type", "text/plain"), ("x-trace", "abc")])
            .await
            .unwrap();
        assert_eq!(resp.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        // Nothing listens on port 1.
        let client = StrapiClient::new("http://127.0.0.1:1", "t", Some(Duration::from_secs(5))).unwrap();
        let err = client.fetch_entries("attraction").await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_) | ApiError::Timeout));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = StrapiClient::new(server.uri(), "t", Some(Duration::from_millis(100))).unwrap();
        let err = client.fetch_entries("attraction").await.unwrap_err();
        assert!(err.is_timeout());
    }
}

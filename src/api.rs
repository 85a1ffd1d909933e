//! Blocking HTTP client wrappers for API tests.
//!
//! [`ApiClient`] is a thin layer over `reqwest::blocking::Client`: base-URL
//! joining and optional basic auth, nothing more. Request semantics belong
//! to the HTTP library. [`PostmanEchoApi`] is the example client the sample
//! tests drive.

use std::collections::HashMap;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A base-URL-scoped blocking HTTP client
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Option<(String, String)>,
}

impl ApiClient {
    /// Create a client rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            auth: None,
        }
    }

    /// Attach basic-auth credentials to every request.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }

    /// Send a GET request to `path`.
    pub fn get(&self, path: &str) -> Result<Response> {
        Ok(self.authed(self.client.get(self.url(path))).send()?)
    }

    /// Send a GET request to `path` with query parameters.
    pub fn get_with_query<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<Response> {
        Ok(self
            .authed(self.client.get(self.url(path)).query(query))
            .send()?)
    }

    /// Send a POST request to `path` with a JSON body.
    pub fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        Ok(self
            .authed(self.client.post(self.url(path)).json(body))
            .send()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some((username, password)) => builder.basic_auth(username, Some(password)),
            None => builder,
        }
    }
}

/// Response shape shared by the Postman Echo endpoints
#[derive(Debug, Deserialize)]
pub struct EchoResponse {
    /// Query parameters echoed back
    #[serde(default)]
    pub args: HashMap<String, String>,
    /// JSON body echoed back, for POST requests
    #[serde(default)]
    pub json: Option<serde_json::Value>,
    /// URL the echo service saw
    #[serde(default)]
    pub url: String,
}

/// Example API client for Postman Echo endpoints
#[derive(Debug, Clone)]
pub struct PostmanEchoApi {
    client: ApiClient,
}

impl PostmanEchoApi {
    /// Public Postman Echo base URL
    pub const BASE_URL: &'static str = "https://postman-echo.com";

    pub fn new() -> Self {
        Self::with_base_url(Self::BASE_URL)
    }

    /// Point the client at a different base URL (a mock server in tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: ApiClient::new(base_url),
        }
    }

    /// Attach basic-auth credentials.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.client = self.client.with_basic_auth(username, password);
        self
    }

    /// GET `/get` with the given query parameters.
    pub fn echo_get(&self, params: &[(&str, &str)]) -> Result<Response> {
        self.client.get_with_query("/get", params)
    }

    /// POST `/post` with a JSON payload.
    pub fn echo_post<B: Serialize + ?Sized>(&self, payload: &B) -> Result<Response> {
        self.client.post_json("/post", payload)
    }

    /// GET `/basic-auth`, which requires credentials.
    pub fn basic_auth(&self) -> Result<Response> {
        self.client.get("/basic-auth")
    }
}

impl Default for PostmanEchoApi {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_echo_get_round_trip() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/get")
                .query_param("foo1", "bar1")
                .query_param("foo2", "bar2");
            then.status(200).json_body(json!({
                "args": {"foo1": "bar1", "foo2": "bar2"},
                "url": "/get?foo1=bar1&foo2=bar2",
            }));
        });

        let api = PostmanEchoApi::with_base_url(server.base_url());
        let response = api
            .echo_get(&[("foo1", "bar1"), ("foo2", "bar2")])
            .unwrap();
        assert_eq!(response.status(), 200);

        let echo: EchoResponse = response.json().unwrap();
        assert_eq!(echo.args.get("foo1").map(String::as_str), Some("bar1"));
        assert_eq!(echo.args.get("foo2").map(String::as_str), Some("bar2"));
        mock.assert();
    }

    #[test]
    fn test_echo_post_round_trip() {
        let server = MockServer::start();
        let payload = json!({"key": "value"});
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/post")
                .json_body(payload.clone());
            then.status(200).json_body(json!({"json": {"key": "value"}}));
        });

        let api = PostmanEchoApi::with_base_url(server.base_url());
        let response = api.echo_post(&payload).unwrap();
        assert_eq!(response.status(), 200);

        let echo: EchoResponse = response.json().unwrap();
        assert_eq!(echo.json, Some(payload));
        mock.assert();
    }

    #[test]
    fn test_basic_auth_header_is_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/basic-auth")
                // base64("user:pass")
                .header("authorization", "Basic dXNlcjpwYXNz");
            then.status(200).json_body(json!({"authenticated": true}));
        });

        let api = PostmanEchoApi::with_base_url(server.base_url())
            .with_credentials("user", "pass");
        let response = api.basic_auth().unwrap();
        assert_eq!(response.status(), 200);
        mock.assert();
    }

    #[test]
    fn test_unauthenticated_request_has_no_header() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/get");
            then.status(200).json_body(json!({"args": {}}));
        });

        let api = PostmanEchoApi::with_base_url(server.base_url());
        let response = api.echo_get(&[]).unwrap();
        assert_eq!(response.status(), 200);
        mock.assert();
    }
}

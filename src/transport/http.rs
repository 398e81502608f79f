//! HTTP transport over reqwest
//!
//! Wire mapping:
//! - search: `POST {base}/{index}/_search?scroll={ttl}`
//! - next:   `POST {base}/_search/scroll` with `{"scroll": ttl, "<param>": id}`
//! - close:  `DELETE {base}/_search/scroll` with `{"<param>": [id]}`

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, StatusCode, Url};
use serde_json::{Map, Value};

use super::client::Transport;
use super::errors::{TransportError, TransportResult};
use crate::query::EncodedQuery;
use crate::scroll::{ScrollId, ScrollTtl};

/// Default request-body key carrying the cursor on continuation and close
pub const DEFAULT_CURSOR_PARAM: &str = "scroll_id";

#[derive(Clone)]
struct Credentials {
    username: String,
    password: String,
}

/// Builder for [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    url: String,
    username: String,
    password: String,
    timeout: Option<Duration>,
    cursor_param: String,
}

impl HttpTransportBuilder {
    /// Basic-auth credentials; an empty username sends none
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Request-body key for the cursor
    pub fn cursor_param(mut self, name: impl Into<String>) -> Self {
        self.cursor_param = name.into();
        self
    }

    pub fn build(self) -> TransportResult<HttpTransport> {
        let base_url =
            Url::parse(&self.url).map_err(|_| TransportError::InvalidUrl(self.url.clone()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(self.url));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        let credentials = if self.username.is_empty() {
            None
        } else {
            Some(Credentials {
                username: self.username,
                password: self.password,
            })
        };

        Ok(HttpTransport {
            client,
            base_url,
            credentials,
            cursor_param: self.cursor_param,
        })
    }
}

/// Transport speaking the search engine's scroll REST API
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
    cursor_param: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field(
                "username",
                &self.credentials.as_ref().map(|c| c.username.as_str()),
            )
            .field("cursor_param", &self.cursor_param)
            .finish()
    }
}

impl HttpTransport {
    /// Transport without credentials and default settings
    pub fn new(url: impl Into<String>) -> TransportResult<Self> {
        Self::builder(url).build()
    }

    pub fn builder(url: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder {
            url: url.into(),
            username: String::new(),
            password: String::new(),
            timeout: None,
            cursor_param: DEFAULT_CURSOR_PARAM.to_string(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> TransportResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, body: Vec<u8>) -> RequestBuilder {
        let req = self
            .client
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body);
        match &self.credentials {
            Some(c) => req.basic_auth(&c.username, Some(&c.password)),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> TransportResult<(StatusCode, Vec<u8>)> {
        let resp = req.send().await.map_err(TransportError::Request)?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(TransportError::Request)?;
        Ok((status, body.to_vec()))
    }

    fn cursor_body(&self, cursor: Value, ttl: Option<ScrollTtl>) -> TransportResult<Vec<u8>> {
        let mut body = Map::new();
        if let Some(ttl) = ttl {
            body.insert("scroll".into(), Value::String(ttl.as_param()));
        }
        body.insert(self.cursor_param.clone(), cursor);
        serde_json::to_vec(&Value::Object(body)).map_err(|e| TransportError::Client(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn search(
        &self,
        index: &str,
        payload: &EncodedQuery,
        ttl: ScrollTtl,
    ) -> TransportResult<Vec<u8>> {
        let mut url = self.endpoint(&[index, "_search"])?;
        url.query_pairs_mut().append_pair("scroll", &ttl.as_param());

        let (status, body) = self
            .send(self.request(Method::POST, url, payload.as_bytes().to_vec()))
            .await?;
        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn scroll_next(&self, scroll_id: &ScrollId, ttl: ScrollTtl) -> TransportResult<Vec<u8>> {
        let url = self.endpoint(&["_search", "scroll"])?;
        let payload = self.cursor_body(Value::String(scroll_id.as_str().to_string()), Some(ttl))?;

        let (status, body) = self.send(self.request(Method::POST, url, payload)).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(TransportError::cursor_expired(&body));
        }
        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn scroll_close(&self, scroll_id: &ScrollId) -> TransportResult<()> {
        let url = self.endpoint(&["_search", "scroll"])?;
        let payload = self.cursor_body(
            Value::Array(vec![Value::String(scroll_id.as_str().to_string())]),
            None,
        )?;

        let (status, body) = self.send(self.request(Method::DELETE, url, payload)).await?;
        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), &body));
        }
        Ok(())
    }
}

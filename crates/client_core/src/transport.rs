use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde_json::Value;
use shared::{
    domain::ItemId,
    error::ApiError,
    protocol::{ItemOperation, ListQuery, MutationMethod},
};
use tracing::debug;
use url::Url;

use crate::{config::Settings, error::ListError};

/// Network seam of a [`crate::ListController`].
#[async_trait]
pub trait ListTransport: Send + Sync {
    /// Fetches one page and returns the raw JSON body of a 2xx response.
    async fn fetch_page(&self, query: &ListQuery) -> Result<Value, ListError>;
    async fn send_mutation(&self, id: &ItemId, operation: &ItemOperation)
        -> Result<(), ListError>;
}

pub struct HttpListTransport {
    http: Client,
    collection_url: Url,
    session_cookie: Option<String>,
}

impl HttpListTransport {
    /// `path` is appended to the base url verbatim, so a base such as
    /// `https://host/backend` keeps its prefix.
    pub fn new(base_url: &str, path: &str) -> anyhow::Result<Self> {
        Self::with_client(Client::new(), base_url, path)
    }

    pub fn from_settings(settings: &Settings, path: &str) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build HTTP client")?;
        let mut transport = Self::with_client(http, &settings.base_url, path)?;
        transport.session_cookie = settings.session_cookie.clone();
        Ok(transport)
    }

    pub fn with_client(http: Client, base_url: &str, path: &str) -> anyhow::Result<Self> {
        let raw = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let collection_url =
            Url::parse(&raw).with_context(|| format!("invalid collection url '{raw}'"))?;
        if collection_url.cannot_be_a_base() {
            bail!("collection url '{raw}' cannot carry item paths");
        }
        Ok(Self {
            http,
            collection_url,
            session_cookie: None,
        })
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    /// `{collection}/{id}` plus the operation's action segment, if any.
    pub fn item_url(&self, id: &ItemId, operation: &ItemOperation) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
            if let Some(action) = operation.action() {
                segments.push(action);
            }
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.session_cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }
}

#[async_trait]
impl ListTransport for HttpListTransport {
    async fn fetch_page(&self, query: &ListQuery) -> Result<Value, ListError> {
        debug!(url = %self.collection_url, page = query.page, "fetching list page");
        let response = self
            .request(Method::GET, self.collection_url.clone())
            .query(query)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        response
            .json::<Value>()
            .await
            .map_err(|err| ListError::Decode(err.to_string()))
    }

    async fn send_mutation(
        &self,
        id: &ItemId,
        operation: &ItemOperation,
    ) -> Result<(), ListError> {
        let method = match operation.method() {
            MutationMethod::Post => Method::POST,
            MutationMethod::Patch => Method::PATCH,
            MutationMethod::Delete => Method::DELETE,
        };
        let url = self.item_url(id, operation);
        debug!(%method, %url, "sending item mutation");

        let mut builder = self.request(method, url);
        if let Some(body) = operation.body() {
            builder = builder.json(&body);
        }
        ensure_success(builder.send().await?).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response, ListError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ApiError>()
        .await
        .ok()
        .and_then(|body| body.message_text().map(str::to_string));
    Err(ListError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;

//! The request pipeline every endpoint goes through.
//!
//! One call to [`Client::execute`] composes the headers, optionally dumps a
//! redacted copy of the request, sends it through the retrying transport,
//! reads the whole body, optionally dumps the response, and hands back a
//! [`RawResponse`]. Status codes are not interpreted here.

use crate::client::Client;
use crate::dump;
use crate::error::{Error, Result};
use crate::headers;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use together_resilience::{Context, TransportError};
use tracing::{debug, instrument};

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Interpret the response: 200 decodes into `T`, anything else is a remote error.
    ///
    /// # Errors
    /// - [`Error::Remote`] with the verbatim body for any status other than 200
    /// - [`Error::Decode`] if a 200 body does not match `T`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        if self.status != StatusCode::OK {
            return Err(Error::remote(self.status.as_u16(), self.text()));
        }
        serde_json::from_slice(&self.body).map_err(|e| Error::decode(e.to_string(), self.text()))
    }
}

impl Client {
    /// Execute one authenticated HTTP exchange.
    ///
    /// `path` is appended to the configured base URL verbatim. `extra_headers`
    /// override the client's default headers; `Authorization` is always the
    /// client's bearer credential.
    ///
    /// # Errors
    /// - [`Error::Configuration`] if `ctx` is `None`; nothing is sent
    /// - [`Error::Transport`] if the request cannot be built, retries run
    ///   out, or the context is cancelled or expires
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn execute(
        &self,
        ctx: Option<&Context>,
        method: Method,
        path: &str,
        body: Option<Bytes>,
        extra_headers: Option<&HeaderMap>,
    ) -> Result<RawResponse> {
        let ctx = ctx.ok_or_else(Error::no_context)?;
        let config = self.config();
        let api_key = config.api_key_value();

        let url = config.endpoint(path).map_err(|e| {
            TransportError::build(format!("invalid URL for path '{path}': {e}"))
        })?;
        let headers = headers::compose(
            config.default_headers(),
            extra_headers,
            api_key,
            config.user_agent(),
        )?;

        let mut builder = self
            .transport()
            .http()
            .request(method, url)
            .headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let request = builder
            .build()
            .map_err(|e| TransportError::build(e.to_string()))?;

        if config.debug() {
            dump::emit("request", &dump::render_request(&request), api_key);
        }

        let response = self.transport().send(ctx, request).await?;
        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let body = ctx
            .run(async { response.bytes().await.map_err(TransportError::from) })
            .await?;

        debug!(status = status.as_u16(), bytes = body.len(), "Received response");

        if config.debug() {
            dump::emit(
                "response",
                &dump::render_response(version, status, &headers, &body),
                api_key,
            );
        }

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// Serialize `body` as JSON, `POST` it to `path` and decode the reply.
    pub(crate) async fn post_json<B, T>(&self, ctx: &Context, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)
            .map_err(|e| Error::configuration(format!("Failed to encode request body: {e}")))?;
        self.execute(Some(ctx), Method::POST, path, Some(Bytes::from(payload)), None)
            .await?
            .decode()
    }

    /// Send a bodiless request to `path` and decode the reply.
    pub(crate) async fn call_json<T>(&self, ctx: &Context, method: Method, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.execute(Some(ctx), method, path, None, None)
            .await?
            .decode()
    }
}

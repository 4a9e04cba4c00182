//! [`HttpSend`] implementation backed by reqwest.
//!
//! ```no_run
//! use std::time::Duration;
//! use tuppari_core::Context;
//! use tuppari_http_send_reqwest::ReqwestHttpSend;
//!
//! # fn main() -> tuppari_core::Result<()> {
//! let http = ReqwestHttpSend::with_timeouts(
//!     Some(Duration::from_secs(3)),
//!     Some(Duration::from_secs(10)),
//! )?;
//! let ctx = Context::new().with_http_send(http);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use reqwest::{Client, Request};
use tuppari_core::{Error, HttpSend, Result};

/// ReqwestHttpSend sends requests with a [`reqwest::Client`].
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a new ReqwestHttpSend with connect and read timeouts.
    ///
    /// `None` leaves the reqwest default in place.
    pub fn with_timeouts(connect: Option<Duration>, read: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(v) = connect {
            builder = builder.connect_timeout(v);
        }
        if let Some(v) = read {
            builder = builder.read_timeout(v);
        }

        let client = builder
            .build()
            .map_err(|e| Error::unexpected("failed to build reqwest client").with_source(e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::invalid_argument("request can't be sent by reqwest").with_source(e))?;
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::unexpected(format!("failed to send request: {e}")).with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::unexpected("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

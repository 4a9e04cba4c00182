use bytes::Bytes;
use http::header::ACCEPT;
use http::uri::PathAndQuery;
use http::{HeaderValue, Method, Uri};
use log::debug;
use serde_json::{json, Map, Value};
use tuppari_core::{Context, Error, Result, Signer};

use crate::constants::*;
use crate::{Config, Credential, RequestSigner};

/// Client publishes messages to a tuppari application.
#[derive(Clone, Debug)]
pub struct Client {
    signer: Signer<Credential>,
    application_id: String,
    endpoint: Uri,
}

impl Client {
    /// Create a new client against `https://api.tuppari.com`.
    pub fn new(ctx: Context, application_id: impl Into<String>, credential: Credential) -> Self {
        Self {
            signer: Signer::new(ctx, RequestSigner::new(PUBLISH_MESSAGE_OPERATION), credential),
            application_id: application_id.into(),
            endpoint: Uri::from_static(DEFAULT_ENDPOINT),
        }
    }

    /// Use a different endpoint, for example a local tuppari server.
    pub fn with_endpoint(mut self, endpoint: Uri) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Create a new client from [`Config`].
    ///
    /// `application_id`, `access_key_id` and `secret_access_key` are required.
    pub fn from_config(ctx: Context, config: &Config) -> Result<Self> {
        let required = |v: &Option<String>, name: &str| {
            v.clone()
                .ok_or_else(|| Error::invalid_argument(format!("{name} is required")))
        };

        let application_id = required(&config.application_id, "application_id")?;
        let credential = Credential::new(
            required(&config.access_key_id, "access_key_id")?,
            required(&config.secret_access_key, "secret_access_key")?,
        );

        let mut client = Self::new(ctx, application_id, credential);
        if let Some(endpoint) = &config.endpoint {
            client.endpoint = endpoint.parse()?;
        }
        Ok(client)
    }

    /// Application id this client publishes to.
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Endpoint this client talks to.
    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    /// Get a channel handle by name.
    pub fn join(&self, channel: impl Into<String>) -> Channel {
        Channel {
            client: self.clone(),
            name: channel.into(),
        }
    }

    fn messages_endpoint(&self) -> Result<Uri> {
        let mut parts = self.endpoint.clone().into_parts();
        parts.path_and_query = Some(PathAndQuery::from_static(MESSAGES_PATH));

        Ok(Uri::from_parts(parts)?)
    }
}

/// Channel is a named stream of events inside an application.
#[derive(Clone, Debug)]
pub struct Channel {
    client: Client,
    name: String,
}

impl Channel {
    /// Name of this channel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Publish a message for `event` on this channel.
    ///
    /// Returns the JSON object the server answered with. Non-2xx responses
    /// are returned as [`tuppari_core::ErrorKind::Unexpected`] carrying the
    /// response body.
    pub async fn send(&self, event: &str, message: &str) -> Result<Map<String, Value>> {
        let body = json!({
            "applicationId": self.client.application_id,
            "channel": self.name,
            "event": event,
            "message": message,
        })
        .to_string();

        let (mut parts, _) = http::Request::builder()
            .method(Method::POST)
            .uri(self.client.messages_endpoint()?)
            .body(())?
            .into_parts();
        self.client.signer.sign(&mut parts, body.as_bytes()).await?;
        parts
            .headers
            .insert(ACCEPT, HeaderValue::from_static(CONTENT_TYPE_JSON));

        debug!("publish message to {} on channel {}: {body}", parts.uri, self.name);
        let req = http::Request::from_parts(parts, Bytes::from(body));
        let resp = self.client.signer.context().http_send_as_string(req).await?;
        let status = resp.status();
        debug!("publish message got response status {status}");

        if !status.is_success() {
            return Err(Error::unexpected(format!(
                "publish message failed with status {status}: {}",
                resp.body()
            )));
        }

        serde_json::from_str(resp.body()).map_err(|e| {
            Error::unexpected(format!("failed to parse response: {}", resp.body())).with_source(e)
        })
    }
}

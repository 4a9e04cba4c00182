use async_trait::async_trait;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use http::request::Parts;
use http::{HeaderMap, HeaderValue, Method, Uri};
use log::debug;
use serde_json::Value;
use tuppari_core::hash::{hex_hmac_sha256, hex_sha256};
use tuppari_core::time::{format_http_date, format_iso8601, DateTime};
use tuppari_core::{Context, Error, Result, SignRequest, SigningRequest};

use crate::canonical::{canonical_request, serialize_body, signed_header_names, RequestDescriptor};
use crate::constants::*;
use crate::Credential;

/// RequestSigner that implements the tuppari signature.
///
/// The signer sets `Host`, `Content-Type`, `X-Tuppari-Date` and
/// `X-Tuppari-Operation`, then signs every header present on the request and
/// inserts `Authorization`. The signing time is read from the clock of
/// [`Context`].
#[derive(Debug)]
pub struct RequestSigner {
    operation: String,
}

impl RequestSigner {
    /// Create a new signer for given operation, for example `PublishMessage`.
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
        }
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let cred = credential.ok_or_else(|| Error::credential_invalid("missing credential"))?;
        let now = ctx.now();

        let mut signed_req = SigningRequest::build(req)?;
        match self.signed_headers(&signed_req, body, cred, now) {
            Ok(headers) => {
                signed_req.headers = headers;
                signed_req.apply(req)
            }
            Err(err) => {
                // Give the untouched uri and headers back to the caller.
                signed_req.apply(req)?;
                Err(err)
            }
        }
    }
}

impl RequestSigner {
    /// Build the full header set of `req`, including `Authorization`.
    fn signed_headers(
        &self,
        req: &SigningRequest,
        body: &[u8],
        cred: &Credential,
        now: DateTime,
    ) -> Result<HeaderMap> {
        let host = req.host();
        let mut headers = req.headers.clone();
        insert_tuppari_headers(&mut headers, &host, &self.operation, now)?;

        let authorization = {
            let pairs = header_pairs(&headers)?;
            let desc = RequestDescriptor {
                method: req.method.as_str(),
                path: Some(req.path.as_str()),
                query: req.query.as_deref(),
                headers: &pairs,
                body,
            };
            build_authorization(&desc, now, &host, cred)?
        };
        headers.insert(AUTHORIZATION, sensitive_header_value(authorization)?);

        Ok(headers)
    }
}

/// A request that is signed and ready to be sent.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// HTTP method.
    pub method: Method,
    /// Target uri, untouched.
    pub uri: Uri,
    /// Serialized JSON body, the exact bytes that were hashed.
    pub body: String,
    /// `Host`, `Content-Type`, `X-Tuppari-Date`, `X-Tuppari-Operation` and
    /// `Authorization` in this order.
    pub headers: HeaderMap,
}

impl SignedRequest {
    /// Convert into an `http::Request` that can be handed to a transport.
    pub fn into_request(self) -> Result<http::Request<Bytes>> {
        let mut req = http::Request::builder()
            .method(self.method)
            .uri(self.uri)
            .body(Bytes::from(self.body))?;
        *req.headers_mut() = self.headers;

        Ok(req)
    }
}

/// Build a signed request for a tuppari operation.
///
/// The host is `host[:port]` taken from `uri`, the port is kept only when
/// `uri` carries one explicitly. Exactly four headers are signed and the
/// `Authorization` header is appended afterwards.
pub fn build_signed_request(
    method: Method,
    uri: &Uri,
    operation: &str,
    body: Option<&Value>,
    credential: &Credential,
    now: DateTime,
) -> Result<SignedRequest> {
    let authority = uri
        .authority()
        .ok_or_else(|| Error::invalid_argument(format!("uri {uri} has no host to sign")))?;
    let host = match authority.port_u16() {
        Some(port) => format!("{}:{}", authority.host(), port),
        None => authority.host().to_string(),
    };
    let body = serialize_body(body)?;

    let mut headers = HeaderMap::with_capacity(5);
    insert_tuppari_headers(&mut headers, &host, operation, now)?;

    let authorization = {
        let pairs = header_pairs(&headers)?;
        let desc = RequestDescriptor {
            method: method.as_str(),
            path: Some(uri.path()),
            query: uri.query(),
            headers: &pairs,
            body: body.as_bytes(),
        };
        build_authorization(&desc, now, &host, credential)?
    };
    headers.insert(AUTHORIZATION, sensitive_header_value(authorization)?);

    Ok(SignedRequest {
        method,
        uri: uri.clone(),
        body,
        headers,
    })
}

/// Build the authorization header value of a request.
///
/// Runs the whole chain: canonical request, string to sign, signature.
pub fn build_authorization(
    req: &RequestDescriptor<'_>,
    time: DateTime,
    host: &str,
    credential: &Credential,
) -> Result<String> {
    let creq = canonical_request(req)?;
    debug!("calculated canonical request: {creq}");

    let string_to_sign = string_to_sign(&creq, time);
    debug!("calculated string to sign: {string_to_sign}");

    let signature = compute_signature(&credential.secret_access_key, &string_to_sign, time, host)?;
    Ok(authorization_header(
        &credential.access_key_id,
        &signed_header_names(req.headers)?,
        &signature,
    ))
}

/// Build the string to sign.
///
/// ```text
/// SHA256
/// 19700101T000000Z
/// <hex encoded sha256 of canonical request>
/// ```
pub fn string_to_sign(canonical_request: &str, time: DateTime) -> String {
    [
        STRING_TO_SIGN_ALGORITHM,
        &format_iso8601(time),
        &hex_sha256(canonical_request.as_bytes()),
    ]
    .join("\n")
}

/// Derive the signing key for given time and host.
///
/// ```text
/// DerivedSigningKey = HMAC(HMAC("TUPPARI" + SecretKey, RequestDate), Host)
/// ```
///
/// Every round returns hex text which is used as the key of the next round.
pub fn derive_signing_key(secret_key: &str, time: DateTime, host: &str) -> Result<String> {
    let secret = format!("{SIGNING_KEY_PREFIX}{secret_key}");
    let sign_date = hex_hmac_sha256(secret.as_bytes(), format_iso8601(time).as_bytes())?;

    hex_hmac_sha256(sign_date.as_bytes(), host.as_bytes())
}

/// Compute the signature of a string to sign.
///
/// ```text
/// Signature = HMAC(DerivedSigningKey, StringToSign)
/// ```
pub fn compute_signature(
    secret_key: &str,
    string_to_sign: &str,
    time: DateTime,
    host: &str,
) -> Result<String> {
    let signing_key = derive_signing_key(secret_key, time, host)?;

    hex_hmac_sha256(signing_key.as_bytes(), string_to_sign.as_bytes())
}

/// Format the authorization header.
///
/// ```text
/// HMAC-SHA256 Credential=<access_key_id>,SignedHeaders=<signed_headers>,Signature=<signature>
/// ```
pub fn authorization_header(access_key_id: &str, signed_headers: &str, signature: &str) -> String {
    format!(
        "{AUTHORIZATION_ALGORITHM} Credential={access_key_id},SignedHeaders={signed_headers},Signature={signature}"
    )
}

fn insert_tuppari_headers(
    headers: &mut HeaderMap,
    host: &str,
    operation: &str,
    now: DateTime,
) -> Result<()> {
    headers.insert(HOST, HeaderValue::try_from(host)?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    headers.insert(X_TUPPARI_DATE, HeaderValue::try_from(format_http_date(now))?);
    headers.insert(X_TUPPARI_OPERATION, HeaderValue::try_from(operation)?);

    Ok(())
}

/// Collect headers as `(name, value)` pairs.
///
/// Values that are not visible ASCII can't be signed.
fn header_pairs(headers: &HeaderMap) -> Result<Vec<(&str, &str)>> {
    let mut pairs = Vec::with_capacity(headers.len());
    for (k, v) in headers.iter() {
        let v = v.to_str().map_err(|e| {
            Error::invalid_argument(format!("header {k} is not visible ascii")).with_source(e)
        })?;
        pairs.push((k.as_str(), v));
    }

    Ok(pairs)
}

fn sensitive_header_value(v: String) -> Result<HeaderValue> {
    let mut value = HeaderValue::try_from(v)?;
    value.set_sensitive(true);

    Ok(value)
}

//! Signing and publishing for the tuppari API.
//!
//! Every request to tuppari carries an `Authorization` header computed from a
//! canonical form of the request:
//!
//! ```text
//! CanonicalRequest = Method \n CanonicalUri \n CanonicalQuery \n
//!                    CanonicalHeaders \n SignedHeaders \n hex(sha256(Body))
//! StringToSign     = "SHA256" \n Timestamp \n hex(sha256(CanonicalRequest))
//! Authorization    = "HMAC-SHA256 Credential=" AccessKeyId
//!                    ",SignedHeaders=" SignedHeaders ",Signature=" Signature
//! ```
//!
//! [`build_signed_request`] signs a request directly, [`RequestSigner`] plugs
//! into [`tuppari_core::Signer`], and [`Client`] publishes messages with both.
//!
//! ## Example
//!
//! ```no_run
//! use tuppari::{Client, Config};
//! use tuppari_core::{Context, OsEnv, Result};
//! use tuppari_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! let config = Config::new().from_env(&ctx);
//!
//! let client = Client::from_config(ctx, &config)?;
//! let resp = client.join("general").send("update", "hello").await?;
//! println!("{resp:?}");
//! # Ok(())
//! # }
//! ```

pub mod canonical;

mod client;
pub use client::{Channel, Client};

mod config;
pub use config::Config;

mod constants;
pub use constants::*;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::{
    authorization_header, build_authorization, build_signed_request, compute_signature,
    derive_signing_key, string_to_sign, RequestSigner, SignedRequest,
};

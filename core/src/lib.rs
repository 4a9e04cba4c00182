//! Core components for signing Tuppari API requests.
//!
//! This crate provides the foundational types and traits shared by the
//! tuppari signer, its client and the transport implementations.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for HTTP sending, environment access and the clock
//! - **Traits**: Abstract interfaces for request signing (`SignRequest`) and credential validation (`SigningCredential`)
//! - **Signer**: Binds a context, a request builder and the caller's credential
//!
//! ## Example
//!
//! ```no_run
//! use tuppari_core::{Context, Result, SignRequest, Signer, SigningCredential};
//! use async_trait::async_trait;
//! use http::request::Parts;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyBuilder;
//!
//! #[async_trait]
//! impl SignRequest for MyBuilder {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         _req: &mut Parts,
//!         _body: &[u8],
//!         _cred: Option<&Self::Credential>,
//!     ) -> Result<()> {
//!         todo!()
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let cred = MyCredential {
//!     key: "my-access-key".to_string(),
//!     secret: "my-secret-key".to_string(),
//! };
//! let signer = Signer::new(Context::default(), MyBuilder, cred);
//!
//! let mut parts = http::Request::post("https://api.tuppari.com/messages")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts, b"{}").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: SHA256 and HMAC-SHA256 helpers
//! - [`time`]: Time formats and the [`time::Clock`] abstraction
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::HttpSend;
pub use context::NoopEnv;
pub use context::NoopHttpSend;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;

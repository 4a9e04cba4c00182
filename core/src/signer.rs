use crate::{Context, Error, Result, SignRequest, SigningCredential};
use std::sync::Arc;

/// Signer is the main struct used to sign the request.
///
/// Signer binds a context, a request builder and the caller's credential
/// together. The credential is used as is: signer never loads, caches or
/// refreshes it.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: K,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(ctx: Context, builder: impl SignRequest<Credential = K>, credential: K) -> Self {
        Self {
            ctx,
            builder: Arc::new(builder),
            credential,
        }
    }

    /// Get the context of this signer.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Signing request.
    pub async fn sign(&self, req: &mut http::request::Parts, body: &[u8]) -> Result<()> {
        if !self.credential.is_valid() {
            return Err(Error::credential_invalid(
                "credential is not valid for signing",
            ));
        }

        self.builder
            .sign_request(&self.ctx, req, body, Some(&self.credential))
            .await
    }
}

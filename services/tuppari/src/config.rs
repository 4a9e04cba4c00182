use std::fmt::{Debug, Formatter};

use crate::constants::*;
use tuppari_core::{utils::Redact, Context};

/// Config carries all the configuration for the tuppari client.
#[derive(Clone, Default)]
pub struct Config {
    /// `application_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TUPPARI_APPLICATION_ID`]
    pub application_id: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TUPPARI_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TUPPARI_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TUPPARI_ENDPOINT`]
    /// - default to `https://api.tuppari.com`
    pub endpoint: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set application_id
    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }

    /// Set access_key_id
    pub fn with_access_key_id(mut self, access_key_id: impl Into<String>) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self
    }

    /// Set secret_access_key
    pub fn with_secret_access_key(mut self, secret_access_key: impl Into<String>) -> Self {
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Set endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Load config from env.
    ///
    /// Fields that are already set are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(TUPPARI_APPLICATION_ID) {
            self.application_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TUPPARI_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TUPPARI_SECRET_ACCESS_KEY) {
            self.secret_access_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TUPPARI_ENDPOINT) {
            self.endpoint.get_or_insert(v);
        }

        self
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("application_id", &self.application_id)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tuppari_core::StaticEnv;

    #[test]
    fn test_config_from_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from_iter([
                (TUPPARI_APPLICATION_ID.to_string(), "app".to_string()),
                (TUPPARI_ACCESS_KEY_ID.to_string(), "env_access_key".to_string()),
                (TUPPARI_SECRET_ACCESS_KEY.to_string(), "env_secret_key".to_string()),
            ]),
        });

        let config = Config::new()
            .with_access_key_id("access_key")
            .from_env(&ctx);

        assert_eq!(Some("app"), config.application_id.as_deref());
        assert_eq!(Some("access_key"), config.access_key_id.as_deref());
        assert_eq!(Some("env_secret_key"), config.secret_access_key.as_deref());
        assert_eq!(None, config.endpoint);
    }

    #[test]
    fn test_config_debug_is_redacted() {
        let config = Config::new()
            .with_application_id("app")
            .with_secret_access_key("very_secret_access_key");

        let output = format!("{config:?}");
        assert!(!output.contains("very_secret_access_key"));
        assert!(output.contains("ver***key"));
    }
}

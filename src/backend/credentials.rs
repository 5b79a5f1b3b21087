#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::config::{BackendConfig, constants::FALLBACK_API_KEY_ENV, resolve_path};

use super::BackendError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialProvider {
    /// The key to use for the next request, if any
    fn api_key(&self) -> Option<String>;

    fn has_credential(&self) -> bool {
        self.api_key().is_some()
    }

    /// Ask for a (new) credential. Interactive environments may block here
    /// until the user made a choice.
    async fn request_selection(&self) -> Result<(), BackendError>;
}

pub type ArcCredentials = Arc<dyn CredentialProvider + Send + Sync>;

/// Reads the key from the configuration, the environment or a key file.
/// Selecting a credential means reading them again, so a key rotated on disk
/// or in the environment is picked up without a restart.
pub struct EnvCredentials {
    inline: Option<String>,
    env_vars: Vec<String>,
    key_file: Option<String>,
    current: RwLock<Option<String>>,
}

impl EnvCredentials {
    pub fn new(env_var: impl Into<String>) -> Self {
        let credentials = Self {
            inline: None,
            env_vars: vec![env_var.into()],
            key_file: None,
            current: RwLock::new(None),
        };
        credentials.reload();
        credentials
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.inline = Some(key.into());
        self.reload();
        self
    }

    /// Also look at `var` when the previous variables are unset
    pub fn with_env_var(mut self, var: impl Into<String>) -> Self {
        self.env_vars.push(var.into());
        self.reload();
        self
    }

    pub fn with_key_file(mut self, path: impl Into<String>) -> Self {
        self.key_file = Some(path.into());
        self.reload();
        self
    }

    fn lookup(&self) -> Option<String> {
        if let Some(key) = self.inline.as_deref().filter(|k| !k.trim().is_empty()) {
            return Some(key.trim().to_string());
        }

        for var in &self.env_vars {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    return Some(key.trim().to_string());
                }
            }
        }

        let path = self.key_file.as_deref()?;
        let path = match resolve_path(path) {
            Ok(path) => path,
            Err(err) => {
                log::warn!("Failed to resolve key file {}: {}", path, err);
                return None;
            }
        };
        match std::fs::read_to_string(&path) {
            Ok(key) if !key.trim().is_empty() => Some(key.trim().to_string()),
            Ok(_) => None,
            Err(err) => {
                log::debug!("Failed to read key file {}: {}", path, err);
                None
            }
        }
    }

    fn reload(&self) -> bool {
        let key = self.lookup();
        let found = key.is_some();
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = key;
        found
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn request_selection(&self) -> Result<(), BackendError> {
        log::info!("Reloading API key");
        if self.reload() {
            return Ok(());
        }
        Err(BackendError::Configuration(format!(
            "no API key found, set ${} or backend.api_key_file",
            self.env_vars.join(" / $")
        )))
    }
}

impl From<&BackendConfig> for EnvCredentials {
    fn from(value: &BackendConfig) -> Self {
        let mut credentials =
            EnvCredentials::new(&value.api_key_env).with_env_var(FALLBACK_API_KEY_ENV);
        if let Some(key) = &value.api_key {
            credentials = credentials.with_api_key(key);
        }
        if let Some(path) = &value.api_key_file {
            credentials = credentials.with_key_file(path);
        }
        credentials
    }
}

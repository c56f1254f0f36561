use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Everything a run needs, as loaded from flags, env and `.env`. May still be missing
/// the phone number, see [`Config::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub phone_number: Option<String>,
    pub timeout: Duration,
    pub include_token: bool,
    pub strict: bool,
}

/// A config with every required value present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub api_url: String,
    pub phone_number: String,
    pub timeout: Duration,
    pub include_token: bool,
    pub strict: bool,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingConfig {
    #[error("no phone number was provided (PHONE_NUMBER is unset and stdin is closed)")]
    PhoneNumber,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            phone_number: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            include_token: false,
            strict: false,
        }
    }
}

impl Config {
    // Whether to prompt, fail or default is the caller's call, not ours
    pub fn resolve(&self) -> Result<ResolvedConfig, MissingConfig> {
        match self.phone_number.as_deref() {
            Some(phone_number) if !phone_number.is_empty() => {
                Ok(self.resolve_with_phone_number(phone_number))
            }
            _ => Err(MissingConfig::PhoneNumber),
        }
    }

    /// The phone number is passed through as-is, blank or not. The SMS API is the one to reject it.
    pub fn resolve_with_phone_number(&self, phone_number: impl Into<String>) -> ResolvedConfig {
        ResolvedConfig {
            api_url: self.api_url.clone(),
            phone_number: phone_number.into(),
            timeout: self.timeout,
            include_token: self.include_token,
            strict: self.strict,
        }
    }
}

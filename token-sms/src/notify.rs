use std::{error::Error as _, fmt::Display, time::Duration};

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::token::Token;

pub const SEND_TOKEN_PATH: &str = "/send-token-by-sms";

/// Talks to the SMS API. One client per run, one request per send.
pub struct SmsClient {
    client: Client,
    endpoint: String,
    include_token: bool,
}

/// The only way a send can fail: the request never completed, or the API said no.
#[derive(Error, Debug)]
pub enum SendError {
    Request(#[from] reqwest::Error),
    // Any non-2xx status
    Api {
        status: u16,
        url: String,
        body: String,
    },
}

impl Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendError::Request(err) => {
                // reqwest only says "error sending request", the cause lives in the source chain
                write!(f, "Request error: {err}")?;
                let mut source = err.source();
                while let Some(cause) = source {
                    write!(f, ": {cause}")?;
                    source = cause.source();
                }
                Ok(())
            }
            SendError::Api { status, url, body } => {
                // The API answers failures with {"success": false, "error": "..."}, but a proxy in front of it might not
                match serde_json::from_str::<ApiErrorResponse>(body) {
                    Ok(ApiErrorResponse { error }) => {
                        write!(f, "API error: status='{status}' error='{error}'")
                    }
                    Err(_) => write!(
                        f,
                        "API error: status='{status}' url='{url}' message='{body}'"
                    ),
                }
            }
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SendTokenRequest<'a> {
    phone_number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    error: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct SendTokenResponse {
    message: Option<String>,
    message_id: Option<String>,
}

/// What the API told us about an accepted send, when it told us anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendReceipt {
    pub message: Option<String>,
    pub message_id: Option<String>,
}

impl SmsClient {
    pub fn new(api_url: &str, timeout: Duration, include_token: bool) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint_url(api_url),
            include_token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the phone number to the API. The token only goes on the wire when the client
    /// was built with `include_token`; otherwise the API picks its own.
    pub fn send(&self, phone_number: &str, token: &Token) -> Result<SendReceipt, SendError> {
        let body = SendTokenRequest {
            phone_number,
            token: self.include_token.then(|| token.as_str()),
        };
        debug!(
            "POST {} (token in body: {})",
            self.endpoint,
            body.token.is_some()
        );

        let res = self.client.post(&self.endpoint).json(&body).send()?;

        let status = res.status();
        if !status.is_success() {
            let url = res.url().to_string();
            let body = res.text().unwrap_or_default();
            return Err(SendError::Api {
                status: status.as_u16(),
                url,
                body,
            });
        }

        // Anything the API says on success is informational, a 2xx is enough
        let text = res.text().unwrap_or_default();
        let parsed: SendTokenResponse = serde_json::from_str(&text).unwrap_or_default();
        if let Some(message) = &parsed.message {
            debug!("API response: {message}");
        }

        Ok(SendReceipt {
            message: parsed.message,
            message_id: parsed.message_id,
        })
    }
}

fn endpoint_url(api_url: &str) -> String {
    format!("{}{SEND_TOKEN_PATH}", api_url.trim_end_matches('/'))
}

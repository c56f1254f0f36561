use std::{
    io::{self, BufRead, IsTerminal, Write},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use inquire::Text;
use tracing::{info, warn};

use crate::{
    config::{Config, MissingConfig, ResolvedConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_MS},
    error::CapturedError,
    notify::SmsClient,
    token::Token,
};

pub const PHONE_PROMPT: &str =
    "Enter the phone number (international format, e.g. +33612345678):";

/// Generate a 6-digit token and ask the SMS API to text it to a phone number
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the SMS API, `/send-token-by-sms` is appended to it
    #[arg(long, env = "API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Recipient, in international format. Prompted for when missing
    #[arg(long, env = "PHONE_NUMBER")]
    phone_number: Option<String>,

    /// How long to wait for the SMS API before giving up, in milliseconds
    #[arg(long = "timeout-ms", env = "REQUEST_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Send the generated token along with the phone number. By default only the phone number
    /// is sent and the SMS API picks the token itself
    #[arg(long, env = "INCLUDE_TOKEN")]
    include_token: bool,

    /// Exit with status 1 when the send fails, rather than always exiting 0
    #[arg(long, env = "STRICT_EXIT")]
    strict: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            api_url: cli.api_url,
            phone_number: cli.phone_number,
            timeout: Duration::from_millis(cli.timeout_ms),
            include_token: cli.include_token,
            strict: cli.strict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: Outcome,
    pub strict: bool,
}

impl RunReport {
    pub fn exit_code(&self) -> i32 {
        match (self.outcome, self.strict) {
            (Outcome::Failed, true) => 1,
            _ => 0,
        }
    }
}

impl Cli {
    pub fn run() -> Result<RunReport, CapturedError> {
        let config = Config::from(Cli::parse());

        let config = match config.resolve() {
            Ok(resolved) => resolved,
            Err(MissingConfig::PhoneNumber) => {
                let phone_number = prompt_phone_number().map_err(|e| {
                    CapturedError::from(e)
                        .with_hint("Set PHONE_NUMBER or pass --phone-number to skip the prompt")
                })?;
                config.resolve_with_phone_number(phone_number)
            }
        };

        let outcome = send_token(&config)?;
        Ok(RunReport {
            outcome,
            strict: config.strict,
        })
    }
}

/// Generate a token and hand it to the SMS API. A failed send is reported, not returned as an error.
pub fn send_token(config: &ResolvedConfig) -> Result<Outcome> {
    let client = SmsClient::new(&config.api_url, config.timeout, config.include_token)
        .context("While building the HTTP client")?;

    let token = Token::generate();
    println!("Generated token: {token}");

    let phone_number = &config.phone_number;
    println!("Sending token to {phone_number}...");

    match client.send(phone_number, &token) {
        Ok(receipt) => {
            println!("✓ Token sent successfully to {phone_number}");
            if let Some(id) = receipt.message_id {
                info!("SMS API message id: {id}");
            }
            Ok(Outcome::Sent)
        }
        Err(err) => {
            println!("✗ Error: {err}");
            warn!("Sending to {} failed", client.endpoint());
            Ok(Outcome::Failed)
        }
    }
}

fn prompt_phone_number() -> Result<String> {
    if io::stdin().is_terminal() {
        return Ok(Text::new(PHONE_PROMPT).prompt()?);
    }

    // Piped stdin, read a single line without any terminal tricks
    print!("{PHONE_PROMPT} ");
    io::stdout().flush()?;
    let phone_number = read_phone_number(io::stdin().lock())?;
    println!();
    Ok(phone_number)
}

/// Reads one line, dropping only the line terminator. A blank line is a valid (if useless) answer,
/// end of input is not.
fn read_phone_number(mut input: impl BufRead) -> Result<String> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("While reading the phone number from stdin")?;
    if read == 0 {
        bail!(MissingConfig::PhoneNumber);
    }

    let phone_number = line
        .strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(&line);
    Ok(phone_number.to_string())
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_into_config() {
        let cli = Cli::try_parse_from([
            "token-sms",
            "--api-url",
            "http://sms.internal/api",
            "--phone-number",
            "+33612345678",
            "--timeout-ms",
            "2500",
            "--include-token",
            "--strict",
        ])
        .unwrap();

        let config = Config::from(cli);
        assert_eq!(config.api_url, "http://sms.internal/api");
        assert_eq!(config.phone_number.as_deref(), Some("+33612345678"));
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert!(config.include_token);
        assert!(config.strict);
    }

    #[test]
    fn test_exit_code() {
        let report = |outcome, strict| RunReport { outcome, strict }.exit_code();
        assert_eq!(report(Outcome::Sent, false), 0);
        assert_eq!(report(Outcome::Sent, true), 0);
        assert_eq!(report(Outcome::Failed, false), 0);
        assert_eq!(report(Outcome::Failed, true), 1);
    }

    #[test]
    fn test_read_phone_number_keeps_line_as_is() {
        let cases = [
            ("+33612345678\nignored\n", "+33612345678"),
            ("  +33612345678  \r\n", "  +33612345678  "),
            ("\n", ""),
            ("   \n", "   "),
            ("+33612345678", "+33612345678"),
        ];
        for (input, expected) in cases {
            assert_eq!(read_phone_number(io::Cursor::new(input)).unwrap(), expected);
        }
    }

    #[test]
    fn test_read_phone_number_fails_on_closed_input() {
        let err = read_phone_number(io::Cursor::new("")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<MissingConfig>(),
            Some(&MissingConfig::PhoneNumber)
        );
    }

    #[test]
    fn test_send_token_reports_failure_without_erroring() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = Config {
            api_url: format!("http://127.0.0.1:{port}/api"),
            timeout: Duration::from_secs(2),
            ..Config::default()
        }
        .resolve_with_phone_number("+33612345678");

        assert_eq!(send_token(&config).unwrap(), Outcome::Failed);
    }
}

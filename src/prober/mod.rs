//! HTTP availability prober
//!
//! A probe is a single plain GET against a URL with transport defaults:
//! no custom headers, no timeout override and no retry. The response status
//! decides the UP/DOWN classification; transport failures are recorded as
//! DOWN with status code 0 and the error text attached. Nothing is ever
//! propagated to the caller.

use std::error::Error as StdError;

use reqwest::Client;
use thiserror::Error;
use url::{ParseError as UrlParseError, Url};

use crate::models::{LogRecord, Outcome, Status};
use crate::sink::LogSink;

/// Errors that can occur while probing a URL
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Request could not be sent or no response arrived
    #[error("{}", error_chain(.0))]
    Transport(#[from] reqwest::Error),

    /// Response arrived but its body could not be read
    #[error("{0}")]
    Body(String),

    /// Entry parses but names no scheme, so no request can be sent
    #[error("unsupported protocol scheme: {0}")]
    MissingScheme(String),

    /// Entry is blank or cannot be parsed at all
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Render an error together with its source chain
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Classify an HTTP status code
pub fn classify(status_code: u16) -> Status {
    Status::from_code(status_code)
}

/// Issues probes over one shared HTTP client
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
}

impl Prober {
    /// Create a prober backed by a default client
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Transport` if the HTTP client cannot be created
    pub fn new() -> Result<Self, ProbeError> {
        let client = Client::builder().gzip(true).build()?;
        Ok(Self { client })
    }

    /// Create a prober around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Parse an entry into a probe target
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::MissingScheme` for relative entries such as
    /// `example.com/health`, and `ProbeError::InvalidUrl` for blank or
    /// unparsable ones
    pub fn parse_target(url: &str) -> Result<Url, ProbeError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(ProbeError::InvalidUrl("blank entry".to_string()));
        }

        Url::parse(trimmed).map_err(|e| match e {
            UrlParseError::RelativeUrlWithoutBase => ProbeError::MissingScheme(url.to_string()),
            other => ProbeError::InvalidUrl(format!("{url}: {other}")),
        })
    }

    /// Probe a URL once
    ///
    /// Returns `None` when the entry is blank or unparsable; such entries are
    /// skipped without producing a record. Scheme-less entries are sent
    /// nowhere but still recorded as a transport failure.
    pub async fn probe(&self, url: &str) -> Option<Outcome> {
        let target = match Self::parse_target(url) {
            Ok(target) => target,
            Err(e @ ProbeError::MissingScheme(_)) => {
                return Some(Outcome::transport_failure(e.to_string()));
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Skipping unparsable URL");
                return None;
            }
        };

        let outcome = match self.client.get(target).send().await {
            Ok(response) => {
                let status_code = response.status().as_u16();

                // Drain the body so the connection can be reused
                match response.bytes().await {
                    Ok(_) => Outcome::from_status(status_code),
                    Err(e) => {
                        let err = ProbeError::Body(error_chain(&e));
                        Outcome::with_body_error(status_code, err.to_string())
                    }
                }
            }
            Err(e) => Outcome::transport_failure(ProbeError::from(e).to_string()),
        };

        Some(outcome)
    }

    /// Probe a URL, emit the record on the console and hand it to the sink
    pub async fn check(&self, url: &str, sink: &LogSink) -> Option<LogRecord> {
        let outcome = self.probe(url).await?;
        let record = LogRecord::new(url, outcome);

        tracing::info!("{record}");
        sink.append(&record).await;

        Some(record)
    }
}

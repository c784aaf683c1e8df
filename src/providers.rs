//! Replaceable content sources with per-provider fallback policies.
//!
//! Every network call goes through the [`Transport`] trait so failures can
//! be simulated in tests; [`HttpTransport`] is the real implementation.
//! Providers never surface a [`FetchError`] to the compositor — each one
//! converts failure into its documented fallback value.

pub mod font;
pub mod image;
pub mod message;
pub mod weather;

use std::time::Duration;
use thiserror::Error;

/// Upper bound on any single network fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("wallforge/", env!("CARGO_PKG_VERSION"));

/// Network failure taxonomy. Always recovered at the provider boundary,
/// never propagated past it.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request for {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("{url} returned a malformed payload: {detail}")]
    Payload { url: String, detail: String },
}

/// Blocking byte fetch with a fixed timeout.
pub trait Transport {
    /// GET `url` and return the body on a success status. The body must not
    /// be consumed on a failed status.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;
        Ok(body.to_vec())
    }
}

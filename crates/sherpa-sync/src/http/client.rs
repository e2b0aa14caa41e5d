//! `reqwest`-backed transport for the GitHub Actions artifact API.

use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;

use super::{Transport, TransportResponse};
use crate::{Result, SyncError};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Blocking HTTP transport sending a bearer token with every request.
///
/// No retries and no request timeout are configured; a caller wanting a
/// deadline has to enforce it outside the updater.
pub struct HttpTransport {
    client: Client,
    token: String,
}

impl HttpTransport {
    pub fn new(token: impl Into<String>, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(None::<Duration>)
            .gzip(true)
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token: token.into(),
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<TransportResponse> {
        log::debug!("HTTP GET {}", url);
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .map_err(|e| SyncError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            log::debug!("HTTP {} {} in {:?}", status.as_u16(), url, start.elapsed());
            return Err(SyncError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        log::debug!("HTTP 200 {} in {:?}", url, start.elapsed());
        Ok(TransportResponse::new(response.content_length(), Box::new(response)))
    }
}

//! Batched REST upsert.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::time::Duration;

use super::config::ImportConfig;
use super::payload::OrganizationPayload;

/// Records per request.
pub const DEFAULT_BATCH_SIZE: usize = 50;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PREFER_MERGE: &str = "resolution=merge-duplicates,return=representation";

/// Status and body of one upsert request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResponse {
    pub status: u16,
    pub body: String,
}

impl BatchResponse {
    /// 1xx/2xx; anything from 300 up is a rejected batch.
    pub fn is_success(&self) -> bool {
        self.status < 300
    }
}

/// Sends one batch to the backend.
///
/// Returns `Err` only when no response was received; a response with an
/// error status is still `Ok` and judged by [`BatchUpserter`].
pub trait UpsertClient {
    fn upsert_batch(&self, batch: &[OrganizationPayload]) -> Result<BatchResponse>;
}

impl<C: UpsertClient + ?Sized> UpsertClient for &C {
    fn upsert_batch(&self, batch: &[OrganizationPayload]) -> Result<BatchResponse> {
        (**self).upsert_batch(batch)
    }
}

/// Blocking REST client for the `organizations` upsert endpoint.
#[derive(Debug)]
pub struct RestClient {
    http: reqwest::blocking::Client,
    url: String,
}

impl RestClient {
    /// Create a client with auth headers and a 30-second timeout.
    pub fn new(config: &ImportConfig) -> Result<Self> {
        Self::with_builder(config, reqwest::blocking::Client::builder())
    }

    /// Create a client on top of a caller-prepared builder.
    fn with_builder(
        config: &ImportConfig,
        builder: reqwest::blocking::ClientBuilder,
    ) -> Result<Self> {
        let invalid_key =
            |_| Error::Config("SUPABASE_SERVICE_ROLE_KEY is not a valid header value.".to_string());

        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.service_role_key).map_err(invalid_key)?,
        );
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.service_role_key))
            .map_err(invalid_key)?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("prefer", HeaderValue::from_static(PREFER_MERGE));

        let http = builder
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            url: config.organizations_url(),
        })
    }

    /// Endpoint the client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl UpsertClient for RestClient {
    fn upsert_batch(&self, batch: &[OrganizationPayload]) -> Result<BatchResponse> {
        let response = self.http.post(&self.url).json(batch).send()?;
        let status = response.status().as_u16();
        // The status is already known; a body that cannot be read is reported in its place.
        let body = match response.text() {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(status, error = %err, "failed to read response body");
                format!("<unreadable response body: {}>", err)
            }
        };
        Ok(BatchResponse { status, body })
    }
}

/// Outcome of a completed import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertReport {
    /// Requests sent
    pub batches: usize,
    /// Records accepted
    pub upserted: usize,
}

/// Splits payloads into fixed-size batches and sends them in order.
///
/// The first rejected batch stops the run; earlier batches stay committed.
#[derive(Debug)]
pub struct BatchUpserter<C> {
    client: C,
    batch_size: usize,
}

impl<C: UpsertClient> BatchUpserter<C> {
    /// Create an upserter with the default batch size.
    pub fn new(client: C) -> Self {
        Self {
            client,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set records per request (at least 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Records per request.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Upsert every payload, one request per batch.
    pub fn upsert_all(&self, payload: &[OrganizationPayload]) -> Result<UpsertReport> {
        let mut report = UpsertReport::default();

        for batch in payload.chunks(self.batch_size) {
            let response = self.client.upsert_batch(batch)?;
            report.batches += 1;

            if !response.is_success() {
                tracing::error!(
                    status = response.status,
                    committed = report.upserted,
                    "batch rejected"
                );
                return Err(Error::RemoteWrite {
                    status: response.status,
                    body: response.body,
                    committed: report.upserted,
                });
            }

            report.upserted += batch.len();
            tracing::info!(
                batch = report.batches,
                records = batch.len(),
                total = report.upserted,
                "batch upserted"
            );
        }

        Ok(report)
    }
}

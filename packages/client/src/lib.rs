#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! HTTP client for the blight map backend.
//!
//! Covers the four read/write surfaces the map needs: point collections
//! (pins / heat / grid flavors), pin detail lookups with a placeholder
//! fallback, multipart registration submission with a hard timeout, and
//! boundary-document loading (an indexed per-region set merged
//! client-side, falling back to one bundled document).

mod boundaries;
mod submit;

pub use boundaries::{BOUNDARY_FALLBACK_PATH, BOUNDARY_INDEX_PATH};
pub use submit::SUBMISSION_TIMEOUT;

use async_trait::async_trait;
use blight_map_report_models::{
    PinDetail, PointCollection, Species,
    wire::{DetailQuery, PinDetailRecord, PointQuery},
};
use blight_map_session::{PointSetKind, PointSource, SourceError};
use thiserror::Error;

/// Errors that can occur during backend API operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failed (including a tripped timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status {
        /// The HTTP status code received.
        status: u16,
        /// The request URL.
        url: String,
    },

    /// Reading a pending photo file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A multipart part could not be constructed.
    #[error("Multipart error: {message}")]
    Multipart {
        /// Description of what went wrong.
        message: String,
    },
}

/// Client for the blight map backend API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the underlying HTTP client cannot be
    /// built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_http(base_url, http))
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Joins a path onto the base URL without doubling slashes.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Fetches a point collection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status,
    /// or an unparseable body.
    pub async fn points(
        &self,
        kind: PointSetKind,
        query: &PointQuery,
    ) -> Result<PointCollection, ClientError> {
        let url = self.endpoint(&point_path(kind, query.category));
        let response = self.http.get(&url).query(&query.to_pairs()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }

    /// Fetches and normalizes one pin's detail record.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status,
    /// or an unparseable body.
    pub async fn detail(&self, query: &DetailQuery) -> Result<PinDetail, ClientError> {
        let url = self.endpoint(&format!("pins/{}/detail", query.category.path_segment()));
        let response = self.http.get(&url).query(&query.to_pairs()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let record: PinDetailRecord = response.json().await?;
        Ok(PinDetail::from(record))
    }

    /// Fetches one pin's detail record, degrading to a minimal
    /// placeholder (correct species and position, empty photo lists) when
    /// the lookup fails. The failure is logged, never surfaced.
    pub async fn detail_or_placeholder(&self, query: &DetailQuery) -> PinDetail {
        match self.detail(query).await {
            Ok(detail) => detail,
            Err(e) => {
                log::error!(
                    "Pin detail fetch failed for {} at ({}, {}): {e}",
                    query.category,
                    query.position.lat,
                    query.position.lng
                );
                PinDetail::placeholder(query.category, query.position)
            }
        }
    }
}

/// URL path for a point-collection flavor and species.
pub(crate) fn point_path(kind: PointSetKind, species: Species) -> String {
    let segment = species.path_segment();
    match kind {
        PointSetKind::Pins => format!("pins/{segment}"),
        PointSetKind::Heat => format!("heat/{segment}"),
        PointSetKind::Grid => format!("grid/{segment}"),
    }
}

/// Joins `base` and `path` with exactly one slash between them.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[async_trait]
impl PointSource for ApiClient {
    async fn fetch_points(
        &self,
        kind: PointSetKind,
        query: &PointQuery,
    ) -> Result<PointCollection, SourceError> {
        self.points(kind, query)
            .await
            .map_err(|e| SourceError::new(e.to_string()))
    }
}

//! Point-source abstraction over the backend API and demo data.

use async_trait::async_trait;
use blight_map_report_models::{PointCollection, wire::PointQuery};
use thiserror::Error;

/// Which backend point collection a fetch targets.
///
/// The backend exposes the same point shape under three endpoints; the
/// pins flavor feeds the marker layer, heat and grid feed the derived
/// visualizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PointSetKind {
    /// Registered-pin markers.
    Pins,
    /// Heatmap input points.
    Heat,
    /// Grid aggregation input points.
    Grid,
}

/// Error from a point-source fetch.
///
/// Sources fold their transport-specific failures into a message; the
/// orchestrator recovers every fetch error locally (logged, layer left
/// absent), so no richer taxonomy is needed at this seam.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SourceError {
    /// Description of the underlying failure.
    pub message: String,
}

impl SourceError {
    /// Creates an error from any displayable cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A provider of point collections, live or demo.
#[async_trait]
pub trait PointSource: Send + Sync {
    /// Fetches the point set for a query.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the underlying source fails; callers
    /// treat the corresponding layer or pin set as absent.
    async fn fetch_points(
        &self,
        kind: PointSetKind,
        query: &PointQuery,
    ) -> Result<PointCollection, SourceError>;
}

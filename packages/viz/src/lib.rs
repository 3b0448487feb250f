#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Derived map-layer construction: spatial binning (grid) aggregation and
//! local-density heat weighting.
//!
//! Both builders are pure functions over a point set, the current zoom
//! level, and an optional prepared-area mask. Rebuilding with identical
//! inputs yields identical layers; the session layer orchestration relies
//! on that.

pub mod color;
pub mod grid;
pub mod heat;

pub use color::Rgb;
pub use grid::{GridCell, GridLayer, build_grid, cell_size_for_zoom};
pub use heat::{HeatLayer, HeatPoint, build_heat, radius_for_zoom, to_heat_weights};

/// The kind of a derived visualization layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    /// Weighted point heatmap.
    Heat,
    /// Colored cell-count grid.
    Grid,
}

impl LayerKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Heat, Self::Grid]
    }
}

/// A renderable layer handed to the map widget.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    /// Weighted point heatmap.
    Heat(HeatLayer),
    /// Colored cell-count grid.
    Grid(GridLayer),
}

impl Layer {
    /// The kind of this layer.
    #[must_use]
    pub const fn kind(&self) -> LayerKind {
        match self {
            Self::Heat(_) => LayerKind::Heat,
            Self::Grid(_) => LayerKind::Grid,
        }
    }
}

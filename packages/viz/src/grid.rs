//! Zoom-adaptive spatial binning: counts points into fixed geographic
//! cells and colors them by count.
//!
//! Cells are anchored to the absolute coordinate grid (origins snapped to
//! multiples of the cell size), so panning never shifts cell boundaries;
//! only zoom changes do.

use std::collections::BTreeMap;

use blight_map_geometry::PreparedArea;
use blight_map_report_models::GeoPoint;

use crate::color::{Rgb, color_for_value};

/// Zoom level at which cells are at their finest.
pub const BASE_ZOOM: f64 = 20.0;

/// Cell edge length in degrees at [`BASE_ZOOM`].
pub const BASE_CELL_SIZE: f64 = 0.002;

/// Multiplier applied to the cell size per unit of zoom below
/// [`BASE_ZOOM`].
pub const ZOOM_OUT_FACTOR: f64 = 1.2;

/// Rectangle stroke weight the map widget should use for cells.
pub const CELL_STROKE_WEIGHT: f64 = 0.5;

/// Rectangle fill opacity the map widget should use for cells.
pub const CELL_FILL_OPACITY: f64 = 0.6;

/// Cell edge length in degrees for a zoom level.
///
/// Monotonically non-increasing in zoom: zooming out coarsens the grid
/// exponentially, zooming in past [`BASE_ZOOM`] keeps the finest size.
#[must_use]
pub fn cell_size_for_zoom(zoom: f64) -> f64 {
    let dz = (BASE_ZOOM - zoom).max(0.0);
    BASE_CELL_SIZE * ZOOM_OUT_FACTOR.powf(dz)
}

/// One populated grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    /// Southern edge of the cell (snapped origin latitude).
    pub lat0: f64,
    /// Western edge of the cell (snapped origin longitude).
    pub lng0: f64,
    /// Number of points in the cell.
    pub count: u32,
    /// Fill color on the blue-to-red count ramp.
    pub color: Rgb,
}

/// A renderable grid layer: sparse colored cells plus the scale they were
/// colored against.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayer {
    /// Cell edge length in degrees.
    pub cell_size: f64,
    /// Count mapped to the hot end of the color ramp.
    pub vmax: u32,
    /// Populated cells ordered by snapped origin. Empty cells are never
    /// emitted.
    pub cells: Vec<GridCell>,
}

impl GridLayer {
    /// Total point count across all cells.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.cells.iter().map(|cell| u64::from(cell.count)).sum()
    }
}

/// Builds the grid layer for a point set at a zoom level.
///
/// Points failing the area filter are excluded before binning. The color
/// scale ceiling is `color_scale_max` when provided and positive,
/// otherwise the maximum observed cell count (floored at 1). Identical
/// inputs produce identical layers.
#[must_use]
pub fn build_grid(
    points: &[GeoPoint],
    zoom: f64,
    area: Option<&PreparedArea>,
    color_scale_max: Option<u32>,
) -> GridLayer {
    let size = cell_size_for_zoom(zoom);

    let mut counts: BTreeMap<(i64, i64), u32> = BTreeMap::new();
    for point in points {
        if !blight_map_geometry::contains(area, point.lat, point.lng) {
            continue;
        }
        let key = (snap_index(point.lat, size), snap_index(point.lng, size));
        *counts.entry(key).or_insert(0) += 1;
    }

    let vmax = match color_scale_max {
        Some(max) if max > 0 => max,
        _ => counts.values().copied().max().unwrap_or(0).max(1),
    };

    let cells = counts
        .into_iter()
        .map(|((lat_idx, lng_idx), count)| {
            #[allow(clippy::cast_precision_loss)]
            let (lat0, lng0) = (lat_idx as f64 * size, lng_idx as f64 * size);
            GridCell {
                lat0,
                lng0,
                count,
                color: color_for_value(f64::from(count), 0.0, f64::from(vmax)),
            }
        })
        .collect();

    GridLayer {
        cell_size: size,
        vmax,
        cells,
    }
}

/// Index of the grid cell containing `value`, i.e. `floor(value / size)`.
/// The snapped origin is the index times the size.
#[allow(clippy::cast_possible_truncation)]
fn snap_index(value: f64, size: f64) -> i64 {
    (value / size).floor() as i64
}

//! Local-density heat weighting.
//!
//! Raw point density varies by orders of magnitude across a metro-scale
//! dataset; equal per-point weights render either an undifferentiated blob
//! or invisible sparse areas. This transform estimates a local density per
//! point from a coarse adaptive grid and maps it through a
//! contrast-enhancing curve, so typical-density areas separate visually
//! from hotspots while sparse points stay visible.

use std::collections::BTreeMap;

use blight_map_geometry::PreparedArea;
use blight_map_report_models::GeoPoint;

/// Number of density bins across the dominant spatial extent.
pub const DENSITY_BINS: f64 = 64.0;

/// Lower bound substituted for a degenerate coordinate span.
pub const MIN_SPAN: f64 = 1e-9;

/// Gamma-correction exponent applied to the normalized density.
pub const GAMMA: f64 = 0.4;

/// Minimum weight, keeping low-density points visible.
pub const WEIGHT_FLOOR: f64 = 0.15;

/// Boost multiplier applied to the normalized density before gamma.
pub const BOOST: f64 = 1.25;

/// Blur the map widget should apply to the heat layer.
pub const HEAT_BLUR: u32 = 10;

/// Zoom at which the heat layer reaches full intensity.
pub const HEAT_MAX_ZOOM: f64 = 19.0;

/// Minimum opacity so low-weight points remain visible.
pub const HEAT_MIN_OPACITY: f64 = 0.35;

/// Color-stop gradient for heat rendering, from deep navy through white at
/// the peak.
pub const HEAT_GRADIENT: [(f64, &str); 8] = [
    (0.00, "#001034"),
    (0.20, "#0047ff"),
    (0.40, "#00ffe5"),
    (0.60, "#76ff03"),
    (0.75, "#ffff00"),
    (0.88, "#ff6d00"),
    (0.96, "#ff1744"),
    (1.00, "#ffffff"),
];

/// One weighted heat point. The weight is a normalized local-density
/// score in `[WEIGHT_FLOOR, 1.0]`, not a count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Density-derived rendering weight.
    pub weight: f64,
}

/// A renderable heat layer: weighted points plus the zoom-derived radius.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatLayer {
    /// Weighted points, in input order.
    pub points: Vec<HeatPoint>,
    /// Point radius in pixels for the current zoom.
    pub radius: u32,
}

/// Point radius in pixels for a zoom level (`12 + (z - 10) * 3`, zoom
/// clamped to `[0, 22]`).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn radius_for_zoom(zoom: f64) -> u32 {
    let z = zoom.clamp(0.0, 22.0);
    (3.0f64.mul_add(z - 10.0, 12.0)).round().max(0.0) as u32
}

/// Builds the heat layer for a point set at a zoom level.
///
/// When an area restriction is active the points are masked **before**
/// density estimation, so density is always relative to the filtered
/// subset and masking changes the apparent hotspots.
#[must_use]
pub fn build_heat(points: &[GeoPoint], zoom: f64, area: Option<&PreparedArea>) -> HeatLayer {
    let masked: Vec<GeoPoint> = points
        .iter()
        .copied()
        .filter(|point| blight_map_geometry::contains(area, point.lat, point.lng))
        .collect();

    HeatLayer {
        points: to_heat_weights(&masked),
        radius: radius_for_zoom(zoom),
    }
}

/// Computes local-density weights for a point set.
///
/// 1. The 10th/90th percentile spread of latitude and longitude is taken
///    independently; the larger span (floored at [`MIN_SPAN`]) divided by
///    [`DENSITY_BINS`] gives an adaptive bin size.
/// 2. Every point's local density is its bin's population.
/// 3. Bin counts are normalized against their 50th..85th percentile range
///    (the 85th forced to at least one above the 50th), clamped to
///    `[0, 1]`, boosted by [`BOOST`], gamma-corrected by [`GAMMA`], and
///    floored at [`WEIGHT_FLOOR`].
///
/// Deterministic for identical input; weights are always within
/// `[WEIGHT_FLOOR, 1.0]`. An empty input yields an empty output.
#[must_use]
pub fn to_heat_weights(points: &[GeoPoint]) -> Vec<HeatPoint> {
    if points.is_empty() {
        return Vec::new();
    }

    let lats: Vec<f64> = points.iter().map(|p| p.lat).collect();
    let lngs: Vec<f64> = points.iter().map(|p| p.lng).collect();

    let lat_spread = quantile(&lats, 0.9) - quantile(&lats, 0.1);
    let lng_spread = quantile(&lngs, 0.9) - quantile(&lngs, 0.1);
    let span = lat_spread.max(lng_spread).max(MIN_SPAN);
    let bin_size = span / DENSITY_BINS;

    let mut bins: BTreeMap<(i64, i64), u32> = BTreeMap::new();
    for point in points {
        *bins.entry(bin_key(point, bin_size)).or_insert(0) += 1;
    }

    let counts: Vec<f64> = bins.values().map(|&count| f64::from(count)).collect();
    let p50 = quantile(&counts, 0.50).round().max(1.0);
    let p85 = quantile(&counts, 0.85).round().max(p50 + 1.0);

    points
        .iter()
        .map(|point| {
            let count = f64::from(bins.get(&bin_key(point, bin_size)).copied().unwrap_or(1));
            let norm = ((count - p50) / (p85 - p50)).clamp(0.0, 1.0);
            let weight = (norm * BOOST).powf(GAMMA).clamp(WEIGHT_FLOOR, 1.0);
            HeatPoint {
                lat: point.lat,
                lng: point.lng,
                weight,
            }
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn bin_key(point: &GeoPoint, bin_size: f64) -> (i64, i64) {
    (
        (point.lat / bin_size).floor() as i64,
        (point.lng / bin_size).floor() as i64,
    )
}

/// Linear-interpolated quantile of a value slice, `q` clamped to
/// `[0, 1]`. An empty slice yields 1 so downstream normalization never
/// divides by a missing distribution.
#[must_use]
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 1.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    #[allow(clippy::cast_precision_loss)]
    let idx = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lo = idx.floor() as usize;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let hi = idx.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let fraction = idx - idx.floor();
    sorted[lo].mul_add(1.0 - fraction, sorted[hi] * fraction)
}

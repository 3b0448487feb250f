//! Registered-pin visibility filtering.

use blight_map_report_models::GeoPoint;

use crate::area::AreaSelection;
use crate::viewport::Viewport;

/// Pins visible under the current viewport and area restriction.
///
/// Pure and synchronous; the session re-runs it on registration-set
/// changes, viewport move/zoom end, and area-selection changes, keeping
/// only the last result.
#[must_use]
pub fn visible_pins(
    registered: &[GeoPoint],
    viewport: &Viewport,
    area: &AreaSelection,
) -> Vec<GeoPoint> {
    registered
        .iter()
        .copied()
        .filter(|&pin| viewport.bounds.contains(pin) && area.contains(pin))
        .collect()
}

//! Viewport snapshot types provided by the map widget.

use blight_map_report_models::GeoPoint;

/// Geographic bounds of the visible map area, inclusive on all edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    /// Southern edge latitude.
    pub south: f64,
    /// Western edge longitude.
    pub west: f64,
    /// Northern edge latitude.
    pub north: f64,
    /// Eastern edge longitude.
    pub east: f64,
}

impl LatLngBounds {
    /// Creates bounds from corner coordinates.
    #[must_use]
    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Whether the point lies within the bounds (inclusive).
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    /// Center of the bounds.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            f64::midpoint(self.south, self.north),
            f64::midpoint(self.west, self.east),
        )
    }
}

/// Snapshot of the map widget's current view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Visible geographic bounds.
    pub bounds: LatLngBounds,
    /// Current zoom level.
    pub zoom: f64,
}

impl Viewport {
    /// Creates a viewport snapshot.
    #[must_use]
    pub const fn new(bounds: LatLngBounds, zoom: f64) -> Self {
        Self { bounds, zoom }
    }

    /// Center of the visible bounds.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        self.bounds.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_containment_is_inclusive() {
        let bounds = LatLngBounds::new(35.0, 139.0, 36.0, 140.0);
        assert!(bounds.contains(GeoPoint::new(35.5, 139.5)));
        assert!(bounds.contains(GeoPoint::new(35.0, 139.0)));
        assert!(bounds.contains(GeoPoint::new(36.0, 140.0)));
        assert!(!bounds.contains(GeoPoint::new(34.999, 139.5)));
        assert!(!bounds.contains(GeoPoint::new(35.5, 140.001)));
    }

    #[test]
    fn center_is_midpoint() {
        let viewport = Viewport::new(LatLngBounds::new(35.0, 139.0, 36.0, 140.0), 12.0);
        assert_eq!(viewport.center(), GeoPoint::new(35.5, 139.5));
    }
}

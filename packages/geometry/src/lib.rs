#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Point-in-polygon containment engine for administrative-boundary masking.
//!
//! Boundary features are prepared once per area selection into flat vertex
//! rings with precomputed bounding boxes, then queried with a ray-casting
//! containment test. Multi-part regions (disjoint features sharing one
//! name) and holes are supported. Preparation is total: malformed or
//! missing geometry contributes zero polygons instead of failing.

use geo::BoundingRect;

/// Divisor substituted when a ring edge is exactly horizontal at the test
/// latitude. Deliberate numerical tie-break, not an error guard.
const RAY_EPSILON: f64 = 1e-12;

/// An ordered `(lng, lat)` vertex sequence describing one closed ring.
///
/// Closure is cyclic; the first vertex need not be repeated at the end.
pub type Ring = Vec<[f64; 2]>;

/// Axis-aligned bounding box in `(lng, lat)` degrees, inclusive on all
/// edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox {
    /// Western edge.
    pub min_lng: f64,
    /// Southern edge.
    pub min_lat: f64,
    /// Eastern edge.
    pub max_lng: f64,
    /// Northern edge.
    pub max_lat: f64,
}

impl Bbox {
    /// Whether the point lies within the box (inclusive).
    #[must_use]
    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        lng >= self.min_lng && lng <= self.max_lng && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Center of the box as `(lat, lng)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::midpoint(self.min_lat, self.max_lat),
            f64::midpoint(self.min_lng, self.max_lng),
        )
    }

    /// Smallest box covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_lng: self.min_lng.min(other.min_lng),
            min_lat: self.min_lat.min(other.min_lat),
            max_lng: self.max_lng.max(other.max_lng),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }
}

/// One polygon of a prepared area: outer ring, hole rings, and the tight
/// bounding box of the outer ring used as a cheap rejection test.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPolygon {
    /// Outer boundary ring.
    pub outer: Ring,
    /// Hole rings; points inside any hole are excluded.
    pub holes: Vec<Ring>,
    /// Tight axis-aligned bound of `outer`.
    pub bbox: Bbox,
}

impl PreparedPolygon {
    /// Whether the point is inside the outer ring and outside every hole.
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        if !self.bbox.contains(lng, lat) {
            return false;
        }
        if !ring_contains(&self.outer, lng, lat) {
            return false;
        }
        !self.holes.iter().any(|hole| ring_contains(hole, lng, lat))
    }
}

/// A prepared multi-part administrative area.
///
/// Built once per selection change and treated as immutable for the
/// lifetime of that selection. A cleared selection is represented as
/// *absence* (`Option<&PreparedArea>` = `None`), never as an empty area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedArea {
    polygons: Vec<PreparedPolygon>,
}

impl PreparedArea {
    /// Prepares an area from boundary features, in order. Features with
    /// malformed or non-areal geometry contribute nothing.
    pub fn from_features<'a>(features: impl IntoIterator<Item = &'a geojson::Feature>) -> Self {
        let polygons = features.into_iter().flat_map(prepare_feature).collect();
        Self { polygons }
    }

    /// The prepared polygons, in preparation order.
    #[must_use]
    pub fn polygons(&self) -> &[PreparedPolygon] {
        &self.polygons
    }

    /// Whether no polygons were prepared (e.g. every feature was
    /// malformed).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Whether any polygon of the area contains the point.
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.polygons.iter().any(|poly| poly.contains(lat, lng))
    }

    /// Bounding box covering every polygon, or `None` when empty.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Bbox> {
        self.polygons
            .iter()
            .map(|poly| poly.bbox)
            .reduce(|acc, bbox| acc.union(&bbox))
    }
}

/// Area filter test: an absent area means "no restriction" and passes
/// every point.
#[must_use]
pub fn contains(area: Option<&PreparedArea>, lat: f64, lng: f64) -> bool {
    area.is_none_or(|prepared| prepared.contains(lat, lng))
}

/// Ray-casting containment against a single ring.
///
/// Casts a horizontal ray from the point toward +infinity in longitude and
/// counts edge crossings; an odd count means inside. Points exactly on an
/// edge or at a horizontal-edge latitude may classify either way.
#[must_use]
pub fn ring_contains(ring: &Ring, lng: f64, lat: f64) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > lat) != (yj > lat) {
            let mut dy = yj - yi;
            if dy == 0.0 {
                dy = RAY_EPSILON;
            }
            let crossing = (xj - xi) * (lat - yi) / dy + xi;
            if lng < crossing {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Prepares one boundary feature into zero or more polygons.
///
/// Handles `Polygon` and `MultiPolygon` geometry; anything else (missing
/// geometry, unconvertible coordinates, point/line features) silently
/// yields no polygons.
#[must_use]
pub fn prepare_feature(feature: &geojson::Feature) -> Vec<PreparedPolygon> {
    let Some(geometry) = feature.geometry.as_ref() else {
        return Vec::new();
    };

    let geo_geom: geo::Geometry<f64> = match geometry.clone().try_into() {
        Ok(geom) => geom,
        Err(e) => {
            log::debug!("Skipping boundary feature with unconvertible geometry: {e}");
            return Vec::new();
        }
    };

    match geo_geom {
        geo::Geometry::Polygon(polygon) => prepare_polygon(&polygon).into_iter().collect(),
        geo::Geometry::MultiPolygon(multi) => multi.iter().filter_map(prepare_polygon).collect(),
        _ => Vec::new(),
    }
}

/// Flattens one geo polygon into a [`PreparedPolygon`], computing the
/// outer-ring bounding box. Degenerate outers (fewer than three vertices)
/// yield `None`.
fn prepare_polygon(polygon: &geo::Polygon<f64>) -> Option<PreparedPolygon> {
    let outer = ring_from_line_string(polygon.exterior());
    if outer.len() < 3 {
        return None;
    }

    let rect = polygon.exterior().bounding_rect()?;
    let bbox = Bbox {
        min_lng: rect.min().x,
        min_lat: rect.min().y,
        max_lng: rect.max().x,
        max_lat: rect.max().y,
    };

    let holes = polygon
        .interiors()
        .iter()
        .map(ring_from_line_string)
        .filter(|ring| ring.len() >= 3)
        .collect();

    Some(PreparedPolygon {
        outer,
        holes,
        bbox,
    })
}

fn ring_from_line_string(line: &geo::LineString<f64>) -> Ring {
    line.0.iter().map(|coord| [coord.x, coord.y]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::{Feature, Geometry, Value};

    fn polygon_feature(rings: Vec<Vec<Vec<f64>>>) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(rings))),
            id: None,
            properties: None,
            foreign_members: None,
        }
    }

    fn unit_square() -> Feature {
        polygon_feature(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ]])
    }

    #[test]
    fn unit_square_inside_and_outside() {
        let area = PreparedArea::from_features([&unit_square()]);
        assert!(area.contains(0.5, 0.5));
        assert!(!area.contains(0.5, 1.5));
        assert!(!area.contains(-0.5, 0.5));
    }

    #[test]
    fn bbox_rejects_before_ray_cast() {
        let area = PreparedArea::from_features([&unit_square()]);
        let poly = &area.polygons()[0];
        assert!(!poly.bbox.contains(2.0, 0.5));
        assert!(poly.bbox.contains(1.0, 1.0));
    }

    #[test]
    fn hole_excludes_contained_point() {
        let feature = polygon_feature(vec![
            vec![
                vec![0.0, 0.0],
                vec![4.0, 0.0],
                vec![4.0, 4.0],
                vec![0.0, 4.0],
                vec![0.0, 0.0],
            ],
            vec![
                vec![1.0, 1.0],
                vec![3.0, 1.0],
                vec![3.0, 3.0],
                vec![1.0, 3.0],
                vec![1.0, 1.0],
            ],
        ]);
        let area = PreparedArea::from_features([&feature]);
        // Inside the outer ring but inside the hole.
        assert!(!area.contains(2.0, 2.0));
        // Between outer ring and hole.
        assert!(area.contains(0.5, 0.5));
        assert!(area.contains(3.5, 2.0));
    }

    #[test]
    fn absent_area_passes_everything() {
        assert!(contains(None, 12.0, 34.0));
        assert!(contains(None, -90.0, 180.0));
    }

    #[test]
    fn multi_part_area_matches_any_part() {
        let west = polygon_feature(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ]]);
        let east = polygon_feature(vec![vec![
            vec![10.0, 0.0],
            vec![11.0, 0.0],
            vec![11.0, 1.0],
            vec![10.0, 1.0],
            vec![10.0, 0.0],
        ]]);
        let area = PreparedArea::from_features([&west, &east]);
        assert_eq!(area.polygons().len(), 2);
        assert!(area.contains(0.5, 0.5));
        assert!(area.contains(0.5, 10.5));
        assert!(!area.contains(0.5, 5.0));

        let bbox = area.bounding_box().unwrap();
        assert_eq!(bbox.min_lng, 0.0);
        assert_eq!(bbox.max_lng, 11.0);
        assert_eq!(bbox.center(), (0.5, 5.5));
    }

    #[test]
    fn multipolygon_geometry_prepares_each_part() {
        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::MultiPolygon(vec![
                vec![vec![
                    vec![0.0, 0.0],
                    vec![1.0, 0.0],
                    vec![1.0, 1.0],
                    vec![0.0, 0.0],
                ]],
                vec![vec![
                    vec![5.0, 5.0],
                    vec![6.0, 5.0],
                    vec![6.0, 6.0],
                    vec![5.0, 5.0],
                ]],
            ]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        assert_eq!(prepare_feature(&feature).len(), 2);
    }

    #[test]
    fn malformed_geometry_contains_nothing() {
        let no_geometry = Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: None,
            foreign_members: None,
        };
        assert!(prepare_feature(&no_geometry).is_empty());

        let point = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![1.0, 2.0]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        assert!(prepare_feature(&point).is_empty());

        let area = PreparedArea::from_features([&no_geometry, &point]);
        assert!(area.is_empty());
        assert!(!area.contains(1.0, 2.0));
        assert!(area.bounding_box().is_none());
    }

    #[test]
    fn ring_without_closing_vertex_still_closes_cyclically() {
        let ring: Ring = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        assert!(ring_contains(&ring, 0.5, 0.5));
        assert!(!ring_contains(&ring, 1.5, 0.5));
    }

    #[test]
    fn degenerate_rings_contain_nothing() {
        let ring: Ring = vec![[0.0, 0.0], [1.0, 1.0]];
        assert!(!ring_contains(&ring, 0.5, 0.5));
        assert!(!ring_contains(&Ring::new(), 0.0, 0.0));
    }
}

//! Shared fixtures for the session crate's unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use blight_map_report_models::{GeoPoint, PointCollection, Species, wire::PointQuery};
use blight_map_viz::{Layer, LayerKind};
use geojson::{Feature, FeatureCollection, Geometry, Value};

use crate::area::BoundaryCatalog;
use crate::layers::{LayerId, MapBackend};
use crate::source::{PointSetKind, PointSource, SourceError};

/// Parses a `YYYY-MM-DD` day for test fixtures.
pub fn day(s: &str) -> chrono::NaiveDate {
    s.parse().unwrap()
}

/// A unit square at latitude `0..1`, longitude `offset..offset+1`, named
/// via a `name` property.
pub fn square_feature(name: &str, lng_offset: f64) -> Feature {
    let ring = vec![
        vec![lng_offset, 0.0],
        vec![lng_offset + 1.0, 0.0],
        vec![lng_offset + 1.0, 1.0],
        vec![lng_offset, 1.0],
        vec![lng_offset, 0.0],
    ];
    let mut properties = serde_json::Map::new();
    properties.insert("name".to_owned(), serde_json::Value::String(name.to_owned()));
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Builds a catalog of named unit squares keyed by the `name` property.
pub fn catalog_with_squares(specs: &[(&str, f64)]) -> BoundaryCatalog {
    let features = specs
        .iter()
        .map(|&(name, offset)| square_feature(name, offset))
        .collect();
    BoundaryCatalog::new(
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
        "name",
    )
}

/// Map backend double that records installs, removals, and view changes.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_id: u64,
    /// Live layers by handle.
    pub live: BTreeMap<LayerId, (Species, LayerKind)>,
    /// Total layers ever installed.
    pub installed: u64,
    /// Total layers ever removed.
    pub removed: u64,
    /// Recorded `set_view` calls as `(center, zoom)`.
    pub views: Vec<(GeoPoint, f64)>,
}

impl RecordingBackend {
    /// Number of live layers for a species.
    pub fn live_count(&self, species: Species) -> usize {
        self.live.values().filter(|(s, _)| *s == species).count()
    }
}

impl MapBackend for RecordingBackend {
    fn install_layer(&mut self, species: Species, layer: Layer) -> LayerId {
        self.next_id += 1;
        let id = LayerId(self.next_id);
        self.live.insert(id, (species, layer.kind()));
        self.installed += 1;
        id
    }

    fn remove_layer(&mut self, id: LayerId) {
        assert!(self.live.remove(&id).is_some(), "removed unknown layer {id:?}");
        self.removed += 1;
    }

    fn set_view(&mut self, center: GeoPoint, zoom: f64) {
        self.views.push((center, zoom));
    }
}

/// Point source double serving a fixed point set (or failing), recording
/// every query it receives.
#[derive(Debug)]
pub struct StaticSource {
    points: Vec<GeoPoint>,
    fail: bool,
    calls: Mutex<Vec<(PointSetKind, PointQuery)>>,
}

impl StaticSource {
    /// A source that always serves `points`.
    pub fn with_points(points: Vec<GeoPoint>) -> Self {
        Self {
            points,
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A source whose every fetch fails.
    pub fn failing() -> Self {
        Self {
            points: Vec::new(),
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of fetches issued for a point-set kind.
    pub fn calls_for(&self, kind: PointSetKind) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// The most recent query, if any fetch happened.
    pub fn last_query(&self) -> Option<PointQuery> {
        self.calls.lock().unwrap().last().map(|(_, q)| *q)
    }
}

#[async_trait]
impl PointSource for StaticSource {
    async fn fetch_points(
        &self,
        kind: PointSetKind,
        query: &PointQuery,
    ) -> Result<PointCollection, SourceError> {
        self.calls.lock().unwrap().push((kind, *query));
        if self.fail {
            return Err(SourceError::new("synthetic source failure"));
        }
        Ok(PointCollection {
            items: self.points.clone(),
        })
    }
}

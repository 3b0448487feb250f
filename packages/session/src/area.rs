//! Administrative-area selection over a boundary feature catalog.

use blight_map_geometry::PreparedArea;
use blight_map_report_models::GeoPoint;
use geojson::FeatureCollection;

/// Boundary feature collection indexed by its name property.
///
/// Multiple features may share one name (an area split into disjoint
/// pieces); selection merges them into one logical area.
#[derive(Debug, Clone, Default)]
pub struct BoundaryCatalog {
    features: Vec<geojson::Feature>,
    name_property: String,
}

impl BoundaryCatalog {
    /// Wraps a feature collection, naming features by the given property
    /// key (e.g. `N03_004` for the public administrative-boundary data).
    #[must_use]
    pub fn new(collection: FeatureCollection, name_property: impl Into<String>) -> Self {
        Self {
            features: collection.features,
            name_property: name_property.into(),
        }
    }

    /// Sorted, de-duplicated list of selectable area names.
    #[must_use]
    pub fn area_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .features
            .iter()
            .filter_map(|feature| self.feature_name(feature))
            .map(str::to_owned)
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// All features whose name property equals `name`.
    #[must_use]
    pub fn features_named(&self, name: &str) -> Vec<&geojson::Feature> {
        self.features
            .iter()
            .filter(|feature| self.feature_name(feature) == Some(name))
            .collect()
    }

    /// Number of features in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the catalog holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    fn feature_name<'a>(&self, feature: &'a geojson::Feature) -> Option<&'a str> {
        feature
            .properties
            .as_ref()
            .and_then(|props| props.get(&self.name_property))
            .and_then(serde_json::Value::as_str)
    }
}

/// The currently selected administrative area and its prepared geometry.
///
/// No selection means no restriction: every point passes. A selection
/// whose features all had malformed geometry prepares zero polygons and
/// therefore masks everything: geometry errors contain nothing.
#[derive(Debug, Clone, Default)]
pub struct AreaSelection {
    name: Option<String>,
    prepared: Option<PreparedArea>,
}

impl AreaSelection {
    /// Selected area name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Prepared geometry of the selection, absent when unrestricted.
    #[must_use]
    pub const fn prepared(&self) -> Option<&PreparedArea> {
        self.prepared.as_ref()
    }

    /// Whether the point passes the current restriction.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        blight_map_geometry::contains(self.prepared.as_ref(), point.lat, point.lng)
    }

    /// Replaces the selection.
    ///
    /// A `None` name, or a name matching no features, clears to "no
    /// restriction". Otherwise all matching features are merged and
    /// prepared, and the merged bounding-box center is returned as
    /// `(lat, lng)` so the caller can recenter the viewport at its
    /// current zoom.
    pub fn select(&mut self, catalog: &BoundaryCatalog, name: Option<&str>) -> Option<(f64, f64)> {
        let Some(name) = name else {
            self.clear();
            return None;
        };

        let features = catalog.features_named(name);
        if features.is_empty() {
            self.clear();
            return None;
        }

        let prepared = PreparedArea::from_features(features.iter().copied());
        let recenter = prepared.bounding_box().map(|bbox| bbox.center());
        self.name = Some(name.to_owned());
        self.prepared = Some(prepared);
        recenter
    }

    /// Clears to "no restriction".
    pub fn clear(&mut self) {
        self.name = None;
        self.prepared = None;
    }
}

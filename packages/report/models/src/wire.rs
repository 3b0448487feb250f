//! Wire-format request and response types for the backend API.
//!
//! These types mirror the JSON/query-string contract of the HTTP backend
//! and are shared by the client and the demo server. They are kept
//! separate from the domain types so the API contract can evolve
//! independently.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{DateRange, GeoPoint, PhotoRef, PhotoRole, PinDetail, Species, TextureRating};

/// Query for a point collection (pins, heat, or grid flavor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointQuery {
    /// Disease category to fetch.
    pub category: Species,
    /// Inclusive observation date range.
    pub range: DateRange,
    /// Current viewport center.
    pub center: GeoPoint,
    /// Current viewport zoom level.
    pub zoom: f64,
}

impl PointQuery {
    /// Renders the query as URL key/value pairs
    /// (`category`, `start`, `end`, `centerLat`, `centerLng`, `zoom`).
    ///
    /// Dates use `YYYY-MM-DD`; they are passed through verbatim, the
    /// client attaches no timezone semantics.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("category", self.category.to_string()),
            ("start", self.range.start.to_string()),
            ("end", self.range.end.to_string()),
            ("centerLat", self.center.lat.to_string()),
            ("centerLng", self.center.lng.to_string()),
            ("zoom", self.zoom.to_string()),
        ]
    }
}

/// Query for a single registered report's detail record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailQuery {
    /// Disease category of the pin.
    pub category: Species,
    /// Clicked pin position.
    pub position: GeoPoint,
    /// Inclusive observation date range.
    pub range: DateRange,
}

impl DetailQuery {
    /// Renders the query as URL key/value pairs
    /// (`category`, `lat`, `lng`, `start`, `end`).
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("category", self.category.to_string()),
            ("lat", self.position.lat.to_string()),
            ("lng", self.position.lng.to_string()),
            ("start", self.range.start.to_string()),
            ("end", self.range.end.to_string()),
        ]
    }
}

/// Server-side deserialization of the point-collection query string.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointQueryParams {
    /// Disease category.
    pub category: Species,
    /// First day of the range (inclusive), `YYYY-MM-DD`.
    pub start: NaiveDate,
    /// Last day of the range (inclusive), `YYYY-MM-DD`.
    pub end: NaiveDate,
    /// Viewport center latitude.
    pub center_lat: f64,
    /// Viewport center longitude.
    pub center_lng: f64,
    /// Viewport zoom level.
    pub zoom: f64,
}

impl PointQueryParams {
    /// The requested date range.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }
}

/// Server-side deserialization of the detail query string.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailQueryParams {
    /// Disease category.
    pub category: Species,
    /// Clicked pin latitude.
    pub lat: f64,
    /// Clicked pin longitude.
    pub lng: f64,
    /// First day of the range (inclusive), `YYYY-MM-DD`.
    pub start: NaiveDate,
    /// Last day of the range (inclusive), `YYYY-MM-DD`.
    pub end: NaiveDate,
}

/// Per-role photo URL lists as serialized by the backend.
///
/// Absent roles mean "no photos", not "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUrlLists {
    /// Whole-tree overview photos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whole_tree: Option<Vec<String>>,
    /// Symptom close-up photos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Vec<String>>,
    /// Trunk base photos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Vec<String>>,
    /// Leaf photos (pine-wilt reports only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaves: Option<Vec<String>>,
}

impl PhotoUrlLists {
    fn take(&self, role: PhotoRole) -> Vec<String> {
        let list = match role {
            PhotoRole::WholeTree => &self.whole_tree,
            PhotoRole::Detail => &self.detail,
            PhotoRole::Base => &self.base,
            PhotoRole::Leaves => &self.leaves,
        };
        list.clone().unwrap_or_default()
    }
}

/// A registered report's detail record as serialized by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinDetailRecord {
    /// Backend identifier.
    pub id: String,
    /// Disease category.
    pub category: Species,
    /// Latitude of the report.
    pub lat: f64,
    /// Longitude of the report.
    pub lng: f64,
    /// First day of the observation range, `YYYY-MM-DD`.
    pub start: NaiveDate,
    /// Last day of the observation range, `YYYY-MM-DD`.
    pub end: NaiveDate,
    /// Texture rating (pine-wilt reports), 0-5.
    pub texture_rating: Option<u8>,
    /// Borehole size in millimeters (oak-wilt reports).
    pub hole_size: Option<f64>,
    /// Photo URL lists grouped by role.
    #[serde(default)]
    pub photo_urls: PhotoUrlLists,
    /// When the report was registered (ISO 8601).
    pub created_at: DateTime<Utc>,
}

impl From<PinDetailRecord> for PinDetail {
    /// Normalizes a wire record into the domain detail type: every role
    /// applicable to the species is present (absent wire lists become
    /// empty lists), out-of-range texture ratings are dropped.
    fn from(record: PinDetailRecord) -> Self {
        let photos: BTreeMap<PhotoRole, Vec<PhotoRef>> = PhotoRole::for_species(record.category)
            .into_iter()
            .map(|role| {
                let refs = record
                    .photo_urls
                    .take(role)
                    .into_iter()
                    .map(|url| PhotoRef::Stored { url })
                    .collect();
                (role, refs)
            })
            .collect();

        Self {
            id: Some(record.id),
            species: record.category,
            position: GeoPoint::new(record.lat, record.lng),
            range: Some(DateRange::new(record.start, record.end)),
            texture_rating: record
                .texture_rating
                .and_then(|v| TextureRating::from_value(v).ok()),
            hole_size_mm: record.hole_size,
            photos,
            created_at: Some(record.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn point_query_pairs_match_backend_contract() {
        let query = PointQuery {
            category: Species::Nara,
            range: DateRange::new(day("2025-08-01"), day("2025-08-19")),
            center: GeoPoint::new(35.6895, 139.6917),
            zoom: 12.0,
        };
        let pairs = query.to_pairs();
        assert_eq!(pairs[0], ("category", "Nara".to_string()));
        assert_eq!(pairs[1], ("start", "2025-08-01".to_string()));
        assert_eq!(pairs[2], ("end", "2025-08-19".to_string()));
        assert_eq!(pairs[3].0, "centerLat");
        assert_eq!(pairs[5], ("zoom", "12".to_string()));
    }

    #[test]
    fn detail_record_normalizes_missing_photo_lists() {
        let json = r#"{
            "id": "a1",
            "category": "Matsu",
            "lat": 35.7,
            "lng": 139.7,
            "start": "2025-08-01",
            "end": "2025-08-19",
            "textureRating": 4,
            "holeSize": null,
            "photoUrls": { "wholeTree": ["https://example.com/t.jpg"] },
            "createdAt": "2025-08-19T10:30:00Z"
        }"#;
        let record: PinDetailRecord = serde_json::from_str(json).unwrap();
        let detail = PinDetail::from(record);

        assert_eq!(detail.species, Species::Matsu);
        assert_eq!(detail.texture_rating.unwrap().value(), 4);
        assert_eq!(detail.photos.len(), 4);
        assert_eq!(detail.photos[&PhotoRole::WholeTree].len(), 1);
        assert!(detail.photos[&PhotoRole::Leaves].is_empty());
        assert!(detail.photos[&PhotoRole::Base].is_empty());
    }

    #[test]
    fn detail_record_drops_out_of_range_rating() {
        let json = r#"{
            "id": "a2",
            "category": "Nara",
            "lat": 35.7,
            "lng": 139.7,
            "start": "2025-08-01",
            "end": "2025-08-19",
            "textureRating": 9,
            "holeSize": 12.0,
            "createdAt": "2025-08-19T10:30:00Z"
        }"#;
        let record: PinDetailRecord = serde_json::from_str(json).unwrap();
        let detail = PinDetail::from(record);
        assert!(detail.texture_rating.is_none());
        assert_eq!(detail.hole_size_mm, Some(12.0));
        assert!(!detail.photos.contains_key(&PhotoRole::Leaves));
    }
}

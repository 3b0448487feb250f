//! In-memory report store backing the demo API.

use blight_map_report_models::{
    DateRange, GeoPoint, PointCollection, Species,
    wire::{PhotoUrlLists, PinDetailRecord},
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Maximum distance in degrees between a detail query and a stored report
/// for the report to count as the clicked pin (≈11 m).
pub const DETAIL_MATCH_RADIUS_DEG: f64 = 1e-4;

/// Demo reports seeded per species.
pub const DEMO_REPORTS_PER_SPECIES: usize = 2_000;

/// One stored report.
#[derive(Debug, Clone)]
pub struct StoredReport {
    /// Store identifier.
    pub id: Uuid,
    /// Disease category.
    pub species: Species,
    /// Reported location.
    pub position: GeoPoint,
    /// Observation date range.
    pub range: DateRange,
    /// Texture rating (pine-wilt reports), 0-5.
    pub texture_rating: Option<u8>,
    /// Borehole size in millimeters (oak-wilt reports).
    pub hole_size_mm: Option<f64>,
    /// Photo URL lists grouped by role.
    pub photo_urls: PhotoUrlLists,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl StoredReport {
    /// Renders the report as the wire detail record.
    #[must_use]
    pub fn detail_record(&self) -> PinDetailRecord {
        PinDetailRecord {
            id: self.id.to_string(),
            category: self.species,
            lat: self.position.lat,
            lng: self.position.lng,
            start: self.range.start,
            end: self.range.end,
            texture_rating: self.texture_rating,
            hole_size: self.hole_size_mm,
            photo_urls: self.photo_urls.clone(),
            created_at: self.created_at,
        }
    }
}

/// All registered reports, filterable by species and date range.
#[derive(Debug, Clone, Default)]
pub struct ReportStore {
    reports: Vec<StoredReport>,
}

impl ReportStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reports: Vec::new(),
        }
    }

    /// Seeds a store with random demo reports scattered around the demo
    /// center, with observation ranges spread across the half year before
    /// `latest_day`.
    #[must_use]
    pub fn seed_demo(seed: u64, latest_day: NaiveDate) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut store = Self::new();

        for &species in Species::all() {
            let points = blight_map_generate::scatter_points(
                &mut rng,
                DEMO_REPORTS_PER_SPECIES,
                blight_map_generate::DEMO_CENTER,
                blight_map_generate::DEMO_LAT_SPREAD,
                blight_map_generate::DEMO_LNG_SPREAD,
            );
            for position in points {
                let start = latest_day - Duration::days(rng.gen_range(0..180));
                let end = start + Duration::days(rng.gen_range(0..14));
                store.insert(StoredReport {
                    id: Uuid::new_v4(),
                    species,
                    position,
                    range: DateRange::new(start, end),
                    texture_rating: matches!(species, Species::Matsu)
                        .then(|| rng.gen_range(0..=5)),
                    hole_size_mm: matches!(species, Species::Nara)
                        .then(|| f64::from(rng.gen_range(2..=20))),
                    photo_urls: sample_photo_urls(species),
                    created_at: Utc::now(),
                });
            }
        }
        store
    }

    /// Adds a report.
    pub fn insert(&mut self, report: StoredReport) {
        self.reports.push(report);
    }

    /// Number of stored reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether the store holds no reports.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Point collection for a species whose observation range overlaps
    /// the query range.
    #[must_use]
    pub fn points(&self, species: Species, range: &DateRange) -> PointCollection {
        let items = self
            .reports
            .iter()
            .filter(|report| report.species == species && report.range.overlaps(range))
            .map(|report| report.position)
            .collect();
        PointCollection { items }
    }

    /// The stored report closest to `position` for the species and range,
    /// within [`DETAIL_MATCH_RADIUS_DEG`].
    #[must_use]
    pub fn nearest(
        &self,
        species: Species,
        position: GeoPoint,
        range: &DateRange,
    ) -> Option<&StoredReport> {
        self.reports
            .iter()
            .filter(|report| report.species == species && report.range.overlaps(range))
            .map(|report| {
                let dlat = report.position.lat - position.lat;
                let dlng = report.position.lng - position.lng;
                (dlat.mul_add(dlat, dlng * dlng), report)
            })
            .filter(|(distance_sq, _)| *distance_sq <= DETAIL_MATCH_RADIUS_DEG.powi(2))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, report)| report)
    }
}

/// Static sample photo sets for demo reports.
fn sample_photo_urls(species: Species) -> PhotoUrlLists {
    let segment = species.path_segment();
    PhotoUrlLists {
        whole_tree: Some(vec![format!("/samples/{segment}-whole.jpg")]),
        detail: Some(vec![format!("/samples/{segment}-detail.jpg")]),
        base: Some(vec![format!("/samples/{segment}-base.jpg")]),
        leaves: species
            .has_leaf_photos()
            .then(|| vec![format!("/samples/{segment}-leaves.jpg")]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn report(species: Species, lat: f64, lng: f64, start: &str, end: &str) -> StoredReport {
        StoredReport {
            id: Uuid::new_v4(),
            species,
            position: GeoPoint::new(lat, lng),
            range: DateRange::new(day(start), day(end)),
            texture_rating: None,
            hole_size_mm: None,
            photo_urls: PhotoUrlLists::default(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn points_filter_by_species_and_overlap() {
        let mut store = ReportStore::new();
        store.insert(report(Species::Matsu, 35.0, 139.0, "2025-08-01", "2025-08-10"));
        store.insert(report(Species::Matsu, 35.1, 139.1, "2025-06-01", "2025-06-10"));
        store.insert(report(Species::Nara, 35.2, 139.2, "2025-08-01", "2025-08-10"));

        let range = DateRange::new(day("2025-08-05"), day("2025-08-20"));
        let collection = store.points(Species::Matsu, &range);
        assert_eq!(collection.items, vec![GeoPoint::new(35.0, 139.0)]);
    }

    #[test]
    fn nearest_requires_proximity() {
        let mut store = ReportStore::new();
        store.insert(report(Species::Nara, 35.0, 139.0, "2025-08-01", "2025-08-10"));

        let range = DateRange::new(day("2025-08-01"), day("2025-08-31"));
        assert!(
            store
                .nearest(Species::Nara, GeoPoint::new(35.00005, 139.0), &range)
                .is_some()
        );
        assert!(
            store
                .nearest(Species::Nara, GeoPoint::new(35.01, 139.0), &range)
                .is_none()
        );
        assert!(
            store
                .nearest(Species::Matsu, GeoPoint::new(35.0, 139.0), &range)
                .is_none()
        );
    }

    #[test]
    fn nearest_picks_the_closest_match() {
        let mut store = ReportStore::new();
        store.insert(report(Species::Matsu, 35.0, 139.0, "2025-08-01", "2025-08-10"));
        store.insert(report(Species::Matsu, 35.00002, 139.0, "2025-08-01", "2025-08-10"));

        let range = DateRange::new(day("2025-08-01"), day("2025-08-31"));
        let nearest = store
            .nearest(Species::Matsu, GeoPoint::new(35.00003, 139.0), &range)
            .unwrap();
        assert_eq!(nearest.position.lat, 35.00002);
    }

    #[test]
    fn demo_seed_is_plausible() {
        let store = ReportStore::seed_demo(9, day("2025-08-19"));
        assert_eq!(store.len(), DEMO_REPORTS_PER_SPECIES * 2);

        let wide = DateRange::new(day("2024-01-01"), day("2026-01-01"));
        let matsu = store.points(Species::Matsu, &wide);
        assert_eq!(matsu.items.len(), DEMO_REPORTS_PER_SPECIES);
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Demo point-set generation.
//!
//! Produces uniform random scatters around a metro center so the map
//! pipeline can be exercised without the production backend, plus a
//! [`PointSource`] implementation serving those scatters.

use async_trait::async_trait;
use blight_map_report_models::{GeoPoint, PointCollection, Species, wire::PointQuery};
use blight_map_session::{PointSetKind, PointSource, SourceError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Demo scatter center (central Tokyo).
pub const DEMO_CENTER: GeoPoint = GeoPoint::new(35.6895, 139.6917);

/// Latitudinal scatter width in degrees (roughly ±28 km).
pub const DEMO_LAT_SPREAD: f64 = 0.5;

/// Longitudinal scatter width in degrees.
pub const DEMO_LNG_SPREAD: f64 = 0.6;

/// Demo pine-wilt point count.
pub const DEMO_MATSU_COUNT: usize = 12_000;

/// Demo oak-wilt point count.
pub const DEMO_NARA_COUNT: usize = 10_000;

/// Uniform random scatter of `count` points centered on `center`, spread
/// across `lat_spread` x `lng_spread` degrees.
pub fn scatter_points(
    rng: &mut impl Rng,
    count: usize,
    center: GeoPoint,
    lat_spread: f64,
    lng_spread: f64,
) -> Vec<GeoPoint> {
    (0..count)
        .map(|_| {
            GeoPoint::new(
                (rng.r#gen::<f64>() - 0.5).mul_add(lat_spread, center.lat),
                (rng.r#gen::<f64>() - 0.5).mul_add(lng_spread, center.lng),
            )
        })
        .collect()
}

/// Point source serving fixed demo scatters.
///
/// Each species' scatter is generated once at construction and served for
/// every query; like the original demo path, the date filter and viewport
/// parameters are ignored.
#[derive(Debug, Clone)]
pub struct DemoPointSource {
    matsu: Vec<GeoPoint>,
    nara: Vec<GeoPoint>,
}

impl DemoPointSource {
    /// Generates the default demo scatters from entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(&mut rand::thread_rng())
    }

    /// Generates deterministic demo scatters from a seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(&mut StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: &mut impl Rng) -> Self {
        Self {
            matsu: scatter_points(
                rng,
                DEMO_MATSU_COUNT,
                DEMO_CENTER,
                DEMO_LAT_SPREAD,
                DEMO_LNG_SPREAD,
            ),
            nara: scatter_points(
                rng,
                DEMO_NARA_COUNT,
                DEMO_CENTER,
                DEMO_LAT_SPREAD,
                DEMO_LNG_SPREAD,
            ),
        }
    }

    /// The demo scatter for a species.
    #[must_use]
    pub fn points(&self, species: Species) -> &[GeoPoint] {
        match species {
            Species::Matsu => &self.matsu,
            Species::Nara => &self.nara,
        }
    }
}

impl Default for DemoPointSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PointSource for DemoPointSource {
    async fn fetch_points(
        &self,
        _kind: PointSetKind,
        query: &PointQuery,
    ) -> Result<PointCollection, SourceError> {
        Ok(PointCollection {
            items: self.points(query.category).to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blight_map_report_models::DateRange;

    #[test]
    fn scatter_respects_count_and_spread() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = scatter_points(&mut rng, 500, DEMO_CENTER, DEMO_LAT_SPREAD, DEMO_LNG_SPREAD);
        assert_eq!(points.len(), 500);
        for point in &points {
            assert!((point.lat - DEMO_CENTER.lat).abs() <= DEMO_LAT_SPREAD / 2.0);
            assert!((point.lng - DEMO_CENTER.lng).abs() <= DEMO_LNG_SPREAD / 2.0);
        }
    }

    #[test]
    fn seeded_sources_are_deterministic() {
        let a = DemoPointSource::seeded(42);
        let b = DemoPointSource::seeded(42);
        assert_eq!(a.points(Species::Matsu), b.points(Species::Matsu));
        assert_eq!(a.points(Species::Nara), b.points(Species::Nara));
        assert_eq!(a.points(Species::Matsu).len(), DEMO_MATSU_COUNT);
        assert_eq!(a.points(Species::Nara).len(), DEMO_NARA_COUNT);
    }

    #[tokio::test]
    async fn source_serves_the_species_scatter() {
        let source = DemoPointSource::seeded(1);
        let day: chrono::NaiveDate = "2025-08-19".parse().unwrap();
        let query = PointQuery {
            category: Species::Nara,
            range: DateRange::single_day(day),
            center: DEMO_CENTER,
            zoom: 12.0,
        };
        let collection = source
            .fetch_points(PointSetKind::Heat, &query)
            .await
            .unwrap();
        assert_eq!(collection.items.len(), DEMO_NARA_COUNT);
        assert_eq!(collection.items, source.points(Species::Nara));
    }
}

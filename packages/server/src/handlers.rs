//! HTTP handler functions for the demo backend API.

use actix_web::{HttpResponse, web};
use blight_map_report_models::{
    GeoPoint, Species,
    wire::{DetailQueryParams, PointQueryParams},
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "healthy": true,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/pins/{species}`, `GET /api/heat/{species}`,
/// `GET /api/grid/{species}`
///
/// All three flavors serve the same store-backed point collection,
/// filtered by species and date-range overlap.
pub async fn points(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<PointQueryParams>,
) -> HttpResponse {
    let Some(species) = species_from_segment(&path) else {
        return unknown_species(&path);
    };

    let store = match state.store.read() {
        Ok(store) => store,
        Err(e) => {
            log::error!("Report store lock poisoned: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Report store unavailable"
            }));
        }
    };

    HttpResponse::Ok().json(store.points(species, &params.range()))
}

/// `GET /api/pins/{species}/detail`
///
/// Returns the stored report closest to the queried position, or 404 when
/// nothing matches; the client degrades to its placeholder record.
pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<DetailQueryParams>,
) -> HttpResponse {
    let Some(species) = species_from_segment(&path) else {
        return unknown_species(&path);
    };

    let store = match state.store.read() {
        Ok(store) => store,
        Err(e) => {
            log::error!("Report store lock poisoned: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Report store unavailable"
            }));
        }
    };

    let position = GeoPoint::new(params.lat, params.lng);
    let range = blight_map_report_models::DateRange::new(params.start, params.end);
    store.nearest(species, position, &range).map_or_else(
        || {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": "No report at the queried position"
            }))
        },
        |report| HttpResponse::Ok().json(report.detail_record()),
    )
}

/// Resolves a URL path segment (`matsu` / `nara`) to a species.
fn species_from_segment(segment: &str) -> Option<Species> {
    Species::all()
        .iter()
        .copied()
        .find(|species| species.path_segment() == segment)
}

fn unknown_species(segment: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": format!("Unknown species segment: {segment}")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ReportStore, StoredReport};
    use actix_web::{App, test};
    use blight_map_report_models::{DateRange, PointCollection, wire::PinDetailRecord};
    use chrono::Utc;
    use std::sync::RwLock;
    use uuid::Uuid;

    fn day(s: &str) -> chrono::NaiveDate {
        s.parse().unwrap()
    }

    fn fixture_store() -> ReportStore {
        let mut store = ReportStore::new();
        store.insert(StoredReport {
            id: Uuid::new_v4(),
            species: Species::Matsu,
            position: GeoPoint::new(35.7, 139.7),
            range: DateRange::new(day("2025-08-01"), day("2025-08-10")),
            texture_rating: Some(4),
            hole_size_mm: None,
            photo_urls: blight_map_report_models::wire::PhotoUrlLists::default(),
            created_at: Utc::now(),
        });
        store.insert(StoredReport {
            id: Uuid::new_v4(),
            species: Species::Nara,
            position: GeoPoint::new(35.8, 139.8),
            range: DateRange::new(day("2025-07-01"), day("2025-07-05")),
            texture_rating: None,
            hole_size_mm: Some(12.0),
            photo_urls: blight_map_report_models::wire::PhotoUrlLists::default(),
            created_at: Utc::now(),
        });
        store
    }

    fn test_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            store: RwLock::new(fixture_store()),
        })
    }

    #[actix_web::test]
    async fn pins_filter_by_species_and_range() {
        let app = test::init_service(
            App::new()
                .app_data(test_state())
                .route("/api/pins/{species}", web::get().to(points)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/pins/matsu?category=Matsu&start=2025-08-05&end=2025-08-20&centerLat=35.7&centerLng=139.7&zoom=12")
            .to_request();
        let collection: PointCollection = test::call_and_read_body_json(&app, req).await;
        assert_eq!(collection.items, vec![GeoPoint::new(35.7, 139.7)]);

        // The oak report's range does not overlap August.
        let req = test::TestRequest::get()
            .uri("/api/pins/nara?category=Nara&start=2025-08-05&end=2025-08-20&centerLat=35.7&centerLng=139.7&zoom=12")
            .to_request();
        let collection: PointCollection = test::call_and_read_body_json(&app, req).await;
        assert!(collection.items.is_empty());
    }

    #[actix_web::test]
    async fn unknown_species_is_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(test_state())
                .route("/api/pins/{species}", web::get().to(points)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/pins/kaede?category=Matsu&start=2025-08-01&end=2025-08-02&centerLat=0&centerLng=0&zoom=12")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn detail_returns_nearest_record() {
        let app = test::init_service(
            App::new()
                .app_data(test_state())
                .route("/api/pins/{species}/detail", web::get().to(detail)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/pins/matsu/detail?category=Matsu&lat=35.7&lng=139.7&start=2025-08-01&end=2025-08-31")
            .to_request();
        let record: PinDetailRecord = test::call_and_read_body_json(&app, req).await;
        assert_eq!(record.category, Species::Matsu);
        assert_eq!(record.texture_rating, Some(4));
    }

    #[actix_web::test]
    async fn detail_misses_with_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(test_state())
                .route("/api/pins/{species}/detail", web::get().to(detail)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/pins/nara/detail?category=Nara&lat=10.0&lng=10.0&start=2025-07-01&end=2025-07-31")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}

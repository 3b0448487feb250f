//! Registration submission as `multipart/form-data`.

use blight_map_report_models::{PhotoRef, RegistrationSubmit};
use reqwest::multipart;

use crate::{ApiClient, ClientError};

/// Hard bound on a registration request; after this the request is
/// aborted and treated as a failure. No automatic retry is performed.
pub const SUBMISSION_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

impl ApiClient {
    /// Submits a new report with its photo attachments.
    ///
    /// Metadata fields (`category`, `lat`, `lng`, `start`, `end`, and the
    /// species-specific `textureRating` / `holeSize`) are sent as text
    /// parts; photos are sent as file parts named by their role. Photos
    /// still pending on the device are read and attached; references that
    /// are already stored backend-side are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when a pending photo cannot be read, the
    /// request fails or times out, or the backend answers non-success.
    /// The caller resets its form state regardless of the outcome.
    pub async fn submit_registration(
        &self,
        submit: &RegistrationSubmit,
    ) -> Result<(), ClientError> {
        let mut form = multipart::Form::new()
            .text("category", submit.species.to_string())
            .text("lat", submit.position.lat.to_string())
            .text("lng", submit.position.lng.to_string())
            .text("start", submit.range.start.to_string())
            .text("end", submit.range.end.to_string());

        if let Some(rating) = submit.texture_rating {
            form = form.text("textureRating", rating.value().to_string());
        }
        if let Some(hole_size) = submit.hole_size_mm {
            form = form.text("holeSize", hole_size.to_string());
        }

        for (role, photos) in &submit.photos {
            for photo in photos {
                match photo {
                    PhotoRef::Pending { path, .. } => {
                        let bytes = tokio::fs::read(path).await?;
                        let file_name = path
                            .file_name()
                            .map_or_else(|| "photo.jpg".to_owned(), |n| {
                                n.to_string_lossy().into_owned()
                            });
                        let part = multipart::Part::bytes(bytes)
                            .file_name(file_name)
                            .mime_str("image/jpeg")
                            .map_err(|e| ClientError::Multipart {
                                message: format!("Failed to set MIME type: {e}"),
                            })?;
                        form = form.part(role.to_string(), part);
                    }
                    PhotoRef::Stored { url } => {
                        log::debug!("Skipping already-stored photo in submission: {url}");
                    }
                }
            }
        }

        let url = self.endpoint(&format!("register/{}", submit.species.path_segment()));
        let response = self
            .http()
            .post(&url)
            .multipart(form)
            .timeout(SUBMISSION_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }

        log::info!("Registered {} report at ({}, {})", submit.species, submit.position.lat, submit.position.lng);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blight_map_report_models::{DateRange, GeoPoint, Species, TextureRating};
    use std::collections::BTreeMap;

    fn day(s: &str) -> chrono::NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn missing_photo_file_fails_before_any_request() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let mut photos = BTreeMap::new();
        photos.insert(
            blight_map_report_models::PhotoRole::WholeTree,
            vec![PhotoRef::Pending {
                preview: None,
                path: "/nonexistent/blight-map-test/photo.jpg".into(),
            }],
        );
        let submit = RegistrationSubmit {
            species: Species::Matsu,
            position: GeoPoint::new(35.7, 139.7),
            range: DateRange::single_day(day("2025-08-19")),
            texture_rating: Some(TextureRating::from_value(4).unwrap()),
            hole_size_mm: None,
            photos,
        };
        let result = client.submit_registration(&submit).await;
        assert!(matches!(result, Err(ClientError::Io(_))));
    }

    #[tokio::test]
    async fn unreachable_backend_surfaces_an_error() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let submit = RegistrationSubmit {
            species: Species::Nara,
            position: GeoPoint::new(35.7, 139.7),
            range: DateRange::single_day(day("2025-08-19")),
            texture_rating: None,
            hole_size_mm: Some(12.0),
            photos: BTreeMap::new(),
        };
        let result = client.submit_registration(&submit).await;
        assert!(matches!(result, Err(ClientError::Http(_))));
    }
}

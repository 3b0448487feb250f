//! Boundary geometry loading.
//!
//! The boundary source is published either as an index of per-region
//! documents (preferred, keeps individual files small) or as one bundled
//! document. The indexed set is merged client-side; documents that fail
//! to load are skipped rather than failing the whole merge.

use geojson::FeatureCollection;

use crate::{ApiClient, ClientError};

/// Path of the per-region document index relative to the base URL.
pub const BOUNDARY_INDEX_PATH: &str = "boundaries/index.json";

/// Path of the bundled single-document fallback.
pub const BOUNDARY_FALLBACK_PATH: &str = "boundaries/all.geojson";

impl ApiClient {
    /// Loads the boundary feature collection.
    ///
    /// Tries the indexed per-region set first and merges every document
    /// that loads; when the index itself is unavailable, falls back to
    /// the bundled single document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] only when both the index and the fallback
    /// document are unavailable.
    pub async fn load_boundaries(&self) -> Result<FeatureCollection, ClientError> {
        match self.load_indexed_boundaries().await {
            Ok(collection) => Ok(collection),
            Err(e) => {
                log::warn!("Boundary index unavailable ({e}); falling back to bundled document");
                self.fetch_feature_collection(BOUNDARY_FALLBACK_PATH).await
            }
        }
    }

    async fn load_indexed_boundaries(&self) -> Result<FeatureCollection, ClientError> {
        let url = self.endpoint(BOUNDARY_INDEX_PATH);
        let response = self.http().get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let files: Vec<String> = response.json().await?;

        let mut features = Vec::new();
        for file in &files {
            match self
                .fetch_feature_collection(&format!("boundaries/{file}"))
                .await
            {
                Ok(mut collection) => features.append(&mut collection.features),
                Err(e) => log::warn!("Skipping boundary document {file}: {e}"),
            }
        }
        log::info!(
            "Merged {} boundary features from {} documents",
            features.len(),
            files.len()
        );

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }

    async fn fetch_feature_collection(
        &self,
        path: &str,
    ) -> Result<FeatureCollection, ClientError> {
        let url = self.endpoint(path);
        let response = self.http().get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }
}

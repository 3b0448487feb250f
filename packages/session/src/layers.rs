//! Map-widget capability surface for layer and view management.

use blight_map_report_models::{GeoPoint, Species};
use blight_map_viz::Layer;

/// Handle of a layer installed on the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

/// The map widget as seen by the session: it can install and remove
/// derived layers and move the view.
///
/// Only the orchestrator calls these; teardown always completes before a
/// rebuild installs a replacement, so the widget never holds two layers of
/// the same kind for one species.
pub trait MapBackend {
    /// Installs a derived layer for a species and returns its handle.
    fn install_layer(&mut self, species: Species, layer: Layer) -> LayerId;

    /// Removes a previously installed layer.
    fn remove_layer(&mut self, id: LayerId);

    /// Recenters the view, keeping the given zoom.
    fn set_view(&mut self, center: GeoPoint, zoom: f64);
}

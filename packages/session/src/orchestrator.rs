//! Visualization orchestration: the per-species layer state machine and
//! the event dispatcher that keeps derived layers consistent with the
//! session.

use blight_map_report_models::{DateRange, GeoPoint, PointCollection, Species, wire::PointQuery};
use blight_map_viz::{Layer, LayerKind, build_grid, build_heat};

use crate::area::BoundaryCatalog;
use crate::layers::MapBackend;
use crate::pins;
use crate::source::{PointSetKind, PointSource};
use crate::viewport::Viewport;
use crate::MapSession;

/// Per-species visualization state.
///
/// Advances only by explicit toggle, cyclically; there are no skip
/// transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VizState {
    /// No derived layer rendered.
    #[default]
    None,
    /// Local-density heatmap rendered.
    Heatmap,
    /// Cell-count grid rendered.
    Grid,
}

impl VizState {
    /// Next state in the toggle cycle.
    #[must_use]
    pub const fn advanced(self) -> Self {
        match self {
            Self::None => Self::Heatmap,
            Self::Heatmap => Self::Grid,
            Self::Grid => Self::None,
        }
    }

    /// The layer kind this state renders, if any.
    #[must_use]
    pub const fn layer_kind(self) -> Option<LayerKind> {
        match self {
            Self::None => None,
            Self::Heatmap => Some(LayerKind::Heat),
            Self::Grid => Some(LayerKind::Grid),
        }
    }
}

/// A change the session must react to.
///
/// Every input (user toggles, widget viewport notifications, selection
/// and date edits) funnels through [`Orchestrator::on_event`], which
/// performs the dependent teardown/rebuild steps deterministically.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The user picked an administrative area, or cleared it with `None`.
    AreaSelected(Option<String>),
    /// The date-range filter changed.
    DateRangeChanged(DateRange),
    /// The map widget finished a move or zoom.
    ViewportMoved(Viewport),
    /// The user toggled a species' visualization.
    VisualizationToggled(Species),
    /// The user toggled a species' registered-pin markers.
    PinsToggled(Species),
}

/// Descriptor of an issued layer rebuild, carrying the generation token
/// its response must match to be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRequest {
    /// Species being rebuilt.
    pub species: Species,
    /// Layer kind being rebuilt.
    pub kind: LayerKind,
    /// Backend query the fetch should run.
    pub query: PointQuery,
    token: u64,
}

impl LayerRequest {
    /// The backend point collection this request fetches.
    #[must_use]
    pub const fn point_set_kind(&self) -> PointSetKind {
        match self.kind {
            LayerKind::Heat => PointSetKind::Heat,
            LayerKind::Grid => PointSetKind::Grid,
        }
    }
}

/// Drives the session against a point source and the map widget.
pub struct Orchestrator<S: PointSource, B: MapBackend> {
    session: MapSession,
    catalog: BoundaryCatalog,
    source: S,
    backend: B,
}

impl<S: PointSource, B: MapBackend> Orchestrator<S, B> {
    /// Creates an orchestrator with all visualizations off.
    pub fn new(
        catalog: BoundaryCatalog,
        source: S,
        backend: B,
        viewport: Viewport,
        date_range: DateRange,
    ) -> Self {
        Self {
            session: MapSession::new(viewport, date_range),
            catalog,
            source,
            backend,
        }
    }

    /// Read access to the session state.
    #[must_use]
    pub const fn session(&self) -> &MapSession {
        &self.session
    }

    /// The boundary catalog selections resolve against.
    #[must_use]
    pub const fn catalog(&self) -> &BoundaryCatalog {
        &self.catalog
    }

    /// Read access to the map backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Swaps in a freshly loaded boundary catalog, re-resolving the
    /// current selection against it and rebuilding dependents.
    pub async fn replace_catalog(&mut self, catalog: BoundaryCatalog) {
        self.catalog = catalog;
        let current = self.session.area().name().map(str::to_owned);
        self.on_event(SessionEvent::AreaSelected(current)).await;
    }

    /// Dispatches one session event, performing every dependent
    /// recomputation before returning. Fetch failures are recovered here:
    /// they are logged and the affected layer or pin set is left absent.
    pub async fn on_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::AreaSelected(name) => {
                let recenter = self.session.area_mut().select(&self.catalog, name.as_deref());
                if let Some((lat, lng)) = recenter {
                    // Recenter on the selection, preserving the zoom.
                    let zoom = self.session.viewport().zoom;
                    self.backend.set_view(GeoPoint::new(lat, lng), zoom);
                }
                self.refresh_visible_pins();
                self.rebuild_all().await;
                self.refresh_loaded_pins().await;
            }
            SessionEvent::DateRangeChanged(range) => {
                self.session.set_date_range(range);
                self.rebuild_all().await;
                self.refresh_loaded_pins().await;
            }
            SessionEvent::ViewportMoved(viewport) => {
                let zoom_changed = (viewport.zoom - self.session.viewport().zoom).abs()
                    > f64::EPSILON;
                *self.session.viewport_mut() = viewport;
                self.refresh_visible_pins();
                if zoom_changed {
                    self.rebuild_all().await;
                }
            }
            SessionEvent::VisualizationToggled(species) => {
                let next = self.session.viz_state(species).advanced();
                self.session.set_viz_state(species, next);
                self.rebuild(species).await;
            }
            SessionEvent::PinsToggled(species) => self.toggle_pins(species).await,
        }
    }

    /// Tears down and rebuilds one species' layer for its current state,
    /// fetching points inline.
    pub async fn rebuild(&mut self, species: Species) {
        let Some(request) = self.begin_rebuild(species) else {
            return;
        };
        match self
            .source
            .fetch_points(request.point_set_kind(), &request.query)
            .await
        {
            Ok(points) => self.apply_points(&request, &points),
            Err(e) => {
                log::error!(
                    "Point fetch failed for {species} {:?} layer: {e}",
                    request.kind
                );
            }
        }
    }

    /// First half of a rebuild: synchronously removes any live layer of
    /// either kind for the species, invalidates in-flight fetches, and,
    /// when the state renders something, issues a request for the fetch.
    ///
    /// Teardown always completes here, before any response is applied, so
    /// at most one layer of each kind exists per species at any time.
    pub fn begin_rebuild(&mut self, species: Species) -> Option<LayerRequest> {
        for &kind in LayerKind::all() {
            self.session.bump_generation(species, kind);
            if let Some(id) = self.session.take_layer(species, kind) {
                self.backend.remove_layer(id);
            }
        }

        let kind = self.session.viz_state(species).layer_kind()?;
        let viewport = self.session.viewport();
        Some(LayerRequest {
            species,
            kind,
            query: PointQuery {
                category: species,
                range: self.session.date_range(),
                center: viewport.center(),
                zoom: viewport.zoom,
            },
            token: self.session.generation(species, kind),
        })
    }

    /// Second half of a rebuild: applies a fetched point set, unless a
    /// newer rebuild for the same (species, kind) was issued in the
    /// meantime. Stale responses are discarded, never installed.
    pub fn apply_points(&mut self, request: &LayerRequest, points: &PointCollection) {
        if self.session.generation(request.species, request.kind) != request.token {
            log::debug!(
                "Discarding stale {:?} response for {}",
                request.kind,
                request.species
            );
            return;
        }

        let area = self.session.area().prepared();
        let layer = match request.kind {
            LayerKind::Heat => Layer::Heat(build_heat(&points.items, request.query.zoom, area)),
            LayerKind::Grid => Layer::Grid(build_grid(&points.items, request.query.zoom, area, None)),
        };
        let id = self.backend.install_layer(request.species, layer);
        self.session.set_layer(request.species, request.kind, id);
    }

    async fn rebuild_all(&mut self) {
        for &species in Species::all() {
            self.rebuild(species).await;
        }
    }

    /// Toggles a species' registered-pin markers: a loaded set clears, an
    /// empty one fetches. A failed fetch clears the set.
    async fn toggle_pins(&mut self, species: Species) {
        if !self.session.registered_pins(species).is_empty() {
            self.session.set_registered_pins(species, Vec::new());
            self.refresh_visible_pins();
            return;
        }

        self.session.record_pin_toggle(species);
        let query = self.current_query(species);
        match self.source.fetch_points(PointSetKind::Pins, &query).await {
            Ok(points) => self.session.set_registered_pins(species, points.items),
            Err(e) => {
                log::error!("Registered pin fetch failed for {species}: {e}");
                self.session.set_registered_pins(species, Vec::new());
            }
        }
        self.refresh_visible_pins();
    }

    /// Re-fetches the pin sets that are currently loaded, after an area
    /// or date-range change. A failed refresh keeps the previous set.
    async fn refresh_loaded_pins(&mut self) {
        for &species in Species::all() {
            if self.session.registered_pins(species).is_empty() {
                continue;
            }
            let query = self.current_query(species);
            match self.source.fetch_points(PointSetKind::Pins, &query).await {
                Ok(points) => self.session.set_registered_pins(species, points.items),
                Err(e) => log::error!("Registered pin refresh failed for {species}: {e}"),
            }
        }
        self.refresh_visible_pins();
    }

    fn refresh_visible_pins(&mut self) {
        for &species in Species::all() {
            let visible = pins::visible_pins(
                self.session.registered_pins(species),
                self.session.viewport(),
                self.session.area(),
            );
            self.session.set_visible_pins(species, visible);
        }
    }

    fn current_query(&self, species: Species) -> PointQuery {
        let viewport = self.session.viewport();
        PointQuery {
            category: species,
            range: self.session.date_range(),
            center: viewport.center(),
            zoom: viewport.zoom,
        }
    }
}

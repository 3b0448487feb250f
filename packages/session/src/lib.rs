#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Map session state and the visualization orchestrator.
//!
//! The session layer sits between the point sources (backend API or demo
//! data) and the map widget. It owns everything that used to live in
//! scattered mutable references in the original frontend: the viewport
//! snapshot, the selected administrative area, the date range, each
//! species' visualization state, the registered/visible pin sets, and the
//! handles of currently installed layers.
//!
//! All state changes flow through one [`SessionEvent`] dispatcher
//! ([`Orchestrator::on_event`]), which tears down and rebuilds derived
//! layers deterministically. Point fetches are asynchronous; a monotonic
//! generation token per (species, layer kind) discards responses that no
//! longer match current state.

pub mod area;
pub mod layers;
pub mod orchestrator;
pub mod pins;
pub mod source;
pub mod viewport;

pub use area::{AreaSelection, BoundaryCatalog};
pub use layers::{LayerId, MapBackend};
pub use orchestrator::{LayerRequest, Orchestrator, SessionEvent, VizState};
pub use source::{PointSetKind, PointSource, SourceError};
pub use viewport::{LatLngBounds, Viewport};

use std::collections::BTreeMap;

use blight_map_report_models::{DateRange, GeoPoint, Species};
use blight_map_viz::LayerKind;

/// Central session state container.
///
/// Owns the live map context that orchestration reads and writes; the
/// orchestrator is the only writer of layer handles, the pin visibility
/// filter is the only writer of the visible sets.
#[derive(Debug, Clone)]
pub struct MapSession {
    viewport: Viewport,
    date_range: DateRange,
    area: AreaSelection,
    viz_states: BTreeMap<Species, VizState>,
    layers: BTreeMap<(Species, LayerKind), LayerId>,
    generations: BTreeMap<(Species, LayerKind), u64>,
    registered_pins: BTreeMap<Species, Vec<GeoPoint>>,
    visible_pins: BTreeMap<Species, Vec<GeoPoint>>,
    pin_toggle_order: Vec<Species>,
}

impl MapSession {
    /// Creates a session with no selection, all visualizations off, and no
    /// registered pins.
    #[must_use]
    pub fn new(viewport: Viewport, date_range: DateRange) -> Self {
        Self {
            viewport,
            date_range,
            area: AreaSelection::default(),
            viz_states: Species::all()
                .iter()
                .map(|&s| (s, VizState::None))
                .collect(),
            layers: BTreeMap::new(),
            generations: BTreeMap::new(),
            registered_pins: BTreeMap::new(),
            visible_pins: BTreeMap::new(),
            pin_toggle_order: Vec::new(),
        }
    }

    /// Current viewport snapshot.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current date-range filter.
    #[must_use]
    pub const fn date_range(&self) -> DateRange {
        self.date_range
    }

    /// Current area selection.
    #[must_use]
    pub const fn area(&self) -> &AreaSelection {
        &self.area
    }

    /// Visualization state for a species.
    #[must_use]
    pub fn viz_state(&self, species: Species) -> VizState {
        self.viz_states
            .get(&species)
            .copied()
            .unwrap_or(VizState::None)
    }

    /// Installed layer handle for a species and kind, if one is live.
    #[must_use]
    pub fn layer(&self, species: Species, kind: LayerKind) -> Option<LayerId> {
        self.layers.get(&(species, kind)).copied()
    }

    /// Number of live layers for a species.
    #[must_use]
    pub fn live_layer_count(&self, species: Species) -> usize {
        LayerKind::all()
            .iter()
            .filter(|&&kind| self.layers.contains_key(&(species, kind)))
            .count()
    }

    /// Registered pin set for a species (empty when toggled off).
    #[must_use]
    pub fn registered_pins(&self, species: Species) -> &[GeoPoint] {
        self.registered_pins
            .get(&species)
            .map_or(&[], Vec::as_slice)
    }

    /// Pins currently visible after viewport and area filtering.
    #[must_use]
    pub fn visible_pins(&self, species: Species) -> &[GeoPoint] {
        self.visible_pins.get(&species).map_or(&[], Vec::as_slice)
    }

    /// Marker stacking order: species in the order their pin sets were
    /// last toggled on (most recent last).
    #[must_use]
    pub fn pin_toggle_order(&self) -> &[Species] {
        &self.pin_toggle_order
    }

    pub(crate) fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub(crate) fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    pub(crate) fn area_mut(&mut self) -> &mut AreaSelection {
        &mut self.area
    }

    pub(crate) fn set_viz_state(&mut self, species: Species, state: VizState) {
        self.viz_states.insert(species, state);
    }

    pub(crate) fn set_layer(&mut self, species: Species, kind: LayerKind, id: LayerId) {
        self.layers.insert((species, kind), id);
    }

    pub(crate) fn take_layer(&mut self, species: Species, kind: LayerKind) -> Option<LayerId> {
        self.layers.remove(&(species, kind))
    }

    /// Invalidates any in-flight fetch for the key and returns the new
    /// current token.
    pub(crate) fn bump_generation(&mut self, species: Species, kind: LayerKind) -> u64 {
        let counter = self.generations.entry((species, kind)).or_insert(0);
        *counter += 1;
        *counter
    }

    pub(crate) fn generation(&self, species: Species, kind: LayerKind) -> u64 {
        self.generations
            .get(&(species, kind))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn set_registered_pins(&mut self, species: Species, pins: Vec<GeoPoint>) {
        self.registered_pins.insert(species, pins);
    }

    pub(crate) fn set_visible_pins(&mut self, species: Species, pins: Vec<GeoPoint>) {
        self.visible_pins.insert(species, pins);
    }

    /// Moves `species` to the back of the pin stacking order.
    pub(crate) fn record_pin_toggle(&mut self, species: Species) {
        self.pin_toggle_order.retain(|&s| s != species);
        self.pin_toggle_order.push(species);
    }
}

#[cfg(test)]
pub(crate) mod testutil;

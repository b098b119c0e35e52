use dioxus::prelude::*;

use quake_shared::config::MapConfig;
use quake_shared::feed::{Earthquake, PlateBoundary};

use crate::api;
use crate::components::layer_control::LayerControl;
use crate::components::legend::Legend;
use crate::components::map_view::MapView;

/// Map and layer state shared by the map view and its controls.
///
/// All fields are signals owned by [`QuakeMap`]; copies of this struct are
/// handles, not separate state.
#[derive(Clone, Copy, PartialEq)]
pub struct MapState {
    pub config: MapConfig,
    /// Index into `config.base_layers`.
    pub base_layer: Signal<usize>,
    pub show_earthquakes: Signal<bool>,
    pub show_plates: Signal<bool>,
    pub earthquakes: Signal<Vec<Earthquake>>,
    pub plates: Signal<Vec<PlateBoundary>>,
    /// Index into `earthquakes` whose popup is open.
    pub open_popup: Signal<Option<usize>>,
}

#[component]
pub fn QuakeMap() -> Element {
    let config = MapConfig::default();

    let mut earthquakes = use_signal(Vec::<Earthquake>::new);
    let mut plates = use_signal(Vec::<PlateBoundary>::new);

    let state = MapState {
        config,
        base_layer: use_signal(|| config.default_base_layer),
        show_earthquakes: use_signal(|| config.show_earthquakes),
        show_plates: use_signal(|| config.show_plates),
        earthquakes,
        plates,
        open_popup: use_signal(|| None::<usize>),
    };

    // The two feeds load independently; each only ever writes its own layer.
    // A failed fetch leaves its layer empty.
    let _earthquake_loader = use_resource(move || async move {
        match api::fetch_earthquakes(config.earthquake_feed_url).await {
            Ok(items) => earthquakes.set(items),
            Err(e) => tracing::warn!(error = %e, "Earthquake feed unavailable"),
        }
    });

    let _plate_loader = use_resource(move || async move {
        match api::fetch_plate_boundaries(config.plate_feed_url).await {
            Ok(items) => plates.set(items),
            Err(e) => tracing::warn!(error = %e, "Plate boundary feed unavailable"),
        }
    });

    rsx! {
        div { class: "app",
            MapView { state }
            LayerControl { state }
            Legend {}
        }
    }
}

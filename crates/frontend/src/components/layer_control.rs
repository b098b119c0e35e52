use dioxus::prelude::*;

use crate::pages::quake_map::MapState;

const PLATES_LABEL: &str = "Tectonic Plates";
const EARTHQUAKES_LABEL: &str = "Earthquakes";

/// Always-expanded base layer switcher and overlay toggles.
#[component]
pub fn LayerControl(state: MapState) -> Element {
    let mut base_layer = state.base_layer;
    let mut show_plates = state.show_plates;
    let mut show_earthquakes = state.show_earthquakes;
    let mut open_popup = state.open_popup;

    let current = *base_layer.read();
    let plates_on = *show_plates.read();
    let quakes_on = *show_earthquakes.read();

    rsx! {
        div { class: "layer-control",
            div { class: "layer-control-base",
                for (i, layer) in state.config.base_layers.iter().enumerate() {
                    label { key: "{layer.name}",
                        input {
                            r#type: "radio",
                            name: "base-layer",
                            checked: current == i,
                            onchange: move |_| base_layer.set(i),
                        }
                        span { "{layer.name}" }
                    }
                }
            }
            div { class: "layer-control-separator" }
            div { class: "layer-control-overlays",
                label {
                    input {
                        r#type: "checkbox",
                        checked: plates_on,
                        onchange: move |_| show_plates.set(!plates_on),
                    }
                    span { "{PLATES_LABEL}" }
                }
                label {
                    input {
                        r#type: "checkbox",
                        checked: quakes_on,
                        onchange: move |_| {
                            if quakes_on {
                                // A hidden layer takes its open popup with it
                                open_popup.set(None);
                            }
                            show_earthquakes.set(!quakes_on);
                        },
                    }
                    span { "{EARTHQUAKES_LABEL}" }
                }
            }
        }
    }
}

use dioxus::prelude::*;

use quake_shared::encoding;

/// Depth color key. Static: it never depends on feed data.
#[component]
pub fn Legend() -> Element {
    let entries = encoding::legend_entries();

    rsx! {
        div { class: "legend",
            h4 { "Depth (km)" }
            for entry in entries {
                div { class: "legend-row",
                    i { class: "legend-swatch", style: "background: {entry.color};" }
                    span { "{entry.label}" }
                }
            }
        }
    }
}

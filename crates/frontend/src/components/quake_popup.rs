use dioxus::prelude::*;

use quake_shared::feed::QuakeDetails;

/// Information panel anchored above an earthquake marker.
///
/// `left`/`tip_y` are the map-pane coordinates of the popup's tip; the
/// stylesheet shifts the box up and left from there.
#[component]
pub fn QuakePopup(details: QuakeDetails, left: f64, tip_y: f64, on_close: EventHandler<()>) -> Element {
    rsx! {
        div {
            class: "quake-popup",
            style: "left: {left}px; top: {tip_y}px;",
            // Keep interactions inside the popup away from the map's drag/click handling
            onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
            onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
            ondoubleclick: move |evt: Event<MouseData>| evt.stop_propagation(),
            onwheel: move |evt: Event<WheelData>| evt.stop_propagation(),
            ontouchstart: move |evt: Event<TouchData>| evt.stop_propagation(),
            ontouchend: move |evt: Event<TouchData>| evt.stop_propagation(),

            button {
                class: "close-popup",
                title: "Close",
                onclick: move |_| on_close.call(()),
                "\u{00d7}"
            }
            h3 { "{details.place}" }
            hr {}
            p { strong { "Date & Time:" } " {details.time}" }
            p { strong { "Magnitude:" } " {details.magnitude}" }
            p { strong { "Depth:" } " {details.depth}" }
            div { class: "quake-popup-tip" }
        }
    }
}

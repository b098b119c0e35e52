use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use quake_shared::basemap::TileLayer;
use quake_shared::encoding::{quake_marker_style, MarkerStyle, PathStyle, PLATE_STYLE};
use quake_shared::feed::{Earthquake, PlateBoundary};
use quake_shared::geo::{GeoPath, Point};
use quake_shared::projection::{project, Viewport};

use crate::components::quake_popup::QuakePopup;
use crate::coords;
use crate::pages::quake_map::MapState;

const MAP_CONTAINER_ID: &str = "quake-map-container";

/// Size assumed until the container has been measured.
const FALLBACK_SIZE: Point = Point::new(1024.0, 768.0);

/// Mouse movement (px) below which a press counts as a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Touch movement (px) below which a tap counts as a click.
const TOUCH_DRAG_THRESHOLD: f64 = 8.0;

/// Extra pixels around a marker that still count as hitting it.
const CLICK_TOLERANCE: f64 = 2.0;

/// Gap between a marker's edge and the tip of its popup.
const POPUP_GAP: f64 = 6.0;

// ---------------------------------------------------------------------------
// Tiles
// ---------------------------------------------------------------------------

/// A tile image positioned in map-pane coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTile {
    pub key: String,
    pub url: String,
    pub left: f64,
    pub top: f64,
}

/// Tiles covering the viewport, positioned relative to `pixel_origin`.
fn place_tiles(viewport: &Viewport, layer: &TileLayer, pixel_origin: Point) -> Vec<PlacedTile> {
    viewport
        .visible_tiles()
        .iter()
        .map(|tile| {
            let pos = tile.origin().subtract(pixel_origin);
            PlacedTile {
                key: format!("{}/{}/{}/{}", layer.name, tile.z, tile.x, tile.y),
                url: layer.tile_url(tile),
                left: pos.x,
                top: pos.y,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Earthquake markers
// ---------------------------------------------------------------------------

/// An earthquake marker in map-pane coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedMarker {
    pub pos: Point,
    pub style: MarkerStyle,
}

fn project_markers(quakes: &[Earthquake], zoom: u8, pixel_origin: Point) -> Vec<ProjectedMarker> {
    quakes
        .iter()
        .map(|q| ProjectedMarker {
            pos: project(q.location, zoom).subtract(pixel_origin),
            style: quake_marker_style(q.magnitude, q.depth_km),
        })
        .collect()
}

/// Index of the top-most marker under `point` (pane coordinates). Markers
/// drawn later sit on top, so the search runs back to front.
fn hit_test(markers: &[ProjectedMarker], point: Point) -> Option<usize> {
    markers
        .iter()
        .enumerate()
        .rev()
        .find(|(_, m)| {
            let reach = m.style.radius + m.style.stroke_width / 2.0 + CLICK_TOLERANCE;
            m.pos.distance_to(point) <= reach
        })
        .map(|(i, _)| i)
}

// ---------------------------------------------------------------------------
// SVG builders
// ---------------------------------------------------------------------------

fn wrap_svg(content: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1" style="position:absolute;top:0;left:0;overflow:visible;pointer-events:none;">{}</svg>"#,
        content
    )
}

fn build_marker_circles(svg: &mut String, markers: &[ProjectedMarker]) {
    for m in markers {
        let (cx, cy) = (m.pos.x, m.pos.y);
        let s = &m.style;
        svg.push_str(&format!(
            r##"<circle cx="{cx:.1}" cy="{cy:.1}" r="{}" fill="{}" fill-opacity="{}" stroke="{}" stroke-width="{}" stroke-opacity="{}"/>"##,
            s.radius, s.fill_color, s.fill_opacity, s.stroke_color, s.stroke_width, s.stroke_opacity
        ));
    }
}

fn append_path_data(d: &mut String, path: &GeoPath, zoom: u8, pixel_origin: Point) {
    for (i, latlng) in path.points.iter().enumerate() {
        let p = project(*latlng, zoom).subtract(pixel_origin);
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{cmd}{:.1} {:.1}", p.x, p.y));
    }
    if path.closed {
        d.push('Z');
    }
}

/// All plate outlines as a single `<path>`. Emits nothing for no plates.
fn build_plate_outlines(
    svg: &mut String,
    plates: &[PlateBoundary],
    zoom: u8,
    pixel_origin: Point,
    style: &PathStyle,
) {
    let mut d = String::new();
    for plate in plates {
        for path in &plate.paths {
            append_path_data(&mut d, path, zoom, pixel_origin);
        }
    }
    if d.is_empty() {
        return;
    }
    svg.push_str(&format!(
        r##"<path d="{d}" fill="none" stroke="{}" stroke-width="{}" stroke-opacity="{}" stroke-linecap="round" stroke-linejoin="round"/>"##,
        style.color, style.weight, style.opacity
    ));
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(state: MapState) -> Element {
    let config = state.config;
    let mut open_popup = state.open_popup;

    // View state (local to the map; layers live in `state`)
    let mut center = use_signal(|| config.center);
    let mut zoom = use_signal(|| config.zoom);
    let mut size = use_signal(|| FALLBACK_SIZE);
    let mut wheel_accum = use_signal(|| 0.0_f64);

    // Drag state (mouse)
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start = use_signal(|| Point::new(0.0, 0.0));
    let mut drag_start_center = use_signal(|| config.center);

    // Touch state
    let mut touch_start = use_signal(|| None::<Point>);
    let mut touch_did_pan = use_signal(|| false);
    let mut touch_start_center = use_signal(|| config.center);
    let mut is_pinching = use_signal(|| false);
    let mut pinch_start_distance = use_signal(|| 0.0_f64);
    let mut pinch_scale = use_signal(|| 1.0_f64);
    let mut pinch_midpoint = use_signal(|| Point::new(0.0, 0.0));

    let viewport = move || Viewport::new(*center.read(), *zoom.read(), *size.read());

    let mut measure = move || {
        if let Some(rect) = coords::container_rect(MAP_CONTAINER_ID) {
            if rect.width() > 0.0 && rect.height() > 0.0 {
                size.set(Point::new(rect.width(), rect.height()));
            }
        }
    };

    // Switching to a base layer with a lower max zoom pulls the view back in range
    use_effect(move || {
        let base = *state.base_layer.read();
        let current = *zoom.peek();
        let clamped = config.clamp_zoom(current as i32, base);
        if clamped != current {
            zoom.set(clamped);
        }
    });

    let mut zoom_by = move |steps: i32, anchor: Option<Point>| {
        let vp = viewport();
        let base = *state.base_layer.peek();
        let new_zoom = config.clamp_zoom((vp.zoom as i32).saturating_add(steps), base);
        if new_zoom == vp.zoom {
            return;
        }
        let anchor = anchor.unwrap_or_else(|| vp.size.scale(0.5));
        center.set(vp.center_for_zoom_around(anchor, new_zoom));
        zoom.set(new_zoom);
    };

    // Pane coordinates are world pixels at the current zoom minus this
    // origin; it only moves on zoom so panning never rebuilds the overlays.
    let pixel_origin = use_memo(move || {
        let z = *zoom.read();
        project(*center.peek(), z).round()
    });

    let markers = use_memo(move || {
        let z = *zoom.read();
        let origin = *pixel_origin.read();
        project_markers(&state.earthquakes.read(), z, origin)
    });

    let quake_svg = use_memo(move || {
        if !*state.show_earthquakes.read() {
            return String::new();
        }
        let mut svg = String::with_capacity(64 * 1024);
        build_marker_circles(&mut svg, &markers.read());
        wrap_svg(&svg)
    });

    let plate_svg = use_memo(move || {
        if !*state.show_plates.read() {
            return String::new();
        }
        let z = *zoom.read();
        let origin = *pixel_origin.read();
        let mut svg = String::with_capacity(64 * 1024);
        build_plate_outlines(&mut svg, &state.plates.read(), z, origin, &PLATE_STYLE);
        wrap_svg(&svg)
    });

    // Clicking the map opens the popup of the marker under the cursor, or
    // closes any open popup.
    let mut handle_click = move |container_point: Point| {
        if !*state.show_earthquakes.peek() {
            open_popup.set(None);
            return;
        }
        let vp = viewport();
        let pane_point = coords::container_to_pane(container_point, &vp, *pixel_origin.peek());
        let hit = hit_test(&markers.peek(), pane_point);
        open_popup.set(hit);
    };

    let vp = viewport();
    let origin = *pixel_origin.read();
    let offset = coords::pane_offset(&vp, origin);
    let base_layer = config.base_layer(*state.base_layer.read());
    let tiles = place_tiles(&vp, &base_layer, origin);
    let max_zoom = base_layer.max_zoom;
    let at_max = vp.zoom >= max_zoom;
    let at_min = vp.zoom <= config.min_zoom;

    let popup = (*open_popup.read())
        .filter(|_| *state.show_earthquakes.read())
        .and_then(|idx| {
            let marker = markers.read().get(idx).copied()?;
            let details = state.earthquakes.read().get(idx)?.details();
            Some((details, marker))
        });

    let pane_style = format!(
        "transform: translate({}px, {}px);",
        offset.x.round(),
        offset.y.round()
    );
    let container_class = if *is_dragging.read() && *did_drag.read() {
        "map-container dragging"
    } else {
        "map-container"
    };

    rsx! {
        div { class: "map-root",
            div {
                id: MAP_CONTAINER_ID,
                class: "{container_class}",

                onmounted: move |_| measure(),
                onresize: move |_| measure(),

                onwheel: move |evt: Event<WheelData>| {
                    evt.prevent_default();
                    let accum = *wheel_accum.read() + coords::wheel_delta_y(evt.data().delta());
                    let (steps, rest) = coords::wheel_zoom_steps(accum);
                    wheel_accum.set(rest);
                    if steps == 0 {
                        return;
                    }
                    let client = evt.data().client_coordinates();
                    let anchor = coords::client_to_container_point(client.x, client.y, MAP_CONTAINER_ID);
                    zoom_by(steps, anchor);
                },

                onmousedown: move |evt: Event<MouseData>| {
                    if evt.trigger_button() != Some(MouseButton::Primary) {
                        return;
                    }
                    let client = evt.client_coordinates();
                    is_dragging.set(true);
                    did_drag.set(false);
                    drag_start.set(Point::new(client.x, client.y));
                    drag_start_center.set(*center.read());
                },

                onmousemove: move |evt: Event<MouseData>| {
                    if !*is_dragging.read() {
                        return;
                    }
                    let client = evt.client_coordinates();
                    let start = *drag_start.read();
                    let delta = Point::new(client.x - start.x, client.y - start.y);

                    if !*did_drag.read() && (delta.x.abs() > DRAG_THRESHOLD || delta.y.abs() > DRAG_THRESHOLD) {
                        did_drag.set(true);
                    }
                    if *did_drag.read() {
                        let from = Viewport::new(*drag_start_center.read(), *zoom.read(), *size.read());
                        center.set(from.panned_by(delta));
                    }
                },

                onmouseup: move |evt: Event<MouseData>| {
                    let was_dragging = *is_dragging.read();
                    let was_drag = *did_drag.read();
                    is_dragging.set(false);

                    // A mouseup without drag movement = a click
                    if was_dragging && !was_drag {
                        let client = evt.client_coordinates();
                        if let Some(point) = coords::client_to_container_point(client.x, client.y, MAP_CONTAINER_ID) {
                            handle_click(point);
                        }
                    }
                },

                onmouseleave: move |_| {
                    is_dragging.set(false);
                },

                ondoubleclick: move |evt: Event<MouseData>| {
                    evt.prevent_default();
                    let client = evt.client_coordinates();
                    let anchor = coords::client_to_container_point(client.x, client.y, MAP_CONTAINER_ID);
                    zoom_by(1, anchor);
                },

                // --- Touch event handlers ---

                ontouchstart: move |evt: Event<TouchData>| {
                    evt.prevent_default();
                    let touches = evt.data().touches();
                    if touches.len() == 1 {
                        let t = &touches[0];
                        touch_start.set(Some(Point::new(t.client_coordinates().x, t.client_coordinates().y)));
                        touch_did_pan.set(false);
                        touch_start_center.set(*center.read());
                    } else if touches.len() >= 2 {
                        let p0 = Point::new(touches[0].client_coordinates().x, touches[0].client_coordinates().y);
                        let p1 = Point::new(touches[1].client_coordinates().x, touches[1].client_coordinates().y);
                        is_pinching.set(true);
                        pinch_start_distance.set(p0.distance_to(p1));
                        pinch_scale.set(1.0);
                        pinch_midpoint.set(p0.add(p1).scale(0.5));
                        // Cancel any tap tracking
                        touch_start.set(None);
                        touch_did_pan.set(true);
                    }
                },

                ontouchmove: move |evt: Event<TouchData>| {
                    evt.prevent_default();
                    let touches = evt.data().touches();

                    if *is_pinching.read() && touches.len() >= 2 {
                        let p0 = Point::new(touches[0].client_coordinates().x, touches[0].client_coordinates().y);
                        let p1 = Point::new(touches[1].client_coordinates().x, touches[1].client_coordinates().y);
                        let start_d = *pinch_start_distance.read();
                        if start_d >= 1.0 {
                            pinch_scale.set(p0.distance_to(p1) / start_d);
                        }
                    } else if touches.len() == 1 {
                        let t = &touches[0];
                        let cur = Point::new(t.client_coordinates().x, t.client_coordinates().y);
                        if let Some(start) = *touch_start.read() {
                            if !*touch_did_pan.read() && start.distance_to(cur) > TOUCH_DRAG_THRESHOLD {
                                touch_did_pan.set(true);
                            }
                            if *touch_did_pan.read() {
                                let from = Viewport::new(*touch_start_center.read(), *zoom.read(), *size.read());
                                center.set(from.panned_by(cur.subtract(start)));
                            }
                        }
                    }
                },

                ontouchend: move |evt: Event<TouchData>| {
                    evt.prevent_default();
                    let remaining = evt.data().touches().len();

                    if *is_pinching.read() {
                        // Wait for all fingers to lift, then snap to whole zoom levels
                        if remaining == 0 {
                            is_pinching.set(false);
                            touch_start.set(None);
                            let steps = pinch_scale.read().max(1e-3).log2().round() as i32;
                            let mid = *pinch_midpoint.read();
                            let anchor = coords::client_to_container_point(mid.x, mid.y, MAP_CONTAINER_ID);
                            zoom_by(steps, anchor);
                        }
                        return;
                    }

                    // Single-finger tap: no pan occurred and all fingers are up
                    if remaining == 0 && !*touch_did_pan.read() {
                        if let Some(start) = *touch_start.read() {
                            if let Some(point) = coords::client_to_container_point(start.x, start.y, MAP_CONTAINER_ID) {
                                handle_click(point);
                            }
                        }
                    }

                    if remaining == 0 {
                        touch_start.set(None);
                    }
                },

                ontouchcancel: move |_evt: Event<TouchData>| {
                    touch_start.set(None);
                    touch_did_pan.set(false);
                    is_pinching.set(false);
                },

                // Map pane: tiles, overlays and popup share one translation
                div {
                    class: "map-pane",
                    style: "{pane_style}",

                    div { class: "tile-pane",
                        for tile in tiles {
                            img {
                                key: "{tile.key}",
                                class: "map-tile",
                                src: "{tile.url}",
                                draggable: "false",
                                alt: "",
                                style: "left: {tile.left}px; top: {tile.top}px;",
                            }
                        }
                    }

                    div {
                        class: "overlay-pane",
                        dangerous_inner_html: "{plate_svg}",
                    }
                    div {
                        class: "overlay-pane",
                        dangerous_inner_html: "{quake_svg}",
                    }

                    if let Some((details, marker)) = popup {
                        QuakePopup {
                            details,
                            left: marker.pos.x,
                            tip_y: marker.pos.y - marker.style.radius - POPUP_GAP,
                            on_close: move |_| open_popup.set(None),
                        }
                    }
                }
            }

            // Controls sit outside the event container so clicks on them
            // never pan or hit-test the map.
            div { class: "zoom-control",
                button {
                    title: "Zoom in",
                    disabled: at_max,
                    onclick: move |_| zoom_by(1, None),
                    "+"
                }
                button {
                    title: "Zoom out",
                    disabled: at_min,
                    onclick: move |_| zoom_by(-1, None),
                    "\u{2212}"
                }
            }

            if !base_layer.attribution.is_empty() {
                div { class: "attribution", "{base_layer.attribution}" }
            }
        }
    }
}

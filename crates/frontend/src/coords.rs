use dioxus::html::geometry::WheelDelta;
use quake_shared::geo::Point;
use quake_shared::projection::Viewport;

/// Scroll distance (in pixel-like units) that counts as one zoom level.
pub const WHEEL_PX_PER_ZOOM: f64 = 60.0;

/// Get the bounding client rect of an element by id.
pub fn container_rect(container_id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(container_id)?;
    Some(element.get_bounding_client_rect())
}

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) -> Point {
    Point::new(client_x - rect_left, client_y - rect_top)
}

/// Container-relative point for a client position, using the live DOM rect.
pub fn client_to_container_point(client_x: f64, client_y: f64, container_id: &str) -> Option<Point> {
    let rect = container_rect(container_id)?;
    Some(client_to_container(client_x, client_y, rect.left(), rect.top()))
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
pub fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Split accumulated wheel movement into whole zoom steps and the leftover.
///
/// Scrolling up (negative delta) zooms in, so the step sign is flipped.
pub fn wheel_zoom_steps(accumulated: f64) -> (i32, f64) {
    let steps = (accumulated / WHEEL_PX_PER_ZOOM).trunc();
    (-(steps as i32), accumulated - steps * WHEEL_PX_PER_ZOOM)
}

/// Offset that places the map pane (laid out in world pixels minus
/// `pixel_origin`) under the container.
pub fn pane_offset(viewport: &Viewport, pixel_origin: Point) -> Point {
    pixel_origin.subtract(viewport.top_left())
}

/// Convert a container point to map-pane coordinates.
pub fn container_to_pane(point: Point, viewport: &Viewport, pixel_origin: Point) -> Point {
    point.subtract(pane_offset(viewport, pixel_origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quake_shared::geo::LatLng;
    use quake_shared::projection::project;

    #[test]
    fn test_client_to_container_origin() {
        let p = client_to_container(100.0, 200.0, 100.0, 200.0);
        assert!((p.x - 0.0).abs() < 1e-9);
        assert!((p.y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_client_to_container_offset() {
        let p = client_to_container(450.0, 350.0, 320.0, 50.0);
        assert!((p.x - 130.0).abs() < 1e-9);
        assert!((p.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_zoom_steps_below_threshold() {
        let (steps, rest) = wheel_zoom_steps(-30.0);
        assert_eq!(steps, 0);
        assert!((rest + 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_zoom_steps_scroll_up_zooms_in() {
        let (steps, rest) = wheel_zoom_steps(-130.0);
        assert_eq!(steps, 2);
        assert!((rest + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_zoom_steps_scroll_down_zooms_out() {
        let (steps, rest) = wheel_zoom_steps(100.0);
        assert_eq!(steps, -1);
        assert!((rest - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_pane_offset_when_origin_is_center() {
        let vp = Viewport::new(LatLng::new(37.09, -95.71), 4, Point::new(800.0, 600.0));
        let origin = project(vp.center, vp.zoom);
        let offset = pane_offset(&vp, origin);
        assert!((offset.x - 400.0).abs() < 1e-6);
        assert!((offset.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_container_to_pane_matches_projection() {
        let vp = Viewport::new(LatLng::new(10.0, 10.0), 5, Point::new(640.0, 480.0));
        let origin = project(vp.center, vp.zoom).round();
        let target = LatLng::new(11.0, 12.0);
        let container = vp.latlng_to_container(target);
        let pane = container_to_pane(container, &vp, origin);
        let expected = project(target, vp.zoom).subtract(origin);
        assert!((pane.x - expected.x).abs() < 1e-6);
        assert!((pane.y - expected.y).abs() < 1e-6);
    }
}

/// Spherical Web Mercator projection and slippy-map tile coverage.
///
/// World pixel space at zoom `z` is a `256 * 2^z` square with the origin at
/// the north-west corner (lng -180, lat ~85.05).
use crate::geo::{LatLng, Point};

pub const TILE_SIZE: f64 = 256.0;

/// Latitude where the Mercator square ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Side length of the world in pixels at `zoom`.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * 2f64.powi(zoom as i32)
}

/// Project a geographic position to world pixels at `zoom`.
pub fn project(latlng: LatLng, zoom: u8) -> Point {
    let size = world_size(zoom);
    let lat = latlng.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = size * (latlng.lng + 180.0) / 360.0;
    let sin = lat.sin();
    let y = size * (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * std::f64::consts::PI));
    Point::new(x, y)
}

/// Inverse of [`project`].
pub fn unproject(point: Point, zoom: u8) -> LatLng {
    let size = world_size(zoom);
    let lng = point.x / size * 360.0 - 180.0;
    let n = std::f64::consts::PI - 2.0 * std::f64::consts::PI * point.y / size;
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// What the map container currently shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
    /// Container size in CSS pixels.
    pub size: Point,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: u8, size: Point) -> Self {
        Self {
            center: clamp_center(center),
            zoom,
            size,
        }
    }

    /// World pixel under the container's top-left corner.
    pub fn top_left(&self) -> Point {
        project(self.center, self.zoom).subtract(self.size.scale(0.5))
    }

    /// Container point (relative to the container's top-left) of a position.
    pub fn latlng_to_container(&self, latlng: LatLng) -> Point {
        project(latlng, self.zoom).subtract(self.top_left())
    }

    /// Geographic position under a container point.
    pub fn container_to_latlng(&self, point: Point) -> LatLng {
        unproject(self.top_left().add(point), self.zoom)
    }

    /// Center after dragging the content by `delta` screen pixels.
    pub fn panned_by(&self, delta: Point) -> LatLng {
        let center_px = project(self.center, self.zoom).subtract(delta);
        clamp_center(unproject(center_px, self.zoom))
    }

    /// Center to use at `new_zoom` so the position under `anchor` (a
    /// container point) stays put.
    pub fn center_for_zoom_around(&self, anchor: Point, new_zoom: u8) -> LatLng {
        let scale = 2f64.powi(new_zoom as i32 - self.zoom as i32);
        let half = self.size.scale(0.5);
        let offset = anchor.subtract(half).scale(1.0 - 1.0 / scale);
        clamp_center(self.container_to_latlng(half.add(offset)))
    }

    /// Tiles needed to cover the container, row by row.
    pub fn visible_tiles(&self) -> Vec<TileRef> {
        let top_left = self.top_left();
        let bottom_right = top_left.add(self.size);
        let min_x = (top_left.x / TILE_SIZE).floor() as i64;
        let max_x = (bottom_right.x / TILE_SIZE).floor() as i64;
        let min_y = (top_left.y / TILE_SIZE).floor() as i64;
        let max_y = (bottom_right.y / TILE_SIZE).floor() as i64;
        let per_axis = 1i64 << self.zoom;

        let mut tiles = Vec::new();
        for y in min_y.max(0)..=max_y.min(per_axis - 1) {
            for x in min_x..=max_x {
                tiles.push(TileRef {
                    x,
                    y,
                    z: self.zoom,
                    wrapped_x: x.rem_euclid(per_axis),
                });
            }
        }
        tiles
    }
}

/// Keep the center's latitude inside the Mercator square.
pub fn clamp_center(center: LatLng) -> LatLng {
    LatLng::new(center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), center.lng)
}

/// A tile placed in world pixel space.
///
/// `x` is the unwrapped column (used for placement); `wrapped_x` is the column
/// to request from the tile server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRef {
    pub x: i64,
    pub y: i64,
    pub z: u8,
    pub wrapped_x: i64,
}

impl TileRef {
    /// World pixel of the tile's top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x as f64 * TILE_SIZE, self.y as f64 * TILE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_project_null_island_is_world_center() {
        let p = project(LatLng::new(0.0, 0.0), 0);
        assert!(close(p.x, 128.0, 1e-9));
        assert!(close(p.y, 128.0, 1e-9));
    }

    #[test]
    fn test_project_corners() {
        let nw = project(LatLng::new(MAX_LATITUDE, -180.0), 1);
        assert!(close(nw.x, 0.0, 1e-6));
        assert!(close(nw.y, 0.0, 1e-3));
        let se = project(LatLng::new(-MAX_LATITUDE, 180.0), 1);
        assert!(close(se.x, 512.0, 1e-6));
        assert!(close(se.y, 512.0, 1e-3));
    }

    #[test]
    fn test_project_clamps_poles() {
        let p = project(LatLng::new(90.0, 0.0), 2);
        assert!(p.y.is_finite());
        assert!(close(p.y, 0.0, 1e-3));
    }

    #[test]
    fn test_project_unproject_roundtrip() {
        let original = LatLng::new(37.09, -95.71);
        for zoom in [0, 4, 12, 20] {
            let back = unproject(project(original, zoom), zoom);
            assert!(close(back.lat, original.lat, 1e-9), "zoom {zoom}");
            assert!(close(back.lng, original.lng, 1e-9), "zoom {zoom}");
        }
    }

    #[test]
    fn test_container_center_maps_to_center() {
        let vp = Viewport::new(LatLng::new(37.09, -95.71), 4, Point::new(800.0, 600.0));
        let p = vp.latlng_to_container(vp.center);
        assert!(close(p.x, 400.0, 1e-6));
        assert!(close(p.y, 300.0, 1e-6));
        let ll = vp.container_to_latlng(Point::new(400.0, 300.0));
        assert!(close(ll.lat, 37.09, 1e-9));
    }

    #[test]
    fn test_pan_moves_center_opposite_to_drag() {
        let vp = Viewport::new(LatLng::new(0.0, 0.0), 3, Point::new(800.0, 600.0));
        // Dragging content to the right reveals what lies to the west
        let center = vp.panned_by(Point::new(100.0, 0.0));
        assert!(center.lng < 0.0);
        assert!(close(center.lat, 0.0, 1e-9));
        // Dragging content down reveals what lies to the north
        let center = vp.panned_by(Point::new(0.0, 100.0));
        assert!(center.lat > 0.0);
    }

    #[test]
    fn test_pan_never_leaves_mercator_square() {
        let vp = Viewport::new(LatLng::new(80.0, 0.0), 2, Point::new(800.0, 600.0));
        let center = vp.panned_by(Point::new(0.0, 10_000.0));
        assert!(center.lat <= MAX_LATITUDE);
    }

    #[test]
    fn test_zoom_around_keeps_anchor_fixed() {
        let vp = Viewport::new(LatLng::new(37.09, -95.71), 4, Point::new(800.0, 600.0));
        let anchor = Point::new(650.0, 120.0);
        let under_cursor = vp.container_to_latlng(anchor);

        let zoomed = Viewport::new(vp.center_for_zoom_around(anchor, 5), 5, vp.size);
        let p = zoomed.latlng_to_container(under_cursor);
        assert!(close(p.x, anchor.x, 1e-6));
        assert!(close(p.y, anchor.y, 1e-6));

        let zoomed_out = Viewport::new(vp.center_for_zoom_around(anchor, 3), 3, vp.size);
        let p = zoomed_out.latlng_to_container(under_cursor);
        assert!(close(p.x, anchor.x, 1e-6));
        assert!(close(p.y, anchor.y, 1e-6));
    }

    #[test]
    fn test_zoom_around_center_keeps_center() {
        let vp = Viewport::new(LatLng::new(10.0, 20.0), 6, Point::new(640.0, 480.0));
        let center = vp.center_for_zoom_around(Point::new(320.0, 240.0), 7);
        assert!(close(center.lat, 10.0, 1e-9));
        assert!(close(center.lng, 20.0, 1e-9));
    }

    #[test]
    fn test_visible_tiles_cover_container() {
        let vp = Viewport::new(LatLng::new(0.0, 0.0), 2, Point::new(512.0, 512.0));
        // World is 1024px; the container covers pixels 256..768 on both axes
        let tiles = vp.visible_tiles();
        let xs: Vec<i64> = tiles.iter().map(|t| t.x).collect();
        assert_eq!(tiles.len(), 9);
        assert_eq!(*xs.iter().min().unwrap(), 1);
        assert_eq!(*xs.iter().max().unwrap(), 3);
        assert!(tiles.iter().all(|t| t.z == 2));
    }

    #[test]
    fn test_visible_tiles_wrap_columns_and_drop_rows() {
        // Zoom 0: one tile; a wide container sees neighbouring world copies
        let vp = Viewport::new(LatLng::new(0.0, 0.0), 0, Point::new(1000.0, 1000.0));
        let tiles = vp.visible_tiles();
        assert!(tiles.iter().all(|t| t.y == 0));
        assert!(tiles.iter().all(|t| t.wrapped_x == 0));
        assert!(tiles.iter().any(|t| t.x < 0));
        assert!(tiles.iter().any(|t| t.x > 0));
    }

    #[test]
    fn test_wrapped_x_is_in_range() {
        let vp = Viewport::new(LatLng::new(0.0, 179.0), 3, Point::new(1200.0, 300.0));
        for t in vp.visible_tiles() {
            assert!((0..8).contains(&t.wrapped_x), "tile {:?}", t);
        }
    }

    #[test]
    fn test_tile_origin() {
        let t = TileRef { x: -1, y: 2, z: 3, wrapped_x: 7 };
        assert_eq!(t.origin(), Point::new(-256.0, 512.0));
    }
}

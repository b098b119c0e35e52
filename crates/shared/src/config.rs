use crate::basemap::{TileLayer, BASE_LAYERS};
use crate::geo::LatLng;

pub const EARTHQUAKE_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

pub const PLATE_BOUNDARY_FEED_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_plates.json";

/// Page configuration. Everything is fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    pub center: LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
    pub earthquake_feed_url: &'static str,
    pub plate_feed_url: &'static str,
    pub base_layers: &'static [TileLayer],
    /// Index into `base_layers` shown on load.
    pub default_base_layer: usize,
    pub show_earthquakes: bool,
    pub show_plates: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(37.09, -95.71),
            zoom: 4,
            min_zoom: 0,
            earthquake_feed_url: EARTHQUAKE_FEED_URL,
            plate_feed_url: PLATE_BOUNDARY_FEED_URL,
            base_layers: &BASE_LAYERS,
            default_base_layer: 2,
            show_earthquakes: true,
            show_plates: false,
        }
    }
}

impl MapConfig {
    /// Base layer at `index`, falling back to the default one.
    pub fn base_layer(&self, index: usize) -> TileLayer {
        self.base_layers
            .get(index)
            .or_else(|| self.base_layers.get(self.default_base_layer))
            .copied()
            .unwrap_or(BASE_LAYERS[BASE_LAYERS.len() - 1])
    }

    /// Clamp a zoom level to what the given base layer can serve.
    pub fn clamp_zoom(&self, zoom: i32, base_layer: usize) -> u8 {
        let max = self.base_layer(base_layer).max_zoom;
        zoom.clamp(self.min_zoom as i32, max as i32) as u8
    }
}

use crate::projection::TileRef;

/// A raster base layer served as `{z}/{x}/{y}` tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileLayer {
    pub name: &'static str,
    /// URL with `{s}`, `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: &'static str,
    pub subdomains: &'static [&'static str],
    pub max_zoom: u8,
    pub attribution: &'static str,
}

const ABC: &[&str] = &["a", "b", "c"];

pub const SATELLITE: TileLayer = TileLayer {
    name: "Satellite",
    url_template: "http://{s}.google.com/vt/lyrs=s&x={x}&y={y}&z={z}",
    subdomains: &["mt0", "mt1", "mt2", "mt3"],
    max_zoom: 20,
    attribution: "",
};

pub const GREYSCALE: TileLayer = TileLayer {
    name: "Greyscale",
    url_template: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
    subdomains: ABC,
    max_zoom: 18,
    attribution: "Map data \u{a9} OpenStreetMap contributors, SRTM | Style: OpenTopoMap",
};

pub const OUTDOORS: TileLayer = TileLayer {
    name: "Outdoors",
    url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    subdomains: ABC,
    max_zoom: 18,
    attribution: "\u{a9} OpenStreetMap contributors",
};

/// Base layers in the order the layer control lists them.
pub const BASE_LAYERS: [TileLayer; 3] = [SATELLITE, GREYSCALE, OUTDOORS];

impl TileLayer {
    /// Subdomain for a tile, spreading requests by `|x + y|`.
    pub fn subdomain(&self, x: i64, y: i64) -> &'static str {
        if self.subdomains.is_empty() {
            return "";
        }
        let idx = (x + y).unsigned_abs() as usize % self.subdomains.len();
        self.subdomains[idx]
    }

    /// Fill the URL template for a tile.
    pub fn tile_url(&self, tile: &TileRef) -> String {
        self.url_template
            .replace("{s}", self.subdomain(tile.wrapped_x, tile.y))
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.wrapped_x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

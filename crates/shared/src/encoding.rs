//! Visual encoding of earthquake attributes.
//!
//! Magnitude drives the marker radius, depth drives the fill color. Both
//! functions are total: malformed input falls back to the smallest marker or
//! the deepest color bucket instead of failing.

/// Pixels of marker radius per unit of magnitude.
pub const RADIUS_PER_MAGNITUDE: f64 = 4.0;

/// Radius used for zero, negative, missing or non-finite magnitudes.
pub const FALLBACK_RADIUS: f64 = 1.0;

/// One row of the depth-to-color table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBucket {
    /// Inclusive upper bound in km. `None` is the open-ended last bucket.
    pub upper_km: Option<f64>,
    pub color: &'static str,
}

/// Depth buckets in ascending order. The first bucket whose bound is
/// satisfied wins.
pub const DEPTH_BUCKETS: [DepthBucket; 6] = [
    DepthBucket { upper_km: Some(10.0), color: "#98ee00" },
    DepthBucket { upper_km: Some(30.0), color: "#d4ee00" },
    DepthBucket { upper_km: Some(50.0), color: "#eecc00" },
    DepthBucket { upper_km: Some(70.0), color: "#ee9c00" },
    DepthBucket { upper_km: Some(90.0), color: "#ea822c" },
    DepthBucket { upper_km: None, color: "#ea2c2c" },
];

/// Lower bounds shown by the legend, one per bucket.
const LEGEND_LOWER_KM: [i32; 6] = [-10, 10, 30, 50, 70, 90];

/// Marker radius in screen pixels for a magnitude.
pub fn marker_radius(magnitude: f64) -> f64 {
    if magnitude.is_finite() && magnitude > 0.0 {
        magnitude * RADIUS_PER_MAGNITUDE
    } else {
        FALLBACK_RADIUS
    }
}

/// Marker radius for a possibly missing magnitude. Missing counts as zero.
pub fn marker_radius_for(magnitude: Option<f64>) -> f64 {
    marker_radius(magnitude.unwrap_or(0.0))
}

/// Fill color for a depth in km.
///
/// NaN compares false against every bound and so lands in the last bucket,
/// the same place as any depth beyond 90 km.
pub fn depth_color(depth_km: f64) -> &'static str {
    DEPTH_BUCKETS
        .iter()
        .find(|bucket| match bucket.upper_km {
            Some(upper) => depth_km <= upper,
            None => true,
        })
        .map(|bucket| bucket.color)
        .unwrap_or(DEPTH_BUCKETS[DEPTH_BUCKETS.len() - 1].color)
}

/// Fill color for a possibly missing depth.
pub fn depth_color_for(depth_km: Option<f64>) -> &'static str {
    depth_color(depth_km.unwrap_or(f64::NAN))
}

// ---------------------------------------------------------------------------
// Styles
// ---------------------------------------------------------------------------

/// Style of a single earthquake circle marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: &'static str,
    pub stroke_color: &'static str,
    pub stroke_width: f64,
    pub stroke_opacity: f64,
    pub fill_opacity: f64,
}

/// Style of a line or polygon outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
}

pub const PLATE_STYLE: PathStyle = PathStyle {
    color: "#ff7800",
    weight: 2.0,
    opacity: 1.0,
};

/// Full marker style for an event.
pub fn quake_marker_style(magnitude: Option<f64>, depth_km: Option<f64>) -> MarkerStyle {
    MarkerStyle {
        radius: marker_radius_for(magnitude),
        fill_color: depth_color_for(depth_km),
        stroke_color: "#000",
        stroke_width: 0.5,
        stroke_opacity: 1.0,
        fill_opacity: 0.7,
    }
}

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: &'static str,
}

/// Legend rows in bucket order: `-10–10`, `10–30`, ... `90+`.
pub fn legend_entries() -> Vec<LegendEntry> {
    DEPTH_BUCKETS
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            let lower = LEGEND_LOWER_KM[i];
            let label = match LEGEND_LOWER_KM.get(i + 1) {
                Some(next) => format!("{}\u{2013}{}", lower, next),
                None => format!("{}+", lower),
            };
            LegendEntry {
                label,
                color: bucket.color,
            }
        })
        .collect()
}

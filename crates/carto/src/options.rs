//! Map-wide settings: initial view and base tiles.

use foundation::bounds::LatLng;
use layers::host::TileLayerSpec;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TILE_URL: &str = "http://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a>- Beta Gouv.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// `[lat, lng]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub subdomains: Vec<String>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: [46.6, 1.9],
            zoom: 6,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        }
    }
}

impl MapOptions {
    pub fn center(&self) -> LatLng {
        LatLng::new(self.center[0], self.center[1])
    }

    pub fn tiles(&self) -> TileLayerSpec {
        TileLayerSpec {
            url_template: self.tile_url.clone(),
            attribution: self.attribution.clone(),
            subdomains: self.subdomains.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let opts: MapOptions =
            serde_json::from_str(r#"{"center": [44.84, -0.58], "zoom": 12}"#).expect("options");
        assert_eq!(opts.center(), LatLng::new(44.84, -0.58));
        assert_eq!(opts.zoom, 12);
        assert_eq!(opts.tiles().url_template, DEFAULT_TILE_URL);
        assert_eq!(opts.tiles().subdomains, vec!["a", "b", "c"]);
    }
}

//! Seam between layer logic and the mapping library that draws it.
//!
//! Everything pixel-related (tiles, panes, vector rasterization, DOM) lives
//! behind [`MapHost`]. [`RecordingHost`] keeps what it was asked to do in
//! memory; it backs the headless viewer and the tests.

use std::collections::BTreeMap;

use formats::Feature;
use foundation::bounds::{LatLng, LatLngBounds};
use foundation::ids::LayerId;

use crate::symbology::FeatureStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Whether hovered features can be raised above their siblings.
    pub bring_to_front: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            bring_to_front: true,
        }
    }
}

/// Base map tiles and their attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayerSpec {
    pub url_template: String,
    pub attribution: String,
    pub subdomains: Vec<String>,
}

pub trait MapHost {
    fn capabilities(&self) -> HostCapabilities {
        HostCapabilities::default()
    }

    fn set_view(&mut self, center: LatLng, zoom: u8);
    fn add_tile_layer(&mut self, tiles: &TileLayerSpec);
    fn create_pane(&mut self, name: &str, z_index: i32);

    /// Currently visible extent.
    fn viewport(&self) -> LatLngBounds;
    fn fit_bounds(&mut self, bounds: LatLngBounds);

    /// Attaches a switch fragment to the layer-list container.
    fn add_switch(&mut self, layer: LayerId, html: &str);
    fn set_loading(&mut self, layer: LayerId, visible: bool);

    fn clear_features(&mut self, layer: LayerId);
    fn add_feature(
        &mut self,
        layer: LayerId,
        pane: &str,
        index: usize,
        feature: &Feature,
        style: &FeatureStyle,
    );
    fn set_feature_style(&mut self, layer: LayerId, index: usize, style: &FeatureStyle);
    fn bring_to_front(&mut self, layer: LayerId, index: usize);
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeature {
    pub index: usize,
    pub pane: String,
    pub id: Option<String>,
    pub style: FeatureStyle,
}

/// In-memory [`MapHost`].
#[derive(Debug, Clone)]
pub struct RecordingHost {
    pub capabilities: HostCapabilities,
    pub viewport: LatLngBounds,
    pub view: Option<(LatLng, u8)>,
    pub tile_layers: Vec<TileLayerSpec>,
    pub panes: Vec<(String, i32)>,
    pub switches: BTreeMap<LayerId, String>,
    pub loading: BTreeMap<LayerId, bool>,
    pub features: BTreeMap<LayerId, Vec<RenderedFeature>>,
    pub fits: Vec<LatLngBounds>,
    pub raised: Vec<(LayerId, usize)>,
}

impl RecordingHost {
    pub fn new(viewport: LatLngBounds) -> Self {
        Self {
            capabilities: HostCapabilities::default(),
            viewport,
            view: None,
            tile_layers: Vec::new(),
            panes: Vec::new(),
            switches: BTreeMap::new(),
            loading: BTreeMap::new(),
            features: BTreeMap::new(),
            fits: Vec::new(),
            raised: Vec::new(),
        }
    }

    pub fn rendered(&self, layer: LayerId) -> &[RenderedFeature] {
        self.features.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_loading(&self, layer: LayerId) -> bool {
        self.loading.get(&layer).copied().unwrap_or(false)
    }

    /// Moves the viewport, as a pan/zoom gesture would.
    pub fn pan_to(&mut self, viewport: LatLngBounds) {
        self.viewport = viewport;
    }
}

impl MapHost for RecordingHost {
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.view = Some((center, zoom));
    }

    fn add_tile_layer(&mut self, tiles: &TileLayerSpec) {
        self.tile_layers.push(tiles.clone());
    }

    fn create_pane(&mut self, name: &str, z_index: i32) {
        self.panes.push((name.to_string(), z_index));
    }

    fn viewport(&self) -> LatLngBounds {
        self.viewport
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        self.fits.push(bounds);
        self.viewport = bounds;
    }

    fn add_switch(&mut self, layer: LayerId, html: &str) {
        self.switches.insert(layer, html.to_string());
    }

    fn set_loading(&mut self, layer: LayerId, visible: bool) {
        self.loading.insert(layer, visible);
    }

    fn clear_features(&mut self, layer: LayerId) {
        self.features.remove(&layer);
    }

    fn add_feature(
        &mut self,
        layer: LayerId,
        pane: &str,
        index: usize,
        feature: &Feature,
        style: &FeatureStyle,
    ) {
        self.features.entry(layer).or_default().push(RenderedFeature {
            index,
            pane: pane.to_string(),
            id: feature.id.clone(),
            style: style.clone(),
        });
    }

    fn set_feature_style(&mut self, layer: LayerId, index: usize, style: &FeatureStyle) {
        let Some(rendered) = self.features.get_mut(&layer) else {
            return;
        };
        if let Some(f) = rendered.iter_mut().find(|f| f.index == index) {
            f.style = style.clone();
        }
    }

    fn bring_to_front(&mut self, layer: LayerId, index: usize) {
        self.raised.push((layer, index));
    }
}

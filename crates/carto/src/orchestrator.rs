//! Owns the map: its panes, its layers, and the fetches they issue.
//!
//! Layers are sans-IO; the orchestrator is the only place where requests turn
//! into futures. Fetches run concurrently in a [`FuturesUnordered`], and each
//! completed response is routed back to the layer that issued it.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use foundation::ids::LayerId;
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use layers::config::LayerConfiguration;
use layers::host::MapHost;
use layers::info::InfoPanel;
use layers::layer::GeoDataLayer;
use layers::switch::{SwitchError, SwitchSelector};
use serde_json::Value;
use streaming::{FetchRequest, GeoJsonSource, SourceError};
use tracing::{debug, info};

use crate::options::MapOptions;
use crate::panes::PaneRegistry;

type PendingFetch = Pin<Box<dyn Future<Output = (FetchRequest, Result<Value, SourceError>)>>>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    UnknownLayer(LayerId),
    Switch(SwitchError),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::UnknownLayer(id) => write!(f, "unknown layer: {id}"),
            MapError::Switch(e) => write!(f, "switch error: {e}"),
        }
    }
}

impl std::error::Error for MapError {}

impl From<SwitchError> for MapError {
    fn from(e: SwitchError) -> Self {
        MapError::Switch(e)
    }
}

pub struct MapOrchestrator<H: MapHost> {
    host: H,
    source: Arc<dyn GeoJsonSource>,
    options: MapOptions,
    panes: PaneRegistry,
    info: Rc<InfoPanel>,
    layers: Vec<GeoDataLayer>,
    in_flight: FuturesUnordered<PendingFetch>,
}

impl<H: MapHost> MapOrchestrator<H> {
    pub fn new(host: H, source: Arc<dyn GeoJsonSource>, options: MapOptions) -> Self {
        Self {
            host,
            source,
            options,
            panes: PaneRegistry::new(),
            info: Rc::new(InfoPanel::new()),
            layers: Vec::new(),
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Sets the initial view, creates panes and base tiles, then adds every
    /// layer in order.
    pub fn init(&mut self, layers: &[LayerConfiguration]) {
        self.host.set_view(self.options.center(), self.options.zoom);
        self.panes.register_all(&mut self.host);
        self.host.add_tile_layer(&self.options.tiles());
        info!("map initialised with {} layers", layers.len());

        for config in layers {
            self.add_layer(config);
        }
    }

    /// Adds one layer. Panes are created first if `init` has not run yet.
    pub fn add_layer(&mut self, config: &LayerConfiguration) -> LayerId {
        self.panes.register_all(&mut self.host);
        let id = LayerId(self.layers.len() as u32);
        let pane = self.panes.resolve(config.level);
        let mut layer = GeoDataLayer::new(id, config, pane, self.info.clone());

        self.host.add_switch(id, &layer.switch().to_html());
        let startup = layer.start(&mut self.host);
        debug!("added {} as {id} in {}", layer.name(), layer.pane());
        self.layers.push(layer);

        if let Some(req) = startup {
            self.dispatch(req);
        }
        id
    }

    /// Forwards a finished pan/zoom to every layer.
    pub fn on_viewport_changed(&mut self) {
        let mut requests = Vec::new();
        for layer in &mut self.layers {
            if let Some(req) = layer.on_viewport_changed(&mut self.host) {
                requests.push(req);
            }
        }
        for req in requests {
            self.dispatch(req);
        }
    }

    pub fn toggle_layer(&mut self, id: LayerId, checked: bool) -> Result<(), MapError> {
        let layer = self
            .layers
            .get_mut(id.index())
            .ok_or(MapError::UnknownLayer(id))?;
        if let Some(req) = layer.toggle(checked, &mut self.host) {
            self.dispatch(req);
        }
        Ok(())
    }

    pub fn select_switch_option(
        &mut self,
        id: LayerId,
        selector: SwitchSelector,
        value: &str,
    ) -> Result<(), MapError> {
        let layer = self
            .layers
            .get_mut(id.index())
            .ok_or(MapError::UnknownLayer(id))?;
        if let Some(req) = layer.select_switch_option(selector, value, &mut self.host)? {
            self.dispatch(req);
        }
        Ok(())
    }

    pub fn pointer_event(
        &mut self,
        id: LayerId,
        feature: usize,
        event: PointerEvent,
    ) -> Result<(), MapError> {
        let layer = self
            .layers
            .get_mut(id.index())
            .ok_or(MapError::UnknownLayer(id))?;
        match event {
            PointerEvent::Enter => layer.on_feature_enter(feature, &mut self.host),
            PointerEvent::Leave => layer.on_feature_leave(feature, &mut self.host),
        }
        Ok(())
    }

    fn dispatch(&mut self, req: FetchRequest) {
        let source = self.source.clone();
        self.in_flight.push(Box::pin(async move {
            let result = source.fetch_json(&req.url).await;
            (req, result)
        }));
    }

    /// Waits for one fetch and applies it. Returns the completed request, or
    /// `None` when nothing is in flight.
    pub async fn next_response(&mut self) -> Option<FetchRequest> {
        let (req, result) = self.in_flight.next().await?;
        let Some(layer) = self.layers.get_mut(req.layer.index()) else {
            return Some(req);
        };
        let follow_up = layer.complete(&req, result, &mut self.host);
        let recentered = layer.take_recentered();

        if let Some(next) = follow_up {
            self.dispatch(next);
        }
        // A fit moves the map like a user pan would.
        if recentered {
            debug!("map recentered on {}", req.layer);
            self.on_viewport_changed();
        }
        Some(req)
    }

    /// Drives fetches until none is left, including follow-ups issued along
    /// the way. Returns how many responses were applied.
    pub async fn settle(&mut self) -> usize {
        let mut applied = 0;
        while self.next_response().await.is_some() {
            applied += 1;
        }
        applied
    }

    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn panes(&self) -> &PaneRegistry {
        &self.panes
    }

    pub fn info(&self) -> &InfoPanel {
        &self.info
    }

    pub fn layers(&self) -> &[GeoDataLayer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&GeoDataLayer> {
        self.layers.get(id.index())
    }
}

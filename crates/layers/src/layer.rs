//! Life cycle of one GeoJSON layer.
//!
//! [`GeoDataLayer`] is sans-IO: every operation that needs the network returns
//! a [`FetchRequest`], and the caller feeds the response back through
//! [`GeoDataLayer::complete`]. Responses are fenced by generation, so only the
//! most recent request of a still-displayed layer is ever applied.
//!
//! ```text
//! Inactive --activate--> Loading --complete(ok)--> Active
//!     ^                     |                        |
//!     +------deactivate-----+-------deactivate-------+
//! ```

use std::rc::Rc;

use formats::{ColorScale, Feature, FeatureCollection};
use foundation::ids::LayerId;
use serde_json::Value;
use streaming::{FetchFence, FetchKind, FetchRequest, SourceError};
use tracing::{debug, info, warn};

use crate::config::LayerConfiguration;
use crate::fetch_policy::ViewportFetchPolicy;
use crate::host::MapHost;
use crate::info::{InfoPanel, info_html, legend_html};
use crate::switch::{LayerSwitch, SwitchAction, SwitchError, SwitchSelector};
use crate::symbology::{ColorResolver, FeatureStyle, StyleKind, StyleOverride, feature_style};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayerPhase {
    /// Nothing rendered.
    Inactive,
    /// Displayed, waiting for its scale or data.
    Loading,
    /// Displayed with data rendered.
    Active,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ScaleStatus {
    /// Static scale, or no scale at all.
    Ready,
    /// Remote scale not requested yet, or last request failed.
    Unresolved,
    Fetching { generation: u64 },
}

#[derive(Debug)]
pub struct GeoDataLayer {
    id: LayerId,
    name: String,
    url: String,
    color_property: Option<String>,
    policy: ViewportFetchPolicy,
    style: StyleKind,
    pane: String,
    switch: LayerSwitch,

    displayed: bool,
    phase: LayerPhase,
    /// One-shot: recenter the map on the first data that has bounds.
    fit_map: bool,
    /// Set when the last applied response moved the map.
    recentered: bool,

    scale: Option<ColorScale>,
    scale_url: Option<String>,
    scale_status: ScaleStatus,
    scale_fence: FetchFence,

    data: Option<FeatureCollection>,
    data_fence: FetchFence,
    hovered: Option<usize>,

    info: Rc<InfoPanel>,
}

impl GeoDataLayer {
    /// `pane` must already be resolved against the map's registered panes.
    pub fn new(
        id: LayerId,
        config: &LayerConfiguration,
        pane: String,
        info: Rc<InfoPanel>,
    ) -> Self {
        let (scale, scale_status) = match &config.gradient_url {
            Some(_) => (None, ScaleStatus::Unresolved),
            None => (config.scale.clone(), ScaleStatus::Ready),
        };
        let style = if config.use_emprise_style {
            StyleKind::Emprise
        } else {
            StyleKind::Scaled
        };

        Self {
            id,
            name: config.name.clone(),
            url: config.url.clone(),
            color_property: config.color_property_name.clone(),
            policy: ViewportFetchPolicy::new(config.load_full_data),
            style,
            pane,
            switch: LayerSwitch::new(config.name.clone(), config.display, config.switch.into()),
            displayed: config.display,
            phase: LayerPhase::Inactive,
            fit_map: config.fit_map,
            recentered: false,
            scale,
            scale_url: config.gradient_url.clone(),
            scale_status,
            scale_fence: FetchFence::new(),
            data: None,
            data_fence: FetchFence::new(),
            hovered: None,
            info,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pane(&self) -> &str {
        &self.pane
    }

    pub fn phase(&self) -> LayerPhase {
        self.phase
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    pub fn policy(&self) -> ViewportFetchPolicy {
        self.policy
    }

    pub fn switch(&self) -> &LayerSwitch {
        &self.switch
    }

    pub fn data(&self) -> Option<&FeatureCollection> {
        self.data.as_ref()
    }

    pub fn scale(&self) -> Option<&ColorScale> {
        self.scale.as_ref()
    }

    /// Whether rendering is blocked on a remote scale.
    pub fn awaiting_scale(&self) -> bool {
        self.scale_status != ScaleStatus::Ready
    }

    pub fn fit_pending(&self) -> bool {
        self.fit_map
    }

    /// Whether the map was recentered on this layer's data since the last
    /// call. The caller owes every viewport-scoped layer a refresh.
    pub fn take_recentered(&mut self) -> bool {
        std::mem::take(&mut self.recentered)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// First request after the layer is added to a map: the remote scale if
    /// one is configured (whether displayed or not), else the initial data.
    pub fn start(&mut self, host: &mut dyn MapHost) -> Option<FetchRequest> {
        if self.scale_status == ScaleStatus::Unresolved {
            return Some(self.request_scale());
        }
        self.refresh(host)
    }

    pub fn activate(&mut self, host: &mut dyn MapHost) -> Option<FetchRequest> {
        if self.displayed {
            return None;
        }
        self.displayed = true;
        self.switch.set_checked(true);
        self.refresh(host)
    }

    /// Hides the layer. Cached scale survives; data does not.
    pub fn deactivate(&mut self, host: &mut dyn MapHost) {
        self.displayed = false;
        self.switch.set_checked(false);
        // Invalidate whatever data fetch is still in flight.
        self.data_fence.advance();
        self.data = None;
        self.hovered = None;
        self.phase = LayerPhase::Inactive;
        host.clear_features(self.id);
        host.set_loading(self.id, false);
    }

    pub fn refresh(&mut self, host: &mut dyn MapHost) -> Option<FetchRequest> {
        if !self.displayed {
            return None;
        }

        if self.phase != LayerPhase::Active {
            self.phase = LayerPhase::Loading;
        }
        host.set_loading(self.id, true);

        match self.scale_status {
            ScaleStatus::Ready => {}
            ScaleStatus::Unresolved => return Some(self.request_scale()),
            ScaleStatus::Fetching { .. } => {
                debug!("{}: refresh deferred until scale arrives", self.name);
                return None;
            }
        }

        let generation = self.data_fence.advance();
        let url = self.request_url(host);
        debug!("{}: refresh #{generation} {url}", self.name);
        Some(FetchRequest {
            layer: self.id,
            kind: FetchKind::Data,
            generation,
            url,
        })
    }

    pub fn on_viewport_changed(&mut self, host: &mut dyn MapHost) -> Option<FetchRequest> {
        if !self.policy.is_viewport_scoped() {
            return None;
        }
        self.refresh(host)
    }

    pub fn toggle(&mut self, checked: bool, host: &mut dyn MapHost) -> Option<FetchRequest> {
        match self.switch.toggle(checked) {
            SwitchAction::Activate => self.activate(host),
            SwitchAction::Deactivate => {
                self.deactivate(host);
                None
            }
        }
    }

    /// Changes a parametrized-switch selector; a displayed layer refetches
    /// with the new selection.
    pub fn select_switch_option(
        &mut self,
        selector: SwitchSelector,
        value: &str,
        host: &mut dyn MapHost,
    ) -> Result<Option<FetchRequest>, SwitchError> {
        self.switch.select(selector, value)?;
        Ok(self.refresh(host))
    }

    /// URL of the next data request: switch parameters first, then the bbox.
    pub fn request_url(&self, host: &dyn MapHost) -> String {
        let base = self.switch.request_base_url(&self.url);
        self.policy.build_request_url(&base, &host.viewport())
    }

    /// Applies the response of a request this layer issued earlier. May
    /// return a follow-up request (data after the scale arrived).
    pub fn complete(
        &mut self,
        request: &FetchRequest,
        result: Result<Value, SourceError>,
        host: &mut dyn MapHost,
    ) -> Option<FetchRequest> {
        if request.layer != self.id {
            warn!("{}: ignoring response addressed to {}", self.name, request.layer);
            return None;
        }
        match request.kind {
            FetchKind::Scale => self.complete_scale(request.generation, result, host),
            FetchKind::Data => {
                self.complete_data(request.generation, result, host);
                None
            }
        }
    }

    fn request_scale(&mut self) -> FetchRequest {
        let generation = self.scale_fence.advance();
        self.scale_status = ScaleStatus::Fetching { generation };
        FetchRequest {
            layer: self.id,
            kind: FetchKind::Scale,
            generation,
            url: self.scale_url.clone().unwrap_or_default(),
        }
    }

    fn complete_scale(
        &mut self,
        generation: u64,
        result: Result<Value, SourceError>,
        host: &mut dyn MapHost,
    ) -> Option<FetchRequest> {
        if self.scale_status != (ScaleStatus::Fetching { generation }) {
            debug!("{}: discarding stale scale response", self.name);
            return None;
        }

        let decoded = match result {
            Ok(body) => ColorScale::from_json_value(body).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match decoded {
            Ok(scale) => {
                info!("{}: scale resolved with {} bands", self.name, scale.bands().len());
                self.scale = Some(scale);
                self.scale_status = ScaleStatus::Ready;
                self.refresh(host)
            }
            Err(msg) => {
                warn!("{}: scale fetch failed: {msg}", self.name);
                self.scale_status = ScaleStatus::Unresolved;
                if self.displayed {
                    host.set_loading(self.id, false);
                    self.phase = self.settled_phase();
                }
                None
            }
        }
    }

    fn complete_data(
        &mut self,
        generation: u64,
        result: Result<Value, SourceError>,
        host: &mut dyn MapHost,
    ) {
        if !self.displayed || !self.data_fence.is_current(generation) {
            debug!("{}: discarding stale response #{generation}", self.name);
            return;
        }

        let decoded = match result {
            Ok(body) => FeatureCollection::from_geojson_value(&body).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match decoded {
            Ok(collection) => self.render(collection, host),
            Err(msg) => {
                warn!("{}: refresh #{generation} failed: {msg}", self.name);
                host.set_loading(self.id, false);
                self.phase = self.settled_phase();
            }
        }
    }

    /// Replaces the rendered features wholesale.
    fn render(&mut self, collection: FeatureCollection, host: &mut dyn MapHost) {
        host.clear_features(self.id);
        self.hovered = None;

        for (index, feature) in collection.features.iter().enumerate() {
            let style = self.feature_style(feature);
            host.add_feature(self.id, &self.pane, index, feature, &style);
        }

        if self.fit_map
            && let Some(bounds) = collection.bounds()
        {
            self.fit_map = false;
            self.recentered = true;
            host.fit_bounds(bounds);
        }

        debug!("{}: rendered {} features", self.name, collection.len());
        self.data = Some(collection);
        host.set_loading(self.id, false);
        self.phase = LayerPhase::Active;
    }

    fn settled_phase(&self) -> LayerPhase {
        if self.data.is_some() {
            LayerPhase::Active
        } else {
            LayerPhase::Inactive
        }
    }

    fn resolver(&self) -> ColorResolver<'_> {
        ColorResolver::new(self.color_property.as_deref(), self.scale.as_ref())
    }

    pub fn resolve_color(&self, feature: &Feature) -> String {
        self.resolver().resolve_color(feature)
    }

    pub fn feature_style(&self, feature: &Feature) -> FeatureStyle {
        feature_style(self.style, &self.resolver(), feature)
    }

    pub fn legend_for(&self, feature: &Feature) -> Option<String> {
        let resolver = self.resolver();
        legend_html(
            &self.name,
            self.color_property.as_deref(),
            resolver.property_value(feature),
            resolver.reading(feature),
            self.scale.as_ref(),
        )
    }

    /// Pointer entered a rendered feature: highlight it and publish its info.
    pub fn on_feature_enter(&mut self, index: usize, host: &mut dyn MapHost) {
        let Some(feature) = self.data.as_ref().and_then(|d| d.features.get(index)) else {
            return;
        };

        let style = self
            .feature_style(feature)
            .with_override(&StyleOverride::highlight());
        host.set_feature_style(self.id, index, &style);
        if host.capabilities().bring_to_front {
            host.bring_to_front(self.id, index);
        }

        self.info.update_info(info_html(&self.name, &feature.properties));
        self.info.update_legend(self.legend_for(feature));
        self.hovered = Some(index);
    }

    /// Pointer left a feature: restore its computed style and empty the info.
    pub fn on_feature_leave(&mut self, index: usize, host: &mut dyn MapHost) {
        let Some(feature) = self.data.as_ref().and_then(|d| d.features.get(index)) else {
            return;
        };
        let style = self.feature_style(feature);
        host.set_feature_style(self.id, index, &style);
        self.info.update_info("");
        if self.hovered == Some(index) {
            self.hovered = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SwitchKind;
    use crate::host::{HostCapabilities, RecordingHost};
    use crate::symbology::FALLBACK_COLOR;
    use foundation::bounds::{LatLng, LatLngBounds};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn view() -> LatLngBounds {
        LatLngBounds::new(LatLng::new(44.0, -1.0), LatLng::new(45.0, 0.0))
    }

    fn host() -> RecordingHost {
        RecordingHost::new(view())
    }

    fn parcels_config() -> LayerConfiguration {
        LayerConfiguration::new("parcels", "/api/parcels")
    }

    fn layer(config: &LayerConfiguration) -> (GeoDataLayer, Rc<InfoPanel>) {
        let info = Rc::new(InfoPanel::new());
        (
            GeoDataLayer::new(LayerId(0), config, "level_5".to_string(), info.clone()),
            info,
        )
    }

    fn collection(surfaces: &[f64]) -> Value {
        let features: Vec<Value> = surfaces
            .iter()
            .enumerate()
            .map(|(i, s)| {
                json!({
                    "type": "Feature",
                    "properties": {"surface": s},
                    "geometry": {"type": "Point", "coordinates": [i as f64, 40.0 + i as f64]}
                })
            })
            .collect();
        json!({"type": "FeatureCollection", "features": features})
    }

    fn gradient() -> Value {
        json!([
            {"value": 30, "color": "#A"},
            {"value": 70, "color": "#B"},
            {"value": 100, "color": "#C"}
        ])
    }

    #[test]
    fn activate_issues_bbox_request_once() {
        let (mut l, _) = layer(&parcels_config());
        let mut h = host();

        let req = l.activate(&mut h).expect("request");
        assert_eq!(req.kind, FetchKind::Data);
        assert_eq!(req.url, "/api/parcels?in_bbox=-1,44,0,45");
        assert_eq!(l.phase(), LayerPhase::Loading);
        assert!(h.is_loading(LayerId(0)));

        assert!(l.activate(&mut h).is_none());
    }

    #[test]
    fn hidden_layer_never_refreshes() {
        let (mut l, _) = layer(&parcels_config());
        let mut h = host();
        assert!(l.refresh(&mut h).is_none());
        assert!(l.on_viewport_changed(&mut h).is_none());
        assert!(l.start(&mut h).is_none());
    }

    #[test]
    fn response_replaces_rendering() {
        let (mut l, _) = layer(&parcels_config());
        let mut h = host();

        let req = l.activate(&mut h).expect("request");
        l.complete(&req, Ok(collection(&[10.0, 20.0, 30.0])), &mut h);
        assert_eq!(h.rendered(LayerId(0)).len(), 3);
        assert_eq!(l.phase(), LayerPhase::Active);
        assert!(!h.is_loading(LayerId(0)));

        let req = l.refresh(&mut h).expect("request");
        l.complete(&req, Ok(collection(&[5.0])), &mut h);
        assert_eq!(h.rendered(LayerId(0)).len(), 1);
        assert_eq!(l.data().map(|d| d.len()), Some(1));
    }

    #[test]
    fn deactivate_clears_data_but_keeps_scale() {
        let config = LayerConfiguration {
            gradient_url: Some("/api/gradient".to_string()),
            display: true,
            ..parcels_config()
        };
        let (mut l, _) = layer(&config);
        let mut h = host();

        let scale_req = l.start(&mut h).expect("scale request");
        let data_req = l.complete(&scale_req, Ok(gradient()), &mut h).expect("data request");
        l.complete(&data_req, Ok(collection(&[45.0])), &mut h);
        assert!(l.data().is_some());

        l.deactivate(&mut h);
        assert!(!l.is_displayed());
        assert!(l.data().is_none());
        assert!(l.scale().is_some());
        assert!(h.rendered(LayerId(0)).is_empty());
        assert_eq!(l.phase(), LayerPhase::Inactive);
        assert!(!l.switch().is_checked());

        // Reactivation goes straight to data: the scale is cached.
        let again = l.activate(&mut h).expect("request");
        assert_eq!(again.kind, FetchKind::Data);
        assert!(again.generation > data_req.generation);
    }

    #[test]
    fn superseded_response_is_discarded() {
        let (mut l, _) = layer(&parcels_config());
        let mut h = host();

        let first = l.activate(&mut h).expect("first");
        let second = l.refresh(&mut h).expect("second");

        l.complete(&first, Ok(collection(&[1.0, 2.0])), &mut h);
        assert!(h.rendered(LayerId(0)).is_empty());
        assert!(h.is_loading(LayerId(0)));

        l.complete(&second, Ok(collection(&[3.0])), &mut h);
        assert_eq!(h.rendered(LayerId(0)).len(), 1);
    }

    #[test]
    fn response_after_deactivate_is_discarded() {
        let (mut l, _) = layer(&parcels_config());
        let mut h = host();

        let req = l.activate(&mut h).expect("request");
        l.deactivate(&mut h);
        l.complete(&req, Ok(collection(&[1.0])), &mut h);
        assert!(h.rendered(LayerId(0)).is_empty());
        assert!(l.data().is_none());
    }

    #[test]
    fn fit_map_recenters_exactly_once() {
        let config = LayerConfiguration {
            fit_map: true,
            load_full_data: true,
            ..parcels_config()
        };
        let (mut l, _) = layer(&config);
        let mut h = host();

        // Empty data has no bounds and keeps the fit armed.
        let req = l.activate(&mut h).expect("request");
        l.complete(&req, Ok(collection(&[])), &mut h);
        assert!(h.fits.is_empty());
        assert!(l.fit_pending());
        assert!(!l.take_recentered());

        let mut recentered = Vec::new();
        for _ in 0..3 {
            let req = l.refresh(&mut h).expect("request");
            l.complete(&req, Ok(collection(&[1.0, 2.0])), &mut h);
            recentered.push(l.take_recentered());
        }
        assert_eq!(recentered, vec![true, false, false]);
        assert_eq!(h.fits.len(), 1);
        assert_eq!(h.fits[0].south_west(), LatLng::new(40.0, 0.0));
        assert!(!l.fit_pending());
    }

    #[test]
    fn remote_scale_blocks_rendering_until_resolved() {
        let config = LayerConfiguration {
            gradient_url: Some("/api/gradient".to_string()),
            ..parcels_config()
        };
        let (mut l, _) = layer(&config);
        let mut h = host();

        let scale_req = l.start(&mut h).expect("scale request");
        assert_eq!(scale_req.kind, FetchKind::Scale);
        assert_eq!(scale_req.url, "/api/gradient");

        // Activating while the scale is in flight defers the data request.
        assert!(l.activate(&mut h).is_none());
        assert!(l.awaiting_scale());
        assert!(h.rendered(LayerId(0)).is_empty());

        let data_req = l.complete(&scale_req, Ok(gradient()), &mut h).expect("data request");
        assert_eq!(data_req.kind, FetchKind::Data);
        l.complete(&data_req, Ok(collection(&[45.0, 150.0, 0.0])), &mut h);

        let colors: Vec<Option<String>> = h
            .rendered(LayerId(0))
            .iter()
            .map(|f| f.style.fill_color.clone())
            .collect();
        assert_eq!(
            colors,
            vec![Some("#B".to_string()), Some("#C".to_string()), Some("#A".to_string())]
        );
    }

    #[test]
    fn failed_scale_is_retried_on_next_activation() {
        let config = LayerConfiguration {
            gradient_url: Some("/api/gradient".to_string()),
            display: true,
            ..parcels_config()
        };
        let (mut l, _) = layer(&config);
        let mut h = host();

        let scale_req = l.start(&mut h).expect("scale request");
        let follow = l.complete(
            &scale_req,
            Err(SourceError::new("/api/gradient", "HTTP error: 500")),
            &mut h,
        );
        assert!(follow.is_none());
        assert!(l.awaiting_scale());
        assert!(!h.is_loading(LayerId(0)));

        l.deactivate(&mut h);
        let retry = l.activate(&mut h).expect("retry");
        assert_eq!(retry.kind, FetchKind::Scale);
        assert!(retry.generation > scale_req.generation);
    }

    #[test]
    fn failed_refresh_keeps_previous_rendering() {
        let (mut l, _) = layer(&parcels_config());
        let mut h = host();

        let req = l.activate(&mut h).expect("request");
        l.complete(&req, Ok(collection(&[1.0, 2.0])), &mut h);

        let req = l.refresh(&mut h).expect("request");
        l.complete(&req, Err(SourceError::new(&req.url, "HTTP error: 502")), &mut h);
        assert_eq!(h.rendered(LayerId(0)).len(), 2);
        assert!(!h.is_loading(LayerId(0)));
        assert_eq!(l.phase(), LayerPhase::Active);

        let req = l.refresh(&mut h).expect("request");
        l.complete(&req, Ok(json!({"type": "Feature"})), &mut h);
        assert_eq!(h.rendered(LayerId(0)).len(), 2);
    }

    #[test]
    fn viewport_change_only_refreshes_scoped_layers() {
        let (mut scoped, _) = layer(&parcels_config());
        let full_config = LayerConfiguration {
            load_full_data: true,
            ..parcels_config()
        };
        let (mut full, _) = layer(&full_config);
        let mut h = host();
        scoped.activate(&mut h);
        full.activate(&mut h);

        h.pan_to(LatLngBounds::new(LatLng::new(10.0, 20.0), LatLng::new(11.0, 21.0)));
        let req = scoped.on_viewport_changed(&mut h).expect("request");
        assert_eq!(req.url, "/api/parcels?in_bbox=20,10,21,11");
        assert!(full.on_viewport_changed(&mut h).is_none());
    }

    #[test]
    fn ocsge_selector_refetches_displayed_layer() {
        let config = LayerConfiguration {
            switch: SwitchKind::Ocsge,
            ..LayerConfiguration::new("ocsge", "/api/ocsge")
        };
        let (mut l, _) = layer(&config);
        let mut h = host();

        // Hidden: selection is remembered, nothing fetched.
        let none = l
            .select_switch_option(SwitchSelector::Year, "2018", &mut h)
            .expect("select");
        assert!(none.is_none());
        assert!(!l.switch().is_checked());

        let req = l.toggle(true, &mut h).expect("request");
        assert_eq!(req.url, "/api/ocsge?year=2018&color=usage&in_bbox=-1,44,0,45");

        let req = l
            .select_switch_option(SwitchSelector::Mode, "couverture", &mut h)
            .expect("select")
            .expect("request");
        assert_eq!(req.url, "/api/ocsge?year=2018&color=couverture&in_bbox=-1,44,0,45");
        assert!(l.switch().is_checked());
    }

    #[test]
    fn hover_publishes_and_clears_info() {
        let config = LayerConfiguration {
            scale: formats::ColorScale::from_json_value(gradient()).ok(),
            ..parcels_config()
        };
        let (mut l, info) = layer(&config);
        let mut h = host();
        let req = l.activate(&mut h).expect("request");
        l.complete(&req, Ok(collection(&[45.0, 80.0])), &mut h);

        l.on_feature_enter(1, &mut h);
        assert_eq!(info.info(), "<h4>parcels</h4><b>surface</b>: 80<br/>");
        assert!(info.legend().contains("<b>70 &ndash; +</b>"));
        assert_eq!(h.rendered(LayerId(0))[1].style.weight, 3.0);
        assert_eq!(h.raised, vec![(LayerId(0), 1)]);
        assert_eq!(l.hovered(), Some(1));

        l.on_feature_leave(1, &mut h);
        assert_eq!(info.info(), "");
        let restored = l.feature_style(&l.data().expect("data").features[1]);
        assert_eq!(h.rendered(LayerId(0))[1].style, restored);
        assert_eq!(l.hovered(), None);
    }

    #[test]
    fn hover_respects_host_capabilities_and_stale_indices() {
        let (mut l, info) = layer(&parcels_config());
        let mut h = host();
        h.capabilities = HostCapabilities {
            bring_to_front: false,
        };
        let req = l.activate(&mut h).expect("request");
        l.complete(&req, Ok(collection(&[1.0])), &mut h);

        l.on_feature_enter(0, &mut h);
        assert!(h.raised.is_empty());
        // Pass-through coloring: "surface" holds a number, not a color.
        assert_eq!(h.rendered(LayerId(0))[0].style.fill_color.as_deref(), Some(FALLBACK_COLOR));

        let before = info.revision();
        l.on_feature_enter(7, &mut h);
        assert_eq!(info.revision(), before);
    }

    #[test]
    fn emprise_layer_uses_outline_style() {
        let config = LayerConfiguration {
            use_emprise_style: true,
            ..parcels_config()
        };
        let (mut l, _) = layer(&config);
        let mut h = host();
        let req = l.activate(&mut h).expect("request");
        l.complete(&req, Ok(collection(&[45.0])), &mut h);
        assert_eq!(h.rendered(LayerId(0))[0].style, FeatureStyle::emprise());
    }
}

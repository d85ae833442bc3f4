//! Headless map session against a live data server.
//!
//! Loads a layer list, runs the startup fetches, optionally shows extra layers
//! and replays pans, then prints what each layer ended up rendering.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use carto::{MapOptions, MapOrchestrator};
use clap::Parser;
use foundation::bounds::{LatLng, LatLngBounds};
use layers::config::parse_layer_list;
use layers::host::RecordingHost;
use streaming::HttpSource;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless driver for GeoJSON map layers")]
struct Args {
    /// JSON file holding the layer list
    layers: PathBuf,

    /// JSON file holding map options (center, zoom, tiles)
    #[arg(long)]
    map: Option<PathBuf>,

    /// Server that relative layer URLs are resolved against (env: VIEWER_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Initial viewport as west,south,east,north (env: VIEWER_BBOX)
    #[arg(long)]
    bbox: Option<String>,

    /// Layers to switch on after startup, by name
    #[arg(long = "show")]
    show: Vec<String>,

    /// Viewports to pan to in order, each west,south,east,north
    #[arg(long = "pan")]
    pans: Vec<String>,
}

fn parse_bbox(raw: &str) -> Result<LatLngBounds, String> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid bbox {raw:?}: {e}"))?;
    let &[west, south, east, north] = parts.as_slice() else {
        return Err(format!("bbox {raw:?} needs 4 values, got {}", parts.len()));
    };
    if south > north || west > east {
        return Err(format!("bbox {raw:?} is inverted"));
    }
    Ok(LatLngBounds::new(LatLng::new(south, west), LatLng::new(north, east)))
}

/// One degree around the map center when no bbox is given.
fn default_viewport(options: &MapOptions) -> LatLngBounds {
    let c = options.center();
    LatLngBounds::new(
        LatLng::new(c.lat - 0.5, c.lng - 0.5),
        LatLng::new(c.lat + 0.5, c.lng + 0.5),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let base_url = args.base_url.unwrap_or_else(|| {
        env::var("VIEWER_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000/".to_string())
    });

    let layer_list = tokio::fs::read_to_string(&args.layers).await?;
    let configs = parse_layer_list(&layer_list)?;

    let options: MapOptions = match &args.map {
        Some(path) => serde_json::from_str(&tokio::fs::read_to_string(path).await?)?,
        None => MapOptions::default(),
    };

    let viewport = match args.bbox.or_else(|| env::var("VIEWER_BBOX").ok()) {
        Some(raw) => parse_bbox(&raw)?,
        None => default_viewport(&options),
    };

    let source = Arc::new(HttpSource::with_base_url(&base_url)?);
    let mut map = MapOrchestrator::new(RecordingHost::new(viewport), source, options);

    info!("loading {} layers from {base_url}", configs.len());
    map.init(&configs);
    map.settle().await;

    for name in &args.show {
        let Some(id) = map
            .layers()
            .iter()
            .find(|l| l.name() == name.as_str())
            .map(|l| l.id())
        else {
            return Err(format!("no layer named {name:?}").into());
        };
        map.toggle_layer(id, true)?;
    }
    map.settle().await;

    for raw in &args.pans {
        let bounds = parse_bbox(raw)?;
        info!("pan to {}", bounds.to_bbox_string());
        map.host_mut().pan_to(bounds);
        map.on_viewport_changed();
        map.settle().await;
    }

    for layer in map.layers() {
        println!(
            "{:<24} {:<8} {:<9} {:>6} features",
            layer.name(),
            layer.pane(),
            format!("{:?}", layer.phase()),
            map.host().rendered(layer.id()).len(),
        );
    }
    if let Some(fit) = map.host().fits.last() {
        println!("fitted to {}", fit.to_bbox_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_is_west_south_east_north() {
        let b = parse_bbox("-1.5, 44, 0.5, 45").expect("bbox");
        assert_eq!(b.west, -1.5);
        assert_eq!(b.south, 44.0);
        assert_eq!(b.north, 45.0);
    }

    #[test]
    fn malformed_bbox_is_rejected() {
        assert!(parse_bbox("1,2,3").is_err());
        assert!(parse_bbox("a,b,c,d").is_err());
        assert!(parse_bbox("0,10,1,5").is_err());
    }

    #[test]
    fn default_viewport_surrounds_center() {
        let v = default_viewport(&MapOptions::default());
        assert!(v.contains(MapOptions::default().center()));
    }
}

pub mod config;
pub mod fetch_policy;
pub mod host;
pub mod info;
pub mod layer;
pub mod switch;
pub mod symbology;

pub use config::{LayerConfiguration, SwitchKind, parse_layer_list};
pub use host::{MapHost, RecordingHost};
pub use info::InfoPanel;
pub use layer::*;

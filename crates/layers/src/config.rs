//! Declarative layer configuration.
//!
//! Layer lists are usually rendered by a server-side template, so boolean keys
//! accept `"True"`/`"False"` strings and `level` accepts numeric strings.

use formats::ColorScale;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const DEFAULT_COLOR_PROPERTY: &str = "surface";
pub const DEFAULT_LEVEL: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchKind {
    #[default]
    Default,
    /// Checkbox plus year and attribute-mode selectors.
    Ocsge,
}

impl From<Option<String>> for SwitchKind {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref() {
            Some("ocsge") => SwitchKind::Ocsge,
            _ => SwitchKind::Default,
        }
    }
}

/// One layer entry. Only `name` and `url` are required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayerConfiguration {
    pub name: String,
    pub url: String,

    /// Property holding either the color itself or the value matched against
    /// the scale. An explicit `null` disables property lookup.
    #[serde(default = "default_color_property")]
    pub color_property_name: Option<String>,

    #[serde(default, deserialize_with = "flexible_bool")]
    pub load_full_data: bool,

    #[serde(default, deserialize_with = "flexible_bool")]
    pub display: bool,

    #[serde(default, deserialize_with = "flexible_bool")]
    pub fit_map: bool,

    #[serde(default, deserialize_with = "flexible_bool")]
    pub use_emprise_style: bool,

    /// Pane level, 0 (bottom) to 9 (top). `None` when the input was not a number.
    #[serde(default = "default_level", deserialize_with = "flexible_level")]
    pub level: Option<i64>,

    /// Remote scale, fetched before the first render.
    #[serde(default)]
    pub gradient_url: Option<String>,

    /// Static scale, used when no `gradient_url` is set.
    #[serde(default)]
    pub scale: Option<ColorScale>,

    #[serde(default, rename = "switch", deserialize_with = "switch_kind")]
    pub switch: SwitchKind,
}

fn default_color_property() -> Option<String> {
    Some(DEFAULT_COLOR_PROPERTY.to_string())
}

fn default_level() -> Option<i64> {
    Some(DEFAULT_LEVEL)
}

impl LayerConfiguration {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            color_property_name: default_color_property(),
            load_full_data: false,
            display: false,
            fit_map: false,
            use_emprise_style: false,
            level: default_level(),
            gradient_url: None,
            scale: None,
            switch: SwitchKind::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Json(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(msg) => write!(f, "invalid layer configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn parse_layer_list(payload: &str) -> Result<Vec<LayerConfiguration>, ConfigError> {
    serde_json::from_str(payload).map_err(|e| ConfigError::Json(e.to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBool {
    Bool(bool),
    Text(String),
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match RawBool::deserialize(deserializer)? {
        RawBool::Bool(b) => Ok(b),
        RawBool::Text(s) => match s.as_str() {
            "True" | "true" => Ok(true),
            "False" | "false" => Ok(false),
            other => Err(D::Error::custom(format!("expected a boolean, got {other:?}"))),
        },
    }
}

/// Anything that is not an integral number degrades to `None`, never an error.
fn flexible_level<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(level_from_value(&Value::deserialize(deserializer)?))
}

fn level_from_value(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn switch_kind<'de, D>(deserializer: D) -> Result<SwitchKind, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(SwitchKind::from)
}

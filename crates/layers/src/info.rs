//! Shared info/legend regions and the HTML fragments written into them.

use std::cell::{Cell, RefCell};

use formats::ColorScale;
use serde_json::{Map, Value};

/// The map's single info region and legend region.
///
/// One instance is shared by every layer of a map; whichever feature was
/// hovered last owns the content.
#[derive(Debug, Default)]
pub struct InfoPanel {
    info: RefCell<String>,
    legend: RefCell<String>,
    revision: Cell<u64>,
}

impl InfoPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_info(&self, html: impl Into<String>) {
        *self.info.borrow_mut() = html.into();
        self.bump();
    }

    /// `None` empties the legend region.
    pub fn update_legend(&self, html: Option<String>) {
        *self.legend.borrow_mut() = html.unwrap_or_default();
        self.bump();
    }

    pub fn info(&self) -> String {
        self.info.borrow().clone()
    }

    pub fn legend(&self) -> String {
        self.legend.borrow().clone()
    }

    /// Incremented on every write, so hosts can skip redundant repaints.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    fn bump(&self) {
        self.revision.set(self.revision.get() + 1);
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Property value as shown to users: strings unquoted, `null` empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn format_number(v: f64) -> String {
    // 30.0 prints as "30"
    format!("{v}")
}

/// Layer title followed by one `key: value` line per property.
pub fn info_html(layer_name: &str, properties: &Map<String, Value>) -> String {
    let mut html = format!("<h4>{}</h4>", escape_html(layer_name));
    for (name, value) in properties {
        html.push_str(&format!(
            "<b>{}</b>: {}<br/>",
            escape_html(name),
            escape_html(&display_value(value))
        ));
    }
    html
}

/// Legend of a scaled layer for one hovered feature.
///
/// The band the feature falls into is rendered bold. Returns `None` when the
/// layer has no scale.
pub fn legend_html(
    layer_name: &str,
    property: Option<&str>,
    raw_value: Option<&Value>,
    reading: Option<f64>,
    scale: Option<&ColorScale>,
) -> Option<String> {
    let scale = scale?;
    let bands = scale.bands();
    let active = reading.and_then(|v| scale.band_index(v));

    let mut html = format!("<h4>{}</h4>", escape_html(layer_name));
    html.push_str(&format!(
        "Property used: {} ({})<br/>",
        escape_html(property.unwrap_or("")),
        escape_html(&raw_value.map(display_value).unwrap_or_default())
    ));

    for (band_idx, band) in bands.iter().enumerate() {
        let lower = match band_idx {
            0 => "0".to_string(),
            _ => format_number(bands[band_idx - 1].value),
        };
        // The last band is open-ended.
        let upper = match bands.get(band_idx + 1) {
            Some(_) => format_number(band.value),
            None => "+".to_string(),
        };
        let range = format!("{lower} &ndash; {upper}");
        let swatch = format!(
            "<i style=\"background:{}\"></i> ",
            escape_html(&band.color)
        );
        if active == Some(band_idx) {
            html.push_str(&format!("{swatch}<b>{range}</b><br/>"));
        } else {
            html.push_str(&format!("{swatch}{range}<br/>"));
        }
    }
    Some(html)
}

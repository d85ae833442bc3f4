use formats::{ColorScale, Feature};
use serde_json::Value;

/// Color used when a feature carries no usable color property.
pub const FALLBACK_COLOR: &str = "#FFEDA0";

/// Path style handed to the host renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureStyle {
    pub fill: bool,
    pub fill_color: Option<String>,
    pub fill_opacity: f32,
    /// Stroke width in pixels.
    pub weight: f32,
    pub opacity: f32,
    pub color: String,
    pub dash_array: Option<String>,
}

impl FeatureStyle {
    /// Filled polygon colored from the scale, with a faint white outline.
    pub fn scaled(fill_color: impl Into<String>) -> Self {
        Self {
            fill: true,
            fill_color: Some(fill_color.into()),
            fill_opacity: 0.7,
            weight: 1.0,
            opacity: 0.1,
            color: "white".to_string(),
            dash_array: None,
        }
    }

    /// Unfilled dashed red outline marking a project footprint.
    pub fn emprise() -> Self {
        Self {
            fill: false,
            fill_color: None,
            fill_opacity: 0.0,
            weight: 2.0,
            opacity: 1.0,
            color: "red".to_string(),
            dash_array: Some("10".to_string()),
        }
    }

    /// Merges `over` on top of this style; unset fields are kept.
    pub fn with_override(&self, over: &StyleOverride) -> Self {
        let mut out = self.clone();
        if let Some(w) = over.weight {
            out.weight = w;
        }
        if let Some(c) = &over.color {
            out.color = c.clone();
        }
        if let Some(d) = &over.dash_array {
            out.dash_array = if d.is_empty() { None } else { Some(d.clone()) };
        }
        if let Some(o) = over.fill_opacity {
            out.fill_opacity = o;
        }
        out
    }
}

/// Partial style applied on top of a computed style.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StyleOverride {
    pub weight: Option<f32>,
    pub color: Option<String>,
    /// `Some("")` clears the dash pattern.
    pub dash_array: Option<String>,
    pub fill_opacity: Option<f32>,
}

impl StyleOverride {
    /// Hover emphasis: thicker grey solid outline.
    pub fn highlight() -> Self {
        Self {
            weight: Some(3.0),
            color: Some("#777".to_string()),
            dash_array: Some(String::new()),
            fill_opacity: Some(0.7),
        }
    }
}

/// How a layer derives feature styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleKind {
    /// Fill color resolved from the color property and optional scale.
    #[default]
    Scaled,
    /// Fixed footprint outline; ignores color resolution entirely.
    Emprise,
}

/// Resolves feature colors from one property, through an optional scale.
#[derive(Debug, Clone, Copy)]
pub struct ColorResolver<'a> {
    pub property: Option<&'a str>,
    pub scale: Option<&'a ColorScale>,
}

impl<'a> ColorResolver<'a> {
    pub fn new(property: Option<&'a str>, scale: Option<&'a ColorScale>) -> Self {
        Self { property, scale }
    }

    pub fn property_value<'f>(&self, feature: &'f Feature) -> Option<&'f Value> {
        feature.property(self.property?)
    }

    /// Numeric reading of the color property, if any.
    pub fn reading(&self, feature: &Feature) -> Option<f64> {
        self.property_value(feature).and_then(numeric_value)
    }

    pub fn resolve_color(&self, feature: &Feature) -> String {
        match self.scale {
            None => match self.property_value(feature) {
                Some(Value::String(color)) if !color.is_empty() => color.clone(),
                _ => FALLBACK_COLOR.to_string(),
            },
            Some(scale) => self
                .reading(feature)
                .and_then(|v| scale.band_for(v))
                .map(|band| band.color.clone())
                .unwrap_or_else(|| FALLBACK_COLOR.to_string()),
        }
    }
}

/// Numbers, or numeric strings as emitted by decimal serializers.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

pub fn feature_style(
    kind: StyleKind,
    resolver: &ColorResolver<'_>,
    feature: &Feature,
) -> FeatureStyle {
    match kind {
        StyleKind::Scaled => FeatureStyle::scaled(resolver.resolve_color(feature)),
        StyleKind::Emprise => FeatureStyle::emprise(),
    }
}

use serde::{Deserialize, Serialize};

/// One threshold of a color scale: values strictly below `value` (and at or
/// above the previous band's value) take `color`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleBand {
    pub value: f64,
    pub color: String,
}

impl ScaleBand {
    pub fn new(value: f64, color: impl Into<String>) -> Self {
        Self {
            value,
            color: color.into(),
        }
    }
}

/// Value-ordered set of color bands.
///
/// Bands are kept ascending by `value`; the last band is open-ended.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColorScale {
    bands: Vec<ScaleBand>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScaleError {
    Json(String),
    NonFiniteValue { index: usize },
}

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::Json(msg) => write!(f, "invalid scale payload: {msg}"),
            ScaleError::NonFiniteValue { index } => {
                write!(f, "scale band {index} has a non-finite value")
            }
        }
    }
}

impl std::error::Error for ScaleError {}

impl ColorScale {
    /// Builds a scale, sorting bands ascending when the source did not.
    pub fn new(mut bands: Vec<ScaleBand>) -> Result<Self, ScaleError> {
        if let Some(index) = bands.iter().position(|b| !b.value.is_finite()) {
            return Err(ScaleError::NonFiniteValue { index });
        }
        // Stable sort keeps server order for equal thresholds.
        bands.sort_by(|a, b| a.value.total_cmp(&b.value));
        Ok(Self { bands })
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ScaleError> {
        let bands: Vec<ScaleBand> =
            serde_json::from_value(value).map_err(|e| ScaleError::Json(e.to_string()))?;
        Self::new(bands)
    }

    pub fn bands(&self) -> &[ScaleBand] {
        &self.bands
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Index of the band covering `value`: the first band whose threshold is
    /// strictly greater, else the last band.
    pub fn band_index(&self, value: f64) -> Option<usize> {
        if self.bands.is_empty() {
            return None;
        }
        let idx = self
            .bands
            .iter()
            .position(|band| value < band.value)
            .unwrap_or(self.bands.len() - 1);
        Some(idx)
    }

    pub fn band_for(&self, value: f64) -> Option<&ScaleBand> {
        self.band_index(value).map(|i| &self.bands[i])
    }
}

impl<'de> Deserialize<'de> for ColorScale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bands = Vec::<ScaleBand>::deserialize(deserializer)?;
        ColorScale::new(bands).map_err(serde::de::Error::custom)
    }
}

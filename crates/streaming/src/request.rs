use foundation::ids::LayerId;

/// What a fetch is for; decides how its response is applied to the layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// Color scale bands, fetched once before first render.
    Scale,
    /// The layer's GeoJSON data for the current refresh.
    Data,
}

/// A fetch issued by a layer, stamped with the generation it belongs to.
///
/// Responses are matched back to the layer by `(layer, kind, generation)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    pub layer: LayerId,
    pub kind: FetchKind,
    pub generation: u64,
    pub url: String,
}

/// Monotonic generation counter used to discard superseded responses.
///
/// Every issued fetch takes a fresh generation; only the latest one is current.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchFence {
    current: u64,
}

impl FetchFence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    /// Starts a new generation, superseding any in flight.
    pub fn advance(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.current
    }
}

use foundation::bounds::LatLngBounds;

/// Query parameter carrying the viewport extent.
pub const BBOX_PARAM: &str = "in_bbox";

/// Appends `param` (already `key=value`) using `?` for the first parameter and
/// `&` afterwards.
pub fn append_query(url: &str, param: &str) -> String {
    let sep = if url.ends_with('?') || url.ends_with('&') {
        ""
    } else if url.contains('?') {
        "&"
    } else {
        "?"
    };
    format!("{url}{sep}{param}")
}

/// Chooses between requesting a whole dataset and only the visible part of it.
///
/// Stateless: evaluated on every refresh against the viewport of that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportFetchPolicy {
    load_full_data: bool,
}

impl ViewportFetchPolicy {
    pub fn new(load_full_data: bool) -> Self {
        Self { load_full_data }
    }

    pub fn loads_full_data(&self) -> bool {
        self.load_full_data
    }

    /// Whether the layer has to refetch when the viewport moves.
    pub fn is_viewport_scoped(&self) -> bool {
        !self.load_full_data
    }

    pub fn build_request_url(&self, base_url: &str, viewport: &LatLngBounds) -> String {
        build_request_url(base_url, self.load_full_data, viewport)
    }
}

pub fn build_request_url(base_url: &str, load_full_data: bool, viewport: &LatLngBounds) -> String {
    if load_full_data {
        return base_url.to_string();
    }
    append_query(
        base_url,
        &format!("{BBOX_PARAM}={}", viewport.to_bbox_string()),
    )
}

//! Visibility switches bound to a layer.
//!
//! A switch never touches the layer itself: toggling yields a
//! [`SwitchAction`] that the layer turns into `activate`/`deactivate`.

use crate::config::SwitchKind;
use crate::fetch_policy::append_query;
use crate::info::escape_html;

pub const LOADING_IMAGE_URL: &str = "/static/carto/img/loading-buffering.gif";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Checkbox with year and attribute-mode selectors whose current values are
/// forwarded to the server as `year=` and `color=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParametrizedSwitch {
    years: Vec<SelectOption>,
    modes: Vec<SelectOption>,
    year: String,
    mode: String,
}

impl ParametrizedSwitch {
    /// The first option of each list starts selected.
    pub fn new(years: Vec<SelectOption>, modes: Vec<SelectOption>) -> Self {
        let year = years.first().map(|o| o.value.clone()).unwrap_or_default();
        let mode = modes.first().map(|o| o.value.clone()).unwrap_or_default();
        Self {
            years,
            modes,
            year,
            mode,
        }
    }

    /// Land-cover selectors: survey years and usage/coverage nomenclatures.
    pub fn ocsge() -> Self {
        Self::new(
            vec![SelectOption::new("2015", "2015"), SelectOption::new("2018", "2018")],
            vec![
                SelectOption::new("usage", "Usage du sol"),
                SelectOption::new("couverture", "Couverture du sol"),
            ],
        )
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn years(&self) -> &[SelectOption] {
        &self.years
    }

    pub fn modes(&self) -> &[SelectOption] {
        &self.modes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchVariant {
    Default,
    Parametrized(ParametrizedSwitch),
}

impl From<SwitchKind> for SwitchVariant {
    fn from(kind: SwitchKind) -> Self {
        match kind {
            SwitchKind::Default => SwitchVariant::Default,
            SwitchKind::Ocsge => SwitchVariant::Parametrized(ParametrizedSwitch::ocsge()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchSelector {
    Year,
    Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    Activate,
    Deactivate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchError {
    /// The default switch has no selectors.
    NoSelectors,
    UnknownOption { selector: SwitchSelector, value: String },
}

impl std::fmt::Display for SwitchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchError::NoSelectors => write!(f, "switch has no selectors"),
            SwitchError::UnknownOption { selector, value } => {
                write!(f, "unknown {selector:?} option: {value}")
            }
        }
    }
}

impl std::error::Error for SwitchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSwitch {
    dom_id: String,
    label: String,
    checked: bool,
    variant: SwitchVariant,
}

impl LayerSwitch {
    pub fn new(label: impl Into<String>, checked: bool, variant: SwitchVariant) -> Self {
        let label = label.into();
        Self {
            dom_id: format!("{}_switch", dom_token(&label)),
            label,
            checked,
            variant,
        }
    }

    pub fn dom_id(&self) -> &str {
        &self.dom_id
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn variant(&self) -> &SwitchVariant {
        &self.variant
    }

    /// Keeps the checkbox in sync when the layer changes state on its own.
    pub(crate) fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn toggle(&mut self, checked: bool) -> SwitchAction {
        self.checked = checked;
        if checked {
            SwitchAction::Activate
        } else {
            SwitchAction::Deactivate
        }
    }

    /// Changes one selector; the checked state is left alone.
    pub fn select(&mut self, selector: SwitchSelector, value: &str) -> Result<(), SwitchError> {
        let SwitchVariant::Parametrized(p) = &mut self.variant else {
            return Err(SwitchError::NoSelectors);
        };
        let (options, current) = match selector {
            SwitchSelector::Year => (&p.years, &mut p.year),
            SwitchSelector::Mode => (&p.modes, &mut p.mode),
        };
        if !options.iter().any(|o| o.value == value) {
            return Err(SwitchError::UnknownOption {
                selector,
                value: value.to_string(),
            });
        }
        *current = value.to_string();
        Ok(())
    }

    /// Layer URL with the selector values appended, before any bbox.
    pub fn request_base_url(&self, url: &str) -> String {
        match &self.variant {
            SwitchVariant::Default => url.to_string(),
            SwitchVariant::Parametrized(p) => {
                let with_year = append_query(url, &format!("year={}", p.year));
                append_query(&with_year, &format!("color={}", p.mode))
            }
        }
    }

    /// Markup for the host's layer list.
    pub fn to_html(&self) -> String {
        let id = escape_html(&self.dom_id);
        let checked = if self.checked { " checked" } else { "" };
        let loading = format!(
            "<img src=\"{LOADING_IMAGE_URL}\" class=\"ms-1\" style=\"display: none;\" width=\"12\" height=\"12\">"
        );

        let label_body = match &self.variant {
            SwitchVariant::Default => escape_html(&self.label),
            SwitchVariant::Parametrized(p) => {
                let token = dom_token(&self.label);
                format!(
                    "<div class=\"input-group\"><div class=\"input-group-text\">{} : </div>{}{}</div>",
                    escape_html(&self.label),
                    select_html(&format!("{token}_years"), &p.years, &p.year),
                    select_html(&format!("{token}_modes"), &p.modes, &p.mode),
                )
            }
        };

        format!(
            "<div class=\"form-check form-switch\">\
             <input class=\"form-check-input\" type=\"checkbox\" id=\"{id}\"{checked}>\
             <label class=\"form-check-label\" for=\"{id}\">{label_body}{loading}</label>\
             </div>"
        )
    }
}

fn select_html(id: &str, options: &[SelectOption], selected: &str) -> String {
    let mut html = format!(
        "<select class=\"form-select form-select-sm\" aria-label=\"form-select\" id=\"{}\">",
        escape_html(id)
    );
    for opt in options {
        let sel = if opt.value == selected { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{}\"{sel}>{}</option>",
            escape_html(&opt.value),
            escape_html(&opt.label)
        ));
    }
    html.push_str("</select>");
    html
}

/// Layer names become element ids; keep them attribute-safe.
fn dom_token(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ocsge_switch() -> LayerSwitch {
        LayerSwitch::new("OCS GE", false, SwitchVariant::Parametrized(ParametrizedSwitch::ocsge()))
    }

    #[test]
    fn toggle_maps_checked_state_to_actions() {
        let mut s = LayerSwitch::new("parcels", false, SwitchVariant::Default);
        assert_eq!(s.toggle(true), SwitchAction::Activate);
        assert!(s.is_checked());
        assert_eq!(s.toggle(false), SwitchAction::Deactivate);
        assert!(!s.is_checked());
    }

    #[test]
    fn default_switch_keeps_url_and_rejects_selectors() {
        let mut s = LayerSwitch::new("parcels", true, SwitchVariant::Default);
        assert_eq!(s.request_base_url("/api/parcels"), "/api/parcels");
        assert_eq!(s.select(SwitchSelector::Year, "2018"), Err(SwitchError::NoSelectors));
    }

    #[test]
    fn parametrized_url_carries_both_selectors() {
        let mut s = ocsge_switch();
        assert_eq!(s.request_base_url("/api/ocsge"), "/api/ocsge?year=2015&color=usage");
        s.select(SwitchSelector::Year, "2018").expect("year");
        s.select(SwitchSelector::Mode, "couverture").expect("mode");
        assert_eq!(
            s.request_base_url("/api/ocsge?dept=33"),
            "/api/ocsge?dept=33&year=2018&color=couverture"
        );
        assert!(!s.is_checked());
    }

    #[test]
    fn unknown_option_is_rejected_and_selection_kept() {
        let mut s = ocsge_switch();
        let err = s.select(SwitchSelector::Year, "1999").unwrap_err();
        assert!(matches!(err, SwitchError::UnknownOption { .. }));
        assert_eq!(s.request_base_url("/a"), "/a?year=2015&color=usage");
    }

    #[test]
    fn html_reflects_state() {
        let plain = LayerSwitch::new("Zones <U>", true, SwitchVariant::Default);
        let html = plain.to_html();
        assert!(html.contains("id=\"Zones__U__switch\" checked"));
        assert!(html.contains("Zones &lt;U&gt;"));

        let mut s = ocsge_switch();
        s.select(SwitchSelector::Mode, "couverture").expect("mode");
        let html = s.to_html();
        assert!(html.contains("id=\"OCS_GE_years\""));
        assert!(html.contains("<option value=\"couverture\" selected>Couverture du sol</option>"));
        assert!(!html.contains(" checked"));
    }
}

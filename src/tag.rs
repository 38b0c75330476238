//! Browser detection for browser image tags.
//!
//! A tag is a dash-delimited list of components. A component starting with
//! one of the typed prefixes `chrome`, `ff`, or `edge`, followed directly
//! by version digits, advertises that browser; every other component
//! (`node12.4.0`, `npm6.14.5`, ...) is inert. Prefixes are lowercase and
//! matching is case-sensitive. Each tag is parsed once into a
//! [`BrowserVersions`] record and emission consults the record, never the
//! raw string.
//!
//! ## Detected patterns
//!
//! - `node12.4.0-chrome76` → Google Chrome 76
//! - `node10.16.3-chrome80-ff73` → Google Chrome 80, Mozilla Firefox 73
//! - `node14.10.1-edge88` → Microsoft Edge 88
//! - `chrome69` → Google Chrome 69 (the earliest tags have no node component)
//! - `node12.0.0` → nothing (fatal for a browsers-category tag)

/// Browser versions advertised by a single image tag, as the full display
/// labels the CI jobs expect (e.g. `Google Chrome 76`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BrowserVersions {
    pub chrome: Option<String>,
    pub firefox: Option<String>,
    pub edge: Option<String>,
}

impl BrowserVersions {
    /// True when the tag advertised no browser at all.
    pub fn is_empty(&self) -> bool {
        self.chrome.is_none() && self.firefox.is_none() && self.edge.is_none()
    }
}

const CHROME_LABEL: &str = "Google Chrome";
const FIREFOX_LABEL: &str = "Mozilla Firefox";
const EDGE_LABEL: &str = "Microsoft Edge";

/// Parse a tag into the browsers it advertises.
///
/// Components are scanned left to right; the first marker per browser wins
/// if a tag repeats one. Version digits are taken greedily from right after
/// the prefix and the remainder of the component is ignored.
pub fn detect_browsers(tag: &str) -> BrowserVersions {
    let mut found = BrowserVersions::default();
    for component in tag.split('-') {
        if found.chrome.is_none() {
            if let Some(version) = component_version(component, "chrome") {
                found.chrome = Some(format!("{CHROME_LABEL} {version}"));
                continue;
            }
        }
        if found.firefox.is_none() {
            if let Some(version) = component_version(component, "ff") {
                found.firefox = Some(format!("{FIREFOX_LABEL} {version}"));
                continue;
            }
        }
        if found.edge.is_none() {
            if let Some(version) = component_version(component, "edge") {
                found.edge = Some(format!("{EDGE_LABEL} {version}"));
            }
        }
    }
    found
}

/// Chrome label for a tag, e.g. `Some("Google Chrome 76")`.
pub fn find_chrome_version(tag: &str) -> Option<String> {
    detect_browsers(tag).chrome
}

/// Firefox label for a tag, e.g. `Some("Mozilla Firefox 73")`.
pub fn find_firefox_version(tag: &str) -> Option<String> {
    detect_browsers(tag).firefox
}

/// Edge label for a tag, e.g. `Some("Microsoft Edge 88")`.
pub fn find_edge_version(tag: &str) -> Option<String> {
    detect_browsers(tag).edge
}

/// `component_version("chrome76", "chrome")` → `Some("76")`. The component
/// must start with the prefix and carry at least one digit right after it.
fn component_version<'a>(component: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = component.strip_prefix(prefix)?;
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    Some(&rest[..end])
}

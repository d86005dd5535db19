//! Web-font stylesheet providers.
//!
//! The compiler collects every font family the scene uses and asks a
//! [`FontProvider`] for one stylesheet URL to link from the document head.

#[cfg(test)]
#[path = "fonts_test.rs"]
mod fonts_test;

use std::collections::BTreeSet;

/// Families every browser resolves locally; never requested from a font host.
const LOCAL_FAMILIES: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "inherit",
    "initial",
    "arial",
    "helvetica",
    "helvetica neue",
    "times",
    "times new roman",
    "georgia",
    "verdana",
    "tahoma",
    "trebuchet ms",
    "courier",
    "courier new",
    "impact",
];

/// Supplies the stylesheet that makes a set of font families available.
pub trait FontProvider {
    /// URL of a stylesheet loading `families`, or `None` if nothing needs
    /// loading.
    fn stylesheet_href(&self, families: &[String]) -> Option<String>;
}

/// Links the Google Fonts CSS API.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleFonts;

impl FontProvider for GoogleFonts {
    fn stylesheet_href(&self, families: &[String]) -> Option<String> {
        let remote = remote_families(families);
        if remote.is_empty() {
            return None;
        }
        let query: Vec<String> = remote.iter().map(|f| format!("family={}", f.replace(' ', "+"))).collect();
        Some(format!("https://fonts.googleapis.com/css2?{}&display=swap", query.join("&")))
    }
}

/// Never links anything; the creative relies on locally installed fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFonts;

impl FontProvider for NoFonts {
    fn stylesheet_href(&self, _families: &[String]) -> Option<String> {
        None
    }
}

/// Individual family names from a CSS `font-family` value, unquoted.
#[must_use]
pub fn split_font_stack(stack: &str) -> Vec<String> {
    stack
        .split(',')
        .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Families that must be fetched, deduplicated and sorted.
fn remote_families(families: &[String]) -> BTreeSet<String> {
    families
        .iter()
        .flat_map(|f| split_font_stack(f))
        .filter(|f| !LOCAL_FAMILIES.contains(&f.to_ascii_lowercase().as_str()))
        .filter(|f| f.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-'))
        .collect()
}

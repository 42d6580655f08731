//! Builder configuration.
//!
//! Supplied by the host as JSON; every field has a default so a partial
//! (or empty) object is valid.

use crate::error::BuilderError;
use crate::model::{ElementKind, ROOT_ID};
use serde::Deserialize;

// ─── Layout metrics ───────────────────────────────────────────────────────

/// Metrics used by the stacking layout when the host has not pushed
/// measured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub zone_width: f32,
    /// Vertical gap between consecutive zones.
    pub zone_gap: f32,
    /// Inner padding of a zone, applied on all sides.
    pub zone_padding: f32,
    /// Minimum height of an empty zone.
    pub zone_min_height: f32,
    /// Vertical gap between consecutive elements in a zone.
    pub element_gap: f32,
    /// Line height as a multiple of font size.
    pub text_line_height: f32,
    pub image_height: f32,
    pub divider_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            zone_width: 800.0,
            zone_gap: 20.0,
            zone_padding: 10.0,
            zone_min_height: 100.0,
            element_gap: 10.0,
            text_line_height: 1.5,
            image_height: 150.0,
            divider_height: 20.0,
        }
    }
}

// ─── DOM element IDs ─────────────────────────────────────────────────────

/// IDs of the host UI elements the bridge binds to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiIds {
    pub form: String,
    pub delete_button: String,
    pub content_field: String,
    pub color_field: String,
    pub size_field: String,
}

impl Default for UiIds {
    fn default() -> Self {
        Self {
            form: "element-properties-form".to_string(),
            delete_button: "delete-element".to_string(),
            content_field: "element-content".to_string(),
            color_field: "element-color".to_string(),
            size_field: "element-size".to_string(),
        }
    }
}

impl UiIds {
    /// Elements whose absence is fatal at startup.
    pub fn required(&self) -> [&str; 2] {
        [&self.form, &self.delete_button]
    }
}

// ─── Top-level ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Drop zone IDs, in page order.
    pub zones: Vec<String>,
    pub layout: LayoutConfig,
    pub ui: UiIds,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            zones: vec!["main".to_string()],
            layout: LayoutConfig::default(),
            ui: UiIds::default(),
        }
    }
}

impl BuilderConfig {
    /// Check invariants serde can't express.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for an empty zone list, and for blank,
    /// duplicated or reserved zone IDs. Reserved are the page root and
    /// anything shaped like a generated element ID (`text_3`).
    pub fn validate(&self) -> Result<(), BuilderError> {
        if self.zones.is_empty() {
            return Err(BuilderError::InvalidConfig(
                "at least one drop zone is required".into(),
            ));
        }
        for (i, zone) in self.zones.iter().enumerate() {
            if zone.trim().is_empty() {
                return Err(BuilderError::InvalidConfig("empty zone id".into()));
            }
            if zone == ROOT_ID || is_generated_element_id(zone) {
                return Err(BuilderError::InvalidConfig(format!(
                    "zone id `{zone}` is reserved"
                )));
            }
            if self.zones[..i].contains(zone) {
                return Err(BuilderError::InvalidConfig(format!(
                    "duplicate zone id `{zone}`"
                )));
            }
        }
        Ok(())
    }
}

/// `<tag>_<digits>`, the shape of factory-generated element IDs.
fn is_generated_element_id(id: &str) -> bool {
    id.split_once('_').is_some_and(|(prefix, n)| {
        ElementKind::ALL.iter().any(|kind| kind.tag() == prefix)
            && !n.is_empty()
            && n.bytes().all(|b| b.is_ascii_digit())
    })
}

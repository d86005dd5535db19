//! Scene model: ad sizes, layers, their per-size configuration, and the store.
//!
//! This module defines the data that describes a creative (`Scene`, `Layer`,
//! `LayerKind`), the per-size geometry/style/animation record (`SizeConfig`),
//! and the typed value pairs those records are built from (`Length`,
//! `TimeValue`). The model is passive: it offers read access and structural
//! updates, and leaves numeric clamping to its callers.
//!
//! Data flows into this layer from JSON (the host editor or the CLI) and from
//! the transform engine (geometry writes). The export compiler reads it.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::consts::{DEFAULT_LAYER_HEIGHT, DEFAULT_LAYER_WIDTH, DEFAULT_LOOP_DELAY_MS, DEFAULT_RESET_DURATION_MS};
use crate::snap::Rect;

/// Unique identifier for a layer.
pub type LayerId = Uuid;

/// Errors raised by structural scene edits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// No layer with this id exists in the scene.
    #[error("unknown layer: {0}")]
    UnknownLayer(LayerId),
    /// The scene does not list this size.
    #[error("unknown size: {0}")]
    UnknownSize(Size),
    /// A layer with this id is already present.
    #[error("duplicate layer id: {0}")]
    DuplicateLayerId(LayerId),
    /// Another layer already exports under this id.
    #[error("export id `{0}` is already used by another layer")]
    DuplicateExportId(String),
    /// The export id is empty, starts with a digit, or contains whitespace.
    #[error("invalid export id `{0}`")]
    InvalidExportId(String),
    /// A geometry value is NaN or infinite.
    #[error("non-finite geometry on layer {id} at {size}")]
    NonFiniteGeometry { id: LayerId, size: Size },
    /// A size string could not be parsed as `WIDTHxHEIGHT`.
    #[error("invalid size `{0}` (expected WIDTHxHEIGHT)")]
    InvalidSize(String),
}

// =============================================================
// Sizes
// =============================================================

/// One fixed pixel dimension the creative must support.
///
/// Serialized as the string `"300x250"` so it can key JSON maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width as a floating-point canvas extent.
    #[must_use]
    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as a floating-point canvas extent.
    #[must_use]
    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    /// The canvas rectangle for this size, anchored at the origin.
    #[must_use]
    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, self.width_f64(), self.height_f64())
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SceneError::InvalidSize(s.to_owned());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl Serialize for Size {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Size {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================
// Typed values
// =============================================================

/// Unit of a geometric length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    #[serde(rename = "px")]
    Px,
    #[serde(rename = "%")]
    Percent,
}

impl LengthUnit {
    /// CSS suffix for this unit.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Percent => "%",
        }
    }
}

/// A number paired with its unit, e.g. `{ "value": 50, "unit": "%" }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Length {
    pub value: f64,
    #[serde(default)]
    pub unit: LengthUnit,
}

impl Length {
    #[must_use]
    pub fn px(value: f64) -> Self {
        Self { value, unit: LengthUnit::Px }
    }

    #[must_use]
    pub fn percent(value: f64) -> Self {
        Self { value, unit: LengthUnit::Percent }
    }

    /// Resolve to canvas pixels; percentages are taken of `extent`.
    #[must_use]
    pub fn resolve(self, extent: f64) -> f64 {
        match self.unit {
            LengthUnit::Px => self.value,
            LengthUnit::Percent => self.value / 100.0 * extent,
        }
    }
}

/// Unit of a time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Ms,
    S,
}

/// A duration paired with its unit, e.g. `{ "value": 0.3, "unit": "s" }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeValue {
    pub value: f64,
    #[serde(default)]
    pub unit: TimeUnit,
}

impl TimeValue {
    #[must_use]
    pub fn ms(value: f64) -> Self {
        Self { value, unit: TimeUnit::Ms }
    }

    #[must_use]
    pub fn secs(value: f64) -> Self {
        Self { value, unit: TimeUnit::S }
    }

    /// Normalize to milliseconds. Negative and non-finite values become zero.
    #[must_use]
    pub fn as_ms(self) -> f64 {
        let ms = match self.unit {
            TimeUnit::Ms => self.value,
            TimeUnit::S => self.value * 1000.0,
        };
        if ms.is_finite() { ms.max(0.0) } else { 0.0 }
    }
}

/// Corner rounding: one radius for all corners or one per corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BorderRadius {
    Uniform(f64),
    #[serde(rename_all = "camelCase")]
    Corners { top_left: f64, top_right: f64, bottom_right: f64, bottom_left: f64 },
}

// =============================================================
// Animations
// =============================================================

/// Built-in animation presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationType {
    FadeIn,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    Scale,
    /// Animates `Animation::property`; unknown type names also land here.
    #[serde(other)]
    Custom,
}

/// An animated endpoint: a unit value, a bare number, or a color string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimationValue {
    Length(Length),
    Number(f64),
    Color(String),
}

/// A single entrance/loop animation on a layer at one size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AnimationType,
    #[serde(default, deserialize_with = "lenient_value", skip_serializing_if = "Option::is_none")]
    pub from: Option<AnimationValue>,
    #[serde(default, deserialize_with = "lenient_value", skip_serializing_if = "Option::is_none")]
    pub to: Option<AnimationValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default)]
    pub duration: TimeValue,
    #[serde(default)]
    pub delay: TimeValue,
    #[serde(default = "default_easing")]
    pub easing: String,
}

impl Animation {
    /// A preset animation with default endpoints.
    #[must_use]
    pub fn preset(kind: AnimationType, duration: TimeValue, delay: TimeValue) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            name: String::new(),
            kind,
            from: None,
            to: None,
            property: None,
            duration,
            delay,
            easing: default_easing(),
        }
    }
}

fn default_easing() -> String {
    "ease".to_owned()
}

/// Malformed endpoint values deserialize as absent so the compiler can fall
/// back to the preset default.
fn lenient_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<AnimationValue>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| match serde_json::from_value(v) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(%err, "malformed animation endpoint, using preset default");
            None
        }
    }))
}

// =============================================================
// Layers
// =============================================================

/// Visual styles shared by all sizes of a layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Styles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Opacity in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_fit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

/// Export attributes attached to the layer's root element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayerAttributes {
    /// Stable element id in the exported document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// What a video-control button does to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VideoControl {
    Play,
    Pause,
    Restart,
    TogglePlayPause,
}

/// Click behavior of a button layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ButtonAction {
    /// Navigate to a URL.
    Link {
        url: String,
        #[serde(default, rename = "newTab")]
        new_tab: bool,
    },
    /// Drive a video element elsewhere in the creative.
    VideoControl {
        /// Layer id or export id of the target video. May dangle.
        #[serde(rename = "targetElementId")]
        target_element_id: String,
        control: VideoControl,
    },
}

/// Pre-serialized icon markup for a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonIcon {
    /// Markup shown initially (and while the target video is paused).
    pub play: String,
    /// Markup shown while the target video is playing, for toggle buttons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonProps {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<ButtonIcon>,
    pub action: ButtonAction,
}

/// The kind of a layer and its kind-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerKind {
    /// Plain text content.
    Text {
        #[serde(default)]
        text: String,
    },
    /// Formatted text blob, emitted verbatim and never parsed.
    #[serde(rename = "richtext")]
    RichText {
        #[serde(default)]
        html: String,
    },
    Image {
        url: String,
        #[serde(default)]
        alt: String,
    },
    Video {
        url: String,
        #[serde(default)]
        autoplay: bool,
        #[serde(default)]
        controls: bool,
        #[serde(default)]
        muted: bool,
        #[serde(default, rename = "loop")]
        looping: bool,
    },
    Button(ButtonProps),
}

impl LayerKind {
    /// Lowercase tag as it appears in JSON.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::RichText { .. } => "richtext",
            Self::Image { .. } => "image",
            Self::Video { .. } => "video",
            Self::Button(_) => "button",
        }
    }
}

/// Position and size of a layer at one ad size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
}

impl Geometry {
    /// Pixel geometry from a resolved rectangle.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: Length::px(rect.x),
            y: Length::px(rect.y),
            width: Length::px(rect.width),
            height: Length::px(rect.height),
        }
    }

    /// Resolve to pixels for `size`. Horizontal values are taken of the
    /// width, vertical values of the height.
    #[must_use]
    pub fn resolve(&self, size: Size) -> Rect {
        let (w, h) = (size.width_f64(), size.height_f64());
        Rect::new(self.x.resolve(w), self.y.resolve(h), self.width.resolve(w), self.height.resolve(h))
    }

    fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height].iter().all(|l| l.value.is_finite())
    }
}

/// Geometry, style overrides and animations of one layer at one ad size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeConfig {
    pub position_x: Length,
    pub position_y: Length,
    pub width: Length,
    pub height: Length,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<BorderRadius>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animations: Vec<Animation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_loop_delay: Option<TimeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_reset_duration: Option<TimeValue>,
}

impl SizeConfig {
    /// A config with the given geometry and nothing else set.
    #[must_use]
    pub fn with_geometry(geometry: Geometry) -> Self {
        Self {
            position_x: geometry.x,
            position_y: geometry.y,
            width: geometry.width,
            height: geometry.height,
            font_size: None,
            icon_size: None,
            border_radius: None,
            animations: Vec::new(),
            animation_loop_delay: None,
            animation_reset_duration: None,
        }
    }

    /// Default config for a new layer: a default-sized box centered on the canvas.
    #[must_use]
    pub fn default_for(size: Size) -> Self {
        let w = DEFAULT_LAYER_WIDTH.min(size.width_f64());
        let h = DEFAULT_LAYER_HEIGHT.min(size.height_f64());
        let x = (size.width_f64() - w) / 2.0;
        let y = (size.height_f64() - h) / 2.0;
        Self::with_geometry(Geometry::from_rect(Rect::new(x, y, w, h)))
    }

    #[must_use]
    pub fn geometry(&self) -> Geometry {
        Geometry { x: self.position_x, y: self.position_y, width: self.width, height: self.height }
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.position_x = geometry.x;
        self.position_y = geometry.y;
        self.width = geometry.width;
        self.height = geometry.height;
    }
}

/// A typed visual element of the creative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub aspect_ratio_locked: bool,
    #[serde(default)]
    pub attributes: LayerAttributes,
    #[serde(flatten)]
    pub kind: LayerKind,
    #[serde(default)]
    pub styles: Styles,
    /// Sparse: a layer without an entry for a size is not rendered at that size.
    #[serde(default)]
    pub sizes: BTreeMap<Size, SizeConfig>,
}

impl Layer {
    /// A new layer with a fresh id and no size configs.
    #[must_use]
    pub fn new(label: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            locked: false,
            aspect_ratio_locked: false,
            attributes: LayerAttributes::default(),
            kind,
            styles: Styles::default(),
            sizes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self, size: Size) -> Option<&SizeConfig> {
        self.sizes.get(&size)
    }

    /// Pixel rectangle at `size`, if the layer is present there.
    #[must_use]
    pub fn rect(&self, size: Size) -> Option<Rect> {
        self.config(size).map(|c| c.geometry().resolve(size))
    }
}

/// Scene-wide fallbacks for layers that do not set loop timing themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationDefaults {
    pub loop_delay: TimeValue,
    pub reset_duration: TimeValue,
}

impl Default for AnimationDefaults {
    fn default() -> Self {
        Self {
            loop_delay: TimeValue::ms(DEFAULT_LOOP_DELAY_MS),
            reset_duration: TimeValue::ms(DEFAULT_RESET_DURATION_MS),
        }
    }
}

/// Returns `true` when `id` may be used as an element id in the export.
#[must_use]
pub fn is_valid_export_id(id: &str) -> bool {
    !id.is_empty() && !id.starts_with(|c: char| c.is_ascii_digit()) && !id.chars().any(char::is_whitespace)
}

// =============================================================
// Scene
// =============================================================

/// The in-memory document. Layer order is z-order, topmost first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    sizes: Vec<Size>,
    #[serde(default)]
    layers: Vec<Layer>,
    #[serde(default)]
    pub animation_defaults: AnimationDefaults,
}

impl Scene {
    /// Create an empty scene supporting `sizes` (duplicates are dropped).
    #[must_use]
    pub fn new(name: impl Into<String>, sizes: impl IntoIterator<Item = Size>) -> Self {
        let mut scene = Self { name: name.into(), ..Self::default() };
        for size in sizes {
            scene.add_size(size);
        }
        scene
    }

    // --- Reads ---

    /// Layers in z-order, topmost first.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Supported sizes in declaration order.
    #[must_use]
    pub fn sizes(&self) -> &[Size] {
        &self.sizes
    }

    #[must_use]
    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == *id)
    }

    #[must_use]
    pub fn layer_index(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == *id)
    }

    #[must_use]
    pub fn size_config(&self, id: &LayerId, size: Size) -> Option<&SizeConfig> {
        self.layer(id).and_then(|l| l.config(size))
    }

    /// Pixel rectangle of a layer at `size`, with `%` resolved against the size.
    #[must_use]
    pub fn resolve_rect(&self, id: &LayerId, size: Size) -> Option<Rect> {
        self.layer(id).and_then(|l| l.rect(size))
    }

    #[must_use]
    pub fn has_size(&self, size: Size) -> bool {
        self.sizes.contains(&size)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    // --- Sizes ---

    /// Add a supported size. Returns `false` if it was already listed.
    /// Existing layers get no config for it and stay hidden there.
    pub fn add_size(&mut self, size: Size) -> bool {
        if self.sizes.contains(&size) {
            return false;
        }
        self.sizes.push(size);
        true
    }

    /// Remove a size together with every layer's config for it.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownSize`] if the scene does not list `size`.
    pub fn remove_size(&mut self, size: Size) -> Result<(), SceneError> {
        let Some(index) = self.sizes.iter().position(|s| *s == size) else {
            return Err(SceneError::UnknownSize(size));
        };
        self.sizes.remove(index);
        for layer in &mut self.layers {
            layer.sizes.remove(&size);
        }
        Ok(())
    }

    // --- Layers ---

    /// Create a layer on top of the stack with a default config for every
    /// supported size. Returns the new id.
    pub fn insert_layer(&mut self, label: impl Into<String>, kind: LayerKind) -> LayerId {
        let mut layer = Layer::new(label, kind);
        for size in &self.sizes {
            layer.sizes.insert(*size, SizeConfig::default_for(*size));
        }
        let id = layer.id;
        self.layers.insert(0, layer);
        id
    }

    /// Insert a fully built layer on top of the stack.
    ///
    /// # Errors
    ///
    /// Rejects a duplicate layer id, and an export id that is invalid or
    /// already in use.
    pub fn push_layer(&mut self, layer: Layer) -> Result<(), SceneError> {
        if self.layer(&layer.id).is_some() {
            return Err(SceneError::DuplicateLayerId(layer.id));
        }
        if let Some(export_id) = layer.attributes.id.as_deref() {
            self.check_export_id(&layer.id, export_id)?;
        }
        self.layers.insert(0, layer);
        Ok(())
    }

    /// Remove a layer by id, returning it. References to it from other
    /// layers (e.g. video-control targets) are left dangling.
    pub fn remove_layer(&mut self, id: &LayerId) -> Option<Layer> {
        let index = self.layer_index(id)?;
        Some(self.layers.remove(index))
    }

    /// Move a layer to `index` in the z-order (0 = topmost). Out-of-range
    /// indices clamp to the bottom.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownLayer`] if no such layer exists.
    pub fn move_layer(&mut self, id: &LayerId, index: usize) -> Result<(), SceneError> {
        let from = self.layer_index(id).ok_or(SceneError::UnknownLayer(*id))?;
        let layer = self.layers.remove(from);
        let to = index.min(self.layers.len());
        self.layers.insert(to, layer);
        Ok(())
    }

    /// Replace the geometry of one layer at one size, creating the config if
    /// the layer had none there.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown layer or size, or non-finite values.
    pub fn set_geometry(&mut self, id: &LayerId, size: Size, geometry: Geometry) -> Result<(), SceneError> {
        if !self.has_size(size) {
            return Err(SceneError::UnknownSize(size));
        }
        if !geometry.is_finite() {
            return Err(SceneError::NonFiniteGeometry { id: *id, size });
        }
        let layer = self.layer_mut(id)?;
        match layer.sizes.get_mut(&size) {
            Some(config) => config.set_geometry(geometry),
            None => {
                layer.sizes.insert(size, SizeConfig::with_geometry(geometry));
            }
        }
        Ok(())
    }

    /// Apply an arbitrary field write to a layer.
    ///
    /// The closure must not change the layer id; export ids should go
    /// through [`Scene::set_export_id`] to be validated.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownLayer`] if no such layer exists.
    pub fn update_layer<F>(&mut self, id: &LayerId, f: F) -> Result<(), SceneError>
    where
        F: FnOnce(&mut Layer),
    {
        let layer = self.layer_mut(id)?;
        let original_id = layer.id;
        f(layer);
        layer.id = original_id;
        Ok(())
    }

    /// Set or clear the export id of a layer.
    ///
    /// # Errors
    ///
    /// Rejects ids that are empty, start with a digit, contain whitespace, or
    /// are already used by another layer.
    pub fn set_export_id(&mut self, id: &LayerId, export_id: Option<String>) -> Result<(), SceneError> {
        if let Some(candidate) = export_id.as_deref() {
            self.check_export_id(id, candidate)?;
        }
        self.layer_mut(id)?.attributes.id = export_id;
        Ok(())
    }

    /// Report every integrity problem in the scene. Deserialized scenes are
    /// not validated on load; this is the explicit check.
    #[must_use]
    pub fn validate(&self) -> Vec<SceneError> {
        let mut errors = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut seen_exports = HashSet::new();
        for layer in &self.layers {
            if !seen_ids.insert(layer.id) {
                errors.push(SceneError::DuplicateLayerId(layer.id));
            }
            if let Some(export_id) = layer.attributes.id.as_deref() {
                if !is_valid_export_id(export_id) {
                    errors.push(SceneError::InvalidExportId(export_id.to_owned()));
                }
                if !seen_exports.insert(export_id) {
                    errors.push(SceneError::DuplicateExportId(export_id.to_owned()));
                }
            }
            for (size, config) in &layer.sizes {
                if !config.geometry().is_finite() {
                    errors.push(SceneError::NonFiniteGeometry { id: layer.id, size: *size });
                }
            }
        }
        errors
    }

    fn layer_mut(&mut self, id: &LayerId) -> Result<&mut Layer, SceneError> {
        self.layers.iter_mut().find(|l| l.id == *id).ok_or(SceneError::UnknownLayer(*id))
    }

    fn check_export_id(&self, owner: &LayerId, export_id: &str) -> Result<(), SceneError> {
        if !is_valid_export_id(export_id) {
            return Err(SceneError::InvalidExportId(export_id.to_owned()));
        }
        let taken = self
            .layers
            .iter()
            .any(|l| l.id != *owner && l.attributes.id.as_deref() == Some(export_id));
        if taken {
            return Err(SceneError::DuplicateExportId(export_id.to_owned()));
        }
        Ok(())
    }
}

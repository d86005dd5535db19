//! Scene compiler: one static HTML document for a set of ad sizes.
//!
//! Markup is emitted once and shared by every size; sizes differ only in the
//! stylesheet. The first size's rules are unconditional and every later size
//! repeats the same rule shape behind
//! `@media (min-width: Wpx) and (min-height: Hpx)`. A layer without a config
//! at a size is hidden there.
//!
//! Each animated element carries its per-size animation shorthand in the
//! `--ad-animation` custom property. A bootstrap script copies it into the
//! element's `animation` once the page has loaded, so nothing moves while
//! fonts and images are still arriving. Until then the static rules hold
//! every animated property at its start value.
//!
//! Rules for later sizes override the base rules only where they restate a
//! property, so every size restates each property the layer animates at any
//! size, and `--ad-animation: none` where it animates nothing.
//!
//! Compilation reads the scene and nothing else: the same scene and options
//! always produce byte-identical output.

#[cfg(test)]
#[path = "compile_test.rs"]
mod compile_test;

use std::collections::{BTreeSet, HashMap};

use canvas::doc::{BorderRadius, ButtonAction, ButtonProps, Layer, LayerId, LayerKind, Scene, Size, SizeConfig, Styles, VideoControl};

use crate::fonts::{FontProvider, GoogleFonts};
use crate::timing::{self, CycleTiming, KeyframeState, LoopCount};
use crate::values::{self, length_text};

const RESET_CSS: &str = "\
*, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
html, body { width: 100%; height: 100%; overflow: hidden; background: transparent; }
.ad-root { position: relative; overflow: hidden; }
.ad-layer { position: absolute; display: block; }
.ad-button { display: flex; align-items: center; justify-content: center; gap: 0.25em; border: 0; background: none; font: inherit; color: inherit; cursor: pointer; text-decoration: none; }
.ad-icon { display: inline-flex; }
.ad-icon > svg { width: 100%; height: 100%; }
img.ad-layer, video.ad-layer { object-fit: cover; }
";

const BOOTSTRAP_JS: &str = r"(function () {
  function swapIcon(button, video) {
    if (!button.hasAttribute('data-pause-icon')) return;
    var icon = button.querySelector('.ad-icon');
    if (!icon) return;
    icon.innerHTML = button.getAttribute(video.paused ? 'data-play-icon' : 'data-pause-icon');
  }
  window.adControl = function (button, id, action) {
    var video = document.getElementById(id);
    if (!video || typeof video.play !== 'function') return;
    if (action === 'play') {
      video.play();
    } else if (action === 'pause') {
      video.pause();
    } else if (action === 'restart') {
      video.currentTime = 0;
      video.play();
    } else if (action === 'togglePlayPause') {
      if (video.paused) video.play(); else video.pause();
    }
    swapIcon(button, video);
  };
  window.addEventListener('load', function () {
    var lead = null;
    var animated = document.querySelectorAll('[data-ad-animated]');
    for (var i = 0; i < animated.length; i++) {
      var computed = getComputedStyle(animated[i]);
      var value = computed.getPropertyValue('--ad-animation').trim();
      if (!value || value === 'none' || computed.display === 'none') continue;
      animated[i].style.animation = value;
      if (!lead) lead = animated[i];
    }
    if (!lead) return;
    var leadName = null;
    lead.addEventListener('animationiteration', function (event) {
      if (leadName === null) leadName = event.animationName;
      if (event.animationName !== leadName) return;
      var videos = document.querySelectorAll('video');
      for (var j = 0; j < videos.length; j++) {
        videos[j].currentTime = 0;
        var played = videos[j].play();
        if (played && played.catch) played.catch(function () {});
      }
    });
  });
})();
";

/// Document-wide compile settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileOptions {
    pub loop_count: LoopCount,
}

/// Compile `scene` for `sizes`, linking web fonts from Google Fonts.
#[must_use]
pub fn compile(scene: &Scene, sizes: &[Size], options: &CompileOptions) -> String {
    compile_with(scene, sizes, options, &GoogleFonts)
}

/// Compile `scene` for `sizes` with an explicit font provider.
///
/// Sizes are processed in the given order with duplicates dropped; the first
/// one is the base size.
#[must_use]
pub fn compile_with(scene: &Scene, sizes: &[Size], options: &CompileOptions, fonts: &dyn FontProvider) -> String {
    let mut seen = BTreeSet::new();
    let sizes: Vec<Size> = sizes.iter().copied().filter(|s| seen.insert(*s)).collect();
    let ids = ElementIds::new(scene);

    // Bottom-most first, so document order is paint order.
    let layers: Vec<&Layer> = scene.layers().iter().rev().collect();

    let mut css = String::from(RESET_CSS);
    for &layer in &layers {
        css.push_str(&shared_rule(layer));
    }

    let animated_by_layer: Vec<BTreeSet<String>> = layers.iter().map(|&l| animated_properties(l)).collect();
    let mut keyframes = Vec::new();
    for (index, size) in sizes.iter().enumerate() {
        let mut block = format!(".ad-root {{ width: {}px; height: {}px; }}\n", size.width, size.height);
        for (&layer, animated) in layers.iter().zip(&animated_by_layer) {
            match layer.config(*size) {
                Some(config) => {
                    let sized = SizedLayer { scene, layer, size: *size, config, animated, loop_count: options.loop_count };
                    block.push_str(&sized.rules(&mut keyframes));
                }
                None if animated.is_empty() => block.push_str(&format!("{} {{ display: none; }}\n", class_selector(layer))),
                None => block.push_str(&format!("{} {{ display: none; --ad-animation: none; }}\n", class_selector(layer))),
            }
        }
        if index == 0 {
            css.push_str(&block);
        } else {
            css.push_str(&format!(
                "@media (min-width: {}px) and (min-height: {}px) {{\n{}}}\n",
                size.width,
                size.height,
                indent(&block)
            ));
        }
    }
    for block in &keyframes {
        css.push_str(block);
    }

    let families: Vec<String> = layers.iter().filter_map(|l| l.styles.font_family.clone()).collect();
    let font_link = fonts.stylesheet_href(&families);

    let mut markup = String::new();
    for &layer in &layers {
        markup.push_str(&element(layer, &ids));
        markup.push('\n');
    }

    tracing::debug!(layers = layers.len(), sizes = sizes.len(), keyframes = keyframes.len(), "scene compiled");

    let mut doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    doc.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    doc.push_str(&format!("<title>{}</title>\n", escape_html(&scene.name)));
    if let Some(href) = font_link {
        doc.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\">\n", escape_html(&href)));
    }
    doc.push_str(&format!("<style>\n{css}</style>\n</head>\n<body>\n<div class=\"ad-root\">\n{markup}</div>\n"));
    doc.push_str(&format!("<script>\n{BOOTSTRAP_JS}</script>\n</body>\n</html>\n"));
    doc
}

// =============================================================
// Element ids
// =============================================================

/// Element id of every layer in the document, with lookup for button
/// targets by layer id or export id.
struct ElementIds {
    by_layer: HashMap<LayerId, String>,
    by_export: HashMap<String, String>,
}

impl ElementIds {
    fn new(scene: &Scene) -> Self {
        let mut by_layer = HashMap::new();
        let mut by_export = HashMap::new();
        for layer in scene.layers() {
            let id = element_id(layer);
            if let Some(export) = &layer.attributes.id {
                by_export.entry(export.clone()).or_insert_with(|| id.clone());
            }
            by_layer.insert(layer.id, id);
        }
        Self { by_layer, by_export }
    }

    fn get(&self, id: &LayerId) -> String {
        self.by_layer.get(id).cloned().unwrap_or_else(|| format!("layer-{}", id.simple()))
    }

    /// Element id for a button target. Unknown targets pass through so the
    /// runtime lookup fails quietly.
    fn resolve_target(&self, target: &str) -> String {
        if let Ok(id) = LayerId::parse_str(target) {
            if let Some(element) = self.by_layer.get(&id) {
                return element.clone();
            }
        }
        self.by_export.get(target).cloned().unwrap_or_else(|| target.to_owned())
    }
}

/// The layer's export id if set, else a generated one.
#[must_use]
pub fn element_id(layer: &Layer) -> String {
    match &layer.attributes.id {
        Some(id) => id.clone(),
        None => format!("layer-{}", layer.id.simple()),
    }
}

/// Class every rule for `layer` targets. Always a valid CSS identifier, even
/// when the export id is not.
fn layer_class(layer: &Layer) -> String {
    format!("ad-{}", layer.id.simple())
}

fn class_selector(layer: &Layer) -> String {
    format!(".{}", layer_class(layer))
}

// =============================================================
// Stylesheet
// =============================================================

/// Size-independent declarations as `(property, value)` pairs.
fn shared_declarations(layer: &Layer) -> Vec<(&'static str, String)> {
    let Styles { color, background_color, opacity, object_fit, text_align, font_family } = &layer.styles;
    [
        ("color", color.clone()),
        ("background-color", background_color.clone()),
        ("opacity", (*opacity).filter(|o| o.is_finite()).map(|o| o.clamp(0.0, 1.0).to_string())),
        ("object-fit", object_fit.clone()),
        ("text-align", text_align.clone()),
        ("font-family", font_family.clone()),
    ]
    .into_iter()
    .filter_map(|(property, value)| Some((property, css_value(value.as_deref()?)?.to_owned())))
    .collect()
}

/// Size-independent style rule.
fn shared_rule(layer: &Layer) -> String {
    let decls: Vec<String> =
        shared_declarations(layer).into_iter().map(|(property, value)| format!("{property}: {value};")).collect();
    if decls.is_empty() {
        return String::new();
    }
    format!("{} {{ {} }}\n", class_selector(layer), decls.join(" "))
}

/// Every CSS property the layer animates at any size.
fn animated_properties(layer: &Layer) -> BTreeSet<String> {
    layer.sizes.values().flat_map(|c| &c.animations).map(|a| values::resolve(a).property).collect()
}

/// Value `property` takes when no animation at the current size holds it:
/// the shared style if one is set, else the cascade default.
fn rest_value(layer: &Layer, property: &str) -> String {
    shared_declarations(layer)
        .into_iter()
        .find(|(p, _)| *p == property)
        .map_or_else(|| "unset".to_owned(), |(_, value)| value)
}

/// A layer at one size with an existing config.
struct SizedLayer<'a> {
    scene: &'a Scene,
    layer: &'a Layer,
    size: Size,
    config: &'a SizeConfig,
    /// Properties animated at any size; each one is restated at every size.
    animated: &'a BTreeSet<String>,
    loop_count: LoopCount,
}

impl SizedLayer<'_> {
    /// Position, size and animation rules; pushes one `@keyframes` block per
    /// animation onto `keyframes`.
    fn rules(&self, keyframes: &mut Vec<String>) -> String {
        let config = self.config;
        let px = |length| length_text(length).unwrap_or_else(|| "0px".to_owned());
        let display = if matches!(self.layer.kind, LayerKind::Button(_)) { "flex" } else { "block" };

        let mut decls = vec![
            format!("display: {display};"),
            format!("left: {};", px(config.position_x)),
            format!("top: {};", px(config.position_y)),
            format!("width: {};", px(config.width)),
            format!("height: {};", px(config.height)),
        ];
        if let Some(font_size) = config.font_size.filter(|f| f.is_finite()) {
            decls.push(format!("font-size: {font_size}px;"));
        }
        if let Some(radius) = config.border_radius.and_then(border_radius) {
            decls.push(format!("border-radius: {radius};"));
        }

        let mut shorthands = Vec::new();
        let mut held = BTreeSet::new();
        for (index, animation) in config.animations.iter().enumerate() {
            let name = format!("{}-{}-{index}", layer_class(self.layer), self.size);
            let animated = values::resolve(animation);
            if held.insert(animated.property.clone()) {
                decls.push(format!("{}: {};", animated.property, animated.from));
            }
            shorthands.push(self.shorthand(&name, animation.delay.as_ms(), animation.duration.as_ms(), &animation.easing));
            keyframes.push(self.keyframes(&name, animation.delay.as_ms(), animation.duration.as_ms(), &animated));
        }
        for property in self.animated.difference(&held) {
            decls.push(format!("{property}: {};", rest_value(self.layer, property)));
        }
        if !shorthands.is_empty() {
            decls.push(format!("--ad-animation: {};", shorthands.join(", ")));
        } else if !self.animated.is_empty() {
            decls.push("--ad-animation: none;".to_owned());
        }

        let selector = class_selector(self.layer);
        let mut out = format!("{selector} {{ {} }}\n", decls.join(" "));
        if let Some(icon) = config.icon_size.filter(|s| s.is_finite()) {
            out.push_str(&format!("{selector} .ad-icon {{ width: {icon}px; height: {icon}px; }}\n"));
        }
        out
    }

    fn cycle(&self) -> CycleTiming {
        CycleTiming::resolve(self.config, &self.scene.animation_defaults)
    }

    fn shorthand(&self, name: &str, delay_ms: f64, duration_ms: f64, easing: &str) -> String {
        let easing = css_value(easing).filter(|e| !e.is_empty()).unwrap_or("ease");
        let cycle = self.cycle();
        if timing::loops(cycle, self.loop_count) {
            let count = self.loop_count.iteration_count();
            format!("{name} {}ms {easing} 0ms {count} both", cycle.cycle_ms())
        } else {
            format!("{name} {duration_ms}ms {easing} {delay_ms}ms 1 both")
        }
    }

    fn keyframes(&self, name: &str, delay_ms: f64, duration_ms: f64, animated: &values::AnimatedProperty) -> String {
        let stops = timing::keyframe_offsets(delay_ms, duration_ms, self.cycle(), self.loop_count);
        let mut out = format!("@keyframes {name} {{\n");
        for stop in stops {
            let value = match stop.state {
                KeyframeState::From => &animated.from,
                KeyframeState::To => &animated.to,
            };
            out.push_str(&format!(
                "  {}% {{ {}: {value}; }}\n",
                timing::format_percent(stop.offset_percent),
                animated.property
            ));
        }
        out.push_str("}\n");
        out
    }
}

fn border_radius(radius: BorderRadius) -> Option<String> {
    let px = |r: f64| r.is_finite().then(|| format!("{r}px"));
    match radius {
        BorderRadius::Uniform(r) => px(r),
        BorderRadius::Corners { top_left, top_right, bottom_right, bottom_left } => {
            Some(format!("{} {} {} {}", px(top_left)?, px(top_right)?, px(bottom_right)?, px(bottom_left)?))
        }
    }
}

/// A user-supplied CSS value, or `None` if it could break out of its
/// declaration.
fn css_value(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.contains([';', '{', '}', '<', '>'])).then_some(value)
}

fn indent(block: &str) -> String {
    block.lines().map(|line| format!("  {line}\n")).collect()
}

// =============================================================
// Markup
// =============================================================

fn element(layer: &Layer, ids: &ElementIds) -> String {
    let id = escape_html(&ids.get(&layer.id));
    let animated = layer.sizes.values().any(|c| !c.animations.is_empty());
    let flag = if animated { " data-ad-animated" } else { "" };
    let class = layer_class(layer);

    match &layer.kind {
        LayerKind::Text { text } => format!("<div id=\"{id}\" class=\"ad-layer {class}\"{flag}>{text}</div>"),
        LayerKind::RichText { html } => format!("<div id=\"{id}\" class=\"ad-layer {class}\"{flag}>{html}</div>"),
        LayerKind::Image { url, alt } => format!(
            "<img id=\"{id}\" class=\"ad-layer {class}\"{flag} src=\"{}\" alt=\"{}\">",
            escape_html(url),
            escape_html(alt)
        ),
        LayerKind::Video { url, autoplay, controls, muted, looping } => {
            let flags: String = [(*autoplay, " autoplay"), (*controls, " controls"), (*muted, " muted"), (*looping, " loop")]
                .into_iter()
                .filter_map(|(on, attr)| on.then_some(attr))
                .collect();
            format!(
                "<video id=\"{id}\" class=\"ad-layer {class}\"{flag} src=\"{}\" playsinline{flags}></video>",
                escape_html(url)
            )
        }
        LayerKind::Button(props) => button(props, &id, &class, flag, ids),
    }
}

fn button(props: &ButtonProps, id: &str, class: &str, flag: &str, ids: &ElementIds) -> String {
    let mut content = String::new();
    if let Some(icon) = &props.icon {
        content.push_str(&format!("<span class=\"ad-icon\">{}</span>", icon.play));
    }
    if !props.text.is_empty() {
        content.push_str(&format!("<span class=\"ad-label\">{}</span>", escape_html(&props.text)));
    }
    let attrs = format!("id=\"{id}\" class=\"ad-layer ad-button {class}\"{flag}");

    match &props.action {
        ButtonAction::Link { url, new_tab } => {
            let target = if *new_tab { " target=\"_blank\" rel=\"noopener noreferrer\"" } else { "" };
            format!("<a {attrs} href=\"{}\"{target}>{content}</a>", escape_html(url))
        }
        ButtonAction::VideoControl { target_element_id, control } => {
            let target = ids.resolve_target(target_element_id);
            let handler = format!("adControl(this, {}, {})", js_string(&target), js_string(control_name(*control)));
            let icons = match &props.icon {
                Some(icon) => match &icon.pause {
                    Some(pause) => {
                        format!(" data-play-icon=\"{}\" data-pause-icon=\"{}\"", escape_html(&icon.play), escape_html(pause))
                    }
                    None => String::new(),
                },
                None => String::new(),
            };
            format!("<button type=\"button\" {attrs} onclick=\"{}\"{icons}>{content}</button>", escape_html(&handler))
        }
    }
}

fn control_name(control: VideoControl) -> &'static str {
    match control {
        VideoControl::Play => "play",
        VideoControl::Pause => "pause",
        VideoControl::Restart => "restart",
        VideoControl::TogglePlayPause => "togglePlayPause",
    }
}

/// A JavaScript string literal for `value`.
fn js_string(value: &str) -> String {
    match serde_json::to_string(value) {
        Ok(literal) => literal,
        Err(_) => "\"\"".to_owned(),
    }
}

/// Escape text for use in HTML content or a double- or single-quoted
/// attribute.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

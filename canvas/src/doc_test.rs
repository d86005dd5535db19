#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn banner() -> Size {
    Size::new(300, 250)
}

fn leaderboard() -> Size {
    Size::new(728, 90)
}

fn text(s: &str) -> LayerKind {
    LayerKind::Text { text: s.to_owned() }
}

// =============================================================
// Size
// =============================================================

#[test]
fn size_parses_and_displays() {
    let size: Size = "300x250".parse().unwrap();
    assert_eq!(size, banner());
    assert_eq!(size.to_string(), "300x250");
}

#[test]
fn size_rejects_garbage() {
    for raw in ["300", "x250", "0x250", "abcxdef", ""] {
        assert!(raw.parse::<Size>().is_err(), "{raw}");
    }
}

#[test]
fn size_serializes_as_string() {
    assert_eq!(serde_json::to_value(banner()).unwrap(), json!("300x250"));
}

// =============================================================
// Values
// =============================================================

#[test]
fn length_resolves_percent_against_extent() {
    assert_eq!(Length::percent(50.0).resolve(300.0), 150.0);
    assert_eq!(Length::px(12.0).resolve(300.0), 12.0);
}

#[test]
fn length_unit_serde() {
    assert_eq!(serde_json::to_value(Length::percent(5.0)).unwrap(), json!({ "value": 5.0, "unit": "%" }));
    let back: Length = serde_json::from_value(json!({ "value": 7 })).unwrap();
    assert_eq!(back, Length::px(7.0));
}

#[test]
fn time_value_normalizes_to_ms() {
    assert_eq!(TimeValue::secs(0.3).as_ms(), 300.0);
    assert_eq!(TimeValue::ms(250.0).as_ms(), 250.0);
    assert_eq!(TimeValue::ms(-5.0).as_ms(), 0.0);
    assert_eq!(TimeValue::ms(f64::NAN).as_ms(), 0.0);
}

#[test]
fn border_radius_accepts_both_shapes() {
    let uniform: BorderRadius = serde_json::from_value(json!(8)).unwrap();
    assert_eq!(uniform, BorderRadius::Uniform(8.0));
    let corners: BorderRadius =
        serde_json::from_value(json!({ "topLeft": 1, "topRight": 2, "bottomRight": 3, "bottomLeft": 4 })).unwrap();
    assert_eq!(corners, BorderRadius::Corners { top_left: 1.0, top_right: 2.0, bottom_right: 3.0, bottom_left: 4.0 });
}

// =============================================================
// Layer serde
// =============================================================

#[test]
fn layer_deserializes_from_editor_json() {
    let raw = json!({
        "id": "6f1c1a52-4f61-4a65-9d3c-0b3c8e3d7a10",
        "label": "Headline",
        "type": "text",
        "text": "Big Sale",
        "aspectRatioLocked": true,
        "attributes": { "id": "headline" },
        "styles": { "color": "#fff", "opacity": 0.5 },
        "sizes": {
            "300x250": {
                "positionX": { "value": 10, "unit": "%" },
                "positionY": { "value": 20, "unit": "px" },
                "width": { "value": 100, "unit": "px" },
                "height": { "value": 40, "unit": "px" },
                "fontSize": 18,
                "animations": [{
                    "id": "a1",
                    "name": "Fade",
                    "type": "fadeIn",
                    "duration": { "value": 0.3, "unit": "s" },
                    "delay": { "value": 0, "unit": "ms" },
                    "easing": "ease-out"
                }]
            }
        }
    });
    let layer: Layer = serde_json::from_value(raw).unwrap();
    assert_eq!(layer.kind, text("Big Sale"));
    assert!(layer.aspect_ratio_locked);
    assert_eq!(layer.attributes.id.as_deref(), Some("headline"));
    assert_eq!(layer.styles.opacity, Some(0.5));
    let config = layer.config(banner()).unwrap();
    assert_eq!(config.position_x, Length::percent(10.0));
    assert_eq!(config.font_size, Some(18.0));
    assert_eq!(config.animations[0].kind, AnimationType::FadeIn);
    assert_eq!(config.animations[0].duration.as_ms(), 300.0);
    assert!(layer.config(leaderboard()).is_none());
}

#[test]
fn malformed_animation_endpoints_become_absent() {
    let raw = json!({ "type": "scale", "from": true, "to": { "value": 2 } });
    let anim: Animation = serde_json::from_value(raw).unwrap();
    assert_eq!(anim.from, None);
    assert_eq!(anim.to, Some(AnimationValue::Length(Length::px(2.0))));
    assert_eq!(anim.easing, "ease");
}

#[test]
fn unknown_animation_type_is_custom() {
    let anim: Animation = serde_json::from_value(json!({ "type": "wobble" })).unwrap();
    assert_eq!(anim.kind, AnimationType::Custom);
}

#[test]
fn button_video_control_roundtrips_tag_names() {
    let kind = LayerKind::Button(ButtonProps {
        text: "Play".into(),
        icon: None,
        action: ButtonAction::VideoControl { target_element_id: "hero".into(), control: VideoControl::TogglePlayPause },
    });
    let value = serde_json::to_value(&kind).unwrap();
    assert_eq!(value["type"], "button");
    assert_eq!(value["action"]["type"], "videoControl");
    assert_eq!(value["action"]["targetElementId"], "hero");
    assert_eq!(value["action"]["control"], "togglePlayPause");
}

#[test]
fn richtext_tag_is_lowercase() {
    let value = serde_json::to_value(LayerKind::RichText { html: "<b>x</b>".into() }).unwrap();
    assert_eq!(value["type"], "richtext");
}

// =============================================================
// Scene: sizes and layers
// =============================================================

#[test]
fn new_scene_dedupes_sizes() {
    let scene = Scene::new("s", [banner(), banner(), leaderboard()]);
    assert_eq!(scene.sizes(), &[banner(), leaderboard()]);
}

#[test]
fn insert_layer_populates_every_size_and_goes_on_top() {
    let mut scene = Scene::new("s", [banner(), leaderboard()]);
    let first = scene.insert_layer("a", text("a"));
    let second = scene.insert_layer("b", text("b"));
    assert_eq!(scene.layers()[0].id, second);
    assert_eq!(scene.layers()[1].id, first);
    for size in [banner(), leaderboard()] {
        assert!(scene.size_config(&first, size).is_some());
    }
}

#[test]
fn default_config_is_centered() {
    let config = SizeConfig::default_for(banner());
    let rect = config.geometry().resolve(banner());
    assert_eq!(rect, Rect::new(100.0, 100.0, 100.0, 50.0));
}

#[test]
fn default_config_fits_small_sizes() {
    let rect = SizeConfig::default_for(Size::new(80, 20)).geometry().resolve(Size::new(80, 20));
    assert_eq!(rect, Rect::new(0.0, 0.0, 80.0, 20.0));
}

#[test]
fn remove_layer_does_not_cascade() {
    let mut scene = Scene::new("s", [banner()]);
    let video = scene.insert_layer("v", LayerKind::Video { url: "v.mp4".into(), autoplay: true, controls: false, muted: true, looping: false });
    let button = scene.insert_layer(
        "b",
        LayerKind::Button(ButtonProps {
            text: "Play".into(),
            icon: None,
            action: ButtonAction::VideoControl { target_element_id: video.to_string(), control: VideoControl::Play },
        }),
    );
    assert!(scene.remove_layer(&video).is_some());
    assert!(scene.remove_layer(&video).is_none());
    let LayerKind::Button(props) = &scene.layer(&button).unwrap().kind else {
        panic!("expected button");
    };
    assert!(matches!(&props.action, ButtonAction::VideoControl { target_element_id, .. } if *target_element_id == video.to_string()));
}

#[test]
fn push_layer_rejects_duplicates() {
    let mut scene = Scene::new("s", [banner()]);
    let layer = Layer::new("a", text("a"));
    scene.push_layer(layer.clone()).unwrap();
    assert_eq!(scene.push_layer(layer.clone()), Err(SceneError::DuplicateLayerId(layer.id)));
}

#[test]
fn move_layer_reorders_and_clamps() {
    let mut scene = Scene::new("s", [banner()]);
    let a = scene.insert_layer("a", text("a"));
    let b = scene.insert_layer("b", text("b"));
    let c = scene.insert_layer("c", text("c"));
    scene.move_layer(&c, 99).unwrap();
    let order: Vec<LayerId> = scene.layers().iter().map(|l| l.id).collect();
    assert_eq!(order, vec![b, a, c]);
}

#[test]
fn remove_size_drops_configs() {
    let mut scene = Scene::new("s", [banner(), leaderboard()]);
    let id = scene.insert_layer("a", text("a"));
    scene.remove_size(leaderboard()).unwrap();
    assert!(scene.size_config(&id, leaderboard()).is_none());
    assert_eq!(scene.remove_size(leaderboard()), Err(SceneError::UnknownSize(leaderboard())));
}

#[test]
fn added_size_leaves_existing_layers_hidden() {
    let mut scene = Scene::new("s", [banner()]);
    let id = scene.insert_layer("a", text("a"));
    assert!(scene.add_size(leaderboard()));
    assert!(!scene.add_size(leaderboard()));
    assert!(scene.size_config(&id, leaderboard()).is_none());
}

// =============================================================
// Scene: geometry and field writes
// =============================================================

#[test]
fn set_geometry_replaces_position_and_size() {
    let mut scene = Scene::new("s", [banner()]);
    let id = scene.insert_layer("a", text("a"));
    let geometry = Geometry::from_rect(Rect::new(1.0, 2.0, 3.0, 4.0));
    scene.set_geometry(&id, banner(), geometry).unwrap();
    assert_eq!(scene.resolve_rect(&id, banner()), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
}

#[test]
fn set_geometry_rejects_unknown_size_and_nan() {
    let mut scene = Scene::new("s", [banner()]);
    let id = scene.insert_layer("a", text("a"));
    let ok = Geometry::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(scene.set_geometry(&id, leaderboard(), ok), Err(SceneError::UnknownSize(leaderboard())));
    let nan = Geometry::from_rect(Rect::new(f64::NAN, 0.0, 10.0, 10.0));
    assert!(matches!(scene.set_geometry(&id, banner(), nan), Err(SceneError::NonFiniteGeometry { .. })));
}

#[test]
fn resolve_rect_uses_size_dimensions_for_percent() {
    let mut scene = Scene::new("s", [banner()]);
    let id = scene.insert_layer("a", text("a"));
    let geometry = Geometry {
        x: Length::percent(10.0),
        y: Length::percent(20.0),
        width: Length::percent(50.0),
        height: Length::percent(40.0),
    };
    scene.set_geometry(&id, banner(), geometry).unwrap();
    assert_eq!(scene.resolve_rect(&id, banner()), Some(Rect::new(30.0, 50.0, 150.0, 100.0)));
}

#[test]
fn update_layer_cannot_change_id() {
    let mut scene = Scene::new("s", [banner()]);
    let id = scene.insert_layer("a", text("a"));
    scene
        .update_layer(&id, |l| {
            l.id = Uuid::new_v4();
            l.label = "renamed".into();
        })
        .unwrap();
    assert_eq!(scene.layer(&id).unwrap().label, "renamed");
}

// =============================================================
// Export ids
// =============================================================

#[test]
fn export_id_rules() {
    assert!(is_valid_export_id("cta"));
    assert!(is_valid_export_id("hero-video_2"));
    assert!(!is_valid_export_id(""));
    assert!(!is_valid_export_id("2fast"));
    assert!(!is_valid_export_id("two words"));
}

#[test]
fn set_export_id_rejects_duplicates_and_invalid() {
    let mut scene = Scene::new("s", [banner()]);
    let a = scene.insert_layer("a", text("a"));
    let b = scene.insert_layer("b", text("b"));
    scene.set_export_id(&a, Some("cta".into())).unwrap();
    assert_eq!(scene.set_export_id(&b, Some("cta".into())), Err(SceneError::DuplicateExportId("cta".into())));
    assert_eq!(scene.set_export_id(&b, Some("9lives".into())), Err(SceneError::InvalidExportId("9lives".into())));
    // Re-setting the owner's own id is fine.
    scene.set_export_id(&a, Some("cta".into())).unwrap();
    scene.set_export_id(&a, None).unwrap();
    scene.set_export_id(&b, Some("cta".into())).unwrap();
}

#[test]
fn validate_reports_malformed_loaded_scene() {
    let raw = json!({
        "name": "bad",
        "sizes": ["300x250"],
        "layers": [
            { "id": "6f1c1a52-4f61-4a65-9d3c-0b3c8e3d7a10", "type": "text", "attributes": { "id": "x" } },
            { "id": "7f1c1a52-4f61-4a65-9d3c-0b3c8e3d7a10", "type": "text", "attributes": { "id": "x" } },
            { "id": "8f1c1a52-4f61-4a65-9d3c-0b3c8e3d7a10", "type": "text", "attributes": { "id": "1 bad" } }
        ]
    });
    let scene: Scene = serde_json::from_value(raw).unwrap();
    let errors = scene.validate();
    assert!(errors.contains(&SceneError::DuplicateExportId("x".into())));
    assert!(errors.contains(&SceneError::InvalidExportId("1 bad".into())));
    assert_eq!(errors.len(), 2);
}

#[test]
fn scene_defaults_loop_timing() {
    let scene: Scene = serde_json::from_value(json!({ "name": "s" })).unwrap();
    assert_eq!(scene.animation_defaults.loop_delay.as_ms(), 5000.0);
    assert_eq!(scene.animation_defaults.reset_duration.as_ms(), 1000.0);
}

use super::*;
use canvas::doc::TimeValue;
use serde_json::json;

fn animation(value: serde_json::Value) -> Animation {
    serde_json::from_value(value).unwrap()
}

fn preset(kind: AnimationType) -> Animation {
    Animation::preset(kind, TimeValue::ms(300.0), TimeValue::ms(0.0))
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn preset_defaults() {
    let cases = [
        (AnimationType::FadeIn, "opacity", "0", "1"),
        (AnimationType::Scale, "transform", "scale(0)", "scale(1)"),
        (AnimationType::SlideLeft, "transform", "translateX(100%)", "translateX(0)"),
        (AnimationType::SlideRight, "transform", "translateX(-100%)", "translateX(0)"),
        (AnimationType::SlideUp, "transform", "translateY(100%)", "translateY(0)"),
        (AnimationType::SlideDown, "transform", "translateY(-100%)", "translateY(0)"),
        (AnimationType::Custom, "opacity", "0", "1"),
    ];
    for (kind, property, from, to) in cases {
        let resolved = resolve(&preset(kind));
        assert_eq!(
            resolved,
            AnimatedProperty { property: property.to_owned(), from: from.to_owned(), to: to.to_owned() },
            "{kind:?}"
        );
    }
}

#[test]
fn malformed_endpoints_fall_back_to_defaults() {
    let a = animation(json!({ "type": "fadeIn", "from": [1, 2], "to": { "bogus": true } }));
    let resolved = resolve(&a);
    assert_eq!((resolved.from.as_str(), resolved.to.as_str()), ("0", "1"));
}

#[test]
fn color_on_transform_falls_back() {
    let a = animation(json!({ "type": "slideLeft", "from": "red" }));
    assert_eq!(resolve(&a).from, "translateX(100%)");
}

// =============================================================
// Explicit endpoints
// =============================================================

#[test]
fn unit_values_on_slides() {
    let a = animation(json!({
        "type": "slideUp",
        "from": { "value": 40, "unit": "px" },
        "to": { "value": 0, "unit": "%" }
    }));
    let resolved = resolve(&a);
    assert_eq!(resolved.from, "translateY(40px)");
    assert_eq!(resolved.to, "translateY(0%)");
}

#[test]
fn bare_numbers_are_accepted() {
    let a = animation(json!({ "type": "fadeIn", "from": 0.25, "to": 0.75 }));
    let resolved = resolve(&a);
    assert_eq!((resolved.from.as_str(), resolved.to.as_str()), ("0.25", "0.75"));

    let a = animation(json!({ "type": "slideRight", "from": -20 }));
    assert_eq!(resolve(&a).from, "translateX(-20px)");
}

#[test]
fn percent_opacity_becomes_fraction() {
    let a = animation(json!({ "type": "fadeIn", "from": { "value": 50, "unit": "%" } }));
    assert_eq!(resolve(&a).from, "0.5");
}

#[test]
fn scale_wraps_number() {
    let a = animation(json!({ "type": "scale", "from": { "value": 0.5 }, "to": 1.2 }));
    let resolved = resolve(&a);
    assert_eq!(resolved.from, "scale(0.5)");
    assert_eq!(resolved.to, "scale(1.2)");
}

// =============================================================
// Custom properties
// =============================================================

#[test]
fn custom_property_is_kebab_cased() {
    let a = animation(json!({
        "type": "custom",
        "property": "backgroundColor",
        "from": "#ff0000",
        "to": "rgba(0, 0, 255, 0.5)"
    }));
    let resolved = resolve(&a);
    assert_eq!(resolved.property, "background-color");
    assert_eq!(resolved.from, "#ff0000");
    assert_eq!(resolved.to, "rgba(0, 0, 255, 0.5)");
}

#[test]
fn custom_length_keeps_unit() {
    let a = animation(json!({
        "type": "custom",
        "property": "letterSpacing",
        "from": { "value": 4, "unit": "px" }
    }));
    let resolved = resolve(&a);
    assert_eq!(resolved.property, "letter-spacing");
    assert_eq!(resolved.from, "4px");
    assert_eq!(resolved.to, "1");
}

#[test]
fn blank_custom_property_animates_opacity() {
    let a = animation(json!({ "type": "custom", "property": "  " }));
    assert_eq!(resolve(&a).property, "opacity");
}

#[test]
fn kebab_case_cases() {
    assert_eq!(kebab_case("opacity"), "opacity");
    assert_eq!(kebab_case("borderTopLeftRadius"), "border-top-left-radius");
    assert_eq!(kebab_case("background-color"), "background-color");
}

//! Resolution of an [`Animation`] into a CSS property and two endpoint values.
//!
//! Missing or unusable endpoints never fail the export; each animation type
//! has a default pair it falls back to.

#[cfg(test)]
#[path = "values_test.rs"]
mod values_test;

use canvas::doc::{Animation, AnimationType, AnimationValue, Length, LengthUnit};

/// The CSS property an animation drives and its start/end values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedProperty {
    pub property: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    /// A unitless number such as opacity.
    Scalar,
    /// `transform: scale(n)`.
    Scale,
    /// `transform: translateX(len)`.
    TranslateX,
    /// `transform: translateY(len)`.
    TranslateY,
    /// Any value written as-is under a custom property.
    Raw,
}

/// Resolve the property and endpoints for `animation`.
#[must_use]
pub fn resolve(animation: &Animation) -> AnimatedProperty {
    let (property, shape, from_default, to_default) = match animation.kind {
        AnimationType::FadeIn => ("opacity".to_owned(), Shape::Scalar, "0", "1"),
        AnimationType::Scale => ("transform".to_owned(), Shape::Scale, "scale(0)", "scale(1)"),
        AnimationType::SlideLeft => ("transform".to_owned(), Shape::TranslateX, "translateX(100%)", "translateX(0)"),
        AnimationType::SlideRight => ("transform".to_owned(), Shape::TranslateX, "translateX(-100%)", "translateX(0)"),
        AnimationType::SlideUp => ("transform".to_owned(), Shape::TranslateY, "translateY(100%)", "translateY(0)"),
        AnimationType::SlideDown => ("transform".to_owned(), Shape::TranslateY, "translateY(-100%)", "translateY(0)"),
        AnimationType::Custom => {
            let property = animation.property.as_deref().map(str::trim).filter(|p| !p.is_empty());
            match property {
                Some(p) => (kebab_case(p), Shape::Raw, "0", "1"),
                None => ("opacity".to_owned(), Shape::Scalar, "0", "1"),
            }
        }
    };

    let render = |value: Option<&AnimationValue>, fallback: &str| {
        value.and_then(|v| render_value(v, shape)).unwrap_or_else(|| fallback.to_owned())
    };
    AnimatedProperty {
        property,
        from: render(animation.from.as_ref(), from_default),
        to: render(animation.to.as_ref(), to_default),
    }
}

fn render_value(value: &AnimationValue, shape: Shape) -> Option<String> {
    match (shape, value) {
        (Shape::Scalar | Shape::Scale, AnimationValue::Length(length)) => {
            Some(wrap(shape, &number(scalar(*length))?))
        }
        (Shape::Scalar | Shape::Scale, AnimationValue::Number(n)) => Some(wrap(shape, &number(*n)?)),
        (Shape::TranslateX | Shape::TranslateY | Shape::Raw, AnimationValue::Length(length)) => {
            Some(wrap(shape, &length_text(*length)?))
        }
        (Shape::TranslateX | Shape::TranslateY, AnimationValue::Number(n)) => Some(wrap(shape, &format!("{}px", number(*n)?))),
        (Shape::Raw, AnimationValue::Number(n)) => number(*n),
        (Shape::Raw, AnimationValue::Color(text)) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_owned())
        }
        (_, AnimationValue::Color(_)) => None,
    }
}

fn wrap(shape: Shape, inner: &str) -> String {
    match shape {
        Shape::Scalar | Shape::Raw => inner.to_owned(),
        Shape::Scale => format!("scale({inner})"),
        Shape::TranslateX => format!("translateX({inner})"),
        Shape::TranslateY => format!("translateY({inner})"),
    }
}

/// Unitless value of a length used where only a number makes sense:
/// percentages become fractions, pixels are taken as-is.
fn scalar(length: Length) -> f64 {
    match length.unit {
        LengthUnit::Px => length.value,
        LengthUnit::Percent => length.value / 100.0,
    }
}

fn number(value: f64) -> Option<String> {
    value.is_finite().then(|| value.to_string())
}

/// A length as CSS text, e.g. `12px` or `50%`.
#[must_use]
pub fn length_text(length: Length) -> Option<String> {
    number(length.value).map(|n| format!("{n}{}", length.unit.suffix()))
}

/// `backgroundColor` → `background-color`. Already-kebab names pass through.
#[must_use]
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

//! Static-document export for ad creatives.
//!
//! Turns a [`canvas::doc::Scene`] into one self-contained HTML document that
//! renders every requested ad size through CSS media queries. Looping
//! animations are expressed purely as `@keyframes` so the document needs no
//! timers.
//!
//! | Module | Role |
//! |--------|------|
//! | [`compile`] | Document builder ([`compile::compile`]) |
//! | [`timing`] | Loop count and keyframe offset math |
//! | [`values`] | Animated CSS property and endpoint resolution |
//! | [`fonts`] | Web-font stylesheet providers |

pub mod compile;
pub mod fonts;
pub mod timing;
pub mod values;

pub use compile::{CompileOptions, compile, compile_with};
pub use timing::LoopCount;

//! Scene model and interactive transform engine for multi-size ad creatives.
//!
//! A creative is a [`doc::Scene`]: an ordered stack of layers, each carrying
//! independent geometry for every ad size it supports. This crate owns the
//! editing side of that model: turning pointer gestures into constrained,
//! snapped geometry updates. The host wires DOM events to the engine and
//! records each [`engine::Action::Commit`] in its history.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Transform engine ([`engine::EngineCore`]) |
//! | [`doc`] | Scene, layers, per-size configuration |
//! | [`snap`] | Alignment solver and guide lines |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against layers and resize handles |
//! | [`consts`] | Shared numeric constants (snap threshold, minimum sizes, etc.) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod snap;

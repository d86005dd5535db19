//! Shared numeric constants for the canvas crate.

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width or height an interactive resize may produce, in canvas units.
pub const MIN_LAYER_SIZE: f64 = 30.0;

/// Default width of a newly inserted layer, in canvas units.
pub const DEFAULT_LAYER_WIDTH: f64 = 100.0;

/// Default height of a newly inserted layer, in canvas units.
pub const DEFAULT_LAYER_HEIGHT: f64 = 50.0;

// ── Snapping ────────────────────────────────────────────────────

/// Distance in canvas units within which a moving edge snaps to a candidate.
pub const SNAP_THRESHOLD: f64 = 8.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Camera ──────────────────────────────────────────────────────

/// Zoom limits for the editing view.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 8.0;

// ── Animation defaults ──────────────────────────────────────────

/// Scene-wide loop delay when a size config does not set one, in milliseconds.
pub const DEFAULT_LOOP_DELAY_MS: f64 = 5000.0;

/// Scene-wide reset duration when a size config does not set one, in milliseconds.
pub const DEFAULT_RESET_DURATION_MS: f64 = 1000.0;

//! Animation timing: loop counts and cycle-relative keyframe offsets.
//!
//! A looping animation runs over one cycle of `loop_delay + reset_duration`.
//! It holds its start value until its delay elapses, interpolates for its
//! duration, holds the end value until the loop delay is up, then snaps back
//! to the start value just after and holds it through the reset. Because the
//! snap-back is encoded in the keyframes, the browser can loop the animation
//! on its own.

#[cfg(test)]
#[path = "timing_test.rs"]
mod timing_test;

use canvas::doc::{AnimationDefaults, SizeConfig};
use serde::{Deserialize, Serialize};

/// Gap in percent between the held end value and the snap back to the start.
pub const RESET_EPSILON: f64 = 0.01;

/// How many times every animation in the document plays.
///
/// Converts from the integer selector used on the command line: negative
/// means forever, `0` plays once and holds the end value, `n` repeats the
/// full cycle `n` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum LoopCount {
    #[default]
    Infinite,
    Once,
    Times(u32),
}

impl From<i64> for LoopCount {
    fn from(value: i64) -> Self {
        match value {
            v if v < 0 => Self::Infinite,
            0 => Self::Once,
            v => Self::Times(u32::try_from(v).unwrap_or(u32::MAX)),
        }
    }
}

impl From<LoopCount> for i64 {
    fn from(value: LoopCount) -> Self {
        match value {
            LoopCount::Infinite => -1,
            LoopCount::Once => 0,
            LoopCount::Times(n) => i64::from(n),
        }
    }
}

impl LoopCount {
    /// Value for the CSS `animation-iteration-count` slot.
    #[must_use]
    pub fn iteration_count(self) -> String {
        match self {
            Self::Infinite => "infinite".to_owned(),
            Self::Once => "1".to_owned(),
            Self::Times(n) => n.to_string(),
        }
    }
}

/// Loop timing of one layer at one size, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleTiming {
    pub loop_delay_ms: f64,
    pub reset_duration_ms: f64,
}

impl CycleTiming {
    /// Timing from a size config, falling back to the scene defaults for
    /// whichever value the config leaves unset.
    #[must_use]
    pub fn resolve(config: &SizeConfig, defaults: &AnimationDefaults) -> Self {
        Self {
            loop_delay_ms: config.animation_loop_delay.unwrap_or(defaults.loop_delay).as_ms(),
            reset_duration_ms: config.animation_reset_duration.unwrap_or(defaults.reset_duration).as_ms(),
        }
    }

    #[must_use]
    pub fn cycle_ms(&self) -> f64 {
        self.loop_delay_ms + self.reset_duration_ms
    }

    /// Whether a looping keyframe block can be built at all.
    #[must_use]
    pub fn can_loop(&self) -> bool {
        self.cycle_ms() > 0.0
    }
}

/// Which endpoint a keyframe holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyframeState {
    From,
    To,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeStop {
    pub offset_percent: f64,
    pub state: KeyframeState,
}

impl KeyframeStop {
    fn new(offset_percent: f64, state: KeyframeState) -> Self {
        Self { offset_percent, state }
    }
}

/// Whether animations with this timing loop over the cycle, as opposed to
/// playing once and holding the end value.
#[must_use]
pub fn loops(cycle: CycleTiming, loop_count: LoopCount) -> bool {
    loop_count != LoopCount::Once && cycle.can_loop()
}

/// Keyframe stops for an animation with the given delay and duration.
///
/// Looping animations get six stops over the whole cycle; every offset is
/// clamped to `[0, reset start]` so the sequence stays non-decreasing even
/// when the animation overruns the loop delay. [`LoopCount::Once`] and a
/// zero-length cycle produce the plain `0% from, 100% to` shape, timed by
/// the animation's own delay and duration instead.
#[must_use]
pub fn keyframe_offsets(delay_ms: f64, duration_ms: f64, cycle: CycleTiming, loop_count: LoopCount) -> Vec<KeyframeStop> {
    if !loops(cycle, loop_count) {
        return vec![KeyframeStop::new(0.0, KeyframeState::From), KeyframeStop::new(100.0, KeyframeState::To)];
    }

    let cycle_ms = cycle.cycle_ms();
    let percent = |ms: f64| 100.0 * ms / cycle_ms;
    let reset_start = percent(cycle.loop_delay_ms).clamp(0.0, 100.0);
    let clamp = |p: f64| p.clamp(0.0, reset_start);

    vec![
        KeyframeStop::new(0.0, KeyframeState::From),
        KeyframeStop::new(clamp(percent(delay_ms)), KeyframeState::From),
        KeyframeStop::new(clamp(percent(delay_ms + duration_ms)), KeyframeState::To),
        KeyframeStop::new(reset_start, KeyframeState::To),
        KeyframeStop::new((reset_start + RESET_EPSILON).min(100.0), KeyframeState::From),
        KeyframeStop::new(100.0, KeyframeState::From),
    ]
}

/// Format a keyframe offset with at most four decimals and no trailing zeros.
#[must_use]
pub fn format_percent(value: f64) -> String {
    let fixed = format!("{value:.4}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" { "0".to_owned() } else { trimmed.to_owned() }
}

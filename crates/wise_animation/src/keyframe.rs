//! Keyframe animations
//!
//! A [`KeyframeTrack`] is an ordered list of timed segments describing one
//! scalar over a repeating loop period. Several tracks that share the same
//! period form a [`KeyframeClip`], sampled from a single elapsed-time clock.
//!
//! Segment kinds:
//! - [`SegmentKind::Linear`] holds the segment's value for its whole duration.
//! - [`SegmentKind::Cubic`] eases in/out from the previous segment's value to
//!   its own, with zero velocity at both ends. Consecutive cubic segments that
//!   change direction therefore peak exactly at the shared keyframe.

use crate::easing::{lerp, Easing};
use crate::error::{AnimationError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::time::Duration;

const NANOS_PER_MS: u128 = 1_000_000;

/// Interpolation used across one segment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Hold the segment value
    #[default]
    Linear,
    /// Ease from the previous value to the segment value
    Cubic,
}

/// One timed entry of a keyframe track
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Value reached (cubic) or held (linear) by this segment
    pub value: f32,
    /// Segment length in milliseconds
    pub duration_ms: u32,
    #[serde(default)]
    pub kind: SegmentKind,
}

impl Segment {
    pub fn linear(value: f32, duration_ms: u32) -> Self {
        Self {
            value,
            duration_ms,
            kind: SegmentKind::Linear,
        }
    }

    pub fn cubic(value: f32, duration_ms: u32) -> Self {
        Self {
            value,
            duration_ms,
            kind: SegmentKind::Cubic,
        }
    }
}

/// How a track behaves where the loop wraps around
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// The first and last segment values must match
    #[default]
    Seamless,
    /// The value may jump at the wrap (e.g. an accumulated rotation)
    Accumulating,
}

/// A validated, looping keyframe track
#[derive(Clone, Debug)]
pub struct KeyframeTrack {
    name: String,
    segments: Vec<Segment>,
    /// Cumulative end time of each segment in milliseconds
    ends_ms: Vec<u64>,
    wrap: WrapMode,
}

impl KeyframeTrack {
    /// Create a new builder
    pub fn builder(name: impl Into<String>) -> KeyframeTrackBuilder {
        KeyframeTrackBuilder::new(name)
    }

    /// Validate and build a track from raw segments
    pub fn new(name: impl Into<String>, segments: Vec<Segment>, wrap: WrapMode) -> Result<Self> {
        let name = name.into();

        if segments.is_empty() {
            return Err(AnimationError::EmptyTrack { track: name });
        }

        let mut ends_ms = Vec::with_capacity(segments.len());
        let mut total = 0u64;
        for (index, segment) in segments.iter().enumerate() {
            if segment.duration_ms == 0 {
                return Err(AnimationError::InvalidDuration { track: name, index });
            }
            if !segment.value.is_finite() {
                return Err(AnimationError::NonFiniteValue { track: name, index });
            }
            total += segment.duration_ms as u64;
            ends_ms.push(total);
        }

        if wrap == WrapMode::Seamless {
            let first = segments[0].value;
            let last = segments[segments.len() - 1].value;
            if (first - last).abs() > f32::EPSILON * first.abs().max(1.0) {
                return Err(AnimationError::Discontinuity {
                    track: name,
                    first,
                    last,
                });
            }
        }

        Ok(Self {
            name,
            segments,
            ends_ms,
            wrap,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap
    }

    /// Loop period in milliseconds (sum of all segment durations)
    pub fn period_ms(&self) -> u64 {
        self.ends_ms.last().copied().unwrap_or(0)
    }

    /// Loop period
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms())
    }

    /// Sample the track at an absolute elapsed time, wrapping by the period
    pub fn sample(&self, elapsed: Duration) -> f32 {
        let period_nanos = self.period_ms() as u128 * NANOS_PER_MS;
        let local_nanos = elapsed.as_nanos() % period_nanos;
        self.sample_local(local_nanos as f64 / NANOS_PER_MS as f64)
    }

    /// Sample at a time within one lap, in milliseconds
    fn sample_local(&self, t_ms: f64) -> f32 {
        // First segment whose end lies strictly after `t_ms`; a boundary
        // instant belongs to the segment that starts there.
        let index = self
            .ends_ms
            .partition_point(|&end| end as f64 <= t_ms)
            .min(self.segments.len() - 1);
        let segment = &self.segments[index];

        match segment.kind {
            SegmentKind::Linear => segment.value,
            SegmentKind::Cubic => {
                let start_ms = if index == 0 {
                    0
                } else {
                    self.ends_ms[index - 1]
                };
                let progress = ((t_ms - start_ms as f64) / segment.duration_ms as f64) as f32;
                let from = self.previous_value(index);
                lerp(from, segment.value, Easing::EaseInOutCubic.apply(progress))
            }
        }
    }

    /// Value in effect just before segment `index` starts
    fn previous_value(&self, index: usize) -> f32 {
        match index {
            0 => self.segments[self.segments.len() - 1].value,
            i => self.segments[i - 1].value,
        }
    }
}

/// Builder for creating keyframe tracks with a fluent API
///
/// # Example
///
/// ```
/// use wise_animation::KeyframeTrack;
///
/// let hop = KeyframeTrack::builder("y")
///     .linear(40.0, 300)
///     .cubic(-200.0, 300)
///     .cubic(40.0, 300)
///     .build()
///     .unwrap();
/// assert_eq!(hop.period_ms(), 900);
/// ```
#[derive(Clone, Debug)]
pub struct KeyframeTrackBuilder {
    name: String,
    segments: Vec<Segment>,
    wrap: WrapMode,
}

impl KeyframeTrackBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            segments: Vec::new(),
            wrap: WrapMode::Seamless,
        }
    }

    /// Hold `value` for `duration_ms`
    pub fn linear(mut self, value: f32, duration_ms: u32) -> Self {
        self.segments.push(Segment::linear(value, duration_ms));
        self
    }

    /// Ease to `value` over `duration_ms`
    pub fn cubic(mut self, value: f32, duration_ms: u32) -> Self {
        self.segments.push(Segment::cubic(value, duration_ms));
        self
    }

    /// Append an already-built segment
    pub fn segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Allow the value to jump where the loop wraps
    pub fn accumulating(mut self) -> Self {
        self.wrap = WrapMode::Accumulating;
        self
    }

    /// Validate and build the track
    pub fn build(self) -> Result<KeyframeTrack> {
        KeyframeTrack::new(self.name, self.segments, self.wrap)
    }
}

/// A set of named tracks driven by one clock
///
/// Construction fails unless every track has the same period, so sampling
/// all tracks at one elapsed time can never drift apart.
#[derive(Clone, Debug)]
pub struct KeyframeClip {
    tracks: Vec<KeyframeTrack>,
    period_ms: u64,
}

impl KeyframeClip {
    pub fn new(tracks: Vec<KeyframeTrack>) -> Result<Self> {
        let Some(first) = tracks.first() else {
            return Err(AnimationError::EmptyClip);
        };
        let period_ms = first.period_ms();

        for (i, track) in tracks.iter().enumerate() {
            if tracks[..i].iter().any(|t| t.name() == track.name()) {
                return Err(AnimationError::DuplicateTrack {
                    track: track.name().to_string(),
                });
            }
            if track.period_ms() != period_ms {
                return Err(AnimationError::PeriodMismatch {
                    track: track.name().to_string(),
                    expected_ms: period_ms,
                    actual_ms: track.period_ms(),
                });
            }
        }

        tracing::debug!(tracks = tracks.len(), period_ms, "keyframe clip ready");
        Ok(Self { tracks, period_ms })
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn tracks(&self) -> &[KeyframeTrack] {
        &self.tracks
    }

    pub fn track(&self, name: &str) -> Option<&KeyframeTrack> {
        self.tracks.iter().find(|t| t.name() == name)
    }

    /// Sample every track, in insertion order
    pub fn sample(&self, elapsed: Duration) -> SmallVec<[f32; 4]> {
        self.tracks.iter().map(|t| t.sample(elapsed)).collect()
    }

    /// Sample a single named track
    pub fn sample_track(&self, name: &str, elapsed: Duration) -> Option<f32> {
        self.track(name).map(|t| t.sample(elapsed))
    }
}

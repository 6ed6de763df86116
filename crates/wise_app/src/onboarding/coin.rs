//! The coin hop loop on the onboarding screen
//!
//! The coin hops between three glass jars: out of the left one, into the
//! middle one, across to the right one and back home with a long hop. One
//! lap is 4.1s on every track.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use wise_animation::{KeyframeClip, KeyframeTrack, Result, Segment, WrapMode};

/// Coin placement at one instant
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CoinTransform {
    pub x: f32,
    pub y: f32,
    pub rotation_deg: f32,
}

/// Raw segment lists for the three coin tracks
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoinTracks {
    pub x: Vec<Segment>,
    pub y: Vec<Segment>,
    pub rotation: Vec<Segment>,
}

impl Default for CoinTracks {
    fn default() -> Self {
        let (l, c) = (Segment::linear, Segment::cubic);
        Self {
            x: vec![
                l(-125.0, 100),
                // first jar → middle jar
                c(-155.0, 100),
                c(8.5, 600),
                c(-5.0, 200),
                l(-5.0, 300),
                // middle jar → right jar
                c(8.5, 200),
                c(146.0, 600),
                c(129.0, 200),
                l(129.0, 300),
                // long hop home
                c(146.0, 200),
                c(-155.0, 800),
                c(-125.0, 200),
                l(-125.0, 300),
            ],
            y: vec![
                l(39.0, 100),
                c(-68.0, 100),
                c(-200.0, 300),
                c(-69.0, 300),
                c(40.0, 200),
                l(40.0, 300),
                c(-69.0, 200),
                c(-200.0, 300),
                c(-69.0, 300),
                c(39.0, 200),
                l(39.0, 300),
                c(-69.0, 200),
                c(-250.0, 400),
                c(-68.0, 400),
                c(39.0, 200),
                l(39.0, 300),
            ],
            rotation: vec![
                l(0.0, 100),
                c(0.0, 100),
                c(360.0, 600),
                c(360.0, 200),
                l(360.0, 300),
                c(360.0, 200),
                c(720.0, 600),
                c(720.0, 200),
                l(720.0, 300),
                c(720.0, 200),
                c(1260.0, 800),
                c(1260.0, 200),
                l(1260.0, 300),
            ],
        }
    }
}

/// Validated coin clip
#[derive(Clone, Debug)]
pub struct CoinClip {
    clip: KeyframeClip,
}

impl CoinClip {
    /// Validate the tracks: x and y must loop seamlessly, rotation may
    /// jump back to its start at the wrap, and all three must share one
    /// period.
    pub fn from_tracks(tracks: &CoinTracks) -> Result<Self> {
        let clip = KeyframeClip::new(vec![
            KeyframeTrack::new("x", tracks.x.clone(), WrapMode::Seamless)?,
            KeyframeTrack::new("y", tracks.y.clone(), WrapMode::Seamless)?,
            KeyframeTrack::new("rotation", tracks.rotation.clone(), WrapMode::Accumulating)?,
        ])?;
        tracing::debug!(period_ms = clip.period().as_millis() as u64, "coin clip ready");
        Ok(Self { clip })
    }

    pub fn standard() -> Result<Self> {
        Self::from_tracks(&CoinTracks::default())
    }

    pub fn period(&self) -> Duration {
        self.clip.period()
    }

    pub fn clip(&self) -> &KeyframeClip {
        &self.clip
    }

    pub fn sample(&self, elapsed: Duration) -> CoinTransform {
        let values = self.clip.sample(elapsed);
        CoinTransform {
            x: values[0],
            y: values[1],
            rotation_deg: values[2],
        }
    }
}

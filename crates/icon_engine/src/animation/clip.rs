//! Keyframed animation clips
//!
//! A clip is a set of tracks, each driving one transform channel of a node
//! addressed by a slash-separated path below the object's root.

use crate::foundation::math::{Quat, Vec3};

/// Values that can be blended between two keyframes
pub trait Interpolate: Sized + Clone {
    /// Blend from `a` to `b` by `t` in `[0, 1]`
    fn interpolate(a: &Self, b: &Self, t: f32) -> Self;
}

impl Interpolate for Vec3 {
    fn interpolate(a: &Self, b: &Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

impl Interpolate for Quat {
    fn interpolate(a: &Self, b: &Self, t: f32) -> Self {
        // Opposite-hemisphere keys have no unique shortest arc; keep the start
        a.try_slerp(b, t, 1e-6).unwrap_or(*a)
    }
}

/// A value at a point in clip time
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe<T> {
    /// Time in seconds from the start of the clip
    pub time: f32,
    /// Value at that time
    pub value: T,
}

impl<T> Keyframe<T> {
    /// Create a keyframe
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// Sample a key list at `time`
///
/// Keys must be sorted by time. Times before the first key or after the last
/// one hold the boundary value; between keys the value is interpolated
/// linearly. Returns `None` for an empty list.
pub fn sample_keys<T: Interpolate>(keys: &[Keyframe<T>], time: f32) -> Option<T> {
    let first = keys.first()?;
    let idx = keys.partition_point(|k| k.time <= time);

    if idx == 0 {
        return Some(first.value.clone());
    }
    if idx >= keys.len() {
        return keys.last().map(|k| k.value.clone());
    }

    let a = &keys[idx - 1];
    let b = &keys[idx];
    let span = b.time - a.time;
    if span <= f32::EPSILON {
        return Some(b.value.clone());
    }
    Some(T::interpolate(&a.value, &b.value, (time - a.time) / span))
}

/// Transform channel driven by a track
#[derive(Debug, Clone, PartialEq)]
pub enum Channel {
    /// Local position keys
    Translation(Vec<Keyframe<Vec3>>),
    /// Local rotation keys, blended with slerp
    Rotation(Vec<Keyframe<Quat>>),
    /// Local scale keys
    Scale(Vec<Keyframe<Vec3>>),
}

impl Channel {
    fn sort(&mut self) {
        fn by_time<T>(keys: &mut [Keyframe<T>]) {
            keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        }
        match self {
            Self::Translation(keys) | Self::Scale(keys) => by_time(keys),
            Self::Rotation(keys) => by_time(keys),
        }
    }
}

/// One animated channel of one node
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTrack {
    /// Path of the target node relative to the root (empty for the root)
    pub target_path: String,
    /// Keyframes of the channel
    pub channel: Channel,
}

impl AnimationTrack {
    /// Create a track, sorting its keys by time
    pub fn new(target_path: impl Into<String>, mut channel: Channel) -> Self {
        channel.sort();
        Self {
            target_path: target_path.into(),
            channel,
        }
    }
}

/// Named collection of tracks sharing a timeline
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Clip name
    pub name: String,
    /// Length of the clip in seconds
    pub duration: f32,
    /// Tracks of the clip
    pub tracks: Vec<AnimationTrack>,
}

impl AnimationClip {
    /// Create an empty clip
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            tracks: Vec::new(),
        }
    }

    /// Add a track
    #[must_use]
    pub fn with_track(mut self, track: AnimationTrack) -> Self {
        self.tracks.push(track);
        self
    }

    /// Clip time for a normalized position
    ///
    /// `normalized_time` is clamped to `[0, 1]`. A zero, negative or
    /// non-finite duration always yields time 0.
    pub fn effective_time(&self, normalized_time: f32) -> f32 {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return 0.0;
        }
        let t = if normalized_time.is_nan() { 0.0 } else { normalized_time.clamp(0.0, 1.0) };
        self.duration * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> Vec<Keyframe<Vec3>> {
        vec![
            Keyframe::new(0.0, Vec3::zeros()),
            Keyframe::new(1.0, Vec3::new(10.0, 0.0, 0.0)),
            Keyframe::new(3.0, Vec3::new(10.0, 20.0, 0.0)),
        ]
    }

    #[test]
    fn test_sample_between_keys() {
        let keys = ramp();
        assert_relative_eq!(sample_keys(&keys, 0.5).unwrap(), Vec3::new(5.0, 0.0, 0.0));
        assert_relative_eq!(sample_keys(&keys, 2.0).unwrap(), Vec3::new(10.0, 10.0, 0.0));
    }

    #[test]
    fn test_sample_clamps_outside_range() {
        let keys = ramp();
        assert_eq!(sample_keys(&keys, -1.0).unwrap(), Vec3::zeros());
        assert_eq!(sample_keys(&keys, 99.0).unwrap(), Vec3::new(10.0, 20.0, 0.0));
        assert!(sample_keys::<Vec3>(&[], 0.0).is_none());
    }

    #[test]
    fn test_rotation_keys_slerp() {
        let keys = vec![
            Keyframe::new(0.0, Quat::identity()),
            Keyframe::new(1.0, Quat::from_axis_angle(&Vec3::y_axis(), 1.0)),
        ];
        let half = sample_keys(&keys, 0.5).unwrap();
        assert_relative_eq!(half.angle(), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_tracks_sort_their_keys() {
        let track = AnimationTrack::new(
            "",
            Channel::Scale(vec![
                Keyframe::new(2.0, Vec3::repeat(2.0)),
                Keyframe::new(0.0, Vec3::repeat(1.0)),
            ]),
        );
        match &track.channel {
            Channel::Scale(keys) => assert_eq!(keys[0].time, 0.0),
            other => panic!("unexpected channel {other:?}"),
        }
    }

    #[test]
    fn test_effective_time() {
        let clip = AnimationClip::new("Walk", 2.0);
        assert_relative_eq!(clip.effective_time(0.5), 1.0);
        assert_relative_eq!(clip.effective_time(1.7), 2.0);
        assert_relative_eq!(clip.effective_time(-0.2), 0.0);

        assert_eq!(AnimationClip::new("Still", 0.0).effective_time(0.5), 0.0);
        assert_eq!(AnimationClip::new("Broken", f32::NAN).effective_time(0.5), 0.0);
        assert_eq!(AnimationClip::new("Reversed", -3.0).effective_time(0.5), 0.0);
    }
}

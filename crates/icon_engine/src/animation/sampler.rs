//! Deterministic pose sampling
//!
//! Poses an instance at one point of a clip before it is measured and
//! rendered. Sampling writes absolute channel values into the local
//! transforms, so applying the same selection twice yields the same pose.

use std::fmt;
use std::sync::Arc;

use crate::animation::clip::{sample_keys, AnimationClip, Channel};
use crate::scene::object::SceneObject;

/// Which clip to sample, and where
#[derive(Debug, Clone, Default)]
pub struct AnimationSelection {
    /// Clip to sample; `None` leaves the instance untouched
    pub clip: Option<Arc<AnimationClip>>,
    /// Position within the clip in `[0, 1]`
    pub normalized_time: f32,
}

impl AnimationSelection {
    /// No animation
    pub fn none() -> Self {
        Self::default()
    }

    /// Sample `clip` at `normalized_time`, clamped to `[0, 1]`
    pub fn at(clip: Arc<AnimationClip>, normalized_time: f32) -> Self {
        Self {
            clip: Some(clip),
            normalized_time: if normalized_time.is_nan() { 0.0 } else { normalized_time.clamp(0.0, 1.0) },
        }
    }
}

/// A track that could not be applied to an instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationWarning {
    /// Clip the track belongs to
    pub clip: String,
    /// Object being posed
    pub object: String,
    /// Node path the track targets
    pub target_path: String,
}

impl fmt::Display for AnimationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "clip '{}' targets missing node '{}' on '{}'",
            self.clip, self.target_path, self.object
        )
    }
}

/// Result of posing an instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseReport {
    /// Clip time that was sampled, if a clip was selected
    pub sampled_time: Option<f32>,
    /// Number of tracks written
    pub applied: usize,
    /// Tracks that were skipped
    pub warnings: Vec<AnimationWarning>,
}

/// Applies animation poses to instances
pub struct AnimationSampler;

impl AnimationSampler {
    /// Pose `instance` according to `selection`
    ///
    /// Tracks targeting nodes the instance does not have are skipped with a
    /// warning; all other tracks still apply.
    pub fn apply_pose(instance: &mut SceneObject, selection: &AnimationSelection) -> PoseReport {
        let Some(clip) = selection.clip.as_deref() else {
            return PoseReport::default();
        };

        let time = clip.effective_time(selection.normalized_time);
        log::trace!("Sampling '{}' on '{}' at t={time}", clip.name, instance.name());

        let mut report = PoseReport {
            sampled_time: Some(time),
            ..PoseReport::default()
        };

        for track in &clip.tracks {
            let Some(node) = instance
                .find_by_path(&track.target_path)
                .and_then(|id| instance.node_mut(id))
            else {
                let warning = AnimationWarning {
                    clip: clip.name.clone(),
                    object: instance.name().to_string(),
                    target_path: track.target_path.clone(),
                };
                log::warn!("{warning}");
                report.warnings.push(warning);
                continue;
            };

            let local = &mut node.local;
            let written = match &track.channel {
                Channel::Translation(keys) => sample_keys(keys, time).map(|v| local.position = v),
                Channel::Rotation(keys) => sample_keys(keys, time).map(|q| local.rotation = q),
                Channel::Scale(keys) => sample_keys(keys, time).map(|v| local.scale = v),
            };
            if written.is_some() {
                report.applied += 1;
            }
        }

        report
    }
}

//! Animation clips and pose sampling

pub mod clip;
pub mod sampler;

pub use clip::{AnimationClip, AnimationTrack, Channel, Interpolate, Keyframe};
pub use sampler::{AnimationSampler, AnimationSelection, AnimationWarning, PoseReport};

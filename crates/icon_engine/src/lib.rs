//! # Icon Engine
//!
//! Batch renderer that turns 3D assets into consistent icon images.
//!
//! ## Features
//!
//! - **Auto-framing**: orthographic camera fitted to each asset's world bounds
//! - **Animation poses**: deterministic sampling of a clip before framing
//! - **Software rendering**: depth-tested rasterization with a fixed key light
//! - **Batch isolation**: one failing asset never stops the rest of the batch
//! - **Preview mode**: quick fixed-size render of the selected asset
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use icon_engine::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let crate_mesh = Arc::new(Mesh::unit_cube());
//!     let assets = vec![IconAsset::from_prototype(SceneObject::with_mesh(
//!         "Crate",
//!         crate_mesh,
//!         Material::new().with_color(0.8, 0.6, 0.3),
//!     ))];
//!
//!     let pipeline = IconBatchPipeline::new(
//!         RenderSettings::with_resolution(256),
//!         AnimationSelection::none(),
//!         "GeneratedIcons",
//!     );
//!     let mut ctx = RenderContext::new();
//!     let report = pipeline.run_batch(&mut ctx, &assets, &mut LogObserver)?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod animation;
pub mod assets;
pub mod config;
pub mod foundation;
pub mod pipeline;
pub mod render;
pub mod scene;

/// Common imports for icon generation
pub mod prelude {
    pub use crate::{
        animation::{AnimationClip, AnimationSampler, AnimationSelection, AnimationTrack, Channel, Keyframe},
        config::{Config, IconGeneratorConfig},
        foundation::math::{Quat, Transform, Vec3},
        pipeline::{
            BatchObserver, BatchProgress, BatchReport, IconBatchPipeline, ItemOutcome, LogObserver,
            NullObserver, PipelineError, PreviewRenderer,
        },
        render::{CameraFramer, Material, Mesh, OffscreenRenderer, RenderContext, RenderSettings},
        scene::{BoundingVolume, BoundsCalculator, IconAsset, SceneObject},
    };
}

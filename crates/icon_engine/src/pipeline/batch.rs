//! # Icon Batch Pipeline
//!
//! Turns an ordered list of assets into one PNG per asset. Each item goes
//! through the same stages:
//!
//! 1. instantiate an ephemeral copy into the render context
//! 2. pose it with the selected animation
//! 3. measure its world bounds
//! 4. frame the camera
//! 5. render offscreen
//! 6. encode PNG
//! 7. write `<destination>/<name>.png`
//!
//! The ephemeral instance is destroyed whatever happens. A failing item is
//! recorded in the [`BatchReport`] and the batch moves on; only invalid
//! settings or an unusable destination abort the run.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::animation::{AnimationSampler, AnimationSelection, AnimationWarning, PoseReport};
use crate::assets::AssetError;
use crate::render::camera::{CameraFramer, CameraPlacement, RenderSettings, SettingsError};
use crate::render::context::RenderContext;
use crate::render::pixel_buffer::{EncodeError, PixelBuffer};
use crate::render::renderer::{OffscreenRenderer, RenderError};
use crate::scene::asset::IconAsset;
use crate::scene::bounds::{BoundingVolume, BoundsCalculator};

/// Errors that abort a whole batch
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Render settings are unusable
    #[error("invalid render settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    /// The destination directory could not be created
    #[error("cannot create destination '{path}': {source}")]
    CreateDestination {
        /// Directory that was requested
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },
}

/// Progress of one item through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    /// Not started
    Pending,
    /// Ephemeral instance exists in the render context
    Instantiated,
    /// Animation pose applied
    Posed,
    /// World bounds computed
    Bounded,
    /// Camera placed
    Framed,
    /// Pixels read back
    Rendered,
    /// PNG bytes produced
    Encoded,
    /// File written
    Written,
    /// Instance destroyed after a successful run
    Succeeded,
    /// Stopped with an error
    Failed,
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Instantiated => "instantiated",
            Self::Posed => "posed",
            Self::Bounded => "bounded",
            Self::Framed => "framed",
            Self::Rendered => "rendered",
            Self::Encoded => "encoded",
            Self::Written => "written",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Cause of an item failure
#[derive(Error, Debug)]
pub enum ItemErrorKind {
    /// The asset could not be instantiated
    #[error(transparent)]
    Asset(#[from] AssetError),
    /// Rendering failed
    #[error(transparent)]
    Render(#[from] RenderError),
    /// PNG encoding failed
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// Writing the file failed
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A failed item and the last state it reached
#[derive(Error, Debug)]
#[error("failed after reaching '{stage}': {kind}")]
pub struct ItemError {
    /// Last state reached before the failure
    pub stage: ItemState,
    /// What went wrong
    #[source]
    pub kind: ItemErrorKind,
}

impl ItemError {
    fn at(stage: ItemState, kind: impl Into<ItemErrorKind>) -> Self {
        Self {
            stage,
            kind: kind.into(),
        }
    }
}

/// Result of one item of a batch
#[derive(Debug)]
pub struct ItemOutcome {
    /// Position of the asset in the input list
    pub index: usize,
    /// Display name of the asset
    pub asset_name: String,
    /// Written file, or why there is none
    pub result: Result<PathBuf, ItemError>,
    /// Recoverable problems met while posing
    pub warnings: Vec<AnimationWarning>,
}

impl ItemOutcome {
    /// Whether the icon was written
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Final state of the item
    pub fn state(&self) -> ItemState {
        if self.is_success() {
            ItemState::Succeeded
        } else {
            ItemState::Failed
        }
    }
}

/// Progress notification sent when an item starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress<'a> {
    /// Zero-based index of the item
    pub current_index: usize,
    /// Number of items in the batch
    pub total_count: usize,
    /// Display name of the asset
    pub asset_name: &'a str,
}

impl BatchProgress<'_> {
    /// Completed fraction before this item, in `[0, 1)`
    pub fn fraction(&self) -> f32 {
        if self.total_count == 0 {
            0.0
        } else {
            self.current_index as f32 / self.total_count as f32
        }
    }
}

/// Receives progress of a batch and may stop it between items
pub trait BatchObserver {
    /// An item is about to be processed
    fn on_item_started(&mut self, progress: BatchProgress<'_>);

    /// Polled before each item; returning `true` stops the batch
    fn should_cancel(&mut self) -> bool {
        false
    }

    /// An item finished, successfully or not
    fn on_item_finished(&mut self, _outcome: &ItemOutcome) {}
}

/// Observer that reports progress through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl BatchObserver for LogObserver {
    fn on_item_started(&mut self, progress: BatchProgress<'_>) {
        log::info!(
            "[{}/{}] Processing {}...",
            progress.current_index + 1,
            progress.total_count,
            progress.asset_name
        );
    }
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl BatchObserver for NullObserver {
    fn on_item_started(&mut self, _progress: BatchProgress<'_>) {}
}

/// Summary of a batch run
#[derive(Debug)]
pub struct BatchReport {
    /// Directory the icons were written to
    pub destination: PathBuf,
    /// Item results in input order
    pub outcomes: Vec<ItemOutcome>,
    /// Whether the observer stopped the batch early
    pub cancelled: bool,
    /// Every animation warning of the run
    pub warnings: Vec<AnimationWarning>,
}

impl BatchReport {
    /// Items that were processed
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Items whose icon was written
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Items that failed
    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Paths of the written icons, in input order
    pub fn written_files(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok().map(PathBuf::as_path))
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} icon(s) attempted, {} succeeded, {} failed, {} warning(s), destination: {}",
            self.attempted(),
            self.succeeded(),
            self.failed(),
            self.warnings.len(),
            self.destination.display()
        )?;
        if self.cancelled {
            f.write_str(" (cancelled)")?;
        }
        Ok(())
    }
}

/// Stages (a) to (e) of one asset, in memory
#[derive(Debug)]
pub struct RenderedIcon {
    /// Rendered image
    pub pixels: PixelBuffer,
    /// What the animation sampler did
    pub pose: PoseReport,
    /// Bounds the camera framed
    pub bounds: BoundingVolume,
    /// Camera used for the render
    pub placement: CameraPlacement,
}

/// Instantiate, pose, frame and render one asset
///
/// The ephemeral instance is destroyed before this returns. Animation warnings
/// are appended to `warnings` even when a later stage fails.
pub fn render_icon(
    ctx: &mut RenderContext,
    asset: &IconAsset,
    settings: &RenderSettings,
    animation: &AnimationSelection,
    warnings: &mut Vec<AnimationWarning>,
) -> Result<RenderedIcon, ItemError> {
    let object = asset
        .instantiate()
        .map_err(|e| ItemError::at(ItemState::Pending, e))?;
    let mut scope = ctx.spawn(object);
    log::debug!("'{}' {}", asset.name, ItemState::Instantiated);

    let pose = AnimationSampler::apply_pose(scope.object_mut(), animation);
    warnings.extend(pose.warnings.iter().cloned());
    log::debug!("'{}' {} ({} track(s))", asset.name, ItemState::Posed, pose.applied);

    let bounds = BoundsCalculator::compute_bounds(scope.object());
    log::debug!("'{}' {}: {:?}", asset.name, ItemState::Bounded, bounds);

    let placement = CameraFramer::place_camera(&bounds, settings);
    log::debug!("'{}' {}", asset.name, ItemState::Framed);

    let key = scope.key();
    let pixels = OffscreenRenderer::render(&mut scope, key, &placement, settings.resolution)
        .map_err(|e| ItemError::at(ItemState::Framed, e))?;
    log::debug!("'{}' {}", asset.name, ItemState::Rendered);
    if pixels.coverage() == 0 {
        log::warn!(
            "'{}' rendered no pixels; an extent of {:.3} may be clipped by the near plane",
            asset.name,
            bounds.max_extent()
        );
    }

    Ok(RenderedIcon {
        pixels,
        pose,
        bounds,
        placement,
    })
}

/// File stem for an asset name: path separators become `_`
pub fn icon_file_name(asset_name: &str) -> String {
    let stem: String = asset_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let stem = stem.trim();
    if stem.is_empty() || stem == "." || stem == ".." {
        format!("unnamed{}.png", stem.replace('.', "_"))
    } else {
        format!("{stem}.png")
    }
}

/// Batch icon generator
#[derive(Debug, Clone)]
pub struct IconBatchPipeline {
    settings: RenderSettings,
    animation: AnimationSelection,
    destination: PathBuf,
}

impl IconBatchPipeline {
    /// Create a pipeline writing into `destination`
    pub fn new(settings: RenderSettings, animation: AnimationSelection, destination: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            animation,
            destination: destination.into(),
        }
    }

    /// Settings applied to every item
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Output directory
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Where the icon of `asset_name` is written
    pub fn output_path(&self, asset_name: &str) -> PathBuf {
        self.destination.join(icon_file_name(asset_name))
    }

    /// Render every asset, in order
    ///
    /// # Errors
    /// Returns [`PipelineError`] only when nothing can be attempted: invalid
    /// settings or a destination directory that cannot be created. Item
    /// failures are reported in the returned [`BatchReport`].
    pub fn run_batch(
        &self,
        ctx: &mut RenderContext,
        assets: &[IconAsset],
        observer: &mut dyn BatchObserver,
    ) -> Result<BatchReport, PipelineError> {
        self.settings.validate()?;
        std::fs::create_dir_all(&self.destination).map_err(|source| PipelineError::CreateDestination {
            path: self.destination.clone(),
            source,
        })?;

        log::info!(
            "Generating {} icon(s) at {}px into {}",
            assets.len(),
            self.settings.resolution,
            self.destination.display()
        );

        let mut report = BatchReport {
            destination: self.destination.clone(),
            outcomes: Vec::with_capacity(assets.len()),
            cancelled: false,
            warnings: Vec::new(),
        };

        for (index, asset) in assets.iter().enumerate() {
            if observer.should_cancel() {
                log::info!("Batch cancelled before '{}'", asset.name);
                report.cancelled = true;
                break;
            }

            observer.on_item_started(BatchProgress {
                current_index: index,
                total_count: assets.len(),
                asset_name: &asset.name,
            });

            let outcome = self.process_item(ctx, index, asset);
            if let Err(err) = &outcome.result {
                log::error!("Icon generation failed for '{}': {err}", asset.name);
            }
            observer.on_item_finished(&outcome);
            report.warnings.extend(outcome.warnings.iter().cloned());
            report.outcomes.push(outcome);
        }

        log::info!("Icon batch complete: {report}");
        Ok(report)
    }

    fn process_item(&self, ctx: &mut RenderContext, index: usize, asset: &IconAsset) -> ItemOutcome {
        let mut warnings = Vec::new();
        let result = self.produce_file(ctx, asset, &mut warnings);
        ItemOutcome {
            index,
            asset_name: asset.name.clone(),
            result,
            warnings,
        }
    }

    fn produce_file(
        &self,
        ctx: &mut RenderContext,
        asset: &IconAsset,
        warnings: &mut Vec<AnimationWarning>,
    ) -> Result<PathBuf, ItemError> {
        let icon = render_icon(ctx, asset, &self.settings, &self.animation, warnings)?;

        let png = icon
            .pixels
            .encode_png()
            .map_err(|e| ItemError::at(ItemState::Rendered, e))?;
        log::debug!("'{}' {} ({} bytes)", asset.name, ItemState::Encoded, png.len());

        let path = self.output_path(&asset.name);
        if path.exists() {
            log::warn!("Overwriting existing icon {}", path.display());
        }
        std::fs::write(&path, png).map_err(|e| ItemError::at(ItemState::Encoded, e))?;
        log::debug!("'{}' {} to {}", asset.name, ItemState::Written, path.display());

        Ok(path)
    }
}

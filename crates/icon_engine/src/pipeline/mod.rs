//! Icon generation front ends: batch output to disk and single-asset preview

pub mod batch;
pub mod preview;

pub use batch::{
    icon_file_name, render_icon, BatchObserver, BatchProgress, BatchReport, IconBatchPipeline, ItemError,
    ItemErrorKind, ItemOutcome, ItemState, LogObserver, NullObserver, PipelineError, RenderedIcon,
};
pub use preview::{PreviewRenderer, PREVIEW_RESOLUTION};

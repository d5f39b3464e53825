//! Icon generator command line tool
//!
//! Renders one PNG icon per OBJ model using the settings of a TOML or RON
//! configuration file.
//!
//! ```text
//! icon_app <config.toml|config.ron> <model.obj>...
//! ```
//!
//! A missing configuration file means default settings. The process exits
//! with a non-zero status only when the batch could not run at all.

use std::process::ExitCode;

use icon_engine::config::{Config, ConfigError, IconGeneratorConfig};
use icon_engine::foundation::logging;
use icon_engine::pipeline::{IconBatchPipeline, LogObserver, PipelineError};
use icon_engine::prelude::{AnimationSelection, IconAsset, Material, RenderContext};

/// Failures that stop the tool
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("usage: icon_app <config.toml|config.ron> <model.obj>...")]
    Usage,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("batch aborted: {0}")]
    Pipeline(#[from] PipelineError),
}

fn run(args: &[String]) -> Result<(), AppError> {
    let (config_path, model_paths) = match args {
        [config, models @ ..] if !models.is_empty() => (config, models),
        _ => return Err(AppError::Usage),
    };

    let config = IconGeneratorConfig::load_or_default(config_path)?;
    log::info!("Using configuration {config:?}");

    let assets: Vec<IconAsset> = model_paths
        .iter()
        .map(|path| IconAsset::from_obj_file(path, Material::new()))
        .collect();

    let pipeline = IconBatchPipeline::new(config.render_settings(), AnimationSelection::none(), &config.save_path);
    let mut ctx = RenderContext::new();
    let report = pipeline.run_batch(&mut ctx, &assets, &mut LogObserver)?;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(path) => println!("  ok      {} -> {}", outcome.asset_name, path.display()),
            Err(err) => println!("  failed  {}: {err}", outcome.asset_name),
        }
    }
    for warning in &report.warnings {
        println!("  warning {warning}");
    }
    println!("{report}");
    Ok(())
}

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Usage) => {
            eprintln!("{}", AppError::Usage);
            ExitCode::from(2)
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
